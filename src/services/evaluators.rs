use super::ApiClient;
use crate::error::Result;
use crate::models::PersonSummary;

const EVALUATORS: &[&str] = &["avaliadores"];
const ORGANIZERS: &[&str] = &["organizadores"];

/// Lookup of evaluators and organizers by e-mail, used when assembling committees.
pub struct EvaluatorService<'a> {
    api: &'a ApiClient,
}

/// Outcome of resolving a list of e-mails.
#[derive(Debug, Default)]
pub struct Resolved {
    pub found: Vec<PersonSummary>,
    pub unknown: Vec<String>,
}

impl<'a> EvaluatorService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<PersonSummary>> {
        self.lookup(EVALUATORS, email).await
    }

    pub async fn find_organizer_by_email(&self, email: &str) -> Result<Option<PersonSummary>> {
        self.lookup(ORGANIZERS, email).await
    }

    pub async fn resolve_evaluators(&self, emails: &[String]) -> Result<Resolved> {
        self.resolve(EVALUATORS, emails).await
    }

    pub async fn resolve_organizers(&self, emails: &[String]) -> Result<Resolved> {
        self.resolve(ORGANIZERS, emails).await
    }

    async fn lookup(&self, path: &[&str], email: &str) -> Result<Option<PersonSummary>> {
        match self
            .api
            .get_json_query::<PersonSummary, _>(path, &[("email", email)])
            .await
        {
            Ok(person) => Ok(Some(person)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn resolve(&self, path: &[&str], emails: &[String]) -> Result<Resolved> {
        let mut resolved = Resolved::default();
        for email in emails {
            match self.lookup(path, email).await? {
                Some(person) => resolved.found.push(person),
                None => resolved.unknown.push(email.clone()),
            }
        }
        Ok(resolved)
    }
}
