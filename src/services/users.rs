use super::ApiClient;
use crate::error::Result;
use crate::models::User;

pub struct UserService<'a> {
    api: &'a ApiClient,
}

impl<'a> UserService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// The logged-in user, with its role discriminant.
    pub async fn me(&self) -> Result<User> {
        self.api.get_json(&["usuarios", "me"]).await
    }
}
