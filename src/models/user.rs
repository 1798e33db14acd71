//! Logged-in user, discriminated by role.
//!
//! The authentication service sets `tipo` on the user payload; each role is a
//! variant carrying only the fields that role has.

use serde::{Deserialize, Serialize};

use super::wire::wire_enum;

wire_enum! {
    pub enum Role {
        Author => "AUTOR", "Author";
        Evaluator => "AVALIADOR", "Evaluator";
        Organizer => "ORGANIZADOR", "Organizer";
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Author {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "biografia", default)]
    pub biography: String,
    #[serde(rename = "areaAtuacao", default)]
    pub area: String,
    #[serde(rename = "idPesquisador", default, skip_serializing_if = "Option::is_none")]
    pub researcher_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluator {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "especialidades", default)]
    pub specialties: Vec<String>,
    #[serde(rename = "numeroAvaliacoes", default)]
    pub review_count: u32,
    #[serde(rename = "disponivel", default)]
    pub available: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Organizer {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    pub email: String,
    #[serde(rename = "cargo", default)]
    pub job_title: String,
    #[serde(rename = "permissoes", default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "tipo")]
pub enum User {
    #[serde(rename = "AUTOR")]
    Author(Author),
    #[serde(rename = "AVALIADOR")]
    Evaluator(Evaluator),
    #[serde(rename = "ORGANIZADOR")]
    Organizer(Organizer),
}

impl User {
    pub fn role(&self) -> Role {
        match self {
            User::Author(_) => Role::Author,
            User::Evaluator(_) => Role::Evaluator,
            User::Organizer(_) => Role::Organizer,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            User::Author(u) => &u.id,
            User::Evaluator(u) => &u.id,
            User::Organizer(u) => &u.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            User::Author(u) => &u.name,
            User::Evaluator(u) => &u.name,
            User::Organizer(u) => &u.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            User::Author(u) => &u.email,
            User::Evaluator(u) => &u.email,
            User::Organizer(u) => &u.email,
        }
    }

    pub fn is_author(&self) -> bool {
        matches!(self, User::Author(_))
    }

    pub fn is_evaluator(&self) -> bool {
        matches!(self, User::Evaluator(_))
    }

    pub fn is_organizer(&self) -> bool {
        matches!(self, User::Organizer(_))
    }

    /// Fail with `Forbidden` unless the user has `role`.
    pub fn require(&self, role: Role) -> crate::Result<()> {
        if self.role() == role {
            Ok(())
        } else {
            Err(crate::Error::Forbidden(format!(
                "this page is only available to the {} role",
                role.label().to_lowercase()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminant_selects_variant() {
        let json = r#"{"tipo":"AVALIADOR","id":"u2","nome":"Ana","email":"ana@uni.br",
                       "especialidades":["NLP"],"numeroAvaliacoes":4,"disponivel":true}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert!(user.is_evaluator());
        assert_eq!(user.role(), Role::Evaluator);
        assert_eq!(user.name(), "Ana");
        assert_eq!(user.email(), "ana@uni.br");
    }

    #[test]
    fn tag_values_match_role_table() {
        let organizer = User::Organizer(Organizer {
            id: "u3".into(),
            name: "Rui".into(),
            email: "rui@uni.br".into(),
            job_title: "Chair".into(),
            permissions: vec![],
        });
        let value = serde_json::to_value(&organizer).unwrap();
        assert_eq!(value["tipo"], organizer.role().as_wire());
    }

    #[test]
    fn missing_discriminant_is_an_error() {
        let json = r#"{"id":"u1","nome":"Ana","email":"ana@uni.br","biografia":"..."}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }

    #[test]
    fn require_rejects_other_roles() {
        let author = User::Author(Author {
            id: "u1".into(),
            name: "Ana".into(),
            email: "ana@uni.br".into(),
            biography: String::new(),
            area: String::new(),
            researcher_id: None,
        });
        assert!(author.require(Role::Author).is_ok());
        assert!(matches!(author.require(Role::Organizer), Err(crate::Error::Forbidden(_))));
    }
}
