use serde::{Deserialize, Serialize};

use super::{check_length, require_text, split_list, Validate, ValidationErrors};
use crate::models::{CreateThematicTrackRequest, CreateTrackRequest};

const MAX_DESCRIPTION: usize = 2000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub coordinator: String,
    #[serde(default)]
    pub keywords: String,
}

impl Validate for TrackForm {
    type Output = CreateTrackRequest;

    fn validate(&self) -> Result<CreateTrackRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = require_text(&mut errors, "name", &self.name);
        let description = self.description.trim().to_string();
        check_length(&mut errors, "description", &description, 0, MAX_DESCRIPTION);
        errors.finish(|| CreateTrackRequest {
            name,
            description,
            coordinator: self.coordinator.trim().to_string(),
            keywords: split_list(&self.keywords),
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThematicTrackForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
}

impl Validate for ThematicTrackForm {
    type Output = CreateThematicTrackRequest;

    fn validate(&self) -> Result<CreateThematicTrackRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = require_text(&mut errors, "name", &self.name);
        let description = self.description.trim().to_string();
        check_length(&mut errors, "description", &description, 0, MAX_DESCRIPTION);
        errors.finish(|| CreateThematicTrackRequest {
            name,
            description,
            keywords: split_list(&self.keywords),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_requires_name() {
        let errors = TrackForm::default().validate().unwrap_err();
        assert!(errors.has("name"));
    }

    #[test]
    fn thematic_track_keywords_are_split() {
        let form = ThematicTrackForm {
            name: "Software testing".into(),
            description: "desc".into(),
            keywords: "mutation, fuzzing, Fuzzing".into(),
        };
        let request = form.validate().unwrap();
        assert_eq!(request.keywords, vec!["mutation", "fuzzing"]);
    }

    #[test]
    fn long_description_is_rejected() {
        let form = TrackForm {
            name: "Main".into(),
            description: "x".repeat(MAX_DESCRIPTION + 1),
            ..Default::default()
        };
        assert!(form.validate().unwrap_err().has("description"));
    }
}
