//! Data models mirroring the conference REST API resources.
//!
//! Field names are English in Rust and renamed to the server's camelCase
//! Portuguese on the wire.

mod committee;
mod evaluation;
mod event;
mod invitation;
mod reference;
mod submission;
mod track;
mod user;
pub mod wire;

pub use committee::*;
pub use evaluation::*;
pub use event::*;
pub use invitation::*;
pub use reference::*;
pub use submission::*;
pub use track::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Minimal view of a person embedded in other resources.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersonSummary {
    pub id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub email: String,
}
