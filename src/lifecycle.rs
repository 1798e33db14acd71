//! Submission lifecycle.
//!
//! The server owns a submission's status; this module is the client's copy of
//! the rules so that pages only offer actions that can succeed and refuse
//! illegal moves before calling the API. The same table is served as JSON at
//! `/api/lifecycle`.
//!
//! ```text
//! RASCUNHO -> SUBMETIDA -> EM_AVALIACAO -> APROVADA | APROVADA_COM_RESSALVAS | REJEITADA
//!     |                         |
//!     v                         v
//! RETIRADA                 EM_REVISAO -> APROVADA | REJEITADA      (organizer tie-break)
//!
//! APROVADA_COM_RESSALVAS -> RESUBMETIDA (a new version starts at SUBMETIDA)
//! ```

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::SubmissionStatus;

/// Party allowed to trigger a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Actor {
    Author,
    Organizer,
    /// Server-side automation (evaluator recruitment, evaluation aggregation)
    System,
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Actor::Author => "author",
            Actor::Organizer => "organizer",
            Actor::System => "system",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub from: SubmissionStatus,
    pub to: SubmissionStatus,
    pub actor: Actor,
}

const fn edge(from: SubmissionStatus, to: SubmissionStatus, actor: Actor) -> Transition {
    Transition { from, to, actor }
}

use SubmissionStatus::*;

/// Every allowed status change.
pub const TRANSITIONS: &[Transition] = &[
    edge(Draft, Submitted, Actor::Author),
    edge(Draft, Retired, Actor::Author),
    edge(Submitted, UnderEvaluation, Actor::System),
    edge(UnderEvaluation, Approved, Actor::System),
    edge(UnderEvaluation, ApprovedWithCaveats, Actor::System),
    edge(UnderEvaluation, Rejected, Actor::System),
    edge(UnderEvaluation, UnderReview, Actor::System),
    edge(UnderReview, Approved, Actor::Organizer),
    edge(UnderReview, Rejected, Actor::Organizer),
    edge(ApprovedWithCaveats, Resubmitted, Actor::Author),
];

/// Colour family of a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Neutral,
    Info,
    Warning,
    Success,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub label: &'static str,
    pub tone: BadgeTone,
}

impl SubmissionStatus {
    pub fn allowed_transitions(self) -> impl Iterator<Item = &'static Transition> {
        TRANSITIONS.iter().filter(move |t| t.from == self)
    }

    pub fn can_transition_to(self, to: SubmissionStatus) -> bool {
        self.allowed_transitions().any(|t| t.to == to)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_transitions().next().is_none()
    }

    /// Authors may still change content.
    pub fn is_editable(self) -> bool {
        self == Draft
    }

    pub fn can_delete(self) -> bool {
        self == Draft
    }

    pub fn can_resubmit(self) -> bool {
        self.can_transition_to(Resubmitted)
    }

    pub fn awaits_organizer_decision(self) -> bool {
        self.allowed_transitions().any(|t| t.actor == Actor::Organizer)
    }

    pub fn badge(self) -> Badge {
        let tone = match self {
            Draft | Retired | Resubmitted => BadgeTone::Neutral,
            Submitted | UnderEvaluation => BadgeTone::Info,
            ApprovedWithCaveats | UnderReview => BadgeTone::Warning,
            Approved => BadgeTone::Success,
            Rejected => BadgeTone::Danger,
        };
        Badge {
            label: self.label(),
            tone,
        }
    }
}

/// Check that `actor` may move a submission from `from` to `to`.
pub fn transition(from: SubmissionStatus, to: SubmissionStatus, actor: Actor) -> Result<SubmissionStatus> {
    let edge = TRANSITIONS
        .iter()
        .find(|t| t.from == from && t.to == to)
        .ok_or(Error::InvalidTransition { from, to })?;
    if edge.actor != actor {
        return Err(Error::NotPermitted { actor, from, to });
    }
    Ok(to)
}

#[derive(Debug, Clone, Serialize)]
pub struct StateDoc {
    pub status: SubmissionStatus,
    pub label: &'static str,
    pub terminal: bool,
    pub badge: Badge,
}

/// Lifecycle description served to clients and documentation.
#[derive(Debug, Clone, Serialize)]
pub struct LifecycleDoc {
    pub states: Vec<StateDoc>,
    pub transitions: &'static [Transition],
}

pub fn describe() -> LifecycleDoc {
    LifecycleDoc {
        states: SubmissionStatus::ALL
            .iter()
            .map(|&status| StateDoc {
                status,
                label: status.label(),
                terminal: status.is_terminal(),
                badge: status.badge(),
            })
            .collect(),
        transitions: TRANSITIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_submits_and_retires_drafts() {
        assert_eq!(transition(Draft, Submitted, Actor::Author).unwrap(), Submitted);
        assert_eq!(transition(Draft, Retired, Actor::Author).unwrap(), Retired);
        assert!(matches!(
            transition(Submitted, Retired, Actor::Author),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn tie_break_belongs_to_organizer() {
        assert!(transition(UnderReview, Rejected, Actor::Organizer).is_ok());
        assert!(matches!(
            transition(UnderReview, Approved, Actor::Author),
            Err(Error::NotPermitted { .. })
        ));
        assert!(matches!(
            transition(UnderReview, ApprovedWithCaveats, Actor::Organizer),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn decisions_are_irreversible() {
        for status in [Approved, Rejected, Retired, Resubmitted] {
            assert!(status.is_terminal(), "{status:?} should be terminal");
        }
        assert!(!Approved.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(UnderReview));
    }

    #[test]
    fn every_state_is_reachable_from_draft() {
        let mut reached = vec![Draft];
        let mut frontier = vec![Draft];
        while let Some(state) = frontier.pop() {
            for t in state.allowed_transitions() {
                if !reached.contains(&t.to) {
                    reached.push(t.to);
                    frontier.push(t.to);
                }
            }
        }
        for status in SubmissionStatus::ALL {
            assert!(reached.contains(status), "{status:?} unreachable");
        }
    }

    #[test]
    fn permissions_follow_the_table() {
        assert!(Draft.can_delete());
        assert!(!Submitted.can_delete());
        assert!(ApprovedWithCaveats.can_resubmit());
        assert!(!Approved.can_resubmit());
        assert!(UnderReview.awaits_organizer_decision());
        assert!(!UnderEvaluation.awaits_organizer_decision());
    }

    #[test]
    fn badges() {
        assert_eq!(Approved.badge().tone, BadgeTone::Success);
        assert_eq!(Rejected.badge().tone, BadgeTone::Danger);
        assert_eq!(UnderReview.badge().label, "Under review");
    }

    #[test]
    fn description_serializes_wire_values() {
        let doc = serde_json::to_value(describe()).unwrap();
        assert_eq!(doc["states"].as_array().unwrap().len(), SubmissionStatus::ALL.len());
        assert_eq!(doc["transitions"][0]["from"], "RASCUNHO");
        assert_eq!(doc["transitions"][0]["actor"], "AUTHOR");
    }
}
