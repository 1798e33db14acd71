//! Role-conditional sidebar links.

use serde::Serialize;

use crate::models::User;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub href: &'static str,
}

const fn item(label: &'static str, href: &'static str) -> NavItem {
    NavItem { label, href }
}

pub fn sidebar(user: &User) -> Vec<NavItem> {
    let mut items = vec![item("Dashboard", "/dashboard"), item("Events", "/eventos")];
    match user {
        User::Author(_) => {
            items.push(item("My submissions", "/dashboard#submissoes"));
        }
        User::Evaluator(_) => {
            items.push(item("Invitations", "/dashboard#convites"));
            items.push(item("My evaluations", "/dashboard#avaliacoes"));
        }
        User::Organizer(_) => {
            items.push(item("New event", "/eventos/novo"));
            items.push(item("Awaiting decision", "/dashboard#decisoes"));
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Organizer};

    #[test]
    fn organizer_gets_management_links() {
        let organizer = User::Organizer(Organizer {
            id: "o1".into(),
            name: "Ana".into(),
            email: "ana@example.org".into(),
            job_title: "Chair".into(),
            permissions: vec![],
        });
        let hrefs: Vec<_> = sidebar(&organizer).iter().map(|i| i.href).collect();
        assert!(hrefs.contains(&"/eventos/novo"));
    }

    #[test]
    fn author_does_not() {
        let author = User::Author(Author {
            id: "a1".into(),
            name: "Rui".into(),
            email: "rui@example.org".into(),
            biography: String::new(),
            area: String::new(),
            researcher_id: None,
        });
        let hrefs: Vec<_> = sidebar(&author).iter().map(|i| i.href).collect();
        assert!(!hrefs.contains(&"/eventos/novo"));
        assert!(hrefs.contains(&"/dashboard#submissoes"));
    }
}
