use std::sync::OnceLock;

use axum::{http::StatusCode, response::Html};
use tera::{Context, Tera};

use crate::error::Result;

const TEMPLATES: &[(&str, &str)] = &[
    ("base.html", include_str!("../templates/base.html")),
    ("error.html", include_str!("../templates/error.html")),
    ("confirm.html", include_str!("../templates/confirm.html")),
    ("dashboard.html", include_str!("../templates/dashboard.html")),
    ("events.html", include_str!("../templates/events.html")),
    ("event_form.html", include_str!("../templates/event_form.html")),
    ("event_detail.html", include_str!("../templates/event_detail.html")),
    ("committee_form.html", include_str!("../templates/committee_form.html")),
    ("committee.html", include_str!("../templates/committee.html")),
    ("submission.html", include_str!("../templates/submission.html")),
    ("wizard.html", include_str!("../templates/wizard.html")),
    ("review.html", include_str!("../templates/review.html")),
    ("evaluation_form.html", include_str!("../templates/evaluation_form.html")),
    ("decline_form.html", include_str!("../templates/decline_form.html")),
    ("status_summary.html", include_str!("../templates/status_summary.html")),
];

static TERA: OnceLock<Tera> = OnceLock::new();

pub fn get_tera() -> &'static Tera {
    TERA.get_or_init(|| {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES.iter().copied())
            .expect("Failed to load templates");
        tera
    })
}

pub fn render(name: &str, ctx: &Context) -> Result<Html<String>> {
    Ok(Html(get_tera().render(name, ctx)?))
}

/// Error page. Falls back to bare HTML if the template itself fails.
pub fn render_error(status: StatusCode, message: &str, session_expired: bool) -> Html<String> {
    let mut ctx = Context::new();
    ctx.insert("status", &status.as_u16());
    ctx.insert("reason", status.canonical_reason().unwrap_or("Error"));
    ctx.insert("message", message);
    ctx.insert("session_expired", &session_expired);
    match get_tera().render("error.html", &ctx) {
        Ok(page) => Html(page),
        Err(err) => {
            tracing::error!("Error page failed to render: {}", err);
            Html(format!("<h1>{}</h1>", status.as_u16()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_parses() {
        let tera = get_tera();
        for (name, _) in TEMPLATES {
            assert!(tera.get_template_names().any(|n| n == *name), "{name} missing");
        }
    }

    #[test]
    fn error_page_escapes_message() {
        let Html(page) = render_error(StatusCode::BAD_GATEWAY, "<b>down</b>", false);
        assert!(page.contains("&lt;b&gt;down"));
        assert!(!page.contains("<b>down"));
        assert!(page.contains("502"));
    }

    #[test]
    fn session_error_links_to_sign_in() {
        let Html(page) = render_error(StatusCode::UNAUTHORIZED, "Your session has expired.", true);
        assert!(page.contains("Sign in again"));
    }
}
