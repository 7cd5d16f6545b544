//! HTML page rendering with Tera
//!
//! Templates are embedded at compile time and parsed once when the service
//! starts, so a broken template fails start-up instead of a request.

use axum::response::Html;
use serde::Serialize;
use tera::{Context, Tera};

use crate::error::AppResult;

const TEMPLATES: [(&str, &str); 7] = [
    ("base.html", include_str!("../templates/base.html")),
    ("landing.html", include_str!("../templates/landing.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("registration.html", include_str!("../templates/registration.html")),
    ("before.html", include_str!("../templates/before.html")),
    ("after.html", include_str!("../templates/after.html")),
    ("rating_form.html", include_str!("../templates/rating_form.html")),
];

/// Compiled page templates
#[derive(Debug)]
pub struct Templates {
    tera: Tera,
}

impl Templates {
    /// Parse every embedded template
    pub fn new() -> tera::Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)?;
        Ok(Self { tera })
    }

    /// Render a page with a serializable context
    pub fn render<C: Serialize>(&self, name: &str, context: &C) -> AppResult<Html<String>> {
        let context = Context::from_serialize(context)?;
        Ok(Html(self.tera.render(name, &context)?))
    }

    /// Render a page that takes no context
    pub fn render_plain(&self, name: &str) -> AppResult<Html<String>> {
        Ok(Html(self.tera.render(name, &Context::new())?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_all_templates_parse() {
        Templates::new().unwrap();
    }

    #[test]
    fn test_output_is_escaped() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render(
                "after.html",
                &json!({
                    "show_form": true,
                    "saved": false,
                    "rating": {"area": "<script>alert(1)</script>", "rating": "3"},
                    "errors": {},
                    "choices": [1, 2, 3, 4, 5],
                }),
            )
            .unwrap();

        assert!(!page.contains("<script>alert(1)</script>"));
        assert!(page.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_landing_greets_user() {
        let templates = Templates::new().unwrap();
        let Html(page) = templates
            .render("landing.html", &json!({"user": {"display_name": "Ada Lovelace"}}))
            .unwrap();
        assert!(page.contains("Ada Lovelace"));

        let Html(page) = templates.render_plain("landing.html").unwrap();
        assert!(page.contains("/login"));
    }
}
