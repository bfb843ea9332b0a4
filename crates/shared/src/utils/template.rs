use askama::{Error, Template};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailTemplateData {
    pub title: String,
    pub message: String,
    pub button: String,
    pub link: String,
}

#[derive(Template, Debug)]
#[template(path = "email.html")]
pub struct EmailTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub button: &'a str,
    pub link: &'a str,
}

impl<'a> From<&'a EmailTemplateData> for EmailTemplate<'a> {
    fn from(data: &'a EmailTemplateData) -> Self {
        EmailTemplate {
            title: &data.title,
            message: &data.message,
            button: &data.button,
            link: &data.link,
        }
    }
}

pub fn render_email(data: &EmailTemplateData) -> Result<String, Error> {
    info!("📧 Rendering email template: {}", data.title);

    EmailTemplate::from(data).render().inspect_err(|e| {
        error!("❌ Failed to render email template: {}", e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_link_button_and_escapes_message() {
        let html = render_email(&EmailTemplateData {
            title: "Verify your email".into(),
            message: "Hello <Asha>".into(),
            button: "Verify".into(),
            link: "https://parkspot.test/verify?code=abc".into(),
        })
        .unwrap();

        assert!(html.contains("Verify your email"));
        assert!(html.contains("code=abc"));
        assert!(!html.contains("<Asha>"));
    }

    #[test]
    fn omits_button_without_link() {
        let html = render_email(&EmailTemplateData {
            title: "Booking cancelled".into(),
            message: "Your booking was cancelled".into(),
            button: "Open".into(),
            link: String::new(),
        })
        .unwrap();

        assert!(!html.contains("<a href"));
    }
}
