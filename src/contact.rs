//! Contact form, newsletter signup and chat deep links.
//!
//! Without a configured relay nothing leaves the machine: a valid form is
//! acknowledged with a local notice.

use regex::Regex;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ContactConfig;
use crate::error::ContactError;
use crate::notice::Notice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
    pub size_bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub attachment: Option<Attachment>,
}

/// Body posted to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayPayload {
    pub from_name: String,
    pub reply_to: String,
    pub subject: String,
    pub message: String,
    pub file_info: String,
}

impl ContactForm {
    /// Human label for the attachment; only its name and size are sent.
    pub fn file_label(&self) -> String {
        match &self.attachment {
            Some(a) => format!("{} ({} KB)", a.name, (a.size_bytes as f64 / 1024.0).round()),
            None => "No file".to_string(),
        }
    }

    pub fn validate(&self) -> Result<RelayPayload, ContactError> {
        let fields = [
            ("name", &self.name),
            ("email", &self.email),
            ("subject", &self.subject),
            ("message", &self.message),
        ];
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(field, _)| *field)
            .collect();
        if !missing.is_empty() {
            return Err(ContactError::MissingFields(missing));
        }
        Ok(RelayPayload {
            from_name: self.name.trim().to_string(),
            reply_to: self.email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message: self.message.trim().to_string(),
            file_info: self.file_label(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ContactDesk {
    email: Regex,
    relay_url: Option<String>,
    client: reqwest::Client,
    chat_phone: String,
    chat_message: String,
}

impl ContactDesk {
    pub fn new(config: &ContactConfig) -> Result<Self, regex::Error> {
        Ok(Self {
            email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")?,
            relay_url: config
                .relay_url
                .clone()
                .filter(|url| !url.trim().is_empty()),
            client: reqwest::Client::new(),
            chat_phone: config.chat_phone.clone(),
            chat_message: config.chat_message.clone(),
        })
    }

    pub fn relay_configured(&self) -> bool {
        self.relay_url.is_some()
    }

    pub async fn submit(&self, form: &ContactForm) -> Result<Notice, ContactError> {
        let payload = form.validate()?;
        let Some(url) = &self.relay_url else {
            info!(subject = %payload.subject, "contact form prepared, no relay configured");
            return Ok(Notice::info(
                "Message prepared (relay not configured). Nothing was sent.",
            ));
        };

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ContactError::Relay(e.to_string()))?;
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "contact relay rejected message");
            return Err(ContactError::Relay(format!(
                "relay answered HTTP {}",
                response.status().as_u16()
            )));
        }
        info!(subject = %payload.subject, "contact form sent");
        Ok(Notice::success("Message sent successfully!"))
    }

    /// UI-only newsletter signup: validates and acknowledges.
    pub fn newsletter(&self, email: &str) -> Notice {
        let email = email.trim();
        if email.is_empty() {
            Notice::info("Email is optional. You can also send a message from the contact form.")
        } else if !self.email.is_match(email) {
            Notice::error("Please enter a valid email address.")
        } else {
            Notice::success("Thanks! Signup noted. Use the contact form to reach me directly.")
        }
    }

    pub fn is_valid_email(&self, email: &str) -> bool {
        self.email.is_match(email.trim())
    }

    /// Chat link using the configured phone and default message.
    pub fn chat_link(&self, message: &str) -> String {
        chat_link(&self.chat_phone, message, &self.chat_message)
    }
}

/// `https://wa.me/{phone}?text=…`; a blank message is replaced by `default`.
pub fn chat_link(phone: &str, message: &str, default: &str) -> String {
    let message = message.trim();
    let text = if message.is_empty() { default } else { message };
    let phone: String = phone.chars().filter(char::is_ascii_digit).collect();
    format!("https://wa.me/{phone}?text={}", urlencoding::encode(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ContactForm {
        ContactForm {
            name: " Ada ".into(),
            email: "ada@example.com".into(),
            subject: "Lab".into(),
            message: "Hello".into(),
            attachment: None,
        }
    }

    fn desk() -> ContactDesk {
        ContactDesk::new(&ContactConfig::default()).unwrap()
    }

    #[test]
    fn validate_lists_missing_fields() {
        let mut f = form();
        f.email = "  ".into();
        f.message = String::new();
        match f.validate() {
            Err(ContactError::MissingFields(fields)) => assert_eq!(fields, ["email", "message"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn validate_builds_trimmed_payload() {
        let mut f = form();
        f.attachment = Some(Attachment {
            name: "topology.png".into(),
            size_bytes: 2600,
        });
        let payload = f.validate().unwrap();
        assert_eq!(payload.from_name, "Ada");
        assert_eq!(payload.file_info, "topology.png (3 KB)");
        assert_eq!(form().file_label(), "No file");
    }

    #[tokio::test]
    async fn submit_without_relay_is_local_only() {
        let desk = desk();
        assert!(!desk.relay_configured());
        let notice = desk.submit(&form()).await.unwrap();
        assert_eq!(notice.kind, crate::notice::NoticeKind::Info);
    }

    #[tokio::test]
    async fn submit_rejects_incomplete_form() {
        let err = desk().submit(&ContactForm::default()).await.unwrap_err();
        assert!(matches!(err, ContactError::MissingFields(f) if f.len() == 4));
    }

    #[test]
    fn newsletter_outcomes() {
        use crate::notice::NoticeKind;
        let desk = desk();
        assert_eq!(desk.newsletter("").kind, NoticeKind::Info);
        assert_eq!(desk.newsletter("not-an-email").kind, NoticeKind::Error);
        assert_eq!(desk.newsletter("a@b.io").kind, NoticeKind::Success);
        assert!(!desk.is_valid_email("a @b.io"));
    }

    #[test]
    fn chat_link_encodes_message_and_uses_default() {
        assert_eq!(
            chat_link("+880 1713", "Hi & bye?", "default"),
            "https://wa.me/8801713?text=Hi%20%26%20bye%3F"
        );
        assert_eq!(
            chat_link("123", "   ", "Hello there"),
            "https://wa.me/123?text=Hello%20there"
        );
        assert!(desk().chat_link("").starts_with("https://wa.me/8801713086375?text=Hello"));
    }
}
