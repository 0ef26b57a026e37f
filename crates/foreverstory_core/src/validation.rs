//! crates/foreverstory_core/src/validation.rs
//!
//! Input validation for everything that enters the core from the outside:
//! queue parameters, schedule parameters, gift purchases, stories and credentials.
//! Messages are German (Sie-form) because they are shown to end users verbatim.

use std::collections::HashSet;

use crate::domain::{DeliveryFrequency, InputMode, QuestionCategory, Region, StoryStatus, SubscriptionPlan};

/// Validation failures. Always reported synchronously to the caller, never recovered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Ungültige Anzahl an Fragen: {0}. Es muss mindestens eine Frage geben.")]
    InvalidQuestionCount(usize),
    #[error("Unbekannter Wert für {kind}: '{value}'")]
    UnknownTag { kind: &'static str, value: String },
    #[error("Ungültiger Wochentag: {0}. Erlaubt sind die Werte 1 bis 7.")]
    InvalidPreferredDay(u8),
    #[error("Das berechnete Datum liegt außerhalb des gültigen Bereichs.")]
    DateOutOfRange,
    #[error("Für diese Auswahl sind keine Fragen verfügbar.")]
    EmptyQueue,
    /// A form field that violates one of its constraints.
    #[error("{message}")]
    Field { field: &'static str, message: String },
}

impl ValidationError {
    fn field(field: &'static str, message: impl Into<String>) -> Self {
        ValidationError::Field {
            field,
            message: message.into(),
        }
    }
}

pub type ValidationResult<T> = Result<T, ValidationError>;

pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_GIFT_MESSAGE_LENGTH: usize = 1_000;
pub const MAX_CUSTOM_QUESTIONS: usize = 5;
pub const MAX_CUSTOM_QUESTION_LENGTH: usize = 500;
pub const MAX_STORY_TITLE_LENGTH: usize = 200;
pub const MAX_STORY_CONTENT_LENGTH: usize = 50_000;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Basic address shape: one `@`, something before it, a dotted domain after it, no whitespace.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Validate an email address.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    if email.is_empty() {
        return Err(ValidationError::field(
            "email",
            "Bitte geben Sie Ihre E-Mail-Adresse ein.",
        ));
    }
    if !is_plausible_email(email) {
        return Err(ValidationError::field(
            "email",
            "Bitte geben Sie eine gültige E-Mail-Adresse ein.",
        ));
    }
    Ok(())
}

/// Passwords need at least eight characters with lower case, upper case and a digit.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::field(
            "password",
            "Das Passwort muss mindestens 8 Zeichen lang sein.",
        ));
    }
    let has_lower = password.chars().any(|c| c.is_lowercase());
    let has_upper = password.chars().any(|c| c.is_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !(has_lower && has_upper && has_digit) {
        return Err(ValidationError::field(
            "password",
            "Das Passwort muss mindestens einen Großbuchstaben, einen Kleinbuchstaben und eine Zahl enthalten.",
        ));
    }
    Ok(())
}

pub fn validate_name(field: &'static str, name: &str) -> ValidationResult<()> {
    if name.trim().is_empty() {
        return Err(ValidationError::field(field, "Bitte geben Sie einen Namen ein."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::field(
            field,
            "Der Name darf maximal 100 Zeichen lang sein.",
        ));
    }
    Ok(())
}

pub fn validate_preferred_day(day: u8) -> ValidationResult<()> {
    if (1..=7).contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::InvalidPreferredDay(day))
    }
}

/// Counts whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Everything a gift purchaser chooses when buying a subscription for a family member.
#[derive(Debug, Clone)]
pub struct GiftPurchase {
    pub recipient_email: String,
    pub recipient_name: String,
    pub plan: SubscriptionPlan,
    pub gift_message: Option<String>,
    pub custom_questions: Vec<String>,
    pub frequency: DeliveryFrequency,
    pub preferred_day: u8,
    pub region: Region,
    pub exclude_categories: HashSet<QuestionCategory>,
}

impl GiftPurchase {
    pub fn validate(&self) -> ValidationResult<()> {
        validate_email(&self.recipient_email)?;
        validate_name("recipient_name", &self.recipient_name)?;

        if let Some(message) = &self.gift_message {
            if message.chars().count() > MAX_GIFT_MESSAGE_LENGTH {
                return Err(ValidationError::field(
                    "gift_message",
                    "Die Nachricht darf maximal 1.000 Zeichen lang sein.",
                ));
            }
        }

        if self.custom_questions.len() > MAX_CUSTOM_QUESTIONS {
            return Err(ValidationError::field(
                "custom_questions",
                "Sie können maximal 5 eigene Fragen hinzufügen.",
            ));
        }
        for question in &self.custom_questions {
            if question.trim().is_empty() {
                return Err(ValidationError::field(
                    "custom_questions",
                    "Eigene Fragen dürfen nicht leer sein.",
                ));
            }
            if question.chars().count() > MAX_CUSTOM_QUESTION_LENGTH {
                return Err(ValidationError::field(
                    "custom_questions",
                    "Jede Frage darf maximal 500 Zeichen lang sein.",
                ));
            }
        }

        validate_preferred_day(self.preferred_day)
    }
}

/// A story as submitted by the author, before it is merged into a stored `Story`.
#[derive(Debug, Clone)]
pub struct StoryDraft {
    pub story_id: Option<uuid::Uuid>,
    pub delivery_id: Option<uuid::Uuid>,
    pub title: Option<String>,
    pub content: String,
    pub status: StoryStatus,
    pub input_mode: InputMode,
}

impl StoryDraft {
    pub fn validate(&self) -> ValidationResult<()> {
        if let Some(title) = &self.title {
            if title.chars().count() > MAX_STORY_TITLE_LENGTH {
                return Err(ValidationError::field(
                    "title",
                    "Der Titel darf maximal 200 Zeichen lang sein.",
                ));
            }
        }
        if self.content.trim().is_empty() {
            return Err(ValidationError::field(
                "content",
                "Bitte schreiben Sie Ihre Geschichte.",
            ));
        }
        if self.content.chars().count() > MAX_STORY_CONTENT_LENGTH {
            return Err(ValidationError::field(
                "content",
                "Die Geschichte darf maximal 50.000 Zeichen lang sein.",
            ));
        }
        Ok(())
    }
}
