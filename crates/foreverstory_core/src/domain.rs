//! crates/foreverstory_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format;
//! adapters convert them to and from their own records via the string tags below.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::validation::ValidationError;

/// Declares a fieldless enum together with its canonical upper-case tag,
/// `as_str`, `Display` and a `FromStr` that reports unknown tags as validation errors.
macro_rules! tagged_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($kind:literal) {
            $($variant:ident => $tag:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $tag),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($tag => Ok($name::$variant),)+
                    other => Err(ValidationError::UnknownTag {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }
    };
}

tagged_enum! {
    /// The topic a question belongs to. `Custom` marks questions written by the gift purchaser.
    QuestionCategory("category") {
        Childhood => "CHILDHOOD",
        Education => "EDUCATION",
        Career => "CAREER",
        Family => "FAMILY",
        Relationships => "RELATIONSHIPS",
        WarPostwar => "WAR_POSTWAR",
        Ddr => "DDR",
        Reunification => "REUNIFICATION",
        Traditions => "TRADITIONS",
        LifeLessons => "LIFE_LESSONS",
        Custom => "CUSTOM",
    }
}

tagged_enum! {
    /// Regional eligibility of a question. `All` questions are eligible everywhere.
    Region("region") {
        All => "ALL",
        WestGermany => "WEST_GERMANY",
        EastGermany => "EAST_GERMANY",
        Austria => "AUSTRIA",
        Switzerland => "SWITZERLAND",
    }
}

impl Region {
    /// Whether a question tagged with `self` may be sent to a subscriber in `requested`.
    pub fn is_eligible_for(&self, requested: Region) -> bool {
        *self == Region::All || *self == requested
    }
}

tagged_enum! {
    SubscriptionPlan("plan") {
        Starter => "STARTER",
        Standard => "STANDARD",
        Premium => "PREMIUM",
    }
}

impl SubscriptionPlan {
    /// Total number of questions a subscription of this plan receives.
    pub fn question_count(&self) -> usize {
        match self {
            SubscriptionPlan::Starter => 12,
            SubscriptionPlan::Standard => 26,
            SubscriptionPlan::Premium => 52,
        }
    }

    pub fn duration_months(&self) -> u32 {
        match self {
            SubscriptionPlan::Starter => 3,
            SubscriptionPlan::Standard => 6,
            SubscriptionPlan::Premium => 12,
        }
    }
}

tagged_enum! {
    SubscriptionStatus("subscription status") {
        Pending => "PENDING",
        Active => "ACTIVE",
        Paused => "PAUSED",
        Completed => "COMPLETED",
        Cancelled => "CANCELLED",
    }
}

tagged_enum! {
    /// How often a new question is pushed to the story author.
    DeliveryFrequency("frequency") {
        Weekly => "weekly",
        Biweekly => "biweekly",
    }
}

impl DeliveryFrequency {
    pub fn interval_days(&self) -> i64 {
        match self {
            DeliveryFrequency::Weekly => 7,
            DeliveryFrequency::Biweekly => 14,
        }
    }
}

impl Default for DeliveryFrequency {
    fn default() -> Self {
        DeliveryFrequency::Weekly
    }
}

tagged_enum! {
    StoryStatus("story status") {
        Draft => "DRAFT",
        Submitted => "SUBMITTED",
        Edited => "EDITED",
        Approved => "APPROVED",
    }
}

tagged_enum! {
    /// Whether a story was typed or dictated.
    InputMode("input mode") {
        Text => "TEXT",
        Voice => "VOICE",
    }
}

/// A question from the reference bank, or a custom question wrapped in the same shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub text_de: String,
    pub text_en: String,
    pub category: QuestionCategory,
    pub region: Region,
}

impl Question {
    pub fn new(
        text_de: impl Into<String>,
        text_en: impl Into<String>,
        category: QuestionCategory,
        region: Region,
    ) -> Self {
        Self {
            text_de: text_de.into(),
            text_en: text_en.into(),
            category,
            region,
        }
    }

    /// Wraps a purchaser-written question. Both language variants carry the same text.
    pub fn custom(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            text_en: text.clone(),
            text_de: text,
            category: QuestionCategory::Custom,
            region: Region::All,
        }
    }
}

/// One entry of a subscription's pre-built question queue, as persisted.
#[derive(Debug, Clone)]
pub struct QueuedQuestion {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub position: usize,
    pub question: Question,
}

/// Terminal or pending state of a delivered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    Pending,
    Answered,
    Skipped,
}

impl DeliveryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pending",
            DeliveryStatus::Answered => "answered",
            DeliveryStatus::Skipped => "skipped",
        }
    }
}

/// One question having been sent to a subscription.
#[derive(Debug, Clone)]
pub struct QuestionDelivery {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub question_id: Uuid,
    pub delivered_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
    pub skipped_at: Option<DateTime<Utc>>,
}

impl QuestionDelivery {
    pub fn status(&self) -> DeliveryStatus {
        match (self.answered_at, self.skipped_at) {
            (Some(_), _) => DeliveryStatus::Answered,
            (None, Some(_)) => DeliveryStatus::Skipped,
            (None, None) => DeliveryStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status() == DeliveryStatus::Pending
    }
}

/// A paid plan linking a gift purchaser to a story author.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: Uuid,
    pub purchaser_id: Uuid,
    pub author_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub region: Region,
    pub frequency: DeliveryFrequency,
    /// 1 = Monday .. 7 = Sunday
    pub preferred_day: u8,
    pub gift_message: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_delivery_at: Option<DateTime<Utc>>,
    /// Position in the question queue that the next delivery will use.
    pub next_queue_position: usize,
    pub queue_length: usize,
    pub created_at: DateTime<Utc>,
}

impl Subscription {
    pub fn is_participant(&self, user_id: Uuid) -> bool {
        self.author_id == user_id || self.purchaser_id == user_id
    }
}

/// The fields needed to persist a freshly purchased subscription.
#[derive(Debug, Clone)]
pub struct NewSubscription {
    pub purchaser_id: Uuid,
    pub author_id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub region: Region,
    pub frequency: DeliveryFrequency,
    pub preferred_day: u8,
    pub gift_message: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// The answer to one delivered question (or a free story without a question).
#[derive(Debug, Clone)]
pub struct Story {
    pub id: Uuid,
    pub author_id: Uuid,
    pub subscription_id: Uuid,
    pub delivery_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    pub status: StoryStatus,
    pub input_mode: InputMode,
    pub word_count: usize,
    pub audio_url: Option<String>,
    pub photo_count: usize,
    pub transcription_confidence: Option<f32>,
    pub transcribed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Represents a user - used throughout app
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
}

// Only used internally for login/signup - contains sensitive data.
// Gift recipients are created without a password until they sign up.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: Option<String>,
}
