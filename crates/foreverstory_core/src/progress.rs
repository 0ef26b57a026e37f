//! crates/foreverstory_core/src/progress.rs
//!
//! Read-only aggregates shown on the story author's dashboard.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{QuestionCategory, StoryStatus, Subscription, SubscriptionPlan, SubscriptionStatus};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// How many delivered questions have been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub answered_count: u64,
    pub total_questions: u64,
    pub percent_complete: u64,
}

impl Progress {
    /// `percent_complete` is `answered / total * 100` rounded half up, or 0 without deliveries.
    pub fn from_counts(answered_count: u64, total_questions: u64) -> Self {
        let percent_complete = if total_questions > 0 {
            (answered_count * 200 + total_questions) / (total_questions * 2)
        } else {
            0
        };
        Self {
            answered_count,
            total_questions,
            percent_complete,
        }
    }
}

/// Whole days left until `end_date`, rounded up and never negative.
pub fn days_remaining(end_date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<i64> {
    let millis = (end_date? - now).num_milliseconds();
    if millis <= 0 {
        return Some(0);
    }
    Some((millis + MILLIS_PER_DAY - 1) / MILLIS_PER_DAY)
}

#[derive(Debug, Clone)]
pub struct DashboardSubscription {
    pub id: Uuid,
    pub plan: SubscriptionPlan,
    pub status: SubscriptionStatus,
    pub days_remaining: Option<i64>,
    pub end_date: Option<DateTime<Utc>>,
}

impl DashboardSubscription {
    pub fn from_subscription(subscription: &Subscription, now: DateTime<Utc>) -> Self {
        Self {
            id: subscription.id,
            plan: subscription.plan,
            status: subscription.status,
            days_remaining: days_remaining(subscription.end_date, now),
            end_date: subscription.end_date,
        }
    }
}

/// The oldest delivered question that is neither answered nor skipped.
#[derive(Debug, Clone)]
pub struct CurrentQuestion {
    pub question_id: Uuid,
    pub delivery_id: Uuid,
    pub text_de: String,
    pub category: QuestionCategory,
    pub delivered_at: DateTime<Utc>,
}

/// Fallback question text for stories written without a question.
pub const FREE_STORY_LABEL: &str = "Freie Geschichte";

#[derive(Debug, Clone)]
pub struct RecentStory {
    pub id: Uuid,
    pub title: Option<String>,
    pub question_text: String,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
    pub has_audio: bool,
    pub has_photos: bool,
    pub status: StoryStatus,
}

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    pub subscription: Option<DashboardSubscription>,
    pub current_question: Option<CurrentQuestion>,
    pub progress: Progress,
    pub recent_stories: Vec<RecentStory>,
}

impl Dashboard {
    /// What a user without an active subscription sees.
    pub fn empty() -> Self {
        Self::default()
    }
}
