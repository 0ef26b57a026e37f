//! crates/foreverstory_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or APIs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    NewSubscription, Question, QuestionDelivery, QueuedQuestion, Story, Subscription,
    SubscriptionStatus, User, UserCredentials,
};
use crate::progress::{CurrentQuestion, RecentStory};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

/// Answered and total delivery counts of one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeliveryCounts {
    pub answered: u64,
    pub total: u64,
}

/// Text returned by a transcription backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcription {
    pub text: String,
    pub language: Option<String>,
    pub confidence: Option<f32>,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- Users & Auth ---
    /// Fails with `Conflict` if any account already uses the email, including a
    /// password-less gift recipient.
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    /// Looks up a user by email, creating a password-less account for gift recipients.
    async fn get_or_create_user_by_email(&self, email: &str, name: Option<&str>) -> PortResult<User>;

    /// Stores a one-time claim token on a password-less account, replacing any earlier one.
    /// Returns `false` when the account already has a password.
    async fn issue_claim_token(&self, user_id: Uuid, claim_token: &str) -> PortResult<bool>;

    /// Sets the password of a password-less account whose claim token matches, and
    /// consumes the token. Fails with `Unauthorized` otherwise.
    async fn claim_user_account(
        &self,
        email: &str,
        claim_token: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Subscriptions & Question Queue ---
    /// Persists the subscription together with its pre-built question queue.
    async fn create_subscription(
        &self,
        subscription: NewSubscription,
        queue: &[Question],
    ) -> PortResult<Subscription>;

    async fn get_subscription(&self, subscription_id: Uuid) -> PortResult<Subscription>;

    async fn get_active_subscription_for_author(
        &self,
        author_id: Uuid,
    ) -> PortResult<Option<Subscription>>;

    async fn update_subscription_schedule(
        &self,
        subscription_id: Uuid,
        next_queue_position: usize,
        next_delivery_at: Option<DateTime<Utc>>,
        status: SubscriptionStatus,
    ) -> PortResult<()>;

    async fn get_queued_question(
        &self,
        subscription_id: Uuid,
        position: usize,
    ) -> PortResult<Option<QueuedQuestion>>;

    // --- Deliveries ---
    /// Records the delivery of the queued question at `from_position` and advances the
    /// queue to the next position in one step.
    ///
    /// Fails with `Conflict` if the subscription is no longer at `from_position` or the
    /// question was already delivered; nothing is written in that case.
    async fn record_delivery(
        &self,
        subscription_id: Uuid,
        from_position: usize,
        question_id: Uuid,
        delivered_at: DateTime<Utc>,
        next_delivery_at: DateTime<Utc>,
    ) -> PortResult<QuestionDelivery>;

    async fn get_delivery(&self, delivery_id: Uuid) -> PortResult<QuestionDelivery>;

    /// Fails with `Conflict` if the delivery is already answered or skipped.
    async fn mark_delivery_answered(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()>;

    /// Fails with `Conflict` if the delivery is already answered or skipped.
    async fn mark_delivery_skipped(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()>;

    async fn get_current_question(&self, subscription_id: Uuid) -> PortResult<Option<CurrentQuestion>>;

    async fn count_deliveries(&self, subscription_id: Uuid) -> PortResult<DeliveryCounts>;

    // --- Stories ---
    /// Inserts the story, or replaces the stored one with the same id.
    async fn save_story(&self, story: &Story) -> PortResult<()>;

    async fn get_story(&self, story_id: Uuid) -> PortResult<Story>;

    async fn list_stories_for_author(&self, author_id: Uuid) -> PortResult<Vec<Story>>;

    async fn get_recent_stories(
        &self,
        author_id: Uuid,
        subscription_id: Uuid,
        limit: usize,
    ) -> PortResult<Vec<RecentStory>>;
}

#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Transcribes an uploaded audio file (webm, mp4 or wav) into German text.
    async fn transcribe_audio(&self, file_name: &str, audio_data: Vec<u8>) -> PortResult<Transcription>;
}
