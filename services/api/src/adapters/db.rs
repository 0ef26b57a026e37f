//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use foreverstory_core::domain::{
    NewSubscription, Question, QuestionDelivery, QueuedQuestion, Story, Subscription,
    SubscriptionStatus, User, UserCredentials,
};
use foreverstory_core::ports::{DatabaseService, DeliveryCounts, PortError, PortResult};
use foreverstory_core::progress::{CurrentQuestion, RecentStory, FREE_STORY_LABEL};
use sqlx::{FromRow, PgPool};
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn not_found(entity: &str, id: impl std::fmt::Display) -> impl FnOnce(sqlx::Error) -> PortError {
    let message = format!("{} {} not found", entity, id);
    move |e| match e {
        sqlx::Error::RowNotFound => PortError::NotFound(message),
        _ => PortError::Unexpected(e.to_string()),
    }
}

/// Parses a stored tag column back into its core enum.
fn tag<T>(value: &str) -> PortResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| PortError::Unexpected(format!("corrupt column value: {}", e)))
}

/// Maps a unique-constraint violation to `Conflict`, everything else to `Unexpected`.
fn conflict_on_duplicate(message: String) -> impl FnOnce(sqlx::Error) -> PortError {
    move |e| match e.as_database_error() {
        Some(db_error) if db_error.is_unique_violation() => PortError::Conflict(message),
        _ => PortError::Unexpected(e.to_string()),
    }
}

fn to_count(value: i32) -> usize {
    usize::try_from(value).unwrap_or_default()
}

fn to_i32(value: usize) -> PortResult<i32> {
    i32::try_from(value).map_err(|_| PortError::Unexpected(format!("{} does not fit a column", value)))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: Option<String>,
    name: Option<String>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: self.email,
            name: self.name,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: Option<String>,
}

#[derive(FromRow)]
struct SubscriptionRecord {
    id: Uuid,
    purchaser_id: Uuid,
    author_id: Uuid,
    plan: String,
    status: String,
    region: String,
    frequency: String,
    preferred_day: i16,
    gift_message: Option<String>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    next_delivery_at: Option<DateTime<Utc>>,
    next_queue_position: i32,
    queue_length: i32,
    created_at: DateTime<Utc>,
}
impl SubscriptionRecord {
    fn to_domain(self) -> PortResult<Subscription> {
        Ok(Subscription {
            id: self.id,
            purchaser_id: self.purchaser_id,
            author_id: self.author_id,
            plan: tag(&self.plan)?,
            status: tag(&self.status)?,
            region: tag(&self.region)?,
            frequency: tag(&self.frequency)?,
            preferred_day: u8::try_from(self.preferred_day)
                .map_err(|_| PortError::Unexpected("corrupt preferred_day".to_string()))?,
            gift_message: self.gift_message,
            start_date: self.start_date,
            end_date: self.end_date,
            next_delivery_at: self.next_delivery_at,
            next_queue_position: to_count(self.next_queue_position),
            queue_length: to_count(self.queue_length),
            created_at: self.created_at,
        })
    }
}

const SUBSCRIPTION_COLUMNS: &str = "id, purchaser_id, author_id, plan, status, region, frequency, \
     preferred_day, gift_message, start_date, end_date, next_delivery_at, next_queue_position, \
     queue_length, created_at";

#[derive(FromRow)]
struct QueuedQuestionRecord {
    id: Uuid,
    subscription_id: Uuid,
    position: i32,
    text_de: String,
    text_en: String,
    category: String,
    region: String,
}
impl QueuedQuestionRecord {
    fn to_domain(self) -> PortResult<QueuedQuestion> {
        Ok(QueuedQuestion {
            id: self.id,
            subscription_id: self.subscription_id,
            position: to_count(self.position),
            question: Question {
                text_de: self.text_de,
                text_en: self.text_en,
                category: tag(&self.category)?,
                region: tag(&self.region)?,
            },
        })
    }
}

#[derive(FromRow)]
struct DeliveryRecord {
    id: Uuid,
    subscription_id: Uuid,
    question_id: Uuid,
    delivered_at: DateTime<Utc>,
    answered_at: Option<DateTime<Utc>>,
    skipped_at: Option<DateTime<Utc>>,
}
impl DeliveryRecord {
    fn to_domain(self) -> QuestionDelivery {
        QuestionDelivery {
            id: self.id,
            subscription_id: self.subscription_id,
            question_id: self.question_id,
            delivered_at: self.delivered_at,
            answered_at: self.answered_at,
            skipped_at: self.skipped_at,
        }
    }
}

#[derive(FromRow)]
struct CurrentQuestionRecord {
    question_id: Uuid,
    delivery_id: Uuid,
    text_de: String,
    category: String,
    delivered_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct DeliveryCountsRecord {
    total: i64,
    answered: i64,
}

#[derive(FromRow)]
struct StoryRecord {
    id: Uuid,
    author_id: Uuid,
    subscription_id: Uuid,
    delivery_id: Option<Uuid>,
    question_id: Option<Uuid>,
    title: Option<String>,
    content: String,
    status: String,
    input_mode: String,
    word_count: i32,
    audio_url: Option<String>,
    photo_count: i32,
    transcription_confidence: Option<f32>,
    transcribed_at: Option<DateTime<Utc>>,
    submitted_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl StoryRecord {
    fn to_domain(self) -> PortResult<Story> {
        Ok(Story {
            id: self.id,
            author_id: self.author_id,
            subscription_id: self.subscription_id,
            delivery_id: self.delivery_id,
            question_id: self.question_id,
            title: self.title,
            content: self.content,
            status: tag(&self.status)?,
            input_mode: tag(&self.input_mode)?,
            word_count: to_count(self.word_count),
            audio_url: self.audio_url,
            photo_count: to_count(self.photo_count),
            transcription_confidence: self.transcription_confidence,
            transcribed_at: self.transcribed_at,
            submitted_at: self.submitted_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const STORY_COLUMNS: &str = "id, author_id, subscription_id, delivery_id, question_id, title, \
     content, status, input_mode, word_count, audio_url, photo_count, transcription_confidence, \
     transcribed_at, submitted_at, created_at, updated_at";

#[derive(FromRow)]
struct RecentStoryRecord {
    id: Uuid,
    title: Option<String>,
    question_text: Option<String>,
    created_at: DateTime<Utc>,
    word_count: i32,
    audio_url: Option<String>,
    photo_count: i32,
    status: String,
}
impl RecentStoryRecord {
    fn to_domain(self) -> PortResult<RecentStory> {
        Ok(RecentStory {
            id: self.id,
            title: self.title,
            question_text: self
                .question_text
                .unwrap_or_else(|| FREE_STORY_LABEL.to_string()),
            created_at: self.created_at,
            word_count: to_count(self.word_count),
            has_audio: self.audio_url.is_some(),
            has_photos: self.photo_count > 0,
            status: tag(&self.status)?,
        })
    }
}

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

impl DbAdapter {
    /// Sets a terminal timestamp on a pending delivery, telling "missing" from "already terminal".
    async fn close_delivery(&self, column: &str, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        let sql = format!(
            "UPDATE question_deliveries SET {} = $2 \
             WHERE id = $1 AND answered_at IS NULL AND skipped_at IS NULL",
            column
        );
        let result = sqlx::query(&sql)
            .bind(delivery_id)
            .bind(at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            let delivery = self.get_delivery(delivery_id).await?;
            return Err(PortError::Conflict(format!(
                "Delivery {} is already {}",
                delivery_id,
                delivery.status().as_str()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        // Password-less gift recipients are only taken over through `claim_user_account`.
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO NOTHING \
             RETURNING user_id, email, name",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::Conflict(format!("Email {} is already registered", email)))?;

        info!("Registered user {}", record.user_id);
        Ok(record.to_domain())
    }

    async fn get_or_create_user_by_email(&self, email: &str, name: Option<&str>) -> PortResult<User> {
        sqlx::query(
            "INSERT INTO users (user_id, email, name) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(name)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;

        let record = sqlx::query_as::<_, UserRecord>(
            "SELECT user_id, email, name FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("User", email))?;
        Ok(record.to_domain())
    }

    async fn issue_claim_token(&self, user_id: Uuid, claim_token: &str) -> PortResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET claim_token = $2 WHERE user_id = $1 AND hashed_password IS NULL",
        )
        .bind(user_id)
        .bind(claim_token)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(result.rows_affected() > 0)
    }

    async fn claim_user_account(
        &self,
        email: &str,
        claim_token: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "UPDATE users SET hashed_password = $3, claim_token = NULL \
             WHERE email = $1 AND claim_token = $2 AND hashed_password IS NULL \
             RETURNING user_id, email, name",
        )
        .bind(email)
        .bind(claim_token)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or(PortError::Unauthorized)?;

        info!("Recipient {} claimed their account", record.user_id);
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("User", email))?;

        Ok(UserCredentials {
            user_id: record.user_id,
            email: record.email,
            hashed_password: record.hashed_password,
        })
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;
        Ok(())
    }

    async fn create_subscription(
        &self,
        subscription: NewSubscription,
        queue: &[Question],
    ) -> PortResult<Subscription> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        let sql = format!(
            "INSERT INTO subscriptions (id, purchaser_id, author_id, plan, status, region, \
             frequency, preferred_day, gift_message, start_date, end_date, queue_length) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) RETURNING {}",
            SUBSCRIPTION_COLUMNS
        );
        let record = sqlx::query_as::<_, SubscriptionRecord>(&sql)
            .bind(Uuid::new_v4())
            .bind(subscription.purchaser_id)
            .bind(subscription.author_id)
            .bind(subscription.plan.as_str())
            .bind(subscription.status.as_str())
            .bind(subscription.region.as_str())
            .bind(subscription.frequency.as_str())
            .bind(i16::from(subscription.preferred_day))
            .bind(subscription.gift_message)
            .bind(subscription.start_date)
            .bind(subscription.end_date)
            .bind(to_i32(queue.len())?)
            .fetch_one(&mut *tx)
            .await
            .map_err(unexpected)?;

        for (position, question) in queue.iter().enumerate() {
            sqlx::query(
                "INSERT INTO subscription_questions \
                 (id, subscription_id, position, text_de, text_en, category, region) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7)",
            )
            .bind(Uuid::new_v4())
            .bind(record.id)
            .bind(to_i32(position)?)
            .bind(&question.text_de)
            .bind(&question.text_en)
            .bind(question.category.as_str())
            .bind(question.region.as_str())
            .execute(&mut *tx)
            .await
            .map_err(unexpected)?;
        }

        tx.commit().await.map_err(unexpected)?;
        info!(
            "Created subscription {} with {} queued questions",
            record.id,
            queue.len()
        );
        record.to_domain()
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> PortResult<Subscription> {
        let sql = format!("SELECT {} FROM subscriptions WHERE id = $1", SUBSCRIPTION_COLUMNS);
        sqlx::query_as::<_, SubscriptionRecord>(&sql)
            .bind(subscription_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Subscription", subscription_id))?
            .to_domain()
    }

    async fn get_active_subscription_for_author(
        &self,
        author_id: Uuid,
    ) -> PortResult<Option<Subscription>> {
        let sql = format!(
            "SELECT {} FROM subscriptions WHERE author_id = $1 AND status = $2 \
             ORDER BY created_at DESC LIMIT 1",
            SUBSCRIPTION_COLUMNS
        );
        sqlx::query_as::<_, SubscriptionRecord>(&sql)
            .bind(author_id)
            .bind(SubscriptionStatus::Active.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?
            .map(SubscriptionRecord::to_domain)
            .transpose()
    }

    async fn update_subscription_schedule(
        &self,
        subscription_id: Uuid,
        next_queue_position: usize,
        next_delivery_at: Option<DateTime<Utc>>,
        status: SubscriptionStatus,
    ) -> PortResult<()> {
        sqlx::query(
            "UPDATE subscriptions SET next_queue_position = $2, next_delivery_at = $3, status = $4 \
             WHERE id = $1",
        )
        .bind(subscription_id)
        .bind(to_i32(next_queue_position)?)
        .bind(next_delivery_at)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_queued_question(
        &self,
        subscription_id: Uuid,
        position: usize,
    ) -> PortResult<Option<QueuedQuestion>> {
        sqlx::query_as::<_, QueuedQuestionRecord>(
            "SELECT id, subscription_id, position, text_de, text_en, category, region \
             FROM subscription_questions WHERE subscription_id = $1 AND position = $2",
        )
        .bind(subscription_id)
        .bind(to_i32(position)?)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .map(QueuedQuestionRecord::to_domain)
        .transpose()
    }

    async fn record_delivery(
        &self,
        subscription_id: Uuid,
        from_position: usize,
        question_id: Uuid,
        delivered_at: DateTime<Utc>,
        next_delivery_at: DateTime<Utc>,
    ) -> PortResult<QuestionDelivery> {
        let mut tx = self.pool.begin().await.map_err(unexpected)?;

        // Compare-and-set on the queue position; a concurrent tick that got here first wins.
        let advanced = sqlx::query(
            "UPDATE subscriptions SET next_queue_position = $3, next_delivery_at = $4, status = $5 \
             WHERE id = $1 AND next_queue_position = $2",
        )
        .bind(subscription_id)
        .bind(to_i32(from_position)?)
        .bind(to_i32(from_position + 1)?)
        .bind(next_delivery_at)
        .bind(SubscriptionStatus::Active.as_str())
        .execute(&mut *tx)
        .await
        .map_err(unexpected)?;
        if advanced.rows_affected() == 0 {
            return Err(PortError::Conflict(format!(
                "Subscription {} already moved past position {}",
                subscription_id, from_position
            )));
        }

        let record = sqlx::query_as::<_, DeliveryRecord>(
            "INSERT INTO question_deliveries (id, subscription_id, question_id, delivered_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, subscription_id, question_id, delivered_at, answered_at, skipped_at",
        )
        .bind(Uuid::new_v4())
        .bind(subscription_id)
        .bind(question_id)
        .bind(delivered_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(conflict_on_duplicate(format!(
            "Question {} was already delivered",
            question_id
        )))?;

        tx.commit().await.map_err(unexpected)?;
        Ok(record.to_domain())
    }

    async fn get_delivery(&self, delivery_id: Uuid) -> PortResult<QuestionDelivery> {
        let record = sqlx::query_as::<_, DeliveryRecord>(
            "SELECT id, subscription_id, question_id, delivered_at, answered_at, skipped_at \
             FROM question_deliveries WHERE id = $1",
        )
        .bind(delivery_id)
        .fetch_one(&self.pool)
        .await
        .map_err(not_found("Delivery", delivery_id))?;
        Ok(record.to_domain())
    }

    async fn mark_delivery_answered(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        self.close_delivery("answered_at", delivery_id, at).await
    }

    async fn mark_delivery_skipped(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        self.close_delivery("skipped_at", delivery_id, at).await
    }

    async fn get_current_question(&self, subscription_id: Uuid) -> PortResult<Option<CurrentQuestion>> {
        let record = sqlx::query_as::<_, CurrentQuestionRecord>(
            "SELECT q.id AS question_id, d.id AS delivery_id, q.text_de, q.category, d.delivered_at \
             FROM question_deliveries d \
             JOIN subscription_questions q ON q.id = d.question_id \
             WHERE d.subscription_id = $1 AND d.answered_at IS NULL AND d.skipped_at IS NULL \
             ORDER BY d.delivered_at ASC LIMIT 1",
        )
        .bind(subscription_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?;

        record
            .map(|r| {
                Ok(CurrentQuestion {
                    question_id: r.question_id,
                    delivery_id: r.delivery_id,
                    text_de: r.text_de,
                    category: tag(&r.category)?,
                    delivered_at: r.delivered_at,
                })
            })
            .transpose()
    }

    async fn count_deliveries(&self, subscription_id: Uuid) -> PortResult<DeliveryCounts> {
        let record = sqlx::query_as::<_, DeliveryCountsRecord>(
            "SELECT COUNT(*) AS total, COUNT(answered_at) AS answered \
             FROM question_deliveries WHERE subscription_id = $1",
        )
        .bind(subscription_id)
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?;

        Ok(DeliveryCounts {
            answered: u64::try_from(record.answered).unwrap_or_default(),
            total: u64::try_from(record.total).unwrap_or_default(),
        })
    }

    async fn save_story(&self, story: &Story) -> PortResult<()> {
        sqlx::query(
            "INSERT INTO stories (id, author_id, subscription_id, delivery_id, question_id, title, \
             content, status, input_mode, word_count, audio_url, photo_count, \
             transcription_confidence, transcribed_at, submitted_at, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
             ON CONFLICT (id) DO UPDATE SET \
             delivery_id = EXCLUDED.delivery_id, question_id = EXCLUDED.question_id, \
             title = EXCLUDED.title, content = EXCLUDED.content, status = EXCLUDED.status, \
             input_mode = EXCLUDED.input_mode, word_count = EXCLUDED.word_count, \
             audio_url = EXCLUDED.audio_url, photo_count = EXCLUDED.photo_count, \
             transcription_confidence = EXCLUDED.transcription_confidence, \
             transcribed_at = EXCLUDED.transcribed_at, submitted_at = EXCLUDED.submitted_at, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(story.id)
        .bind(story.author_id)
        .bind(story.subscription_id)
        .bind(story.delivery_id)
        .bind(story.question_id)
        .bind(&story.title)
        .bind(&story.content)
        .bind(story.status.as_str())
        .bind(story.input_mode.as_str())
        .bind(to_i32(story.word_count)?)
        .bind(&story.audio_url)
        .bind(to_i32(story.photo_count)?)
        .bind(story.transcription_confidence)
        .bind(story.transcribed_at)
        .bind(story.submitted_at)
        .bind(story.created_at)
        .bind(story.updated_at)
        .execute(&self.pool)
        .await
        .map_err(unexpected)?;
        Ok(())
    }

    async fn get_story(&self, story_id: Uuid) -> PortResult<Story> {
        let sql = format!("SELECT {} FROM stories WHERE id = $1", STORY_COLUMNS);
        sqlx::query_as::<_, StoryRecord>(&sql)
            .bind(story_id)
            .fetch_one(&self.pool)
            .await
            .map_err(not_found("Story", story_id))?
            .to_domain()
    }

    async fn list_stories_for_author(&self, author_id: Uuid) -> PortResult<Vec<Story>> {
        let sql = format!(
            "SELECT {} FROM stories WHERE author_id = $1 ORDER BY created_at DESC",
            STORY_COLUMNS
        );
        sqlx::query_as::<_, StoryRecord>(&sql)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?
            .into_iter()
            .map(StoryRecord::to_domain)
            .collect()
    }

    async fn get_recent_stories(
        &self,
        author_id: Uuid,
        subscription_id: Uuid,
        limit: usize,
    ) -> PortResult<Vec<RecentStory>> {
        sqlx::query_as::<_, RecentStoryRecord>(
            "SELECT s.id, s.title, q.text_de AS question_text, s.created_at, s.word_count, \
             s.audio_url, s.photo_count, s.status \
             FROM stories s \
             LEFT JOIN subscription_questions q ON q.id = s.question_id \
             WHERE s.author_id = $1 AND s.subscription_id = $2 \
             ORDER BY s.created_at DESC LIMIT $3",
        )
        .bind(author_id)
        .bind(subscription_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?
        .into_iter()
        .map(RecentStoryRecord::to_domain)
        .collect()
    }
}
