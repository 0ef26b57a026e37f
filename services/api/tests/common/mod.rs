//! In-memory port implementations and request helpers for the API integration tests.

#![allow(dead_code)]

use api_lib::config::Config;
use api_lib::web::{self, state::AppState};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, FixedOffset, Utc};
use foreverstory_core::domain::{
    NewSubscription, Question, QuestionDelivery, QueuedQuestion, Story, Subscription,
    SubscriptionStatus, User, UserCredentials,
};
use foreverstory_core::ports::{
    DatabaseService, DeliveryCounts, PortError, PortResult, Transcription, TranscriptionService,
};
use foreverstory_core::progress::{CurrentQuestion, RecentStory, FREE_STORY_LABEL};
use foreverstory_core::QuestionBank;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;
use uuid::Uuid;

//=========================================================================================
// In-memory DatabaseService
//=========================================================================================

struct StoredUser {
    user: User,
    hashed_password: Option<String>,
    claim_token: Option<String>,
}

#[derive(Default)]
struct Tables {
    users: Vec<StoredUser>,
    sessions: HashMap<String, (Uuid, DateTime<Utc>)>,
    subscriptions: Vec<Subscription>,
    queue: Vec<QueuedQuestion>,
    deliveries: Vec<QuestionDelivery>,
    stories: Vec<Story>,
}

#[derive(Default)]
pub struct InMemoryDb {
    tables: Mutex<Tables>,
    session_store_down: AtomicBool,
}

impl InMemoryDb {
    fn tables(&self) -> std::sync::MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    fn user_by_email(tables: &Tables, email: &str) -> Option<usize> {
        tables
            .users
            .iter()
            .position(|u| u.user.email.as_deref() == Some(email))
    }

    /// Makes every session lookup fail as if the database were unreachable.
    pub fn set_session_store_down(&self, down: bool) {
        self.session_store_down.store(down, Ordering::SeqCst);
    }

    /// Moves the subscription's next delivery into the past so the next tick is due.
    pub fn make_due(&self, subscription_id: Uuid) {
        let mut tables = self.tables();
        let subscription = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .unwrap();
        subscription.next_delivery_at = Some(Utc::now() - chrono::Duration::minutes(1));
    }

    fn close_delivery(
        &self,
        delivery_id: Uuid,
        close: impl FnOnce(&mut QuestionDelivery),
    ) -> PortResult<()> {
        let mut tables = self.tables();
        let delivery = tables
            .deliveries
            .iter_mut()
            .find(|d| d.id == delivery_id)
            .ok_or_else(|| PortError::NotFound(format!("Delivery {}", delivery_id)))?;
        if !delivery.is_pending() {
            return Err(PortError::Conflict(format!("Delivery {} is closed", delivery_id)));
        }
        close(delivery);
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_user_with_email(&self, email: &str, hashed_password: &str) -> PortResult<User> {
        let mut tables = self.tables();
        if Self::user_by_email(&tables, email).is_some() {
            return Err(PortError::Conflict(email.to_string()));
        }
        let user = User {
            user_id: Uuid::new_v4(),
            email: Some(email.to_string()),
            name: None,
        };
        tables.users.push(StoredUser {
            user: user.clone(),
            hashed_password: Some(hashed_password.to_string()),
            claim_token: None,
        });
        Ok(user)
    }

    async fn get_or_create_user_by_email(&self, email: &str, name: Option<&str>) -> PortResult<User> {
        let mut tables = self.tables();
        if let Some(index) = Self::user_by_email(&tables, email) {
            return Ok(tables.users[index].user.clone());
        }
        let user = User {
            user_id: Uuid::new_v4(),
            email: Some(email.to_string()),
            name: name.map(str::to_string),
        };
        tables.users.push(StoredUser {
            user: user.clone(),
            hashed_password: None,
            claim_token: None,
        });
        Ok(user)
    }

    async fn issue_claim_token(&self, user_id: Uuid, claim_token: &str) -> PortResult<bool> {
        let mut tables = self.tables();
        match tables
            .users
            .iter_mut()
            .find(|u| u.user.user_id == user_id && u.hashed_password.is_none())
        {
            Some(stored) => {
                stored.claim_token = Some(claim_token.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn claim_user_account(
        &self,
        email: &str,
        claim_token: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut tables = self.tables();
        let stored = tables
            .users
            .iter_mut()
            .find(|u| {
                u.user.email.as_deref() == Some(email)
                    && u.hashed_password.is_none()
                    && u.claim_token.as_deref() == Some(claim_token)
            })
            .ok_or(PortError::Unauthorized)?;
        stored.hashed_password = Some(hashed_password.to_string());
        stored.claim_token = None;
        Ok(stored.user.clone())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.tables()
            .users
            .iter()
            .find(|u| u.user.email.as_deref() == Some(email))
            .map(|u| UserCredentials {
                user_id: u.user.user_id,
                email: email.to_string(),
                hashed_password: u.hashed_password.clone(),
            })
            .ok_or_else(|| PortError::NotFound(email.to_string()))
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.tables()
            .sessions
            .insert(session_id.to_string(), (user_id, expires_at));
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        if self.session_store_down.load(Ordering::SeqCst) {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        match self.tables().sessions.get(session_id) {
            Some((user_id, expires_at)) if *expires_at > Utc::now() => Ok(*user_id),
            _ => Err(PortError::Unauthorized),
        }
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables().sessions.remove(session_id);
        Ok(())
    }

    async fn create_subscription(
        &self,
        subscription: NewSubscription,
        queue: &[Question],
    ) -> PortResult<Subscription> {
        let mut tables = self.tables();
        let created = Subscription {
            id: Uuid::new_v4(),
            purchaser_id: subscription.purchaser_id,
            author_id: subscription.author_id,
            plan: subscription.plan,
            status: subscription.status,
            region: subscription.region,
            frequency: subscription.frequency,
            preferred_day: subscription.preferred_day,
            gift_message: subscription.gift_message,
            start_date: Some(subscription.start_date),
            end_date: Some(subscription.end_date),
            next_delivery_at: None,
            next_queue_position: 0,
            queue_length: queue.len(),
            created_at: Utc::now(),
        };
        for (position, question) in queue.iter().enumerate() {
            tables.queue.push(QueuedQuestion {
                id: Uuid::new_v4(),
                subscription_id: created.id,
                position,
                question: question.clone(),
            });
        }
        tables.subscriptions.push(created.clone());
        Ok(created)
    }

    async fn get_subscription(&self, subscription_id: Uuid) -> PortResult<Subscription> {
        self.tables()
            .subscriptions
            .iter()
            .find(|s| s.id == subscription_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(subscription_id.to_string()))
    }

    async fn get_active_subscription_for_author(
        &self,
        author_id: Uuid,
    ) -> PortResult<Option<Subscription>> {
        Ok(self
            .tables()
            .subscriptions
            .iter()
            .rev()
            .find(|s| s.author_id == author_id && s.status == SubscriptionStatus::Active)
            .cloned())
    }

    async fn update_subscription_schedule(
        &self,
        subscription_id: Uuid,
        next_queue_position: usize,
        next_delivery_at: Option<DateTime<Utc>>,
        status: SubscriptionStatus,
    ) -> PortResult<()> {
        let mut tables = self.tables();
        let subscription = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| PortError::NotFound(subscription_id.to_string()))?;
        subscription.next_queue_position = next_queue_position;
        subscription.next_delivery_at = next_delivery_at;
        subscription.status = status;
        Ok(())
    }

    async fn get_queued_question(
        &self,
        subscription_id: Uuid,
        position: usize,
    ) -> PortResult<Option<QueuedQuestion>> {
        // Lets concurrent ticks interleave between reading the queue and recording a delivery.
        tokio::task::yield_now().await;
        Ok(self
            .tables()
            .queue
            .iter()
            .find(|q| q.subscription_id == subscription_id && q.position == position)
            .cloned())
    }

    async fn record_delivery(
        &self,
        subscription_id: Uuid,
        from_position: usize,
        question_id: Uuid,
        delivered_at: DateTime<Utc>,
        next_delivery_at: DateTime<Utc>,
    ) -> PortResult<QuestionDelivery> {
        let mut tables = self.tables();
        if tables.deliveries.iter().any(|d| d.question_id == question_id) {
            return Err(PortError::Conflict(format!("Question {} delivered", question_id)));
        }
        let subscription = tables
            .subscriptions
            .iter_mut()
            .find(|s| s.id == subscription_id)
            .ok_or_else(|| PortError::NotFound(subscription_id.to_string()))?;
        if subscription.next_queue_position != from_position {
            return Err(PortError::Conflict(format!(
                "Subscription {} moved past {}",
                subscription_id, from_position
            )));
        }
        subscription.next_queue_position = from_position + 1;
        subscription.next_delivery_at = Some(next_delivery_at);
        subscription.status = SubscriptionStatus::Active;

        let delivery = QuestionDelivery {
            id: Uuid::new_v4(),
            subscription_id,
            question_id,
            delivered_at,
            answered_at: None,
            skipped_at: None,
        };
        tables.deliveries.push(delivery.clone());
        Ok(delivery)
    }

    async fn get_delivery(&self, delivery_id: Uuid) -> PortResult<QuestionDelivery> {
        self.tables()
            .deliveries
            .iter()
            .find(|d| d.id == delivery_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(delivery_id.to_string()))
    }

    async fn mark_delivery_answered(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        self.close_delivery(delivery_id, |d| d.answered_at = Some(at))
    }

    async fn mark_delivery_skipped(&self, delivery_id: Uuid, at: DateTime<Utc>) -> PortResult<()> {
        self.close_delivery(delivery_id, |d| d.skipped_at = Some(at))
    }

    async fn get_current_question(&self, subscription_id: Uuid) -> PortResult<Option<CurrentQuestion>> {
        let tables = self.tables();
        let Some(delivery) = tables
            .deliveries
            .iter()
            .filter(|d| d.subscription_id == subscription_id && d.is_pending())
            .min_by_key(|d| d.delivered_at)
        else {
            return Ok(None);
        };
        let queued = tables
            .queue
            .iter()
            .find(|q| q.id == delivery.question_id)
            .ok_or_else(|| PortError::Unexpected("dangling delivery".to_string()))?;
        Ok(Some(CurrentQuestion {
            question_id: queued.id,
            delivery_id: delivery.id,
            text_de: queued.question.text_de.clone(),
            category: queued.question.category,
            delivered_at: delivery.delivered_at,
        }))
    }

    async fn count_deliveries(&self, subscription_id: Uuid) -> PortResult<DeliveryCounts> {
        let tables = self.tables();
        let deliveries: Vec<_> = tables
            .deliveries
            .iter()
            .filter(|d| d.subscription_id == subscription_id)
            .collect();
        Ok(DeliveryCounts {
            answered: deliveries.iter().filter(|d| d.answered_at.is_some()).count() as u64,
            total: deliveries.len() as u64,
        })
    }

    async fn save_story(&self, story: &Story) -> PortResult<()> {
        let mut tables = self.tables();
        match tables.stories.iter_mut().find(|s| s.id == story.id) {
            Some(existing) => *existing = story.clone(),
            None => tables.stories.push(story.clone()),
        }
        Ok(())
    }

    async fn get_story(&self, story_id: Uuid) -> PortResult<Story> {
        self.tables()
            .stories
            .iter()
            .find(|s| s.id == story_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(story_id.to_string()))
    }

    async fn list_stories_for_author(&self, author_id: Uuid) -> PortResult<Vec<Story>> {
        let mut stories: Vec<Story> = self
            .tables()
            .stories
            .iter()
            .filter(|s| s.author_id == author_id)
            .cloned()
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories)
    }

    async fn get_recent_stories(
        &self,
        author_id: Uuid,
        subscription_id: Uuid,
        limit: usize,
    ) -> PortResult<Vec<RecentStory>> {
        let tables = self.tables();
        let mut stories: Vec<&Story> = tables
            .stories
            .iter()
            .filter(|s| s.author_id == author_id && s.subscription_id == subscription_id)
            .collect();
        stories.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(stories
            .into_iter()
            .take(limit)
            .map(|s| RecentStory {
                id: s.id,
                title: s.title.clone(),
                question_text: s
                    .question_id
                    .and_then(|qid| tables.queue.iter().find(|q| q.id == qid))
                    .map(|q| q.question.text_de.clone())
                    .unwrap_or_else(|| FREE_STORY_LABEL.to_string()),
                created_at: s.created_at,
                word_count: s.word_count,
                has_audio: s.audio_url.is_some(),
                has_photos: s.photo_count > 0,
                status: s.status,
            })
            .collect())
    }
}

//=========================================================================================
// Fake TranscriptionService
//=========================================================================================

/// Returns a fixed text, or fails when constructed with `failing()`.
pub struct FakeTranscriber {
    text: Option<String>,
}

impl FakeTranscriber {
    pub fn returning(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
        }
    }

    pub fn failing() -> Self {
        Self { text: None }
    }
}

#[async_trait]
impl TranscriptionService for FakeTranscriber {
    async fn transcribe_audio(&self, _file_name: &str, _audio_data: Vec<u8>) -> PortResult<Transcription> {
        match &self.text {
            Some(text) => Ok(Transcription {
                text: text.clone(),
                language: Some("de".to_string()),
                confidence: Some(0.9),
            }),
            None => Err(PortError::Unexpected("backend unavailable".to_string())),
        }
    }
}

//=========================================================================================
// Test Application
//=========================================================================================

pub struct TestApp {
    pub router: Router,
    pub db: Arc<InMemoryDb>,
}

pub fn test_config() -> Config {
    Config {
        bind_address: "127.0.0.1:0".parse().unwrap(),
        database_url: "postgres://unused".to_string(),
        log_level: tracing::Level::INFO,
        openai_api_key: None,
        transcription_model: "whisper-1".to_string(),
        delivery_offset: FixedOffset::east_opt(3600).unwrap(),
        cors_origin: "http://localhost:3000".to_string(),
        session_ttl_days: 30,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_transcriber(FakeTranscriber::returning("Wir wohnten damals in Leipzig."))
    }

    pub fn with_transcriber(transcriber: FakeTranscriber) -> Self {
        let db = Arc::new(InMemoryDb::default());
        let state = Arc::new(AppState {
            db: db.clone(),
            config: Arc::new(test_config()),
            transcriber: Arc::new(transcriber),
            question_bank: Arc::new(QuestionBank::german_default()),
        });
        Self {
            router: web::router(state),
            db,
        }
    }

    /// Sends a request and returns the status with the JSON body (`Null` when empty).
    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, cookie: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Signs up and returns the `session=...` cookie pair.
    pub async fn signup(&self, email: &str) -> String {
        self.signup_with(email, None).await
    }

    /// Signs up, claiming a gift recipient's account when a token is given.
    pub async fn signup_with(&self, email: &str, claim_token: Option<&str>) -> String {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/signup")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({
                    "email": email,
                    "password": "Geheim123",
                    "claim_token": claim_token,
                })
                .to_string(),
            ))
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }
}
