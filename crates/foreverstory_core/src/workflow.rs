//! crates/foreverstory_core/src/workflow.rs
//!
//! Use cases that combine the pure core with the ports: opening a subscription,
//! pushing due questions, skipping, saving stories, transcribing and loading the dashboard.

use chrono::{DateTime, FixedOffset, Months, Utc};
use uuid::Uuid;

use crate::domain::{
    InputMode, NewSubscription, QuestionDelivery, Story, StoryStatus, Subscription,
    SubscriptionStatus,
};
use crate::ports::{DatabaseService, PortError, Transcription, TranscriptionService};
use crate::progress::{Dashboard, DashboardSubscription, Progress};
use crate::questions::{QuestionBank, QueueRequest};
use crate::schedule::next_delivery_at;
use crate::validation::{count_words, GiftPurchase, StoryDraft, ValidationError};

/// Number of stories listed on the dashboard.
pub const RECENT_STORY_LIMIT: usize = 5;

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Port(#[from] PortError),
    /// The caller is authenticated but does not own the resource.
    #[error("Forbidden")]
    Forbidden,
    /// The speech-to-text backend failed; the story is left unchanged.
    #[error("Transcription failed: {0}")]
    Transcription(String),
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// A freshly opened subscription and the question delivered right away.
#[derive(Debug, Clone)]
pub struct OpenedSubscription {
    pub subscription: Subscription,
    pub first_delivery: QuestionDelivery,
    /// One-time token the recipient needs to set a password on their account.
    /// `None` when the recipient already has a password.
    pub claim_token: Option<String>,
}

/// Validates a gift purchase, builds the question queue for the plan, stores the
/// subscription as active and delivers the first question immediately.
pub async fn open_subscription(
    db: &dyn DatabaseService,
    bank: &QuestionBank,
    purchaser_id: Uuid,
    gift: GiftPurchase,
    now: DateTime<Utc>,
    local_offset: FixedOffset,
) -> WorkflowResult<OpenedSubscription> {
    gift.validate()?;

    let request = QueueRequest::new(gift.plan.question_count(), gift.region)
        .with_custom_questions(gift.custom_questions.clone())
        .excluding(gift.exclude_categories.iter().copied());
    let queue = bank.build_queue(&request)?;
    if queue.is_empty() {
        return Err(ValidationError::EmptyQueue.into());
    }

    let end_date = now
        .checked_add_months(Months::new(gift.plan.duration_months()))
        .ok_or(ValidationError::DateOutOfRange)?;

    let author = db
        .get_or_create_user_by_email(
            &gift.recipient_email.trim().to_lowercase(),
            Some(gift.recipient_name.trim()),
        )
        .await?;
    let token = Uuid::new_v4().simple().to_string();
    let claim_token = db
        .issue_claim_token(author.user_id, &token)
        .await?
        .then_some(token);

    let subscription = db
        .create_subscription(
            NewSubscription {
                purchaser_id,
                author_id: author.user_id,
                plan: gift.plan,
                status: SubscriptionStatus::Active,
                region: gift.region,
                frequency: gift.frequency,
                preferred_day: gift.preferred_day,
                gift_message: gift.gift_message,
                start_date: now,
                end_date,
            },
            &queue,
        )
        .await?;

    let first_delivery = deliver_next(db, &subscription, now, local_offset)
        .await?
        .ok_or_else(|| PortError::Unexpected("new subscription has an empty queue".to_string()))?;

    let subscription = db.get_subscription(subscription.id).await?;
    Ok(OpenedSubscription {
        subscription,
        first_delivery,
        claim_token,
    })
}

/// Delivers the next queued question if the subscription is active and due.
///
/// Returns `None` when nothing was delivered, including when a concurrent tick already
/// delivered the question. A subscription whose queue is used up is marked completed.
pub async fn deliver_due_question(
    db: &dyn DatabaseService,
    subscription_id: Uuid,
    caller_id: Uuid,
    now: DateTime<Utc>,
    local_offset: FixedOffset,
) -> WorkflowResult<Option<QuestionDelivery>> {
    let subscription = db.get_subscription(subscription_id).await?;
    if !subscription.is_participant(caller_id) {
        return Err(WorkflowError::Forbidden);
    }
    if subscription.status != SubscriptionStatus::Active {
        return Ok(None);
    }
    if matches!(subscription.next_delivery_at, Some(due) if due > now) {
        return Ok(None);
    }
    match deliver_next(db, &subscription, now, local_offset).await {
        Err(WorkflowError::Port(PortError::Conflict(_))) => Ok(None),
        other => other,
    }
}

async fn deliver_next(
    db: &dyn DatabaseService,
    subscription: &Subscription,
    now: DateTime<Utc>,
    local_offset: FixedOffset,
) -> WorkflowResult<Option<QuestionDelivery>> {
    let position = subscription.next_queue_position;
    let Some(queued) = db.get_queued_question(subscription.id, position).await? else {
        db.update_subscription_schedule(subscription.id, position, None, SubscriptionStatus::Completed)
            .await?;
        return Ok(None);
    };

    // Schedule from the planned slot rather than the actual tick so the cadence does not drift.
    let base = subscription.next_delivery_at.unwrap_or(now);
    let next = next_delivery_at(
        base.with_timezone(&local_offset),
        subscription.frequency,
        subscription.preferred_day,
    )?;

    let delivery = db
        .record_delivery(
            subscription.id,
            position,
            queued.id,
            now,
            next.with_timezone(&Utc),
        )
        .await?;
    Ok(Some(delivery))
}

/// Loads a delivery and checks that `user_id` is the story author of its subscription.
async fn owned_delivery(
    db: &dyn DatabaseService,
    user_id: Uuid,
    delivery_id: Uuid,
) -> WorkflowResult<(QuestionDelivery, Subscription)> {
    let delivery = db.get_delivery(delivery_id).await?;
    let subscription = db.get_subscription(delivery.subscription_id).await?;
    if subscription.author_id != user_id {
        return Err(WorkflowError::Forbidden);
    }
    Ok((delivery, subscription))
}

pub async fn skip_delivery(
    db: &dyn DatabaseService,
    user_id: Uuid,
    delivery_id: Uuid,
    now: DateTime<Utc>,
) -> WorkflowResult<QuestionDelivery> {
    let (delivery, _) = owned_delivery(db, user_id, delivery_id).await?;
    if !delivery.is_pending() {
        return Err(PortError::Conflict(format!(
            "Delivery {} is already {}",
            delivery_id,
            delivery.status().as_str()
        ))
        .into());
    }
    db.mark_delivery_skipped(delivery_id, now).await?;
    Ok(db.get_delivery(delivery_id).await?)
}

/// Creates or updates a story. Submitting it marks the question it answers as answered.
pub async fn save_story(
    db: &dyn DatabaseService,
    user_id: Uuid,
    draft: StoryDraft,
    now: DateTime<Utc>,
) -> WorkflowResult<Story> {
    draft.validate()?;

    let mut story = match draft.story_id {
        Some(story_id) => {
            let story = db.get_story(story_id).await?;
            if story.author_id != user_id {
                return Err(WorkflowError::Forbidden);
            }
            story
        }
        None => {
            let subscription = db
                .get_active_subscription_for_author(user_id)
                .await?
                .ok_or_else(|| PortError::NotFound(format!("Active subscription for user {}", user_id)))?;
            Story {
                id: Uuid::new_v4(),
                author_id: user_id,
                subscription_id: subscription.id,
                delivery_id: None,
                question_id: None,
                title: None,
                content: String::new(),
                status: StoryStatus::Draft,
                input_mode: draft.input_mode,
                word_count: 0,
                audio_url: None,
                photo_count: 0,
                transcription_confidence: None,
                transcribed_at: None,
                submitted_at: None,
                created_at: now,
                updated_at: now,
            }
        }
    };

    let delivery = match draft.delivery_id.or(story.delivery_id) {
        Some(delivery_id) => {
            let (delivery, subscription) = owned_delivery(db, user_id, delivery_id).await?;
            if subscription.id != story.subscription_id {
                return Err(WorkflowError::Forbidden);
            }
            Some(delivery)
        }
        None => None,
    };

    story.delivery_id = delivery.as_ref().map(|d| d.id);
    story.question_id = delivery.as_ref().map(|d| d.question_id);
    story.title = draft.title;
    story.word_count = count_words(&draft.content);
    story.content = draft.content;
    story.status = draft.status;
    story.input_mode = draft.input_mode;
    if draft.status == StoryStatus::Submitted && story.submitted_at.is_none() {
        story.submitted_at = Some(now);
    }
    story.updated_at = now;

    db.save_story(&story).await?;

    if let Some(delivery) = delivery {
        if story.status == StoryStatus::Submitted && delivery.is_pending() {
            db.mark_delivery_answered(delivery.id, now).await?;
        }
    }

    Ok(story)
}

/// Transcribes uploaded audio and stores the text as the story's content.
pub async fn transcribe_story(
    db: &dyn DatabaseService,
    transcriber: &dyn TranscriptionService,
    user_id: Uuid,
    story_id: Uuid,
    file_name: &str,
    audio_data: Vec<u8>,
    now: DateTime<Utc>,
) -> WorkflowResult<Transcription> {
    let mut story = db.get_story(story_id).await?;
    if story.author_id != user_id {
        return Err(WorkflowError::Forbidden);
    }

    let transcription = transcriber
        .transcribe_audio(file_name, audio_data)
        .await
        .map_err(|e| WorkflowError::Transcription(e.to_string()))?;

    story.word_count = count_words(&transcription.text);
    story.content = transcription.text.clone();
    story.input_mode = InputMode::Voice;
    story.transcription_confidence = transcription.confidence;
    story.transcribed_at = Some(now);
    story.updated_at = now;
    db.save_story(&story).await?;

    Ok(transcription)
}

/// Everything the story author's dashboard shows.
pub async fn load_dashboard(
    db: &dyn DatabaseService,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> WorkflowResult<Dashboard> {
    let Some(subscription) = db.get_active_subscription_for_author(user_id).await? else {
        return Ok(Dashboard::empty());
    };

    let current_question = db.get_current_question(subscription.id).await?;
    let counts = db.count_deliveries(subscription.id).await?;
    let recent_stories = db
        .get_recent_stories(user_id, subscription.id, RECENT_STORY_LIMIT)
        .await?;

    Ok(Dashboard {
        subscription: Some(DashboardSubscription::from_subscription(&subscription, now)),
        current_question,
        progress: Progress::from_counts(counts.answered, counts.total),
        recent_stories,
    })
}
