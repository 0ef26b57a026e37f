//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.
//!
//! Enum-like fields travel as their upper-case tags (`"STANDARD"`, `"EAST_GERMANY"`),
//! except delivery frequencies which are `"weekly"` / `"biweekly"`.

use crate::error::{ApiError, ApiResult, ErrorBody, ErrorEnvelope};
use crate::web::auth::{AuthResponse, LoginRequest, SignupRequest};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use foreverstory_core::pricing::{monthly_price, pricing_config, format_euro, PlanOffer};
use foreverstory_core::progress::{CurrentQuestion, Dashboard, RecentStory};
use foreverstory_core::questions::Locale;
use foreverstory_core::validation::ValidationResult;
use foreverstory_core::workflow::{self, OpenedSubscription};
use foreverstory_core::{
    DeliveryFrequency, GiftPurchase, InputMode, QuestionCategory, QuestionDelivery, Region, Story,
    StoryDraft, StoryStatus, Subscription, SubscriptionPlan, ValidationError,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        get_pricing_handler,
        list_categories_handler,
        get_dashboard_handler,
        create_subscription_handler,
        deliver_next_handler,
        skip_delivery_handler,
        list_stories_handler,
        save_story_handler,
        transcribe_story_handler,
    ),
    components(
        schemas(
            SignupRequest, LoginRequest, AuthResponse, ErrorEnvelope, ErrorBody,
            PricingResponse, PlanOfferResponse, BookPriceResponse, ShippingResponse,
            CategoryResponse, DashboardResponse, DashboardSubscriptionResponse,
            CurrentQuestionResponse, ProgressResponse, RecentStoryResponse,
            CreateSubscriptionRequest, SubscriptionResponse, DeliveryResponse,
            NextDeliveryResponse, SaveStoryRequest, StoryResponse, TranscriptionResponse
        )
    ),
    tags(
        (name = "ForeverStory API", description = "Gift subscriptions, weekly questions and life stories.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PlanOfferResponse {
    pub plan: String,
    pub name: String,
    pub description: String,
    pub duration_months: u32,
    pub question_count: usize,
    pub price_cents: u64,
    /// Localized price, e.g. `89,00 €`.
    pub price_formatted: String,
    pub monthly_price_cents: u64,
    pub features: Vec<String>,
    pub book_format: Option<String>,
    pub includes_book: bool,
    pub popular: bool,
}

impl From<PlanOffer> for PlanOfferResponse {
    fn from(offer: PlanOffer) -> Self {
        Self {
            plan: offer.plan.as_str().to_string(),
            name: offer.name.to_string(),
            description: offer.description.to_string(),
            duration_months: offer.duration_months,
            question_count: offer.plan.question_count(),
            price_cents: offer.price_cents,
            price_formatted: format_euro(offer.price_cents),
            monthly_price_cents: monthly_price(offer.plan),
            features: offer.features.iter().map(|f| f.to_string()).collect(),
            book_format: offer.book_format.map(|f| f.as_str().to_string()),
            includes_book: offer.includes_book(),
            popular: offer.popular,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookPriceResponse {
    pub format: String,
    pub price_cents: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ShippingResponse {
    pub germany: u64,
    pub austria: u64,
    pub switzerland: u64,
    pub eu: u64,
    pub world: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PricingResponse {
    pub plans: Vec<PlanOfferResponse>,
    pub books: Vec<BookPriceResponse>,
    pub shipping: ShippingResponse,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CategoryResponse {
    pub category: String,
    pub label_de: String,
    pub label_en: String,
    pub description: String,
    pub sort_order: u8,
    pub region_specific: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DashboardSubscriptionResponse {
    pub id: Uuid,
    pub plan: String,
    pub status: String,
    pub days_remaining: Option<i64>,
    pub end_date: Option<DateTime<Utc>>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CurrentQuestionResponse {
    pub question_id: Uuid,
    pub delivery_id: Uuid,
    pub text: String,
    pub category: String,
    pub category_label: String,
    pub delivered_at: DateTime<Utc>,
}

impl From<CurrentQuestion> for CurrentQuestionResponse {
    fn from(question: CurrentQuestion) -> Self {
        Self {
            question_id: question.question_id,
            delivery_id: question.delivery_id,
            text: question.text_de,
            category: question.category.as_str().to_string(),
            category_label: question.category.label(Locale::De).to_string(),
            delivered_at: question.delivered_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub answered_count: u64,
    pub total_questions: u64,
    pub percent_complete: u64,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RecentStoryResponse {
    pub id: Uuid,
    pub title: Option<String>,
    pub question_text: String,
    pub created_at: DateTime<Utc>,
    pub word_count: usize,
    pub has_audio: bool,
    pub has_photos: bool,
    pub status: String,
}

impl From<RecentStory> for RecentStoryResponse {
    fn from(story: RecentStory) -> Self {
        Self {
            id: story.id,
            title: story.title,
            question_text: story.question_text,
            created_at: story.created_at,
            word_count: story.word_count,
            has_audio: story.has_audio,
            has_photos: story.has_photos,
            status: story.status.as_str().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub subscription: Option<DashboardSubscriptionResponse>,
    pub current_question: Option<CurrentQuestionResponse>,
    pub progress: ProgressResponse,
    pub recent_stories: Vec<RecentStoryResponse>,
}

impl From<Dashboard> for DashboardResponse {
    fn from(dashboard: Dashboard) -> Self {
        Self {
            subscription: dashboard.subscription.map(|s| DashboardSubscriptionResponse {
                id: s.id,
                plan: s.plan.as_str().to_string(),
                status: s.status.as_str().to_string(),
                days_remaining: s.days_remaining,
                end_date: s.end_date,
            }),
            current_question: dashboard.current_question.map(Into::into),
            progress: ProgressResponse {
                answered_count: dashboard.progress.answered_count,
                total_questions: dashboard.progress.total_questions,
                percent_complete: dashboard.progress.percent_complete,
            },
            recent_stories: dashboard.recent_stories.into_iter().map(Into::into).collect(),
        }
    }
}

/// A gift purchase for a family member, who becomes the story author.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateSubscriptionRequest {
    pub recipient_email: String,
    pub recipient_name: String,
    /// `STARTER`, `STANDARD` or `PREMIUM`.
    pub plan: String,
    pub gift_message: Option<String>,
    #[serde(default)]
    pub custom_questions: Vec<String>,
    /// `weekly` (default) or `biweekly`.
    pub frequency: Option<String>,
    /// 1 = Monday ... 7 = Sunday; defaults to Monday.
    #[serde(default = "default_preferred_day")]
    pub preferred_day: u8,
    /// Defaults to `ALL`.
    pub region: Option<String>,
    #[serde(default)]
    pub exclude_categories: Vec<String>,
}

fn default_preferred_day() -> u8 {
    1
}

impl CreateSubscriptionRequest {
    fn into_gift(self) -> ValidationResult<GiftPurchase> {
        let exclude_categories = self
            .exclude_categories
            .iter()
            .map(|c| c.parse::<QuestionCategory>())
            .collect::<ValidationResult<HashSet<_>>>()?;

        Ok(GiftPurchase {
            recipient_email: self.recipient_email,
            recipient_name: self.recipient_name,
            plan: self.plan.parse::<SubscriptionPlan>()?,
            gift_message: self.gift_message.filter(|m| !m.trim().is_empty()),
            custom_questions: self.custom_questions,
            frequency: match self.frequency {
                Some(frequency) => frequency.parse::<DeliveryFrequency>()?,
                None => DeliveryFrequency::default(),
            },
            preferred_day: self.preferred_day,
            region: match self.region {
                Some(region) => region.parse::<Region>()?,
                None => Region::All,
            },
            exclude_categories,
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DeliveryResponse {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub question_id: Uuid,
    /// `pending`, `answered` or `skipped`.
    pub status: String,
    pub delivered_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
    pub skipped_at: Option<DateTime<Utc>>,
}

impl From<QuestionDelivery> for DeliveryResponse {
    fn from(delivery: QuestionDelivery) -> Self {
        Self {
            id: delivery.id,
            subscription_id: delivery.subscription_id,
            question_id: delivery.question_id,
            status: delivery.status().as_str().to_string(),
            delivered_at: delivery.delivered_at,
            answered_at: delivery.answered_at,
            skipped_at: delivery.skipped_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub purchaser_id: Uuid,
    pub author_id: Uuid,
    pub plan: String,
    pub status: String,
    pub region: String,
    pub frequency: String,
    pub preferred_day: u8,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub next_delivery_at: Option<DateTime<Utc>>,
    pub queue_length: usize,
    pub first_delivery: Option<DeliveryResponse>,
    /// Forwarded to the recipient so they can set a password at signup.
    /// Absent when the recipient already has an account with a password.
    pub recipient_claim_token: Option<String>,
}

impl SubscriptionResponse {
    fn new(
        subscription: Subscription,
        first_delivery: Option<QuestionDelivery>,
        recipient_claim_token: Option<String>,
    ) -> Self {
        Self {
            id: subscription.id,
            purchaser_id: subscription.purchaser_id,
            author_id: subscription.author_id,
            plan: subscription.plan.as_str().to_string(),
            status: subscription.status.as_str().to_string(),
            region: subscription.region.as_str().to_string(),
            frequency: subscription.frequency.as_str().to_string(),
            preferred_day: subscription.preferred_day,
            start_date: subscription.start_date,
            end_date: subscription.end_date,
            next_delivery_at: subscription.next_delivery_at,
            queue_length: subscription.queue_length,
            first_delivery: first_delivery.map(Into::into),
            recipient_claim_token,
        }
    }
}

/// Result of a delivery tick; `delivery` is absent when nothing was due.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct NextDeliveryResponse {
    pub delivery: Option<DeliveryResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SaveStoryRequest {
    /// Absent to create a new story.
    pub story_id: Option<Uuid>,
    pub delivery_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    /// Defaults to `DRAFT`.
    pub status: Option<String>,
    /// Defaults to `TEXT`.
    pub input_mode: Option<String>,
}

impl SaveStoryRequest {
    fn into_draft(self) -> ValidationResult<StoryDraft> {
        Ok(StoryDraft {
            story_id: self.story_id,
            delivery_id: self.delivery_id,
            title: self.title.filter(|t| !t.trim().is_empty()),
            content: self.content,
            status: match self.status {
                Some(status) => status.parse::<StoryStatus>()?,
                None => StoryStatus::Draft,
            },
            input_mode: match self.input_mode {
                Some(mode) => mode.parse::<InputMode>()?,
                None => InputMode::Text,
            },
        })
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct StoryResponse {
    pub id: Uuid,
    pub subscription_id: Uuid,
    pub delivery_id: Option<Uuid>,
    pub question_id: Option<Uuid>,
    pub title: Option<String>,
    pub content: String,
    pub status: String,
    pub input_mode: String,
    pub word_count: usize,
    pub audio_url: Option<String>,
    pub photo_count: usize,
    pub transcription_confidence: Option<f32>,
    pub transcribed_at: Option<DateTime<Utc>>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Story> for StoryResponse {
    fn from(story: Story) -> Self {
        Self {
            id: story.id,
            subscription_id: story.subscription_id,
            delivery_id: story.delivery_id,
            question_id: story.question_id,
            title: story.title,
            content: story.content,
            status: story.status.as_str().to_string(),
            input_mode: story.input_mode.as_str().to_string(),
            word_count: story.word_count,
            audio_url: story.audio_url,
            photo_count: story.photo_count,
            transcription_confidence: story.transcription_confidence,
            transcribed_at: story.transcribed_at,
            submitted_at: story.submitted_at,
            created_at: story.created_at,
            updated_at: story.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TranscriptionResponse {
    pub story_id: Uuid,
    pub text: String,
    pub language: Option<String>,
    pub confidence: Option<f32>,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Plan, book and shipping prices in Euro cents.
#[utoipa::path(
    get,
    path = "/pricing",
    responses((status = 200, description = "Pricing configuration", body = PricingResponse))
)]
pub async fn get_pricing_handler() -> Json<PricingResponse> {
    let config = pricing_config();
    Json(PricingResponse {
        plans: config.plans.into_iter().map(Into::into).collect(),
        books: config
            .books
            .into_iter()
            .map(|(format, price_cents)| BookPriceResponse {
                format: format.as_str().to_string(),
                price_cents,
            })
            .collect(),
        shipping: ShippingResponse {
            germany: config.shipping_germany,
            austria: config.shipping_austria,
            switzerland: config.shipping_switzerland,
            eu: config.shipping_eu,
            world: config.shipping_world,
        },
    })
}

/// All question categories in display order.
#[utoipa::path(
    get,
    path = "/questions/categories",
    responses((status = 200, description = "Category metadata", body = Vec<CategoryResponse>))
)]
pub async fn list_categories_handler() -> Json<Vec<CategoryResponse>> {
    let mut categories: Vec<CategoryResponse> = QuestionCategory::ALL
        .iter()
        .map(|category| {
            let info = category.info();
            CategoryResponse {
                category: category.as_str().to_string(),
                label_de: info.label_de.to_string(),
                label_en: info.label_en.to_string(),
                description: info.description.to_string(),
                sort_order: info.sort_order,
                region_specific: category.is_region_specific(),
            }
        })
        .collect();
    categories.sort_by_key(|c| c.sort_order);
    Json(categories)
}

/// The story author's dashboard: subscription, current question, progress, recent stories.
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard aggregate", body = DashboardResponse),
        (status = 401, description = "Not logged in", body = ErrorEnvelope)
    )
)]
pub async fn get_dashboard_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<Json<DashboardResponse>> {
    let dashboard = workflow::load_dashboard(app_state.db.as_ref(), user_id, Utc::now()).await?;
    Ok(Json(dashboard.into()))
}

/// Buy a subscription as a gift. Builds the question queue and delivers the first question.
#[utoipa::path(
    post,
    path = "/subscriptions",
    request_body = CreateSubscriptionRequest,
    responses(
        (status = 201, description = "Subscription created", body = SubscriptionResponse),
        (status = 400, description = "Invalid purchase", body = ErrorEnvelope),
        (status = 401, description = "Not logged in", body = ErrorEnvelope)
    )
)]
pub async fn create_subscription_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<CreateSubscriptionRequest>,
) -> ApiResult<impl IntoResponse> {
    let gift = req.into_gift()?;

    let OpenedSubscription {
        subscription,
        first_delivery,
        claim_token,
    } = workflow::open_subscription(
        app_state.db.as_ref(),
        &app_state.question_bank,
        user_id,
        gift,
        Utc::now(),
        app_state.config.delivery_offset,
    )
    .await?;

    info!(
        "User {} opened subscription {} for author {}",
        user_id, subscription.id, subscription.author_id
    );
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse::new(
            subscription,
            Some(first_delivery),
            claim_token,
        )),
    ))
}

/// Deliver the next queued question if one is due.
#[utoipa::path(
    post,
    path = "/subscriptions/{id}/deliveries/next",
    params(("id" = Uuid, Path, description = "Subscription id")),
    responses(
        (status = 200, description = "Tick processed", body = NextDeliveryResponse),
        (status = 403, description = "Not a participant", body = ErrorEnvelope),
        (status = 404, description = "Unknown subscription", body = ErrorEnvelope)
    )
)]
pub async fn deliver_next_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(subscription_id): Path<Uuid>,
) -> ApiResult<Json<NextDeliveryResponse>> {
    let delivery = workflow::deliver_due_question(
        app_state.db.as_ref(),
        subscription_id,
        user_id,
        Utc::now(),
        app_state.config.delivery_offset,
    )
    .await?;

    Ok(Json(NextDeliveryResponse {
        delivery: delivery.map(Into::into),
    }))
}

/// Skip the pending question of a delivery.
#[utoipa::path(
    post,
    path = "/deliveries/{id}/skip",
    params(("id" = Uuid, Path, description = "Delivery id")),
    responses(
        (status = 200, description = "Delivery skipped", body = DeliveryResponse),
        (status = 403, description = "Not the author", body = ErrorEnvelope),
        (status = 409, description = "Already answered or skipped", body = ErrorEnvelope)
    )
)]
pub async fn skip_delivery_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(delivery_id): Path<Uuid>,
) -> ApiResult<Json<DeliveryResponse>> {
    let delivery =
        workflow::skip_delivery(app_state.db.as_ref(), user_id, delivery_id, Utc::now()).await?;
    Ok(Json(delivery.into()))
}

/// All stories of the logged-in author, newest first.
#[utoipa::path(
    get,
    path = "/stories",
    responses(
        (status = 200, description = "Stories", body = Vec<StoryResponse>),
        (status = 401, description = "Not logged in", body = ErrorEnvelope)
    )
)]
pub async fn list_stories_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> ApiResult<Json<Vec<StoryResponse>>> {
    let stories = app_state.db.list_stories_for_author(user_id).await?;
    Ok(Json(stories.into_iter().map(Into::into).collect()))
}

/// Create or update a story. Submitting a story answers its delivery.
#[utoipa::path(
    post,
    path = "/stories",
    request_body = SaveStoryRequest,
    responses(
        (status = 200, description = "Story saved", body = StoryResponse),
        (status = 400, description = "Invalid story", body = ErrorEnvelope),
        (status = 403, description = "Not the author", body = ErrorEnvelope),
        (status = 404, description = "No active subscription", body = ErrorEnvelope)
    )
)]
pub async fn save_story_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<SaveStoryRequest>,
) -> ApiResult<Json<StoryResponse>> {
    let draft = req.into_draft()?;
    let story = workflow::save_story(app_state.db.as_ref(), user_id, draft, Utc::now()).await?;
    Ok(Json(story.into()))
}

/// Transcribe a voice recording into the story's text.
///
/// Accepts a multipart/form-data request with a single audio file part.
#[utoipa::path(
    post,
    path = "/stories/{id}/transcribe",
    params(("id" = Uuid, Path, description = "Story id")),
    request_body(content_type = "multipart/form-data", description = "The audio recording."),
    responses(
        (status = 200, description = "Transcribed", body = TranscriptionResponse),
        (status = 400, description = "Missing audio", body = ErrorEnvelope),
        (status = 502, description = "Transcription backend failed", body = ErrorEnvelope)
    )
)]
pub async fn transcribe_story_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(story_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<Json<TranscriptionResponse>> {
    let missing_audio = || {
        ApiError::Validation(ValidationError::Field {
            field: "audio",
            message: "Bitte laden Sie eine Audioaufnahme hoch.".to_string(),
        })
    };

    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read multipart data: {}", e)))?
        .ok_or_else(missing_audio)?;
    let file_name = field.file_name().unwrap_or("recording.webm").to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::Internal(format!("Failed to read audio bytes: {}", e)))?;
    if data.is_empty() {
        return Err(missing_audio());
    }

    let transcription = workflow::transcribe_story(
        app_state.db.as_ref(),
        app_state.transcriber.as_ref(),
        user_id,
        story_id,
        &file_name,
        data.to_vec(),
        Utc::now(),
    )
    .await?;

    Ok(Json(TranscriptionResponse {
        story_id,
        text: transcription.text,
        language: transcription.language,
        confidence: transcription.confidence,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purchase() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            recipient_email: "oma@example.de".to_string(),
            recipient_name: "Oma Erna".to_string(),
            plan: "STARTER".to_string(),
            gift_message: Some("   ".to_string()),
            custom_questions: vec![],
            frequency: None,
            preferred_day: 3,
            region: None,
            exclude_categories: vec!["DDR".to_string()],
        }
    }

    #[test]
    fn test_purchase_defaults() {
        let gift = purchase().into_gift().unwrap();
        assert_eq!(gift.plan, SubscriptionPlan::Starter);
        assert_eq!(gift.frequency, DeliveryFrequency::Weekly);
        assert_eq!(gift.region, Region::All);
        assert_eq!(gift.gift_message, None);
        assert!(gift.exclude_categories.contains(&QuestionCategory::Ddr));
    }

    #[test]
    fn test_purchase_rejects_unknown_tags() {
        let mut req = purchase();
        req.region = Some("BAVARIA".to_string());
        assert_eq!(
            req.into_gift().unwrap_err(),
            ValidationError::UnknownTag {
                kind: "region",
                value: "BAVARIA".to_string()
            }
        );

        let mut req = purchase();
        req.frequency = Some("WEEKLY".to_string());
        assert!(req.into_gift().is_err());
    }

    #[test]
    fn test_story_draft_defaults() {
        let draft = SaveStoryRequest {
            story_id: None,
            delivery_id: None,
            title: Some(String::new()),
            content: "Es war einmal".to_string(),
            status: None,
            input_mode: None,
        }
        .into_draft()
        .unwrap();
        assert_eq!(draft.status, StoryStatus::Draft);
        assert_eq!(draft.input_mode, InputMode::Text);
        assert_eq!(draft.title, None);
    }
}
