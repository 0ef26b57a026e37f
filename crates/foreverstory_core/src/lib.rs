pub mod domain;
pub mod ports;
pub mod pricing;
pub mod progress;
pub mod questions;
pub mod schedule;
pub mod validation;
pub mod workflow;

pub use domain::{
    DeliveryFrequency, DeliveryStatus, InputMode, NewSubscription, Question,
    QuestionCategory, QuestionDelivery, QueuedQuestion, Region, Story, StoryStatus, Subscription,
    SubscriptionPlan, SubscriptionStatus, User, UserCredentials,
};
pub use ports::{
    DatabaseService, DeliveryCounts, PortError, PortResult, Transcription, TranscriptionService,
};
pub use progress::{CurrentQuestion, Dashboard, Progress, RecentStory};
pub use questions::{QuestionBank, QueueRequest};
pub use validation::{GiftPurchase, StoryDraft, ValidationError};
pub use workflow::{WorkflowError, WorkflowResult};
