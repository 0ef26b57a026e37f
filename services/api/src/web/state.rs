//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use foreverstory_core::ports::{DatabaseService, TranscriptionService};
use foreverstory_core::QuestionBank;
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<dyn DatabaseService>,
    pub config: Arc<Config>,
    pub transcriber: Arc<dyn TranscriptionService>,
    /// Reference questions every new subscription queue is drawn from.
    pub question_bank: Arc<QuestionBank>,
}
