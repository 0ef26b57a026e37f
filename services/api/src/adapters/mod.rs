pub mod db;
pub mod transcription;

pub use db::DbAdapter;
pub use transcription::{DisabledTranscriptionAdapter, OpenAiTranscriptionAdapter};
