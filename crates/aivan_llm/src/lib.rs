//! The generation pipeline: prompt assembly, backend dispatch and rate-limit
//! retries.

pub mod attachment;
pub mod backend;
mod client;
pub mod conversation;
mod error;
pub mod prompt;
pub mod retry;

pub use aivan_config::ChatMode;
pub use attachment::Attachment;
pub use backend::{Backend, BackendError};
pub use client::{Client, FALLBACK_RESPONSE, TextStream};
pub use conversation::{History, Role, Turn};
pub use error::Error;
pub use prompt::{ContentPart, GenerationRequest, PromptBuilder, RequestPayload};
pub use tokio_util::sync::CancellationToken;
