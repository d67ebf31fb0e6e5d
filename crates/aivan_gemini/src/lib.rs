//! A minimal client for the Gemini `generateContent` REST API.

mod client;
mod error;
pub mod types;

pub use client::{Client, ResponseStream};
pub use error::Error;
