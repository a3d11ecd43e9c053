pub mod client;

pub use client::{Transcriber, TranscriptResult, TranscriptionClient};
