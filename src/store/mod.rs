pub mod client;
pub mod types;

pub use client::{RecordingStore, StoreClient};
pub use types::{Contributor, NewRecording, Prompt, StoreSettings};
