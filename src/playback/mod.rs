pub mod poller;

pub use poller::{AvailabilityCheck, AvailabilityPoller, HeadAvailabilityCheck, PollOutcome};
