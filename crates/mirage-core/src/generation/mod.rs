//! Generation gateway contract and provider failure classification.

mod classifier;
mod gateway;

pub use classifier::{CREDENTIAL_FAILURE_MARKERS, FailureClass, classify_failure};
pub use gateway::{GenerationGateway, ProviderError};
