//! Classifies provider failure messages.
//!
//! Providers report quota, permission and rate-limit problems only as free
//! text, so classification is substring matching against a known marker list.
//! The list is provider specific and may not be exhaustive. Matching is case
//! sensitive.

/// Substrings that mark a failure as credential-related.
pub const CREDENTIAL_FAILURE_MARKERS: &[&str] = &[
    "Requested entity was not found",
    "PERMISSION_DENIED",
    "403",
    "429",
    "quota",
    "exhausted",
    "Too Many Requests",
];

/// How the session should react to a failed generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Quota/permission/rate-limit: route to credential reselection.
    Credential,
    /// Anything else: show the message and let the user retake.
    Retryable,
}

/// Classifies a provider failure message against [`CREDENTIAL_FAILURE_MARKERS`].
pub fn classify_failure(message: &str) -> FailureClass {
    classify_with(message, CREDENTIAL_FAILURE_MARKERS)
}

fn classify_with(message: &str, markers: &[&str]) -> FailureClass {
    if markers.iter().any(|marker| message.contains(marker)) {
        FailureClass::Credential
    } else {
        FailureClass::Retryable
    }
}
