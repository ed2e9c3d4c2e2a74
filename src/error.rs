//! Error taxonomy for lookups and its serializable envelope form.
//!
//! Every public operation on [`crate::SteamLookup`] returns
//! `Result<_, LookupError>`. Callers that need a data representation (for
//! example to print or forward the failure) call [`LookupError::envelope`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::transport::TransportError;

/// Why a lookup could not produce a domain record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Missing credential or unusable endpoint configuration.
    #[error("{0}")]
    Configuration(String),

    /// The identifier is empty or not in the form the operation requires.
    #[error("{0}")]
    InvalidArgument(String),

    /// No identifier pattern matched and vanity resolution failed.
    #[error("could not resolve identifier '{input}': {reason}")]
    UnresolvedIdentifier { input: String, reason: String },

    /// An endpoint expected to answer 200 answered something else.
    #[error("unexpected HTTP status code {status}")]
    UnexpectedStatus { status: u16 },

    /// The upstream source has no player for the identifier.
    #[error("{message}")]
    UserNotFound { status: u16, message: String },

    /// The vanity-resolution endpoint reported a non-success discriminator.
    #[error("vanity name not found: {message}")]
    VanityNotFound { code: i64, message: String },

    /// The transport call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The upstream body could not be decoded.
    #[error("malformed upstream response: {message}")]
    MalformedResponse { status: u16, message: String },
}

impl LookupError {
    pub(crate) fn missing_credential() -> Self {
        Self::Configuration(
            "Steam Web API key has not been set. Please read the documentation for instructions."
                .to_string(),
        )
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    pub(crate) fn malformed(status: u16, message: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            status,
            message: message.to_string(),
        }
    }

    /// Stable snake_case code naming the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration_error",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::UnresolvedIdentifier { .. } => "unresolved_identifier",
            Self::UnexpectedStatus { .. } => "unexpected_status",
            Self::UserNotFound { .. } => "user_not_found",
            Self::VanityNotFound { .. } => "vanity_not_found",
            Self::Transport(_) => "transport_error",
            Self::MalformedResponse { .. } => "malformed_response",
        }
    }

    /// HTTP status, or the upstream discriminator for vanity failures.
    pub fn status(&self) -> Option<i64> {
        match self {
            Self::UnexpectedStatus { status }
            | Self::UserNotFound { status, .. }
            | Self::MalformedResponse { status, .. } => Some(i64::from(*status)),
            Self::VanityNotFound { code, .. } => Some(*code),
            Self::Transport(err) => err.status.map(i64::from),
            Self::Configuration(_)
            | Self::InvalidArgument(_)
            | Self::UnresolvedIdentifier { .. } => None,
        }
    }

    /// Whether the failure comes from caller input or configuration rather
    /// than from the upstream service.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Configuration(_) | Self::InvalidArgument(_) | Self::UnresolvedIdentifier { .. }
        )
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.kind().to_string(),
            status: self.status(),
            error_message: self.to_string(),
        }
    }
}

/// Data form of a [`LookupError`].
///
/// Shares no field name with any success record, so a consumer can tell the
/// two apart by the presence of `error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    pub error_message: String,
}

impl From<&LookupError> for ErrorEnvelope {
    fn from(err: &LookupError) -> Self {
        err.envelope()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_for_invalid_argument() {
        let env = LookupError::invalid("Not a valid SteamID64").envelope();
        assert_eq!(env.error, "invalid_argument");
        assert_eq!(env.status, None);
        assert_eq!(env.error_message, "Not a valid SteamID64");
    }

    #[test]
    fn test_envelope_carries_vanity_code() {
        let err = LookupError::VanityNotFound {
            code: 42,
            message: "No match".into(),
        };
        let env = err.envelope();
        assert_eq!(env.error, "vanity_not_found");
        assert_eq!(env.status, Some(42));
    }

    #[test]
    fn test_envelope_serializes_without_status() {
        let json = serde_json::to_value(LookupError::missing_credential().envelope()).unwrap();
        assert!(json.get("status").is_none());
        assert_eq!(json["error"], "configuration_error");
    }

    #[test]
    fn test_transport_status_passthrough() {
        let err = LookupError::from(TransportError {
            status: Some(503),
            message: "service unavailable".into(),
        });
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_terminal());
    }
}
