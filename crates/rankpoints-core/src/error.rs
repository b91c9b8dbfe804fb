//! Domain-level error taxonomy for scoring operations.

use conversion_client::ClientError;

/// Scoring domain errors.
///
/// `InvalidFormat` is recovered at the input field, `UnknownEvent` and
/// `PlaceNotScoring` abort the current operation, and the service variants
/// degrade a single cell in batch expansions but fail single-value
/// calculations outright.
#[derive(Debug, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid {event} input '{input}': expected {expected}")]
    InvalidFormat {
        event: String,
        input: String,
        expected: String,
    },

    #[error("unknown event: {0}")]
    UnknownEvent(String),

    #[error("unknown competition category: {0}")]
    UnknownCategory(String),

    #[error("category {category} scores places 1-{last_place}, got place {place}")]
    PlaceNotScoring {
        category: String,
        place: u8,
        last_place: u8,
    },

    #[error("event {event} is not contested by {gender} in the {season} season")]
    EventNotAvailable {
        event: String,
        gender: String,
        season: String,
    },

    #[error("conversion service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("conversion service error: {0}")]
    ServiceError(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl From<ClientError> for ScoringError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::NotConfigured(_) | ClientError::Setup(_) => {
                ScoringError::Configuration(err.to_string())
            }
            ClientError::Transport(_) | ClientError::Timeout => {
                ScoringError::ServiceUnavailable(err.to_string())
            }
            ClientError::Status { .. } | ClientError::InvalidResponse(_) => {
                ScoringError::ServiceError(err.to_string())
            }
        }
    }
}

impl ScoringError {
    /// True for failures that came from the conversion service boundary.
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            ScoringError::ServiceUnavailable(_) | ScoringError::ServiceError(_)
        )
    }
}

/// Result type for scoring operations.
pub type Result<T> = std::result::Result<T, ScoringError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_not_scoring_display() {
        let err = ScoringError::PlaceNotScoring {
            category: "F".to_string(),
            place: 4,
            last_place: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("places 1-3"));
        assert!(msg.contains("place 4"));
    }

    #[test]
    fn test_client_errors_map_to_taxonomy() {
        let err: ScoringError = ClientError::Timeout.into();
        assert!(matches!(err, ScoringError::ServiceUnavailable(_)));

        let err: ScoringError = ClientError::Status {
            status: 400,
            message: "bad".into(),
        }
        .into();
        assert!(matches!(err, ScoringError::ServiceError(_)));
        assert!(err.is_service_failure());

        let err: ScoringError = ClientError::NotConfigured("unset".into()).into();
        assert!(matches!(err, ScoringError::Configuration(_)));
        assert!(!err.is_service_failure());
    }
}
