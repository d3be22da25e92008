// ── Core error types ──
//
// Consumer-facing errors from parkwatch-core. These are NOT API-specific --
// presentation never sees raw reqwest errors or JSON parse failures.
// The `From<parkwatch_api::Error>` impl is the fault classifier: it maps
// transport-layer failures into the stable taxonomy below, so failure
// display stays the same across transport implementations.

use thiserror::Error;

use crate::model::FacilityId;

/// Record-level decode failure.
///
/// Produced while validating a single wire record. A batch decode drops
/// the offending record and counts it; siblings are unaffected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A required field (id, name, coordinates, counts) was absent.
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    /// A numeric field was outside its permitted range and could not be
    /// safely clamped (negative counts, coordinates off the globe).
    #[error("field `{field}` out of range: {value}")]
    OutOfRange { field: &'static str, value: f64 },

    /// A field was present but could not be interpreted.
    #[error("unparsable field `{field}`: {reason}")]
    Unparsable { field: &'static str, reason: String },
}

/// Engine-level failure classification for one sync cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The feed could not be reached at all (connect/DNS failure).
    #[error("parking feed unreachable")]
    NetworkUnavailable,

    /// The request timed out.
    #[error("parking feed timed out")]
    Timeout,

    /// The feed answered with a non-success HTTP status.
    #[error("parking feed server error (HTTP {status})")]
    ServerError { status: u16 },

    /// The response body could not be decoded into facility records.
    #[error("parking feed returned undecodable data: {reason}")]
    DecodeFailure { reason: String },

    /// A detail fetch named a facility the feed doesn't know.
    #[error("facility {id} not found")]
    NotFound { id: FacilityId },

    /// Anything that doesn't fit the categories above.
    #[error("sync failed: {message}")]
    Unknown { message: String },
}

impl SyncError {
    /// Stable presentation-facing message. Derived from the taxonomy, not
    /// from raw transport error strings.
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkUnavailable => {
                "Can't reach the parking feed. Check your connection.".to_owned()
            }
            Self::Timeout => "The parking feed is taking too long to respond.".to_owned(),
            Self::ServerError { status } => {
                format!("The parking feed reported a problem (HTTP {status}).")
            }
            Self::DecodeFailure { .. } => {
                "The parking feed sent data we couldn't understand.".to_owned()
            }
            Self::NotFound { id } => format!("Facility {id} is no longer listed."),
            Self::Unknown { .. } => "Something went wrong while updating parking data.".to_owned(),
        }
    }
}

// ── Fault classification ─────────────────────────────────────────────

impl From<parkwatch_api::Error> for SyncError {
    fn from(err: parkwatch_api::Error) -> Self {
        if err.is_timeout() {
            return Self::Timeout;
        }
        if err.is_unreachable() {
            return Self::NetworkUnavailable;
        }
        match err {
            parkwatch_api::Error::Api { status, .. } => Self::ServerError { status },
            parkwatch_api::Error::Deserialization { message, .. } => {
                Self::DecodeFailure { reason: message }
            }
            parkwatch_api::Error::Transport(e) => match e.status() {
                Some(status) => Self::ServerError {
                    status: status.as_u16(),
                },
                None => Self::Unknown {
                    message: e.to_string(),
                },
            },
            other => Self::Unknown {
                message: other.to_string(),
            },
        }
    }
}

impl From<DecodeError> for SyncError {
    fn from(err: DecodeError) -> Self {
        Self::DecodeFailure {
            reason: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_status_maps_to_server_error() {
        let err = parkwatch_api::Error::Api {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(SyncError::from(err), SyncError::ServerError { status: 502 });
    }

    #[test]
    fn deserialization_maps_to_decode_failure() {
        let err = parkwatch_api::Error::Deserialization {
            message: "expected value at line 1".into(),
            body: "<html>".into(),
        };
        assert!(matches!(
            SyncError::from(err),
            SyncError::DecodeFailure { .. }
        ));
    }

    #[test]
    fn user_messages_never_leak_transport_detail() {
        let err = SyncError::DecodeFailure {
            reason: "expected `,` at byte 91".into(),
        };
        assert!(!err.user_message().contains("byte 91"));
    }
}
