//! Persisted grant model for the operational store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An operational record of an issued authorization artifact: a refresh
/// token, a consent, or a device code.
///
/// Rows are created and consumed by the token runtime; the bootstrap
/// flow only migrates the store they live in. `data` is an opaque
/// serialized blob owned by the runtime.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct PersistedGrant {
    #[sqlx(rename = "grant_key")]
    pub key: String,
    pub grant_type: String,
    pub subject_id: Option<String>,
    pub client_id: String,
    pub creation_utc: DateTime<Utc>,
    pub expiration_utc: Option<DateTime<Utc>>,
    pub consumed_utc: Option<DateTime<Utc>>,
    pub data: String,
}

impl PersistedGrant {
    /// Check if the grant is past its expiration.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiration_utc.is_some_and(|expires| expires <= now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn grant(expiration_utc: Option<DateTime<Utc>>) -> PersistedGrant {
        PersistedGrant {
            key: "k1".to_string(),
            grant_type: "refresh_token".to_string(),
            subject_id: Some("subject-1".to_string()),
            client_id: "interactive.web".to_string(),
            creation_utc: Utc::now(),
            expiration_utc,
            consumed_utc: None,
            data: "{}".to_string(),
        }
    }

    #[test]
    fn grant_with_past_expiration_is_expired() {
        let now = Utc::now();
        assert!(grant(Some(now - Duration::minutes(1))).is_expired(now));
    }

    #[test]
    fn grant_without_expiration_never_expires() {
        assert!(!grant(None).is_expired(Utc::now()));
    }
}
