use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A live login session, stored keyed by the hash of its bearer token.
/// The token itself is only ever held by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_is_relative_to_now() {
        let mut session = Session {
            username: "ada".to_string(),
            token_hash: "abc123".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
        };
        assert!(!session.is_expired());

        session.expires_at = Utc::now() - Duration::seconds(1);
        assert!(session.is_expired());
    }
}
