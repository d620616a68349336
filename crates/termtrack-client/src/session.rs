//! Stored session state
//!
//! `session.json` keeps the last issued token and the username it
//! belongs to. A cleared session writes both fields as `null` rather
//! than deleting the file, so the file's presence says nothing about
//! being logged in.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::Result;

pub const SESSION_FILE: &str = "session.json";

/// A usable session: token plus the username it was issued to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub username: String,
}

#[derive(Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "token-uuid", default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
}

/// Load the stored session. A missing, cleared or unreadable file all
/// mean the same thing: not logged in.
pub fn load(dir: &Path) -> Option<Session> {
    let raw = fs::read_to_string(dir.join(SESSION_FILE)).ok()?;
    let file: SessionFile = serde_json::from_str(&raw).ok()?;
    Some(Session {
        token: file.token?,
        username: file.username?,
    })
}

/// Persist a session after login or registration.
pub fn save(dir: &Path, session: &Session) -> Result<()> {
    fs::create_dir_all(dir)?;
    let file = SessionFile {
        token: Some(session.token.clone()),
        username: Some(session.username.clone()),
    };
    fs::write(dir.join(SESSION_FILE), serde_json::to_string(&file)?)?;
    Ok(())
}

/// Forget the stored session.
pub fn clear(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(SESSION_FILE), serde_json::to_string(&SessionFile::default())?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_dir(tag: &str) -> std::path::PathBuf {
        let dir = env::temp_dir().join(format!("termtrack-client-session-{tag}-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn sessions_round_trip_through_the_file() {
        let dir = scratch_dir("roundtrip");
        let session = Session {
            token: "0af1e2d3".to_string(),
            username: "ada".to_string(),
        };

        save(&dir, &session).unwrap();
        assert_eq!(load(&dir), Some(session));

        // the stored field name matches the wire header
        let raw = fs::read_to_string(dir.join(SESSION_FILE)).unwrap();
        assert!(raw.contains("token-uuid"));
    }

    #[test]
    fn cleared_sessions_load_as_logged_out() {
        let dir = scratch_dir("cleared");
        let session = Session {
            token: "0af1e2d3".to_string(),
            username: "ada".to_string(),
        };

        save(&dir, &session).unwrap();
        clear(&dir).unwrap();
        assert_eq!(load(&dir), None);
    }

    #[test]
    fn garbage_and_missing_files_load_as_logged_out() {
        let dir = scratch_dir("garbage");
        let _ = fs::remove_file(dir.join(SESSION_FILE));
        assert_eq!(load(&dir), None);

        fs::write(dir.join(SESSION_FILE), "not json at all").unwrap();
        assert_eq!(load(&dir), None);

        fs::write(dir.join(SESSION_FILE), r#"{"token-uuid": "abc"}"#).unwrap();
        assert_eq!(load(&dir), None);
    }
}
