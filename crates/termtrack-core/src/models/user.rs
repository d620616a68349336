use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::TermtrackError;

/// Privilege level of a user account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Power {
    #[default]
    User,
    Admin,
}

impl Power {
    pub fn as_str(&self) -> &'static str {
        match self {
            Power::User => "user",
            Power::Admin => "admin",
        }
    }
}

impl FromStr for Power {
    type Err = TermtrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Power::User),
            "admin" => Ok(Power::Admin),
            other => Err(TermtrackError::Validation {
                message: format!("unknown power level: {other}"),
            }),
        }
    }
}

/// Public profile of a user, as exchanged with clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub full_name: String,
    #[serde(default)]
    pub profile_picture: Option<String>,
}

/// A stored user account, including fields that never leave the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    pub username: String,
    pub full_name: String,
    pub profile_picture: Option<String>,
    pub password_hash: String,
    pub power: Power,
    /// Names of projects that changed since this user last polled.
    pub update_projects: Vec<String>,
    /// Reserved for future direct-message notifications.
    pub update_messages: Vec<String>,
}

impl UserAccount {
    pub fn new(profile: User, password_hash: String) -> Self {
        Self {
            username: profile.username,
            full_name: profile.full_name,
            profile_picture: profile.profile_picture,
            password_hash,
            power: Power::User,
            update_projects: Vec::new(),
            update_messages: Vec::new(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.power == Power::Admin
    }

    pub fn profile(&self) -> User {
        User {
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            profile_picture: self.profile_picture.clone(),
        }
    }
}
