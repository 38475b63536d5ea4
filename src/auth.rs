//! Mock authentication.
//!
//! Users live in the local key/value store under [`USERS_DB_KEY`]; the demo
//! users are written there on first use. Logging in only looks the email up.

use buildtrack_storage::{Storage, StorageError};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Storage key of the mock user database.
pub const USERS_DB_KEY: &str = "buildtrack_users_db";

/// Role of a user within the organisation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access
    Admin,
    /// Manages one or more projects
    ProjectManager,
    /// Runs a construction site
    SiteSupervisor,
    /// Read-only access
    Viewer,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Role::Admin => "admin",
            Role::ProjectManager => "project_manager",
            Role::SiteSupervisor => "site_supervisor",
            Role::Viewer => "viewer",
        })
    }
}

/// A user record of the mock database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Stable id, used as layout owner
    pub id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Role
    pub role: Role,
}

/// Session of a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Id of the logged-in user
    pub user_id: String,
    /// Display name
    pub name: String,
    /// Login email
    pub email: String,
    /// Role
    pub role: Role,
}

impl From<User> for Session {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Errors from the mock auth.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No user has this email.
    #[error("no user with email '{0}'")]
    UnknownUser(String),

    /// The stored user database could not be decoded.
    #[error("user database is corrupt: {0}")]
    Corrupt(#[source] serde_json::Error),

    /// Reading the user database failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn user(id: &str, name: &str, email: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        role,
    }
}

/// Mock authentication over a key/value store.
#[derive(Debug)]
pub struct MockAuth;

impl MockAuth {
    /// Users written to an empty store.
    pub fn demo_users() -> Vec<User> {
        vec![
            user("u-100", "Ana García", "ana@buildtrack.test", Role::ProjectManager),
            user("u-200", "Marcus Lee", "marcus@buildtrack.test", Role::SiteSupervisor),
            user("u-300", "Priya Shah", "priya@buildtrack.test", Role::Admin),
            user("u-400", "Tom Becker", "tom@buildtrack.test", Role::Viewer),
        ]
    }

    /// All users, seeding the demo users when the database doesn't exist.
    ///
    /// A failure to write the seed is logged; the demo users are still
    /// returned.
    pub fn users<S: Storage>(storage: &mut S) -> Result<Vec<User>, AuthError> {
        if let Some(raw) = storage.get_item(USERS_DB_KEY)? {
            return serde_json::from_str(&raw).map_err(AuthError::Corrupt);
        }

        let users = Self::demo_users();
        match serde_json::to_string(&users) {
            Ok(json) => {
                if let Err(e) = storage.set_item(USERS_DB_KEY, &json) {
                    tracing::warn!(error = %e, "failed to seed user database");
                } else {
                    tracing::debug!(count = users.len(), "seeded user database");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize demo users"),
        }
        Ok(users)
    }

    /// Logs in by email (case-insensitive).
    pub fn login<S: Storage>(storage: &mut S, email: &str) -> Result<Session, AuthError> {
        let wanted = email.trim();
        let user = Self::users(storage)?
            .into_iter()
            .find(|u| u.email.eq_ignore_ascii_case(wanted))
            .ok_or_else(|| AuthError::UnknownUser(wanted.to_string()))?;
        tracing::info!(user_id = %user.id, "logged in");
        Ok(user.into())
    }
}
