// src/session.rs
// Mock sign-in. The role is derived from the username; nothing is verified.

use std::fmt;

use bevy::prelude::Resource;
use thiserror::Error;

use crate::workspace::error::WorkspaceResult;
use crate::workspace::store::EntityStore;

pub const ROLE_KEY: &str = "userRole";
pub const USERNAME_KEY: &str = "username";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    SuperAdmin,
    Admin,
    User,
}

impl Role {
    pub fn from_username(username: &str) -> Self {
        if username.contains("super") {
            Role::SuperAdmin
        } else if username.contains("admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::SuperAdmin => "super-admin",
            Role::Admin => "admin",
            Role::User => "user",
        }
    }

    pub fn parse(raw: &str) -> Self {
        match raw {
            "super-admin" => Role::SuperAdmin,
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Please enter username and password")]
    MissingCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

/// Currently signed-in user, if any.
#[derive(Resource, Debug, Default)]
pub struct CurrentSession(pub Option<Session>);

impl Session {
    pub fn login(username: &str, password: &str) -> Result<Self, LoginError> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(LoginError::MissingCredentials);
        }
        Ok(Self {
            username: username.to_string(),
            role: Role::from_username(username),
        })
    }

    pub fn persist(&self, store: &mut EntityStore) -> WorkspaceResult<()> {
        store.set_value(ROLE_KEY, self.role.as_str())?;
        store.set_value(USERNAME_KEY, &self.username)
    }

    /// Session stored by a previous run; requires the username key.
    pub fn restore(store: &EntityStore) -> WorkspaceResult<Option<Self>> {
        let Some(username) = store.get_value(USERNAME_KEY)? else {
            return Ok(None);
        };
        let role = store
            .get_value(ROLE_KEY)?
            .map(|raw| Role::parse(&raw))
            .unwrap_or(Role::User);
        Ok(Some(Self { username, role }))
    }

    pub fn logout(store: &mut EntityStore) -> WorkspaceResult<()> {
        store.remove_value(ROLE_KEY)?;
        store.remove_value(USERNAME_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_follows_username() {
        assert_eq!(Role::from_username("superuser"), Role::SuperAdmin);
        assert_eq!(Role::from_username("super-admin"), Role::SuperAdmin);
        assert_eq!(Role::from_username("netadmin"), Role::Admin);
        assert_eq!(Role::from_username("alice"), Role::User);
    }

    #[test]
    fn login_requires_both_fields() {
        assert_eq!(Session::login("", "pw"), Err(LoginError::MissingCredentials));
        assert_eq!(Session::login("bob", ""), Err(LoginError::MissingCredentials));
        assert_eq!(Session::login("admin1", "pw").unwrap().role, Role::Admin);
    }

    #[test]
    fn persist_restore_logout() {
        let mut store = EntityStore::in_memory();
        assert_eq!(Session::restore(&store).unwrap(), None);

        let session = Session::login("superbob", "pw").unwrap();
        session.persist(&mut store).unwrap();
        assert_eq!(store.get_value(ROLE_KEY).unwrap().as_deref(), Some("super-admin"));
        assert_eq!(Session::restore(&store).unwrap(), Some(session));

        Session::logout(&mut store).unwrap();
        assert_eq!(Session::restore(&store).unwrap(), None);
    }
}
