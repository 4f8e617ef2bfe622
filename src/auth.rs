//! Demo login check.
//!
//! Compares against one fixed credential pair per role and records the
//! session. Nothing here guards anything.

use std::fmt;

use crate::session::{Role, Session, StorageError};
use crate::traits::KeyValueStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: &'static str,
    pub password: &'static str,
}

/// The demo pair for a role. Users and contributors sign in by phone
/// number, admins by username.
pub fn demo_credentials(role: Role) -> Credentials {
    match role {
        Role::User => Credentials {
            identifier: "9999999999",
            password: "user123",
        },
        Role::Contributor => Credentials {
            identifier: "9999999999",
            password: "contrib123",
        },
        Role::Admin => Credentials {
            identifier: "admin",
            password: "admin123",
        },
    }
}

#[derive(Debug)]
pub enum AuthError {
    InvalidCredentials(Role),
    Storage(StorageError),
}

impl From<StorageError> for AuthError {
    fn from(err: StorageError) -> Self {
        AuthError::Storage(err)
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::InvalidCredentials(role) => {
                let demo = demo_credentials(*role);
                write!(f, "Invalid credentials. Use {}/{}", demo.identifier, demo.password)
            }
            AuthError::Storage(err) => write!(f, "could not save session: {}", err),
        }
    }
}

impl std::error::Error for AuthError {}

/// Check `identifier`/`password` for `role` and persist the session.
pub fn login(
    role: Role,
    identifier: &str,
    password: &str,
    store: &mut impl KeyValueStore,
) -> Result<Session, AuthError> {
    let expected = demo_credentials(role);
    if identifier.trim() != expected.identifier || password != expected.password {
        tracing::info!(role = role.as_str(), "login rejected");
        return Err(AuthError::InvalidCredentials(role));
    }

    let session = Session::signed_in(role);
    session.store(store)?;
    tracing::info!(role = role.as_str(), "logged in");
    Ok(session)
}

pub fn logout(store: &mut impl KeyValueStore) -> Result<(), AuthError> {
    Session::clear(store)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;

    #[test]
    fn test_user_login_persists_session() {
        let mut store = MemoryStore::new();
        let session = login(Role::User, "9999999999", "user123", &mut store).unwrap();
        assert!(session.authenticated);
        assert_eq!(Session::load(&store).unwrap(), session);
    }

    #[test]
    fn test_wrong_role_password_rejected() {
        let mut store = MemoryStore::new();
        let err = login(Role::Contributor, "9999999999", "user123", &mut store).unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials. Use 9999999999/contrib123");
        assert!(!Session::load(&store).unwrap().authenticated);
    }

    #[test]
    fn test_admin_login_and_logout() {
        let mut store = MemoryStore::new();
        let session = login(Role::Admin, "admin", "admin123", &mut store).unwrap();
        assert!(session.is_admin());
        logout(&mut store).unwrap();
        assert_eq!(Session::load(&store).unwrap(), Session::default());
    }
}
