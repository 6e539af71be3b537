//! Session store seam.
//!
//! The client never owns the logged-in member; it reads the token through
//! [`SessionStore`] and asks the store to forget the profile on 401.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::RwLock;

/// Read access to the current member's token.
pub trait SessionStore: Send + Sync {
    /// Current token, if a member is logged in.
    fn token(&self) -> Option<SecretString>;

    /// Drop the stored profile. Called on 401 before navigating to login.
    fn clear_profile(&self) {}
}

/// Logged-in member as returned by the login endpoints.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawProfile")]
pub struct MemberProfile {
    pub id: Option<String>,
    pub account: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub mobile: Option<String>,
    pub token: Option<SecretString>,
}

#[derive(Deserialize)]
struct RawProfile {
    id: Option<String>,
    account: Option<String>,
    nickname: Option<String>,
    avatar: Option<String>,
    mobile: Option<String>,
    token: Option<String>,
}

impl From<RawProfile> for MemberProfile {
    fn from(raw: RawProfile) -> Self {
        Self {
            id: raw.id,
            account: raw.account,
            nickname: raw.nickname,
            avatar: raw.avatar,
            mobile: raw.mobile,
            token: raw.token.map(SecretString::from),
        }
    }
}

impl MemberProfile {
    pub fn with_token<S: Into<String>>(token: S) -> Self {
        Self {
            id: None,
            account: None,
            nickname: None,
            avatar: None,
            mobile: None,
            token: Some(SecretString::from(token.into())),
        }
    }
}

/// In-memory member store.
#[derive(Debug, Default)]
pub struct MemorySession {
    profile: RwLock<Option<MemberProfile>>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_profile(profile: MemberProfile) -> Self {
        Self {
            profile: RwLock::new(Some(profile)),
        }
    }

    pub fn set_profile(&self, profile: MemberProfile) {
        match self.profile.write() {
            Ok(mut guard) => *guard = Some(profile),
            Err(poisoned) => *poisoned.into_inner() = Some(profile),
        }
    }

    pub fn profile(&self) -> Option<MemberProfile> {
        match self.profile.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl SessionStore for MemorySession {
    fn token(&self) -> Option<SecretString> {
        let guard = match self.profile.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard
            .as_ref()
            .and_then(|p| p.token.as_ref())
            .filter(|t| !t.expose_secret().is_empty())
            .cloned()
    }

    fn clear_profile(&self) {
        match self.profile.write() {
            Ok(mut guard) => *guard = None,
            Err(poisoned) => *poisoned.into_inner() = None,
        }
    }
}

/// Store for anonymous clients: never has a token.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSession;

impl SessionStore for NoSession {
    fn token(&self) -> Option<SecretString> {
        None
    }
}
