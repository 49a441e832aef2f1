//! Locally persisted session: wallet address, chosen role, registration details

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::DrearlError;
use crate::storage::{ClientStorage, SESSION_KEY};

/// Marketplace role chosen at registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Can list and manage assets
    Landowner,
    /// Can browse and purchase assets
    Buyer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Landowner => "Landowner",
            Role::Buyer => "Buyer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DrearlError;

    /// Accepts the bare role names and the role-picker label "Buyer / Investor"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let first = s.split_whitespace().next().unwrap_or("");
        match first.to_ascii_lowercase().as_str() {
            "landowner" => Ok(Role::Landowner),
            "buyer" => Ok(Role::Buyer),
            _ => Err(DrearlError::InvalidRole(s.to_string())),
        }
    }
}

/// A registration detail value: forms submit either text or numbers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DetailValue {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for DetailValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetailValue::Number(n) => write!(f, "{}", n),
            DetailValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for DetailValue {
    fn from(s: &str) -> Self {
        DetailValue::Text(s.to_string())
    }
}

impl From<String> for DetailValue {
    fn from(s: String) -> Self {
        DetailValue::Text(s)
    }
}

impl From<u64> for DetailValue {
    fn from(n: u64) -> Self {
        DetailValue::Number(n.into())
    }
}

/// Details collected by the registration form
pub type RegistrationDetails = BTreeMap<String, DetailValue>;

/// Detail key holding the user's display name
pub const FULL_NAME_KEY: &str = "fullName";

/// The locally persisted record of a registered wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default)]
    pub wallet_address: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    #[serde(default)]
    pub details: RegistrationDetails,
}

/// One row of the "Your Details" panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub key: String,
    pub title: String,
    pub value: String,
}

impl Session {
    pub fn new(
        wallet_address: impl Into<String>,
        role: Option<Role>,
        details: RegistrationDetails,
    ) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            role,
            details,
        }
    }

    /// Registered display name, if the form collected one
    pub fn full_name(&self) -> Option<&str> {
        match self.details.get(FULL_NAME_KEY) {
            Some(DetailValue::Text(name)) if !name.trim().is_empty() => Some(name.as_str()),
            _ => None,
        }
    }

    /// Role to present; sessions without one browse as buyers
    pub fn effective_role(&self) -> Role {
        self.role.unwrap_or(Role::Buyer)
    }

    /// Every detail except the full name, titled for display
    pub fn profile_entries(&self) -> Vec<ProfileEntry> {
        self.details
            .iter()
            .filter(|(key, _)| key.as_str() != FULL_NAME_KEY)
            .map(|(key, value)| ProfileEntry {
                key: key.clone(),
                title: capitalize(key),
                value: value.to_string(),
            })
            .collect()
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Unknown role strings in stored data load as "no role" instead of failing
fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| match s.parse::<Role>() {
        Ok(role) => Some(role),
        Err(_) => {
            log::warn!("Ignoring unknown stored role '{}'", s);
            None
        }
    }))
}

/// Persists the single session under the `userData` key
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn ClientStorage>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Save the session, replacing any previous one
    pub fn save(&self, session: &Session) -> Result<(), DrearlError> {
        let json = serde_json::to_string(session)
            .map_err(|e| DrearlError::malformed(SESSION_KEY, e.to_string()))?;
        self.storage.set_item(SESSION_KEY, &json)?;
        log::info!(
            "Session saved for {} as {}",
            session.wallet_address,
            session.role.map(|r| r.as_str()).unwrap_or("<no role>")
        );
        Ok(())
    }

    /// Load the session, distinguishing an unavailable medium
    ///
    /// Malformed content is logged and reported as `Ok(None)`.
    pub fn try_load(&self) -> Result<Option<Session>, DrearlError> {
        let Some(raw) = self.storage.get_item(SESSION_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                log::warn!("Discarding malformed stored session: {}", e);
                Ok(None)
            }
        }
    }

    /// Load the session; every failure reads as "no session"
    pub fn load(&self) -> Option<Session> {
        match self.try_load() {
            Ok(session) => session,
            Err(e) => {
                log::warn!("Session storage unavailable, continuing without session: {}", e);
                None
            }
        }
    }
}
