//! Normalized Frontier user profile.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{profile_parse_error, Error, ErrorKind, ProfileErrorKind};

/// Identifier of this provider, injected into every profile.
pub const PROVIDER: &str = "frontier";

const INJECTED_KEYS: [&str; 3] = ["provider", "accessToken", "fetchedAt"];

/// User profile as returned by the `/me` endpoint, plus the fields the strategy injects.
///
/// Serializes to a single flat JSON object. The provider's own fields are kept
/// as-is; `provider`, `accessToken` and `fetchedAt` always come from the strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedProfile {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
    pub provider: String,
    pub access_token: String,
    pub fetched_at: DateTime<Utc>,
}

impl NormalizedProfile {
    /// Build a profile from a raw response body.
    ///
    /// The body must be a JSON object. Anything else is a parse error, and no
    /// partial profile is produced.
    pub fn from_body(
        body: &str,
        access_token: &str,
        fetched_at: DateTime<Utc>,
    ) -> Result<Self, Error> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error {
            source: Some(Box::new(e)),
            error_kind: ErrorKind::Profile(ProfileErrorKind::Parse),
        })?;

        let Value::Object(mut fields) = value else {
            return Err(profile_parse_error("profile body is not a JSON object"));
        };

        for key in INJECTED_KEYS {
            fields.remove(key);
        }

        Ok(Self {
            fields,
            provider: PROVIDER.to_string(),
            access_token: access_token.to_string(),
            fetched_at,
        })
    }

    /// Look up a provider-supplied field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The provider's user identifier, when present as a string or number.
    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }
}
