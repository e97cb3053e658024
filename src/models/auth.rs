//! Authentication-related models

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Login / token request
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Registration form as entered by the user
#[derive(Debug, Clone)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Registration body sent to the backend; the confirmation stays client-side
#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

impl Registration {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirmation: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            password_confirmation: password_confirmation.into(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.password != self.password_confirmation {
            return Err("Passwords do not match.".to_string());
        }

        Ok(())
    }

    pub fn to_request(&self) -> RegisterRequest<'_> {
        RegisterRequest {
            username: &self.username,
            email: &self.email,
            password: &self.password,
        }
    }
}

/// Access / refresh token pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    /// Extract a token pair from a backend-defined payload, if it carries one
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let access = payload.get("access")?.as_str()?;
        let refresh = payload.get("refresh")?.as_str()?;
        if access.is_empty() || refresh.is_empty() {
            return None;
        }

        Some(Self {
            access: access.to_string(),
            refresh: refresh.to_string(),
        })
    }
}

/// Token refresh request
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub refresh: &'a str,
}

/// Token refresh response; the backend may not rotate the refresh token
#[derive(Debug, Deserialize)]
pub struct RefreshTokenResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RefreshTokenResponse {
    /// Combine with the refresh token that was sent
    pub fn into_pair(self, sent_refresh: &str) -> TokenPair {
        TokenPair {
            access: self.access,
            refresh: self.refresh.unwrap_or_else(|| sent_refresh.to_string()),
        }
    }
}
