//! Client seam to the validation query service.
//!
//! The workflow only ever talks through [`UserClient`], so tests can
//! substitute a double the same way the service itself is mocked in
//! the original demo.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::state::SignupData;

/// Password strength scoring result, as returned by the service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PasswordStrength {
    pub score: u8,
    pub warning: String,
    pub suggestions: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
}

#[async_trait]
pub trait UserClient: Send + Sync {
    async fn username_taken(&self, username: &str) -> Result<bool>;
    async fn email_taken(&self, email: &str) -> Result<bool>;
    async fn password_strength(&self, password: &str) -> Result<PasswordStrength>;
    async fn sign_up(&self, data: &SignupData) -> Result<SignupResponse>;
}

/// [`UserClient`] over HTTP against the service's `/users` endpoints.
#[derive(Clone, Debug)]
pub struct HttpUserClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpUserClient {
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl UserClient for HttpUserClient {
    async fn username_taken(&self, username: &str) -> Result<bool> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Taken {
            username_taken: bool,
        }

        let mut map = HashMap::new();
        map.insert("username", username);

        let taken: Taken = self
            .client
            .post(format!("{}/users/username-taken", self.base_url))
            .json(&map)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(taken.username_taken)
    }

    async fn email_taken(&self, email: &str) -> Result<bool> {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Taken {
            email_taken: bool,
        }

        let mut map = HashMap::new();
        map.insert("email", email);

        let taken: Taken = self
            .client
            .post(format!("{}/users/email-taken", self.base_url))
            .json(&map)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(taken.email_taken)
    }

    async fn password_strength(&self, password: &str) -> Result<PasswordStrength> {
        let mut map = HashMap::new();
        map.insert("password", password);

        let strength = self
            .client
            .post(format!("{}/users/password-strength", self.base_url))
            .json(&map)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(strength)
    }

    async fn sign_up(&self, data: &SignupData) -> Result<SignupResponse> {
        let response = self
            .client
            .post(format!("{}/users/signup", self.base_url))
            .json(data)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(response)
    }
}
