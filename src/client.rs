use anyhow::Context;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::account::dto::{
    ApiReply, LoginRequest, SignupRequest, TokenData, UpdateDetailsRequest, UserDetails,
};
use crate::config::ClientConfig;
use crate::error::{AuthError, AuthResult};

const SIGNUP_ENDPOINT: &str = "auth/signup";
const LOGIN_ENDPOINT: &str = "auth/login";
const USER_DETAILS_ENDPOINT: &str = "user/me";

/// Stateless façade over the four remote account operations.
///
/// Holds no credential of its own: operations that need one take it as an
/// argument and attach it as a bearer `Authorization` header. Every call
/// resolves to a typed result; nothing panics across this boundary.
#[derive(Debug, Clone)]
pub struct RequestClient {
    http: Client,
    base_url: String,
}

impl RequestClient {
    pub fn new(config: &ClientConfig) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Creates a new account. Resolves to the issued bearer token.
    #[instrument(skip(self, password, password_confirm))]
    pub async fn create_account(
        &self,
        email: &str,
        name: &str,
        password: &str,
        password_confirm: &str,
    ) -> AuthResult<String> {
        let body = SignupRequest {
            email,
            name,
            password,
            password2: password_confirm,
        };
        let tokens: TokenData = self.post_json(SIGNUP_ENDPOINT, &body).await?;
        Ok(tokens.api_token)
    }

    /// Logs the user in. Resolves to the issued bearer token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<String> {
        let body = LoginRequest { email, password };
        let tokens: TokenData = self.post_json(LOGIN_ENDPOINT, &body).await?;
        Ok(tokens.api_token)
    }

    /// Fetches the account details behind `credential`.
    #[instrument(skip_all)]
    pub async fn fetch_profile(&self, credential: &str) -> AuthResult<UserDetails> {
        let response = self
            .http
            .get(self.url(USER_DETAILS_ENDPOINT))
            .bearer_auth(credential)
            .send()
            .await?;
        Self::extract(response.json::<ApiReply<UserDetails>>().await?)
    }

    /// Pushes updated account details. Success is the absence of an error
    /// code in the reply; no payload comes back.
    #[instrument(skip_all)]
    pub async fn update_profile(
        &self,
        credential: &str,
        details: &UpdateDetailsRequest,
    ) -> AuthResult<()> {
        let response = self
            .http
            .patch(self.url(USER_DETAILS_ENDPOINT))
            .bearer_auth(credential)
            .json(details)
            .send()
            .await?;
        let reply = response.json::<ApiReply<serde_json::Value>>().await?;
        if let Some(code) = reply.error_short_code {
            warn!(code = %code, "update rejected");
            return Err(AuthError::Server(code));
        }
        Ok(())
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> AuthResult<T> {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::extract(response.json::<ApiReply<T>>().await?)
    }

    fn extract<T>(reply: ApiReply<T>) -> AuthResult<T> {
        if let Some(code) = reply.error_short_code {
            warn!(code = %code, "server rejected request");
            return Err(AuthError::Server(code));
        }
        reply.data.ok_or_else(|| {
            AuthError::Transport("reply carried neither data nor an error code".into())
        })
    }
}
