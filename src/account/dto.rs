use serde::{Deserialize, Serialize};
use time::Date;

/// Envelope every Mirror reply uses: `data` on success, `error_short_code`
/// on rejection. The HTTP status line is not part of the contract — the
/// body shape alone decides the outcome.
#[derive(Debug, Deserialize)]
pub struct ApiReply<T> {
    pub data: Option<T>,
    pub error_short_code: Option<String>,
}

/// Request body for `POST auth/signup`.
#[derive(Debug, Serialize)]
pub struct SignupRequest<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub password2: &'a str,
}

/// Request body for `POST auth/login`.
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `data` payload of a signup or login reply.
#[derive(Debug, Deserialize)]
pub struct TokenData {
    pub api_token: String,
}

/// `data` payload of `GET user/me`.
#[derive(Debug, Deserialize)]
pub struct UserDetails {
    pub name: Option<String>,
    #[serde(default)]
    pub profile: ProfileFragment,
}

/// Nested profile fields of a `GET user/me` reply.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileFragment {
    pub birthdate: Option<String>,
    pub location: Option<String>,
}

/// Request body for `PATCH user/me`. All three fields are always sent.
#[derive(Debug, Serialize)]
pub struct UpdateDetailsRequest {
    pub name: String,
    pub location: String,
    pub birthdate: String,
}

/// Everything the signup form collects.
#[derive(Debug, Clone)]
pub struct SignupInfo {
    pub email: String,
    pub name: String,
    pub password: String,
    pub password_confirm: String,
}

/// Locally edited account fields handed to a profile save.
#[derive(Debug, Clone)]
pub struct AccountUpdate {
    pub name: String,
    pub location: Option<String>,
    pub birthday: Option<Date>,
}
