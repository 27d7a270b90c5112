use std::sync::Arc;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, instrument, warn};

use crate::account::dto::SignupInfo;
use crate::account::profile::UserProfile;
use crate::account::session::Session;
use crate::client::RequestClient;
use crate::error::{AuthError, AuthResult};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn validate_signup(info: &SignupInfo) -> AuthResult<()> {
    if info.email.trim().is_empty() {
        return Err(AuthError::Validation("Need an email".into()));
    }
    if !is_valid_email(info.email.trim()) {
        return Err(AuthError::Validation("Invalid email".into()));
    }
    if info.name.is_empty() {
        return Err(AuthError::Validation("Need a name".into()));
    }
    if info.password.is_empty() {
        return Err(AuthError::Validation("Need a password".into()));
    }
    if info.password != info.password_confirm {
        return Err(AuthError::Validation("Need matching passwords".into()));
    }
    Ok(())
}

/// Creates a new account, then installs the issued credential and a profile
/// built from the signup fields into `session`.
#[instrument(skip_all, fields(email = %info.email))]
pub async fn create_account(
    client: &RequestClient,
    session: &Session,
    info: SignupInfo,
) -> AuthResult<Arc<UserProfile>> {
    validate_signup(&info)?;
    let email = info.email.trim().to_lowercase();

    let credential = client
        .create_account(&email, &info.name, &info.password, &info.password_confirm)
        .await?;

    let profile = Arc::new(UserProfile::from_credentials(
        email.clone(),
        info.password,
        Some(info.name),
    ));
    session.set_active(credential, Arc::clone(&profile)).await;
    info!(email = %email, "account created");
    Ok(profile)
}

/// Logs in and installs the credential plus a profile seeded from the
/// entered credentials. The rest of the account (location, birthday, the
/// server's idea of the name) arrives on the first fetch, which stays a
/// caller decision.
#[instrument(skip(client, session, password))]
pub async fn login(
    client: &RequestClient,
    session: &Session,
    email: &str,
    password: &str,
) -> AuthResult<Arc<UserProfile>> {
    if email.trim().is_empty() {
        return Err(AuthError::Validation("Need an email".into()));
    }
    if password.is_empty() {
        return Err(AuthError::Validation("Need a password".into()));
    }
    let email = email.trim().to_lowercase();
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AuthError::Validation("Invalid email".into()));
    }

    let credential = client.login(&email, password).await?;
    let profile = Arc::new(UserProfile::from_credentials(email.clone(), password, None));
    session.set_active(credential, Arc::clone(&profile)).await;
    info!(email = %email, "logged in");
    Ok(profile)
}

/// Ends the active session. Safe to call when already logged out.
pub async fn logout(session: &Session) {
    session.invalidate().await;
    info!("logged out");
}
