use std::sync::Arc;

use tokio::sync::RwLock;

use crate::account::profile::UserProfile;
use crate::error::{AuthError, AuthResult};

#[derive(Default)]
struct SessionState {
    credential: String,
    profile: Option<Arc<UserProfile>>,
}

/// Holder of the active bearer credential and the profile it belongs to.
///
/// One per process, owned by the composition root and passed by reference
/// into the flows that need it — nothing here is a global. An empty
/// credential means "not logged in", and the two fields only ever change
/// together: readers never observe a credential without its profile.
#[derive(Default)]
pub struct Session {
    state: RwLock<SessionState>,
}

/// Read-only view of the session at one instant.
#[derive(Clone)]
pub struct SessionSnapshot {
    pub credential: String,
    pub profile: Option<Arc<UserProfile>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a credential together with its profile.
    pub async fn set_active(&self, credential: String, profile: Arc<UserProfile>) {
        let mut state = self.state.write().await;
        state.credential = credential;
        state.profile = Some(profile);
    }

    /// Clears both fields. Calling it while already logged out is a no-op.
    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        state.credential.clear();
        state.profile = None;
    }

    /// Snapshot of both fields as of this call.
    pub async fn current(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            credential: state.credential.clone(),
            profile: state.profile.clone(),
        }
    }

    /// The active profile, or `NoActiveSession` when logged out.
    pub async fn profile(&self) -> AuthResult<Arc<UserProfile>> {
        self.state
            .read()
            .await
            .profile
            .clone()
            .ok_or(AuthError::NoActiveSession)
    }

    /// The bearer credential, or `NoActiveSession` when logged out.
    pub(crate) async fn credential(&self) -> AuthResult<String> {
        let state = self.state.read().await;
        if state.credential.is_empty() {
            return Err(AuthError::NoActiveSession);
        }
        Ok(state.credential.clone())
    }
}
