use serde::{Deserialize, Serialize};

/// One user's account fields as last known locally.
///
/// A record is created from the entered credentials on signup or login and
/// replaced wholesale when a fetch round-trip completes; fields are never
/// mutated in place. `password` is held in plain text, the same way the
/// service transmits it — a known weakness that is kept narrow here:
/// nothing in this crate logs or copies it beyond the record itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub name: Option<String>,
    pub location: Option<String>,
    /// ISO `YYYY-MM-DD`, absent until fetched or saved.
    pub birthday: Option<String>,
}

impl UserRecord {
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name,
            location: None,
            birthday: None,
        }
    }
}
