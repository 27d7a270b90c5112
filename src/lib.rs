//! Client-side authentication and account-session layer for the Mirror API.
//!
//! The crate authenticates a user against the remote service, holds the
//! resulting bearer credential in a [`Session`] for the lifetime of the
//! process, and keeps a local [`UserProfile`] synchronized with the server
//! through explicit fetch/save round-trips. Presentation code consumes it
//! through the account flows and the profile's observer registrations.

pub mod account;
pub mod client;
pub mod config;
pub mod error;

#[cfg(test)]
mod testutil;

pub use account::dto::{AccountUpdate, SignupInfo};
pub use account::profile::{ObserverHandle, UserProfile};
pub use account::record::UserRecord;
pub use account::services::{create_account, login, logout};
pub use account::session::{Session, SessionSnapshot};
pub use client::RequestClient;
pub use config::ClientConfig;
pub use error::{AuthError, AuthResult};
