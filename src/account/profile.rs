use std::sync::{Arc, Mutex, RwLock};

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::{debug, instrument};

use crate::account::dto::{AccountUpdate, UpdateDetailsRequest};
use crate::account::record::UserRecord;
use crate::account::session::Session;
use crate::client::RequestClient;
use crate::error::{AuthError, AuthResult};

/// Wire format for birthdays.
static BIRTHDAY_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

pub(crate) fn format_birthday(date: Date) -> AuthResult<String> {
    date.format(&BIRTHDAY_FORMAT)
        .map_err(|e| AuthError::Validation(format!("unformattable birthday: {e}")))
}

type Observer = Arc<dyn Fn() + Send + Sync>;

/// Handle returned by [`UserProfile::subscribe`]; hand it back to
/// [`UserProfile::unsubscribe`] to stop receiving notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverHandle(u64);

#[derive(Default)]
struct ObserverRegistry {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

/// View-model over one [`UserRecord`].
///
/// The wrapped record is replaced wholesale when a fetch round-trip
/// completes, and every replacement notifies the registered observers
/// exactly once, synchronously, in registration order. Overlapping
/// `fetch`/`save` calls on the same profile are not coordinated: whichever
/// response lands last determines the final record.
pub struct UserProfile {
    record: RwLock<UserRecord>,
    observers: Mutex<ObserverRegistry>,
}

impl std::fmt::Debug for UserProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserProfile")
            .field("record", &self.record)
            .finish_non_exhaustive()
    }
}

impl UserProfile {
    /// Builds a profile from locally entered credentials, before the server
    /// has told us anything else about the account.
    pub fn from_credentials(
        email: impl Into<String>,
        password: impl Into<String>,
        name: Option<String>,
    ) -> Self {
        Self::from_record(UserRecord::new(email, password, name))
    }

    pub fn from_record(record: UserRecord) -> Self {
        Self {
            record: RwLock::new(record),
            observers: Mutex::new(ObserverRegistry::default()),
        }
    }

    /// Registers `observer` to run after every record replacement.
    /// Registrations are independent and live until unsubscribed.
    pub fn subscribe(&self, observer: impl Fn() + Send + Sync + 'static) -> ObserverHandle {
        let mut registry = self.observers.lock().expect("observer registry poisoned");
        registry.next_id += 1;
        let id = registry.next_id;
        registry.entries.push((id, Arc::new(observer)));
        ObserverHandle(id)
    }

    pub fn unsubscribe(&self, handle: ObserverHandle) {
        let mut registry = self.observers.lock().expect("observer registry poisoned");
        registry.entries.retain(|(id, _)| *id != handle.0);
    }

    pub fn email(&self) -> String {
        self.read_record().email.clone()
    }

    /// Display name, empty until known.
    pub fn name(&self) -> String {
        self.read_record().name.clone().unwrap_or_default()
    }

    /// Location, empty until known.
    pub fn location(&self) -> String {
        self.read_record().location.clone().unwrap_or_default()
    }

    /// The stored birthday, or the current date (UTC) when it is missing or
    /// unparsable. Computed at each call, never cached.
    pub fn birthday(&self) -> Date {
        self.read_record()
            .birthday
            .as_deref()
            .and_then(|s| Date::parse(s, &BIRTHDAY_FORMAT).ok())
            .unwrap_or_else(|| OffsetDateTime::now_utc().date())
    }

    /// A copy of the wrapped record as of this call.
    pub fn record(&self) -> UserRecord {
        self.read_record().clone()
    }

    /// Replaces the wrapped record with the server's view of the account.
    ///
    /// Email, password and the name as currently known carry over; a `name`
    /// in the reply wins, and `location`/`birthdate` come from the reply's
    /// profile fragment. On any failure the record is left untouched and the
    /// error is handed to the caller; there is no implicit retry.
    #[instrument(skip_all)]
    pub async fn fetch(&self, client: &RequestClient, session: &Session) -> AuthResult<()> {
        let credential = session.credential().await?;
        let details = client.fetch_profile(&credential).await?;

        let current = self.record();
        let mut next = UserRecord::new(current.email, current.password, current.name);
        if let Some(name) = details.name {
            next.name = Some(name);
        }
        next.location = details.profile.location;
        next.birthday = details.profile.birthdate;

        self.install(next);
        Ok(())
    }

    /// Pushes locally edited fields to the server.
    ///
    /// `birthday` falls back to today and `location` to the empty string;
    /// all three fields are always sent. The wrapped record is NOT updated
    /// on success — the caller's edited values are authoritative from here
    /// on, which is why this reports a bare outcome where `fetch` replaces
    /// the record.
    #[instrument(skip_all)]
    pub async fn save(
        &self,
        client: &RequestClient,
        session: &Session,
        update: AccountUpdate,
    ) -> AuthResult<()> {
        let credential = session.credential().await?;
        let birthday = update
            .birthday
            .unwrap_or_else(|| OffsetDateTime::now_utc().date());
        let details = UpdateDetailsRequest {
            name: update.name,
            location: update.location.unwrap_or_default(),
            birthdate: format_birthday(birthday)?,
        };
        client.update_profile(&credential, &details).await?;
        Ok(())
    }

    /// Swaps in `next`, then runs each registered observer once, in
    /// registration order. Callbacks run outside the record lock so they
    /// can read the accessors.
    fn install(&self, next: UserRecord) {
        {
            let mut record = self.record.write().expect("record lock poisoned");
            *record = next;
        }
        let observers: Vec<Observer> = {
            let registry = self.observers.lock().expect("observer registry poisoned");
            registry.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };
        for observer in &observers {
            (**observer)();
        }
        debug!(observers = observers.len(), "account record replaced");
    }

    fn read_record(&self) -> std::sync::RwLockReadGuard<'_, UserRecord> {
        self.record.read().expect("record lock poisoned")
    }
}
