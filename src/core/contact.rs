//! Contact store - email addresses and phone numbers notified about alerts.
//!
//! The two lists live in separate tables with a unique value column. Adding a
//! value twice is an expected outcome, not an error: it reports `false` and the
//! list is unchanged. Values are stored exactly as given; checking that they
//! look like an address or a number is up to the caller.

use crate::{
    config::database::{close_connection, connect, create_contact_tables, ensure_parent_dir, sqlite_url},
    entities::{Email, Phone, email, phone},
    errors::Result,
};
use sea_orm::{DbErr, QueryOrder, Set, SqlErr, prelude::*};
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Which contact list an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// The `emails` table
    Email,
    /// The `phones` table
    Phone,
}

impl std::fmt::Display for ContactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => f.write_str("email"),
            Self::Phone => f.write_str("phone"),
        }
    }
}

/// A stored contact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    /// Assigned by the database on insert
    pub id: i64,
    /// The address or number, exactly as stored
    pub value: String,
}

impl From<email::Model> for Contact {
    fn from(model: email::Model) -> Self {
        Self {
            id: model.id,
            value: model.email,
        }
    }
}

impl From<phone::Model> for Contact {
    fn from(model: phone::Model) -> Self {
        Self {
            id: model.id,
            value: model.phone,
        }
    }
}

/// Outcome of an insert into one of the contact lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddOutcome {
    /// Stored under the returned id
    Added(i64),
    /// The value was already in the list
    Duplicate,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Inserts `value` into the chosen list.
pub async fn insert_contact<C>(db: &C, kind: ContactKind, value: &str) -> Result<AddOutcome>
where
    C: ConnectionTrait,
{
    let inserted = match kind {
        ContactKind::Email => email::ActiveModel {
            email: Set(value.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map(|m| m.id),
        ContactKind::Phone => phone::ActiveModel {
            phone: Set(value.to_string()),
            ..Default::default()
        }
        .insert(db)
        .await
        .map(|m| m.id),
    };

    match inserted {
        Ok(id) => Ok(AddOutcome::Added(id)),
        Err(e) if is_unique_violation(&e) => Ok(AddOutcome::Duplicate),
        Err(e) => Err(e.into()),
    }
}

/// Lists the chosen contacts in alphabetical order of their value.
pub async fn list_contacts<C>(db: &C, kind: ContactKind) -> Result<Vec<Contact>>
where
    C: ConnectionTrait,
{
    let contacts: Vec<Contact> = match kind {
        ContactKind::Email => Email::find()
            .order_by_asc(email::Column::Email)
            .all(db)
            .await?
            .into_iter()
            .map(Contact::from)
            .collect(),
        ContactKind::Phone => Phone::find()
            .order_by_asc(phone::Column::Phone)
            .all(db)
            .await?
            .into_iter()
            .map(Contact::from)
            .collect(),
    };
    Ok(contacts)
}

/// Deletes a contact by id. Returns `false` when no such contact exists.
pub async fn delete_contact<C>(db: &C, kind: ContactKind, id: i64) -> Result<bool>
where
    C: ConnectionTrait,
{
    let result = match kind {
        ContactKind::Email => Email::delete_by_id(id).exec(db).await?,
        ContactKind::Phone => Phone::delete_by_id(id).exec(db).await?,
    };
    Ok(result.rows_affected > 0)
}

/// File-backed contact store with one connection per call.
#[derive(Debug, Clone)]
pub struct ContactDatabase {
    path: PathBuf,
    url: String,
}

impl ContactDatabase {
    /// Opens the store at `path`, creating the directory, file and tables as needed.
    #[instrument]
    pub async fn open<P: AsRef<Path> + std::fmt::Debug>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir(&path)?;
        let store = Self {
            url: sqlite_url(&path),
            path,
        };

        let db = connect(&store.url).await?;
        let created = create_contact_tables(&db).await;
        close_connection(db).await;
        created?;

        info!("Contact store ready at {:?}", store.path);
        Ok(store)
    }

    /// Location of the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Adds an email address. `false` when it is already listed or on storage error.
    pub async fn add_email(&self, email: &str) -> bool {
        self.add(ContactKind::Email, email).await
    }

    /// Adds a phone number. `false` when it is already listed or on storage error.
    pub async fn add_phone(&self, phone: &str) -> bool {
        self.add(ContactKind::Phone, phone).await
    }

    /// Email addresses, alphabetical.
    pub async fn get_emails(&self) -> Result<Vec<Contact>> {
        self.list(ContactKind::Email).await
    }

    /// Phone numbers, alphabetical.
    pub async fn get_phones(&self) -> Result<Vec<Contact>> {
        self.list(ContactKind::Phone).await
    }

    /// Removes an email address by id. `true` only if a row was deleted.
    pub async fn remove_email(&self, id: i64) -> bool {
        self.remove(ContactKind::Email, id).await
    }

    /// Removes a phone number by id. `true` only if a row was deleted.
    pub async fn remove_phone(&self, id: i64) -> bool {
        self.remove(ContactKind::Phone, id).await
    }

    #[instrument(skip(self))]
    async fn add(&self, kind: ContactKind, value: &str) -> bool {
        let outcome = match connect(&self.url).await {
            Ok(db) => {
                let outcome = insert_contact(&db, kind, value).await;
                close_connection(db).await;
                outcome
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(AddOutcome::Added(id)) => {
                info!("Added {} contact {} with id {}", kind, value, id);
                true
            }
            Ok(AddOutcome::Duplicate) => {
                info!("{} contact {} already exists", kind, value);
                false
            }
            Err(e) => {
                error!("Failed to add {} contact {}: {}", kind, value, e);
                false
            }
        }
    }

    async fn list(&self, kind: ContactKind) -> Result<Vec<Contact>> {
        let db = connect(&self.url).await?;
        let contacts = list_contacts(&db, kind).await;
        close_connection(db).await;
        contacts
    }

    #[instrument(skip(self))]
    async fn remove(&self, kind: ContactKind, id: i64) -> bool {
        let outcome = match connect(&self.url).await {
            Ok(db) => {
                let outcome = delete_contact(&db, kind, id).await;
                close_connection(db).await;
                outcome
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(deleted) => {
                debug!("Remove {} contact {}: deleted = {}", kind, id, deleted);
                deleted
            }
            Err(e) => {
                error!("Failed to remove {} contact {}: {}", kind, id, e);
                false
            }
        }
    }
}
