//! Core module - the dashboard's persistent stores.
//!
//! Query logic is written against `ConnectionTrait` so it runs on any connection;
//! the `*Database` types wrap it with per-call file connections.

pub mod alert;
pub mod contact;
pub mod seed;

pub use alert::{Alert, AlertDatabase, AlertFilter, AlertType};
pub use contact::{AddOutcome, Contact, ContactDatabase, ContactKind};
pub use seed::{generate_sample_alerts, seed_sample_alerts};
