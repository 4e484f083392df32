//! Entity module - Contains all SeaORM entity definitions for the database.
//! The alert store owns `alerts`; the contact store owns `emails` and `phones`.

pub mod alert;
pub mod email;
pub mod phone;

// Re-export specific types to avoid conflicts
pub use alert::{AlertType, Entity as Alert, Model as AlertModel};
pub use email::{Entity as Email, Model as EmailModel};
pub use phone::{Entity as Phone, Model as PhoneModel};
