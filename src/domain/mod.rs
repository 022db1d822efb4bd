//! Domain value objects and types.
//!
//! Value objects here are validated at construction time so that invalid data
//! cannot be represented anywhere else in the system.

pub mod errors;
pub mod phone;

pub use errors::ValidationError;
pub use phone::{Phone, PhoneCategory, PhoneDocument};
