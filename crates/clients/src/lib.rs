//! Client domain: the managed record type and its validation rules.

pub mod client;
pub mod error;
pub mod validate;

pub use client::{Client, ClientFields, ClientId};
pub use error::DomainError;
pub use validate::{validate_comment, validate_email, validate_phone, MAX_COMMENT_CHARS};
