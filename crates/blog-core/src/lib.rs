//! # Blog Core
//!
//! The domain layer of the blog API.
//! This crate contains the post schema, its wire mapping and the persistence
//! port, with zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::DomainError;
