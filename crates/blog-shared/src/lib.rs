//! # Blog Shared
//!
//! Wire types shared between the API server and its clients.
//! This crate has no dependency on the domain layer so it can be compiled for
//! any client, WASM included.

pub mod dto;
pub mod response;

pub use response::ErrorResponse;
