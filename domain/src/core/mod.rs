//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DomainError`]: the error taxonomy of the engine
//! - [`string`]: small text helpers used when rendering calls and titles

pub mod error;
pub mod string;
