//! Port definitions
//!
//! Interfaces the use cases depend on, implemented by outer layers.

pub mod catalog;
pub mod fetcher;
pub mod listener;
