//! Shared types and domain logic for the Travel Marketplace Platform
//!
//! This crate contains the entities, validation rules, pricing math, id
//! generation, and search/filter logic shared between the backend and any
//! other components of the system. Everything here is pure: no I/O, no
//! database access.

pub mod idgen;
pub mod models;
pub mod pricing;
pub mod search;
pub mod types;
pub mod validation;

pub use idgen::*;
pub use models::*;
pub use pricing::*;
pub use search::*;
pub use types::*;
pub use validation::*;
