//! Clients for external collaborators

pub mod email;

pub use email::EmailClient;
