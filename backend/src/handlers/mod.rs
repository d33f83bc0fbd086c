//! HTTP handlers

mod accommodation;
mod admin;
mod auth;
mod booking;
mod health;
mod provider;
mod sport_adventure;
mod transportation;
mod upload;

pub use accommodation::*;
pub use admin::*;
pub use auth::*;
pub use booking::*;
pub use health::*;
pub use provider::*;
pub use sport_adventure::*;
pub use transportation::*;
pub use upload::*;

use serde::Deserialize;

/// Free-text search box contents, split into terms on whitespace
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

impl SearchQuery {
    pub fn terms(&self) -> Vec<String> {
        self.q
            .as_deref()
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}
