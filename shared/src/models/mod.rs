//! Domain models for the Travel Marketplace Platform

mod accommodation;
mod booking;
mod provider;
mod sport_adventure;
mod transportation;

pub use accommodation::*;
pub use booking::*;
pub use provider::*;
pub use sport_adventure::*;
pub use transportation::*;
