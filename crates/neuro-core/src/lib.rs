//! # Neuro-Core
//!
//! Core types for the Neuro-Architect system: the ten-axis brain
//! configuration, the structured profile generated from it, scenario
//! projections and chat transcript entries.

pub mod chat;
pub mod error;
pub mod locale;
pub mod params;
pub mod profile;
pub mod scenario;
pub mod types;

pub use chat::*;
pub use error::{Error, Result};
pub use locale::*;
pub use params::*;
pub use profile::*;
pub use scenario::*;
pub use types::*;
