//! Core module - shared infrastructure for verbal-crew
//!
//! This module contains foundational types, configuration, logging and error
//! handling used throughout the crate.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::Config;
pub use error::{CrewError, Result};
pub use types::*;
