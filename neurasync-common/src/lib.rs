//! # Neurasync Common Library
//!
//! Shared code for the Neurasync wellness services including:
//! - Domain models (users, stress records, emotion analyses, messages, music)
//! - Emotion-to-stress scoring and insight generation
//! - Mock emotion generation for when no detector is reachable
//! - Store trait with an in-memory implementation
//! - Configuration loading
//! - Utility functions

pub mod config;
pub mod error;
pub mod insight;
pub mod mock;
pub mod models;
pub mod music;
pub mod recommendations;
pub mod scoring;
pub mod store;
pub mod time;

pub use error::{Error, Result};
pub use scoring::score_emotions;
