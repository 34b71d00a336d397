//! purr - controller for a private messenger client
//!
//! This library exposes modules for use in integration tests.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod events;
pub mod intent;
pub mod notifications;
pub mod screens;
pub mod stack;
pub mod traits;
