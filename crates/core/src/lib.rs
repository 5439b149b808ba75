//! Core types and shared functionality for mcp-kagi.
//!
//! This crate provides:
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;

pub use config::{AppConfig, ConfigError};
pub use error::Error;
