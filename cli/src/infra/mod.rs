//! Infrastructure layer — concrete implementations of application port traits.
//!
//! This module contains all I/O-performing code: HTTP calls to Schematics,
//! IAM and the log sink, timers, and environment access.
//!
//! Imports from `crate::domain` and `crate::application::ports` are allowed.

pub mod config;
pub mod http;
pub mod iam;
pub mod log_sink;
pub mod pacer;
pub mod schematics;
