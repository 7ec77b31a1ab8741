//! Domain layer — pure refresh types and decisions.
//!
//! This module has zero imports from `crate::infra`, `crate::application`,
//! `tokio`, or any HTTP client. All functions are synchronous and take data
//! in, returning data out.

pub mod error;
pub mod refresh;

pub use error::{ApiOperation, RemoteApiError};
pub use refresh::{
    FlowOutcome, Operation, OperationHandle, PollPlan, RefreshAction, RefreshTimings, RunOutcome,
    describe_delay,
};
