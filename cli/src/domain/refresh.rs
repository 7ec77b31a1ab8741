//! Refresh state machine vocabulary: what to do for a status, how each
//! operation is polled, and how a run ends.

use std::time::Duration;

use refresh_common::{RefreshConfig, WorkspaceStatus};

/// A mutating workspace command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Destroy,
    Apply,
}

impl Operation {
    /// Status that marks the operation as complete.
    #[must_use]
    pub fn target(self) -> WorkspaceStatus {
        match self {
            Self::Destroy => WorkspaceStatus::Inactive,
            Self::Apply => WorkspaceStatus::Active,
        }
    }

    /// Capitalised name used in failure log lines ("Destroy operation FAILED").
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Destroy => "Destroy",
            Self::Apply => "Apply",
        }
    }

    #[must_use]
    pub fn started_message(self) -> &'static str {
        match self {
            Self::Destroy => "Destroying workspace resources",
            Self::Apply => "Provisioning workspace resources",
        }
    }

    #[must_use]
    pub fn success_message(self) -> &'static str {
        match self {
            Self::Destroy => "Resources destroyed successfully.",
            Self::Apply => "Resources provisioned successfully.",
        }
    }

    /// One progress line for a non-terminal poll.
    #[must_use]
    pub fn waiting_message(self, next_check: Duration, status: &WorkspaceStatus) -> String {
        let waiting = match self {
            Self::Destroy => "Waiting for workspace resources to be destroyed",
            Self::Apply => "Waiting for resources to be provisioned",
        };
        format!(
            "{waiting}. Next status check in {} .. Current workspace status: {status}",
            describe_delay(next_check)
        )
    }
}

/// Handle returned when a command is accepted.
///
/// `activity_id` is diagnostic only; completion is always judged from a fresh
/// status read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationHandle {
    pub activity_id: Option<String>,
}

impl OperationHandle {
    #[must_use]
    pub fn activity(&self) -> &str {
        self.activity_id.as_deref().unwrap_or("unknown")
    }
}

/// How a single destroy or apply flow ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    Succeeded,
    Failed {
        status: WorkspaceStatus,
        activity_id: Option<String>,
    },
    TimedOut {
        status: WorkspaceStatus,
        activity_id: Option<String>,
    },
}

impl FlowOutcome {
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

/// Terminal result of one refresh run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Workspace was inactive and has been provisioned.
    Provisioned,
    /// Workspace was active and has been destroyed and re-provisioned.
    Refreshed,
    /// Workspace left `FAILED` within the recovery budget.
    Recovered {
        attempts: u32,
        status: WorkspaceStatus,
    },
    /// A flow ended in `FAILED`, `CANCELLED` or timed out.
    OperationFailed {
        operation: Operation,
        outcome: FlowOutcome,
    },
    /// Status was not actionable; waited and returned.
    Skipped { status: WorkspaceStatus },
    /// Still `FAILED` after every recovery attempt.
    RecoveryExhausted { attempts: u32 },
}

impl RunOutcome {
    /// Process exit code for this outcome.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::RecoveryExhausted { .. } => 1,
            _ => 0,
        }
    }

    /// Fold a sequence of flows into an outcome: the first unsuccessful flow
    /// wins, otherwise `success`.
    #[must_use]
    pub fn from_flows(flows: Vec<(Operation, FlowOutcome)>, success: Self) -> Self {
        flows
            .into_iter()
            .find(|(_, outcome)| !outcome.is_success())
            .map_or(success, |(operation, outcome)| Self::OperationFailed {
                operation,
                outcome,
            })
    }
}

/// What to do for the status observed at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshAction {
    Apply,
    DestroyThenApply,
    Recover,
    Wait,
}

impl RefreshAction {
    #[must_use]
    pub fn for_status(status: &WorkspaceStatus) -> Self {
        match status {
            WorkspaceStatus::Inactive => Self::Apply,
            WorkspaceStatus::Active => Self::DestroyThenApply,
            WorkspaceStatus::Failed => Self::Recover,
            WorkspaceStatus::Cancelled | WorkspaceStatus::Other(_) => Self::Wait,
        }
    }

    /// Operations issued by this action in a single pass.
    #[must_use]
    pub fn operations(self) -> &'static [Operation] {
        match self {
            Self::Apply => &[Operation::Apply],
            Self::DestroyThenApply | Self::Recover => &[Operation::Destroy, Operation::Apply],
            Self::Wait => &[],
        }
    }
}

/// Timing parameters for one operation's polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPlan {
    /// Pause between issuing the command and the first status read.
    pub settle: Duration,
    /// Pause after each non-terminal read.
    pub interval: Duration,
    /// Pause after success before returning.
    pub grace: Duration,
    /// Stop polling once this much interval time has been spent.
    ///
    /// Only interval pauses count; settle and request time do not. The last
    /// pause is cut short so the limit is reached exactly.
    pub timeout: Option<Duration>,
}

impl PollPlan {
    /// Pause to take after a non-terminal read, given the interval time
    /// already spent.
    #[must_use]
    pub fn next_pause(&self, waited: Duration) -> Duration {
        self.timeout.map_or(self.interval, |limit| {
            self.interval.min(limit.saturating_sub(waited))
        })
    }
}

/// Every wait point of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTimings {
    pub settle: Duration,
    pub destroy_interval: Duration,
    pub apply_interval: Duration,
    pub destroy_grace: Duration,
    pub apply_grace: Duration,
    pub idle_wait: Duration,
    pub poll_timeout: Option<Duration>,
    pub max_recovery_attempts: u32,
}

impl Default for RefreshTimings {
    fn default() -> Self {
        Self {
            settle: Duration::from_secs(5),
            destroy_interval: Duration::from_secs(60),
            apply_interval: Duration::from_secs(600),
            destroy_grace: Duration::from_secs(60),
            apply_grace: Duration::ZERO,
            idle_wait: Duration::from_secs(60),
            poll_timeout: None,
            max_recovery_attempts: 3,
        }
    }
}

impl RefreshTimings {
    #[must_use]
    pub fn from_config(cfg: &RefreshConfig) -> Self {
        Self {
            settle: Duration::from_secs(cfg.refresh_settle_secs),
            destroy_interval: Duration::from_secs(cfg.refresh_destroy_poll_secs),
            apply_interval: Duration::from_secs(cfg.refresh_apply_poll_secs),
            destroy_grace: Duration::from_secs(cfg.refresh_destroy_grace_secs),
            apply_grace: Duration::from_secs(cfg.refresh_apply_grace_secs),
            idle_wait: Duration::from_secs(cfg.refresh_idle_wait_secs),
            poll_timeout: cfg.refresh_poll_timeout_secs.map(Duration::from_secs),
            max_recovery_attempts: cfg.refresh_max_recovery_attempts,
        }
    }

    #[must_use]
    pub fn plan_for(&self, operation: Operation) -> PollPlan {
        let (interval, grace) = match operation {
            Operation::Destroy => (self.destroy_interval, self.destroy_grace),
            Operation::Apply => (self.apply_interval, self.apply_grace),
        };
        PollPlan {
            settle: self.settle,
            interval,
            grace,
            timeout: self.poll_timeout,
        }
    }
}

/// Human wording for a wait: `"1 minute"`, `"10 minutes"`, `"90 seconds"`.
#[must_use]
pub fn describe_delay(delay: Duration) -> String {
    let secs = delay.as_secs();
    match secs {
        60 => "1 minute".to_string(),
        s if s >= 60 && s % 60 == 0 => format!("{} minutes", s / 60),
        1 => "1 second".to_string(),
        s => format!("{s} seconds"),
    }
}
