//! Application service — workspace hardware refresh use-case.
//!
//! Reads the workspace status once, picks a `RefreshAction`, and drives the
//! destroy/apply flows. Every outcome is returned to the caller; nothing here
//! exits the process.

use refresh_common::WorkspaceStatus;

use crate::application::ports::{Pacer, RunLogger, WorkspaceControl};
use crate::application::services::polling::{read_status, run_operations};
use crate::domain::{RefreshAction, RefreshTimings, RemoteApiError, RunOutcome, describe_delay};

/// Everything a refresh run needs, borrowed for the duration of the run.
pub struct RefreshContext<'a, C, L, P> {
    pub control: &'a C,
    pub logger: &'a L,
    pub pacer: &'a P,
    pub workspace_id: &'a str,
    pub timings: &'a RefreshTimings,
}

/// Run one hardware refresh to completion.
///
/// A `RemoteApiError` is logged through the run logger before it is returned.
///
/// # Errors
///
/// Returns `RemoteApiError` if any Control API call fails.
pub async fn run_refresh<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
) -> Result<RunOutcome, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    let result = refresh(ctx).await;
    if let Err(err) = &result {
        ctx.logger.error(&err.to_string()).await;
    }
    result
}

async fn refresh<C, L, P>(ctx: &RefreshContext<'_, C, L, P>) -> Result<RunOutcome, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    let status = read_status(ctx).await?;
    ctx.logger
        .info(&format!(
            "Starting hardware refresh. Current workspace status: {status}"
        ))
        .await;

    let action = RefreshAction::for_status(&status);
    match action {
        RefreshAction::Apply => {
            let flows = run_operations(ctx, action.operations()).await?;
            Ok(RunOutcome::from_flows(flows, RunOutcome::Provisioned))
        }
        RefreshAction::DestroyThenApply => {
            let flows = run_operations(ctx, action.operations()).await?;
            Ok(RunOutcome::from_flows(flows, RunOutcome::Refreshed))
        }
        RefreshAction::Recover => recover(ctx, status).await,
        RefreshAction::Wait => {
            wait_for_actionable(ctx, &status).await;
            Ok(RunOutcome::Skipped { status })
        }
    }
}

/// Destroy + apply while the workspace stays `FAILED`, up to the configured
/// number of attempts.
async fn recover<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    mut status: WorkspaceStatus,
) -> Result<RunOutcome, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    let max = ctx.timings.max_recovery_attempts;
    let mut attempts = 0;
    while attempts < max && status == WorkspaceStatus::Failed {
        attempts += 1;
        ctx.logger.info("Workspace is marked as Failed.").await;
        ctx.logger
            .info(&format!("Automated recovery attempt: {attempts}/{max}"))
            .await;
        run_operations(ctx, RefreshAction::Recover.operations()).await?;
        status = read_status(ctx).await?;
    }

    if status == WorkspaceStatus::Failed {
        ctx.logger
            .error(&format!(
                "Workspace is still marked as {status} after {attempts} recovery attempts. Exiting."
            ))
            .await;
        return Ok(RunOutcome::RecoveryExhausted { attempts });
    }

    ctx.logger
        .info(&format!(
            "Recovery finished after {attempts}/{max} attempts. Current workspace status: {status}"
        ))
        .await;
    Ok(RunOutcome::Recovered { attempts, status })
}

async fn wait_for_actionable<C, L, P>(ctx: &RefreshContext<'_, C, L, P>, status: &WorkspaceStatus)
where
    L: RunLogger,
    P: Pacer,
{
    ctx.logger
        .info("Workspace is currently not in a valid state to run destroy/apply actions")
        .await;
    ctx.logger
        .info(&format!("Current workspace status: {status}"))
        .await;
    ctx.logger
        .info(&format!(
            "Polling again in {}.",
            describe_delay(ctx.timings.idle_wait)
        ))
        .await;
    ctx.pacer.pause(ctx.timings.idle_wait).await;
}
