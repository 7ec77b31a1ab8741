//! Operation flows: issue a destroy or apply, then poll workspace status until
//! it reaches the operation's target, a failure status, or the poll timeout.
//!
//! A flow that ends in `FAILED`/`CANCELLED` returns normally; only Control API
//! errors propagate.

use std::time::Duration;

use refresh_common::WorkspaceStatus;

use crate::application::ports::{Pacer, RunLogger, WorkspaceControl};
use crate::application::services::refresh::RefreshContext;
use crate::domain::{
    ApiOperation, FlowOutcome, Operation, OperationHandle, PollPlan, RemoteApiError,
    describe_delay,
};

/// Read the workspace status fresh from the Control API.
///
/// # Errors
///
/// Returns `RemoteApiError` if the status request fails.
pub async fn read_status<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
) -> Result<WorkspaceStatus, RemoteApiError>
where
    C: WorkspaceControl,
{
    ctx.control
        .status(ctx.workspace_id)
        .await
        .map_err(|e| RemoteApiError::new(ApiOperation::GetStatus, e))
}

/// Issue `operation` and poll until it settles.
///
/// # Errors
///
/// Returns `RemoteApiError` if issuing the command or any status read fails.
pub async fn run_operation<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    operation: Operation,
) -> Result<FlowOutcome, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    let handle = issue(ctx, operation).await?;
    ctx.logger.info(operation.started_message()).await;
    let plan = ctx.timings.plan_for(operation);
    poll_until_settled(ctx, operation, &handle, plan).await
}

/// Run several operations back to back. Each runs regardless of how the
/// previous one ended.
///
/// # Errors
///
/// Stops at the first `RemoteApiError`.
pub async fn run_operations<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    operations: &[Operation],
) -> Result<Vec<(Operation, FlowOutcome)>, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    let mut flows = Vec::with_capacity(operations.len());
    for &operation in operations {
        flows.push((operation, run_operation(ctx, operation).await?));
    }
    Ok(flows)
}

async fn issue<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    operation: Operation,
) -> Result<OperationHandle, RemoteApiError>
where
    C: WorkspaceControl,
{
    match operation {
        Operation::Destroy => ctx
            .control
            .destroy(ctx.workspace_id)
            .await
            .map_err(|e| RemoteApiError::new(ApiOperation::Destroy, e)),
        Operation::Apply => ctx
            .control
            .apply(ctx.workspace_id)
            .await
            .map_err(|e| RemoteApiError::new(ApiOperation::Apply, e)),
    }
}

/// The polling loop proper: one settle pause, then read / judge / pause.
///
/// # Errors
///
/// Returns `RemoteApiError` if a status read fails.
pub async fn poll_until_settled<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    operation: Operation,
    handle: &OperationHandle,
    plan: PollPlan,
) -> Result<FlowOutcome, RemoteApiError>
where
    C: WorkspaceControl,
    L: RunLogger,
    P: Pacer,
{
    ctx.pacer.pause(plan.settle).await;

    let target = operation.target();
    let mut waited = Duration::ZERO;
    loop {
        let status = read_status(ctx).await?;

        if status == target {
            ctx.logger.info(operation.success_message()).await;
            if !plan.grace.is_zero() {
                ctx.pacer.pause(plan.grace).await;
            }
            return Ok(FlowOutcome::Succeeded);
        }

        if status.is_failure() {
            ctx.logger
                .error(&format!("{} operation {status}", operation.name()))
                .await;
            log_activity(ctx, operation, handle).await;
            return Ok(FlowOutcome::Failed {
                status,
                activity_id: handle.activity_id.clone(),
            });
        }

        if plan.timeout.is_some_and(|limit| waited >= limit) {
            ctx.logger
                .error(&format!(
                    "{} operation still not finished after {}. Last workspace status: {status}",
                    operation.name(),
                    describe_delay(waited)
                ))
                .await;
            log_activity(ctx, operation, handle).await;
            return Ok(FlowOutcome::TimedOut {
                status,
                activity_id: handle.activity_id.clone(),
            });
        }

        let pause = plan.next_pause(waited);
        ctx.logger
            .info(&operation.waiting_message(pause, &status))
            .await;
        ctx.pacer.pause(pause).await;
        waited += pause;
    }
}

async fn log_activity<C, L, P>(
    ctx: &RefreshContext<'_, C, L, P>,
    operation: Operation,
    handle: &OperationHandle,
) where
    L: RunLogger,
{
    ctx.logger
        .error(&format!(
            "{} activity ID: {}",
            operation.name(),
            handle.activity()
        ))
        .await;
}
