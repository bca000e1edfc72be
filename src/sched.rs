// src/sched.rs

//! Scheduling disciplines for the resolved work list.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::debug;

use crate::context::OrchestratorContext;
use crate::exec::execute;
use crate::output::OutputSink;
use crate::resolve::WorkItem;

/// Delay between staggered launches in parallel mode, so commands observably
/// start in argument order even though completion order is unconstrained.
const STAGGER_DELAY: Duration = Duration::from_millis(10);

/// Run every work item concurrently and wait for all of them to finish.
///
/// Items are launched in index order with a short stagger between launches;
/// after that each command runs independently.
pub async fn run_parallel(items: Vec<WorkItem>, ctx: Arc<OrchestratorContext>, sink: OutputSink) {
    let mut handles = Vec::with_capacity(items.len());

    for item in items {
        let ctx = Arc::clone(&ctx);
        let sink = sink.clone();
        handles.push(tokio::spawn(async move {
            execute(&item, &ctx, &sink).await;
        }));

        sleep(STAGGER_DELAY).await;
    }

    for handle in handles {
        if let Err(err) = handle.await {
            debug!(error = %err, "command task aborted");
        }
    }
}

/// Run work items one at a time, in index order. Exactly one child is ever
/// live in this mode, and finish order equals start order.
pub async fn run_sequential(items: Vec<WorkItem>, ctx: Arc<OrchestratorContext>, sink: OutputSink) {
    for item in &items {
        execute(item, &ctx, &sink).await;
    }
}
