use std::sync::Arc;

use parseq::context::{OrchestratorContext, RunMode, RunSettings};
use parseq::exec::execute;
use parseq::output::OutputSink;
use parseq::resolve::WorkItem;
use parseq::sched::{run_parallel, run_sequential};

fn work(command: &str, tag: &str, index: usize) -> WorkItem {
    WorkItem {
        command: command.to_string(),
        tag: tag.to_string(),
        index,
    }
}

fn context(mode: RunMode) -> Arc<OrchestratorContext> {
    Arc::new(OrchestratorContext::new(mode, RunSettings::default()))
}

fn position(lines: &[String], needle: &str) -> usize {
    lines
        .iter()
        .position(|line| line.contains(needle))
        .unwrap_or_else(|| panic!("no line containing {needle:?} in {lines:?}"))
}

#[tokio::test]
async fn direct_command_output_is_tagged() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    execute(&work("echo test output", "test", 0), &ctx, &sink).await;

    let lines = lines.lock().unwrap();
    assert!(lines.contains(&"[test] Executing directly: echo test output".to_string()));
    assert!(lines.contains(&"[test:out] test output".to_string()));
    assert!(lines.contains(&"[test] Command completed successfully".to_string()));
}

#[tokio::test]
async fn shell_command_goes_through_the_shell() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    execute(&work("echo one | tr a-z A-Z", "up", 0), &ctx, &sink).await;

    let lines = lines.lock().unwrap();
    assert!(lines.contains(&"[up] Executing with shell: echo one | tr a-z A-Z".to_string()));
    assert!(lines.contains(&"[up:out] ONE".to_string()));
}

#[tokio::test]
async fn nonzero_exit_is_a_warning_not_an_abort() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    let items = vec![work("sh -c \"exit 3\"", "fail", 0), work("echo next", "2", 1)];
    run_sequential(items, Arc::clone(&ctx), sink).await;

    let lines = lines.lock().unwrap();
    assert!(lines.contains(&"[fail] Command exited with status: 3".to_string()));
    // The failure does not stop the run.
    assert!(lines.contains(&"[2:out] next".to_string()));
}

#[tokio::test]
async fn spawn_failure_is_reported_and_non_fatal() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    let items = vec![
        work("definitely-not-a-real-binary-xyz", "missing", 0),
        work("echo still here", "2", 1),
    ];
    run_sequential(items, Arc::clone(&ctx), sink).await;

    let lines = lines.lock().unwrap();
    assert!(
        lines
            .iter()
            .any(|line| line.starts_with("[missing] Error starting command:"))
    );
    assert!(lines.contains(&"[2:out] still here".to_string()));
}

#[tokio::test]
async fn empty_command_is_reported() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    execute(&work("", "empty", 0), &ctx, &sink).await;

    let lines = lines.lock().unwrap();
    assert!(lines.contains(&"[empty] Empty command".to_string()));
}

#[tokio::test]
async fn sequential_output_preserves_command_order() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    let items = vec![work("echo first", "1", 0), work("echo second", "2", 1)];
    run_sequential(items, Arc::clone(&ctx), sink).await;

    let lines = lines.lock().unwrap();
    let first_done = position(&lines, "[1] Command completed successfully");
    let second_started = position(&lines, "[2] Executing directly");
    assert!(first_done < second_started);
}

#[tokio::test]
async fn parallel_commands_start_in_argument_order() {
    let (sink, lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Parallel);

    let items = vec![
        work("sleep 0.3 && echo slow done", "slow", 0),
        work("echo quick done", "quick", 1),
    ];
    run_parallel(items, Arc::clone(&ctx), sink).await;

    let lines = lines.lock().unwrap();
    // Starts follow index order thanks to the staggered launch.
    let slow_start = position(&lines, "[slow] Executing");
    let quick_start = position(&lines, "[quick] Executing");
    assert!(slow_start < quick_start);

    // Completion order follows real duration, not start order.
    let quick_done = position(&lines, "[quick] Command completed successfully");
    let slow_done = position(&lines, "[slow] Command completed successfully");
    assert!(quick_done < slow_done);
}

#[tokio::test]
async fn registry_is_empty_after_a_run() {
    let (sink, _lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Parallel);

    let items = vec![work("echo a", "1", 0), work("echo b", "2", 1)];
    run_parallel(items, Arc::clone(&ctx), sink).await;

    assert!(ctx.live_processes().is_empty());
    assert_eq!(ctx.current_sequential(), None);
}

#[cfg(unix)]
#[tokio::test]
async fn env_overrides_are_announced_and_visible() {
    let (sink, lines) = OutputSink::memory(false);
    let settings = RunSettings {
        force_shell: false,
        env_overrides: vec![("PARSEQ_TEST_VALUE".to_string(), "from-parseq".to_string())],
    };
    let ctx = Arc::new(OrchestratorContext::new(RunMode::Sequential, settings));

    execute(&work("echo $PARSEQ_TEST_VALUE", "env", 0), &ctx, &sink).await;

    let lines = lines.lock().unwrap();
    assert!(
        lines.contains(&"[env] With additional environment: PARSEQ_TEST_VALUE=from-parseq".to_string())
    );
    assert!(lines.contains(&"[env:out] from-parseq".to_string()));
}

#[cfg(unix)]
#[tokio::test]
async fn shell_redirection_writes_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let (sink, _lines) = OutputSink::memory(false);
    let ctx = context(RunMode::Sequential);

    let command = format!("echo hi > {}", path.display());
    execute(&work(&command, "redir", 0), &ctx, &sink).await;

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written.trim(), "hi");
}
