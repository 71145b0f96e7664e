// tests/plan_engine.rs

use std::error::Error;
use std::fs;

use simplecmd::engine::run_plan;
use simplecmd_test_utils::builders::{CommandEntryBuilder, PlanBuilder};
use simplecmd_test_utils::{init_tracing, test_env, with_timeout};
use tempfile::tempdir;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn commands_run_sequentially_in_order() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let (env, _console) = test_env(dir.path());
    let log = dir.path().join("order.log");
    let log_str = log.to_string_lossy().into_owned();

    let plan = PlanBuilder::new()
        .with_default_workdir(dir.path())
        .with_command(
            CommandEntryBuilder::new("sh")
                .name("first")
                .arg("-c")
                .arg(&format!("sleep 0.05; echo first >> '{log_str}'"))
                .build(),
        )
        .with_command(
            CommandEntryBuilder::new("sh")
                .name("second")
                .arg("-c")
                .arg(&format!("echo second >> '{log_str}'"))
                .build(),
        )
        .build();

    let outcomes = with_timeout(run_plan(&plan, &env)).await;

    let names: Vec<&str> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["first", "second"]);
    assert!(outcomes.iter().all(|o| o.result.code == 0));
    assert_eq!(fs::read_to_string(&log)?, "first\nsecond\n");
    Ok(())
}

#[tokio::test]
async fn keep_going_false_stops_after_first_failure() -> TestResult {
    let dir = tempdir()?;
    let (env, _console) = test_env(dir.path());

    let plan = PlanBuilder::new()
        .keep_going(false)
        .with_default_workdir(dir.path())
        .with_command(CommandEntryBuilder::new("simplecmd-no-such-program").name("missing").build())
        .with_command(CommandEntryBuilder::new("true").name("never").build())
        .build();

    let outcomes = with_timeout(run_plan(&plan, &env)).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].name, "missing");
    assert_eq!(outcomes[0].result.code, -1);
    Ok(())
}

#[tokio::test]
async fn keep_going_runs_every_command() -> TestResult {
    let dir = tempdir()?;
    let (env, _console) = test_env(dir.path());

    let plan = PlanBuilder::new()
        .with_default_workdir(dir.path())
        .with_command(CommandEntryBuilder::new("false").build())
        .with_command(CommandEntryBuilder::new("true").build())
        .build();

    let outcomes = with_timeout(run_plan(&plan, &env)).await;

    let codes: Vec<i32> = outcomes.iter().map(|o| o.result.code).collect();
    assert_eq!(codes, [1, 0]);
    Ok(())
}
