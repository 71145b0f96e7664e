// tests/run_redirect.rs

mod common;

use std::error::Error;
use std::fs;

use simplecmd::IoStrategy;
use simplecmd::options::{Options, Progress};
use simplecmd_test_utils::{init_tracing, test_env, with_timeout};
use tempfile::tempdir;

use common::sh;

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn direct_redirect_captures_stdout_and_stderr_in_emission_order() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let (env, console) = test_env(dir.path());
    let out = dir.path().join("out.log");

    let mut cmd = sh(
        "printf 'one\\n'; printf 'two\\n' >&2; printf 'three\\n'; printf 'four\\n' >&2",
        dir.path(),
        &env,
    );
    cmd.set_options(Some(Options::default().with_redirect(&out)));
    assert_eq!(cmd.strategy(), IoStrategy::DirectRedirect);

    let result = with_timeout(cmd.run()).await;

    assert_eq!(result.code, 0);
    assert_eq!(result.chunks, 0, "direct redirect never routes chunks");
    assert_eq!(fs::read_to_string(&out)?, "one\ntwo\nthree\nfour\n");
    assert!(console.events().is_empty());
    Ok(())
}

#[tokio::test]
async fn redirect_truncates_previous_contents() -> TestResult {
    let dir = tempdir()?;
    let (env, _console) = test_env(dir.path());
    let out = dir.path().join("out.log");
    fs::write(&out, "stale contents that are longer than the new output\n")?;

    let mut cmd = sh("printf new", dir.path(), &env);
    cmd.set_options(Some(Options::default().with_redirect(&out)));
    let result = with_timeout(cmd.run()).await;

    assert_eq!(result.code, 0);
    assert_eq!(fs::read_to_string(&out)?, "new");
    Ok(())
}

#[tokio::test]
async fn redirect_with_progress_true_logs_invocation_and_capture_file() -> TestResult {
    let dir = tempdir()?;
    let (env, console) = test_env(dir.path());
    let out = dir.path().join("progress.log");

    let mut cmd = sh("printf data", dir.path(), &env);
    cmd.set_options(Some(
        Options::default()
            .with_redirect(&out)
            .with_progress(Progress::On),
    ));
    assert_eq!(cmd.strategy(), IoStrategy::DirectRedirect);

    let result = with_timeout(cmd.run()).await;
    assert_eq!(result.code, 0);
    assert_eq!(fs::read_to_string(&out)?, "data");

    let lines = console.lines();
    assert_eq!(lines.len(), 3, "{lines:?}");
    assert!(lines[0].starts_with("From "));
    assert!(lines[0].ends_with("invoking command:\nsh -c printf data"));
    assert!(lines[1].starts_with("Command output will be captured in "));
    assert!(lines[1].ends_with("progress.log"));
    assert_eq!(lines[2], "Done: sh -c printf data");
    assert!(console.raw_output().is_empty());
    Ok(())
}

#[tokio::test]
async fn unopenable_redirect_is_logged_and_output_dropped() -> TestResult {
    init_tracing();
    let dir = tempdir()?;
    let (env, console) = test_env(dir.path());
    let out = dir.path().join("missing-dir").join("out.log");

    let mut cmd = sh("printf lost", dir.path(), &env);
    cmd.set_options(Some(Options::default().with_redirect(&out)));

    let result = with_timeout(cmd.run()).await;

    assert_eq!(result.code, 0, "the run proceeds without its capture file");
    assert!(!out.exists());
    let lines = console.lines();
    assert_eq!(lines.len(), 1, "{lines:?}");
    assert!(lines[0].starts_with("Opening capture file"));
    assert!(console.raw_output().is_empty(), "output is dropped, not echoed");
    Ok(())
}

#[tokio::test]
async fn relative_redirect_resolves_against_current_directory() -> TestResult {
    let dir = tempdir()?;
    let (env, _console) = test_env(dir.path());
    let name = format!("simplecmd-relative-{}.log", std::process::id());

    let mut cmd = sh("printf rel", dir.path(), &env);
    cmd.set_options(Some(Options::default().with_redirect(&name)));
    let result = with_timeout(cmd.run()).await;

    let expected = std::env::current_dir()?.join(&name);
    let contents = fs::read_to_string(&expected);
    let _ = fs::remove_file(&expected);

    assert_eq!(result.code, 0);
    assert_eq!(contents?, "rel");
    assert!(!dir.path().join(&name).exists());
    Ok(())
}
