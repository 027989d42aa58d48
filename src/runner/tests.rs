#![allow(clippy::expect_used)]

use std::path::PathBuf;
use std::sync::mpsc;

use super::*;
use crate::ui::LogLevel;

/// Child stand-in that records how often it was killed
#[derive(Default)]
struct FakeChild {
    kills: usize,
    finished: bool,
    exit: Option<ExitWait>,
}

impl ChildHandle for FakeChild {
    fn terminate(&mut self) {
        if !self.finished {
            self.finished = true;
            self.kills += 1;
        }
    }

    fn wait_for_exit(&mut self, _limit: Duration) -> ExitWait {
        match self.exit {
            Some(exit) => {
                self.finished = true;
                exit
            }
            None => ExitWait::StillRunning,
        }
    }
}

fn example_command() -> ExampleCommand {
    ExampleCommand {
        program: "webpack.js".to_string(),
        args: vec!["--config".to_string(), "webpack.config.js".to_string()],
        cwd: PathBuf::from("/examples/basic"),
    }
}

fn watch_events(
    events: Vec<OutputEvent>,
    child: &mut FakeChild,
    timeout: Duration,
) -> Result<(), ExampleError> {
    watch_events_with(&OutputPatterns::default(), events, child, timeout)
}

fn watch_events_with(
    patterns: &OutputPatterns,
    events: Vec<OutputEvent>,
    child: &mut FakeChild,
    timeout: Duration,
) -> Result<(), ExampleError> {
    let (tx, rx) = mpsc::channel();
    for event in events {
        tx.send(event).expect("send event");
    }

    let command = example_command();
    let opener = UrlOpener::default();
    let logger = Logger::silent();
    let session = Session {
        command: &command,
        patterns,
        opener: &opener,
        timeout,
        logger: &logger,
    };
    let verdict = session.watch(child, &rx);
    drop(tx);
    verdict
}

#[test]
fn test_success_sentinel_resolves_and_kills_once() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![
            OutputEvent::Stdout("Hash: 4f2a\nTime: 120ms".to_string()),
            OutputEvent::Stdout("webpack: Compiled successfully".to_string()),
            OutputEvent::Stdout("webpack: Compiled successfully".to_string()),
        ],
        &mut child,
        Duration::from_secs(5),
    );

    assert!(verdict.is_ok());
    assert_eq!(child.kills, 1);

    child.terminate();
    assert_eq!(child.kills, 1);
}

#[test]
fn test_configured_sentinel_replaces_default() {
    let patterns: OutputPatterns =
        serde_yaml::from_str("success_sentinels: ['compiled successfully in']")
            .expect("valid table");

    let mut child = FakeChild::default();
    let verdict = watch_events_with(
        &patterns,
        vec![OutputEvent::Stdout(
            "webpack 5.0.0 compiled successfully in 812 ms".to_string(),
        )],
        &mut child,
        Duration::from_secs(5),
    );
    assert!(verdict.is_ok());
    assert_eq!(child.kills, 1);

    let mut child = FakeChild::default();
    let verdict = watch_events_with(
        &patterns,
        vec![OutputEvent::Stdout("webpack: Compiled successfully".to_string())],
        &mut child,
        Duration::from_millis(100),
    );
    assert!(matches!(verdict, Err(ExampleError::Timeout { .. })));
    assert_eq!(child.kills, 1);
}

#[test]
fn test_error_chunk_rejects_with_compilation_error() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![
            OutputEvent::Stdout("Module build failed: Error: boom".to_string()),
            OutputEvent::Stdout("webpack: Compiled successfully".to_string()),
        ],
        &mut child,
        Duration::from_secs(5),
    );

    assert_eq!(
        verdict,
        Err(ExampleError::CompilationError {
            output: "Module build failed: Error: boom".to_string()
        })
    );
    assert_eq!(child.kills, 1);
}

#[test]
fn test_error_wins_over_sentinel_in_same_chunk() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![OutputEvent::Stdout(
            "ERROR in ./index.js\nwebpack: bundle is now VALID".to_string(),
        )],
        &mut child,
        Duration::from_secs(5),
    );
    assert!(matches!(
        verdict,
        Err(ExampleError::CompilationError { .. })
    ));
}

#[test]
fn test_stderr_is_fatal() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![
            OutputEvent::Stdout("Hash: 4f2a".to_string()),
            OutputEvent::Stderr("Cannot find module 'foo'".to_string()),
        ],
        &mut child,
        Duration::from_secs(5),
    );

    let err = verdict.expect_err("stderr fails the run");
    assert_eq!(
        err,
        ExampleError::ProcessError {
            command: "webpack.js --config webpack.config.js".to_string(),
            directory: PathBuf::from("/examples/basic"),
            output: "Cannot find module 'foo'".to_string(),
        }
    );
    assert_eq!(child.kills, 1);
}

#[test]
fn test_exit_without_verdict_is_undetermined() {
    let mut child = FakeChild {
        exit: Some(ExitWait::Exited(Some(0))),
        ..FakeChild::default()
    };
    let verdict = watch_events(
        vec![
            OutputEvent::Stdout("Hash: 4f2a".to_string()),
            OutputEvent::Closed,
            OutputEvent::Closed,
        ],
        &mut child,
        Duration::from_secs(5),
    );

    assert_eq!(verdict, Err(ExampleError::Undetermined { code: Some(0) }));
    assert_eq!(child.kills, 0);
}

#[test]
fn test_silent_child_times_out_and_is_killed() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![OutputEvent::Stdout("Hash: 4f2a".to_string())],
        &mut child,
        Duration::from_millis(50),
    );

    assert_eq!(
        verdict,
        Err(ExampleError::Timeout {
            after: Duration::from_millis(50)
        })
    );
    assert_eq!(child.kills, 1);
}

#[test]
fn test_closed_streams_but_running_child_times_out() {
    let mut child = FakeChild::default();
    let verdict = watch_events(
        vec![OutputEvent::Closed, OutputEvent::Closed],
        &mut child,
        Duration::from_millis(50),
    );
    assert!(matches!(verdict, Err(ExampleError::Timeout { .. })));
    assert_eq!(child.kills, 1);
}

#[test]
fn test_info_chunks_are_logged_at_debug() {
    let (tx, rx) = mpsc::channel();
    tx.send(OutputEvent::Stdout("Time: 120ms\n".to_string()))
        .expect("send");
    tx.send(OutputEvent::Stdout("webpack: bundle is now VALID".to_string()))
        .expect("send");

    let command = example_command();
    let patterns = OutputPatterns::default();
    let opener = UrlOpener::default();
    let logger = Logger::capture(LogLevel::Debug);
    let session = Session {
        command: &command,
        patterns: &patterns,
        opener: &opener,
        timeout: Duration::from_secs(5),
        logger: &logger,
    };

    let mut child = FakeChild::default();
    assert!(session.watch(&mut child, &rx).is_ok());
    assert_eq!(logger.lines(), vec!["[DEBUG] Time: 120ms"]);
}

#[cfg(unix)]
mod spawned {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::bundler::BundlerProfile;
    use crate::runner::command::README_FILENAME;

    /// Example directory whose README runs `script` through `sh`
    fn scripted_example(script: &str) -> (TempDir, PathBuf) {
        let temp = TempDir::new().expect("temp dir");
        let config = temp.path().join("webpack.config.js");
        fs::write(&config, "module.exports = {};").expect("write config");
        fs::write(temp.path().join("run.sh"), script).expect("write script");
        fs::write(
            temp.path().join(README_FILENAME),
            "# Example\n```\nsh ./run.sh\n```\n",
        )
        .expect("write readme");
        (temp, config)
    }

    fn run_with_timeout(config: &Path, timeout: Duration) -> Result<(), ExampleError> {
        let logger = Logger::silent();
        let runner = BundlerRunner::new(
            BundlerProfile::default(),
            Path::new("/nonexistent/node_modules"),
            timeout,
            UrlOpener::default(),
            &logger,
        );
        runner.run(config)
    }

    #[test]
    fn test_success_sentinel_stops_long_running_example() {
        let (_temp, config) =
            scripted_example("echo 'webpack: Compiled successfully'\nexec sleep 5\n");
        let started = Instant::now();
        assert!(run_with_timeout(&config, Duration::from_secs(4)).is_ok());
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn test_compilation_error_from_output() {
        let (_temp, config) = scripted_example("echo 'ERROR in ./src/index.js'\nexec sleep 5\n");
        let err = run_with_timeout(&config, Duration::from_secs(4)).expect_err("error output");
        assert!(matches!(err, ExampleError::CompilationError { .. }));
        assert!(err.output().is_some_and(|o| o.contains("ERROR in")));
    }

    #[test]
    fn test_stderr_output_is_process_error() {
        let (_temp, config) = scripted_example("echo 'boom' >&2\nexec sleep 5\n");
        let err = run_with_timeout(&config, Duration::from_secs(4)).expect_err("stderr");
        assert!(matches!(err, ExampleError::ProcessError { .. }));
    }

    #[test]
    fn test_early_exit_is_undetermined() {
        let (_temp, config) = scripted_example("echo 'Hash: 4f2a'\nexit 3\n");
        let err = run_with_timeout(&config, Duration::from_secs(4)).expect_err("no verdict");
        assert_eq!(err, ExampleError::Undetermined { code: Some(3) });
    }

    #[test]
    fn test_hanging_example_is_killed_at_timeout() {
        let (_temp, config) = scripted_example("exec sleep 5\n");
        let started = Instant::now();
        let err = run_with_timeout(&config, Duration::from_millis(300)).expect_err("timeout");
        assert!(matches!(err, ExampleError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_missing_bundler_is_spawn_failure() {
        let temp = TempDir::new().expect("temp dir");
        let config = temp.path().join("webpack.config.js");
        fs::write(&config, "module.exports = {};").expect("write config");

        let err = run_with_timeout(&config, Duration::from_secs(1)).expect_err("no bundler");
        match err {
            ExampleError::SpawnFailure { command, .. } => {
                assert!(command.starts_with("/nonexistent/node_modules/webpack/bin/webpack.js"));
            }
            other => panic!("expected SpawnFailure, got {other:?}"),
        }
    }
}
