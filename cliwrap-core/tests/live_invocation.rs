//! Invocations against real binaries found on every Unix host
#![cfg(unix)]

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;

use cliwrap_core::{CliIdentity, Invocation, ProcessInvoker};
use tempfile::TempDir;

#[test]
fn test_version_is_trimmed() {
    let identity = CliIdentity::new("echo").with_version_argument("  cliwrap 1.0  ");
    let echo = ProcessInvoker::new(identity);
    assert_eq!(echo.version().unwrap(), "cliwrap 1.0");
}

#[test]
fn test_shell_and_argv_modes_agree_on_plain_commands() {
    let direct = ProcessInvoker::new(CliIdentity::new("echo"));
    let shelled = ProcessInvoker::new(CliIdentity::new("echo").with_shell(true));

    let args = ["hello", "world"];
    assert_eq!(direct.run(args).unwrap(), "hello world\n");
    assert_eq!(shelled.run(args).unwrap(), direct.run(args).unwrap());
}

#[test]
fn test_only_shell_mode_expands() {
    let direct = ProcessInvoker::new(CliIdentity::new("echo"));
    let shelled = ProcessInvoker::new(CliIdentity::new("echo").with_shell(true));

    assert_eq!(direct.run(["$((1+2))"]).unwrap(), "$((1+2))\n");
    assert_eq!(shelled.run(["$((1+2))"]).unwrap(), "3\n");
}

#[test]
fn test_stderr_is_merged_into_output() {
    let sh = ProcessInvoker::new(CliIdentity::new("sh"));
    let output = sh.run(["-c", "echo out; echo err >&2; echo again"]).unwrap();
    assert_eq!(output, "out\nerr\nagain\n");
}

#[test]
fn test_non_zero_exit_is_command_failed() {
    let sh = ProcessInvoker::new(CliIdentity::new("sh"));
    let err = sh.run(["-c", "echo boom >&2; exit 3"]).unwrap_err();

    assert!(err.is_command_failed());
    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(err.to_string(), "Unable to execute sh CLI, error=3");
}

#[test]
fn test_working_dir_is_applied() {
    let dir = TempDir::new().unwrap();
    let pwd = ProcessInvoker::new(CliIdentity::new("pwd"));

    let output = pwd
        .execute(&Invocation::new(Vec::<String>::new()).working_dir(dir.path()))
        .unwrap();

    assert_eq!(
        fs::canonicalize(output.trim()).unwrap(),
        fs::canonicalize(dir.path()).unwrap()
    );
}

#[test]
fn test_missing_binary_is_launch_error() {
    let cli = ProcessInvoker::new(CliIdentity::new("cliwrap-no-such-binary"));
    let err = cli.run(["--help"]).unwrap_err();

    assert!(err.is_launch());
    assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::NotFound);
}

#[test]
fn test_non_executable_binary_is_launch_error() {
    let dir = TempDir::new().unwrap();
    let script = dir.path().join("not-executable.sh");
    fs::write(&script, "#!/bin/sh\necho hi\n").unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();

    let cli = ProcessInvoker::new(CliIdentity::new(script.display().to_string()));
    let err = cli.run(Vec::<String>::new()).unwrap_err();

    assert!(err.is_launch());
    assert_eq!(err.io_error().unwrap().kind(), io::ErrorKind::PermissionDenied);
}

#[test]
fn test_missing_binary_through_shell_is_command_failed() {
    // The shell starts fine and reports "not found" through its exit code
    let cli = ProcessInvoker::new(CliIdentity::new("cliwrap-no-such-binary").with_shell(true));
    let err = cli.run(["--help"]).unwrap_err();

    assert!(err.is_command_failed());
    assert_eq!(err.exit_code(), Some(127));
}

#[test]
fn test_concurrent_invocations_are_independent() {
    let echo = ProcessInvoker::new(CliIdentity::new("echo"));

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let echo = &echo;
                scope.spawn(move || (i, echo.run([format!("call-{i}")]).unwrap()))
            })
            .collect();

        for handle in handles {
            let (i, output) = handle.join().unwrap();
            assert_eq!(output, format!("call-{i}\n"));
        }
    });
}
