//! Child process execution
//!
//! The navigator only talks to a [`ProcessLauncher`], so tests can record launches instead of
//! spawning anything. [`SystemLauncher`] is the real thing: the child inherits the terminal's
//! stdin, stdout and stderr and the caller blocks until it exits.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command as ProcessCommand, ExitStatus};

use log::{debug, info, warn};
use thiserror::Error;

use crate::interrupt::ChildGuard;

const SIGINT: i32 = 2;

/// Errors that prevent a child from running at all
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("{0} no longer exists")]
    NotFound(PathBuf),
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("unable to start {path}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Elevation(#[from] ElevationError),
}

/// Privilege escalation failed; the action is not run without it
#[derive(Error, Debug)]
pub enum ElevationError {
    #[error("elevation program `{program}` is not available: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("elevation with `{program}` was declined ({exit})")]
    Declined { program: String, exit: Exit },
}

/// How a child process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    Code(i32),
    Signal(i32),
    Unknown,
}

impl Exit {
    #[must_use]
    pub fn success(self) -> bool {
        self == Exit::Code(0)
    }

    /// The child was stopped with Ctrl-C
    #[must_use]
    pub fn interrupted(self) -> bool {
        self == Exit::Signal(SIGINT)
    }
}

impl From<ExitStatus> for Exit {
    fn from(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Exit::Code(code);
        }
        terminated_by_signal(status)
    }
}

#[cfg(unix)]
fn terminated_by_signal(status: ExitStatus) -> Exit {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(Exit::Unknown, Exit::Signal)
}

#[cfg(not(unix))]
fn terminated_by_signal(_status: ExitStatus) -> Exit {
    Exit::Unknown
}

impl fmt::Display for Exit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exit::Code(code) => write!(f, "exited with status {code}"),
            Exit::Signal(signal) => write!(f, "terminated by signal {signal}"),
            Exit::Unknown => write!(f, "terminated abnormally"),
        }
    }
}

/// A single request to run a menu action
#[derive(Debug, Clone, Copy)]
pub struct LaunchRequest<'a> {
    pub program: &'a Path,
    /// Positional arguments, in declaration order
    pub args: &'a [String],
    pub elevate: bool,
}

pub trait ProcessLauncher {
    /// Run the request to completion.
    ///
    /// A non-zero exit is reported through [`Exit`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns `LaunchError` if the child could not be started or elevation failed.
    fn launch(&mut self, request: &LaunchRequest<'_>) -> Result<Exit, LaunchError>;
}

impl<T: ProcessLauncher + ?Sized> ProcessLauncher for &mut T {
    fn launch(&mut self, request: &LaunchRequest<'_>) -> Result<Exit, LaunchError> {
        (**self).launch(request)
    }
}

/// The privilege-elevation wrapper used for `SUDO` actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Elevation {
    pub program: String,
    /// Arguments placed between the wrapper and the target file
    pub args: Vec<String>,
    /// Arguments for a credential check run before the launch; empty to skip it
    pub validate_args: Vec<String>,
}

impl Default for Elevation {
    fn default() -> Self {
        Elevation {
            program: "sudo".to_string(),
            args: vec!["-E".to_string()],
            validate_args: vec!["-v".to_string()],
        }
    }
}

impl Elevation {
    /// Use `program` with the standard `sudo`-style arguments
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Elevation {
            program: program.into(),
            ..Elevation::default()
        }
    }

    fn validate(&self) -> Result<(), ElevationError> {
        if self.validate_args.is_empty() {
            return Ok(());
        }
        debug!("Validating credentials with {}", self.program);
        let status = ProcessCommand::new(&self.program)
            .args(&self.validate_args)
            .status()
            .map_err(|source| ElevationError::Unavailable {
                program: self.program.clone(),
                source,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(ElevationError::Declined {
                program: self.program.clone(),
                exit: status.into(),
            })
        }
    }
}

/// Launches actions as real child processes
#[derive(Debug, Clone, Default)]
pub struct SystemLauncher {
    elevation: Elevation,
}

impl SystemLauncher {
    #[must_use]
    pub fn new(elevation: Elevation) -> Self {
        Self { elevation }
    }

    fn command(&self, request: &LaunchRequest<'_>) -> Result<ProcessCommand, ElevationError> {
        let mut command = if request.elevate {
            self.elevation.validate()?;
            let mut command = ProcessCommand::new(&self.elevation.program);
            command.args(&self.elevation.args).arg(request.program);
            command
        } else {
            ProcessCommand::new(request.program)
        };
        command.args(request.args);
        Ok(command)
    }
}

impl ProcessLauncher for SystemLauncher {
    fn launch(&mut self, request: &LaunchRequest<'_>) -> Result<Exit, LaunchError> {
        info!(
            "Launching {} with {} argument(s){}",
            request.program.display(),
            request.args.len(),
            if request.elevate { " (elevated)" } else { "" }
        );
        let _guard = ChildGuard::enter();
        let mut command = self.command(request)?;
        let status = command.status().map_err(|source| {
            if request.elevate && source.kind() == io::ErrorKind::NotFound {
                return LaunchError::Elevation(ElevationError::Unavailable {
                    program: self.elevation.program.clone(),
                    source,
                });
            }
            let path = request.program.to_path_buf();
            match source.kind() {
                io::ErrorKind::NotFound => LaunchError::NotFound(path),
                io::ErrorKind::PermissionDenied => LaunchError::PermissionDenied(path),
                _ => LaunchError::Spawn { path, source },
            }
        })?;
        let exit = Exit::from(status);
        if exit.interrupted() {
            info!("{} was interrupted", request.program.display());
        } else if !exit.success() {
            warn!("{} {exit}", request.program.display());
        }
        Ok(exit)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn passthrough() -> Elevation {
        Elevation {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), r#"exec "$0" "$@""#.to_string()],
            validate_args: vec!["-c".to_string(), "true".to_string()],
        }
    }

    #[test]
    fn test_exit_code_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "fail.sh", "exit 3");
        let exit = SystemLauncher::default()
            .launch(&LaunchRequest {
                program: &script,
                args: &[],
                elevate: false,
            })
            .unwrap();
        assert_eq!(exit, Exit::Code(3));
        assert!(!exit.success());
    }

    #[test]
    fn test_args_are_positional() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.txt");
        let script = write_script(
            dir.path(),
            "echo.sh",
            &format!(r#"printf '%s|' "$@" > '{}'"#, out.display()),
        );
        let args = vec!["first".to_string(), "two words".to_string()];
        let exit = SystemLauncher::new(passthrough())
            .launch(&LaunchRequest {
                program: &script,
                args: &args,
                elevate: true,
            })
            .unwrap();
        assert!(exit.success());
        assert_eq!(fs::read_to_string(out).unwrap(), "first|two words|");
    }

    #[test]
    fn test_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.sh");
        let result = SystemLauncher::default().launch(&LaunchRequest {
            program: &missing,
            args: &[],
            elevate: false,
        });
        match result {
            Err(LaunchError::NotFound(path)) => assert_eq!(path, missing),
            other => panic!("Expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn test_declined_elevation_is_not_downgraded() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("ran");
        let script = write_script(dir.path(), "root.sh", &format!("touch '{}'", marker.display()));
        let elevation = Elevation {
            validate_args: vec!["-c".to_string(), "exit 1".to_string()],
            ..passthrough()
        };
        let result = SystemLauncher::new(elevation).launch(&LaunchRequest {
            program: &script,
            args: &[],
            elevate: true,
        });
        assert!(matches!(
            result,
            Err(LaunchError::Elevation(ElevationError::Declined {
                exit: Exit::Code(1),
                ..
            }))
        ));
        assert!(!marker.exists());
    }

    #[test]
    fn test_unavailable_elevation_program() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "root.sh", "true");
        let result = SystemLauncher::new(Elevation::with_program("dirmenu-no-such-wrapper"))
            .launch(&LaunchRequest {
                program: &script,
                args: &[],
                elevate: true,
            });
        assert!(matches!(
            result,
            Err(LaunchError::Elevation(ElevationError::Unavailable { .. }))
        ));
    }

    #[test]
    fn test_file_without_exec_bit() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "plain.sh", "true");
        fs::set_permissions(&script, fs::Permissions::from_mode(0o644)).unwrap();
        let result = SystemLauncher::default().launch(&LaunchRequest {
            program: &script,
            args: &[],
            elevate: false,
        });
        match result {
            Err(LaunchError::PermissionDenied(path)) => assert_eq!(path, script),
            other => panic!("Expected PermissionDenied, got: {other:?}"),
        }
    }

    #[test]
    fn test_interrupted_child_leaves_caller_running() {
        let dir = tempfile::tempdir().unwrap();
        // Ctrl-C reaches the menu as well as the child
        let script = write_script(dir.path(), "int.sh", "kill -INT \"$PPID\"\nkill -INT $$");
        let exit = SystemLauncher::default()
            .launch(&LaunchRequest {
                program: &script,
                args: &[],
                elevate: false,
            })
            .unwrap();
        assert_eq!(exit, Exit::Signal(2));
        assert!(exit.interrupted());
        assert!(!Exit::Code(130).interrupted());
    }

    #[test]
    fn test_exit_display() {
        assert_eq!(Exit::Code(2).to_string(), "exited with status 2");
        assert_eq!(Exit::Signal(9).to_string(), "terminated by signal 9");
    }
}
