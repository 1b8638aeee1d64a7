//! Opening files in an editor or the desktop's default application.

use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::error::{AppError, Result};

/// Program used for "open with the default application".
pub const SYSTEM_OPENER: &str = "xdg-open";

/// Extensions that always go to the system opener.
const EXTERNAL_EXTENSIONS: &[&str] = &[".pdf"];

/// How a file should be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenPlan {
    /// Hand the file to the system opener and keep browsing.
    External { program: String },
    /// Suspend the UI and run the editor until it exits.
    Editor { program: String },
}

/// Decide between the editor and the system opener.
///
/// The system opener wins when `force_external` is set, for extensions in
/// [`EXTERNAL_EXTENSIONS`], or when there is no editor to run.
pub fn plan(path: &Path, force_external: bool, editor: Option<&str>) -> OpenPlan {
    let lossy = path.to_string_lossy();
    let always_external = EXTERNAL_EXTENSIONS.iter().any(|ext| lossy.ends_with(ext));
    match editor.filter(|e| !e.trim().is_empty()) {
        Some(program) if !force_external && !always_external => OpenPlan::Editor {
            program: program.to_string(),
        },
        _ => OpenPlan::External {
            program: SYSTEM_OPENER.to_string(),
        },
    }
}

/// Process creation, kept behind a trait so the suspend/resume sequencing
/// can be tested without spawning anything.
pub trait Launcher {
    /// Run `program path` attached to the terminal and wait for it.
    fn spawn_and_wait(&mut self, program: &str, path: &Path) -> Result<ExitStatus>;
    /// Start `program path` detached from the terminal without waiting.
    fn spawn_detached(&mut self, program: &str, path: &Path) -> Result<()>;
}

/// Switching the terminal out of and back into UI mode.
pub trait TerminalMode {
    fn suspend(&mut self) -> Result<()>;
    fn resume(&mut self) -> Result<()>;
}

/// [`Launcher`] backed by `std::process::Command`.
///
/// Detached children are kept so they can be reaped once they exit.
#[derive(Debug, Default)]
pub struct SystemLauncher {
    detached: Vec<Child>,
}

impl SystemLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    fn reap_finished(&mut self) {
        self.detached.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }
}

impl Launcher for SystemLauncher {
    fn spawn_and_wait(&mut self, program: &str, path: &Path) -> Result<ExitStatus> {
        Command::new(program)
            .arg(path)
            .status()
            .map_err(|source| AppError::Spawn {
                program: program.to_string(),
                source,
            })
    }

    fn spawn_detached(&mut self, program: &str, path: &Path) -> Result<()> {
        let mut command = Command::new(program);
        command
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        self.reap_finished();
        let child = command.spawn().map_err(|source| AppError::Spawn {
            program: program.to_string(),
            source,
        })?;
        self.detached.push(child);
        Ok(())
    }
}

/// Open `path` according to `plan`.
///
/// For the editor the terminal is suspended first and resumed afterwards on
/// every path, including a failed launch. Returns the editor's exit status,
/// or `None` for a detached open.
pub fn open(
    plan: &OpenPlan,
    path: &Path,
    terminal: &mut impl TerminalMode,
    launcher: &mut impl Launcher,
) -> Result<Option<ExitStatus>> {
    match plan {
        OpenPlan::External { program } => {
            launcher.spawn_detached(program, path)?;
            tracing::info!(program = %program, path = %path.display(), "opened externally");
            Ok(None)
        }
        OpenPlan::Editor { program } => {
            terminal.suspend()?;
            let status = launcher.spawn_and_wait(program, path);
            let resumed = terminal.resume();
            let status = status?;
            resumed?;
            if !status.success() {
                tracing::warn!(program = %program, %status, "editor exited with failure");
            }
            Ok(Some(status))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[derive(Default)]
    struct FakeTerminal {
        log: Vec<&'static str>,
        fail_suspend: bool,
    }

    impl TerminalMode for FakeTerminal {
        fn suspend(&mut self) -> Result<()> {
            if self.fail_suspend {
                return Err(AppError::Terminal("suspend failed".into()));
            }
            self.log.push("suspend");
            Ok(())
        }

        fn resume(&mut self) -> Result<()> {
            self.log.push("resume");
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeLauncher {
        waited: Vec<(String, PathBuf)>,
        detached: Vec<(String, PathBuf)>,
        fail: bool,
    }

    impl FakeLauncher {
        fn launch_error(program: &str) -> AppError {
            AppError::Spawn {
                program: program.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
            }
        }
    }

    fn exit_status(code: i32) -> ExitStatus {
        use std::os::unix::process::ExitStatusExt;
        ExitStatus::from_raw(code << 8)
    }

    impl Launcher for FakeLauncher {
        fn spawn_and_wait(&mut self, program: &str, path: &Path) -> Result<ExitStatus> {
            if self.fail {
                return Err(Self::launch_error(program));
            }
            self.waited.push((program.to_string(), path.to_path_buf()));
            Ok(exit_status(0))
        }

        fn spawn_detached(&mut self, program: &str, path: &Path) -> Result<()> {
            if self.fail {
                return Err(Self::launch_error(program));
            }
            self.detached.push((program.to_string(), path.to_path_buf()));
            Ok(())
        }
    }

    #[test]
    fn plan_prefers_editor() {
        let p = plan(Path::new("./src/main.rs"), false, Some("nvim"));
        assert_eq!(p, OpenPlan::Editor { program: "nvim".into() });
    }

    #[test]
    fn plan_external_when_forced() {
        let p = plan(Path::new("./notes.txt"), true, Some("nvim"));
        assert_eq!(p, OpenPlan::External { program: SYSTEM_OPENER.into() });
    }

    #[test]
    fn plan_pdf_always_external() {
        let p = plan(Path::new("./paper.pdf"), false, Some("vi"));
        assert_eq!(p, OpenPlan::External { program: SYSTEM_OPENER.into() });
    }

    #[test]
    fn plan_without_editor_falls_back_to_external() {
        assert_eq!(
            plan(Path::new("./a.txt"), false, None),
            OpenPlan::External { program: SYSTEM_OPENER.into() }
        );
        assert_eq!(
            plan(Path::new("./a.txt"), false, Some("  ")),
            OpenPlan::External { program: SYSTEM_OPENER.into() }
        );
    }

    #[test]
    fn editor_open_suspends_and_resumes() {
        let mut term = FakeTerminal::default();
        let mut launcher = FakeLauncher::default();
        let p = OpenPlan::Editor { program: "vi".into() };

        let status = open(&p, Path::new("./a.txt"), &mut term, &mut launcher).unwrap();
        assert!(status.unwrap().success());
        assert_eq!(term.log, vec!["suspend", "resume"]);
        assert_eq!(launcher.waited, vec![("vi".to_string(), PathBuf::from("./a.txt"))]);
    }

    #[test]
    fn editor_launch_failure_still_resumes() {
        let mut term = FakeTerminal::default();
        let mut launcher = FakeLauncher {
            fail: true,
            ..Default::default()
        };
        let p = OpenPlan::Editor { program: "missing-editor".into() };

        let err = open(&p, Path::new("./a.txt"), &mut term, &mut launcher).unwrap_err();
        assert!(matches!(err, AppError::Spawn { .. }));
        assert_eq!(term.log, vec!["suspend", "resume"]);
    }

    #[test]
    fn failed_suspend_skips_launch() {
        let mut term = FakeTerminal {
            fail_suspend: true,
            ..Default::default()
        };
        let mut launcher = FakeLauncher::default();
        let p = OpenPlan::Editor { program: "vi".into() };

        assert!(open(&p, Path::new("./a.txt"), &mut term, &mut launcher).is_err());
        assert!(launcher.waited.is_empty());
    }

    #[test]
    fn external_open_leaves_terminal_alone() {
        let mut term = FakeTerminal::default();
        let mut launcher = FakeLauncher::default();
        let p = OpenPlan::External { program: SYSTEM_OPENER.into() };

        let status = open(&p, Path::new("./doc.pdf"), &mut term, &mut launcher).unwrap();
        assert!(status.is_none());
        assert!(term.log.is_empty());
        assert_eq!(launcher.detached.len(), 1);
    }
}
