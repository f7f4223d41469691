//! Out-of-process tool provider
//!
//! Runs an executable with the call's arguments and copies the captured
//! stdout/stderr into the runner's buffers. The child gets a null stdin so a
//! tool waiting for input fails instead of hanging the build.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anvil_domain::ToolProvider;
use tracing::debug;

/// Provider backed by an external program
#[derive(Debug, Clone)]
pub struct ProcessProvider {
    program: PathBuf,
    leading_args: Vec<OsString>,
    working_dir: Option<PathBuf>,
}

impl ProcessProvider {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            leading_args: Vec::new(),
            working_dir: None,
        }
    }

    /// Run `artifact` through `launcher`, e.g. `["java", "-jar"]`
    ///
    /// An empty launcher executes the artifact directly.
    pub fn launched(launcher: &[String], artifact: &Path) -> Self {
        match launcher.split_first() {
            Some((program, rest)) => {
                let mut leading: Vec<OsString> = rest.iter().map(OsString::from).collect();
                leading.push(artifact.as_os_str().to_owned());
                Self::new(program).with_leading_args(leading)
            }
            None => Self::new(artifact),
        }
    }

    /// Arguments placed before the call's own arguments
    pub fn with_leading_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.leading_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn command(&self, args: &[String]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading_args)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl ToolProvider for ProcessProvider {
    fn run(&self, out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32 {
        let output = match self.command(args).output() {
            Ok(output) => output,
            Err(e) => {
                let _ = writeln!(err, "Failed to spawn {}: {}", self.program.display(), e);
                return -1;
            }
        };

        let _ = out.write_all(&output.stdout);
        let _ = err.write_all(&output.stderr);

        // Killed by a signal: no exit code
        let exit_code = output.status.code().unwrap_or(-1);
        debug!(program = %self.program.display(), exit_code, "Process exited");
        exit_code
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn run(provider: &ProcessProvider, args: &[&str]) -> (i32, String, String) {
        let args: Vec<String> = args.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        let mut err = Vec::new();
        let code = provider.run(&mut out, &mut err, &args);
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn test_captures_streams_and_exit_code() {
        let provider = ProcessProvider::new("sh");
        let (code, out, err) = run(&provider, &["-c", "echo hello; echo oops >&2; exit 3"]);
        assert_eq!(code, 3);
        assert_eq!(out, "hello\n");
        assert_eq!(err, "oops\n");
    }

    #[test]
    fn test_leading_args_come_first() {
        let provider = ProcessProvider::new("sh").with_leading_args(["-c", "echo \"$0 $1\""]);
        let (code, out, _) = run(&provider, &["first", "second"]);
        assert_eq!(code, 0);
        assert_eq!(out, "first second\n");
    }

    #[test]
    fn test_working_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let provider = ProcessProvider::new("pwd").in_dir(dir.path());
        let (_, out, _) = run(&provider, &[]);
        let reported = std::fs::canonicalize(out.trim()).unwrap();
        assert_eq!(reported, std::fs::canonicalize(dir.path()).unwrap());
    }

    #[test]
    fn test_missing_program() {
        let provider = ProcessProvider::new("/nonexistent/anvil-tool");
        let (code, out, err) = run(&provider, &[]);
        assert_eq!(code, -1);
        assert!(out.is_empty());
        assert!(err.contains("Failed to spawn"));
    }

    #[test]
    fn test_launcher_prefix() {
        let provider = ProcessProvider::launched(
            &["sh".to_string()],
            Path::new("/dev/null"),
        );
        assert_eq!(provider.program(), Path::new("sh"));
        let (code, _, _) = run(&provider, &[]);
        assert_eq!(code, 0);

        let direct = ProcessProvider::launched(&[], Path::new("/opt/tool"));
        assert_eq!(direct.program(), Path::new("/opt/tool"));
    }
}
