//! Graphviz invoked as a child process.
//!
//! The description is written to a temporary file and `dot -K<engine> -Tjson
//! <file>` is run on it. Three resources are held during a call, each by a
//! guard that releases it on drop:
//!
//! 1. the temporary input file, deleted by [`tempfile::NamedTempFile`],
//! 2. the child process, killed and reaped by [`ChildGuard`] unless it was
//!    already waited for,
//! 3. the captured output buffers.
//!
//! Locals drop in reverse declaration order, so every exit path releases
//! them exactly once, last acquired first.

use std::{
    io::{self, Read, Write},
    path::PathBuf,
    process::{Child, Command, ExitStatus, Stdio},
    thread,
};

use log::{debug, info, warn};
use tempfile::NamedTempFile;

use super::{Engine, EngineError, LayoutEngine};

const DEFAULT_PROGRAM: &str = "dot";

/// Runs the Graphviz command-line program.
///
/// # Examples
///
/// ```rust,no_run
/// use graphcanvas::engine::{Engine, GraphvizEngine, LayoutEngine};
///
/// let engine = GraphvizEngine::new().with_binary_dir("/opt/graphviz/bin");
/// let json = engine
///     .layout("digraph G { a -> b; }", LayoutEngine::Dot)
///     .expect("graphviz is installed");
/// assert!(json.contains("\"bb\""));
/// ```
#[derive(Debug, Clone)]
pub struct GraphvizEngine {
    program: PathBuf,
    binary_dir: Option<PathBuf>,
}

impl Default for GraphvizEngine {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            binary_dir: None,
        }
    }
}

impl GraphvizEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the program to run instead of `dot`.
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Resolves the program inside `dir` instead of through `PATH`.
    pub fn with_binary_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.binary_dir = Some(dir.into());
        self
    }

    /// The path that will be executed
    pub fn program_path(&self) -> PathBuf {
        match &self.binary_dir {
            Some(dir) => dir.join(&self.program),
            None => self.program.clone(),
        }
    }
}

impl Engine for GraphvizEngine {
    fn layout(&self, description: &str, engine: LayoutEngine) -> Result<String, EngineError> {
        let program = self.program_path();
        info!(program:% = program.display(), engine:% = engine; "Running Graphviz");

        let unavailable = |source: io::Error| EngineError::Unavailable {
            program: program.display().to_string(),
            source,
            description: description.to_string(),
        };

        let input = write_description(description).map_err(unavailable)?;

        let mut command = Command::new(&program);
        command
            .arg(format!("-K{engine}"))
            .arg("-Tjson")
            .arg(input.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = ChildGuard::spawn(&mut command).map_err(unavailable)?;
        let output = child.collect().map_err(unavailable)?;
        debug!(
            status:% = output.status,
            stdout_len = output.stdout.len(),
            stderr_len = output.stderr.len();
            "Graphviz finished"
        );

        classify(output, engine, description)
    }
}

/// Writes the description to a fresh temporary file.
fn write_description(description: &str) -> io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("graphcanvas-")
        .suffix(".dot")
        .tempfile()?;
    file.write_all(description.as_bytes())?;
    file.flush()?;
    Ok(file)
}

/// Owns a running child process until it has been reaped.
struct ChildGuard {
    child: Option<Child>,
}

impl ChildGuard {
    fn spawn(command: &mut Command) -> io::Result<Self> {
        Ok(Self {
            child: Some(command.spawn()?),
        })
    }

    /// Drains stdout and stderr, then waits for the process to exit.
    fn collect(&mut self) -> io::Result<CapturedOutput> {
        let Some(child) = self.child.as_mut() else {
            return Err(io::Error::other("child process already reaped"));
        };

        let stderr_reader = child.stderr.take().map(|mut stderr| {
            thread::spawn(move || {
                let mut buf = Vec::new();
                stderr.read_to_end(&mut buf).map(|_| buf)
            })
        });

        let mut stdout = Vec::new();
        if let Some(mut out) = child.stdout.take() {
            out.read_to_end(&mut stdout)?;
        }

        let stderr = match stderr_reader {
            Some(handle) => handle
                .join()
                .map_err(|_| io::Error::other("stderr reader panicked"))??,
            None => Vec::new(),
        };

        let status = child.wait()?;
        self.child = None;

        Ok(CapturedOutput {
            status,
            stdout,
            stderr,
        })
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            warn!(pid = child.id(); "Killing unreaped Graphviz process");
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

struct CapturedOutput {
    status: ExitStatus,
    stdout: Vec<u8>,
    stderr: Vec<u8>,
}

fn classify(
    output: CapturedOutput,
    engine: LayoutEngine,
    description: &str,
) -> Result<String, EngineError> {
    let diagnostics = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        let message = if diagnostics.is_empty() {
            format!("exited with {}", output.status)
        } else {
            diagnostics
        };
        return Err(classify_failure(message, engine, description));
    }

    if !diagnostics.is_empty() {
        warn!(diagnostics:% = diagnostics; "Graphviz reported warnings");
    }

    match String::from_utf8(output.stdout) {
        Ok(json) if !json.trim().is_empty() => Ok(json),
        Ok(_) => Err(EngineError::RenderFailed {
            message: String::from("empty output"),
            description: description.to_string(),
        }),
        Err(err) => Err(EngineError::RenderFailed {
            message: format!("output is not valid UTF-8: {err}"),
            description: description.to_string(),
        }),
    }
}

/// Maps Graphviz's diagnostics on a failed run to the failure kind.
fn classify_failure(message: String, engine: LayoutEngine, description: &str) -> EngineError {
    let description = description.to_string();
    if message.contains("syntax error") {
        EngineError::Unreadable {
            message,
            description,
        }
    } else if message.contains("Format:") {
        EngineError::RenderFailed {
            message,
            description,
        }
    } else {
        EngineError::LayoutFailed {
            engine,
            message,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    const DOT: &str = "digraph G { a -> b; }";

    #[test]
    fn test_program_path() {
        let engine = GraphvizEngine::new();
        assert_eq!(engine.program_path(), PathBuf::from("dot"));

        let engine = GraphvizEngine::new()
            .with_program("dot.exe")
            .with_binary_dir("/opt/gv");
        assert_eq!(engine.program_path(), PathBuf::from("/opt/gv/dot.exe"));
    }

    #[test]
    fn test_classify_syntax_error() {
        let err = classify_failure(
            "Error: /tmp/x.dot: syntax error in line 1 near '->'".into(),
            LayoutEngine::Dot,
            DOT,
        );
        assert!(matches!(err, EngineError::Unreadable { .. }));
        assert_eq!(err.description(), DOT);
    }

    #[test]
    fn test_classify_format_error() {
        let err = classify_failure(
            "Format: \"json\" not recognized. Use one of: svg png".into(),
            LayoutEngine::Dot,
            DOT,
        );
        assert!(matches!(err, EngineError::RenderFailed { .. }));
    }

    #[test]
    fn test_classify_layout_error() {
        let err = classify_failure(
            "Layout type: \"bogus\" not recognized.".into(),
            LayoutEngine::Osage,
            DOT,
        );
        match err {
            EngineError::LayoutFailed { engine, .. } => assert_eq!(engine, LayoutEngine::Osage),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let engine = GraphvizEngine::new().with_program("graphcanvas-no-such-program");
        let err = engine.layout(DOT, LayoutEngine::Dot).unwrap_err();
        assert!(matches!(err, EngineError::Unavailable { .. }));
        assert_eq!(err.description(), DOT);
    }

    #[test]
    fn test_input_file_removed_on_drop() {
        let file = write_description(DOT).unwrap();
        let path = file.path().to_path_buf();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), DOT);
        drop(file);
        assert!(!path.exists());
    }

    #[cfg(unix)]
    fn fake_program(dir: &Path, name: &str, body: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_fake_program_outcomes() {
        let dir = tempfile::tempdir().unwrap();
        fake_program(dir.path(), "ok", r#"echo '{"bb":"0,0,1,1"}'"#);
        fake_program(
            dir.path(),
            "broken",
            "echo 'Error: syntax error in line 1' >&2\nexit 1",
        );

        let ok = GraphvizEngine::new()
            .with_binary_dir(dir.path())
            .with_program("ok");
        let json = ok.layout(DOT, LayoutEngine::Neato).unwrap();
        assert!(json.contains("\"bb\""));

        let broken = GraphvizEngine::new()
            .with_binary_dir(dir.path())
            .with_program("broken");
        let err = broken.layout(DOT, LayoutEngine::Dot).unwrap_err();
        assert!(matches!(err, EngineError::Unreadable { .. }));
        assert!(err.message().unwrap().contains("syntax error"));
    }
}
