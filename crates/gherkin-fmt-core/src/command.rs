use std::collections::BTreeMap;
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::sync::OnceLock;
use std::thread;

use regex::Regex;

use crate::error::{FormatError, FormatResult};

/// Two-state machine threading the "pending command" slot through a
/// transform: idle until a comment names a registered tag, armed until the
/// next eligible section consumes the command. Doc-string separators are not
/// eligible; the caller skips them, so a directive placed right before a
/// doc-string lands on the fenced content.
#[derive(Debug)]
pub struct CommandPipeline<'a> {
    registry: &'a BTreeMap<String, String>,
    pending: Option<String>,
}

impl<'a> CommandPipeline<'a> {
    pub fn new(registry: &'a BTreeMap<String, String>) -> Self {
        Self {
            registry,
            pending: None,
        }
    }

    /// React to a comment: arm when its text carries a registered `@tag`,
    /// otherwise fall back to idle. A comment never stacks on a previous
    /// arming; it always resets the slot.
    pub fn observe_comment(&mut self, text: &str) {
        self.pending = detect_tag(text).and_then(|tag| self.registry.get(tag)).cloned();
    }

    pub fn is_armed(&self) -> bool {
        self.pending.is_some()
    }

    /// Pipe `lines` through the pending command, if any, returning the
    /// replacement lines. The slot returns to idle regardless of outcome.
    /// Empty input short-circuits without spawning a process.
    pub fn apply(&mut self, lines: Vec<String>) -> FormatResult<Vec<String>> {
        match self.pending.take() {
            None => Ok(lines),
            Some(_) if lines.is_empty() => Ok(lines),
            Some(command) => run_command(&command, &lines),
        }
    }
}

/// First `@tag` occurrence in the text; any further occurrences are ignored.
fn detect_tag(text: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new("@([a-zA-Z0-9]+)").expect("pattern is valid"));

    pattern
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|group| group.as_str())
}

/// Run `command` under `sh -c` with `lines` on stdin, returning its combined
/// stdout and stderr split back into lines: all of stdout first, then all of
/// stderr, not interleaved by arrival. Non-zero exit fails with the combined
/// output as the error message.
fn run_command(command: &str, lines: &[String]) -> FormatResult<Vec<String>> {
    let mut child = Command::new("sh")
        .arg("-c")
        .arg(command)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    // Feed stdin from its own thread while this one drains stdout/stderr.
    // A command that emits as it reads would otherwise fill its stdout pipe
    // on blocks larger than the pipe buffer and stall the write forever.
    // Dropping the handle at the end of the thread closes the pipe, so the
    // command sees end-of-input.
    let writer = child.stdin.take().map(|mut stdin| {
        let input = lines.join("\n");
        thread::spawn(move || {
            // A command may exit without draining stdin; its exit status
            // still decides the outcome.
            match stdin.write_all(input.as_bytes()) {
                Err(err) if err.kind() != io::ErrorKind::BrokenPipe => Err(err),
                _ => Ok(()),
            }
        })
    });

    let output = child.wait_with_output()?;

    if let Some(writer) = writer {
        writer
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "stdin writer panicked"))??;
    }

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    let combined = combined.trim_end_matches('\n').to_string();

    if !output.status.success() {
        return Err(FormatError::CommandFailed { output: combined });
    }

    Ok(combined.split('\n').map(str::to_string).collect())
}
