//! Terminal front end for the pipeline's user interactions.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use apphost::builder::ArtifactResult;
use apphost::ops::{BusyToken, FileFilter, Interaction};
use apphost::util::shell::{format_duration, Busy, Status};
use apphost::util::Shell;

/// Answers prompts on stdin and reports through the [`Shell`].
///
/// Without a terminal on stdin every question is answered with the
/// non-destructive choice.
pub struct TerminalInteraction<'a> {
    shell: &'a Shell,
    assume_yes: bool,
    save_to: Option<PathBuf>,
    next_token: Cell<u64>,
    busy: RefCell<HashMap<u64, Busy>>,
}

impl<'a> TerminalInteraction<'a> {
    pub fn new(shell: &'a Shell) -> Self {
        TerminalInteraction {
            shell,
            assume_yes: false,
            save_to: None,
            next_token: Cell::new(0),
            busy: RefCell::new(HashMap::new()),
        }
    }

    /// Confirm every question without asking.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    /// Answer save offers with `path`.
    pub fn save_to(mut self, path: Option<PathBuf>) -> Self {
        self.save_to = path;
        self
    }

    fn interactive(&self) -> bool {
        !self.shell.is_json() && io::stdin().is_terminal()
    }

    fn prompt(&self, question: &str) -> Option<String> {
        eprint!("{} ", question);
        io::stderr().flush().ok()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line).ok()?;
        Some(line.trim().to_string())
    }
}

impl Interaction for TerminalInteraction<'_> {
    fn confirm(&self, title: &str, message: &str) -> bool {
        if self.assume_yes {
            tracing::debug!("{}: assuming yes", title);
            return true;
        }
        if !self.interactive() {
            self.shell
                .warn(format!("{}: no terminal to ask, pass --yes to confirm", title));
            return false;
        }

        self.shell.status(Status::Warning, title);
        eprintln!("{}", message);
        matches!(
            self.prompt("Continue? [y/N]").as_deref(),
            Some("y" | "Y" | "yes" | "Yes")
        )
    }

    fn notify(&self, title: &str, message: &str) {
        let status = match title {
            t if t.ends_with("Succeeded") => Status::Finished,
            t if t.ends_with("Failed") => Status::Error,
            t if t.ends_with("Cancelled") || t.ends_with("Missing") => Status::Warning,
            _ => Status::Info,
        };
        self.shell.status(status, title);
        if !self.shell.is_quiet() || status == Status::Error {
            for line in message.lines() {
                self.shell.status(Status::Info, line);
            }
        }
    }

    fn pick_file(&self, filter: &FileFilter) -> Option<PathBuf> {
        if !self.interactive() {
            return None;
        }
        let answer = self.prompt(&format!(
            "Path to the {} ({}), empty to cancel:",
            filter.description,
            filter.extensions.join(", ")
        ))?;
        (!answer.is_empty()).then(|| PathBuf::from(answer))
    }

    fn show_busy(&self, message: &str) -> BusyToken {
        let id = self.next_token.get() + 1;
        self.next_token.set(id);
        self.busy.borrow_mut().insert(id, self.shell.busy(message));
        BusyToken(id)
    }

    fn hide_busy(&self, token: BusyToken) {
        if let Some(busy) = self.busy.borrow_mut().remove(&token.0) {
            let message = busy.message().to_string();
            let elapsed = busy.finish();
            tracing::debug!("{} took {}", message, format_duration(elapsed));
        }
    }

    fn choose_save_path(&self, artifact: &ArtifactResult) -> Option<PathBuf> {
        if self.save_to.is_none() {
            self.shell.status(
                Status::Skipped,
                format!(
                    "saving {} (pass --save-to to copy it)",
                    artifact.file_name().unwrap_or("artifact")
                ),
            );
        }
        self.save_to.clone()
    }
}
