//! Terminal presentation shell
//!
//! Reads commands line by line, maps them onto the reconciler's entry points
//! and prints the resulting view. The initial-load rule is re-evaluated at
//! startup and after every command.

pub mod command;
pub mod error;
pub mod render;

use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use txnview_core::error::{DefaultErrorLogger, ErrorContext, ErrorLogger};
use txnview_core::surface::{self, Selection};
use txnview_core::Reconciler;

pub use command::{Command, ALL_KEYWORD, HELP};
pub use error::{ShellError, ShellResult};
pub use render::Renderer;

const PROMPT: &str = "> ";

/// Whether the session loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Shell<W: Write> {
    reconciler: Reconciler,
    renderer: Renderer,
    out: W,
    interactive: bool,
    errors: DefaultErrorLogger,
}

impl<W: Write> Shell<W> {
    pub fn new(reconciler: Reconciler, renderer: Renderer, out: W) -> Self {
        Self {
            reconciler,
            renderer,
            out,
            interactive: false,
            errors: DefaultErrorLogger,
        }
    }

    /// Interactive sessions print a prompt; scripted ones echo each command
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Run until `quit` or end of input
    pub async fn run<R: AsyncBufRead + Unpin>(&mut self, input: R) -> ShellResult<()> {
        let watcher = self.watch_state();
        let result = self.session(input).await;
        watcher.abort();
        result
    }

    async fn session<R: AsyncBufRead + Unpin>(&mut self, input: R) -> ShellResult<()> {
        let mut lines = input.lines();

        self.after_command().await?;
        loop {
            if self.interactive {
                write!(self.out, "{}", PROMPT)?;
                self.out.flush()?;
            }

            let Some(line) = lines.next_line().await? else {
                break;
            };
            if !self.interactive && !line.trim().is_empty() {
                writeln!(self.out, "{}{}", PROMPT, line.trim())?;
            }

            let flow = match Command::parse(&line) {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => Ok(Flow::Continue),
                Err(e) => Err(e),
            };

            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) if e.is_recoverable() => self.report(&e, &line)?,
                Err(e) => return Err(e),
            }

            self.after_command().await?;
        }

        log::info!(target: "txnview::shell", "Session ended");
        Ok(())
    }

    /// Run one command and print its result
    pub async fn execute(&mut self, command: Command) -> ShellResult<Flow> {
        log::debug!(target: "txnview::shell", "Executing {:?}", command);
        match command {
            Command::Help => writeln!(self.out, "{}", HELP)?,
            Command::Show => self.show()?,
            Command::Employees => {
                let view = surface::selector(&self.reconciler.snapshot());
                writeln!(self.out, "{}", self.renderer.selector_options(&view))?;
            }
            Command::Select(id) => {
                let selection = self.resolve_selection(id)?;
                surface::dispatch(&self.reconciler, selection).await?;
                self.show()?;
            }
            Command::More => {
                if surface::request_more(&self.reconciler).await? {
                    self.show()?;
                } else {
                    writeln!(self.out, "Nothing more to load")?;
                }
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Only ids the selector currently offers can be chosen. An employee
    /// whose id is `all` shadows the keyword.
    fn resolve_selection(&self, id: Option<String>) -> ShellResult<Selection> {
        let Some(id) = id else {
            return Ok(Selection::AllEmployees);
        };

        let view = surface::selector(&self.reconciler.snapshot());
        if let Some(option) = view.find(&id).filter(|option| !option.value.is_empty()) {
            return Ok(Selection::from_value(&option.value));
        }
        if id.eq_ignore_ascii_case(ALL_KEYWORD) {
            return Ok(Selection::AllEmployees);
        }
        if view.options.is_empty() {
            return Err(ShellError::DirectoryNotLoaded);
        }
        Err(ShellError::UnknownEmployee { id })
    }

    fn show(&mut self) -> ShellResult<()> {
        let screen = self.renderer.screen(&self.reconciler.snapshot());
        writeln!(self.out, "{}", screen)?;
        Ok(())
    }

    /// Re-evaluate the initial-load rule and show the view if it fired
    async fn after_command(&mut self) -> ShellResult<()> {
        match self.reconciler.ensure_initial_load().await {
            Ok(true) => self.show(),
            Ok(false) => Ok(()),
            Err(e) => self.report(&ShellError::Core(e), "initial load"),
        }
    }

    fn report(&mut self, error: &ShellError, input: &str) -> ShellResult<()> {
        let context = ErrorContext::new("shell command").with_data("input", input.trim().into());

        match error {
            ShellError::Core(core) => {
                self.errors.log_error(core, &context);
                writeln!(self.out, "{}", core.to_details())?;
            }
            other => {
                self.errors.log_warning(&other.to_string(), &context);
                writeln!(self.out, "error: {}", other)?;
            }
        }
        Ok(())
    }

    /// Log every published view state
    fn watch_state(&self) -> JoinHandle<()> {
        let mut rx = self.reconciler.subscribe();
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let state = rx.borrow_and_update().clone();
                log::trace!(
                    target: "txnview::shell",
                    "View changed: mode={} loading={} generation={} displayed={:?}",
                    state.mode,
                    state.is_loading,
                    state.generation,
                    state.displayed().map(|list| list.len())
                );
            }
        })
    }
}
