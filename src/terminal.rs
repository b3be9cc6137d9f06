//! Terminal session: input line, history, working directory and scrollback.
//!
//! A submission runs in three phases so that no session borrow is held across an await:
//!
//! 1. [`TerminalSession::begin`] echoes the prompt line, records history and either finishes the
//!    command locally or hands back a [`RemoteOp`].
//! 2. [`RemoteOp::run`] talks to the file client or command dispatcher.
//! 3. [`TerminalSession::finish`] renders the outcome into the scrollback.
//!
//! Multi-line replies are revealed in batches by [`TerminalSession::tick`]. New submissions are
//! rejected until the previous command has resolved and its playback has completed.

use crate::backend::demo_listing;
use crate::client::{CommandDispatcher, CommandResponse, EntryKind, FileClient, FileEntry};
use crate::config::Config;
use crate::counter::CommandCounter;
use crate::error::{ClientError, SubmitRejected, TerminalError, OFFLINE_MESSAGE};
use crate::path;
use crate::registry::CommandRegistry;
use serde::Serialize;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineKind {
    User,
    System,
    Response,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Line {
    #[serde(rename = "type")]
    pub kind: LineKind,
    pub content: String,
}

impl Line {
    pub fn new(kind: LineKind, content: impl Into<String>) -> Self {
        Line {
            kind,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(LineKind::System, content)
    }

    pub fn response(content: impl Into<String>) -> Self {
        Self::new(LineKind::Response, content)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(LineKind::Error, content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    AwaitingResponse,
    TypingOut,
}

/// Work that needs the backend. Paths are already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    List { path: String },
    ChangeDir { arg: String, path: String },
    Read { path: String },
    Create { path: String, kind: EntryKind },
    Write { path: String, content: String },
    Delete { path: String },
    Copy { src: String, dst: String },
    Move { src: String, dst: String },
    Forward { command: String },
}

/// Successful result of a [`RemoteOp`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Listing(Vec<FileEntry>),
    Entered(String),
    Content(String),
    /// Confirmation line for a mutating file operation.
    Confirmed(String),
    Reply(CommandResponse),
}

impl RemoteOp {
    pub async fn run<F, D>(&self, files: &F, dispatcher: &D) -> Result<Outcome, ClientError>
    where
        F: FileClient,
        D: CommandDispatcher,
    {
        let outcome = match self {
            RemoteOp::List { path } => Outcome::Listing(files.list(path).await?),
            RemoteOp::ChangeDir { path, .. } => {
                files.list(path).await?;
                Outcome::Entered(path.clone())
            }
            RemoteOp::Read { path } => Outcome::Content(files.read(path).await?),
            RemoteOp::Create { path, kind } => {
                files.create(path, *kind).await?;
                Outcome::Confirmed(match kind {
                    EntryKind::File => format!("✓ Created: {}", path),
                    EntryKind::Folder => format!("✓ Created folder: {}", path),
                })
            }
            RemoteOp::Write { path, content } => {
                files.write(path, content).await?;
                Outcome::Confirmed(format!("✓ Wrote to {}", path))
            }
            RemoteOp::Delete { path } => {
                files.delete(path).await?;
                Outcome::Confirmed(format!("✗ Deleted: {}", path))
            }
            RemoteOp::Copy { src, dst } => {
                files.copy(src, dst).await?;
                Outcome::Confirmed(format!("✓ Copied {} → {}", src, dst))
            }
            RemoteOp::Move { src, dst } => {
                files.rename(src, dst).await?;
                Outcome::Confirmed(format!("✓ Moved {} → {}", src, dst))
            }
            RemoteOp::Forward { command } => Outcome::Reply(dispatcher.command(command).await?),
        };
        Ok(outcome)
    }
}

/// Result of [`TerminalSession::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Handled locally, the session is ready again.
    Done,
    /// Waiting for the backend; call [`TerminalSession::finish`] with the result.
    Remote(RemoteOp),
}

struct Playback {
    lines: Vec<String>,
    next: usize,
}

pub struct TerminalSession {
    input: String,
    hint: String,
    history: VecDeque<String>,
    /// Steps back from the newest history entry, `None` while editing live input.
    history_index: Option<usize>,
    cwd: String,
    scrollback: Vec<Line>,
    state: SessionState,
    playback: Option<Playback>,
    counter: Rc<dyn CommandCounter>,
    registry: CommandRegistry,
    history_cap: usize,
    batch: usize,
    fallback_listing: bool,
}

impl TerminalSession {
    pub fn new(config: &Config, counter: Rc<dyn CommandCounter>) -> Self {
        TerminalSession {
            input: String::new(),
            hint: String::new(),
            history: VecDeque::new(),
            history_index: None,
            cwd: "/".into(),
            scrollback: Vec::new(),
            state: SessionState::Idle,
            playback: None,
            counter,
            registry: CommandRegistry::new(),
            history_cap: config.history_cap.max(1),
            batch: config.typewriter_batch.max(1),
            fallback_listing: config.fallback_listing,
        }
    }

    pub fn prompt(&self) -> String {
        if self.cwd == "/" {
            "user@cyber:~$".to_string()
        } else {
            format!("user@cyber:~{}$", self.cwd)
        }
    }

    pub fn cwd(&self) -> &str {
        &self.cwd
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn hint(&self) -> &str {
        &self.hint
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn scrollback(&self) -> &[Line] {
        &self.scrollback
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn history_index(&self) -> Option<usize> {
        self.history_index
    }

    pub fn push_line(&mut self, line: Line) {
        self.scrollback.push(line);
    }

    // -- input editing --------------------------------------------------------

    /// The input surface is disabled while a reply is being typed out.
    fn accepts_input(&self) -> bool {
        self.state != SessionState::TypingOut
    }

    pub fn set_input(&mut self, text: &str) {
        if !self.accepts_input() {
            return;
        }
        self.input = text.to_string();
        self.hint = self.registry.hint(&self.input);
    }

    pub fn type_char(&mut self, c: char) {
        if !self.accepts_input() {
            return;
        }
        self.input.push(c);
        self.hint = self.registry.hint(&self.input);
    }

    pub fn backspace(&mut self) {
        if !self.accepts_input() {
            return;
        }
        self.input.pop();
        self.hint = self.registry.hint(&self.input);
    }

    pub fn tab_complete(&mut self) {
        if !self.accepts_input() {
            return;
        }
        if let Some(completed) = self.registry.complete(&self.input) {
            self.input = completed;
            self.hint.clear();
        }
    }

    pub fn history_up(&mut self) {
        if !self.accepts_input() || self.history.is_empty() {
            return;
        }
        let idx = match self.history_index {
            None => 0,
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(i) => i,
        };
        self.recall(idx);
    }

    pub fn history_down(&mut self) {
        if !self.accepts_input() {
            return;
        }
        match self.history_index {
            Some(i) if i > 0 => self.recall(i - 1),
            _ => {
                self.history_index = None;
                self.input.clear();
                self.hint.clear();
            }
        }
    }

    fn recall(&mut self, idx: usize) {
        self.history_index = Some(idx);
        let pos = self.history.len() - 1 - idx;
        self.input = self.history.get(pos).cloned().unwrap_or_default();
        self.hint.clear();
    }

    // -- submission -------------------------------------------------------------

    /// First phase of a submission. Rejected unless the session is idle.
    pub fn begin(&mut self, raw: &str) -> Result<Step, SubmitRejected> {
        match self.state {
            SessionState::Idle => {}
            SessionState::AwaitingResponse => {
                log::debug!("submission rejected, awaiting response");
                return Err(SubmitRejected::AwaitingResponse);
            }
            SessionState::TypingOut => {
                log::debug!("submission rejected, typing out");
                return Err(SubmitRejected::TypingOut);
            }
        }

        let cmd = raw.trim();
        let echo = format!("{} {}", self.prompt(), cmd);
        self.scrollback.push(Line::new(LineKind::User, echo));
        self.input.clear();
        self.hint.clear();
        self.history_index = None;

        if cmd.is_empty() {
            return Ok(Step::Done);
        }
        if self.history.len() == self.history_cap {
            self.history.pop_front();
        }
        self.history.push_back(cmd.to_string());
        self.counter.increment();

        match self.execute(cmd) {
            Ok(Some(op)) => {
                self.state = SessionState::AwaitingResponse;
                Ok(Step::Remote(op))
            }
            Ok(None) => Ok(Step::Done),
            Err(e) => {
                self.scrollback.push(Line::error(e.to_string()));
                Ok(Step::Done)
            }
        }
    }

    fn execute(&mut self, cmd: &str) -> Result<Option<RemoteOp>, TerminalError> {
        match cmd {
            "clear" => {
                self.scrollback.clear();
                return Ok(None);
            }
            "help" => {
                let text = help_text(self.counter.current());
                self.scrollback.push(Line::system(text));
                return Ok(None);
            }
            _ => {}
        }

        let args: Vec<&str> = cmd.split_whitespace().collect();
        let op = match args[0] {
            "ls" => RemoteOp::List {
                path: args.get(1).map_or_else(|| self.cwd.clone(), |a| self.resolve(a)),
            },
            "cd" => return Ok(self.cmd_cd(&args)),
            "pwd" => {
                self.scrollback.push(Line::response(self.cwd.clone()));
                return Ok(None);
            }
            "cat" => RemoteOp::Read {
                path: self.resolve(required(&args, 1, "cat [filename]")?),
            },
            "touch" => RemoteOp::Create {
                path: self.resolve(required(&args, 1, "touch [filename]")?),
                kind: EntryKind::File,
            },
            "mkdir" => RemoteOp::Create {
                path: self.resolve(required(&args, 1, "mkdir [foldername]")?),
                kind: EntryKind::Folder,
            },
            "rm" => RemoteOp::Delete {
                path: self.resolve(required(&args, 1, "rm [filename]")?),
            },
            "cp" => {
                let (src, dst) = self.pair(&args, "cp [source] [destination]")?;
                RemoteOp::Copy { src, dst }
            }
            "mv" => {
                let (src, dst) = self.pair(&args, "mv [source] [destination]")?;
                RemoteOp::Move { src, dst }
            }
            "echo" if args.contains(&">") => self.cmd_echo_redirect(&args)?,
            _ => RemoteOp::Forward {
                command: cmd.to_string(),
            },
        };
        Ok(Some(op))
    }

    fn cmd_cd(&mut self, args: &[&str]) -> Option<RemoteOp> {
        match args.get(1) {
            None | Some(&"~") => {
                // Home is never validated against the backend.
                self.cwd = "/".into();
                None
            }
            Some(arg) => Some(RemoteOp::ChangeDir {
                arg: arg.to_string(),
                path: self.resolve(arg),
            }),
        }
    }

    fn cmd_echo_redirect(&self, args: &[&str]) -> Result<RemoteOp, TerminalError> {
        let arrow = args.iter().position(|a| *a == ">").unwrap_or(args.len());
        let filename = args
            .get(arrow + 1)
            .ok_or_else(|| TerminalError::usage("echo [text] > [filename]"))?;
        let text = args[1..arrow].join(" ");
        Ok(RemoteOp::Write {
            path: self.resolve(filename),
            content: strip_quote_pair(&text).to_string(),
        })
    }

    fn pair(&self, args: &[&str], usage: &str) -> Result<(String, String), TerminalError> {
        if args.len() < 3 {
            return Err(TerminalError::usage(usage));
        }
        Ok((self.resolve(args[1]), self.resolve(args[2])))
    }

    fn resolve(&self, input: &str) -> String {
        path::resolve(&self.cwd, input)
    }

    /// Last phase of a submission: render the backend's answer.
    pub fn finish(&mut self, op: &RemoteOp, result: Result<Outcome, ClientError>) {
        if self.state != SessionState::AwaitingResponse {
            log::warn!("ignoring result for {:?}, session is {:?}", op, self.state);
            return;
        }
        self.state = SessionState::Idle;

        let outcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                self.render_failure(op, err);
                return;
            }
        };
        match outcome {
            Outcome::Listing(entries) => self.render_listing(&entries),
            Outcome::Entered(path) => {
                self.scrollback.push(Line::response(format!("→ {}", path)));
                self.cwd = path;
            }
            Outcome::Content(text) => self.start_playback(&text),
            Outcome::Confirmed(text) => self.scrollback.push(Line::response(text)),
            Outcome::Reply(reply) => match reply {
                CommandResponse::Text(text) => self.start_playback(&text),
                CommandResponse::Error(text) => self.scrollback.push(Line::error(text)),
                CommandResponse::Clear => self.scrollback.clear(),
                CommandResponse::List => {
                    self.scrollback.push(Line::response("Use ls to list files."))
                }
                CommandResponse::Data(value) => {
                    self.scrollback.push(Line::response(value.to_string()))
                }
            },
        }
    }

    fn render_failure(&mut self, op: &RemoteOp, err: ClientError) {
        log::debug!("{:?} failed: {}", op, err);
        let line = match op {
            RemoteOp::Forward { .. } => OFFLINE_MESSAGE.to_string(),
            RemoteOp::ChangeDir { arg, .. } if !err.is_network() => {
                format!("cd: {}: No such directory", arg)
            }
            RemoteOp::List { .. } if err.is_network() && self.fallback_listing => {
                self.scrollback
                    .push(Line::system("⚠ Backend offline. Showing cached listing."));
                self.render_listing(&demo_listing());
                return;
            }
            _ => TerminalError::from(err).to_string(),
        };
        self.scrollback.push(Line::error(line));
    }

    fn render_listing(&mut self, entries: &[FileEntry]) {
        let text = entries
            .iter()
            .map(|f| match f.kind {
                EntryKind::Folder => format!("📁 {}", f.name),
                EntryKind::File => format!("📄 {} ({}b)", f.name, f.size),
            })
            .collect::<Vec<_>>()
            .join("\n");
        if text.is_empty() {
            self.scrollback.push(Line::response("(empty directory)"));
        } else {
            self.scrollback.push(Line::response(text));
        }
    }

    /// Run a whole submission and reveal the reply at once.
    pub async fn submit<F, D>(
        &mut self,
        raw: &str,
        files: &F,
        dispatcher: &D,
    ) -> Result<(), SubmitRejected>
    where
        F: FileClient,
        D: CommandDispatcher,
    {
        if let Step::Remote(op) = self.begin(raw)? {
            let result = op.run(files, dispatcher).await;
            self.finish(&op, result);
        }
        self.finish_playback();
        Ok(())
    }

    // -- typewriter playback ----------------------------------------------------

    fn start_playback(&mut self, text: &str) {
        let lines: Vec<String> = text.split('\n').map(str::to_string).collect();
        let first = lines[..self.batch.min(lines.len())].join("\n");
        self.scrollback.push(Line::response(first));
        self.playback = Some(Playback {
            lines,
            next: self.batch,
        });
        self.state = SessionState::TypingOut;
    }

    /// Reveal the next batch of a typed-out reply.
    ///
    /// Returns `true` while playback is still running. The call that finds nothing left
    /// returns the session to idle.
    pub fn tick(&mut self) -> bool {
        if self.state != SessionState::TypingOut {
            return false;
        }
        let batch = self.batch;
        let chunk = match self.playback.as_mut() {
            Some(p) if p.next < p.lines.len() => {
                let end = (p.next + batch).min(p.lines.len());
                let chunk = p.lines[p.next..end].join("\n");
                p.next = end;
                Some(chunk)
            }
            _ => None,
        };
        match chunk {
            Some(chunk) => {
                if let Some(last) = self.scrollback.last_mut() {
                    last.content.push('\n');
                    last.content.push_str(&chunk);
                }
                true
            }
            None => {
                self.playback = None;
                self.state = SessionState::Idle;
                false
            }
        }
    }

    pub fn finish_playback(&mut self) {
        while self.tick() {}
    }
}

fn required<'a>(args: &[&'a str], idx: usize, usage: &str) -> Result<&'a str, TerminalError> {
    args.get(idx).copied().ok_or_else(|| TerminalError::usage(usage))
}

/// Drop one leading and one trailing quote character.
fn strip_quote_pair(text: &str) -> &str {
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    text.strip_suffix(['"', '\'']).unwrap_or(text)
}

fn help_text(executed: u64) -> String {
    format!(
        "Available Commands:\n\
         ──────────────────────────────────\n\
         \x20 FILE SYSTEM:\n\
         \x20   ls, cd, pwd, cat, touch, mkdir,\n\
         \x20   rm, cp, mv, echo\n\
         \x20 NETWORK:\n\
         \x20   scan, ping, traceroute, nmap, ssh\n\
         \x20 SYSTEM:\n\
         \x20   whoami, neofetch, ps, uptime,\n\
         \x20   status, users, ifconfig, df,\n\
         \x20   hostname, uname, date, history,\n\
         \x20   decrypt, sudo\n\
         \x20 APPS:\n\
         \x20   hack, theme, matrix, open [file]\n\
         \x20   chat, music, sysmon, explorer,\n\
         \x20   missions, profile, lock\n\
         \x20   clear\n\
         ──────────────────────────────────\n\
         \x20 Commands executed: {}",
        executed
    )
}
