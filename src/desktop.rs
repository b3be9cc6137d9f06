//! Desktop shell core.
//!
//! Owns the window manager and one terminal session per TERMINAL window. Routes app-launch
//! commands, file opens and keyboard shortcuts into window operations and collects the events
//! the presentational layer consumes.

use crate::client::{CommandDispatcher, CommandResponse, FileClient};
use crate::config::Config;
use crate::counter::CommandCounter;
use crate::error::{ClientError, DesktopError};
use crate::terminal::{Line, Outcome, RemoteOp, Step, TerminalSession};
use crate::window::{Window, WindowId, WindowKind};
use crate::wm::WindowManager;
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

pub const BANNER: [&str; 2] = [
    "CYBER_OS v2.1 [QUANTUM BUILD]",
    "Type \"help\" for available commands. ↑↓ for history, TAB to auto-complete.",
];

pub const THEMES: [&str; 4] = ["green", "blue", "red", "amber"];

/// Passphrase accepted by the lock screen. An empty entry unlocks as well.
const UNLOCK_PHRASE: &str = "cyber";

/// Notification for the gamification and effects layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "value", rename_all = "snake_case")]
pub enum DesktopEvent {
    WindowOpened(WindowKind),
    /// Operation name of a submitted command, lower-cased.
    CommandExecuted(String),
    ThemeCycled(&'static str),
    MatrixToggled(bool),
    ScreenLocked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    NewTerminal,
    NewExplorer,
    CloseFocused,
    ToggleMatrix,
    LockScreen,
}

impl Shortcut {
    /// Shortcut bound to Ctrl (or Cmd) plus `key`.
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "t" => Some(Shortcut::NewTerminal),
            "e" => Some(Shortcut::NewExplorer),
            "w" => Some(Shortcut::CloseFocused),
            "m" => Some(Shortcut::ToggleMatrix),
            "l" => Some(Shortcut::LockScreen),
            _ => None,
        }
    }
}

/// Window kind and payload used to open `name`, or `None` for files with no viewer.
pub fn route_file(name: &str) -> Option<(WindowKind, Value)> {
    if name == "my_docs" || name == "folder" {
        return Some((WindowKind::FileExplorer, json!({ "path": "/" })));
    }
    let ext = name.rsplit_once('.').map(|(_, ext)| ext);
    match ext {
        Some("txt" | "enc" | "log" | "md" | "key" | "dat") => Some((
            WindowKind::TextEditor,
            json!({ "fileName": name, "content": null }),
        )),
        Some("hex" | "img") => Some((
            WindowKind::ImageViewer,
            json!({ "fileName": name, "src": "" }),
        )),
        _ if name == "brute_force.exe" => Some((WindowKind::Minigame, Value::Null)),
        _ => None,
    }
}

pub struct Desktop {
    wm: WindowManager,
    terminals: BTreeMap<WindowId, TerminalSession>,
    counter: Rc<dyn CommandCounter>,
    config: Config,
    events: Vec<DesktopEvent>,
    theme: usize,
    matrix: bool,
    locked: bool,
}

impl Desktop {
    /// An empty desktop with no windows.
    pub fn new(config: Config, counter: Rc<dyn CommandCounter>) -> Self {
        Desktop {
            wm: WindowManager::new(),
            terminals: BTreeMap::new(),
            counter,
            config,
            events: Vec::new(),
            theme: 0,
            matrix: false,
            locked: false,
        }
    }

    /// A desktop with its initial terminal open and focused.
    pub fn boot(config: Config, counter: Rc<dyn CommandCounter>) -> Self {
        let mut desktop = Self::new(config, counter);
        desktop.spawn(WindowKind::Terminal, Value::Null);
        log::info!("desktop booted");
        desktop
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn wm(&self) -> &WindowManager {
        &self.wm
    }

    pub fn windows(&self) -> &[Window] {
        self.wm.windows()
    }

    // -- window operations ------------------------------------------------------
    //
    // Everything reachable from the shell is refused while the lock screen is up.

    pub fn open_window(&mut self, kind: WindowKind, data: Value) -> Option<WindowId> {
        if self.locked {
            log::debug!("desktop locked, not opening {:?}", kind);
            return None;
        }
        Some(self.spawn(kind, data))
    }

    fn spawn(&mut self, kind: WindowKind, data: Value) -> WindowId {
        let before = self.wm.len();
        let id = self.wm.open(kind, data);
        if self.wm.len() > before {
            if kind == WindowKind::Terminal {
                let mut session = TerminalSession::new(&self.config, self.counter.clone());
                for line in BANNER {
                    session.push_line(Line::system(line));
                }
                self.terminals.insert(id, session);
            }
            self.events.push(DesktopEvent::WindowOpened(kind));
        }
        id
    }

    /// Close a window. A terminal's session goes with it.
    pub fn close_window(&mut self, id: WindowId) -> bool {
        !self.locked && self.remove(id)
    }

    fn remove(&mut self, id: WindowId) -> bool {
        let closed = self.wm.close(id);
        if closed && self.terminals.remove(&id).is_some() {
            log::debug!("terminal session {} dropped", id);
        }
        closed
    }

    pub fn close_focused(&mut self) -> Option<WindowId> {
        let id = self.wm.focused()?;
        self.remove(id).then_some(id)
    }

    pub fn focus_window(&mut self, id: WindowId) -> bool {
        !self.locked && self.wm.focus(id)
    }

    pub fn minimize_window(&mut self, id: WindowId) -> bool {
        !self.locked && self.wm.minimize(id)
    }

    pub fn move_window(&mut self, id: WindowId, x: i32, y: i32) -> bool {
        !self.locked && self.wm.move_window(id, x, y)
    }

    pub fn toggle_maximize(&mut self, id: WindowId) -> bool {
        !self.locked && self.wm.toggle_maximize(id)
    }

    pub fn open_file(&mut self, name: &str) -> Option<WindowId> {
        let (kind, data) = route_file(name)?;
        self.open_window(kind, data)
    }

    /// Apply a keyboard shortcut. Ignored while the screen is locked.
    pub fn shortcut(&mut self, shortcut: Shortcut) -> Option<WindowId> {
        if self.locked {
            return None;
        }
        match shortcut {
            Shortcut::NewTerminal => Some(self.spawn(WindowKind::Terminal, Value::Null)),
            Shortcut::NewExplorer => {
                Some(self.spawn(WindowKind::FileExplorer, json!({ "path": "/" })))
            }
            Shortcut::CloseFocused => self.close_focused(),
            Shortcut::ToggleMatrix => {
                self.toggle_matrix();
                None
            }
            Shortcut::LockScreen => {
                self.lock();
                None
            }
        }
    }

    // -- presentational toggles ---------------------------------------------------

    pub fn theme(&self) -> &'static str {
        THEMES[self.theme]
    }

    pub fn matrix_enabled(&self) -> bool {
        self.matrix
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn cycle_theme(&mut self) {
        self.theme = (self.theme + 1) % THEMES.len();
        self.events.push(DesktopEvent::ThemeCycled(self.theme()));
    }

    fn toggle_matrix(&mut self) {
        self.matrix = !self.matrix;
        self.events.push(DesktopEvent::MatrixToggled(self.matrix));
    }

    fn lock(&mut self) {
        self.locked = true;
        self.events.push(DesktopEvent::ScreenLocked);
    }

    pub fn unlock(&mut self, input: &str) -> bool {
        if input.is_empty() || input == UNLOCK_PHRASE {
            self.locked = false;
        }
        !self.locked
    }

    pub fn drain_events(&mut self) -> Vec<DesktopEvent> {
        std::mem::take(&mut self.events)
    }

    // -- terminals ----------------------------------------------------------------

    pub fn terminal(&self, id: WindowId) -> Option<&TerminalSession> {
        self.terminals.get(&id)
    }

    pub fn terminal_mut(&mut self, id: WindowId) -> Result<&mut TerminalSession, DesktopError> {
        if let Some(session) = self.terminals.get_mut(&id) {
            return Ok(session);
        }
        match self.wm.get(id) {
            Some(_) => Err(DesktopError::NotATerminal(id)),
            None => Err(DesktopError::UnknownWindow(id)),
        }
    }

    /// Start a submission in terminal `id`.
    ///
    /// App-launch commands are answered here; everything else that needs the backend comes back
    /// as a [`RemoteOp`] to run and hand to [`Desktop::finish_submit`].
    pub fn begin_submit(
        &mut self,
        id: WindowId,
        raw: &str,
    ) -> Result<Option<RemoteOp>, DesktopError> {
        if self.locked {
            return Err(DesktopError::Locked);
        }
        let step = self.terminal_mut(id)?.begin(raw)?;
        if let Some(op) = raw.split_whitespace().next() {
            self.events.push(DesktopEvent::CommandExecuted(op.to_lowercase()));
        }

        let op = match step {
            Step::Done => return Ok(None),
            Step::Remote(op) => op,
        };
        let reply = match &op {
            RemoteOp::Forward { command } => self.launch(command),
            _ => None,
        };
        match reply {
            Some(reply) => {
                self.terminal_mut(id)?.finish(&op, Ok(Outcome::Reply(reply)));
                Ok(None)
            }
            None => Ok(Some(op)),
        }
    }

    /// Submit whatever is typed in terminal `id`.
    pub fn begin_submit_input(&mut self, id: WindowId) -> Result<Option<RemoteOp>, DesktopError> {
        let raw = self.terminal_mut(id)?.input().to_string();
        self.begin_submit(id, &raw)
    }

    /// Deliver the result of a [`RemoteOp`].
    ///
    /// Returns `false` when the terminal was closed meanwhile.
    pub fn finish_submit(
        &mut self,
        id: WindowId,
        op: &RemoteOp,
        result: Result<Outcome, ClientError>,
    ) -> bool {
        match self.terminals.get_mut(&id) {
            Some(session) => {
                session.finish(op, result);
                true
            }
            None => {
                log::info!("dropping response for closed terminal {}", id);
                false
            }
        }
    }

    /// Advance typewriter playback of terminal `id`. `true` while more remains.
    pub fn tick(&mut self, id: WindowId) -> bool {
        self.terminals.get_mut(&id).is_some_and(TerminalSession::tick)
    }

    /// Run a submission to completion and reveal its output at once.
    pub async fn submit<F, D>(
        &mut self,
        id: WindowId,
        raw: &str,
        files: &F,
        dispatcher: &D,
    ) -> Result<(), DesktopError>
    where
        F: FileClient,
        D: CommandDispatcher,
    {
        if let Some(op) = self.begin_submit(id, raw)? {
            let result = op.run(files, dispatcher).await;
            self.finish_submit(id, &op, result);
        }
        if let Some(session) = self.terminals.get_mut(&id) {
            session.finish_playback();
        }
        Ok(())
    }

    /// Commands that drive the desktop itself rather than the backend.
    fn launch(&mut self, command: &str) -> Option<CommandResponse> {
        if command == "open" {
            return Some(CommandResponse::Error("Usage: open [filename]".into()));
        }
        if let Some(file) = command.strip_prefix("open ") {
            let file = file.trim();
            self.open_file(file);
            return Some(CommandResponse::Text(format!("Opening {}...", file)));
        }
        let app = |kind| (kind, Value::Null);
        let (target, text) = match command {
            "theme" => {
                self.cycle_theme();
                return Some(CommandResponse::Text(format!("Theme: {}", self.theme())));
            }
            "matrix" => {
                self.toggle_matrix();
                let state = if self.matrix { "on" } else { "off" };
                return Some(CommandResponse::Text(format!("Matrix {}", state)));
            }
            "lock" => {
                self.lock();
                return Some(CommandResponse::Text("SCREEN LOCKED.".into()));
            }
            "hack" => (app(WindowKind::Minigame), "Initiating BRUTE_FORCE..."),
            "chat" => (app(WindowKind::Chat), "Opening RELAY_CHAT..."),
            "music" | "play" => (app(WindowKind::MusicPlayer), "Opening CYBER_AUDIO..."),
            "sysmon" | "top" | "htop" => {
                (app(WindowKind::SystemMonitor), "Opening System Monitor...")
            }
            "explorer" | "files" => (
                (WindowKind::FileExplorer, json!({ "path": "/" })),
                "Opening File Explorer...",
            ),
            "missions" => (app(WindowKind::MissionLog), "Opening Mission Log..."),
            "profile" => (app(WindowKind::Profile), "Opening Profile..."),
            _ => return None,
        };
        let (kind, data) = target;
        self.spawn(kind, data);
        Some(CommandResponse::Text(text.to_string()))
    }
}
