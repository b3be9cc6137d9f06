use cyber_desktop::backend::MemoryBackend;
use cyber_desktop::client::{CommandDispatcher, CommandResponse, EntryKind, FileClient, FileEntry};
use cyber_desktop::config::Config;
use cyber_desktop::counter::{CommandCounter, MemoryCounter};
use cyber_desktop::desktop::{Desktop, DesktopEvent, Shortcut};
use cyber_desktop::error::{ClientError, DesktopError, SubmitRejected, OFFLINE_MESSAGE};
use cyber_desktop::registry::COMMANDS;
use cyber_desktop::terminal::{Line, LineKind, SessionState};
use cyber_desktop::window::WindowKind;
use serde_json::Value;
use std::cell::Cell;
use std::rc::Rc;

/// Client whose every call fails the same way, counting the attempts.
struct Failing {
    error: ClientError,
    calls: Cell<usize>,
}

impl Failing {
    fn new(error: ClientError) -> Self {
        Failing {
            error,
            calls: Cell::new(0),
        }
    }

    fn fail<T>(&self) -> Result<T, ClientError> {
        self.calls.set(self.calls.get() + 1);
        Err(self.error.clone())
    }
}

impl FileClient for Failing {
    async fn list(&self, _path: &str) -> Result<Vec<FileEntry>, ClientError> {
        self.fail()
    }
    async fn read(&self, _path: &str) -> Result<String, ClientError> {
        self.fail()
    }
    async fn write(&self, _path: &str, _content: &str) -> Result<(), ClientError> {
        self.fail()
    }
    async fn create(&self, _path: &str, _kind: EntryKind) -> Result<(), ClientError> {
        self.fail()
    }
    async fn delete(&self, _path: &str) -> Result<(), ClientError> {
        self.fail()
    }
    async fn copy(&self, _src: &str, _dst: &str) -> Result<(), ClientError> {
        self.fail()
    }
    async fn rename(&self, _src: &str, _dst: &str) -> Result<(), ClientError> {
        self.fail()
    }
}

impl CommandDispatcher for Failing {
    async fn command(&self, _raw: &str) -> Result<CommandResponse, ClientError> {
        self.fail()
    }
}

fn boot() -> (Desktop, u32, Rc<MemoryCounter>) {
    let counter = Rc::new(MemoryCounter::new());
    let desktop = Desktop::boot(Config::default(), counter.clone());
    let term = desktop.windows()[0].id;
    (desktop, term, counter)
}

fn last_line(desktop: &Desktop, term: u32) -> Line {
    desktop.terminal(term).unwrap().scrollback().last().unwrap().clone()
}

#[tokio::test]
async fn file_session_round_trip() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, counter) = boot();

    for cmd in [
        "mkdir ops",
        "cd ops",
        "echo 'blue_rabbit' > trigger.txt",
        "cat trigger.txt",
        "cp trigger.txt ../trigger.bak",
        "cd",
        "cat trigger.bak",
    ] {
        desktop.submit(term, cmd, &fs, &fs).await.unwrap();
    }

    assert_eq!(last_line(&desktop, term), Line::response("blue_rabbit"));
    let session = desktop.terminal(term).unwrap();
    assert_eq!(session.cwd(), "/");
    assert_eq!(session.history().count(), 7);
    assert_eq!(counter.current(), 7);
    assert_eq!(fs.read("/ops/trigger.txt").await.unwrap(), "blue_rabbit");
}

#[tokio::test]
async fn network_failures_are_rendered_not_thrown() {
    let offline = Failing::new(ClientError::Network("connection refused".into()));
    let (mut desktop, term, _) = boot();

    desktop.submit(term, "ls", &offline, &offline).await.unwrap();
    assert_eq!(last_line(&desktop, term), Line::error(OFFLINE_MESSAGE));
    desktop.submit(term, "scan 10.0.0.1", &offline, &offline).await.unwrap();
    assert_eq!(last_line(&desktop, term), Line::error(OFFLINE_MESSAGE));
    desktop.submit(term, "cd vault", &offline, &offline).await.unwrap();
    assert_eq!(last_line(&desktop, term), Line::error(OFFLINE_MESSAGE));
    assert_eq!(offline.calls.get(), 3);

    // usage errors and the home shortcut never reach the client
    desktop.submit(term, "cat", &offline, &offline).await.unwrap();
    desktop.submit(term, "cd ~", &offline, &offline).await.unwrap();
    assert_eq!(offline.calls.get(), 3);

    let session = desktop.terminal(term).unwrap();
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(session.cwd(), "/");
}

#[tokio::test]
async fn conflict_message_is_shown_verbatim() {
    let denied = Failing::new(ClientError::Conflict("Access denied".into()));
    let (mut desktop, term, _) = boot();
    desktop.submit(term, "rm /etc", &denied, &denied).await.unwrap();
    assert_eq!(last_line(&desktop, term), Line::error("Access denied"));
    desktop.submit(term, "cd /etc", &denied, &denied).await.unwrap();
    assert_eq!(last_line(&desktop, term), Line::error("cd: /etc: No such directory"));
}

#[tokio::test]
async fn closing_terminal_mid_flight_drops_the_response() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, _) = boot();
    let other = desktop.shortcut(Shortcut::NewTerminal).unwrap();

    let op = desktop.begin_submit(term, "cat about_me.enc").unwrap().unwrap();

    // window operations stay available while the command is pending
    assert!(desktop.focus_window(term));
    assert!(desktop.move_window(term, 10, 10));
    assert_eq!(
        desktop.begin_submit(term, "pwd"),
        Err(DesktopError::Rejected(SubmitRejected::AwaitingResponse))
    );

    assert!(desktop.close_window(term));
    let result = op.run(&fs, &fs).await;
    assert!(!desktop.finish_submit(term, &op, result));

    // the other terminal is untouched and still usable
    desktop.submit(other, "pwd", &fs, &fs).await.unwrap();
    assert_eq!(last_line(&desktop, other), Line::response("/"));
    assert!(!desktop.close_window(term));
}

#[tokio::test]
async fn typewriter_blocks_input_until_done() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, _) = boot();

    let op = desktop.begin_submit(term, "cat projects.txt").unwrap().unwrap();
    let result = op.run(&fs, &fs).await;
    assert!(desktop.finish_submit(term, &op, result));

    let before = desktop.terminal(term).unwrap().scrollback().len();
    assert_eq!(
        desktop.begin_submit(term, "ls"),
        Err(DesktopError::Rejected(SubmitRejected::TypingOut))
    );
    assert_eq!(desktop.terminal(term).unwrap().scrollback().len(), before);

    let mut ticks = 0;
    while desktop.tick(term) {
        ticks += 1;
    }
    assert!(ticks > 0);
    let text = fs.read("/projects.txt").await.unwrap();
    assert_eq!(last_line(&desktop, term).content, text);
    assert_eq!(desktop.begin_submit(term, "pwd"), Ok(None));
}

#[tokio::test]
async fn scrollback_order_matches_submission_order() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, _) = boot();
    for cmd in ["pwd", "whoami", "ls diary", "hostname"] {
        desktop.submit(term, cmd, &fs, &fs).await.unwrap();
    }
    let users: Vec<String> = desktop
        .terminal(term)
        .unwrap()
        .scrollback()
        .iter()
        .filter(|l| l.kind == LineKind::User)
        .map(|l| l.content.clone())
        .collect();
    assert_eq!(
        users,
        vec![
            "user@cyber:~$ pwd",
            "user@cyber:~$ whoami",
            "user@cyber:~$ ls diary",
            "user@cyber:~$ hostname"
        ]
    );
    assert_eq!(
        last_line(&desktop, term),
        Line::response("CYBER_NODE_7G.DR_NET.ONION")
    );
}

#[tokio::test]
async fn launch_commands_and_events() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, _) = boot();
    desktop.drain_events();

    desktop.submit(term, "sysmon", &fs, &fs).await.unwrap();
    desktop.submit(term, "htop", &fs, &fs).await.unwrap();
    desktop.submit(term, "open contact.hex", &fs, &fs).await.unwrap();

    let monitors = desktop
        .windows()
        .iter()
        .filter(|w| w.kind == WindowKind::SystemMonitor)
        .count();
    assert_eq!(monitors, 1);
    assert!(desktop.wm().find_kind(WindowKind::ImageViewer).is_some());
    assert_eq!(last_line(&desktop, term), Line::response("Opening contact.hex..."));

    let events = desktop.drain_events();
    let opened: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            DesktopEvent::WindowOpened(kind) => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(opened, vec![WindowKind::SystemMonitor, WindowKind::ImageViewer]);
    assert!(events.contains(&DesktopEvent::CommandExecuted("open".into())));
    assert!(desktop.wm().check_invariants().is_ok());
}

#[tokio::test]
async fn every_completable_command_is_answered_offline() {
    let fs = MemoryBackend::seeded();
    let (mut desktop, term, _) = boot();
    for name in COMMANDS {
        desktop.submit(term, name, &fs, &fs).await.unwrap();
        if desktop.is_locked() {
            assert!(desktop.unlock("cyber"));
        }
        let unknown = desktop
            .terminal(term)
            .unwrap()
            .scrollback()
            .iter()
            .any(|l| l.content.contains("command not found"));
        assert!(!unknown, "'{}' is not answered", name);
    }

    for cmd in ["scan", "neofetch", "status", "ps", "decrypt about_me.enc", "sudo ls", "history"] {
        desktop.submit(term, cmd, &fs, &fs).await.unwrap();
        assert_eq!(last_line(&desktop, term).kind, LineKind::Response, "{}", cmd);
    }
    assert!(last_line(&desktop, term).content.contains("sudo ls"));
}

#[test]
fn window_lifecycle_through_desktop() {
    let (mut desktop, term, _) = boot();
    let editor = desktop.open_window(WindowKind::TextEditor, Value::Null).unwrap();
    assert_eq!(desktop.wm().focused(), Some(editor));

    assert!(desktop.minimize_window(editor));
    assert_eq!(desktop.wm().focused(), None);
    assert!(desktop.toggle_maximize(editor));
    assert!(desktop.focus_window(editor));
    assert!(desktop.wm().get(editor).unwrap().is_maximized());

    assert_eq!(desktop.wm().z_order(), vec![term, editor]);
    assert!(desktop.close_window(editor));
    assert!(!desktop.close_window(editor));
    assert_eq!(desktop.windows().len(), 1);
}
