use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type WindowId = u32;

/// App hosted by a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WindowKind {
    Terminal,
    FileExplorer,
    TextEditor,
    ImageViewer,
    Minigame,
    MissionLog,
    SystemMonitor,
    Chat,
    MusicPlayer,
    Profile,
}

impl WindowKind {
    pub const ALL: [WindowKind; 10] = [
        WindowKind::Terminal,
        WindowKind::FileExplorer,
        WindowKind::TextEditor,
        WindowKind::ImageViewer,
        WindowKind::Minigame,
        WindowKind::MissionLog,
        WindowKind::SystemMonitor,
        WindowKind::Chat,
        WindowKind::MusicPlayer,
        WindowKind::Profile,
    ];

    /// At most one live window of an exclusive kind may exist.
    pub fn exclusive(self) -> bool {
        matches!(
            self,
            WindowKind::SystemMonitor
                | WindowKind::Chat
                | WindowKind::MissionLog
                | WindowKind::Minigame
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WindowKind::Terminal => "TERMINAL",
            WindowKind::FileExplorer => "FILE_EXPLORER",
            WindowKind::TextEditor => "TEXT_EDITOR",
            WindowKind::ImageViewer => "IMAGE_VIEWER",
            WindowKind::Minigame => "MINIGAME",
            WindowKind::MissionLog => "MISSION_LOG",
            WindowKind::SystemMonitor => "SYSTEM_MONITOR",
            WindowKind::Chat => "CHAT",
            WindowKind::MusicPlayer => "MUSIC_PLAYER",
            WindowKind::Profile => "PROFILE",
        }
    }
}

impl FromStr for WindowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WindowKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown window type '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

/// A single desktop window. Owned and mutated only by the window manager.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Window {
    pub id: WindowId,
    pub kind: WindowKind,
    pub position: Position,
    /// Payload for the hosted app, e.g. `{"path": "/"}` for an explorer.
    pub data: serde_json::Value,
    pub focused: bool,
    pub minimized: bool,
    pub maximized: bool,
    #[serde(skip)]
    pub(crate) focus_stamp: u64,
}

impl Window {
    pub(crate) fn new(
        id: WindowId,
        kind: WindowKind,
        position: Position,
        data: serde_json::Value,
    ) -> Self {
        Window {
            id,
            kind,
            position,
            data,
            focused: false,
            minimized: false,
            maximized: false,
            focus_stamp: 0,
        }
    }

    /// Whether the window currently renders full-screen.
    pub fn is_maximized(&self) -> bool {
        self.maximized && !self.minimized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exclusive_kinds() {
        let exclusive: Vec<_> = WindowKind::ALL.iter().filter(|k| k.exclusive()).collect();
        assert_eq!(exclusive.len(), 4);
        assert!(!WindowKind::Terminal.exclusive());
        assert!(WindowKind::Chat.exclusive());
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in WindowKind::ALL {
            assert_eq!(kind.as_str().parse::<WindowKind>(), Ok(kind));
        }
        assert_eq!("file_explorer".parse::<WindowKind>(), Ok(WindowKind::FileExplorer));
        assert!("BROWSER".parse::<WindowKind>().is_err());
        assert_eq!(
            serde_json::to_string(&WindowKind::SystemMonitor).unwrap(),
            "\"SYSTEM_MONITOR\""
        );
    }
}
