pub mod backend;
pub mod bridge;
pub mod client;
pub mod config;
pub mod counter;
pub mod desktop;
pub mod error;
pub mod logging;
pub mod path;
pub mod registry;
pub mod replies;
pub mod terminal;
pub mod window;
pub mod wm;

pub use bridge::CyberDesktop;
pub use desktop::{Desktop, DesktopEvent};
pub use terminal::TerminalSession;
pub use wm::WindowManager;
