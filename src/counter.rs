//! Persistent count of executed commands.

use std::cell::Cell;

pub const STORAGE_KEY: &str = "cyber_cmd_count";

/// Monotonic counter shared by every terminal session. Never decremented.
pub trait CommandCounter {
    /// Record one command and return the new total.
    fn increment(&self) -> u64;
    fn current(&self) -> u64;
}

#[derive(Debug, Default)]
pub struct MemoryCounter {
    count: Cell<u64>,
}

impl MemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(count: u64) -> Self {
        MemoryCounter {
            count: Cell::new(count),
        }
    }
}

impl CommandCounter for MemoryCounter {
    fn increment(&self) -> u64 {
        let next = self.count.get().saturating_add(1);
        self.count.set(next);
        next
    }

    fn current(&self) -> u64 {
        self.count.get()
    }
}

/// Counter kept in `window.localStorage` so it survives page reloads.
///
/// Falls back to counting in memory when storage is unavailable (private mode, no window).
#[derive(Debug, Default)]
pub struct LocalStorageCounter {
    cached: Cell<u64>,
}

impl LocalStorageCounter {
    pub fn load() -> Self {
        let stored = storage()
            .and_then(|s| s.get_item(STORAGE_KEY).ok().flatten())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        LocalStorageCounter {
            cached: Cell::new(stored),
        }
    }
}

fn storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl CommandCounter for LocalStorageCounter {
    fn increment(&self) -> u64 {
        let next = self.cached.get().saturating_add(1);
        self.cached.set(next);
        if let Some(storage) = storage() {
            if storage.set_item(STORAGE_KEY, &next.to_string()).is_err() {
                log::warn!("could not persist command count");
            }
        }
        next
    }

    fn current(&self) -> u64 {
        self.cached.get()
    }
}
