//! JavaScript surface of the desktop.

use crate::backend::Backend;
use crate::config::Config;
use crate::counter::{CommandCounter, LocalStorageCounter};
use crate::desktop::{Desktop, Shortcut};
use crate::logging;
use crate::terminal::SessionState;
use crate::window::{WindowId, WindowKind};
use js_sys::Promise;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{future_to_promise, spawn_local, JsFuture};

fn to_js(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(to_js)
}

/// Resolve after `ms` milliseconds via `setTimeout`. Rejects when no timer can be scheduled.
async fn sleep_ms(ms: u32) -> Result<(), JsValue> {
    let delay = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, reject| {
        let scheduled = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window object"))
            .and_then(|window| {
                window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, delay)
            });
        if let Err(err) = scheduled {
            if let Err(e) = reject.call1(&JsValue::NULL, &err) {
                log::error!("failed to reject sleep: {:?}", e);
            }
        }
    });
    JsFuture::from(promise).await.map(|_| ())
}

/// Run one submission of terminal `id` to the end of its playback.
///
/// `line` of `None` submits the terminal's own input buffer.
async fn drive(
    desktop: Rc<RefCell<Desktop>>,
    backend: Backend,
    id: WindowId,
    line: Option<String>,
) -> Result<JsValue, JsValue> {
    let begun = match line {
        Some(line) => desktop.borrow_mut().begin_submit(id, &line),
        None => desktop.borrow_mut().begin_submit_input(id),
    };
    if let Some(op) = begun.map_err(to_js)? {
        let result = op.run(&backend, &backend).await;
        desktop.borrow_mut().finish_submit(id, &op, result);
    }
    let interval = desktop.borrow().config().typewriter_interval_ms;
    while is_typing(&desktop, id) {
        sleep_ms(interval).await?;
        desktop.borrow_mut().tick(id);
    }
    Ok(JsValue::UNDEFINED)
}

fn is_typing(desktop: &RefCell<Desktop>, id: WindowId) -> bool {
    desktop
        .borrow()
        .terminal(id)
        .is_some_and(|t| t.state() == SessionState::TypingOut)
}

#[wasm_bindgen]
pub struct CyberDesktop {
    desktop: Rc<RefCell<Desktop>>,
    backend: Backend,
}

#[wasm_bindgen]
impl CyberDesktop {
    /// Boot the desktop. `config` is an optional JSON object, see [`Config`].
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<String>) -> Result<CyberDesktop, JsValue> {
        let config = Config::from_json(config.as_deref().unwrap_or_default()).map_err(to_js)?;
        logging::init(config.level());
        let backend = Backend::from_config(&config);
        let counter: Rc<dyn CommandCounter> = Rc::new(LocalStorageCounter::load());
        Ok(CyberDesktop {
            desktop: Rc::new(RefCell::new(Desktop::boot(config, counter))),
            backend,
        })
    }

    #[wasm_bindgen(js_name = openWindow)]
    pub fn open_window(&self, kind: &str, data: Option<String>) -> Result<Option<u32>, JsValue> {
        let kind: WindowKind = kind.parse().map_err(to_js)?;
        let data = match data.as_deref() {
            Some(json) if !json.trim().is_empty() => serde_json::from_str(json).map_err(to_js)?,
            _ => serde_json::Value::Null,
        };
        Ok(self.desktop.borrow_mut().open_window(kind, data))
    }

    #[wasm_bindgen(js_name = closeWindow)]
    pub fn close_window(&self, id: u32) -> bool {
        self.desktop.borrow_mut().close_window(id)
    }

    #[wasm_bindgen(js_name = focusWindow)]
    pub fn focus_window(&self, id: u32) -> bool {
        self.desktop.borrow_mut().focus_window(id)
    }

    #[wasm_bindgen(js_name = minimizeWindow)]
    pub fn minimize_window(&self, id: u32) -> bool {
        self.desktop.borrow_mut().minimize_window(id)
    }

    #[wasm_bindgen(js_name = moveWindow)]
    pub fn move_window(&self, id: u32, x: i32, y: i32) -> bool {
        self.desktop.borrow_mut().move_window(id, x, y)
    }

    #[wasm_bindgen(js_name = toggleMaximize)]
    pub fn toggle_maximize(&self, id: u32) -> bool {
        self.desktop.borrow_mut().toggle_maximize(id)
    }

    #[wasm_bindgen(js_name = openFile)]
    pub fn open_file(&self, name: &str) -> Option<u32> {
        self.desktop.borrow_mut().open_file(name)
    }

    /// Ctrl/Cmd + `key`. Returns the window opened or closed, if any.
    pub fn shortcut(&self, key: &str) -> Option<u32> {
        let shortcut = Shortcut::from_key(key)?;
        self.desktop.borrow_mut().shortcut(shortcut)
    }

    pub fn unlock(&self, input: &str) -> bool {
        self.desktop.borrow_mut().unlock(input)
    }

    /// All windows as a JSON array.
    pub fn windows(&self) -> Result<String, JsValue> {
        to_json(self.desktop.borrow().windows())
    }

    /// Window ids from bottom to top.
    #[wasm_bindgen(js_name = zOrder)]
    pub fn z_order(&self) -> Vec<u32> {
        self.desktop.borrow().wm().z_order()
    }

    pub fn theme(&self) -> String {
        self.desktop.borrow().theme().to_string()
    }

    #[wasm_bindgen(js_name = matrixEnabled)]
    pub fn matrix_enabled(&self) -> bool {
        self.desktop.borrow().matrix_enabled()
    }

    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self) -> bool {
        self.desktop.borrow().is_locked()
    }

    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<String, JsValue> {
        to_json(&self.desktop.borrow_mut().drain_events())
    }

    // -- terminal windows ---------------------------------------------------------

    /// Scrollback of terminal `id` as a JSON array of `{type, content}`.
    pub fn scrollback(&self, id: u32) -> Result<String, JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        let session = desktop.terminal_mut(id).map_err(to_js)?;
        to_json(session.scrollback())
    }

    pub fn prompt(&self, id: u32) -> Result<String, JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        Ok(desktop.terminal_mut(id).map_err(to_js)?.prompt())
    }

    pub fn input(&self, id: u32) -> Result<String, JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        Ok(desktop.terminal_mut(id).map_err(to_js)?.input().to_string())
    }

    pub fn hint(&self, id: u32) -> Result<String, JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        Ok(desktop.terminal_mut(id).map_err(to_js)?.hint().to_string())
    }

    /// Whether terminal `id` currently accepts a submission.
    #[wasm_bindgen(js_name = isReady)]
    pub fn is_ready(&self, id: u32) -> bool {
        self.desktop
            .borrow()
            .terminal(id)
            .is_some_and(|t| t.state() == SessionState::Idle)
    }

    #[wasm_bindgen(js_name = setInput)]
    pub fn set_input(&self, id: u32, text: &str) -> Result<(), JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        desktop.terminal_mut(id).map_err(to_js)?.set_input(text);
        Ok(())
    }

    /// Keys for terminal `id`. Returns `true` when the key was consumed.
    ///
    /// Enter submits the input buffer in the background; nothing is consumed while the terminal
    /// is busy or the screen is locked.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, id: u32, key: &str) -> Result<bool, JsValue> {
        let mut desktop = self.desktop.borrow_mut();
        if desktop.is_locked() {
            return Ok(false);
        }
        let session = desktop.terminal_mut(id).map_err(to_js)?;
        if key == "Enter" {
            if session.state() != SessionState::Idle {
                return Ok(false);
            }
            drop(desktop);
            let (desktop, backend) = (self.desktop.clone(), self.backend.clone());
            spawn_local(async move {
                if let Err(err) = drive(desktop, backend, id, None).await {
                    log::warn!("submit in terminal {} failed: {:?}", id, err);
                }
            });
            return Ok(true);
        }
        match key {
            "Tab" => session.tab_complete(),
            "ArrowUp" => session.history_up(),
            "ArrowDown" => session.history_down(),
            "Backspace" => session.backspace(),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => session.type_char(c),
                    _ => return Ok(false),
                }
            }
        }
        Ok(true)
    }

    /// Submit `line` to terminal `id`.
    ///
    /// Resolves once the output is fully typed out. Rejects when the terminal is busy or gone.
    pub fn submit(&self, id: u32, line: String) -> Promise {
        let desktop = self.desktop.clone();
        let backend = self.backend.clone();
        future_to_promise(drive(desktop, backend, id, Some(line)))
    }
}
