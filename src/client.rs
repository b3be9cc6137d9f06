//! Remote file client: the boundary to the backend file and terminal service.
//!
//! [`FileClient`] and [`CommandDispatcher`] describe the request/response contract.
//! [`HttpFileClient`] speaks it over `fetch`; [`crate::backend::MemoryBackend`] answers it locally.

use crate::error::ClientError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
}

impl EntryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::File => "file",
            EntryKind::Folder => "folder",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub size: u64,
}

impl FileEntry {
    pub fn file(name: &str, size: u64) -> Self {
        FileEntry {
            name: name.into(),
            kind: EntryKind::File,
            size,
        }
    }

    pub fn folder(name: &str) -> Self {
        FileEntry {
            name: name.into(),
            kind: EntryKind::Folder,
            size: 0,
        }
    }
}

/// Reply of the generic command endpoint, one case per response kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResponse {
    Text(String),
    Error(String),
    Clear,
    /// The backend asks the terminal to list files itself.
    List,
    /// Any other structured reply, shown as JSON.
    Data(Value),
}

impl CommandResponse {
    pub fn from_wire(value: Value) -> Self {
        let content = || {
            value
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match value.get("type").and_then(Value::as_str) {
            Some("text") | Some("response") => CommandResponse::Text(content()),
            Some("error") => CommandResponse::Error(content()),
            Some("clear") => CommandResponse::Clear,
            Some("list") => CommandResponse::List,
            _ => CommandResponse::Data(value),
        }
    }
}

/// File operations against already resolved absolute paths.
#[allow(async_fn_in_trait)]
pub trait FileClient {
    async fn list(&self, path: &str) -> Result<Vec<FileEntry>, ClientError>;
    async fn read(&self, path: &str) -> Result<String, ClientError>;
    async fn write(&self, path: &str, content: &str) -> Result<(), ClientError>;
    async fn create(&self, path: &str, kind: EntryKind) -> Result<(), ClientError>;
    async fn delete(&self, path: &str) -> Result<(), ClientError>;
    async fn copy(&self, src: &str, dst: &str) -> Result<(), ClientError>;
    async fn rename(&self, src: &str, dst: &str) -> Result<(), ClientError>;
}

/// Handler for every command the terminal does not run itself.
#[allow(async_fn_in_trait)]
pub trait CommandDispatcher {
    async fn command(&self, raw: &str) -> Result<CommandResponse, ClientError>;
}

/// Decoding of the backend's JSON reply shapes.
pub mod wire {
    use super::*;

    pub fn parse_body(text: &str) -> Result<Value, ClientError> {
        serde_json::from_str(text)
            .map_err(|e| ClientError::Network(format!("malformed response: {}", e)))
    }

    /// `{error}` or `{detail}` bodies, classified by message.
    pub fn error_of(value: &Value) -> ClientError {
        let message = value
            .get("error")
            .or_else(|| value.get("detail"))
            .and_then(Value::as_str)
            .unwrap_or_default();
        ClientError::from_message(message)
    }

    pub fn decode_listing(value: &Value) -> Result<Vec<FileEntry>, ClientError> {
        let files = match value.get("files").and_then(Value::as_array) {
            Some(files) => files,
            None => return Err(error_of(value)),
        };
        Ok(files
            .iter()
            .filter_map(|f| {
                let name = f.get("name")?.as_str()?;
                let kind = match f.get("type").and_then(Value::as_str) {
                    Some("folder") | Some("directory") => EntryKind::Folder,
                    _ => EntryKind::File,
                };
                let size = f.get("size").and_then(Value::as_u64).unwrap_or(0);
                Some(FileEntry {
                    name: name.to_string(),
                    kind,
                    size,
                })
            })
            .collect())
    }

    pub fn decode_content(value: &Value) -> Result<String, ClientError> {
        match value.get("content").and_then(Value::as_str) {
            Some(content) => Ok(content.to_string()),
            None => Err(error_of(value)),
        }
    }

    pub fn decode_status(value: &Value) -> Result<(), ClientError> {
        if value.get("status").and_then(Value::as_str) == Some("success") {
            Ok(())
        } else {
            Err(error_of(value))
        }
    }
}

/// Client for the backend's `/files/*` and `/terminal/command` endpoints.
#[derive(Debug, Clone)]
pub struct HttpFileClient {
    api_base: String,
}

impl HttpFileClient {
    pub fn new(api_base: &str) -> Self {
        HttpFileClient {
            api_base: api_base.trim_end_matches('/').to_string(),
        }
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.api_base, name)
    }

    async fn post(&self, name: &str, body: Value) -> Result<Value, ClientError> {
        fetch_json("POST", &self.endpoint(name), Some(&body)).await
    }
}

impl FileClient for HttpFileClient {
    async fn list(&self, path: &str) -> Result<Vec<FileEntry>, ClientError> {
        let encoded: String = js_sys::encode_uri_component(path).into();
        let url = format!("{}?path={}", self.endpoint("files/list"), encoded);
        let value = fetch_json("GET", &url, None).await?;
        wire::decode_listing(&value)
    }

    async fn read(&self, path: &str) -> Result<String, ClientError> {
        let value = self.post("files/read", json!({ "path": path })).await?;
        wire::decode_content(&value)
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ClientError> {
        let value = self
            .post("files/write", json!({ "path": path, "content": content }))
            .await?;
        wire::decode_status(&value)
    }

    async fn create(&self, path: &str, kind: EntryKind) -> Result<(), ClientError> {
        let value = self
            .post("files/create", json!({ "path": path, "type": kind.as_str() }))
            .await?;
        wire::decode_status(&value)
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        let value = self.post("files/delete", json!({ "path": path })).await?;
        wire::decode_status(&value)
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        let value = self
            .post("files/copy", json!({ "path": src, "destination": dst }))
            .await?;
        wire::decode_status(&value)
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        let value = self
            .post("files/move", json!({ "path": src, "destination": dst }))
            .await?;
        wire::decode_status(&value)
    }
}

impl CommandDispatcher for HttpFileClient {
    async fn command(&self, raw: &str) -> Result<CommandResponse, ClientError> {
        let value = self.post("terminal/command", json!({ "command": raw })).await?;
        Ok(CommandResponse::from_wire(value))
    }
}

fn network(detail: impl Into<String>) -> ClientError {
    ClientError::Network(detail.into())
}

async fn fetch_json(method: &str, url: &str, body: Option<&Value>) -> Result<Value, ClientError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(&JsValue::from_str(&body.to_string()));
    }

    let request = Request::new_with_str_and_init(url, &opts)
        .map_err(|e| network(format!("Failed to create request: {:?}", e)))?;
    if body.is_some() {
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(|e| network(format!("Failed to set header: {:?}", e)))?;
    }

    let window = web_sys::window().ok_or_else(|| network("No window object"))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(|e| network(format!("Fetch failed: {:?}", e)))?;

    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| network("Response is not a Response object"))?;
    if !resp.ok() {
        log::warn!("{} {} answered with status {}", method, url, resp.status());
    }

    let text = JsFuture::from(
        resp.text()
            .map_err(|e| network(format!("Failed to get text: {:?}", e)))?,
    )
    .await
    .map_err(|e| network(format!("Failed to read text: {:?}", e)))?;

    let text = text
        .as_string()
        .ok_or_else(|| network("Response text is not a string"))?;
    wire::parse_body(&text)
}

#[cfg(test)]
mod tests {
    use super::wire::*;
    use super::*;

    #[test]
    fn test_decode_listing() {
        let body = json!({"files": [
            {"name": "docs", "type": "folder", "size": 0},
            {"name": "welcome.txt", "type": "file", "size": 120},
            {"name": "scan.img", "type": "image"}
        ]});
        let files = decode_listing(&body).unwrap();
        assert_eq!(files[0], FileEntry::folder("docs"));
        assert_eq!(files[1], FileEntry::file("welcome.txt", 120));
        assert_eq!(files[2], FileEntry::file("scan.img", 0));
    }

    #[test]
    fn test_decode_errors_are_classified() {
        assert_eq!(
            decode_listing(&json!({"error": "Directory not found"})),
            Err(ClientError::NotFound("Directory not found".into()))
        );
        assert_eq!(
            decode_listing(&json!({"error": "Not a directory"})),
            Err(ClientError::Conflict("Not a directory".into()))
        );
        assert_eq!(
            decode_status(&json!({"detail": "Access denied"})),
            Err(ClientError::Conflict("Access denied".into()))
        );
        assert_eq!(
            decode_content(&json!({"error": "File not found"})),
            Err(ClientError::NotFound("File not found".into()))
        );
    }

    #[test]
    fn test_decode_success_shapes() {
        assert_eq!(decode_content(&json!({"content": ""})), Ok(String::new()));
        assert_eq!(decode_status(&json!({"status": "success"})), Ok(()));
    }

    #[test]
    fn test_malformed_body_is_network_failure() {
        assert!(parse_body("<html>502</html>").unwrap_err().is_network());
        assert_eq!(parse_body("{\"a\":1}").unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_command_response_variants() {
        assert_eq!(
            CommandResponse::from_wire(json!({"type": "text", "content": "hi"})),
            CommandResponse::Text("hi".into())
        );
        assert_eq!(
            CommandResponse::from_wire(json!({"type": "response", "content": "ok"})),
            CommandResponse::Text("ok".into())
        );
        assert_eq!(
            CommandResponse::from_wire(json!({"type": "error", "content": "nope"})),
            CommandResponse::Error("nope".into())
        );
        assert_eq!(
            CommandResponse::from_wire(json!({"type": "clear", "content": ""})),
            CommandResponse::Clear
        );
        assert_eq!(
            CommandResponse::from_wire(json!({"type": "list", "content": []})),
            CommandResponse::List
        );
        let other = json!({"type": "chart", "points": [1, 2]});
        assert_eq!(
            CommandResponse::from_wire(other.clone()),
            CommandResponse::Data(other)
        );
    }

    #[test]
    fn test_api_base_trailing_slash() {
        let client = HttpFileClient::new("http://localhost:8000/api/");
        assert_eq!(client.api_base(), "http://localhost:8000/api");
    }
}
