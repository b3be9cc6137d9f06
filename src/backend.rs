//! Backends answering the file and command contract.
//!
//! [`MemoryBackend`] keeps a seeded directory tree in memory and serves the offline demo mode
//! and the test suite. [`Backend`] picks between it and the HTTP client at startup.

use crate::client::{
    CommandDispatcher, CommandResponse, EntryKind, FileClient, FileEntry, HttpFileClient,
};
use crate::config::{BackendMode, Config};
use crate::error::ClientError;
use crate::path;
use crate::replies;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

const ABOUT_ME: &str = "\nSUBJECT: [REDACTED]\nSTATUS: FUGITIVE / ROGUE AGENT\nLAST KNOWN LOCATION: SECTOR 7-G (CYBERSPACE_NODE_404)\n\nWARNING: FILE CORRUPTED. RECOVERING FRAGMENTS...\n\n...they think they can control the [REDACTED]? I saw the source code. I saw what they did to the AI in '64.\nI am not just a \"Web Developer\". I am an architect of digital rebellion.\nMy skills? \n- React.js (Weaponized UI)\n- FastAPI (High-Speed Data Exfiltration)\n- Python (Scripting the Revolution)\n\nIf you are reading this, the firewall is down. They are coming.\nHire me before they find me.\n\n[END OF FRAGMENT]\n";

const PROJECTS: &str = "\n1. PROJECT_NEON_SHADOW\n   > Status: DECLASSIFIED\n   > Description: An e-commerce platform built for the underground market. \n   > Tech: Next.js, Stripe (Hacked), MongoDB.\n\n2. OP_DATA_HAVEN\n   > Status: ACTIVE\n   > Description: Encrypted cloud storage solution. \n   > Tech: Rust, WebAssembly, IPFS.\n\n3. PROTOCOL_GLITCH\n   > Status: EXPERIMENTAL\n   > Description: This very portfolio. A living OS on the web.\n";

const CONTACT: &str = "\nENCRYPTED CHANNEL OPEN.\nSEND SIGNAL TO:\n> EMAIL: [REDACTED]@protonmail.com\n> GITHUB: github.com/[USER]\n> LINKEDIN: [SIGNAL_LOST]\n\nDO NOT TRACE THIS CONNECTION.\n";

const SEED_FILES: &[(&str, &str)] = &[
    ("/projects.txt", PROJECTS),
    ("/welcome.txt", "WELCOME TO CYBER_OS v2.1\n\nThis is your personal file space.\nYou can create, edit, and delete files here."),
    ("/about_me.enc", ABOUT_ME),
    ("/contact.hex", CONTACT),
    ("/documents/notes.txt", "Meeting notes: TBD"),
    ("/diary/entry_001.log", "DATE: 2077-01-12\nThey say the network is secure. I don't believe them. I saw the glimmers in the code today. Something is watching us from the sub-net."),
    ("/diary/entry_042.log", "DATE: 2077-02-04\nI hid the key in the image file. If they find me, at least the data is safe. 'blue_rabbit' is the trigger."),
    ("/trash/.recovered_frag", "...SEGMENT CORRUPTED...\n...override protocol 9...\n...target identified: USER_01..."),
    ("/logs/system_boot.log", "[INFO] KERNEL LOADED\n[INFO] MOUNTING DRIVES... OK\n[WARN] UNKNOWN DEVICE CONNECTED"),
    ("/bin/readme.md", "# SYSTEM BINARIES\n\nDo not delete system files."),
    ("/.shadow/cipher.key", "DECRYPT_KEY: X7-PHANTOM-ECHO-9\nACCESS_TOKEN: ██████████████\nWARNING: If you found this, they already know."),
    ("/.shadow/blacklist.dat", "NODE_01: COMPROMISED\nNODE_02: ACTIVE\nNODE_03: [REDACTED]\nNODE_04: OFFLINE SINCE 2076-11-30\nNODE_05: ...listening..."),
];

/// Listing shown by `ls` when the backend is unreachable and the fallback is enabled.
pub fn demo_listing() -> Vec<FileEntry> {
    vec![
        FileEntry::file("details.txt", 2458),
        FileEntry::file("scan_results.img", 159_744),
        FileEntry::file("backup.hex", 1_153_434),
        FileEntry::file("network_log.enc", 91_136),
        FileEntry::file("secret_key.dat", 256),
        FileEntry::folder("archives"),
    ]
}

#[derive(Clone, Debug)]
struct Inode {
    is_dir: bool,
    data: String,
    children: BTreeMap<String, Inode>,
}

impl Inode {
    fn dir() -> Self {
        Inode {
            is_dir: true,
            data: String::new(),
            children: BTreeMap::new(),
        }
    }

    fn file(data: &str) -> Self {
        Inode {
            is_dir: false,
            data: data.into(),
            children: BTreeMap::new(),
        }
    }

    fn entry(&self, name: &str) -> FileEntry {
        if self.is_dir {
            FileEntry::folder(name)
        } else {
            FileEntry::file(name, self.data.len() as u64)
        }
    }
}

fn segments(path: &str) -> Vec<String> {
    path::normalize(path)
        .split('/')
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn no_such_file() -> ClientError {
    ClientError::NotFound("No such file or directory".into())
}

fn exists() -> ClientError {
    ClientError::Conflict("File exists".into())
}

/// Commands kept for the `history` reply.
const LOG_CAP: usize = 100;

/// In-memory stand-in for the backend file service and command endpoint.
pub struct MemoryBackend {
    root: RefCell<Inode>,
    offline: Cell<bool>,
    log: RefCell<VecDeque<String>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::seeded()
    }
}

impl MemoryBackend {
    /// An empty tree holding only the root directory.
    pub fn empty() -> Self {
        MemoryBackend {
            root: RefCell::new(Inode::dir()),
            offline: Cell::new(false),
            log: RefCell::new(VecDeque::new()),
        }
    }

    /// A tree holding the demo files of the hosted service.
    pub fn seeded() -> Self {
        let backend = Self::empty();
        for (path, data) in SEED_FILES {
            if let Err(e) = backend.create_file(path, data) {
                log::warn!("failed to seed {}: {}", path, e);
            }
        }
        backend
    }

    /// Simulate an unreachable backend: every call fails with a network error.
    pub fn set_offline(&self, offline: bool) {
        self.offline.set(offline);
    }

    fn record(&self, raw: &str) {
        let mut log = self.log.borrow_mut();
        if log.len() == LOG_CAP {
            log.pop_front();
        }
        log.push_back(raw.to_string());
    }

    fn check_online(&self) -> Result<(), ClientError> {
        if self.offline.get() {
            Err(ClientError::Network("memory backend is offline".into()))
        } else {
            Ok(())
        }
    }

    /// Create a file and any missing parent directories, truncating an existing file.
    pub fn create_file(&self, path: &str, data: &str) -> Result<(), ClientError> {
        let parts = segments(path);
        let (name, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Err(ClientError::Conflict("Is a directory".into())),
        };
        let mut root = self.root.borrow_mut();
        let parent = mkdir_p(&mut root, parents)?;
        match parent.children.get(name) {
            Some(node) if node.is_dir => Err(ClientError::Conflict("Is a directory".into())),
            _ => {
                parent.children.insert(name.clone(), Inode::file(data));
                Ok(())
            }
        }
    }

    fn with_node<T>(&self, path: &str, f: impl FnOnce(Option<&Inode>) -> T) -> T {
        let root = self.root.borrow();
        let mut node = Some(&*root);
        for part in segments(path) {
            node = node.and_then(|n| n.children.get(&part));
        }
        f(node)
    }

    fn transfer(&self, src: &str, dst: &str, remove_source: bool) -> Result<(), ClientError> {
        let src_parts = segments(src);
        let mut dst_parts = segments(dst);
        let mut root = self.root.borrow_mut();

        let node = match lookup(&root, &src_parts) {
            Some(node) => node.clone(),
            None => return Err(no_such_file()),
        };
        let src_name = match src_parts.last() {
            Some(name) => name.clone(),
            None => return Err(ClientError::Conflict("Access denied".into())),
        };
        // A move onto an existing directory lands inside it.
        if remove_source && lookup(&root, &dst_parts).is_some_and(|n| n.is_dir) {
            dst_parts.push(src_name);
        }
        if dst_parts.starts_with(&src_parts) {
            return Err(ClientError::Conflict(format!(
                "Cannot place '{}' inside itself",
                path::normalize(src)
            )));
        }
        let (name, parents) = match dst_parts.split_last() {
            Some(split) => split,
            None => return Err(exists()),
        };
        match lookup_mut(&mut root, parents) {
            Some(parent) if parent.is_dir => {
                if parent.children.contains_key(name) {
                    return Err(exists());
                }
                parent.children.insert(name.clone(), node);
            }
            Some(_) => return Err(ClientError::Conflict("Not a directory".into())),
            None => return Err(no_such_file()),
        }
        if remove_source {
            detach(&mut root, &src_parts);
        }
        Ok(())
    }
}

fn lookup<'a>(root: &'a Inode, parts: &[String]) -> Option<&'a Inode> {
    let mut node = root;
    for part in parts {
        node = node.children.get(part)?;
    }
    Some(node)
}

fn lookup_mut<'a>(root: &'a mut Inode, parts: &[String]) -> Option<&'a mut Inode> {
    let mut node = root;
    for part in parts {
        node = node.children.get_mut(part)?;
    }
    Some(node)
}

fn detach(root: &mut Inode, parts: &[String]) -> Option<Inode> {
    let (name, parents) = parts.split_last()?;
    lookup_mut(root, parents)?.children.remove(name)
}

/// Walk `parts`, creating missing directories. Fails when a segment is a file.
fn mkdir_p<'a>(root: &'a mut Inode, parts: &[String]) -> Result<&'a mut Inode, ClientError> {
    let mut node = root;
    for part in parts {
        node = node.children.entry(part.clone()).or_insert_with(Inode::dir);
        if !node.is_dir {
            return Err(exists());
        }
    }
    Ok(node)
}

impl FileClient for MemoryBackend {
    async fn list(&self, path: &str) -> Result<Vec<FileEntry>, ClientError> {
        self.check_online()?;
        self.with_node(path, |node| match node {
            None => Err(ClientError::NotFound("Directory not found".into())),
            Some(node) if !node.is_dir => Err(ClientError::Conflict("Not a directory".into())),
            Some(node) => Ok(node
                .children
                .iter()
                .map(|(name, child)| child.entry(name))
                .collect()),
        })
    }

    async fn read(&self, path: &str) -> Result<String, ClientError> {
        self.check_online()?;
        self.with_node(path, |node| match node {
            None => Err(ClientError::NotFound("File not found".into())),
            Some(node) if node.is_dir => Err(ClientError::Conflict("Is a directory".into())),
            Some(node) => Ok(node.data.clone()),
        })
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ClientError> {
        self.check_online()?;
        let parts = segments(path);
        let (name, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Err(ClientError::Conflict("Is a directory".into())),
        };
        let mut root = self.root.borrow_mut();
        let parent = match lookup_mut(&mut root, parents) {
            Some(parent) if parent.is_dir => parent,
            _ => return Err(no_such_file()),
        };
        match parent.children.get_mut(name) {
            Some(node) if node.is_dir => Err(ClientError::Conflict("Is a directory".into())),
            Some(node) => {
                node.data = content.to_string();
                Ok(())
            }
            None => {
                parent.children.insert(name.clone(), Inode::file(content));
                Ok(())
            }
        }
    }

    async fn create(&self, path: &str, kind: EntryKind) -> Result<(), ClientError> {
        self.check_online()?;
        match kind {
            EntryKind::File => self.create_file(path, ""),
            EntryKind::Folder => {
                let mut root = self.root.borrow_mut();
                mkdir_p(&mut root, &segments(path))?;
                Ok(())
            }
        }
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.check_online()?;
        let parts = segments(path);
        if parts.is_empty() {
            return Err(ClientError::Conflict("Access denied".into()));
        }
        let mut root = self.root.borrow_mut();
        detach(&mut root, &parts).map(|_| ()).ok_or_else(no_such_file)
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        self.check_online()?;
        self.transfer(src, dst, false)
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        self.check_online()?;
        self.transfer(src, dst, true)
    }
}

impl CommandDispatcher for MemoryBackend {
    async fn command(&self, raw: &str) -> Result<CommandResponse, ClientError> {
        self.check_online()?;
        let parts: Vec<&str> = raw.split_whitespace().collect();
        let operation = parts.first().map(|op| op.to_lowercase()).unwrap_or_default();
        let target = parts.get(1).copied();
        if !operation.is_empty() {
            self.record(raw.trim());
        }

        let response = match operation.as_str() {
            "echo" => match parts.iter().position(|p| *p == ">") {
                Some(idx) => {
                    let text = strip_quotes(&parts[1..idx].join(" "));
                    match parts.get(idx + 1) {
                        Some(filename) => {
                            match self.write(&path::normalize(filename), &text).await {
                                Ok(()) => CommandResponse::Text(format!("Wrote to {}", filename)),
                                Err(e) => CommandResponse::Error(e.message().to_string()),
                            }
                        }
                        None => CommandResponse::Error("Usage: echo 'text' > filename".into()),
                    }
                }
                None => CommandResponse::Text(strip_quotes(&parts[1..].join(" "))),
            },
            "whoami" => CommandResponse::Text(replies::WHOAMI.into()),
            "neofetch" => CommandResponse::Text(replies::NEOFETCH.into()),
            "scan" => CommandResponse::Text(replies::scan(target.unwrap_or("LOCAL_NETWORK"))),
            "ping" => CommandResponse::Text(replies::ping(target.unwrap_or("localhost"))),
            "traceroute" | "tracert" => {
                CommandResponse::Text(replies::traceroute(target.unwrap_or("ghost.onion")))
            }
            "nmap" => CommandResponse::Text(replies::nmap(target.unwrap_or("192.168.1.0/24"))),
            "ps" => CommandResponse::Text(replies::ps()),
            "uptime" => CommandResponse::Text(replies::UPTIME.into()),
            "ifconfig" | "ip" => CommandResponse::Text(replies::IFCONFIG.into()),
            "status" => CommandResponse::Text(replies::status()),
            "users" => CommandResponse::Text(replies::users()),
            "decrypt" => match target {
                Some(file) => CommandResponse::Text(replies::decrypt(file)),
                None => CommandResponse::Error(
                    "Usage: decrypt [filename]\n  Attempts to decrypt an encrypted file.".into(),
                ),
            },
            "sudo" => match parts.get(1..).map(|rest| rest.join(" ")) {
                Some(sub) if !sub.is_empty() => CommandResponse::Text(replies::sudo(&sub)),
                _ => CommandResponse::Error(
                    "Usage: sudo [command]\n  Execute with elevated privileges.".into(),
                ),
            },
            "ssh" => match target {
                Some(host) => CommandResponse::Text(replies::ssh(host)),
                None => CommandResponse::Error(
                    "Usage: ssh [user@host]\n  Connect to remote system.".into(),
                ),
            },
            "history" => {
                let log = self.log.borrow();
                CommandResponse::Text(replies::history(log.iter().map(String::as_str)))
            }
            "date" => CommandResponse::Text(replies::DATE.into()),
            "hostname" => CommandResponse::Text(replies::HOSTNAME.into()),
            "uname" => CommandResponse::Text(replies::UNAME.into()),
            "df" => CommandResponse::Text(replies::DISK_USAGE.into()),
            "clear" => CommandResponse::Clear,
            "help" => CommandResponse::Text(replies::HELP.into()),
            "ls" => CommandResponse::List,
            other => CommandResponse::Error(format!(
                "'{}': command not found\n  Try: {}",
                other,
                replies::SUGGESTIONS
            )),
        };
        Ok(response)
    }
}

fn strip_quotes(text: &str) -> String {
    text.trim_matches(|c| c == '"' || c == '\'').to_string()
}

/// The file client and dispatcher chosen by configuration.
#[derive(Clone)]
pub enum Backend {
    Remote(HttpFileClient),
    Local(Rc<MemoryBackend>),
}

impl Backend {
    pub fn from_config(config: &Config) -> Self {
        match config.backend {
            BackendMode::Remote => Backend::Remote(HttpFileClient::new(&config.api_base)),
            BackendMode::Local => Backend::Local(Rc::new(MemoryBackend::seeded())),
        }
    }
}

impl FileClient for Backend {
    async fn list(&self, path: &str) -> Result<Vec<FileEntry>, ClientError> {
        match self {
            Backend::Remote(c) => c.list(path).await,
            Backend::Local(m) => m.list(path).await,
        }
    }

    async fn read(&self, path: &str) -> Result<String, ClientError> {
        match self {
            Backend::Remote(c) => c.read(path).await,
            Backend::Local(m) => m.read(path).await,
        }
    }

    async fn write(&self, path: &str, content: &str) -> Result<(), ClientError> {
        match self {
            Backend::Remote(c) => c.write(path, content).await,
            Backend::Local(m) => m.write(path, content).await,
        }
    }

    async fn create(&self, path: &str, kind: EntryKind) -> Result<(), ClientError> {
        match self {
            Backend::Remote(c) => c.create(path, kind).await,
            Backend::Local(m) => m.create(path, kind).await,
        }
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        match self {
            Backend::Remote(c) => c.delete(path).await,
            Backend::Local(m) => m.delete(path).await,
        }
    }

    async fn copy(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        match self {
            Backend::Remote(c) => c.copy(src, dst).await,
            Backend::Local(m) => m.copy(src, dst).await,
        }
    }

    async fn rename(&self, src: &str, dst: &str) -> Result<(), ClientError> {
        match self {
            Backend::Remote(c) => c.rename(src, dst).await,
            Backend::Local(m) => m.rename(src, dst).await,
        }
    }
}

impl CommandDispatcher for Backend {
    async fn command(&self, raw: &str) -> Result<CommandResponse, ClientError> {
        match self {
            Backend::Remote(c) => c.command(raw).await,
            Backend::Local(m) => m.command(raw).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_seeded_root_listing() {
        let fs = MemoryBackend::seeded();
        let root = fs.list("/").await.unwrap();
        assert_eq!(
            names(&root),
            vec![
                ".shadow",
                "about_me.enc",
                "bin",
                "contact.hex",
                "diary",
                "documents",
                "logs",
                "projects.txt",
                "trash",
                "welcome.txt"
            ]
        );
        let diary = fs.list("/diary").await.unwrap();
        assert_eq!(names(&diary), vec!["entry_001.log", "entry_042.log"]);
        assert_eq!(diary[0].kind, EntryKind::File);
    }

    #[tokio::test]
    async fn test_list_errors() {
        let fs = MemoryBackend::seeded();
        assert_eq!(
            fs.list("/nope").await,
            Err(ClientError::NotFound("Directory not found".into()))
        );
        assert_eq!(
            fs.list("/welcome.txt").await,
            Err(ClientError::Conflict("Not a directory".into()))
        );
    }

    #[tokio::test]
    async fn test_read_write_create() {
        let fs = MemoryBackend::empty();
        assert_eq!(
            fs.read("/a.txt").await,
            Err(ClientError::NotFound("File not found".into()))
        );
        fs.write("/a.txt", "hello").await.unwrap();
        assert_eq!(fs.read("/a.txt").await.unwrap(), "hello");
        assert_eq!(fs.list("/").await.unwrap(), vec![FileEntry::file("a.txt", 5)]);

        // write needs an existing parent, create makes one
        assert!(fs.write("/x/y.txt", "z").await.is_err());
        fs.create("/x/y.txt", EntryKind::File).await.unwrap();
        assert_eq!(fs.read("/x/y.txt").await.unwrap(), "");

        fs.create("/x", EntryKind::Folder).await.unwrap();
        assert_eq!(fs.list("/x").await.unwrap().len(), 1);
        assert_eq!(
            fs.create("/a.txt/sub", EntryKind::Folder).await,
            Err(ClientError::Conflict("File exists".into()))
        );
    }

    #[tokio::test]
    async fn test_delete_is_recursive() {
        let fs = MemoryBackend::seeded();
        fs.delete("/diary").await.unwrap();
        assert!(fs.list("/diary").await.is_err());
        assert!(fs.delete("/diary").await.unwrap_err().message().contains("No such"));
        assert!(fs.delete("/").await.is_err());
    }

    #[tokio::test]
    async fn test_copy_and_move() {
        let fs = MemoryBackend::seeded();
        fs.copy("/welcome.txt", "/documents/welcome.txt").await.unwrap();
        assert!(fs.read("/welcome.txt").await.is_ok());
        assert_eq!(
            fs.copy("/welcome.txt", "/documents/welcome.txt").await,
            Err(ClientError::Conflict("File exists".into()))
        );

        fs.rename("/contact.hex", "/diary").await.unwrap();
        assert!(fs.read("/diary/contact.hex").await.is_ok());
        assert!(fs.read("/contact.hex").await.is_err());

        fs.rename("/logs", "/archive").await.unwrap();
        assert!(fs.list("/archive").await.is_ok());

        assert!(fs.rename("/missing", "/x").await.unwrap_err().message().contains("No such"));
        assert!(fs.copy("/documents", "/documents/inner").await.is_err());
    }

    #[tokio::test]
    async fn test_offline_fails_with_network_error() {
        let fs = MemoryBackend::seeded();
        fs.set_offline(true);
        assert!(fs.list("/").await.unwrap_err().is_network());
        assert!(fs.command("whoami").await.unwrap_err().is_network());
        fs.set_offline(false);
        assert!(fs.list("/").await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatcher_replies() {
        let fs = MemoryBackend::seeded();
        assert_eq!(
            fs.command("echo 'hi there'").await.unwrap(),
            CommandResponse::Text("hi there".into())
        );
        assert_eq!(fs.command("ls").await.unwrap(), CommandResponse::List);
        assert_eq!(fs.command("clear").await.unwrap(), CommandResponse::Clear);
        assert_eq!(
            fs.command("HOSTNAME").await.unwrap(),
            CommandResponse::Text("CYBER_NODE_7G.DR_NET.ONION".into())
        );
        assert_eq!(
            fs.command("frobnicate now").await.unwrap(),
            CommandResponse::Error(
                "'frobnicate': command not found\n  Try: help, scan, neofetch, whoami, status".into()
            )
        );
    }

    #[tokio::test]
    async fn test_dispatcher_knows_every_service_command() {
        let fs = MemoryBackend::seeded();
        for cmd in [
            "whoami", "neofetch", "scan", "ping", "traceroute", "tracert", "ps", "uptime",
            "ifconfig", "ip", "nmap", "decrypt about_me.enc", "status", "users", "sudo ls",
            "ssh phantom@dark-node", "history", "date", "hostname", "uname", "df", "help",
        ] {
            match fs.command(cmd).await.unwrap() {
                CommandResponse::Text(text) => assert!(!text.is_empty(), "{}", cmd),
                other => panic!("{} answered {:?}", cmd, other),
            }
        }
    }

    #[tokio::test]
    async fn test_dispatcher_usage_errors() {
        let fs = MemoryBackend::seeded();
        for (cmd, usage) in [
            ("decrypt", "Usage: decrypt [filename]"),
            ("sudo", "Usage: sudo [command]"),
            ("ssh", "Usage: ssh [user@host]"),
        ] {
            match fs.command(cmd).await.unwrap() {
                CommandResponse::Error(text) => assert!(text.starts_with(usage), "{}", text),
                other => panic!("{} answered {:?}", cmd, other),
            }
        }
    }

    #[tokio::test]
    async fn test_dispatcher_targets_and_history() {
        let fs = MemoryBackend::seeded();
        match fs.command("scan 10.0.0.7").await.unwrap() {
            CommandResponse::Text(text) => assert!(text.starts_with("SCANNING TARGET: 10.0.0.7")),
            other => panic!("scan answered {:?}", other),
        }
        assert_eq!(
            fs.command("sudo rm -rf /vault").await.unwrap(),
            CommandResponse::Text(replies::sudo("rm -rf /vault"))
        );
        assert_eq!(
            fs.command("history").await.unwrap(),
            CommandResponse::Text(
                "Command History:\n     1  scan 10.0.0.7\n     2  sudo rm -rf /vault\n     3  history"
                    .into()
            )
        );
    }

    #[tokio::test]
    async fn test_dispatcher_echo_redirect() {
        let fs = MemoryBackend::empty();
        assert_eq!(
            fs.command("echo \"data\" > out.txt").await.unwrap(),
            CommandResponse::Text("Wrote to out.txt".into())
        );
        assert_eq!(fs.read("/out.txt").await.unwrap(), "data");
    }
}
