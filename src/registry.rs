/// Command names offered for completion, in lookup order.
pub const COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "cat", "touch", "rm", "mkdir", "cp", "mv", "echo", "clear", "help",
    "whoami", "neofetch", "scan", "ping", "traceroute", "ps", "uptime", "ifconfig", "nmap",
    "decrypt", "status", "users", "sudo", "ssh", "history", "date", "hostname", "uname", "df",
    "hack", "theme", "matrix", "open", "chat", "music", "sysmon", "explorer", "missions",
    "profile", "lock",
];

/// Ordered table of recognized command names.
///
/// Prefix lookups walk the table front to back, so the first registered match wins.
pub struct CommandRegistry {
    names: Vec<String>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::with_names(COMMANDS.iter().copied())
    }

    pub fn with_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        CommandRegistry {
            names: names.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// First registered name starting with `prefix`.
    pub fn first_match(&self, prefix: &str) -> Option<&str> {
        self.names().find(|name| name.starts_with(prefix))
    }

    /// Tab completion: the trimmed, lower-cased input completed to `"<match> "`.
    pub fn complete(&self, input: &str) -> Option<String> {
        let partial = input.trim().to_lowercase();
        if partial.is_empty() {
            return None;
        }
        self.first_match(&partial).map(|m| format!("{} ", m))
    }

    /// Inline suggestion shown while typing: the untyped remainder of the first longer match.
    ///
    /// Empty once the input contains a space or when nothing matches.
    pub fn hint(&self, input: &str) -> String {
        let partial = input.trim().to_lowercase();
        if partial.is_empty() || partial.contains(' ') {
            return String::new();
        }
        self.names()
            .find(|name| name.starts_with(partial.as_str()) && *name != partial)
            .map(|name| name[partial.len()..].to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_unique_prefix() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.complete("sc").as_deref(), Some("scan "));
        assert_eq!(reg.complete("  SC ").as_deref(), Some("scan "));
    }

    #[test]
    fn test_complete_first_match_wins() {
        let reg = CommandRegistry::with_names(["status", "sudo", "ssh"]);
        assert_eq!(reg.complete("s").as_deref(), Some("status "));
        assert_eq!(reg.complete("su").as_deref(), Some("sudo "));
        assert_eq!(reg.complete("x"), None);
        assert_eq!(reg.complete("   "), None);
    }

    #[test]
    fn test_hint_remainder() {
        let reg = CommandRegistry::new();
        assert_eq!(reg.hint("neo"), "fetch");
        assert_eq!(reg.hint("ls"), "");
        assert_eq!(reg.hint("cat f"), "");
        assert_eq!(reg.hint("zz"), "");
    }
}
