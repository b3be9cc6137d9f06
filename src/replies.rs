//! Canned replies of the in-memory command service.
//!
//! Output mirrors the hosted service's commands with fixed values in place of its random ones,
//! so the offline desktop and the tests see the same text on every run.

pub const WHOAMI: &str = "ID: USER_01\nROLE: GHOST_ADMIN\nACCESS_LEVEL: 7\nLOCATION: PROXY_CHAIN_ACTIVE\nCLEARANCE: ██████████\nSTATUS: UNDETECTED";

pub const HOSTNAME: &str = "CYBER_NODE_7G.DR_NET.ONION";

pub const UNAME: &str = "CYBER_OS 4.19.0-PHANTOM x86_64 QUANTUM_CORE GNU/Linux";

pub const DATE: &str = "SERVER_TIME: 2077-03-14 04:20:00\nTIMEZONE: UTC+0 [QUANTUM_SYNC]";

pub const DISK_USAGE: &str = "Filesystem      Size  Used  Avail  Use%  Mounted on\n/dev/cyber0     4.0T  2.1T  1.9T   52%   /\n/dev/ghost1     512G  128G  384G   25%   /shadow\ntmpfs           32G   1.2G  30.8G   4%   /tmp\n/dev/vault0     1.0T  890G  110G   89%   /vault  ⚠ HIGH";

pub const NEOFETCH: &str = "  ██████╗██╗   ██╗██████╗ ███████╗██████╗
 ██╔════╝╚██╗ ██╔╝██╔══██╗██╔════╝██╔══██╗
 ██║      ╚████╔╝ ██████╔╝█████╗  ██████╔╝
 ██║       ╚██╔╝  ██╔══██╗██╔══╝  ██╔══██╗
 ╚██████╗   ██║   ██████╔╝███████╗██║  ██║
  ╚═════╝   ╚═╝   ╚═════╝ ╚══════╝╚═╝  ╚═╝
──────────────────────────────────
  OS:       CYBER_OS v2.1 [QUANTUM]
  Kernel:   4.19.0-PHANTOM
  Shell:    ghost-sh 3.2.1
  CPU:      Quantum Core i9 @ 8.2 GHz
  GPU:      NV-CORTEX RTX 9090
  RAM:      65536 MB DDR6
  Disk:     2.1 TB / 4 TB (52%)
  Network:  DR_NET [ENCRYPTED]
  Uptime:   4209h 37m
  Packages: 1337 (apt)
  User:     USER_01@SECTOR-7G";

pub const UPTIME: &str = "  System Uptime: 4209h 37m 12s\n  Load Average:  0.42 0.87 1.13\n  Users Online:  2\n  Last Reboot:   2077-01-01 00:00:00 [FORCED]";

pub const IFCONFIG: &str = "eth0:
  inet  10.0.7.42  mask 255.255.255.0
  inet6 fe80::4096:1337::7
  ether AA:BB:CC:13:37:42
  RX packets: 482913  TX packets: 201377

ghost0 (STEALTH ADAPTER):
  inet  192.168.77.7  [MASKED]
  status: CLOAKED
  encryption: AES-512-QUANTUM";

pub const HELP: &str = "Available Commands:
──────────────────────────────────
  FILE SYSTEM:
    ls [path]       List files
    cd [path]       Change directory
    pwd             Working directory
    cat [file]      Read file
    touch [file]    Create file
    mkdir [dir]     Create folder
    rm [file]       Delete file/dir
    cp [src] [dst]  Copy
    mv [src] [dst]  Move
    echo [text]     Print text
  NETWORK:
    scan [target]   Port scan
    ping [host]     Ping host
    traceroute [h]  Trace route
    nmap [target]   Network map
    ssh [user@host] Remote connect
  SYSTEM:
    whoami          Identity
    neofetch        System info
    ps              Processes
    uptime          System uptime
    status          Status report
    users           Online users
    ifconfig        Network config
    df              Disk usage
    hostname        Host name
    uname           OS info
    date            Server time
    history         Command log
    decrypt [file]  Decrypt file
    sudo [cmd]      Root access
    clear           Clear screen
    hack            Start minigame
    theme           Switch theme
    matrix          Toggle matrix
";

pub const SUGGESTIONS: &str = "help, scan, neofetch, whoami, status";

const PORTS: [(u16, bool, &str); 6] = [
    (22, true, "ssh"),
    (80, true, "http"),
    (443, true, "https"),
    (1337, false, "dark-relay"),
    (3306, false, "unknown"),
    (8080, true, "http"),
];

const HOPS: [(&str, Option<f32>); 8] = [
    ("LOCAL_GW", Some(1.4)),
    ("ISP_NODE", Some(8.9)),
    ("PROXY_01", Some(23.7)),
    ("TOR_ENTRY", None),
    ("RELAY_ALPHA", Some(88.2)),
    ("DARK_NODE", Some(131.5)),
    ("GHOST_RELAY", Some(176.0)),
    ("SECTOR_7G", Some(212.3)),
];

const PROCESSES: [(u32, &str, f32, f32); 10] = [
    (1, "systemd", 0.1, 2.3),
    (42, "kernel_watchdog", 0.0, 0.8),
    (137, "ghost-shell", 1.2, 4.1),
    (256, "network_monitor", 3.4, 3.2),
    (314, "crypto_miner", 27.9, 12.4),
    (404, "shadow_daemon", 0.6, 1.7),
    (512, "firewall_v3", 0.3, 5.6),
    (666, "UNKNOWN_PROCESS", 13.1, 8.8),
    (777, "data_exfil_agent", 2.5, 2.1),
    (1024, "proxy_chain", 0.8, 3.0),
];

const USERS: [(&str, &str, &str); 5] = [
    ("USER_01", "ACTIVE", "GHOST_ADMIN"),
    ("PHANTOM_X", "IDLE", "OPERATOR"),
    ("NULL_BYTE", "ACTIVE", "ANALYST"),
    ("D4RK_ECHO", "OFFLINE", "UNKNOWN"),
    ("ROOT", "LOCKED", "SYSTEM"),
];

const HOSTS: [(&str, &str, bool); 5] = [
    ("192.168.1.1", "ROUTER", true),
    ("192.168.1.23", "DESKTOP-01", true),
    ("192.168.1.64", "NAS_VAULT", true),
    ("192.168.1.101", "CAMERA_03", false),
    ("192.168.1.200", "GHOST_NODE", true),
];

pub fn scan(target: &str) -> String {
    let mut lines = vec![
        format!("SCANNING TARGET: {}", target),
        "─".repeat(40),
        format!("  Host: {}", target),
        "  Status: UP (latency: 12ms)".to_string(),
        "  Ports discovered:".to_string(),
    ];
    for (port, open, service) in PORTS {
        let state = if open { "OPEN" } else { "FILTERED" };
        lines.push(format!("  PORT {:>5}  {}  {}", port, state, service));
    }
    lines.push("─".repeat(40));
    let open = PORTS.iter().filter(|p| p.1).count();
    lines.push(format!("  {} services detected.", open));
    lines.push("  ⚠ CAUTION: Scan may have been logged.".to_string());
    lines.join("\n")
}

pub fn ping(target: &str) -> String {
    let mut lines = vec![format!("PING {} (104.21.7.66)", target)];
    for (seq, ms) in [12.4, 9.8, 15.1, 11.0].into_iter().enumerate() {
        lines.push(format!("  seq={} ttl=64 time={:.1}ms", seq, ms));
    }
    lines.push(format!("--- {} ping statistics ---", target));
    lines.push("  4 packets transmitted, 4 received, avg=12.1ms".to_string());
    lines.join("\n")
}

pub fn traceroute(target: &str) -> String {
    let mut lines = vec![format!("traceroute to {}, {} hops max", target, HOPS.len())];
    for (i, (node, ms)) in HOPS.iter().enumerate() {
        match ms {
            Some(ms) => lines.push(format!("  {}  {}  {:.1}ms", i + 1, node, ms)),
            None => lines.push(format!("  {}  * * * [REQUEST TIMED OUT]", i + 1)),
        }
    }
    lines.push("  Trace complete. Route SECURE.".to_string());
    lines.join("\n")
}

pub fn nmap(target: &str) -> String {
    let mut lines = vec![
        "Starting Nmap 7.94 ( https://nmap.org )".to_string(),
        format!("Scanning {}...", target),
        format!("Discovered {} live hosts:", HOSTS.len()),
        "─".repeat(40),
    ];
    for (ip, name, up) in HOSTS {
        let state = if up { "UP" } else { "FILTERED" };
        lines.push(format!("  {:<16} {:<16} {}", ip, name, state));
    }
    lines.push("─".repeat(40));
    lines.push(format!("Nmap done: {} hosts up. Scan took 7s.", HOSTS.len()));
    lines.push("⚠ Some hosts may have detected your scan.".to_string());
    lines.join("\n")
}

pub fn ps() -> String {
    let mut lines = vec![
        format!("{:>6}  {:<22}  {:>6}  {:>6}", "PID", "PROCESS", "CPU%", "MEM%"),
        "─".repeat(48),
    ];
    for (pid, name, cpu, mem) in PROCESSES {
        let warn = if cpu > 10.0 { " ⚠" } else { "" };
        lines.push(format!("{:>6}  {:<22}  {:>5.1}%  {:>5.1}%{}", pid, name, cpu, mem, warn));
    }
    let total: f32 = PROCESSES.iter().map(|p| p.2).sum();
    lines.push(format!(
        "\n  Total: {} processes | CPU: {:.1}%",
        PROCESSES.len(),
        total
    ));
    lines.join("\n")
}

pub fn users() -> String {
    let mut lines = vec![
        format!("{:<14} {:<10} {:<14}", "USER", "STATUS", "ROLE"),
        "─".repeat(38),
    ];
    for (name, status, role) in USERS {
        lines.push(format!("{:<14} {:<10} {:<14}", name, status, role));
    }
    let active = USERS.iter().filter(|u| u.1 == "ACTIVE").count();
    lines.push(format!("\n  {} active users on DR_NET.", active));
    lines.join("\n")
}

pub fn status() -> String {
    let border = "═".repeat(34);
    let rows = [
        "  CPU Load:    17%",
        "  Memory:      43% used",
        "  Disk:        52% capacity",
        "  Network:     ENCRYPTED",
        "  Firewall:    ACTIVE",
        "  Threats:     0 detected",
        "  VPN:         MULTI-HOP",
    ];
    let mut lines = vec![
        format!("╔{}╗", border),
        format!("║{:^34}║", "SYSTEM STATUS REPORT"),
        format!("╠{}╣", border),
    ];
    lines.extend(rows.iter().map(|row| format!("║{:<34}║", row)));
    lines.push(format!("╠{}╣", border));
    lines.push(format!("║{:<34}║", "  All systems operational."));
    lines.push(format!("╚{}╝", border));
    lines.join("\n")
}

pub fn decrypt(target: &str) -> String {
    [
        format!("Analyzing {}...", target),
        "Identifying encryption: AES-256-CBC".to_string(),
        "Attempting key rotation...".to_string(),
        "Brute-forcing key space: ████████████░░░░ 76%".to_string(),
        "Key fragment found: X7-PH4NT0M".to_string(),
        "Applying decryption matrix...".to_string(),
        format!("✓ SUCCESS: {} decrypted.", target),
        format!("  Decrypted content saved to {}.dec", target),
    ]
    .join("\n")
}

pub fn sudo(command: &str) -> String {
    format!(
        "[SUDO] Escalating privileges for: {0}\n\
         [SUDO] Access Level: ROOT\n\
         [SUDO] Executing: {0}\n\
         [SUDO] ✓ Command completed with elevated access.",
        command
    )
}

pub fn ssh(target: &str) -> String {
    format!(
        "Connecting to {}...\n\
         Establishing encrypted tunnel...\n\
         Fingerprint: SHA256:7f3a9c0e51d28b64a0f7c3e9d1b5a2864fe0c7d3\n\
         Authentication: KEY_EXCHANGE\n\
         Connection established.\n\
         WARNING: This session is being monitored.\n\
         Type 'exit' to disconnect.",
        target
    )
}

/// Numbered listing of the commands the service has answered.
pub fn history<'a>(commands: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::from("Command History:");
    for (i, cmd) in commands.into_iter().enumerate() {
        out.push_str(&format!("\n  {:>4}  {}", i + 1, cmd));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_box_is_aligned() {
        let text = status();
        let widths: Vec<usize> = text.lines().map(|l| l.chars().count()).collect();
        assert!(widths.iter().all(|w| *w == 36), "{:?}", widths);
        assert!(text.contains("SYSTEM STATUS REPORT"));
    }

    #[test]
    fn test_ps_flags_heavy_processes() {
        let text = ps();
        let flagged: Vec<&str> = text.lines().filter(|l| l.ends_with('⚠')).collect();
        assert_eq!(flagged.len(), 2);
        assert!(flagged[0].contains("crypto_miner"));
        assert!(text.ends_with("Total: 10 processes | CPU: 49.9%"));
        assert_eq!(text.lines().nth(1).unwrap().chars().count(), 48);
    }

    #[test]
    fn test_targets_are_echoed() {
        assert!(scan("10.0.0.1").starts_with("SCANNING TARGET: 10.0.0.1\n"));
        assert!(scan("x").contains("4 services detected."));
        assert!(ping("ghost.onion").contains("--- ghost.onion ping statistics ---"));
        assert!(nmap("TARGET_BRAVO").contains("Scanning TARGET_BRAVO..."));
        assert!(traceroute("dark.node").contains("* * * [REQUEST TIMED OUT]"));
        assert!(decrypt("about_me.enc").ends_with("saved to about_me.enc.dec"));
        assert!(ssh("phantom@dark-node").starts_with("Connecting to phantom@dark-node..."));
        assert!(users().ends_with("2 active users on DR_NET."));
    }

    #[test]
    fn test_history_numbering() {
        assert_eq!(history(Vec::<&str>::new()), "Command History:");
        assert_eq!(
            history(["whoami", "scan"]),
            "Command History:\n     1  whoami\n     2  scan"
        );
    }
}
