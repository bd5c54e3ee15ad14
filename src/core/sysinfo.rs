//! System information shown on the System Info screen.

use std::env;

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: String,
    pub family: String,
    pub arch: String,
    pub hostname: String,
    pub cpus: usize,
    pub version: String,
}

impl SystemInfo {
    pub fn collect() -> Self {
        let hostname = env::var("HOSTNAME")
            .or_else(|_| env::var("COMPUTERNAME"))
            .unwrap_or_else(|_| "unknown".to_string());
        let cpus = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            os: env::consts::OS.to_string(),
            family: env::consts::FAMILY.to_string(),
            arch: env::consts::ARCH.to_string(),
            hostname,
            cpus,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("OS: {} ({})", self.os, self.family),
            format!("Machine: {}", self.arch),
            format!("Host: {}", self.hostname),
            format!("Logical CPUs: {}", self.cpus),
            format!("Zelda: v{}", self.version),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_reports_compile_target() {
        let info = SystemInfo::collect();
        assert_eq!(info.os, env::consts::OS);
        assert!(info.cpus >= 1);
        let lines = info.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("OS: "));
    }
}
