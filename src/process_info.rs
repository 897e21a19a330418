/*!
 * Process Info
 * Identity and host description of the instrumented process
 */

use crate::core::limits::PARENT_PROCESS_ENV;
use crate::core::time::tick_frequency;
use crate::core::{DualTime, NewGuid};
use std::collections::BTreeMap;
use std::fs;
use tracing::debug;

/// Registered once with the sink at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub process_id: String,
    /// Empty when the process was not started by an instrumented parent
    pub parent_process_id: String,
    pub exe: String,
    pub username: String,
    pub realname: String,
    pub computer: String,
    pub distro: String,
    pub cpu_brand: String,
    pub tsc_frequency: i64,
    pub start_time: DualTime,
    pub properties: BTreeMap<String, String>,
}

impl ProcessInfo {
    /// Collect what the host exposes; unavailable fields are left empty
    ///
    /// Exports the new process id through the environment so child processes
    /// pick it up as their parent.
    pub fn current(new_guid: &NewGuid) -> Self {
        let process_id = new_guid();
        let parent_process_id = std::env::var(PARENT_PROCESS_ENV).unwrap_or_default();
        std::env::set_var(PARENT_PROCESS_ENV, &process_id);

        let username = std::env::var("USER")
            .or_else(|_| std::env::var("USERNAME"))
            .unwrap_or_default();

        let mut properties = BTreeMap::new();
        properties.insert("os".to_string(), std::env::consts::OS.to_string());
        properties.insert("arch".to_string(), std::env::consts::ARCH.to_string());
        properties.insert(
            "crate-version".to_string(),
            env!("CARGO_PKG_VERSION").to_string(),
        );

        let info = Self {
            process_id,
            parent_process_id,
            exe: std::env::current_exe()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            realname: username.clone(),
            username,
            computer: hostname(),
            distro: distro(),
            cpu_brand: cpu_brand(),
            tsc_frequency: tick_frequency(),
            start_time: DualTime::now(),
            properties,
        };
        debug!(
            process_id = %info.process_id,
            parent = %info.parent_process_id,
            exe = %info.exe,
            "collected process info"
        );
        info
    }

    /// Add caller-supplied properties, overriding collected ones
    pub fn with_properties<I, K, V>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in extra {
            self.properties.insert(key.into(), value.into());
        }
        self
    }
}

fn hostname() -> String {
    if let Ok(name) = std::env::var("HOSTNAME") {
        return name;
    }
    if let Ok(name) = std::env::var("COMPUTERNAME") {
        return name;
    }
    fs::read_to_string("/etc/hostname")
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn distro() -> String {
    fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| {
            content.lines().find_map(|line| {
                line.strip_prefix("PRETTY_NAME=")
                    .map(|v| v.trim_matches('"').to_string())
            })
        })
        .unwrap_or_else(|| std::env::consts::OS.to_string())
}

fn cpu_brand() -> String {
    fs::read_to_string("/proc/cpuinfo")
        .ok()
        .and_then(|content| {
            content.lines().find_map(|line| {
                let (key, value) = line.split_once(':')?;
                (key.trim() == "model name").then(|| value.trim().to_string())
            })
        })
        .unwrap_or_else(|| std::env::consts::ARCH.to_string())
}
