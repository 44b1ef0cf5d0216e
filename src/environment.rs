//! Run environment detection
//!
//! Tells apart a live USB session from an installed Linux system, and both
//! from a non-Linux host (the OS the user is migrating away from).
//!
//! A Linux session counts as live when the device backing `$HOME` is not one
//! of the real disks listed in `/proc/partitions`: live media run from
//! overlays, loop devices or tmpfs.

use serde::Serialize;
use std::fs;
use std::path::Path;
use strum::Display;

/// Where switcheroo is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    /// Linux booted from live media
    Live,
    /// Linux installed on a local disk
    Installed,
    /// Not Linux at all
    Foreign,
}

/// Detect the environment of the running process.
pub fn detect_environment() -> Environment {
    if !cfg!(target_os = "linux") {
        return Environment::Foreign;
    }

    let Some(home) = std::env::var_os("HOME") else {
        tracing::warn!("HOME is not set; assuming a live session");
        return Environment::Live;
    };

    let mounts = fs::read_to_string("/proc/self/mounts").unwrap_or_default();
    let partitions = fs::read_to_string("/proc/partitions").unwrap_or_default();

    let device = mount_source_for(&mounts, Path::new(&home)).map(|source| resolve_device(&source));
    let environment = classify_environment(device.as_deref(), &partitions);
    tracing::info!("Run environment: {} (home on {:?})", environment, device);
    environment
}

/// Classify from the home device name and `/proc/partitions` content.
pub fn classify_environment(home_device: Option<&str>, partitions: &str) -> Environment {
    let on_real_disk = home_device.is_some_and(|device| {
        real_disks(partitions).any(|disk| disk == device)
    });

    if on_real_disk {
        Environment::Installed
    } else {
        Environment::Live
    }
}

/// Device names from `/proc/partitions` that look like physical disks.
fn real_disks(partitions: &str) -> impl Iterator<Item = &str> {
    partitions
        .lines()
        .filter_map(|line| line.split_whitespace().nth(3))
        .filter(|name| is_real_disk(name))
}

/// `sd*`, `nvme<N>n<N>[p<N>]` and `mmcblk<N>[p<N>]` device names.
pub fn is_real_disk(name: &str) -> bool {
    if let Some(rest) = name.strip_prefix("sd") {
        return !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    }
    if let Some(rest) = name.strip_prefix("nvme") {
        let rest = skip_digits(rest, 1);
        return rest
            .and_then(|r| r.strip_prefix('n'))
            .and_then(|r| skip_digits(r, 1))
            .is_some_and(partition_suffix);
    }
    if let Some(rest) = name.strip_prefix("mmcblk") {
        return skip_digits(rest, 1).is_some_and(partition_suffix);
    }
    false
}

/// Strip at least `min` leading ASCII digits.
fn skip_digits(s: &str, min: usize) -> Option<&str> {
    let rest = s.trim_start_matches(|c: char| c.is_ascii_digit());
    (s.len() - rest.len() >= min).then_some(rest)
}

/// Optional `p` followed by optional digits, and nothing else.
fn partition_suffix(rest: &str) -> bool {
    let rest = rest.strip_prefix('p').unwrap_or(rest);
    rest.chars().all(|c| c.is_ascii_digit())
}

/// Mount source of the longest mount point containing `path`.
pub fn mount_source_for(mounts: &str, path: &Path) -> Option<String> {
    mounts
        .lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let source = fields.next()?;
            let mount_point = fields.next()?;
            Some((source, mount_point))
        })
        .filter(|(_, mount_point)| path.starts_with(mount_point))
        .max_by_key(|(_, mount_point)| mount_point.len())
        .map(|(source, _)| source.to_string())
}

/// Last path component of a mount source, after following symlinks.
fn resolve_device(source: &str) -> String {
    let resolved = fs::canonicalize(source).unwrap_or_else(|_| Path::new(source).to_path_buf());
    resolved
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTITIONS: &str = "\
major minor  #blocks  name

 259        0  500107608 nvme0n1
 259        1     524288 nvme0n1p1
 259        2  499582279 nvme0n1p2
   7        0    2500000 loop0
   8        0   15000000 sda
   8        1   15000000 sda1
";

    #[test]
    fn test_is_real_disk() {
        for name in ["sda", "sdb3", "nvme0n1", "nvme0n1p2", "mmcblk0", "mmcblk0p1"] {
            assert!(is_real_disk(name), "{} should be a real disk", name);
        }
        for name in ["sd", "loop0", "sr0", "nvme0", "nvmen1", "mmcblk", "dm-0", "zram0", "nvme0n1p2x"] {
            assert!(!is_real_disk(name), "{} should not be a real disk", name);
        }
    }

    #[test]
    fn test_installed_when_home_on_disk() {
        assert_eq!(
            classify_environment(Some("nvme0n1p2"), PARTITIONS),
            Environment::Installed
        );
    }

    #[test]
    fn test_live_when_home_on_loop_or_overlay() {
        assert_eq!(classify_environment(Some("loop0"), PARTITIONS), Environment::Live);
        assert_eq!(classify_environment(Some("overlay"), PARTITIONS), Environment::Live);
        assert_eq!(classify_environment(None, PARTITIONS), Environment::Live);
    }

    #[test]
    fn test_mount_source_longest_prefix() {
        let mounts = "\
/dev/nvme0n1p2 / ext4 rw,relatime 0 0
tmpfs /tmp tmpfs rw 0 0
/dev/sda1 /home ext4 rw 0 0
";
        assert_eq!(
            mount_source_for(mounts, Path::new("/home/raffaele")).as_deref(),
            Some("/dev/sda1")
        );
        assert_eq!(
            mount_source_for(mounts, Path::new("/root")).as_deref(),
            Some("/dev/nvme0n1p2")
        );
    }

    #[test]
    fn test_mount_prefix_is_component_wise() {
        let mounts = "/dev/sda1 / ext4 rw 0 0\n/dev/sdb1 /home2 ext4 rw 0 0\n";
        assert_eq!(
            mount_source_for(mounts, Path::new("/home/user")).as_deref(),
            Some("/dev/sda1")
        );
    }

    #[test]
    fn test_resolve_device_plain_name() {
        assert_eq!(resolve_device("overlay"), "overlay");
    }

    #[test]
    fn test_environment_display() {
        assert_eq!(Environment::Live.to_string(), "live");
        assert_eq!(Environment::Foreign.to_string(), "foreign");
    }
}
