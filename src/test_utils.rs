//! Test utilities shared across the crate

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Serializes tests that write and run fake credential helpers.
///
/// Writing an executable while another thread forks can make the exec fail
/// with "text file busy", so helper tests hold this lock for their duration.
pub static HELPER_MUTEX: Mutex<()> = Mutex::const_new(());

/// Write an executable `docker-credential-<name>` shell script into `dir`
#[cfg(unix)]
pub fn write_helper(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(format!("docker-credential-{}", name));
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

/// Helper settings that only look for programs in `dir`
pub fn helper_settings(dir: &Path, timeout_ms: u64) -> crate::provider::HelperSettings {
    crate::provider::HelperSettings {
        timeout: std::time::Duration::from_millis(timeout_ms),
        search_path: Some(dir.as_os_str().to_owned()),
    }
}
