//! Helpers shared by the integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Held by tests that write and run fake credential helpers
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

/// Write a Docker `config.json` into `dir`
pub fn write_docker_config(dir: &Path, json: &str) -> PathBuf {
    let path = dir.join("config.json");
    std::fs::write(&path, json).unwrap();
    path
}
