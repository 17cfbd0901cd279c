#![allow(dead_code)]

use std::{
    fs,
    os::unix::fs::PermissionsExt,
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

static EXEC_LOCK: Mutex<()> = Mutex::new(());

/// Serializes tests that write and then execute scripts.
///
/// A script still open for writing while another test forks fails to exec
/// with ETXTBSY.
pub fn exec_lock() -> MutexGuard<'static, ()> {
    EXEC_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Writes an executable `/bin/sh` script named `name` into `dir`.
pub fn write_control_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod script");
    path
}

/// Writes `contents` as `nri-unbound-config.toml` into `dir`.
pub fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("nri-unbound-config.toml");
    fs::write(&path, contents).expect("write config");
    path
}

/// `control_path` value pointing at `dir`, with the trailing slash the prefix needs.
pub fn control_path(dir: &Path) -> String {
    format!("{}/", dir.display())
}
