//! # File I/O
//!
//! Estimate file operations with safety features:
//! - **Atomic saves**: write to .tmp, fsync, rename — no torn files
//! - **Overwrite backups**: the previous file survives as `.est.bak`, so
//!   destructive edits (a deleted part, a re-imported sheet) can be
//!   recovered from the last save
//! - **Advisory locking**: one writer per estimate, even on shared drives
//! - **Version validation**: reject files from an incompatible schema
//!
//! Estimates are saved as `.est` files containing JSON. Lock files use the
//! `.est.lock` extension and carry metadata about who holds the lock.
//!
//! The lock realizes the estimate's concurrency model: the whole estimate
//! is one unit of mutual exclusion, so the lock covers the file as a
//! whole rather than any finer-grained region.
//!
//! ## Example
//!
//! ```rust,no_run
//! use estimate_core::file_io::{save_estimate, load_estimate, FileLock};
//! use estimate_core::estimate::Estimate;
//! use std::path::Path;
//!
//! let estimate = Estimate::new("Residence", "Engineer", "Client");
//! let path = Path::new("residence.est");
//!
//! let lock = FileLock::acquire(path, "engineer@site.example")?;
//! save_estimate(&estimate, path)?;
//! drop(lock); // released
//! # Ok::<(), estimate_core::errors::EstimateError>(())
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::estimate::{Estimate, SCHEMA_VERSION};

/// Lock file metadata stored in .est.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    /// When the lock was acquired
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Lock info for the current process.
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

/// Exclusive lock on an estimate file, released on drop.
///
/// Uses both an OS-level file lock (via fs2) for process safety and a
/// `.lock` metadata file so other users can see who holds it.
pub struct FileLock {
    estimate_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    /// Lock metadata
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on an estimate file.
    ///
    /// Fails with `FileLocked` if another live process holds the lock.
    /// A stale lock (dead process, or older than 24 hours) is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> EstimateResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if lock_path.exists() {
            if let Ok(existing) = read_lock_info(&lock_path) {
                if !is_lock_stale(&existing) {
                    return Err(EstimateError::file_locked(
                        path.display().to_string(),
                        format!("{} ({})", existing.user_id, existing.machine),
                        existing.locked_at.to_rfc3339(),
                    ));
                }
            }
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| {
                EstimateError::file_error(
                    "create lock",
                    lock_path.display().to_string(),
                    e.to_string(),
                )
            })?;

        lock_file.try_lock_exclusive().map_err(|_| {
            EstimateError::file_locked(
                path.display().to_string(),
                "another process".to_string(),
                "unknown".to_string(),
            )
        })?;

        let lock_json =
            serde_json::to_string_pretty(&info).map_err(|e| EstimateError::SerializationError {
                reason: e.to_string(),
            })?;
        lock_file.write_all(lock_json.as_bytes()).map_err(|e| {
            EstimateError::file_error("write lock", lock_path.display().to_string(), e.to_string())
        })?;
        lock_file.sync_all().map_err(|e| {
            EstimateError::file_error("sync lock", lock_path.display().to_string(), e.to_string())
        })?;

        Ok(FileLock {
            estimate_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check whether a file is locked without acquiring the lock.
    pub fn check(path: &Path) -> Option<LockInfo> {
        let lock_path = lock_path_for(path);
        if lock_path.exists() {
            if let Ok(info) = read_lock_info(&lock_path) {
                if !is_lock_stale(&info) {
                    return Some(info);
                }
            }
        }
        None
    }

    /// Path to the locked estimate file.
    pub fn estimate_path(&self) -> &Path {
        &self.estimate_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = fs::remove_file(&self.lock_path);
        // OS lock released when _lock_file drops
    }
}

fn lock_path_for(estimate_path: &Path) -> PathBuf {
    let mut lock_path = estimate_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> EstimateResult<LockInfo> {
    let mut file = File::open(lock_path).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read lock", lock_path.display().to_string(), e.to_string())
    })?;
    serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
        reason: e.to_string(),
    })
}

/// A lock is stale if its process is gone (same machine) or it is more
/// than 24 hours old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if let Some(our_machine) = hostname() {
        if info.machine == our_machine {
            #[cfg(unix)]
            {
                if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                    return true;
                }
            }
            #[cfg(windows)]
            {
                use std::process::Command;
                let output = Command::new("tasklist")
                    .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                    .output();
                if let Ok(output) = output {
                    let stdout = String::from_utf8_lossy(&output.stdout);
                    if stdout.contains("No tasks") || !stdout.contains(&info.pid.to_string()) {
                        return true;
                    }
                }
            }
        }
    }

    let age = Utc::now() - info.locked_at;
    age.num_hours() > 24
}

/// Path of the rolling backup kept beside an estimate file.
pub fn backup_path_for(path: &Path) -> PathBuf {
    path.with_extension("est.bak")
}

/// Save an estimate with atomic write semantics: serialize, write to a
/// `.tmp` sibling, fsync, rename over the target.
///
/// When the target already exists, its current contents are first copied
/// to the `.est.bak` sibling. Part removal and bulk re-import are
/// irreversible inside the engine; the rolling backup is the recovery
/// point for them.
pub fn save_estimate(estimate: &Estimate, path: &Path) -> EstimateResult<()> {
    let json = serde_json::to_string_pretty(estimate).map_err(|e| {
        EstimateError::SerializationError {
            reason: e.to_string(),
        }
    })?;

    let tmp_path = path.with_extension("est.tmp");

    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        EstimateError::file_error(
            "create temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        EstimateError::file_error(
            "write temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;
    tmp_file.sync_all().map_err(|e| {
        EstimateError::file_error(
            "sync temp file",
            tmp_path.display().to_string(),
            e.to_string(),
        )
    })?;

    if path.exists() {
        let backup_path = backup_path_for(path);
        fs::copy(path, &backup_path).map_err(|e| {
            let _ = fs::remove_file(&tmp_path);
            EstimateError::file_error(
                "write backup",
                backup_path.display().to_string(),
                e.to_string(),
            )
        })?;
    }

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        EstimateError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    Ok(())
}

/// Load an estimate, validating its schema version.
pub fn load_estimate(path: &Path) -> EstimateResult<Estimate> {
    let mut file = File::open(path).map_err(|e| {
        EstimateError::file_error("open", path.display().to_string(), e.to_string())
    })?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).map_err(|e| {
        EstimateError::file_error("read", path.display().to_string(), e.to_string())
    })?;

    let estimate: Estimate =
        serde_json::from_str(&contents).map_err(|e| EstimateError::SerializationError {
            reason: format!("Invalid JSON in {}: {}", path.display(), e),
        })?;

    validate_version(&estimate.meta.version)?;
    Ok(estimate)
}

/// Load an estimate plus the lock holder, if any, so the boundary layer
/// can open read-only when someone else is editing.
pub fn load_estimate_with_lock_check(path: &Path) -> EstimateResult<(Estimate, Option<LockInfo>)> {
    let estimate = load_estimate(path)?;
    let lock_info = FileLock::check(path);
    Ok((estimate, lock_info))
}

/// Major version must match; within 0.x, a newer minor is rejected too.
fn validate_version(file_version: &str) -> EstimateResult<()> {
    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    let mismatch = || EstimateError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }
    Ok(())
}
