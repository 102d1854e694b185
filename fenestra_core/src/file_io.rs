//! # File I/O Module
//!
//! Reads and writes the files the engine works with:
//! - **Quote projects** (`.fnq`, JSON) with atomic saves, file locking and
//!   schema version checks
//! - **Catalog snapshots** (JSON) consumed through [`CatalogLookup`](crate::catalog::CatalogLookup)
//! - **Engine settings** (TOML)
//!
//! Lock files use the `.fnq.lock` extension and record who holds the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fenestra_core::file_io::{save_project, load_project, FileLock};
//! use fenestra_core::project::QuoteProject;
//! use std::path::Path;
//!
//! let project = QuoteProject::new("Acme Construction", "Q-25-001");
//! let path = Path::new("acme.fnq");
//!
//! // Acquire lock before saving
//! let lock = FileLock::acquire(path, "sales@workshop.com").unwrap();
//!
//! save_project(&project, path).unwrap();
//!
//! // Lock is released when dropped
//! drop(lock);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogSnapshot;
use crate::errors::{CalcError, CalcResult};
use crate::project::{QuoteProject, SCHEMA_VERSION};
use crate::settings::EngineSettings;

/// Extension of quote project files
pub const PROJECT_EXTENSION: &str = "fnq";

/// Lock file metadata stored in .fnq.lock files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// User identifier (email or username)
    pub user_id: String,
    /// Machine name where lock was acquired
    pub machine: String,
    /// Process ID that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    /// Create new lock info for the current process
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

/// File lock guard that releases the lock when dropped.
///
/// Holds an OS-level lock (via fs2) and writes a `.lock` file with
/// metadata so other users can see who has the quote open.
pub struct FileLock {
    project_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a project file.
    ///
    /// Fails with `CalcError::FileLocked` while another live process holds it.
    /// A stale lock (dead process, or older than a day) is taken over.
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !is_lock_stale(&existing) {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            tracing::warn!(
                path = %path.display(),
                holder = %existing.user_id,
                "taking over stale lock"
            );
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        // Non-blocking
        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let lock_json = serde_json::to_string_pretty(&info).map_err(|e| CalcError::serialization(e.to_string()))?;
        lock_file
            .write_all(lock_json.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        tracing::debug!(path = %path.display(), user = %info.user_id, "lock acquired");
        Ok(FileLock {
            project_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Check if a file is locked without acquiring the lock.
    ///
    /// Returns `Some(LockInfo)` if locked, `None` if available.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !is_lock_stale(info))
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // OS lock goes with _lock_file
        let _ = fs::remove_file(&self.lock_path);
    }
}

fn lock_path_for(project_path: &Path) -> PathBuf {
    let mut lock_path = project_path.to_path_buf();
    let extension = lock_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    lock_path.set_extension(extension);
    lock_path
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = read_text(lock_path)?;
    serde_json::from_str(&contents).map_err(|e| CalcError::serialization(e.to_string()))
}

/// A lock is stale when its process is gone (same machine) or it is over a day old.
fn is_lock_stale(info: &LockInfo) -> bool {
    if hostname().as_deref() == Some(info.machine.as_str()) {
        #[cfg(windows)]
        {
            use std::process::Command;
            let output = Command::new("tasklist")
                .args(["/FI", &format!("PID eq {}", info.pid), "/NH"])
                .output();
            if let Ok(output) = output {
                let stdout = String::from_utf8_lossy(&output.stdout);
                if !stdout.contains(&info.pid.to_string()) {
                    return true;
                }
            }
        }
        #[cfg(unix)]
        {
            if fs::metadata(format!("/proc/{}", info.pid)).is_err() {
                return true;
            }
        }
    }

    (Utc::now() - info.locked_at).num_hours() > 24
}

fn read_text(path: &Path) -> CalcResult<String> {
    fs::read_to_string(path).map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))
}

/// Write `contents` to `path` atomically.
///
/// Writes to a sibling `.tmp` file, syncs it to disk, then renames it over
/// the target, so an interrupted save never leaves a truncated file.
fn write_atomic(path: &Path, contents: &str) -> CalcResult<()> {
    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    let mut tmp_file = File::create(&tmp_path)
        .map_err(|e| CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .write_all(contents.as_bytes())
        .map_err(|e| CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string()))?;

    tmp_file
        .sync_all()
        .map_err(|e| CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string()))?;

    fs::rename(&tmp_path, path).map_err(|e| {
        let _ = fs::remove_file(&tmp_path);
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })
}

/// Save a project to a file with atomic write semantics.
///
/// # Example
///
/// ```rust,no_run
/// use fenestra_core::file_io::save_project;
/// use fenestra_core::project::QuoteProject;
/// use std::path::Path;
///
/// let project = QuoteProject::new("Acme Construction", "Q-25-001");
/// save_project(&project, Path::new("acme.fnq"))?;
/// # Ok::<(), fenestra_core::errors::CalcError>(())
/// ```
pub fn save_project(project: &QuoteProject, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(project).map_err(|e| CalcError::serialization(e.to_string()))?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), items = project.item_count(), "project saved");
    Ok(())
}

/// Save a new project, refusing to replace a file that already exists.
pub fn create_project(project: &QuoteProject, path: &Path) -> CalcResult<()> {
    if path.exists() {
        return Err(CalcError::file_error(
            "create",
            path.display().to_string(),
            "File already exists",
        ));
    }
    save_project(project, path)
}

/// Load a project from a file.
///
/// # Returns
///
/// * `Ok(QuoteProject)` - Successfully loaded project
/// * `Err(CalcError::VersionMismatch)` - File version is incompatible
/// * `Err(CalcError::SerializationError)` - Invalid JSON
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_project(path: &Path) -> CalcResult<QuoteProject> {
    let contents = read_text(path)?;

    let project: QuoteProject = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid JSON in {}: {}", path.display(), e)))?;

    validate_version(&project.meta.version)?;

    tracing::info!(path = %path.display(), items = project.item_count(), "project loaded");
    Ok(project)
}

/// Load a project, returning whether it's read-only due to a lock.
///
/// # Returns
///
/// * `Ok((QuoteProject, None))` - Loaded successfully, no lock
/// * `Ok((QuoteProject, Some(LockInfo)))` - Loaded, but another user has the lock
pub fn load_project_with_lock_check(path: &Path) -> CalcResult<(QuoteProject, Option<LockInfo>)> {
    let project = load_project(path)?;
    let lock_info = FileLock::check(path);
    Ok((project, lock_info))
}

/// Validate that a file version is compatible with the current schema.
///
/// Major versions must match; while in 0.x, a file from a newer minor
/// version is rejected as well.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };

    let file_parts = parse(file_version);
    let current_parts = parse(SCHEMA_VERSION);

    match (file_parts.as_slice(), current_parts.as_slice()) {
        ([file_major, ..], [major, ..]) if file_major != major => Err(mismatch()),
        ([0, file_minor, ..], [0, minor, ..]) if file_minor > minor => Err(mismatch()),
        ([_, ..], [_, ..]) => Ok(()),
        _ => Err(mismatch()),
    }
}

/// Load a catalog snapshot from a JSON file.
pub fn load_catalog(path: &Path) -> CalcResult<CatalogSnapshot> {
    let contents = read_text(path)?;
    let catalog: CatalogSnapshot = serde_json::from_str(&contents)
        .map_err(|e| CalcError::serialization(format!("Invalid catalog in {}: {}", path.display(), e)))?;

    tracing::info!(
        path = %path.display(),
        systems = catalog.systems.len(),
        profiles = catalog.profiles.len(),
        hardware = catalog.hardware.len(),
        glass = catalog.glass.len(),
        "catalog loaded"
    );
    Ok(catalog)
}

/// Save a catalog snapshot as pretty JSON (atomic write).
pub fn save_catalog(catalog: &CatalogSnapshot, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(catalog).map_err(|e| CalcError::serialization(e.to_string()))?;
    write_atomic(path, &json)?;
    tracing::info!(path = %path.display(), "catalog saved");
    Ok(())
}

/// Load engine settings from a TOML file. Missing keys keep their defaults.
pub fn load_settings(path: &Path) -> CalcResult<EngineSettings> {
    let settings = EngineSettings::from_toml_str(&read_text(path)?)?;
    tracing::debug!(path = %path.display(), ?settings, "settings loaded");
    Ok(settings)
}
