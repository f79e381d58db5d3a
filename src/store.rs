//! Reading and writing ddclient.conf on disk.

use crate::config::Configuration;
use crate::error::{ConfigError, Result};
use crate::parser::parse;
use crate::serializer::serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// System-wide location, also the save target when nothing was found.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/ddclient.conf";

/// Source and sink for raw configuration text.
pub trait ConfigStore {
    /// Read the full text at `path`.
    fn read(&self, path: &Path) -> Result<String>;

    /// Replace the contents of `path` with `text`.
    fn write(&self, path: &Path, text: &str) -> Result<()>;

    /// Read and parse.
    fn load(&self, path: &Path) -> Result<Configuration> {
        let text = self.read(path)?;
        let config = parse(&text);
        tracing::debug!(
            path = %path.display(),
            domains = config.domains.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Serialize and write.
    fn save(&self, config: &Configuration, path: &Path) -> Result<()> {
        for domain in &config.domains {
            if !domain.has_marker_name() {
                tracing::warn!(
                    domain = %domain.name,
                    "Domain name will not be recognized when the file is read back"
                );
            }
        }
        self.write(path, &serialize(config))?;
        tracing::debug!(path = %path.display(), "Saved configuration");
        Ok(())
    }
}

/// Filesystem store. Writes go to a uniquely named temporary file next to
/// the destination which is then renamed over it, so a failed write leaves the
/// old file as is. Symlinks are followed and the existing file mode is kept;
/// new files are created owner-only.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl FileStore {
    pub fn new() -> Self {
        Self
    }

    /// The file a write to `path` should replace: the symlink target if
    /// `path` resolves, else `path` itself.
    fn write_target(path: &Path) -> PathBuf {
        fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }
}

impl ConfigStore for FileStore {
    fn read(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| ConfigError::from_read(path, e))
    }

    fn write(&self, path: &Path, text: &str) -> Result<()> {
        let write_err = |source: std::io::Error| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        let target = Self::write_target(path);
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropped (and deleted) on any early return.
        let mut temp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        if let Ok(meta) = fs::metadata(&target) {
            temp.as_file()
                .set_permissions(meta.permissions())
                .map_err(write_err)?;
        }
        temp.write_all(text.as_bytes()).map_err(write_err)?;
        temp.as_file().sync_all().map_err(write_err)?;
        temp.persist(&target).map_err(|e| write_err(e.error))?;

        tracing::trace!(path = %target.display(), bytes = text.len(), "Wrote file");
        Ok(())
    }
}

/// Conventional locations, most authoritative first.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(SYSTEM_CONFIG_PATH)];
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join("ddclient.conf"));
        paths.push(home.join(".ddclient.conf"));
    }
    paths
}

/// First existing path among `candidates`.
pub fn discover_in(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|p| p.exists())
        .cloned()
        .ok_or_else(|| {
            let tried: Vec<_> = candidates.iter().map(|p| p.display().to_string()).collect();
            ConfigError::NotFound(format!("tried {}", tried.join(", ")))
        })
}

/// Find ddclient.conf in the conventional locations.
pub fn discover() -> Result<PathBuf> {
    let path = discover_in(&default_paths())?;
    tracing::debug!(path = %path.display(), "Found configuration file");
    Ok(path)
}

/// Load `path` from disk.
pub fn load(path: &Path) -> Result<Configuration> {
    FileStore.load(path)
}

/// Write `config` to `path`.
pub fn save(config: &Configuration, path: &Path) -> Result<()> {
    FileStore.save(config, path)
}

/// Load an explicit path, or the discovered one when `path` is `None`.
///
/// A missing file is not an error here: the result is an empty configuration
/// and no path. Read errors are returned.
pub fn load_or_default(
    store: &impl ConfigStore,
    path: Option<&Path>,
) -> Result<(Option<PathBuf>, Configuration)> {
    let resolved = match path {
        Some(p) => Ok(p.to_path_buf()),
        None => discover(),
    };

    let outcome = resolved.and_then(|p| store.load(&p).map(|config| (p, config)));

    match outcome {
        Ok((p, config)) => Ok((Some(p), config)),
        Err(e) if e.is_not_found() => {
            tracing::warn!("{}; starting with an empty configuration", e);
            Ok((None, Configuration::default()))
        }
        Err(e) => Err(e),
    }
}
