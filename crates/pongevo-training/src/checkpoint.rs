//! Checkpoint files and atomic JSON persistence.
//!
//! A checkpoint is the serialized evolutionary engine wrapped in a small
//! envelope ([`Checkpoint`]). One file is written per completed generation:
//!
//! ```text
//! <dir>/pongevo-checkpoint-00001.json   state after generation 0 was bred
//! <dir>/pongevo-checkpoint-00002.json
//! ...
//! ```
//!
//! The number in the file name is the engine's [`generation`] at save time,
//! which is also the index of the next generation to evaluate.
//!
//! Every file is written to a temporary file in the target directory and then
//! renamed over the destination. The data is synced to disk before the
//! rename, so a crash never leaves a truncated file.
//!
//! [`generation`]: crate::engine::EvolutionEngine::generation

use std::{
    fs,
    io::{BufWriter, Write as _},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;

use crate::{engine::EvolutionEngine, error::PersistenceError};

/// Version of the checkpoint envelope and engine layout.
pub const FORMAT_VERSION: u32 = 1;

const FILE_PREFIX: &str = "pongevo-checkpoint-";
const FILE_SUFFIX: &str = ".json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint<E> {
    pub format_version: u32,
    pub generation: usize,
    pub saved_at: DateTime<Utc>,
    pub engine: E,
}

#[derive(Deserialize)]
struct VersionHeader {
    format_version: u32,
}

/// Directory of checkpoint files.
#[derive(Debug, Clone)]
pub struct CheckpointStore {
    dir: PathBuf,
}

impl CheckpointStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, generation: usize) -> PathBuf {
        self.dir
            .join(format!("{FILE_PREFIX}{generation:05}{FILE_SUFFIX}"))
    }

    /// Writes `engine` as the checkpoint for its current generation.
    ///
    /// # Returns
    ///
    /// The path of the written file, as given by [`Self::path_for`].
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Json`] if the engine cannot be serialized
    /// and [`PersistenceError::Io`] if the file cannot be written.
    pub fn save<E>(&self, engine: &E) -> Result<PathBuf, PersistenceError>
    where
        E: EvolutionEngine + Serialize,
    {
        let checkpoint = Checkpoint {
            format_version: FORMAT_VERSION,
            generation: engine.generation(),
            saved_at: Utc::now(),
            engine,
        };
        let path = self.path_for(checkpoint.generation);
        write_json(&path, &checkpoint)?;
        Ok(path)
    }

    /// Path of the checkpoint with the highest generation, if any.
    ///
    /// A missing directory counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the directory exists but cannot be
    /// listed.
    pub fn latest(&self) -> Result<Option<PathBuf>, PersistenceError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PersistenceError::io(&self.dir, e)),
        };
        let mut latest: Option<(usize, PathBuf)> = None;
        for entry in entries {
            let entry = entry.map_err(|e| PersistenceError::io(&self.dir, e))?;
            let name = entry.file_name();
            let Some(generation) = name.to_str().and_then(parse_generation) else {
                continue;
            };
            if latest.as_ref().is_none_or(|(g, _)| generation > *g) {
                latest = Some((generation, entry.path()));
            }
        }
        Ok(latest.map(|(_, path)| path))
    }

    /// Like [`Self::latest`], but a missing checkpoint is an error.
    pub fn require_latest(&self) -> Result<PathBuf, PersistenceError> {
        self.latest()?.ok_or_else(|| PersistenceError::NoCheckpoint {
            dir: self.dir.clone(),
        })
    }

    /// Reads a checkpoint, rejecting other format versions.
    ///
    /// # Arguments
    ///
    /// * `path` - A checkpoint file, usually from [`Self::latest`].
    ///
    /// # Errors
    ///
    /// - [`PersistenceError::Io`] if the file cannot be read.
    /// - [`PersistenceError::FormatVersion`] if it was written by another
    ///   format version.
    /// - [`PersistenceError::Json`] if it is malformed or the engine inside
    ///   fails its own validation while deserializing.
    pub fn load<E>(path: &Path) -> Result<Checkpoint<E>, PersistenceError>
    where
        E: DeserializeOwned,
    {
        let json = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
        let header: VersionHeader =
            serde_json::from_str(&json).map_err(|e| PersistenceError::json(path, e))?;
        if header.format_version != FORMAT_VERSION {
            return Err(PersistenceError::FormatVersion {
                path: path.to_owned(),
                found: header.format_version,
                expected: FORMAT_VERSION,
            });
        }
        serde_json::from_str(&json).map_err(|e| PersistenceError::json(path, e))
    }
}

fn parse_generation(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}

/// Writes `value` as pretty JSON, replacing `path` atomically.
///
/// Missing parent directories are created.
///
/// # Errors
///
/// Returns [`PersistenceError::Json`] if `value` cannot be serialized and
/// [`PersistenceError::Io`] if creating, syncing or renaming the file fails.
/// On error `path` keeps its previous content.
pub fn write_json<T>(path: &Path, value: &T) -> Result<(), PersistenceError>
where
    T: Serialize + ?Sized,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| PersistenceError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| PersistenceError::io(dir, e))?;
    {
        let mut writer = BufWriter::new(file.as_file_mut());
        serde_json::to_writer_pretty(&mut writer, value)
            .map_err(|e| PersistenceError::json(path, e))?;
        writer
            .write_all(b"\n")
            .and_then(|()| writer.flush())
            .map_err(|e| PersistenceError::io(path, e))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|e| PersistenceError::io(path, e))?;
    file.persist(path)
        .map_err(|e| PersistenceError::io(path, e.error))?;
    Ok(())
}

/// Reads a JSON file into `T`.
pub fn read_json<T>(path: &Path) -> Result<T, PersistenceError>
where
    T: DeserializeOwned,
{
    let json = fs::read_to_string(path).map_err(|e| PersistenceError::io(path, e))?;
    serde_json::from_str(&json).map_err(|e| PersistenceError::json(path, e))
}
