//! Level file loading.
//!
//! Each level is one RON file in the levels directory. Files are read
//! in name order so catalogues list levels deterministically.

use std::path::Path;

use td_core::prelude::*;
use thiserror::Error;

/// Errors raised while loading level files.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Directory listing or file read failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A level file did not parse.
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// Offending path.
        path: String,
        /// Underlying RON error.
        #[source]
        source: ron::error::SpannedError,
    },
}

/// Load every `.ron` level file in `dir` into a catalogue.
pub fn load_catalogue(dir: &Path) -> std::result::Result<LevelCatalogue, LoadError> {
    let entries = std::fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut paths: Vec<_> = entries
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    paths.sort();

    let mut levels = Vec::with_capacity(paths.len());
    for path in paths {
        let text = std::fs::read_to_string(&path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let level: LevelData = ron::from_str(&text).map_err(|source| LoadError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(level = level.id, name = %level.name, file = %path.display(), "level loaded");
        levels.push(level);
    }

    Ok(LevelCatalogue::new(levels))
}
