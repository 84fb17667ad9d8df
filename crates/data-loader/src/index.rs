//! Artifact persistence for the `Catalog`.
//!
//! The offline build writes four flat files into an artifacts directory:
//! - movie_list.json: `Vec<MovieRecord>` in row order
//! - similarity.bin: bincode-encoded `SimilarityMatrix`
//! - vectorizer.json: `VectorizerModel`
//! - genres.json: sorted distinct genre names
//!
//! All four must be present and index-aligned for the service to start.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

pub const MOVIE_LIST_FILE: &str = "movie_list.json";
pub const SIMILARITY_FILE: &str = "similarity.bin";
pub const VECTORIZER_FILE: &str = "vectorizer.json";
pub const GENRES_FILE: &str = "genres.json";

const STAGING_SUFFIX: &str = "staging";
const PREVIOUS_SUFFIX: &str = "previous";

fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    Ok(fs::read(path)?)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = read_bytes(path)?;
    serde_json::from_slice(&bytes).map_err(|e| DataLoadError::Serialization {
        artifact: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let bytes = serde_json::to_vec(value).map_err(|e| DataLoadError::Serialization {
        artifact: path.display().to_string(),
        reason: e.to_string(),
    })?;
    fs::write(path, bytes)?;
    Ok(())
}

fn read_matrix(path: &Path) -> Result<SimilarityMatrix> {
    let bytes = read_bytes(path)?;
    let matrix: SimilarityMatrix =
        bincode::deserialize(&bytes).map_err(|e| DataLoadError::Serialization {
            artifact: path.display().to_string(),
            reason: e.to_string(),
        })?;
    // Decoding bypasses `SimilarityMatrix::new`, so re-check the buffer length
    matrix.validated()
}

impl Catalog {
    /// Load all artifacts from a directory and validate their alignment.
    ///
    /// The four files are decoded in parallel with rayon; the matrix is by far
    /// the largest and dominates start-up time.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        info!("Loading catalog artifacts from {:?}", dir);

        let ((movies, similarity), (vectorizer, genres)) = rayon::join(
            || {
                rayon::join(
                    || read_json::<Vec<MovieRecord>>(&dir.join(MOVIE_LIST_FILE)),
                    || read_matrix(&dir.join(SIMILARITY_FILE)),
                )
            },
            || {
                rayon::join(
                    || read_json::<VectorizerModel>(&dir.join(VECTORIZER_FILE)),
                    || read_json::<Vec<String>>(&dir.join(GENRES_FILE)),
                )
            },
        );

        let catalog = Catalog::new(movies?, similarity?, vectorizer?, genres?)?;
        info!(
            "Catalog loaded: {} movies, {} genres, {} vocabulary terms",
            catalog.len(),
            catalog.genres.len(),
            catalog.vectorizer.vocabulary.len()
        );
        Ok(catalog)
    }

    /// Persist all artifacts into `dir`.
    ///
    /// The set is written into a sibling staging directory, which then
    /// replaces `dir` as a whole. Readers see either the previous set or the
    /// new one, never a mix; a failed write leaves `dir` untouched.
    pub fn save_to_dir(&self, dir: &Path) -> Result<()> {
        let staging = sibling(dir, STAGING_SUFFIX)?;
        let previous = sibling(dir, PREVIOUS_SUFFIX)?;

        remove_dir_if_exists(&staging)?;
        fs::create_dir_all(&staging)?;
        if let Err(e) = self.write_artifacts(&staging) {
            let _ = fs::remove_dir_all(&staging);
            return Err(e);
        }

        remove_dir_if_exists(&previous)?;
        if dir.exists() {
            fs::rename(dir, &previous)?;
        }
        if let Err(e) = fs::rename(&staging, dir) {
            if previous.exists() {
                let _ = fs::rename(&previous, dir);
            }
            return Err(e.into());
        }
        remove_dir_if_exists(&previous)?;

        info!("Wrote catalog artifacts to {:?}", dir);
        Ok(())
    }

    fn write_artifacts(&self, dir: &Path) -> Result<()> {
        write_json(&dir.join(MOVIE_LIST_FILE), &self.movies)?;
        let matrix = bincode::serialize(&self.similarity).map_err(|e| {
            DataLoadError::Serialization {
                artifact: SIMILARITY_FILE.to_string(),
                reason: e.to_string(),
            }
        })?;
        fs::write(dir.join(SIMILARITY_FILE), matrix)?;
        write_json(&dir.join(VECTORIZER_FILE), &self.vectorizer)?;
        write_json(&dir.join(GENRES_FILE), &self.genres)?;
        Ok(())
    }
}

/// Hidden path next to `dir`, e.g. `artifacts` -> `.artifacts.staging`
fn sibling(dir: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dir.file_name().ok_or_else(|| {
        DataLoadError::ValidationError(format!("artifacts path {:?} has no directory name", dir))
    })?;
    Ok(dir.with_file_name(format!(".{}.{}", name.to_string_lossy(), suffix)))
}

fn remove_dir_if_exists(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_dir_all(path)?;
    }
    Ok(())
}
