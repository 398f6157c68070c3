//! Loaders for NASA PCoE prognostics datasets.
//!
//! Available with the `datasets` feature. Archives are downloaded on first
//! use and cached for the life of the process.

pub mod cmapss2;

use thiserror::Error;

/// Errors raised while loading a dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// The requested dataset id is not part of the collection.
    #[error("unknown dataset `{id}`, available datasets: {available:?}")]
    UnknownDataset {
        id: String,
        available: &'static [&'static str],
    },

    #[error("failed to download dataset archive")]
    Download(#[from] reqwest::Error),

    #[error("invalid dataset archive")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read dataset file")]
    Io(#[from] std::io::Error),
}
