//! N-CMAPSS turbofan engine degradation simulation data.
//!
//! The whole collection ships as a single large archive, so the first call
//! to [`load_data`] can take a while on a slow connection. Each trajectory is
//! returned as the raw bytes of its HDF5 file.

use std::{
    io::{Cursor, Read},
    sync::{Mutex, PoisonError},
};

use tracing::{debug, info};
use zip::ZipArchive;

use super::DatasetError;

/// Ids of the trajectories in the collection.
pub const DATASETS: [&str; 10] = [
    "DS01-005",
    "DS02-006",
    "DS03-012",
    "DS04",
    "DS05",
    "DS06",
    "DS07",
    "DS08a-009",
    "DS08c-008",
    "DS08d-010",
];

/// Location of the N-CMAPSS archive in the PCoE data repository.
pub const URL: &str = "https://ti.arc.nasa.gov/c/47/";

type Archive = ZipArchive<Cursor<Vec<u8>>>;

static CACHE: Mutex<Option<Archive>> = Mutex::new(None);

/// Loads the HDF5 file of one trajectory.
///
/// Downloads the archive on first use and reuses it afterwards.
///
/// # Errors
///
/// - [`DatasetError::UnknownDataset`] if `id` is not in [`DATASETS`].
/// - [`DatasetError::Download`] if the archive cannot be fetched.
/// - [`DatasetError::Archive`] or [`DatasetError::Io`] if the archive or the
///   trajectory file cannot be read.
pub fn load_data(id: &str) -> Result<Vec<u8>, DatasetError> {
    load_with(&CACHE, id, download)
}

/// Drops the cached archive so the next load downloads it again.
pub fn clear_cache() {
    clear(&CACHE);
}

fn download() -> Result<Vec<u8>, DatasetError> {
    info!(url = URL, "downloading N-CMAPSS archive");
    let response = reqwest::blocking::get(URL)?.error_for_status()?;
    let bytes = response.bytes()?;
    debug!(bytes = bytes.len(), "downloaded N-CMAPSS archive");
    Ok(bytes.to_vec())
}

fn load_with<F>(cache: &Mutex<Option<Archive>>, id: &str, fetch: F) -> Result<Vec<u8>, DatasetError>
where
    F: FnOnce() -> Result<Vec<u8>, DatasetError>,
{
    if !DATASETS.contains(&id) {
        return Err(DatasetError::UnknownDataset {
            id: id.to_owned(),
            available: &DATASETS,
        });
    }

    let mut cached = cache.lock().unwrap_or_else(PoisonError::into_inner);
    let mut archive = match cached.take() {
        Some(archive) => archive,
        None => ZipArchive::new(Cursor::new(fetch()?))?,
    };

    let data = read_trajectory(&mut archive, id);
    *cached = Some(archive);
    data
}

fn read_trajectory(archive: &mut Archive, id: &str) -> Result<Vec<u8>, DatasetError> {
    let name = format!("data_set/N-CMAPSS_{id}.h5");
    let mut file = archive.by_name(&name)?;

    let mut data = Vec::new();
    file.read_to_end(&mut data)?;
    debug!(file = %name, bytes = data.len(), "read trajectory");
    Ok(data)
}

fn clear(cache: &Mutex<Option<Archive>>) {
    *cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
}
