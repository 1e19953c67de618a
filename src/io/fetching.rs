//! Structure retrieval from the RCSB data bank

use crate::error::Result;
use reqwest::blocking::Client;
use std::fs::File;
use std::io::copy;
use std::path::{Path, PathBuf};

const RCSB_URL: &str = "https://files.rcsb.org/download/";

/// Directory structures are downloaded into when none is configured
pub const DEFAULT_DOWNLOAD_DIR: &str = "PDB";

/// Downloads PDB entries from the RCSB data bank into a local directory.
///
/// An entry that is already present locally is returned without touching
/// the network.
pub struct Fetcher {
    client: Client,
    download_dir: PathBuf,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(DEFAULT_DOWNLOAD_DIR)
    }
}

impl Fetcher {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            client: Client::new(),
            download_dir: download_dir.into(),
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    /// Fetch a single PDB entry, returning the local file path.
    ///
    /// Retrieval failures (unknown identifier, network trouble) propagate
    /// unmodified; the local file is only created after the server answered
    /// successfully, so a failed fetch leaves nothing behind.
    pub fn fetch(&self, pdb_id: &str) -> Result<PathBuf> {
        if !self.download_dir.exists() {
            std::fs::create_dir_all(&self.download_dir)?;
        }

        let pdb_id_upper = pdb_id.to_uppercase();
        let filename = format!("{}.pdb", pdb_id_upper);
        let target_path = self.download_dir.join(&filename);

        if target_path.exists() {
            log::debug!("{} already present, skipping download", target_path.display());
            return Ok(target_path);
        }

        let url = format!("{}{}", RCSB_URL, filename);
        log::debug!("Fetching {}", url);
        let mut response = self.client.get(&url).send()?.error_for_status()?;

        let mut file = File::create(&target_path)?;
        copy(&mut response, &mut file)?;

        Ok(target_path)
    }

    /// Fetch several entries, preserving input order and cardinality.
    /// The first failure aborts the whole call.
    pub fn fetch_batch<S: AsRef<str>>(&self, pdb_ids: &[S]) -> Result<Vec<PathBuf>> {
        pdb_ids.iter().map(|id| self.fetch(id.as_ref())).collect()
    }
}
