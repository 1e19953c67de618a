//! Crate-wide error type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TorsionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP request error: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("Invalid PDB file: {0}")]
    InvalidPdb(String),
    #[error("Unable to fetch file: {}. PDB entry probably does not exist.", .0.display())]
    MissingFile(PathBuf),
    #[error("invalid density asset: {0}")]
    Asset(String),
    #[error("batch of {requested} structures exceeds the {available}-color palette")]
    PaletteExhausted { requested: usize, available: usize },
    #[error("drawing error: {0}")]
    Draw(String),
}

impl<E> From<plotters::drawing::DrawingAreaErrorKind<E>> for TorsionError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        TorsionError::Draw(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TorsionError>;
