//! Reference density grid for the Ramachandran background
//!
//! The grid is a 100x100 evaluation of the phi/psi density of high-resolution
//! PDB structures over [-180, 180] x [-180, 180], stored as headerless
//! little-endian f64 values in row-major order with phi as rows.

use crate::error::{Result, TorsionError};

/// Samples per axis; the asset shape is implicit, there is no header
pub const GRID_SIZE: usize = 100;

// Embed the density grid at compile time so the asset is always available
// regardless of working directory.
static DENSITY_BIN: &[u8] = include_bytes!("../../data/density_estimate.dat");

/// The decoded density grid
#[derive(Debug, Clone)]
pub struct DensityGrid {
    values: Vec<f64>,
}

impl DensityGrid {
    /// Decode the packaged reference distribution
    pub fn reference() -> Result<Self> {
        Self::from_bytes(DENSITY_BIN)
    }

    /// Decode a grid from raw little-endian f64 bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let expected = GRID_SIZE * GRID_SIZE * std::mem::size_of::<f64>();
        if bytes.len() != expected {
            return Err(TorsionError::Asset(format!(
                "expected {} bytes of density data, got {}",
                expected,
                bytes.len()
            )));
        }

        let values: Vec<f64> = bytes
            .chunks_exact(8)
            .map(|chunk| {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(chunk);
                f64::from_le_bytes(buf)
            })
            .collect();

        if values.iter().any(|v| !v.is_finite()) {
            return Err(TorsionError::Asset(
                "density data contains non-finite values".into(),
            ));
        }

        Ok(Self { values })
    }

    /// Density at sample (i, j), phi-major
    pub fn value(&self, i: usize, j: usize) -> f64 {
        self.values[i * GRID_SIZE + j]
    }

    /// Phi coordinate of row i (samples span the axis inclusively)
    pub fn phi_at(i: usize) -> f64 {
        -180.0 + 360.0 * i as f64 / (GRID_SIZE - 1) as f64
    }

    /// Psi coordinate of column j
    pub fn psi_at(j: usize) -> f64 {
        Self::phi_at(j)
    }

    /// Range of ln(density) over the strictly positive samples,
    /// for colormap normalization
    pub fn log_range(&self) -> Option<(f64, f64)> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in &self.values {
            if v > 0.0 {
                let l = v.ln();
                min = min.min(l);
                max = max.max(l);
            }
        }
        (min < max).then_some((min, max))
    }
}
