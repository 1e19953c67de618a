//! Backbone torsion extraction and Ramachandran plotting
//!
//! Fetches PDB entries from the RCSB data bank, extracts per-residue
//! backbone dihedral (phi/psi) pairs, and renders them on a Ramachandran
//! plot over a reference density background.
//!
//! # Examples
//! ```no_run
//! use ramoxide::{phi_psi, plot, Fetcher, PlotConfig};
//!
//! # fn main() -> ramoxide::Result<()> {
//! let path = Fetcher::default().fetch("1MBN")?;
//! let extraction = phi_psi(&path)?;
//! println!("{} residues with complete angles", extraction.degrees.len());
//!
//! plot(&path, &PlotConfig::default())?;
//! # Ok(())
//! # }
//! ```

pub mod chem;
pub mod error;
pub mod formats;
pub mod geometry;
pub mod io;
pub mod plot;
pub mod processing;
pub mod structure;
pub mod torsions;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{Result, TorsionError};
pub use io::fetching::Fetcher;
pub use plot::{plot, plot_batch, Colormap, Palette, PlotConfig, PlotOutput};
pub use torsions::{
    phi_psi, phi_psi_batch, write_ignored_table, AnglePair, AngleTable, DegreeSeries, Extraction,
    ResidueKey,
};
