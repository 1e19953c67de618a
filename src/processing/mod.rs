//! Residue-level processing

pub mod residues;

pub use residues::{build_peptides, PeptideSegment, ProcessedStructure, ResidueInfo};
