//! Residue grouping and peptide segmentation
//!
//! Groups raw atoms by residue and builds the maximal contiguous peptide
//! segments of each chain. A segment breaks wherever backbone continuity is
//! broken: a non-standard residue, missing backbone atoms, or a C(i-1)-N(i)
//! distance beyond peptide-bond range.

use crate::chem::{is_standard_aa, BACKBONE_ATOMS};
use crate::error::{Result, TorsionError};
use crate::structure::RawAtomData;
use std::collections::HashMap;

/// Maximum C(i-1)-N(i) distance (Angstroms) still counted as a peptide bond
pub const PEPTIDE_BOND_MAX: f64 = 1.8;

/// Residue identifier (unique combination of model, chain, resid, insertion code)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct GroupKey {
    model_id: usize,
    chain_id: String,
    res_id: i32,
    insertion_code: char,
}

/// Information about a single residue
#[derive(Debug, Clone)]
pub struct ResidueInfo {
    pub res_id: i32,
    pub res_name: String,
    pub chain_id: String,
    pub insertion_code: char,
    pub model_id: usize,
    pub start_atom: usize, // Index of first atom
    pub num_atoms: usize,  // Number of atoms in this residue
}

/// Processed structure with residue-level organization
#[derive(Debug)]
pub struct ProcessedStructure {
    pub raw_atoms: RawAtomData,
    pub residue_info: Vec<ResidueInfo>,
    pub num_residues: usize,
    pub num_models: usize,
}

impl ProcessedStructure {
    /// Create a ProcessedStructure from RawAtomData
    pub fn from_raw(raw_atoms: RawAtomData) -> Result<Self> {
        if raw_atoms.num_atoms == 0 {
            return Err(TorsionError::InvalidPdb("no atoms in structure".into()));
        }

        // Build residue ID to atom indices mapping
        let mut residue_atoms: HashMap<GroupKey, Vec<usize>> = HashMap::new();

        for i in 0..raw_atoms.num_atoms {
            let key = GroupKey {
                model_id: raw_atoms.model_ids[i],
                chain_id: raw_atoms.chain_ids[i].clone(),
                res_id: raw_atoms.res_ids[i],
                insertion_code: raw_atoms.insertion_codes[i],
            };
            residue_atoms.entry(key).or_default().push(i);
        }

        // Traversal order: models, then chains, then residues
        let mut keys: Vec<_> = residue_atoms.keys().cloned().collect();
        keys.sort_by(|a, b| {
            a.model_id
                .cmp(&b.model_id)
                .then(a.chain_id.cmp(&b.chain_id))
                .then(a.res_id.cmp(&b.res_id))
                .then(a.insertion_code.cmp(&b.insertion_code))
        });

        let mut residue_info = Vec::with_capacity(keys.len());
        let mut models = Vec::new();

        for key in &keys {
            let atom_indices = &residue_atoms[key];
            let start_atom = atom_indices[0];

            residue_info.push(ResidueInfo {
                res_id: key.res_id,
                res_name: raw_atoms.res_names[start_atom].clone(),
                chain_id: key.chain_id.clone(),
                insertion_code: key.insertion_code,
                model_id: key.model_id,
                start_atom,
                num_atoms: atom_indices.len(),
            });

            if !models.contains(&key.model_id) {
                models.push(key.model_id);
            }
        }

        let num_residues = residue_info.len();
        log::debug!(
            "Grouped {} atoms into {} residues across {} model(s)",
            raw_atoms.num_atoms,
            num_residues,
            models.len()
        );

        Ok(Self {
            raw_atoms,
            residue_info,
            num_residues,
            num_models: models.len(),
        })
    }

    /// First atom with the given name in a residue, honoring file order
    /// (the first alternate location wins)
    pub fn backbone_atom(&self, res: &ResidueInfo, name: &str) -> Option<[f64; 3]> {
        let start = res.start_atom;
        let end = start + res.num_atoms;
        (start..end)
            .find(|&i| self.raw_atoms.atom_names[i] == name)
            .map(|i| self.raw_atoms.position(i))
    }

    /// Whether a residue can participate in a peptide segment:
    /// a standard amino acid from an ATOM record with N, CA and C present
    fn is_peptide_residue(&self, res: &ResidueInfo) -> bool {
        if !is_standard_aa(&res.res_name) || self.raw_atoms.is_hetatm[res.start_atom] {
            return false;
        }
        let complete = BACKBONE_ATOMS
            .iter()
            .all(|name| self.backbone_atom(res, name).is_some());
        if !complete {
            log::warn!(
                "Missing backbone atom in residue {} {} (chain {})",
                res.res_name,
                res.res_id,
                res.chain_id
            );
        }
        complete
    }
}

/// A maximal run of peptide-bonded residues within one chain of one model.
/// Residue entries are indices into `ProcessedStructure::residue_info`.
#[derive(Debug, Clone)]
pub struct PeptideSegment {
    pub residues: Vec<usize>,
}

/// Build the maximal contiguous peptide segments of a processed structure.
///
/// Segments never cross model or chain boundaries. Runs shorter than two
/// residues carry no torsion information and are dropped.
pub fn build_peptides(processed: &ProcessedStructure) -> Vec<PeptideSegment> {
    let mut segments = Vec::new();
    let mut current: Vec<usize> = Vec::new();

    let mut flush = |run: &mut Vec<usize>, segments: &mut Vec<PeptideSegment>| {
        if run.len() >= 2 {
            segments.push(PeptideSegment {
                residues: std::mem::take(run),
            });
        } else {
            run.clear();
        }
    };

    for (idx, res) in processed.residue_info.iter().enumerate() {
        if !processed.is_peptide_residue(res) {
            flush(&mut current, &mut segments);
            continue;
        }

        if let Some(&prev_idx) = current.last() {
            let prev = &processed.residue_info[prev_idx];
            let same_run = prev.model_id == res.model_id
                && prev.chain_id == res.chain_id
                && bonded(processed, prev, res);
            if !same_run {
                flush(&mut current, &mut segments);
            }
        }

        current.push(idx);
    }
    flush(&mut current, &mut segments);

    segments
}

/// Peptide-bond test between consecutive residues: C(i-1)-N(i) distance
fn bonded(processed: &ProcessedStructure, prev: &ResidueInfo, curr: &ResidueInfo) -> bool {
    match (
        processed.backbone_atom(prev, "C"),
        processed.backbone_atom(curr, "N"),
    ) {
        (Some(c), Some(n)) => {
            let dx = c[0] - n[0];
            let dy = c[1] - n[1];
            let dz = c[2] - n[2];
            (dx * dx + dy * dy + dz * dz).sqrt() <= PEPTIDE_BOND_MAX
        }
        _ => false,
    }
}
