//! Core data structures for protein parsing
//!
//! Flat per-atom arrays produced by the PDB parser. Atoms are stored in file
//! order together with the model they belong to; residue-level grouping
//! happens in [`crate::processing`].

/// A single ATOM/HETATM record
#[derive(Debug, Clone)]
pub struct AtomRecord {
    pub atom_name: String,
    pub alt_loc: char,
    pub res_name: String,
    pub chain_id: String,
    pub res_seq: i32,
    pub i_code: char,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub is_hetatm: bool,
}

/// Raw atom data from PDB parsing, one entry per atom across all models
#[derive(Debug, Clone, Default)]
pub struct RawAtomData {
    /// Coordinates (N_atoms, 3) flattened
    pub coords: Vec<f64>,

    /// Atom names for each atom
    pub atom_names: Vec<String>,

    /// Alternate location indicators
    pub alt_locs: Vec<char>,

    /// Residue names (repeated per atom in that residue)
    pub res_names: Vec<String>,

    /// Residue sequence numbers (repeated per atom)
    pub res_ids: Vec<i32>,

    /// Insertion codes
    pub insertion_codes: Vec<char>,

    /// Chain IDs (repeated per atom)
    pub chain_ids: Vec<String>,

    /// Model each atom belongs to (1 when the file has no MODEL records)
    pub model_ids: Vec<usize>,

    /// HETATM flag
    pub is_hetatm: Vec<bool>,

    /// Total number of atoms
    pub num_atoms: usize,
}

impl RawAtomData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an atom to the structure
    pub fn add_atom(&mut self, atom: AtomRecord, model_id: usize) {
        self.coords.push(atom.x);
        self.coords.push(atom.y);
        self.coords.push(atom.z);
        self.atom_names.push(atom.atom_name);
        self.alt_locs.push(atom.alt_loc);
        self.res_names.push(atom.res_name);
        self.res_ids.push(atom.res_seq);
        self.insertion_codes.push(atom.i_code);
        self.chain_ids.push(atom.chain_id);
        self.model_ids.push(model_id);
        self.is_hetatm.push(atom.is_hetatm);
        self.num_atoms += 1;
    }

    /// Coordinates of atom `idx`
    pub fn position(&self, idx: usize) -> [f64; 3] {
        [
            self.coords[idx * 3],
            self.coords[idx * 3 + 1],
            self.coords[idx * 3 + 2],
        ]
    }
}
