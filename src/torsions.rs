//! Backbone torsion extraction and aggregation
//!
//! Turns a structure file into per-residue (phi, psi) pairs: parse, group
//! into peptide segments, compute dihedrals, then split residues into the
//! complete set (both angles defined, converted to degrees) and the ignored
//! set (at least one angle missing).

use crate::error::Result;
use crate::formats::pdb::parse_pdb_file;
use crate::geometry::angles::compute_backbone_dihedrals;
use crate::processing::{build_peptides, ProcessedStructure};
use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Identifies a residue within a structure: chain id, residue name,
/// residue sequence number. Insertion codes are not part of the key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueKey {
    pub chain_id: String,
    pub res_name: String,
    pub res_seq: i32,
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}{}", self.chain_id, self.res_name, self.res_seq)
    }
}

/// A (phi, psi) pair in radians; either angle may be absent for residues
/// at peptide-segment boundaries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnglePair {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
}

impl AnglePair {
    /// Whether both angles are usable for plotting.
    ///
    /// An angle of exactly 0.0 radians counts as absent; a 0.0 dihedral is
    /// geometrically valid but has always been classified as missing here,
    /// and downstream consumers rely on that.
    pub fn is_complete(&self) -> bool {
        fn set(angle: Option<f64>) -> bool {
            matches!(angle, Some(v) if v != 0.0)
        }
        set(self.phi) && set(self.psi)
    }
}

impl fmt::Display for AnglePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn part(angle: Option<f64>) -> String {
            match angle {
                Some(v) => format!("{:.4}", v),
                None => "None".to_string(),
            }
        }
        write!(f, "({}, {})", part(self.phi), part(self.psi))
    }
}

/// Insertion-ordered map from [`ResidueKey`] to [`AnglePair`].
///
/// Iteration follows first-insertion order; re-inserting an existing key
/// overwrites the value in place, which is how later models of a multi-model
/// entry shadow earlier ones.
#[derive(Debug, Clone, Default)]
pub struct AngleTable {
    entries: Vec<(ResidueKey, AnglePair)>,
}

impl AngleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ResidueKey, angles: AnglePair) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = angles,
            None => self.entries.push((key, angles)),
        }
    }

    pub fn get(&self, key: &ResidueKey) -> Option<&AnglePair> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(ResidueKey, AnglePair)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parallel phi/psi sequences in degrees, one entry per complete residue,
/// in table order
#[derive(Debug, Clone, Default)]
pub struct DegreeSeries {
    pub phi: Vec<f64>,
    pub psi: Vec<f64>,
}

impl DegreeSeries {
    pub fn len(&self) -> usize {
        self.phi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phi.is_empty()
    }
}

/// Everything extracted from one structure file
#[derive(Debug, Clone)]
pub struct Extraction {
    /// All residues that appeared in a peptide segment
    pub angles: AngleTable,
    /// Residues with at least one missing angle, in table order
    pub ignored: Vec<(ResidueKey, AnglePair)>,
    /// Degree-converted angles of the complete residues, in table order
    pub degrees: DegreeSeries,
}

/// Split a table into its ignored entries and the degree series of its
/// complete entries, both in table order
pub fn split_complete(table: &AngleTable) -> (Vec<(ResidueKey, AnglePair)>, DegreeSeries) {
    let mut ignored = Vec::new();
    let mut degrees = DegreeSeries::default();

    for (key, pair) in table.iter() {
        if pair.is_complete() {
            // is_complete guarantees both angles are present
            if let (Some(phi), Some(psi)) = (pair.phi, pair.psi) {
                degrees.phi.push(phi.to_degrees());
                degrees.psi.push(psi.to_degrees());
            }
        } else {
            ignored.push((key.clone(), *pair));
        }
    }

    (ignored, degrees)
}

/// Extract backbone torsions from a single structure file.
///
/// Parses the file, builds peptide segments per chain, computes (phi, psi)
/// per residue and classifies each residue as complete or ignored.
pub fn phi_psi<P: AsRef<Path>>(path: P) -> Result<Extraction> {
    let raw = parse_pdb_file(path.as_ref())?;
    let processed = ProcessedStructure::from_raw(raw)?;
    let segments = build_peptides(&processed);

    let mut table = AngleTable::new();

    for segment in &segments {
        let coords: Vec<[[f64; 3]; 3]> = segment
            .residues
            .iter()
            .map(|&idx| {
                let res = &processed.residue_info[idx];
                // Peptide residues are guaranteed a full backbone
                let n = processed.backbone_atom(res, "N").unwrap_or_default();
                let ca = processed.backbone_atom(res, "CA").unwrap_or_default();
                let c = processed.backbone_atom(res, "C").unwrap_or_default();
                [n, ca, c]
            })
            .collect();

        let dihedrals = compute_backbone_dihedrals(&coords);

        for (&idx, angles) in segment.residues.iter().zip(dihedrals.iter()) {
            let res = &processed.residue_info[idx];
            table.insert(
                ResidueKey {
                    chain_id: res.chain_id.clone(),
                    res_name: res.res_name.clone(),
                    res_seq: res.res_id,
                },
                AnglePair {
                    phi: angles.phi,
                    psi: angles.psi,
                },
            );
        }
    }

    let (ignored, degrees) = split_complete(&table);
    log::debug!(
        "{}: {} residues, {} complete, {} ignored",
        path.as_ref().display(),
        table.len(),
        degrees.len(),
        ignored.len()
    );

    Ok(Extraction {
        angles: table,
        ignored,
        degrees,
    })
}

/// Extract backbone torsions from several structure files.
///
/// Output preserves input order and cardinality; the first failing file
/// aborts the whole call.
pub fn phi_psi_batch<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<Extraction>> {
    paths.iter().map(phi_psi).collect()
}

/// Render the ignored residues as a two-column console table into `out`
pub fn write_ignored_table<W: Write>(
    ignored: &[(ResidueKey, AnglePair)],
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Ignored residues")?;
    writeln!(out, "{:<16} {}", "residue", "phi-psi angles")?;
    for (key, pair) in ignored {
        writeln!(out, "{:<16} {}", key.to_string(), pair)?;
    }
    Ok(())
}
