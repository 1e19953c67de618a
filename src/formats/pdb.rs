//! PDB file format parser
//!
//! Fixed-width column parser for Protein Data Bank (PDB) files. Returns raw
//! atom data in file order; MODEL/ENDMDL records are tracked per atom so
//! multi-model entries (NMR ensembles) keep every model.

use crate::error::{Result, TorsionError};
use crate::structure::{AtomRecord, RawAtomData};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a PDB ATOM/HETATM line using fixed-width fields
/// Format: https://www.wwpdb.org/documentation/file-format-content/format33/sect9.html
fn parse_atom_line(line: &str) -> Option<AtomRecord> {
    if line.len() < 54 {
        return None;
    }

    let record_type = line[0..6].trim();
    if record_type != "ATOM" && record_type != "HETATM" {
        return None;
    }

    let parse_f64 = |s: &str| -> Option<f64> { s.trim().parse().ok() };
    let parse_i32 = |s: &str| -> Option<i32> { s.trim().parse().ok() };

    Some(AtomRecord {
        atom_name: line[12..16].trim().to_string(),
        alt_loc: line.chars().nth(16).unwrap_or(' '),
        res_name: line[17..20].trim().to_string(),
        chain_id: line[21..22].trim().to_string(),
        res_seq: parse_i32(&line[22..26])?,
        i_code: line.chars().nth(26).unwrap_or(' '),
        x: parse_f64(&line[30..38])?,
        y: parse_f64(&line[38..46])?,
        z: parse_f64(&line[46..54])?,
        is_hetatm: record_type == "HETATM",
    })
}

/// Parse a PDB file into raw atom data.
///
/// All models are kept; each atom carries the id of the model it came from
/// (1 when the file has no MODEL records).
pub fn parse_pdb_file<P: AsRef<Path>>(path: P) -> Result<RawAtomData> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);

    let mut raw_data = RawAtomData::new();
    let mut current_model: usize = 1;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();

        if trimmed.starts_with("MODEL") {
            if let Some(model_str) = trimmed.get(5..) {
                if let Ok(model_num) = model_str.trim().parse::<usize>() {
                    current_model = model_num;
                }
            }
        } else if trimmed.starts_with("ENDMDL") {
            // Model ends; current_model is updated by the next MODEL record
        } else if trimmed.starts_with("ATOM") || trimmed.starts_with("HETATM") {
            if let Some(atom) = parse_atom_line(&line) {
                raw_data.add_atom(atom, current_model);
            }
        }
    }

    if raw_data.num_atoms == 0 {
        return Err(TorsionError::InvalidPdb(format!(
            "no atoms found in {}",
            path.as_ref().display()
        )));
    }

    log::debug!(
        "Parsed {} atoms from {}",
        raw_data.num_atoms,
        path.as_ref().display()
    );

    Ok(raw_data)
}
