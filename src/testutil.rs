//! Test fixtures: synthetic PDB content with known backbone geometry.

use std::f64::consts::PI;

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalize(v: [f64; 3]) -> [f64; 3] {
    let mag = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    [v[0] / mag, v[1] / mag, v[2] / mag]
}

/// Place atom D given atoms A, B, C so that |CD| = length, the B-C-D angle
/// and the A-B-C-D torsion take the requested values (degrees).
pub fn place_atom(
    a: [f64; 3],
    b: [f64; 3],
    c: [f64; 3],
    length: f64,
    angle_deg: f64,
    torsion_deg: f64,
) -> [f64; 3] {
    let angle = angle_deg * PI / 180.0;
    let torsion = torsion_deg * PI / 180.0;

    let bc = normalize(sub(c, b));
    let n = normalize(cross(bc, sub(b, a)));
    let m = cross(n, bc);

    let d_local = [
        -length * angle.cos(),
        length * angle.sin() * torsion.cos(),
        length * angle.sin() * torsion.sin(),
    ];

    [
        c[0] + bc[0] * d_local[0] + m[0] * d_local[1] + n[0] * d_local[2],
        c[1] + bc[1] * d_local[0] + m[1] * d_local[1] + n[1] * d_local[2],
        c[2] + bc[2] * d_local[0] + m[2] * d_local[1] + n[2] * d_local[2],
    ]
}

/// Backbone N/CA/C coordinates of an ideal polypeptide with uniform
/// (phi, psi) torsions, standard bond lengths and angles, trans omega.
pub fn ideal_backbone(n_residues: usize, phi_deg: f64, psi_deg: f64) -> Vec<[[f64; 3]; 3]> {
    let mut residues: Vec<[[f64; 3]; 3]> = Vec::with_capacity(n_residues);

    // Seed residue in the xy-plane with the N-CA-C angle at 111.2 degrees
    let n0 = [0.0, 0.0, 0.0];
    let ca0 = [1.458, 0.0, 0.0];
    let theta = (180.0 - 111.2) * PI / 180.0;
    let c0 = [
        ca0[0] + 1.525 * theta.cos(),
        ca0[1] + 1.525 * theta.sin(),
        0.0,
    ];
    residues.push([n0, ca0, c0]);

    for _ in 1..n_residues {
        let [n_prev, ca_prev, c_prev] = residues[residues.len() - 1];
        let n = place_atom(n_prev, ca_prev, c_prev, 1.329, 116.2, psi_deg);
        let ca = place_atom(ca_prev, c_prev, n, 1.458, 121.7, 180.0);
        let c = place_atom(c_prev, n, ca, 1.525, 111.2, phi_deg);
        residues.push([n, ca, c]);
    }

    residues
}

fn atom_line(serial: usize, name: &str, res: &str, chain: &str, seq: i32, pos: [f64; 3]) -> String {
    format!(
        "ATOM  {:>5}  {:<3} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
        serial,
        name,
        res,
        chain,
        seq,
        pos[0],
        pos[1],
        pos[2],
        1.00,
        0.00,
        &name[..1]
    )
}

/// PDB text for an ideal helical peptide (phi = -60, psi = -45) of ALA
/// residues on chain A
pub fn helical_pdb(n_residues: usize) -> String {
    let mut out = String::new();
    let mut serial = 1;
    for (i, res) in ideal_backbone(n_residues, -60.0, -45.0).iter().enumerate() {
        for (name, pos) in ["N", "CA", "C"].iter().zip(res.iter()) {
            out.push_str(&atom_line(serial, name, "ALA", "A", i as i32 + 1, *pos));
            out.push('\n');
            serial += 1;
        }
    }
    out.push_str("END\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::angles::dihedral_angle;

    #[test]
    fn test_place_atom_round_trip() {
        let a = [0.0, 0.0, 0.0];
        let b = [1.5, 0.0, 0.0];
        let c = [2.0, 1.4, 0.0];
        let d = place_atom(a, b, c, 1.33, 116.2, -73.0);

        let torsion = dihedral_angle(&a, &b, &c, &d).to_degrees();
        assert!((torsion - (-73.0)).abs() < 1e-9);
    }

    #[test]
    fn test_ideal_backbone_torsions() {
        let backbone = ideal_backbone(4, -60.0, -45.0);

        // phi of residue 1: C(0)-N(1)-CA(1)-C(1)
        let phi = dihedral_angle(
            &backbone[0][2],
            &backbone[1][0],
            &backbone[1][1],
            &backbone[1][2],
        )
        .to_degrees();
        assert!((phi - (-60.0)).abs() < 1e-9);

        // psi of residue 1: N(1)-CA(1)-C(1)-N(2)
        let psi = dihedral_angle(
            &backbone[1][0],
            &backbone[1][1],
            &backbone[1][2],
            &backbone[2][0],
        )
        .to_degrees();
        assert!((psi - (-45.0)).abs() < 1e-9);
    }
}
