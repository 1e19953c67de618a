//! Contour line extraction over the density grid
//!
//! Marching-squares implementation producing line segments in data
//! coordinates (degrees). Each grid cell contributes at most two segments;
//! crossing points are linearly interpolated along the cell edges.

use crate::plot::density::{DensityGrid, GRID_SIZE};

type Point = (f64, f64);

/// Extract the iso-line segments of `grid` at the given density level
pub fn contour_segments(grid: &DensityGrid, level: f64) -> Vec<[Point; 2]> {
    let mut segments = Vec::new();

    for i in 0..GRID_SIZE - 1 {
        for j in 0..GRID_SIZE - 1 {
            // Cell corners, counter-clockwise from (i, j)
            let v = [
                grid.value(i, j),
                grid.value(i + 1, j),
                grid.value(i + 1, j + 1),
                grid.value(i, j + 1),
            ];
            let p = [
                (DensityGrid::phi_at(i), DensityGrid::psi_at(j)),
                (DensityGrid::phi_at(i + 1), DensityGrid::psi_at(j)),
                (DensityGrid::phi_at(i + 1), DensityGrid::psi_at(j + 1)),
                (DensityGrid::phi_at(i), DensityGrid::psi_at(j + 1)),
            ];

            let mut case = 0usize;
            for (bit, &value) in v.iter().enumerate() {
                if value > level {
                    case |= 1 << bit;
                }
            }
            if case == 0 || case == 15 {
                continue;
            }

            // Crossing points on the four edges (corner k to corner k+1)
            let edge = |k: usize| -> Point {
                let k2 = (k + 1) % 4;
                interpolate(p[k], v[k], p[k2], v[k2], level)
            };

            match case {
                1 | 14 => segments.push([edge(3), edge(0)]),
                2 | 13 => segments.push([edge(0), edge(1)]),
                3 | 12 => segments.push([edge(3), edge(1)]),
                4 | 11 => segments.push([edge(1), edge(2)]),
                6 | 9 => segments.push([edge(0), edge(2)]),
                7 | 8 => segments.push([edge(2), edge(3)]),
                5 | 10 => {
                    // Saddle: disambiguate with the cell-center value
                    let center = (v[0] + v[1] + v[2] + v[3]) / 4.0;
                    let joined = (center > level) == (case == 5);
                    if joined {
                        segments.push([edge(3), edge(0)]);
                        segments.push([edge(1), edge(2)]);
                    } else {
                        segments.push([edge(0), edge(1)]);
                        segments.push([edge(2), edge(3)]);
                    }
                }
                _ => unreachable!(),
            }
        }
    }

    segments
}

/// Linear interpolation of the level crossing between two corners
fn interpolate(p1: Point, v1: f64, p2: Point, v2: f64, level: f64) -> Point {
    let denom = v2 - v1;
    let t = if denom.abs() < f64::EPSILON {
        0.5
    } else {
        ((level - v1) / denom).clamp(0.0, 1.0)
    };
    (p1.0 + t * (p2.0 - p1.0), p1.1 + t * (p2.1 - p1.1))
}
