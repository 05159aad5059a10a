// src/assign.rs
//! Rectangular linear-assignment solver (spec.md §4.6). The dummy
//! rows/columns baked into the [`crate::distance::DistanceMatrix`] make
//! this always a square assignment problem, so a plain Kuhn-Munkres
//! solver suffices — no corpus example needed an assignment solver, so
//! this reaches for `pathfinding`, a well-known general-purpose crate,
//! rather than inventing one.

use crate::distance::DistanceMatrix;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;

/// `row_ind[i]` is the column matched to row `i`, for every
/// `i in [0, n1 + n2)` (spec.md §4.6).
#[must_use]
pub fn solve(distance: &DistanceMatrix) -> Vec<usize> {
    let size = distance.n1 + distance.n2;
    if size == 0 {
        return Vec::new();
    }
    let flat: Vec<i64> = distance.cells.iter().flatten().copied().collect();
    let matrix = Matrix::square_from_vec(flat).expect("distance matrix is always square");
    let (_, assignment) = kuhn_munkres_min(&matrix);
    assignment
}
