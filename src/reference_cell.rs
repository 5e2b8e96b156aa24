//! Reference cell definitions.

use crate::types::RealScalar;
use num::Float;

/// The cells on which elements and quadrature rules are defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceCellType {
    /// The unit interval with vertices 0 and 1
    Interval,
    /// The unit right triangle with vertices (0,0), (1,0) and (0,1)
    Triangle,
}

/// The topological dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Interval => 1,
        ReferenceCellType::Triangle => 2,
    }
}

/// The vertices of the reference cell
pub fn vertices<T: RealScalar>(cell: ReferenceCellType) -> Vec<Vec<T>> {
    let zero = T::zero();
    let one = T::one();
    match cell {
        ReferenceCellType::Interval => vec![vec![zero], vec![one]],
        ReferenceCellType::Triangle => {
            vec![vec![zero, zero], vec![one, zero], vec![zero, one]]
        }
    }
}

/// The edges of the reference cell. Edge `i` of the triangle is opposite
/// vertex `i`.
pub fn edges(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Interval => vec![vec![0, 1]],
        ReferenceCellType::Triangle => vec![vec![1, 2], vec![0, 2], vec![0, 1]],
    }
}

/// The vertices incident to each entity of the reference cell.
///
/// The indices of the result are \[entity_dim\]\[entity_index\]\[vertex\].
pub fn topology(cell: ReferenceCellType) -> Vec<Vec<Vec<usize>>> {
    match cell {
        ReferenceCellType::Interval => vec![vec![vec![0], vec![1]], vec![vec![0, 1]]],
        ReferenceCellType::Triangle => vec![
            vec![vec![0], vec![1], vec![2]],
            vec![vec![1, 2], vec![0, 2], vec![0, 1]],
            vec![vec![0, 1, 2]],
        ],
    }
}

/// The number of entities of each dimension
pub fn entity_counts(cell: ReferenceCellType) -> Vec<usize> {
    match cell {
        ReferenceCellType::Interval => vec![2, 1],
        ReferenceCellType::Triangle => vec![3, 3, 1],
    }
}

/// Return true if the point `x` lies on the entity `(entity_dim, entity_index)`.
///
/// The point is offset from the entity's first vertex, then the projections
/// onto the offsets of the remaining vertices are removed. The point lies in
/// the affine span of the entity iff the residual vanishes.
pub fn point_in_entity<T: RealScalar>(
    cell: ReferenceCellType,
    x: &[T],
    entity: (usize, usize),
) -> bool {
    let verts = vertices::<T>(cell);
    let incident = &topology(cell)[entity.0][entity.1];
    let v0 = &verts[incident[0]];

    let mut dx = x.iter().zip(v0).map(|(a, b)| *a - *b).collect::<Vec<_>>();
    for v in &incident[1..] {
        let dv = verts[*v]
            .iter()
            .zip(v0)
            .map(|(a, b)| *a - *b)
            .collect::<Vec<_>>();
        let mut dot = T::zero();
        let mut norm = T::zero();
        for (a, b) in dx.iter().zip(&dv) {
            dot = dot + *a * *b;
            norm = norm + *b * *b;
        }
        let scale = dot / norm;
        for (a, b) in dx.iter_mut().zip(&dv) {
            *a = *a - scale * *b;
        }
    }

    let tol = T::from(1e-12).unwrap();
    dx.iter().all(|a| Float::abs(*a) < tol)
}
