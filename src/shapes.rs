//! Built-in meshes of simple domains.

use crate::mesh::Mesh;
use crate::types::RealScalar;
use itertools::Itertools;
use rlst::{rlst_dynamic_array2, RandomAccessMut};

/// A mesh of the unit interval with `ncells` equal cells
pub fn unit_interval<T: RealScalar>(ncells: usize) -> Mesh<T> {
    assert!(ncells > 0, "A mesh needs at least one cell");
    let n = T::from(ncells).unwrap();
    let mut coords = rlst_dynamic_array2!(T, [ncells + 1, 1]);
    for i in 0..=ncells {
        *coords.get_mut([i, 0]).unwrap() = T::from(i).unwrap() / n;
    }
    let cells = (0..ncells).flat_map(|c| [c, c + 1]).collect::<Vec<_>>();
    Mesh::new(coords, &cells).unwrap()
}

/// A triangulated mesh of the unit square with `nx` by `ny` squares, each
/// split into two triangles.
///
/// The vertices form a structured grid, x-major, and each grid square is
/// split along its lower-left to upper-right diagonal. Any triangulation of
/// the same point grid produces an equivalent mesh; only the vertex and
/// triangle lists are consumed.
pub fn unit_square<T: RealScalar>(nx: usize, ny: usize) -> Mesh<T> {
    assert!(nx > 0 && ny > 0, "A mesh needs at least one cell");
    let nxf = T::from(nx).unwrap();
    let nyf = T::from(ny).unwrap();
    let mut coords = rlst_dynamic_array2!(T, [(nx + 1) * (ny + 1), 2]);
    for (i, j) in (0..=nx).cartesian_product(0..=ny) {
        let v = i * (ny + 1) + j;
        *coords.get_mut([v, 0]).unwrap() = T::from(i).unwrap() / nxf;
        *coords.get_mut([v, 1]).unwrap() = T::from(j).unwrap() / nyf;
    }

    let mut cells = Vec::with_capacity(6 * nx * ny);
    for (i, j) in (0..nx).cartesian_product(0..ny) {
        let v00 = i * (ny + 1) + j;
        let v01 = v00 + 1;
        let v10 = v00 + ny + 1;
        let v11 = v10 + 1;
        cells.extend_from_slice(&[v00, v10, v11]);
        cells.extend_from_slice(&[v00, v01, v11]);
    }
    Mesh::new(coords, &cells).unwrap()
}
