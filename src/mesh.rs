//! Meshes of intervals and triangles.

use crate::reference_cell;
use crate::reference_cell::ReferenceCellType;
use crate::types::{Array2D, RealScalar};
use log::debug;
use rlst::{rlst_dynamic_array2, RandomAccessByRef, RandomAccessMut, Shape};
use std::collections::HashMap;

/// Invalid mesh data or an invalid mesh query
#[derive(thiserror::Error, Debug)]
pub enum MeshError {
    /// The vertex coordinates have an unsupported dimension
    #[error("only 1D and 2D meshes are supported, got dimension {0}")]
    UnsupportedDimension(usize),
    /// The flat cell list does not split into cells
    #[error("cell list of length {0} is not a multiple of {1}")]
    MalformedCellList(usize, usize),
    /// A cell references a vertex that does not exist
    #[error("cell references vertex {vertex} but the mesh has {nvertices} vertices")]
    InvalidVertexIndex {
        /// The out-of-range vertex index
        vertex: usize,
        /// The number of vertices in the mesh
        nvertices: usize,
    },
    /// An adjacency query outside the valid dimension range
    #[error("adjacency({dim1}, {dim2}) is not defined on a mesh of dimension {mesh_dim}")]
    InvalidAdjacency {
        /// The entity dimension queried from
        dim1: usize,
        /// The entity dimension queried to
        dim2: usize,
        /// The dimension of the mesh
        mesh_dim: usize,
    },
}

/// A mesh of intervals (1D) or triangles (2D).
///
/// Cell vertex rows are sorted ascending, so every cell sees each of its
/// lower-dimensional entities in the same direction as every other cell
/// sharing that entity. The global numbering relies on this.
pub struct Mesh<T: RealScalar> {
    cell_type: ReferenceCellType,
    vertex_coords: Array2D<T>,
    cell_vertices: Vec<Vec<usize>>,
    edge_vertices: Vec<Vec<usize>>,
    cell_edges: Vec<Vec<usize>>,
    entity_counts: Vec<usize>,
}

impl<T: RealScalar> Mesh<T> {
    /// Create a mesh from vertex coordinates and a flat list of cell
    /// vertex indices, `dim + 1` per cell.
    pub fn new(vertex_coords: Array2D<T>, cells: &[usize]) -> Result<Self, MeshError> {
        let tdim = vertex_coords.shape()[1];
        let cell_type = match tdim {
            1 => ReferenceCellType::Interval,
            2 => ReferenceCellType::Triangle,
            _ => return Err(MeshError::UnsupportedDimension(tdim)),
        };
        let nvertices = vertex_coords.shape()[0];
        let nvps = tdim + 1;
        if cells.len() % nvps != 0 {
            return Err(MeshError::MalformedCellList(cells.len(), nvps));
        }

        let mut cell_vertices = Vec::with_capacity(cells.len() / nvps);
        for chunk in cells.chunks(nvps) {
            for v in chunk {
                if *v >= nvertices {
                    return Err(MeshError::InvalidVertexIndex {
                        vertex: *v,
                        nvertices,
                    });
                }
            }
            let mut row = chunk.to_vec();
            row.sort_unstable();
            cell_vertices.push(row);
        }
        let ncells = cell_vertices.len();

        let mut edge_vertices: Vec<Vec<usize>> = vec![];
        let mut cell_edges: Vec<Vec<usize>> = vec![];
        if tdim == 2 {
            let ref_edges = reference_cell::edges(ReferenceCellType::Triangle);
            let mut edge_indices = HashMap::new();
            cell_edges = vec![Vec::with_capacity(3); ncells];
            for (cell_i, cell) in cell_vertices.iter().enumerate() {
                for rc in &ref_edges {
                    // Rows are sorted, so the pair is already (low, high).
                    let pair = (cell[rc[0]], cell[rc[1]]);
                    let edge_index = *edge_indices.entry(pair).or_insert_with(|| {
                        edge_vertices.push(vec![pair.0, pair.1]);
                        edge_vertices.len() - 1
                    });
                    cell_edges[cell_i].push(edge_index);
                }
            }
        }

        let entity_counts = if tdim == 2 {
            vec![nvertices, edge_vertices.len(), ncells]
        } else {
            vec![nvertices, ncells]
        };
        debug!(
            "Built {}D mesh: {} vertices, {} cells",
            tdim, nvertices, ncells
        );

        Ok(Self {
            cell_type,
            vertex_coords,
            cell_vertices,
            edge_vertices,
            cell_edges,
            entity_counts,
        })
    }

    /// The geometric and topological dimension of the mesh
    pub fn dim(&self) -> usize {
        self.vertex_coords.shape()[1]
    }

    /// The reference cell of which the mesh is composed
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    /// The number of entities of each dimension
    pub fn entity_counts(&self) -> &[usize] {
        &self.entity_counts
    }

    /// The number of entities of dimension `dim`
    pub fn entity_count(&self, dim: usize) -> usize {
        self.entity_counts[dim]
    }

    /// The number of cells
    pub fn cell_count(&self) -> usize {
        *self.entity_counts.last().unwrap()
    }

    /// The vertex coordinates, one vertex per row
    pub fn vertex_coords(&self) -> &Array2D<T> {
        &self.vertex_coords
    }

    /// The sorted vertex indices of a cell
    pub fn cell_vertices(&self, cell: usize) -> Option<&[usize]> {
        if cell < self.cell_vertices.len() {
            Some(&self.cell_vertices[cell])
        } else {
            None
        }
    }

    /// The `dim2`-dimensional entities adjacent to each `dim1`-dimensional
    /// entity.
    ///
    /// Row `e` of the result lists the adjacent entities of entity
    /// `(dim1, e)`. Requires `dim2 < dim1 <= self.dim()`.
    pub fn adjacency(&self, dim1: usize, dim2: usize) -> Result<&[Vec<usize>], MeshError> {
        let tdim = self.dim();
        if dim2 >= dim1 || dim1 > tdim {
            return Err(MeshError::InvalidAdjacency {
                dim1,
                dim2,
                mesh_dim: tdim,
            });
        }
        Ok(match (dim1, dim2) {
            (1, 0) => {
                if tdim == 1 {
                    &self.cell_vertices
                } else {
                    &self.edge_vertices
                }
            }
            (2, 0) => &self.cell_vertices,
            (2, 1) => &self.cell_edges,
            _ => unreachable!(),
        })
    }

    /// The Jacobian of the map from the reference cell to cell `c`.
    ///
    /// Column `k` is the offset of the cell's vertex `k + 1` from its
    /// vertex 0, with vertices in sorted-row order.
    pub fn jacobian(&self, c: usize) -> Array2D<T> {
        let tdim = self.dim();
        let cell = &self.cell_vertices[c];
        let mut j = rlst_dynamic_array2!(T, [tdim, tdim]);
        for col in 0..tdim {
            for row in 0..tdim {
                *j.get_mut([row, col]).unwrap() = *self
                    .vertex_coords
                    .get([cell[col + 1], row])
                    .unwrap()
                    - *self.vertex_coords.get([cell[0], row]).unwrap();
            }
        }
        j
    }

    /// The determinant of the Jacobian of cell `c`
    pub fn jacobian_determinant(&self, c: usize) -> T {
        let j = self.jacobian(c);
        match self.dim() {
            1 => *j.get([0, 0]).unwrap(),
            _ => {
                *j.get([0, 0]).unwrap() * *j.get([1, 1]).unwrap()
                    - *j.get([0, 1]).unwrap() * *j.get([1, 0]).unwrap()
            }
        }
    }

    /// The inverse transpose of the Jacobian of cell `c`.
    ///
    /// This is the map that takes reference basis gradients to physical
    /// gradients, following the chain rule `grad_x = J^{-T} grad_xi`.
    pub fn jacobian_inverse_transpose(&self, c: usize) -> Array2D<T> {
        let tdim = self.dim();
        let j = self.jacobian(c);
        let det = self.jacobian_determinant(c);
        let mut out = rlst_dynamic_array2!(T, [tdim, tdim]);
        match tdim {
            1 => {
                *out.get_mut([0, 0]).unwrap() = T::one() / det;
            }
            _ => {
                *out.get_mut([0, 0]).unwrap() = *j.get([1, 1]).unwrap() / det;
                *out.get_mut([0, 1]).unwrap() = -*j.get([1, 0]).unwrap() / det;
                *out.get_mut([1, 0]).unwrap() = -*j.get([0, 1]).unwrap() / det;
                *out.get_mut([1, 1]).unwrap() = *j.get([0, 0]).unwrap() / det;
            }
        }
        out
    }
}
