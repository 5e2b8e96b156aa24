//! Function spaces and their global numbering.

use crate::element::LagrangeElement;
use crate::mesh::Mesh;
use crate::types::RealScalar;
use log::debug;

/// A finite element space over a mesh.
///
/// Every (entity dimension, entity index, position-within-entity) triple in
/// the mesh is assigned one global node index. Nodes owned by
/// lower-dimensional entities come first, and within a dimension the nodes
/// of each entity are contiguous, so a node's global index is a closed-form
/// function of its owning entity.
pub struct FunctionSpace<'a, T: RealScalar> {
    mesh: &'a Mesh<T>,
    element: &'a LagrangeElement<T>,
    cell_nodes: Vec<Vec<usize>>,
    node_count: usize,
}

impl<'a, T: RealScalar> FunctionSpace<'a, T> {
    /// Create a function space from a mesh and an element on the same cell
    pub fn new(mesh: &'a Mesh<T>, element: &'a LagrangeElement<T>) -> Self {
        if mesh.cell_type() != element.cell() {
            panic!("Mesh and element are defined on different reference cells");
        }
        let tdim = mesh.dim();
        let npe = element.nodes_per_entity();
        let counts = mesh.entity_counts();

        // Running totals of the nodes owned by lower dimensions.
        let mut offsets = vec![0; tdim + 1];
        for d in 1..=tdim {
            offsets[d] = offsets[d - 1] + npe[d - 1] * counts[d - 1];
        }
        let node_count = offsets[tdim] + npe[tdim] * counts[tdim];

        let ncells = mesh.cell_count();
        let mut cell_nodes = vec![vec![0; element.dim()]; ncells];
        for (c, nodes) in cell_nodes.iter_mut().enumerate() {
            for d in 0..=tdim {
                let cell_entity = [c];
                let globals: &[usize] = if d == tdim {
                    &cell_entity
                } else {
                    mesh.adjacency(tdim, d).unwrap()[c].as_slice()
                };
                for (i, e) in globals.iter().enumerate() {
                    // The entity's node list runs from its lower global
                    // vertex towards its higher one in every cell that
                    // shares it, so the position within the list is the
                    // same from both sides.
                    for (k, n) in element.entity_nodes(d, i).unwrap().iter().enumerate() {
                        nodes[*n] = offsets[d] + e * npe[d] + k;
                    }
                }
            }
        }
        debug!(
            "Numbered {} global nodes over {} cells",
            node_count, ncells
        );

        Self {
            mesh,
            element,
            cell_nodes,
            node_count,
        }
    }

    /// The mesh of the space
    pub fn mesh(&self) -> &'a Mesh<T> {
        self.mesh
    }

    /// The element of the space
    pub fn element(&self) -> &'a LagrangeElement<T> {
        self.element
    }

    /// The dimension of the space, i.e. the number of global nodes
    pub fn dim(&self) -> usize {
        self.node_count
    }

    /// The global node indices of a cell's local nodes
    pub fn cell_nodes(&self, cell: usize) -> Option<&[usize]> {
        if cell < self.cell_nodes.len() {
            Some(&self.cell_nodes[cell])
        } else {
            None
        }
    }
}
