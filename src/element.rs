//! Finite element definitions.

use crate::reference_cell;
use crate::reference_cell::ReferenceCellType;
use crate::types::{Array2D, Array3D, RealScalar};
use num::Float;
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, LinAlg, RandomAccessByRef, RandomAccessMut, Shape,
};

/// The dimension of the space of polynomials of total degree at most `degree`
pub fn polynomial_count(cell: ReferenceCellType, degree: usize) -> usize {
    match cell {
        ReferenceCellType::Interval => degree + 1,
        ReferenceCellType::Triangle => (degree + 1) * (degree + 2) / 2,
    }
}

/// The equispaced nodes of the degree-`degree` Lagrange element.
///
/// On the interval the nodes are `i/degree`. On the triangle the nodes are
/// `(i/degree, j/degree)` with `j` in the outer loop. The enumeration order
/// is shared with the monomial basis and with the entity node lists, so the
/// same index identifies a node everywhere.
pub fn lagrange_points<T: RealScalar>(cell: ReferenceCellType, degree: usize) -> Array2D<T> {
    let npoints = polynomial_count(cell, degree);
    let tdim = reference_cell::dim(cell);
    let d = T::from(degree).unwrap();
    let mut points = rlst_dynamic_array2!(T, [npoints, tdim]);
    match cell {
        ReferenceCellType::Interval => {
            for i in 0..=degree {
                *points.get_mut([i, 0]).unwrap() = T::from(i).unwrap() / d;
            }
        }
        ReferenceCellType::Triangle => {
            let mut n = 0;
            for j in 0..=degree {
                for i in 0..=(degree - j) {
                    *points.get_mut([n, 0]).unwrap() = T::from(i).unwrap() / d;
                    *points.get_mut([n, 1]).unwrap() = T::from(j).unwrap() / d;
                    n += 1;
                }
            }
        }
    }
    points
}

/// Evaluate the complete monomial basis of total degree at most `degree` at
/// each point.
///
/// The result has one row per point and one column per monomial. Interval
/// monomials are `x^0, ..., x^degree`; triangle monomials are `x^(d-p) y^p`
/// for `d = 0..=degree` with `p` in the inner loop.
pub fn vandermonde_matrix<T: RealScalar, A: RandomAccessByRef<2, Item = T> + Shape<2>>(
    cell: ReferenceCellType,
    degree: usize,
    points: &A,
) -> Array2D<T> {
    let npoints = points.shape()[0];
    let pdim = polynomial_count(cell, degree);
    let mut v = rlst_dynamic_array2!(T, [npoints, pdim]);
    for k in 0..npoints {
        match cell {
            ReferenceCellType::Interval => {
                let x = *points.get([k, 0]).unwrap();
                let mut xn = T::one();
                for n in 0..=degree {
                    *v.get_mut([k, n]).unwrap() = xn;
                    xn = xn * x;
                }
            }
            ReferenceCellType::Triangle => {
                let x = *points.get([k, 0]).unwrap();
                let y = *points.get([k, 1]).unwrap();
                let mut col = 0;
                for d in 0..=degree {
                    for p in 0..=d {
                        *v.get_mut([k, col]).unwrap() =
                            Float::powi(x, (d - p) as i32) * Float::powi(y, p as i32);
                        col += 1;
                    }
                }
            }
        }
    }
    v
}

/// The derivative of `x^n` at `x`
fn monomial_derivative<T: RealScalar>(x: T, n: usize) -> T {
    if n == 0 {
        T::zero()
    } else {
        T::from(n).unwrap() * Float::powi(x, n as i32 - 1)
    }
}

/// Evaluate the gradient of the complete monomial basis at each point.
///
/// The result has shape `[npoints, pdim, dim]`, with the monomials in the
/// same order as [`vandermonde_matrix`].
pub fn vandermonde_matrix_grad<T: RealScalar, A: RandomAccessByRef<2, Item = T> + Shape<2>>(
    cell: ReferenceCellType,
    degree: usize,
    points: &A,
) -> Array3D<T> {
    let npoints = points.shape()[0];
    let pdim = polynomial_count(cell, degree);
    let tdim = reference_cell::dim(cell);
    let mut v = rlst_dynamic_array3!(T, [npoints, pdim, tdim]);
    for k in 0..npoints {
        match cell {
            ReferenceCellType::Interval => {
                let x = *points.get([k, 0]).unwrap();
                for n in 0..=degree {
                    *v.get_mut([k, n, 0]).unwrap() = monomial_derivative(x, n);
                }
            }
            ReferenceCellType::Triangle => {
                let x = *points.get([k, 0]).unwrap();
                let y = *points.get([k, 1]).unwrap();
                let mut col = 0;
                for d in 0..=degree {
                    for p in 0..=d {
                        *v.get_mut([k, col, 0]).unwrap() =
                            monomial_derivative(x, d - p) * Float::powi(y, p as i32);
                        *v.get_mut([k, col, 1]).unwrap() =
                            Float::powi(x, (d - p) as i32) * monomial_derivative(y, p);
                        col += 1;
                    }
                }
            }
        }
    }
    v
}

/// `n` choose `k`
fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let mut result = 1;
    for i in 0..k {
        result = result * (n - i) / (i + 1);
    }
    result
}

/// A nodal Lagrange element on a reference cell.
///
/// The nodal basis is dual to point evaluation at the element's nodes:
/// tabulating the basis at the nodes gives the identity matrix.
pub struct LagrangeElement<T: RealScalar> {
    cell: ReferenceCellType,
    degree: usize,
    nodes: Array2D<T>,
    basis_coefs: Array2D<T>,
    entity_nodes: Vec<Vec<Vec<usize>>>,
    nodes_per_entity: Vec<usize>,
}

impl<T: RealScalar> LagrangeElement<T> {
    /// Create the equispaced Lagrange element of the given degree
    pub fn new(cell: ReferenceCellType, degree: usize) -> Self {
        Self::with_nodes(cell, degree, lagrange_points(cell, degree))
    }

    /// Create a nodal element with the given node placement.
    ///
    /// The node count must equal the dimension of the polynomial space. A
    /// node set that does not determine the polynomial space (a singular
    /// generalised Vandermonde matrix) is a fatal construction error.
    pub fn with_nodes(cell: ReferenceCellType, degree: usize, nodes: Array2D<T>) -> Self {
        if degree == 0 {
            panic!("Cannot create a degree 0 Lagrange element");
        }
        let tdim = reference_cell::dim(cell);
        let ndofs = polynomial_count(cell, degree);
        if nodes.shape()[0] != ndofs {
            panic!(
                "A degree {} element requires {} nodes, got {}",
                degree,
                ndofs,
                nodes.shape()[0]
            );
        }
        if nodes.shape()[1] != tdim {
            panic!("Node coordinates do not match the cell dimension");
        }

        let mut basis_coefs = vandermonde_matrix(cell, degree, &nodes);
        basis_coefs
            .view_mut()
            .into_inverse_alloc()
            .expect("Degenerate node set: the dual basis matrix is singular");

        // Assign each node to the lowest-dimensional entity it lies on.
        let entity_counts = reference_cell::entity_counts(cell);
        let mut entity_nodes = entity_counts
            .iter()
            .map(|&count| vec![vec![]; count])
            .collect::<Vec<_>>();
        for n in 0..ndofs {
            let x = (0..tdim)
                .map(|j| *nodes.get([n, j]).unwrap())
                .collect::<Vec<_>>();
            'assign: for (d, count) in entity_counts.iter().enumerate() {
                for e in 0..*count {
                    if reference_cell::point_in_entity(cell, &x, (d, e)) {
                        entity_nodes[d][e].push(n);
                        break 'assign;
                    }
                }
            }
        }

        let nodes_per_entity = (0..=tdim).map(|d| binomial(degree - 1, d)).collect();

        Self {
            cell,
            degree,
            nodes,
            basis_coefs,
            entity_nodes,
            nodes_per_entity,
        }
    }

    /// The cell on which the element is defined
    pub fn cell(&self) -> ReferenceCellType {
        self.cell
    }

    /// The polynomial degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of basis functions
    pub fn dim(&self) -> usize {
        self.nodes.shape()[0]
    }

    /// The element's nodes, one point per row
    pub fn nodes(&self) -> &Array2D<T> {
        &self.nodes
    }

    /// The local nodes owned by an entity, in enumeration order.
    ///
    /// Edge node lists run from the edge's lower-numbered reference vertex
    /// towards its higher-numbered one.
    pub fn entity_nodes(&self, entity_dim: usize, entity_index: usize) -> Option<&[usize]> {
        if entity_dim < self.entity_nodes.len()
            && entity_index < self.entity_nodes[entity_dim].len()
        {
            Some(&self.entity_nodes[entity_dim][entity_index])
        } else {
            None
        }
    }

    /// The number of nodes owned by a single entity of each dimension
    pub fn nodes_per_entity(&self) -> &[usize] {
        &self.nodes_per_entity
    }

    /// Evaluate every basis function at every point.
    ///
    /// The result has shape `[npoints, ndofs]`.
    pub fn tabulate<A: RandomAccessByRef<2, Item = T> + Shape<2>>(&self, points: &A) -> Array2D<T> {
        let v = vandermonde_matrix(self.cell, self.degree, points);
        let npoints = points.shape()[0];
        let ndofs = self.dim();
        let pdim = v.shape()[1];
        let mut table = rlst_dynamic_array2!(T, [npoints, ndofs]);
        for k in 0..npoints {
            for j in 0..ndofs {
                let mut value = T::zero();
                for i in 0..pdim {
                    value = value + *v.get([k, i]).unwrap() * *self.basis_coefs.get([i, j]).unwrap();
                }
                *table.get_mut([k, j]).unwrap() = value;
            }
        }
        table
    }

    /// Evaluate the gradient of every basis function at every point.
    ///
    /// The result has shape `[npoints, ndofs, dim]` and holds gradients with
    /// respect to the reference coordinates.
    pub fn tabulate_grad<A: RandomAccessByRef<2, Item = T> + Shape<2>>(
        &self,
        points: &A,
    ) -> Array3D<T> {
        let v = vandermonde_matrix_grad(self.cell, self.degree, points);
        let npoints = points.shape()[0];
        let ndofs = self.dim();
        let pdim = v.shape()[1];
        let tdim = reference_cell::dim(self.cell);
        let mut table = rlst_dynamic_array3!(T, [npoints, ndofs, tdim]);
        for k in 0..npoints {
            for j in 0..ndofs {
                for g in 0..tdim {
                    let mut value = T::zero();
                    for i in 0..pdim {
                        value = value
                            + *v.get([k, i, g]).unwrap() * *self.basis_coefs.get([i, j]).unwrap();
                    }
                    *table.get_mut([k, j, g]).unwrap() = value;
                }
            }
        }
        table
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use paste::paste;

    #[test]
    fn test_lagrange_point_counts() {
        for degree in 1..8 {
            let p = lagrange_points::<f64>(ReferenceCellType::Interval, degree);
            assert_eq!(p.shape(), [degree + 1, 1]);
            let p = lagrange_points::<f64>(ReferenceCellType::Triangle, degree);
            assert_eq!(p.shape(), [(degree + 1) * (degree + 2) / 2, 2]);
        }
    }

    #[test]
    fn test_lagrange_point_average() {
        // By symmetry the node average is the cell barycentre.
        for cell in [ReferenceCellType::Interval, ReferenceCellType::Triangle] {
            let tdim = reference_cell::dim(cell);
            for degree in 1..8 {
                let p = lagrange_points::<f64>(cell, degree);
                for j in 0..tdim {
                    let mut average = 0.0;
                    for i in 0..p.shape()[0] {
                        average += *p.get([i, j]).unwrap();
                    }
                    average /= p.shape()[0] as f64;
                    assert_relative_eq!(average, 1.0 / (tdim as f64 + 1.0), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn test_vandermonde_interval_values() {
        let mut points = rlst_dynamic_array2!(f64, [3, 1]);
        *points.get_mut([0, 0]).unwrap() = 0.0;
        *points.get_mut([1, 0]).unwrap() = 1.0;
        *points.get_mut([2, 0]).unwrap() = 2.0;
        for degree in 0..8 {
            let v = vandermonde_matrix(ReferenceCellType::Interval, degree, &points);
            assert_eq!(v.shape(), [3, degree + 1]);
            for n in 0..=degree {
                assert_relative_eq!(
                    *v.get([0, n]).unwrap(),
                    if n == 0 { 1.0 } else { 0.0 }
                );
                assert_relative_eq!(*v.get([1, n]).unwrap(), 1.0);
                assert_relative_eq!(*v.get([2, n]).unwrap(), f64::powi(2.0, n as i32));
            }
        }
    }

    #[test]
    fn test_vandermonde_triangle_values() {
        // At the vertices the monomials reduce to 0/1 indicators.
        let mut points = rlst_dynamic_array2!(f64, [3, 2]);
        *points.get_mut([1, 0]).unwrap() = 1.0;
        *points.get_mut([2, 1]).unwrap() = 1.0;
        for degree in 0..8 {
            let v = vandermonde_matrix(ReferenceCellType::Triangle, degree, &points);
            let mut col = 0;
            for d in 0..=degree {
                for p in 0..=d {
                    let expected0 = if d == 0 { 1.0 } else { 0.0 };
                    let expected1 = if p == 0 { 1.0 } else { 0.0 };
                    let expected2 = if p == d { 1.0 } else { 0.0 };
                    assert_relative_eq!(*v.get([0, col]).unwrap(), expected0);
                    assert_relative_eq!(*v.get([1, col]).unwrap(), expected1);
                    assert_relative_eq!(*v.get([2, col]).unwrap(), expected2);
                    col += 1;
                }
            }
        }
    }

    #[test]
    fn test_vandermonde_grad_shapes() {
        for cell in [ReferenceCellType::Interval, ReferenceCellType::Triangle] {
            let tdim = reference_cell::dim(cell);
            let points = lagrange_points::<f64>(cell, 3);
            for degree in 0..6 {
                let v = vandermonde_matrix_grad(cell, degree, &points);
                assert_eq!(
                    v.shape(),
                    [points.shape()[0], polynomial_count(cell, degree), tdim]
                );
            }
        }
    }

    #[test]
    fn test_vandermonde_grad_against_difference_quotient() {
        let h = 1e-7;
        let mut points = rlst_dynamic_array2!(f64, [3, 2]);
        *points.get_mut([0, 0]).unwrap() = 0.31;
        *points.get_mut([0, 1]).unwrap() = 0.27;
        *points.get_mut([1, 0]).unwrap() = 0.31 + h;
        *points.get_mut([1, 1]).unwrap() = 0.27;
        *points.get_mut([2, 0]).unwrap() = 0.31;
        *points.get_mut([2, 1]).unwrap() = 0.27 + h;
        let degree = 4;
        let v = vandermonde_matrix(ReferenceCellType::Triangle, degree, &points);
        let g = vandermonde_matrix_grad(ReferenceCellType::Triangle, degree, &points);
        for i in 0..v.shape()[1] {
            let base = *v.get([0, i]).unwrap();
            let dx = (*v.get([1, i]).unwrap() - base) / h;
            let dy = (*v.get([2, i]).unwrap() - base) / h;
            assert_relative_eq!(*g.get([0, i, 0]).unwrap(), dx, epsilon = 1e-5);
            assert_relative_eq!(*g.get([0, i, 1]).unwrap(), dy, epsilon = 1e-5);
        }
    }

    macro_rules! test_element {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_tabulate_identity_ $cell:lower>]() {
                    for degree in 1..6 {
                        let e = LagrangeElement::<f64>::new(ReferenceCellType::[<$cell>], degree);
                        let table = e.tabulate(e.nodes());
                        for i in 0..e.dim() {
                            for j in 0..e.dim() {
                                assert_relative_eq!(
                                    *table.get([i, j]).unwrap(),
                                    if i == j { 1.0 } else { 0.0 },
                                    epsilon = 1e-10
                                );
                            }
                        }
                    }
                }

                #[test]
                fn [<test_nodes_per_entity_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let tdim = reference_cell::dim(cell);
                    for degree in 1..8 {
                        let e = LagrangeElement::<f64>::new(cell, degree);
                        for d in 0..=tdim {
                            let expected = binomial(degree - 1, d);
                            assert_eq!(e.nodes_per_entity()[d], expected);
                            for i in 0..reference_cell::entity_counts(cell)[d] {
                                assert_eq!(e.entity_nodes(d, i).unwrap().len(), expected);
                            }
                        }
                    }
                }

                #[test]
                fn [<test_nodes_on_owning_entity_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let tdim = reference_cell::dim(cell);
                    for degree in 1..8 {
                        let e = LagrangeElement::<f64>::new(cell, degree);
                        for d in 0..=tdim {
                            for i in 0..reference_cell::entity_counts(cell)[d] {
                                for n in e.entity_nodes(d, i).unwrap() {
                                    let x = (0..tdim)
                                        .map(|j| *e.nodes().get([*n, j]).unwrap())
                                        .collect::<Vec<_>>();
                                    assert!(reference_cell::point_in_entity(cell, &x, (d, i)));
                                }
                            }
                        }
                    }
                }

            }
        )*
        };
    }

    test_element!(Interval, Triangle);

    #[test]
    fn test_entity_nodes_partition() {
        for cell in [ReferenceCellType::Interval, ReferenceCellType::Triangle] {
            let tdim = reference_cell::dim(cell);
            for degree in 1..8 {
                let e = LagrangeElement::<f64>::new(cell, degree);
                let mut seen = vec![false; e.dim()];
                for d in 0..=tdim {
                    for i in 0..reference_cell::entity_counts(cell)[d] {
                        for n in e.entity_nodes(d, i).unwrap() {
                            assert!(!seen[*n]);
                            seen[*n] = true;
                        }
                    }
                }
                assert!(seen.iter().all(|s| *s));
            }
        }
    }

    #[test]
    fn test_edge_nodes_ordered_along_edge() {
        for cell in [ReferenceCellType::Interval, ReferenceCellType::Triangle] {
            let tdim = reference_cell::dim(cell);
            for degree in 3..8 {
                let e = LagrangeElement::<f64>::new(cell, degree);
                let verts = reference_cell::vertices::<f64>(cell);
                for (i, edge) in reference_cell::topology(cell)[1].iter().enumerate() {
                    let v0 = &verts[edge[0]];
                    let v1 = &verts[edge[1]];
                    let mut previous = f64::NEG_INFINITY;
                    for n in e.entity_nodes(1, i).unwrap() {
                        // Projection onto the edge direction.
                        let mut position = 0.0;
                        for j in 0..tdim {
                            position += (*e.nodes().get([*n, j]).unwrap() - v0[j]) * (v1[j] - v0[j]);
                        }
                        assert!(position > previous);
                        previous = position;
                    }
                }
            }
        }
    }

    #[test]
    fn test_degree_one_gradients() {
        let e = LagrangeElement::<f64>::new(ReferenceCellType::Interval, 1);
        let mut point = rlst_dynamic_array2!(f64, [1, 1]);
        *point.get_mut([0, 0]).unwrap() = 0.37;
        let g = e.tabulate_grad(&point);
        assert_relative_eq!(*g.get([0, 0, 0]).unwrap(), -1.0, epsilon = 1e-12);
        assert_relative_eq!(*g.get([0, 1, 0]).unwrap(), 1.0, epsilon = 1e-12);

        let e = LagrangeElement::<f64>::new(ReferenceCellType::Triangle, 1);
        let mut point = rlst_dynamic_array2!(f64, [1, 2]);
        *point.get_mut([0, 0]).unwrap() = 0.2;
        *point.get_mut([0, 1]).unwrap() = 0.3;
        let g = e.tabulate_grad(&point);
        let expected = [[-1.0, -1.0], [1.0, 0.0], [0.0, 1.0]];
        for (j, row) in expected.iter().enumerate() {
            for (k, value) in row.iter().enumerate() {
                assert_relative_eq!(*g.get([0, j, k]).unwrap(), *value, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_partition_of_unity() {
        for cell in [ReferenceCellType::Interval, ReferenceCellType::Triangle] {
            for degree in 1..6 {
                let e = LagrangeElement::<f64>::new(cell, degree);
                let points = lagrange_points::<f64>(cell, degree + 2);
                let table = e.tabulate(&points);
                for k in 0..points.shape()[0] {
                    let mut total = 0.0;
                    for j in 0..e.dim() {
                        total += *table.get([k, j]).unwrap();
                    }
                    assert_relative_eq!(total, 1.0, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    #[should_panic]
    fn test_degree_zero_rejected() {
        let _ = LagrangeElement::<f64>::new(ReferenceCellType::Triangle, 0);
    }

    #[test]
    #[should_panic]
    fn test_wrong_node_count_rejected() {
        let nodes = lagrange_points::<f64>(ReferenceCellType::Triangle, 2);
        let _ = LagrangeElement::<f64>::with_nodes(ReferenceCellType::Triangle, 3, nodes);
    }
}
