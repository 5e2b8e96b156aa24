//! Functions in finite element spaces.

use crate::element::LagrangeElement;
use crate::function_space::FunctionSpace;
use crate::quadrature::gauss_quadrature;
use crate::types::RealScalar;
use num::Float;
use rlst::RandomAccessByRef;

/// A function in a finite element space, stored as one coefficient per
/// global node.
pub struct Function<'a, T: RealScalar> {
    space: &'a FunctionSpace<'a, T>,
    values: Vec<T>,
    name: Option<String>,
}

impl<'a, T: RealScalar> Function<'a, T> {
    /// Create the zero function in a space
    pub fn new(space: &'a FunctionSpace<'a, T>) -> Self {
        Self {
            space,
            values: vec![T::zero(); space.dim()],
            name: None,
        }
    }

    /// Create the zero function with a name attached
    pub fn with_name(space: &'a FunctionSpace<'a, T>, name: &str) -> Self {
        Self {
            space,
            values: vec![T::zero(); space.dim()],
            name: Some(name.to_string()),
        }
    }

    /// The space the function lives in
    pub fn function_space(&self) -> &'a FunctionSpace<'a, T> {
        self.space
    }

    /// The function's name, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The coefficient of each global node
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Mutable access to the coefficients
    pub fn values_mut(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Set the function to the interpolant of `f`.
    ///
    /// Each global node takes the value of `f` at its physical position,
    /// found by pushing the element's reference nodes through the vertex
    /// coordinate map of each cell. A node shared between cells is written
    /// once per cell with the same value.
    pub fn interpolate(&mut self, f: impl Fn(&[T]) -> T) {
        let mesh = self.space.mesh();
        let element = self.space.element();
        let tdim = mesh.dim();

        let vertex_map = LagrangeElement::<T>::new(element.cell(), 1);
        let phi = vertex_map.tabulate(element.nodes());

        let mut x = vec![T::zero(); tdim];
        for c in 0..mesh.cell_count() {
            let cell = mesh.cell_vertices(c).unwrap();
            let nodes = self.space.cell_nodes(c).unwrap();
            for (n, global) in nodes.iter().enumerate() {
                for (j, xj) in x.iter_mut().enumerate() {
                    *xj = T::zero();
                    for (v, vertex) in cell.iter().enumerate() {
                        *xj = *xj
                            + *phi.get([n, v]).unwrap()
                                * *mesh.vertex_coords().get([*vertex, j]).unwrap();
                    }
                }
                self.values[*global] = f(&x);
            }
        }
    }

    /// Integrate the function over the mesh.
    pub fn integrate(&self) -> T {
        let mesh = self.space.mesh();
        let element = self.space.element();
        let rule = gauss_quadrature::<T>(element.cell(), element.degree());
        let phi = element.tabulate(rule.points());

        let mut total = T::zero();
        for c in 0..mesh.cell_count() {
            let nodes = self.space.cell_nodes(c).unwrap();
            let detj = Float::abs(mesh.jacobian_determinant(c));
            let mut cell_total = T::zero();
            for (k, w) in rule.weights().iter().enumerate() {
                let mut value = T::zero();
                for (n, global) in nodes.iter().enumerate() {
                    value = value + self.values[*global] * *phi.get([k, n]).unwrap();
                }
                cell_total = cell_total + *w * value;
            }
            total = total + cell_total * detj;
        }
        total
    }
}

/// The L2 norm of the difference of two functions on the same mesh.
///
/// The quadrature rule is chosen exact for the square of the difference.
pub fn errornorm<T: RealScalar>(f1: &Function<'_, T>, f2: &Function<'_, T>) -> T {
    let fs1 = f1.function_space();
    let fs2 = f2.function_space();
    assert!(
        std::ptr::eq(fs1.mesh(), fs2.mesh()),
        "Functions must be defined over the same mesh"
    );
    let e1 = fs1.element();
    let e2 = fs2.element();
    let mesh = fs1.mesh();

    let rule = gauss_quadrature::<T>(e1.cell(), 2 * Ord::max(e1.degree(), e2.degree()));
    let phi = e1.tabulate(rule.points());
    let psi = e2.tabulate(rule.points());

    let mut total = T::zero();
    for c in 0..mesh.cell_count() {
        let nodes1 = fs1.cell_nodes(c).unwrap();
        let nodes2 = fs2.cell_nodes(c).unwrap();
        let detj = Float::abs(mesh.jacobian_determinant(c));
        let mut cell_total = T::zero();
        for (k, w) in rule.weights().iter().enumerate() {
            let mut v1 = T::zero();
            for (n, global) in nodes1.iter().enumerate() {
                v1 = v1 + f1.values[*global] * *phi.get([k, n]).unwrap();
            }
            let mut v2 = T::zero();
            for (n, global) in nodes2.iter().enumerate() {
                v2 = v2 + f2.values[*global] * *psi.get([k, n]).unwrap();
            }
            let diff = v1 - v2;
            cell_total = cell_total + *w * diff * diff;
        }
        total = total + cell_total * detj;
    }
    Float::sqrt(total)
}
