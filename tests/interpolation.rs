//! Interpolation and integration round trips through the full stack.

extern crate blas_src;
extern crate lapack_src;

use approx::assert_relative_eq;
use ndfem::{errornorm, shapes, Function, FunctionSpace, LagrangeElement};

#[test]
fn interpolate_and_integrate_monomials() {
    let interval = shapes::unit_interval::<f64>(3);
    let square = shapes::unit_square::<f64>(3, 3);
    for degree in 1..6 {
        for mesh in [&interval, &square] {
            let element = LagrangeElement::new(mesh.cell_type(), degree);
            let space = FunctionSpace::new(mesh, &element);
            let mut f = Function::new(&space);
            f.interpolate(|x| x[0].powi(degree as i32));
            assert_relative_eq!(
                f.integrate(),
                1.0 / (degree as f64 + 1.0),
                epsilon = 1e-12
            );
        }
    }
}

#[test]
fn coordinate_interpolants_are_single_valued() {
    // Interpolating a coordinate gives each shared node the same value from
    // every cell that touches it, so re-interpolating never changes it.
    let mesh = shapes::unit_square::<f64>(4, 3);
    for degree in 1..5 {
        let element = LagrangeElement::new(mesh.cell_type(), degree);
        let space = FunctionSpace::new(&mesh, &element);
        let mut f = Function::new(&space);
        f.interpolate(|x| 3.0 * x[0] + x[1]);
        let first = f.values().to_vec();
        f.interpolate(|x| 3.0 * x[0] + x[1]);
        for (a, b) in first.iter().zip(f.values()) {
            assert_relative_eq!(*a, *b);
        }
        // Every degree reproduces a linear field, so the integral is exact.
        assert_relative_eq!(f.integrate(), 2.0, epsilon = 1e-12);
    }
}

#[test]
fn interpolation_error_decreases_under_refinement() {
    let mut previous = f64::INFINITY;
    for n in [2, 4, 8] {
        let mesh = shapes::unit_square::<f64>(n, n);
        let p1 = LagrangeElement::new(mesh.cell_type(), 1);
        let p3 = LagrangeElement::new(mesh.cell_type(), 3);
        let fs1 = FunctionSpace::new(&mesh, &p1);
        let fs3 = FunctionSpace::new(&mesh, &p3);
        let mut coarse = Function::new(&fs1);
        let mut fine = Function::new(&fs3);
        let f = |x: &[f64]| (std::f64::consts::PI * x[0]).sin() * x[1];
        coarse.interpolate(f);
        fine.interpolate(f);
        let error = errornorm(&coarse, &fine);
        assert!(error < previous / 2.0);
        previous = error;
    }
}
