//! Quadrature rules on reference cells.

use crate::reference_cell;
use crate::reference_cell::ReferenceCellType;
use crate::types::{Array2D, RealScalar};
use num::Float;
use rlst::{rlst_dynamic_array2, RandomAccessByRef, RandomAccessMut, Shape};

/// Invalid quadrature data
#[derive(thiserror::Error, Debug)]
pub enum QuadratureError {
    /// Points do not match the dimension of the cell
    #[error("dimension mismatch between reference cell and quadrature points")]
    DimensionMismatch,
    /// Point and weight counts differ
    #[error("number of quadrature points and quadrature weights must match")]
    CountMismatch,
}

/// A quadrature rule on a reference cell.
///
/// The rule integrates all polynomials of total degree at most `degree`
/// exactly.
pub struct QuadratureRule<T: RealScalar> {
    cell: ReferenceCellType,
    degree: usize,
    points: Array2D<T>,
    weights: Vec<T>,
}

impl<T: RealScalar> QuadratureRule<T> {
    /// Create a rule from a `[npoints, dim]` point array and matching weights
    pub fn new(
        cell: ReferenceCellType,
        degree: usize,
        points: Array2D<T>,
        weights: Vec<T>,
    ) -> Result<Self, QuadratureError> {
        if points.shape()[1] != reference_cell::dim(cell) {
            return Err(QuadratureError::DimensionMismatch);
        }
        if points.shape()[0] != weights.len() {
            return Err(QuadratureError::CountMismatch);
        }
        Ok(Self {
            cell,
            degree,
            points,
            weights,
        })
    }

    /// The cell on which the rule is defined
    pub fn cell(&self) -> ReferenceCellType {
        self.cell
    }

    /// The degree of precision
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of quadrature points
    pub fn npoints(&self) -> usize {
        self.weights.len()
    }

    /// The quadrature points, one point per row
    pub fn points(&self) -> &Array2D<T> {
        &self.points
    }

    /// The quadrature weights
    pub fn weights(&self) -> &[T] {
        &self.weights
    }

    /// Integrate a function over the reference cell.
    pub fn integrate(&self, f: impl Fn(&[T]) -> T) -> T {
        let tdim = self.points.shape()[1];
        let mut x = vec![T::zero(); tdim];
        let mut total = T::zero();
        for (k, w) in self.weights.iter().enumerate() {
            for (j, xj) in x.iter_mut().enumerate() {
                *xj = *self.points.get([k, j]).unwrap();
            }
            total = total + *w * f(&x);
        }
        total
    }
}

/// The degree-`n` Legendre polynomial and its derivative at `x`
fn legendre_pair<T: RealScalar>(n: usize, x: T) -> (T, T) {
    let mut p0 = T::one();
    if n == 0 {
        return (p0, T::zero());
    }
    let mut p1 = x;
    for k in 2..=n {
        let kf = T::from(k).unwrap();
        let p2 = (T::from(2 * k - 1).unwrap() * x * p1 - (kf - T::one()) * p0) / kf;
        p0 = p1;
        p1 = p2;
    }
    let dp = T::from(n).unwrap() * (x * p1 - p0) / (x * x - T::one());
    (p1, dp)
}

/// Gauss-Legendre points and weights on [-1, 1].
///
/// Each root of the Legendre polynomial is found by Newton iteration from a
/// Chebyshev initial guess, so rules of any size are available.
fn gauss_legendre<T: RealScalar>(npoints: usize) -> (Vec<T>, Vec<T>) {
    let mut points = vec![T::zero(); npoints];
    let mut weights = vec![T::zero(); npoints];
    let pi = T::from(std::f64::consts::PI).unwrap();
    let two = T::from(2.0).unwrap();
    for i in 0..npoints {
        let theta = pi * (T::from(i).unwrap() + T::from(0.75).unwrap())
            / (T::from(npoints).unwrap() + T::from(0.5).unwrap());
        let mut x = Float::cos(theta);
        for _ in 0..100 {
            let (p, dp) = legendre_pair(npoints, x);
            let dx = p / dp;
            x = x - dx;
            if Float::abs(dx) <= T::epsilon() {
                break;
            }
        }
        let (_, dp) = legendre_pair(npoints, x);
        points[i] = x;
        weights[i] = two / ((T::one() - x * x) * dp * dp);
    }
    (points, weights)
}

/// Return a Gauss-Legendre rule exact for polynomials of total degree at
/// most `degree`.
///
/// The interval rule is the Gauss-Legendre rule mapped from [-1, 1] to
/// [0, 1]. The triangle rule collapses the product of an interval rule of
/// degree `degree + 1` (outer direction) and one of degree `degree` (inner
/// direction) onto the triangle, picking up the Jacobian factor `1 - p` of
/// the collapse in the weights.
pub fn gauss_quadrature<T: RealScalar>(cell: ReferenceCellType, degree: usize) -> QuadratureRule<T> {
    match cell {
        ReferenceCellType::Interval => {
            // A rule with n points is exact for degree 2n - 1.
            let npoints = degree / 2 + 1;
            let (xs, ws) = gauss_legendre::<T>(npoints);
            let half = T::from(0.5).unwrap();
            let mut points = rlst_dynamic_array2!(T, [npoints, 1]);
            let mut weights = Vec::with_capacity(npoints);
            for (i, (x, w)) in xs.iter().zip(&ws).enumerate() {
                *points.get_mut([i, 0]).unwrap() = (*x + T::one()) * half;
                weights.push(*w * half);
            }
            QuadratureRule::new(cell, degree, points, weights).unwrap()
        }
        ReferenceCellType::Triangle => {
            let outer = gauss_quadrature::<T>(ReferenceCellType::Interval, degree + 1);
            let inner = gauss_quadrature::<T>(ReferenceCellType::Interval, degree);
            let npoints = outer.npoints() * inner.npoints();
            let mut points = rlst_dynamic_array2!(T, [npoints, 2]);
            let mut weights = Vec::with_capacity(npoints);
            let mut n = 0;
            for (i, pw) in outer.weights().iter().enumerate() {
                let p = *outer.points().get([i, 0]).unwrap();
                for (j, qw) in inner.weights().iter().enumerate() {
                    let q = *inner.points().get([j, 0]).unwrap();
                    *points.get_mut([n, 0]).unwrap() = p;
                    *points.get_mut([n, 1]).unwrap() = q * (T::one() - p);
                    weights.push(*pw * *qw * (T::one() - p));
                    n += 1;
                }
            }
            QuadratureRule::new(cell, degree, points, weights).unwrap()
        }
    }
}
