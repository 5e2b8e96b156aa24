//! Type definitions.

use rlst::{Array, BaseArray, LinAlg, RlstScalar, VectorContainer};

/// A real scalar suitable for geometry and basis coefficients.
pub trait RealScalar: num::Float + LinAlg + RlstScalar<Real = Self> {}

impl<T: num::Float + LinAlg + RlstScalar<Real = T>> RealScalar for T {}

/// An owned two-dimensional dense array.
pub type Array2D<T> = Array<T, BaseArray<T, VectorContainer<T>, 2>, 2>;

/// An owned three-dimensional dense array.
pub type Array3D<T> = Array<T, BaseArray<T, VectorContainer<T>, 3>, 3>;
