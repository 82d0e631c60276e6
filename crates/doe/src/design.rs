use crate::errors::{LhsError, Result};
use ndarray::{Array2, ArrayView1, ArrayView2, ArrayViewMut2, Axis};
use num_traits::{AsPrimitive, Num};
use std::fmt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Element type of a design matrix
///
/// Integer designs hold the stratum numbers `1..=n` directly, real-valued designs
/// hold points of the unit hypercube whose stratum is `1 + floor(n * x)`.
pub trait LhsValue:
    Copy + PartialOrd + Num + AsPrimitive<f64> + fmt::Debug + fmt::Display + Send + Sync + 'static
{
    /// Returns the 1-based stratum of the value within a design of `nsamples` points
    fn stratum(self, nsamples: usize) -> i64;
}

impl LhsValue for i32 {
    fn stratum(self, _nsamples: usize) -> i64 {
        i64::from(self)
    }
}

impl LhsValue for i64 {
    fn stratum(self, _nsamples: usize) -> i64 {
        self
    }
}

impl LhsValue for f32 {
    fn stratum(self, nsamples: usize) -> i64 {
        1 + (nsamples as f64 * f64::from(self)).floor() as i64
    }
}

impl LhsValue for f64 {
    fn stratum(self, nsamples: usize) -> i64 {
        1 + (nsamples as f64 * self).floor() as i64
    }
}

/// Tells how a design matrix is laid out
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum Orientation {
    /// (nsamples, nparameters) matrix, one sample per row
    #[default]
    SamplesByRows,
    /// (nparameters, nsamples) matrix, one sample per column
    SamplesByColumns,
}

impl Orientation {
    /// Returns the other orientation
    pub fn transposed(self) -> Self {
        match self {
            Orientation::SamplesByRows => Orientation::SamplesByColumns,
            Orientation::SamplesByColumns => Orientation::SamplesByRows,
        }
    }
}

/// A design of experiments: `nsamples` points in `nparameters` dimensions.
///
/// The stored matrix and its [Orientation] always go together, a design is
/// never reinterpreted silently: [Design::transpose] changes both.
///
/// ```
/// use lhsbox_doe::{Design, Orientation};
///
/// let design = Design::from_flat(3, 2, vec![1, 3, 2, 1, 3, 2], Orientation::SamplesByRows).unwrap();
/// assert_eq!(design.parameter(0).to_vec(), vec![1, 2, 3]);
/// let transposed = design.transpose();
/// assert_eq!(transposed.to_flat_vec(), vec![1, 2, 3, 3, 1, 2]);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Design<T> {
    values: Array2<T>,
    orientation: Orientation,
}

impl<T: LhsValue> Design<T> {
    /// Constructor given the stored matrix and its orientation
    pub fn new(values: Array2<T>, orientation: Orientation) -> Self {
        Design {
            values,
            orientation,
        }
    }

    /// Constructor given a (nsamples, nparameters) matrix
    pub fn from_samples(samples: Array2<T>) -> Self {
        Self::new(samples, Orientation::SamplesByRows)
    }

    /// Constructor given a flat buffer read in the standard (row-major) order of the
    /// matrix described by `orientation`.
    ///
    /// With [Orientation::SamplesByColumns] the buffer lists the values of the first
    /// parameter for every sample, then the second parameter and so on.
    pub fn from_flat(
        nsamples: usize,
        nparameters: usize,
        values: Vec<T>,
        orientation: Orientation,
    ) -> Result<Self> {
        let len = values.len();
        let shape = match orientation {
            Orientation::SamplesByRows => (nsamples, nparameters),
            Orientation::SamplesByColumns => (nparameters, nsamples),
        };
        let values = Array2::from_shape_vec(shape, values).map_err(|_| LhsError::InvalidLength {
            expected: nsamples * nparameters,
            got: len,
        })?;
        Ok(Self::new(values, orientation))
    }

    /// Number of sample points
    pub fn nsamples(&self) -> usize {
        match self.orientation {
            Orientation::SamplesByRows => self.values.nrows(),
            Orientation::SamplesByColumns => self.values.ncols(),
        }
    }

    /// Number of parameters, a.k.a. dimensions
    pub fn nparameters(&self) -> usize {
        match self.orientation {
            Orientation::SamplesByRows => self.values.ncols(),
            Orientation::SamplesByColumns => self.values.nrows(),
        }
    }

    /// Current orientation of the stored matrix
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Swaps rows and columns of the stored matrix.
    ///
    /// Only the indexing changes, no element is copied.
    pub fn transpose(self) -> Self {
        Design {
            values: self.values.reversed_axes(),
            orientation: self.orientation.transposed(),
        }
    }

    /// Returns the design with the requested orientation
    pub fn oriented(self, orientation: Orientation) -> Self {
        if self.orientation == orientation {
            self
        } else {
            self.transpose()
        }
    }

    /// The stored matrix, as laid out by [Design::orientation]
    pub fn values(&self) -> ArrayView2<T> {
        self.values.view()
    }

    /// The (nsamples, nparameters) view of the design whatever its orientation
    pub fn samples(&self) -> ArrayView2<T> {
        match self.orientation {
            Orientation::SamplesByRows => self.values.view(),
            Orientation::SamplesByColumns => self.values.t(),
        }
    }

    /// Mutable (nsamples, nparameters) view of the design
    pub fn samples_mut(&mut self) -> ArrayViewMut2<T> {
        match self.orientation {
            Orientation::SamplesByRows => self.values.view_mut(),
            Orientation::SamplesByColumns => self.values.view_mut().reversed_axes(),
        }
    }

    /// Values taken by the `j`th parameter over all samples
    pub fn parameter(&self, j: usize) -> ArrayView1<T> {
        match self.orientation {
            Orientation::SamplesByRows => self.values.index_axis(Axis(1), j),
            Orientation::SamplesByColumns => self.values.index_axis(Axis(0), j),
        }
    }

    /// Consumes the design and returns its (nsamples, nparameters) matrix
    pub fn into_samples(self) -> Array2<T> {
        self.oriented(Orientation::SamplesByRows).values
    }

    /// Flattens the stored matrix in its standard order
    pub fn to_flat_vec(&self) -> Vec<T> {
        self.values.iter().copied().collect()
    }

    /// Checks the design has the given number of samples and parameters
    pub fn check_dims(&self, nsamples: usize, nparameters: usize) -> Result<()> {
        if self.nsamples() != nsamples || self.nparameters() != nparameters {
            return Err(LhsError::DimensionMismatch {
                expected: (nsamples, nparameters),
                got: (self.nsamples(), self.nparameters()),
            });
        }
        Ok(())
    }
}

impl<T: LhsValue> fmt::Display for Design<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.values.rows() {
            let line: Vec<String> = row.iter().map(|v| v.to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_orientation_aware_dims() {
        let design = Design::from_samples(array![[1, 2], [2, 1], [3, 3]]);
        assert_eq!((design.nsamples(), design.nparameters()), (3, 2));
        let design = design.transpose();
        assert_eq!(design.orientation(), Orientation::SamplesByColumns);
        assert_eq!(design.values().dim(), (2, 3));
        assert_eq!((design.nsamples(), design.nparameters()), (3, 2));
        assert_eq!(design.samples(), array![[1, 2], [2, 1], [3, 3]]);
        assert_eq!(design.parameter(1).to_vec(), vec![2, 1, 3]);
    }

    #[test]
    fn test_transpose_twice() {
        let design = Design::from_samples(array![[1., 0.5], [0.25, 0.75]]);
        assert_eq!(design.clone().transpose().transpose(), design);
    }

    #[test]
    fn test_from_flat() {
        let by_columns =
            Design::from_flat(4, 2, vec![1, 2, 3, 4, 4, 3, 2, 1], Orientation::SamplesByColumns)
                .unwrap();
        assert_eq!(by_columns.samples(), array![[1, 4], [2, 3], [3, 2], [4, 1]]);
        assert_eq!(
            by_columns.clone().into_samples(),
            array![[1, 4], [2, 3], [3, 2], [4, 1]]
        );
        let by_rows = by_columns.oriented(Orientation::SamplesByRows);
        assert_eq!(by_rows.to_flat_vec(), vec![1, 4, 2, 3, 3, 2, 4, 1]);

        let err = Design::from_flat(4, 2, vec![1, 2, 3], Orientation::SamplesByRows).unwrap_err();
        assert_eq!(
            err,
            LhsError::InvalidLength {
                expected: 8,
                got: 3
            }
        );
    }

    #[test]
    fn test_samples_mut_follows_orientation() {
        let mut design = Design::from_samples(array![[1, 2], [2, 1]]).transpose();
        design.samples_mut()[[0, 1]] = 7;
        assert_eq!(design.values()[[1, 0]], 7);
    }

    #[test]
    fn test_check_dims() {
        let design = Design::from_samples(array![[1], [2]]);
        assert!(design.check_dims(2, 1).is_ok());
        assert_eq!(
            design.check_dims(3, 1),
            Err(LhsError::DimensionMismatch {
                expected: (3, 1),
                got: (2, 1)
            })
        );
    }

    #[test]
    fn test_stratum() {
        assert_eq!(3i32.stratum(4), 3);
        assert_eq!(0.0f64.stratum(4), 1);
        assert_eq!(0.3f64.stratum(4), 2);
        assert_eq!(0.99f64.stratum(4), 4);
    }

    #[test]
    fn test_display() {
        let design = Design::from_samples(array![[1, 2], [2, 1]]);
        assert_eq!(design.to_string(), "1 2\n2 1\n");
        assert_eq!(design.transpose().to_string(), "1 2\n2 1\n");
        let design = Design::from_samples(array![[1, 2], [3, 1], [2, 3]]);
        assert_eq!(design.transpose().to_string(), "1 3 2\n2 1 3\n");
    }
}
