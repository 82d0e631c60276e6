use crate::errors::Result;
use linfa::Float;
use ndarray::Array2;

/// Sampling method allowing to generate a DoE in a given sample space
///
/// A sampling method is able to generate a set of `ns` samples in a given sample space
/// defined by `[lower_bound_xi, upper_bound_xi]^nx` where `nx` is the number of parameters.
pub trait SamplingMethod<F: Float> {
    /// Returns the bounds of the sample space
    ///
    /// # Returns
    ///
    /// * A (nx, 2) matrix where the ith row is the interval of the ith components of a sample.
    fn sampling_space(&self) -> &Array2<F>;

    /// Generates a (ns, nx)-shaped array of samples belonging to `[0., 1.]^nx`
    fn normalized_sample(&self, ns: usize) -> Result<Array2<F>>;

    /// Generates a (ns, nx)-shaped array of samples belonging to `[lower_bound_xi, upper_bound_xi]^nx`
    /// where bounds are the rows of [SamplingMethod::sampling_space].
    fn sample(&self, ns: usize) -> Result<Array2<F>> {
        let unit = self.normalized_sample(ns)?;
        let xlimits = self.sampling_space();
        let lower = xlimits.column(0);
        let scaler = &xlimits.column(1) - &lower;
        Ok(unit * scaler + lower)
    }
}
