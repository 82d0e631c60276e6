use crate::design::{Design, LhsValue};
use crate::errors::{check_shape, LhsError, Result};
use crate::rng::MarsagliaMulticarry;
use crate::utils::sum_inv_distance;
use crate::validate::lhs_check;
use log::{debug, trace};
use ndarray::{Array1, Array2, ArrayBase, Data, Ix2};
use ndarray_stats::QuantileExt;

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Why the exchange algorithm stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// All the sweeps were run
    MaxSweeps,
    /// An exchange gained less than `eps` times the gain of the first column of its sweep
    SmallImprovement,
    /// No exchange of the current column improved the design
    NoImprovement,
}

/// Outcome of an exchange optimization
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct OptimizationReport {
    /// Optimality criterion of the design given to the optimizer
    pub initial_score: f64,
    /// Optimality criterion of the returned design
    pub final_score: f64,
    /// Number of sweeps started
    pub sweeps: usize,
    /// Number of columns processed over all sweeps
    pub column_passes: usize,
    /// Why the algorithm stopped
    pub stop_reason: StopReason,
    /// Criterion of the initial design then after each accepted exchange
    pub history: Vec<f64>,
}

/// Optimality criterion where a NaN counts as the worst possible value
fn score<T: LhsValue>(x: &ArrayBase<impl Data<Elem = T>, Ix2>) -> f64 {
    let s = sum_inv_distance(x);
    if s.is_nan() {
        f64::INFINITY
    } else {
        s
    }
}

/// Column-wise exchange optimizer of Latin hypercube designs.
///
/// For each column in turn, every pair of rows is swapped within that column
/// and the swap which lowers the [sum of inverse distances](crate::sum_inv_distance)
/// the most is kept. Columns are visited in sweeps until
///
/// * `max_sweeps` sweeps are done,
/// * a column gains less than `eps` times the gain of the first column of the sweep,
/// * or a column cannot be improved at all.
///
/// ```
/// use lhsbox_doe::{Design, OptimumLhs};
/// use ndarray::array;
///
/// let mut design = Design::from_samples(array![[1, 1], [2, 2], [3, 3], [4, 4]]);
/// let report = OptimumLhs::default().max_sweeps(5).optimize(&mut design).unwrap();
/// assert!(report.final_score < report.initial_score);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct OptimumLhs {
    max_sweeps: usize,
    eps: f64,
}

impl Default for OptimumLhs {
    fn default() -> Self {
        OptimumLhs {
            max_sweeps: 2,
            eps: 0.1,
        }
    }
}

impl OptimumLhs {
    /// Constructor with 2 sweeps at most and a relative improvement threshold of 0.1
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum number of sweeps over the columns
    pub fn max_sweeps(mut self, max_sweeps: usize) -> Self {
        self.max_sweeps = max_sweeps;
        self
    }

    /// Sets the minimum gain, relative to the gain of the first column of a sweep,
    /// an exchange has to bring for the algorithm to go on
    pub fn eps(mut self, eps: f64) -> Self {
        self.eps = eps;
        self
    }

    fn check(&self) -> Result<()> {
        if self.max_sweeps < 1 {
            return Err(LhsError::InvalidSweeps(self.max_sweeps));
        }
        if self.eps.is_nan() || self.eps < 0. {
            return Err(LhsError::InvalidEps(self.eps));
        }
        Ok(())
    }

    /// Optimizes the design in place.
    ///
    /// The design is only written back when the optimized design passes the
    /// [weak Latin hypercube check](crate::lhs_check), otherwise it is left as given.
    pub fn optimize<T: LhsValue>(&self, design: &mut Design<T>) -> Result<OptimizationReport> {
        self.check()?;
        let n = design.nsamples();
        let k = design.nparameters();
        check_shape(n, k)?;

        let mut current: Array2<T> = design.samples().to_owned();
        let mut candidate = current.clone();
        let npairs = n * (n - 1) / 2;
        let mut records = Array1::<f64>::zeros(npairs + 1);
        let mut swaps = vec![(0, 0); npairs + 1];

        let initial_score = score(&current);
        debug!("Beginning optimality criterion {initial_score}");
        let mut g_old = initial_score;
        let mut history = vec![g_old];
        let mut first_gain = 0.;
        let mut stop_reason = None;
        let mut sweeps = 0;
        let mut column_passes = 0;

        while stop_reason.is_none() && sweeps < self.max_sweeps {
            sweeps += 1;
            for j in 0..k {
                column_passes += 1;
                let mut idx = 0;
                for i in 0..n - 1 {
                    for r in (i + 1)..n {
                        candidate.assign(&current);
                        candidate.swap([i, j], [r, j]);
                        records[idx] = score(&candidate);
                        swaps[idx] = (i, r);
                        idx += 1;
                    }
                }
                // keeping the design as is
                records[npairs] = g_old;
                swaps[npairs] = (0, 0);

                let posit = records.argmin()?;
                let best = records[posit];
                if best < g_old {
                    let (i, r) = swaps[posit];
                    current.swap([i, j], [r, j]);
                    let gain = (best - g_old).abs();
                    if j == 0 {
                        first_gain = gain;
                    } else if gain < self.eps * first_gain {
                        debug!(
                            "Algorithm stopped when the change in the inverse distance measure was smaller than {}",
                            self.eps * first_gain
                        );
                        stop_reason = Some(StopReason::SmallImprovement);
                    }
                    trace!("sweep {sweeps}, column {j}: exchange rows {i} and {r}, criterion {best}");
                    g_old = best;
                    history.push(g_old);
                } else if best == g_old {
                    debug!("Algorithm stopped when changes did not improve design optimality");
                    stop_reason = Some(StopReason::NoImprovement);
                } else {
                    return Err(LhsError::WorseDesign {
                        baseline: g_old,
                        candidate: best,
                    });
                }
                if stop_reason.is_some() {
                    break;
                }
            }
        }
        let stop_reason = stop_reason.unwrap_or(StopReason::MaxSweeps);
        debug!("Final optimality criterion {g_old} after {sweeps} sweep(s) ({column_passes} column passes)");

        let optimized = Design::from_samples(current);
        if !lhs_check(&optimized) {
            return Err(LhsError::InvalidHypercube(
                "optimized design fails the column sum check".to_string(),
            ));
        }
        design.samples_mut().assign(&optimized.samples());

        Ok(OptimizationReport {
            initial_score,
            final_score: g_old,
            sweeps,
            column_passes,
            stop_reason,
            history,
        })
    }

    /// Builds a random Latin hypercube design with [random_ranked_design] and optimizes it
    pub fn sample(
        &self,
        nsamples: usize,
        nparameters: usize,
        rng: &mut MarsagliaMulticarry,
    ) -> Result<Design<i32>> {
        self.check()?;
        let mut design = random_ranked_design(nsamples, nparameters, rng)?;
        self.optimize(&mut design)?;
        Ok(design)
    }
}

/// Builds a random (nsamples, nparameters) Latin hypercube design.
///
/// For each parameter in turn, `nsamples` uniform values are drawn and the
/// column is the 1-based order of the draws (the index of the smallest draw
/// first).
pub fn random_ranked_design(
    nsamples: usize,
    nparameters: usize,
    rng: &mut MarsagliaMulticarry,
) -> Result<Design<i32>> {
    check_shape(nsamples, nparameters)?;
    let mut samples = Array2::<i32>::zeros((nsamples, nparameters));
    for mut column in samples.columns_mut() {
        let draws: Vec<f64> = (0..nsamples).map(|_| rng.unif_rand()).collect();
        let mut order: Vec<usize> = (0..nsamples).collect();
        order.sort_by(|&a, &b| draws[a].total_cmp(&draws[b]));
        for (value, idx) in column.iter_mut().zip(order) {
            *value = idx as i32 + 1;
        }
    }
    Ok(Design::from_samples(samples))
}

/// Optimizes a design of `n` samples in `k` dimensions in place with at most
/// `max_sweeps` sweeps and relative improvement threshold `eps`
pub fn optimum_lhs<T: LhsValue>(
    n: usize,
    k: usize,
    max_sweeps: usize,
    eps: f64,
    design: &mut Design<T>,
) -> Result<OptimizationReport> {
    design.check_dims(n, k)?;
    OptimumLhs::new()
        .max_sweeps(max_sweeps)
        .eps(eps)
        .optimize(design)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::design_score;
    use crate::validate::is_latin_hypercube;
    use crate::{maximin_lhs, Orientation};
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn reference_start() -> Design<i32> {
        let mut rng = MarsagliaMulticarry::new(1976, 1968);
        random_ranked_design(4, 3, &mut rng).unwrap()
    }

    #[test]
    fn test_random_ranked_design() {
        let design = reference_start();
        assert_eq!(
            design.transpose().to_flat_vec(),
            vec![3, 2, 1, 4, 2, 3, 4, 1, 3, 1, 4, 2]
        );
    }

    #[test]
    fn test_optimum_lhs() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut design = reference_start();
        let report = optimum_lhs(4, 3, 2, 0.1, &mut design).unwrap();
        assert_eq!(
            design.clone().transpose().to_flat_vec(),
            vec![1, 2, 3, 4, 2, 4, 3, 1, 3, 1, 4, 2]
        );
        assert_eq!(report.sweeps, 1);
        assert_eq!(report.column_passes, 2);
        assert_eq!(report.stop_reason, StopReason::SmallImprovement);
        assert_eq!(report.history.len(), 3);
        assert_abs_diff_eq!(report.initial_score, 2.1669772872535296, epsilon = 1e-12);
        assert_abs_diff_eq!(report.final_score, 1.9451988881984812, epsilon = 1e-12);
        assert_abs_diff_eq!(report.final_score, design_score(&design), epsilon = 1e-12);
    }

    #[test]
    fn test_optimize_keeps_orientation() {
        let mut design = reference_start().transpose();
        OptimumLhs::default().optimize(&mut design).unwrap();
        assert_eq!(design.orientation(), Orientation::SamplesByColumns);
        assert_eq!(
            design.to_flat_vec(),
            vec![1, 2, 3, 4, 2, 4, 3, 1, 3, 1, 4, 2]
        );
    }

    #[test]
    fn test_sample() {
        let mut rng = MarsagliaMulticarry::new(1976, 1968);
        let design = OptimumLhs::new().sample(4, 3, &mut rng).unwrap();
        assert_eq!(
            design.transpose().to_flat_vec(),
            vec![1, 2, 3, 4, 2, 4, 3, 1, 3, 1, 4, 2]
        );
    }

    #[test]
    fn test_monotone_and_bounded() {
        let mut rng = MarsagliaMulticarry::new(7, 11);
        for (n, k, max_sweeps) in [(10, 4, 3), (6, 2, 10), (12, 3, 1), (5, 5, 4)] {
            let mut design = random_ranked_design(n, k, &mut rng).unwrap();
            let report = OptimumLhs::new()
                .max_sweeps(max_sweeps)
                .eps(0.)
                .optimize(&mut design)
                .unwrap();
            assert!(report.history.windows(2).all(|w| w[1] <= w[0]));
            assert!(report.sweeps <= max_sweeps);
            assert!(report.column_passes <= max_sweeps * k);
            assert!(report.final_score <= report.initial_score);
            assert!(is_latin_hypercube(&design));
            if report.stop_reason == StopReason::MaxSweeps {
                assert_eq!(report.column_passes, max_sweeps * k);
            }
        }
    }

    #[test]
    fn test_already_optimal_column() {
        // two samples: every exchange gives the same criterion
        let mut design = Design::from_samples(array![[1, 2], [2, 1]]);
        let report = OptimumLhs::default().optimize(&mut design).unwrap();
        assert_eq!(report.stop_reason, StopReason::NoImprovement);
        assert_eq!(report.column_passes, 1);
        assert_eq!(report.history.len(), 1);
        assert_eq!(design.samples(), array![[1, 2], [2, 1]]);
    }

    #[test]
    fn test_seeded_real_design() {
        let mut rng = MarsagliaMulticarry::new(1976, 1968);
        let int_design = maximin_lhs(8, 3, 2, &mut rng).unwrap();
        let mut design = Design::from_samples(int_design.samples().mapv(|v| (v as f64 - 0.5) / 8.));
        let report = OptimumLhs::new()
            .max_sweeps(5)
            .optimize(&mut design)
            .unwrap();
        assert!(report.final_score <= report.initial_score);
        assert!(is_latin_hypercube(&design));
    }

    #[test]
    fn test_infinite_criterion_is_not_an_error() {
        let x = array![[0.1, 0.1], [0.1, 0.1], [0.9, 0.9]];
        assert!(score(&x).is_infinite());
        let mut design = Design::from_samples(x.clone());
        // the duplicated rows are split up but the strata stay invalid
        let err = OptimumLhs::default().optimize(&mut design).unwrap_err();
        assert!(err.is_invariant_violation());
        assert_eq!(design.samples(), x);
    }

    #[test]
    fn test_invalid_arguments() {
        let mut design = reference_start();
        assert_eq!(
            OptimumLhs::new().max_sweeps(0).optimize(&mut design),
            Err(LhsError::InvalidSweeps(0))
        );
        assert_eq!(
            OptimumLhs::new().eps(-0.1).optimize(&mut design),
            Err(LhsError::InvalidEps(-0.1))
        );
        assert!(OptimumLhs::new()
            .eps(f64::NAN)
            .optimize(&mut design)
            .unwrap_err()
            .is_parameter_error());
        assert_eq!(
            optimum_lhs(5, 3, 2, 0.1, &mut design),
            Err(LhsError::DimensionMismatch {
                expected: (5, 3),
                got: (4, 3)
            })
        );
        let mut single = Design::from_samples(array![[1, 1, 1]]);
        assert_eq!(
            OptimumLhs::new().optimize(&mut single),
            Err(LhsError::InvalidSampleCount(1))
        );

        let mut rng = MarsagliaMulticarry::new(1976, 1968);
        assert!(OptimumLhs::new().eps(-1.).sample(4, 3, &mut rng).is_err());
        assert!(random_ranked_design(4, 0, &mut rng).is_err());
        assert_eq!(rng.seed(), (1976, 1968));
    }

    #[test]
    fn test_stress() {
        let start = reference_start();
        let mut first = start.clone();
        let first_report = optimum_lhs(4, 3, 2, 0.1, &mut first).unwrap();
        for _ in 0..10_000 {
            let mut design = start.clone();
            let report = optimum_lhs(4, 3, 2, 0.1, &mut design).unwrap();
            assert_eq!(design, first);
            assert_eq!(report, first_report);
        }
    }
}
