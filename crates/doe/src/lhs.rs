use crate::design::Design;
use crate::errors::{LhsError, Result};
use crate::optimum::OptimumLhs;
use crate::rng::MarsagliaMulticarry;
use crate::stratified::{StratifiedKind, StratifiedLhs};
use crate::SamplingMethod;
use linfa::Float;
use log::trace;
use ndarray::{Array2, ArrayBase, Data, Ix2};
use ndarray_rand::rand::SeedableRng;
use std::sync::{Arc, RwLock};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Kinds of Latin Hypercube Design
#[derive(Clone, Debug, Default, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum LhsKind {
    /// columns are built point by point, each new point being as close as possible
    /// to the ideal spacing `n / n^(1/k)` from the points already placed
    Improved,
    /// columns are built point by point, each new point maximizing its distance
    /// to the nearest point already placed
    Maximin,
    /// a random design is optimized with the column-wise exchange algorithm
    /// minimizing the sum of inverse distances between points
    #[default]
    Optimum,
}

type RngRef = Arc<RwLock<MarsagliaMulticarry>>;

/// The LHS design is built as follows: each dimension space is divided into ns sections
/// where ns is the number of sampling points, and one point is selected in each section.
/// The way sections are matched across dimensions gives the kind of LHS (see [LhsKind]),
/// the location of a point within its section is drawn uniformly.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct Lhs<F: Float> {
    /// Sampling space definition as a (nx, 2) matrix
    /// The ith row is the [lower_bound, upper_bound] of xi, the ith component of x
    xlimits: Array2<F>,
    /// The requested kind of LHS
    kind: LhsKind,
    /// Candidate duplication factor of the stratified constructions
    dup: usize,
    /// Settings of the exchange algorithm used by [LhsKind::Optimum]
    optimizer: OptimumLhs,
    /// Random generator shared by the clones of the sampler
    rng: RngRef,
}

impl<F: Float> Lhs<F> {
    /// Constructor given a design space given a (nx, 2) matrix \[\[lower bound, upper bound\], ...\]
    /// and a random generator seeded from system entropy.
    ///
    /// ```
    /// use lhsbox_doe::Lhs;
    /// use ndarray::arr2;
    ///
    /// let doe = Lhs::new(&arr2(&[[0.0, 1.0], [5.0, 10.0]]));
    /// ```
    pub fn new(xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>) -> Self {
        Self::new_with_rng(xlimits, MarsagliaMulticarry::from_entropy())
    }

    /// Constructor with given design space and random generator.
    /// * `xlimits`: (nx, 2) matrix where nx is the dimension of the samples and the ith row
    ///   is the definition interval of the ith component of x.
    /// * `rng`: random generator used by every kind of LHS
    pub fn new_with_rng(
        xlimits: &ArrayBase<impl Data<Elem = F>, Ix2>,
        rng: MarsagliaMulticarry,
    ) -> Self {
        Lhs {
            xlimits: xlimits.to_owned(),
            kind: LhsKind::default(),
            dup: 1,
            optimizer: OptimumLhs::default(),
            rng: Arc::new(RwLock::new(rng)),
        }
    }

    /// Sets the kind of LHS
    pub fn kind(mut self, kind: LhsKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the candidate duplication factor of [LhsKind::Improved] and [LhsKind::Maximin]
    pub fn dup(mut self, dup: usize) -> Self {
        self.dup = dup;
        self
    }

    /// Sets the exchange algorithm settings of [LhsKind::Optimum]
    pub fn optimizer(mut self, optimizer: OptimumLhs) -> Self {
        self.optimizer = optimizer;
        self
    }

    /// Sets the random generator
    pub fn with_rng(mut self, rng: MarsagliaMulticarry) -> Self {
        self.rng = Arc::new(RwLock::new(rng));
        self
    }

    /// Sets a random generator with the given seed words
    pub fn with_seed(self, seed1: u32, seed2: u32) -> Self {
        self.with_rng(MarsagliaMulticarry::new(seed1, seed2))
    }

    fn check_bounds(&self) -> Result<()> {
        if self.xlimits.ncols() != 2 {
            return Err(LhsError::InvalidBounds(format!(
                "xlimits must have 2 columns (lower, upper), got {}",
                self.xlimits.ncols()
            )));
        }
        for (i, row) in self.xlimits.rows().into_iter().enumerate() {
            let (lower, upper) = (row[0], row[1]);
            if !lower.is_finite() || !upper.is_finite() || lower > upper {
                return Err(LhsError::InvalidBounds(format!(
                    "x{i} interval [{lower}, {upper}] is not a finite interval"
                )));
            }
        }
        Ok(())
    }

    /// Builds the integer design of the requested kind
    fn design(&self, ns: usize, rng: &mut MarsagliaMulticarry) -> Result<Design<i32>> {
        let nx = self.xlimits.nrows();
        match self.kind {
            LhsKind::Improved => StratifiedLhs::new(ns, nx)
                .kind(StratifiedKind::Improved)
                .dup(self.dup)
                .build(rng),
            LhsKind::Maximin => StratifiedLhs::new(ns, nx)
                .kind(StratifiedKind::Maximin)
                .dup(self.dup)
                .build(rng),
            LhsKind::Optimum => self.optimizer.sample(ns, nx, rng),
        }
    }
}

impl<F: Float> SamplingMethod<F> for Lhs<F> {
    fn sampling_space(&self) -> &Array2<F> {
        &self.xlimits
    }

    fn normalized_sample(&self, ns: usize) -> Result<Array2<F>> {
        self.check_bounds()?;
        trace!("{:?} LHS of {ns} samples in {} dimensions", self.kind, self.xlimits.nrows());
        let mut rng = self.rng.write().map_err(|_| LhsError::RngPoisoned)?;
        let design = self.design(ns, &mut rng)?;
        Ok(to_unit_hypercube(&design, &mut rng))
    }
}

/// Maps an integer Latin hypercube design to the unit hypercube.
///
/// The value `x` of a design of `n` samples becomes `(x - 1 + u) / n` where `u` is drawn
/// uniformly, so the point lies anywhere in its stratum. Draws are taken parameter by
/// parameter, every sample of the first parameter first.
pub fn to_unit_hypercube<F: Float>(
    design: &Design<i32>,
    rng: &mut MarsagliaMulticarry,
) -> Array2<F> {
    let n = design.nsamples() as f64;
    let mut unit = Array2::<F>::zeros((design.nsamples(), design.nparameters()));
    for (mut column, parameter) in unit
        .columns_mut()
        .into_iter()
        .zip(design.samples().columns())
    {
        for (u, &x) in column.iter_mut().zip(parameter.iter()) {
            *u = F::cast((f64::from(x) - 1. + rng.unif_rand()) / n);
        }
    }
    unit
}
