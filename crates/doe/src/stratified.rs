//! Stratified greedy construction of Latin hypercube designs.
//!
//! Samples are placed from the last one to the first. For each slot, every
//! parameter draws `dup` times more candidate values than it has values left,
//! and the candidate point which spaces best with the points already placed
//! is kept. The two constructors differ only by what "best" means, see [StratifiedKind].

use crate::design::{Design, Orientation};
use crate::errors::{check_shape, LhsError, Result};
use crate::rng::MarsagliaMulticarry;
use crate::utils::squared_distance;
use crate::validate::check_latin_hypercube;
use log::trace;
use ndarray::{Array2, Axis};

#[cfg(feature = "serializable")]
use serde::{Deserialize, Serialize};

/// Candidate selection rule of the stratified construction
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum StratifiedKind {
    /// candidate whose distance to its nearest placed point is the closest to the
    /// optimal spacing `n / n^(1/k)`
    #[default]
    Improved,
    /// candidate whose distance to its nearest placed point is the largest
    Maximin,
}

/// How a uniform draw is turned into a position in the candidate list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub enum CandidateIndexing {
    /// `floor(u * len)`, always a live position of the list
    #[default]
    ZeroBased,
    /// `floor(u * len + 1)`, reproduces designs of the historical library.
    /// A draw past the end of the scratch list falls back on the last live position.
    Legacy,
}

impl CandidateIndexing {
    fn position(self, u: f64, live: usize, capacity: usize) -> usize {
        match self {
            CandidateIndexing::ZeroBased => (u * live as f64).floor() as usize,
            CandidateIndexing::Legacy => {
                let pos = (u * live as f64 + 1.).floor() as usize;
                if pos < capacity {
                    pos
                } else {
                    live - 1
                }
            }
        }
    }
}

impl StratifiedKind {
    /// Returns the index of the chosen candidate given, for each candidate, its
    /// squared distance to the nearest point already placed. First best wins.
    fn select(self, nearest: &[f64], opt2: f64) -> usize {
        let mut best = 0;
        match self {
            StratifiedKind::Improved => {
                let mut min_gap = f64::MAX;
                for (c, &d) in nearest.iter().enumerate() {
                    let gap = (d - opt2).abs();
                    if gap < min_gap {
                        min_gap = gap;
                        best = c;
                    }
                }
            }
            StratifiedKind::Maximin => {
                let mut max_nearest = f64::MIN_POSITIVE;
                for (c, &d) in nearest.iter().enumerate() {
                    if d > max_nearest {
                        max_nearest = d;
                        best = c;
                    }
                }
            }
        }
        best
    }
}

/// Builder of stratified Latin hypercube designs
///
/// ```
/// use lhsbox_doe::{MarsagliaMulticarry, StratifiedKind, StratifiedLhs};
///
/// let mut rng = MarsagliaMulticarry::new(1976, 1968);
/// let design = StratifiedLhs::new(4, 3)
///     .kind(StratifiedKind::Maximin)
///     .dup(5)
///     .build(&mut rng)
///     .unwrap();
/// assert_eq!(
///     design.transpose().to_flat_vec(),
///     vec![4, 2, 1, 3, 1, 4, 3, 2, 3, 1, 4, 2]
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serializable", derive(Serialize, Deserialize))]
pub struct StratifiedLhs {
    nsamples: usize,
    nparameters: usize,
    dup: usize,
    kind: StratifiedKind,
    indexing: CandidateIndexing,
}

impl StratifiedLhs {
    /// Constructor given the number of samples and the number of parameters.
    /// Defaults to [StratifiedKind::Improved] with a duplication factor of 1.
    pub fn new(nsamples: usize, nparameters: usize) -> Self {
        StratifiedLhs {
            nsamples,
            nparameters,
            dup: 1,
            kind: StratifiedKind::default(),
            indexing: CandidateIndexing::default(),
        }
    }

    /// Sets the candidate selection rule
    pub fn kind(mut self, kind: StratifiedKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the duplication factor: the number of candidates drawn per remaining value
    pub fn dup(mut self, dup: usize) -> Self {
        self.dup = dup;
        self
    }

    /// Sets the candidate indexing convention
    pub fn indexing(mut self, indexing: CandidateIndexing) -> Self {
        self.indexing = indexing;
        self
    }

    /// Builds a (nsamples, nparameters) design, drawing from `rng`.
    ///
    /// Arguments are checked before the first draw, so a rejected call leaves
    /// the generator untouched.
    pub fn build(&self, rng: &mut MarsagliaMulticarry) -> Result<Design<i32>> {
        let n = self.nsamples;
        let k = self.nparameters;
        let dup = self.dup;
        check_shape(n, k)?;
        if dup < 1 {
            return Err(LhsError::InvalidDuplication(dup));
        }
        trace!(
            "{:?} LHS with nsamples={n}, nparameters={k}, dup={dup}",
            self.kind
        );

        let len = dup * (n - 1);
        // one row per parameter while building
        let mut result = Array2::<i32>::zeros((k, n));
        let mut avail = Array2::from_shape_fn((k, n), |(_, j)| j as i32 + 1);
        let mut point1 = Array2::<i32>::zeros((k, len));
        let mut list1 = vec![0i32; len];
        let opt = n as f64 / (n as f64).powf(1. / k as f64);
        let opt2 = opt * opt;

        // the last sample is drawn at random, its values are
        // replaced by n in the table of available values
        for p in 0..k {
            result[[p, n - 1]] = (rng.unif_rand() * n as f64 + 1.).floor() as i32;
        }
        for p in 0..k {
            let v = result[[p, n - 1]] as usize;
            avail[[p, v - 1]] = n as i32;
        }

        for count in (1..n).rev() {
            for p in 0..k {
                for d in 0..dup {
                    for j in 0..count {
                        list1[j + count * d] = avail[[p, j]];
                    }
                }
                for live in (1..=count * dup).rev() {
                    let pos = self.indexing.position(rng.unif_rand(), live, len);
                    point1[[p, live - 1]] = list1[pos];
                    list1[pos] = list1[live - 1];
                }
            }

            // the last candidate is never scored
            let ncandidates = dup * count - 1;
            let nearest: Vec<f64> = (0..ncandidates)
                .map(|c| {
                    let candidate = point1.column(c);
                    (count..n)
                        .map(|j| squared_distance(&candidate, &result.column(j)))
                        .fold(f64::INFINITY, f64::min)
                })
                .collect();
            let best = self.kind.select(&nearest, opt2);

            for p in 0..k {
                let chosen = point1[[p, best]];
                result[[p, count - 1]] = chosen;
                let mut row = avail.index_axis_mut(Axis(0), p);
                for j in 0..n {
                    if row[j] == chosen {
                        row[j] = row[count - 1];
                    }
                }
            }
        }

        // only one value is left for the first sample
        for p in 0..k {
            result[[p, 0]] = avail[[p, 0]];
        }

        let design = Design::new(result, Orientation::SamplesByColumns).transpose();
        check_latin_hypercube(&design)?;
        Ok(design)
    }
}

/// Builds an improved Latin hypercube design of `n` samples in `k` dimensions
/// with duplication factor `dup`
pub fn improved_lhs(
    n: usize,
    k: usize,
    dup: usize,
    rng: &mut MarsagliaMulticarry,
) -> Result<Design<i32>> {
    StratifiedLhs::new(n, k)
        .kind(StratifiedKind::Improved)
        .dup(dup)
        .build(rng)
}

/// Builds a maximin Latin hypercube design of `n` samples in `k` dimensions
/// with duplication factor `dup`
pub fn maximin_lhs(
    n: usize,
    k: usize,
    dup: usize,
    rng: &mut MarsagliaMulticarry,
) -> Result<Design<i32>> {
    StratifiedLhs::new(n, k)
        .kind(StratifiedKind::Maximin)
        .dup(dup)
        .build(rng)
}
