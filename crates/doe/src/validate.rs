//! Structural checks of Latin hypercube designs.
//!
//! [lhs_check] is the historical sum check: each parameter is accepted when the
//! strata of its values add up to `n(n+1)/2`. It can be fooled: `[2, 2, 3, 3]`
//! sums like `[1, 2, 3, 4]`. [is_latin_hypercube] checks every column element-wise.

use crate::design::{Design, LhsValue};
use crate::errors::{LhsError, Result};
use ndarray::{ArrayBase, ArrayView2, Data, Ix1, Ix2};

fn stratum_sum_ok<T: LhsValue>(column: &ArrayBase<impl Data<Elem = T>, Ix1>, n: usize) -> bool {
    let expected = (n * (n + 1) / 2) as i64;
    column.iter().map(|v| v.stratum(n)).sum::<i64>() == expected
}

fn is_permutation<T: LhsValue>(column: &ArrayBase<impl Data<Elem = T>, Ix1>, n: usize) -> bool {
    let mut seen = vec![false; n];
    for v in column.iter() {
        let s = v.stratum(n);
        if s < 1 || s > n as i64 {
            return false;
        }
        let idx = (s - 1) as usize;
        if seen[idx] {
            return false;
        }
        seen[idx] = true;
    }
    true
}

fn sums_ok<T: LhsValue>(samples: &ArrayBase<impl Data<Elem = T>, Ix2>) -> bool {
    let n = samples.nrows();
    samples.columns().into_iter().all(|col| stratum_sum_ok(&col, n))
}

/// Weak Latin hypercube check: every parameter sums to `n(n+1)/2` once mapped to strata
pub fn lhs_check<T: LhsValue>(design: &Design<T>) -> bool {
    sums_ok(&design.samples())
}

/// Weak Latin hypercube check on a flat buffer.
///
/// When `transpose` is false the buffer holds `nparameters` rows of `nsamples` values,
/// otherwise `nsamples` rows of `nparameters` values. A buffer whose length does not
/// match is rejected.
pub fn lhs_check_flat<T: LhsValue>(
    nsamples: usize,
    nparameters: usize,
    values: &[T],
    transpose: bool,
) -> bool {
    if transpose {
        match ArrayView2::from_shape((nsamples, nparameters), values) {
            Ok(samples) => sums_ok(&samples),
            Err(_) => false,
        }
    } else {
        match ArrayView2::from_shape((nparameters, nsamples), values) {
            Ok(params) => sums_ok(&params.t()),
            Err(_) => false,
        }
    }
}

/// Strong Latin hypercube check: the strata of every parameter are a permutation of `1..=n`
pub fn is_latin_hypercube<T: LhsValue>(design: &Design<T>) -> bool {
    let samples = design.samples();
    let n = samples.nrows();
    samples.columns().into_iter().all(|col| is_permutation(&col, n))
}

/// Fails with [LhsError::InvalidHypercube] naming the first parameter which is not a permutation
pub fn check_latin_hypercube<T: LhsValue>(design: &Design<T>) -> Result<()> {
    let samples = design.samples();
    let n = samples.nrows();
    match samples
        .columns()
        .into_iter()
        .position(|col| !is_permutation(&col, n))
    {
        Some(j) => Err(LhsError::InvalidHypercube(format!(
            "parameter {j} is not a permutation of 1..={n}"
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_lhs_check() {
        let design = Design::from_samples(array![[1, 4], [2, 3], [3, 1], [4, 2]]);
        assert!(lhs_check(&design));
        assert!(lhs_check(&design.clone().transpose()));
        assert!(is_latin_hypercube(&design));
        assert!(check_latin_hypercube(&design).is_ok());

        let design = Design::from_samples(array![[1, 4], [2, 3], [3, 1], [4, 1]]);
        assert!(!lhs_check(&design));
        assert!(!is_latin_hypercube(&design));
    }

    #[test]
    fn test_lhs_check_is_fooled_by_matching_sums() {
        // 2 + 2 + 3 + 3 == 1 + 2 + 3 + 4
        let design = Design::from_samples(array![[2, 1], [2, 2], [3, 3], [3, 4]]);
        assert!(lhs_check(&design));
        assert!(!is_latin_hypercube(&design));
        assert_eq!(
            check_latin_hypercube(&design),
            Err(LhsError::InvalidHypercube(
                "parameter 0 is not a permutation of 1..=4".to_string()
            ))
        );
    }

    #[test]
    fn test_lhs_check_flat() {
        // one row per parameter
        let by_params = [1, 2, 3, 3, 1, 2];
        assert!(lhs_check_flat(3, 2, &by_params, false));
        // same buffer read as one row per sample: columns are [1, 3, 1] and [2, 3, 2]
        assert!(!lhs_check_flat(3, 2, &by_params, true));

        let by_samples = [1, 3, 2, 1, 3, 2];
        assert!(lhs_check_flat(3, 2, &by_samples, true));
        assert!(!lhs_check_flat(4, 2, &by_samples, true));
    }

    #[test]
    fn test_real_valued_designs() {
        let design = Design::from_samples(array![[0.1, 0.7], [0.5, 0.2], [0.9, 0.4]]);
        assert!(lhs_check(&design));
        assert!(is_latin_hypercube(&design));

        let design = Design::from_samples(array![[0.1, 0.7], [0.2, 0.2], [0.9, 0.4]]);
        assert!(!is_latin_hypercube(&design));
    }

    #[test]
    fn test_out_of_range_values() {
        let design = Design::from_samples(array![[0, 1], [3, 2], [3, 3]]);
        assert!(lhs_check(&design));
        assert!(!is_latin_hypercube(&design));
    }
}
