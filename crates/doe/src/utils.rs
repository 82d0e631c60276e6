use crate::design::{Design, LhsValue};
use ndarray::{ArrayBase, Data, Ix1, Ix2, Zip};
use num_traits::AsPrimitive;

/// Computes the squared euclidean distance between two points
pub fn squared_distance<T: LhsValue>(
    a: &ArrayBase<impl Data<Elem = T>, Ix1>,
    b: &ArrayBase<impl Data<Elem = T>, Ix1>,
) -> f64 {
    let mut dist = 0.;
    Zip::from(a).and(b).for_each(|&xa, &xb| {
        let diff: f64 = (xa - xb).as_();
        dist += diff * diff;
    });
    dist
}

/// Computes the sum of the inverse euclidean distances between every pair of rows of `x`.
///
/// This is the optimality criterion of the exchange algorithm: the lower, the further
/// apart the points are. Pairs are accumulated row by row (i < j) so the result is
/// reproducible to the last bit. Two identical rows contribute `+inf`.
pub fn sum_inv_distance<T: LhsValue>(x: &ArrayBase<impl Data<Elem = T>, Ix2>) -> f64 {
    let nrows = x.nrows();
    let mut total = 0.;
    for i in 0..nrows.saturating_sub(1) {
        let row_i = x.row(i);
        for j in (i + 1)..nrows {
            total += 1. / squared_distance(&row_i, &x.row(j)).sqrt();
        }
    }
    total
}

/// Optimality criterion of a design whatever its orientation
pub fn design_score<T: LhsValue>(design: &Design<T>) -> f64 {
    sum_inv_distance(&design.samples())
}
