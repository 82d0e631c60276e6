/*!
This library builds [Latin Hypercube](https://en.wikipedia.org/wiki/Latin_hypercube_sampling)
designs of experiments which are reproducible draw for draw from a seed.

A design of `n` samples in `k` dimensions is a matrix whose every column is a permutation
of the strata `1..=n`. Three constructions are available:
* [improved_lhs]: points are placed one at a time as close as possible to the ideal spacing,
* [maximin_lhs]: points are placed one at a time as far as possible from their nearest neighbour,
* [optimum_lhs]: an existing design is improved by column-wise exchanges minimizing the
  [sum of inverse distances](crate::sum_inv_distance) between points.

Every construction draws from an explicit [MarsagliaMulticarry] generator so that the
designs of a given seed never change.

Example:
```
use lhsbox_doe::{improved_lhs, lhs_check, Lhs, LhsKind, MarsagliaMulticarry, SamplingMethod};
use ndarray::arr2;

let mut rng = MarsagliaMulticarry::new(1976, 1968);
let design = improved_lhs(4, 3, 1, &mut rng).unwrap();
assert!(lhs_check(&design));

// Design space is defined as [5., 10.] x [0., 1.], samples are 2-dimensional.
let xlimits = arr2(&[[5., 10.], [0., 1.]]);
// We generate five samples using maximin Latin Hypercube sampling.
let samples = Lhs::new(&xlimits).kind(LhsKind::Maximin).with_seed(42, 4242).sample(5).unwrap();
```

*/
#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]
mod design;
mod errors;
mod lhs;
mod optimum;
mod rng;
mod stratified;
mod traits;
mod utils;
mod validate;

pub use design::*;
pub use errors::*;
pub use lhs::*;
pub use optimum::*;
pub use rng::*;
pub use stratified::*;
pub use traits::*;
pub use utils::*;
pub use validate::*;
