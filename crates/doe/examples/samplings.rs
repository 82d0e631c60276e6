use lhsbox_doe::{
    design_score, improved_lhs, maximin_lhs, random_ranked_design, Lhs, LhsKind,
    MarsagliaMulticarry, OptimumLhs, Result, SamplingMethod,
};
use ndarray::arr2;

fn main() -> Result<()> {
    env_logger::init();

    let (n, k) = (10, 3);
    println!("Build {n} x {k} Latin hypercube designs\n");

    let mut rng = MarsagliaMulticarry::new(1976, 1968);
    let design = improved_lhs(n, k, 1, &mut rng)?;
    println!("*** improved (criterion {:.4})", design_score(&design));
    println!("{design}");

    let design = maximin_lhs(n, k, 5, &mut rng)?;
    println!("*** maximin (criterion {:.4})", design_score(&design));
    println!("{design}");

    let mut design = random_ranked_design(n, k, &mut rng)?;
    let report = OptimumLhs::new().max_sweeps(5).optimize(&mut design)?;
    println!(
        "*** optimum (criterion {:.4} -> {:.4}, stopped: {:?})",
        report.initial_score, report.final_score, report.stop_reason
    );
    println!("{design}");

    let xlimits = arr2(&[[0., 1.], [-10., 10.], [5., 15.]]);
    println!("Take {n} samples in");
    println!("{xlimits}\n");
    for kind in [LhsKind::Improved, LhsKind::Maximin, LhsKind::Optimum] {
        println!("*** using {kind:?} latin hypercube sampling");
        let samples = Lhs::new(&xlimits).kind(kind).with_seed(42, 4242).sample(n)?;
        println!("{samples}\n");
    }
    Ok(())
}
