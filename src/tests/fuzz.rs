use log::info;
use rand::{rngs::SmallRng, SeedableRng};
use rstest::*;

use crate::{
    prelude::{Config, Difficulty, RandomSky, Round, Termination},
    tests::init_logger,
};

#[fixture]
fn base_config() -> Config {
    Config::default()
}

#[rstest]
#[case(Difficulty::Easy, 1)]
#[case(Difficulty::Easy, 2)]
#[case(Difficulty::Medium, 3)]
#[case(Difficulty::Medium, 4)]
#[case(Difficulty::Hard, 5)]
#[case(Difficulty::Hard, 6)]
fn random_rounds(#[case] difficulty: Difficulty, #[case] seed: u64) {
    init_logger();

    let cfg = Config::preset(difficulty).with_bias_range(10.0, 60.0);
    let satellite_count = difficulty.satellite_count();

    let mut sky = RandomSky::new(SmallRng::seed_from_u64(seed));
    let mut rng = SmallRng::seed_from_u64(seed + 1000);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();

    assert_eq!(round.observations().len(), satellite_count);

    for obs in round.observations() {
        assert_eq!(obs.is_outlier(), round.outlier_ids().contains(&obs.id));
        if obs.is_outlier() {
            assert!((10.0..60.0).contains(&obs.bias_m()));
        } else {
            assert_eq!(obs.bias_m(), 0.0);
        }
    }

    let solution = round.estimate().unwrap().clone();

    info!(
        "seed={} outliers={:?} {}",
        seed,
        round.outlier_ids(),
        solution
    );

    assert!(solution.iterations <= cfg.solver.max_iterations);
    assert_ne!(solution.termination, Termination::SingularMatrix);
    assert_eq!(solution.weights.len(), satellite_count);
    assert!(solution.position_m.iter().all(|x| x.is_finite()));

    let error = round.position_error_m().unwrap();
    assert!(error < 100.0, "position error {}m", error);

    // residuals are measurement - modeled range, at the estimate
    for obs in round.observations() {
        let residual = obs.residual_m.unwrap();
        let expected = obs.pseudo_range_m - solution.modeled_range_m(&obs.position_m);
        assert_eq!(residual, expected);
    }
}

#[rstest]
#[case(1)]
#[case(2)]
#[case(3)]
fn random_rounds_with_clock_bias(base_config: Config, #[case] seed: u64) {
    init_logger();

    let cfg = base_config
        .with_satellite_count(12)
        .with_outlier_probability(0.0)
        .with_clock_bias(5.0);

    let mut sky = RandomSky::new(SmallRng::seed_from_u64(seed));
    let mut rng = SmallRng::seed_from_u64(seed + 1000);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();
    let solution = round.estimate().unwrap().clone();

    assert_eq!(solution.dimension(), 4);
    assert!(solution.clock_bias_m.unwrap().is_finite());
    assert_eq!(solution.weights.len(), 12);

    let error = round.position_error_m().unwrap();
    assert!(error < 100.0, "position error {}m", error);
}
