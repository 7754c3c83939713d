use rand::{rngs::SmallRng, SeedableRng};

use crate::{
    prelude::{Apriori, Config, Error, RandomSky, Round, Termination},
    tests::{fixed_sky, ideal_config, init_logger, reference_rx, SPREAD_SKY, ZENITH_AND_HORIZON},
};

#[test]
fn zenith_and_horizon() {
    init_logger();

    let cfg = ideal_config(4);
    let mut sky = fixed_sky(&ZENITH_AND_HORIZON);
    let mut rng = SmallRng::seed_from_u64(0);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();
    assert_eq!(round.observations().len(), 4);
    assert!(round.outlier_ids().is_empty());

    let solution = round.estimate().unwrap().clone();

    assert!(solution.converged, "{}", solution);
    assert_eq!(solution.termination, Termination::Converged);
    assert!(solution.iterations <= 10);
    assert_eq!(solution.dimension(), 3);

    let error = round.position_error_m().unwrap();
    assert!(error < 1.0E-3, "position error {}m", error);

    for obs in round.observations() {
        let residual = obs.residual_m.unwrap();
        assert!(residual.abs() < 1.0E-6, "sv={} residual={}", obs.id, residual);
    }
}

#[test]
fn single_satellite() {
    init_logger();

    let cfg = ideal_config(1);
    let mut sky = fixed_sky(&ZENITH_AND_HORIZON);
    let mut rng = SmallRng::seed_from_u64(0);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();
    assert_eq!(round.observations().len(), 1);

    assert_eq!(
        round.estimate(),
        Err(Error::InsufficientObservations {
            required: 4,
            provided: 1,
        })
    );

    assert!(round.solution().is_none());
    assert!(round.observations()[0].residual_m.is_none());
}

#[test]
fn outliers_everywhere() {
    init_logger();

    let cfg = Config::default()
        .with_satellite_count(12)
        .with_outlier_probability(1.0)
        .with_bias_range(10.0, 20.0);

    let mut sky = RandomSky::new(SmallRng::seed_from_u64(10));
    let mut rng = SmallRng::seed_from_u64(11);

    let round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();

    assert_eq!(round.observations().len(), 12);
    assert_eq!(round.outlier_ids().len(), 12);

    for obs in round.observations() {
        assert!(obs.is_outlier());
        assert!(round.outlier_ids().contains(&obs.id));
        assert!(
            (10.0..20.0).contains(&obs.bias_m()),
            "sv={} bias={}",
            obs.id,
            obs.bias_m()
        );
    }
}

#[test]
fn no_outliers_perfect_apriori() {
    init_logger();

    let cfg = ideal_config(8).with_apriori(Apriori::from_ecef_m(reference_rx()));
    let mut sky = fixed_sky(&SPREAD_SKY);
    let mut rng = SmallRng::seed_from_u64(0);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();

    for obs in round.observations() {
        assert!(!obs.is_outlier());
        assert_eq!(obs.bias_m(), 0.0);
    }

    let solution = round.estimate().unwrap();
    assert!(solution.converged);
    assert_eq!(solution.iterations, 1);

    for residual in round.residuals().unwrap() {
        assert!(residual.abs() < 1.0E-6, "residual={}", residual);
    }

    let summary = round.summary().unwrap().unwrap();
    assert!(summary.rms_m < 1.0E-6);
}

#[test]
fn estimation_is_repeatable() {
    init_logger();

    let cfg = Config::default().with_satellite_count(10);
    let mut sky = RandomSky::new(SmallRng::seed_from_u64(3));
    let mut rng = SmallRng::seed_from_u64(4);

    let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();

    let first = round.estimate().unwrap().clone();
    let first_obs = round.observations().to_vec();

    let second = round.estimate().unwrap().clone();

    assert_eq!(first, second);
    assert_eq!(first_obs, round.observations());
}

#[test]
fn seeded_rounds_are_reproducible() {
    let cfg = Config::default().with_satellite_count(15).with_outlier_probability(0.2);

    let build = || {
        let mut sky = RandomSky::new(SmallRng::seed_from_u64(100));
        let mut rng = SmallRng::seed_from_u64(200);
        let mut round = Round::simulate(&cfg, &mut sky, &mut rng).unwrap();
        round.estimate().unwrap();
        round
    };

    assert_eq!(build(), build());
}
