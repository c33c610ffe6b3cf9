// tests/unit_config.rs
use std::fs;

use rust_decimal_macros::dec;
use socindex_core::config::{io, CalculationMode, Parameters, CONFIG_FILE};
use socindex_core::SocIndexError;

#[test]
fn test_load_toml() {
    let d = tempfile::tempdir().unwrap();
    let path = d.path().join(CONFIG_FILE);
    fs::write(
        &path,
        "outlink_weight = 0.85\ndecay_koefficient = \"0.95\"\nnum_threads = 2\nmode = \"diagonal\"",
    )
    .unwrap();
    let p = io::load(&path).unwrap();
    assert_eq!(p.outlink_weight, dec!(0.85));
    assert_eq!(p.decay_koefficient, dec!(0.95));
    assert_eq!(p.num_threads, 2);
    assert_eq!(p.mode, CalculationMode::Diagonal);
}

#[test]
fn test_defaults() {
    let p = Parameters::default();
    assert_eq!(p.outlink_weight, dec!(0.7));
    assert_eq!(p.rank_calculation_precision, dec!(0.01));
    assert_eq!(p.decay_period, 86_400);
    assert_eq!(p.decay_koefficient, dec!(0.9));
    assert_eq!(p.num_threads, 1);
    assert_eq!(p.mode, CalculationMode::Plain);
    assert!(p.validate().is_ok());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let d = tempfile::tempdir().unwrap();
    let p = io::load_or_default(&d.path().join(CONFIG_FILE)).unwrap();
    assert_eq!(p, Parameters::default());
}

#[test]
fn test_out_of_range_values_are_rejected() {
    for text in [
        "outlink_weight = 1.5",
        "rank_calculation_precision = 0",
        "decay_period = 0",
        "num_threads = 0",
        "stack_contribution = 0.6\nweight_contribution = 0.6",
        "discretization_threshold = -1",
        "initial_capacity = 0",
    ] {
        let err = io::parse_toml(text);
        assert!(matches!(err, Err(SocIndexError::Validation(_))), "accepted: {text}");
    }
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let err = io::parse_toml("outlink_weight = = 1");
    assert!(matches!(err, Err(SocIndexError::Config(_))));
}

#[test]
fn test_missing_explicit_file_is_io_error() {
    let d = tempfile::tempdir().unwrap();
    let err = io::load(&d.path().join("nope.toml"));
    assert!(matches!(err, Err(SocIndexError::Io { .. })));
}
