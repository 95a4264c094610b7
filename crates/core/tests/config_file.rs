use optlens_core::{Config, Dataset, Error};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn config_file_overrides_and_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "data": {{"data_dir": "/srv/snapshots/today", "cache": false}},
            "normalizer": {{"placeholder_tokens": ["unch", "N/A", "", "--"]}},
            "metrics": {{"highlight_quantile": 0.9}}
        }}"#
    )
    .unwrap();

    let config = Config::from_json_file(file.path()).unwrap();
    assert_eq!(
        config.data.path(Dataset::Flow),
        PathBuf::from("/srv/snapshots/today/Inusual.csv")
    );
    assert!(!config.data.cache);
    assert_eq!(config.normalizer.placeholder_tokens.len(), 4);
    assert_eq!(config.normalizer.ambiguous_threshold, 5.0);
    assert_eq!(config.metrics.highlight_quantile, 0.9);
    assert_eq!(config.metrics.contract_multiplier, 100.0);
}

#[test]
fn invalid_json_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    assert!(matches!(Config::from_json_file(file.path()), Err(Error::Json(_))));
}
