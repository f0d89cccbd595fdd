//! Configured contexts

use std::io::Write;

use pcore::util::config::{PcoreConfig, RUNTIME_NAME_AUTHORITY};
use pcore::util::logger::{self, LogLevel};
use pcore::Pcore;

#[test]
fn test_context_from_config_file() {
    logger::try_init_for_tests();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "name_authority": "http://example.com/types", "log_level": "debug" }}"#
    )
    .unwrap();
    let config = PcoreConfig::load(file.path()).unwrap();
    assert_eq!(config.log_level(), LogLevel::Debug);
    assert!(config.case_insensitive_lookup);

    let pcore = Pcore::with_config(config).unwrap();
    assert_eq!(pcore.root_loader().name_authority(), "http://example.com/types");
    assert!(pcore.load_type("Integer").is_some());
    let t = pcore.resolve_type("type Port = Integer[1, 65535]").unwrap();
    assert!(pcore.load_type("Port").unwrap().ptr_eq(&t));
}

#[test]
fn test_malformed_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{{ not json").unwrap();
    let err = PcoreConfig::load(file.path()).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config file"));
}

#[test]
fn test_default_context_authority() {
    let pcore = Pcore::new().unwrap();
    assert_eq!(pcore.config().name_authority, RUNTIME_NAME_AUTHORITY);
    assert_eq!(pcore.root_loader().name_authority(), RUNTIME_NAME_AUTHORITY);
}
