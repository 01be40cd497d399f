//! Unit tests for configuration and report serialization.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use lineage::config::{CorpusSection, LineageConfig};
use lineage::report::{ChainReport, EdgeJson, GraphReport, ResolutionReport};
use lineage_core::{
    Explorer, LineageError, ProfileId, ProfileRecord, ResolverPolicy, SettingPolicy,
};
use serde_json::json;

fn explorer() -> Explorer {
    let records = vec![
        ProfileRecord::from_value(json!({"name": "PLA"}), "a/filament/PLA.json").unwrap(),
        ProfileRecord::from_value(json!({"name": "PLA"}), "b/filament/PLA.json").unwrap(),
        ProfileRecord::from_value(
            json!({"name": "Mine", "inherits": "Ghost"}),
            "user/Mine.json",
        )
        .unwrap(),
    ];
    Explorer::from_records(
        records,
        None,
        ResolverPolicy::default(),
        SettingPolicy::default(),
    )
    .0
}

// =============================================================================
// CONFIGURATION TESTS
// =============================================================================

#[test]
fn test_empty_config_is_default() {
    let config = LineageConfig::parse("").unwrap();
    assert_eq!(config, LineageConfig::default());
    assert_eq!(config.corpus.roots, vec!["system", "user"]);
    assert_eq!(config.resolver.trusted_library, "system/OrcaFilamentLibrary");
    assert_eq!(config.settings.placeholder, "-");
}

#[test]
fn test_full_config() {
    let config = LineageConfig::parse(
        r#"
[corpus]
roots = ["system"]

[resolver]
trusted_library = "system/MyLibrary"

[settings]
script_key_markers = ["gcode", "script"]
script_keys = ["notes"]
placeholder = "n/a"
"#,
    )
    .unwrap();

    assert_eq!(
        config.corpus,
        CorpusSection {
            roots: vec!["system".to_string()]
        }
    );
    assert_eq!(config.resolver.trusted_library, "system/MyLibrary");
    assert!(config.settings.is_script_key("post_script"));
    assert!(config.settings.is_script_key("NOTES"));
    assert!(!config.settings.is_meaningful(&json!("n/a")));
}

#[test]
fn test_partial_section_keeps_other_defaults() {
    let config = LineageConfig::parse("[settings]\nplaceholder = \"none\"\n").unwrap();
    assert_eq!(config.settings.placeholder, "none");
    assert_eq!(config.settings.script_keys, vec!["filament_notes"]);
    assert_eq!(config.corpus, CorpusSection::default());
}

#[test]
fn test_unknown_keys_are_rejected() {
    for content in ["[corpus]\nroot = []\n", "[extra]\nx = 1\n", "[resolver]\ntrusted = \"x\"\n"] {
        let result = LineageConfig::parse(content);
        assert!(matches!(result, Err(LineageError::ConfigError(_))), "{content}");
    }
}

#[test]
fn test_explicit_missing_config_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let result = LineageConfig::load(Some(&dir.path().join("missing.toml")));
    assert!(matches!(result, Err(LineageError::IoError(_))));
}

#[test]
fn test_config_file_is_read() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("lineage.toml");
    std::fs::write(&path, "[corpus]\nroots = []\n").unwrap();

    let config = LineageConfig::load(Some(&path)).unwrap();
    assert!(config.corpus.roots.is_empty());
}

// =============================================================================
// REPORT TESTS
// =============================================================================

#[test]
fn test_resolution_report_serialization() {
    let explorer = explorer();
    let resolution = explorer.resolve("PLA", Some("b/filament/Other.json"));
    let report = ResolutionReport::new("PLA", Some("b/filament/Other.json"), resolution.as_ref());

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["found"], json!(true));
    assert_eq!(value["candidates"], json!(2));
    assert_eq!(value["rule"], json!({"rule": "same_directory"}));
    assert_eq!(value["profile"]["store_key"], json!("PLA [b/filament]"));
    assert_eq!(value["profile"]["category"], json!("filament"));
}

#[test]
fn test_missing_resolution_report() {
    let report = ResolutionReport::new("Ghost", None, None);
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["found"], json!(false));
    assert_eq!(value["profile"], json!(null));
    assert_eq!(value["candidates"], json!(0));
}

#[test]
fn test_chain_report_carries_termination() {
    let explorer = explorer();
    let chain = explorer.chain("Mine");
    let report = ChainReport::new("Mine", &chain);

    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["links"].as_array().map(Vec::len), Some(1));
    assert_eq!(
        value["termination"],
        json!({"reason": "dangling_parent", "detail": "Ghost"})
    );

    let back: ChainReport = serde_json::from_value(value).unwrap();
    assert_eq!(back, report);
}

#[test]
fn test_graph_report_deserialization() {
    let json = r#"{"nodes": [], "edges": [{"parent": 0, "child": 3}]}"#;
    let report: GraphReport = serde_json::from_str(json).unwrap();
    assert_eq!(
        report.edges,
        vec![EdgeJson {
            parent: ProfileId(0),
            child: ProfileId(3)
        }]
    );
}

#[test]
fn test_metrics_serialization() {
    let metrics = explorer().metrics();
    let value = serde_json::to_value(&metrics).unwrap();
    assert_eq!(value["per_category"], json!({"filament": 3}));
    assert_eq!(value["dangling_parents"], json!(1));
    assert_eq!(value["duplicated_names"], json!(1));
}
