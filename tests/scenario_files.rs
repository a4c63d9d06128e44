//! Bundled scenario files parse, validate and run

use std::path::PathBuf;

use flood_adapt::core::config::{EconomicState, FloodMapChoice, InfluenceMode, NetworkKind, OrganisationStructure};
use flood_adapt::{run, FloodError, ModelConfig};

fn scenario(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data/scenarios")
        .join(name)
}

#[test]
fn test_basecase_matches_defaults() {
    let config = ModelConfig::load(&scenario("basecase.toml")).unwrap();
    let defaults = ModelConfig::new();

    assert_eq!(config.seed, defaults.seed);
    assert_eq!(config.households.count, defaults.households.count);
    assert_eq!(config.network.kind, NetworkKind::WattsStrogatz);
    assert_eq!(config.flood.map, FloodMapChoice::Harvey);
    assert_eq!(config.measures.elevation, defaults.measures.elevation);
    assert_eq!(config.government.options, defaults.government.options);
}

#[test]
fn test_partial_scenario_fills_defaults() {
    let config = ModelConfig::load(&scenario("decentralised_recession.toml")).unwrap();

    assert_eq!(config.network.kind, NetworkKind::BarabasiAlbert);
    assert_eq!(config.flood.map, FloodMapChoice::Year100);
    assert_eq!(config.motivation.influence_mode, InfluenceMode::Sequential);
    assert_eq!(config.economy.state, EconomicState::Recession);
    assert_eq!(config.government.structure, OrganisationStructure::Decentralised);
    assert_eq!(config.households.count, 100);
    assert_eq!(config.flood.warmup_steps, 5);
}

#[test]
fn test_scenarios_run() {
    for name in ["basecase.toml", "decentralised_recession.toml"] {
        let config = ModelConfig::load(&scenario(name)).unwrap();
        let output = run(config, 20).unwrap();
        assert_eq!(output.metrics.len(), 20, "{}", name);
    }
}

#[test]
fn test_unknown_network_is_fatal() {
    let err = ModelConfig::from_toml_str("[network]\nkind = \"small_world\"\n").unwrap_err();
    assert!(matches!(err, FloodError::ConfigParse(_)));

    let err = "small_world".parse::<NetworkKind>().unwrap_err();
    assert!(matches!(err, FloodError::UnknownNetwork(_)));
    assert!(err.to_string().contains("watts_strogatz"));
}

#[test]
fn test_unknown_flood_map_is_fatal() {
    let err = "1000yr".parse::<FloodMapChoice>().unwrap_err();
    assert!(matches!(err, FloodError::UnknownFloodMap(_)));
    assert!(ModelConfig::from_toml_str("[flood]\nmap = \"1000yr\"\n").is_err());
}

#[test]
fn test_missing_scenario_file() {
    let err = ModelConfig::load(&scenario("does_not_exist.toml")).unwrap_err();
    assert!(matches!(err, FloodError::IoError(_)));
}
