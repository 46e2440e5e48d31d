//! The shipped archetype file.

use pretty_assertions::assert_eq;
use trol_mobb::config::{ConfigError, load_archetypes};

const SHIPPED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/archetypes.json");

#[test]
fn shipped_archetypes_load() {
    let archetypes = load_archetypes(SHIPPED).expect("shipped archetypes are valid");
    assert!(!archetypes.mobb.movement.allow_dash);
    assert_eq!(archetypes.mobb.movement.max_air_jumps, 0);
    assert!(archetypes.mobb.behavior.spear_range <= archetypes.mobb.behavior.sight_range);
}

#[test]
fn missing_file_is_an_io_error() {
    let error = load_archetypes("assets/does-not-exist.json").unwrap_err();
    assert!(matches!(error, ConfigError::Io { .. }));
}
