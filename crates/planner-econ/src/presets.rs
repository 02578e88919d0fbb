//! Predefined facility configurations shipped with the planner.

use once_cell::sync::Lazy;
use planner_core::{validate_parameters, ParamsPatch, SimulatorParameters, ValidationError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

const EMBEDDED_PRESETS: &str = include_str!("../assets/presets.yaml");

/// A named bundle of parameter overrides.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredefinedScenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub overrides: ParamsPatch,
}

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("invalid preset yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("duplicate preset id: {0}")]
    DuplicateId(String),
    #[error("preset {id} produces invalid parameters: {source}")]
    Invalid {
        id: String,
        #[source]
        source: ValidationError,
    },
}

/// Parse and check a preset list. Each preset must yield valid parameters
/// when applied over the defaults.
pub fn parse_presets(yaml: &str) -> Result<Vec<PredefinedScenario>, PresetError> {
    let presets: Vec<PredefinedScenario> = serde_yaml::from_str(yaml)?;
    let mut seen = BTreeSet::new();
    let defaults = SimulatorParameters::default();
    for p in &presets {
        if !seen.insert(p.id.as_str()) {
            return Err(PresetError::DuplicateId(p.id.clone()));
        }
        validate_parameters(&p.overrides.apply(&defaults)).map_err(|source| {
            PresetError::Invalid {
                id: p.id.clone(),
                source,
            }
        })?;
    }
    Ok(presets)
}

static PRESETS: Lazy<Vec<PredefinedScenario>> = Lazy::new(|| {
    parse_presets(EMBEDDED_PRESETS).unwrap_or_else(|e| {
        tracing::error!(error = %e, "embedded presets failed to load");
        Vec::new()
    })
});

/// All built-in presets.
pub fn predefined_scenarios() -> &'static [PredefinedScenario] {
    &PRESETS
}

/// Look up a preset by id. Unknown ids return `None`.
pub fn find_preset(id: &str) -> Option<&'static PredefinedScenario> {
    PRESETS.iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner_core::{AvTier, OpexModel};

    #[test]
    fn embedded_presets_parse() {
        let presets = parse_presets(EMBEDDED_PRESETS).expect("embedded presets valid");
        assert_eq!(presets.len(), predefined_scenarios().len());
        assert!(presets.len() >= 4);
    }

    #[test]
    fn lookup_by_id() {
        let flagship = find_preset("academic-flagship").expect("flagship preset");
        assert_eq!(flagship.overrides.av_tier, Some(AvTier::Advanced));
        let hi = find_preset("high-throughput").expect("throughput preset");
        assert_eq!(hi.overrides.opex_model, Some(OpexModel::SessionsBased));
        assert!(find_preset("does-not-exist").is_none());
    }

    #[test]
    fn duplicate_ids_rejected() {
        let yaml = r#"
- id: a
  name: A
  description: first
  overrides: {}
- id: a
  name: A again
  description: second
  overrides: {}
"#;
        assert!(matches!(parse_presets(yaml), Err(PresetError::DuplicateId(id)) if id == "a"));
    }

    #[test]
    fn invalid_overrides_rejected() {
        let yaml = r#"
- id: empty
  name: Empty
  description: no rooms
  overrides:
    sim_rooms: 0
"#;
        assert!(matches!(
            parse_presets(yaml),
            Err(PresetError::Invalid { source: ValidationError::NoSimulationRooms, .. })
        ));
    }

    #[test]
    fn unknown_override_field_rejected() {
        let yaml = r#"
- id: odd
  name: Odd
  description: typo
  overrides:
    sim_room: 2
"#;
        assert!(matches!(parse_presets(yaml), Err(PresetError::Parse(_))));
    }
}
