use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use command_engine::{ActorId, CPos, PlayerId, RulesDatabase, SelectionMode, World};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Starting layout of a skirmish: players, placed actors and the initial
/// local selection (indices into `actors`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScenarioDef {
    pub(crate) players: Vec<String>,
    pub(crate) local_player: Option<String>,
    pub(crate) actors: Vec<ActorPlacement>,
    #[serde(default)]
    pub(crate) selected: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ActorPlacement {
    pub(crate) actor: String,
    pub(crate) owner: String,
    pub(crate) x: i32,
    pub(crate) y: i32,
}

impl ActorPlacement {
    fn new(actor: &str, owner: &str, x: i32, y: i32) -> Self {
        Self {
            actor: actor.to_string(),
            owner: owner.to_string(),
            x,
            y,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("failed to read scenario file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid scenario in {path} at '{field}': {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("scenario places unknown actor '{0}'")]
    UnknownActor(String),
    #[error("scenario references unknown player '{0}'")]
    UnknownPlayer(String),
    #[error("scenario selects actor index {index} but only {count} actors are placed")]
    SelectionOutOfRange { index: usize, count: usize },
}

/// `Ok(None)` when the file does not exist.
pub(crate) fn load_scenario_file(path: &Path) -> Result<Option<ScenarioDef>, ScenarioError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "scenario_missing");
            return Ok(None);
        }
        Err(source) => {
            return Err(ScenarioError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut deserializer = serde_json::Deserializer::from_str(&raw);
    serde_path_to_error::deserialize(&mut deserializer)
        .map(Some)
        .map_err(|error| ScenarioError::Parse {
            path: path.to_path_buf(),
            field: error.path().to_string(),
            source: error.into_inner(),
        })
}

/// Built-in layout used when no scenario file is present.
pub(crate) fn demo_scenario() -> ScenarioDef {
    ScenarioDef {
        players: vec!["Multi0".to_string(), "Multi1".to_string()],
        local_player: Some("Multi0".to_string()),
        actors: vec![
            ActorPlacement::new("fact", "Multi0", 10, 10),
            ActorPlacement::new("weap", "Multi0", 14, 10),
            ActorPlacement::new("barr", "Multi0", 10, 14),
            ActorPlacement::new("e1", "Multi0", 16, 16),
            ActorPlacement::new("1tnk", "Multi0", 18, 17),
            ActorPlacement::new("harv", "Multi0", 20, 12),
            ActorPlacement::new("fact", "Multi1", 60, 60),
        ],
        selected: vec![3, 4],
    }
}

pub(crate) fn build_world(
    scenario: &ScenarioDef,
    rules: &RulesDatabase,
) -> Result<World, ScenarioError> {
    let mut world = World::default();
    let players = scenario
        .players
        .iter()
        .map(|name| (name.as_str(), world.add_player(name.as_str())))
        .collect::<Vec<_>>();
    let player_named = |name: &str| -> Result<PlayerId, ScenarioError> {
        players
            .iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|(_, id)| *id)
            .ok_or_else(|| ScenarioError::UnknownPlayer(name.to_string()))
    };

    let local = scenario
        .local_player
        .as_deref()
        .map(&player_named)
        .transpose()?;
    world.set_local_player(local);

    let mut spawned = Vec::<ActorId>::with_capacity(scenario.actors.len());
    for placement in &scenario.actors {
        let info = rules
            .actor(&placement.actor)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownActor(placement.actor.clone()))?;
        let owner = player_named(&placement.owner)?;
        spawned.push(world.spawn(info, owner, CPos::new(placement.x, placement.y)));
    }

    let selected = scenario
        .selected
        .iter()
        .map(|index| {
            spawned
                .get(*index)
                .copied()
                .ok_or(ScenarioError::SelectionOutOfRange {
                    index: *index,
                    count: spawned.len(),
                })
        })
        .collect::<Result<Vec<_>, _>>()?;
    world
        .selection_mut()
        .combine(selected, SelectionMode::Replace);

    info!(
        players = scenario.players.len(),
        actors = spawned.len(),
        selected = world.selection().len(),
        "scenario_built"
    );
    Ok(world)
}

#[cfg(test)]
mod tests {
    use command_engine::{parse_rules, Capability};

    use super::*;

    const BUNDLED_RULES: &str = include_str!("../../../../assets/rules.xml");
    const BUNDLED_SCENARIO: &str = include_str!("../../../../assets/scenario.json");

    fn bundled_rules() -> RulesDatabase {
        parse_rules(Path::new("assets/rules.xml"), BUNDLED_RULES).expect("bundled rules")
    }

    #[test]
    fn demo_scenario_builds_against_bundled_rules() {
        let world = build_world(&demo_scenario(), &bundled_rules()).expect("world");
        let local = world.local_player_id().expect("local player");
        assert_eq!(world.actors().len(), 7);
        assert_eq!(world.selection().len(), 2);
        assert_eq!(
            world
                .actors_with(Capability::BaseBuilding)
                .filter(|actor| actor.owner == local)
                .count(),
            1
        );
    }

    #[test]
    fn bundled_scenario_file_parses_and_builds() {
        let scenario: ScenarioDef = serde_json::from_str(BUNDLED_SCENARIO).expect("scenario");
        let world = build_world(&scenario, &bundled_rules()).expect("world");
        assert_eq!(world.selection().len(), 3);
        assert_eq!(world.players().len(), 2);
    }

    #[test]
    fn missing_scenario_file_is_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = load_scenario_file(&dir.path().join("scenario.json")).expect("load");
        assert!(loaded.is_none());
    }

    #[test]
    fn malformed_scenario_reports_field_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("scenario.json");
        fs::write(
            &path,
            r#"{"players":["a"],"local_player":"a","actors":[{"actor":"e1","owner":"a","x":"far","y":0}]}"#,
        )
        .expect("write");
        match load_scenario_file(&path).expect_err("parse error") {
            ScenarioError::Parse { field, .. } => assert_eq!(field, "actors[0].x"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_references_are_rejected() {
        let rules = bundled_rules();
        let mut scenario = demo_scenario();
        scenario.actors[0].actor = "nope".to_string();
        assert!(matches!(
            build_world(&scenario, &rules),
            Err(ScenarioError::UnknownActor(name)) if name == "nope"
        ));

        let mut scenario = demo_scenario();
        scenario.local_player = Some("Nobody".to_string());
        assert!(matches!(
            build_world(&scenario, &rules),
            Err(ScenarioError::UnknownPlayer(_))
        ));

        let mut scenario = demo_scenario();
        scenario.selected = vec![99];
        assert!(matches!(
            build_world(&scenario, &rules),
            Err(ScenarioError::SelectionOutOfRange { index: 99, .. })
        ));
    }

    #[test]
    fn spectator_scenario_has_no_local_player() {
        let mut scenario = demo_scenario();
        scenario.local_player = None;
        let world = build_world(&scenario, &bundled_rules()).expect("world");
        assert!(world.local_player_id().is_none());
    }
}
