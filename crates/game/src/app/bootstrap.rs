use command_engine::{
    load_rules_file, resolve_app_paths, CommandDispatcher, JsonSettingsFile, SettingsStore,
    StartupError,
};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use super::replay::Session;
use super::scenario::{build_world, demo_scenario, load_scenario_file, ScenarioError};

pub(crate) struct AppWiring {
    pub(crate) session: Session<JsonSettingsFile>,
}

#[derive(Debug, Error)]
pub(crate) enum BootstrapError {
    #[error(transparent)]
    Startup(#[from] StartupError),
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

pub(crate) fn build_app() -> Result<AppWiring, BootstrapError> {
    init_tracing();
    info!("=== Skirmish Startup ===");

    let paths = resolve_app_paths()?;
    info!(root = %paths.root.display(), "project_root_resolved");

    let settings_store = JsonSettingsFile::new(&paths.settings_path);
    let settings = settings_store.load().map_err(StartupError::from)?;
    let rules = load_rules_file(&paths.rules_path).map_err(StartupError::from)?;
    info!(
        path = %paths.rules_path.display(),
        actors = rules.len(),
        "rules_loaded"
    );

    let scenario_path = paths.root.join("assets").join("scenario.json");
    let scenario = match load_scenario_file(&scenario_path)? {
        Some(scenario) => {
            info!(path = %scenario_path.display(), "scenario_loaded");
            scenario
        }
        None => {
            info!("scenario_using_demo");
            demo_scenario()
        }
    };
    let world = build_world(&scenario, &rules)?;

    Ok(AppWiring {
        session: Session::new(world, CommandDispatcher::new(settings, settings_store)),
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}
