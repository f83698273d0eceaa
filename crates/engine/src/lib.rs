use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub mod bindings;
pub mod commands;
pub mod feedback;
pub mod input;
pub mod order_generator;
pub mod rules;
pub mod settings;
pub mod viewport;
pub mod world;

pub use bindings::{HotkeyAction, KeyBindings};
pub use commands::{
    base_candidates, cycle_to, enter_mode, issue_for_selection, production_candidates,
    CommandContext, CommandDispatcher, MessageLog, MessageSink, DEPLOY_ORDER_SEQUENCE,
};
pub use feedback::{NullFeedback, OrderFeedback, VoiceFeedback};
pub use input::{Hotkey, HotkeyParseError, KeyInput, KeyPhase, Modifiers};
pub use order_generator::{GenericSelectTarget, GuardOrderGenerator, OrderGenerator};
pub use rules::{
    load_rules_file, parse_rules, ActorInfo, AutoTargetInfo, Capability, ProductionInfo,
    RulesDatabase, RulesError, RulesErrorCode, SourceLocation,
};
pub use settings::{
    GameSettings, JsonSettingsFile, MemorySettingsStore, Settings, SettingsError, SettingsStore,
};
pub use viewport::{center_on_actors, Camera, Viewport};
pub use world::{
    Actor, ActorId, AttackEvent, AutoTargetState, CPos, Order, Player, PlayerId, Selection,
    SelectionMode, UnitStance, WPos, World,
};

pub const ROOT_ENV_VAR: &str = "SKIRMISH_ROOT";

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub root: PathBuf,
    pub settings_path: PathBuf,
    pub rules_path: PathBuf,
}

impl AppPaths {
    pub fn from_root(root: PathBuf) -> Self {
        let settings_path = root.join("settings.json");
        let rules_path = root.join("assets").join("rules.xml");
        Self {
            root,
            settings_path,
            rules_path,
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to read environment variable {var}: {source}")]
    EnvVar {
        var: &'static str,
        #[source]
        source: env::VarError,
    },
    #[error("failed to resolve current executable path: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("current executable path has no parent directory: {0}")]
    ExeHasNoParent(PathBuf),
    #[error(
        "SKIRMISH_ROOT is set but does not point to a valid project root: {path}\n\
A valid root must contain Cargo.toml and either crates/ or assets/."
    )]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "Could not detect project root by walking upward from executable directory: {start_dir}\n\
Expected a directory containing Cargo.toml and either crates/ or assets/.\n\
Set {env_var} explicitly, for example:\n\
PowerShell: $env:{env_var}=\"C:\\path\\to\\skirmish\"\n\
Bash/zsh: export {env_var}=\"/path/to/skirmish\""
    )]
    RootNotFound {
        start_dir: PathBuf,
        env_var: &'static str,
    },
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Rules(#[from] RulesError),
}

pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    resolve_root().map(AppPaths::from_root)
}

fn resolve_root() -> Result<PathBuf, StartupError> {
    match env::var(ROOT_ENV_VAR) {
        Ok(value) => {
            let raw = PathBuf::from(value);
            let normalized = normalize_path(&raw);
            if is_repo_marker(&normalized) {
                Ok(normalized)
            } else {
                Err(StartupError::InvalidEnvRoot { path: normalized })
            }
        }
        Err(env::VarError::NotPresent) => {
            let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
            let exe_dir = exe
                .parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| StartupError::ExeHasNoParent(exe.clone()))?;

            for candidate in exe_dir.ancestors() {
                if is_repo_marker(candidate) {
                    return Ok(normalize_path(candidate));
                }
            }

            Err(StartupError::RootNotFound {
                start_dir: normalize_path(&exe_dir),
                env_var: ROOT_ENV_VAR,
            })
        }
        Err(source) => Err(StartupError::EnvVar {
            var: ROOT_ENV_VAR,
            source,
        }),
    }
}

fn is_repo_marker(path: &Path) -> bool {
    let cargo_toml = path.join("Cargo.toml").is_file();
    let has_crates = path.join("crates").is_dir();
    let has_assets = path.join("assets").is_dir();

    cargo_toml && (has_crates || has_assets)
}

fn normalize_path(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_marker_requires_cargo_toml() {
        let cwd = env::current_dir().expect("cwd");
        assert!(!is_repo_marker(&cwd.join("definitely_not_a_marker")));
    }

    #[test]
    fn repo_marker_accepts_cargo_toml_with_assets() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("Cargo.toml"), "[workspace]\n").expect("write");
        assert!(!is_repo_marker(dir.path()));
        fs::create_dir(dir.path().join("assets")).expect("assets");
        assert!(is_repo_marker(dir.path()));
    }

    #[test]
    fn paths_hang_off_the_root() {
        let paths = AppPaths::from_root(PathBuf::from("root"));
        assert_eq!(paths.settings_path, Path::new("root").join("settings.json"));
        assert_eq!(
            paths.rules_path,
            Path::new("root").join("assets").join("rules.xml")
        );
    }
}
