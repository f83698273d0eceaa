use std::io::{self, BufRead};

use command_engine::{
    ActorId, CPos, Camera, CommandContext, CommandDispatcher, Hotkey, HotkeyParseError, KeyInput,
    MessageLog, SelectionMode, SettingsStore, VoiceFeedback, World,
};
use thiserror::Error;
use tracing::{debug, info, warn};

const KEY_USAGE: &str = "down|up <hotkey>";
const SELECT_USAGE: &str = "select|add <actor_id...>";
const ATTACKED_USAGE: &str = "attacked <x> <y>";
const DESTROY_USAGE: &str = "destroy <actor_id>";

/// One line of a hotkey replay script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ReplayCommand {
    Key(KeyInput),
    Select {
        actors: Vec<ActorId>,
        mode: SelectionMode,
    },
    BaseAttacked(CPos),
    Destroy(ActorId),
    Tick,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ReplayParseError {
    #[error(transparent)]
    Hotkey(#[from] HotkeyParseError),
    #[error("invalid {what} '{value}'")]
    InvalidNumber { what: &'static str, value: String },
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// Blank lines and `#` comments yield `Ok(None)`. A bare hotkey such as
/// `Ctrl+KeyS` is a key press.
pub(crate) fn parse_line(line: &str) -> Result<Option<ReplayCommand>, ReplayParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = trimmed.split_whitespace().collect::<Vec<_>>();
    let (head, args) = match tokens.split_first() {
        Some((head, args)) => (*head, args),
        None => return Ok(None),
    };

    let command = match head {
        "tick" => {
            require_no_args(args, "tick")?;
            ReplayCommand::Tick
        }
        "quit" => {
            require_no_args(args, "quit")?;
            ReplayCommand::Quit
        }
        "down" | "up" => {
            let [text] = args else {
                return Err(ReplayParseError::Usage(KEY_USAGE));
            };
            let hotkey = Hotkey::parse(text)?;
            let input = if head == "down" {
                KeyInput::down(hotkey.key)
            } else {
                KeyInput::up(hotkey.key)
            };
            ReplayCommand::Key(input.with_modifiers(hotkey.modifiers))
        }
        "select" | "add" => {
            if head == "add" && args.is_empty() {
                return Err(ReplayParseError::Usage(SELECT_USAGE));
            }
            let actors = args
                .iter()
                .map(|value| parse_actor_id(value))
                .collect::<Result<Vec<_>, _>>()?;
            let mode = if head == "add" {
                SelectionMode::Add
            } else {
                SelectionMode::Replace
            };
            ReplayCommand::Select { actors, mode }
        }
        "attacked" => {
            let [x, y] = args else {
                return Err(ReplayParseError::Usage(ATTACKED_USAGE));
            };
            ReplayCommand::BaseAttacked(CPos::new(parse_cell(x)?, parse_cell(y)?))
        }
        "destroy" => {
            let [id] = args else {
                return Err(ReplayParseError::Usage(DESTROY_USAGE));
            };
            ReplayCommand::Destroy(parse_actor_id(id)?)
        }
        _ => {
            if !args.is_empty() {
                return Err(ReplayParseError::Usage(KEY_USAGE));
            }
            let hotkey = Hotkey::parse(head)?;
            ReplayCommand::Key(KeyInput::down(hotkey.key).with_modifiers(hotkey.modifiers))
        }
    };
    Ok(Some(command))
}

fn require_no_args(args: &[&str], usage: &'static str) -> Result<(), ReplayParseError> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ReplayParseError::Usage(usage))
    }
}

fn parse_actor_id(value: &str) -> Result<ActorId, ReplayParseError> {
    value
        .parse::<u32>()
        .map(ActorId)
        .map_err(|_| ReplayParseError::InvalidNumber {
            what: "actor id",
            value: value.to_string(),
        })
}

fn parse_cell(value: &str) -> Result<i32, ReplayParseError> {
    value
        .parse::<i32>()
        .map_err(|_| ReplayParseError::InvalidNumber {
            what: "cell coordinate",
            value: value.to_string(),
        })
}

/// Headless stand-in for the in-game world view: owns the world and the
/// collaborators the dispatcher drives.
#[derive(Debug)]
pub(crate) struct Session<S> {
    world: World,
    camera: Camera,
    feedback: VoiceFeedback,
    messages: MessageLog,
    dispatcher: CommandDispatcher<S>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ReplaySummary {
    pub(crate) commands: usize,
    pub(crate) keys_consumed: usize,
    pub(crate) invalid_lines: usize,
}

impl<S: SettingsStore> Session<S> {
    pub(crate) fn new(world: World, dispatcher: CommandDispatcher<S>) -> Self {
        Self {
            world,
            camera: Camera::default(),
            feedback: VoiceFeedback::default(),
            messages: MessageLog::default(),
            dispatcher,
        }
    }

    pub(crate) fn world(&self) -> &World {
        &self.world
    }

    pub(crate) fn camera(&self) -> &Camera {
        &self.camera
    }

    pub(crate) fn messages(&self) -> &MessageLog {
        &self.messages
    }

    pub(crate) fn feedback(&self) -> &VoiceFeedback {
        &self.feedback
    }

    pub(crate) fn dispatcher(&self) -> &CommandDispatcher<S> {
        &self.dispatcher
    }

    /// Returns whether the key was consumed; non-key commands report false.
    pub(crate) fn apply(&mut self, command: ReplayCommand) -> bool {
        match command {
            ReplayCommand::Key(input) => {
                let mut ctx = CommandContext::new(
                    &mut self.world,
                    &mut self.camera,
                    &mut self.feedback,
                    &mut self.messages,
                );
                let consumed = self.dispatcher.handle(&input, &mut ctx);
                debug!(key = ?input.key, phase = ?input.phase, consumed, "replay_key");
                return consumed;
            }
            ReplayCommand::Select { actors, mode } => {
                let known = actors
                    .into_iter()
                    .filter(|id| self.world.actor(*id).is_some())
                    .collect::<Vec<_>>();
                self.world.selection_mut().combine(known, mode);
                debug!(selected = self.world.selection().len(), "replay_select");
            }
            ReplayCommand::BaseAttacked(location) => match self.world.local_player_id() {
                Some(player) => self.world.notify_base_attacked(player, location),
                None => warn!("replay_attack_without_local_player"),
            },
            ReplayCommand::Destroy(id) => {
                if !self.world.destroy(id) {
                    warn!(actor = id.0, "replay_destroy_unknown_actor");
                }
            }
            ReplayCommand::Tick => {
                let applied = self.world.apply_pending_orders();
                info!(
                    tick = self.world.current_tick(),
                    applied = applied.len(),
                    "replay_tick"
                );
            }
            ReplayCommand::Quit => {}
        }
        false
    }
}

/// Feeds every line of `reader` through the session until EOF or `quit`.
/// Unparseable lines are logged and skipped.
pub(crate) fn run_session<S, R>(
    session: &mut Session<S>,
    reader: R,
) -> io::Result<ReplaySummary>
where
    S: SettingsStore,
    R: BufRead,
{
    let mut summary = ReplaySummary::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(error) => {
                warn!(line_number = index + 1, error = %error, "replay_line_invalid");
                summary.invalid_lines += 1;
                continue;
            }
        };
        if command == ReplayCommand::Quit {
            break;
        }
        summary.commands += 1;
        if session.apply(command) {
            summary.keys_consumed += 1;
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::Path;

    use command_engine::{
        parse_rules, Actor, KeyPhase, MemorySettingsStore, Modifiers, Settings, UnitStance,
    };

    use super::*;
    use crate::app::scenario::{build_world, demo_scenario};

    fn demo_session() -> Session<MemorySettingsStore> {
        let rules = parse_rules(
            Path::new("assets/rules.xml"),
            include_str!("../../../../assets/rules.xml"),
        )
        .expect("rules");
        let world = build_world(&demo_scenario(), &rules).expect("world");
        Session::new(
            world,
            CommandDispatcher::new(Settings::default(), MemorySettingsStore::default()),
        )
    }

    #[test]
    fn parses_bare_and_prefixed_hotkeys() {
        let ctrl_s = Hotkey::parse("Ctrl+KeyS").expect("hotkey");
        assert_eq!(
            parse_line("Ctrl+KeyS").expect("parse"),
            Some(ReplayCommand::Key(
                KeyInput::down(ctrl_s.key).with_modifiers(ctrl_s.modifiers)
            ))
        );

        let Some(ReplayCommand::Key(input)) = parse_line("  up Tab ").expect("parse") else {
            panic!("expected key command");
        };
        assert_eq!(input.phase, KeyPhase::Up);
        assert_eq!(input.modifiers, Modifiers::NONE);
        assert_eq!(Hotkey::from_key_input(&input).to_string(), "Tab");
    }

    #[test]
    fn parses_world_commands() {
        assert_eq!(parse_line("tick").expect("parse"), Some(ReplayCommand::Tick));
        assert_eq!(parse_line("quit").expect("parse"), Some(ReplayCommand::Quit));
        assert_eq!(
            parse_line("select 3 4").expect("parse"),
            Some(ReplayCommand::Select {
                actors: vec![ActorId(3), ActorId(4)],
                mode: SelectionMode::Replace,
            })
        );
        assert_eq!(
            parse_line("select").expect("parse"),
            Some(ReplayCommand::Select {
                actors: Vec::new(),
                mode: SelectionMode::Replace,
            })
        );
        assert_eq!(
            parse_line("add 7").expect("parse"),
            Some(ReplayCommand::Select {
                actors: vec![ActorId(7)],
                mode: SelectionMode::Add,
            })
        );
        assert_eq!(
            parse_line("attacked -2 9").expect("parse"),
            Some(ReplayCommand::BaseAttacked(CPos::new(-2, 9)))
        );
        assert_eq!(
            parse_line("destroy 5").expect("parse"),
            Some(ReplayCommand::Destroy(ActorId(5)))
        );
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        assert_eq!(parse_line("").expect("parse"), None);
        assert_eq!(parse_line("   ").expect("parse"), None);
        assert_eq!(parse_line("# stance cycle").expect("parse"), None);
    }

    #[test]
    fn rejects_malformed_lines() {
        assert!(matches!(
            parse_line("Hyper+KeyA"),
            Err(ReplayParseError::Hotkey(HotkeyParseError::UnknownModifier(_)))
        ));
        assert_eq!(parse_line("tick 2"), Err(ReplayParseError::Usage("tick")));
        assert_eq!(parse_line("add"), Err(ReplayParseError::Usage(SELECT_USAGE)));
        assert_eq!(parse_line("down"), Err(ReplayParseError::Usage(KEY_USAGE)));
        assert_eq!(
            parse_line("KeyS KeyX"),
            Err(ReplayParseError::Usage(KEY_USAGE))
        );
        assert!(matches!(
            parse_line("select one"),
            Err(ReplayParseError::InvalidNumber {
                what: "actor id",
                ..
            })
        ));
        assert_eq!(
            parse_line("attacked 1"),
            Err(ReplayParseError::Usage(ATTACKED_USAGE))
        );
    }

    #[test]
    fn scripted_session_drives_dispatcher_and_simulation() {
        let mut session = demo_session();
        let script = "\
# infantry and tank start selected
KeyZ
KeyZ
tick
KeyF
Backspace
tick
quit
KeyS
";
        let summary = run_session(&mut session, Cursor::new(script)).expect("replay");
        assert_eq!(
            summary,
            ReplaySummary {
                commands: 6,
                keys_consumed: 4,
                invalid_lines: 0,
            }
        );

        let world = session.world();
        assert_eq!(world.current_tick(), 2);
        assert!(world.pending_orders().is_empty());
        assert_eq!(world.selection().actors(), &[ActorId(0)]);
        assert_eq!(
            session.camera().position,
            CPos::new(10, 10).center_position()
        );
        for id in [ActorId(3), ActorId(4)] {
            let state = world
                .actor(id)
                .and_then(Actor::auto_target)
                .expect("auto target");
            assert_eq!(state.stance, UnitStance::ReturnFire);
            assert!(!state.has_pending_prediction());
        }
        assert_eq!(
            session.messages().last(),
            Some("Unit stance set to: ReturnFire")
        );
        assert_eq!(session.feedback().played().len(), 6);
    }

    #[test]
    fn invalid_and_unbound_lines_do_not_stop_replay() {
        let mut session = demo_session();
        let script = "Hyper+KeyA\nKeyQ\nup KeyS\nComma\n";
        let summary = run_session(&mut session, Cursor::new(script)).expect("replay");
        assert_eq!(summary.invalid_lines, 1);
        assert_eq!(summary.commands, 3);
        assert_eq!(summary.keys_consumed, 1);
        assert!(session.dispatcher().settings().game.always_show_status_bars);
        assert_eq!(session.dispatcher().settings_store().save_count(), 1);
    }

    #[test]
    fn world_commands_update_session_state() {
        let mut session = demo_session();
        assert!(!session.apply(ReplayCommand::Select {
            actors: vec![ActorId(5), ActorId(99)],
            mode: SelectionMode::Replace,
        }));
        assert_eq!(session.world().selection().actors(), &[ActorId(5)]);

        session.apply(ReplayCommand::BaseAttacked(CPos::new(3, 4)));
        let key = Hotkey::parse("Space").expect("hotkey");
        assert!(session.apply(ReplayCommand::Key(KeyInput::down(key.key))));
        assert_eq!(session.camera().position, CPos::new(3, 4).center_position());

        session.apply(ReplayCommand::Destroy(ActorId(5)));
        session.apply(ReplayCommand::Tick);
        assert!(session.world().selection().is_empty());
        assert!(!session.apply(ReplayCommand::Key(
            KeyInput::down(Hotkey::parse("KeyS").expect("hotkey").key)
        )));
    }
}
