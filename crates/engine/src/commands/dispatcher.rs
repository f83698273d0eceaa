use tracing::{debug, info, warn};

use crate::bindings::HotkeyAction;
use crate::input::{Hotkey, KeyInput, KeyPhase};
use crate::settings::{Settings, SettingsStore};
use crate::world::PlayerId;

use super::cycle::{base_candidates, cycle_selection, production_candidates};
use super::issuer::{perform_deploy, perform_scatter, perform_stance_cycle, perform_stop};
use super::mode::{perform_attack_move, perform_guard};
use super::view::{to_last_event, to_selection};
use super::CommandContext;

/// Turns key-down events into world commands.
///
/// Global actions (base and production cycling, view jumps, status bar toggle)
/// run regardless of selection. Every other action is ignored, and the key left
/// unconsumed, while nothing is selected. A recognised action always consumes
/// the key even if it ends up doing nothing.
#[derive(Debug)]
pub struct CommandDispatcher<S> {
    settings: Settings,
    settings_store: S,
}

impl<S: SettingsStore> CommandDispatcher<S> {
    pub fn new(settings: Settings, settings_store: S) -> Self {
        Self {
            settings,
            settings_store,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_store(&self) -> &S {
        &self.settings_store
    }

    /// Returns whether the event was consumed.
    pub fn handle(&mut self, input: &KeyInput, ctx: &mut CommandContext<'_>) -> bool {
        if input.phase != KeyPhase::Down {
            return false;
        }
        let Some(player) = ctx.world.local_player_id() else {
            return false;
        };

        let hotkey = Hotkey::from_key_input(input);
        let Some(action) = self.settings.keys.resolve(hotkey) else {
            return false;
        };

        if action.requires_selection() && ctx.world.selection().is_empty() {
            debug!(action = action.as_token(), %hotkey, "hotkey_ignored_empty_selection");
            return false;
        }

        let consumed = self.execute(action, player, ctx);
        info!(action = action.as_token(), %hotkey, consumed, "hotkey_dispatched");
        consumed
    }

    fn execute(
        &mut self,
        action: HotkeyAction,
        player: PlayerId,
        ctx: &mut CommandContext<'_>,
    ) -> bool {
        match action {
            HotkeyAction::CycleBase => {
                let candidates = base_candidates(ctx.world, player);
                cycle_selection(ctx, &candidates)
            }
            HotkeyAction::CycleProductionBuildings => {
                let candidates = production_candidates(ctx.world, player);
                cycle_selection(ctx, &candidates)
            }
            HotkeyAction::ToLastEvent => to_last_event(ctx),
            HotkeyAction::ToSelection => to_selection(ctx),
            HotkeyAction::ToggleStatusBars => self.toggle_status_bars(),
            HotkeyAction::AttackMove => {
                perform_attack_move(ctx, self.settings.game.mouse_button_action())
            }
            HotkeyAction::Stop => perform_stop(ctx),
            HotkeyAction::Scatter => perform_scatter(ctx),
            HotkeyAction::Deploy => perform_deploy(ctx),
            HotkeyAction::StanceCycle => perform_stance_cycle(ctx),
            HotkeyAction::Guard => perform_guard(ctx),
        }
    }

    fn toggle_status_bars(&mut self) -> bool {
        let game = &mut self.settings.game;
        game.always_show_status_bars = !game.always_show_status_bars;
        if let Err(error) = self.settings_store.save(&self.settings) {
            warn!(error = %error, "settings_save_failed");
        }
        info!(
            always_show_status_bars = self.settings.game.always_show_status_bars,
            "status_bars_toggled"
        );
        true
    }
}
