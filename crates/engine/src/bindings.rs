use serde::{Deserialize, Serialize};
use winit::keyboard::KeyCode;

use crate::input::Hotkey;

/// Logical hotkey actions, listed in dispatch priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    CycleBase,
    CycleProductionBuildings,
    ToLastEvent,
    ToSelection,
    ToggleStatusBars,
    AttackMove,
    Stop,
    Scatter,
    Deploy,
    StanceCycle,
    Guard,
}

impl HotkeyAction {
    pub const PRIORITY_ORDER: [HotkeyAction; 11] = [
        HotkeyAction::CycleBase,
        HotkeyAction::CycleProductionBuildings,
        HotkeyAction::ToLastEvent,
        HotkeyAction::ToSelection,
        HotkeyAction::ToggleStatusBars,
        HotkeyAction::AttackMove,
        HotkeyAction::Stop,
        HotkeyAction::Scatter,
        HotkeyAction::Deploy,
        HotkeyAction::StanceCycle,
        HotkeyAction::Guard,
    ];

    /// Unit-scoped actions only fire while something is selected.
    pub fn requires_selection(self) -> bool {
        !matches!(
            self,
            HotkeyAction::CycleBase
                | HotkeyAction::CycleProductionBuildings
                | HotkeyAction::ToLastEvent
                | HotkeyAction::ToSelection
                | HotkeyAction::ToggleStatusBars
        )
    }

    pub fn as_token(self) -> &'static str {
        match self {
            HotkeyAction::CycleBase => "cycle_base",
            HotkeyAction::CycleProductionBuildings => "cycle_production_buildings",
            HotkeyAction::ToLastEvent => "to_last_event",
            HotkeyAction::ToSelection => "to_selection",
            HotkeyAction::ToggleStatusBars => "toggle_status_bars",
            HotkeyAction::AttackMove => "attack_move",
            HotkeyAction::Stop => "stop",
            HotkeyAction::Scatter => "scatter",
            HotkeyAction::Deploy => "deploy",
            HotkeyAction::StanceCycle => "stance_cycle",
            HotkeyAction::Guard => "guard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct KeyBindings {
    pub cycle_base_key: Option<Hotkey>,
    pub cycle_production_buildings_key: Option<Hotkey>,
    pub to_last_event_key: Option<Hotkey>,
    pub to_selection_key: Option<Hotkey>,
    pub toggle_status_bars_key: Option<Hotkey>,
    pub attack_move_key: Option<Hotkey>,
    pub stop_key: Option<Hotkey>,
    pub scatter_key: Option<Hotkey>,
    pub deploy_key: Option<Hotkey>,
    pub stance_cycle_key: Option<Hotkey>,
    pub guard_key: Option<Hotkey>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            cycle_base_key: Some(Hotkey::new(KeyCode::Backspace)),
            cycle_production_buildings_key: Some(Hotkey::new(KeyCode::Tab)),
            to_last_event_key: Some(Hotkey::new(KeyCode::Space)),
            to_selection_key: Some(Hotkey::new(KeyCode::Home)),
            toggle_status_bars_key: Some(Hotkey::new(KeyCode::Comma)),
            attack_move_key: Some(Hotkey::new(KeyCode::KeyA)),
            stop_key: Some(Hotkey::new(KeyCode::KeyS)),
            scatter_key: Some(Hotkey::new(KeyCode::KeyX)),
            deploy_key: Some(Hotkey::new(KeyCode::KeyF)),
            stance_cycle_key: Some(Hotkey::new(KeyCode::KeyZ)),
            guard_key: Some(Hotkey::new(KeyCode::KeyD)),
        }
    }
}

impl KeyBindings {
    pub fn unbound() -> Self {
        Self {
            cycle_base_key: None,
            cycle_production_buildings_key: None,
            to_last_event_key: None,
            to_selection_key: None,
            toggle_status_bars_key: None,
            attack_move_key: None,
            stop_key: None,
            scatter_key: None,
            deploy_key: None,
            stance_cycle_key: None,
            guard_key: None,
        }
    }

    pub fn binding(&self, action: HotkeyAction) -> Option<Hotkey> {
        match action {
            HotkeyAction::CycleBase => self.cycle_base_key,
            HotkeyAction::CycleProductionBuildings => self.cycle_production_buildings_key,
            HotkeyAction::ToLastEvent => self.to_last_event_key,
            HotkeyAction::ToSelection => self.to_selection_key,
            HotkeyAction::ToggleStatusBars => self.toggle_status_bars_key,
            HotkeyAction::AttackMove => self.attack_move_key,
            HotkeyAction::Stop => self.stop_key,
            HotkeyAction::Scatter => self.scatter_key,
            HotkeyAction::Deploy => self.deploy_key,
            HotkeyAction::StanceCycle => self.stance_cycle_key,
            HotkeyAction::Guard => self.guard_key,
        }
    }

    pub fn set_binding(&mut self, action: HotkeyAction, hotkey: Option<Hotkey>) {
        let slot = match action {
            HotkeyAction::CycleBase => &mut self.cycle_base_key,
            HotkeyAction::CycleProductionBuildings => &mut self.cycle_production_buildings_key,
            HotkeyAction::ToLastEvent => &mut self.to_last_event_key,
            HotkeyAction::ToSelection => &mut self.to_selection_key,
            HotkeyAction::ToggleStatusBars => &mut self.toggle_status_bars_key,
            HotkeyAction::AttackMove => &mut self.attack_move_key,
            HotkeyAction::Stop => &mut self.stop_key,
            HotkeyAction::Scatter => &mut self.scatter_key,
            HotkeyAction::Deploy => &mut self.deploy_key,
            HotkeyAction::StanceCycle => &mut self.stance_cycle_key,
            HotkeyAction::Guard => &mut self.guard_key,
        };
        *slot = hotkey;
    }

    /// First action in priority order bound to `hotkey`. When two actions share
    /// a chord, the earlier one shadows the later.
    pub fn resolve(&self, hotkey: Hotkey) -> Option<HotkeyAction> {
        HotkeyAction::PRIORITY_ORDER
            .into_iter()
            .find(|action| self.binding(*action) == Some(hotkey))
    }
}
