use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::rules::{ActorInfo, Capability};

use super::UnitStance;

pub const WORLD_UNITS_PER_CELL: i32 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u32);

/// Map cell coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CPos {
    pub x: i32,
    pub y: i32,
}

impl CPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Saturates at the `i32` range for cells beyond the addressable world.
    pub fn center_position(self) -> WPos {
        WPos {
            x: cell_center(self.x),
            y: cell_center(self.y),
        }
    }
}

fn cell_center(cell: i32) -> i32 {
    cell.saturating_mul(WORLD_UNITS_PER_CELL)
        .saturating_add(WORLD_UNITS_PER_CELL / 2)
}

/// Position in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WPos {
    pub x: i32,
    pub y: i32,
}

/// Stance state of an actor exposing the AutoTarget capability.
///
/// `stance` is the value the simulation has confirmed. `predicted_stance` is
/// written by the local player ahead of confirmation and may be stale until the
/// matching `SetUnitStance` order is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoTargetState {
    pub stance: UnitStance,
    pub predicted_stance: UnitStance,
}

impl AutoTargetState {
    pub fn new(stance: UnitStance) -> Self {
        Self {
            stance,
            predicted_stance: stance,
        }
    }

    pub fn has_pending_prediction(&self) -> bool {
        self.stance != self.predicted_stance
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub owner: PlayerId,
    pub destroyed: bool,
    pub info: Arc<ActorInfo>,
    pub location: CPos,
    auto_target: Option<AutoTargetState>,
}

impl Actor {
    pub(crate) fn new(id: ActorId, owner: PlayerId, info: Arc<ActorInfo>, location: CPos) -> Self {
        let auto_target = info
            .auto_target
            .map(|auto_target| AutoTargetState::new(auto_target.initial_stance));
        Self {
            id,
            owner,
            destroyed: false,
            info,
            location,
            auto_target,
        }
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.info.has(capability)
    }

    pub fn center_position(&self) -> WPos {
        self.location.center_position()
    }

    pub fn is_live_and_owned_by(&self, player: PlayerId) -> bool {
        !self.destroyed && self.owner == player
    }

    pub fn produces(&self) -> Option<&[String]> {
        self.info
            .production
            .as_ref()
            .map(|production| production.produces.as_slice())
    }

    pub fn auto_target(&self) -> Option<&AutoTargetState> {
        self.auto_target.as_ref()
    }

    pub fn auto_target_mut(&mut self) -> Option<&mut AutoTargetState> {
        self.auto_target.as_mut()
    }
}
