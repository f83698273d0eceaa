use serde::{Deserialize, Serialize};

use super::{ActorId, CPos, UnitStance};

pub const ORDER_STOP: &str = "Stop";
pub const ORDER_SCATTER: &str = "Scatter";
pub const ORDER_RETURN_TO_BASE: &str = "ReturnToBase";
pub const ORDER_DEPLOY_TRANSFORM: &str = "DeployTransform";
pub const ORDER_UNLOAD: &str = "Unload";
pub const ORDER_DETONATE: &str = "Detonate";
pub const ORDER_SET_UNIT_STANCE: &str = "SetUnitStance";
pub const ORDER_ATTACK_MOVE: &str = "AttackMove";
pub const ORDER_GUARD: &str = "Guard";

/// Intent record handed to the world's order queue. Whether it applies to its
/// subject is decided when the simulation processes the queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub command: String,
    pub subject: ActorId,
    pub queued: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_location: Option<CPos>,
}

impl Order {
    pub fn new(command: impl Into<String>, subject: ActorId, queued: bool) -> Self {
        Self {
            command: command.into(),
            subject,
            queued,
            target_location: None,
        }
    }

    pub fn with_target_location(mut self, location: CPos) -> Self {
        self.target_location = Some(location);
        self
    }

    /// `SetUnitStance` carries the stance index in `target_location.x` so the
    /// wire shape stays `{command, subject, queued, targetLocation}`.
    pub fn set_unit_stance(subject: ActorId, stance: UnitStance) -> Self {
        Self::new(ORDER_SET_UNIT_STANCE, subject, false)
            .with_target_location(CPos::new(stance.index() as i32, 0))
    }

    pub fn stance(&self) -> Option<UnitStance> {
        if self.command != ORDER_SET_UNIT_STANCE {
            return None;
        }
        self.target_location
            .and_then(|location| UnitStance::from_index(location.x))
    }
}
