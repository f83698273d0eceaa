use super::{CPos, PlayerId};

/// Most recent attack on one of the player's buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackEvent {
    pub tick: u64,
    pub location: CPos,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// `None` until the first attack is reported.
    pub last_attack: Option<AttackEvent>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            last_attack: None,
        }
    }
}
