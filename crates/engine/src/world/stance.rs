use serde::{Deserialize, Serialize};

/// Auto-target behaviour of a unit. The declaration order is the cycling order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStance {
    HoldFire,
    ReturnFire,
    Defend,
    #[default]
    AttackAnything,
}

impl UnitStance {
    pub const ALL: [UnitStance; 4] = [
        UnitStance::HoldFire,
        UnitStance::ReturnFire,
        UnitStance::Defend,
        UnitStance::AttackAnything,
    ];

    pub fn index(self) -> usize {
        Self::ALL
            .iter()
            .position(|stance| *stance == self)
            .unwrap_or(0)
    }

    pub fn from_index(index: i32) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|stance| stance.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnitStance::HoldFire => "HoldFire",
            UnitStance::ReturnFire => "ReturnFire",
            UnitStance::Defend => "Defend",
            UnitStance::AttackAnything => "AttackAnything",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_advances_in_declaration_order() {
        assert_eq!(UnitStance::HoldFire.next(), UnitStance::ReturnFire);
        assert_eq!(UnitStance::ReturnFire.next(), UnitStance::Defend);
        assert_eq!(UnitStance::Defend.next(), UnitStance::AttackAnything);
    }

    #[test]
    fn next_wraps_from_last_to_first() {
        assert_eq!(UnitStance::AttackAnything.next(), UnitStance::HoldFire);
    }

    #[test]
    fn repeated_next_visits_every_stance_once_per_lap() {
        let mut stance = UnitStance::Defend;
        let mut seen = Vec::new();
        for _ in 0..UnitStance::ALL.len() {
            stance = stance.next();
            seen.push(stance);
        }
        assert_eq!(stance, UnitStance::Defend);
        seen.sort_by_key(|stance| stance.index());
        assert_eq!(seen, UnitStance::ALL.to_vec());
    }

    #[test]
    fn index_round_trips_and_rejects_out_of_range() {
        for stance in UnitStance::ALL {
            assert_eq!(UnitStance::from_index(stance.index() as i32), Some(stance));
        }
        assert_eq!(UnitStance::from_index(-1), None);
        assert_eq!(UnitStance::from_index(4), None);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(UnitStance::parse("holdfire"), Some(UnitStance::HoldFire));
        assert_eq!(UnitStance::parse("Defend"), Some(UnitStance::Defend));
        assert_eq!(UnitStance::parse("Aggressive"), None);
    }
}
