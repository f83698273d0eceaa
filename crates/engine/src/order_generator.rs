use std::fmt;

use winit::event::MouseButton;

use crate::world::{ActorId, ORDER_ATTACK_MOVE, ORDER_GUARD};

/// Handler that interprets the next pointer interaction. The world holds at
/// most one; how pointer input is turned into orders is up to the implementor.
pub trait OrderGenerator: fmt::Debug {
    fn name(&self) -> &str;
    fn subjects(&self) -> &[ActorId];

    /// Mouse button that confirms the target, for modes that wait on a click.
    fn expected_button(&self) -> Option<MouseButton> {
        None
    }
}

/// Waits for a click on the expected button and targets `order` at the
/// clicked location for every subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericSelectTarget {
    subjects: Vec<ActorId>,
    order: String,
    cursor: String,
    expected_button: MouseButton,
}

impl GenericSelectTarget {
    pub fn new(
        subjects: Vec<ActorId>,
        order: impl Into<String>,
        cursor: impl Into<String>,
        expected_button: MouseButton,
    ) -> Self {
        Self {
            subjects,
            order: order.into(),
            cursor: cursor.into(),
            expected_button,
        }
    }

    pub fn attack_move(subjects: Vec<ActorId>, expected_button: MouseButton) -> Self {
        Self::new(subjects, ORDER_ATTACK_MOVE, "attackmove", expected_button)
    }

    pub fn order(&self) -> &str {
        &self.order
    }

    pub fn cursor(&self) -> &str {
        &self.cursor
    }

}

impl OrderGenerator for GenericSelectTarget {
    fn name(&self) -> &str {
        &self.order
    }

    fn subjects(&self) -> &[ActorId] {
        &self.subjects
    }

    fn expected_button(&self) -> Option<MouseButton> {
        Some(self.expected_button)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardOrderGenerator {
    subjects: Vec<ActorId>,
}

impl GuardOrderGenerator {
    pub fn new(subjects: Vec<ActorId>) -> Self {
        Self { subjects }
    }
}

impl OrderGenerator for GuardOrderGenerator {
    fn name(&self) -> &str {
        ORDER_GUARD
    }

    fn subjects(&self) -> &[ActorId] {
        &self.subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_move_generator_uses_attack_move_order_and_cursor() {
        let generator = GenericSelectTarget::attack_move(vec![ActorId(1)], MouseButton::Right);
        assert_eq!(generator.name(), "AttackMove");
        assert_eq!(generator.cursor(), "attackmove");
        assert_eq!(generator.expected_button(), Some(MouseButton::Right));
        assert_eq!(generator.subjects(), &[ActorId(1)]);
    }

    #[test]
    fn guard_generator_reports_guard_name() {
        let generator = GuardOrderGenerator::new(vec![ActorId(2), ActorId(3)]);
        assert_eq!(generator.name(), "Guard");
        assert_eq!(generator.subjects().len(), 2);
        assert_eq!(generator.expected_button(), None);
    }
}
