use tracing::debug;
use winit::event::MouseButton;

use crate::order_generator::{GenericSelectTarget, GuardOrderGenerator, OrderGenerator};
use crate::rules::Capability;
use crate::world::{ActorId, World};

use super::CommandContext;

/// Makes `generator` the world's active interactive mode, replacing any
/// previously active one.
pub fn enter_mode(world: &mut World, generator: Box<dyn OrderGenerator>) {
    debug!(
        mode = generator.name(),
        subjects = generator.subjects().len(),
        "interactive_mode_entered"
    );
    world.set_order_generator(generator);
}

fn local_selected_where(ctx: &CommandContext<'_>, capability: Option<Capability>) -> Vec<ActorId> {
    let Some(player) = ctx.world.local_player_id() else {
        return Vec::new();
    };
    ctx.world
        .selection()
        .actors()
        .iter()
        .filter_map(|id| ctx.world.actor(*id))
        .filter(|actor| actor.is_live_and_owned_by(player))
        .filter(|actor| capability.map_or(true, |capability| actor.has(capability)))
        .map(|actor| actor.id)
        .collect()
}

pub(crate) fn perform_attack_move(
    ctx: &mut CommandContext<'_>,
    expected_button: MouseButton,
) -> bool {
    let subjects = local_selected_where(ctx, None);
    if !subjects.is_empty() {
        enter_mode(
            ctx.world,
            Box::new(GenericSelectTarget::attack_move(subjects, expected_button)),
        );
    }
    true
}

pub(crate) fn perform_guard(ctx: &mut CommandContext<'_>) -> bool {
    let subjects = local_selected_where(ctx, Some(Capability::Guard));
    if !subjects.is_empty() {
        enter_mode(ctx.world, Box::new(GuardOrderGenerator::new(subjects)));
    }
    true
}
