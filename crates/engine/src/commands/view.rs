use tracing::debug;

use crate::viewport::center_on_actors;

use super::CommandContext;

pub(crate) fn to_selection(ctx: &mut CommandContext<'_>) -> bool {
    let selected = ctx.world.selection().actors().to_vec();
    if !center_on_actors(ctx.viewport, ctx.world, &selected) {
        debug!("to_selection_nothing_to_center");
    }
    true
}

pub(crate) fn to_last_event(ctx: &mut CommandContext<'_>) -> bool {
    let Some(player) = ctx.world.local_player() else {
        return true;
    };
    let Some(event) = player.last_attack else {
        debug!(player = player.id.0, "to_last_event_no_event");
        return true;
    };

    ctx.viewport.center(event.location.center_position());
    debug!(
        x = event.location.x,
        y = event.location.y,
        tick = event.tick,
        "to_last_event_centered"
    );
    true
}
