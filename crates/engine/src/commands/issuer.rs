use tracing::{debug, info};

use crate::world::{
    Actor, ActorId, Order, ORDER_DEPLOY_TRANSFORM, ORDER_DETONATE, ORDER_RETURN_TO_BASE,
    ORDER_SCATTER, ORDER_STOP, ORDER_UNLOAD,
};

use super::CommandContext;

/// Orders fired by the deploy key, one batch each, in this order. Which of
/// them a given actor accepts is decided when the simulation applies them.
pub const DEPLOY_ORDER_SEQUENCE: [&str; 4] = [
    ORDER_RETURN_TO_BASE,
    ORDER_DEPLOY_TRANSFORM,
    ORDER_UNLOAD,
    ORDER_DETONATE,
];

/// Builds at most one order per live, locally owned selected actor, enqueues
/// them on the world and triggers feedback once for the whole batch. Returns
/// the issued batch.
pub fn issue_for_selection<F>(ctx: &mut CommandContext<'_>, mut make_order: F) -> Vec<Order>
where
    F: FnMut(&mut Actor) -> Option<Order>,
{
    let Some(player) = ctx.world.local_player_id() else {
        return Vec::new();
    };

    let selected: Vec<ActorId> = ctx.world.selection().actors().to_vec();
    let mut orders = Vec::with_capacity(selected.len());
    for id in selected {
        let Some(actor) = ctx.world.actor_mut(id) else {
            continue;
        };
        if !actor.is_live_and_owned_by(player) {
            continue;
        }
        if let Some(order) = make_order(actor) {
            orders.push(order);
        }
    }

    for order in &orders {
        ctx.world.issue_order(order.clone());
    }
    if !orders.is_empty() {
        ctx.feedback.play_voice_for_orders(ctx.world, &orders);
    }
    debug!(count = orders.len(), "orders_issued");
    orders
}

pub(crate) fn perform_simple(ctx: &mut CommandContext<'_>, command: &str) -> bool {
    issue_for_selection(ctx, |actor| Some(Order::new(command, actor.id, false)));
    true
}

pub(crate) fn perform_stop(ctx: &mut CommandContext<'_>) -> bool {
    perform_simple(ctx, ORDER_STOP)
}

pub(crate) fn perform_scatter(ctx: &mut CommandContext<'_>) -> bool {
    perform_simple(ctx, ORDER_SCATTER)
}

pub(crate) fn perform_deploy(ctx: &mut CommandContext<'_>) -> bool {
    for command in DEPLOY_ORDER_SEQUENCE {
        perform_simple(ctx, command);
    }
    true
}

/// Advances the stance of the first capable selected actor and applies that
/// one value to every capable actor in the selection.
pub(crate) fn perform_stance_cycle(ctx: &mut CommandContext<'_>) -> bool {
    let Some(player) = ctx.world.local_player_id() else {
        return true;
    };

    let world = &*ctx.world;
    let current = world
        .selection()
        .actors()
        .iter()
        .filter_map(|id| world.actor(*id))
        .filter(|actor| actor.is_live_and_owned_by(player))
        .find_map(|actor| actor.auto_target().map(|state| state.predicted_stance));
    let Some(current) = current else {
        debug!("stance_cycle_no_capable_actor");
        return true;
    };

    let next = current.next();
    let orders = issue_for_selection(ctx, |actor| {
        let state = actor.auto_target_mut()?;
        state.predicted_stance = next;
        Some(Order::set_unit_stance(actor.id, next))
    });

    ctx.messages
        .debug(&format!("Unit stance set to: {}", next.as_str()));
    info!(
        from = current.as_str(),
        to = next.as_str(),
        actors = orders.len(),
        "unit_stance_predicted"
    );
    true
}
