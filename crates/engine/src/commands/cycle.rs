use tracing::debug;

use crate::rules::Capability;
use crate::world::{ActorId, PlayerId, Selection, SelectionMode, World};

use super::view::to_selection;
use super::CommandContext;

/// Candidate after the first selected one, wrapping to the start when the
/// selected candidate is last or none is selected. `None` only for an empty
/// candidate list.
pub fn cycle_to(candidates: &[ActorId], selection: &Selection) -> Option<ActorId> {
    candidates
        .iter()
        .skip_while(|id| !selection.contains(**id))
        .nth(1)
        .or_else(|| candidates.first())
        .copied()
}

/// Live base-building actors owned by `player`, in world enumeration order.
pub fn base_candidates(world: &World, player: PlayerId) -> Vec<ActorId> {
    world
        .actors_with(Capability::BaseBuilding)
        .filter(|actor| actor.is_live_and_owned_by(player))
        .map(|actor| actor.id)
        .collect()
}

/// Live production actors owned by `player` that are not bases, stably sorted
/// by the first entry of their production list.
pub fn production_candidates(world: &World, player: PlayerId) -> Vec<ActorId> {
    let mut facilities = world
        .actors_with(Capability::Production)
        .filter(|actor| actor.is_live_and_owned_by(player))
        .filter(|actor| !actor.has(Capability::BaseBuilding))
        .map(|actor| {
            let key = actor
                .produces()
                .and_then(|produces| produces.first())
                .map(String::as_str)
                .unwrap_or_default();
            (key, actor.id)
        })
        .collect::<Vec<_>>();
    facilities.sort_by(|a, b| a.0.cmp(b.0));
    facilities.into_iter().map(|(_, id)| id).collect()
}

pub(crate) fn cycle_selection(ctx: &mut CommandContext<'_>, candidates: &[ActorId]) -> bool {
    let Some(next) = cycle_to(candidates, ctx.world.selection()) else {
        debug!("cycle_no_candidates");
        return true;
    };

    ctx.world
        .selection_mut()
        .combine([next], SelectionMode::Replace);
    debug!(actor = next.0, candidates = candidates.len(), "cycle_selected");
    to_selection(ctx)
}
