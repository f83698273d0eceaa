mod actor;
mod order;
mod player;
mod selection;
mod stance;

use std::sync::Arc;

use tracing::debug;

use crate::order_generator::OrderGenerator;
use crate::rules::{ActorInfo, Capability};

pub use actor::{Actor, ActorId, AutoTargetState, CPos, PlayerId, WPos, WORLD_UNITS_PER_CELL};
pub use order::{
    Order, ORDER_ATTACK_MOVE, ORDER_DEPLOY_TRANSFORM, ORDER_DETONATE, ORDER_GUARD,
    ORDER_RETURN_TO_BASE, ORDER_SCATTER, ORDER_SET_UNIT_STANCE, ORDER_STOP, ORDER_UNLOAD,
};
pub use player::{AttackEvent, Player};
pub use selection::{Selection, SelectionMode};
pub use stance::UnitStance;

/// Synchronized world state as seen from the input layer: actors, players,
/// the local selection, the pending order queue and the interactive mode slot.
#[derive(Debug, Default)]
pub struct World {
    actors: Vec<Actor>,
    players: Vec<Player>,
    local_player: Option<PlayerId>,
    selection: Selection,
    pending_orders: Vec<Order>,
    order_generator: Option<Box<dyn OrderGenerator>>,
    tick: u64,
    next_actor_id: u32,
}

impl World {
    pub fn add_player(&mut self, name: impl Into<String>) -> PlayerId {
        let id = PlayerId(self.players.len() as u32);
        self.players.push(Player::new(id, name));
        id
    }

    pub fn set_local_player(&mut self, player: Option<PlayerId>) {
        self.local_player = player;
    }

    pub fn local_player_id(&self) -> Option<PlayerId> {
        self.local_player
    }

    pub fn local_player(&self) -> Option<&Player> {
        self.local_player.and_then(|id| self.player(id))
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|player| player.id == id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|player| player.id == id)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn spawn(&mut self, info: Arc<ActorInfo>, owner: PlayerId, location: CPos) -> ActorId {
        let id = ActorId(self.next_actor_id);
        self.next_actor_id = self.next_actor_id.saturating_add(1);
        debug!(actor = id.0, owner = owner.0, info = %info.name, "actor_spawned");
        self.actors.push(Actor::new(id, owner, info, location));
        id
    }

    /// Marks the actor destroyed. It stays enumerable until the next
    /// `apply_pending_orders`, so callers must filter on `destroyed`.
    pub fn destroy(&mut self, id: ActorId) -> bool {
        match self.actor_mut(id) {
            Some(actor) if !actor.destroyed => {
                actor.destroyed = true;
                true
            }
            _ => false,
        }
    }

    /// All actors in spawn order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn actors_with(&self, capability: Capability) -> impl Iterator<Item = &Actor> + '_ {
        self.actors
            .iter()
            .filter(move |actor| actor.has(capability))
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut Selection {
        &mut self.selection
    }

    pub fn issue_order(&mut self, order: Order) {
        self.pending_orders.push(order);
    }

    pub fn pending_orders(&self) -> &[Order] {
        &self.pending_orders
    }

    /// Installs `generator` as the active interactive mode, dropping any
    /// previous one.
    pub fn set_order_generator(&mut self, generator: Box<dyn OrderGenerator>) {
        self.order_generator = Some(generator);
    }

    pub fn order_generator(&self) -> Option<&dyn OrderGenerator> {
        self.order_generator.as_deref()
    }

    pub fn clear_order_generator(&mut self) {
        self.order_generator = None;
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    pub fn notify_base_attacked(&mut self, player: PlayerId, location: CPos) {
        let tick = self.tick;
        if let Some(player) = self.player_mut(player) {
            player.last_attack = Some(AttackEvent { tick, location });
        }
    }

    /// Simulation step: drains the order queue in issue order, confirms stance
    /// orders on live subjects, prunes destroyed actors and advances the tick.
    /// The drained batch is returned for downstream order handlers.
    pub fn apply_pending_orders(&mut self) -> Vec<Order> {
        let orders = std::mem::take(&mut self.pending_orders);
        let mut applied = Vec::with_capacity(orders.len());
        for order in orders {
            let Some(actor) = self
                .actors
                .iter_mut()
                .find(|actor| actor.id == order.subject && !actor.destroyed)
            else {
                debug!(
                    command = %order.command,
                    subject = order.subject.0,
                    "order_dropped_stale_subject"
                );
                continue;
            };

            if let Some(stance) = order.stance() {
                if let Some(auto_target) = actor.auto_target_mut() {
                    auto_target.stance = stance;
                    auto_target.predicted_stance = stance;
                }
            }
            applied.push(order);
        }

        self.actors.retain(|actor| !actor.destroyed);
        let actors = &self.actors;
        self.selection
            .retain(|id| actors.iter().any(|actor| actor.id == id));
        self.tick = self.tick.saturating_add(1);
        applied
    }
}
