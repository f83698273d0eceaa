use tracing::info;

use crate::world::{Order, World};

/// Audio acknowledgement for a batch of orders issued from one keypress.
pub trait OrderFeedback {
    fn play_voice_for_orders(&mut self, world: &World, orders: &[Order]);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl OrderFeedback for NullFeedback {
    fn play_voice_for_orders(&mut self, _world: &World, _orders: &[Order]) {}
}

/// Answers each batch with the voice of the first subject that has one.
#[derive(Debug, Clone, Default)]
pub struct VoiceFeedback {
    played: Vec<String>,
}

impl VoiceFeedback {
    pub fn played(&self) -> &[String] {
        &self.played
    }
}

impl OrderFeedback for VoiceFeedback {
    fn play_voice_for_orders(&mut self, world: &World, orders: &[Order]) {
        let voiced = orders.iter().find_map(|order| {
            world
                .actor(order.subject)
                .and_then(|actor| actor.info.voice.as_deref())
                .map(|voice| (order, voice))
        });
        if let Some((order, voice)) = voiced {
            info!(voice, command = %order.command, batch = orders.len(), "order_voice");
            self.played.push(voice.to_string());
        }
    }
}
