use tracing::info;

use crate::feedback::OrderFeedback;
use crate::viewport::Viewport;
use crate::world::World;

/// Player-facing debug line output.
pub trait MessageSink {
    fn debug(&mut self, message: &str);
}

/// Collects messages in memory and mirrors them to the log.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    lines: Vec<String>,
}

impl MessageLog {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn last(&self) -> Option<&str> {
        self.lines.last().map(String::as_str)
    }
}

impl MessageSink for MessageLog {
    fn debug(&mut self, message: &str) {
        info!(message, "player_message");
        self.lines.push(message.to_string());
    }
}

/// Everything a hotkey handler may touch while processing one key event.
pub struct CommandContext<'a> {
    pub world: &'a mut World,
    pub viewport: &'a mut dyn Viewport,
    pub feedback: &'a mut dyn OrderFeedback,
    pub messages: &'a mut dyn MessageSink,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        world: &'a mut World,
        viewport: &'a mut dyn Viewport,
        feedback: &'a mut dyn OrderFeedback,
        messages: &'a mut dyn MessageSink,
    ) -> Self {
        Self {
            world,
            viewport,
            feedback,
            messages,
        }
    }
}
