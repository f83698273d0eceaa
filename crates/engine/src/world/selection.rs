use super::ActorId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    Replace,
    Add,
}

/// The local player's selected actors. Membership matters, order does not,
/// but insertion order is kept so iteration is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    actors: Vec<ActorId>,
}

impl Selection {
    pub fn actors(&self) -> &[ActorId] {
        &self.actors
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn combine<I>(&mut self, actors: I, mode: SelectionMode)
    where
        I: IntoIterator<Item = ActorId>,
    {
        if mode == SelectionMode::Replace {
            self.actors.clear();
        }
        for id in actors {
            if !self.actors.contains(&id) {
                self.actors.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.actors.clear();
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(ActorId) -> bool) {
        self.actors.retain(|id| keep(*id));
    }
}
