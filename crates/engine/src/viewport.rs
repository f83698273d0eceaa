use crate::world::{ActorId, WPos, World};

pub trait Viewport {
    fn center(&mut self, position: WPos);
}

/// Centers on the mean position of the live actors in `actors`. Returns false
/// and leaves the viewport alone when none of them resolve.
pub fn center_on_actors(viewport: &mut dyn Viewport, world: &World, actors: &[ActorId]) -> bool {
    let mut sum_x = 0i64;
    let mut sum_y = 0i64;
    let mut count = 0i64;
    for actor in actors
        .iter()
        .filter_map(|id| world.actor(*id))
        .filter(|actor| !actor.destroyed)
    {
        let center = actor.center_position();
        sum_x += i64::from(center.x);
        sum_y += i64::from(center.y);
        count += 1;
    }
    if count == 0 {
        return false;
    }

    viewport.center(WPos {
        x: (sum_x / count) as i32,
        y: (sum_y / count) as i32,
    });
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Camera {
    pub position: WPos,
    recenter_count: u32,
}

impl Camera {
    pub fn recenter_count(&self) -> u32 {
        self.recenter_count
    }
}

impl Viewport for Camera {
    fn center(&mut self, position: WPos) {
        self.position = position;
        self.recenter_count = self.recenter_count.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::rules::ActorInfo;
    use crate::world::CPos;

    #[test]
    fn centers_on_mean_of_live_actors() {
        let mut world = World::default();
        let player = world.add_player("p1");
        let info = Arc::new(ActorInfo::new("e1"));
        let a = world.spawn(info.clone(), player, CPos::new(0, 0));
        let b = world.spawn(info.clone(), player, CPos::new(2, 4));
        let dead = world.spawn(info, player, CPos::new(50, 50));
        world.destroy(dead);

        let mut camera = Camera::default();
        assert!(center_on_actors(&mut camera, &world, &[a, b, dead]));
        assert_eq!(camera.position, WPos { x: 1024 + 512, y: 2048 + 512 });
        assert_eq!(camera.recenter_count(), 1);
    }

    #[test]
    fn empty_or_unknown_actor_list_is_a_no_op() {
        let world = World::default();
        let mut camera = Camera::default();
        assert!(!center_on_actors(&mut camera, &world, &[]));
        assert!(!center_on_actors(&mut camera, &world, &[ActorId(9)]));
        assert_eq!(camera, Camera::default());
    }
}
