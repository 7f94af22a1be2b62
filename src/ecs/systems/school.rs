use glam::Vec2;

use crate::config::Tuning;
use crate::ecs::components::{BehaviorState, IdleBehavior, Leader};
use crate::shark::Shark;

/// Read-only copy of the leader, taken before the tick so followers never
/// touch the leader's data while it moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderView {
    pub center: Vec2,
    pub patrol_direction: f32,
}

/// Snapshot the leader, if any.
pub fn leader_view(world: &hecs::World) -> Option<LeaderView> {
    world
        .query::<(&Shark, &Leader)>()
        .iter()
        .next()
        .map(|(_, (shark, _))| LeaderView {
            center: shark.center(),
            patrol_direction: shark.patrol_direction,
        })
}

/// Followers on a plain patrol near the leader swim the same way.
pub fn follow(shark: &mut Shark, leader: &LeaderView, tuning: &Tuning) {
    if shark.state != BehaviorState::Patrol
        || shark.idle.behavior != Some(IdleBehavior::SimplePatrol)
    {
        return;
    }
    if shark.center().distance(leader.center) < tuning.school_radius {
        shark.patrol_direction = leader.patrol_direction;
    }
}
