use crate::debug::ring::TransitionHistory;
use crate::ecs::components::{BehaviorState, TransitionReason};
use crate::ecs::systems::TickContext;
use crate::input::InputEvents;
use crate::shark::Shark;

/// Immediate transitions driven by input events rather than the slow
/// evaluator.
pub fn react(
    shark: &mut Shark,
    events: &InputEvents,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
    history: &mut TransitionHistory,
) {
    if !events.any() {
        return;
    }

    let transition = match shark.state {
        // Any input ends an attack or a meal: fresh spot, visuals dropped.
        BehaviorState::Attacking | BehaviorState::Eating => {
            shark.respawn(&ctx.bounds, rng, TransitionReason::InputAfterAttack, ctx.now)
        }
        BehaviorState::Patrol if events.clicked.is_some() => {
            shark.enter_state(BehaviorState::Alert, TransitionReason::Click, ctx.now)
        }
        BehaviorState::Circling if events.moved => {
            shark.enter_state(BehaviorState::Hunt, TransitionReason::PointerMoved, ctx.now)
        }
        _ => None,
    };

    if let Some(transition) = transition {
        history.push(transition);
    }
}

/// Apply this poll's input events to every shark.
pub fn apply(
    world: &mut hecs::World,
    events: &InputEvents,
    ctx: &TickContext,
    rng: &mut fastrand::Rng,
    history: &mut TransitionHistory,
) {
    if !events.any() {
        return;
    }
    for (_, shark) in world.query_mut::<&mut Shark>() {
        react(shark, events, ctx, rng, history);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Settings, Tuning};
    use crate::ecs::components::SharkId;
    use crate::input::{Click, InputTracker, InteractionRecord};
    use crate::screen::ScreenBounds;
    use crate::shark::personality::Personality;
    use glam::Vec2;

    struct Fixture {
        record: InteractionRecord,
        tracker: InputTracker,
        tuning: Tuning,
        settings: Settings,
        history: TransitionHistory,
        rng: fastrand::Rng,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                record: InteractionRecord::new(Vec2::new(500.0, 500.0)),
                tracker: InputTracker::new(0.0),
                tuning: Tuning::default(),
                settings: Settings::default(),
                history: TransitionHistory::new(8),
                rng: fastrand::Rng::with_seed(13),
            }
        }

        fn react(&mut self, shark: &mut Shark, events: InputEvents) {
            let ctx = TickContext {
                now: 2.0,
                dt: 1.0 / 60.0,
                record: &self.record,
                tracker: &self.tracker,
                tuning: &self.tuning,
                settings: &self.settings,
                bounds: ScreenBounds::new(0.0, 0.0, 1920.0, 1080.0),
            };
            react(shark, &events, &ctx, &mut self.rng, &mut self.history);
        }
    }

    fn shark(state: BehaviorState) -> Shark {
        let mut s = Shark::new(SharkId(1), Vec2::new(300.0, 300.0), Personality::default(), 0.0);
        s.state = state;
        s
    }

    fn click() -> InputEvents {
        InputEvents {
            moved: false,
            clicked: Some(Click {
                position: Vec2::new(500.0, 500.0),
                time: 1.9,
            }),
        }
    }

    fn moved() -> InputEvents {
        InputEvents {
            moved: true,
            clicked: None,
        }
    }

    #[test]
    fn click_in_patrol_alerts() {
        let mut fx = Fixture::new();
        let mut s = shark(BehaviorState::Patrol);
        fx.react(&mut s, click());
        assert_eq!(s.state, BehaviorState::Alert);
        assert_eq!(fx.history.len(), 1);
    }

    #[test]
    fn move_in_patrol_does_nothing() {
        let mut fx = Fixture::new();
        let mut s = shark(BehaviorState::Patrol);
        fx.react(&mut s, moved());
        assert_eq!(s.state, BehaviorState::Patrol);
        assert!(fx.history.is_empty());
    }

    #[test]
    fn move_while_circling_starts_hunt() {
        let mut fx = Fixture::new();
        let mut s = shark(BehaviorState::Circling);
        fx.react(&mut s, moved());
        assert_eq!(s.state, BehaviorState::Hunt);
    }

    #[test]
    fn input_after_bite_respawns_and_clears_visuals() {
        let mut fx = Fixture::new();
        let mut s = shark(BehaviorState::Eating);
        s.animation.bite(Vec2::new(500.0, 500.0), 1.0);
        fx.react(&mut s, moved());
        assert_eq!(s.state, BehaviorState::Patrol);
        assert!(s.animation.bite_effect.is_none());
        assert!(!s.animation.cursor_hidden);
        assert_eq!(s.patrol_baseline_y, s.position.y);
    }

    #[test]
    fn click_while_attacking_also_respawns() {
        let mut fx = Fixture::new();
        let mut s = shark(BehaviorState::Attacking);
        fx.react(&mut s, click());
        assert_eq!(s.state, BehaviorState::Patrol);
        assert_eq!(
            fx.history.latest().map(|t| t.reason),
            Some(TransitionReason::InputAfterAttack)
        );
    }
}
