use glam::Vec2;

use crate::ecs::components::{BehaviorState, SharkId};
use crate::screen::ScreenBounds;
use crate::shark::animation::BITE_EFFECT_SIZE;
use crate::shark::Shark;

/// Bite effect sprite state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiteEffectFrame {
    /// Renderer-relative top-left.
    pub position: Vec2,
    pub size: f32,
    pub opacity: f32,
    pub frame: u8,
}

/// Everything the renderer needs for one shark, copied out each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharkFrame {
    pub id: SharkId,
    /// Renderer-relative top-left (virtual-screen origin subtracted).
    pub position: Vec2,
    /// Previous tick's position, for interpolation.
    pub previous_position: Vec2,
    pub facing_right: bool,
    /// Swim cycle frame.
    pub frame: u8,
    /// Fin scale (grows during an attack lunge).
    pub scale: f32,
    pub state: BehaviorState,
    /// Present only while a bite effect is showing.
    pub bite_effect: Option<BiteEffectFrame>,
    pub cursor_hidden: bool,
}

impl SharkFrame {
    pub fn from_shark(shark: &Shark, bounds: &ScreenBounds, now: f64) -> Self {
        let origin = bounds.origin();
        let anim = &shark.animation;
        let bite_effect = anim.bite_effect.map(|effect| BiteEffectFrame {
            position: effect.position - origin,
            size: BITE_EFFECT_SIZE,
            opacity: anim.bite_opacity(now),
            frame: anim.bite_frame,
        });

        Self {
            id: shark.id,
            position: shark.position - origin,
            previous_position: shark.previous_position - origin,
            facing_right: shark.facing_right,
            frame: anim.swim_frame,
            scale: anim.scale(now),
            state: shark.state,
            bite_effect,
            cursor_hidden: anim.cursor_hidden,
        }
    }

    /// Lerp between previous and current position for smooth rendering.
    pub fn interpolated(&self, alpha: f32) -> Vec2 {
        Vec2::lerp(self.previous_position, self.position, alpha.clamp(0.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shark::personality::Personality;

    #[test]
    fn positions_are_renderer_relative() {
        let bounds = ScreenBounds::new(-1920.0, -200.0, 3840.0, 1280.0);
        let shark = Shark::new(SharkId(4), Vec2::new(-100.0, 50.0), Personality::default(), 0.0);
        let frame = SharkFrame::from_shark(&shark, &bounds, 0.0);
        assert_eq!(frame.position, Vec2::new(1820.0, 250.0));
        assert!(frame.bite_effect.is_none());
    }

    #[test]
    fn bite_effect_is_exposed_while_showing() {
        let bounds = ScreenBounds::new(0.0, 0.0, 1920.0, 1080.0);
        let mut shark = Shark::new(SharkId(4), Vec2::new(100.0, 100.0), Personality::default(), 0.0);
        shark.animation.bite(Vec2::new(400.0, 300.0), 1.0);
        let frame = SharkFrame::from_shark(&shark, &bounds, 1.25);
        let effect = frame.bite_effect.unwrap();
        assert_eq!(effect.position, Vec2::new(368.0, 268.0));
        assert!((effect.opacity - 0.75).abs() < 1e-6);
        assert!(frame.cursor_hidden);
    }
}
