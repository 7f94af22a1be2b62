use glam::Vec2;

/// Absolute virtual-screen rectangle (all monitors). The origin can be
/// negative when a monitor sits left of or above the primary one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenBounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.left && p.x <= self.right() && p.y >= self.top && p.y <= self.bottom()
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.left, self.right()),
            p.y.clamp(self.top, self.bottom()),
        )
    }

    /// Uniform random point at least `margin` pixels inside the bounds.
    pub fn random_interior(&self, margin: f32, rng: &mut fastrand::Rng) -> Vec2 {
        let mx = margin.min(self.width * 0.5);
        let my = margin.min(self.height * 0.5);
        Vec2::new(
            self.left + mx + rng.f32() * (self.width - 2.0 * mx),
            self.top + my + rng.f32() * (self.height - 2.0 * my),
        )
    }

    /// Random point along one of the four edges, inset by `margin`.
    pub fn random_edge(&self, margin: f32, rng: &mut fastrand::Rng) -> Vec2 {
        let p = self.random_interior(margin, rng);
        let mx = margin.min(self.width * 0.5);
        let my = margin.min(self.height * 0.5);
        match rng.u8(0..4) {
            0 => Vec2::new(self.left + mx, p.y),
            1 => Vec2::new(self.right() - mx, p.y),
            2 => Vec2::new(p.x, self.top + my),
            _ => Vec2::new(p.x, self.bottom() - my),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_points_stay_inside() {
        let bounds = ScreenBounds::new(-1920.0, 0.0, 3840.0, 1080.0);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            assert!(bounds.contains(bounds.random_interior(40.0, &mut rng)));
            assert!(bounds.contains(bounds.random_edge(40.0, &mut rng)));
        }
    }

    #[test]
    fn clamp_pulls_points_in() {
        let bounds = ScreenBounds::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(bounds.clamp(Vec2::new(-5.0, 900.0)), Vec2::new(0.0, 600.0));
    }
}
