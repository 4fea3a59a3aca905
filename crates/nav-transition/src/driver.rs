//! Time-based progress drivers
//!
//! A [`Driver`] is a pure function from elapsed time to progress. The
//! controller feeds it synthetic time on every tick, so transitions can be
//! tested without a rendering loop.

use nav_screen::tokens::easing;

// =============================================================================
// Curves
// =============================================================================

/// Interpolation shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Curve {
    /// Constant speed
    Linear,
    /// Cubic bezier through `(0, 0)`, `(x1, y1)`, `(x2, y2)`, `(1, 1)`
    CubicBezier(f32, f32, f32, f32),
}

impl Curve {
    /// Slide curve used by horizontal and vertical transitions
    pub const NAVIGATION: Curve = Curve::from_points(easing::NAVIGATION);
    /// Decelerating curve used by fades and title bar transforms
    pub const DECELERATE: Curve = Curve::from_points(easing::DECELERATE);

    const fn from_points(points: (f32, f32, f32, f32)) -> Curve {
        Curve::CubicBezier(points.0, points.1, points.2, points.3)
    }

    /// Eased value for linear time `t`; exact at both ends
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }
        match *self {
            Curve::Linear => t,
            Curve::CubicBezier(x1, y1, x2, y2) => {
                let s = solve_bezier_x(t, x1, x2);
                bezier(s, y1, y2).clamp(0.0, 1.0)
            }
        }
    }
}

fn bezier(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * s * p1 + 3.0 * inv * s * s * p2 + s * s * s
}

fn bezier_slope(s: f32, p1: f32, p2: f32) -> f32 {
    let inv = 1.0 - s;
    3.0 * inv * inv * p1 + 6.0 * inv * s * (p2 - p1) + 3.0 * s * s * (1.0 - p2)
}

/// Parameter `s` at which the curve's x coordinate equals `x`
fn solve_bezier_x(x: f32, x1: f32, x2: f32) -> f32 {
    const EPSILON: f32 = 1e-6;

    let mut s = x;
    for _ in 0..8 {
        let error = bezier(s, x1, x2) - x;
        if error.abs() < EPSILON {
            return s;
        }
        let slope = bezier_slope(s, x1, x2);
        if slope.abs() < EPSILON {
            break;
        }
        s = (s - error / slope).clamp(0.0, 1.0);
    }

    // Newton failed to converge; bisect
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    s = x;
    for _ in 0..32 {
        let value = bezier(s, x1, x2);
        if (value - x).abs() < EPSILON {
            break;
        }
        if value < x {
            low = s;
        } else {
            high = s;
        }
        s = (low + high) / 2.0;
    }
    s
}

// =============================================================================
// Driver
// =============================================================================

/// Interpolates from one progress value to another over time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Driver {
    from: f32,
    to: f32,
    delay_ms: u32,
    duration_ms: u32,
    curve: Curve,
}

impl Driver {
    /// Drive from `from` to `to` in `duration_ms`
    pub fn new(from: f32, to: f32, duration_ms: u32, curve: Curve) -> Self {
        Self {
            from,
            to,
            delay_ms: 0,
            duration_ms,
            curve,
        }
    }

    /// Hold `from` for `delay_ms` before starting
    #[must_use]
    pub fn with_delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Start value
    pub fn from(&self) -> f32 {
        self.from
    }

    /// End value
    pub fn to(&self) -> f32 {
        self.to
    }

    /// Start delay
    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    /// Animation length, without delay
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    /// Interpolation shape
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Delay plus duration
    pub fn total_ms(&self) -> u64 {
        u64::from(self.delay_ms) + u64::from(self.duration_ms)
    }

    /// Progress after `elapsed_ms`; exactly `to` once complete
    pub fn value_at(&self, elapsed_ms: u64) -> f32 {
        if self.is_complete(elapsed_ms) {
            return self.to;
        }
        let delay = u64::from(self.delay_ms);
        if elapsed_ms <= delay {
            return self.from;
        }
        let t = (elapsed_ms - delay) as f32 / self.duration_ms as f32;
        self.from + (self.to - self.from) * self.curve.apply(t)
    }

    /// Whether the driver has reached `to`
    pub fn is_complete(&self, elapsed_ms: u64) -> bool {
        elapsed_ms >= self.total_ms()
    }

    /// Lazy time-ordered samples every `step_ms`, ending with the final value
    pub fn frames(&self, step_ms: u32) -> Frames {
        Frames {
            driver: *self,
            step: u64::from(step_ms.max(1)),
            elapsed: 0,
            done: false,
        }
    }
}

/// Iterator over `(elapsed_ms, progress)` samples of a [`Driver`]
#[derive(Debug, Clone)]
pub struct Frames {
    driver: Driver,
    step: u64,
    elapsed: u64,
    done: bool,
}

impl Iterator for Frames {
    type Item = (u64, f32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let at = self.elapsed.min(self.driver.total_ms());
        if self.driver.is_complete(at) {
            self.done = true;
        }
        self.elapsed += self.step;
        Some((at, self.driver.value_at(at)))
    }
}

// =============================================================================
// Drop Duration
// =============================================================================

/// Duration of the animation finishing a released gesture.
///
/// Without velocity the longest duration is used; otherwise the remaining
/// `distance` is covered at the release velocity (px/s), bounded by
/// `[min_ms, max_ms]`.
pub fn drop_duration(distance: f32, velocity: f32, min_ms: u32, max_ms: u32) -> u32 {
    if velocity <= 0.0 {
        return max_ms;
    }
    let duration = (distance.abs() / (velocity / 1000.0)).round();
    if !duration.is_finite() {
        return max_ms;
    }
    (duration.max(0.0) as u32).clamp(min_ms, max_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curve_endpoints() {
        for curve in [Curve::Linear, Curve::NAVIGATION, Curve::DECELERATE] {
            assert_eq!(curve.apply(0.0), 0.0);
            assert_eq!(curve.apply(1.0), 1.0);
            assert_eq!(curve.apply(-1.0), 0.0);
            assert_eq!(curve.apply(2.0), 1.0);
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for curve in [Curve::Linear, Curve::NAVIGATION, Curve::DECELERATE] {
            let mut last = 0.0;
            for i in 0..=100 {
                let value = curve.apply(i as f32 / 100.0);
                assert!(value >= last - 1e-4, "{:?} decreased at {}", curve, i);
                last = value;
            }
        }
    }

    #[test]
    fn test_decelerate_is_ahead_of_linear() {
        assert!(Curve::DECELERATE.apply(0.3) > 0.3);
    }

    #[test]
    fn test_driver_value_at() {
        let driver = Driver::new(1.0, 0.0, 400, Curve::Linear);
        assert_eq!(driver.value_at(0), 1.0);
        assert!((driver.value_at(100) - 0.75).abs() < 1e-6);
        assert_eq!(driver.value_at(400), 0.0);
        assert_eq!(driver.value_at(10_000), 0.0);
        assert!(driver.is_complete(400));
        assert!(!driver.is_complete(399));
    }

    #[test]
    fn test_driver_delay() {
        let driver = Driver::new(0.0, 1.0, 100, Curve::Linear).with_delay(120);
        assert_eq!(driver.total_ms(), 220);
        assert_eq!(driver.value_at(60), 0.0);
        assert_eq!(driver.value_at(120), 0.0);
        assert!((driver.value_at(170) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_zero_duration_driver_completes_immediately() {
        let driver = Driver::new(0.3, 1.0, 0, Curve::NAVIGATION);
        assert!(driver.is_complete(0));
        assert_eq!(driver.value_at(0), 1.0);
    }

    #[test]
    fn test_frames_end_on_target() {
        let driver = Driver::new(0.0, 1.0, 100, Curve::DECELERATE);
        let frames: Vec<(u64, f32)> = driver.frames(16).collect();
        assert_eq!(frames.first(), Some(&(0, 0.0)));
        assert_eq!(frames.last(), Some(&(100, 1.0)));
        assert!(frames.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
    }

    #[test]
    fn test_drop_duration() {
        assert_eq!(drop_duration(300.0, 0.0, 60, 200), 200);
        assert_eq!(drop_duration(300.0, -50.0, 60, 200), 200);
        assert_eq!(drop_duration(300.0, 3000.0, 60, 200), 100);
        assert_eq!(drop_duration(300.0, 100_000.0, 60, 200), 60);
        assert_eq!(drop_duration(300.0, 1000.0, 60, 200), 200);
        assert_eq!(drop_duration(-300.0, 3000.0, 60, 200), 100);
    }
}
