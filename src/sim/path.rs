//! Flight paths for entities that drift down the scene
//!
//! Enemy ships and pickups weave down a fixed cubic Bezier path, applied as
//! an offset from their spawn point. Asteroids fly a straight line. Both are
//! driven by a `Mover` that tracks elapsed time against a fixed duration, so
//! an entity is finished exactly when its flight ends.

use glam::Vec2;

/// One cubic Bezier segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub p0: Vec2,
    pub c1: Vec2,
    pub c2: Vec2,
    pub p3: Vec2,
}

impl CubicSegment {
    pub fn new(p0: Vec2, c1: Vec2, c2: Vec2, p3: Vec2) -> Self {
        Self { p0, c1, c2, p3 }
    }

    /// Point at parameter t in [0, 1]
    pub fn point(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.p0 * (u * u * u)
            + self.c1 * (3.0 * u * u * t)
            + self.c2 * (3.0 * u * t * t)
            + self.p3 * (t * t * t)
    }

    /// First derivative at parameter t
    pub fn derivative(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        (self.c1 - self.p0) * (3.0 * u * u)
            + (self.c2 - self.c1) * (6.0 * u * t)
            + (self.p3 - self.c2) * (3.0 * t * t)
    }
}

/// Samples per segment used to build the arc-length table
const SAMPLES_PER_SEGMENT: usize = 24;

/// A chain of cubic segments, traversed at constant speed
#[derive(Debug, Clone)]
pub struct FlightPath {
    segments: Vec<CubicSegment>,
    /// Cumulative length at each sample: (distance, segment index, t)
    table: Vec<(f32, usize, f32)>,
}

impl FlightPath {
    /// Build a path from consecutive segments (each starts where the last ended)
    pub fn new(segments: Vec<CubicSegment>) -> Self {
        let mut table = Vec::with_capacity(segments.len() * SAMPLES_PER_SEGMENT + 1);
        let mut total = 0.0;
        if let Some(first) = segments.first() {
            table.push((0.0, 0, 0.0));
            let mut prev = first.p0;
            for (index, segment) in segments.iter().enumerate() {
                for step in 1..=SAMPLES_PER_SEGMENT {
                    let t = step as f32 / SAMPLES_PER_SEGMENT as f32;
                    let point = segment.point(t);
                    total += point.distance(prev);
                    table.push((total, index, t));
                    prev = point;
                }
            }
        }
        Self { segments, table }
    }

    /// The weaving path enemy ships and pickups follow, ending a full scene
    /// height below the spawn point.
    pub fn weave(scene_height: f32) -> Self {
        let y_max = -scene_height;
        let v = Vec2::new;
        let points = [
            (v(0.5, -0.5), v(0.5, -0.5), v(4.55, -29.48), v(-2.5, -59.5)),
            (v(-2.5, -59.5), v(-9.55, -89.52), v(-43.32, -115.43), v(-27.5, -154.5)),
            (v(-27.5, -154.5), v(-11.68, -193.57), v(17.28, -186.95), v(30.5, -243.5)),
            (v(30.5, -243.5), v(43.72, -300.05), v(-47.71, -335.76), v(-52.5, -379.5)),
            (v(-52.5, -379.5), v(-57.29, -423.24), v(-8.14, -482.45), v(54.5, -449.5)),
            (v(54.5, -449.5), v(117.14, -416.55), v(52.25, -308.62), v(-5.5, -348.5)),
            (v(-5.5, -348.5), v(-63.25, -388.38), v(-14.48, -457.43), v(10.5, -494.5)),
            (v(10.5, -494.5), v(23.74, -514.16), v(6.93, -537.57), v(0.5, -559.5)),
            (v(0.5, -559.5), v(-5.2, y_max), v(-2.5, y_max), v(-2.5, y_max)),
        ];
        Self::new(
            points
                .iter()
                .map(|&(p0, c1, c2, p3)| CubicSegment::new(p0, c1, c2, p3))
                .collect(),
        )
    }

    /// Total arc length
    pub fn length(&self) -> f32 {
        self.table.last().map(|&(d, _, _)| d).unwrap_or(0.0)
    }

    /// Map a fraction of the arc length to (segment, t)
    fn locate(&self, fraction: f32) -> Option<(usize, f32)> {
        let last = self.table.last()?;
        let target = fraction.clamp(0.0, 1.0) * last.0;
        let upper = self.table.partition_point(|&(d, _, _)| d < target);
        if upper == 0 {
            return Some((0, 0.0));
        }
        let upper = upper.min(self.table.len() - 1);
        let (d0, s0, t0) = self.table[upper - 1];
        let (d1, s1, t1) = self.table[upper];
        // Samples straddling a segment boundary start the next segment at t=0
        let t0 = if s0 != s1 { 0.0 } else { t0 };
        let span = d1 - d0;
        let k = if span > f32::EPSILON { (target - d0) / span } else { 0.0 };
        Some((s1, t0 + (t1 - t0) * k))
    }

    /// Point at a fraction of the total arc length
    pub fn point_at(&self, fraction: f32) -> Vec2 {
        match self.locate(fraction) {
            Some((segment, t)) => self.segments[segment].point(t),
            None => Vec2::ZERO,
        }
    }

    /// Heading (radians) of the path at a fraction of its length
    pub fn heading_at(&self, fraction: f32) -> f32 {
        match self.locate(fraction) {
            Some((segment, t)) => {
                let d = self.segments[segment].derivative(t);
                if d.length_squared() > f32::EPSILON {
                    d.y.atan2(d.x)
                } else {
                    -std::f32::consts::FRAC_PI_2
                }
            }
            None => -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// How an entity travels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Motion {
    /// Straight line between two scene points
    Linear { from: Vec2, to: Vec2 },
    /// Follow the shared flight path, offset from `origin`, facing along it
    Path { origin: Vec2 },
}

/// Time-driven motion with a fixed duration; finished entities are removed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mover {
    pub motion: Motion,
    pub duration: f32,
    pub elapsed: f32,
}

impl Mover {
    pub fn linear(from: Vec2, to: Vec2, duration: f32) -> Self {
        Self {
            motion: Motion::Linear { from, to },
            duration,
            elapsed: 0.0,
        }
    }

    pub fn path(origin: Vec2, duration: f32) -> Self {
        Self {
            motion: Motion::Path { origin },
            duration,
            elapsed: 0.0,
        }
    }

    /// Fraction of the flight completed, in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).min(1.0)
        }
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Current position, plus heading when the motion orients to its path
    pub fn sample(&self, path: &FlightPath) -> (Vec2, Option<f32>) {
        let t = self.progress();
        match self.motion {
            Motion::Linear { from, to } => (from.lerp(to, t), None),
            Motion::Path { origin } => (origin + path.point_at(t), Some(path.heading_at(t))),
        }
    }
}
