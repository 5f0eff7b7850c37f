//! Offline position source that walks a route's polyline.

use log::debug;
use rand::Rng;
use roadradar_core::{geo, GeoPoint, PositionSample, Route};

/// Degrees of latitude per meter; good enough for jitter-sized offsets.
const DEG_PER_M: f64 = 1.0 / 111_320.0;
const SIM_LABEL: &str = "sim";

/// Walks a polyline at a fixed step length, emitting one fix per tick.
/// Stands in for a live position source in demo mode and in tests; with
/// zero jitter the emitted fixes are fully deterministic.
#[derive(Debug, Clone)]
pub struct RouteSimulator {
    polyline: Vec<GeoPoint>,
    /// Meters advanced along the path per tick.
    step_m: f64,
    /// Uniform noise radius in meters; zero disables it.
    jitter_m: f64,
    segment: usize,
    /// Meters already covered within the current segment.
    offset_m: f64,
    finished: bool,
}

impl RouteSimulator {
    pub fn new(polyline: Vec<GeoPoint>, step_m: f64, jitter_m: f64) -> Self {
        let finished = polyline.len() < 2;
        Self {
            polyline,
            step_m: step_m.max(0.0),
            jitter_m: jitter_m.max(0.0),
            segment: 0,
            offset_m: 0.0,
            finished,
        }
    }

    /// Walk the geometry of a fetched route.
    pub fn along(route: &Route, step_m: f64, jitter_m: f64) -> Self {
        debug!(
            "Simulator started — points={} step_m={}",
            route.polyline.len(),
            step_m
        );
        Self::new(route.polyline.clone(), step_m, jitter_m)
    }

    /// Whether the walk has reached the final point. Fixes keep coming
    /// afterwards, clamped to that point.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Current fix, then advance one step for the next call. The first
    /// call returns the start of the polyline. `None` only for geometry
    /// too short to walk.
    pub fn next_fix(&mut self) -> Option<PositionSample> {
        if self.polyline.is_empty() {
            return None;
        }
        let point = self.current_point();
        let sample = PositionSample {
            point: self.jittered(point),
            label: SIM_LABEL.to_string(),
        };
        self.advance(self.step_m);
        Some(sample)
    }

    fn current_point(&self) -> GeoPoint {
        if self.segment + 1 >= self.polyline.len() {
            return self.polyline[self.polyline.len() - 1];
        }
        let a = self.polyline[self.segment];
        let b = self.polyline[self.segment + 1];
        let seg_len = geo::distance_m(a, b);
        if seg_len <= f64::EPSILON {
            return a;
        }
        let t = (self.offset_m / seg_len).clamp(0.0, 1.0);
        GeoPoint::new(a.lat + (b.lat - a.lat) * t, a.lon + (b.lon - a.lon) * t)
    }

    fn advance(&mut self, mut remaining: f64) {
        while remaining > 0.0 && !self.finished {
            if self.segment + 1 >= self.polyline.len() {
                self.finished = true;
                break;
            }
            let a = self.polyline[self.segment];
            let b = self.polyline[self.segment + 1];
            let seg_len = geo::distance_m(a, b);
            let left_in_segment = seg_len - self.offset_m;
            if remaining < left_in_segment {
                self.offset_m += remaining;
                remaining = 0.0;
            } else {
                remaining -= left_in_segment;
                self.offset_m = 0.0;
                self.segment += 1;
                if self.segment + 1 >= self.polyline.len() {
                    self.finished = true;
                }
            }
        }
    }

    fn jittered(&self, p: GeoPoint) -> GeoPoint {
        if self.jitter_m <= 0.0 {
            return p;
        }
        let mut rng = rand::thread_rng();
        let d_lat = rng.gen_range(-self.jitter_m..=self.jitter_m) * DEG_PER_M;
        // Longitude degrees shrink with latitude; clamp near the poles.
        let lon_scale = p.lat.to_radians().cos().max(0.01);
        let d_lon = rng.gen_range(-self.jitter_m..=self.jitter_m) * DEG_PER_M / lon_scale;
        GeoPoint::new(p.lat + d_lat, p.lon + d_lon)
    }
}
