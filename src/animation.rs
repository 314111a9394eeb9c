use crate::model::Point;
use crate::registry::Registry;
use std::time::Duration;
use tracing::debug;

pub fn ease_out_cubic(progress: f32) -> f32 {
    1.0 - (1.0 - progress).powi(3)
}

pub fn lerp(start: Point, end: Point, t: f32) -> Point {
    Point::new(start.x + (end.x - start.x) * t, start.y + (end.y - start.y) * t)
}

#[derive(Debug, Clone)]
struct Track {
    id: String,
    from: Point,
    to: Point,
}

/// One interpolation run from the positions at creation time to the targets
/// at creation time. A newer run simply replaces an older one.
#[derive(Debug, Clone)]
pub struct Transition {
    tracks: Vec<Track>,
    duration: Duration,
    started_at: Option<Duration>,
    finished: bool,
}

impl Transition {
    pub fn new(registry: &Registry, visible: &[String], duration: Duration) -> Self {
        let tracks = visible
            .iter()
            .filter_map(|id| registry.find_by_id(id))
            .map(|node| Track {
                id: node.id.clone(),
                from: node.position,
                to: node.target,
            })
            .collect::<Vec<_>>();
        debug!(tracks = tracks.len(), ?duration, "transition created");
        Self {
            tracks,
            duration,
            started_at: None,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Stops animating `id` for the rest of this run.
    pub fn release(&mut self, id: &str) {
        self.tracks.retain(|track| track.id != id);
    }

    /// Linear progress in `[0, 1]`. Before the first sample this is 0.
    pub fn progress_at(&self, now: Duration) -> f32 {
        let Some(start) = self.started_at else {
            return 0.0;
        };
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(start).as_secs_f32();
        (elapsed / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }

    /// Writes interpolated positions for `now` into the registry and returns
    /// whether another frame is needed. The first call fixes the start time.
    /// `skip` names a node that must not be moved (one being dragged).
    pub fn sample(&mut self, registry: &mut Registry, now: Duration, skip: Option<&str>) -> bool {
        if self.finished {
            return false;
        }
        if self.started_at.is_none() {
            self.started_at = Some(now);
        }
        let progress = self.progress_at(now);
        let eased = ease_out_cubic(progress);
        let done = progress >= 1.0;

        for track in &self.tracks {
            if skip == Some(track.id.as_str()) {
                continue;
            }
            let Some(node) = registry.find_by_id_mut(&track.id) else {
                continue;
            };
            node.position = if done {
                track.to
            } else {
                lerp(track.from, track.to, eased)
            };
        }

        if done {
            self.finished = true;
            debug!("transition finished");
        }
        !done
    }
}
