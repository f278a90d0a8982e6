use crate::animation::easing::{AnimMode, Easing};
use crate::math::{AngleHelper, StatsHelper};
use std::collections::BTreeMap;
use std::time::Duration;

/// Shortest lifetime of any tween, whatever the caller asks for.
pub const MIN_TWEEN_DURATION: Duration = Duration::from_millis(80);

#[derive(Debug, Clone, Copy)]
enum Shape {
    Linear,
    /// Runs `from..to` in delta space and reports `normalize(base + v)`.
    Angular { base: f64 },
}

#[derive(Debug, Clone)]
struct Tween {
    from: f64,
    to: f64,
    start: Duration,
    duration: Duration,
    easing: Easing,
    shape: Shape,
}

impl Tween {
    fn progress(&self, now: Duration) -> f64 {
        let elapsed = now.saturating_sub(self.start).as_secs_f64();
        StatsHelper::clamp(elapsed / self.duration.as_secs_f64(), 0.0, 1.0)
    }

    fn value_at(&self, eased: f64) -> f64 {
        let v = self.from + (self.to - self.from) * eased;
        match self.shape {
            Shape::Linear => v,
            Shape::Angular { base } => AngleHelper::normalize_deg(base + v),
        }
    }
}

/// Registry of in-flight interpolations, one per output key.
///
/// Nothing here reads a clock: the host passes `now` to every call and drains
/// emitted `(key, value)` pairs into its renderer.
#[derive(Debug, Clone)]
pub struct TweenScheduler<K: Ord + Copy> {
    active: BTreeMap<K, Tween>,
}

impl<K: Ord + Copy> TweenScheduler<K> {
    pub fn new() -> Self {
        Self {
            active: BTreeMap::new(),
        }
    }

    /// Replaces any tween under `key` and returns `from`, the value to show
    /// right now.
    pub fn start_tween(
        &mut self,
        key: K,
        from: f64,
        to: f64,
        duration: Duration,
        mode: AnimMode,
        now: Duration,
    ) -> f64 {
        self.insert(key, from, to, duration, mode, now, Shape::Linear);
        from
    }

    /// Like [`start_tween`](Self::start_tween) but rotates the short way round
    /// the circle. Returns the normalized `from`.
    pub fn start_angle_tween(
        &mut self,
        key: K,
        from: f64,
        to: f64,
        duration: Duration,
        mode: AnimMode,
        now: Duration,
    ) -> f64 {
        let base = AngleHelper::normalize_deg(from);
        let delta = AngleHelper::shortest_delta(from, to);
        self.insert(key, 0.0, delta, duration, mode, now, Shape::Angular { base });
        base
    }

    #[allow(clippy::too_many_arguments)]
    fn insert(
        &mut self,
        key: K,
        from: f64,
        to: f64,
        duration: Duration,
        mode: AnimMode,
        now: Duration,
        shape: Shape,
    ) {
        self.active.remove(&key);
        self.active.insert(
            key,
            Tween {
                from,
                to,
                start: now,
                duration: duration.max(MIN_TWEEN_DURATION),
                easing: mode.easing(),
                shape,
            },
        );
    }

    /// Steps every tween to `now`, emitting one value per tween and dropping
    /// the ones that reached their end. With `mode == Off` every tween lands
    /// on its target this frame.
    pub fn advance<F>(&mut self, now: Duration, mode: AnimMode, mut emit: F)
    where
        F: FnMut(K, f64),
    {
        self.active.retain(|key, tween| {
            let p = tween.progress(now);
            let eased = if mode == AnimMode::Off {
                1.0
            } else {
                (tween.easing)(p)
            };
            emit(*key, tween.value_at(eased));
            p < 1.0
        });
    }

    pub fn cancel(&mut self, key: K) -> bool {
        self.active.remove(&key).is_some()
    }

    pub fn is_active(&self, key: K) -> bool {
        self.active.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    pub fn clear(&mut self) {
        self.active.clear();
    }
}

impl<K: Ord + Copy> Default for TweenScheduler<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    fn step(sched: &mut TweenScheduler<u8>, now: Duration, mode: AnimMode) -> Vec<(u8, f64)> {
        let mut out = Vec::new();
        sched.advance(now, mode, |k, v| out.push((k, v)));
        out
    }

    #[test]
    fn every_mode_lands_exactly_on_target() {
        for mode in AnimMode::CYCLE {
            let mut sched = TweenScheduler::new();
            sched.start_tween(1u8, 0.0, 100.0, ms(400), mode, ms(0));
            let out = step(&mut sched, ms(400), mode);
            assert_eq!(out, vec![(1, 100.0)], "{:?}", mode);
            assert!(sched.is_empty());
        }
    }

    #[test]
    fn soft_is_at_sine_of_quarter_pi_halfway() {
        let mut sched = TweenScheduler::new();
        sched.start_tween(1u8, 0.0, 100.0, ms(400), AnimMode::Soft, ms(0));
        let out = step(&mut sched, ms(200), AnimMode::Soft);
        let expected = 100.0 * (std::f64::consts::PI / 4.0).sin();
        assert!((out[0].1 - expected).abs() < 1e-9);
        assert!(sched.is_active(1));
    }

    #[test]
    fn start_returns_from_immediately() {
        let mut sched = TweenScheduler::new();
        let first = sched.start_tween(1u8, 12.5, 40.0, ms(400), AnimMode::Linear, ms(0));
        assert_eq!(first, 12.5);
    }

    #[test]
    fn replacing_a_key_restarts_from_the_given_value() {
        let mut sched = TweenScheduler::new();
        sched.start_tween(1u8, 0.0, 100.0, ms(400), AnimMode::Linear, ms(0));
        let mid = step(&mut sched, ms(200), AnimMode::Linear)[0].1;
        assert!((mid - 50.0).abs() < 1e-9);

        let first = sched.start_tween(1u8, mid, 0.0, ms(400), AnimMode::Linear, ms(200));
        assert_eq!(first, mid);
        assert_eq!(sched.len(), 1);

        let out = step(&mut sched, ms(400), AnimMode::Linear);
        assert!((out[0].1 - 25.0).abs() < 1e-9);
    }

    #[test]
    fn short_durations_are_stretched_to_the_minimum() {
        let mut sched = TweenScheduler::new();
        sched.start_tween(1u8, 0.0, 80.0, ms(0), AnimMode::Linear, ms(0));
        let out = step(&mut sched, ms(40), AnimMode::Linear);
        assert!((out[0].1 - 40.0).abs() < 1e-9);
        assert!(sched.is_active(1));
    }

    #[test]
    fn off_mode_forces_completion_on_first_frame() {
        let mut sched = TweenScheduler::new();
        sched.start_tween(1u8, 0.0, 100.0, ms(1000), AnimMode::Soft, ms(0));
        let out = step(&mut sched, ms(1), AnimMode::Off);
        assert_eq!(out, vec![(1, 100.0)]);
        // still registered until its own duration runs out
        assert!(sched.is_active(1));
        step(&mut sched, ms(1000), AnimMode::Off);
        assert!(sched.is_empty());
    }

    #[test]
    fn angle_tween_takes_the_short_way_across_north() {
        let mut sched = TweenScheduler::new();
        let first = sched.start_angle_tween(7u8, 350.0, 10.0, ms(400), AnimMode::Linear, ms(0));
        assert_eq!(first, 350.0);

        let mid = step(&mut sched, ms(200), AnimMode::Linear)[0].1;
        assert!(mid.abs() < 1e-9 || (mid - 360.0).abs() < 1e-9, "mid {mid}");

        let end = step(&mut sched, ms(400), AnimMode::Linear)[0].1;
        assert!((end - 10.0).abs() < 1e-9);
    }

    #[test]
    fn angle_tween_values_are_normalized() {
        let mut sched = TweenScheduler::new();
        sched.start_angle_tween(7u8, -30.0, 30.0, ms(400), AnimMode::Linear, ms(0));
        let quarter = step(&mut sched, ms(100), AnimMode::Linear)[0].1;
        assert!((quarter - 345.0).abs() < 1e-9);
    }

    #[test]
    fn independent_keys_advance_together() {
        let mut sched = TweenScheduler::new();
        sched.start_tween(1u8, 0.0, 10.0, ms(100), AnimMode::Linear, ms(0));
        sched.start_tween(2u8, 0.0, 10.0, ms(200), AnimMode::Linear, ms(0));
        let out = step(&mut sched, ms(100), AnimMode::Linear);
        assert_eq!(out.len(), 2);
        assert_eq!(sched.len(), 1);
        assert!(sched.cancel(2));
        assert!(sched.is_empty());
    }
}
