use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Fixed-rate tick scheduler.
///
/// At most one simulation tick runs per `poll`. A late tick reschedules the
/// next deadline from the current instant instead of queueing catch-up ticks.
pub struct FrameClock {
    pub target_fps: u32,
    pub tick_duration: Duration,
    next_tick: Instant,
    last_tick: Option<Instant>,
    pub tick_count: u64,
    pub real_dt: f64,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl FrameClock {
    pub fn new(target_fps: u32, start: Instant) -> Self {
        let target_fps = target_fps.max(1);
        let nominal_dt = 1.0 / target_fps as f64;
        Self {
            target_fps,
            tick_duration: Duration::from_nanos(1_000_000_000 / target_fps as u64),
            next_tick: start,
            last_tick: None,
            tick_count: 0,
            real_dt: 0.0,
            fps_samples: [nominal_dt; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: target_fps as f64,
            smoothed_frame_time_ms: nominal_dt * 1000.0,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_tick
    }

    /// Returns true when a tick should run at `now` and schedules the next one.
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.is_due(now) {
            return false;
        }

        if let Some(lateness) = self.backlog_lateness(now) {
            log::warn!(
                "Tick {} ran {:.1}ms late, dropping backlog",
                self.tick_count,
                lateness.as_secs_f64() * 1000.0
            );
        }
        self.next_tick += self.tick_duration;
        if self.next_tick <= now {
            self.next_tick = now + self.tick_duration;
        }

        if let Some(last) = self.last_tick {
            self.real_dt = now.duration_since(last).as_secs_f64();
            self.record_sample(self.real_dt);
        }
        self.last_tick = Some(now);
        self.tick_count += 1;
        true
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_tick
    }

    /// How far past its deadline a tick at `now` runs, when it is late by a
    /// whole period or more. The first tick is never late.
    fn backlog_lateness(&self, now: Instant) -> Option<Duration> {
        self.last_tick?;
        let lateness = now.checked_duration_since(self.next_tick)?;
        (lateness >= self.tick_duration).then_some(lateness)
    }

    fn record_sample(&mut self, dt: f64) {
        self.fps_samples[self.fps_sample_index] = dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_poll_is_due_immediately() {
        let start = Instant::now();
        let mut clock = FrameClock::new(60, start);
        assert!(clock.poll(start));
        assert_eq!(clock.tick_count, 1);
        assert!(!clock.poll(start));
    }

    #[test]
    fn ticks_are_spaced_by_tick_duration() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50, start);
        assert!(clock.poll(start));
        assert_eq!(clock.next_deadline(), start + Duration::from_millis(20));
        assert!(!clock.poll(start + Duration::from_millis(19)));
        assert!(clock.poll(start + Duration::from_millis(20)));
        assert_eq!(clock.next_deadline(), start + Duration::from_millis(40));
    }

    #[test]
    fn late_tick_does_not_queue_catch_up() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50, start);
        assert!(clock.poll(start));

        let late = start + Duration::from_millis(200);
        assert!(clock.poll(late));
        // Only one tick for the whole stall; the next one is a full period out.
        assert!(!clock.poll(late));
        assert_eq!(clock.next_deadline(), late + Duration::from_millis(20));
        assert_eq!(clock.tick_count, 2);
    }

    #[test]
    fn lateness_is_measured_from_the_missed_deadline() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50, start);
        assert_eq!(clock.backlog_lateness(start + Duration::from_millis(500)), None);

        assert!(clock.poll(start + Duration::from_millis(500)));
        let deadline = clock.next_deadline();
        assert_eq!(clock.backlog_lateness(deadline + Duration::from_millis(10)), None);
        assert_eq!(
            clock.backlog_lateness(deadline + Duration::from_millis(70)),
            Some(Duration::from_millis(70))
        );
    }

    #[test]
    fn zero_fps_is_clamped() {
        let clock = FrameClock::new(0, Instant::now());
        assert_eq!(clock.target_fps, 1);
        assert_eq!(clock.tick_duration, Duration::from_secs(1));
    }

    #[test]
    fn smoothed_fps_tracks_real_tick_rate() {
        let start = Instant::now();
        let mut clock = FrameClock::new(50, start);
        for i in 0..=FPS_SAMPLE_COUNT as u64 {
            assert!(clock.poll(start + Duration::from_millis(20 * i)));
        }
        assert!((clock.smoothed_fps - 50.0).abs() < 0.5);
        assert!((clock.real_dt - 0.02).abs() < 1e-6);
    }
}
