//! Reading progress reporting and the level badge.
//!
//! While a topic page is open, a clock reports time spent every thirty
//! seconds; reaching the end of the topic body reports completion exactly
//! once per visit. Progress replies carry the user's level, and the badge
//! decides when the celebration modal is due.

use std::time::{Duration, Instant};

use crate::api::types::ProgressUpdate;

/// How often time-on-topic is reported.
pub const REPORT_INTERVAL: Duration = Duration::from_secs(30);

/// Tracks time spent on one topic visit.
#[derive(Debug)]
pub struct ReadingClock {
    topic_id: u64,
    started: Instant,
    last_report: Instant,
    completion_sent: bool,
}

impl ReadingClock {
    pub fn new(topic_id: u64, now: Instant) -> Self {
        Self { topic_id, started: now, last_report: now, completion_sent: false }
    }

    pub fn topic_id(&self) -> u64 {
        self.topic_id
    }

    /// Whole minutes spent in this visit so far.
    pub fn minutes_spent(&self, now: Instant) -> u32 {
        (now.duration_since(self.started).as_secs() / 60) as u32
    }

    /// Periodic report, due every [`REPORT_INTERVAL`]; `None` in between.
    pub fn tick(&mut self, now: Instant, progress_percentage: u8) -> Option<ProgressUpdate> {
        if now.duration_since(self.last_report) < REPORT_INTERVAL {
            return None;
        }
        self.last_report = now;
        Some(ProgressUpdate {
            topic_id: self.topic_id,
            progress_percentage,
            time_spent: self.minutes_spent(now),
            completed: false,
        })
    }

    /// Completion report when the reader reaches the end of the body.
    /// Fires at most once per visit.
    pub fn complete(&mut self, now: Instant) -> Option<ProgressUpdate> {
        if self.completion_sent {
            return None;
        }
        self.completion_sent = true;
        self.last_report = now;
        Some(ProgressUpdate {
            topic_id: self.topic_id,
            progress_percentage: 100,
            time_spent: self.minutes_spent(now),
            completed: true,
        })
    }
}

/// The level shown in the header bar.
#[derive(Debug)]
pub struct LevelBadge {
    level: u32,
}

impl LevelBadge {
    pub fn new(level: u32) -> Self {
        Self { level }
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Take a level from a progress or quiz reply. Returns true exactly when
    /// the celebration modal is due: the reply's level is higher than the
    /// displayed one. The badge adopts the new level at the same time, so an
    /// identical reply never celebrates twice.
    pub fn observe(&mut self, reply_level: Option<u32>) -> bool {
        match reply_level {
            Some(new_level) if new_level > self.level => {
                self.level = new_level;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_reports_every_interval() {
        let now = Instant::now();
        let mut clock = ReadingClock::new(7, now);

        assert!(clock.tick(now + Duration::from_secs(29), 40).is_none());

        let update = clock.tick(now + Duration::from_secs(30), 40).unwrap();
        assert_eq!(update.topic_id, 7);
        assert_eq!(update.progress_percentage, 40);
        assert!(!update.completed);

        // next report is due a full interval after the last one
        assert!(clock.tick(now + Duration::from_secs(31), 40).is_none());
        assert!(clock.tick(now + Duration::from_secs(60), 40).is_some());
    }

    #[test]
    fn test_minutes_spent_reports_whole_minutes() {
        let now = Instant::now();
        let clock = ReadingClock::new(7, now);
        assert_eq!(clock.minutes_spent(now + Duration::from_secs(59)), 0);
        assert_eq!(clock.minutes_spent(now + Duration::from_secs(150)), 2);
    }

    #[test]
    fn test_completion_fires_once_per_visit() {
        let now = Instant::now();
        let mut clock = ReadingClock::new(7, now);

        let update = clock.complete(now + Duration::from_secs(90)).unwrap();
        assert_eq!(update.progress_percentage, 100);
        assert!(update.completed);
        assert_eq!(update.time_spent, 1);

        assert!(clock.complete(now + Duration::from_secs(120)).is_none());
    }

    #[test]
    fn test_level_up_celebrates_exactly_once() {
        let mut badge = LevelBadge::new(2);

        assert!(badge.observe(Some(3)));
        assert_eq!(badge.level(), 3);
        // the same reply again is no longer higher
        assert!(!badge.observe(Some(3)));
    }

    #[test]
    fn test_equal_or_lower_level_never_celebrates() {
        let mut badge = LevelBadge::new(2);
        assert!(!badge.observe(Some(2)));
        assert!(!badge.observe(Some(1)));
        assert!(!badge.observe(None));
        assert_eq!(badge.level(), 2);
    }
}
