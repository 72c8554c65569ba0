//! Bounded rolling history of past snapshots.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::RwLock;
use sunwatch_types::{HistoryPoint, RegisterValue};

/// Fixed-capacity, insertion-ordered sequence of [`HistoryPoint`]s.
///
/// Appends are O(1) amortized; when the buffer is full the oldest point is
/// evicted first. Points are immutable once appended, so windowed queries
/// can copy values out under a read lock.
#[derive(Debug)]
pub struct HistoryBuffer {
    points: RwLock<VecDeque<HistoryPoint>>,
    capacity: usize,
}

impl HistoryBuffer {
    /// Create an empty buffer retaining at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append a point, evicting the oldest if the buffer is full.
    pub fn append(&self, point: HistoryPoint) {
        let mut points = self.points.write();
        points.push_back(point);
        if points.len() > self.capacity {
            points.pop_front();
        }
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.read().len()
    }

    /// Whether the buffer holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.read().is_empty()
    }

    /// Query one register over a time window ending at `now_ms`.
    ///
    /// Returns `(timestamp_ms, value)` pairs in ascending timestamp order
    /// for every retained point within `[now - window, now]` whose readings
    /// contain `register`. Points lacking the register are silently
    /// skipped; an unknown register or empty window yields an empty vec.
    pub fn query(&self, window: Duration, register: &str, now_ms: u64) -> Vec<(u64, RegisterValue)> {
        let cutoff = now_ms.saturating_sub(window.as_millis() as u64);
        self.points
            .read()
            .iter()
            .filter(|point| point.timestamp_ms >= cutoff && point.timestamp_ms <= now_ms)
            .filter_map(|point| {
                point
                    .readings
                    .get(register)
                    .map(|reading| (point.timestamp_ms, reading.value.clone()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use sunwatch_types::RegisterReading;

    fn point(timestamp_ms: u64, power: f64) -> HistoryPoint {
        let mut readings = BTreeMap::new();
        readings.insert(
            "total_active_power".to_string(),
            RegisterReading::numeric(power, "W", 5031),
        );
        HistoryPoint::new(timestamp_ms, readings)
    }

    #[test]
    fn append_and_len() {
        let buffer = HistoryBuffer::new(10);
        assert!(buffer.is_empty());
        buffer.append(point(1, 100.0));
        buffer.append(point(2, 200.0));
        assert_eq!(buffer.len(), 2);
    }

    #[test]
    fn overflow_evicts_oldest_first() {
        let buffer = HistoryBuffer::new(1440);
        for i in 0..1441u64 {
            buffer.append(point(i, i as f64));
        }

        assert_eq!(buffer.len(), 1440);
        // The point with the smallest original timestamp is gone
        let results = buffer.query(Duration::from_secs(60), "total_active_power", 1440);
        assert_eq!(results.first().unwrap().0, 1);
        assert_eq!(results.last().unwrap().0, 1440);
    }

    #[test]
    fn query_filters_by_window() {
        let buffer = HistoryBuffer::new(100);
        for i in 0..10u64 {
            buffer.append(point(i * 1000, i as f64));
        }

        // Window of 3 seconds ending at t=9000: points at 6000..=9000
        let results = buffer.query(Duration::from_secs(3), "total_active_power", 9000);
        let timestamps: Vec<u64> = results.iter().map(|(t, _)| *t).collect();
        assert_eq!(timestamps, vec![6000, 7000, 8000, 9000]);
    }

    #[test]
    fn query_returns_ascending_timestamps() {
        let buffer = HistoryBuffer::new(100);
        for i in 0..5u64 {
            buffer.append(point(i, i as f64));
        }

        let results = buffer.query(Duration::from_secs(60), "total_active_power", 10);
        let timestamps: Vec<u64> = results.iter().map(|(t, _)| *t).collect();
        let mut sorted = timestamps.clone();
        sorted.sort_unstable();
        assert_eq!(timestamps, sorted);
    }

    #[test]
    fn points_missing_the_register_are_skipped() {
        let buffer = HistoryBuffer::new(100);
        buffer.append(point(1000, 100.0));
        buffer.append(HistoryPoint::new(2000, BTreeMap::new()));
        buffer.append(point(3000, 300.0));

        let results = buffer.query(Duration::from_secs(60), "total_active_power", 3000);
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn unknown_register_yields_empty() {
        let buffer = HistoryBuffer::new(100);
        buffer.append(point(1000, 100.0));

        let results = buffer.query(Duration::from_secs(60), "battery_level", 1000);
        assert!(results.is_empty());
    }

    #[test]
    fn zero_window_keeps_only_points_at_now() {
        let buffer = HistoryBuffer::new(100);
        buffer.append(point(1000, 100.0));
        buffer.append(point(2000, 200.0));

        let results = buffer.query(Duration::ZERO, "total_active_power", 2000);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 2000);
    }

    #[test]
    fn points_newer_than_now_are_excluded() {
        let buffer = HistoryBuffer::new(100);
        buffer.append(point(1000, 100.0));
        buffer.append(point(5000, 500.0));

        let results = buffer.query(Duration::from_secs(60), "total_active_power", 2000);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, 1000);
    }
}
