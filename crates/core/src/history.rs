use std::collections::VecDeque;

/// Samples kept for the CPU and memory charts.
pub const PERFORMANCE_CAPACITY: usize = 60;
/// Samples kept per device for the disk I/O chart.
pub const IO_CAPACITY: usize = 30;

/// Rolling history of samples for sparkline rendering.
///
/// Holds at most `capacity` values in chronological order; appending to a
/// full history evicts the oldest sample.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleHistory {
    samples:  VecDeque<f64>,
    capacity: usize,
}

impl SampleHistory {
    /// # Panics
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be non-zero");
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Push a new sample, evicting the oldest if at capacity.
    pub fn append(&mut self, value: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(value);
    }

    /// Current samples, oldest first.
    pub fn values(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Most recent sample.
    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    /// Largest sample in the window, `None` when empty.
    pub fn max(&self) -> Option<f64> {
        self.samples.iter().copied().reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_is_min_of_appends_and_capacity() {
        for n in [0usize, 1, 5, 9, 10, 11, 25] {
            let mut h = SampleHistory::new(10);
            for i in 0..n {
                h.append(i as f64);
            }
            assert_eq!(h.len(), n.min(10), "after {n} appends");
        }
    }

    #[test]
    fn keeps_most_recent_in_order() {
        let mut h = SampleHistory::new(3);
        for v in [1.0, 2.0, 3.0, 4.0, 5.0] {
            h.append(v);
        }
        assert_eq!(h.values(), vec![3.0, 4.0, 5.0]);
        assert_eq!(h.latest(), Some(5.0));
    }

    #[test]
    fn max_of_empty_is_none() {
        let mut h = SampleHistory::new(IO_CAPACITY);
        assert_eq!(h.max(), None);
        h.append(0.5);
        h.append(7.25);
        h.append(3.0);
        assert_eq!(h.max(), Some(7.25));
    }
}
