//! Fixed-capacity sliding window with incrementally maintained moments

use std::collections::VecDeque;

/// Sliding window over the most recent `capacity` samples.
///
/// The running sum and sum of squares always match the retained samples;
/// they are updated on push/evict rather than recomputed.
#[derive(Debug, Clone)]
pub struct RollingWindowStats {
    capacity: usize,
    samples: VecDeque<f64>,
    sum: f64,
    sum_sq: f64,
}

impl RollingWindowStats {
    /// Create a window holding at most `capacity` samples (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity + 1),
            sum: 0.0,
            sum_sq: 0.0,
        }
    }

    /// Append a sample, evicting the oldest one once the window is over capacity
    pub fn push(&mut self, x: f64) {
        self.samples.push_back(x);
        self.sum += x;
        self.sum_sq += x * x;

        if self.samples.len() > self.capacity {
            if let Some(old) = self.samples.pop_front() {
                self.sum -= old;
                self.sum_sq -= old * old;
            }
        }
    }

    /// Arithmetic mean of the window, 0 when empty
    pub fn mean(&self) -> f64 {
        if self.samples.is_empty() {
            0.0
        } else {
            self.sum / self.samples.len() as f64
        }
    }

    /// Biased (population) variance, 0 with fewer than two samples.
    ///
    /// Clamped at zero: for near-constant streams the mean-of-squares minus
    /// squared-mean difference can dip below zero in floating point.
    pub fn variance(&self) -> f64 {
        let n = self.samples.len();
        if n < 2 {
            return 0.0;
        }
        let m = self.mean();
        (self.sum_sq / n as f64 - m * m).max(0.0)
    }

    /// Drop every sample and zero the accumulators
    pub fn reset(&mut self) {
        self.samples.clear();
        self.sum = 0.0;
        self.sum_sq = 0.0;
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

    /// Retained samples, oldest first
    pub fn samples(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_empty_window() {
        let stats = RollingWindowStats::new(4);
        assert_eq!(stats.mean(), 0.0);
        assert_eq!(stats.variance(), 0.0);
        assert!(stats.is_empty());
    }

    #[test]
    fn test_single_sample_has_zero_variance() {
        let mut stats = RollingWindowStats::new(4);
        stats.push(3.5);
        assert_eq!(stats.mean(), 3.5);
        assert_eq!(stats.variance(), 0.0);
    }

    #[test]
    fn test_capacity_three_scenario() {
        let mut stats = RollingWindowStats::new(3);
        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        assert!(approx(stats.mean(), 2.0));
        assert!(approx(stats.variance(), 2.0 / 3.0));

        stats.push(4.0);
        assert_eq!(stats.samples().collect::<Vec<_>>(), vec![2.0, 3.0, 4.0]);
        assert!(approx(stats.mean(), 3.0));
    }

    #[test]
    fn test_reset_clears_accumulators() {
        let mut stats = RollingWindowStats::new(3);
        stats.push(10.0);
        stats.push(20.0);
        stats.reset();
        assert!(stats.is_empty());
        assert_eq!(stats.mean(), 0.0);

        stats.push(1.0);
        assert_eq!(stats.mean(), 1.0);
    }

    #[test]
    fn test_zero_capacity_is_promoted() {
        let mut stats = RollingWindowStats::new(0);
        stats.push(1.0);
        stats.push(2.0);
        assert_eq!(stats.capacity(), 1);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats.mean(), 2.0);
    }

    #[test]
    fn test_near_constant_stream_never_negative() {
        let mut stats = RollingWindowStats::new(600);
        for i in 0..50_000 {
            stats.push(0.1 + if i % 7 == 0 { 1e-12 } else { 0.0 });
            assert!(stats.variance() >= 0.0);
        }
    }

    proptest! {
        #[test]
        fn test_window_matches_recomputation(
            values in prop::collection::vec(-1000.0f64..1000.0, 1..400),
            capacity in 1usize..64,
        ) {
            let mut stats = RollingWindowStats::new(capacity);
            for v in &values {
                stats.push(*v);
                prop_assert!(stats.variance() >= 0.0);
            }

            let start = values.len().saturating_sub(capacity);
            let expected: Vec<f64> = values[start..].to_vec();
            prop_assert_eq!(stats.samples().collect::<Vec<_>>(), expected.clone());

            let n = expected.len() as f64;
            let mean = expected.iter().sum::<f64>() / n;
            prop_assert!((stats.mean() - mean).abs() < 1e-6);
        }
    }
}
