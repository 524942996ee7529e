//! Order-independent folding of sample summaries into run aggregates

use tally_core::types::{RunAggregates, SampleSummary};

/// Running totals over sample summaries
///
/// Sums are commutative, so the result does not depend on the order in
/// which samples completed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsAggregator {
    total: usize,
    correct: usize,
    latency_ms_sum: f64,
    tokens_sum: u64,
}

impl MetricsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one summary in
    pub fn record(&mut self, summary: &SampleSummary) {
        self.total += 1;
        if summary.is_correct {
            self.correct += 1;
        }
        self.latency_ms_sum += summary.latency_ms;
        self.tokens_sum = self.tokens_sum.saturating_add(summary.tokens_used);
    }

    /// Combine two partial folds
    pub fn merge(mut self, other: Self) -> Self {
        self.total += other.total;
        self.correct += other.correct;
        self.latency_ms_sum += other.latency_ms_sum;
        self.tokens_sum = self.tokens_sum.saturating_add(other.tokens_sum);
        self
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn correct(&self) -> usize {
        self.correct
    }

    /// Means and accuracy; all zero when nothing was recorded
    pub fn finish(&self) -> RunAggregates {
        if self.total == 0 {
            return RunAggregates::default();
        }
        let total = self.total as f64;
        RunAggregates {
            accuracy: self.correct as f64 / total,
            avg_latency_ms: self.latency_ms_sum / total,
            avg_tokens: self.tokens_sum as f64 / total,
        }
    }

    /// Fold a whole collection
    pub fn aggregate<'a>(summaries: impl IntoIterator<Item = &'a SampleSummary>) -> RunAggregates {
        summaries
            .into_iter()
            .fold(Self::new(), |mut acc, summary| {
                acc.record(summary);
                acc
            })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(is_correct: bool, latency_ms: f64, tokens_used: u64) -> SampleSummary {
        SampleSummary {
            is_correct,
            latency_ms,
            tokens_used,
        }
    }

    #[test]
    fn test_empty_is_all_zero() {
        let none: Vec<SampleSummary> = Vec::new();
        let aggregates = MetricsAggregator::aggregate(&none);
        assert_eq!(aggregates, RunAggregates::default());
    }

    #[test]
    fn test_means_and_accuracy() {
        let summaries = vec![
            summary(true, 100.0, 10),
            summary(false, 300.0, 20),
            summary(true, 200.0, 30),
            summary(true, 400.0, 40),
        ];
        let aggregates = MetricsAggregator::aggregate(&summaries);
        assert_eq!(aggregates.accuracy, 0.75);
        assert_eq!(aggregates.avg_latency_ms, 250.0);
        assert_eq!(aggregates.avg_tokens, 25.0);
    }

    #[test]
    fn test_order_and_partition_independent() {
        let summaries = vec![
            summary(true, 1.0, 1),
            summary(false, 2.0, 2),
            summary(true, 4.0, 3),
        ];
        let forward = MetricsAggregator::aggregate(&summaries);
        let reversed = MetricsAggregator::aggregate(summaries.iter().rev());
        assert_eq!(forward, reversed);

        let mut left = MetricsAggregator::new();
        left.record(&summaries[2]);
        let mut right = MetricsAggregator::new();
        right.record(&summaries[0]);
        right.record(&summaries[1]);
        assert_eq!(left.merge(right).finish(), forward);
    }
}
