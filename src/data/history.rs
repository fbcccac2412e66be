//! Historical throughput tracking for sparklines and rates.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use super::normalize::NormalizedSnapshot;

/// Maximum number of historical snapshots to keep.
const MAX_HISTORY_SIZE: usize = 60;

/// Tracks per-service exchange totals over time.
///
/// Records one reading per applied snapshot to enable rate calculations
/// and sparkline trend indicators in the services view.
#[derive(Debug, Clone, Default)]
pub struct History {
    /// service name -> readings of summed exchangesTotal
    totals: HashMap<String, VecDeque<u64>>,
    timestamps: VecDeque<Instant>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the totals of a freshly applied snapshot.
    pub fn record(&mut self, snapshot: &NormalizedSnapshot) {
        for service in &snapshot.services {
            let total: u64 = service
                .routes
                .iter()
                .filter_map(|r| r.stats.exchanges_total)
                .sum();
            let readings = self.totals.entry(service.name.clone()).or_default();
            readings.push_back(total);
            if readings.len() > MAX_HISTORY_SIZE {
                readings.pop_front();
            }
        }

        self.timestamps.push_back(Instant::now());
        if self.timestamps.len() > MAX_HISTORY_SIZE {
            self.timestamps.pop_front();
        }
    }

    /// Sparkline data for a service's throughput, one level 0-7 per delta.
    ///
    /// Returns an empty Vec if there's not enough history.
    pub fn sparkline(&self, service: &str) -> Vec<u8> {
        let Some(values) = self.totals.get(service) else {
            return Vec::new();
        };
        if values.len() < 2 {
            return Vec::new();
        }

        let deltas: Vec<i64> =
            values.iter().zip(values.iter().skip(1)).map(|(a, b)| *b as i64 - *a as i64).collect();

        let max = deltas.iter().copied().max().unwrap_or(1).max(1);
        let min = deltas.iter().copied().min().unwrap_or(0).min(0);
        let range = (max - min).max(1) as f64;

        deltas
            .iter()
            .map(|&v| {
                let normalized = ((v - min) as f64 / range * 7.0) as u8;
                normalized.min(7)
            })
            .collect()
    }

    /// Exchanges per second over the last two readings, if computable.
    pub fn rate(&self, service: &str) -> Option<f64> {
        let readings = self.totals.get(service)?;
        if readings.len() < 2 || self.timestamps.len() < 2 {
            return None;
        }

        let current = *readings.back()?;
        let previous = *readings.get(readings.len() - 2)?;
        let delta = current as i64 - previous as i64;

        let current_time = self.timestamps.back()?;
        let previous_time = self.timestamps.get(self.timestamps.len() - 2)?;
        let elapsed = current_time.duration_since(*previous_time).as_secs_f64();

        if elapsed > 0.0 {
            Some(delta as f64 / elapsed)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::normalize::{NormalizedRoute, NormalizedService};
    use crate::source::RouteStats;

    fn snapshot_with_total(total: u64) -> NormalizedSnapshot {
        NormalizedSnapshot {
            name: "s".to_string(),
            last_updated: None,
            services: vec![NormalizedService {
                name: "orders".to_string(),
                routes: vec![NormalizedRoute {
                    stats: RouteStats {
                        exchanges_total: Some(total),
                        ..RouteStats::default()
                    },
                    ..NormalizedRoute::default()
                }],
                ..NormalizedService::default()
            }],
        }
    }

    #[test]
    fn test_sparkline_needs_two_readings() {
        let mut history = History::new();
        assert!(history.sparkline("orders").is_empty());

        history.record(&snapshot_with_total(10));
        assert!(history.sparkline("orders").is_empty());

        history.record(&snapshot_with_total(30));
        history.record(&snapshot_with_total(40));
        let spark = history.sparkline("orders");
        assert_eq!(spark.len(), 2);
        // The larger delta maps to the higher level
        assert!(spark[0] >= spark[1]);
    }

    #[test]
    fn test_rate_positive_for_growing_totals() {
        let mut history = History::new();
        history.record(&snapshot_with_total(10));
        history.record(&snapshot_with_total(40));

        let rate = history.rate("orders").unwrap();
        assert!(rate > 0.0);
        assert!(history.rate("unknown").is_none());
    }
}
