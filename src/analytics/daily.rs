//! Per-day energy buckets for the bar chart.

use std::collections::HashMap;

use super::bundle::DailyEnergy;
use super::stats::round_to;
use crate::models::ParsedSample;

struct DayBucket<'a> {
    date: &'a str,
    min: f64,
    max: f64,
}

/// Counter growth per calendar date, in first-seen date order.
///
/// Dates come straight from the timestamp text; no timezone conversion.
pub fn daily_energy(samples: &[ParsedSample]) -> Vec<DailyEnergy> {
    // ---
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut buckets: Vec<DayBucket<'_>> = Vec::new();

    for sample in samples {
        let date = sample.date_key();
        match index.get(date) {
            Some(&i) => {
                let bucket = &mut buckets[i];
                bucket.min = bucket.min.min(sample.energy);
                bucket.max = bucket.max.max(sample.energy);
            }
            None => {
                index.insert(date, buckets.len());
                buckets.push(DayBucket {
                    date,
                    min: sample.energy,
                    max: sample.energy,
                });
            }
        }
    }

    buckets
        .into_iter()
        .map(|b| DailyEnergy {
            date: b.date.to_string(),
            energy: round_to(b.max - b.min, 4),
        })
        .collect()
}
