//! Energy totals and the cost figures derived from them.
//!
//! The energy channel is a cumulative counter. Its maximum is reported as the
//! total, which only holds while the device never resets the counter; a reset
//! (reboot, overflow) yields stale or negative figures and is not detected.

use chrono::{DateTime, TimeZone, Utc};

use super::stats::{max_of, min_of, positive_values, round_to};
use crate::models::ParsedSample;

/// Days used to extrapolate today's cost to a month.
pub const DAYS_PER_MONTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnergyStats {
    // ---
    /// Highest positive counter value, 4 dp.
    pub total: f64,
    /// Counter growth since local midnight, 4 dp.
    pub today: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CostStats {
    // ---
    pub energy_cost: f64,
    pub daily_cost: f64,
    pub monthly_projection: f64,
}

impl EnergyStats {
    // ---
    /// `now` fixes the calendar day (and timezone) that counts as today.
    pub fn from_samples<Tz: TimeZone>(samples: &[ParsedSample], now: &DateTime<Tz>) -> Self {
        // ---
        let total = max_of(&positive_values(samples, |s| s.energy)).map_or(0.0, |v| round_to(v, 4));

        let today = match start_of_day(now) {
            Some(midnight) => {
                let values: Vec<f64> = samples
                    .iter()
                    .filter(|s| s.recorded_at.is_some_and(|at| at.with_timezone(&Utc) >= midnight))
                    .map(|s| s.energy)
                    .filter(|e| *e > 0.0)
                    .collect();
                match (max_of(&values), min_of(&values)) {
                    (Some(max), Some(min)) => round_to(max - min, 4),
                    _ => 0.0,
                }
            }
            None => 0.0,
        };

        Self { total, today }
    }

    pub fn costs(&self, tariff: f64) -> CostStats {
        // ---
        let daily_cost = round_to(self.today * tariff, 2);
        CostStats {
            energy_cost: round_to(self.total * tariff, 2),
            daily_cost,
            monthly_projection: round_to(daily_cost * DAYS_PER_MONTH, 2),
        }
    }
}

/// Midnight of `now`'s calendar day in `now`'s own timezone.
fn start_of_day<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Utc>> {
    // ---
    let midnight = now.date_naive().and_hms_opt(0, 0, 0)?;
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
