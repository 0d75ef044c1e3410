//! Load factor, punctuality and dispersion metrics.
//!
//! The accumulators here are shared with the ranking engine so that group
//! metrics use exactly the same formulas as the yearly ones.

use crate::types::{
    DelayPercentiles, FlightLegObservation, LoadFactorSummary, MonthLoadFactor, MonthPunctuality,
    MonthRate, MonthlyTotals, PunctualitySummary, TopMonths, Volatility,
};
use crate::util::{month_label, percent, percentile_nearest_rank, population_std_dev, ratio};
use std::cmp::Ordering;

/// Industry on-time definition: a leg delayed by at most this many minutes.
pub const ON_TIME_THRESHOLD_MINUTES: f64 = 15.0;
pub const TOP_MONTHS_N: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadAccumulator {
    pub passengers: u64,
    pub seats: u64,
}

impl LoadAccumulator {
    pub fn add(&mut self, leg: &FlightLegObservation) {
        if let Some(seats) = leg.seats_for_load() {
            self.seats += seats as u64;
            self.passengers += leg.passengers;
        }
    }

    pub fn load_factor(&self) -> Option<f64> {
        percent(self.passengers, self.seats)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DelayAccumulator {
    pub samples: u64,
    pub total_minutes: f64,
    pub on_time: u64,
}

impl DelayAccumulator {
    /// Adds the leg's delay sample, returning it when the leg has one.
    pub fn add(&mut self, leg: &FlightLegObservation) -> Option<f64> {
        let minutes = leg.delay_minutes()?;
        self.samples += 1;
        self.total_minutes += minutes;
        if minutes <= ON_TIME_THRESHOLD_MINUTES {
            self.on_time += 1;
        }
        Some(minutes)
    }

    pub fn avg_delay(&self) -> Option<f64> {
        ratio(self.total_minutes, self.samples as f64)
    }

    pub fn on_time_rate(&self) -> Option<f64> {
        percent(self.on_time, self.samples)
    }
}

/// Overall load factor is pooled over the whole year, not averaged from the
/// monthly values.
pub fn load_factor_summary(legs: &[FlightLegObservation]) -> LoadFactorSummary {
    let mut overall = LoadAccumulator::default();
    let mut by_month = [LoadAccumulator::default(); 12];
    for leg in legs {
        overall.add(leg);
        if let Some(acc) = by_month.get_mut(leg.month.wrapping_sub(1) as usize) {
            acc.add(leg);
        }
    }

    LoadFactorSummary {
        overall: overall.load_factor(),
        total_passengers: overall.passengers,
        total_seats: overall.seats,
        by_month: by_month
            .iter()
            .zip(1u32..)
            .map(|(acc, m)| MonthLoadFactor {
                month_number: m,
                month: month_label(m),
                passengers: acc.passengers,
                seats: acc.seats,
                load_factor: acc.load_factor(),
            })
            .collect(),
    }
}

pub fn punctuality_summary(legs: &[FlightLegObservation]) -> PunctualitySummary {
    let mut overall = DelayAccumulator::default();
    let mut by_month = [DelayAccumulator::default(); 12];
    let mut samples = Vec::new();
    for leg in legs {
        if let Some(minutes) = overall.add(leg) {
            samples.push(minutes);
            if let Some(acc) = by_month.get_mut(leg.month.wrapping_sub(1) as usize) {
                acc.add(leg);
            }
        }
    }

    PunctualitySummary {
        overall_on_time_rate: overall.on_time_rate(),
        overall_avg_delay_minutes: overall.avg_delay(),
        total_delay_samples: overall.samples,
        delay_percentiles: delay_percentiles(samples),
        by_month: by_month
            .iter()
            .zip(1u32..)
            .map(|(acc, m)| MonthPunctuality {
                month_number: m,
                month: month_label(m),
                on_time_rate: acc.on_time_rate(),
                avg_delay_minutes: acc.avg_delay(),
                delay_samples: acc.samples,
            })
            .collect(),
    }
}

pub fn delay_percentiles(mut samples: Vec<f64>) -> DelayPercentiles {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    DelayPercentiles {
        p50: percentile_nearest_rank(&samples, 0.50),
        p90: percentile_nearest_rank(&samples, 0.90),
        p95: percentile_nearest_rank(&samples, 0.95),
    }
}

pub fn volatility(months: &[MonthlyTotals]) -> Volatility {
    let passengers: Vec<f64> = months.iter().map(|m| m.passengers as f64).collect();
    let flights: Vec<f64> = months.iter().map(|m| m.flights as f64).collect();
    Volatility {
        passengers_std_dev: population_std_dev(&passengers),
        flights_std_dev: population_std_dev(&flights),
    }
}

pub fn top_months(load: &LoadFactorSummary, punctuality: &PunctualitySummary) -> TopMonths {
    TopMonths {
        by_load_factor: best_months(
            load.by_month.iter().map(|m| (m.month_number, m.load_factor)),
        ),
        by_on_time_rate: best_months(
            punctuality.by_month.iter().map(|m| (m.month_number, m.on_time_rate)),
        ),
    }
}

fn best_months(values: impl Iterator<Item = (u32, Option<f64>)>) -> Vec<MonthRate> {
    let mut present: Vec<(u32, f64)> = values.filter_map(|(m, v)| Some((m, v?))).collect();
    present.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    present
        .into_iter()
        .take(TOP_MONTHS_N)
        .map(|(m, rate)| MonthRate {
            month_number: m,
            month: month_label(m),
            rate,
        })
        .collect()
}
