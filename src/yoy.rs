use crate::types::{CountComparison, RatioComparison, YearlyReport, YoyComparison};
use crate::util::{growth, round2};

/// Compares the headline metrics of two yearly reports.
pub fn compare(current: &YearlyReport, previous: &YearlyReport) -> YoyComparison {
    YoyComparison {
        previous_year: previous.year,
        flights: count(current.totals.flights, previous.totals.flights),
        passengers: count(current.totals.total_passengers, previous.totals.total_passengers),
        cargo: count(current.totals.total_cargo, previous.totals.total_cargo),
        load_factor: rate(current.load_factor.overall, previous.load_factor.overall),
        on_time_rate: rate(
            current.punctuality.overall_on_time_rate,
            previous.punctuality.overall_on_time_rate,
        ),
        avg_delay_minutes: rate(
            current.punctuality.overall_avg_delay_minutes,
            previous.punctuality.overall_avg_delay_minutes,
        ),
        cancelled_rate: rate(
            current.status_breakdown.cancelled_rate,
            previous.status_breakdown.cancelled_rate,
        ),
    }
}

fn count(current: u64, previous: u64) -> CountComparison {
    CountComparison {
        current,
        previous,
        growth: growth(current as f64, previous as f64),
    }
}

fn rate(current: Option<f64>, previous: Option<f64>) -> RatioComparison {
    let (growth, delta) = match (current, previous) {
        (Some(c), Some(p)) => (growth(c, p), Some(round2(c - p))),
        _ => (None, None),
    };
    RatioComparison {
        current,
        previous,
        growth,
        delta,
    }
}

impl YearlyReport {
    /// Returns this report with its year-over-year block filled against
    /// `previous`.
    pub fn with_comparison(self, previous: &YearlyReport) -> YearlyReport {
        let yoy = compare(&self, previous);
        YearlyReport {
            yoy_comparison: Some(yoy),
            has_previous_year_data: previous.totals.flights > 0,
            ..self
        }
    }
}
