use crate::types::{MonthlyTotals, PeriodTotals, Season, SeasonalityTrends};
use crate::util::round2;

const QUARTERS: [(&str, [u32; 3]); 4] = [
    ("Q1 (Jan-Mar)", [1, 2, 3]),
    ("Q2 (Apr-Jun)", [4, 5, 6]),
    ("Q3 (Jul-Sep)", [7, 8, 9]),
    ("Q4 (Oct-Dec)", [10, 11, 12]),
];

/// Regroups the monthly breakdown into calendar quarters and
/// meteorological seasons.
pub fn seasonality(months: &[MonthlyTotals]) -> SeasonalityTrends {
    SeasonalityTrends {
        quarters: QUARTERS
            .iter()
            .map(|(label, ms)| period(label, ms, months))
            .collect(),
        seasons: Season::ALL
            .iter()
            .map(|s| period(s.label(), &s.months(), months))
            .collect(),
    }
}

fn period(label: &str, period_months: &[u32], months: &[MonthlyTotals]) -> PeriodTotals {
    let (flights, passengers) = months
        .iter()
        .filter(|m| period_months.contains(&m.month_number))
        .fold((0u64, 0u64), |(f, p), m| (f + m.flights, p + m.passengers));
    let n = period_months.len() as f64;
    PeriodTotals {
        label: label.to_string(),
        months: period_months.to_vec(),
        flights,
        passengers,
        avg_flights_per_month: round2(flights as f64 / n),
        avg_passengers_per_month: round2(passengers as f64 / n),
    }
}
