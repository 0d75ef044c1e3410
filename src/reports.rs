use crate::monthly::{aggregate_months, yearly_totals};
use crate::ranking::{airline_stats, ranked_views, route_stats};
use crate::ratios::{load_factor_summary, punctuality_summary, top_months, volatility};
use crate::seasonality::seasonality;
use crate::structure::{
    concentration, delay_code_leaderboard, operation_type_breakdown, peak_days, peak_hours,
    status_breakdown, traffic_split,
};
use crate::types::{FlightLegObservation, YearlyReport};
use std::borrow::Cow;
use tracing::debug;

/// Runs the single-year pipeline over already normalized legs. Legs from
/// other years are ignored. The YoY block is left empty; see
/// [`YearlyReport::with_comparison`].
pub fn build_yearly_report(year: i32, legs: &[FlightLegObservation]) -> YearlyReport {
    let legs: Cow<[FlightLegObservation]> = if legs.iter().all(|l| l.year == year) {
        Cow::Borrowed(legs)
    } else {
        Cow::Owned(legs.iter().filter(|l| l.year == year).cloned().collect())
    };
    let legs = legs.as_ref();
    debug!(year, legs = legs.len(), "building yearly report");

    let monthly_breakdown = aggregate_months(legs);
    let totals = yearly_totals(legs, &monthly_breakdown);

    let routes_all = route_stats(legs);
    let airlines_all = airline_stats(legs);

    let load_factor = load_factor_summary(legs);
    let punctuality = punctuality_summary(legs);
    let top_months = top_months(&load_factor, &punctuality);
    let volatility = volatility(&monthly_breakdown);

    YearlyReport {
        year,
        routes: ranked_views(&routes_all),
        airlines: ranked_views(&airlines_all),
        concentration: concentration(&routes_all, &airlines_all, totals.total_passengers),
        status_breakdown: status_breakdown(legs),
        traffic_split: traffic_split(legs, totals.total_passengers),
        peak_days: peak_days(legs),
        peak_hours: peak_hours(legs),
        delay_codes_top: delay_code_leaderboard(legs),
        operation_type_breakdown: operation_type_breakdown(legs),
        seasonality_trends: seasonality(&monthly_breakdown),
        volatility,
        top_months,
        load_factor,
        punctuality,
        routes_all,
        airlines_all,
        monthly_breakdown,
        totals,
        yoy_comparison: None,
        has_previous_year_data: false,
    }
}
