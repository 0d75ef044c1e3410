//! Traffic structure: concentration, status mix, domestic split,
//! operation types, delay codes and peak periods.

use crate::types::{
    AirlineShare, AirlineStats, Concentration, DelayCodeRow, FlightLegObservation, LegStatus,
    OperationTypeRow, PeakDay, PeakHour, RouteShare, RouteStats, StatusBreakdown, TrafficClass,
    TrafficSplit,
};
use crate::util::percent;
use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;

/// Groups counted in the concentration share.
pub const CONCENTRATION_TOP_N: usize = 3;
pub const DELAY_CODES_TOP_N: usize = 10;
pub const PEAK_TOP_N: usize = 5;

/// `routes` and `airlines` must already be sorted by passengers descending
/// (as the ranking engine emits them).
pub fn concentration(
    routes: &[RouteStats],
    airlines: &[AirlineStats],
    total_passengers: u64,
) -> Concentration {
    let top_routes: Vec<RouteShare> = routes
        .iter()
        .take(CONCENTRATION_TOP_N)
        .map(|r| RouteShare {
            route: r.route.clone(),
            passengers: r.metrics.passengers,
        })
        .collect();
    let top_airlines: Vec<AirlineShare> = airlines
        .iter()
        .take(CONCENTRATION_TOP_N)
        .map(|a| AirlineShare {
            airline: a.airline.clone(),
            icao_code: a.icao_code.clone(),
            passengers: a.metrics.passengers,
        })
        .collect();

    let route_sum: u64 = top_routes.iter().map(|r| r.passengers).sum();
    let airline_sum: u64 = top_airlines.iter().map(|a| a.passengers).sum();
    Concentration {
        top_routes_share: percent(route_sum, total_passengers),
        top_airlines_share: percent(airline_sum, total_passengers),
        top_routes,
        top_airlines,
    }
}

/// Counted over every leg of the year, whatever its status.
pub fn status_breakdown(legs: &[FlightLegObservation]) -> StatusBreakdown {
    let mut s = StatusBreakdown {
        total_legs: legs.len() as u64,
        ..Default::default()
    };
    for leg in legs {
        match leg.status {
            LegStatus::Operated => s.operated_legs += 1,
            LegStatus::Cancelled => s.cancelled_legs += 1,
            LegStatus::Diverted => s.diverted_legs += 1,
            LegStatus::Scheduled => s.scheduled_legs += 1,
            LegStatus::NotOperated => s.not_operated_legs += 1,
        }
    }
    s.operated_rate = percent(s.operated_legs, s.total_legs);
    s.cancelled_rate = percent(s.cancelled_legs, s.total_legs);
    s.diverted_rate = percent(s.diverted_legs, s.total_legs);
    s.scheduled_rate = percent(s.scheduled_legs, s.total_legs);
    s
}

/// Rates are shares of all passengers in the year; unclassified legs
/// count toward neither side.
pub fn traffic_split(legs: &[FlightLegObservation], total_passengers: u64) -> TrafficSplit {
    let mut t = TrafficSplit::default();
    for leg in legs {
        match leg.traffic {
            TrafficClass::Domestic => {
                t.domestic_passengers += leg.passengers;
                t.domestic_flights += 1;
            }
            TrafficClass::International => {
                t.international_passengers += leg.passengers;
                t.international_flights += 1;
            }
            TrafficClass::Unclassified => {}
        }
    }
    t.domestic_rate = percent(t.domestic_passengers, total_passengers);
    t.international_rate = percent(t.international_passengers, total_passengers);
    t
}

pub fn operation_type_breakdown(legs: &[FlightLegObservation]) -> Vec<OperationTypeRow> {
    let mut map: BTreeMap<&str, OperationTypeRow> = BTreeMap::new();
    for leg in legs {
        let e = map
            .entry(leg.operation_type.code.as_str())
            .or_insert_with(|| OperationTypeRow {
                code: leg.operation_type.code.clone(),
                name: leg.operation_type.name.clone(),
                flights: 0,
                passengers: 0,
            });
        e.flights += 1;
        e.passengers += leg.passengers;
    }
    let mut rows: Vec<OperationTypeRow> = map.into_values().collect();
    rows.sort_by(|a, b| b.passengers.cmp(&a.passengers).then_with(|| a.code.cmp(&b.code)));
    rows
}

/// Delay codes ranked by total minutes, covering every leg that carries
/// delay records.
pub fn delay_code_leaderboard(legs: &[FlightLegObservation]) -> Vec<DelayCodeRow> {
    let mut map: BTreeMap<&str, DelayCodeRow> = BTreeMap::new();
    for record in legs.iter().flat_map(|l| l.delay_records.iter()) {
        let e = map.entry(record.code.as_str()).or_insert_with(|| DelayCodeRow {
            code: record.code.clone(),
            total_minutes: 0,
            occurrences: 0,
            primary_occurrences: 0,
        });
        e.total_minutes += record.minutes as u64;
        e.occurrences += 1;
        if record.is_primary {
            e.primary_occurrences += 1;
        }
    }
    let mut rows: Vec<DelayCodeRow> = map.into_values().collect();
    rows.sort_by(|a, b| {
        b.total_minutes
            .cmp(&a.total_minutes)
            .then_with(|| a.code.cmp(&b.code))
    });
    rows.truncate(DELAY_CODES_TOP_N);
    rows
}

pub fn peak_days(legs: &[FlightLegObservation]) -> Vec<PeakDay> {
    let mut map: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    for leg in legs {
        let e = map.entry(leg.date).or_default();
        e.0 += leg.passengers;
        e.1 += 1;
    }
    let mut rows: Vec<PeakDay> = map
        .into_iter()
        .map(|(date, (passengers, flights))| PeakDay {
            date,
            passengers,
            flights,
        })
        .collect();
    rows.sort_by(|a, b| b.passengers.cmp(&a.passengers).then_with(|| a.date.cmp(&b.date)));
    rows.truncate(PEAK_TOP_N);
    rows
}

/// Hour-of-day buckets (1 hour wide) keyed on the actual time, summed
/// across all days of the year.
pub fn peak_hours(legs: &[FlightLegObservation]) -> Vec<PeakHour> {
    let mut buckets = [(0u64, 0u64); 24];
    for leg in legs {
        if let Some(actual) = leg.actual_time {
            let b = &mut buckets[actual.hour() as usize];
            b.0 += leg.passengers;
            b.1 += 1;
        }
    }
    let mut rows: Vec<PeakHour> = buckets
        .iter()
        .zip(0u32..)
        .filter(|((_, flights), _)| *flights > 0)
        .map(|(&(passengers, flights), hour)| PeakHour {
            hour,
            passengers,
            flights,
        })
        .collect();
    rows.sort_by(|a, b| b.passengers.cmp(&a.passengers).then_with(|| a.hour.cmp(&b.hour)));
    rows.truncate(PEAK_TOP_N);
    rows
}
