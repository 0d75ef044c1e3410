//! Route and airline grouping with ordered top/bottom views.

use crate::ratios::{DelayAccumulator, LoadAccumulator};
use crate::types::{AirlineStats, FlightLegObservation, GroupMetrics, RankedViews, RouteStats};
use crate::util::ratio;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Length of every ranked view.
pub const RANKING_TOP_N: usize = 5;
/// Groups with fewer flights than this are left out of every ranked view.
pub const MIN_GROUP_FLIGHTS: u64 = 1;

/// A grouped row that can be ranked: exposes its tie-break key and metrics.
pub trait RankedGroup: Clone {
    fn group_key(&self) -> &str;
    fn metrics(&self) -> &GroupMetrics;
}

impl RankedGroup for RouteStats {
    fn group_key(&self) -> &str {
        &self.route
    }

    fn metrics(&self) -> &GroupMetrics {
        &self.metrics
    }
}

impl RankedGroup for AirlineStats {
    fn group_key(&self) -> &str {
        if self.icao_code.is_empty() {
            &self.airline
        } else {
            &self.icao_code
        }
    }

    fn metrics(&self) -> &GroupMetrics {
        &self.metrics
    }
}

#[derive(Debug, Default)]
struct GroupAccumulator {
    flights: u64,
    operated: u64,
    passengers: u64,
    flights_with_passenger_data: u64,
    load: LoadAccumulator,
    delay: DelayAccumulator,
}

impl GroupAccumulator {
    fn add(&mut self, leg: &FlightLegObservation) {
        self.flights += 1;
        if leg.is_operated() {
            self.operated += 1;
        }
        self.passengers += leg.passengers;
        if leg.has_passenger_data {
            self.flights_with_passenger_data += 1;
        }
        self.load.add(leg);
        self.delay.add(leg);
    }

    fn finish(&self) -> GroupMetrics {
        GroupMetrics {
            flights: self.flights,
            operated_flights: self.operated,
            passengers: self.passengers,
            seats: self.load.seats,
            avg_passengers: ratio(self.passengers as f64, self.flights_with_passenger_data as f64),
            load_factor: self.load.load_factor(),
            delay_samples: self.delay.samples,
            avg_delay_minutes: self.delay.avg_delay(),
            on_time_rate: self.delay.on_time_rate(),
        }
    }
}

/// All routes, sorted by passengers descending then route ascending.
pub fn route_stats(legs: &[FlightLegObservation]) -> Vec<RouteStats> {
    let mut groups: BTreeMap<&str, GroupAccumulator> = BTreeMap::new();
    for leg in legs {
        groups.entry(leg.route.as_str()).or_default().add(leg);
    }
    let mut rows: Vec<RouteStats> = groups
        .into_iter()
        .map(|(route, acc)| RouteStats {
            route: route.to_string(),
            metrics: acc.finish(),
        })
        .collect();
    sort_by_passengers(&mut rows);
    rows
}

/// All airlines keyed by ICAO code, sorted like [`route_stats`].
pub fn airline_stats(legs: &[FlightLegObservation]) -> Vec<AirlineStats> {
    let mut groups: BTreeMap<&str, (&FlightLegObservation, GroupAccumulator)> = BTreeMap::new();
    for leg in legs {
        groups
            .entry(leg.airline.key())
            .or_insert_with(|| (leg, GroupAccumulator::default()))
            .1
            .add(leg);
    }
    let mut rows: Vec<AirlineStats> = groups
        .into_values()
        .map(|(first, acc)| AirlineStats {
            airline: first.airline.name.clone(),
            icao_code: first.airline.icao_code.clone(),
            airline_id: first.airline.id.clone(),
            metrics: acc.finish(),
        })
        .collect();
    sort_by_passengers(&mut rows);
    rows
}

fn sort_by_passengers<T: RankedGroup>(rows: &mut [T]) {
    rows.sort_by(|a, b| {
        b.metrics()
            .passengers
            .cmp(&a.metrics().passengers)
            .then_with(|| a.group_key().cmp(b.group_key()))
    });
}

#[derive(Clone, Copy)]
enum Order {
    Asc,
    Desc,
}

pub fn ranked_views<T: RankedGroup>(all: &[T]) -> RankedViews<T> {
    RankedViews {
        top_by_passengers: top_by(all, |m| Some(m.passengers as f64), Order::Desc),
        top_by_load_factor: top_by(all, |m| m.load_factor, Order::Desc),
        most_delayed: top_by(all, |m| m.avg_delay_minutes, Order::Desc),
        least_delayed: top_by(all, |m| m.avg_delay_minutes, Order::Asc),
        lowest_avg_passengers: top_by(all, |m| m.avg_passengers, Order::Asc),
    }
}

/// Eligible groups with a value, ordered by it and then by key ascending.
fn top_by<T, F>(all: &[T], value: F, order: Order) -> Vec<T>
where
    T: RankedGroup,
    F: Fn(&GroupMetrics) -> Option<f64>,
{
    let mut eligible: Vec<(f64, &T)> = all
        .iter()
        .filter(|g| g.metrics().flights >= MIN_GROUP_FLIGHTS)
        .filter_map(|g| value(g.metrics()).map(|v| (v, g)))
        .collect();
    eligible.sort_by(|a, b| {
        let by_value = a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal);
        let by_value = match order {
            Order::Asc => by_value,
            Order::Desc => by_value.reverse(),
        };
        by_value.then_with(|| a.1.group_key().cmp(b.1.group_key()))
    });
    eligible
        .into_iter()
        .take(RANKING_TOP_N)
        .map(|(_, g)| g.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{leg, LegExt};

    fn routes(views: &[RouteStats]) -> Vec<&str> {
        views.iter().map(|r| r.route.as_str()).collect()
    }

    #[test]
    fn groups_routes_with_scoped_metrics() {
        let legs = vec![
            leg("2024-01-01", "TZL-MLH", 100).seats(150).delayed(0),
            leg("2024-01-02", "TZL-MLH", 50).seats(150).delayed(30),
            leg("2024-01-03", "TZL-BSL", 20).seats(100),
        ];
        let all = route_stats(&legs);
        assert_eq!(routes(&all), vec!["TZL-MLH", "TZL-BSL"]);
        let mlh = &all[0].metrics;
        assert_eq!(mlh.flights, 2);
        assert_eq!(mlh.passengers, 150);
        assert_eq!(mlh.avg_passengers, Some(75.0));
        assert_eq!(mlh.load_factor, Some(50.0));
        assert_eq!(mlh.avg_delay_minutes, Some(15.0));
        assert_eq!(mlh.on_time_rate, Some(50.0));
        let bsl = &all[1].metrics;
        assert_eq!(bsl.delay_samples, 0);
        assert_eq!(bsl.avg_delay_minutes, None);
        assert_eq!(bsl.on_time_rate, None);
    }

    #[test]
    fn average_passengers_ignores_legs_without_passenger_data() {
        let mut blank = leg("2024-01-01", "R", 0);
        blank.has_passenger_data = false;
        let all = route_stats(&[leg("2024-01-01", "R", 80), blank]);
        assert_eq!(all[0].metrics.flights, 2);
        assert_eq!(all[0].metrics.avg_passengers, Some(80.0));
    }

    #[test]
    fn airlines_group_by_icao_and_fall_back_to_name() {
        let legs = vec![
            leg("2024-01-01", "R", 10).airline("WZZ", "Wizz Air"),
            leg("2024-01-01", "R", 30).airline("WZZ", "Wizz Air Hungary"),
            leg("2024-01-01", "R", 5).airline("", "Private"),
        ];
        let all = airline_stats(&legs);
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].icao_code, "WZZ");
        assert_eq!(all[0].airline, "Wizz Air");
        assert_eq!(all[0].metrics.passengers, 40);
        assert_eq!(all[1].group_key(), "Private");
    }

    #[test]
    fn views_are_capped_and_tie_broken_by_key() {
        let legs: Vec<_> = ["F", "B", "E", "A", "D", "C", "G"]
            .iter()
            .map(|r| leg("2024-01-01", r, 10))
            .collect();
        let views = ranked_views(&route_stats(&legs));
        assert_eq!(routes(&views.top_by_passengers), vec!["A", "B", "C", "D", "E"]);
        assert_eq!(routes(&views.lowest_avg_passengers), vec!["A", "B", "C", "D", "E"]);
    }

    #[test]
    fn delay_views_exclude_groups_without_samples() {
        let legs = vec![
            leg("2024-01-01", "LATE", 10).delayed(45),
            leg("2024-01-01", "MID", 10).delayed(10),
            leg("2024-01-01", "EARLY", 10).delayed(0),
            leg("2024-01-01", "NODATA", 10),
        ];
        let views = ranked_views(&route_stats(&legs));
        assert_eq!(routes(&views.most_delayed), vec!["LATE", "MID", "EARLY"]);
        assert_eq!(routes(&views.least_delayed), vec!["EARLY", "MID", "LATE"]);
        assert!(views.top_by_load_factor.is_empty());
    }

    #[test]
    fn load_factor_view_orders_descending() {
        let legs = vec![
            leg("2024-01-01", "LOW", 30).seats(100),
            leg("2024-01-01", "HIGH", 95).seats(100),
        ];
        let views = ranked_views(&route_stats(&legs));
        assert_eq!(routes(&views.top_by_load_factor), vec!["HIGH", "LOW"]);
    }
}
