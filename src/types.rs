use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One leg as delivered by the query layer (or the CSV adapter). Every field
/// is optional text; `normalize::normalize_row` is the only place that turns
/// it into a typed observation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLegRow {
    #[serde(rename = "date")]
    pub date: Option<String>,
    #[serde(rename = "direction")]
    pub direction: Option<String>,
    #[serde(rename = "status")]
    pub status: Option<String>,
    #[serde(rename = "route")]
    pub route: Option<String>,
    #[serde(rename = "airline_id")]
    pub airline_id: Option<String>,
    #[serde(rename = "airline_name")]
    pub airline_name: Option<String>,
    #[serde(rename = "airline_icao")]
    pub airline_icao: Option<String>,
    #[serde(rename = "operation_type_code")]
    pub operation_type_code: Option<String>,
    #[serde(rename = "operation_type_name")]
    pub operation_type_name: Option<String>,
    #[serde(rename = "passengers")]
    pub passengers: Option<String>,
    #[serde(rename = "infants")]
    pub infants: Option<String>,
    #[serde(rename = "baggage_kg")]
    pub baggage_kg: Option<String>,
    #[serde(rename = "cargo_kg")]
    pub cargo_kg: Option<String>,
    #[serde(rename = "mail_kg")]
    pub mail_kg: Option<String>,
    #[serde(rename = "available_seats")]
    pub available_seats: Option<String>,
    #[serde(rename = "aircraft_seats")]
    pub aircraft_seats: Option<String>,
    #[serde(rename = "ferry")]
    pub ferry: Option<String>,
    #[serde(rename = "scheduled_time")]
    pub scheduled_time: Option<String>,
    #[serde(rename = "actual_time")]
    pub actual_time: Option<String>,
    /// `CODE:MINUTES[:P]` entries separated by `;`, `P` marking the primary code.
    #[serde(rename = "delays")]
    pub delays: Option<String>,
    #[serde(rename = "other_country")]
    pub other_country: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Arrival,
    Departure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegStatus {
    Operated,
    Cancelled,
    Diverted,
    Scheduled,
    NotOperated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrafficClass {
    Domestic,
    International,
    /// Counterpart country unknown; left out of the traffic split.
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Autumn,
            _ => Season::Winter,
        }
    }

    /// Calendar months of the season; Winter wraps December with January and
    /// February of the same report year.
    pub fn months(self) -> [u32; 3] {
        match self {
            Season::Spring => [3, 4, 5],
            Season::Summer => [6, 7, 8],
            Season::Autumn => [9, 10, 11],
            Season::Winter => [12, 1, 2],
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Spring => "Spring (Mar-May)",
            Season::Summer => "Summer (Jun-Aug)",
            Season::Autumn => "Autumn (Sep-Nov)",
            Season::Winter => "Winter (Dec-Feb)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AirlineRef {
    pub id: Option<String>,
    pub name: String,
    pub icao_code: String,
}

impl AirlineRef {
    /// Grouping key: ICAO code, or the display name for carriers without one.
    pub fn key(&self) -> &str {
        if self.icao_code.is_empty() {
            &self.name
        } else {
            &self.icao_code
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationType {
    pub code: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelayRecord {
    pub code: String,
    pub minutes: u32,
    pub is_primary: bool,
}

/// A typed, immutable leg. Numeric fields absent in the raw row are stored
/// as 0 with the matching `has_*` flag cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightLegObservation {
    pub year: i32,
    pub month: u32,
    pub date: NaiveDate,
    pub direction: Direction,
    pub status: LegStatus,
    pub passengers: u64,
    pub has_passenger_data: bool,
    pub infants: u64,
    pub baggage_kg: u64,
    pub cargo_kg: u64,
    pub mail_kg: u64,
    pub available_seats: Option<u32>,
    pub is_ferry: bool,
    pub route: String,
    pub airline: AirlineRef,
    pub operation_type: OperationType,
    pub scheduled_time: Option<NaiveDateTime>,
    pub actual_time: Option<NaiveDateTime>,
    pub delay_records: Vec<DelayRecord>,
    pub country_of_other_end: Option<String>,
    pub traffic: TrafficClass,
}

impl FlightLegObservation {
    pub fn is_operated(&self) -> bool {
        self.status == LegStatus::Operated
    }

    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    pub fn season(&self) -> Season {
        Season::from_month(self.month)
    }

    /// Seats that count toward load factor: operated, non-ferry legs with a
    /// positive seat count.
    pub fn seats_for_load(&self) -> Option<u32> {
        if !self.is_operated() || self.is_ferry {
            return None;
        }
        self.available_seats.filter(|s| *s > 0)
    }

    /// Leg-level delay in minutes, `None` when the leg is not a delay sample.
    ///
    /// Measured times win over reported delay codes; early legs count as 0.
    /// Without times, the minutes of all attached delay records are summed.
    pub fn delay_minutes(&self) -> Option<f64> {
        if !self.is_operated() {
            return None;
        }
        if let (Some(sched), Some(actual)) = (self.scheduled_time, self.actual_time) {
            let minutes = ((actual - sched).num_seconds() as f64 / 60.0).round();
            return Some(minutes.max(0.0));
        }
        if self.delay_records.is_empty() {
            return None;
        }
        Some(self.delay_records.iter().map(|d| d.minutes as f64).sum())
    }
}

/// Caller-owned restriction applied before grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegFilter {
    pub operation_type: Option<String>,
}

impl LegFilter {
    pub const SCHEDULED_CODE: &'static str = "SCHEDULED";

    pub fn scheduled_only() -> Self {
        Self {
            operation_type: Some(Self::SCHEDULED_CODE.to_string()),
        }
    }

    pub fn matches(&self, obs: &FlightLegObservation) -> bool {
        match &self.operation_type {
            Some(code) => obs.operation_type.code.eq_ignore_ascii_case(code),
            None => true,
        }
    }
}

// ---------------------------------------------------------------------------
// Report shapes. Rates are rounded percentages or null, never absent.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub flights: u64,
    pub arrival_flights: u64,
    pub arrival_passengers: u64,
    pub arrival_infants: u64,
    pub arrival_baggage: u64,
    pub arrival_cargo: u64,
    pub arrival_mail: u64,
    pub departure_flights: u64,
    pub departure_passengers: u64,
    pub departure_infants: u64,
    pub departure_baggage: u64,
    pub departure_cargo: u64,
    pub departure_mail: u64,
    pub total_passengers: u64,
    pub total_infants: u64,
    pub total_baggage: u64,
    pub total_cargo: u64,
    pub total_mail: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotals {
    pub month_number: u32,
    pub month: String,
    pub flights: u64,
    pub arrival_flights: u64,
    pub departure_flights: u64,
    pub passengers: u64,
    pub arrival_passengers: u64,
    pub departure_passengers: u64,
    pub infants: u64,
    pub baggage: u64,
    pub cargo: u64,
    pub mail: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthLoadFactor {
    pub month_number: u32,
    pub month: String,
    pub passengers: u64,
    pub seats: u64,
    pub load_factor: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadFactorSummary {
    pub overall: Option<f64>,
    pub total_passengers: u64,
    pub total_seats: u64,
    pub by_month: Vec<MonthLoadFactor>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DelayPercentiles {
    pub p50: Option<f64>,
    pub p90: Option<f64>,
    pub p95: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthPunctuality {
    pub month_number: u32,
    pub month: String,
    pub on_time_rate: Option<f64>,
    pub avg_delay_minutes: Option<f64>,
    pub delay_samples: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PunctualitySummary {
    pub overall_on_time_rate: Option<f64>,
    pub overall_avg_delay_minutes: Option<f64>,
    pub total_delay_samples: u64,
    pub delay_percentiles: DelayPercentiles,
    pub by_month: Vec<MonthPunctuality>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Volatility {
    pub passengers_std_dev: Option<f64>,
    pub flights_std_dev: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthRate {
    pub month_number: u32,
    pub month: String,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopMonths {
    pub by_load_factor: Vec<MonthRate>,
    pub by_on_time_rate: Vec<MonthRate>,
}

/// Metrics shared by every route and airline group.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMetrics {
    pub flights: u64,
    pub operated_flights: u64,
    pub passengers: u64,
    pub seats: u64,
    pub avg_passengers: Option<f64>,
    pub load_factor: Option<f64>,
    pub delay_samples: u64,
    pub avg_delay_minutes: Option<f64>,
    pub on_time_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub route: String,
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineStats {
    pub airline: String,
    pub icao_code: String,
    pub airline_id: Option<String>,
    #[serde(flatten)]
    pub metrics: GroupMetrics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedViews<T> {
    pub top_by_passengers: Vec<T>,
    pub top_by_load_factor: Vec<T>,
    pub most_delayed: Vec<T>,
    pub least_delayed: Vec<T>,
    pub lowest_avg_passengers: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteShare {
    pub route: String,
    pub passengers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirlineShare {
    pub airline: String,
    pub icao_code: String,
    pub passengers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Concentration {
    pub top_routes_share: Option<f64>,
    pub top_airlines_share: Option<f64>,
    pub top_routes: Vec<RouteShare>,
    pub top_airlines: Vec<AirlineShare>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub total_legs: u64,
    pub operated_legs: u64,
    pub cancelled_legs: u64,
    pub diverted_legs: u64,
    pub scheduled_legs: u64,
    pub not_operated_legs: u64,
    pub operated_rate: Option<f64>,
    pub cancelled_rate: Option<f64>,
    pub diverted_rate: Option<f64>,
    pub scheduled_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSplit {
    pub domestic_passengers: u64,
    pub international_passengers: u64,
    pub domestic_flights: u64,
    pub international_flights: u64,
    pub domestic_rate: Option<f64>,
    pub international_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationTypeRow {
    pub code: String,
    pub name: String,
    pub flights: u64,
    pub passengers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayCodeRow {
    pub code: String,
    pub total_minutes: u64,
    pub occurrences: u64,
    pub primary_occurrences: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakDay {
    pub date: NaiveDate,
    pub passengers: u64,
    pub flights: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakHour {
    pub hour: u32,
    pub passengers: u64,
    pub flights: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodTotals {
    pub label: String,
    pub months: Vec<u32>,
    pub flights: u64,
    pub passengers: u64,
    pub avg_flights_per_month: f64,
    pub avg_passengers_per_month: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalityTrends {
    pub quarters: Vec<PeriodTotals>,
    pub seasons: Vec<PeriodTotals>,
}

/// Relative growth of a count metric.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountComparison {
    pub current: u64,
    pub previous: u64,
    pub growth: Option<f64>,
}

/// Ratio-typed metric: `growth` is relative (%), `delta` is the raw
/// difference in the metric's own unit (points for rates, minutes for delay).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatioComparison {
    pub current: Option<f64>,
    pub previous: Option<f64>,
    pub growth: Option<f64>,
    pub delta: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YoyComparison {
    pub previous_year: i32,
    pub flights: CountComparison,
    pub passengers: CountComparison,
    pub cargo: CountComparison,
    pub load_factor: RatioComparison,
    pub on_time_rate: RatioComparison,
    pub avg_delay_minutes: RatioComparison,
    pub cancelled_rate: RatioComparison,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyReport {
    pub year: i32,
    pub totals: Totals,
    pub monthly_breakdown: Vec<MonthlyTotals>,
    pub load_factor: LoadFactorSummary,
    pub punctuality: PunctualitySummary,
    pub routes: RankedViews<RouteStats>,
    pub airlines: RankedViews<AirlineStats>,
    pub routes_all: Vec<RouteStats>,
    pub airlines_all: Vec<AirlineStats>,
    pub concentration: Concentration,
    pub volatility: Volatility,
    pub seasonality_trends: SeasonalityTrends,
    pub status_breakdown: StatusBreakdown,
    pub traffic_split: TrafficSplit,
    pub peak_days: Vec<PeakDay>,
    pub peak_hours: Vec<PeakHour>,
    pub delay_codes_top: Vec<DelayCodeRow>,
    pub operation_type_breakdown: Vec<OperationTypeRow>,
    pub top_months: TopMonths,
    pub yoy_comparison: Option<YoyComparison>,
    pub has_previous_year_data: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupYearMetrics {
    pub year: i32,
    pub flights: u64,
    pub passengers: u64,
    pub load_factor: Option<f64>,
    pub avg_delay_minutes: Option<f64>,
    pub on_time_rate: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonRoute {
    pub route: String,
    pub total_passengers: u64,
    pub years_present: usize,
    pub per_year: Vec<GroupYearMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonAirline {
    pub airline: String,
    pub icao_code: String,
    pub total_passengers: u64,
    pub years_present: usize,
    pub per_year: Vec<GroupYearMetrics>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comparisons {
    pub common_routes: Vec<CommonRoute>,
    pub common_airlines: Vec<CommonAirline>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiYearReport {
    pub years: Vec<i32>,
    pub years_data: Vec<YearlyReport>,
    pub comparisons: Comparisons,
}
