//! Record normalizer: the single ingress from loosely typed rows into
//! [`FlightLegObservation`].

use crate::types::{
    AirlineRef, DelayRecord, Direction, FlightLegObservation, LegFilter, LegStatus,
    OperationType, RawLegRow, TrafficClass,
};
use crate::util::{parse_date_safe, parse_datetime_safe, parse_flag, parse_u64_safe};
use chrono::Datelike;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

static STATUS_ALIASES: Lazy<HashMap<&'static str, LegStatus>> = Lazy::new(|| {
    HashMap::from([
        ("OPERATED", LegStatus::Operated),
        ("OPER", LegStatus::Operated),
        ("LANDED", LegStatus::Operated),
        ("DEPARTED", LegStatus::Operated),
        ("CANCELLED", LegStatus::Cancelled),
        ("CANCELED", LegStatus::Cancelled),
        ("CNL", LegStatus::Cancelled),
        ("DIVERTED", LegStatus::Diverted),
        ("DIV", LegStatus::Diverted),
        ("SCHEDULED", LegStatus::Scheduled),
        ("SCH", LegStatus::Scheduled),
        ("NOT_OPERATED", LegStatus::NotOperated),
        ("NOT OPERATED", LegStatus::NotOperated),
        ("NOOP", LegStatus::NotOperated),
    ])
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RowRejection {
    #[error("missing date")]
    MissingDate,
    #[error("unparseable date `{0}`")]
    InvalidDate(String),
    #[error("missing direction")]
    MissingDirection,
    #[error("unknown direction `{0}`")]
    InvalidDirection(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub kept: usize,
    pub rejected: usize,
    pub outside_year: usize,
    pub filtered_out: usize,
    /// Kept legs with neither scheduled nor actual time.
    pub without_time_data: usize,
}

/// Converts one raw row. Numeric cells that are missing or malformed become
/// 0 (with the `has_*` flag cleared where averages need it); only the fields
/// that place a leg in time and direction are mandatory.
pub fn normalize_row(
    row: &RawLegRow,
    home_country: &str,
) -> Result<FlightLegObservation, RowRejection> {
    let raw_date = row
        .date
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .ok_or(RowRejection::MissingDate)?;
    let date = parse_date_safe(Some(raw_date))
        .ok_or_else(|| RowRejection::InvalidDate(raw_date.trim().to_string()))?;

    let direction = parse_direction(row.direction.as_deref())?;

    let scheduled_time = parse_datetime_safe(row.scheduled_time.as_deref());
    let actual_time = parse_datetime_safe(row.actual_time.as_deref());
    let status = parse_status(row.status.as_deref(), actual_time.is_some());

    let is_ferry = parse_flag(row.ferry.as_deref());
    let passengers_raw = parse_u64_safe(row.passengers.as_deref());
    let passengers = if is_ferry { 0 } else { passengers_raw.unwrap_or(0) };

    let available_seats = parse_u64_safe(row.available_seats.as_deref())
        .filter(|s| *s > 0)
        .or_else(|| parse_u64_safe(row.aircraft_seats.as_deref()).filter(|s| *s > 0))
        .and_then(|s| u32::try_from(s).ok());

    let airline = AirlineRef {
        id: non_empty(row.airline_id.as_deref()),
        name: non_empty(row.airline_name.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
        icao_code: non_empty(row.airline_icao.as_deref())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_default(),
    };
    let operation_type = OperationType {
        code: non_empty(row.operation_type_code.as_deref())
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string()),
        name: non_empty(row.operation_type_name.as_deref()).unwrap_or_else(|| "Unknown".to_string()),
    };

    let country_of_other_end = non_empty(row.other_country.as_deref());
    let traffic = classify_traffic(country_of_other_end.as_deref(), home_country);

    Ok(FlightLegObservation {
        year: date.year(),
        month: date.month(),
        date,
        direction,
        status,
        passengers,
        has_passenger_data: passengers_raw.is_some() || is_ferry,
        infants: parse_u64_safe(row.infants.as_deref()).unwrap_or(0),
        baggage_kg: parse_u64_safe(row.baggage_kg.as_deref()).unwrap_or(0),
        cargo_kg: parse_u64_safe(row.cargo_kg.as_deref()).unwrap_or(0),
        mail_kg: parse_u64_safe(row.mail_kg.as_deref()).unwrap_or(0),
        available_seats,
        is_ferry,
        route: non_empty(row.route.as_deref())
            .map(|r| r.to_ascii_uppercase())
            .unwrap_or_else(|| "N/A".to_string()),
        airline,
        operation_type,
        scheduled_time,
        actual_time,
        delay_records: parse_delay_records(row.delays.as_deref()),
        country_of_other_end,
        traffic,
    })
}

/// Normalizes a batch for `year`, dropping rows outside the year or not
/// matching `filter`. Bad rows are counted and logged, never fatal.
pub fn normalize(
    rows: &[RawLegRow],
    year: i32,
    home_country: &str,
    filter: &LegFilter,
) -> (Vec<FlightLegObservation>, NormalizeReport) {
    let mut report = NormalizeReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut kept = Vec::with_capacity(rows.len());

    for row in rows {
        let obs = match normalize_row(row, home_country) {
            Ok(o) => o,
            Err(e) => {
                debug!(error = %e, "rejected leg row");
                report.rejected += 1;
                continue;
            }
        };
        if obs.year != year {
            report.outside_year += 1;
            continue;
        }
        if !filter.matches(&obs) {
            report.filtered_out += 1;
            continue;
        }
        if obs.scheduled_time.is_none() && obs.actual_time.is_none() {
            report.without_time_data += 1;
        }
        kept.push(obs);
    }
    report.kept = kept.len();

    if report.rejected > 0 {
        warn!(year, rejected = report.rejected, "skipped leg rows that failed validation");
    }
    if report.without_time_data > 0 {
        warn!(
            year,
            legs = report.without_time_data,
            "legs without scheduled or actual time are excluded from delay samples"
        );
    }
    debug!(year, ?report, "normalized leg rows");
    (kept, report)
}

fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn parse_direction(s: Option<&str>) -> Result<Direction, RowRejection> {
    let raw = s.map(str::trim).filter(|v| !v.is_empty()).ok_or(RowRejection::MissingDirection)?;
    match raw.to_ascii_uppercase().as_str() {
        "ARRIVAL" | "ARR" | "A" => Ok(Direction::Arrival),
        "DEPARTURE" | "DEP" | "D" => Ok(Direction::Departure),
        _ => Err(RowRejection::InvalidDirection(raw.to_string())),
    }
}

/// Unknown or missing statuses are inferred from the actual time: a leg with
/// a recorded actual time has operated, otherwise it is still scheduled.
fn parse_status(s: Option<&str>, has_actual_time: bool) -> LegStatus {
    s.map(|v| v.trim().to_ascii_uppercase())
        .and_then(|v| STATUS_ALIASES.get(v.as_str()).copied())
        .unwrap_or(if has_actual_time {
            LegStatus::Operated
        } else {
            LegStatus::Scheduled
        })
}

fn parse_delay_records(s: Option<&str>) -> Vec<DelayRecord> {
    let Some(s) = s else {
        return Vec::new();
    };
    s.split(';')
        .filter_map(|entry| {
            let mut parts = entry.trim().split(':');
            let code = parts.next()?.trim();
            if code.is_empty() {
                return None;
            }
            let minutes = parse_u64_safe(parts.next()).and_then(|m| u32::try_from(m).ok())?;
            let is_primary = parts
                .next()
                .map(|p| p.trim().eq_ignore_ascii_case("P"))
                .unwrap_or(false);
            Some(DelayRecord {
                code: code.to_ascii_uppercase(),
                minutes,
                is_primary,
            })
        })
        .collect()
}

fn classify_traffic(other_country: Option<&str>, home_country: &str) -> TrafficClass {
    match other_country {
        Some(c) if c.eq_ignore_ascii_case(home_country.trim()) => TrafficClass::Domestic,
        Some(_) => TrafficClass::International,
        None => TrafficClass::Unclassified,
    }
}
