// Builders for observations used across unit tests.
use crate::types::{
    AirlineRef, DelayRecord, Direction, FlightLegObservation, LegStatus, OperationType,
    TrafficClass,
};
use chrono::{Duration, NaiveDate};

/// Operated arrival on `date` with no seats, times or delay records.
pub(crate) fn leg(date: &str, route: &str, passengers: u64) -> FlightLegObservation {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    FlightLegObservation {
        year: chrono::Datelike::year(&date),
        month: chrono::Datelike::month(&date),
        date,
        direction: Direction::Arrival,
        status: LegStatus::Operated,
        passengers,
        has_passenger_data: true,
        infants: 0,
        baggage_kg: 0,
        cargo_kg: 0,
        mail_kg: 0,
        available_seats: None,
        is_ferry: false,
        route: route.to_string(),
        airline: AirlineRef {
            id: None,
            name: "Test Air".to_string(),
            icao_code: "TST".to_string(),
        },
        operation_type: OperationType {
            code: "SCHEDULED".to_string(),
            name: "Scheduled".to_string(),
        },
        scheduled_time: None,
        actual_time: None,
        delay_records: Vec::new(),
        country_of_other_end: Some("DE".to_string()),
        traffic: TrafficClass::International,
    }
}

pub(crate) trait LegExt: Sized {
    fn seats(self, n: u32) -> Self;
    /// Scheduled at 10:00 local, actual `minutes` later.
    fn delayed(self, minutes: i64) -> Self;
    fn delay_code(self, code: &str, minutes: u32, primary: bool) -> Self;
    fn airline(self, icao: &str, name: &str) -> Self;
    fn status(self, status: LegStatus) -> Self;
    fn departure(self) -> Self;
}

impl LegExt for FlightLegObservation {
    fn seats(mut self, n: u32) -> Self {
        self.available_seats = Some(n);
        self
    }

    fn delayed(mut self, minutes: i64) -> Self {
        let sched = self.date.and_hms_opt(10, 0, 0).unwrap();
        self.scheduled_time = Some(sched);
        self.actual_time = Some(sched + Duration::minutes(minutes));
        self
    }

    fn delay_code(mut self, code: &str, minutes: u32, primary: bool) -> Self {
        self.delay_records.push(DelayRecord {
            code: code.to_string(),
            minutes,
            is_primary: primary,
        });
        self
    }

    fn airline(mut self, icao: &str, name: &str) -> Self {
        self.airline = AirlineRef {
            id: None,
            name: name.to_string(),
            icao_code: icao.to_string(),
        };
        self
    }

    fn status(mut self, status: LegStatus) -> Self {
        self.status = status;
        self
    }

    fn departure(mut self) -> Self {
        self.direction = Direction::Departure;
        self
    }
}
