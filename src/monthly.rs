use crate::types::{Direction, FlightLegObservation, MonthlyTotals, Totals};
use crate::util::month_label;

/// Per-month totals, always 12 entries in calendar order.
pub fn aggregate_months(legs: &[FlightLegObservation]) -> Vec<MonthlyTotals> {
    let mut months: Vec<MonthlyTotals> = (1..=12)
        .map(|m| MonthlyTotals {
            month_number: m,
            month: month_label(m),
            ..Default::default()
        })
        .collect();

    for leg in legs {
        let Some(slot) = months.get_mut(leg.month.wrapping_sub(1) as usize) else {
            continue;
        };
        slot.flights += 1;
        slot.passengers += leg.passengers;
        match leg.direction {
            Direction::Arrival => {
                slot.arrival_flights += 1;
                slot.arrival_passengers += leg.passengers;
            }
            Direction::Departure => {
                slot.departure_flights += 1;
                slot.departure_passengers += leg.passengers;
            }
        }
        slot.infants += leg.infants;
        slot.baggage += leg.baggage_kg;
        slot.cargo += leg.cargo_kg;
        slot.mail += leg.mail_kg;
    }
    months
}

/// Yearly totals with the arrival/departure split. Flight and passenger
/// totals are the sums across the monthly breakdown.
pub fn yearly_totals(legs: &[FlightLegObservation], months: &[MonthlyTotals]) -> Totals {
    let mut t = Totals::default();
    for leg in legs {
        match leg.direction {
            Direction::Arrival => {
                t.arrival_infants += leg.infants;
                t.arrival_baggage += leg.baggage_kg;
                t.arrival_cargo += leg.cargo_kg;
                t.arrival_mail += leg.mail_kg;
            }
            Direction::Departure => {
                t.departure_infants += leg.infants;
                t.departure_baggage += leg.baggage_kg;
                t.departure_cargo += leg.cargo_kg;
                t.departure_mail += leg.mail_kg;
            }
        }
    }
    for m in months {
        t.flights += m.flights;
        t.arrival_flights += m.arrival_flights;
        t.departure_flights += m.departure_flights;
        t.arrival_passengers += m.arrival_passengers;
        t.departure_passengers += m.departure_passengers;
    }
    t.total_passengers = t.arrival_passengers + t.departure_passengers;
    t.total_infants = t.arrival_infants + t.departure_infants;
    t.total_baggage = t.arrival_baggage + t.departure_baggage;
    t.total_cargo = t.arrival_cargo + t.departure_cargo;
    t.total_mail = t.arrival_mail + t.departure_mail;
    t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::leg;

    #[test]
    fn always_twelve_months_in_calendar_order() {
        let months = aggregate_months(&[]);
        assert_eq!(months.len(), 12);
        assert!(months.iter().enumerate().all(|(i, m)| m.month_number == i as u32 + 1));
        assert!(months.iter().all(|m| m.flights == 0 && m.passengers == 0));
        assert_eq!(months[0].month, "January");
    }

    #[test]
    fn splits_by_direction_and_month() {
        let mut a = leg("2024-02-10", "TZL-MLH", 100);
        a.cargo_kg = 40;
        let mut d = leg("2024-02-11", "TZL-MLH", 80);
        d.direction = Direction::Departure;
        d.mail_kg = 5;
        let late = leg("2024-11-01", "TZL-BSL", 30);

        let months = aggregate_months(&[a.clone(), d.clone(), late.clone()]);
        let feb = &months[1];
        assert_eq!(feb.flights, 2);
        assert_eq!(feb.arrival_flights, 1);
        assert_eq!(feb.departure_flights, 1);
        assert_eq!(feb.passengers, 180);
        assert_eq!(feb.cargo, 40);
        assert_eq!(months[10].passengers, 30);

        let totals = yearly_totals(&[a, d, late], &months);
        assert_eq!(totals.flights, 3);
        assert_eq!(totals.arrival_passengers, 130);
        assert_eq!(totals.departure_passengers, 80);
        assert_eq!(totals.total_passengers, 210);
        assert_eq!(totals.total_cargo, 40);
        assert_eq!(totals.departure_mail, 5);
    }
}
