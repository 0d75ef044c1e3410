use crate::error::Result;
use crate::types::{AirlineStats, MonthlyTotals, RouteStats, YearlyReport};
use crate::util::{format_int, format_opt};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

#[derive(Debug, Clone, Tabled)]
pub struct GroupRow {
    #[tabled(rename = "Group")]
    pub group: String,
    #[tabled(rename = "Flights")]
    pub flights: String,
    #[tabled(rename = "Passengers")]
    pub passengers: String,
    #[tabled(rename = "AvgPax")]
    pub avg_passengers: String,
    #[tabled(rename = "LoadFactor%")]
    pub load_factor: String,
    #[tabled(rename = "AvgDelayMin")]
    pub avg_delay: String,
    #[tabled(rename = "OnTime%")]
    pub on_time: String,
}

impl From<&RouteStats> for GroupRow {
    fn from(r: &RouteStats) -> Self {
        let m = &r.metrics;
        GroupRow {
            group: r.route.clone(),
            flights: format_int(m.flights),
            passengers: format_int(m.passengers),
            avg_passengers: format_opt(m.avg_passengers, 2),
            load_factor: format_opt(m.load_factor, 2),
            avg_delay: format_opt(m.avg_delay_minutes, 2),
            on_time: format_opt(m.on_time_rate, 2),
        }
    }
}

impl From<&AirlineStats> for GroupRow {
    fn from(a: &AirlineStats) -> Self {
        let m = &a.metrics;
        GroupRow {
            group: format!("{} ({})", a.airline, a.icao_code),
            flights: format_int(m.flights),
            passengers: format_int(m.passengers),
            avg_passengers: format_opt(m.avg_passengers, 2),
            load_factor: format_opt(m.load_factor, 2),
            avg_delay: format_opt(m.avg_delay_minutes, 2),
            on_time: format_opt(m.on_time_rate, 2),
        }
    }
}

#[derive(Debug, Clone, Tabled)]
pub struct MonthRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Flights")]
    pub flights: String,
    #[tabled(rename = "Passengers")]
    pub passengers: String,
    #[tabled(rename = "Cargo(kg)")]
    pub cargo: String,
}

impl From<&MonthlyTotals> for MonthRow {
    fn from(m: &MonthlyTotals) -> Self {
        MonthRow {
            month: m.month.clone(),
            flights: format_int(m.flights),
            passengers: format_int(m.passengers),
            cargo: format_int(m.cargo),
        }
    }
}

/// Renders at most `max_rows` rows as a markdown table.
pub fn render_table<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table<T>(title: &str, note: Option<&str>, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}", title);
    if let Some(n) = note {
        println!("({})", n);
    }
    println!();
    println!("{}\n", render_table(rows, max_rows));
}

/// Console summary of one yearly report.
pub fn preview_report(report: &YearlyReport, max_rows: usize) {
    let t = &report.totals;
    println!("Year {}", report.year);
    println!(
        "Flights: {}  Passengers: {}  Cargo: {} kg",
        format_int(t.flights),
        format_int(t.total_passengers),
        format_int(t.total_cargo)
    );
    println!(
        "Load factor: {}%  On-time: {}%  Avg delay: {} min  Cancelled: {}%\n",
        format_opt(report.load_factor.overall, 2),
        format_opt(report.punctuality.overall_on_time_rate, 2),
        format_opt(report.punctuality.overall_avg_delay_minutes, 2),
        format_opt(report.status_breakdown.cancelled_rate, 2),
    );

    let months: Vec<MonthRow> = report.monthly_breakdown.iter().map(MonthRow::from).collect();
    preview_table("Monthly Breakdown", None, &months, 12);

    let routes: Vec<GroupRow> = report.routes.top_by_passengers.iter().map(GroupRow::from).collect();
    preview_table("Top Routes", Some("by passengers"), &routes, max_rows);

    let delayed: Vec<GroupRow> = report.routes.most_delayed.iter().map(GroupRow::from).collect();
    preview_table("Most Delayed Routes", Some("by average delay"), &delayed, max_rows);

    let airlines: Vec<GroupRow> = report.airlines.top_by_passengers.iter().map(GroupRow::from).collect();
    preview_table("Top Airlines", Some("by passengers"), &airlines, max_rows);

    if let Some(yoy) = &report.yoy_comparison {
        println!(
            "vs {}: flights {}%, passengers {}%, load factor {} pts\n",
            yoy.previous_year,
            format_opt(yoy.flights.growth, 2),
            format_opt(yoy.passengers.growth, 2),
            format_opt(yoy.load_factor.delta, 2),
        );
    }
}
