use flight_stats::loader::load_legs;
use flight_stats::{
    build_yearly_report, normalize, CancelToken, EngineConfig, InMemoryLegs, LegFilter, RawLegRow,
    StatsEngine, StatsError,
};
use std::io::Write;

fn raw_leg(date: &str, route: &str, passengers: u32, seats: u32, delay: Option<u32>) -> RawLegRow {
    let (scheduled, actual) = match delay {
        Some(m) => (
            Some(format!("{} 10:00", date)),
            Some(format!("{} 10:{:02}", date, m)),
        ),
        None => (None, None),
    };
    RawLegRow {
        date: Some(date.to_string()),
        direction: Some("ARRIVAL".to_string()),
        status: Some("OPERATED".to_string()),
        route: Some(route.to_string()),
        airline_name: Some("Test Air".to_string()),
        airline_icao: Some("TST".to_string()),
        operation_type_code: Some("SCHEDULED".to_string()),
        passengers: Some(passengers.to_string()),
        available_seats: Some(seats.to_string()),
        scheduled_time: scheduled,
        actual_time: actual,
        other_country: Some("CH".to_string()),
        ..Default::default()
    }
}

fn two_leg_year() -> Vec<RawLegRow> {
    vec![
        raw_leg("2024-05-10", "TZL-MLH", 100, 150, Some(0)),
        raw_leg("2024-05-11", "TZL-BSL", 50, 150, Some(20)),
    ]
}

#[test]
fn two_leg_year_headline_metrics() {
    let (legs, _) = normalize(&two_leg_year(), 2024, "BA", &LegFilter::default());
    let report = build_yearly_report(2024, &legs);

    assert_eq!(report.totals.flights, 2);
    assert_eq!(report.load_factor.overall, Some(50.0));
    assert_eq!(report.punctuality.overall_on_time_rate, Some(50.0));
    assert_eq!(report.concentration.top_routes_share, Some(100.0));
    assert_eq!(report.routes.most_delayed[0].route, "TZL-BSL");
    assert_eq!(report.routes.least_delayed[0].route, "TZL-MLH");
    assert_eq!(report.traffic_split.international_rate, Some(100.0));
}

#[test]
fn duplicate_years_behave_like_a_single_year() {
    let source = InMemoryLegs::new(two_leg_year());
    let config = EngineConfig::default();
    let engine = StatsEngine::new(&source, &config);
    let filter = LegFilter::default();
    let cancel = CancelToken::new();

    let deduped = engine.multi_year_report(&[2024, 2024], &filter, &cancel).unwrap();
    let single = engine.multi_year_report(&[2024], &filter, &cancel).unwrap();
    assert_eq!(deduped.years, vec![2024]);
    assert_eq!(
        serde_json::to_string(&deduped).unwrap(),
        serde_json::to_string(&single).unwrap()
    );
}

#[test]
fn multi_year_sorts_requested_years() {
    let mut rows = two_leg_year();
    rows.push(raw_leg("2022-03-01", "TZL-MLH", 80, 150, None));
    rows.push(raw_leg("2023-03-01", "TZL-MLH", 90, 150, None));
    let source = InMemoryLegs::new(rows);
    let config = EngineConfig::default();
    let engine = StatsEngine::new(&source, &config);

    let report = engine
        .multi_year_report(&[2024, 2022, 2023], &LegFilter::default(), &CancelToken::new())
        .unwrap();
    assert_eq!(report.years, vec![2022, 2023, 2024]);
    let common = &report.comparisons.common_routes;
    assert_eq!(common.len(), 1);
    assert_eq!(common[0].route, "TZL-MLH");
    assert_eq!(common[0].total_passengers, 270);
    assert_eq!(common[0].years_present, 3);
    assert!(report.years_data[0].yoy_comparison.is_none());
    assert_eq!(
        report.years_data[2].yoy_comparison.as_ref().unwrap().previous_year,
        2023
    );
}

#[test]
fn empty_multi_year_request_is_an_error() {
    let source = InMemoryLegs::default();
    let config = EngineConfig::default();
    let engine = StatsEngine::new(&source, &config);
    let err = engine
        .multi_year_report(&[], &LegFilter::default(), &CancelToken::new())
        .unwrap_err();
    assert!(matches!(err, StatsError::NoYearsRequested));
}

#[test]
fn missing_seats_give_null_load_factor() {
    let rows: Vec<RawLegRow> = two_leg_year()
        .into_iter()
        .map(|mut r| {
            r.available_seats = None;
            r
        })
        .collect();
    let (legs, _) = normalize(&rows, 2024, "BA", &LegFilter::default());
    let report = build_yearly_report(2024, &legs);
    assert_eq!(report.load_factor.overall, None);
    assert!(report.load_factor.by_month.iter().all(|m| m.load_factor.is_none()));
}

#[test]
fn same_input_gives_identical_output() {
    let (legs, _) = normalize(&two_leg_year(), 2024, "BA", &LegFilter::default());
    let a = serde_json::to_string(&build_yearly_report(2024, &legs)).unwrap();
    let b = serde_json::to_string(&build_yearly_report(2024, &legs)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn csv_file_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "date,direction,status,route,airline_name,airline_icao,operation_type_code,passengers,available_seats,scheduled_time,actual_time,delays,other_country"
    )
    .unwrap();
    writeln!(file, "2024-07-01,A,OPERATED,TZL-MLH,Wizz Air,WZZ,SCHEDULED,180,180,2024-07-01 09:00,2024-07-01 09:40,93:30:P;81:10,FR").unwrap();
    writeln!(file, "2024-07-01,D,CANCELLED,TZL-MLH,Wizz Air,WZZ,SCHEDULED,,180,2024-07-01 10:00,,,FR").unwrap();
    writeln!(file, "2024-07-02,D,OPERATED,TZL-BEG,Air Serbia,ASL,CHARTER,60,120,,,,RS").unwrap();
    writeln!(file, "not-a-date,A,OPERATED,TZL-MLH,Wizz Air,WZZ,SCHEDULED,1,1,,,,FR").unwrap();
    file.flush().unwrap();

    let (source, load) = load_legs(file.path()).unwrap();
    assert_eq!(load.loaded_rows, 4);

    let config = EngineConfig::default();
    let engine = StatsEngine::new(&source, &config);
    let report = engine
        .yearly_report(2024, &LegFilter::scheduled_only(), &CancelToken::new())
        .unwrap();

    assert_eq!(report.totals.flights, 2);
    assert_eq!(report.status_breakdown.cancelled_rate, Some(50.0));
    assert_eq!(report.load_factor.overall, Some(100.0));
    assert_eq!(report.punctuality.overall_avg_delay_minutes, Some(40.0));
    assert_eq!(report.delay_codes_top[0].code, "93");
    assert_eq!(report.delay_codes_top[0].primary_occurrences, 1);
    assert_eq!(report.peak_hours[0].hour, 9);
    assert_eq!(report.operation_type_breakdown.len(), 1);
    assert!(report.yoy_comparison.is_none());
}
