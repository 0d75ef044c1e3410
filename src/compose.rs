//! Engine entry points: single-year reports with YoY, and multi-year
//! comparison reports fanned out one worker per year.

use crate::config::EngineConfig;
use crate::error::{Result, StatsError};
use crate::normalize::normalize;
use crate::ranking::RankedGroup;
use crate::reports::build_yearly_report;
use crate::types::{
    CommonAirline, CommonRoute, Comparisons, GroupMetrics, GroupYearMetrics, LegFilter,
    MultiYearReport, RawLegRow, YearlyReport,
};
use crate::util::parse_date_safe;
use chrono::Datelike;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info};

/// Minimum number of requested years a group must have operated in to be
/// listed as common.
pub const MIN_COMMON_YEARS: usize = 2;

/// Supplies the raw legs of one year. Implementations may pre-apply the
/// filter; the normalizer enforces it either way.
pub trait LegSource: Sync {
    fn legs_for_year(&self, year: i32, filter: &LegFilter) -> Result<Vec<RawLegRow>>;
}

/// Rows already held in memory, e.g. from the CSV loader.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLegs {
    rows: Vec<RawLegRow>,
}

impl InMemoryLegs {
    pub fn new(rows: Vec<RawLegRow>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl LegSource for InMemoryLegs {
    /// Rows whose date is unreadable are passed through so the normalizer
    /// can count them as rejected.
    fn legs_for_year(&self, year: i32, _filter: &LegFilter) -> Result<Vec<RawLegRow>> {
        Ok(self
            .rows
            .iter()
            .filter(|r| parse_date_safe(r.date.as_deref()).map_or(true, |d| d.year() == year))
            .cloned()
            .collect())
    }
}

/// Request-scoped cancellation: an explicit flag plus an optional deadline.
/// Checked once at the start of each year's pipeline.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: Arc::default(),
            deadline: Some(deadline),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    fn check(&self, year: i32) -> Result<()> {
        if self.is_cancelled() {
            return Err(StatsError::Cancelled { year });
        }
        Ok(())
    }
}

pub struct StatsEngine<'a, S: LegSource> {
    source: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: LegSource> StatsEngine<'a, S> {
    pub fn new(source: &'a S, config: &'a EngineConfig) -> Self {
        Self { source, config }
    }

    /// Fetches, normalizes and reports one year. No YoY block.
    pub fn year_pipeline(
        &self,
        year: i32,
        filter: &LegFilter,
        cancel: &CancelToken,
    ) -> Result<YearlyReport> {
        cancel.check(year)?;
        let rows = self.source.legs_for_year(year, filter)?;
        let (legs, load) = normalize(&rows, year, &self.config.home_country, filter);
        let report = build_yearly_report(year, &legs);
        info!(
            year,
            legs = load.kept,
            rejected = load.rejected,
            passengers = report.totals.total_passengers,
            "yearly report built"
        );
        Ok(report)
    }

    /// Single-year mode: the report for `year`, compared against `year - 1`
    /// when the source has any legs for it.
    pub fn yearly_report(
        &self,
        year: i32,
        filter: &LegFilter,
        cancel: &CancelToken,
    ) -> Result<YearlyReport> {
        let current = self.year_pipeline(year, filter, cancel)?;
        let previous = self.year_pipeline(year - 1, filter, cancel)?;
        if previous.totals.flights == 0 {
            debug!(year, "no legs in previous year, YoY omitted");
            return Ok(current);
        }
        Ok(current.with_comparison(&previous))
    }

    /// Multi-year mode: years are deduplicated and sorted, each runs on its
    /// own worker, and results are combined after all of them finish.
    pub fn multi_year_report(
        &self,
        years: &[i32],
        filter: &LegFilter,
        cancel: &CancelToken,
    ) -> Result<MultiYearReport> {
        let years: Vec<i32> = years.iter().copied().collect::<BTreeSet<_>>().into_iter().collect();
        if years.is_empty() {
            return Err(StatsError::NoYearsRequested);
        }
        debug!(?years, "fanning out yearly pipelines");

        let results: Vec<Result<YearlyReport>> = thread::scope(|scope| {
            let handles: Vec<_> = years
                .iter()
                .map(|&year| {
                    let handle = scope.spawn(move || self.year_pipeline(year, filter, cancel));
                    (year, handle)
                })
                .collect();
            handles
                .into_iter()
                .map(|(year, h)| h.join().unwrap_or(Err(StatsError::Worker { year })))
                .collect()
        });
        let reports = results.into_iter().collect::<Result<Vec<_>>>()?;
        Ok(compose_multi_year(reports))
    }
}

/// Combines independent yearly reports (ascending by year): adjacent years
/// get a YoY block and groups operated in at least [`MIN_COMMON_YEARS`]
/// years are compared.
pub fn compose_multi_year(reports: Vec<YearlyReport>) -> MultiYearReport {
    let mut years_data: Vec<YearlyReport> = Vec::with_capacity(reports.len());
    for report in reports {
        let report = match years_data.last() {
            Some(prev) => report.with_comparison(prev),
            None => report,
        };
        years_data.push(report);
    }

    let comparisons = Comparisons {
        common_routes: common_groups(&years_data, |r| &r.routes_all)
            .into_iter()
            .map(|(first, total_passengers, years_present, per_year)| CommonRoute {
                route: first.route.clone(),
                total_passengers,
                years_present,
                per_year,
            })
            .collect(),
        common_airlines: common_groups(&years_data, |r| &r.airlines_all)
            .into_iter()
            .map(|(first, total_passengers, years_present, per_year)| CommonAirline {
                airline: first.airline.clone(),
                icao_code: first.icao_code.clone(),
                total_passengers,
                years_present,
                per_year,
            })
            .collect(),
    };

    MultiYearReport {
        years: years_data.iter().map(|r| r.year).collect(),
        years_data,
        comparisons,
    }
}

type CommonGroup<'r, T> = (&'r T, u64, usize, Vec<GroupYearMetrics>);

/// Groups with operated legs in enough years, each with a metric series
/// covering every requested year; sorted by total passengers descending,
/// then key ascending.
fn common_groups<'r, T, F>(reports: &'r [YearlyReport], groups_of: F) -> Vec<CommonGroup<'r, T>>
where
    T: RankedGroup,
    F: Fn(&'r YearlyReport) -> &'r Vec<T>,
{
    let mut by_key: BTreeMap<&'r str, Vec<Option<&'r T>>> = BTreeMap::new();
    for (i, report) in reports.iter().enumerate() {
        for group in groups_of(report) {
            by_key
                .entry(group.group_key())
                .or_insert_with(|| vec![None; reports.len()])[i] = Some(group);
        }
    }

    let mut common: Vec<CommonGroup<'r, T>> = by_key
        .into_values()
        .filter_map(|slots| {
            let years_present = slots
                .iter()
                .filter(|g| g.is_some_and(|g| g.metrics().operated_flights > 0))
                .count();
            if years_present < MIN_COMMON_YEARS {
                return None;
            }
            let first = slots.iter().flatten().next().copied()?;
            let per_year: Vec<GroupYearMetrics> = reports
                .iter()
                .zip(&slots)
                .map(|(report, g)| year_metrics(report.year, g.map(|g| g.metrics())))
                .collect();
            let total = per_year.iter().map(|p| p.passengers).sum();
            Some((first, total, years_present, per_year))
        })
        .collect();
    common.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.group_key().cmp(b.0.group_key())));
    common
}

fn year_metrics(year: i32, m: Option<&GroupMetrics>) -> GroupYearMetrics {
    match m {
        Some(m) => GroupYearMetrics {
            year,
            flights: m.flights,
            passengers: m.passengers,
            load_factor: m.load_factor,
            avg_delay_minutes: m.avg_delay_minutes,
            on_time_rate: m.on_time_rate,
        },
        None => GroupYearMetrics {
            year,
            flights: 0,
            passengers: 0,
            load_factor: None,
            avg_delay_minutes: None,
            on_time_rate: None,
        },
    }
}
