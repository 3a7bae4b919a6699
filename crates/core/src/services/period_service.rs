use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

use crate::models::analytics::PatrimonyMonth;
use crate::models::chart::{FlowBucket, HeatmapCell, HeatmapYear, MonthlyBucket};
use crate::models::dividend::Dividend;
use crate::models::patrimony::PatrimonyEntry;
use crate::models::period::{Granularity, MonthKey, PeriodKey, RangeKey, MAX_RANGE_YEARS};
use crate::models::series::{sorted_by_date, TimePoint};

/// Groups dated points into month / year buckets.
///
/// Two different bucketing rules live here and must not be mixed up:
/// - **levels** (returns, patrimony) are *sampled*: the earliest point of each month
/// - **flows** (dividends, contributions) are *summed* within each bucket
pub struct PeriodService;

impl PeriodService {
    pub fn new() -> Self {
        Self
    }

    // ── Level sampling ──────────────────────────────────────────────

    /// Earliest point of each month, ascending. Idempotent: a series that
    /// already has one point per month comes back unchanged.
    pub fn sample_month_starts(&self, series: &[TimePoint]) -> Vec<TimePoint> {
        let mut firsts: BTreeMap<MonthKey, TimePoint> = BTreeMap::new();
        for point in sorted_by_date(series) {
            firsts.entry(MonthKey::of(point.date)).or_insert(point);
        }
        firsts.into_values().collect()
    }

    /// First-of-month level per month.
    pub fn monthly_levels(&self, series: &[TimePoint]) -> Vec<MonthlyBucket> {
        self.sample_month_starts(series)
            .into_iter()
            .map(|p| MonthlyBucket {
                month: MonthKey::of(p.date),
                value: p.value,
            })
            .collect()
    }

    /// Monthly returns in percent.
    ///
    /// The return of month k is `(start of k+1 - start of k) * 100` and is
    /// labelled with month k. The most recent month has no successor and is
    /// dropped.
    pub fn monthly_returns(&self, series: &[TimePoint]) -> Vec<MonthlyBucket> {
        self.monthly_levels(series)
            .windows(2)
            .map(|pair| MonthlyBucket {
                month: pair[0].month,
                value: (pair[1].value - pair[0].value) * 100.0,
            })
            .collect()
    }

    // ── Heatmap ─────────────────────────────────────────────────────

    /// One cell per month transition, same values as [`Self::monthly_returns`].
    pub fn heatmap_cells(&self, series: &[TimePoint]) -> Vec<HeatmapCell> {
        self.monthly_returns(series)
            .into_iter()
            .map(|b| HeatmapCell {
                year: b.month.year,
                month_index: b.month.month_index(),
                value: Some(b.value),
            })
            .collect()
    }

    /// Heatmap rows for every year spanned by the sampled months.
    ///
    /// The annual figure compounds the populated months,
    /// `(∏(1 + m/100) - 1) * 100`, and is `None` for a year with no cells
    /// (e.g. a final year whose only month has no successor yet).
    pub fn heatmap(&self, series: &[TimePoint]) -> Vec<HeatmapYear> {
        let levels = self.monthly_levels(series);
        let (Some(first), Some(last)) = (levels.first(), levels.last()) else {
            return Vec::new();
        };

        let mut rows: BTreeMap<i32, [Option<f64>; 12]> = (first.month.year..=last.month.year)
            .map(|year| (year, [None; 12]))
            .collect();

        for cell in self.heatmap_cells(series) {
            if let Some(months) = rows.get_mut(&cell.year) {
                months[cell.month_index] = cell.value;
            }
        }

        rows.into_iter()
            .map(|(year, months)| HeatmapYear {
                year,
                annual: compound_pct(months.iter().flatten().copied()),
                months,
            })
            .collect()
    }

    /// `(year, annual return %)` for years that have at least one monthly return.
    pub fn annual_returns(&self, series: &[TimePoint]) -> Vec<(i32, f64)> {
        self.heatmap(series)
            .into_iter()
            .filter_map(|row| row.annual.map(|a| (row.year, a)))
            .collect()
    }

    // ── Flow aggregation ────────────────────────────────────────────

    /// Sum `(date, amount)` flows per period, ascending by period.
    pub fn aggregate_flows<I>(&self, flows: I, granularity: Granularity) -> Vec<FlowBucket>
    where
        I: IntoIterator<Item = (NaiveDate, f64)>,
    {
        let mut totals: BTreeMap<PeriodKey, f64> = BTreeMap::new();
        for (date, amount) in flows {
            *totals.entry(PeriodKey::of(date, granularity)).or_insert(0.0) += amount;
        }
        totals
            .into_iter()
            .map(|(period, total)| FlowBucket { period, total })
            .collect()
    }

    /// Dividend totals per period.
    pub fn dividends_by_period(
        &self,
        dividends: &[Dividend],
        granularity: Granularity,
    ) -> Vec<FlowBucket> {
        self.aggregate_flows(dividends.iter().map(|d| (d.date, d.amount)), granularity)
    }

    /// Dividend totals per period and category.
    pub fn dividends_by_category(
        &self,
        dividends: &[Dividend],
        granularity: Granularity,
    ) -> BTreeMap<PeriodKey, BTreeMap<String, f64>> {
        let mut out: BTreeMap<PeriodKey, BTreeMap<String, f64>> = BTreeMap::new();
        for dividend in dividends {
            *out.entry(PeriodKey::of(dividend.date, granularity))
                .or_default()
                .entry(dividend.category.clone())
                .or_insert(0.0) += dividend.amount;
        }
        out
    }

    // ── Patrimony ───────────────────────────────────────────────────

    /// First recorded day of each month, with its per-category values totalled.
    pub fn patrimony_monthly(&self, entries: &[PatrimonyEntry]) -> Vec<PatrimonyMonth> {
        let mut sorted: Vec<&PatrimonyEntry> = entries.iter().collect();
        sorted.sort_by_key(|e| e.date);

        let mut firsts: BTreeMap<MonthKey, &PatrimonyEntry> = BTreeMap::new();
        for entry in sorted {
            firsts.entry(MonthKey::of(entry.date)).or_insert(entry);
        }

        firsts
            .into_iter()
            .map(|(month, entry)| PatrimonyMonth {
                month,
                total: entry.total(),
                acc_aported: entry.acc_aported,
                categories: entry.categories.clone(),
            })
            .collect()
    }

    // ── Date ranges ─────────────────────────────────────────────────

    /// Points with `date >= range.cutoff(today)`, in source order.
    pub fn filter_range(
        &self,
        series: &[TimePoint],
        range: RangeKey,
        today: NaiveDate,
    ) -> Vec<TimePoint> {
        let cutoff = range.cutoff(today);
        series.iter().filter(|p| p.date >= cutoff).copied().collect()
    }

    /// Ranges worth offering: `ytd`, then `1y`..`Ny` where N is the age of
    /// the oldest point in whole years (capped at 10), then `max`.
    pub fn available_ranges(&self, oldest: Option<NaiveDate>, today: NaiveDate) -> Vec<RangeKey> {
        let years = oldest.map_or(0, |o| whole_years_between(o, today));
        std::iter::once(RangeKey::Ytd)
            .chain((1..=years.min(MAX_RANGE_YEARS)).map(RangeKey::Years))
            .chain(std::iter::once(RangeKey::Max))
            .collect()
    }
}

impl Default for PeriodService {
    fn default() -> Self {
        Self::new()
    }
}

/// Compound monthly percentages into one percentage; `None` if empty.
fn compound_pct<I: Iterator<Item = f64>>(monthly: I) -> Option<f64> {
    let mut any = false;
    let factor = monthly.fold(1.0, |acc, m| {
        any = true;
        acc * (1.0 + m / 100.0)
    });
    any.then(|| (factor - 1.0) * 100.0)
}

/// Completed calendar years from `from` to `to`; 0 if `to` is before `from`.
fn whole_years_between(from: NaiveDate, to: NaiveDate) -> u32 {
    let mut months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    if to.day() < from.day() {
        months -= 1;
    }
    u32::try_from(months.max(0) / 12).unwrap_or(0)
}
