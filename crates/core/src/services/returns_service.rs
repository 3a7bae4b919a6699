use chrono::{Months, NaiveDate};
use std::collections::BTreeMap;

use crate::models::chart::RollingPoint;
use crate::models::series::{sorted_by_date, NamedSeries, TimePoint};

/// Length of the trailing window used by both the chart and the table.
const WINDOW_MONTHS: u32 = 12;

/// Trailing-window returns over cumulative-return series.
///
/// Values are cumulative fractions since inception, so a window return is
/// `(end - start) * 100` percentage points.
pub struct ReturnsService;

impl ReturnsService {
    pub fn new() -> Self {
        Self
    }

    /// Trailing 12-month return for every point of `series` (chart path).
    ///
    /// Sorts by date, then walks a start pointer `j` forward while
    /// `date[j] < date[i] - 12 months`. Both `i` and the window start only
    /// move forward, so the whole pass is O(n) after sorting.
    /// A point gets `None` until it is at least 12 months after the first date.
    pub fn rolling_12m(&self, series: &[TimePoint]) -> Vec<RollingPoint> {
        let sorted = sorted_by_date(series);
        let Some(first) = sorted.first().map(|p| p.date) else {
            return Vec::new();
        };

        let mut out = Vec::with_capacity(sorted.len());
        let mut j = 0;

        for (i, point) in sorted.iter().enumerate() {
            let Some(window_start) = months_back(point.date, WINDOW_MONTHS) else {
                out.push(RollingPoint {
                    date: point.date,
                    rolling_12m: None,
                });
                continue;
            };

            while j < i && sorted[j].date < window_start {
                j += 1;
            }

            let has_full_year = window_start >= first;
            out.push(RollingPoint {
                date: point.date,
                rolling_12m: has_full_year.then(|| (point.value - sorted[j].value) * 100.0),
            });
        }

        out
    }

    /// The point whose date is closest to `target`, in days.
    ///
    /// Scans in source order and keeps the first minimum, so on ties the
    /// earlier array element wins even if the array is not date-sorted.
    /// This is the table path and intentionally differs from `rolling_12m`.
    pub fn nearest_point(&self, series: &[TimePoint], target: NaiveDate) -> Option<TimePoint> {
        series.iter().copied().fold(None, |best: Option<TimePoint>, p| match best {
            Some(b) if distance_days(b.date, target) <= distance_days(p.date, target) => Some(b),
            _ => Some(p),
        })
    }

    /// 12-month return for a table cell: latest point minus the point nearest
    /// to `today - 12 months`, in percentage points.
    ///
    /// `None` for an empty series.
    pub fn twelve_month_return(&self, series: &[TimePoint], today: NaiveDate) -> Option<f64> {
        // Later array elements win ties on the latest date.
        let latest = series
            .iter()
            .copied()
            .reduce(|acc, p| if p.date >= acc.date { p } else { acc })?;
        let target = months_back(today, WINDOW_MONTHS)?;
        let start = self.nearest_point(series, target)?;
        Some((latest.value - start.value) * 100.0)
    }

    /// [`Self::twelve_month_return`] for every key of `series`.
    pub fn twelve_month_returns(
        &self,
        series: &NamedSeries,
        today: NaiveDate,
    ) -> BTreeMap<String, Option<f64>> {
        series
            .iter()
            .map(|(key, points)| (key.clone(), self.twelve_month_return(points, today)))
            .collect()
    }
}

impl Default for ReturnsService {
    fn default() -> Self {
        Self::new()
    }
}

/// `date` minus `months` calendar months, clamping the day to month end.
pub(crate) fn months_back(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.checked_sub_months(Months::new(months))
}

fn distance_days(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}
