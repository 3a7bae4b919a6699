use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::chart::ComparisonSeries;
use crate::models::series::{series_label, NamedSeries, TimePoint};

/// Aligns series onto a shared date axis and rebases them to start at 0,
/// so portfolio, benchmark and asset curves can be overlaid on one chart.
///
/// Pure business logic, no I/O.
pub struct SeriesService;

impl SeriesService {
    pub fn new() -> Self {
        Self
    }

    /// Rebase `series` onto `axis`.
    ///
    /// For each axis date the value is the exact point on that date, else the
    /// most recent earlier point (carried forward, never interpolated), else the
    /// baseline. The baseline is the value found that way for `axis[0]`, or 0
    /// when the series has nothing on or before it. The baseline is subtracted
    /// from every point, so the first output is always 0.
    ///
    /// `axis` is expected sorted ascending and already filtered to the range.
    pub fn normalize(&self, series: &[TimePoint], axis: &[NaiveDate]) -> Vec<TimePoint> {
        let Some(&first) = axis.first() else {
            return Vec::new();
        };

        // Later points on the same date win.
        let lookup: BTreeMap<NaiveDate, f64> = series.iter().map(|p| (p.date, p.value)).collect();
        let value_at = |date: NaiveDate| lookup.range(..=date).next_back().map(|(_, v)| *v);

        let baseline = value_at(first).unwrap_or(0.0);

        axis.iter()
            .map(|&date| TimePoint {
                date,
                value: value_at(date).unwrap_or(baseline) - baseline,
            })
            .collect()
    }

    /// Sorted, deduplicated union of the dates of `series`, keeping dates `>= cutoff`.
    pub fn date_axis<'a, I>(&self, series: I, cutoff: NaiveDate) -> Vec<NaiveDate>
    where
        I: IntoIterator<Item = &'a [TimePoint]>,
    {
        let dates: BTreeSet<NaiveDate> = series
            .into_iter()
            .flat_map(|s| s.iter().map(|p| p.date))
            .filter(|d| *d >= cutoff)
            .collect();
        dates.into_iter().collect()
    }

    /// Build one rebased curve per requested key over the union axis of those keys.
    ///
    /// Keys missing from `source` are skipped. Each curve is labelled with its
    /// display name.
    pub fn compare(
        &self,
        source: &NamedSeries,
        keys: &[&str],
        cutoff: NaiveDate,
    ) -> Vec<ComparisonSeries> {
        let present: Vec<(&str, &Vec<TimePoint>)> = keys
            .iter()
            .filter_map(|k| source.get(*k).map(|s| (*k, s)))
            .collect();

        let axis = self.date_axis(present.iter().map(|(_, s)| s.as_slice()), cutoff);

        present
            .into_iter()
            .map(|(key, series)| ComparisonSeries {
                key: key.to_string(),
                label: series_label(key).to_string(),
                points: self.normalize(series, &axis),
            })
            .collect()
    }
}

impl Default for SeriesService {
    fn default() -> Self {
        Self::new()
    }
}
