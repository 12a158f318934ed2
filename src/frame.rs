//! Per-month samples for the selected regions.

use std::collections::{BTreeMap, HashSet};
use std::ops::Range;

use crate::config::WORLD_ID;
use crate::hierarchy::RegionIndex;
use crate::kde::{self, EvaluationGrid};

#[derive(Clone, Debug, PartialEq)]
pub struct RatingRecord {
    pub month: String,
    pub federation: String,
    pub rating: f64,
}

impl RatingRecord {
    pub fn new(month: impl Into<String>, federation: impl Into<String>, rating: f64) -> Self {
        Self {
            month: month.into(),
            federation: federation.into(),
            rating,
        }
    }
}

/// All rating records, grouped by month.
///
/// Records are stored month by month so a frame only scans its own month.
/// Months sort lexicographically, which is chronological for `YYYY-MM`.
#[derive(Debug, Default)]
pub struct RatingTable {
    records: Vec<RatingRecord>,
    months: Vec<String>,
    spans: Vec<Range<usize>>,
}

impl RatingTable {
    pub fn new(records: Vec<RatingRecord>) -> Self {
        let mut by_month: BTreeMap<String, Vec<RatingRecord>> = BTreeMap::new();
        for record in records {
            by_month.entry(record.month.clone()).or_default().push(record);
        }

        let mut table = Self::default();
        for (month, group) in by_month {
            let start = table.records.len();
            table.records.extend(group);
            table.spans.push(start..table.records.len());
            table.months.push(month);
        }
        table
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose month equals `month`.
    pub fn month(&self, month: &str) -> &[RatingRecord] {
        match self.months.binary_search_by(|m| m.as_str().cmp(month)) {
            Ok(slot) => &self.records[self.spans[slot].clone()],
            Err(_) => &[],
        }
    }

    pub fn records(&self) -> &[RatingRecord] {
        &self.records
    }

    /// Lowest and highest rating over every month.
    pub fn rating_range(&self) -> Option<(f64, f64)> {
        let mut ratings = self.records.iter().map(|r| r.rating);
        let first = ratings.next()?;
        Some(ratings.fold((first, first), |(lo, hi), r| (lo.min(r), hi.max(r))))
    }
}

/// One selected region's samples for a month.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameEntry {
    pub key: String,
    pub name: String,
    pub samples: Vec<f64>,
    pub mean: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DensityCurve {
    pub key: String,
    pub name: String,
    pub points: Vec<[f64; 2]>,
    pub mean: f64,
    pub sample_count: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub month: String,
    pub entries: Vec<FrameEntry>,
}

impl Frame {
    pub fn curves(
        &self,
        grid: &EvaluationGrid,
        kernel: impl Fn(f64) -> f64 + Copy,
    ) -> Vec<DensityCurve> {
        self.entries
            .iter()
            .map(|entry| DensityCurve {
                key: entry.key.clone(),
                name: entry.name.clone(),
                points: kde::estimate(kernel, grid, &entry.samples),
                mean: entry.mean,
                sample_count: entry.samples.len(),
            })
            .collect()
    }

    pub fn get(&self, key: &str) -> Option<&FrameEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().sum::<f64>() / samples.len() as f64
}

/// Samples and means for every selected id in `month`, in selection order.
///
/// Entries with `min_samples` samples or fewer are left out.
pub fn build_frame<'a>(
    table: &RatingTable,
    index: &RegionIndex,
    month: &str,
    selection: impl IntoIterator<Item = &'a str>,
    min_samples: usize,
) -> Frame {
    let records = table.month(month);
    let mut entries = Vec::new();

    for key in selection {
        let (name, samples): (&str, Vec<f64>) = if key == WORLD_ID {
            (WORLD_ID, records.iter().map(|r| r.rating).collect())
        } else {
            let leaves: HashSet<String> = index.resolve(key).into_iter().collect();
            let samples = records
                .iter()
                .filter(|r| leaves.contains(&r.federation))
                .map(|r| r.rating)
                .collect();
            (index.name(key).unwrap_or(key), samples)
        };

        if samples.len() <= min_samples {
            log::trace!(
                "{month}: dropping {key} with {} samples",
                samples.len()
            );
            continue;
        }

        entries.push(FrameEntry {
            key: key.to_owned(),
            name: name.to_owned(),
            mean: mean(&samples),
            samples,
        });
    }

    Frame {
        month: month.to_owned(),
        entries,
    }
}

#[cfg(test)]
pub(crate) fn sample_table() -> RatingTable {
    let mut records = Vec::new();
    for i in 0..40 {
        records.push(RatingRecord::new("2015-01", "IND", 1500.0 + i as f64 * 10.0));
    }
    for i in 0..25 {
        records.push(RatingRecord::new("2015-01", "NOR", 2000.0 + i as f64 * 4.0));
    }
    for i in 0..5 {
        records.push(RatingRecord::new("2015-01", "CHN", 2400.0 + i as f64));
    }
    for i in 0..30 {
        records.push(RatingRecord::new("2014-12", "CHN", 1800.0 + i as f64));
    }
    RatingTable::new(records)
}
