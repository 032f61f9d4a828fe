use crate::providers::Dependency;
use clap::ValueEnum;
use core::cmp::Ordering;
use serde::{Deserialize, Serialize};
use strum::Display;

/// How the list of dependents is ordered before truncation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    /// Most downloaded first
    #[default]
    Downloads,

    /// Alphabetical by package name
    Name,
}

/// Threshold, ordering, and size limit applied to a fetched list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Drop packages with fewer downloads; unreported downloads count as zero.
    pub min_downloads: Option<u64>,

    /// Reorder the list; `None` keeps upstream order.
    pub sort: Option<SortOrder>,

    /// Keep at most this many packages, applied after sorting.
    pub max_results: Option<usize>,
}

/// Apply `options` to `dependencies`: threshold, then sort, then limit.
///
/// Unreported downloads count as zero. Sorting is stable, so ties keep upstream order.
#[must_use]
pub fn filter_dependencies(dependencies: &[Dependency], options: &FilterOptions) -> Vec<Dependency> {
    let mut filtered: Vec<Dependency> = match options.min_downloads {
        Some(min) => dependencies.iter().filter(|d| d.downloads_or_zero() >= min).cloned().collect(),
        None => dependencies.to_vec(),
    };

    match options.sort {
        Some(SortOrder::Downloads) => filtered.sort_by(|a, b| b.downloads_or_zero().cmp(&a.downloads_or_zero())),
        Some(SortOrder::Name) => filtered.sort_by(|a, b| compare_names(&a.name, &b.name)),
        None => {}
    }

    if let Some(max) = options.max_results {
        filtered.truncate(max);
    }

    filtered
}

/// Case-insensitive order, with byte order breaking ties between names differing only in case.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}
