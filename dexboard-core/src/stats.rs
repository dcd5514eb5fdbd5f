//! Category distribution over the catalog

use serde::Serialize;
use std::collections::HashMap;

use crate::catalog::CatalogEntry;

/// Color for any category missing from the table
pub const DEFAULT_CATEGORY_COLOR: &str = "#2a75bb";

const CATEGORY_COLORS: [(&str, &str); 18] = [
    ("grass", "#78C850"),
    ("fire", "#F08030"),
    ("water", "#6890F0"),
    ("bug", "#A8B820"),
    ("normal", "#A8A878"),
    ("poison", "#A040A0"),
    ("electric", "#F8D030"),
    ("ground", "#E0C068"),
    ("fairy", "#EE99AC"),
    ("fighting", "#C03028"),
    ("psychic", "#F85888"),
    ("rock", "#B8A038"),
    ("ghost", "#705898"),
    ("ice", "#98D8D8"),
    ("dragon", "#7038F8"),
    ("dark", "#705848"),
    ("steel", "#B8B8D0"),
    ("flying", "#A890F0"),
];

/// Display color for a category tag, exact match
pub fn category_color(category: &str) -> &'static str {
    CATEGORY_COLORS
        .iter()
        .find(|(tag, _)| *tag == category)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_CATEGORY_COLOR)
}

/// Category counts, in the order categories were first seen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryStats {
    order: Vec<String>,
    counts: HashMap<String, usize>,
}

/// One chart row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBar {
    pub category: String,
    pub count: usize,
    pub color: &'static str,
}

impl CategoryStats {
    pub fn get(&self, category: &str) -> Option<usize> {
        self.counts.get(category).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sum of all category occurrences
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.order
            .iter()
            .map(|category| (category.as_str(), self.counts[category]))
    }

    pub fn bars(&self) -> Vec<CategoryBar> {
        self.iter()
            .map(|(category, count)| CategoryBar {
                category: category.to_string(),
                count,
                color: category_color(category),
            })
            .collect()
    }

    fn record(&mut self, category: &str) {
        match self.counts.get_mut(category) {
            Some(count) => *count += 1,
            None => {
                self.order.push(category.to_string());
                self.counts.insert(category.to_string(), 1);
            }
        }
    }
}

/// Count every category occurrence across `entries`
pub fn aggregate<'a, I>(entries: I) -> CategoryStats
where
    I: IntoIterator<Item = &'a CatalogEntry>,
{
    let mut stats = CategoryStats::default();
    for entry in entries {
        for category in &entry.categories {
            stats.record(category);
        }
    }
    stats
}
