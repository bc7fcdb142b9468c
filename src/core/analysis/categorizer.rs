use std::collections::HashMap;

use tracing::{debug, info};

use crate::core::roster::{CategoryCode, CodeRule, Record, Roster};
use crate::error::MixError;

/// Records sharing one category code, in source order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    pub code: CategoryCode,
    pub records: Vec<Record>,
}

impl Bucket {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Per-category buckets in first-seen order.
///
/// Each allocator takes its own copy by value and drains it; the
/// categorizer's copy is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buckets {
    entries: Vec<Bucket>,
}

impl Buckets {
    pub fn from_entries(entries: Vec<Bucket>) -> Self {
        Self { entries }
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of records across all categories
    pub fn total_records(&self) -> usize {
        self.entries.iter().map(Bucket::len).sum()
    }

    pub fn codes(&self) -> Vec<CategoryCode> {
        self.entries.iter().map(|b| b.code.clone()).collect()
    }

    /// Record count per category, in first-seen order
    pub fn counts(&self) -> Vec<usize> {
        self.entries.iter().map(Bucket::len).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Bucket> {
        self.entries
    }
}

/// Output of [`categorize`]: the identifier column plus the buckets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Categorized {
    pub id_column: usize,
    pub buckets: Buckets,
}

impl Categorized {
    /// Distinct codes with their record counts, in first-seen order
    pub fn category_counts(&self) -> Vec<(CategoryCode, usize)> {
        self.buckets
            .iter()
            .map(|b| (b.code.clone(), b.len()))
            .collect()
    }
}

/// Split a roster into per-category buckets.
///
/// Fails with `MissingColumn` before looking at any row if `id_column` is not
/// in the header, and with `MalformedIdentifier` on the first identifier too
/// short for `rule`.
pub fn categorize(
    roster: &Roster,
    id_column: &str,
    rule: &CodeRule,
) -> Result<Categorized, MixError> {
    let column = roster
        .column_index(id_column)
        .ok_or_else(|| MixError::MissingColumn {
            column: id_column.to_string(),
        })?;

    let mut index: HashMap<CategoryCode, usize> = HashMap::new();
    let mut entries: Vec<Bucket> = Vec::new();

    for record in roster.records() {
        let identifier = record.field(column).unwrap_or_default();
        let code = rule.extract(identifier, record.position)?;

        let slot = *index.entry(code.clone()).or_insert_with(|| {
            entries.push(Bucket {
                code,
                records: Vec::new(),
            });
            entries.len() - 1
        });
        entries[slot].records.push(record.clone());
    }

    for bucket in &entries {
        debug!("Category {}: {} records", bucket.code, bucket.len());
    }
    info!(
        "Categorized {} records into {} categories using column {:?}",
        roster.len(),
        entries.len(),
        id_column
    );

    Ok(Categorized {
        id_column: column,
        buckets: Buckets::from_entries(entries),
    })
}
