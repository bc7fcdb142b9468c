use std::collections::HashMap;
use std::fmt;

use super::group::Group;
use crate::core::roster::{CategoryCode, CodeRule};
use crate::error::MixError;

/// Category counts for one group, aligned with [`GroupStats::codes`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsRow {
    pub group: String,
    pub counts: Vec<usize>,
}

impl StatsRow {
    /// Records in this group
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

/// Category-count-by-group summary for one policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupStats {
    pub codes: Vec<CategoryCode>,
    pub rows: Vec<StatsRow>,
}

impl GroupStats {
    /// Per-code totals over all groups
    pub fn column_totals(&self) -> Vec<usize> {
        let mut totals = vec![0; self.codes.len()];
        for row in &self.rows {
            for (total, count) in totals.iter_mut().zip(&row.counts) {
                *total += count;
            }
        }
        totals
    }
}

impl fmt::Display for GroupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.group.len())
            .chain(["group".len(), "total".len()])
            .max()
            .unwrap_or(5);
        let widths: Vec<usize> = self
            .codes
            .iter()
            .zip(self.column_totals())
            .map(|(code, total)| code.as_str().chars().count().max(total.to_string().len()))
            .collect();

        write!(f, "{:<label_width$}", "group")?;
        for (code, width) in self.codes.iter().zip(&widths) {
            write!(f, "  {:>width$}", code.as_str(), width = *width)?;
        }
        writeln!(f)?;

        for row in &self.rows {
            write!(f, "{:<label_width$}", row.group)?;
            for (count, width) in row.counts.iter().zip(&widths) {
                write!(f, "  {:>width$}", count, width = *width)?;
            }
            writeln!(f)?;
        }

        write!(f, "{:<label_width$}", "total")?;
        for (total, width) in self.column_totals().iter().zip(&widths) {
            write!(f, "  {:>width$}", total, width = *width)?;
        }
        writeln!(f)
    }
}

/// Re-derive per-group category counts from the records themselves.
///
/// Columns follow `codes`; a code found in a group but missing from `codes`
/// is appended as a new column. Groups without a given code report 0.
pub fn recompute_stats(
    groups: &[Group],
    id_column: usize,
    rule: &CodeRule,
    codes: &[CategoryCode],
) -> Result<GroupStats, MixError> {
    let mut columns: Vec<CategoryCode> = codes.to_vec();
    let mut lookup: HashMap<CategoryCode, usize> = columns
        .iter()
        .enumerate()
        .map(|(idx, code)| (code.clone(), idx))
        .collect();

    let mut rows = Vec::with_capacity(groups.len());
    for group in groups {
        let mut counts = vec![0; columns.len()];
        for record in &group.records {
            let identifier = record.field(id_column).unwrap_or_default();
            let code = rule.extract(identifier, record.position)?;
            let column = match lookup.get(&code) {
                Some(&column) => column,
                None => {
                    columns.push(code.clone());
                    lookup.insert(code, columns.len() - 1);
                    columns.len() - 1
                }
            };
            if column >= counts.len() {
                counts.resize(column + 1, 0);
            }
            counts[column] += 1;
        }
        rows.push(StatsRow {
            group: group.label(),
            counts,
        });
    }

    // Rows built before a late column appeared get a zero for it
    for row in &mut rows {
        row.counts.resize(columns.len(), 0);
    }

    Ok(GroupStats {
        codes: columns,
        rows,
    })
}
