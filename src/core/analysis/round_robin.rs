//! Group-branch-wise mix: fills groups by cycling through the categories,
//! one record from each category per turn.

use tracing::{debug, info, warn};

use super::categorizer::Buckets;
use super::group::{group_size_target, validate_group_count, Group};
use crate::core::roster::Record;
use crate::error::MixError;

/// Build groups by interleaving the categories in first-seen order.
///
/// A cursor walks `(category, round)` pairs in order `c mod k`, `c div k`.
/// Each record slot takes the first pair whose bucket still has a record at
/// that round, so exhausted categories are skipped. A group is closed every
/// `ceil(total / group_count)` records and the last group closes when the
/// records run out.
///
/// The number of groups is `ceil(total / target)`, which can be fewer than
/// `group_count` when the sizes don't divide evenly (9 records in 4 groups
/// gives three groups of 3). No group is ever created empty.
///
/// # Arguments
/// * `buckets` - This policy's own copy of the buckets; it is consumed
/// * `group_count` - Requested number of groups (at least 1)
///
/// # Returns
/// * `Ok(Vec<Group>)` with every record exactly once
/// * `Err(MixError::InvalidGroupCount)` if `group_count` is zero
pub fn round_robin_mix(buckets: Buckets, group_count: usize) -> Result<Vec<Group>, MixError> {
    let group_count = validate_group_count(group_count)?;
    let total = buckets.total_records();
    let target = group_size_target(total, group_count);
    let category_count = buckets.len();

    // A category's rounds are visited in increasing order, so its next
    // unread record is always the one at the current round.
    let lens: Vec<usize> = buckets.counts();
    let mut drains: Vec<std::vec::IntoIter<Record>> = buckets
        .into_entries()
        .into_iter()
        .map(|bucket| bucket.records.into_iter())
        .collect();

    let mut groups: Vec<Group> = Vec::new();
    let mut current: Vec<Record> = Vec::with_capacity(target);
    let mut cursor = 0usize;

    for slot in 0..total {
        if current.len() == target {
            let number = groups.len() + 1;
            debug!("Closing round-robin group g{} with {} records", number, current.len());
            groups.push(Group::new(number, std::mem::take(&mut current)));
        }

        let record = loop {
            let category = cursor % category_count;
            let round = cursor / category_count;
            cursor += 1;
            if round < lens[category] {
                if let Some(record) = drains[category].next() {
                    break record;
                }
            }
        };
        current.push(record);

        if slot + 1 == total {
            let number = groups.len() + 1;
            debug!("Closing round-robin group g{} with {} records", number, current.len());
            groups.push(Group::new(number, std::mem::take(&mut current)));
        }
    }

    if groups.len() < group_count {
        warn!(
            "Round-robin mix produced {} of {} requested groups (target size {})",
            groups.len(),
            group_count,
            target
        );
    }
    info!(
        "Round-robin mix: {} records into {} groups of up to {}",
        total,
        groups.len(),
        target
    );

    Ok(groups)
}
