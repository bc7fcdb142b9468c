//! Uniform mix: fills each group to the target size by repeatedly draining
//! the category with the most records left.

use std::cmp::Reverse;

use serde::Serialize;
use tracing::{debug, info};

use super::categorizer::Buckets;
use super::group::{group_size_target, validate_group_count, Group};
use crate::core::roster::Record;
use crate::error::MixError;

/// A block of `take` records drawn from one category for one group.
///
/// Serialized into the run manifest, where `category` indexes its
/// `categories` list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Allocation {
    /// Category index in first-seen order
    pub category: usize,
    pub take: usize,
}

/// Per-group allocations, before any record is moved
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AllocationPlan {
    pub group_size: usize,
    pub groups: Vec<Vec<Allocation>>,
}

impl AllocationPlan {
    /// Number of records planned for each group
    pub fn group_sizes(&self) -> Vec<usize> {
        self.groups
            .iter()
            .map(|allocs| allocs.iter().map(|a| a.take).sum())
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tally {
    category: usize,
    remaining: usize,
}

/// Plan the uniform allocation from the per-category counts.
///
/// For each group, the categories are re-sorted by remaining count
/// (descending, ties by first-seen order) and the top one gives
/// `min(remaining, room left in the group)` records. Exhausted categories
/// drop out. Once every category is empty the remaining groups stay empty, so
/// at most one group is short of the target and only empty groups follow it.
pub fn plan_uniform_allocation(
    counts: &[usize],
    group_count: usize,
) -> Result<AllocationPlan, MixError> {
    let group_count = validate_group_count(group_count)?;
    let total: usize = counts.iter().sum();
    let group_size = group_size_target(total, group_count);

    let mut tallies: Vec<Tally> = counts
        .iter()
        .enumerate()
        .filter(|&(_, &count)| count > 0)
        .map(|(category, &remaining)| Tally {
            category,
            remaining,
        })
        .collect();

    let mut plan = AllocationPlan {
        group_size,
        groups: Vec::with_capacity(group_count),
    };

    for group_idx in 0..group_count {
        let mut allocations = Vec::new();
        let mut room = group_size;

        while room > 0 && !tallies.is_empty() {
            tallies.sort_by_key(|t| (Reverse(t.remaining), t.category));

            let top = &mut tallies[0];
            let take = top.remaining.min(room);
            allocations.push(Allocation {
                category: top.category,
                take,
            });
            top.remaining -= take;
            room -= take;

            if top.remaining == 0 {
                tallies.remove(0);
            }
        }

        debug!(
            "Uniform group g{}: {:?} ({} of {} filled)",
            group_idx + 1,
            allocations,
            group_size - room,
            group_size
        );
        plan.groups.push(allocations);
    }

    Ok(plan)
}

/// Slice each group's planned blocks off the front of the buckets.
///
/// A category shows up at most once per group; within a group the blocks are
/// laid out in category first-seen order.
pub fn materialize_plan(plan: &AllocationPlan, buckets: Buckets) -> Vec<Group> {
    let mut drains: Vec<std::vec::IntoIter<Record>> = buckets
        .into_entries()
        .into_iter()
        .map(|bucket| bucket.records.into_iter())
        .collect();

    plan.groups
        .iter()
        .enumerate()
        .map(|(idx, allocations)| {
            let mut ordered = allocations.clone();
            ordered.sort_by_key(|a| a.category);

            let mut records = Vec::with_capacity(plan.group_size);
            for allocation in ordered {
                if let Some(drain) = drains.get_mut(allocation.category) {
                    records.extend(drain.by_ref().take(allocation.take));
                }
            }
            Group::new(idx + 1, records)
        })
        .collect()
}

/// Plan and materialize the uniform mix on this policy's own bucket copy.
///
/// Always returns exactly `group_count` groups; trailing groups are empty when
/// there are more groups than records. The plan is returned alongside so it
/// can be reported.
pub fn uniform_mix(
    buckets: Buckets,
    group_count: usize,
) -> Result<(AllocationPlan, Vec<Group>), MixError> {
    let plan = plan_uniform_allocation(&buckets.counts(), group_count)?;
    let groups = materialize_plan(&plan, buckets);

    info!(
        "Uniform mix: {} groups with target size {}, sizes {:?}",
        groups.len(),
        plan.group_size,
        plan.group_sizes()
    );

    Ok((plan, groups))
}
