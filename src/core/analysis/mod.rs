mod categorizer;
mod group;
mod round_robin;
mod stats;
mod uniform;

pub use categorizer::{categorize, Bucket, Buckets, Categorized};
pub use group::{group_size_target, validate_group_count, Group, MixPolicy};
pub use round_robin::round_robin_mix;
pub use stats::{recompute_stats, GroupStats, StatsRow};
pub use uniform::{materialize_plan, plan_uniform_allocation, uniform_mix, Allocation, AllocationPlan};
