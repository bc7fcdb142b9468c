use crate::core::roster::Record;
use crate::error::MixError;

/// Allocation policy that produced a set of groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MixPolicy {
    /// Categories interleaved one record at a time
    RoundRobin,
    /// Largest remaining category drained first
    Uniform,
}

impl MixPolicy {
    pub fn as_str(&self) -> &str {
        match self {
            MixPolicy::RoundRobin => "Group-Branch-wise Mix",
            MixPolicy::Uniform => "Uniform Mix",
        }
    }

    /// File name prefix used for this policy's group tables
    pub fn file_prefix(&self) -> &str {
        match self {
            MixPolicy::RoundRobin => "group_branch_wise",
            MixPolicy::Uniform => "group_uniform",
        }
    }

    /// File name prefix used for this policy's stats table
    pub fn stats_prefix(&self) -> &str {
        match self {
            MixPolicy::RoundRobin => "branchwise_stats",
            MixPolicy::Uniform => "uniform_stats",
        }
    }
}

/// One output partition. Numbered from 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub number: usize,
    pub records: Vec<Record>,
}

impl Group {
    pub fn new(number: usize, records: Vec<Record>) -> Self {
        Self { number, records }
    }

    /// Label used in stats rows and file names, e.g. `g3`
    pub fn label(&self) -> String {
        format!("g{}", self.number)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reject a group count of zero
pub fn validate_group_count(group_count: usize) -> Result<usize, MixError> {
    if group_count == 0 {
        return Err(MixError::InvalidGroupCount(group_count));
    }
    Ok(group_count)
}

/// `ceil(total / group_count)`; zero for an empty roster
pub fn group_size_target(total: usize, group_count: usize) -> usize {
    total.div_ceil(group_count.max(1))
}
