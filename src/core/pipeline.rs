//! End-to-end run: categorize the roster, mix it under both policies,
//! recompute the stats and name every output table.

use tracing::{info, info_span};

use crate::core::analysis::{
    categorize, group_size_target, recompute_stats, round_robin_mix, uniform_mix,
    validate_group_count, AllocationPlan, Group, GroupStats, MixPolicy,
};
use crate::core::operations::{
    write_records_string, write_stats_string, Artifact, ArtifactKind, CategoryEntry, Manifest,
    ManifestFile,
};
use crate::core::roster::{CategoryCode, CodeRule, Record, Roster};
use crate::error::{IoError, MixError};

/// Parameters of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixOptions {
    pub identifier_column: String,
    pub rule: CodeRule,
    pub group_count: usize,
}

impl Default for MixOptions {
    fn default() -> Self {
        Self {
            identifier_column: "Roll".to_string(),
            rule: CodeRule::default(),
            group_count: 1,
        }
    }
}

/// Everything a run produces, still in memory
#[derive(Debug, Clone)]
pub struct MixOutcome {
    pub headers: Vec<String>,
    pub group_count: usize,
    pub group_size: usize,
    pub total_records: usize,
    /// Category codes with their record counts, first-seen order
    pub categories: Vec<(CategoryCode, usize)>,
    /// All records of each category, original order
    pub branches: Vec<(CategoryCode, Vec<Record>)>,
    pub round_robin: Vec<Group>,
    pub uniform: Vec<Group>,
    /// Block allocations behind `uniform`
    pub uniform_plan: AllocationPlan,
    pub round_robin_stats: GroupStats,
    pub uniform_stats: GroupStats,
}

/// Run the whole grouping pipeline on an in-memory roster.
///
/// Each policy gets its own copy of the buckets. Nothing is returned unless
/// every step succeeds.
pub fn run_mix(roster: &Roster, options: &MixOptions) -> Result<MixOutcome, MixError> {
    let span = info_span!("run_mix", groups = options.group_count);
    let _enter = span.enter();

    let group_count = validate_group_count(options.group_count)?;
    let categorized = categorize(roster, &options.identifier_column, &options.rule)?;

    let total_records = categorized.buckets.total_records();
    let group_size = group_size_target(total_records, group_count);
    let codes = categorized.buckets.codes();

    info!(
        "Mixing {} records from {} categories into {} groups (target size {})",
        total_records,
        codes.len(),
        group_count,
        group_size
    );

    let round_robin = round_robin_mix(categorized.buckets.clone(), group_count)?;
    let (uniform_plan, uniform) = uniform_mix(categorized.buckets.clone(), group_count)?;

    let round_robin_stats =
        recompute_stats(&round_robin, categorized.id_column, &options.rule, &codes)?;
    let uniform_stats = recompute_stats(&uniform, categorized.id_column, &options.rule, &codes)?;

    let categories = categorized.category_counts();
    let branches = categorized
        .buckets
        .into_entries()
        .into_iter()
        .map(|bucket| (bucket.code, bucket.records))
        .collect();

    Ok(MixOutcome {
        headers: roster.headers().to_vec(),
        group_count,
        group_size,
        total_records,
        categories,
        branches,
        round_robin,
        uniform,
        uniform_plan,
        round_robin_stats,
        uniform_stats,
    })
}

impl MixOutcome {
    pub fn groups(&self, policy: MixPolicy) -> &[Group] {
        match policy {
            MixPolicy::RoundRobin => &self.round_robin,
            MixPolicy::Uniform => &self.uniform,
        }
    }

    pub fn stats(&self, policy: MixPolicy) -> &GroupStats {
        match policy {
            MixPolicy::RoundRobin => &self.round_robin_stats,
            MixPolicy::Uniform => &self.uniform_stats,
        }
    }

    /// File name of a group table, e.g. `group_uniform_g2.csv`
    pub fn group_file_name(policy: MixPolicy, group: &Group) -> String {
        format!("{}_{}.csv", policy.file_prefix(), group.label())
    }

    /// File name of a policy's stats table, e.g. `uniform_stats_4_groups.csv`
    pub fn stats_file_name(&self, policy: MixPolicy) -> String {
        format!("{}_{}_groups.csv", policy.stats_prefix(), self.group_count)
    }

    /// Render every output table as CSV: branches, round-robin groups,
    /// uniform groups, then the two stats tables.
    pub fn artifacts(&self) -> Result<Vec<Artifact>, IoError> {
        let mut artifacts = Vec::new();

        for (code, records) in &self.branches {
            artifacts.push(Artifact {
                name: format!("branch_{}.csv", code),
                kind: ArtifactKind::Branch,
                contents: write_records_string(&self.headers, records)?,
            });
        }

        for (policy, kind) in [
            (MixPolicy::RoundRobin, ArtifactKind::RoundRobinGroup),
            (MixPolicy::Uniform, ArtifactKind::UniformGroup),
        ] {
            for group in self.groups(policy) {
                artifacts.push(Artifact {
                    name: Self::group_file_name(policy, group),
                    kind,
                    contents: write_records_string(&self.headers, &group.records)?,
                });
            }
        }

        for policy in [MixPolicy::RoundRobin, MixPolicy::Uniform] {
            artifacts.push(Artifact {
                name: self.stats_file_name(policy),
                kind: ArtifactKind::Stats,
                contents: write_stats_string(self.stats(policy))?,
            });
        }

        Ok(artifacts)
    }

    /// Describe this run and the given artifacts
    pub fn manifest(&self, artifacts: &[Artifact]) -> Manifest {
        Manifest {
            generated_at: chrono::Local::now().to_rfc3339(),
            group_count: self.group_count,
            group_size: self.group_size,
            total_records: self.total_records,
            categories: self
                .categories
                .iter()
                .map(|(code, count)| CategoryEntry {
                    code: code.to_string(),
                    count: *count,
                })
                .collect(),
            round_robin_group_sizes: self.round_robin.iter().map(Group::len).collect(),
            uniform_group_sizes: self.uniform.iter().map(Group::len).collect(),
            uniform_plan: self.uniform_plan.clone(),
            files: artifacts
                .iter()
                .map(|a| ManifestFile {
                    name: a.name.clone(),
                    kind: a.kind,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::operations::read_roster_str;

    const SAMPLE: &str = "Roll,Name\n\
        2101CS01,a\n2101CS02,b\n2101EE01,c\n2101CS03,d\n\
        2101EE02,e\n2101CS04,f\n2101EE03,g\n2101CS05,h\n";

    fn options(groups: usize) -> MixOptions {
        MixOptions {
            group_count: groups,
            ..MixOptions::default()
        }
    }

    #[test]
    fn test_run_mix_produces_both_policies() {
        let roster = read_roster_str(SAMPLE).unwrap();
        let outcome = run_mix(&roster, &options(2)).unwrap();

        assert_eq!(outcome.group_size, 4);
        assert_eq!(outcome.total_records, 8);
        assert_eq!(
            outcome.categories,
            vec![(CategoryCode::new("CS"), 5), (CategoryCode::new("EE"), 3)]
        );
        assert_eq!(outcome.round_robin.len(), 2);
        assert_eq!(outcome.uniform.len(), 2);
        assert_eq!(outcome.round_robin_stats.rows[0].counts, vec![2, 2]);
        assert_eq!(outcome.round_robin_stats.rows[1].counts, vec![3, 1]);
        assert_eq!(outcome.uniform_stats.rows[0].counts, vec![4, 0]);
        assert_eq!(outcome.uniform_stats.rows[1].counts, vec![1, 3]);
    }

    #[test]
    fn test_artifact_names_follow_groups() {
        let roster = read_roster_str(SAMPLE).unwrap();
        let outcome = run_mix(&roster, &options(3)).unwrap();
        let names: Vec<String> = outcome
            .artifacts()
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "branch_CS.csv",
                "branch_EE.csv",
                "group_branch_wise_g1.csv",
                "group_branch_wise_g2.csv",
                "group_branch_wise_g3.csv",
                "group_uniform_g1.csv",
                "group_uniform_g2.csv",
                "group_uniform_g3.csv",
                "branchwise_stats_3_groups.csv",
                "uniform_stats_3_groups.csv",
            ]
        );
    }

    #[test]
    fn test_branch_artifact_keeps_original_order() {
        let roster = read_roster_str(SAMPLE).unwrap();
        let outcome = run_mix(&roster, &options(1)).unwrap();
        let artifacts = outcome.artifacts().unwrap();
        assert_eq!(
            artifacts[1].contents,
            "Roll,Name\n2101EE01,c\n2101EE02,e\n2101EE03,g\n"
        );
    }

    #[test]
    fn test_invalid_group_count_checked_first() {
        let roster = read_roster_str("Name\nx\n").unwrap();
        assert_eq!(
            run_mix(&roster, &options(0)).unwrap_err(),
            MixError::InvalidGroupCount(0)
        );
    }

    #[test]
    fn test_missing_column_aborts() {
        let roster = read_roster_str("Name\nx\n").unwrap();
        assert!(matches!(
            run_mix(&roster, &options(2)),
            Err(MixError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_manifest_lists_sizes_and_files() {
        let roster = read_roster_str(SAMPLE).unwrap();
        let outcome = run_mix(&roster, &options(2)).unwrap();
        let artifacts = outcome.artifacts().unwrap();
        let manifest = outcome.manifest(&artifacts);

        assert_eq!(manifest.round_robin_group_sizes, vec![4, 4]);
        assert_eq!(manifest.uniform_group_sizes, vec![4, 4]);
        assert_eq!(manifest.files.len(), artifacts.len());
        assert_eq!(manifest.categories[1].code, "EE");
        assert_eq!(manifest.uniform_plan.group_sizes(), vec![4, 4]);
        assert_eq!(manifest.uniform_plan.groups[1].len(), 2);
    }
}
