use std::fs;

use tempfile::tempdir;

use branch_mix::core::{read_roster_str, write_artifacts, MixPolicy, MANIFEST_FILE_NAME};
use branch_mix::{run_mix, IoError, MixError, MixOptions};

/// Five A-branch rolls and three B-branch rolls, interleaved
const ROSTER: &str = "Roll,Name,Email\n\
    2101AA00,a0,a0@x\n2101BB00,b0,b0@x\n2101AA01,a1,a1@x\n2101AA02,a2,a2@x\n\
    2101BB01,b1,b1@x\n2101AA03,a3,a3@x\n2101BB02,b2,b2@x\n2101AA04,a4,a4@x\n";

fn options(groups: usize) -> MixOptions {
    MixOptions {
        group_count: groups,
        ..MixOptions::default()
    }
}

fn names(outcome: &branch_mix::MixOutcome, policy: MixPolicy, idx: usize) -> Vec<String> {
    outcome.groups(policy)[idx]
        .records
        .iter()
        .map(|r| r.fields[1].clone())
        .collect()
}

#[test]
fn two_groups_match_worked_example() {
    let roster = read_roster_str(ROSTER).unwrap();
    let outcome = run_mix(&roster, &options(2)).unwrap();

    assert_eq!(outcome.group_size, 4);
    assert_eq!(names(&outcome, MixPolicy::RoundRobin, 0), ["a0", "b0", "a1", "b1"]);
    assert_eq!(names(&outcome, MixPolicy::RoundRobin, 1), ["a2", "b2", "a3", "a4"]);
    assert_eq!(names(&outcome, MixPolicy::Uniform, 0), ["a0", "a1", "a2", "a3"]);
    assert_eq!(names(&outcome, MixPolicy::Uniform, 1), ["a4", "b0", "b1", "b2"]);
}

#[test]
fn one_group_is_the_whole_roster() {
    let roster = read_roster_str(ROSTER).unwrap();
    let outcome = run_mix(&roster, &options(1)).unwrap();

    for policy in [MixPolicy::RoundRobin, MixPolicy::Uniform] {
        let groups = outcome.groups(policy);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), roster.len());
        assert_eq!(outcome.stats(policy).rows.len(), 1);
        assert_eq!(outcome.stats(policy).rows[0].counts, vec![5, 3]);
    }
}

#[test]
fn malformed_identifier_aborts_without_output() {
    let roster = read_roster_str("Roll,Name\n2101AA00,a\n21,b\n").unwrap();
    let err = run_mix(&roster, &options(2)).unwrap_err();
    assert_eq!(
        err,
        MixError::MalformedIdentifier {
            row: 1,
            value: "21".to_string(),
            required: 6,
        }
    );
}

#[test]
fn header_only_roster_gives_empty_uniform_groups() {
    let roster = read_roster_str("Roll,Name\n").unwrap();
    let outcome = run_mix(&roster, &options(3)).unwrap();

    assert!(outcome.round_robin.is_empty());
    assert_eq!(outcome.uniform.len(), 3);
    assert!(outcome.branches.is_empty());
    let artifacts = outcome.artifacts().unwrap();
    let stats = artifacts
        .iter()
        .find(|a| a.name == "uniform_stats_3_groups.csv")
        .unwrap();
    assert_eq!(stats.contents, "group\ng1\ng2\ng3\n");
}

#[test]
fn export_writes_every_table() {
    let dir = tempdir().unwrap();
    let roster = read_roster_str(ROSTER).unwrap();
    let outcome = run_mix(&roster, &options(2)).unwrap();
    let artifacts = outcome.artifacts().unwrap();
    let manifest = outcome.manifest(&artifacts);

    let written = write_artifacts(dir.path(), &artifacts, &manifest).unwrap();
    assert_eq!(written.len(), artifacts.len() + 1);

    let uniform_g2 = fs::read_to_string(dir.path().join("group_uniform_g2.csv")).unwrap();
    assert_eq!(
        uniform_g2,
        "Roll,Name,Email\n2101AA04,a4,a4@x\n2101BB00,b0,b0@x\n2101BB01,b1,b1@x\n2101BB02,b2,b2@x\n"
    );

    let stats = fs::read_to_string(dir.path().join("branchwise_stats_2_groups.csv")).unwrap();
    assert_eq!(stats, "group,AA,BB\ng1,2,2\ng2,3,1\n");

    let branch = fs::read_to_string(dir.path().join("branch_BB.csv")).unwrap();
    assert_eq!(branch.lines().count(), 4);

    let manifest_json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join(MANIFEST_FILE_NAME)).unwrap())
            .unwrap();
    assert_eq!(manifest_json["group_count"], 2);
    assert_eq!(manifest_json["uniform_group_sizes"], serde_json::json!([4, 4]));
}

#[test]
fn separator_in_branch_code_aborts_export_before_writing() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out");
    let roster = read_roster_str("Roll,Name\n2101CS01,a\n2101/x01,b\n").unwrap();
    let outcome = run_mix(&roster, &options(1)).unwrap();
    let artifacts = outcome.artifacts().unwrap();
    let manifest = outcome.manifest(&artifacts);

    let err = write_artifacts(&out, &artifacts, &manifest).unwrap_err();

    assert!(matches!(err, IoError::InvalidArtifactName { ref name } if name == "branch_/x.csv"));
    assert!(!out.exists());
}
