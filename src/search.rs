//! Substring search and relevance ranking over an icon snapshot.

use crate::models::{FileRecord, SearchResult};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;

const EXACT_MATCH_SCORE: i64 = 100;
const PREFIX_MATCH_SCORE: i64 = 50;
const DIRECTORY_MATCH_SCORE: i64 = 25;
const NAME_MATCH_SCORE: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Only records whose directory equals the filter.
    #[default]
    Exact,
    /// The filtered directory and everything below it.
    Subtree,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryFilter {
    pub directory: String,
    pub mode: FilterMode,
}

impl DirectoryFilter {
    pub fn exact(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            mode: FilterMode::Exact,
        }
    }

    pub fn subtree(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            mode: FilterMode::Subtree,
        }
    }

    pub fn matches(&self, directory: &str) -> bool {
        match self.mode {
            FilterMode::Exact => directory == self.directory,
            FilterMode::Subtree => directory
                .strip_prefix(self.directory.as_str())
                .map_or(false, |rest| rest.is_empty() || rest.starts_with('/')),
        }
    }
}

pub fn search(records: &[FileRecord], query: &str, filter: Option<&DirectoryFilter>) -> SearchResult {
    let directories = directory_roster(records);
    let scoped = records
        .iter()
        .filter(|record| filter.map_or(true, |f| f.matches(&record.directory)));

    let needle = query.trim().to_lowercase();
    let icons: Vec<FileRecord> = if needle.is_empty() {
        let mut icons: Vec<FileRecord> = scoped.cloned().collect();
        icons.sort_by(by_location);
        icons
    } else {
        let mut scored: Vec<(i64, &FileRecord)> = scoped
            .filter(|record| matches_query(record, &needle))
            .map(|record| (relevance(record, &needle), record))
            .collect();
        scored.sort_by(|(score_a, a), (score_b, b)| {
            score_b.cmp(score_a).then_with(|| by_location(a, b))
        });
        scored.into_iter().map(|(_, record)| record.clone()).collect()
    };

    debug!(query = %query, matches = icons.len(), scanned = records.len(), "Search complete");
    SearchResult::new(icons, query, directories)
}

/// Distinct directories of the whole snapshot, sorted ascending.
pub fn directory_roster(records: &[FileRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.directory.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn by_location(a: &FileRecord, b: &FileRecord) -> Ordering {
    a.directory
        .cmp(&b.directory)
        .then_with(|| a.name.cmp(&b.name))
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 => &name[..idx],
        _ => name,
    }
}

fn match_targets(record: &FileRecord) -> Vec<String> {
    let name = record.name.to_lowercase();
    let stem = strip_extension(&name).to_string();
    let directory = record.directory.to_lowercase();
    let relative_path = record.relative_path.to_lowercase();

    let mut targets: Vec<String> = stem.split('-').map(str::to_string).collect();
    targets.extend(directory.split('/').map(str::to_string));
    targets.extend(relative_path.split('/').map(str::to_string));
    targets.push(name);
    targets.push(stem);
    targets.push(directory);
    targets.push(relative_path);
    targets
}

fn matches_query(record: &FileRecord, needle: &str) -> bool {
    match_targets(record)
        .iter()
        .any(|target| target.contains(needle))
}

fn relevance(record: &FileRecord, needle: &str) -> i64 {
    let name = record.name.to_lowercase();
    let stem = strip_extension(&name);
    let mut score = 0;

    if name == needle || stem == needle {
        score += EXACT_MATCH_SCORE;
    }
    if name.starts_with(needle) || stem.starts_with(needle) {
        score += PREFIX_MATCH_SCORE;
    }
    if record.directory.to_lowercase().contains(needle) {
        score += DIRECTORY_MATCH_SCORE;
    }
    if name.contains(needle) {
        score += NAME_MATCH_SCORE;
    }

    score - record.depth as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, directory: &str, depth: usize) -> FileRecord {
        let relative_path = if directory == crate::models::ROOT_DIRECTORY {
            name.to_string()
        } else {
            format!("{}/{}", directory, name)
        };
        FileRecord {
            name: name.to_string(),
            path: format!("/{}", relative_path),
            relative_path,
            directory: directory.to_string(),
            size: None,
            last_modified: None,
            depth,
        }
    }

    fn lambda_records() -> Vec<FileRecord> {
        vec![
            record("aws-lambda-arch.png", "compute/diagrams", 2),
            record("lambda-function.svg", "compute", 1),
            record("lambda.svg", "root", 0),
        ]
    }

    fn names(result: &SearchResult) -> Vec<&str> {
        result.icons.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_lambda_ranking_scenario() {
        let records = lambda_records();
        let result = search(&records, "lambda", None);

        assert_eq!(
            names(&result),
            vec!["lambda.svg", "lambda-function.svg", "aws-lambda-arch.png"]
        );
        assert_eq!(result.total, 3);
        assert_eq!(result.query, "lambda");

        let scores: Vec<i64> = result
            .icons
            .iter()
            .map(|r| relevance(r, "lambda"))
            .collect();
        assert_eq!(scores, vec![160, 59, 8]);
    }

    #[test]
    fn test_empty_query_with_directory_filter() {
        let records = lambda_records();
        let filter = DirectoryFilter::exact("compute");
        let result = search(&records, "", Some(&filter));

        assert_eq!(names(&result), vec!["lambda-function.svg"]);
        assert_eq!(
            result.directories,
            vec!["compute", "compute/diagrams", "root"]
        );
    }

    #[test]
    fn test_empty_query_returns_every_record_sorted_by_location() {
        let records = vec![
            record("b.svg", "zeta", 1),
            record("a.svg", "alpha", 1),
            record("c.svg", "alpha", 1),
            record("a.svg", "root", 0),
        ];

        let result = search(&records, "   ", None);

        let locations: Vec<(&str, &str)> = result
            .icons
            .iter()
            .map(|r| (r.directory.as_str(), r.name.as_str()))
            .collect();
        assert_eq!(
            locations,
            vec![
                ("alpha", "a.svg"),
                ("alpha", "c.svg"),
                ("root", "a.svg"),
                ("zeta", "b.svg")
            ]
        );
        assert_eq!(result.total, records.len());
        assert_eq!(result.query, "   ");
    }

    #[test]
    fn test_every_match_satisfies_substring_predicate() {
        let records = vec![
            record("ec2.svg", "aws/compute", 2),
            record("s3-bucket.svg", "aws/storage", 2),
            record("vm.png", "azure", 1),
            record("logo.ico", "root", 0),
        ];

        for query in ["aws", "S3", "compute", "o", "svg", "zzz"] {
            let result = search(&records, query, None);
            let needle = query.to_lowercase();
            for icon in &result.icons {
                assert!(
                    matches_query(icon, &needle),
                    "{} should not match {}",
                    icon.name,
                    query
                );
            }
        }

        assert!(search(&records, "zzz", None).icons.is_empty());
        assert_eq!(names(&search(&records, "storage", None)), vec!["s3-bucket.svg"]);
    }

    #[test]
    fn test_exact_match_outranks_prefix_match() {
        let records = vec![
            record("ec2-instance.svg", "aws", 1),
            record("ec2.svg", "aws", 1),
        ];

        let result = search(&records, "ec2", None);
        assert_eq!(names(&result), vec!["ec2.svg", "ec2-instance.svg"]);
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored_when_matching() {
        let records = vec![record("ec2.svg", "aws", 1), record("s3.svg", "aws", 1)];

        let result = search(&records, "  EC2 ", None);
        assert_eq!(names(&result), vec!["ec2.svg"]);
        assert_eq!(relevance(&result.icons[0], "ec2"), 159);
        assert_eq!(result.query, "  EC2 ");
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let records = vec![record("Lambda.SVG", "Compute", 1)];
        let result = search(&records, "LAMBDA", None);

        assert_eq!(result.total, 1);
        assert_eq!(result.query, "LAMBDA");
        assert_eq!(relevance(&result.icons[0], "lambda"), 159);
    }

    #[test]
    fn test_shallower_record_ranks_first_when_otherwise_equal() {
        let records = vec![
            record("queue.svg", "a/b/c", 3),
            record("queue.svg", "a/b", 2),
            record("queue.svg", "a", 1),
        ];

        let result = search(&records, "queue", None);
        let depths: Vec<usize> = result.icons.iter().map(|r| r.depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn test_ties_break_by_directory_then_name() {
        let records = vec![
            record("icon-b.svg", "beta", 1),
            record("icon-a.svg", "beta", 1),
            record("icon-z.svg", "alpha", 1),
        ];

        let result = search(&records, "icon", None);
        assert_eq!(names(&result), vec!["icon-z.svg", "icon-a.svg", "icon-b.svg"]);
    }

    #[test]
    fn test_directory_match_adds_bonus() {
        let records = vec![
            record("thing.svg", "network", 1),
            record("network-thing.svg", "misc", 1),
        ];

        let result = search(&records, "network", None);
        // prefix + name beats directory-only
        assert_eq!(names(&result), vec!["network-thing.svg", "thing.svg"]);
        assert_eq!(relevance(&result.icons[1], "network"), 24);
    }

    #[test]
    fn test_roster_ignores_filter_and_deduplicates() {
        let records = vec![
            record("a.svg", "storage", 1),
            record("b.svg", "storage", 1),
            record("c.svg", "compute", 1),
            record("d.svg", "root", 0),
        ];

        let filter = DirectoryFilter::exact("storage");
        let result = search(&records, "a.svg", Some(&filter));

        assert_eq!(names(&result), vec!["a.svg"]);
        assert_eq!(result.directories, vec!["compute", "root", "storage"]);
    }

    #[test]
    fn test_exact_filter_excludes_subdirectories() {
        let records = lambda_records();

        let exact = search(&records, "lambda", Some(&DirectoryFilter::exact("compute")));
        assert_eq!(names(&exact), vec!["lambda-function.svg"]);

        let subtree = search(&records, "lambda", Some(&DirectoryFilter::subtree("compute")));
        assert_eq!(
            names(&subtree),
            vec!["lambda-function.svg", "aws-lambda-arch.png"]
        );
    }

    #[test]
    fn test_subtree_filter_respects_segment_boundaries() {
        let filter = DirectoryFilter::subtree("aws");
        assert!(filter.matches("aws"));
        assert!(filter.matches("aws/compute"));
        assert!(!filter.matches("aws-legacy"));
        assert!(!filter.matches("root"));
    }

    #[test]
    fn test_empty_snapshot_yields_empty_result() {
        let result = search(&[], "lambda", None);
        assert!(result.icons.is_empty());
        assert!(result.directories.is_empty());
        assert_eq!(result.total, 0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_strip_extension() {
        assert_eq!(strip_extension("ec2.svg"), "ec2");
        assert_eq!(strip_extension("archive.tar.png"), "archive.tar");
        assert_eq!(strip_extension("noext"), "noext");
    }
}
