//! Project grouping for parsed tasks.
//!
//! A task belongs to every project named by a `#project/*`, `#work/*` or
//! `#personal/*` tag it carries. Tasks without any land in the implicit
//! `uncategorized` group.

use std::collections::BTreeMap;

use crate::task::TaskRecord;

pub const UNCATEGORIZED: &str = "uncategorized";
const PROJECT_ROOTS: [&str; 3] = ["project/", "work/", "personal/"];

/// Whether a tag (without `#`) names a project.
pub fn is_project_tag(tag: &str) -> bool {
    PROJECT_ROOTS
        .iter()
        .any(|root| tag.len() > root.len() && tag.get(..root.len()).is_some_and(|p| p.eq_ignore_ascii_case(root)))
}

/// Project keys of a task, lower-cased, in tag order.
pub fn projects_of(task: &TaskRecord) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for tag in task.tags.iter().filter(|t| is_project_tag(t)) {
        let key = tag.to_lowercase();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}

/// Associate each project key with its tasks, in record order.
pub fn group_by_project(records: &[TaskRecord]) -> BTreeMap<String, Vec<&TaskRecord>> {
    let mut groups: BTreeMap<String, Vec<&TaskRecord>> = BTreeMap::new();
    for task in records {
        let keys = projects_of(task);
        if keys.is_empty() {
            groups.entry(UNCATEGORIZED.to_owned()).or_default().push(task);
        }
        for key in keys {
            groups.entry(key).or_default().push(task);
        }
    }
    groups
}

/// Human-readable name for a project key: `work/client-x` -> `work: client x`.
pub fn project_display_name(key: &str) -> String {
    match key.split_once('/') {
        Some((root, rest)) => {
            let name = rest
                .split(['-', '_', '/'])
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            format!("{root}: {name}")
        }
        None => key.to_owned(),
    }
}
