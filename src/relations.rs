//! Parent/child linking across a batch of parsed tasks.
//!
//! Links come from `#parent/<ref>` and `#child/<ref>` tags. A reference
//! resolves against task ids first (ids are built to fit in a tag, see
//! [`record_id`](crate::parser::record_id)), then against `#id/<alias>` tags.

use tracing::debug;

use crate::task::TaskRecord;

const PARENT_PREFIX: &str = "parent/";
const CHILD_PREFIX: &str = "child/";
const ALIAS_PREFIX: &str = "id/";

/// Index of the task a reference points at, if any.
fn resolve(records: &[TaskRecord], reference: &str) -> Option<usize> {
    records.iter().position(|t| t.id == reference).or_else(|| {
        records.iter().position(|t| {
            t.tags
                .iter()
                .any(|tag| tag.strip_prefix(ALIAS_PREFIX).is_some_and(|alias| alias == reference))
        })
    })
}

/// Resolve relationship tags in a second pass over a batch of records.
///
/// Unknown references and self-links are dropped silently. A task keeps
/// the first parent it is given.
pub fn link_relationships(records: &mut [TaskRecord]) {
    // (parent index, child index) pairs in tag order
    let mut links: Vec<(usize, usize)> = Vec::new();
    for (index, task) in records.iter().enumerate() {
        for tag in &task.tags {
            let (reference, is_parent) = if let Some(r) = tag.strip_prefix(PARENT_PREFIX) {
                (r, true)
            } else if let Some(r) = tag.strip_prefix(CHILD_PREFIX) {
                (r, false)
            } else {
                continue;
            };
            match resolve(records, reference) {
                Some(other) if other != index => {
                    links.push(if is_parent { (other, index) } else { (index, other) });
                }
                _ => debug!(task = %task.id, reference, "relationship target not found"),
            }
        }
    }

    for (parent, child) in links {
        if records[child].parent_id.is_some() {
            continue;
        }
        let parent_id = records[parent].id.clone();
        let child_id = records[child].id.clone();
        records[child].parent_id = Some(parent_id);
        records[parent].child_ids.insert(child_id);
    }
}
