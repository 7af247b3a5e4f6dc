//! Reconciliation planning between a remote image listing and a local
//! directory listing.
//!
//! The plan is pure set arithmetic over join keys: additions are remote keys
//! absent locally, deletions are local keys absent remotely. Nothing is ever
//! updated in place.

use std::collections::{BTreeMap, BTreeSet, HashSet};

/// The work a sync run has to do
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DiffPlan {
    /// Join keys to download, in deterministic (sorted) order
    pub to_add: Vec<String>,
    /// Join keys to delete locally, in deterministic (sorted) order
    pub to_delete: Vec<String>,
    /// Files already present on both sides
    pub unchanged: usize,
}

impl DiffPlan {
    /// Whether the local directory already matches the remote set
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_delete.is_empty()
    }
}

/// Compute the reconciliation plan.
///
/// `remote` maps join key to retrieval URL; `local` is the set of filenames
/// currently in the target directory.
///
/// An addition and a deletion whose keys differ only by case would touch the
/// same file on a case-insensitive filesystem, deleting data that was never
/// re-downloaded. Such pairs are treated as already present: both sides are
/// dropped from the plan and the file counts as unchanged.
pub fn plan(remote: &BTreeMap<String, String>, local: &BTreeSet<String>) -> DiffPlan {
    let mut to_add: Vec<String> = remote
        .keys()
        .filter(|key| !local.contains(*key))
        .cloned()
        .collect();
    let mut to_delete: Vec<String> = local
        .iter()
        .filter(|key| !remote.contains_key(*key))
        .cloned()
        .collect();
    let mut unchanged = remote.len() - to_add.len();

    let add_folded: HashSet<String> = to_add.iter().map(|k| k.to_lowercase()).collect();
    let delete_folded: HashSet<String> = to_delete.iter().map(|k| k.to_lowercase()).collect();
    let collisions: HashSet<&String> = add_folded.intersection(&delete_folded).collect();

    if !collisions.is_empty() {
        let before = to_add.len();
        to_add.retain(|k| !collisions.contains(&k.to_lowercase()));
        unchanged += before - to_add.len();
        to_delete.retain(|k| !collisions.contains(&k.to_lowercase()));
    }

    DiffPlan {
        to_add,
        to_delete,
        unchanged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(entries: &[&str]) -> BTreeMap<String, String> {
        entries
            .iter()
            .map(|name| {
                (
                    name.to_string(),
                    format!("https://photos.example.com/1234/{}", name),
                )
            })
            .collect()
    }

    fn local(entries: &[&str]) -> BTreeSet<String> {
        entries.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn test_fresh_directory_downloads_everything() {
        let plan = plan(&remote(&["img1.jpg", "img2.jpg"]), &local(&[]));
        assert_eq!(plan.to_add, vec!["img1.jpg", "img2.jpg"]);
        assert!(plan.to_delete.is_empty());
        assert_eq!(plan.unchanged, 0);
    }

    #[test]
    fn test_stale_file_is_deleted() {
        let plan = plan(&remote(&["img1.jpg"]), &local(&["img1.jpg", "img_old.jpg"]));
        assert!(plan.to_add.is_empty());
        assert_eq!(plan.to_delete, vec!["img_old.jpg"]);
        assert_eq!(plan.unchanged, 1);
    }

    #[test]
    fn test_equal_sets_plan_is_empty() {
        let plan = plan(
            &remote(&["a.jpg", "b.jpg"]),
            &local(&["a.jpg", "b.jpg"]),
        );
        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, 2);
    }

    #[test]
    fn test_mixed_add_and_delete() {
        let plan = plan(
            &remote(&["keep.jpg", "new.jpg"]),
            &local(&["keep.jpg", "old.jpg"]),
        );
        assert_eq!(plan.to_add, vec!["new.jpg"]);
        assert_eq!(plan.to_delete, vec!["old.jpg"]);
        assert_eq!(plan.unchanged, 1);
    }

    #[test]
    fn test_case_collision_skips_both_sides() {
        let plan = plan(&remote(&["IMG1.jpg"]), &local(&["img1.jpg"]));
        assert!(plan.to_add.is_empty(), "case collision must not re-download");
        assert!(plan.to_delete.is_empty(), "case collision must not delete");
        assert_eq!(plan.unchanged, 1);
    }

    #[test]
    fn test_case_collision_leaves_other_work_intact() {
        let plan = plan(
            &remote(&["IMG1.jpg", "new.jpg"]),
            &local(&["img1.jpg", "old.jpg"]),
        );
        assert_eq!(plan.to_add, vec!["new.jpg"]);
        assert_eq!(plan.to_delete, vec!["old.jpg"]);
        assert_eq!(plan.unchanged, 1);
    }
}

/// Property-based tests using proptest
#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Generate a join key that looks like a mirrored filename
    fn key() -> impl Strategy<Value = String> {
        prop::string::string_regex("[a-zA-Z0-9_-]{1,12}\\.jpg").unwrap()
    }

    fn remote_inventory() -> impl Strategy<Value = BTreeMap<String, String>> {
        prop::collection::btree_map(key(), Just(String::new()), 0..20).prop_map(|mut m| {
            for (name, url) in m.iter_mut() {
                *url = format!("https://photos.example.com/a/{}", name);
            }
            m
        })
    }

    fn local_inventory() -> impl Strategy<Value = BTreeSet<String>> {
        prop::collection::btree_set(key(), 0..20)
    }

    proptest! {
        /// Additions and deletions never overlap, and neither touches a key
        /// that is present on both sides
        #[test]
        fn plan_sets_are_disjoint(remote in remote_inventory(), local in local_inventory()) {
            let plan = plan(&remote, &local);
            for key in &plan.to_add {
                prop_assert!(!plan.to_delete.contains(key));
                prop_assert!(!local.contains(key));
                prop_assert!(remote.contains_key(key));
            }
            for key in &plan.to_delete {
                prop_assert!(local.contains(key));
                prop_assert!(!remote.contains_key(key));
            }
        }

        /// Applying the plan converges the local set to the remote key set
        /// (modulo case-collision pairs, which are deliberately left alone)
        #[test]
        fn plan_application_converges(remote in remote_inventory(), local in local_inventory()) {
            let plan = plan(&remote, &local);
            let mut converged = local.clone();
            for key in &plan.to_delete {
                converged.remove(key);
            }
            for key in &plan.to_add {
                converged.insert(key.clone());
            }

            // Replanning against the converged state finds nothing new to add
            let replan = super::plan(&remote, &converged);
            prop_assert!(replan.to_add.is_empty());
            prop_assert!(replan.to_delete.is_empty());
        }

        /// A directory that already matches remote needs no work
        #[test]
        fn plan_is_idempotent_on_equal_sets(remote in remote_inventory()) {
            let local: BTreeSet<String> = remote.keys().cloned().collect();
            let plan = plan(&remote, &local);
            prop_assert!(plan.is_empty());
            prop_assert_eq!(plan.unchanged, remote.len());
        }

        /// Every remote key is accounted for exactly once
        #[test]
        fn plan_conserves_remote_keys(remote in remote_inventory(), local in local_inventory()) {
            let plan = plan(&remote, &local);
            prop_assert_eq!(plan.to_add.len() + plan.unchanged, remote.len());
        }
    }
}
