//! Pure plan computation — the differ.
//!
//! One generic algorithm serves both resource kinds, parameterized by name
//! extraction and attribute equality through the [`DesiredResource`] /
//! [`ObservedResource`] traits. No side effects; for the same two input
//! collections the output is identical on every call, with set order
//! following input order.

use serde::Serialize;

use jetsync_core::types::{BucketSpec, ResourceName, StreamSpec};

use crate::client::{ObservedBucket, ObservedStream};

/// Desired-side resource that can be planned against an observed counterpart.
pub trait DesiredResource {
    type Observed: ObservedResource;

    fn name(&self) -> &ResourceName;

    /// Whether the observed resource already matches this spec in every
    /// tracked attribute. Names are never part of this check — a rename is
    /// a delete plus a create, not an update.
    fn converged(&self, observed: &Self::Observed) -> bool;
}

/// Observed-side resource: only its identity participates in planning.
pub trait ObservedResource {
    fn name(&self) -> &ResourceName;
}

impl ObservedResource for ObservedStream {
    fn name(&self) -> &ResourceName {
        &self.name
    }
}

impl ObservedResource for ObservedBucket {
    fn name(&self) -> &ResourceName {
        &self.name
    }
}

impl DesiredResource for StreamSpec {
    type Observed = ObservedStream;

    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn converged(&self, observed: &ObservedStream) -> bool {
        // Subjects compare as ordered sequences: reordering counts as drift.
        self.max_age_seconds == observed.max_age_seconds
            && self.subjects == observed.subjects
            && self.replicas == observed.replicas
            && self.storage == observed.storage
            && self.retention == observed.retention
    }
}

impl DesiredResource for BucketSpec {
    type Observed = ObservedBucket;

    fn name(&self) -> &ResourceName {
        &self.name
    }

    fn converged(&self, observed: &ObservedBucket) -> bool {
        self.ttl_seconds == observed.ttl_seconds
            && self.replicas == observed.replicas
            && self.storage == observed.storage
            && self.max_history_per_key == observed.max_history_per_key
    }
}

/// The three disjoint sets a reconcile cycle applies for one resource kind.
///
/// A name appears in at most one set; together the sets partition
/// `desired ∪ observed` minus the resources that are already converged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan<D> {
    /// Desired but not observed.
    pub to_create: Vec<D>,
    /// Present on both sides with differing attributes.
    pub to_update: Vec<D>,
    /// Observed but not desired — removed last during apply.
    pub to_delete: Vec<ResourceName>,
}

impl<D> Plan<D> {
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty() && self.to_update.is_empty() && self.to_delete.is_empty()
    }

    /// Total number of operations the plan would issue.
    pub fn len(&self) -> usize {
        self.to_create.len() + self.to_update.len() + self.to_delete.len()
    }
}

impl<D> Default for Plan<D> {
    fn default() -> Self {
        Self {
            to_create: Vec::new(),
            to_update: Vec::new(),
            to_delete: Vec::new(),
        }
    }
}

/// Compute the plan converging `observed` toward `desired`.
///
/// Linear scan per item; catalog sizes are tens to low hundreds, so the
/// constant factors beat a map build.
pub fn plan<D>(observed: &[D::Observed], desired: &[D]) -> Plan<D>
where
    D: DesiredResource + Clone,
{
    let to_create = desired
        .iter()
        .filter(|d| find(observed, d.name()).is_none())
        .cloned()
        .collect();

    let to_update = desired
        .iter()
        .filter(|d| matches!(find(observed, d.name()), Some(o) if !d.converged(o)))
        .cloned()
        .collect();

    let to_delete = observed
        .iter()
        .filter(|o| desired.iter().all(|d| !d.name().matches(o.name())))
        .map(|o| o.name().clone())
        .collect();

    Plan {
        to_create,
        to_update,
        to_delete,
    }
}

fn find<'a, O: ObservedResource>(observed: &'a [O], name: &ResourceName) -> Option<&'a O> {
    observed.iter().find(|o| o.name().matches(name))
}

#[cfg(test)]
mod tests {
    use jetsync_core::types::{RetentionKind, StorageKind};

    use super::*;

    fn stream(name: &str, max_age: u64, replicas: usize) -> StreamSpec {
        StreamSpec {
            name: ResourceName::from(name),
            subjects: vec![format!("{}.>", name.to_ascii_lowercase())],
            storage: StorageKind::File,
            replicas,
            retention: RetentionKind::Limits,
            max_age_seconds: max_age,
        }
    }

    fn observed_of(spec: &StreamSpec) -> ObservedStream {
        ObservedStream::from(spec)
    }

    fn bucket(name: &str, ttl: u64, history: i64) -> BucketSpec {
        BucketSpec {
            name: ResourceName::from(name),
            storage: StorageKind::Memory,
            replicas: 1,
            max_history_per_key: history,
            ttl_seconds: ttl,
        }
    }

    #[test]
    fn empty_inputs_empty_plan() {
        let p: Plan<StreamSpec> = plan(&[], &[]);
        assert!(p.is_empty());
        assert_eq!(p.len(), 0);
    }

    #[test]
    fn create_update_delete_scenario() {
        // desired: A(maxAge=10,repl=1), B(maxAge=5,repl=2)
        // observed: A(maxAge=99,repl=1), C(repl=1)
        let a = stream("A", 10, 1);
        let b = stream("B", 5, 2);
        let mut observed_a = observed_of(&a);
        observed_a.max_age_seconds = 99;
        let observed_c = observed_of(&stream("C", 0, 1));

        let p = plan(&[observed_a, observed_c], &[a, b]);

        let created: Vec<&str> = p.to_create.iter().map(|s| s.name.as_str()).collect();
        let updated: Vec<&str> = p.to_update.iter().map(|s| s.name.as_str()).collect();
        let deleted: Vec<&str> = p.to_delete.iter().map(|n| n.as_str()).collect();
        assert_eq!(created, vec!["B"]);
        assert_eq!(updated, vec!["A"]);
        assert_eq!(deleted, vec!["C"]);
    }

    #[test]
    fn converged_resources_appear_nowhere() {
        let x = bucket("X", 60, 5);
        let p = plan(&[ObservedBucket::from(&x)], &[x.clone()]);
        assert!(p.is_empty(), "fully converged pair must yield an empty plan");
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let desired = stream("Stream1", 10, 1);
        let mut observed = observed_of(&desired);
        observed.name = ResourceName::from("stream1");

        let p = plan(&[observed], &[desired]);
        assert!(
            p.to_create.is_empty() && p.to_delete.is_empty(),
            "same identity in different case must not create or delete"
        );
    }

    #[test]
    fn subject_reorder_counts_as_drift() {
        let mut desired = stream("EVENTS", 0, 1);
        desired.subjects = vec!["events.a".to_string(), "events.b".to_string()];
        let mut observed = observed_of(&desired);
        observed.subjects.reverse();

        let p = plan(&[observed], &[desired]);
        assert_eq!(p.to_update.len(), 1);
    }

    #[test]
    fn replica_and_storage_drift_detected() {
        let desired = stream("A", 10, 3);
        let mut observed = observed_of(&desired);
        observed.replicas = 1;
        let p = plan(&[observed], &[desired.clone()]);
        assert_eq!(p.to_update.len(), 1);

        let mut observed = observed_of(&desired);
        observed.storage = StorageKind::Memory;
        let p = plan(&[observed], &[desired]);
        assert_eq!(p.to_update.len(), 1);
    }

    #[test]
    fn bucket_history_drift_detected() {
        let desired = bucket("X", 60, 5);
        let mut observed = ObservedBucket::from(&desired);
        observed.max_history_per_key = 1;
        let p = plan(&[observed], &[desired]);
        assert_eq!(p.to_update.len(), 1);
        assert!(p.to_create.is_empty() && p.to_delete.is_empty());
    }

    #[test]
    fn sets_partition_the_name_universe() {
        let desired = vec![stream("A", 10, 1), stream("B", 5, 2), stream("D", 1, 1)];
        let mut drifted_a = observed_of(&desired[0]);
        drifted_a.max_age_seconds = 99;
        let observed = vec![
            drifted_a,
            observed_of(&desired[2]), // D converged
            observed_of(&stream("C", 0, 1)),
        ];

        let p = plan(&observed, &desired);

        let mut all: Vec<String> = p
            .to_create
            .iter()
            .map(|s| s.name.as_str().to_ascii_lowercase())
            .chain(p.to_update.iter().map(|s| s.name.as_str().to_ascii_lowercase()))
            .chain(p.to_delete.iter().map(|n| n.as_str().to_ascii_lowercase()))
            .collect();
        let total = all.len();
        all.sort();
        all.dedup();
        assert_eq!(total, all.len(), "a name may appear in at most one set");
        assert_eq!(all, vec!["a", "b", "c"], "converged D is untouched");
    }

    #[test]
    fn deterministic_across_calls() {
        let desired = vec![stream("B", 5, 2), stream("A", 10, 1)];
        let observed = vec![observed_of(&stream("C", 0, 1))];
        let first = plan(&observed, &desired);
        let second = plan(&observed, &desired);
        assert_eq!(first, second);
        // Output order follows input order.
        let created: Vec<&str> = first.to_create.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(created, vec!["B", "A"]);
    }
}
