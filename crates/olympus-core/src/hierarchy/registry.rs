use super::types::{AgentId, AgentRecord, AgentStatus, AuditEntry};
use crate::error::{Error, Result};
use crate::utils::SlidingWindow;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};
use std::time::Duration;
use tracing::debug;

/// Audit entries kept before the oldest are dropped
pub const DEFAULT_AUDIT_CAPACITY: usize = 10_000;

/// Exclusive owner of the agent record collection
#[derive(Debug)]
pub struct HierarchyRegistry {
    records: HashMap<AgentId, AgentRecord>,
    /// Most recent registrations; survives purges, bounded by `audit_capacity`
    audit: VecDeque<AuditEntry>,
    audit_capacity: usize,
    /// Registration timestamps keyed by parent id
    creations: SlidingWindow,
    /// Registrations per parent, for root and retained parents
    creations_per_parent: BTreeMap<AgentId, usize>,
    max_depth_observed: u32,
}

impl Default for HierarchyRegistry {
    fn default() -> Self {
        Self::with_audit_capacity(DEFAULT_AUDIT_CAPACITY)
    }
}

impl HierarchyRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry keeping at most `capacity` audit entries
    #[must_use]
    pub fn with_audit_capacity(capacity: usize) -> Self {
        Self {
            records: HashMap::new(),
            audit: VecDeque::new(),
            audit_capacity: capacity,
            creations: SlidingWindow::default(),
            creations_per_parent: BTreeMap::new(),
            max_depth_observed: 0,
        }
    }

    /// Register a new active agent under `parent_id`.
    ///
    /// Validation happens before any write, so a failed call leaves the
    /// registry untouched.
    ///
    /// # Errors
    /// - `DuplicateId` if `id` is the root sentinel or already present
    /// - `UnknownParent` if `parent_id` is neither root nor an active record
    pub fn register(
        &mut self,
        id: AgentId,
        parent_id: AgentId,
        label: impl Into<String>,
    ) -> Result<AgentRecord> {
        if id.is_root() || self.records.contains_key(&id) {
            return Err(Error::DuplicateId(id));
        }

        let depth = if parent_id.is_root() {
            1
        } else {
            match self.records.get(&parent_id) {
                Some(parent) if parent.is_active() => parent.depth + 1,
                _ => return Err(Error::UnknownParent(parent_id)),
            }
        };

        let record = AgentRecord {
            id: id.clone(),
            parent_id: parent_id.clone(),
            depth,
            created_at: Utc::now(),
            status: AgentStatus::Active,
            label: label.into(),
        };

        if self.audit_capacity > 0 {
            if self.audit.len() >= self.audit_capacity {
                self.audit.pop_front();
            }
            self.audit.push_back(AuditEntry {
                agent_id: id.clone(),
                parent_id: parent_id.clone(),
                depth,
                label: record.label.clone(),
                at: record.created_at,
            });
        }
        self.creations.record(parent_id.as_str());
        *self.creations_per_parent.entry(parent_id.clone()).or_default() += 1;
        self.max_depth_observed = self.max_depth_observed.max(depth);
        self.records.insert(id, record.clone());

        debug!(agent_id = %record.id, parent_id = %parent_id, depth, "Agent registered");
        Ok(record)
    }

    /// Mark an agent inactive. Idempotent: absent or already-inactive ids are
    /// a no-op. Returns whether the status changed.
    pub fn deregister(&mut self, id: &AgentId) -> bool {
        match self.records.get_mut(id) {
            Some(record) if record.is_active() => {
                record.status = AgentStatus::Inactive;
                debug!(agent_id = %id, "Agent deregistered");
                true
            }
            _ => false,
        }
    }

    /// Depth of an agent; the root sentinel is depth 0
    ///
    /// # Errors
    /// `NotFound` if no record exists
    pub fn get_depth(&self, id: &AgentId) -> Result<u32> {
        if id.is_root() {
            return Ok(0);
        }
        self.records
            .get(id)
            .map(|r| r.depth)
            .ok_or_else(|| Error::NotFound(id.clone()))
    }

    /// Look up a record
    #[must_use]
    pub fn get(&self, id: &AgentId) -> Option<&AgentRecord> {
        self.records.get(id)
    }

    /// Whether `id` is an active record
    #[must_use]
    pub fn is_active(&self, id: &AgentId) -> bool {
        self.records.get(id).is_some_and(AgentRecord::is_active)
    }

    /// All records whose parent is `id`, regardless of status
    #[must_use]
    pub fn get_children(&self, id: &AgentId) -> BTreeSet<AgentId> {
        self.records
            .values()
            .filter(|r| &r.parent_id == id)
            .map(|r| r.id.clone())
            .collect()
    }

    /// Active records whose parent is `id`
    #[must_use]
    pub fn active_children(&self, id: &AgentId) -> BTreeSet<AgentId> {
        self.records
            .values()
            .filter(|r| &r.parent_id == id && r.is_active())
            .map(|r| r.id.clone())
            .collect()
    }

    /// Every descendant of `id`, deepest first (children precede parents)
    #[must_use]
    pub fn descendants(&self, id: &AgentId) -> Vec<AgentId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: &AgentId, out: &mut Vec<AgentId>) {
        for child in self.get_children(id) {
            self.collect_descendants(&child, out);
            out.push(child);
        }
    }

    /// Number of active records
    #[must_use]
    pub fn count_active(&self) -> usize {
        self.records.values().filter(|r| r.is_active()).count()
    }

    /// Number of stored records (active and inactive)
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no records are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all stored records
    pub fn records(&self) -> impl Iterator<Item = &AgentRecord> {
        self.records.values()
    }

    /// Remove inactive records created more than `age` ago. Active records
    /// are never removed. Returns the number removed.
    pub fn purge_inactive_older_than(&mut self, age: Duration) -> usize {
        match chrono::Duration::from_std(age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        {
            Some(cutoff) => self.purge_inactive_before(cutoff),
            None => 0,
        }
    }

    /// Remove inactive records created before `cutoff`
    pub fn purge_inactive_before(&mut self, cutoff: DateTime<Utc>) -> usize {
        let before = self.records.len();
        self.records
            .retain(|_, r| r.is_active() || r.created_at >= cutoff);
        let removed = before - self.records.len();
        let records = &self.records;
        self.creations_per_parent
            .retain(|parent, _| parent.is_root() || records.contains_key(parent));
        if removed > 0 {
            debug!(removed, "Purged inactive agent records");
        }
        removed
    }

    /// Active records created more than `age` ago
    #[must_use]
    pub fn active_older_than(&self, age: Duration) -> Vec<AgentId> {
        let Some(cutoff) = chrono::Duration::from_std(age)
            .ok()
            .and_then(|age| Utc::now().checked_sub_signed(age))
        else {
            return Vec::new();
        };

        let mut ids: Vec<_> = self
            .records
            .values()
            .filter(|r| r.is_active() && r.created_at < cutoff)
            .map(|r| r.id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Registrations under `parent_id` within the last `window`
    #[must_use]
    pub fn creations_within(&self, parent_id: &AgentId, window: Duration) -> usize {
        self.creations.count_within(parent_id.as_str(), window)
    }

    /// Forget creation timestamps older than `max_age`
    pub fn prune_creation_window(&mut self, max_age: Duration) -> usize {
        self.creations.prune(max_age)
    }

    /// Most recent registrations, oldest first
    #[must_use]
    pub fn audit_log(&self) -> &VecDeque<AuditEntry> {
        &self.audit
    }

    /// Registrations per parent, covering root and every retained parent
    #[must_use]
    pub fn creations_per_parent(&self) -> &BTreeMap<AgentId, usize> {
        &self.creations_per_parent
    }

    /// Deepest registration ever made (0 before the first)
    #[must_use]
    pub fn max_depth_observed(&self) -> u32 {
        self.max_depth_observed
    }
}
