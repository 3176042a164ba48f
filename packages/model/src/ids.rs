//! # Identity Assigner
//!
//! Every node needs a stable id before the editor can address it. Trees from
//! importers may arrive without ids; `assign_missing_ids` backfills them and
//! leaves existing ids alone.
//!
//! Ids have the shape `{seed}-{counter}`. The seed is a CRC32 digest of a
//! per-process session key and the counter only grows, so ids are unique
//! within the process. Ids already present in a tree are skipped explicitly
//! in case an imported document happens to reuse the same shape.

use crate::node::{Node, NodeRef, Row};
use crate::visit::for_each_node;
use crc32fast::Hasher;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Seed for the current process: CRC32 of process id and start time
pub fn session_seed() -> String {
    let started = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();

    let mut hasher = Hasher::new();
    hasher.update(format!("pid:{}:start:{}", std::process::id(), started).as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator
#[derive(Debug)]
pub struct IdGenerator {
    seed: String,
    count: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::from_seed(session_seed())
    }

    pub fn from_seed(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            count: AtomicU64::new(0),
        }
    }

    /// Process-wide generator behind the default entry points
    pub fn session() -> &'static IdGenerator {
        static SESSION: OnceLock<IdGenerator> = OnceLock::new();
        SESSION.get_or_init(IdGenerator::new)
    }

    /// Generate next sequential id
    pub fn new_id(&self) -> String {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{}-{}", self.seed, count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Fresh id from the session generator
pub fn new_id() -> String {
    IdGenerator::session().new_id()
}

/// Fresh id from the session generator that `root` does not already use
pub fn unused_id(root: &Node) -> String {
    let mut taken = collect_ids(root);
    fresh_id(IdGenerator::session(), &mut taken)
}

/// Backfill missing ids using the session generator
pub fn assign_missing_ids(root: &NodeRef) -> NodeRef {
    assign_missing_ids_with(root, IdGenerator::session())
}

/// Backfill missing ids. A fully id'd tree comes back as the same `Arc`,
/// and subtrees that needed nothing are shared with the input.
pub fn assign_missing_ids_with(root: &NodeRef, generator: &IdGenerator) -> NodeRef {
    let mut taken = collect_ids(root);
    fill(root, generator, &mut taken).unwrap_or_else(|| Arc::clone(root))
}

/// Every id present in the tree
pub fn collect_ids(root: &Node) -> HashSet<String> {
    let mut ids = HashSet::new();
    for_each_node(root, |node| {
        if let Some(id) = node.id() {
            ids.insert(id.to_string());
        }
    });
    ids
}

fn fresh_id(generator: &IdGenerator, taken: &mut HashSet<String>) -> String {
    loop {
        let id = generator.new_id();
        if taken.insert(id.clone()) {
            return id;
        }
    }
}

fn fill(node: &Node, generator: &IdGenerator, taken: &mut HashSet<String>) -> Option<NodeRef> {
    let mut changed = false;

    let id = match &node.id {
        Some(id) => id.clone(),
        None => {
            changed = true;
            fresh_id(generator, taken)
        }
    };

    let tabs = node.tabs.as_ref().map(|tabs| {
        let mut next = Vec::with_capacity(tabs.len());
        for tab in tabs {
            match fill(tab, generator, taken) {
                Some(filled) => {
                    changed = true;
                    next.push(filled);
                }
                None => next.push(Arc::clone(tab)),
            }
        }
        next
    });

    let container = node.container.as_ref().map(|container| {
        let mut rows = Vec::with_capacity(container.rows.len());
        for row in &container.rows {
            let mut contents = Vec::with_capacity(row.contents.len());
            for child in &row.contents {
                match fill(child, generator, taken) {
                    Some(filled) => {
                        changed = true;
                        contents.push(filled);
                    }
                    None => contents.push(Arc::clone(child)),
                }
            }
            rows.push(Row::new(contents));
        }
        container.with_rows_from(rows)
    });

    if !changed {
        return None;
    }

    let mut next = node.with_children(tabs, container);
    next.id = Some(id);
    Some(Arc::new(next))
}
