//! Registry Index - entry id to schema entry, built from a full scan

use std::collections::HashMap;

use livetweak_sdk::TweakEntry;

use crate::callback::HookTable;
use crate::scanner::{Discovered, TweakSource};
use crate::schema::{SchemaBuilder, SchemaEntry};

/// Immutable result of one scan
///
/// Entries keep their scan order. A later entry with an id that is already
/// present replaces the earlier one in place.
#[derive(Debug, Default)]
pub struct RegistryIndex {
    order: Vec<String>,
    entries: HashMap<String, SchemaEntry>,
    hooks: HookTable,
}

impl RegistryIndex {
    /// Scan every source and build the index
    pub fn build(sources: &[Box<dyn TweakSource>], builder: &SchemaBuilder) -> Self {
        let mut index = Self::default();

        for source in sources {
            for scan in source.scan() {
                for item in scan.items {
                    match item {
                        Discovered::Member(marker, member) => {
                            index.insert(builder.member(&marker, &member));
                        }
                        Discovered::Action(marker, invoke) => {
                            index.insert(builder.action(&marker, invoke));
                        }
                        Discovered::Hook { name, hook } => {
                            index.hooks.register(&scan.owner, &name, hook);
                        }
                    }
                }
            }
        }

        tracing::info!(
            "Registry index built: {} entries, {} hooks",
            index.len(),
            index.hooks.len()
        );
        index
    }

    fn insert(&mut self, entry: SchemaEntry) {
        let id = entry.id();
        if self.entries.insert(id.clone(), entry).is_some() {
            tracing::warn!("Duplicate tweak entry '{}', keeping the last one", id);
        } else {
            self.order.push(id);
        }
    }

    pub fn get(&self, id: &str) -> Option<&SchemaEntry> {
        self.entries.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in scan order
    pub fn iter(&self) -> impl Iterator<Item = &SchemaEntry> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Consumer-facing schema in scan order
    pub fn schema(&self) -> Vec<TweakEntry> {
        self.iter().map(SchemaEntry::project).collect()
    }

    pub fn hooks(&self) -> &HookTable {
        &self.hooks
    }
}
