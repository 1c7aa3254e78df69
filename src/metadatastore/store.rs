// Copyright (C) 2025 Kashin Vladislav (Rust adaptation author)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dashmap::DashSet;
use log::{debug, info, warn};

use crate::i18n::RegionCode;

use super::region_tables::{
    DialingCodeIndex, FormatRules, FormatTemplate, LengthConstraints, PatternSet, RegionMetadata,
    RegionTables,
};

/// Serving state of the store: the full injected tables until `shrink()`
/// runs, the retained-regions cache afterwards. Holding one variant at a
/// time makes "the full tables are gone" a fact of the type, not a flag.
enum TableState {
    Full(RegionTables),
    Shrunk(MetadataCache),
}

/// Warm-set entries copied out of the full tables at shrink time. Format
/// rules are stored pre-resolved, so reference chasing ends with the full
/// tables.
#[derive(Default)]
struct MetadataCache {
    metadata: HashMap<RegionCode, Arc<RegionMetadata>>,
    patterns: HashMap<RegionCode, Arc<PatternSet>>,
    lengths: HashMap<RegionCode, Arc<LengthConstraints>>,
    formats: HashMap<RegionCode, Arc<Vec<FormatTemplate>>>,
}

/// Read-only diagnostic snapshot of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreStats {
    pub metadata_count: usize,
    pub patterns_count: usize,
    pub lengths_count: usize,
    pub formats_count: usize,
    pub warm_count: usize,
    pub shrunk: bool,
    pub total: usize,
}

/// Owner of the region metadata tables.
///
/// Every lookup records the touched region in a warm set; the one-shot
/// [`shrink`](Self::shrink) operation then retains exactly the warm
/// regions and discards the rest, trading the ability to resolve
/// never-touched regions for memory.
///
/// The store is an explicit object: a host owns one instance per process
/// (or per test) and hands it whatever tables it generated. All operations
/// take `&self` and are safe to call from multiple threads.
pub struct MetadataStore {
    tables: RwLock<TableState>,
    /// Calling-code index, deliberately outside the table state: it is
    /// small, its lookups are never warm-tracked and it keeps serving
    /// after shrink.
    dialing_codes: DialingCodeIndex,
    warm: DashSet<RegionCode>,
    configured: AtomicBool,
    formats_enabled: AtomicBool,
}

impl MetadataStore {
    pub fn new(tables: RegionTables, dialing_codes: DialingCodeIndex) -> Self {
        Self {
            tables: RwLock::new(TableState::Full(tables)),
            dialing_codes,
            warm: DashSet::new(),
            configured: AtomicBool::new(false),
            formats_enabled: AtomicBool::new(true),
        }
    }

    /// One-time configuration latch.
    ///
    /// Only the first call takes effect; later calls are ignored even when
    /// they pass a different argument. This mirrors the behavior hosts
    /// already depend on, so a conflicting reconfiguration is logged
    /// rather than rejected. Passing `formats_enabled: false` frees the
    /// format table immediately.
    pub fn configure(&self, formats_enabled: bool) {
        if self.configured.swap(true, Ordering::SeqCst) {
            debug!(
                "Store is already configured, ignoring configure(formats_enabled: {})",
                formats_enabled
            );
            return;
        }
        self.formats_enabled.store(formats_enabled, Ordering::SeqCst);
        if !formats_enabled {
            match &mut *self.write_tables() {
                TableState::Full(tables) => tables.formats = HashMap::new(),
                TableState::Shrunk(cache) => cache.formats = HashMap::new(),
            }
        }
    }

    /// Returns the descriptive metadata of `region` and marks it warm.
    pub fn lookup_metadata(&self, region: RegionCode) -> Option<Arc<RegionMetadata>> {
        self.warm.insert(region);
        match &*self.read_tables() {
            TableState::Full(tables) => tables.metadata.get(&region).cloned(),
            TableState::Shrunk(cache) => cache.metadata.get(&region).cloned(),
        }
    }

    /// Returns the validation patterns of `region` and marks it warm.
    pub fn lookup_patterns(&self, region: RegionCode) -> Option<Arc<PatternSet>> {
        self.warm.insert(region);
        match &*self.read_tables() {
            TableState::Full(tables) => tables.patterns.get(&region).cloned(),
            TableState::Shrunk(cache) => cache.patterns.get(&region).cloned(),
        }
    }

    /// Returns the length constraints of `region` and marks it warm.
    pub fn lookup_lengths(&self, region: RegionCode) -> Option<Arc<LengthConstraints>> {
        self.warm.insert(region);
        match &*self.read_tables() {
            TableState::Full(tables) => tables.lengths.get(&region).cloned(),
            TableState::Shrunk(cache) => cache.lengths.get(&region).cloned(),
        }
    }

    /// Returns the formatting templates of `region`, following at most one
    /// reference hop, and marks the region warm.
    ///
    /// When formats are disabled this returns `None` before touching the
    /// warm set: a formats-only caller must not inflate the retained set
    /// with regions whose formats it will never get.
    pub fn lookup_formats(&self, region: RegionCode) -> Option<Arc<Vec<FormatTemplate>>> {
        if !self.formats_enabled.load(Ordering::SeqCst) {
            return None;
        }
        self.warm.insert(region);
        match &*self.read_tables() {
            TableState::Full(tables) => resolve_format_rules(&tables.formats, region),
            TableState::Shrunk(cache) => cache.formats.get(&region).cloned(),
        }
    }

    /// Returns the regions sharing `calling_code` in tie-break order.
    /// Served from the standalone index: never cached, never warm-tracked,
    /// still answered after shrink.
    pub fn regions_for_dialing_code(&self, calling_code: i32) -> &[RegionCode] {
        self.dialing_codes.regions_for(calling_code)
    }

    /// One-shot memory reclaim: copies every warm region out of the full
    /// tables into the cache, then drops the full tables. Format
    /// references are resolved now, while the referenced definitions are
    /// still present. Regions never touched before this point become
    /// unresolvable for the rest of the process. No-op when already
    /// shrunk.
    pub fn shrink(&self) {
        let mut state = self.write_tables();
        let TableState::Full(tables) = &mut *state else {
            debug!("Store is already shrunk, ignoring repeated shrink()");
            return;
        };

        let mut cache = MetadataCache::default();
        for region in self.warm.iter() {
            let region = *region;
            if let Some(entry) = tables.metadata.get(&region) {
                cache.metadata.insert(region, entry.clone());
            }
            if let Some(entry) = tables.patterns.get(&region) {
                cache.patterns.insert(region, entry.clone());
            }
            if let Some(entry) = tables.lengths.get(&region) {
                cache.lengths.insert(region, entry.clone());
            }
            if let Some(templates) = resolve_format_rules(&tables.formats, region) {
                cache.formats.insert(region, templates);
            }
        }

        info!(
            "Shrunk region metadata tables: retained {} of {} regions",
            cache.metadata.len(),
            tables.metadata.len()
        );
        *state = TableState::Shrunk(cache);
    }

    /// Returns the store to its initial flags and clears the warm set and
    /// cache. Tables already discarded by `shrink()` or by disabling
    /// formats are NOT restored: a shrunk store comes back as a full
    /// store over empty tables. This is a known limitation, not an undo;
    /// tests that need pristine tables construct a fresh store.
    pub fn reset_for_testing(&self) {
        self.warm.clear();
        self.configured.store(false, Ordering::SeqCst);
        self.formats_enabled.store(true, Ordering::SeqCst);
        let mut state = self.write_tables();
        if matches!(&*state, TableState::Shrunk(_)) {
            *state = TableState::Full(RegionTables::default());
        }
    }

    /// Diagnostic snapshot of table sizes and lifecycle state.
    pub fn stats(&self) -> StoreStats {
        let (metadata_count, patterns_count, lengths_count, formats_count, shrunk) =
            match &*self.read_tables() {
                TableState::Full(tables) => (
                    tables.metadata.len(),
                    tables.patterns.len(),
                    tables.lengths.len(),
                    tables.formats.len(),
                    false,
                ),
                TableState::Shrunk(cache) => (
                    cache.metadata.len(),
                    cache.patterns.len(),
                    cache.lengths.len(),
                    cache.formats.len(),
                    true,
                ),
            };
        StoreStats {
            metadata_count,
            patterns_count,
            lengths_count,
            formats_count,
            warm_count: self.warm.len(),
            shrunk,
            total: metadata_count + patterns_count + lengths_count + formats_count,
        }
    }

    /// The regions the store can currently resolve. Diagnostic; does not
    /// touch the warm set.
    pub fn supported_regions(&self) -> Vec<RegionCode> {
        match &*self.read_tables() {
            TableState::Full(tables) => tables.metadata.keys().copied().collect(),
            TableState::Shrunk(cache) => cache.metadata.keys().copied().collect(),
        }
    }

    /// Every calling code of the dialing-code index.
    pub fn supported_calling_codes(&self) -> HashSet<i32> {
        self.dialing_codes.calling_codes().collect()
    }

    /// Whether `region` currently has metadata, without marking it warm.
    pub fn is_region_served(&self, region: RegionCode) -> bool {
        match &*self.read_tables() {
            TableState::Full(tables) => tables.metadata.contains_key(&region),
            TableState::Shrunk(cache) => cache.metadata.contains_key(&region),
        }
    }

    fn read_tables(&self) -> RwLockReadGuard<'_, TableState> {
        // A poisoned lock means a panic mid-swap; the tables can no longer
        // be trusted, so propagating the panic is the only sound option.
        self.tables.read().expect("Region table lock poisoned")
    }

    fn write_tables(&self) -> RwLockWriteGuard<'_, TableState> {
        self.tables.write().expect("Region table lock poisoned")
    }
}

/// Follows at most one `Reference` hop. The result is `None` unless the
/// final entry is a direct template list; chained references are rejected
/// by table validation and only logged here.
fn resolve_format_rules(
    formats: &HashMap<RegionCode, FormatRules>,
    region: RegionCode,
) -> Option<Arc<Vec<FormatTemplate>>> {
    match formats.get(&region)? {
        FormatRules::Direct(templates) => Some(templates.clone()),
        FormatRules::Reference(target) => match formats.get(target) {
            Some(FormatRules::Direct(templates)) => Some(templates.clone()),
            Some(FormatRules::Reference(_)) => {
                warn!(
                    "Format rules for {} reference {}, which is itself a reference",
                    region, target
                );
                None
            }
            None => None,
        },
    }
}
