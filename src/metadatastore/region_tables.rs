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

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::i18n::RegionCode;

use super::errors::TableIntegrityError;

/// Descriptive attributes of one region. Entries are created by the
/// metadata generator, injected at process start and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegionMetadata {
    /// International dialing code of the region, e.g. 1 for US, 33 for FR.
    /// Shared by every region of a numbering plan such as NANP.
    pub country_code: i32,
    /// Literal digit prefix that national numbers of this region start
    /// with, when the numbering plan reserves one. Used to tell regions
    /// sharing a calling code apart.
    pub leading_digits: Option<String>,
    /// Whether this region is the main country for its calling code, e.g.
    /// US for 1 and RU for 7.
    pub main_country_for_code: bool,
    /// Prefix dialed before a national number inside the region, e.g. "0".
    pub national_prefix: Option<String>,
    /// A valid example number for the region.
    pub example_number: Option<String>,
}

/// Validation patterns of one region. The general pattern covers every
/// number of the region; per-kind patterns are present only where the
/// numbering plan distinguishes them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternSet {
    pub national_number_pattern: String,
    pub fixed_line_pattern: Option<String>,
    pub mobile_pattern: Option<String>,
    pub toll_free_pattern: Option<String>,
}

/// Digit-length constraints of one region.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LengthConstraints {
    /// Valid lengths of a complete national number, sorted ascending.
    pub possible_lengths: Vec<i32>,
    /// Lengths valid only when dialing within a local area. Never overlaps
    /// with `possible_lengths`; the generator checks this at build time.
    pub possible_lengths_local_only: Vec<i32>,
}

impl LengthConstraints {
    /// Returns whether a national number of `length` digits is possible for
    /// this region, either as a complete or a local-only number.
    pub fn allows(&self, length: usize) -> bool {
        let length = length as i32;
        self.possible_lengths.contains(&length)
            || self.possible_lengths_local_only.contains(&length)
    }
}

/// One formatting template: a capturing pattern over the national number
/// and the replacement that lays the groups out for display.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormatTemplate {
    pub pattern: String,
    pub format: String,
    pub leading_digits_pattern: Option<String>,
}

/// Formatting rules of one region: either its own template list, or a
/// reference to the region whose templates it shares (NANP regions all
/// format like US). A reference must land on a `Direct` definition in
/// exactly one hop; chained references are rejected by
/// [`RegionTables::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatRules {
    Direct(Arc<Vec<FormatTemplate>>),
    Reference(RegionCode),
}

/// The four injected per-region tables. Built once by the host from the
/// generated metadata and handed to [`MetadataStore::new`]; the store owns
/// them from then on.
///
/// [`MetadataStore::new`]: super::MetadataStore::new
#[derive(Debug, Default)]
pub struct RegionTables {
    pub metadata: HashMap<RegionCode, Arc<RegionMetadata>>,
    pub patterns: HashMap<RegionCode, Arc<PatternSet>>,
    pub lengths: HashMap<RegionCode, Arc<LengthConstraints>>,
    pub formats: HashMap<RegionCode, FormatRules>,
}

impl RegionTables {
    /// Checks referential integrity of the format table. Meant to run where
    /// the tables are built; lookups assume the invariant holds.
    pub fn validate(&self) -> Result<(), TableIntegrityError> {
        for (region, rules) in &self.formats {
            if let FormatRules::Reference(target) = rules {
                match self.formats.get(target) {
                    Some(FormatRules::Direct(_)) => {}
                    Some(FormatRules::Reference(_)) => {
                        return Err(TableIntegrityError::ChainedFormatReference {
                            from: *region,
                            via: *target,
                        });
                    }
                    None => {
                        return Err(TableIntegrityError::DanglingFormatReference {
                            from: *region,
                            to: *target,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Mapping from international dialing code to the regions sharing it,
/// implemented as a sorted vector for binary-search lookup. The order of
/// each region list is significant: it is the tie-break order used when
/// disambiguating a number among the regions of a shared code.
#[derive(Debug, Default)]
pub struct DialingCodeIndex {
    codes_to_regions: Vec<(i32, Vec<RegionCode>)>,
}

impl DialingCodeIndex {
    /// Builds the index from explicit `(calling code, regions)` entries,
    /// keeping each region list in the given order.
    pub fn new(mut entries: Vec<(i32, Vec<RegionCode>)>) -> Self {
        entries.sort_by_key(|(code, _)| *code);
        Self {
            codes_to_regions: entries,
        }
    }

    /// Derives the index from the metadata table. The main country of a
    /// shared calling code sorts to the front of its list; the remaining
    /// regions follow in region-code order so the result does not depend
    /// on map iteration order.
    pub fn from_metadata(metadata: &HashMap<RegionCode, Arc<RegionMetadata>>) -> Self {
        let mut code_to_regions = HashMap::<i32, VecDeque<RegionCode>>::new();
        let mut regions: Vec<(RegionCode, &Arc<RegionMetadata>)> =
            metadata.iter().map(|(region, entry)| (*region, entry)).collect();
        regions.sort_by_key(|(region, _)| *region);

        for (region, entry) in regions {
            let shared = code_to_regions.entry(entry.country_code).or_default();
            if entry.main_country_for_code {
                shared.push_front(region);
            } else {
                shared.push_back(region);
            }
        }

        Self::new(
            code_to_regions
                .into_iter()
                .map(|(code, shared)| (code, Vec::from(shared)))
                .collect(),
        )
    }

    /// Returns the regions sharing `calling_code`, in tie-break order.
    /// Empty when no region uses the code.
    pub fn regions_for(&self, calling_code: i32) -> &[RegionCode] {
        self.codes_to_regions
            .binary_search_by_key(&calling_code, |(code, _)| *code)
            .map(|index| self.codes_to_regions[index].1.as_slice())
            .unwrap_or(&[])
    }

    /// Every calling code the index knows about, ascending.
    pub fn calling_codes(&self) -> impl Iterator<Item = i32> + '_ {
        self.codes_to_regions.iter().map(|(code, _)| *code)
    }
}
