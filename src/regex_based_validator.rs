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

use std::sync::Arc;

use log::error;

use crate::i18n::RegionCode;
use crate::interfaces::RegionValidator;
use crate::metadatastore::MetadataStore;
use crate::regexp_cache::{InvalidRegexError, RegexCache, full_match};

/// Default validator: a region's length constraints gate a full match of
/// its national number pattern. Patterns are compiled once through a
/// shared cache.
pub struct RegexBasedValidator {
    store: Arc<MetadataStore>,
    cache: RegexCache,
}

impl RegexBasedValidator {
    pub fn new(store: Arc<MetadataStore>) -> Self {
        Self {
            store,
            cache: RegexCache::with_capacity(128),
        }
    }

    fn match_number(
        &self,
        national_number: &str,
        number_pattern: &str,
    ) -> Result<bool, InvalidRegexError> {
        let regexp = self.cache.get_regex(number_pattern)?;
        Ok(full_match(&regexp, national_number))
    }
}

impl RegionValidator for RegexBasedValidator {
    fn is_structurally_valid(&self, region: RegionCode, national_number: &str) -> bool {
        // Lengths first: the check is cheap and rejects most mismatches
        // before any pattern is compiled.
        if let Some(lengths) = self.store.lookup_lengths(region) {
            if !lengths.allows(national_number.len()) {
                return false;
            }
        }
        let Some(patterns) = self.store.lookup_patterns(region) else {
            return false;
        };
        // We don't want to consider it a match when matching non-empty
        // input against an empty pattern.
        if patterns.national_number_pattern.is_empty() {
            return false;
        }
        match self.match_number(national_number, &patterns.national_number_pattern) {
            Ok(matched) => matched,
            Err(err) => {
                error!("Invalid regex in metadata for region {region}: {err}");
                false
            }
        }
    }
}
