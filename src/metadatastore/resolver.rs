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

use log::{trace, warn};

use crate::i18n::RegionCode;
use crate::interfaces::RegionValidator;

use super::errors::RegionNotFoundError;
use super::region_tables::{FormatTemplate, LengthConstraints, PatternSet, RegionMetadata};
use super::store::MetadataStore;

/// Resolution layer over the [`MetadataStore`]: by-id lookups that fail
/// loudly, and the dialing-code disambiguation that never does.
pub struct MetadataResolver {
    store: Arc<MetadataStore>,
    /// An API for validation checking, used only by the best tier of
    /// disambiguation.
    validator: Box<dyn RegionValidator>,
}

impl MetadataResolver {
    pub fn new(store: Arc<MetadataStore>, validator: Box<dyn RegionValidator>) -> Self {
        Self { store, validator }
    }

    /// Returns the metadata of `region`, or [`RegionNotFoundError`] when
    /// the store has none; whether the region never existed or was
    /// dropped at shrink time is indistinguishable on purpose.
    pub fn resolve_by_id(
        &self,
        region: RegionCode,
    ) -> Result<Arc<RegionMetadata>, RegionNotFoundError> {
        self.store
            .lookup_metadata(region)
            .ok_or_else(|| not_found(region))
    }

    pub fn resolve_patterns_by_id(
        &self,
        region: RegionCode,
    ) -> Result<Arc<PatternSet>, RegionNotFoundError> {
        self.store
            .lookup_patterns(region)
            .ok_or_else(|| not_found(region))
    }

    pub fn resolve_lengths_by_id(
        &self,
        region: RegionCode,
    ) -> Result<Arc<LengthConstraints>, RegionNotFoundError> {
        self.store
            .lookup_lengths(region)
            .ok_or_else(|| not_found(region))
    }

    pub fn resolve_formats_by_id(
        &self,
        region: RegionCode,
    ) -> Result<Arc<Vec<FormatTemplate>>, RegionNotFoundError> {
        self.store
            .lookup_formats(region)
            .ok_or_else(|| not_found(region))
    }

    /// Picks the region whose metadata matches `national_number` among the
    /// regions sharing `calling_code`.
    ///
    /// Candidates are scanned in the index's tie-break order through three
    /// tiers: a full structural-validity check first, then a literal
    /// leading-digits prefix match, then the region flagged as the main
    /// country for the code (or simply the first candidate). The worst
    /// case is a plausible-but-wrong region, never a failure; `None` only
    /// means no candidate had anything left to offer.
    pub fn resolve_by_dialing_code(
        &self,
        calling_code: i32,
        national_number: &str,
    ) -> Option<Arc<RegionMetadata>> {
        let candidates = self.store.regions_for_dialing_code(calling_code);
        if candidates.is_empty() {
            trace!("No regions share calling code {calling_code}");
            return None;
        }
        if let [only] = candidates {
            return self.store.lookup_metadata(*only);
        }

        let present: Vec<(RegionCode, Arc<RegionMetadata>)> = candidates
            .iter()
            .filter_map(|region| {
                self.store
                    .lookup_metadata(*region)
                    .map(|metadata| (*region, metadata))
            })
            .collect();

        for (region, metadata) in &present {
            if self
                .validator
                .is_structurally_valid(*region, national_number)
            {
                trace!("Number '{national_number}' is structurally valid for {region}");
                return Some(metadata.clone());
            }
        }

        for (region, metadata) in &present {
            if let Some(leading) = metadata.leading_digits.as_deref() {
                if national_number.starts_with(leading) {
                    trace!(
                        "Number '{national_number}' carries the leading digits of {region}"
                    );
                    return Some(metadata.clone());
                }
            }
        }

        present
            .iter()
            .find(|(_, metadata)| metadata.main_country_for_code)
            .or_else(|| present.first())
            .map(|(region, metadata)| {
                trace!("Falling back to {region} for calling code {calling_code}");
                metadata.clone()
            })
    }
}

fn not_found(region: RegionCode) -> RegionNotFoundError {
    warn!("No metadata found for region {region}");
    RegionNotFoundError(region)
}
