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

use thiserror::Error;

use crate::i18n::RegionCode;

/// A by-id resolution found no entry for the region.
///
/// Callers cannot tell a region that never existed apart from one that was
/// excluded at shrink time, and are not meant to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No metadata found for region {0}")]
pub struct RegionNotFoundError(pub RegionCode);

/// Broken format-rule references detected when validating injected tables.
/// These indicate a data-generation bug, not a runtime condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TableIntegrityError {
    #[error("Format rules for {from} reference {via}, which is itself a reference")]
    ChainedFormatReference { from: RegionCode, via: RegionCode },

    #[error("Format rules for {from} reference {to}, which has no format rules")]
    DanglingFormatReference { from: RegionCode, to: RegionCode },
}
