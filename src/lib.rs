mod metadatastore;
mod regexp_cache;
mod regex_based_validator;
pub mod interfaces;
pub mod i18n;

#[cfg(test)]
mod tests;

pub use i18n::RegionCode;
pub use metadatastore::{
    DialingCodeIndex, FormatRules, FormatTemplate, LengthConstraints, MetadataResolver,
    MetadataStore, PatternSet, RegionMetadata, RegionTables, StoreStats,
    errors::{RegionNotFoundError, TableIntegrityError},
};
pub use regex_based_validator::RegexBasedValidator;
pub use regexp_cache::{InvalidRegexError, RegexCache};
