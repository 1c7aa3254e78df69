mod region_tables;
mod resolver;
mod store;
pub mod errors;

pub use region_tables::{
    DialingCodeIndex, FormatRules, FormatTemplate, LengthConstraints, PatternSet, RegionMetadata,
    RegionTables,
};
pub use resolver::MetadataResolver;
pub use store::{MetadataStore, StoreStats};
