use crate::i18n::RegionCode;

/// Structural-validity check consumed by dialing-code disambiguation.
/// Kept behind a trait to isolate the underlying implementation and allow
/// different validators to be swapped in easily.
pub trait RegionValidator {
    /// Returns whether the given national number (a string containing only
    /// decimal digits) structurally satisfies the validation patterns and
    /// length constraints of the given region.
    fn is_structurally_valid(&self, region: RegionCode, national_number: &str) -> bool;
}
