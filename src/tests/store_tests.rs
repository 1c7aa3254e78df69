use crate::i18n::RegionCode;

use super::test_tables::test_store;

#[test]
fn serves_the_full_tables_before_shrink() {
    colog::default_builder()
        .filter_level(log::LevelFilter::Debug)
        .try_init()
        .ok();

    let store = test_store();
    let us = store.lookup_metadata(RegionCode::US).unwrap();
    assert_eq!(1, us.country_code);
    assert!(us.main_country_for_code);

    let bs = store.lookup_metadata(RegionCode::BS).unwrap();
    assert_eq!(Some("242"), bs.leading_digits.as_deref());

    assert!(store.lookup_patterns(RegionCode::GB).is_some());
    assert!(store.lookup_lengths(RegionCode::IT).is_some());
    // FR is a known region code but the host injected no tables for it.
    assert!(store.lookup_metadata(RegionCode::FR).is_none());
}

#[test]
fn configure_is_a_first_call_latch() {
    let store = test_store();
    store.configure(false);
    // The second call disagrees and must be silently ignored.
    store.configure(true);

    assert!(store.lookup_formats(RegionCode::US).is_none());
    assert_eq!(0, store.stats().formats_count);
}

#[test]
fn configure_with_formats_keeps_the_format_table() {
    let store = test_store();
    store.configure(true);
    store.configure(false);

    assert!(store.lookup_formats(RegionCode::US).is_some());
    assert!(store.stats().formats_count > 0);
}

#[test]
fn disabling_formats_frees_the_format_table() {
    let store = test_store();
    assert!(store.stats().formats_count > 0);
    store.configure(false);
    assert_eq!(0, store.stats().formats_count);
}

#[test]
fn disabled_format_lookups_do_not_mark_regions_warm() {
    let store = test_store();
    store.configure(false);

    assert!(store.lookup_formats(RegionCode::US).is_none());
    assert!(store.lookup_formats(RegionCode::GB).is_none());
    assert_eq!(0, store.stats().warm_count);

    // The other lookups keep tracking as usual.
    store.lookup_metadata(RegionCode::US);
    assert_eq!(1, store.stats().warm_count);
}

#[test]
fn warm_count_grows_monotonically_and_dedupes() {
    let store = test_store();
    assert_eq!(0, store.stats().warm_count);

    store.lookup_metadata(RegionCode::US);
    assert_eq!(1, store.stats().warm_count);

    // Same region through another table kind adds nothing.
    store.lookup_patterns(RegionCode::US);
    store.lookup_lengths(RegionCode::US);
    assert_eq!(1, store.stats().warm_count);

    store.lookup_formats(RegionCode::GB);
    assert_eq!(2, store.stats().warm_count);

    // A miss still marks the region warm.
    store.lookup_metadata(RegionCode::FR);
    assert_eq!(3, store.stats().warm_count);
}

#[test]
fn shrink_retains_warm_regions_with_identical_values() {
    let store = test_store();
    let us_before = store.lookup_metadata(RegionCode::US).unwrap();
    let us_patterns_before = store.lookup_patterns(RegionCode::US).unwrap();
    store.lookup_metadata(RegionCode::IT);

    store.shrink();

    let stats = store.stats();
    assert!(stats.shrunk);
    // Warm regions are retained in every table they appear in, not only
    // the one the lookup went through.
    assert_eq!(2, stats.metadata_count);
    assert_eq!(2, stats.patterns_count);
    assert_eq!(2, stats.lengths_count);

    assert_eq!(us_before, store.lookup_metadata(RegionCode::US).unwrap());
    assert_eq!(
        us_patterns_before,
        store.lookup_patterns(RegionCode::US).unwrap()
    );
    assert!(store.lookup_lengths(RegionCode::IT).is_some());
}

#[test]
fn shrink_drops_regions_that_were_never_touched() {
    let store = test_store();
    store.lookup_metadata(RegionCode::US);
    assert!(store.is_region_served(RegionCode::GB));

    store.shrink();

    assert!(store.lookup_metadata(RegionCode::GB).is_none());
    assert!(store.lookup_patterns(RegionCode::GB).is_none());
    assert!(store.lookup_formats(RegionCode::GB).is_none());
    assert!(!store.is_region_served(RegionCode::GB));
}

#[test]
fn shrink_is_one_shot() {
    let store = test_store();
    store.lookup_metadata(RegionCode::US);
    store.shrink();
    let stats_after_first = store.stats();

    // Regions warmed after the shrink must not be revived by another call.
    store.lookup_metadata(RegionCode::GB);
    store.shrink();

    assert!(store.lookup_metadata(RegionCode::GB).is_none());
    let stats_after_second = store.stats();
    assert_eq!(stats_after_first.metadata_count, stats_after_second.metadata_count);
    assert_eq!(stats_after_first.formats_count, stats_after_second.formats_count);
}

#[test]
fn shrink_resolves_format_references_while_tables_are_present() {
    let store = test_store();
    let yt_formats = store.lookup_formats(RegionCode::YT).unwrap();

    store.shrink();

    // YT was warm, RE was not: the referenced list survives under YT even
    // though RE itself is gone.
    assert_eq!(yt_formats, store.lookup_formats(RegionCode::YT).unwrap());
    assert!(store.lookup_formats(RegionCode::RE).is_none());
    assert!(store.lookup_metadata(RegionCode::RE).is_none());
}

#[test]
fn dialing_code_lookups_are_never_tracked_and_survive_shrink() {
    let store = test_store();
    assert_eq!(
        &[RegionCode::US, RegionCode::BS, RegionCode::CA],
        store.regions_for_dialing_code(1)
    );
    assert_eq!(0, store.stats().warm_count);

    store.lookup_metadata(RegionCode::US);
    store.shrink();

    // The index keeps answering for regions the cache no longer serves.
    assert_eq!(
        &[RegionCode::US, RegionCode::BS, RegionCode::CA],
        store.regions_for_dialing_code(1)
    );
    assert_eq!(&[RegionCode::RE, RegionCode::YT], store.regions_for_dialing_code(262));
    assert!(store.regions_for_dialing_code(999).is_empty());
}

#[test]
fn stats_total_is_the_sum_of_table_counts() {
    let store = test_store();
    let check = |store: &crate::metadatastore::MetadataStore| {
        let stats = store.stats();
        assert_eq!(
            stats.metadata_count + stats.patterns_count + stats.lengths_count + stats.formats_count,
            stats.total
        );
    };

    check(&store);
    store.configure(false);
    check(&store);
    store.lookup_metadata(RegionCode::US);
    store.lookup_metadata(RegionCode::GB);
    check(&store);
    store.shrink();
    check(&store);
}

#[test]
fn supported_regions_track_the_serving_state() {
    let store = test_store();
    assert_eq!(7, store.supported_regions().len());

    let codes = store.supported_calling_codes();
    assert!(codes.contains(&1));
    assert!(codes.contains(&262));

    store.lookup_metadata(RegionCode::US);
    store.shrink();
    assert_eq!(vec![RegionCode::US], store.supported_regions());
    // The calling-code index is not affected by shrink.
    assert!(store.supported_calling_codes().contains(&44));
}

#[test]
fn reset_clears_state_on_a_full_store() {
    let store = test_store();
    store.configure(false);
    store.lookup_metadata(RegionCode::US);
    store.lookup_metadata(RegionCode::GB);

    store.reset_for_testing();

    let stats = store.stats();
    assert_eq!(0, stats.warm_count);
    assert!(!stats.shrunk);
    // The un-discarded tables are still there...
    assert_eq!(7, stats.metadata_count);
    // ...but the format table discarded by configure(false) is not
    // restored. The configure latch itself is reset.
    assert_eq!(0, stats.formats_count);
    store.configure(true);
    assert!(store.lookup_formats(RegionCode::US).is_none());
}

#[test]
fn reset_does_not_restore_shrunk_tables() {
    let store = test_store();
    store.lookup_metadata(RegionCode::US);
    store.shrink();

    store.reset_for_testing();

    let stats = store.stats();
    assert!(!stats.shrunk);
    assert_eq!(0, stats.warm_count);
    assert_eq!(0, stats.total);
    assert!(store.lookup_metadata(RegionCode::US).is_none());
}
