use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        IconStackError::invalid_dimension("x")
            .to_string()
            .contains("invalid dimension:")
    );
    assert!(
        IconStackError::source_not_found("x")
            .to_string()
            .contains("source not found:")
    );
    assert!(
        IconStackError::provider_failure("x")
            .to_string()
            .contains("provider failure:")
    );
    assert!(
        IconStackError::dimension_mismatch("x")
            .to_string()
            .contains("dimension mismatch:")
    );
    assert!(
        IconStackError::manifest_update_skipped("x")
            .to_string()
            .contains("manifest update skipped:")
    );
    assert!(
        IconStackError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        IconStackError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = IconStackError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn slot_recoverable_covers_io_and_provider_kinds() {
    assert!(IconStackError::source_not_found("a.png").is_slot_recoverable());
    assert!(IconStackError::provider_failure("status 500").is_slot_recoverable());
    assert!(IconStackError::Other(anyhow::anyhow!("decode")).is_slot_recoverable());

    assert!(!IconStackError::invalid_dimension("0x0").is_slot_recoverable());
    assert!(!IconStackError::dimension_mismatch("2x2 vs 3x3").is_slot_recoverable());
    assert!(!IconStackError::validation("bad").is_slot_recoverable());
}
