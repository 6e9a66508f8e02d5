use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        OverlayError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(OverlayError::config("x").to_string().contains("config error:"));
    assert!(
        OverlayError::content("x")
            .to_string()
            .contains("content error:")
    );
    assert!(
        OverlayError::lifecycle("x")
            .to_string()
            .contains("lifecycle error:")
    );
    assert!(
        OverlayError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = OverlayError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
