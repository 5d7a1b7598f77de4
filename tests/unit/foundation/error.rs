use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        PostframeError::dimension("x")
            .to_string()
            .contains("dimension error:")
    );
    assert!(
        PostframeError::decode("x")
            .to_string()
            .contains("decode error:")
    );
    assert!(
        PostframeError::surface_unavailable("x")
            .to_string()
            .contains("surface unavailable:")
    );
    assert!(
        PostframeError::pattern("x")
            .to_string()
            .contains("pattern creation error:")
    );
    assert!(
        PostframeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        PostframeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = PostframeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
