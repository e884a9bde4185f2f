use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        LampreelError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        LampreelError::source_unavailable("x")
            .to_string()
            .contains("source unavailable:")
    );
    assert!(
        LampreelError::generation("x")
            .to_string()
            .contains("generation error:")
    );
    assert!(LampreelError::codec("x").to_string().contains("codec error:"));
    assert!(
        LampreelError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn codec_and_generation_errors_are_distinct() {
    assert!(matches!(LampreelError::codec("x"), LampreelError::Codec(_)));
    assert!(matches!(
        LampreelError::generation("x"),
        LampreelError::Generation(_)
    ));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = LampreelError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
