use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QrCraftError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QrCraftError::image_decode("x")
            .to_string()
            .contains("image decode error:")
    );
    assert!(
        QrCraftError::upload("x")
            .to_string()
            .contains("upload error:")
    );
    assert!(
        QrCraftError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        QrCraftError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn invalid_style_names_field_and_value() {
    let msg = QrCraftError::invalid_style("dotStyle", "wavy").to_string();
    assert_eq!(msg, "invalid style value for dotStyle: \"wavy\"");
}

#[test]
fn timeout_reports_millis() {
    let msg = QrCraftError::timeout("upload", Duration::from_millis(1500)).to_string();
    assert_eq!(msg, "timeout: upload did not finish within 1500ms");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QrCraftError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
