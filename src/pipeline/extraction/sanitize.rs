/// Strip control characters from untrusted OCR text. Newlines and tabs are
/// kept because downstream line and column structure depends on them;
/// nothing else is altered.
pub fn sanitize_ocr_text(raw: &str) -> String {
    raw.chars()
        .filter(|&c| !c.is_control() || c == '\n' || c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_null_bytes() {
        assert_eq!(sanitize_ocr_text("Patient: Marie\x00Dubois"), "Patient: MarieDubois");
    }

    #[test]
    fn strips_control_characters() {
        let clean = sanitize_ocr_text("Dose: 500mg\x01\x02\x1b\nDate: 2024-01-15\r");
        assert_eq!(clean, "Dose: 500mg\nDate: 2024-01-15");
    }

    #[test]
    fn keeps_newlines_and_tabs() {
        let raw = "Test\tResult\nHemoglobin\t13.5";
        assert_eq!(sanitize_ocr_text(raw), raw);
    }

    #[test]
    fn preserves_medical_punctuation() {
        let raw = "Temp: 37.5°C, BP: 120/80 mmHg (normal) µg/L";
        assert_eq!(sanitize_ocr_text(raw), raw);
    }

    #[test]
    fn empty_and_control_only_input() {
        assert_eq!(sanitize_ocr_text(""), "");
        assert_eq!(sanitize_ocr_text("\x00\x01\x02"), "");
    }
}
