//! Hex text <-> integer helpers shared by the record parser, the report
//! loader and the listing renderer.

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HexError {
    #[error("empty hex field")]
    Empty,
    #[error("invalid hex digit {ch:?} in {text:?}")]
    BadDigit { text: String, ch: char },
    #[error("hex field {text:?} does not fit in 32 bits")]
    Overflow { text: String },
    #[error("odd number of hex digits in {text:?}")]
    OddLength { text: String },
}

/// Parse an unprefixed hex string (either case).
pub fn parse_hex(text: &str) -> Result<u32, HexError> {
    if text.is_empty() {
        return Err(HexError::Empty);
    }
    if let Some(ch) = text.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::BadDigit { text: text.to_string(), ch });
    }
    u32::from_str_radix(text, 16).map_err(|_| HexError::Overflow { text: text.to_string() })
}

/// Decode a run of hex digit pairs into bytes.
pub fn parse_hex_bytes(text: &str) -> Result<Vec<u8>, HexError> {
    if let Some(ch) = text.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(HexError::BadDigit { text: text.to_string(), ch });
    }
    if text.len() % 2 != 0 {
        return Err(HexError::OddLength { text: text.to_string() });
    }
    let nibble = |b: u8| (b as char).to_digit(16).unwrap_or(0) as u8;
    Ok(text
        .as_bytes()
        .chunks_exact(2)
        .map(|pair| (nibble(pair[0]) << 4) | nibble(pair[1]))
        .collect())
}

/// Six-digit, zero-padded, uppercase form used as table key text.
pub fn fmt_addr6(addr: u32) -> String {
    format!("{:06X}", addr & 0xFF_FFFF)
}

/// Four-digit listing column form.
pub fn fmt_addr4(addr: u32) -> String {
    format!("{addr:04X}")
}

/// Uppercase object-code text for a byte run.
pub fn fmt_bytes(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02X}")).collect()
}

/// Drop leading zeros but always keep one digit.
pub fn strip_leading_zeros(text: &str) -> &str {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() {
        &text[text.len().saturating_sub(1)..]
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_format_addresses() {
        assert_eq!(parse_hex("00102A").unwrap(), 0x102A);
        assert_eq!(parse_hex("ff").unwrap(), 0xFF);
        assert_eq!(fmt_addr6(0x102A), "00102A");
        assert_eq!(fmt_addr4(0x2D), "002D");
        assert_eq!(fmt_addr4(0x1_0000), "10000");
    }

    #[test]
    fn rejects_bad_digits() {
        assert_eq!(parse_hex(""), Err(HexError::Empty));
        assert!(matches!(parse_hex("12G4"), Err(HexError::BadDigit { ch: 'G', .. })));
        assert!(matches!(parse_hex("123456789"), Err(HexError::Overflow { .. })));
        assert!(matches!(parse_hex_bytes("ABC"), Err(HexError::OddLength { .. })));
    }

    #[test]
    fn byte_runs() {
        assert_eq!(parse_hex_bytes("17202D").unwrap(), vec![0x17, 0x20, 0x2D]);
        assert_eq!(parse_hex_bytes("").unwrap(), Vec::<u8>::new());
        assert_eq!(fmt_bytes(&[0x4B, 0x10, 0x10, 0x36]), "4B101036");
    }

    #[test]
    fn strips_zeros() {
        assert_eq!(strip_leading_zeros("000030"), "30");
        assert_eq!(strip_leading_zeros("000"), "0");
        assert_eq!(strip_leading_zeros("A00"), "A00");
    }
}
