//! Scalar-value checks and fixed-width hex encodings
//!
//! Detail panels render UTF-32/16/8 unit lists for every glyph. All three are
//! derived from `decimals` at load time and never persisted back to disk.

/// Largest Unicode scalar value
pub const MAX_CODEPOINT: u32 = 0x10FFFF;

/// True when `cp` falls in the UTF-16 surrogate range
pub fn is_surrogate(cp: u32) -> bool {
    (0xD800..=0xDFFF).contains(&cp)
}

/// True when `cp` is a valid Unicode scalar value
pub fn is_scalar_value(cp: u32) -> bool {
    cp <= MAX_CODEPOINT && !is_surrogate(cp)
}

/// One 8-digit uppercase hex unit per codepoint
pub fn utf32_unit(cp: u32) -> String {
    format!("{:08X}", cp)
}

/// 4-digit uppercase hex units, one per UTF-16 code unit; astral codepoints
/// yield a surrogate pair
pub fn utf16_units(cp: u32) -> Vec<String> {
    let mut buf = [0u16; 2];
    match char::from_u32(cp) {
        Some(ch) => ch
            .encode_utf16(&mut buf)
            .iter()
            .map(|unit| format!("{:04X}", unit))
            .collect(),
        None => Vec::new(),
    }
}

/// 2-digit uppercase hex units, one per UTF-8 byte
pub fn utf8_units(cp: u32) -> Vec<String> {
    let mut buf = [0u8; 4];
    match char::from_u32(cp) {
        Some(ch) => ch
            .encode_utf8(&mut buf)
            .as_bytes()
            .iter()
            .map(|byte| format!("{:02X}", byte))
            .collect(),
        None => Vec::new(),
    }
}
