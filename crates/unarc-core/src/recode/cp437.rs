//! Code page 437, the original IBM PC character set.
//!
//! ZIP readers that ignore the UTF-8 flag decode entry names through this
//! table. Bytes `0x00..=0x7F` map to ASCII; the upper half maps to the
//! glyphs below.

/// Unicode scalars for bytes `0x80..=0xFF`.
const HIGH: [char; 128] = [
    // 0x80
    'Ç', 'ü', 'é', 'â', 'ä', 'à', 'å', 'ç', 'ê', 'ë', 'è', 'ï', 'î', 'ì', 'Ä', 'Å',
    // 0x90
    'É', 'æ', 'Æ', 'ô', 'ö', 'ò', 'û', 'ù', 'ÿ', 'Ö', 'Ü', '¢', '£', '¥', '₧', 'ƒ',
    // 0xA0
    'á', 'í', 'ó', 'ú', 'ñ', 'Ñ', 'ª', 'º', '¿', '⌐', '¬', '½', '¼', '¡', '«', '»',
    // 0xB0
    '░', '▒', '▓', '│', '┤', '╡', '╢', '╖', '╕', '╣', '║', '╗', '╝', '╜', '╛', '┐',
    // 0xC0
    '└', '┴', '┬', '├', '─', '┼', '╞', '╟', '╚', '╔', '╩', '╦', '╠', '═', '╬', '╧',
    // 0xD0
    '╨', '╤', '╥', '╙', '╘', '╒', '╓', '╫', '╪', '┘', '┌', '█', '▄', '▌', '▐', '▀',
    // 0xE0
    'α', 'ß', 'Γ', 'π', 'Σ', 'σ', 'µ', 'τ', 'Φ', 'Θ', 'Ω', 'δ', '∞', 'φ', 'ε', '∩',
    // 0xF0
    '≡', '±', '≥', '≤', '⌠', '⌡', '÷', '≈', '°', '∙', '·', '√', 'ⁿ', '²', '■', '\u{00A0}',
];

/// Decodes bytes as code page 437. Every byte has a mapping.
#[must_use]
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| decode_byte(b)).collect()
}

/// Encodes a string back to code page 437 bytes.
///
/// Returns `None` if any character has no cp437 byte.
///
/// # Examples
///
/// ```
/// use unarc_core::recode::cp437;
///
/// let bytes = [0x83, 0x66, 0x81, 0x5B];
/// let legacy = cp437::decode(&bytes);
/// assert_eq!(cp437::encode(&legacy), Some(bytes.to_vec()));
/// assert_eq!(cp437::encode("データ"), None);
/// ```
#[must_use]
pub fn encode(text: &str) -> Option<Vec<u8>> {
    text.chars().map(encode_char).collect()
}

fn decode_byte(b: u8) -> char {
    if b.is_ascii() {
        char::from(b)
    } else {
        HIGH[usize::from(b - 0x80)]
    }
}

fn encode_char(c: char) -> Option<u8> {
    if c.is_ascii() {
        return u8::try_from(u32::from(c)).ok();
    }
    HIGH.iter()
        .position(|&h| h == c)
        .and_then(|i| u8::try_from(i + 0x80).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_identity() {
        assert_eq!(decode(b"readme.txt"), "readme.txt");
        assert_eq!(encode("readme.txt"), Some(b"readme.txt".to_vec()));
    }

    #[test]
    fn test_known_glyphs() {
        assert_eq!(decode(&[0x80]), "Ç");
        assert_eq!(decode(&[0x9E]), "₧");
        assert_eq!(decode(&[0xE1]), "ß");
        assert_eq!(decode(&[0xFF]), "\u{00A0}");
    }

    #[test]
    fn test_every_byte_round_trips() {
        let all: Vec<u8> = (0..=255).collect();
        assert_eq!(encode(&decode(&all)), Some(all));
    }

    #[test]
    fn test_table_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for c in HIGH {
            assert!(seen.insert(c), "duplicate glyph {c:?}");
            assert!(!c.is_ascii());
        }
    }

    #[test]
    fn test_unmappable_char() {
        assert_eq!(encode("a€"), None);
    }
}
