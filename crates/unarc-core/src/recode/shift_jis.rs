//! Shift-JIS decoding tiers.
//!
//! The strict tier is JIS X 0201 plus the JIS X 0208 rows, decoded through
//! the `encoding_rs` Shift_JIS tables. Those tables follow the Windows
//! mapping for six JIS X 0208 cells, so the strict tier maps them back to
//! their JIS code points afterwards.
//!
//! The fallback tier is Shift_JISX0213, which covers both JIS X 0213
//! planes. Its single bytes are JIS X 0201 Roman, so `0x5C` is `¥` and
//! `0x7E` is `‾` there.

use std::ops::RangeInclusive;

use encoding_rs::SHIFT_JIS;

use super::jis_x0213;

/// JIS X 0208 rows with assigned characters.
const JIS_X_0208_ROWS: [RangeInclusive<u8>; 2] = [1..=8, 16..=84];

/// Windows code points `encoding_rs` yields for JIS X 0208 cells, paired
/// with the JIS mapping of the same cell.
const JIS_X_0208_REMAP: [(char, char); 6] = [
    ('\u{FF5E}', '\u{301C}'), // 0x8160 wave dash
    ('\u{2225}', '\u{2016}'), // 0x8161 double vertical line
    ('\u{FF0D}', '\u{2212}'), // 0x817C minus sign
    ('\u{FFE0}', '\u{00A2}'), // 0x8191 cent sign
    ('\u{FFE1}', '\u{00A3}'), // 0x8192 pound sign
    ('\u{FFE2}', '\u{00AC}'), // 0x81CA not sign
];

/// One decoding hypothesis for a raw entry name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShiftJisTier {
    /// JIS X 0201 single bytes plus JIS X 0208 double bytes.
    Strict,
    /// Shift_JISX0213, both planes of JIS X 0213.
    Jisx0213,
}

impl ShiftJisTier {
    /// Tiers in the order they are tried.
    pub const ORDER: [Self; 2] = [Self::Strict, Self::Jisx0213];

    /// Short label used in logs and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Strict => "shift_jis",
            Self::Jisx0213 => "shift_jisx0213",
        }
    }

    /// Decodes `bytes` under this tier, or `None` if any sequence is
    /// malformed or unassigned in the tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use unarc_core::recode::ShiftJisTier;
    ///
    /// // "硃" is a JIS X 0213 plane 1 kanji, outside JIS X 0208.
    /// let bytes = [0xED, 0x40];
    /// assert_eq!(ShiftJisTier::Strict.decode(&bytes), None);
    /// assert_eq!(ShiftJisTier::Jisx0213.decode(&bytes).as_deref(), Some("硃"));
    /// ```
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Strict => decode_strict(bytes),
            Self::Jisx0213 => decode_jisx0213(bytes),
        }
    }
}

fn decode_strict(bytes: &[u8]) -> Option<String> {
    if !admits_strict(bytes) {
        return None;
    }
    let decoded = SHIFT_JIS.decode_without_bom_handling_and_without_replacement(bytes)?;
    Some(decoded.chars().map(jis_x_0208_char).collect())
}

fn jis_x_0208_char(c: char) -> char {
    JIS_X_0208_REMAP
        .iter()
        .find(|&&(windows, _)| windows == c)
        .map_or(c, |&(_, jis)| jis)
}

/// Structural pass over the byte sequence. Trail byte validity and
/// unassigned cells are left to the decoder.
fn admits_strict(bytes: &[u8]) -> bool {
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x00..=0x7F | 0xA1..=0xDF => i += 1,
            lead @ (0x81..=0x9F | 0xE0..=0xFC) => {
                let Some(&trail) = bytes.get(i + 1) else {
                    return false;
                };
                let row = jis_row(lead, trail);
                if !JIS_X_0208_ROWS.iter().any(|rows| rows.contains(&row)) {
                    return false;
                }
                i += 2;
            }
            _ => return false,
        }
    }
    true
}

fn decode_jisx0213(bytes: &[u8]) -> Option<String> {
    let mut out = String::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            0x5C => out.push('¥'),
            0x7E => out.push('‾'),
            b @ 0x00..=0x7F => out.push(char::from(b)),
            // JIS X 0201 katakana sit at U+FF61..=U+FF9F.
            b @ 0xA1..=0xDF => out.push(char::from_u32(0xFF61 + u32::from(b - 0xA1))?),
            lead @ (0x81..=0x9F | 0xE0..=0xFC) => {
                let &trail = bytes.get(i + 1)?;
                let (base, mark) = jis_x0213::lookup(lead, trail)?;
                out.push(base);
                out.extend(mark);
                i += 1;
            }
            _ => return None,
        }
        i += 1;
    }
    Some(out)
}

/// Maps a Shift-JIS lead/trail pair to its 1-based JIS row (ku).
fn jis_row(lead: u8, trail: u8) -> u8 {
    let pair = if lead <= 0x9F { lead - 0x81 } else { lead - 0xC1 };
    pair * 2 + 1 + u8::from(trail >= 0x9F)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jis_row() {
        assert_eq!(jis_row(0x81, 0x40), 1);
        assert_eq!(jis_row(0x83, 0x66), 5);
        assert_eq!(jis_row(0x87, 0x40), 13);
        assert_eq!(jis_row(0x88, 0x9F), 16);
        assert_eq!(jis_row(0xEA, 0xA4), 84);
        assert_eq!(jis_row(0xED, 0x40), 89);
        assert_eq!(jis_row(0xF0, 0x40), 95);
        assert_eq!(jis_row(0xFA, 0x40), 115);
    }

    #[test]
    fn test_strict_katakana_and_kanji() {
        // "データ" and "日本"
        let bytes = [0x83, 0x66, 0x81, 0x5B, 0x83, 0x5E];
        assert_eq!(ShiftJisTier::Strict.decode(&bytes).as_deref(), Some("データ"));
        let bytes = [0x93, 0xFA, 0x96, 0x7B];
        assert_eq!(ShiftJisTier::Strict.decode(&bytes).as_deref(), Some("日本"));
    }

    #[test]
    fn test_halfwidth_katakana() {
        // "ｱｲｳ"
        let bytes = [0xB1, 0xB2, 0xB3];
        assert_eq!(ShiftJisTier::Strict.decode(&bytes).as_deref(), Some("ｱｲｳ"));
        assert_eq!(ShiftJisTier::Jisx0213.decode(&bytes).as_deref(), Some("ｱｲｳ"));
        assert_eq!(ShiftJisTier::Jisx0213.decode(&[0xDF]).as_deref(), Some("ﾟ"));
    }

    #[test]
    fn test_trail_backslash_stays_in_character() {
        // "ソ" is 0x83 0x5C; the trail byte is not a path separator.
        let bytes = [0x83, 0x5C];
        assert_eq!(ShiftJisTier::Strict.decode(&bytes).as_deref(), Some("ソ"));
        assert_eq!(ShiftJisTier::Jisx0213.decode(&bytes).as_deref(), Some("ソ"));
    }

    #[test]
    fn test_strict_uses_jis_mapping() {
        for (bytes, expected) in [
            ([0x81, 0x60], '\u{301C}'),
            ([0x81, 0x61], '\u{2016}'),
            ([0x81, 0x7C], '\u{2212}'),
            ([0x81, 0x91], '\u{00A2}'),
            ([0x81, 0x92], '\u{00A3}'),
            ([0x81, 0xCA], '\u{00AC}'),
        ] {
            let decoded = ShiftJisTier::Strict.decode(&bytes).unwrap_or_default();
            assert_eq!(decoded, expected.to_string(), "{bytes:02X?}");
        }
    }

    #[test]
    fn test_strict_ascii_single_bytes() {
        assert_eq!(ShiftJisTier::Strict.decode(b"a\\b~").as_deref(), Some("a\\b~"));
    }

    #[test]
    fn test_jisx0213_plane_one() {
        for (bytes, expected) in [
            ([0xED, 0x40], "硃"),
            ([0xFA, 0x40], "豗"),
            ([0x85, 0x40], "€"),
            ([0x87, 0x40], "①"),
            ([0x83, 0xEC], "ㇰ"),
        ] {
            assert_eq!(ShiftJisTier::Strict.decode(&bytes), None, "{bytes:02X?}");
            assert_eq!(
                ShiftJisTier::Jisx0213.decode(&bytes).as_deref(),
                Some(expected),
                "{bytes:02X?}"
            );
        }
    }

    #[test]
    fn test_jisx0213_plane_two() {
        let bytes = [0xF0, 0x40];
        assert_eq!(ShiftJisTier::Jisx0213.decode(&bytes).as_deref(), Some("𠂉"));
    }

    #[test]
    fn test_jisx0213_composed_cell() {
        // "か゚" is one cell encoding two code points.
        let bytes = [0x82, 0xF5];
        assert_eq!(
            ShiftJisTier::Jisx0213.decode(&bytes).as_deref(),
            Some("\u{304B}\u{309A}")
        );
    }

    #[test]
    fn test_jisx0213_roman_single_bytes() {
        let bytes = [0x5C, 0x7E, 0xED, 0x40];
        assert_eq!(ShiftJisTier::Jisx0213.decode(&bytes).as_deref(), Some("¥‾硃"));
    }

    #[test]
    fn test_jisx0213_keeps_jis_x_0208_cells() {
        // "データ〜" with the wave dash at 0x8160
        let bytes = [0x83, 0x66, 0x81, 0x5B, 0x83, 0x5E, 0x81, 0x60];
        assert_eq!(
            ShiftJisTier::Jisx0213.decode(&bytes).as_deref(),
            Some("データ〜")
        );
    }

    #[test]
    fn test_rejected_by_both() {
        for bytes in [
            &[0x80][..],
            &[0x83],
            &[0xA0],
            &[0xFD],
            &[0xFF, 0x41],
            &[0x81, 0x20],
            &[0x81, 0x7F],
        ] {
            assert_eq!(ShiftJisTier::Strict.decode(bytes), None, "{bytes:02X?}");
            assert_eq!(ShiftJisTier::Jisx0213.decode(bytes), None, "{bytes:02X?}");
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(ShiftJisTier::Strict.decode(&[]).as_deref(), Some(""));
        assert_eq!(ShiftJisTier::Jisx0213.decode(&[]).as_deref(), Some(""));
    }
}
