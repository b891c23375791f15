//! Property-based tests for the filename recoder.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use unarc_core::RawName;
use unarc_core::recode;
use unarc_core::recode::ShiftJisTier;
use unarc_core::recode::cp437;
use unarc_core::recode::recode_bytes;

/// Kanji from JIS X 0208 with their Shift-JIS bytes.
const KANJI: [(char, [u8; 2]); 13] = [
    ('日', [0x93, 0xFA]),
    ('本', [0x96, 0x7B]),
    ('語', [0x8C, 0xEA]),
    ('写', [0x8E, 0xCA]),
    ('真', [0x90, 0x5E]),
    ('資', [0x8E, 0x91]),
    ('料', [0x97, 0xBF]),
    ('漢', [0x8A, 0xBF]),
    ('字', [0x8E, 0x9A]),
    ('表', [0x95, 0x5C]),
    ('示', [0x8E, 0xA6]),
    ('能', [0x94, 0x5C]),
    ('〜', [0x81, 0x60]),
];

/// JIS X 0213 cells outside JIS X 0208, with their decoded text.
const JISX0213_ONLY: [(&str, [u8; 2]); 10] = [
    ("①", [0x87, 0x40]),
    ("⑳", [0x87, 0x53]),
    ("Ⅰ", [0x87, 0x54]),
    ("㈱", [0x87, 0x8A]),
    ("€", [0x85, 0x40]),
    ("ㇰ", [0x83, 0xEC]),
    ("硃", [0xED, 0x40]),
    ("豗", [0xFA, 0x40]),
    ("𠂉", [0xF0, 0x40]),
    ("\u{304B}\u{309A}", [0x82, 0xF5]),
];

/// One strict character as (text, Shift-JIS bytes).
fn strict_char() -> impl Strategy<Value = (char, Vec<u8>)> {
    prop_oneof![
        prop::sample::select(b"abcxyz0189._- /".to_vec()).prop_map(|b| (char::from(b), vec![b])),
        // Hiragana U+3041..=U+3093 sit at 0x829F..=0x82F1.
        (0u8..83).prop_map(|i| {
            (char::from_u32(0x3041 + u32::from(i)).unwrap(), vec![0x82, 0x9F + i])
        }),
        // Halfwidth katakana U+FF61..=U+FF9F sit at 0xA1..=0xDF.
        (0u8..63).prop_map(|i| {
            (char::from_u32(0xFF61 + u32::from(i)).unwrap(), vec![0xA1 + i])
        }),
        prop::sample::select(KANJI.to_vec()).prop_map(|(c, bytes)| (c, bytes.to_vec())),
    ]
}

/// A strict name as (text, Shift-JIS bytes).
fn strict_name() -> impl Strategy<Value = (String, Vec<u8>)> {
    prop::collection::vec(strict_char(), 1..24).prop_map(|chars| {
        let name = chars.iter().map(|(c, _)| *c).collect();
        let bytes = chars.into_iter().flat_map(|(_, bytes)| bytes).collect();
        (name, bytes)
    })
}

proptest! {
    /// Names made of strict characters decode under the strict tier.
    #[test]
    fn prop_strict_names_decode(case in strict_name()) {
        let (name, bytes) = case;
        let recoded = recode_bytes(&bytes).unwrap();
        prop_assert_eq!(recoded.name, name);
        prop_assert_eq!(recoded.tier, Some(ShiftJisTier::Strict));
    }

    /// One JIS X 0213 cell moves the whole name to the fallback tier.
    #[test]
    fn prop_jisx0213_cell_uses_fallback(
        prefix in strict_name(),
        cell in prop::sample::select(JISX0213_ONLY.to_vec()),
    ) {
        let (text, cell_bytes) = cell;
        let (prefix_name, mut bytes) = prefix;
        bytes.extend_from_slice(&cell_bytes);
        let recoded = recode_bytes(&bytes).unwrap();
        prop_assert_eq!(recoded.name, format!("{prefix_name}{text}"));
        prop_assert_eq!(recoded.tier, Some(ShiftJisTier::Jisx0213));
    }

    /// A lone 0x80 is a valid byte under neither tier.
    #[test]
    fn prop_lone_0x80_fails(prefix in strict_name()) {
        let (_, mut bytes) = prefix;
        bytes.push(0x80);
        prop_assert!(recode_bytes(&bytes).is_err());
    }

    /// A byte that is neither a lead byte nor a trail byte fails both tiers.
    #[test]
    fn prop_invalid_byte_fails(
        mut bytes in prop::collection::vec(any::<u8>(), 0..32),
        position in any::<prop::sample::Index>(),
        bad in prop::sample::select(vec![0xFDu8, 0xFE, 0xFF]),
    ) {
        let at = position.index(bytes.len() + 1);
        bytes.insert(at, bad);
        let err = recode_bytes(&bytes).unwrap_err();
        prop_assert_eq!(err.raw, bytes);
    }

    /// Successful decoding never yields replacement or private-use characters.
    #[test]
    fn prop_no_garbage_output(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        if let Ok(recoded) = recode_bytes(&bytes) {
            prop_assert!(!recoded.name.contains('\u{FFFD}'), "decoded name contains U+FFFD");
            prop_assert!(!recoded.name.chars().any(|c| ('\u{E000}'..='\u{F8FF}').contains(&c)), "decoded name contains private-use character");
        }
    }

    /// The cp437 table is a bijection over all bytes.
    #[test]
    fn prop_cp437_round_trip(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assert_eq!(cp437::encode(&cp437::decode(&bytes)).unwrap(), bytes);
    }

    /// A name handed over cp437-decoded recodes like its raw bytes.
    #[test]
    fn prop_cp437_and_bytes_agree(case in strict_name()) {
        let (name, bytes) = case;
        let from_text = recode(&RawName::Cp437(cp437::decode(&bytes))).unwrap();
        let from_bytes = recode(&RawName::Bytes(bytes)).unwrap();
        prop_assert_eq!(&from_text, &from_bytes);
        prop_assert_eq!(from_text, name);
    }

    /// Unicode names pass through untouched.
    #[test]
    fn prop_unicode_passthrough(name in "\\PC{0,24}") {
        prop_assert_eq!(recode(&RawName::Unicode(name.clone())).unwrap(), name);
    }
}
