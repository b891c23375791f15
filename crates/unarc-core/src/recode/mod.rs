//! Filename recovery for legacy-encoded archive entry names.
//!
//! ZIP tools on Japanese Windows store entry names as Shift-JIS bytes
//! without setting the UTF-8 flag, and most readers then decode those
//! bytes as code page 437. [`recode`] undoes that: it recovers the raw
//! bytes and interprets them as Shift-JIS, first under the strict tier and
//! then as Shift_JISX0213.
//!
//! # Examples
//!
//! ```
//! use unarc_core::recode::RawName;
//! use unarc_core::recode::recode;
//!
//! let raw = RawName::Bytes(b"\x83\x66\x81\x5B\x83\x5E.txt".to_vec());
//! assert_eq!(recode(&raw)?, "データ.txt");
//! # Ok::<(), unarc_core::FilenameDecodeError>(())
//! ```

pub mod cp437;
mod jis_x0213;
mod shift_jis;

pub use shift_jis::ShiftJisTier;

use std::borrow::Cow;

use tracing::debug;

use crate::error::FilenameDecodeError;
use crate::error::HexBytes;

/// An entry name as handed over by an archive backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawName {
    /// Bytes exactly as stored in the archive directory.
    Bytes(Vec<u8>),
    /// A name the backend already decoded through code page 437.
    Cp437(String),
    /// A name the format itself marks as Unicode.
    Unicode(String),
}

impl RawName {
    /// Returns the byte sequence the Shift-JIS tiers operate on.
    ///
    /// `Cp437` names are re-encoded through the cp437 table. `Unicode` names
    /// yield their UTF-8 bytes.
    pub fn to_bytes(&self) -> Result<Cow<'_, [u8]>, FilenameDecodeError> {
        match self {
            Self::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
            Self::Cp437(text) => cp437::encode(text)
                .map(Cow::Owned)
                .ok_or_else(|| FilenameDecodeError::new(text.as_bytes())),
            Self::Unicode(text) => Ok(Cow::Borrowed(text.as_bytes())),
        }
    }

    /// Renders the name for diagnostics without decoding it.
    #[must_use]
    pub fn display_raw(&self) -> String {
        match self {
            Self::Bytes(bytes) => HexBytes(bytes).to_string(),
            Self::Cp437(text) | Self::Unicode(text) => text.clone(),
        }
    }
}

/// A recovered filename and the tier that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recoded {
    /// The recovered name.
    pub name: String,
    /// Tier that decoded the bytes, `None` for Unicode pass-through.
    pub tier: Option<ShiftJisTier>,
}

/// Recovers the intended filename from a raw entry name.
///
/// # Errors
///
/// Returns `FilenameDecodeError` if a cp437 name cannot be re-encoded or
/// the bytes are invalid under both Shift-JIS tiers.
pub fn recode(raw: &RawName) -> Result<String, FilenameDecodeError> {
    recode_with_tier(raw).map(|recoded| recoded.name)
}

/// Like [`recode`], also reporting which tier succeeded.
pub fn recode_with_tier(raw: &RawName) -> Result<Recoded, FilenameDecodeError> {
    match raw {
        RawName::Unicode(text) => Ok(Recoded {
            name: text.clone(),
            tier: None,
        }),
        RawName::Bytes(_) | RawName::Cp437(_) => recode_bytes(&raw.to_bytes()?),
    }
}

/// Decodes raw name bytes through the tiers in [`ShiftJisTier::ORDER`].
pub fn recode_bytes(bytes: &[u8]) -> Result<Recoded, FilenameDecodeError> {
    for tier in ShiftJisTier::ORDER {
        if let Some(name) = tier.decode(bytes) {
            if tier != ShiftJisTier::Strict {
                debug!(raw = %HexBytes(bytes), tier = tier.name(), "decoded with fallback tier");
            }
            return Ok(Recoded {
                name,
                tier: Some(tier),
            });
        }
    }
    Err(FilenameDecodeError::new(bytes))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const DATA_TXT: &[u8] = b"\x83\x66\x81\x5B\x83\x5E.txt";

    #[test]
    fn test_bytes_strict() {
        let recoded = recode_with_tier(&RawName::Bytes(DATA_TXT.to_vec())).unwrap();
        assert_eq!(recoded.name, "データ.txt");
        assert_eq!(recoded.tier, Some(ShiftJisTier::Strict));
    }

    #[test]
    fn test_cp437_string_is_reencoded() {
        let legacy = cp437::decode(DATA_TXT);
        assert_ne!(legacy, "データ.txt");
        assert_eq!(recode(&RawName::Cp437(legacy)).unwrap(), "データ.txt");
    }

    #[test]
    fn test_cp437_string_outside_table() {
        let err = recode(&RawName::Cp437("データ".into())).unwrap_err();
        assert_eq!(err.raw, "データ".as_bytes());
    }

    #[test]
    fn test_unicode_passthrough() {
        let recoded = recode_with_tier(&RawName::Unicode("データ.txt".into())).unwrap();
        assert_eq!(recoded.name, "データ.txt");
        assert_eq!(recoded.tier, None);
    }

    #[test]
    fn test_fallback_tier() {
        // "①.txt"
        let raw = RawName::Bytes(b"\x87\x40.txt".to_vec());
        let recoded = recode_with_tier(&raw).unwrap();
        assert_eq!(recoded.name, "①.txt");
        assert_eq!(recoded.tier, Some(ShiftJisTier::Jisx0213));
    }

    #[test]
    fn test_both_tiers_fail() {
        let raw = RawName::Bytes(b"bad\xFD.txt".to_vec());
        let err = recode(&raw).unwrap_err();
        assert_eq!(err.raw, b"bad\xFD.txt");
    }

    #[test]
    fn test_directory_marker_survives() {
        let raw = RawName::Bytes(b"\x83\x66\x81\x5B\x83\x5E/".to_vec());
        assert_eq!(recode(&raw).unwrap(), "データ/");
    }

    #[test]
    fn test_display_raw() {
        assert_eq!(RawName::Bytes(b"a\x83".to_vec()).display_raw(), "a\\x83");
        assert_eq!(RawName::Unicode("é".into()).display_raw(), "é");
    }
}
