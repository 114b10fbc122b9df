// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Decoding of process output into UTF-8.
//!
//! ```text
//! git stdout/stderr bytes --(decode)--> UTF-8 text --> parsers
//! ```
//!
//! Uses `encoding_rs`. Invalid sequences become U+FFFD.

use encoding_rs::{IBM866, WINDOWS_1252};
use std::borrow::Cow;

/// Text encoding of process output.
///
/// git writes UTF-8 unless `i18n.logOutputEncoding` or a legacy console code
/// page says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// UTF-8, lossy.
    #[default]
    Utf8,
    /// UTF-16 little endian.
    Utf16Le,
    /// Windows-1252 (ANSI code page).
    Acp,
    /// IBM866 (OEM code page).
    Oem,
    /// Any other WHATWG encoding, resolved from a label.
    Other(&'static encoding_rs::Encoding),
}

impl Encoding {
    /// Resolves a label such as `utf-8`, `latin1` or `shift_jis`.
    ///
    /// ```
    /// use gitrun::utility::encoding::Encoding;
    ///
    /// assert_eq!(Encoding::from_label("UTF-8"), Some(Encoding::Utf8));
    /// assert_eq!(Encoding::from_label("cp1252"), Some(Encoding::Acp));
    /// assert_eq!(Encoding::from_label("klingon"), None);
    /// ```
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let encoding = encoding_rs::Encoding::for_label(label.trim().as_bytes())?;
        Some(if encoding == encoding_rs::UTF_8 {
            Self::Utf8
        } else if encoding == encoding_rs::UTF_16LE {
            Self::Utf16Le
        } else if encoding == WINDOWS_1252 {
            Self::Acp
        } else if encoding == IBM866 {
            Self::Oem
        } else {
            Self::Other(encoding)
        })
    }

    /// Canonical WHATWG name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Utf8 => encoding_rs::UTF_8.name(),
            Self::Utf16Le => encoding_rs::UTF_16LE.name(),
            Self::Acp => WINDOWS_1252.name(),
            Self::Oem => IBM866.name(),
            Self::Other(encoding) => encoding.name(),
        }
    }
}

/// Converts bytes from the given encoding to UTF-8.
///
/// Borrows the input when it is already valid UTF-8.
///
/// ```
/// use gitrun::utility::encoding::{bytes_to_utf8, Encoding};
///
/// let cp1252_bytes = b"caf\xe9"; // "café" in Windows-1252
/// assert_eq!(bytes_to_utf8(Encoding::Acp, cp1252_bytes), "café");
/// ```
#[must_use]
pub fn bytes_to_utf8(encoding: Encoding, bytes: &[u8]) -> Cow<'_, str> {
    match encoding {
        Encoding::Utf8 => String::from_utf8_lossy(bytes),
        Encoding::Utf16Le => utf16_le_to_utf8(bytes),
        Encoding::Acp => WINDOWS_1252.decode_without_bom_handling(bytes).0,
        Encoding::Oem => IBM866.decode_without_bom_handling(bytes).0,
        Encoding::Other(encoding) => encoding.decode_without_bom_handling(bytes).0,
    }
}

/// Converts UTF-16 LE bytes to UTF-8, ignoring a trailing odd byte.
fn utf16_le_to_utf8(bytes: &[u8]) -> Cow<'static, str> {
    let len = bytes.len() & !1;
    if len == 0 {
        return Cow::Borrowed("");
    }

    let units: Vec<u16> = bytes[..len]
        .chunks_exact(2)
        .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
        .collect();

    Cow::Owned(String::from_utf16_lossy(&units))
}
