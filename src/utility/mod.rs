// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Utility modules.
//!
//! ```text
//! encoding
//!   bytes_to_utf8()  UTF-16/CP1252/CP866/labelled --> UTF-8
//!   Encoding::from_label()
//! ```

pub mod encoding;
