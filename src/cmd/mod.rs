// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Command implementations.
//!
//! ```text
//! CLI args --> cmd::run_* handlers --> JSON on stdout
//!   config: options, configs
//!   git:    status, log, ..., raw
//! ```

pub mod config;
pub mod git;
