// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Core modules for process management.
//!
//! ```text
//!              core
//!               |
//!               v
//!            process
//!               |
//!   Spawner (seam)  ProcessSpawner  ProcessBuilder
//!   RawProcessResult  OutputChunk   which cache
//! ```

pub mod process;
