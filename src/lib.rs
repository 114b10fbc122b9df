// gitrun: git command automation layer
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Library root.
//!
//! # Crate Architecture
//!
//! ```text
//!                        main.rs
//!                           |
//!                +----------+----------+
//!                v                     v
//!             cli (clap)          cmd (handlers)
//!                |                     |
//!                +----------+----------+
//!                           v
//!              ,---------------------------,
//!              |   config (TOML + env)     |
//!              '-------------+-------------'
//!                            v
//!              ,---------------------------,
//!              |  git: Git / Session       |
//!              |  GitCommands -> Task<T>   |
//!              '-------------+-------------'
//!                            v
//!   task: ExecutionChain --> Scheduler (FIFO slots)
//!              |         --> PendingQueue (purge on fatal)
//!              v
//!   core::process: Spawner --> tokio::process
//!              |
//!              v
//!   parsers: status/branch/diff/log/push/pull/merge/tag/...
//!
//!   +-----------------------------------------+
//!   |  foundation   error, logging, utility   |
//!   +-----------------------------------------+
//! ```

pub mod cli;
pub mod cmd;
pub mod config;
pub mod core;
pub mod error;
pub mod git;
pub mod logging;
pub mod parsers;
pub mod task;
pub mod utility;
