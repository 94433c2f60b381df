/*
 * SPDX-FileCopyrightText: 2025 Inria
 * SPDX-FileCopyrightText: 2025 Sebastiano Vigna
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![doc = include_str!("../README.md")]
#![deny(unstable_features)]
#![deny(trivial_casts)]
#![deny(unconditional_recursion)]
#![deny(clippy::empty_loop)]
#![deny(unreachable_code)]
#![deny(unreachable_patterns)]
#![deny(unused_macro_rules)]
#![deny(unused_doc_comments)]

pub mod arcs;
#[cfg(feature = "cli")]
pub mod cli;
pub mod degrees;
pub mod ids;
pub mod rank;
pub mod report;
pub mod titles;

/// Errors with a meaning beyond I/O failure.
///
/// Scans that cannot open or read the arc file fail with the underlying
/// [`std::io::Error`] wrapped in [`anyhow::Error`]; the variants below are the
/// conditions callers may want to handle specifically. In particular, a
/// [`NodeNotFound`](GraphError::NodeNotFound) returned by an investigation
/// does not invalidate a previously completed ranking run.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// The arc file yielded no node ids, so there is nothing to rank.
    #[error("the arc file contains no node ids")]
    EmptyGraph,
    /// The requested node id never appeared in the id-discovery pass.
    #[error("node id {0} does not appear in the graph")]
    NodeNotFound(u64),
}

/// Prelude module to import everything from this crate.
pub mod prelude {
    pub use crate::arcs::*;
    pub use crate::degrees::*;
    pub use crate::ids::*;
    pub use crate::rank::changes::*;
    pub use crate::rank::incoming::*;
    pub use crate::rank::pagerank::*;
    pub use crate::rank::select::*;
    pub use crate::report::*;
    pub use crate::GraphError;
}
