/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Failure modes for the model layer.
///
/// Per the model layer's policy, most lookup misses resolve to `None`
/// rather than an `Err` — this type exists for the handful of operations
/// that cannot express failure any other way (deep structural invariants
/// checked at mutation time, recursion-depth guards on untrusted trees).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("node `{0}` not found in tree")]
    NodeNotFound(String),

    #[error("node `{0}` is not an array node")]
    NotAnArray(String),

    #[error("tree exceeds maximum nesting depth ({0})")]
    MaxDepthExceeded(usize),

    #[error("array child node must have exactly one child, found {0}")]
    InvalidArrayChildArity(usize),
}

pub type Result<T> = std::result::Result<T, ModelError>;
