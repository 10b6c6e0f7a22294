/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Failure modes for the runtime layer.
///
/// Per §7, the emitter and executor never let these escape their public
/// entry points — they degrade to `"undefined"`, an empty diagnostics list,
/// or an `error` field on the result record instead. This type exists for
/// the handful of callers that build scripts programmatically and want a
/// typed reason when construction itself (not execution) cannot proceed.
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("source tree is required to emit against target node `{0}`")]
    MissingSourceTree(String),

    #[error("target tree is required to emit a script")]
    MissingTargetTree,

    #[error("script exceeds maximum emitter recursion depth ({0})")]
    MaxDepthExceeded(usize),

    #[error("failed to compile emitted script: {0}")]
    Compile(String),
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
