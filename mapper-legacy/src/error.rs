/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use thiserror::Error;

/// Failure modes for the legacy layer.
///
/// Per §7, transpile and migration never fail on field-level problems —
/// they fall back to defaults and keep going. This type exists only for
/// [`crate::serialization::deserialize`], the one entry point in this crate
/// allowed to surface an `Err` to its caller.
#[derive(Debug, Error)]
pub enum LegacyError {
    #[error("not valid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    #[error("document does not match the current model shape or a recognised legacy shape")]
    UnrecognisedShape,
}

pub type Result<T> = std::result::Result<T, LegacyError>;
