/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Legacy-dialect transpiler (§4.7): a three-tier pattern rewriter plus the
//! whole-state walker that applies it to every candidate field.

pub mod diagnostics;
pub mod pipeline;
pub mod state;
mod tier1;
mod tier2;
mod tier3;

pub use diagnostics::{Severity, Warning};
pub use pipeline::{transpile_groovy_to_js, TranspileResult};
pub use state::{transpile_mapper_state, StateTranspileReport};
