/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Script emitter and sandboxed script executor for the mapper engine.

pub mod emitter;
pub mod error;
pub mod executor;
mod shims;

pub use emitter::emit_script;
pub use error::{Result, RuntimeError};
pub use executor::{execute_script, ExecuteOptions, ExecutionResult};
