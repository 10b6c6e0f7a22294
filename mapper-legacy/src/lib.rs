/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! Legacy-dialect transpiler and legacy model-format migrator.

pub mod error;
pub mod migrate;
pub mod serialization;
pub mod transpile;

pub use error::{LegacyError, Result};
pub use migrate::migrate_legacy_state;
pub use serialization::deserialize;
pub use transpile::{transpile_groovy_to_js, transpile_mapper_state, StateTranspileReport, TranspileResult};
