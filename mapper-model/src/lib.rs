/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

//! The mapper data model: tree types, references, context, and the
//! pure tree/path utilities the emitter and transpiler build on.

pub mod context;
pub mod error;
pub mod node;
pub mod output_path;
pub mod preferences;
pub mod reference;
pub mod state;
pub mod tree;
pub mod value_expr;

pub use error::{ModelError, Result};
pub use node::{MapperTreeNode, NodeCondition, NodeType};
pub use reference::{FlatReference, LoopCondition, LoopConditionsConnective, SourceReference};
pub use state::{InputType, MapperState, CURRENT_MODEL_VERSION};
