/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// User-facing knobs that steer the emitter (§3 `MapperPreferences`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperPreferences {
    #[serde(default)]
    pub debug_comment: bool,
    #[serde(default = "default_true")]
    pub override_target_value: bool,
    #[serde(default)]
    pub auto_map: bool,
    #[serde(default)]
    pub auto_map_one_to_many: bool,
    #[serde(default)]
    pub auto_map_include_sub_nodes: bool,
}

impl Default for MapperPreferences {
    fn default() -> Self {
        MapperPreferences {
            debug_comment: false,
            override_target_value: true,
            auto_map: false,
            auto_map_one_to_many: false,
            auto_map_include_sub_nodes: false,
        }
    }
}
