/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};

/// A single global variable declaration (§4.5 step 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariable {
    pub name: String,
    pub value: String,
    pub plain_text_value: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_final: Option<bool>,
}

/// One entry of a named lookup table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupEntry {
    pub key: String,
    pub value: String,
    pub plain_text_value: bool,
}

/// A named lookup table (§4.5 step 3).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupTable {
    pub name: String,
    pub entries: Vec<LookupEntry>,
}

/// A named, verbatim-injected user function body (§4.5 step 4).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFunction {
    pub name: String,
    pub body: String,
}

/// Globals, lookup tables, user functions and verbatim prolog/epilog code
/// shared by the whole mapping (§3 `MapperContext`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapperContext {
    #[serde(default)]
    pub global_variables: Vec<GlobalVariable>,
    #[serde(default)]
    pub lookup_tables: Vec<LookupTable>,
    #[serde(default)]
    pub functions: Vec<UserFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prolog_script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epilog_script: Option<String>,
}

impl MapperContext {
    pub fn nonblank_prolog(&self) -> Option<&str> {
        self.prolog_script.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }

    pub fn nonblank_epilog(&self) -> Option<&str> {
        self.epilog_script.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}
