// Copyright 2023 Comcast Cable Communications Management, LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0
//

use serde_json::Value;

/// Reserved key under which the previous client generation passes its
/// positional parameter array instead of named fields.
pub const POSITIONAL_PARAMS_KEY: &str = "params";

/// Generic key/value request object handed over by the RPC host.
///
/// Two client generations disagree on parameter encoding: the current one
/// sends named fields, the previous one a positional array under
/// [POSITIONAL_PARAMS_KEY]. Lookup precedence is the named field when present
/// and non-empty, then the positional slot, then the caller's default.
/// Absence of a key, a wrong type, or a missing positional array are all
/// normal outcomes, never errors.
#[derive(Debug, Clone, Default)]
pub struct SettingsRequest {
    params: Value,
}

impl SettingsRequest {
    pub fn new(params: Value) -> SettingsRequest {
        SettingsRequest { params }
    }

    fn positional(&self, slot: usize) -> Option<&Value> {
        self.params
            .get(POSITIONAL_PARAMS_KEY)
            .and_then(|v| v.as_array())
            .and_then(|a| a.get(slot))
    }

    pub fn opt_string(&self, key: &str, slot: usize) -> Option<String> {
        if let Some(v) = self.params.get(key).and_then(|v| v.as_str()) {
            if !v.is_empty() {
                return Some(v.to_owned());
            }
        }
        if let Some(v) = self.positional(slot).and_then(|v| v.as_str()) {
            if !v.is_empty() {
                return Some(v.to_owned());
            }
        }
        None
    }

    pub fn string(&self, key: &str, slot: usize, default: &str) -> String {
        self.opt_string(key, slot)
            .unwrap_or_else(|| default.to_owned())
    }

    pub fn opt_u32(&self, key: &str, slot: usize) -> Option<u32> {
        Self::as_u32(self.params.get(key)).or_else(|| Self::as_u32(self.positional(slot)))
    }

    pub fn opt_bool(&self, key: &str, slot: usize) -> Option<bool> {
        Self::as_bool(self.params.get(key)).or_else(|| Self::as_bool(self.positional(slot)))
    }

    // Numeric parameters may arrive as JSON numbers or as stringified numbers
    // depending on the client generation.
    fn as_u32(value: Option<&Value>) -> Option<u32> {
        match value {
            Some(Value::Number(n)) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
            Some(Value::String(s)) => s.parse::<u32>().ok(),
            _ => None,
        }
    }

    fn as_bool(value: Option<&Value>) -> Option<bool> {
        match value {
            Some(Value::Bool(b)) => Some(*b),
            Some(Value::String(s)) => match s.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_field_wins_over_positional() {
        let req = SettingsRequest::new(json!({
            "videoDisplay": "HDMI0",
            "params": ["COMPONENT"]
        }));
        assert_eq!(req.string("videoDisplay", 0, "x"), "HDMI0");
    }

    #[test]
    fn test_positional_fallback() {
        let req = SettingsRequest::new(json!({ "params": ["COMPONENT", "720p"] }));
        assert_eq!(req.string("videoDisplay", 0, "x"), "COMPONENT");
        assert_eq!(req.string("resolution", 1, "x"), "720p");
    }

    #[test]
    fn test_empty_named_field_falls_through() {
        let req = SettingsRequest::new(json!({ "videoDisplay": "", "params": ["SPDIF0"] }));
        assert_eq!(req.string("videoDisplay", 0, "x"), "SPDIF0");
    }

    #[test]
    fn test_default_applies_when_everything_is_missing() {
        let req = SettingsRequest::new(json!({}));
        assert_eq!(req.string("videoDisplay", 0, "HDMI0"), "HDMI0");
        assert_eq!(req.opt_string("videoDisplay", 0), None);
    }

    #[test]
    fn test_wrong_types_are_tolerated() {
        let req = SettingsRequest::new(json!({ "videoDisplay": 7, "params": "oops" }));
        assert_eq!(req.opt_string("videoDisplay", 0), None);
        let req = SettingsRequest::new(Value::Null);
        assert_eq!(req.opt_string("videoDisplay", 0), None);
    }

    #[test]
    fn test_numeric_and_bool_coercion() {
        let req = SettingsRequest::new(json!({ "version": "6", "enabled": "true" }));
        assert_eq!(req.opt_u32("version", 0), Some(6));
        assert_eq!(req.opt_bool("enabled", 1), Some(true));
        let req = SettingsRequest::new(json!({ "version": 7, "enabled": false }));
        assert_eq!(req.opt_u32("version", 0), Some(7));
        assert_eq!(req.opt_bool("enabled", 1), Some(false));
    }
}
