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

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const RESOLUTION_PRE_CHANGE_EVENT: &str = "resolutionPreChange";
pub const RESOLUTION_CHANGED_EVENT: &str = "resolutionChanged";
pub const ZOOM_SETTING_UPDATED_EVENT: &str = "zoomSettingUpdated";
pub const ACTIVE_INPUT_CHANGED_EVENT: &str = "activeInputChanged";
pub const CONNECTED_VIDEO_DISPLAYS_UPDATED_EVENT: &str = "connectedVideoDisplaysUpdated";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionChangedEvent {
    pub width: i32,
    pub height: i32,
    pub video_display_type: String,
    pub resolution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomSettingUpdatedEvent {
    pub zoom_setting: String,
    pub video_display_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInputChangedEvent {
    pub active_input: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedVideoDisplaysUpdatedEvent {
    pub connected_video_displays: Vec<String>,
}

/// Client-facing notification, constructed inside a bus-event handler and
/// handed straight to the host's fan-out. Not persisted or queued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SettingsEvent {
    ResolutionPreChange,
    ResolutionChanged(ResolutionChangedEvent),
    ZoomSettingUpdated(ZoomSettingUpdatedEvent),
    ActiveInputChanged(ActiveInputChangedEvent),
    ConnectedVideoDisplaysUpdated(ConnectedVideoDisplaysUpdatedEvent),
}

impl SettingsEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResolutionPreChange => RESOLUTION_PRE_CHANGE_EVENT,
            Self::ResolutionChanged(_) => RESOLUTION_CHANGED_EVENT,
            Self::ZoomSettingUpdated(_) => ZOOM_SETTING_UPDATED_EVENT,
            Self::ActiveInputChanged(_) => ACTIVE_INPUT_CHANGED_EVENT,
            Self::ConnectedVideoDisplaysUpdated(_) => CONNECTED_VIDEO_DISPLAYS_UPDATED_EVENT,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            Self::ResolutionPreChange => json!({}),
            Self::ResolutionChanged(e) => json!(e),
            Self::ZoomSettingUpdated(e) => json!(e),
            Self::ActiveInputChanged(e) => json!(e),
            Self::ConnectedVideoDisplaysUpdated(e) => json!(e),
        }
    }
}
