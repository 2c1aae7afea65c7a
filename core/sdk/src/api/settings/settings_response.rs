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

// Every method responds with an embedded `success` flag; transport-level
// errors stay reserved for protocol problems.

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuirksResponse {
    pub quirks: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedVideoDisplaysResponse {
    pub connected_video_displays: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedAudioPortsResponse {
    pub connected_audio_ports: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedResolutionsResponse {
    pub supported_resolutions: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedVideoDisplaysResponse {
    pub supported_video_displays: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedTvResolutionsResponse {
    pub supported_tv_resolutions: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedSettopResolutionsResponse {
    pub supported_settop_resolutions: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedAudioPortsResponse {
    pub supported_audio_ports: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportedAudioModesResponse {
    pub supported_audio_modes: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoomSettingResponse {
    pub zoom_setting: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolutionResponse {
    pub resolution: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoundModeResponse {
    pub sound_mode: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdidResponse {
    #[serde(rename = "EDID")]
    pub edid: String,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInputResponse {
    pub active_input: bool,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HdrSupportResponse {
    #[serde(rename = "supportsHDR")]
    pub supports_hdr: bool,
    pub standards: Vec<String>,
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StandbyStatusResponse {
    pub video_port_status_in_standby: bool,
    pub success: bool,
    // the standby pair reports failures under this exact wire name
    #[serde(rename = "error_message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiVersionResponse {
    pub version: u32,
    pub success: bool,
}

/// Bare acknowledgement for setters. `error_message` is populated only by the
/// standby-status pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(rename = "error_message", skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl AckResponse {
    pub fn ok() -> AckResponse {
        AckResponse {
            success: true,
            error_message: None,
        }
    }

    pub fn failed() -> AckResponse {
        AckResponse {
            success: false,
            error_message: None,
        }
    }

    pub fn failed_with(message: impl Into<String>) -> AckResponse {
        AckResponse {
            success: false,
            error_message: Some(message.into()),
        }
    }
}
