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

use super::device_request::{StereoMode, ZoomMode};

/// Failure surfaced by the device-settings HAL. Carries the driver error code
/// and the driver-formatted message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HalError {
    pub code: i32,
    pub message: String,
}

impl HalError {
    pub fn new(code: i32, message: impl Into<String>) -> HalError {
        HalError {
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for HalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hal error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for HalError {}

pub type HalResult<T> = Result<T, HalError>;

/// Device-settings HAL seam. Each platform implements this trait over its
/// native port objects; every call is synchronous and reads live hardware
/// state. Video and audio endpoints share canonical port names ("HDMI0",
/// "SPDIF0"); enumeration order is the hardware-reported order.
pub trait DeviceHal: Send + Sync {
    fn video_port_names(&self) -> HalResult<Vec<String>>;
    fn audio_port_names(&self) -> HalResult<Vec<String>>;

    fn is_display_connected(&self, video_port: &str) -> HalResult<bool>;
    fn is_display_active(&self, video_port: &str) -> HalResult<bool>;

    fn current_resolution(&self, video_port: &str) -> HalResult<String>;
    fn set_resolution(&self, video_port: &str, resolution: &str) -> HalResult<()>;
    fn supported_resolutions(&self, video_port: &str) -> HalResult<Vec<String>>;
    fn supported_tv_resolutions(&self, video_port: &str) -> HalResult<u32>;
    fn supported_settop_resolutions(&self) -> HalResult<Vec<String>>;

    fn zoom_setting(&self) -> HalResult<ZoomMode>;
    fn set_zoom_setting(&self, zoom: ZoomMode) -> HalResult<()>;

    fn is_audio_port_connected(&self, audio_port: &str) -> HalResult<bool>;
    fn stereo_mode(&self, audio_port: &str) -> HalResult<StereoMode>;
    fn set_stereo_mode(&self, audio_port: &str, mode: StereoMode) -> HalResult<()>;
    fn stereo_auto(&self, audio_port: &str) -> HalResult<bool>;
    fn set_stereo_auto(&self, audio_port: &str, auto: bool) -> HalResult<()>;
    fn supported_stereo_modes(&self, audio_port: &str) -> HalResult<Vec<StereoMode>>;

    /// Surround capability bits of the display attached to a video port, see
    /// [super::device_request::surround_flags].
    fn surround_capabilities(&self, video_port: &str) -> HalResult<u32>;

    fn edid_bytes(&self, video_port: &str) -> HalResult<Vec<u8>>;
    fn host_edid(&self) -> HalResult<Vec<u8>>;

    fn tv_hdr_capabilities(&self) -> HalResult<u32>;
    fn settop_hdr_capabilities(&self) -> HalResult<u32>;

    fn video_port_status_in_standby(&self, video_port: &str) -> HalResult<bool>;
    fn set_video_port_status_in_standby(&self, video_port: &str, enabled: bool) -> HalResult<()>;
}
