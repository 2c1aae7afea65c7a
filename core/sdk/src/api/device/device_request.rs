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

/// HDR capability bits as reported by the device-settings HAL.
pub mod hdr_flags {
    pub const HDRSTANDARD_NONE: u32 = 0x00;
    pub const HDRSTANDARD_HDR10: u32 = 0x01;
    pub const HDRSTANDARD_HLG: u32 = 0x02;
    pub const HDRSTANDARD_DOLBY_VISION: u32 = 0x04;
    pub const HDRSTANDARD_TECHNICOLOR_PRIME: u32 = 0x08;
}

/// Surround capability bits advertised by a connected display's EDID.
pub mod surround_flags {
    pub const SURROUNDMODE_NONE: u32 = 0x00;
    pub const SURROUNDMODE_DD: u32 = 0x01;
    pub const SURROUNDMODE_DDPLUS: u32 = 0x02;
}

/// TV resolution capability bits for the EDID-driven resolution query.
pub mod tv_resolution_flags {
    pub const TV_RESOLUTION_480I: u32 = 0x0001;
    pub const TV_RESOLUTION_480P: u32 = 0x0002;
    pub const TV_RESOLUTION_576I: u32 = 0x0004;
    pub const TV_RESOLUTION_576P: u32 = 0x0008;
    pub const TV_RESOLUTION_720P: u32 = 0x0010;
    pub const TV_RESOLUTION_1080I: u32 = 0x0020;
    pub const TV_RESOLUTION_1080P: u32 = 0x0040;
    pub const TV_RESOLUTION_2160P30: u32 = 0x0080;
    pub const TV_RESOLUTION_2160P60: u32 = 0x0100;
}

/// Ordered mapping of TV resolution bits to their wire tags.
pub const TV_RESOLUTION_TAGS: [(u32, &str); 9] = [
    (tv_resolution_flags::TV_RESOLUTION_480I, "480i"),
    (tv_resolution_flags::TV_RESOLUTION_480P, "480p"),
    (tv_resolution_flags::TV_RESOLUTION_576I, "576i"),
    (tv_resolution_flags::TV_RESOLUTION_576P, "576p"),
    (tv_resolution_flags::TV_RESOLUTION_720P, "720p"),
    (tv_resolution_flags::TV_RESOLUTION_1080I, "1080i"),
    (tv_resolution_flags::TV_RESOLUTION_1080P, "1080p"),
    (tv_resolution_flags::TV_RESOLUTION_2160P30, "2160p30"),
    (tv_resolution_flags::TV_RESOLUTION_2160P60, "2160p60"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StereoMode {
    #[serde(rename = "mono")]
    Mono,
    #[serde(rename = "stereo")]
    Stereo,
    #[serde(rename = "surround")]
    Surround,
    #[serde(rename = "passthru")]
    PassThru,
}

impl std::fmt::Display for StereoMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Mono => write!(f, "Mono"),
            Self::Stereo => write!(f, "Stereo"),
            Self::Surround => write!(f, "Surround"),
            Self::PassThru => write!(f, "PassThru"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ZoomMode {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "FULL")]
    Full,
}

impl ZoomMode {
    pub fn from_name(name: &str) -> Option<ZoomMode> {
        match name {
            "NONE" => Some(ZoomMode::None),
            "FULL" => Some(ZoomMode::Full),
            _ => None,
        }
    }
}

impl std::fmt::Display for ZoomMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::None => write!(f, "NONE"),
            Self::Full => write!(f, "FULL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RxSenseStatus {
    On,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HotPlugStatus {
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HdrStandard {
    #[serde(rename = "HDR10")]
    Hdr10,
    #[serde(rename = "Dolby Vision")]
    DolbyVision,
    #[serde(rename = "Technicolor Prime")]
    TechnicolorPrime,
}

impl std::fmt::Display for HdrStandard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            Self::Hdr10 => write!(f, "HDR10"),
            Self::DolbyVision => write!(f, "Dolby Vision"),
            Self::TechnicolorPrime => write!(f, "Technicolor Prime"),
        }
    }
}

/// Expands an HDR capability bitmask into the wire-facing standard names.
/// An empty mask yields the literal "none" entry.
pub fn hdr_standards_from_bitmask(capabilities: u32) -> Vec<String> {
    let mut standards = Vec::new();
    if 0 != (capabilities & hdr_flags::HDRSTANDARD_HDR10) {
        standards.push(HdrStandard::Hdr10.to_string());
    }
    if 0 != (capabilities & hdr_flags::HDRSTANDARD_DOLBY_VISION) {
        standards.push(HdrStandard::DolbyVision.to_string());
    }
    if 0 != (capabilities & hdr_flags::HDRSTANDARD_TECHNICOLOR_PRIME) {
        standards.push(HdrStandard::TechnicolorPrime.to_string());
    }
    if standards.is_empty() {
        standards.push("none".to_owned());
    }
    standards
}

/// Expands a TV resolution bitmask into ordered wire tags, "none" when empty.
pub fn tv_resolutions_from_bitmask(capabilities: u32) -> Vec<String> {
    let mut resolutions: Vec<String> = TV_RESOLUTION_TAGS
        .iter()
        .filter(|(bit, _)| 0 != (capabilities & bit))
        .map(|(_, tag)| (*tag).to_owned())
        .collect();
    if resolutions.is_empty() {
        resolutions.push("none".to_owned());
    }
    resolutions
}
