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

use std::sync::{Arc, RwLock};

use avsettings_sdk::{
    api::device::{device_hal::DeviceHal, device_request::StereoMode},
    log::{error, info},
};

use super::port_resolver::PRIMARY_VIDEO_PORT;

/// Highest version whose clients predate PassThru and auto sound modes.
pub const LEGACY_API_VERSION_MAX: u32 = 4;

/// Capability table: one entry per feature introduced after version 1.
/// Methods consult this once instead of repeating version comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFeature {
    SupportedAudioModes,
    EdidRead,
    ActiveInput,
    AutoSoundMode,
    SpdifPortName,
    TvResolutions,
    HdrCapabilities,
    StandbyPortStatus,
}

impl ApiFeature {
    pub fn min_version(self) -> u32 {
        match self {
            Self::SupportedAudioModes => 2,
            Self::EdidRead => 4,
            Self::ActiveInput => 5,
            Self::AutoSoundMode => 5,
            Self::SpdifPortName => 5,
            Self::TvResolutions => 6,
            Self::HdrCapabilities => 6,
            Self::StandbyPortStatus => 7,
        }
    }
}

/// Negotiated client API version, scoped to the engine instance. The default
/// keeps every feature enabled until a client negotiates down.
#[derive(Clone)]
pub struct ApiVersionGate {
    version: Arc<RwLock<u32>>,
}

impl ApiVersionGate {
    pub fn new(default_version: u32) -> ApiVersionGate {
        ApiVersionGate {
            version: Arc::new(RwLock::new(default_version)),
        }
    }

    pub fn version(&self) -> u32 {
        *self.version.read().unwrap()
    }

    pub fn supports(&self, feature: ApiFeature) -> bool {
        self.version() >= feature.min_version()
    }

    /// Stores the negotiated version. Lowering into the legacy range
    /// re-normalizes the primary HDMI audio port, since legacy clients
    /// understand neither auto-stereo nor PassThru. Migration failures are
    /// logged and swallowed; they never abort the negotiation.
    pub fn set_version(&self, version: u32, hal: &dyn DeviceHal) {
        {
            let mut current = self.version.write().unwrap();
            info!("api version {} -> {}", *current, version);
            *current = version;
        }
        if version <= LEGACY_API_VERSION_MAX {
            Self::migrate_legacy_audio(hal);
        }
    }

    fn migrate_legacy_audio(hal: &dyn DeviceHal) {
        match hal.stereo_auto(PRIMARY_VIDEO_PORT) {
            Ok(true) => {
                info!("legacy client: forcing {} out of auto", PRIMARY_VIDEO_PORT);
                if let Err(e) = hal.set_stereo_auto(PRIMARY_VIDEO_PORT, false) {
                    error!("unable to disable auto stereo: {}", e);
                }
                if let Err(e) = hal.set_stereo_mode(PRIMARY_VIDEO_PORT, StereoMode::Surround) {
                    error!("unable to force surround: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => error!("unable to read auto stereo state: {}", e),
        }
        match hal.stereo_mode(PRIMARY_VIDEO_PORT) {
            Ok(StereoMode::PassThru) => {
                info!("legacy client: replacing PassThru on {}", PRIMARY_VIDEO_PORT);
                if let Err(e) = hal.set_stereo_mode(PRIMARY_VIDEO_PORT, StereoMode::Surround) {
                    error!("unable to replace passthru: {}", e);
                }
            }
            Ok(_) => {}
            Err(e) => error!("unable to read stereo mode: {}", e),
        }
    }
}
