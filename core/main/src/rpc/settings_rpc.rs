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

use std::sync::Arc;

use jsonrpsee::{core::Error, types::Params, RpcModule};
use serde_json::Value;

use avsettings_sdk::api::settings::settings_request::SettingsRequest;

use crate::service::settings_engine::SettingsEngine;

/// Registers the settings surface on an [RpcModule]. Methods take the generic
/// request object rather than typed signatures: two client generations
/// disagree on parameter encoding, and the resolver in the request type
/// bridges them.
pub struct SettingsRPCProvider;

fn to_request(params: Params) -> SettingsRequest {
    SettingsRequest::new(params.parse::<Value>().unwrap_or(Value::Null))
}

impl SettingsRPCProvider {
    pub fn provide(engine: Arc<SettingsEngine>) -> Result<RpcModule<Arc<SettingsEngine>>, Error> {
        let mut module = RpcModule::new(engine);
        module.register_method("getQuirks", |_params, engine| Ok(engine.get_quirks()))?;
        module.register_method("getConnectedVideoDisplays", |_params, engine| {
            Ok(engine.get_connected_video_displays())
        })?;
        module.register_method("getConnectedAudioPorts", |_params, engine| {
            Ok(engine.get_connected_audio_ports())
        })?;
        module.register_method("getSupportedResolutions", |params, engine| {
            Ok(engine.get_supported_resolutions(&to_request(params)))
        })?;
        module.register_method("getSupportedVideoDisplays", |_params, engine| {
            Ok(engine.get_supported_video_displays())
        })?;
        module.register_method("getSupportedTvResolutions", |params, engine| {
            Ok(engine.get_supported_tv_resolutions(&to_request(params)))
        })?;
        module.register_method("getSupportedSettopResolutions", |_params, engine| {
            Ok(engine.get_supported_settop_resolutions())
        })?;
        module.register_method("getSupportedAudioPorts", |_params, engine| {
            Ok(engine.get_supported_audio_ports())
        })?;
        module.register_method("getSupportedAudioModes", |params, engine| {
            Ok(engine.get_supported_audio_modes(&to_request(params)))
        })?;
        module.register_method("getZoomSetting", |_params, engine| {
            Ok(engine.get_zoom_setting())
        })?;
        module.register_method("setZoomSetting", |params, engine| {
            Ok(engine.set_zoom_setting(&to_request(params)))
        })?;
        module.register_method("getCurrentResolution", |params, engine| {
            Ok(engine.get_current_resolution(&to_request(params)))
        })?;
        module.register_method("setCurrentResolution", |params, engine| {
            Ok(engine.set_current_resolution(&to_request(params)))
        })?;
        module.register_method("getSoundMode", |params, engine| {
            Ok(engine.get_sound_mode(&to_request(params)))
        })?;
        module.register_method("setSoundMode", |params, engine| {
            Ok(engine.set_sound_mode(&to_request(params)))
        })?;
        module.register_method("readEDID", |_params, engine| Ok(engine.read_edid()))?;
        module.register_method("readHostEDID", |_params, engine| Ok(engine.read_host_edid()))?;
        module.register_method("getActiveInput", |params, engine| {
            Ok(engine.get_active_input(&to_request(params)))
        })?;
        module.register_method("getTvHDRSupport", |_params, engine| {
            Ok(engine.get_tv_hdr_support())
        })?;
        module.register_method("getSettopHDRSupport", |_params, engine| {
            Ok(engine.get_settop_hdr_support())
        })?;
        module.register_method("setVideoPortStatusInStandby", |params, engine| {
            Ok(engine.set_video_port_status_in_standby(&to_request(params)))
        })?;
        module.register_method("getVideoPortStatusInStandby", |params, engine| {
            Ok(engine.get_video_port_status_in_standby(&to_request(params)))
        })?;
        module.register_method("getApiVersionNumber", |_params, engine| {
            Ok(engine.get_api_version_number())
        })?;
        module.register_method("setApiVersionNumber", |params, engine| {
            Ok(engine.set_api_version_number(&to_request(params)))
        })?;
        Ok(module)
    }
}
