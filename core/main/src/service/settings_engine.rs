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

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use avsettings_sdk::{
    api::{
        device::device_request::{
            hdr_standards_from_bitmask, tv_resolutions_from_bitmask, StereoMode, ZoomMode,
        },
        settings::{
            settings_request::SettingsRequest,
            settings_response::{
                AckResponse, ActiveInputResponse, ApiVersionResponse, ConnectedAudioPortsResponse,
                ConnectedVideoDisplaysResponse, EdidResponse, HdrSupportResponse, QuirksResponse,
                ResolutionResponse, SoundModeResponse, StandbyStatusResponse,
                SupportedAudioModesResponse, SupportedAudioPortsResponse,
                SupportedResolutionsResponse, SupportedSettopResolutionsResponse,
                SupportedTvResolutionsResponse, SupportedVideoDisplaysResponse,
                ZoomSettingResponse,
            },
        },
    },
    log::{error, warn},
    utils::error::ServiceError,
};

use crate::state::settings_state::SettingsState;

use super::{
    display_enumerator::DisplayEnumerator,
    port_resolver::{audio_port_for, is_hdmi, PortNameNormalizer, PortQuery, PRIMARY_VIDEO_PORT},
    sound_mode::SoundModeResolver,
    version_gate::ApiFeature,
};

/// Historical client workarounds this implementation carries.
pub const QUIRKS: [&str; 5] = [
    "XRE-7389",
    "XRE-7912",
    "DELIA-16415",
    "RDK-16024",
    "DELIA-18552",
];

/// Placeholder EDID payload for reads with no display attached.
const EDID_UNKNOWN: &[u8] = b"unknown";

/// Façade over the reconciliation components; one method per RPC operation.
/// No failure escapes a method: HAL errors become conservative defaults on
/// getters and `success=false` on setters.
pub struct SettingsEngine {
    state: SettingsState,
}

impl SettingsEngine {
    pub fn new(state: SettingsState) -> SettingsEngine {
        SettingsEngine { state }
    }

    pub fn state(&self) -> &SettingsState {
        &self.state
    }

    /// Read-oriented queries treat an unrecognized display name as the
    /// primary port instead of failing.
    fn video_port_or_primary(&self, req: &SettingsRequest) -> String {
        let raw = req.string("videoDisplay", 0, PRIMARY_VIDEO_PORT);
        match PortNameNormalizer::normalize(&raw, self.state.gate.version()) {
            Some(PortQuery::Port(port)) => port,
            Some(PortQuery::Browse) | None => {
                warn!("display {:?} not recognized, using {}", raw, PRIMARY_VIDEO_PORT);
                PRIMARY_VIDEO_PORT.to_owned()
            }
        }
    }

    pub fn get_quirks(&self) -> QuirksResponse {
        QuirksResponse {
            quirks: QUIRKS.iter().map(|q| (*q).to_owned()).collect(),
            success: true,
        }
    }

    pub fn get_connected_video_displays(&self) -> ConnectedVideoDisplaysResponse {
        let hal = self.state.get_hal();
        let displays = DisplayEnumerator::connected_video_displays(hal.as_ref()).unwrap_or_else(|e| {
            error!("getConnectedVideoDisplays: {}", e);
            Vec::new()
        });
        ConnectedVideoDisplaysResponse {
            connected_video_displays: displays,
            success: true,
        }
    }

    pub fn get_connected_audio_ports(&self) -> ConnectedAudioPortsResponse {
        let hal = self.state.get_hal();
        let ports = DisplayEnumerator::connected_audio_ports(hal.as_ref()).unwrap_or_else(|e| {
            error!("getConnectedAudioPorts: {}", e);
            Vec::new()
        });
        ConnectedAudioPortsResponse {
            connected_audio_ports: ports,
            success: true,
        }
    }

    pub fn get_supported_resolutions(&self, req: &SettingsRequest) -> SupportedResolutionsResponse {
        let port = self.video_port_or_primary(req);
        let resolutions = self
            .state
            .get_hal()
            .supported_resolutions(&port)
            .unwrap_or_else(|e| {
                error!("getSupportedResolutions on {}: {}", port, e);
                Vec::new()
            });
        SupportedResolutionsResponse {
            supported_resolutions: resolutions,
            success: true,
        }
    }

    pub fn get_supported_video_displays(&self) -> SupportedVideoDisplaysResponse {
        let hal = self.state.get_hal();
        let displays = DisplayEnumerator::supported_video_displays(hal.as_ref()).unwrap_or_else(|e| {
            error!("getSupportedVideoDisplays: {}", e);
            Vec::new()
        });
        SupportedVideoDisplaysResponse {
            supported_video_displays: displays,
            success: true,
        }
    }

    pub fn get_supported_tv_resolutions(
        &self,
        req: &SettingsRequest,
    ) -> SupportedTvResolutionsResponse {
        if !self.state.gate.supports(ApiFeature::TvResolutions) {
            return SupportedTvResolutionsResponse {
                supported_tv_resolutions: Vec::new(),
                success: false,
            };
        }
        let port = self.video_port_or_primary(req);
        let tags = match self.state.get_hal().supported_tv_resolutions(&port) {
            Ok(mask) => tv_resolutions_from_bitmask(mask),
            Err(e) => {
                error!("getSupportedTvResolutions on {}: {}", port, e);
                vec!["none".to_owned()]
            }
        };
        SupportedTvResolutionsResponse {
            supported_tv_resolutions: tags,
            success: true,
        }
    }

    pub fn get_supported_settop_resolutions(&self) -> SupportedSettopResolutionsResponse {
        if !self.state.gate.supports(ApiFeature::TvResolutions) {
            return SupportedSettopResolutionsResponse {
                supported_settop_resolutions: Vec::new(),
                success: false,
            };
        }
        let resolutions = self
            .state
            .get_hal()
            .supported_settop_resolutions()
            .unwrap_or_else(|e| {
                error!("getSupportedSettopResolutions: {}", e);
                Vec::new()
            });
        SupportedSettopResolutionsResponse {
            supported_settop_resolutions: resolutions,
            success: true,
        }
    }

    pub fn get_supported_audio_ports(&self) -> SupportedAudioPortsResponse {
        let hal = self.state.get_hal();
        let ports = DisplayEnumerator::supported_audio_ports(hal.as_ref()).unwrap_or_else(|e| {
            error!("getSupportedAudioPorts: {}", e);
            Vec::new()
        });
        SupportedAudioPortsResponse {
            supported_audio_ports: ports,
            success: true,
        }
    }

    pub fn get_supported_audio_modes(&self, req: &SettingsRequest) -> SupportedAudioModesResponse {
        if !self.state.gate.supports(ApiFeature::SupportedAudioModes) {
            return SupportedAudioModesResponse {
                supported_audio_modes: Vec::new(),
                success: false,
            };
        }
        let version = self.state.gate.version();
        let raw = req.string("audioPort", 0, "");
        let hal = self.state.get_hal();
        let ports = match PortNameNormalizer::normalize(&raw, version) {
            Some(PortQuery::Port(port)) => vec![port],
            Some(PortQuery::Browse) => hal.video_port_names().unwrap_or_else(|e| {
                error!("getSupportedAudioModes: {}", e);
                Vec::new()
            }),
            None => {
                warn!("audio port {:?} not recognized, using {}", raw, PRIMARY_VIDEO_PORT);
                vec![PRIMARY_VIDEO_PORT.to_owned()]
            }
        };
        let mut modes: Vec<String> = Vec::new();
        for port in ports {
            for label in self.audio_modes_for_port(&port, version) {
                if !modes.contains(&label) {
                    modes.push(label);
                }
            }
        }
        SupportedAudioModesResponse {
            supported_audio_modes: modes,
            success: true,
        }
    }

    fn audio_modes_for_port(&self, video_port: &str, version: u32) -> Vec<String> {
        let hal = self.state.get_hal();
        let audio_port = audio_port_for(video_port);
        let supported = match hal.supported_stereo_modes(&audio_port) {
            Ok(modes) => modes,
            Err(e) => {
                error!("supported modes on {}: {}", audio_port, e);
                return Vec::new();
            }
        };
        let auto_capable = version >= ApiFeature::AutoSoundMode.min_version();
        let mut labels = Vec::new();
        for mode in supported {
            // legacy clients predate PassThru
            if mode == StereoMode::PassThru && !auto_capable {
                continue;
            }
            if mode == StereoMode::Surround && auto_capable && is_hdmi(video_port) {
                // the surround literal is replaced by the computed auto label
                labels.push(SoundModeResolver::auto_label(hal.as_ref(), video_port));
                continue;
            }
            labels.push(mode.to_string());
        }
        labels
    }

    pub fn get_zoom_setting(&self) -> ZoomSettingResponse {
        let zoom = match self.state.get_hal().zoom_setting() {
            Ok(zoom) => zoom.to_string(),
            Err(e) => {
                error!("getZoomSetting: {}", e);
                String::new()
            }
        };
        ZoomSettingResponse {
            zoom_setting: zoom,
            success: true,
        }
    }

    pub fn set_zoom_setting(&self, req: &SettingsRequest) -> AckResponse {
        let raw = match req.opt_string("zoomSetting", 0) {
            Some(v) => v,
            None => return AckResponse::failed(),
        };
        let zoom = match ZoomMode::from_name(&raw.to_uppercase()) {
            Some(zoom) => zoom,
            None => {
                warn!("setZoomSetting: unrecognized level {:?}", raw);
                return AckResponse::failed();
            }
        };
        match self.state.get_hal().set_zoom_setting(zoom) {
            Ok(()) => AckResponse::ok(),
            Err(e) => {
                error!("setZoomSetting {}: {}", zoom, e);
                AckResponse::failed()
            }
        }
    }

    pub fn get_current_resolution(&self, req: &SettingsRequest) -> ResolutionResponse {
        let port = self.video_port_or_primary(req);
        let resolution = match self.state.get_hal().current_resolution(&port) {
            Ok(resolution) => resolution,
            Err(e) => {
                error!("getCurrentResolution on {}: {}", port, e);
                String::new()
            }
        };
        ResolutionResponse {
            resolution,
            success: true,
        }
    }

    pub fn set_current_resolution(&self, req: &SettingsRequest) -> AckResponse {
        let display = match req.opt_string("videoDisplay", 0) {
            Some(v) => v,
            None => return AckResponse::failed(),
        };
        let resolution = match req.opt_string("resolution", 1) {
            Some(v) => v,
            None => return AckResponse::failed(),
        };
        let port = match PortNameNormalizer::normalize(&display, self.state.gate.version()) {
            Some(PortQuery::Port(port)) => port,
            _ => {
                warn!("setCurrentResolution: invalid display {:?}", display);
                return AckResponse::failed();
            }
        };
        match self.state.get_hal().set_resolution(&port, &resolution) {
            Ok(()) => AckResponse::ok(),
            Err(e) => {
                error!("setCurrentResolution {} {}: {}", port, resolution, e);
                AckResponse::failed()
            }
        }
    }

    pub fn get_sound_mode(&self, req: &SettingsRequest) -> SoundModeResponse {
        let version = self.state.gate.version();
        let raw = req.string("videoDisplay", 0, "");
        let query = match PortNameNormalizer::normalize(&raw, version) {
            Some(query) => query,
            None => {
                warn!("display {:?} not recognized, using {}", raw, PRIMARY_VIDEO_PORT);
                PortQuery::Port(PRIMARY_VIDEO_PORT.to_owned())
            }
        };
        let hal = self.state.get_hal();
        SoundModeResponse {
            sound_mode: SoundModeResolver::resolve(hal.as_ref(), query, version),
            success: true,
        }
    }

    pub fn set_sound_mode(&self, req: &SettingsRequest) -> AckResponse {
        let mode = match req.opt_string("soundMode", 1) {
            Some(v) => v,
            None => return AckResponse::failed(),
        };
        let version = self.state.gate.version();
        let display = match req.opt_string("videoDisplay", 0) {
            Some(raw) => match PortNameNormalizer::normalize(&raw, version) {
                Some(PortQuery::Port(port)) => Some(port),
                Some(PortQuery::Browse) => None,
                None => {
                    warn!("setSoundMode: invalid display {:?}", raw);
                    return AckResponse::failed();
                }
            },
            None => None,
        };
        let hal = self.state.get_hal();
        match SoundModeResolver::apply(hal.as_ref(), display.as_deref(), &mode, version) {
            Ok(()) => AckResponse::ok(),
            Err(e) => {
                error!("setSoundMode {:?} {:?}: {}", display, mode, e);
                AckResponse::failed()
            }
        }
    }

    pub fn read_edid(&self) -> EdidResponse {
        if !self.state.gate.supports(ApiFeature::EdidRead) {
            return EdidResponse {
                edid: String::new(),
                success: false,
            };
        }
        let hal = self.state.get_hal();
        let bytes = match hal.is_display_connected(PRIMARY_VIDEO_PORT) {
            Ok(true) => hal.edid_bytes(PRIMARY_VIDEO_PORT).unwrap_or_else(|e| {
                error!("readEDID: {}", e);
                EDID_UNKNOWN.to_vec()
            }),
            Ok(false) => EDID_UNKNOWN.to_vec(),
            Err(e) => {
                error!("readEDID: {}", e);
                EDID_UNKNOWN.to_vec()
            }
        };
        EdidResponse {
            edid: BASE64.encode(bytes),
            success: true,
        }
    }

    pub fn read_host_edid(&self) -> EdidResponse {
        if !self.state.gate.supports(ApiFeature::EdidRead) {
            return EdidResponse {
                edid: String::new(),
                success: false,
            };
        }
        let bytes = self.state.get_hal().host_edid().unwrap_or_else(|e| {
            error!("readHostEDID: {}", e);
            EDID_UNKNOWN.to_vec()
        });
        EdidResponse {
            edid: BASE64.encode(bytes),
            success: true,
        }
    }

    pub fn get_active_input(&self, req: &SettingsRequest) -> ActiveInputResponse {
        if !self.state.gate.supports(ApiFeature::ActiveInput) {
            return ActiveInputResponse {
                active_input: false,
                success: false,
            };
        }
        let port = self.video_port_or_primary(req);
        let hal = self.state.get_hal();
        let active = hal
            .is_display_connected(&port)
            .and_then(|connected| {
                if connected {
                    hal.is_display_active(&port)
                } else {
                    Ok(false)
                }
            })
            .unwrap_or_else(|e| {
                error!("getActiveInput on {}: {}", port, e);
                false
            });
        ActiveInputResponse {
            active_input: active,
            success: true,
        }
    }

    pub fn get_tv_hdr_support(&self) -> HdrSupportResponse {
        if !self.state.gate.supports(ApiFeature::HdrCapabilities) {
            return HdrSupportResponse {
                supports_hdr: false,
                standards: Vec::new(),
                success: false,
            };
        }
        let mask = self.state.get_hal().tv_hdr_capabilities().unwrap_or_else(|e| {
            error!("getTvHDRSupport: {}", e);
            0
        });
        Self::hdr_response(mask)
    }

    pub fn get_settop_hdr_support(&self) -> HdrSupportResponse {
        if !self.state.gate.supports(ApiFeature::HdrCapabilities) {
            return HdrSupportResponse {
                supports_hdr: false,
                standards: Vec::new(),
                success: false,
            };
        }
        let mask = self
            .state
            .get_hal()
            .settop_hdr_capabilities()
            .unwrap_or_else(|e| {
                error!("getSettopHDRSupport: {}", e);
                0
            });
        Self::hdr_response(mask)
    }

    fn hdr_response(mask: u32) -> HdrSupportResponse {
        let standards = hdr_standards_from_bitmask(mask);
        HdrSupportResponse {
            supports_hdr: standards != vec!["none".to_owned()],
            standards,
            success: true,
        }
    }

    pub fn set_video_port_status_in_standby(&self, req: &SettingsRequest) -> AckResponse {
        if !self.state.gate.supports(ApiFeature::StandbyPortStatus) {
            return AckResponse::failed_with("unsupported at negotiated api version");
        }
        let port = match req.opt_string("portName", 0) {
            Some(v) => v,
            None => return AckResponse::failed_with("portName is required"),
        };
        let enabled = match req.opt_bool("enabled", 1) {
            Some(v) => v,
            None => return AckResponse::failed_with("enabled is required"),
        };
        match self
            .state
            .get_hal()
            .set_video_port_status_in_standby(&port, enabled)
        {
            Ok(()) => AckResponse::ok(),
            Err(e) => {
                error!("setVideoPortStatusInStandby {} {}: {}", port, enabled, e);
                AckResponse::failed_with(e.message)
            }
        }
    }

    pub fn get_video_port_status_in_standby(&self, req: &SettingsRequest) -> StandbyStatusResponse {
        if !self.state.gate.supports(ApiFeature::StandbyPortStatus) {
            return StandbyStatusResponse {
                video_port_status_in_standby: false,
                success: false,
                error_message: Some("unsupported at negotiated api version".to_owned()),
            };
        }
        let port = match req.opt_string("portName", 0) {
            Some(v) => v,
            None => {
                return StandbyStatusResponse {
                    video_port_status_in_standby: false,
                    success: false,
                    error_message: Some("portName is required".to_owned()),
                }
            }
        };
        match self.state.get_hal().video_port_status_in_standby(&port) {
            Ok(enabled) => StandbyStatusResponse {
                video_port_status_in_standby: enabled,
                success: true,
                error_message: None,
            },
            Err(e) => {
                error!("getVideoPortStatusInStandby {}: {}", port, e);
                StandbyStatusResponse {
                    video_port_status_in_standby: false,
                    success: false,
                    error_message: Some(e.message),
                }
            }
        }
    }

    pub fn get_api_version_number(&self) -> ApiVersionResponse {
        ApiVersionResponse {
            version: self.state.gate.version(),
            success: true,
        }
    }

    pub fn set_api_version_number(&self, req: &SettingsRequest) -> AckResponse {
        let version = match req.opt_u32("version", 0) {
            Some(v) => v,
            None => return AckResponse::failed(),
        };
        let hal = self.state.get_hal();
        self.state.gate.set_version(version, hal.as_ref());
        AckResponse::ok()
    }
}

#[cfg(test)]
pub mod tests {
    use std::sync::Arc;

    use super::*;
    use avsettings_sdk::api::{
        device::device_request::hdr_flags, manifest::service_manifest::ServiceManifest,
    };
    use mock_hal::{MockHal, MockPort};
    use serde_json::json;

    pub fn engine_with(hal: MockHal) -> SettingsEngine {
        let state = SettingsState::new(Arc::new(hal), &ServiceManifest::default());
        SettingsEngine::new(state)
    }

    fn request(value: serde_json::Value) -> SettingsRequest {
        SettingsRequest::new(value)
    }

    #[test]
    fn test_get_quirks_is_fixed() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.get_quirks();
        assert!(resp.success);
        assert_eq!(resp.quirks.len(), QUIRKS.len());
    }

    #[test]
    fn test_read_edid_disconnected_returns_unknown() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.read_edid();
        assert!(resp.success);
        // base64 of the literal "unknown"
        assert_eq!(resp.edid, "dW5rbm93bg==");
    }

    #[test]
    fn test_read_edid_connected_returns_display_edid() {
        let hal = MockHal::new();
        hal.add_port(
            "HDMI0",
            MockPort::connected().with_edid(vec![0x00, 0xff, 0x10]),
        );
        let engine = engine_with(hal);
        assert_eq!(engine.read_edid().edid, BASE64.encode([0x00, 0xff, 0x10]));
    }

    #[test]
    fn test_version_gated_methods_fail_softly() {
        let engine = engine_with(MockHal::with_default_ports());
        engine
            .state()
            .gate
            .set_version(4, engine.state().get_hal().as_ref());
        assert!(!engine.get_active_input(&request(json!({}))).success);
        assert!(!engine.get_tv_hdr_support().success);
        assert!(!engine.get_settop_hdr_support().success);
        assert!(!engine.get_supported_tv_resolutions(&request(json!({}))).success);
        assert!(!engine.get_supported_settop_resolutions().success);
        assert!(
            !engine
                .set_video_port_status_in_standby(&request(
                    json!({"portName": "HDMI0", "enabled": true})
                ))
                .success
        );
        // readEDID stays available at v4
        assert!(engine.read_edid().success);
    }

    #[test]
    fn test_get_active_input_reads_port_state() {
        let hal = MockHal::with_default_ports();
        hal.set_connected("HDMI0", true);
        hal.set_active("HDMI0", true);
        let engine = engine_with(hal);
        let resp = engine.get_active_input(&request(json!({"videoDisplay": "HDMI0"})));
        assert!(resp.success);
        assert!(resp.active_input);
    }

    #[test]
    fn test_tv_hdr_support_maps_bitmask() {
        let hal = MockHal::with_default_ports();
        hal.set_tv_hdr_caps(hdr_flags::HDRSTANDARD_HDR10 | hdr_flags::HDRSTANDARD_DOLBY_VISION);
        let engine = engine_with(hal);
        let resp = engine.get_tv_hdr_support();
        assert!(resp.supports_hdr);
        assert_eq!(
            resp.standards,
            vec!["HDR10".to_owned(), "Dolby Vision".to_owned()]
        );
    }

    #[test]
    fn test_settop_hdr_support_none() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.get_settop_hdr_support();
        assert!(!resp.supports_hdr);
        assert_eq!(resp.standards, vec!["none".to_owned()]);
    }

    #[test]
    fn test_settop_hdr_support_reports_device_caps() {
        let hal = MockHal::with_default_ports();
        hal.set_settop_hdr_caps(hdr_flags::HDRSTANDARD_HDR10);
        let engine = engine_with(hal);
        let resp = engine.get_settop_hdr_support();
        assert!(resp.supports_hdr);
        assert_eq!(resp.standards, vec!["HDR10".to_owned()]);
    }

    #[test]
    fn test_read_host_edid() {
        let hal = MockHal::with_default_ports();
        hal.set_host_edid(vec![0x12, 0x34]);
        let engine = engine_with(hal);
        assert_eq!(engine.read_host_edid().edid, BASE64.encode([0x12, 0x34]));
    }

    #[test]
    fn test_supported_settop_resolutions() {
        let hal = MockHal::with_default_ports();
        hal.set_settop_resolutions(vec!["720p".to_owned(), "1080p".to_owned()]);
        let engine = engine_with(hal);
        let resp = engine.get_supported_settop_resolutions();
        assert!(resp.success);
        assert_eq!(
            resp.supported_settop_resolutions,
            vec!["720p".to_owned(), "1080p".to_owned()]
        );
    }

    #[test]
    fn test_supported_resolutions_defaults_to_primary_port() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.get_supported_resolutions(&request(json!({})));
        assert!(resp.success);
        assert_eq!(
            resp.supported_resolutions,
            vec!["720p".to_owned(), "1080p".to_owned()]
        );
    }

    #[test]
    fn test_supported_tv_resolutions_expand_the_bitmask() {
        use avsettings_sdk::api::device::device_request::tv_resolution_flags;
        let hal = MockHal::new();
        let mut port = MockPort::connected();
        port.tv_resolution_caps = tv_resolution_flags::TV_RESOLUTION_720P
            | tv_resolution_flags::TV_RESOLUTION_1080P;
        hal.add_port("HDMI0", port);
        hal.add_port("SPDIF0", MockPort::default());
        let engine = engine_with(hal);
        let resp = engine.get_supported_tv_resolutions(&request(json!({"videoDisplay": "HDMI0"})));
        assert_eq!(
            resp.supported_tv_resolutions,
            vec!["720p".to_owned(), "1080p".to_owned()]
        );
    }

    #[test]
    fn test_set_current_resolution_requires_both_params() {
        let engine = engine_with(MockHal::with_default_ports());
        assert!(!engine.set_current_resolution(&request(json!({}))).success);
        assert!(
            !engine
                .set_current_resolution(&request(json!({"videoDisplay": "HDMI0"})))
                .success
        );
        assert!(
            engine
                .set_current_resolution(&request(
                    json!({"videoDisplay": "HDMI0", "resolution": "1080p"})
                ))
                .success
        );
    }

    #[test]
    fn test_setter_rejects_unrecognized_display() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.set_current_resolution(&request(
            json!({"videoDisplay": "SCART", "resolution": "1080p"}),
        ));
        assert!(!resp.success);
    }

    #[test]
    fn test_positional_parameter_generation() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.set_current_resolution(&request(json!({"params": ["HDMI0", "720p"]})));
        assert!(resp.success);
        assert_eq!(
            engine
                .get_current_resolution(&request(json!({"params": ["HDMI0"]})))
                .resolution,
            "720p"
        );
    }

    #[test]
    fn test_auto_sound_mode_scenario_at_v7() {
        use avsettings_sdk::api::device::device_request::surround_flags;
        let hal = MockHal::new();
        hal.add_port(
            "HDMI0",
            MockPort::connected().with_surround_caps(surround_flags::SURROUNDMODE_DDPLUS),
        );
        hal.add_port("SPDIF0", MockPort::default());
        let engine = engine_with(hal);
        engine
            .state()
            .gate
            .set_version(7, engine.state().get_hal().as_ref());
        let resp =
            engine.set_sound_mode(&request(json!({"videoDisplay": "", "soundMode": "auto"})));
        assert!(resp.success);
        let label = engine
            .get_sound_mode(&request(json!({"videoDisplay": "HDMI0"})))
            .sound_mode;
        assert_eq!(label, "AUTO (Dolby Digital Plus)");
    }

    #[test]
    fn test_set_sound_mode_invalid_display_fails() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.set_sound_mode(&request(
            json!({"videoDisplay": "SCART", "soundMode": "stereo"}),
        ));
        assert!(!resp.success);
    }

    #[test]
    fn test_supported_audio_modes_by_version() {
        let hal = MockHal::new();
        let mut port = MockPort::connected();
        port.supported_stereo_modes = vec![
            StereoMode::Mono,
            StereoMode::Stereo,
            StereoMode::Surround,
            StereoMode::PassThru,
        ];
        hal.add_port("HDMI0", port);
        hal.add_port("SPDIF0", MockPort::default());
        let engine = engine_with(hal);

        let modes = engine
            .get_supported_audio_modes(&request(json!({"audioPort": "HDMI0"})))
            .supported_audio_modes;
        // surround is reported through the computed auto label at v5+
        assert!(modes.contains(&"AUTO (Stereo)".to_owned()));
        assert!(modes.contains(&"PassThru".to_owned()));
        assert!(!modes.contains(&"Surround".to_owned()));

        engine
            .state()
            .gate
            .set_version(4, engine.state().get_hal().as_ref());
        let modes = engine
            .get_supported_audio_modes(&request(json!({"audioPort": "HDMI0"})))
            .supported_audio_modes;
        assert!(modes.contains(&"Surround".to_owned()));
        assert!(!modes.contains(&"PassThru".to_owned()));

        engine
            .state()
            .gate
            .set_version(1, engine.state().get_hal().as_ref());
        assert!(!engine
            .get_supported_audio_modes(&request(json!({})))
            .success);
    }

    #[test]
    fn test_zoom_setting_round_trip() {
        let engine = engine_with(MockHal::with_default_ports());
        assert!(
            engine
                .set_zoom_setting(&request(json!({"zoomSetting": "FULL"})))
                .success
        );
        assert_eq!(engine.get_zoom_setting().zoom_setting, "FULL");
        assert!(!engine.set_zoom_setting(&request(json!({}))).success);
        assert!(
            !engine
                .set_zoom_setting(&request(json!({"zoomSetting": "LETTERBOX"})))
                .success
        );
    }

    #[test]
    fn test_standby_status_round_trip() {
        let engine = engine_with(MockHal::with_default_ports());
        let resp = engine.set_video_port_status_in_standby(&request(
            json!({"portName": "HDMI0", "enabled": true}),
        ));
        assert!(resp.success);
        let resp =
            engine.get_video_port_status_in_standby(&request(json!({"portName": "HDMI0"})));
        assert!(resp.success);
        assert!(resp.video_port_status_in_standby);
        // missing portName is a parameter failure, not a HAL call
        let resp = engine.get_video_port_status_in_standby(&request(json!({})));
        assert!(!resp.success);
        assert!(resp.error_message.is_some());
    }

    #[test]
    fn test_api_version_negotiation() {
        let engine = engine_with(MockHal::with_default_ports());
        assert_eq!(engine.get_api_version_number().version, u32::MAX);
        assert!(
            engine
                .set_api_version_number(&request(json!({"version": 6})))
                .success
        );
        assert_eq!(engine.get_api_version_number().version, 6);
        assert!(!engine.set_api_version_number(&request(json!({}))).success);
    }

    #[test]
    fn test_getters_default_on_hal_failure() {
        let hal = MockHal::with_default_ports();
        hal.fail("video_port_names");
        hal.fail("current_resolution");
        hal.fail("zoom_setting");
        let engine = engine_with(hal);
        let resp = engine.get_connected_video_displays();
        assert!(resp.success);
        assert!(resp.connected_video_displays.is_empty());
        let resp = engine.get_current_resolution(&request(json!({})));
        assert!(resp.success);
        assert_eq!(resp.resolution, "");
        let resp = engine.get_zoom_setting();
        assert!(resp.success);
        assert_eq!(resp.zoom_setting, "");
    }
}
