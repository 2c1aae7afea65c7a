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

//! Scriptable in-memory device-settings HAL. Stands in for the platform HAL
//! in tests and local development; every mutation is journaled so tests can
//! assert exactly what reached the hardware, and any trait method can be
//! scripted to fail with a HAL error.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use avsettings_sdk::{
    api::device::{
        device_events::DsEvent,
        device_hal::{DeviceHal, HalError, HalResult},
        device_request::{HotPlugStatus, StereoMode, ZoomMode},
    },
    log::debug,
    tokio::sync::mpsc::UnboundedSender,
};

/// One named port carrying both its video and audio endpoint attributes.
#[derive(Debug, Clone)]
pub struct MockPort {
    pub connected: bool,
    pub active: bool,
    pub resolution: String,
    pub supported_resolutions: Vec<String>,
    pub stereo_mode: StereoMode,
    pub stereo_auto: bool,
    pub supported_stereo_modes: Vec<StereoMode>,
    pub surround_caps: u32,
    pub tv_resolution_caps: u32,
    pub edid: Vec<u8>,
    pub standby_status: bool,
}

impl Default for MockPort {
    fn default() -> MockPort {
        MockPort {
            connected: false,
            active: false,
            resolution: "720p".to_owned(),
            supported_resolutions: vec!["720p".to_owned(), "1080p".to_owned()],
            stereo_mode: StereoMode::Stereo,
            stereo_auto: false,
            supported_stereo_modes: vec![
                StereoMode::Mono,
                StereoMode::Stereo,
                StereoMode::Surround,
            ],
            surround_caps: 0,
            tv_resolution_caps: 0,
            edid: Vec::new(),
            standby_status: false,
        }
    }
}

impl MockPort {
    pub fn connected() -> MockPort {
        MockPort {
            connected: true,
            ..MockPort::default()
        }
    }

    pub fn with_surround_caps(mut self, caps: u32) -> MockPort {
        self.surround_caps = caps;
        self
    }

    pub fn with_stereo_mode(mut self, mode: StereoMode, auto: bool) -> MockPort {
        self.stereo_mode = mode;
        self.stereo_auto = auto;
        self
    }

    pub fn with_resolution(mut self, resolution: &str) -> MockPort {
        self.resolution = resolution.to_owned();
        self
    }

    pub fn with_edid(mut self, edid: Vec<u8>) -> MockPort {
        self.edid = edid;
        self
    }
}

#[derive(Default)]
struct MockHalState {
    video_ports: Vec<String>,
    audio_ports: Vec<String>,
    ports: HashMap<String, MockPort>,
    zoom: Option<ZoomMode>,
    host_edid: Vec<u8>,
    tv_hdr_caps: u32,
    settop_hdr_caps: u32,
    settop_resolutions: Vec<String>,
    failures: HashMap<String, HalError>,
    journal: Vec<String>,
    event_tx: Option<UnboundedSender<DsEvent>>,
}

#[derive(Clone, Default)]
pub struct MockHal {
    inner: Arc<Mutex<MockHalState>>,
}

impl MockHal {
    pub fn new() -> MockHal {
        MockHal::default()
    }

    /// The usual settop port table: HDMI0 plus the analog SPDIF0 output.
    pub fn with_default_ports() -> MockHal {
        let hal = MockHal::new();
        hal.add_port("HDMI0", MockPort::default());
        hal.add_port("SPDIF0", MockPort::default());
        hal
    }

    /// Registers a port under both the video and audio enumerations, in
    /// insertion order.
    pub fn add_port(&self, name: &str, port: MockPort) {
        let mut state = self.inner.lock().unwrap();
        state.video_ports.push(name.to_owned());
        state.audio_ports.push(name.to_owned());
        state.ports.insert(name.to_owned(), port);
    }

    pub fn set_connected(&self, name: &str, connected: bool) {
        let mut state = self.inner.lock().unwrap();
        if let Some(port) = state.ports.get_mut(name) {
            port.connected = connected;
        }
    }

    pub fn set_active(&self, name: &str, active: bool) {
        let mut state = self.inner.lock().unwrap();
        if let Some(port) = state.ports.get_mut(name) {
            port.active = active;
        }
    }

    pub fn set_host_edid(&self, edid: Vec<u8>) {
        self.inner.lock().unwrap().host_edid = edid;
    }

    pub fn set_tv_hdr_caps(&self, caps: u32) {
        self.inner.lock().unwrap().tv_hdr_caps = caps;
    }

    pub fn set_settop_hdr_caps(&self, caps: u32) {
        self.inner.lock().unwrap().settop_hdr_caps = caps;
    }

    pub fn set_settop_resolutions(&self, resolutions: Vec<String>) {
        self.inner.lock().unwrap().settop_resolutions = resolutions;
    }

    /// Scripts `method` (trait method name) to fail with a default HAL error.
    pub fn fail(&self, method: &str) {
        self.fail_with(method, HalError::new(1, "mock failure"));
    }

    pub fn fail_with(&self, method: &str, error: HalError) {
        self.inner
            .lock()
            .unwrap()
            .failures
            .insert(method.to_owned(), error);
    }

    pub fn clear_failure(&self, method: &str) {
        self.inner.lock().unwrap().failures.remove(method);
    }

    /// Mutations applied through the trait, in order.
    pub fn journal(&self) -> Vec<String> {
        self.inner.lock().unwrap().journal.clone()
    }

    pub fn stereo_state(&self, name: &str) -> Option<(StereoMode, bool)> {
        let state = self.inner.lock().unwrap();
        state.ports.get(name).map(|p| (p.stereo_mode, p.stereo_auto))
    }

    /// Wires the hardware event bus sink; setters echo their changes through
    /// it the way real hardware does.
    pub fn set_event_sink(&self, tx: UnboundedSender<DsEvent>) {
        self.inner.lock().unwrap().event_tx = Some(tx);
    }

    /// Simulates an HDMI cable plug/unplug, including the bus notification.
    pub fn plug_hdmi(&self, connected: bool) {
        self.set_connected("HDMI0", connected);
        let status = if connected {
            HotPlugStatus::Connected
        } else {
            HotPlugStatus::Disconnected
        };
        self.emit(DsEvent::HdmiHotPlug(status));
    }

    fn emit(&self, event: DsEvent) {
        let state = self.inner.lock().unwrap();
        if let Some(tx) = &state.event_tx {
            if tx.send(event).is_err() {
                debug!("event sink closed, dropping mock bus event");
            }
        }
    }

    fn check_failure(&self, method: &str) -> HalResult<()> {
        let state = self.inner.lock().unwrap();
        match state.failures.get(method) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    fn with_port<T>(&self, name: &str, f: impl FnOnce(&MockPort) -> T) -> HalResult<T> {
        let state = self.inner.lock().unwrap();
        match state.ports.get(name) {
            Some(port) => Ok(f(port)),
            None => Err(HalError::new(2, format!("no such port {}", name))),
        }
    }

    fn with_port_mut<T>(
        &self,
        name: &str,
        journal: String,
        f: impl FnOnce(&mut MockPort) -> T,
    ) -> HalResult<T> {
        let mut state = self.inner.lock().unwrap();
        match state.ports.get_mut(name) {
            Some(port) => {
                let out = f(port);
                state.journal.push(journal);
                Ok(out)
            }
            None => Err(HalError::new(2, format!("no such port {}", name))),
        }
    }
}

fn dimensions_for(resolution: &str) -> (i32, i32) {
    match resolution {
        val if val.starts_with("480") => (720, 480),
        val if val.starts_with("576") => (720, 576),
        val if val.starts_with("720") => (1280, 720),
        val if val.starts_with("1080") => (1920, 1080),
        val if val.starts_with("2160") => (3840, 2160),
        _ => (1280, 720),
    }
}

impl DeviceHal for MockHal {
    fn video_port_names(&self) -> HalResult<Vec<String>> {
        self.check_failure("video_port_names")?;
        Ok(self.inner.lock().unwrap().video_ports.clone())
    }

    fn audio_port_names(&self) -> HalResult<Vec<String>> {
        self.check_failure("audio_port_names")?;
        Ok(self.inner.lock().unwrap().audio_ports.clone())
    }

    fn is_display_connected(&self, video_port: &str) -> HalResult<bool> {
        self.check_failure("is_display_connected")?;
        self.with_port(video_port, |p| p.connected)
    }

    fn is_display_active(&self, video_port: &str) -> HalResult<bool> {
        self.check_failure("is_display_active")?;
        self.with_port(video_port, |p| p.active)
    }

    fn current_resolution(&self, video_port: &str) -> HalResult<String> {
        self.check_failure("current_resolution")?;
        self.with_port(video_port, |p| p.resolution.clone())
    }

    fn set_resolution(&self, video_port: &str, resolution: &str) -> HalResult<()> {
        self.check_failure("set_resolution")?;
        let res = resolution.to_owned();
        self.with_port_mut(
            video_port,
            format!("set_resolution {} {}", video_port, resolution),
            |p| p.resolution = res,
        )?;
        let (width, height) = dimensions_for(resolution);
        self.emit(DsEvent::ResolutionPreChange);
        self.emit(DsEvent::ResolutionPostChange { width, height });
        Ok(())
    }

    fn supported_resolutions(&self, video_port: &str) -> HalResult<Vec<String>> {
        self.check_failure("supported_resolutions")?;
        self.with_port(video_port, |p| p.supported_resolutions.clone())
    }

    fn supported_tv_resolutions(&self, video_port: &str) -> HalResult<u32> {
        self.check_failure("supported_tv_resolutions")?;
        self.with_port(video_port, |p| p.tv_resolution_caps)
    }

    fn supported_settop_resolutions(&self) -> HalResult<Vec<String>> {
        self.check_failure("supported_settop_resolutions")?;
        Ok(self.inner.lock().unwrap().settop_resolutions.clone())
    }

    fn zoom_setting(&self) -> HalResult<ZoomMode> {
        self.check_failure("zoom_setting")?;
        self.inner
            .lock()
            .unwrap()
            .zoom
            .ok_or_else(|| HalError::new(3, "zoom not initialized"))
    }

    fn set_zoom_setting(&self, zoom: ZoomMode) -> HalResult<()> {
        self.check_failure("set_zoom_setting")?;
        {
            let mut state = self.inner.lock().unwrap();
            state.zoom = Some(zoom);
            state.journal.push(format!("set_zoom_setting {}", zoom));
        }
        self.emit(DsEvent::ZoomSettings(zoom));
        Ok(())
    }

    fn is_audio_port_connected(&self, audio_port: &str) -> HalResult<bool> {
        self.check_failure("is_audio_port_connected")?;
        self.with_port(audio_port, |p| p.connected)
    }

    fn stereo_mode(&self, audio_port: &str) -> HalResult<StereoMode> {
        self.check_failure("stereo_mode")?;
        self.with_port(audio_port, |p| p.stereo_mode)
    }

    fn set_stereo_mode(&self, audio_port: &str, mode: StereoMode) -> HalResult<()> {
        self.check_failure("set_stereo_mode")?;
        self.with_port_mut(
            audio_port,
            format!("set_stereo_mode {} {}", audio_port, mode),
            |p| p.stereo_mode = mode,
        )
    }

    fn stereo_auto(&self, audio_port: &str) -> HalResult<bool> {
        self.check_failure("stereo_auto")?;
        self.with_port(audio_port, |p| p.stereo_auto)
    }

    fn set_stereo_auto(&self, audio_port: &str, auto: bool) -> HalResult<()> {
        self.check_failure("set_stereo_auto")?;
        self.with_port_mut(
            audio_port,
            format!("set_stereo_auto {} {}", audio_port, auto),
            |p| p.stereo_auto = auto,
        )
    }

    fn supported_stereo_modes(&self, audio_port: &str) -> HalResult<Vec<StereoMode>> {
        self.check_failure("supported_stereo_modes")?;
        self.with_port(audio_port, |p| p.supported_stereo_modes.clone())
    }

    fn surround_capabilities(&self, video_port: &str) -> HalResult<u32> {
        self.check_failure("surround_capabilities")?;
        self.with_port(video_port, |p| p.surround_caps)
    }

    fn edid_bytes(&self, video_port: &str) -> HalResult<Vec<u8>> {
        self.check_failure("edid_bytes")?;
        self.with_port(video_port, |p| p.edid.clone())
    }

    fn host_edid(&self) -> HalResult<Vec<u8>> {
        self.check_failure("host_edid")?;
        Ok(self.inner.lock().unwrap().host_edid.clone())
    }

    fn tv_hdr_capabilities(&self) -> HalResult<u32> {
        self.check_failure("tv_hdr_capabilities")?;
        Ok(self.inner.lock().unwrap().tv_hdr_caps)
    }

    fn settop_hdr_capabilities(&self) -> HalResult<u32> {
        self.check_failure("settop_hdr_capabilities")?;
        Ok(self.inner.lock().unwrap().settop_hdr_caps)
    }

    fn video_port_status_in_standby(&self, video_port: &str) -> HalResult<bool> {
        self.check_failure("video_port_status_in_standby")?;
        self.with_port(video_port, |p| p.standby_status)
    }

    fn set_video_port_status_in_standby(&self, video_port: &str, enabled: bool) -> HalResult<()> {
        self.check_failure("set_video_port_status_in_standby")?;
        self.with_port_mut(
            video_port,
            format!("set_video_port_status_in_standby {} {}", video_port, enabled),
            |p| p.standby_status = enabled,
        )
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_journal_records_mutations_in_order() {
        let hal = MockHal::with_default_ports();
        hal.set_stereo_mode("HDMI0", StereoMode::Surround).unwrap();
        hal.set_stereo_auto("HDMI0", true).unwrap();
        assert_eq!(
            hal.journal(),
            vec![
                "set_stereo_mode HDMI0 Surround".to_owned(),
                "set_stereo_auto HDMI0 true".to_owned()
            ]
        );
    }

    #[test]
    fn test_failure_injection() {
        let hal = MockHal::with_default_ports();
        hal.fail_with("stereo_mode", HalError::new(87, "driver fault"));
        let err = hal.stereo_mode("HDMI0").unwrap_err();
        assert_eq!(err.code, 87);
        hal.clear_failure("stereo_mode");
        assert!(hal.stereo_mode("HDMI0").is_ok());
    }

    #[test]
    fn test_unknown_port_is_a_hal_error() {
        let hal = MockHal::new();
        assert!(hal.is_display_connected("HDMI9").is_err());
    }
}
