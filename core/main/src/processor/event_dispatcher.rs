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

use std::sync::{Arc, Weak};

use avsettings_sdk::{
    api::{
        device::{
            device_events::DsEvent,
            device_request::{HotPlugStatus, RxSenseStatus, ZoomMode},
        },
        settings::settings_events::{
            ActiveInputChangedEvent, ConnectedVideoDisplaysUpdatedEvent, ResolutionChangedEvent,
            SettingsEvent, ZoomSettingUpdatedEvent,
        },
    },
    log::{debug, error},
};

use crate::service::{
    display_enumerator::DisplayEnumerator, port_resolver::PRIMARY_VIDEO_PORT,
    settings_engine::SettingsEngine, version_gate::ApiFeature,
};

/// Registration handle given to the event bus. Holds the engine weakly so a
/// callback delivered before initialization completes or after teardown
/// begins drops the event instead of faulting.
#[derive(Clone)]
pub struct EventHandlerHandle {
    engine: Weak<SettingsEngine>,
}

impl EventHandlerHandle {
    pub fn new(engine: &Arc<SettingsEngine>) -> EventHandlerHandle {
        EventHandlerHandle {
            engine: Arc::downgrade(engine),
        }
    }

    pub fn handle(&self, event: DsEvent) {
        match self.engine.upgrade() {
            Some(engine) => EventDispatcher::dispatch(&engine, event),
            None => debug!("engine gone, dropping bus event {:?}", event),
        }
    }
}

/// Maps raw bus events onto client notifications. Stateless apart from the
/// engine-owned hotplug debounce; runs for the process lifetime.
pub struct EventDispatcher;

impl EventDispatcher {
    pub fn dispatch(engine: &SettingsEngine, event: DsEvent) {
        match event {
            DsEvent::ResolutionPreChange => Self::on_resolution_pre_change(engine),
            DsEvent::ResolutionPostChange { width, height } => {
                Self::on_resolution_post_change(engine, width, height)
            }
            DsEvent::ZoomSettings(zoom) => Self::on_zoom_settings(engine, zoom),
            DsEvent::RxSense(status) => Self::on_rx_sense(engine, status),
            DsEvent::HdmiHotPlug(status) => Self::on_hdmi_hotplug(engine, status),
        }
    }

    fn on_resolution_pre_change(engine: &SettingsEngine) {
        engine.state().notify(SettingsEvent::ResolutionPreChange);
    }

    /// Recomputes the connected-display set and notifies with the first
    /// display reporting a non-empty resolution; the HDMI-collapse rule in
    /// the enumerator keeps HDMI authoritative.
    fn on_resolution_post_change(engine: &SettingsEngine, width: i32, height: i32) {
        let hal = engine.state().get_hal();
        let displays = match DisplayEnumerator::connected_video_displays(hal.as_ref()) {
            Ok(displays) => displays,
            Err(e) => {
                error!("resolution change enumeration failed: {}", e);
                return;
            }
        };
        for display in displays {
            let resolution = match hal.current_resolution(&display) {
                Ok(resolution) => resolution,
                Err(e) => {
                    error!("resolution read on {} failed: {}", display, e);
                    continue;
                }
            };
            if resolution.is_empty() {
                continue;
            }
            engine
                .state()
                .notify(SettingsEvent::ResolutionChanged(ResolutionChangedEvent {
                    width,
                    height,
                    video_display_type: display,
                    resolution,
                }));
            break;
        }
    }

    fn on_zoom_settings(engine: &SettingsEngine, zoom: ZoomMode) {
        engine
            .state()
            .notify(SettingsEvent::ZoomSettingUpdated(ZoomSettingUpdatedEvent {
                zoom_setting: zoom.to_string(),
                video_display_type: "all".to_owned(),
            }));
    }

    fn on_rx_sense(engine: &SettingsEngine, status: RxSenseStatus) {
        if !engine.state().gate.supports(ApiFeature::ActiveInput) {
            debug!("rx-sense swallowed below version 5");
            return;
        }
        engine
            .state()
            .notify(SettingsEvent::ActiveInputChanged(ActiveInputChangedEvent {
                active_input: status == RxSenseStatus::On,
            }));
    }

    fn on_hdmi_hotplug(engine: &SettingsEngine, status: HotPlugStatus) {
        let notify = engine.state().hotplug.lock().unwrap().observe(status);
        if !notify {
            debug!("duplicate hotplug status {:?}, suppressed", status);
            return;
        }
        let displays = if status == HotPlugStatus::Connected {
            vec![PRIMARY_VIDEO_PORT.to_owned()]
        } else {
            Vec::new()
        };
        engine.state().notify(SettingsEvent::ConnectedVideoDisplaysUpdated(
            ConnectedVideoDisplaysUpdatedEvent {
                connected_video_displays: displays,
            },
        ));
    }
}
