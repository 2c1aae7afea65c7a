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

use std::sync::{Arc, Mutex};

use avsettings_sdk::{
    api::{
        device::{device_hal::DeviceHal, device_request::HotPlugStatus},
        manifest::service_manifest::ServiceManifest,
        settings::settings_events::SettingsEvent,
    },
    log::trace,
    tokio::sync::broadcast,
};

use crate::service::version_gate::ApiVersionGate;

/// Last-observed HDMI hotplug status. The bus redelivers hotplug events; a
/// notification goes out only for the first observation ever or a status
/// change. Concurrent deliveries are serialized by the owning mutex.
#[derive(Debug, Default)]
pub struct HotplugDebounceState {
    last_status: Option<HotPlugStatus>,
}

impl HotplugDebounceState {
    /// Records an observation and reports whether it must be notified.
    pub fn observe(&mut self, status: HotPlugStatus) -> bool {
        let notify = self.last_status != Some(status);
        self.last_status = Some(status);
        notify
    }
}

#[derive(Clone)]
pub struct SettingsState {
    hal: Arc<dyn DeviceHal>,
    pub gate: ApiVersionGate,
    pub hotplug: Arc<Mutex<HotplugDebounceState>>,
    notifier: broadcast::Sender<SettingsEvent>,
}

impl SettingsState {
    pub fn new(hal: Arc<dyn DeviceHal>, manifest: &ServiceManifest) -> SettingsState {
        let (tx, _) = broadcast::channel(32);
        SettingsState {
            hal,
            gate: ApiVersionGate::new(manifest.default_api_version),
            hotplug: Arc::new(Mutex::new(HotplugDebounceState::default())),
            notifier: tx,
        }
    }

    pub fn get_hal(&self) -> Arc<dyn DeviceHal> {
        self.hal.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SettingsEvent> {
        self.notifier.subscribe()
    }

    /// Hands a notification to the host fan-out. A send error only means no
    /// client is subscribed right now.
    pub fn notify(&self, event: SettingsEvent) {
        if self.notifier.send(event).is_err() {
            trace!("no notification subscribers");
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_hotplug_debounce_rule() {
        let mut state = HotplugDebounceState::default();
        // first observation of any status always notifies
        assert!(state.observe(HotPlugStatus::Disconnected));
        assert!(!state.observe(HotPlugStatus::Disconnected));
        assert!(state.observe(HotPlugStatus::Connected));
        assert!(!state.observe(HotPlugStatus::Connected));
        assert!(state.observe(HotPlugStatus::Disconnected));
    }
}
