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

use avsettings_sdk::{api::device::device_hal::DeviceHal, utils::error::ServiceError};

use super::port_resolver::is_hdmi;

pub struct DisplayEnumerator;

impl DisplayEnumerator {
    /// Connected displays in hardware-reported order. A connected HDMI port
    /// fully supersedes anything collected before it and ends the iteration.
    pub fn connected_video_displays(hal: &dyn DeviceHal) -> Result<Vec<String>, ServiceError> {
        let mut displays: Vec<String> = Vec::new();
        for name in hal.video_port_names()? {
            if !hal.is_display_connected(&name)? {
                continue;
            }
            if is_hdmi(&name) {
                return Ok(vec![name]);
            }
            if !displays.contains(&name) {
                displays.push(name);
            }
        }
        Ok(displays)
    }

    pub fn connected_audio_ports(hal: &dyn DeviceHal) -> Result<Vec<String>, ServiceError> {
        let mut ports: Vec<String> = Vec::new();
        for name in hal.audio_port_names()? {
            if hal.is_audio_port_connected(&name)? && !ports.contains(&name) {
                ports.push(name);
            }
        }
        Ok(ports)
    }

    pub fn supported_video_displays(hal: &dyn DeviceHal) -> Result<Vec<String>, ServiceError> {
        let mut displays: Vec<String> = Vec::new();
        for name in hal.video_port_names()? {
            if !displays.contains(&name) {
                displays.push(name);
            }
        }
        Ok(displays)
    }

    pub fn supported_audio_ports(hal: &dyn DeviceHal) -> Result<Vec<String>, ServiceError> {
        let mut ports: Vec<String> = Vec::new();
        for name in hal.audio_port_names()? {
            if !ports.contains(&name) {
                ports.push(name);
            }
        }
        Ok(ports)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use mock_hal::{MockHal, MockPort};

    #[test]
    fn test_connected_hdmi_supersedes_earlier_ports() {
        let hal = MockHal::new();
        hal.add_port("SPDIF0", MockPort::connected());
        hal.add_port("HDMI0", MockPort::connected());
        assert_eq!(
            DisplayEnumerator::connected_video_displays(&hal).unwrap(),
            vec!["HDMI0".to_owned()]
        );
    }

    #[test]
    fn test_non_hdmi_ports_accumulate_in_order() {
        let hal = MockHal::new();
        hal.add_port("SPDIF0", MockPort::connected());
        hal.add_port("COMPONENT", MockPort::connected());
        hal.add_port("HDMI0", MockPort::default());
        assert_eq!(
            DisplayEnumerator::connected_video_displays(&hal).unwrap(),
            vec!["SPDIF0".to_owned(), "COMPONENT".to_owned()]
        );
    }

    #[test]
    fn test_enumeration_is_idempotent() {
        let hal = MockHal::with_default_ports();
        hal.set_connected("SPDIF0", true);
        let first = DisplayEnumerator::connected_video_displays(&hal).unwrap();
        let second = DisplayEnumerator::connected_video_displays(&hal).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_connected_audio_ports_has_no_hdmi_override() {
        let hal = MockHal::new();
        hal.add_port("SPDIF0", MockPort::connected());
        hal.add_port("HDMI0", MockPort::connected());
        assert_eq!(
            DisplayEnumerator::connected_audio_ports(&hal).unwrap(),
            vec!["SPDIF0".to_owned(), "HDMI0".to_owned()]
        );
    }

    #[test]
    fn test_supported_listings_ignore_connectivity() {
        let hal = MockHal::with_default_ports();
        assert_eq!(
            DisplayEnumerator::supported_video_displays(&hal).unwrap(),
            vec!["HDMI0".to_owned(), "SPDIF0".to_owned()]
        );
        assert_eq!(
            DisplayEnumerator::supported_audio_ports(&hal).unwrap(),
            vec!["HDMI0".to_owned(), "SPDIF0".to_owned()]
        );
    }
}
