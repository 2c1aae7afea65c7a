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

use avsettings_sdk::{
    api::device::{
        device_hal::DeviceHal,
        device_request::{surround_flags, StereoMode},
    },
    log::{error, warn},
    utils::error::ServiceError,
};

use super::{
    port_resolver::{
        audio_port_for, is_hdmi, PortNameNormalizer, PortQuery, LEGACY_COMPONENT_NAME,
        PRIMARY_VIDEO_PORT, SPDIF_AUDIO_PORT,
    },
    version_gate::ApiFeature,
};

pub const AUTO_STEREO_LABEL: &str = "AUTO (Stereo)";
pub const AUTO_DOLBY_DIGITAL_LABEL: &str = "AUTO (Dolby Digital 5.1)";
pub const AUTO_DOLBY_DIGITAL_PLUS_LABEL: &str = "AUTO (Dolby Digital Plus)";

pub struct SoundModeResolver;

impl SoundModeResolver {
    /// Current sound mode label for a display query. Never fails: any HAL
    /// error falls back to the disconnected default for the active version.
    pub fn resolve(hal: &dyn DeviceHal, query: PortQuery, version: u32) -> String {
        match Self::try_resolve(hal, query, version) {
            Ok(label) => label,
            Err(e) => {
                error!("sound mode resolution failed: {}", e);
                Self::disconnected_default(version)
            }
        }
    }

    /// Label reported while no display is attached. Newer clients expect the
    /// auto wrapper; legacy clients only know the plain literal.
    fn disconnected_default(version: u32) -> String {
        if version >= ApiFeature::AutoSoundMode.min_version() {
            AUTO_STEREO_LABEL.to_owned()
        } else {
            StereoMode::Stereo.to_string()
        }
    }

    fn try_resolve(
        hal: &dyn DeviceHal,
        query: PortQuery,
        version: u32,
    ) -> Result<String, ServiceError> {
        let video_port = match query {
            PortQuery::Port(p) => p,
            PortQuery::Browse => Self::browse_port(hal)?,
        };
        let audio_port = audio_port_for(&video_port);
        if !hal.is_audio_port_connected(&audio_port)? {
            return Ok(Self::disconnected_default(version));
        }
        let mode = hal.stereo_mode(&audio_port)?;
        if is_hdmi(&video_port) && version >= ApiFeature::AutoSoundMode.min_version() {
            let auto = hal.stereo_auto(&audio_port)?;
            if auto || mode == StereoMode::Surround {
                return Self::surround_auto_label(hal, &video_port);
            }
        }
        Ok(mode.to_string())
    }

    /// Port selection for the empty display query: the primary HDMI output
    /// when its display is attached, otherwise the analog output as soon as
    /// any video port reports a connection.
    fn browse_port(hal: &dyn DeviceHal) -> Result<String, ServiceError> {
        if hal.is_display_connected(PRIMARY_VIDEO_PORT)? {
            return Ok(PRIMARY_VIDEO_PORT.to_owned());
        }
        for name in hal.video_port_names()? {
            if hal.is_display_connected(&name)? {
                return Ok(SPDIF_AUDIO_PORT.to_owned());
            }
        }
        Ok(PRIMARY_VIDEO_PORT.to_owned())
    }

    /// Auto sub-label a port would advertise, for listing supported modes.
    pub fn auto_label(hal: &dyn DeviceHal, video_port: &str) -> String {
        Self::surround_auto_label(hal, video_port).unwrap_or_else(|e| {
            error!("surround capability read on {}: {}", video_port, e);
            AUTO_STEREO_LABEL.to_owned()
        })
    }

    /// Auto sub-label from the attached display's surround capability bits.
    fn surround_auto_label(hal: &dyn DeviceHal, video_port: &str) -> Result<String, ServiceError> {
        let caps = hal.surround_capabilities(video_port)?;
        let label = if 0 != (caps & surround_flags::SURROUNDMODE_DDPLUS) {
            AUTO_DOLBY_DIGITAL_PLUS_LABEL
        } else if 0 != (caps & surround_flags::SURROUNDMODE_DD) {
            AUTO_DOLBY_DIGITAL_LABEL
        } else {
            AUTO_STEREO_LABEL
        };
        Ok(label.to_owned())
    }

    /// Maps a client-supplied mode string onto the stereo-mode enum plus the
    /// auto flag. Unrecognized literals leave the Stereo default in place and
    /// proceed (historical behavior, see DESIGN.md).
    fn parse_mode(requested: &str, version: u32) -> (StereoMode, bool) {
        let normalized = requested.trim().to_lowercase();
        let auto_capable = version >= ApiFeature::AutoSoundMode.min_version();
        match normalized.as_str() {
            "mono" => (StereoMode::Mono, false),
            "stereo" => (StereoMode::Stereo, false),
            "surround" => (StereoMode::Surround, false),
            "passthru" => (StereoMode::PassThru, false),
            "dolby digital 5.1" if auto_capable => (StereoMode::Surround, false),
            other if auto_capable && (other == "auto" || other.starts_with("auto ")) => {
                (StereoMode::Surround, true)
            }
            _ => (StereoMode::Stereo, false),
        }
    }

    /// Applies a requested mode. `display` is the canonical video port; None
    /// targets the primary output for auto requests and every output
    /// otherwise.
    pub fn apply(
        hal: &dyn DeviceHal,
        display: Option<&str>,
        requested: &str,
        version: u32,
    ) -> Result<(), ServiceError> {
        let (mut mode, auto) = Self::parse_mode(requested, version);
        let target = match display {
            Some(p) => p.to_owned(),
            None if auto => PRIMARY_VIDEO_PORT.to_owned(),
            None => return Self::apply_everywhere(hal, requested, version),
        };
        let audio_port = audio_port_for(&target);
        if !hal.is_audio_port_connected(&audio_port)? {
            return Err(ServiceError::PortNotConnected);
        }
        let hdmi = is_hdmi(&target);
        if hdmi
            && version >= ApiFeature::AutoSoundMode.min_version()
            && mode != StereoMode::PassThru
        {
            hal.set_stereo_auto(&audio_port, auto)?;
            if auto {
                // auto picks the concrete mode from what the display can do
                let caps = hal.surround_capabilities(&target)?;
                mode = if caps != surround_flags::SURROUNDMODE_NONE {
                    StereoMode::Surround
                } else {
                    StereoMode::Stereo
                };
            }
        } else if hdmi {
            hal.set_stereo_auto(&audio_port, false)?;
        }
        hal.set_stereo_mode(&audio_port, mode)?;
        Ok(())
    }

    /// With no display named, the primary output decides the overall outcome
    /// and the version-appropriate secondary output is best-effort.
    fn apply_everywhere(
        hal: &dyn DeviceHal,
        requested: &str,
        version: u32,
    ) -> Result<(), ServiceError> {
        let primary = Self::apply(hal, Some(PRIMARY_VIDEO_PORT), requested, version);
        let secondary_raw = if version >= ApiFeature::SpdifPortName.min_version() {
            SPDIF_AUDIO_PORT
        } else {
            LEGACY_COMPONENT_NAME
        };
        if let Some(PortQuery::Port(secondary)) = PortNameNormalizer::normalize(secondary_raw, version)
        {
            if let Err(e) = Self::apply(hal, Some(&secondary), requested, version) {
                warn!("secondary sound mode apply on {} failed: {}", secondary, e);
            }
        }
        primary
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use mock_hal::{MockHal, MockPort};
    use rstest::rstest;

    fn hdmi_connected_hal(caps: u32) -> MockHal {
        let hal = MockHal::new();
        hal.add_port("HDMI0", MockPort::connected().with_surround_caps(caps));
        hal.add_port("SPDIF0", MockPort::default());
        hal
    }

    #[test]
    fn test_disconnected_defaults_depend_on_version() {
        let hal = MockHal::with_default_ports();
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 4);
        assert_eq!(label, "Stereo");
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 5);
        assert_eq!(label, "AUTO (Stereo)");
    }

    #[rstest]
    #[case(surround_flags::SURROUNDMODE_DDPLUS, "AUTO (Dolby Digital Plus)")]
    #[case(
        surround_flags::SURROUNDMODE_DD | surround_flags::SURROUNDMODE_DDPLUS,
        "AUTO (Dolby Digital Plus)"
    )]
    #[case(surround_flags::SURROUNDMODE_DD, "AUTO (Dolby Digital 5.1)")]
    #[case(surround_flags::SURROUNDMODE_NONE, "AUTO (Stereo)")]
    fn test_auto_label_follows_surround_caps(#[case] caps: u32, #[case] expected: &str) {
        let hal = hdmi_connected_hal(caps);
        hal.set_stereo_auto("HDMI0", true).unwrap();
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 7);
        assert_eq!(label, expected);
    }

    #[test]
    fn test_stored_surround_also_reports_auto_label_on_v5_hdmi() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_DD);
        hal.set_stereo_mode("HDMI0", StereoMode::Surround).unwrap();
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 5);
        assert_eq!(label, "AUTO (Dolby Digital 5.1)");
        // pre-v5 clients get the plain literal
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 4);
        assert_eq!(label, "Surround");
    }

    #[test]
    fn test_non_hdmi_surround_stays_literal() {
        let hal = MockHal::new();
        hal.add_port("HDMI0", MockPort::default());
        hal.add_port(
            "SPDIF0",
            MockPort::connected().with_stereo_mode(StereoMode::Surround, false),
        );
        let label = SoundModeResolver::resolve(&hal, PortQuery::Port("SPDIF0".into()), 7);
        assert_eq!(label, "Surround");
    }

    #[test]
    fn test_browse_prefers_hdmi_then_analog() {
        let hal = MockHal::new();
        hal.add_port("COMPONENT", MockPort::connected());
        hal.add_port("HDMI0", MockPort::default());
        hal.add_port(
            "SPDIF0",
            MockPort::connected().with_stereo_mode(StereoMode::Mono, false),
        );
        // HDMI0 disconnected, COMPONENT connected -> analog output wins
        let label = SoundModeResolver::resolve(&hal, PortQuery::Browse, 7);
        assert_eq!(label, "Mono");
        hal.set_connected("HDMI0", true);
        hal.set_stereo_mode("HDMI0", StereoMode::Stereo).unwrap();
        let label = SoundModeResolver::resolve(&hal, PortQuery::Browse, 7);
        assert_eq!(label, "Stereo");
    }

    #[test]
    fn test_hal_failure_yields_disconnected_default() {
        let hal = hdmi_connected_hal(0);
        hal.fail("stereo_mode");
        assert_eq!(
            SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 7),
            "AUTO (Stereo)"
        );
        assert_eq!(
            SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 3),
            "Stereo"
        );
    }

    #[test]
    fn test_apply_mono_round_trip() {
        let hal = hdmi_connected_hal(0);
        SoundModeResolver::apply(&hal, Some("HDMI0"), "mono", 7).unwrap();
        assert_eq!(hal.stereo_state("HDMI0"), Some((StereoMode::Mono, false)));
        assert_eq!(
            SoundModeResolver::resolve(&hal, PortQuery::Port("HDMI0".into()), 7),
            "Mono"
        );
    }

    #[test]
    fn test_apply_auto_defaults_to_primary_port() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_DD);
        SoundModeResolver::apply(&hal, None, "auto", 7).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::Surround, true))
        );
    }

    #[test]
    fn test_apply_auto_without_surround_capable_display_picks_stereo() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_NONE);
        SoundModeResolver::apply(&hal, Some("HDMI0"), "auto ", 7).unwrap();
        assert_eq!(hal.stereo_state("HDMI0"), Some((StereoMode::Stereo, true)));
    }

    #[test]
    fn test_apply_passthru_disables_auto_first() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_DD);
        hal.set_stereo_auto("HDMI0", true).unwrap();
        SoundModeResolver::apply(&hal, Some("HDMI0"), "passthru", 7).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::PassThru, false))
        );
    }

    #[test]
    fn test_apply_below_v5_disables_auto_on_hdmi() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_DD);
        hal.set_stereo_auto("HDMI0", true).unwrap();
        SoundModeResolver::apply(&hal, Some("HDMI0"), "surround", 4).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::Surround, false))
        );
    }

    #[test]
    fn test_dolby_digital_alias_is_v5_only() {
        let hal = hdmi_connected_hal(surround_flags::SURROUNDMODE_DD);
        SoundModeResolver::apply(&hal, Some("HDMI0"), "dolby digital 5.1", 7).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::Surround, false))
        );
        // below v5 the alias is unknown and falls back to the Stereo default
        SoundModeResolver::apply(&hal, Some("HDMI0"), "dolby digital 5.1", 4).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::Stereo, false))
        );
    }

    #[test]
    fn test_unrecognized_literal_keeps_stereo_default() {
        let hal = hdmi_connected_hal(0);
        SoundModeResolver::apply(&hal, Some("HDMI0"), "quadraphonic", 7).unwrap();
        assert_eq!(hal.stereo_state("HDMI0"), Some((StereoMode::Stereo, false)));
    }

    #[test]
    fn test_apply_to_disconnected_port_fails_without_mutation() {
        let hal = MockHal::with_default_ports();
        let err = SoundModeResolver::apply(&hal, Some("HDMI0"), "mono", 7).unwrap_err();
        assert_eq!(err, ServiceError::PortNotConnected);
        assert!(hal.journal().is_empty());
    }

    #[test]
    fn test_apply_everywhere_hits_primary_and_secondary() {
        let hal = MockHal::new();
        hal.add_port("HDMI0", MockPort::connected());
        hal.add_port("SPDIF0", MockPort::connected());
        SoundModeResolver::apply(&hal, None, "stereo", 7).unwrap();
        let journal = hal.journal();
        assert!(journal.contains(&"set_stereo_mode HDMI0 Stereo".to_owned()));
        assert!(journal.contains(&"set_stereo_mode SPDIF0 Stereo".to_owned()));
    }

    #[test]
    fn test_apply_everywhere_secondary_failure_is_best_effort() {
        let hal = MockHal::new();
        hal.add_port("HDMI0", MockPort::connected());
        hal.add_port("SPDIF0", MockPort::default());
        // SPDIF0 disconnected: primary outcome still decides the result
        SoundModeResolver::apply(&hal, None, "surround", 4).unwrap();
        assert_eq!(
            hal.stereo_state("HDMI0"),
            Some((StereoMode::Surround, false))
        );
    }
}
