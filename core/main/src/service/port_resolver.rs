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

use super::version_gate::ApiFeature;

pub const PRIMARY_VIDEO_PORT: &str = "HDMI0";
pub const SPDIF_AUDIO_PORT: &str = "SPDIF0";
/// Pre-v5 wire vocabulary for the analog output.
pub const LEGACY_COMPONENT_NAME: &str = "COMPONENT";

/// A normalized display reference: a single canonical port, or "browse all
/// ports" when the client passed an empty name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortQuery {
    Browse,
    Port(String),
}

pub fn is_hdmi(name: &str) -> bool {
    name.get(..4)
        .map(|prefix| prefix.eq_ignore_ascii_case("hdmi"))
        .unwrap_or(false)
}

/// Audio endpoint backing a canonical video port name. HDMI carries its own
/// audio; everything else plays out of the analog SPDIF output.
pub fn audio_port_for(video_port: &str) -> String {
    if is_hdmi(video_port) {
        video_port.to_owned()
    } else {
        SPDIF_AUDIO_PORT.to_owned()
    }
}

/// Maps client-facing display names onto canonical hardware port names. The
/// analog output was renamed COMPONENT -> SPDIF between API generations, so
/// the accepted vocabulary depends on the negotiated version.
pub struct PortNameNormalizer;

impl PortNameNormalizer {
    /// Returns None for names valid in neither vocabulary. Read-oriented
    /// callers fall back to the primary port; setters must fail outright.
    pub fn normalize(raw: &str, version: u32) -> Option<PortQuery> {
        if raw.is_empty() {
            return Some(PortQuery::Browse);
        }
        let upper = raw.to_uppercase();
        if upper.contains("HDMI") {
            return Some(PortQuery::Port(PRIMARY_VIDEO_PORT.to_owned()));
        }
        let spdif_vocabulary = version >= ApiFeature::SpdifPortName.min_version();
        let matched = if spdif_vocabulary {
            upper.contains("SPDIF")
        } else {
            upper.contains(LEGACY_COMPONENT_NAME)
        };
        if matched {
            return Some(PortQuery::Port(SPDIF_AUDIO_PORT.to_owned()));
        }
        None
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("HDMI0", 4)]
    #[case("HDMI0", 5)]
    #[case("some hdmi input", 4)]
    #[case("Hdmi1", 7)]
    fn test_hdmi_matches_at_any_version(#[case] raw: &str, #[case] version: u32) {
        assert_eq!(
            PortNameNormalizer::normalize(raw, version),
            Some(PortQuery::Port("HDMI0".to_owned()))
        );
    }

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(7)]
    fn test_empty_means_browse_all(#[case] version: u32) {
        assert_eq!(
            PortNameNormalizer::normalize("", version),
            Some(PortQuery::Browse)
        );
    }

    #[test]
    fn test_component_vocabulary_is_pre_v5_only() {
        assert_eq!(
            PortNameNormalizer::normalize("COMPONENT input", 4),
            Some(PortQuery::Port("SPDIF0".to_owned()))
        );
        assert_eq!(PortNameNormalizer::normalize("COMPONENT input", 5), None);
    }

    #[test]
    fn test_spdif_vocabulary_is_v5_up() {
        assert_eq!(
            PortNameNormalizer::normalize("SPDIF0", 5),
            Some(PortQuery::Port("SPDIF0".to_owned()))
        );
        assert_eq!(PortNameNormalizer::normalize("SPDIF0", 4), None);
    }

    #[test]
    fn test_unknown_names_are_invalid() {
        assert_eq!(PortNameNormalizer::normalize("SCART", 4), None);
        assert_eq!(PortNameNormalizer::normalize("SCART", 7), None);
    }

    #[test]
    fn test_is_hdmi_prefix_rule() {
        assert!(is_hdmi("HDMI0"));
        assert!(is_hdmi("hdmi1"));
        assert!(!is_hdmi("SPDIF0"));
        assert!(!is_hdmi("hd"));
    }

    #[test]
    fn test_audio_port_mapping() {
        assert_eq!(audio_port_for("HDMI0"), "HDMI0");
        assert_eq!(audio_port_for("COMPONENT"), "SPDIF0");
        assert_eq!(audio_port_for("SPDIF0"), "SPDIF0");
    }
}
