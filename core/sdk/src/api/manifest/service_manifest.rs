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

use log::{info, warn};
use serde::{Deserialize, Serialize};

pub const SERVICE_MANIFEST_PATH_ENV: &str = "AVSETTINGS_MANIFEST";

fn default_ws_addr() -> String {
    "127.0.0.1".to_owned()
}

fn default_ws_port() -> u16 {
    9005
}

// The default version keeps every optional feature enabled until a client
// negotiates an explicit version.
fn default_api_version() -> u32 {
    u32::MAX
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceManifest {
    #[serde(default = "default_ws_addr")]
    pub ws_addr: String,
    #[serde(default = "default_ws_port")]
    pub ws_port: u16,
    #[serde(default = "default_api_version")]
    pub default_api_version: u32,
}

impl Default for ServiceManifest {
    fn default() -> ServiceManifest {
        ServiceManifest {
            ws_addr: default_ws_addr(),
            ws_port: default_ws_port(),
            default_api_version: default_api_version(),
        }
    }
}

impl ServiceManifest {
    /// Loads the manifest from the path in [SERVICE_MANIFEST_PATH_ENV],
    /// falling back to compiled defaults when unset or unreadable.
    pub fn load() -> ServiceManifest {
        let path = match std::env::var(SERVICE_MANIFEST_PATH_ENV) {
            Ok(p) => p,
            Err(_) => {
                info!("no service manifest path set, using defaults");
                return ServiceManifest::default();
            }
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(manifest) => manifest,
                Err(e) => {
                    warn!("invalid service manifest {}: {}", path, e);
                    ServiceManifest::default()
                }
            },
            Err(e) => {
                warn!("unable to read service manifest {}: {}", path, e);
                ServiceManifest::default()
            }
        }
    }

    pub fn ws_endpoint(&self) -> String {
        format!("{}:{}", self.ws_addr, self.ws_port)
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults() {
        let manifest = ServiceManifest::default();
        assert_eq!(manifest.ws_endpoint(), "127.0.0.1:9005");
        assert_eq!(manifest.default_api_version, u32::MAX);
    }

    #[test]
    fn test_partial_manifest_fills_defaults() {
        let manifest: ServiceManifest = serde_json::from_str(r#"{"wsPort": 9999}"#).unwrap();
        assert_eq!(manifest.ws_port, 9999);
        assert_eq!(manifest.ws_addr, "127.0.0.1");
    }
}
