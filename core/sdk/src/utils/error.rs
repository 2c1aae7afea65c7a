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

use serde::{Deserialize, Serialize};

use crate::api::device::device_hal::HalError;

/// Business-logic failure inside the settings engine. Never crosses the RPC
/// method boundary; each method maps it to its `success=false` shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServiceError {
    MissingParam,
    InvalidParam,
    InvalidPortName,
    PortNotConnected,
    UnsupportedVersion,
    Hal(HalError),
}

impl From<HalError> for ServiceError {
    fn from(e: HalError) -> ServiceError {
        ServiceError::Hal(e)
    }
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingParam => write!(f, "required parameter missing"),
            Self::InvalidParam => write!(f, "invalid parameter value"),
            Self::InvalidPortName => write!(f, "unrecognized port name"),
            Self::PortNotConnected => write!(f, "port not connected"),
            Self::UnsupportedVersion => write!(f, "unsupported at negotiated api version"),
            Self::Hal(e) => write!(f, "{}", e),
        }
    }
}
