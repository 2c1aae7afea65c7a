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

use super::device_request::{HotPlugStatus, RxSenseStatus, ZoomMode};

/// Raw notifications delivered by the hardware event bus. The bus owns its
/// own connection lifecycle; the service only registers a handler for these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DsEvent {
    ResolutionPreChange,
    ResolutionPostChange { width: i32, height: i32 },
    ZoomSettings(ZoomMode),
    RxSense(RxSenseStatus),
    HdmiHotPlug(HotPlugStatus),
}
