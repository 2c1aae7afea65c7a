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

use futures::{future::join_all, StreamExt};
use jsonrpsee::{
    core::{
        server::{
            helpers::MethodSink,
            resource_limiting::Resources,
            rpc_module::{MethodKind, Methods},
        },
        TEN_MB_SIZE_BYTES,
    },
    types::{error::ErrorCode, ErrorResponse, Id, Params},
};
use serde_json::Value;

use avsettings_sdk::log::error;

/// Dispatches requests by name against the registered [Methods], pushing the
/// serialized response through a [MethodSink]. Same mechanism for sync and
/// async callbacks; the host stays transport-agnostic.
#[derive(Clone)]
pub struct RpcRouter {
    methods: Methods,
    resources: Resources,
}

fn protocol_error(code: ErrorCode) -> String {
    let response = ErrorResponse::owned(code.into(), Id::Null);
    serde_json::to_string(&response).unwrap_or_default()
}

async fn resolve_route(
    methods: Methods,
    resources: Resources,
    call_id: u64,
    method_name: &str,
    params_json: Option<String>,
) -> Option<String> {
    let id = Id::Number(call_id);
    let (sink_tx, mut sink_rx) = futures_channel::mpsc::unbounded::<String>();
    let sink = MethodSink::new_with_limit(sink_tx, TEN_MB_SIZE_BYTES, TEN_MB_SIZE_BYTES);
    let params = Params::new(params_json.as_deref());
    let mut method_executors = Vec::new();
    match methods.method_with_name(method_name) {
        None => {
            sink.send_error(id, ErrorCode::MethodNotFound.into());
        }
        Some((name, method)) => match &method.inner() {
            MethodKind::Sync(callback) => match method.claim(name, &resources) {
                Ok(_guard) => {
                    let _ = sink.send_raw((callback)(id, params, usize::MAX).result);
                }
                Err(_) => {
                    sink.send_error(id, ErrorCode::MethodNotFound.into());
                }
            },
            MethodKind::Async(callback) => match method.claim(name, &resources) {
                Ok(guard) => {
                    let sink = sink.clone();
                    let id = id.into_owned();
                    let params = params.into_owned();
                    let fut = async move {
                        let rp = (callback)(id, params, 0, usize::MAX, Some(guard)).await;
                        let _ = sink.send_raw(rp.result);
                    };
                    method_executors.push(fut);
                }
                Err(_) => {
                    sink.send_error(id, ErrorCode::MethodNotFound.into());
                }
            },
            _ => {
                error!("unsupported method call kind for {}", method_name);
            }
        },
    }
    join_all(method_executors).await;
    sink_rx.next().await
}

impl RpcRouter {
    pub fn new(methods: impl Into<Methods>) -> RpcRouter {
        let methods: Methods = methods.into();
        let resources = Resources::default();
        let methods = methods.initialize_resources(&resources).unwrap();
        RpcRouter { methods, resources }
    }

    /// Routes one raw JSON-RPC request and returns the serialized response.
    /// Malformed frames yield protocol-level error responses; business
    /// failures surface only inside each method's response payload.
    pub async fn route(&self, request: &str) -> String {
        let frame: Value = match serde_json::from_str(request) {
            Ok(v) => v,
            Err(_) => return protocol_error(ErrorCode::ParseError),
        };
        let method = match frame.get("method").and_then(|m| m.as_str()) {
            Some(m) => m.to_owned(),
            None => return protocol_error(ErrorCode::InvalidRequest),
        };
        let call_id = frame.get("id").and_then(|id| id.as_u64()).unwrap_or(0);
        let params_json = frame.get("params").map(|p| p.to_string());
        match resolve_route(
            self.methods.clone(),
            self.resources.clone(),
            call_id,
            &method,
            params_json,
        )
        .await
        {
            Some(response) => response,
            None => protocol_error(ErrorCode::InternalError),
        }
    }
}
