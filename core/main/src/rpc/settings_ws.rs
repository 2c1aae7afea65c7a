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

use std::collections::HashSet;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};

use avsettings_sdk::{
    api::settings::settings_events::SettingsEvent,
    log::{debug, error, info, warn},
    tokio,
    tokio::{net::TcpStream, sync::broadcast},
    tokio_tungstenite::{accept_async, tungstenite::Message},
};

use crate::state::settings_state::SettingsState;

use super::rpc_router::RpcRouter;

/// Thin websocket host: inbound frames go through the router, notifications
/// fan out to every client that registered for the event by name
/// (Thunder-style `register`/`unregister`).
pub async fn run(endpoint: String, router: RpcRouter, state: SettingsState) {
    let listener = match tokio::net::TcpListener::bind(&endpoint).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("unable to bind {}: {}", endpoint, e);
            return;
        }
    };
    info!("listening on {}", endpoint);
    while let Ok((stream, peer)) = listener.accept().await {
        debug!("client connected from {}", peer);
        let router = router.clone();
        let events = state.subscribe_events();
        tokio::spawn(async move {
            handle_connection(stream, router, events).await;
        });
    }
}

async fn handle_connection(
    stream: TcpStream,
    router: RpcRouter,
    mut events: broadcast::Receiver<SettingsEvent>,
) {
    let ws = match accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            error!("websocket handshake failed: {}", e);
            return;
        }
    };
    let (mut sender, mut receiver) = ws.split();
    let mut registered: HashSet<String> = HashSet::new();
    loop {
        tokio::select! {
            frame = receiver.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(response) = handle_text(&text, &router, &mut registered).await {
                        if sender.send(Message::Text(response)).await.is_err() {
                            break;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("client connection dropped: {}", e);
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => {
                    if registered.contains(event.name()) {
                        let frame = json!({
                            "jsonrpc": "2.0",
                            "method": event.name(),
                            "params": event.payload(),
                        })
                        .to_string();
                        if sender.send(Message::Text(frame)).await.is_err() {
                            break;
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(count)) => {
                    warn!("client fell behind, {} notifications dropped", count);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
        }
    }
}

/// Event registration is host-level state, everything else routes by name.
async fn handle_text(
    text: &str,
    router: &RpcRouter,
    registered: &mut HashSet<String>,
) -> Option<String> {
    let frame: Value = serde_json::from_str(text).unwrap_or(Value::Null);
    let method = frame.get("method").and_then(|m| m.as_str()).unwrap_or("");
    if method == "register" || method == "unregister" {
        let id = frame.get("id").and_then(|id| id.as_u64()).unwrap_or(0);
        let event = frame
            .get("params")
            .and_then(|p| p.get("event"))
            .and_then(|e| e.as_str());
        let ack = match event {
            Some(event) => {
                if method == "register" {
                    registered.insert(event.to_owned());
                } else {
                    registered.remove(event);
                }
                0
            }
            None => 1,
        };
        return Some(json!({"jsonrpc": "2.0", "id": id, "result": ack}).to_string());
    }
    Some(router.route(text).await)
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::{
        rpc::settings_rpc::SettingsRPCProvider, service::settings_engine::tests::engine_with,
    };
    use mock_hal::MockHal;

    #[tokio::test(flavor = "multi_thread")]
    async fn test_register_tracks_event_names() {
        let engine = Arc::new(engine_with(MockHal::with_default_ports()));
        let router = RpcRouter::new(SettingsRPCProvider::provide(engine).unwrap());
        let mut registered = HashSet::new();
        let ack = handle_text(
            r#"{"jsonrpc":"2.0","id":1,"method":"register","params":{"event":"zoomSettingUpdated"}}"#,
            &router,
            &mut registered,
        )
        .await
        .unwrap();
        assert!(registered.contains("zoomSettingUpdated"));
        let v: Value = serde_json::from_str(&ack).unwrap();
        assert_eq!(v["result"], 0);
        let _ = handle_text(
            r#"{"jsonrpc":"2.0","id":2,"method":"unregister","params":{"event":"zoomSettingUpdated"}}"#,
            &router,
            &mut registered,
        )
        .await;
        assert!(registered.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_other_methods_route_to_the_engine() {
        let engine = Arc::new(engine_with(MockHal::with_default_ports()));
        let router = RpcRouter::new(SettingsRPCProvider::provide(engine).unwrap());
        let mut registered = HashSet::new();
        let response = handle_text(
            r#"{"jsonrpc":"2.0","id":4,"method":"getSupportedVideoDisplays"}"#,
            &router,
            &mut registered,
        )
        .await
        .unwrap();
        let v: Value = serde_json::from_str(&response).unwrap();
        assert_eq!(
            v["result"]["supportedVideoDisplays"],
            json!(["HDMI0", "SPDIF0"])
        );
    }
}
