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

use std::sync::Arc;

use avsettings_sdk::{
    api::{device::device_events::DsEvent, manifest::service_manifest::ServiceManifest},
    log::{error, info},
    tokio,
    tokio::sync::mpsc::UnboundedReceiver,
    utils::logger::init_logger,
};
use mock_hal::MockHal;

use crate::{
    processor::event_dispatcher::EventHandlerHandle,
    rpc::{rpc_router::RpcRouter, settings_rpc::SettingsRPCProvider, settings_ws},
    service::settings_engine::SettingsEngine,
    state::settings_state::SettingsState,
};

pub mod processor;
pub mod rpc;
pub mod service;
pub mod state;

/// Drains the hardware bus into the dispatcher. The handle is weak: events
/// arriving after engine teardown are dropped, not faulted on.
fn spawn_bus_listener(handle: EventHandlerHandle, mut bus_rx: UnboundedReceiver<DsEvent>) {
    tokio::spawn(async move {
        while let Some(event) = bus_rx.recv().await {
            handle.handle(event);
        }
    });
}

#[tokio::main(worker_threads = 2)]
async fn main() {
    if let Err(e) = init_logger("avsettings".into()) {
        println!("{:?} logger init error", e);
        return;
    }
    let manifest = ServiceManifest::load();
    info!("starting avsettings on {}", manifest.ws_endpoint());

    // Platform HAL bindings are wired here; the mock device HAL backs local
    // runs and echoes applied settings onto the bus like real hardware.
    let hal = MockHal::with_default_ports();
    let (bus_tx, bus_rx) = tokio::sync::mpsc::unbounded_channel();
    hal.set_event_sink(bus_tx);

    let state = SettingsState::new(Arc::new(hal), &manifest);
    let engine = Arc::new(SettingsEngine::new(state.clone()));
    spawn_bus_listener(EventHandlerHandle::new(&engine), bus_rx);

    let module = match SettingsRPCProvider::provide(engine.clone()) {
        Ok(module) => module,
        Err(e) => {
            error!("rpc registration failed: {:?}", e);
            return;
        }
    };
    settings_ws::run(manifest.ws_endpoint(), RpcRouter::new(module), state).await;
}
