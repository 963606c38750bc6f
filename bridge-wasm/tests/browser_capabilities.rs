#![cfg(target_arch = "wasm32")]
//! End-to-end checks of the capability adapters over the real browser bridges

use bridge_traits::{NetworkStatus, PlatformKind};
use bridge_wasm::{build_wasm_bridges, WasmBridgeConfig};
use core_capabilities::{CameraCapture, NetworkObserver, StorageAdapter};
use core_runtime::config::CapabilityConfig;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn web_config(prefix: &str) -> CapabilityConfig {
    let namespace = format!("{prefix}-{}", js_sys::Date::now());
    let bridges = build_wasm_bridges(WasmBridgeConfig::new(namespace)).unwrap();
    CapabilityConfig::builder()
        .platform(PlatformKind::Web)
        .browser_storage(bridges.storage())
        .browser_connectivity(bridges.connectivity())
        .build()
        .unwrap()
}

fn dispatch(name: &str) {
    let window = web_sys::window().unwrap();
    window
        .dispatch_event(&web_sys::Event::new(name).unwrap())
        .unwrap();
}

#[wasm_bindgen_test]
async fn test_storage_and_token() {
    let config = web_config("storage");
    let storage = StorageAdapter::from_config(&config).unwrap();

    assert!(storage.set("k", "v").await);
    assert_eq!(storage.get("k").await.as_deref(), Some("v"));

    assert!(storage.set_token("abc").await);
    assert_eq!(storage.get_token().await.as_deref(), Some("abc"));
    assert!(storage.remove_token().await);
    assert_eq!(storage.get_token().await, None);

    assert!(storage.clear().await);
    assert!(storage.keys().await.is_empty());
}

#[wasm_bindgen_test]
async fn test_offline_event_reaches_subscriber() {
    let config = web_config("network");
    let network = NetworkObserver::from_config(&config).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let subscription =
        network.on_network_status_change(move |status: NetworkStatus| sink.borrow_mut().push(status));

    dispatch("offline");
    assert_eq!(*seen.borrow(), vec![NetworkStatus::offline()]);

    subscription.unsubscribe().await;
    dispatch("offline");
    assert_eq!(seen.borrow().len(), 1);
}

#[wasm_bindgen_test]
async fn test_camera_unavailable_in_browser() {
    let config = web_config("camera");
    let camera = CameraCapture::from_config(&config).unwrap();

    assert_eq!(camera.take_photo().await, None);
    assert!(camera.check_camera_permission().await);
}
