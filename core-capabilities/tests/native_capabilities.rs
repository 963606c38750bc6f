//! Native-platform behaviour: listener races, bridge faults, capture settings

use async_trait::async_trait;
use bridge_headless::{FixtureCamera, MemoryPreferences, SimulatedNativeConnectivity};
use bridge_traits::{
    error::Result as BridgeResult, BridgeError, ConnectionType, NativePreferences, NetworkStatus,
    PhotoSource, PlatformKind,
};
use core_capabilities::{CameraCapture, NetworkObserver, Outcome, StorageAdapter};
use core_runtime::config::{CameraSettings, CapabilityConfig};
use mockall::mock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

mock! {
    pub Preferences {}

    #[async_trait]
    impl NativePreferences for Preferences {
        async fn get(&self, key: &str) -> BridgeResult<Option<String>>;
        async fn set(&self, key: &str, value: &str) -> BridgeResult<()>;
        async fn remove(&self, key: &str) -> BridgeResult<()>;
        async fn clear(&self) -> BridgeResult<()>;
        async fn keys(&self) -> BridgeResult<Vec<String>>;
    }
}

fn native_config(
    platform: PlatformKind,
    preferences: Arc<dyn NativePreferences>,
    monitor: Arc<SimulatedNativeConnectivity>,
    camera: Arc<FixtureCamera>,
) -> CapabilityConfig {
    CapabilityConfig::builder()
        .platform(platform)
        .native_preferences(preferences)
        .native_connectivity(monitor)
        .native_camera(camera)
        .build()
        .unwrap()
}

fn monitor() -> Arc<SimulatedNativeConnectivity> {
    Arc::new(SimulatedNativeConnectivity::new(NetworkStatus::new(
        true,
        ConnectionType::Wifi,
    )))
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
    })
    .await
    .expect("condition not reached in time");
}

#[tokio::test]
async fn test_early_unsubscribe_leaves_no_native_listener() {
    let monitor = monitor();
    monitor.hold_registrations();
    let config = native_config(
        PlatformKind::Android,
        Arc::new(MemoryPreferences::new()),
        monitor.clone(),
        Arc::new(FixtureCamera::new()),
    );
    let network = NetworkObserver::from_config(&config).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let subscription = network.on_network_status_change(move |_: NetworkStatus| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    subscription.unsubscribe().await;
    assert!(!subscription.is_active());

    monitor.release_registrations();
    wait_until(|| monitor.removed_count() == 1).await;

    assert_eq!(monitor.listener_count(), 0);
    monitor.emit(NetworkStatus::offline());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_subscriptions_are_independent() {
    let monitor = monitor();
    let config = native_config(
        PlatformKind::Ios,
        Arc::new(MemoryPreferences::new()),
        monitor.clone(),
        Arc::new(FixtureCamera::new()),
    );
    let network = NetworkObserver::from_config(&config).unwrap();

    let kept_calls = Arc::new(AtomicUsize::new(0));
    let dropped_calls = Arc::new(AtomicUsize::new(0));

    let counter = kept_calls.clone();
    let kept = network.on_network_status_change(move |_: NetworkStatus| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    let counter = dropped_calls.clone();
    let dropped = network.on_network_status_change(move |_: NetworkStatus| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    wait_until(|| monitor.listener_count() == 2).await;
    dropped.unsubscribe().await;
    dropped.unsubscribe().await;

    monitor.emit(NetworkStatus::offline());
    monitor.emit(NetworkStatus::new(true, ConnectionType::Cellular));

    assert_eq!(kept_calls.load(Ordering::SeqCst), 2);
    assert_eq!(dropped_calls.load(Ordering::SeqCst), 0);
    assert!(kept.is_active());
    assert_ne!(kept.id(), dropped.id());

    kept.unsubscribe().await;
    assert_eq!(monitor.listener_count(), 0);
}

#[tokio::test]
async fn test_native_storage_faults_surface_as_outcome() {
    let mut preferences = MockPreferences::new();
    preferences
        .expect_get()
        .returning(|_| Err(BridgeError::NotAvailable("preferences".into())));
    preferences
        .expect_set()
        .returning(|_, _| Err(BridgeError::NotAvailable("preferences".into())));

    let config = native_config(
        PlatformKind::Ios,
        Arc::new(preferences),
        monitor(),
        Arc::new(FixtureCamera::new()),
    );
    let storage = StorageAdapter::from_config(&config).unwrap();

    assert_eq!(storage.get("k").await, None);
    assert!(!storage.set("k", "v").await);
    assert!(!storage.set_token("t1").await);
    assert!(matches!(
        storage.lookup("k").await,
        Outcome::Failed(BridgeError::NotAvailable(_))
    ));
}

#[tokio::test]
async fn test_capture_uses_configured_settings() {
    let camera = Arc::new(FixtureCamera::new().with_photo(b"jpeg-bytes".to_vec(), "jpeg"));
    let config = CapabilityConfig::builder()
        .platform(PlatformKind::Android)
        .native_preferences(Arc::new(MemoryPreferences::new()))
        .native_connectivity(monitor())
        .native_camera(camera.clone())
        .camera_settings(CameraSettings::default().with_quality(75))
        .build()
        .unwrap();
    let capture = CameraCapture::from_config(&config).unwrap();

    let image = capture.take_photo().await.unwrap();
    assert_eq!(image.bytes.as_ref(), b"jpeg-bytes");
    assert!(image.suggested_file_name.starts_with("photo_"));
    assert!(image.suggested_file_name.ends_with(".jpeg"));

    let request = &camera.requests()[0];
    assert_eq!(request.source, PhotoSource::Camera);
    assert_eq!(request.quality, 75);
}

#[tokio::test]
async fn test_cancelled_capture_is_none() {
    let config = native_config(
        PlatformKind::Ios,
        Arc::new(MemoryPreferences::new()),
        monitor(),
        Arc::new(FixtureCamera::new().cancelled()),
    );
    let capture = CameraCapture::from_config(&config).unwrap();

    assert_eq!(capture.take_photo().await, None);
    assert_eq!(capture.pick_image().await, None);
}
