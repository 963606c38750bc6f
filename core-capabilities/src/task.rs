//! Detached task spawning
//!
//! - Native: the ambient Tokio runtime when there is one, otherwise a helper
//!   thread driving the future with `futures::executor::block_on`
//! - WASM: `wasm_bindgen_futures::spawn_local` on the browser event loop

use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => {
            handle.spawn(future);
        }
        Err(_) => {
            let spawned = std::thread::Builder::new()
                .name("capability-task".to_string())
                .spawn(move || futures::executor::block_on(future));
            if let Err(e) = spawned {
                tracing::error!(error = %e, "Failed to spawn capability task thread");
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn_detached<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
