//! Asset loading.
//!
//! - [`AssetLoader`]: fetches and decodes glTF/GLB models into a [`SceneAsset`]
//! - [`io`]: file and HTTP readers
//!
//! Loads run on a shared runtime (a tokio runtime on native, the browser's
//! microtask queue on wasm32) and report back over a `flume` channel, so the
//! frame loop never blocks on I/O.

pub mod io;
pub mod loader;

pub use io::AssetReaderVariant;
pub use loader::{AssetLoader, LoadMessage, LoaderOptions, MeshCompression, SceneAsset};

use std::future::Future;

#[cfg(not(target_arch = "wasm32"))]
fn get_asset_runtime() -> &'static tokio::runtime::Runtime {
    use std::sync::OnceLock;
    static RUNTIME: OnceLock<tokio::runtime::Runtime> = OnceLock::new();
    RUNTIME.get_or_init(|| tokio::runtime::Runtime::new().expect("Failed to create asset loader runtime"))
}

#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn spawn_task<F>(future: F)
where
    F: Future<Output = ()> + Send + 'static,
{
    get_asset_runtime().spawn(future);
}

#[cfg(target_arch = "wasm32")]
pub(crate) fn spawn_task<F>(future: F)
where
    F: Future<Output = ()> + 'static,
{
    wasm_bindgen_futures::spawn_local(future);
}
