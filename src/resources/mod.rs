//! Loading of everything the scene draws with: mesh buffers, textures and
//! the raw bytes behind them.
//!
//! On native targets files are read with `tokio::fs` relative to the asset
//! directory, on the web they are fetched relative to the page origin.

use std::{future::Future, path::Path};

pub mod mesh;
pub mod registry;
pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &Path) -> anyhow::Result<reqwest::Url> {
    use anyhow::Context;

    let window = web_sys::window().context("no browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{origin}/"))?;
    Ok(base.join(&file_name.to_string_lossy())?)
}

/// Reads a whole asset into memory.
pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(path)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = tokio::fs::read(path).await?;

    Ok(data)
}

/// Where background work such as texture decoding runs.
#[derive(Clone, Debug)]
pub struct Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    handle: tokio::runtime::Handle,
}

impl Spawner {
    #[cfg(not(target_arch = "wasm32"))]
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Spawner for the runtime the caller is running on.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn current() -> Self {
        Self::new(tokio::runtime::Handle::current())
    }

    #[cfg(target_arch = "wasm32")]
    pub fn current() -> Self {
        Self {}
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        // Detached, nothing ever waits for or cancels a load.
        drop(self.handle.spawn(task));
    }

    #[cfg(target_arch = "wasm32")]
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(task);
    }
}
