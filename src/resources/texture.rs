//! The texture registry.
//!
//! Loading a texture never blocks: the record is registered right away with a
//! magenta placeholder pixel and the image is read and decoded in the
//! background. A successful decode swaps the record's handle once, a failed
//! one is logged and leaves the placeholder in place for good.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    data_structures::{handle::HandleSlot, texture},
    error::ResourceError,
    resources::{Spawner, load_binary, registry::Registry},
};

/// Color shown until (or instead of) the decoded image.
pub const PLACEHOLDER_RGBA: [u8; 4] = [255, 0, 255, 255];

/// A GPU texture together with the bind group shaders sample it through.
#[derive(Debug)]
pub struct BoundTexture {
    pub texture: texture::Texture,
    pub bind_group: wgpu::BindGroup,
}

impl BoundTexture {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: texture::Texture,
        label: &str,
    ) -> Self {
        let fallback;
        let sampler = match &texture.sampler {
            Some(sampler) => sampler,
            None => {
                fallback = texture::create_clamped_sampler(device);
                &fallback
            }
        };
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(label),
        });
        Self {
            texture,
            bind_group,
        }
    }
}

/// A registered texture. Scene objects keep the record and read
/// [`Texture::handle`] every frame, so they pick up the decoded image as soon
/// as it is swapped in.
#[derive(Debug)]
pub struct Texture {
    pub name: String,
    pub path: PathBuf,
    /// UV tiling factor.
    pub scale: [f32; 2],
    pub handle: HandleSlot<BoundTexture>,
}

#[derive(Debug)]
pub struct TextureRegistry {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    layout: Arc<wgpu::BindGroupLayout>,
    asset_dir: PathBuf,
    spawner: Spawner,
    textures: Registry<Texture>,
}

impl TextureRegistry {
    pub fn new(
        device: Arc<wgpu::Device>,
        queue: Arc<wgpu::Queue>,
        layout: Arc<wgpu::BindGroupLayout>,
        asset_dir: impl Into<PathBuf>,
        spawner: Spawner,
    ) -> Self {
        Self {
            device,
            queue,
            layout,
            asset_dir: asset_dir.into(),
            spawner,
            textures: Registry::new("texture"),
        }
    }

    /// Registers `name` with a 1x1 UV scale. `path` is relative to the asset
    /// directory.
    pub fn load(&mut self, name: &str, path: impl AsRef<Path>) -> Arc<Texture> {
        self.load_scaled(name, path, [1.0, 1.0])
    }

    pub fn load_scaled(&mut self, name: &str, path: impl AsRef<Path>, scale: [f32; 2]) -> Arc<Texture> {
        let placeholder = texture::Texture::solid_color(
            &self.device,
            &self.queue,
            PLACEHOLDER_RGBA,
            &format!("{name} placeholder"),
        );
        let placeholder = BoundTexture::new(
            &self.device,
            &self.layout,
            placeholder,
            &format!("{name} placeholder bind group"),
        );
        let record = self.textures.insert(
            name,
            Texture {
                name: name.to_string(),
                path: self.asset_dir.join(path),
                scale,
                handle: HandleSlot::new(placeholder),
            },
        );

        let task_record = record.clone();
        let device = self.device.clone();
        let queue = self.queue.clone();
        let layout = self.layout.clone();
        self.spawner.spawn(async move {
            let record = task_record;
            let label = format!("{} bind group", record.name);
            let result = load_into(&record.handle, &record.name, &record.path, |image| {
                let texture = texture::Texture::from_image(&device, &queue, &image, Some(&record.name))?;
                Ok(BoundTexture::new(&device, &layout, texture, &label))
            })
            .await;
            match result {
                Ok(()) => log::debug!("texture `{}` swapped in from {}", record.name, record.path.display()),
                Err(e) => log::warn!("{e}, keeping the placeholder"),
            }
        });

        record
    }

    pub fn get_by_name(&self, name: &str) -> Result<Arc<Texture>, ResourceError> {
        self.textures.get_by_name(name)
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

/// Reads and decodes the image at `path`, turns it into a `T` with `upload`
/// and swaps it into `slot`. The slot is only touched on success.
pub async fn load_into<T, F>(
    slot: &HandleSlot<T>,
    name: &str,
    path: &Path,
    upload: F,
) -> Result<(), ResourceError>
where
    F: FnOnce(image::DynamicImage) -> anyhow::Result<T>,
{
    let decode_error = |source: Box<dyn std::error::Error + Send + Sync>| ResourceError::TextureDecode {
        name: name.to_string(),
        path: path.to_path_buf(),
        source,
    };

    let bytes = load_binary(path).await.map_err(|e| decode_error(e.into()))?;
    let image = decode(bytes).await.map_err(decode_error)?;
    let value = upload(image).map_err(|e| decode_error(e.into()))?;
    slot.swap(value);
    Ok(())
}

#[cfg(not(target_arch = "wasm32"))]
async fn decode(bytes: Vec<u8>) -> Result<image::DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    Ok(image)
}

#[cfg(target_arch = "wasm32")]
async fn decode(bytes: Vec<u8>) -> Result<image::DynamicImage, Box<dyn std::error::Error + Send + Sync>> {
    Ok(image::load_from_memory(&bytes)?)
}
