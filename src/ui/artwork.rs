use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use eframe::egui::{ColorImage, Context, TextureHandle, TextureOptions};
use image::RgbaImage;

use crate::library::{cover_art, decode_art, placeholder};

/// GPU textures for thumbnails, the now-playing cover and the header logo.
///
/// Each path is decoded at most once. Tracks without usable art share the
/// placeholder texture.
pub struct ArtworkCache {
    thumbnail_size: u32,
    cover_size: u32,
    logo_path: Option<PathBuf>,
    thumbs: HashMap<PathBuf, Option<TextureHandle>>,
    placeholder: Option<TextureHandle>,
    cover: Option<(PathBuf, Option<TextureHandle>)>,
    logo: Option<Option<TextureHandle>>,
}

impl ArtworkCache {
    pub fn new(thumbnail_size: u32, cover_size: u32, logo_path: Option<PathBuf>) -> Self {
        Self {
            thumbnail_size,
            cover_size,
            logo_path,
            thumbs: HashMap::new(),
            placeholder: None,
            cover: None,
            logo: None,
        }
    }

    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    pub fn cover_size(&self) -> u32 {
        self.cover_size
    }

    /// Thumbnail for `path`, or the shared placeholder.
    pub fn thumbnail(&mut self, ctx: &Context, path: &Path) -> TextureHandle {
        let size = self.thumbnail_size;
        let thumb = self
            .thumbs
            .entry(path.to_path_buf())
            .or_insert_with(|| {
                cover_art(path)
                    .and_then(|bytes| decode_art(&bytes, size))
                    .map(|img| texture(ctx, &format!("thumb:{}", path.display()), &img))
            })
            .clone();

        match thumb {
            Some(t) => t,
            None => self
                .placeholder
                .get_or_insert_with(|| texture(ctx, "thumb:placeholder", &placeholder(size)))
                .clone(),
        }
    }

    /// Cover for `path` at the large size; `None` when the file has no usable art.
    pub fn cover(&mut self, ctx: &Context, path: &Path) -> Option<TextureHandle> {
        if let Some((cached, tex)) = &self.cover {
            if cached == path {
                return tex.clone();
            }
        }

        let tex = cover_art(path)
            .and_then(|bytes| decode_art(&bytes, self.cover_size))
            .map(|img| texture(ctx, "cover", &img));
        self.cover = Some((path.to_path_buf(), tex.clone()));
        tex
    }

    /// Header logo, loaded on first use. A missing or broken file yields `None`.
    pub fn logo(&mut self, ctx: &Context) -> Option<TextureHandle> {
        if self.logo.is_none() {
            let loaded = self.logo_path.as_deref().and_then(|p| match image::open(p) {
                Ok(img) => Some(texture(ctx, "logo", &img.to_rgba8())),
                Err(e) => {
                    log::debug!("cannot load logo {}: {e}", p.display());
                    None
                }
            });
            self.logo = Some(loaded);
        }
        self.logo.clone().flatten()
    }

    /// Drop thumbnails for paths no longer in the playlist.
    pub fn retain<'a>(&mut self, paths: impl IntoIterator<Item = &'a PathBuf>) {
        let keep: HashSet<&PathBuf> = paths.into_iter().collect();
        self.thumbs.retain(|p, _| keep.contains(p));
    }

    #[cfg(test)]
    pub(crate) fn cached_thumbnails(&self) -> usize {
        self.thumbs.len()
    }
}

fn texture(ctx: &Context, name: &str, img: &RgbaImage) -> TextureHandle {
    let size = [img.width() as usize, img.height() as usize];
    ctx.load_texture(
        name,
        ColorImage::from_rgba_unmultiplied(size, img.as_raw()),
        TextureOptions::LINEAR,
    )
}
