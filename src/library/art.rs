use std::path::Path;

use image::imageops::FilterType;
use image::{Rgba, RgbaImage};
use lofty::picture::PictureType;
use lofty::prelude::TaggedFileExt;

/// Fill colour used when a track has no usable embedded picture.
const PLACEHOLDER_RGBA: [u8; 4] = [0x1D, 0xB9, 0x54, 0xFF];

/// Raw bytes of the embedded cover picture, preferring the front cover.
pub fn cover_art(path: &Path) -> Option<Vec<u8>> {
    let tagged = match lofty::read_from_path(path) {
        Ok(t) => t,
        Err(e) => {
            log::debug!("no cover art for {}: {e}", path.display());
            return None;
        }
    };

    let pictures: Vec<_> = tagged.tags().iter().flat_map(|t| t.pictures()).collect();
    pictures
        .iter()
        .find(|p| p.pic_type() == PictureType::CoverFront)
        .or_else(|| pictures.first())
        .map(|p| p.data().to_vec())
}

/// Decode `bytes` and resize to an exact `size`×`size` square.
pub fn decode_art(bytes: &[u8], size: u32) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(img) => Some(img.resize_exact(size, size, FilterType::Triangle).to_rgba8()),
        Err(e) => {
            log::debug!("undecodable cover art: {e}");
            None
        }
    }
}

pub fn placeholder(size: u32) -> RgbaImage {
    RgbaImage::from_pixel(size, size, Rgba(PLACEHOLDER_RGBA))
}
