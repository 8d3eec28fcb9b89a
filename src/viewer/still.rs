use iced::widget::image::Handle;
use image::imageops::{self, FilterType};
use image::RgbaImage;
use std::time::Duration;

use super::adapter::{PanoramaBackend, PanoramaWidget};
use super::config::PanoramaConfig;
use crate::error::Result;

/// Widest equirectangular image kept in memory while viewing
const WORKING_WIDTH: u32 = 2048;

/// Height over width of the visible window
const VIEW_ASPECT: f32 = 0.5625;

/// Desktop panorama backend.
///
/// Decodes the equirectangular image once at mount time. Every camera
/// change cuts the visible window out of the decoded pixels again, so
/// auto-rotate and the initial pitch/yaw/hfov are what the user sees.
#[derive(Debug, Clone, Copy, Default)]
pub struct StillBackend;

impl PanoramaBackend for StillBackend {
    type Widget = StillPanorama;

    fn create(&self, config: &PanoramaConfig, bytes: &[u8]) -> Result<StillPanorama> {
        let mut decoded = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = decoded.dimensions();

        if width > WORKING_WIDTH {
            let scaled_height = ((height as u64 * WORKING_WIDTH as u64) / width as u64).max(1) as u32;
            decoded = imageops::resize(&decoded, WORKING_WIDTH, scaled_height, FilterType::Triangle);
        }

        tracing::debug!(
            "📷 Decoded panorama: {}x{} (working {}x{})",
            width,
            height,
            decoded.width(),
            decoded.height()
        );

        let mut panorama = StillPanorama {
            pixels: Some(decoded),
            frame: None,
            pitch: config.pitch,
            yaw: wrap_degrees(config.yaw),
            hfov: config.hfov,
            auto_rotate: config.auto_rotate,
        };
        panorama.redraw();
        Ok(panorama)
    }
}

/// Part of the equirectangular image currently on screen, in pixels.
/// `x` may run past the right edge; columns wrap around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Camera state plus the decoded image for one mounted tour
#[derive(Debug, Clone)]
pub struct StillPanorama {
    pixels: Option<RgbaImage>,
    /// What is on screen right now
    frame: Option<Handle>,
    pitch: f32,
    yaw: f32,
    hfov: f32,
    auto_rotate: f32,
}

impl StillPanorama {
    /// The visible window, None once destroyed
    pub fn frame(&self) -> Option<&Handle> {
        self.frame.as_ref()
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Current yaw, always in [-180, 180)
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn hfov(&self) -> f32 {
        self.hfov
    }

    /// Where the camera looks, None once destroyed.
    ///
    /// Yaw 0 is the middle column of the image and pitch 0 the horizon.
    pub fn viewport(&self) -> Option<Viewport> {
        let pixels = self.pixels.as_ref()?;
        let (w, h) = pixels.dimensions();
        let (wf, hf) = (w as f32, h as f32);

        let width = ((self.hfov / 360.0 * wf).round() as u32).clamp(1, w);
        let height = ((width as f32 * VIEW_ASPECT).round() as u32).clamp(1, h);

        let center_x = (self.yaw + 180.0) / 360.0 * wf;
        let x = ((center_x - width as f32 / 2.0).rem_euclid(wf).round() as u32) % w;

        let center_y = (90.0 - self.pitch) / 180.0 * hf;
        let y = (center_y - height as f32 / 2.0).round().clamp(0.0, (h - height) as f32) as u32;

        Some(Viewport { x, y, width, height })
    }

    /// Copy the visible window out of the panorama, wrapping horizontally
    fn view_pixels(&self) -> Option<RgbaImage> {
        let pixels = self.pixels.as_ref()?;
        let view = self.viewport()?;
        let w = pixels.width();

        Some(RgbaImage::from_fn(view.width, view.height, |col, row| {
            *pixels.get_pixel((view.x + col) % w, view.y + row)
        }))
    }

    fn redraw(&mut self) {
        self.frame = self.view_pixels().map(|view| {
            let (width, height) = view.dimensions();
            Handle::from_rgba(width, height, view.into_raw())
        });
    }
}

impl PanoramaWidget for StillPanorama {
    fn destroy(&mut self) {
        // Frees the decoded pixels
        self.pixels = None;
        self.frame = None;
    }

    fn advance(&mut self, elapsed: Duration) {
        if self.pixels.is_none() || elapsed.is_zero() {
            return;
        }
        self.yaw = wrap_degrees(self.yaw + self.auto_rotate * elapsed.as_secs_f32());
        self.redraw();
    }
}

fn wrap_degrees(degrees: f32) -> f32 {
    (degrees + 180.0).rem_euclid(360.0) - 180.0
}
