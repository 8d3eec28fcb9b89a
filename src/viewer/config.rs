use crate::preview::PreviewId;

/// Automatic rotation speed in degrees per second (negative = to the left)
pub const AUTO_ROTATE: f32 = -2.0;
/// Initial camera pitch in degrees
pub const INITIAL_PITCH: f32 = 10.0;
/// Initial camera yaw in degrees
pub const INITIAL_YAW: f32 = 180.0;
/// Horizontal field of view in degrees
pub const INITIAL_HFOV: f32 = 110.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    Equirectangular,
}

/// Everything a panorama backend is constructed with
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanoramaConfig {
    pub projection: Projection,
    /// The image to show
    pub panorama: PreviewId,
    pub auto_load: bool,
    pub auto_rotate: f32,
    pub compass: bool,
    pub show_zoom_ctrl: bool,
    pub show_fullscreen_ctrl: bool,
    pub pitch: f32,
    pub yaw: f32,
    pub hfov: f32,
}

impl PanoramaConfig {
    /// The settings every tour opens with. Not user-configurable.
    pub fn equirectangular(panorama: PreviewId) -> Self {
        Self {
            projection: Projection::Equirectangular,
            panorama,
            auto_load: true,
            auto_rotate: AUTO_ROTATE,
            compass: false,
            show_zoom_ctrl: false,
            show_fullscreen_ctrl: false,
            pitch: INITIAL_PITCH,
            yaw: INITIAL_YAW,
            hfov: INITIAL_HFOV,
        }
    }
}
