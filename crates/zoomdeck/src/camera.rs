use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub const MIN_ZOOM: f32 = 0.1;
pub const MAX_ZOOM: f32 = 10.0;

/// Margin kept between fitted content and each viewport edge.
pub const FIT_MARGIN: f32 = 50.0;

pub fn clamp_zoom(zoom: f32) -> f32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

/// Pan and zoom mapping content space into the viewport:
/// `view = pan + content * zoom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub pan: Vec2,
    pub zoom: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl CameraPose {
    pub const IDENTITY: Self = Self {
        pan: Vec2::ZERO,
        zoom: 1.0,
    };

    pub fn new(pan: Vec2, zoom: f32) -> Self {
        Self {
            pan,
            zoom: clamp_zoom(zoom),
        }
    }

    /// Pose at `zoom` that puts content point `point` at the center of the viewport.
    pub fn centered_on(point: Pos2, zoom: f32, viewport: Vec2) -> Self {
        let zoom = clamp_zoom(zoom);
        Self {
            pan: viewport / 2.0 - point.to_vec2() * zoom,
            zoom,
        }
    }

    /// Pose that fits `content` inside the viewport with [`FIT_MARGIN`] on
    /// every side, never zooming past `max_zoom`. A degenerate rectangle is
    /// centered at zoom 1.
    pub fn fit(content: Rect, viewport: Vec2, max_zoom: f32) -> Self {
        let zoom = if content.width() > 0.0 && content.height() > 0.0 {
            let scale_x = (viewport.x - FIT_MARGIN * 2.0) / content.width();
            let scale_y = (viewport.y - FIT_MARGIN * 2.0) / content.height();
            scale_x.min(scale_y).min(max_zoom)
        } else {
            1.0
        };
        Self::centered_on(content.center(), zoom, viewport)
    }

    pub fn content_to_view(&self, content: Pos2) -> Pos2 {
        pos2(
            content.x * self.zoom + self.pan.x,
            content.y * self.zoom + self.pan.y,
        )
    }

    pub fn view_to_content(&self, view: Pos2) -> Pos2 {
        pos2(
            (view.x - self.pan.x) / self.zoom,
            (view.y - self.pan.y) / self.zoom,
        )
    }

    pub fn rect_to_view(&self, content: Rect) -> Rect {
        Rect::from_min_max(
            self.content_to_view(content.min),
            self.content_to_view(content.max),
        )
    }

    /// Scale by `factor` while keeping the content point under `anchor` fixed.
    pub fn zoomed_about(&self, anchor: Pos2, factor: f32) -> Self {
        let zoom = clamp_zoom(self.zoom * factor);
        let point = self.view_to_content(anchor);
        Self {
            pan: anchor.to_vec2() - point.to_vec2() * zoom,
            zoom,
        }
    }

    pub fn lerp(&self, target: &Self, t: f32) -> Self {
        Self {
            pan: self.pan + (target.pan - self.pan) * t,
            zoom: self.zoom + (target.zoom - self.zoom) * t,
        }
    }
}

/// The single owner of the current pose.
#[derive(Debug, Clone, Default)]
pub struct Camera {
    pose: CameraPose,
}

impl Camera {
    pub fn new(pose: CameraPose) -> Self {
        Self { pose }
    }

    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.pose = CameraPose {
            pan: pose.pan,
            zoom: clamp_zoom(pose.zoom),
        };
    }

    pub fn set_pan(&mut self, pan: Vec2) {
        self.pose.pan = pan;
    }

    pub fn zoom_about(&mut self, anchor: Pos2, factor: f32) {
        self.pose = self.pose.zoomed_about(anchor, factor);
    }
}
