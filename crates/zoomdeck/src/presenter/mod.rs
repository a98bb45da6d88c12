//! The presentation controller.
//!
//! A [`Presenter`] owns one loaded deck together with the camera, the
//! animator and the focus state, and computes every target pose the camera
//! is asked to reach. Collaborators (renderer, tokenizer, host UI) are
//! injected through [`PresenterBuilder`]; one presenter serves one open
//! document view and is replaced wholesale when the view goes away.

#[cfg(test)]
mod tests;

use eframe::egui::{Pos2, Vec2, vec2};

use crate::animator::{self, Animator};
use crate::camera::{Camera, CameraPose};
use crate::error::{DeckError, Result};
use crate::host::{HostUi, Layer, NavigationStatus};
use crate::input::Gesture;
use crate::layout::{self, ContentBounds};
use crate::parser::markdown::{HeadingTokenizer, MarkdownBlocks, MarkdownRenderer};
use crate::parser::{self, OutlineItem, ParsedDeck, SAMPLE_DOCUMENT, SAMPLE_TITLE, Slide};

/// Slides take this fraction of the viewport they were created for.
pub const SLIDE_VIEWPORT_FRACTION: f32 = 0.8;
/// A focused slide fills at most this fraction of the current viewport.
pub const FOCUS_VIEWPORT_FRACTION: f32 = 0.8;
pub const MAX_FOCUS_ZOOM: f32 = 2.0;
/// Fitting the grid or the outline never magnifies past 100%.
pub const MAX_FIT_ZOOM: f32 = 1.0;
/// Step factors for the zoom buttons / `+` and `-` keys.
pub const ZOOM_IN_STEP: f32 = 1.2;
pub const ZOOM_OUT_STEP: f32 = 0.8;
/// Viewport used when the host cannot report one yet.
pub const FALLBACK_VIEWPORT: Vec2 = vec2(1280.0, 720.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FocusState {
    pub current_slide: usize,
    pub zoomed_in: bool,
    pub overview: bool,
}

/// The effective view mode, derived from [`FocusState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    Focused(usize),
    Overview,
}

impl FocusState {
    pub fn mode(&self) -> ViewMode {
        if self.overview {
            ViewMode::Overview
        } else if self.zoomed_in {
            ViewMode::Focused(self.current_slide)
        } else {
            ViewMode::Grid
        }
    }
}

/// What lies under a viewport point in the active layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hit {
    Slide(usize),
    OutlineItem(usize),
}

pub struct PresenterBuilder {
    viewport: Vec2,
    renderer: Option<Box<dyn MarkdownRenderer>>,
    tokenizer: Option<Box<dyn HeadingTokenizer>>,
    host: Option<Box<dyn HostUi>>,
    animation_ms: f32,
}

impl PresenterBuilder {
    pub fn new(viewport: Vec2) -> Self {
        Self {
            viewport,
            renderer: None,
            tokenizer: None,
            host: None,
            animation_ms: animator::DEFAULT_DURATION_MS,
        }
    }

    pub fn renderer(mut self, renderer: impl MarkdownRenderer + 'static) -> Self {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn tokenizer(mut self, tokenizer: impl HeadingTokenizer + 'static) -> Self {
        self.tokenizer = Some(Box::new(tokenizer));
        self
    }

    /// Use the built-in [`MarkdownBlocks`] for both rendering and tokenizing.
    pub fn markdown_blocks(self) -> Self {
        self.renderer(MarkdownBlocks).tokenizer(MarkdownBlocks)
    }

    pub fn host(mut self, host: impl HostUi + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    pub fn animation_ms(mut self, ms: f32) -> Self {
        self.animation_ms = ms;
        self
    }

    /// Check every collaborator is present, then load the sample deck.
    pub fn build(self) -> Result<Presenter> {
        let mut missing = Vec::new();
        if self.renderer.is_none() {
            missing.push("renderer");
        }
        if self.tokenizer.is_none() {
            missing.push("tokenizer");
        }
        if self.host.is_none() {
            missing.push("host");
        }
        let (Some(renderer), Some(tokenizer), Some(host)) =
            (self.renderer, self.tokenizer, self.host)
        else {
            return Err(DeckError::MissingCollaborators { missing });
        };

        if !valid_viewport(self.viewport) {
            return Err(DeckError::InvalidViewport {
                width: self.viewport.x,
                height: self.viewport.y,
            });
        }

        let mut presenter = Presenter {
            renderer,
            tokenizer,
            host,
            deck: ParsedDeck::default(),
            title: String::new(),
            slide_size: self.viewport * SLIDE_VIEWPORT_FRACTION,
            viewport: self.viewport,
            camera: Camera::default(),
            animator: Animator::new(self.animation_ms),
            focus: FocusState::default(),
            gesture: Gesture::Idle,
        };
        presenter.load_sample();
        Ok(presenter)
    }
}

fn valid_viewport(size: Vec2) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

pub struct Presenter {
    renderer: Box<dyn MarkdownRenderer>,
    tokenizer: Box<dyn HeadingTokenizer>,
    host: Box<dyn HostUi>,
    deck: ParsedDeck,
    title: String,
    slide_size: Vec2,
    viewport: Vec2,
    camera: Camera,
    animator: Animator,
    focus: FocusState,
    gesture: Gesture,
}

impl std::fmt::Debug for Presenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Presenter")
            .field("title", &self.title)
            .field("slides", &self.deck.slide_count())
            .field("focus", &self.focus)
            .field("camera", &self.camera.pose())
            .finish_non_exhaustive()
    }
}

impl Presenter {
    pub fn builder(viewport: Vec2) -> PresenterBuilder {
        PresenterBuilder::new(viewport)
    }

    pub fn deck(&self) -> &ParsedDeck {
        &self.deck
    }

    pub fn slides(&self) -> &[Slide] {
        &self.deck.slides
    }

    pub fn outline(&self) -> &[OutlineItem] {
        &self.deck.outline
    }

    pub fn bounds(&self) -> ContentBounds {
        self.deck.bounds
    }

    pub fn slide_count(&self) -> usize {
        self.deck.slide_count()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn focus(&self) -> FocusState {
        self.focus
    }

    pub fn mode(&self) -> ViewMode {
        self.focus.mode()
    }

    pub fn camera_pose(&self) -> CameraPose {
        self.camera.pose()
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn slide_size(&self) -> Vec2 {
        self.slide_size
    }

    pub fn gesture(&self) -> &Gesture {
        &self.gesture
    }

    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// Pose the in-flight animation is heading to.
    pub fn animation_target(&self) -> Option<CameraPose> {
        self.animator.active().map(|a| a.target)
    }

    pub fn animation_generation(&self) -> u64 {
        self.animator.generation()
    }

    pub fn status(&self) -> NavigationStatus {
        NavigationStatus::new(
            self.focus.current_slide,
            self.deck.slide_count(),
            self.focus.overview,
        )
    }

    pub fn active_layer(&self) -> Layer {
        if self.focus.overview {
            Layer::Outline
        } else {
            Layer::Slides {
                focused: self.focus.current_slide,
            }
        }
    }

    /// Record the current container size. Slide size is not affected; only
    /// later target-pose computations see the new size.
    pub fn set_viewport_size(&mut self, size: Vec2) {
        if valid_viewport(size) {
            self.viewport = size;
        }
    }

    pub fn load_sample(&mut self) {
        self.load_document(SAMPLE_DOCUMENT, SAMPLE_TITLE);
    }

    /// Replace the deck with `document`, reset focus to the first slide in
    /// grid mode and re-home the camera.
    pub fn load_document(&mut self, document: &str, title: &str) {
        self.animator.cancel();
        self.gesture = Gesture::Idle;

        self.deck = parser::parse(
            document,
            self.slide_size,
            &*self.renderer,
            &*self.tokenizer,
        );
        self.focus = FocusState::default();
        self.title = title.to_string();
        tracing::info!(
            title,
            slides = self.deck.slide_count(),
            skipped = self.deck.skipped.len(),
            "loaded presentation"
        );

        self.host.set_title(&self.title);
        self.render_active_layer();
        self.publish_status();

        if self.deck.is_empty() {
            self.camera.set_pose(CameraPose::IDENTITY);
        } else {
            self.focus_on_slide(0);
        }
    }

    /// Zoom onto slide `index`. Re-focusing the slide that is already
    /// zoomed in zooms back out to the grid.
    pub fn focus_on_slide(&mut self, index: usize) {
        if index >= self.deck.slide_count() {
            return;
        }
        if self.focus.zoomed_in && index == self.focus.current_slide {
            self.zoom_out_to_grid();
            return;
        }

        let Some(target) = self.focus_pose(index) else {
            return;
        };
        self.focus.current_slide = index;
        self.focus.zoomed_in = true;
        tracing::debug!(index, zoom = target.zoom, "focus slide");
        self.animate_to(target);
        self.publish_status();
        if !self.focus.overview {
            self.render_active_layer();
        }
    }

    /// Fit the whole slide grid into the viewport.
    pub fn zoom_out_to_grid(&mut self) {
        self.focus.zoomed_in = false;
        if self.deck.is_empty() {
            return;
        }
        let target = self.grid_pose();
        tracing::debug!(zoom = target.zoom, "zoom out to grid");
        self.animate_to(target);
    }

    /// Fit the outline list into the viewport. Leaves `zoomed_in` alone.
    pub fn show_overview(&mut self) {
        if let Some(target) = self.overview_pose() {
            tracing::debug!(zoom = target.zoom, "show overview");
            self.animate_to(target);
        }
    }

    /// Fit the layer on screen: the outline in overview, the grid otherwise.
    pub fn fit_view(&mut self) {
        if self.focus.overview {
            self.show_overview();
        } else {
            self.zoom_out_to_grid();
        }
    }

    pub fn toggle_overview(&mut self) {
        self.focus.overview = !self.focus.overview;
        self.focus.zoomed_in = false;
        self.render_active_layer();
        self.publish_status();
        if self.focus.overview {
            self.show_overview();
        } else {
            self.focus_on_slide(self.focus.current_slide);
        }
    }

    /// Leave the overview (without animating that step) and focus slide `index`.
    pub fn go_to_slide(&mut self, index: usize) {
        if index >= self.deck.slide_count() {
            return;
        }
        if self.focus.overview {
            self.focus.overview = false;
            self.render_active_layer();
        }
        self.focus_on_slide(index);
    }

    pub fn next_slide(&mut self) {
        let next = self.focus.current_slide + 1;
        if next < self.deck.slide_count() {
            self.go_to_slide(next);
        }
    }

    pub fn previous_slide(&mut self) {
        if let Some(prev) = self.focus.current_slide.checked_sub(1) {
            self.go_to_slide(prev);
        }
    }

    pub fn first_slide(&mut self) {
        self.go_to_slide(0);
    }

    pub fn last_slide(&mut self) {
        if let Some(last) = self.deck.slide_count().checked_sub(1) {
            self.go_to_slide(last);
        }
    }

    /// Jump to the slide an outline entry belongs to. Ignored mid-drag.
    pub fn activate_outline_item(&mut self, item_id: usize) {
        if self.gesture.is_dragging() {
            return;
        }
        let Some(slide_id) = self
            .deck
            .outline
            .iter()
            .find(|item| item.id == item_id)
            .map(|item| item.slide_id)
        else {
            return;
        };
        self.go_to_slide(slide_id);
    }

    pub fn zoom_in(&mut self) {
        self.zoom_at((self.viewport / 2.0).to_pos2(), ZOOM_IN_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.zoom_at((self.viewport / 2.0).to_pos2(), ZOOM_OUT_STEP);
    }

    /// Re-aim the camera at the current mode's target, e.g. after a resize.
    pub fn refit(&mut self) {
        let target = match self.focus.mode() {
            ViewMode::Overview => self.overview_pose(),
            ViewMode::Focused(index) => self.focus_pose(index),
            ViewMode::Grid if self.deck.is_empty() => None,
            ViewMode::Grid => Some(self.grid_pose()),
        };
        if let Some(target) = target {
            self.animate_to(target);
        }
    }

    /// Advance the animation by one frame. Returns whether it is still running.
    pub fn tick(&mut self, dt_ms: f32) -> bool {
        if let Some(pose) = self.animator.tick(dt_ms) {
            self.camera.set_pose(pose);
        }
        self.animator.is_animating()
    }

    /// What the active layer shows under viewport point `view`.
    pub fn hit_test(&self, view: Pos2) -> Option<Hit> {
        let content = self.camera.pose().view_to_content(view);
        if self.focus.overview {
            (0..self.deck.outline.len())
                .find(|&i| layout::outline_list_position(i).contains(content))
                .map(|i| Hit::OutlineItem(self.deck.outline[i].id))
        } else {
            self.deck
                .slides
                .iter()
                .find(|slide| slide.rect().contains(content))
                .map(|slide| Hit::Slide(slide.id))
        }
    }

    /// Pose that centers slide `index` at the largest zoom that keeps it
    /// within 80% of the viewport, capped at [`MAX_FOCUS_ZOOM`].
    pub fn focus_pose(&self, index: usize) -> Option<CameraPose> {
        let slide = self.deck.slides.get(index)?;
        let zoom = (FOCUS_VIEWPORT_FRACTION * self.viewport.x / slide.size.x)
            .min(FOCUS_VIEWPORT_FRACTION * self.viewport.y / slide.size.y)
            .min(MAX_FOCUS_ZOOM);
        Some(CameraPose::centered_on(slide.center(), zoom, self.viewport))
    }

    pub fn grid_pose(&self) -> CameraPose {
        CameraPose::fit(self.deck.bounds.rect(), self.viewport, MAX_FIT_ZOOM)
    }

    pub fn overview_pose(&self) -> Option<CameraPose> {
        layout::outline_bounds(self.deck.outline.len())
            .map(|rect| CameraPose::fit(rect, self.viewport, MAX_FIT_ZOOM))
    }

    // Direct camera control used by the input handlers. Each of these
    // invalidates any in-flight animation before touching the camera.

    pub(crate) fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        self.animator.cancel();
        self.camera.zoom_about(anchor, factor);
        self.focus.zoomed_in = false;
    }

    pub(crate) fn begin_gesture(&mut self, pointer: Pos2) {
        self.animator.cancel();
        self.gesture = Gesture::PressedCandidate {
            origin_pointer: pointer,
            origin_pan: self.camera.pose().pan,
        };
    }

    pub(crate) fn set_gesture(&mut self, gesture: Gesture) {
        self.gesture = gesture;
    }

    pub(crate) fn take_gesture(&mut self) -> Gesture {
        std::mem::replace(&mut self.gesture, Gesture::Idle)
    }

    pub(crate) fn drag_to(&mut self, origin_pointer: Pos2, origin_pan: Vec2, pointer: Pos2) {
        self.animator.cancel();
        self.camera.set_pan(origin_pan + (pointer - origin_pointer));
    }

    fn animate_to(&mut self, target: CameraPose) {
        self.animator.animate(self.camera.pose(), target);
    }

    fn publish_status(&mut self) {
        let status = self.status();
        self.host.show_status(&status);
    }

    fn render_active_layer(&mut self) {
        let layer = self.active_layer();
        self.host.render_layer(layer);
    }
}
