use eframe::egui;
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::Duration;

use crate::config::StartMode;
use crate::host::{HostUi, Layer, NavigationStatus};
use crate::input::{InputEvent, Key, Modifiers, PointerButton};
use crate::layout;
use crate::presenter::Presenter;
use crate::render;
use crate::theme::Theme;
use crate::watch::FileWatcher;

const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Settings resolved from CLI flags and config before the window opens.
#[derive(Debug, Clone)]
pub struct ViewerOptions {
    pub windowed: bool,
    pub start: StartMode,
    pub theme: String,
    pub animation_ms: f32,
}

/// What the presenter last pushed through [`HostUi`].
#[derive(Debug, Default)]
struct HudState {
    status: NavigationStatus,
    title: String,
    layer: Option<Layer>,
}

#[derive(Clone, Default)]
struct SharedHud(Rc<RefCell<HudState>>);

impl HostUi for SharedHud {
    fn show_status(&mut self, status: &NavigationStatus) {
        self.0.borrow_mut().status = *status;
    }

    fn set_title(&mut self, title: &str) {
        self.0.borrow_mut().title = title.to_string();
    }

    fn render_layer(&mut self, layer: Layer) {
        self.0.borrow_mut().layer = Some(layer);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ToolbarAction {
    Previous,
    Next,
    ToggleOverview,
    ZoomIn,
    ZoomOut,
    Fit,
}

struct ViewerApp {
    file: Option<PathBuf>,
    /// Document text waiting for the presenter to exist.
    pending: Option<String>,
    options: ViewerOptions,
    hud: SharedHud,
    theme: Theme,
    /// Built on the first frame that reports a usable canvas size, since
    /// slide size is derived from it.
    presenter: Option<Presenter>,
    watcher: Option<FileWatcher>,
    /// Canvas rect from the last frame, used for pointer coordinate conversion
    canvas: egui::Rect,
    last_size: Option<egui::Vec2>,
    window_title: String,
    show_hud: bool,
}

impl ViewerApp {
    fn new(file: Option<PathBuf>, content: Option<String>, options: ViewerOptions) -> Self {
        let watcher = file.as_deref().and_then(|path| match FileWatcher::new(path) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                tracing::warn!("live reload disabled: {e}");
                None
            }
        });
        Self {
            file,
            pending: content,
            theme: Theme::from_name(&options.theme),
            options,
            hud: SharedHud::default(),
            presenter: None,
            watcher,
            canvas: egui::Rect::ZERO,
            last_size: None,
            window_title: String::new(),
            show_hud: false,
        }
    }

    fn document_title(&self) -> String {
        match &self.file {
            Some(path) => window_title_for(path),
            None => crate::parser::SAMPLE_TITLE.to_string(),
        }
    }

    /// Build the presenter once the canvas has a real size.
    fn ensure_presenter(&mut self, ctx: &egui::Context, size: egui::Vec2) {
        if self.presenter.is_some() || size.x <= 0.0 || size.y <= 0.0 {
            return;
        }
        let built = Presenter::builder(size)
            .markdown_blocks()
            .host(self.hud.clone())
            .animation_ms(self.options.animation_ms)
            .build();
        let mut presenter = match built {
            Ok(presenter) => presenter,
            Err(e) => {
                tracing::error!("failed to start presenter: {e}");
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                return;
            }
        };
        if let Some(content) = self.pending.take() {
            presenter.load_document(&content, &self.document_title());
        }
        match self.options.start {
            StartMode::First => {}
            StartMode::Slide(n) => presenter.go_to_slide(n.saturating_sub(1)),
            StartMode::Overview => presenter.toggle_overview(),
        }
        self.last_size = Some(size);
        self.presenter = Some(presenter);
    }

    fn reload_if_changed(&mut self) {
        let Some(watcher) = &self.watcher else {
            return;
        };
        if !watcher.poll_changed() {
            return;
        }
        let path = watcher.path().to_path_buf();
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let title = self.document_title();
                if let Some(presenter) = self.presenter.as_mut() {
                    presenter.load_document(&content, &title);
                } else {
                    self.pending = Some(content);
                }
            }
            Err(e) => tracing::warn!("failed to reload {}: {e}", path.display()),
        }
    }

    fn apply_toolbar(&mut self, action: ToolbarAction) {
        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match action {
            ToolbarAction::Previous => presenter.previous_slide(),
            ToolbarAction::Next => presenter.next_slide(),
            ToolbarAction::ToggleOverview => presenter.toggle_overview(),
            ToolbarAction::ZoomIn => presenter.zoom_in(),
            ToolbarAction::ZoomOut => presenter.zoom_out(),
            ToolbarAction::Fit => presenter.fit_view(),
        }
    }

    fn draw_canvas(&self, painter: &egui::Painter, rect: egui::Rect) {
        let Some(presenter) = &self.presenter else {
            return;
        };
        let pose = presenter.camera_pose();
        let offset = rect.min.to_vec2();
        let current = presenter.focus().current_slide;

        let layer = self.hud.0.borrow().layer;
        match layer.unwrap_or_else(|| presenter.active_layer()) {
            Layer::Slides { focused } => {
                for slide in presenter.slides() {
                    let view = pose.rect_to_view(slide.rect()).translate(offset);
                    if view.intersects(rect) {
                        render::render_slide(
                            painter,
                            slide,
                            &self.theme,
                            view,
                            pose.zoom,
                            slide.id == focused,
                        );
                    }
                }
            }
            Layer::Outline => {
                for (i, item) in presenter.outline().iter().enumerate() {
                    let row = layout::outline_list_position(i);
                    let view = pose.rect_to_view(row).translate(offset);
                    if view.intersects(rect) {
                        render::render_outline_item(
                            painter,
                            item,
                            &self.theme,
                            view,
                            pose.zoom,
                            item.slide_id == current,
                        );
                    }
                }
            }
        }

        if presenter.slide_count() == 0 {
            let galley = painter.layout_no_wrap(
                "No slides".to_string(),
                egui::FontId::proportional(24.0),
                self.theme.foreground,
            );
            let pos = rect.center() - galley.rect.size() / 2.0;
            painter.galley(pos, galley, self.theme.foreground);
        }
    }

    fn draw_toolbar(&self, ctx: &egui::Context) -> Option<ToolbarAction> {
        let status = self.hud.0.borrow().status;
        let mut action = None;
        egui::Area::new(egui::Id::new("zoomdeck_toolbar"))
            .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -16.0))
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(status.prev_enabled, egui::Button::new("\u{25C0}"))
                            .clicked()
                        {
                            action = Some(ToolbarAction::Previous);
                        }
                        ui.label(status.counter_label());
                        if ui
                            .add_enabled(status.next_enabled, egui::Button::new("\u{25B6}"))
                            .clicked()
                        {
                            action = Some(ToolbarAction::Next);
                        }
                        ui.separator();
                        let outline_label = if status.overview { "Slides" } else { "Outline" };
                        if ui.button(outline_label).clicked() {
                            action = Some(ToolbarAction::ToggleOverview);
                        }
                        if ui.button("\u{2212}").clicked() {
                            action = Some(ToolbarAction::ZoomOut);
                        }
                        if ui.button("+").clicked() {
                            action = Some(ToolbarAction::ZoomIn);
                        }
                        if ui.button("Fit").clicked() {
                            action = Some(ToolbarAction::Fit);
                        }
                    });
                });
            });
        action
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let canvas = self.canvas;
        self.reload_if_changed();

        // Pointer presses and wheel over the toolbar belong to the toolbar.
        let over_ui = ctx.is_pointer_over_area();
        let mut events = Vec::new();
        let dt_ms = ctx.input(|i| {
            let hover = i.pointer.hover_pos();
            for event in &i.events {
                if let egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } = event
                {
                    if modifiers.ctrl || modifiers.mac_cmd {
                        continue;
                    }
                    match key {
                        egui::Key::Q => viewport_cmds.push(egui::ViewportCommand::Close),
                        egui::Key::F => viewport_cmds.push(egui::ViewportCommand::Fullscreen(
                            !i.viewport().fullscreen.unwrap_or(false),
                        )),
                        egui::Key::D => self.theme = self.theme.toggled(),
                        egui::Key::H => self.show_hud = !self.show_hud,
                        egui::Key::Escape => self.show_hud = false,
                        _ => {}
                    }
                }
                if let Some(input) = translate_event(event, canvas.min, hover, over_ui) {
                    events.push(input);
                }
            }
            i.stable_dt * 1000.0
        });

        // Send collected viewport commands outside the input closure
        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        if let Some(presenter) = self.presenter.as_mut() {
            let size = canvas.size();
            if self.last_size != Some(size) && size.x > 0.0 && size.y > 0.0 {
                presenter.set_viewport_size(size);
                presenter.refit();
                self.last_size = Some(size);
            }
            for event in events {
                presenter.handle_event(event);
            }
            if presenter.tick(dt_ms) {
                ctx.request_repaint();
            }
        }

        let title = self.hud.0.borrow().title.clone();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                self.canvas = rect;
                let painter = ui.painter_at(rect);
                self.draw_canvas(&painter, rect);
                if self.show_hud {
                    render::draw_hud(&painter, &self.theme, rect);
                }
            });

        if self.presenter.is_none() {
            self.ensure_presenter(ctx, self.canvas.size());
            ctx.request_repaint();
        }

        if let Some(action) = self.draw_toolbar(ctx) {
            self.apply_toolbar(action);
            ctx.request_repaint();
        }

        if self.watcher.is_some() {
            ctx.request_repaint_after(WATCH_POLL_INTERVAL);
        }
    }
}

fn window_title_for(path: &Path) -> String {
    format!(
        "zoomdeck \u{2014} {}",
        path.file_name().unwrap_or_default().to_string_lossy()
    )
}

fn map_modifiers(m: &egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.ctrl,
        meta: m.mac_cmd,
        alt: m.alt,
        shift: m.shift,
    }
}

fn map_key(key: egui::Key, shift: bool) -> Option<Key> {
    let key = match key {
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::PageUp => Key::PageUp,
        egui::Key::PageDown => Key::PageDown,
        egui::Key::Space => Key::Space,
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::O => Key::Char(if shift { 'O' } else { 'o' }),
        egui::Key::Plus => Key::Char('+'),
        egui::Key::Equals => Key::Char('='),
        egui::Key::Minus => Key::Char('-'),
        egui::Key::Num0 => Key::Char('0'),
        _ => return None,
    };
    Some(key)
}

fn map_button(button: egui::PointerButton) -> Option<PointerButton> {
    match button {
        egui::PointerButton::Primary => Some(PointerButton::Primary),
        egui::PointerButton::Secondary => Some(PointerButton::Secondary),
        egui::PointerButton::Middle => Some(PointerButton::Middle),
        _ => None,
    }
}

/// Translate one egui event into canvas-local core input. Positions are
/// shifted so the canvas origin is `(0, 0)`; egui's wheel delta is negated
/// so that positive means scrolling down. Wheel events carry no position of
/// their own and use `hover`.
fn translate_event(
    event: &egui::Event,
    origin: egui::Pos2,
    hover: Option<egui::Pos2>,
    over_ui: bool,
) -> Option<InputEvent> {
    let local = |pos: egui::Pos2| (pos - origin).to_pos2();
    match event {
        egui::Event::PointerMoved(pos) => Some(InputEvent::PointerMoved {
            pointer: local(*pos),
        }),
        egui::Event::PointerGone => Some(InputEvent::PointerLeft),
        egui::Event::PointerButton {
            pos,
            button,
            pressed,
            ..
        } => {
            let button = map_button(*button)?;
            if *pressed {
                if over_ui {
                    return None;
                }
                Some(InputEvent::PointerPressed {
                    pointer: local(*pos),
                    button,
                })
            } else if button == PointerButton::Secondary {
                Some(InputEvent::ContextMenu)
            } else {
                Some(InputEvent::PointerReleased {
                    pointer: local(*pos),
                    button,
                })
            }
        }
        egui::Event::MouseWheel { delta, .. } if !over_ui => wheel_event(*delta, origin, hover?),
        egui::Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } => Some(InputEvent::Key {
            key: map_key(*key, modifiers.shift)?,
            modifiers: map_modifiers(modifiers),
        }),
        _ => None,
    }
}

fn wheel_event(delta: egui::Vec2, origin: egui::Pos2, hover: egui::Pos2) -> Option<InputEvent> {
    Some(InputEvent::Wheel {
        delta_y: -delta.y,
        pointer: (hover - origin).to_pos2(),
    })
}

pub fn run(file: Option<PathBuf>, options: ViewerOptions) -> anyhow::Result<()> {
    let content = match &file {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
            if crate::parser::splitter::split(&content).is_empty() {
                tracing::warn!("no slides found in {}", path.display());
            }
            Some(content)
        }
        None => None,
    };

    let title = match &file {
        Some(path) => window_title_for(path),
        None => format!("zoomdeck \u{2014} {}", crate::parser::SAMPLE_TITLE),
    };

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(file, content, options)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
