//! Input dispatch.
//!
//! Hosts translate their native events into [`InputEvent`]s and feed them to
//! [`Presenter::handle_event`]. Wheel and drag mutate the camera directly;
//! clicks and keys go through the presenter's navigation operations.

use eframe::egui::{Pos2, Vec2};

use crate::presenter::{Hit, Presenter};

/// Pointer travel (in viewport units) that turns a press into a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;
pub const WHEEL_ZOOM_OUT: f32 = 0.9;
pub const WHEEL_ZOOM_IN: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Space,
    Home,
    End,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        ctrl: false,
        meta: false,
        alt: false,
        shift: false,
    };

    /// Held modifiers that turn a key into someone else's shortcut.
    pub fn is_command(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// Pointer positions are in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Positive `delta_y` scrolls down, i.e. zooms out.
    Wheel { delta_y: f32, pointer: Pos2 },
    PointerPressed { pointer: Pos2, button: PointerButton },
    PointerMoved { pointer: Pos2 },
    PointerReleased { pointer: Pos2, button: PointerButton },
    PointerLeft,
    Key { key: Key, modifiers: Modifiers },
    ContextMenu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// The event was handled; the host should suppress its default action.
    Consumed,
    Ignored,
}

/// Primary-pointer gesture tracking.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// Pressed, not yet moved past [`DRAG_THRESHOLD`]: releasing here is a click.
    PressedCandidate { origin_pointer: Pos2, origin_pan: Vec2 },
    /// Moved past the threshold: releasing here ends a drag.
    Dragging { origin_pointer: Pos2, origin_pan: Vec2 },
}

impl Gesture {
    pub fn is_dragging(&self) -> bool {
        matches!(self, Gesture::Dragging { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Next,
    Previous,
    ToggleOverview,
    First,
    Last,
    ZoomIn,
    ZoomOut,
    Fit,
}

/// Keyboard bindings.
pub fn key_action(key: Key) -> Option<KeyAction> {
    let action = match key {
        Key::ArrowRight | Key::PageDown | Key::Space | Key::Char(' ') => KeyAction::Next,
        Key::ArrowLeft | Key::PageUp => KeyAction::Previous,
        Key::Char('o' | 'O') => KeyAction::ToggleOverview,
        Key::Home => KeyAction::First,
        Key::End => KeyAction::Last,
        Key::Char('+' | '=') => KeyAction::ZoomIn,
        Key::Char('-') => KeyAction::ZoomOut,
        Key::Char('0') => KeyAction::Fit,
        Key::Char(_) => return None,
    };
    Some(action)
}

impl Presenter {
    pub fn handle_event(&mut self, event: InputEvent) -> EventOutcome {
        match event {
            InputEvent::Wheel { delta_y, pointer } => self.on_wheel(delta_y, pointer),
            InputEvent::PointerPressed { pointer, button } => self.on_press(pointer, button),
            InputEvent::PointerMoved { pointer } => self.on_move(pointer),
            InputEvent::PointerReleased { pointer, button } => self.on_release(pointer, button),
            InputEvent::PointerLeft => self.on_leave(),
            InputEvent::Key { key, modifiers } => self.on_key(key, modifiers),
            // Reserved: the surface never shows a context menu.
            InputEvent::ContextMenu => EventOutcome::Consumed,
        }
    }

    fn on_wheel(&mut self, delta_y: f32, pointer: Pos2) -> EventOutcome {
        if delta_y == 0.0 {
            return EventOutcome::Ignored;
        }
        let factor = if delta_y > 0.0 {
            WHEEL_ZOOM_OUT
        } else {
            WHEEL_ZOOM_IN
        };
        self.zoom_at(pointer, factor);
        EventOutcome::Consumed
    }

    fn on_press(&mut self, pointer: Pos2, button: PointerButton) -> EventOutcome {
        if button != PointerButton::Primary {
            return EventOutcome::Ignored;
        }
        self.begin_gesture(pointer);
        EventOutcome::Consumed
    }

    fn on_move(&mut self, pointer: Pos2) -> EventOutcome {
        match *self.gesture() {
            Gesture::Idle => EventOutcome::Ignored,
            Gesture::PressedCandidate {
                origin_pointer,
                origin_pan,
            } => {
                if origin_pointer.distance(pointer) > DRAG_THRESHOLD {
                    tracing::trace!("drag started");
                    self.set_gesture(Gesture::Dragging {
                        origin_pointer,
                        origin_pan,
                    });
                    self.drag_to(origin_pointer, origin_pan, pointer);
                }
                EventOutcome::Consumed
            }
            Gesture::Dragging {
                origin_pointer,
                origin_pan,
            } => {
                self.drag_to(origin_pointer, origin_pan, pointer);
                EventOutcome::Consumed
            }
        }
    }

    fn on_release(&mut self, pointer: Pos2, button: PointerButton) -> EventOutcome {
        if button != PointerButton::Primary && !self.gesture().is_dragging() {
            return EventOutcome::Ignored;
        }
        match self.take_gesture() {
            Gesture::Idle => EventOutcome::Ignored,
            Gesture::PressedCandidate { .. } => {
                self.click(pointer);
                EventOutcome::Consumed
            }
            Gesture::Dragging { .. } => EventOutcome::Consumed,
        }
    }

    fn on_leave(&mut self) -> EventOutcome {
        match self.take_gesture() {
            Gesture::Idle => EventOutcome::Ignored,
            _ => EventOutcome::Consumed,
        }
    }

    fn on_key(&mut self, key: Key, modifiers: Modifiers) -> EventOutcome {
        if modifiers.is_command() {
            return EventOutcome::Ignored;
        }
        let Some(action) = key_action(key) else {
            return EventOutcome::Ignored;
        };
        match action {
            KeyAction::Next => self.next_slide(),
            KeyAction::Previous => self.previous_slide(),
            KeyAction::ToggleOverview => self.toggle_overview(),
            KeyAction::First => self.first_slide(),
            KeyAction::Last => self.last_slide(),
            KeyAction::ZoomIn => self.zoom_in(),
            KeyAction::ZoomOut => self.zoom_out(),
            KeyAction::Fit => self.fit_view(),
        }
        EventOutcome::Consumed
    }

    fn click(&mut self, pointer: Pos2) {
        match self.hit_test(pointer) {
            Some(Hit::Slide(index)) => self.focus_on_slide(index),
            Some(Hit::OutlineItem(id)) => self.activate_outline_item(id),
            None => {}
        }
    }
}
