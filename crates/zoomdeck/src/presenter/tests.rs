use std::cell::RefCell;
use std::rc::Rc;

use eframe::egui::{Pos2, Vec2, pos2, vec2};

use super::*;
use crate::error::RenderError;
use crate::input::{EventOutcome, InputEvent, Key, Modifiers, PointerButton};
use crate::parser::markdown::Markup;

const VIEWPORT: Vec2 = vec2(1000.0, 800.0);
const THREE_SLIDES: &str = "# One\n\nfirst\n\n---\n\n# Two\n## Two point five\n\n---\n\n# Three";

#[derive(Debug, Default)]
struct Recorded {
    statuses: Vec<NavigationStatus>,
    titles: Vec<String>,
    layers: Vec<Layer>,
}

#[derive(Clone, Default)]
struct RecordingHost(Rc<RefCell<Recorded>>);

impl HostUi for RecordingHost {
    fn show_status(&mut self, status: &NavigationStatus) {
        self.0.borrow_mut().statuses.push(*status);
    }

    fn set_title(&mut self, title: &str) {
        self.0.borrow_mut().titles.push(title.to_string());
    }

    fn render_layer(&mut self, layer: Layer) {
        self.0.borrow_mut().layers.push(layer);
    }
}

fn presenter() -> (Presenter, Rc<RefCell<Recorded>>) {
    let host = RecordingHost::default();
    let recorded = host.0.clone();
    let presenter = Presenter::builder(VIEWPORT)
        .markdown_blocks()
        .host(host)
        .build()
        .unwrap();
    (presenter, recorded)
}

fn with_document(document: &str) -> (Presenter, Rc<RefCell<Recorded>>) {
    let (mut p, recorded) = presenter();
    p.load_document(document, "Test");
    settle(&mut p);
    (p, recorded)
}

fn settle(p: &mut Presenter) {
    p.tick(60_000.0);
    assert!(!p.is_animating());
}

fn assert_close(a: Pos2, b: Pos2) {
    assert!(
        (a.x - b.x).abs() < 1e-2 && (a.y - b.y).abs() < 1e-2,
        "{a:?} != {b:?}"
    );
}

fn key(key: Key) -> InputEvent {
    InputEvent::Key {
        key,
        modifiers: Modifiers::NONE,
    }
}

fn press(pointer: Pos2) -> InputEvent {
    InputEvent::PointerPressed {
        pointer,
        button: PointerButton::Primary,
    }
}

fn release(pointer: Pos2) -> InputEvent {
    InputEvent::PointerReleased {
        pointer,
        button: PointerButton::Primary,
    }
}

// -- Construction --

#[test]
fn test_build_reports_every_missing_collaborator() {
    let err = Presenter::builder(VIEWPORT).build().unwrap_err();
    match &err {
        DeckError::MissingCollaborators { missing } => {
            assert_eq!(missing, &["renderer", "tokenizer", "host"]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "presenter is missing required collaborators: renderer, tokenizer, host"
    );
}

#[test]
fn test_build_without_host() {
    let err = Presenter::builder(VIEWPORT)
        .markdown_blocks()
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        DeckError::MissingCollaborators { ref missing } if missing == &["host"]
    ));
}

#[test]
fn test_build_rejects_empty_viewport() {
    let err = Presenter::builder(vec2(0.0, 600.0))
        .markdown_blocks()
        .host(RecordingHost::default())
        .build()
        .unwrap_err();
    assert!(matches!(err, DeckError::InvalidViewport { .. }));
}

#[test]
fn test_build_loads_sample_and_focuses_first_slide() {
    let (p, recorded) = presenter();
    assert_eq!(p.slide_count(), 4);
    assert_eq!(p.title(), SAMPLE_TITLE);
    assert_eq!(p.slide_size(), vec2(800.0, 640.0));
    assert_eq!(p.mode(), ViewMode::Focused(0));
    assert!(p.is_animating());
    assert_eq!(p.animation_target(), p.focus_pose(0));

    let recorded = recorded.borrow();
    assert_eq!(recorded.titles, vec![SAMPLE_TITLE.to_string()]);
    let last = recorded.statuses.last().unwrap();
    assert_eq!(last.counter_label(), "Slide 1 of 4");
    assert!(!last.prev_enabled);
    assert!(last.next_enabled);
}

// -- Loading --

#[test]
fn test_empty_document() {
    for document in ["", "  \n\t\n "] {
        let (mut p, recorded) = with_document(document);
        assert_eq!(p.slide_count(), 0);
        assert!(p.outline().is_empty());
        assert_eq!(p.bounds(), ContentBounds::ZERO);
        assert_eq!(p.camera_pose(), CameraPose::IDENTITY);

        let status = p.status();
        assert_eq!(status.counter_label(), "Slide 0 of 0");
        assert!(!status.prev_enabled);
        assert!(!status.next_enabled);
        assert_eq!(recorded.borrow().statuses.last(), Some(&status));

        let generation = p.animation_generation();
        p.go_to_slide(0);
        p.next_slide();
        p.previous_slide();
        p.last_slide();
        p.zoom_out_to_grid();
        p.show_overview();
        assert_eq!(p.animation_generation(), generation);
        assert!(!p.is_animating());
    }
}

#[test]
fn test_zoom_out_on_empty_deck_clears_zoomed_in() {
    let (mut p, _) = with_document("");
    p.focus.zoomed_in = true;
    p.zoom_out_to_grid();
    assert!(!p.focus().zoomed_in);
    assert!(!p.is_animating());
}

#[test]
fn test_three_slides_share_first_row() {
    let (p, _) = with_document(THREE_SLIDES);
    let slides = p.slides();
    assert_eq!(slides.len(), 3);
    let width = p.slide_size().x;
    for (i, slide) in slides.iter().enumerate() {
        assert_eq!(slide.id, i);
        assert_eq!(slide.position.y, slides[0].position.y);
        assert_eq!(
            slide.position.x,
            slides[0].position.x + i as f32 * (width + 150.0)
        );
    }
}

#[test]
fn test_load_document_resets_focus() {
    let (mut p, recorded) = with_document(THREE_SLIDES);
    p.go_to_slide(2);
    p.toggle_overview();
    p.load_document("# Alone", "Solo");
    assert_eq!(p.focus().current_slide, 0);
    assert_eq!(p.mode(), ViewMode::Focused(0));
    assert_eq!(p.title(), "Solo");
    assert_eq!(recorded.borrow().titles.last().map(String::as_str), Some("Solo"));
}

#[test]
fn test_reload_supersedes_running_animation() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.go_to_slide(2);
    p.tick(50.0);
    let before = p.animation_generation();
    p.load_document(THREE_SLIDES, "Again");
    assert!(p.animation_generation() > before);
    assert_eq!(p.animation_target(), p.focus_pose(0));
    settle(&mut p);
    assert_eq!(Some(p.camera_pose()), p.focus_pose(0));
}

/// Renderer that refuses any slide mentioning "draft".
struct NoDrafts;

impl MarkdownRenderer for NoDrafts {
    fn render(&self, text: &str) -> std::result::Result<Markup, RenderError> {
        if text.contains("draft") {
            Err(RenderError::Custom("draft slide".into()))
        } else {
            MarkdownBlocks.render(text)
        }
    }
}

#[test]
fn test_failed_segment_is_skipped() {
    let mut p = Presenter::builder(VIEWPORT)
        .renderer(NoDrafts)
        .tokenizer(MarkdownBlocks)
        .host(RecordingHost::default())
        .build()
        .unwrap();
    p.load_document("# One\n---\n# draft\n---\n# Three", "Test");
    assert_eq!(p.slide_count(), 2);
    assert_eq!(p.deck().skipped.len(), 1);
    assert_eq!(p.deck().skipped[0].segment, 1);
    assert_eq!(p.slides()[1].id, 1);
    assert_eq!(p.slides()[1].raw_text, "# Three");
    let slide_ids: Vec<usize> = p.outline().iter().map(|o| o.slide_id).collect();
    assert_eq!(slide_ids, vec![0, 1]);
}

#[test]
fn test_code_fence_split_by_slide_break_loses_nothing() {
    let (p, _) = with_document(
        "# Config\n\n```yaml\nname: x\n---\nname: y\n```\n\n---\n\n# Next\n\n```\nforgot to close",
    );
    assert!(p.deck().skipped.is_empty());
    assert_eq!(p.slide_count(), 3);
    let titles: Vec<&str> = p.outline().iter().map(|o| o.text.as_str()).collect();
    assert_eq!(titles, vec!["Config", "Next"]);
}

// -- Focus and navigation --

#[test]
fn test_focus_zoom_is_capped() {
    let (mut p, _) = with_document("# Only slide");
    for size in [vec2(320.0, 200.0), VIEWPORT, vec2(10_000.0, 10_000.0)] {
        p.set_viewport_size(size);
        p.focus_on_slide(0);
        if !p.focus().zoomed_in {
            p.focus_on_slide(0);
        }
        assert!(p.focus().zoomed_in);
        let target = p.animation_target().unwrap();
        assert!(target.zoom <= MAX_FOCUS_ZOOM, "zoom {} at {size:?}", target.zoom);
    }
}

#[test]
fn test_focus_centers_slide() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.go_to_slide(1);
    settle(&mut p);
    let center = p.slides()[1].center();
    assert_close(p.camera_pose().content_to_view(center), (VIEWPORT / 2.0).to_pos2());
}

#[test]
fn test_go_to_out_of_range_is_noop() {
    let (mut p, recorded) = with_document(THREE_SLIDES);
    p.go_to_slide(1);
    let generation = p.animation_generation();
    let statuses = recorded.borrow().statuses.len();
    p.go_to_slide(5);
    p.focus_on_slide(3);
    assert_eq!(p.focus().current_slide, 1);
    assert_eq!(p.animation_generation(), generation);
    assert_eq!(recorded.borrow().statuses.len(), statuses);
}

#[test]
fn test_refocus_zooms_out_to_grid() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.focus_on_slide(1);
    p.focus_on_slide(1);
    assert_eq!(p.mode(), ViewMode::Grid);
    assert_eq!(p.focus().current_slide, 1);
    assert_eq!(p.animation_target(), Some(p.grid_pose()));
}

#[test]
fn test_grid_fit_stays_at_or_below_full_size() {
    let (mut p, _) = with_document("# a\n---\n# b");
    p.set_viewport_size(vec2(8000.0, 8000.0));
    p.zoom_out_to_grid();
    assert_eq!(p.animation_target().unwrap().zoom, MAX_FIT_ZOOM);
}

#[test]
fn test_next_and_previous_stop_at_ends() {
    let (mut p, recorded) = with_document(THREE_SLIDES);
    p.previous_slide();
    assert_eq!(p.focus().current_slide, 0);
    p.next_slide();
    p.next_slide();
    assert_eq!(p.focus().current_slide, 2);
    let generation = p.animation_generation();
    p.next_slide();
    assert_eq!(p.focus().current_slide, 2);
    assert_eq!(p.animation_generation(), generation);

    let last = *recorded.borrow().statuses.last().unwrap();
    assert_eq!(last.counter_label(), "Slide 3 of 3");
    assert!(last.prev_enabled);
    assert!(!last.next_enabled);

    p.first_slide();
    assert_eq!(p.focus().current_slide, 0);
    p.last_slide();
    assert_eq!(p.focus().current_slide, 2);
}

// -- Overview --

#[test]
fn test_toggle_overview_twice_restores_focus() {
    let (mut p, recorded) = with_document(THREE_SLIDES);
    p.go_to_slide(1);
    let before = p.focus();

    p.toggle_overview();
    assert_eq!(p.mode(), ViewMode::Overview);
    assert_eq!(p.active_layer(), Layer::Outline);
    assert_eq!(p.animation_target(), p.overview_pose());
    assert_eq!(recorded.borrow().layers.last(), Some(&Layer::Outline));

    p.toggle_overview();
    assert_eq!(p.focus(), before);
    assert_eq!(p.animation_target(), p.focus_pose(1));
    assert_eq!(
        recorded.borrow().layers.last(),
        Some(&Layer::Slides { focused: 1 })
    );
}

#[test]
fn test_overview_fits_outline() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    settle(&mut p);
    let rect = layout::outline_bounds(p.outline().len()).unwrap();
    let view = p.camera_pose().rect_to_view(rect);
    assert!(view.min.x >= 49.9 && view.max.x <= VIEWPORT.x - 49.9);
    assert!(p.camera_pose().zoom <= MAX_FIT_ZOOM);
}

#[test]
fn test_fit_in_overview_keeps_outline_in_view() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    settle(&mut p);
    let outline_fit = p.camera_pose();

    assert_eq!(p.handle_event(key(Key::Char('0'))), EventOutcome::Consumed);
    settle(&mut p);
    assert!(p.focus().overview);
    assert_eq!(p.mode(), ViewMode::Overview);
    assert_eq!(Some(p.camera_pose()), p.overview_pose());
    assert_eq!(p.camera_pose(), outline_fit);

    p.toggle_overview();
    settle(&mut p);
    p.fit_view();
    settle(&mut p);
    assert_eq!(p.mode(), ViewMode::Grid);
    assert_eq!(p.camera_pose(), p.grid_pose());
}

#[test]
fn test_activate_outline_item_leaves_overview() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    let item = p.outline().iter().find(|i| i.text == "Three").unwrap().clone();
    p.activate_outline_item(item.id);
    assert!(!p.focus().overview);
    assert_eq!(p.mode(), ViewMode::Focused(item.slide_id));
    assert_eq!(p.active_layer(), Layer::Slides { focused: 2 });
}

#[test]
fn test_activate_unknown_outline_item() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    let generation = p.animation_generation();
    p.activate_outline_item(99);
    assert!(p.focus().overview);
    assert_eq!(p.animation_generation(), generation);
}

#[test]
fn test_go_to_slide_from_overview() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    p.go_to_slide(2);
    assert!(!p.focus().overview);
    assert_eq!(p.mode(), ViewMode::Focused(2));
}

// -- Resizing and manual zoom --

#[test]
fn test_resize_keeps_slide_size() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let size = p.slide_size();
    p.set_viewport_size(vec2(1920.0, 1080.0));
    assert_eq!(p.slide_size(), size);
    assert_eq!(p.viewport(), vec2(1920.0, 1080.0));
    p.set_viewport_size(vec2(-1.0, 10.0));
    assert_eq!(p.viewport(), vec2(1920.0, 1080.0));
}

#[test]
fn test_refit_targets_current_mode() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.set_viewport_size(vec2(1920.0, 1080.0));
    p.refit();
    assert_eq!(p.animation_target(), p.focus_pose(0));

    p.zoom_out_to_grid();
    settle(&mut p);
    p.set_viewport_size(VIEWPORT);
    p.refit();
    assert_eq!(p.animation_target(), Some(p.grid_pose()));
}

#[test]
fn test_zoom_buttons_keep_center_fixed() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let center = (VIEWPORT / 2.0).to_pos2();
    let under = p.camera_pose().view_to_content(center);
    let zoom = p.camera_pose().zoom;

    p.zoom_in();
    assert!((p.camera_pose().zoom - zoom * ZOOM_IN_STEP).abs() < 1e-5);
    assert_close(p.camera_pose().content_to_view(under), center);
    assert!(!p.focus().zoomed_in);

    p.zoom_out();
    assert_close(p.camera_pose().content_to_view(under), center);
}

// -- Input --

#[test]
fn test_wheel_zoom_keeps_pointer_anchor() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let pointer = pos2(123.0, 456.0);
    let under = p.camera_pose().view_to_content(pointer);
    let zoom = p.camera_pose().zoom;

    let outcome = p.handle_event(InputEvent::Wheel {
        delta_y: -120.0,
        pointer,
    });
    assert_eq!(outcome, EventOutcome::Consumed);
    assert!(p.camera_pose().zoom > zoom);
    assert_close(p.camera_pose().content_to_view(under), pointer);

    p.handle_event(InputEvent::Wheel {
        delta_y: 120.0,
        pointer,
    });
    assert_close(p.camera_pose().content_to_view(under), pointer);
}

#[test]
fn test_wheel_without_delta_is_ignored() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let pose = p.camera_pose();
    let outcome = p.handle_event(InputEvent::Wheel {
        delta_y: 0.0,
        pointer: pos2(1.0, 1.0),
    });
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(p.camera_pose(), pose);
}

#[test]
fn test_wheel_cancels_animation() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.go_to_slide(2);
    assert!(p.is_animating());
    p.handle_event(InputEvent::Wheel {
        delta_y: 1.0,
        pointer: pos2(10.0, 10.0),
    });
    assert!(!p.is_animating());
    let pose = p.camera_pose();
    p.tick(16.0);
    assert_eq!(p.camera_pose(), pose);
}

#[test]
fn test_small_movement_stays_a_click_candidate() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let pose = p.camera_pose();
    let origin = pos2(400.0, 300.0);
    p.handle_event(press(origin));
    p.handle_event(InputEvent::PointerMoved {
        pointer: origin + vec2(3.0, 3.0),
    });
    assert!(matches!(p.gesture(), Gesture::PressedCandidate { .. }));
    assert_eq!(p.camera_pose(), pose);
}

#[test]
fn test_drag_pans_and_does_not_click() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.zoom_out_to_grid();
    settle(&mut p);
    let pose = p.camera_pose();
    let slide_center = pose.content_to_view(p.slides()[1].center());

    p.handle_event(press(slide_center));
    p.handle_event(InputEvent::PointerMoved {
        pointer: slide_center + vec2(40.0, -10.0),
    });
    assert!(p.gesture().is_dragging());
    assert_close(
        p.camera_pose().pan.to_pos2(),
        (pose.pan + vec2(40.0, -10.0)).to_pos2(),
    );

    p.handle_event(release(slide_center + vec2(40.0, -10.0)));
    assert_eq!(*p.gesture(), Gesture::Idle);
    assert_eq!(p.mode(), ViewMode::Grid);
    assert_eq!(p.focus().current_slide, 0);
}

#[test]
fn test_navigation_during_drag_does_not_fight_the_pointer() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.handle_event(press(pos2(500.0, 400.0)));
    p.handle_event(InputEvent::PointerMoved {
        pointer: pos2(520.0, 400.0),
    });
    assert!(p.gesture().is_dragging());
    let origin_pan = p.camera_pose().pan - vec2(20.0, 0.0);

    p.handle_event(key(Key::ArrowRight));
    assert!(p.is_animating());

    p.handle_event(InputEvent::PointerMoved {
        pointer: pos2(600.0, 400.0),
    });
    assert!(!p.is_animating());
    let dragged = p.camera_pose();
    assert_close(dragged.pan.to_pos2(), (origin_pan + vec2(100.0, 0.0)).to_pos2());

    assert!(!p.tick(16.0));
    assert_eq!(p.camera_pose(), dragged);
}

#[test]
fn test_click_focuses_slide_under_pointer() {
    let (mut p, recorded) = with_document(THREE_SLIDES);
    p.zoom_out_to_grid();
    settle(&mut p);
    let target = p.camera_pose().content_to_view(p.slides()[2].center());

    p.handle_event(press(target));
    p.handle_event(InputEvent::PointerMoved {
        pointer: target + vec2(2.0, 0.0),
    });
    p.handle_event(release(target + vec2(2.0, 0.0)));
    assert_eq!(p.mode(), ViewMode::Focused(2));
    assert_eq!(
        recorded.borrow().statuses.last().unwrap().counter_label(),
        "Slide 3 of 3"
    );
}

#[test]
fn test_click_on_empty_space_does_nothing() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.zoom_out_to_grid();
    settle(&mut p);
    let generation = p.animation_generation();
    p.handle_event(press(pos2(1.0, 1.0)));
    p.handle_event(release(pos2(1.0, 1.0)));
    assert_eq!(p.mode(), ViewMode::Grid);
    // Only the press invalidated the (finished) animation.
    assert_eq!(p.animation_generation(), generation + 1);
}

#[test]
fn test_click_in_overview_activates_outline_item() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.toggle_overview();
    settle(&mut p);
    let index = p.outline().iter().position(|i| i.slide_id == 1).unwrap();
    let row = layout::outline_list_position(index);
    let pointer = p.camera_pose().content_to_view(row.center());

    assert_eq!(p.hit_test(pointer), Some(Hit::OutlineItem(p.outline()[index].id)));
    p.handle_event(press(pointer));
    p.handle_event(release(pointer));
    assert!(!p.focus().overview);
    assert_eq!(p.mode(), ViewMode::Focused(1));
}

#[test]
fn test_leaving_viewport_ends_drag() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.handle_event(press(pos2(100.0, 100.0)));
    p.handle_event(InputEvent::PointerMoved {
        pointer: pos2(200.0, 100.0),
    });
    assert_eq!(p.handle_event(InputEvent::PointerLeft), EventOutcome::Consumed);
    assert_eq!(*p.gesture(), Gesture::Idle);
    assert_eq!(p.handle_event(release(pos2(200.0, 100.0))), EventOutcome::Ignored);
    assert_eq!(p.mode(), ViewMode::Focused(0));
}

#[test]
fn test_secondary_button_is_ignored() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let outcome = p.handle_event(InputEvent::PointerPressed {
        pointer: pos2(10.0, 10.0),
        button: PointerButton::Secondary,
    });
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(*p.gesture(), Gesture::Idle);
    assert_eq!(p.handle_event(InputEvent::ContextMenu), EventOutcome::Consumed);
}

#[test]
fn test_keyboard_navigation() {
    let (mut p, _) = with_document(THREE_SLIDES);
    p.handle_event(key(Key::ArrowRight));
    assert_eq!(p.focus().current_slide, 1);
    p.handle_event(key(Key::Space));
    assert_eq!(p.focus().current_slide, 2);
    p.handle_event(key(Key::PageUp));
    assert_eq!(p.focus().current_slide, 1);
    p.handle_event(key(Key::Home));
    assert_eq!(p.focus().current_slide, 0);
    p.handle_event(key(Key::End));
    assert_eq!(p.focus().current_slide, 2);
    p.handle_event(key(Key::Char('0')));
    assert_eq!(p.mode(), ViewMode::Grid);
    assert_eq!(p.handle_event(key(Key::Char('q'))), EventOutcome::Ignored);
}

#[test]
fn test_command_chords_are_left_alone() {
    let (mut p, _) = with_document(THREE_SLIDES);
    let ctrl = Modifiers {
        ctrl: true,
        ..Modifiers::NONE
    };
    let outcome = p.handle_event(InputEvent::Key {
        key: Key::ArrowRight,
        modifiers: ctrl,
    });
    assert_eq!(outcome, EventOutcome::Ignored);
    assert_eq!(p.focus().current_slide, 0);

    let shift = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };
    p.handle_event(InputEvent::Key {
        key: Key::Char('O'),
        modifiers: shift,
    });
    assert_eq!(p.mode(), ViewMode::Overview);
}
