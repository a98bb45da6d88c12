pub mod text;

use eframe::egui::{self, FontId, Painter, Pos2, Rect, Stroke, StrokeKind};

use crate::parser::{OutlineItem, Slide};
use crate::theme::Theme;

/// Content-space padding between a slide's edge and its text.
pub const SLIDE_PADDING: f32 = 40.0;
/// Below this on-screen body size, slide text is not laid out at all.
pub const MIN_LEGIBLE_FONT: f32 = 3.0;

pub fn is_legible(theme: &Theme, scale: f32) -> bool {
    theme.body_size * scale >= MIN_LEGIBLE_FONT
}

/// Paint one slide card into `rect` (viewport coordinates) at `scale`.
pub fn render_slide(
    painter: &Painter,
    slide: &Slide,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    focused: bool,
) {
    let rounding = 8.0 * scale;
    painter.rect_filled(rect, rounding, theme.slide_background);
    let border = if focused {
        Stroke::new(3.0, theme.accent)
    } else {
        Stroke::new(1.0, theme.slide_border)
    };
    painter.rect_stroke(rect, rounding, border, StrokeKind::Inside);

    if !is_legible(theme, scale) {
        return;
    }

    let padding = SLIDE_PADDING * scale;
    let content = rect.shrink(padding);
    let clipped = painter.with_clip_rect(content.intersect(painter.clip_rect()));
    text::draw_blocks(
        &clipped,
        &slide.markup.blocks,
        theme,
        content.left_top(),
        content.width(),
        content.bottom(),
        1.0,
        scale,
    );

    let badge = painter.layout_no_wrap(
        format!("{}", slide.id + 1),
        FontId::proportional(14.0 * scale),
        Theme::with_opacity(theme.foreground, 0.5),
    );
    let badge_pos = Pos2::new(
        rect.right() - padding * 0.5 - badge.rect.width(),
        rect.bottom() - padding * 0.5 - badge.rect.height(),
    );
    painter.galley(badge_pos, badge, theme.foreground);
}

/// Paint one outline row into `rect` (viewport coordinates).
pub fn render_outline_item(
    painter: &Painter,
    item: &OutlineItem,
    theme: &Theme,
    rect: Rect,
    scale: f32,
    current: bool,
) {
    let rounding = 6.0 * scale;
    painter.rect_filled(rect, rounding, theme.outline_background);
    if current {
        painter.rect_stroke(rect, rounding, Stroke::new(2.0, theme.accent), StrokeKind::Inside);
    }

    let font_size = if item.level <= 1 {
        theme.body_size * 1.2
    } else {
        theme.body_size
    } * scale;
    if font_size < MIN_LEGIBLE_FONT {
        return;
    }

    let indent = (16.0 + theme.outline_indent(item.level)) * scale;
    let color = if item.level <= 1 {
        theme.heading_color
    } else {
        theme.foreground
    };
    let galley = painter.layout_no_wrap(item.text.clone(), FontId::proportional(font_size), color);
    let pos = Pos2::new(
        rect.left() + indent,
        rect.center().y - galley.rect.height() / 2.0,
    );
    painter
        .with_clip_rect(rect.intersect(painter.clip_rect()))
        .galley(pos, galley, color);

    let slide_label = painter.layout_no_wrap(
        format!("slide {}", item.slide_id + 1),
        FontId::proportional(theme.code_size * scale),
        Theme::with_opacity(theme.foreground, 0.5),
    );
    let label_pos = Pos2::new(
        rect.right() - 16.0 * scale - slide_label.rect.width(),
        rect.center().y - slide_label.rect.height() / 2.0,
    );
    painter.galley(label_pos, slide_label, theme.foreground);
}

/// Keyboard reference drawn over the canvas.
pub fn draw_hud(painter: &Painter, theme: &Theme, rect: Rect) {
    let shortcuts = [
        ("Space / \u{2192} / PgDn", "Next slide"),
        ("\u{2190} / PgUp", "Previous slide"),
        ("Home / End", "First / last slide"),
        ("O", "Toggle outline overview"),
        ("+ / -", "Zoom in / out"),
        ("0", "Fit grid (or outline)"),
        ("Wheel", "Zoom at pointer"),
        ("Drag", "Pan"),
        ("Click", "Focus slide / outline entry"),
        ("D", "Toggle theme"),
        ("F", "Toggle fullscreen"),
        ("H", "Toggle this HUD"),
        ("Q", "Quit"),
    ];

    let bg = Theme::with_opacity(theme.code_background, 0.92);
    let text_color = Theme::with_opacity(theme.foreground, 0.9);
    let key_color = Theme::with_opacity(theme.accent, 0.9);

    let padding = 24.0;
    let line_height = 28.0;
    let height = shortcuts.len() as f32 * line_height + padding * 2.0 + 40.0;
    let hud_rect = Rect::from_center_size(rect.center(), egui::vec2(380.0, height));
    painter.rect_filled(hud_rect, 12.0, bg);

    let title = painter.layout_no_wrap(
        "Keyboard Shortcuts".to_string(),
        FontId::proportional(20.0),
        theme.heading_color,
    );
    painter.galley(
        Pos2::new(hud_rect.left() + padding, hud_rect.top() + padding),
        title,
        text_color,
    );

    let mut y = hud_rect.top() + padding + 40.0;
    for (key, desc) in shortcuts {
        let key_galley = painter.layout_no_wrap(key.to_string(), FontId::monospace(14.0), key_color);
        painter.galley(Pos2::new(hud_rect.left() + padding, y), key_galley, key_color);
        let desc_galley =
            painter.layout_no_wrap(desc.to_string(), FontId::proportional(14.0), text_color);
        painter.galley(
            Pos2::new(hud_rect.left() + padding + 170.0, y),
            desc_galley,
            text_color,
        );
        y += line_height;
    }
}
