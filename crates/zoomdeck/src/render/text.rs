use crate::parser::markdown::Block;
use crate::theme::Theme;
use eframe::egui::{self, Color32, FontId, Painter, Pos2, Stroke};

/// Layout and paint a wrapped run of text, returning the height used.
pub fn draw_text(
    painter: &Painter,
    text: &str,
    pos: Pos2,
    font: FontId,
    color: Color32,
    max_width: f32,
) -> f32 {
    let galley = painter.layout(text.to_string(), font, color, max_width);
    let height = galley.rect.height();
    painter.galley(pos, galley, color);
    height
}

/// Draw a heading block. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_heading(
    painter: &Painter,
    text: &str,
    level: u8,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let size = theme.heading_size(level) * scale;
    let color = Theme::with_opacity(theme.heading_color, opacity);
    draw_text(painter, text, pos, FontId::proportional(size), color, max_width)
}

/// Draw a paragraph. Returns height used.
pub fn draw_paragraph(
    painter: &Painter,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    let font = FontId::proportional(theme.body_size * scale);
    draw_text(painter, text, pos, font, color, max_width)
}

/// Draw a flat list. Returns height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_list(
    painter: &Painter,
    items: &[String],
    ordered: bool,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let color = Theme::with_opacity(theme.foreground, opacity);
    let marker_width = 32.0 * scale;
    let item_spacing = 6.0 * scale;
    let font_size = theme.body_size * scale;
    let mut y_offset = 0.0;

    for (idx, item) in items.iter().enumerate() {
        let marker = if ordered {
            format!("{}.", idx + 1)
        } else {
            "\u{2022}".to_string()
        };
        let marker_pos = Pos2::new(pos.x, pos.y + y_offset);
        let marker_galley = painter.layout_no_wrap(marker, FontId::proportional(font_size), color);
        painter.galley(marker_pos, marker_galley, color);

        let text_pos = Pos2::new(pos.x + marker_width, pos.y + y_offset);
        let text_height = draw_text(
            painter,
            item,
            text_pos,
            FontId::proportional(font_size),
            color,
            max_width - marker_width,
        );
        y_offset += text_height + item_spacing;
    }

    y_offset
}

/// Draw a code block on a tinted background. Returns height used.
pub fn draw_code_block(
    painter: &Painter,
    code: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let padding = 12.0 * scale;
    let bg_color = Theme::with_opacity(theme.code_background, opacity);
    let color = Theme::with_opacity(theme.code_foreground, opacity);

    let galley = painter.layout(
        code.to_string(),
        FontId::monospace(theme.code_size * scale),
        color,
        max_width - padding * 2.0,
    );
    let total_height = galley.rect.height() + padding * 2.0;

    let bg_rect = egui::Rect::from_min_size(pos, egui::vec2(max_width, total_height));
    painter.rect_filled(bg_rect, 6.0 * scale, bg_color);
    painter.galley(Pos2::new(pos.x + padding, pos.y + padding), galley, color);

    total_height
}

/// Draw a blockquote with an accent bar. Returns height used.
pub fn draw_blockquote(
    painter: &Painter,
    text: &str,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let accent = Theme::with_opacity(theme.accent, opacity);
    let color = Theme::with_opacity(theme.foreground, opacity);
    let bar_width = 4.0 * scale;
    let bar_padding = 14.0 * scale;
    let font = FontId::proportional(theme.body_size * 1.1 * scale);

    let text_pos = Pos2::new(pos.x + bar_width + bar_padding, pos.y);
    let height = draw_text(
        painter,
        text,
        text_pos,
        font,
        color,
        max_width - bar_width - bar_padding,
    );

    let bar_rect = egui::Rect::from_min_size(pos, egui::vec2(bar_width, height));
    painter.rect_filled(bar_rect, 2.0, accent);

    height
}

pub fn draw_block(
    painter: &Painter,
    block: &Block,
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    match block {
        Block::Heading { level, text } => {
            draw_heading(painter, text, *level, theme, pos, max_width, opacity, scale)
        }
        Block::Paragraph { text } => {
            draw_paragraph(painter, text, theme, pos, max_width, opacity, scale)
        }
        Block::List { ordered, items } => {
            draw_list(painter, items, *ordered, theme, pos, max_width, opacity, scale)
        }
        Block::CodeBlock { code, .. } => {
            draw_code_block(painter, code, theme, pos, max_width, opacity, scale)
        }
        Block::BlockQuote { text } => {
            draw_blockquote(painter, text, theme, pos, max_width, opacity, scale)
        }
        Block::HorizontalRule => {
            let color = Theme::with_opacity(theme.accent, opacity * 0.5);
            let y = pos.y + 8.0 * scale;
            painter.line_segment(
                [Pos2::new(pos.x, y), Pos2::new(pos.x + max_width, y)],
                Stroke::new(1.0, color),
            );
            16.0 * scale
        }
    }
}

/// Draw all blocks top to bottom, stopping once past `bottom`. Returns the
/// total height used.
#[allow(clippy::too_many_arguments)]
pub fn draw_blocks(
    painter: &Painter,
    blocks: &[Block],
    theme: &Theme,
    pos: Pos2,
    max_width: f32,
    bottom: f32,
    opacity: f32,
    scale: f32,
) -> f32 {
    let block_spacing = 16.0 * scale;
    let mut y_offset = 0.0;

    for block in blocks {
        let block_pos = Pos2::new(pos.x, pos.y + y_offset);
        if block_pos.y > bottom {
            break;
        }
        let height = draw_block(painter, block, theme, block_pos, max_width, opacity, scale);
        y_offset += height + block_spacing;
    }

    y_offset
}
