use colored::Colorize;
use std::path::Path;

use crate::parser::markdown::MarkdownBlocks;
use crate::parser::{self, ParsedDeck};
use crate::presenter::{FALLBACK_VIEWPORT, SLIDE_VIEWPORT_FRACTION};

pub fn run(file: &Path) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }
    let content = std::fs::read_to_string(file)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", file.display()))?;
    let slide_size = FALLBACK_VIEWPORT * SLIDE_VIEWPORT_FRACTION;
    let deck = parser::parse(&content, slide_size, &MarkdownBlocks, &MarkdownBlocks);

    println!("{} {}", "Outline:".bold(), file.display());
    println!();
    print!("{}", format_outline(&deck));
    Ok(())
}

/// Human-readable listing of every slide with its headings, followed by any
/// segments that failed to render.
pub fn format_outline(deck: &ParsedDeck) -> String {
    let mut out = String::new();
    if deck.is_empty() {
        out.push_str(&format!("{}\n", "No slides found.".yellow()));
    }

    for slide in &deck.slides {
        let headings: Vec<_> = deck
            .outline
            .iter()
            .filter(|item| item.slide_id == slide.id)
            .collect();
        let label = format!("Slide {}", slide.id + 1);
        let pos = slide.position;
        out.push_str(&format!(
            "{} {}\n",
            label.cyan().bold(),
            format!("at ({:.0}, {:.0})", pos.x, pos.y).dimmed()
        ));
        if headings.is_empty() {
            out.push_str(&format!("    {}\n", "(no headings)".dimmed()));
        }
        for item in headings {
            let indent = "  ".repeat(usize::from(item.level.saturating_sub(1)));
            out.push_str(&format!(
                "    {indent}{} {}\n",
                "#".repeat(usize::from(item.level)).dimmed(),
                item.text
            ));
        }
    }

    for skipped in &deck.skipped {
        out.push_str(&format!(
            "{} {}\n",
            format!("Skipped segment {}:", skipped.segment + 1).red(),
            skipped.error
        ));
    }

    let summary = format!(
        "{} slides, {} headings",
        deck.slide_count(),
        deck.outline.len()
    );
    out.push_str(&format!("\n{}\n", summary.bold()));
    let bounds = deck.bounds;
    if !bounds.is_empty() {
        out.push_str(&format!(
            "{}\n",
            format!("canvas {:.0} x {:.0}", bounds.max_x, bounds.max_y).dimmed()
        ));
    }
    out
}
