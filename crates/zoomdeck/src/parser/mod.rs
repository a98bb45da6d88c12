pub mod markdown;
pub mod splitter;

use eframe::egui::{Pos2, Rect, Vec2};

use crate::error::{DeckError, RenderError};
use crate::layout::{self, ContentBounds};
use markdown::{HeadingTokenizer, Markup, MarkdownRenderer, TokenKind};

pub const SAMPLE_TITLE: &str = "Hegel's Dialectical Method";

/// Built-in deck shown until a file is loaded.
pub const SAMPLE_DOCUMENT: &str = "# Hegel's Dialectical Method
## A Journey Through Philosophical Development

Welcome to an interactive exploration of G.W.F. Hegel's revolutionary approach to understanding reality, consciousness, and historical development.

---

## The Structure of Dialectical Thinking

### Thesis → Antithesis → Synthesis

Hegel's dialectical method reveals how:
- **Thesis**: An initial position or concept
- **Antithesis**: The negation or contradiction of the thesis
- **Synthesis**: A higher unity that preserves and transcends both.

This process is not merely logical but ontological, driving change and development in all spheres.

---

## Key Concepts

### Aufhebung (Sublation)
This crucial term means to simultaneously:
1.  Negate or abolish
2.  Preserve or keep
3.  Lift up or elevate

It captures the dynamic nature of synthesis.

### Spirit (Geist)
For Hegel, Spirit refers to the collective consciousness and culture of humanity, evolving through dialectical stages.

---

## Conclusion: The End of History?

For Hegel, \"Absolute Knowing\" represented a kind of culmination, where Spirit fully understands itself.
- This doesn't mean events stop, but that the fundamental principles of reality and freedom are comprehended.
- The ongoing dialectic continues within this achieved understanding.";

#[derive(Debug, Clone)]
pub struct Slide {
    /// 0-based position in document order, counting only rendered slides.
    pub id: usize,
    /// The trimmed markdown source of this slide.
    pub raw_text: String,
    pub markup: Markup,
    pub position: Pos2,
    pub size: Vec2,
}

impl Slide {
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, self.size)
    }

    pub fn center(&self) -> Pos2 {
        self.rect().center()
    }
}

/// A heading found while parsing, pointing back at the slide it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineItem {
    pub id: usize,
    pub text: String,
    pub level: u8,
    pub slide_id: usize,
    /// Position within the owning slide's headings.
    pub order: usize,
}

/// A document segment that was dropped because it failed to render.
#[derive(Debug)]
pub struct SkippedSegment {
    pub segment: usize,
    pub error: RenderError,
}

impl SkippedSegment {
    pub fn into_error(self) -> DeckError {
        DeckError::Render {
            segment: self.segment,
            source: self.error,
        }
    }
}

#[derive(Debug, Default)]
pub struct ParsedDeck {
    pub slides: Vec<Slide>,
    pub outline: Vec<OutlineItem>,
    pub bounds: ContentBounds,
    pub skipped: Vec<SkippedSegment>,
}

impl ParsedDeck {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }
}

/// Parse a document into slides, outline items and content bounds.
///
/// Segments that fail to render are logged and skipped; the remaining
/// segments still become slides with contiguous ids.
pub fn parse(
    document: &str,
    slide_size: Vec2,
    renderer: &dyn MarkdownRenderer,
    tokenizer: &dyn HeadingTokenizer,
) -> ParsedDeck {
    let mut deck = ParsedDeck::default();

    for (segment, text) in splitter::split(document).into_iter().enumerate() {
        let markup = match renderer.render(&text) {
            Ok(markup) => markup,
            Err(error) => {
                tracing::warn!(segment, %error, "skipping slide that failed to render");
                deck.skipped.push(SkippedSegment { segment, error });
                continue;
            }
        };

        let id = deck.slides.len();
        let headings = tokenizer
            .tokenize(&text)
            .into_iter()
            .filter(|t| t.kind == TokenKind::Heading);
        for (order, token) in headings.enumerate() {
            deck.outline.push(OutlineItem {
                id: deck.outline.len(),
                text: token.text,
                level: token.depth.clamp(1, 6),
                slide_id: id,
                order,
            });
        }

        deck.slides.push(Slide {
            id,
            raw_text: text,
            markup,
            position: layout::slide_grid_position(id, slide_size),
            size: slide_size,
        });
    }

    deck.bounds = layout::content_bounds(&deck.slides);
    tracing::debug!(
        slides = deck.slides.len(),
        outline = deck.outline.len(),
        skipped = deck.skipped.len(),
        "parsed document"
    );
    deck
}
