//! Default render and tokenizer capabilities.
//!
//! The presenter only sees the [`MarkdownRenderer`] and [`HeadingTokenizer`]
//! traits; [`MarkdownBlocks`] is the block-level implementation the viewer
//! ships with. It understands ATX headings, paragraphs, lists, quotes, rules
//! and fenced code, and flattens inline markup to plain text. A fence that
//! is never closed runs to the end of the slide, as in CommonMark.

use crate::error::RenderError;

/// Rendered slide content, ready to be painted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Paragraph { text: String },
    List { ordered: bool, items: Vec<String> },
    BlockQuote { text: String },
    CodeBlock { language: Option<String>, code: String },
    HorizontalRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Heading,
    Paragraph,
    List,
    BlockQuote,
    Code,
    Rule,
}

/// A block-level token. `depth` is the heading level for headings and 0 otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub depth: u8,
}

pub trait MarkdownRenderer {
    fn render(&self, text: &str) -> Result<Markup, RenderError>;
}

pub trait HeadingTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownBlocks;

impl MarkdownRenderer for MarkdownBlocks {
    fn render(&self, text: &str) -> Result<Markup, RenderError> {
        Ok(Markup {
            blocks: parse_blocks(text),
        })
    }
}

impl HeadingTokenizer for MarkdownBlocks {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        parse_blocks(text).iter().map(Block::token).collect()
    }
}

impl Block {
    fn token(&self) -> Token {
        let (kind, text, depth) = match self {
            Block::Heading { level, text } => (TokenKind::Heading, text.clone(), *level),
            Block::Paragraph { text } => (TokenKind::Paragraph, text.clone(), 0),
            Block::List { items, .. } => (TokenKind::List, items.join("\n"), 0),
            Block::BlockQuote { text } => (TokenKind::BlockQuote, text.clone(), 0),
            Block::CodeBlock { code, .. } => (TokenKind::Code, code.clone(), 0),
            Block::HorizontalRule => (TokenKind::Rule, String::new(), 0),
        };
        Token { kind, text, depth }
    }
}

/// Parse `text` into blocks. The lines after an unclosed fence become one
/// code block.
fn parse_blocks(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut quote: Vec<&str> = Vec::new();
    let mut list: Option<(bool, Vec<String>)> = None;
    let mut fence: Option<Fence> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(open) = fence.as_mut() {
            if !open.closes(trimmed) {
                open.lines.push(line.to_string());
            } else if let Some(closed) = fence.take() {
                blocks.push(closed.into_block());
            }
            continue;
        }

        if let Some(open) = Fence::open(trimmed) {
            flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
            fence = Some(open);
            continue;
        }

        if trimmed.is_empty() {
            flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
            continue;
        }

        if let Some((level, heading)) = parse_heading(trimmed) {
            flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
            blocks.push(Block::Heading {
                level,
                text: heading,
            });
            continue;
        }

        if is_rule(trimmed) {
            flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
            blocks.push(Block::HorizontalRule);
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix('>') {
            if !quote.is_empty() || (paragraph.is_empty() && list.is_none()) {
                quote.push(rest.trim_start());
                continue;
            }
        }

        if let Some((ordered, item)) = parse_list_item(trimmed) {
            if !paragraph.is_empty() || !quote.is_empty() {
                flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
            }
            match list.as_mut() {
                Some((kind, items)) if *kind == ordered => items.push(strip_inline(item)),
                _ => {
                    flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
                    list = Some((ordered, vec![strip_inline(item)]));
                }
            }
            continue;
        }

        // Indented continuation of the previous list item.
        if let Some((_, items)) = list.as_mut() {
            if line.starts_with([' ', '\t']) {
                if let Some(last) = items.last_mut() {
                    last.push(' ');
                    last.push_str(&strip_inline(trimmed));
                }
                continue;
            }
        }

        if !quote.is_empty() || list.is_some() {
            flush(&mut blocks, &mut paragraph, &mut quote, &mut list);
        }
        paragraph.push(trimmed);
    }

    flush(&mut blocks, &mut paragraph, &mut quote, &mut list);

    if let Some(open) = fence {
        blocks.push(open.into_block());
    }
    blocks
}

fn flush(
    blocks: &mut Vec<Block>,
    paragraph: &mut Vec<&str>,
    quote: &mut Vec<&str>,
    list: &mut Option<(bool, Vec<String>)>,
) {
    if !paragraph.is_empty() {
        blocks.push(Block::Paragraph {
            text: strip_inline(&paragraph.join(" ")),
        });
        paragraph.clear();
    }
    if !quote.is_empty() {
        blocks.push(Block::BlockQuote {
            text: strip_inline(&quote.join(" ")),
        });
        quote.clear();
    }
    if let Some((ordered, items)) = list.take() {
        blocks.push(Block::List { ordered, items });
    }
}

struct Fence {
    marker: char,
    len: usize,
    language: Option<String>,
    lines: Vec<String>,
}

impl Fence {
    fn open(trimmed: &str) -> Option<Self> {
        let marker = trimmed.chars().next()?;
        if marker != '`' && marker != '~' {
            return None;
        }
        let len = trimmed.chars().take_while(|&c| c == marker).count();
        if len < 3 {
            return None;
        }
        let info = trimmed[len..].trim();
        Some(Self {
            marker,
            len,
            language: (!info.is_empty()).then(|| info.to_string()),
            lines: Vec::new(),
        })
    }

    fn closes(&self, trimmed: &str) -> bool {
        let count = trimmed.chars().take_while(|&c| c == self.marker).count();
        count >= self.len && trimmed.chars().skip(count).all(char::is_whitespace)
    }

    fn into_block(self) -> Block {
        Block::CodeBlock {
            language: self.language,
            code: self.lines.join("\n"),
        }
    }
}

fn parse_heading(trimmed: &str) -> Option<(u8, String)> {
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with([' ', '\t']) {
        return None;
    }
    // Closing hashes are decoration, as in `## Title ##`.
    let text = rest.trim().trim_end_matches('#').trim_end();
    Some((level as u8, strip_inline(text)))
}

fn is_rule(trimmed: &str) -> bool {
    let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
    compact.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&m| compact.chars().all(|c| c == m))
}

fn parse_list_item(trimmed: &str) -> Option<(bool, &str)> {
    for marker in ["- ", "* ", "+ "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return Some((false, rest.trim_start()));
        }
    }
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &trimmed[digits..];
    rest.strip_prefix(". ")
        .or_else(|| rest.strip_prefix(") "))
        .map(|item| (true, item.trim_start()))
}

/// Flatten inline markup (`**bold**`, `*em*`, `` `code` ``, `[text](url)`) to plain text.
pub fn strip_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '*' | '_' | '`' => {}
            '~' if chars.peek() == Some(&'~') => {
                chars.next();
            }
            '[' => {
                let mut label = String::new();
                let mut closed = false;
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    label.push(inner);
                }
                if closed && chars.peek() == Some(&'(') {
                    for inner in chars.by_ref() {
                        if inner == ')' {
                            break;
                        }
                    }
                    out.push_str(&strip_inline(&label));
                } else {
                    out.push('[');
                    out.push_str(&strip_inline(&label));
                    if closed {
                        out.push(']');
                    }
                }
            }
            '\\' => {
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            }
            _ => out.push(c),
        }
    }
    out
}
