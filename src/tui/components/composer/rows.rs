//! Row layout and boundary helpers for the composer buffer.
//!
//! Rows are hard-wrapped by display width (not by word) so every byte
//! offset maps to exactly one screen cell.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Border (2) + padding (2) consumed horizontally by the bordered block
pub(super) const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders consumed vertically
pub(super) const VERTICAL_OVERHEAD: u16 = 2;
/// Visible content rows before the composer scrolls internally
pub(super) const MAX_VISIBLE_ROWS: u16 = 6;

/// One visual row as a byte range into the buffer (newline excluded).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Row {
    pub start: usize,
    pub end: usize,
}

/// Wrap `text` into rows of at most `width` display columns.
///
/// A row filled to the last column at the end of the text is followed by an
/// empty row so the cursor after it has somewhere to sit.
pub(super) fn layout_rows(text: &str, width: u16) -> Vec<Row> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut start = 0;
    let mut col = 0;

    for (i, c) in text.char_indices() {
        if c == '\n' {
            rows.push(Row { start, end: i });
            start = i + 1;
            col = 0;
            continue;
        }
        let w = c.width().unwrap_or(0);
        if col + w > width && col > 0 {
            rows.push(Row { start, end: i });
            start = i;
            col = 0;
        }
        col += w;
    }
    rows.push(Row {
        start,
        end: text.len(),
    });
    if col >= width {
        rows.push(Row {
            start: text.len(),
            end: text.len(),
        });
    }
    rows
}

/// Row index and display column of byte offset `pos`.
pub(super) fn locate(text: &str, rows: &[Row], pos: usize) -> (usize, u16) {
    let row = rows.iter().rposition(|r| r.start <= pos).unwrap_or(0);
    let Some(r) = rows.get(row) else {
        return (0, 0);
    };
    let end = pos.min(r.end).max(r.start);
    let col = text[r.start..end].width();
    (row, u16::try_from(col).unwrap_or(u16::MAX))
}

/// Byte offset in `row` closest to display column `col` without passing it.
pub(super) fn offset_at_column(text: &str, row: Row, col: u16) -> usize {
    let mut used = 0usize;
    for (i, c) in text[row.start..row.end].char_indices() {
        let w = c.width().unwrap_or(0);
        if used + w > usize::from(col) {
            return row.start + i;
        }
        used += w;
    }
    row.end
}

pub(super) fn prev_char(text: &str, pos: usize) -> usize {
    text[..pos].char_indices().next_back().map_or(0, |(i, _)| i)
}

pub(super) fn next_char(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(pos, |c| pos + c.len_utf8())
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Start of the word before `pos`, readline `backward-word` style.
pub(super) fn prev_word_start(text: &str, pos: usize) -> usize {
    text[..pos]
        .trim_end_matches(|c: char| !is_word(c))
        .trim_end_matches(is_word)
        .len()
}

/// End of the word after `pos`, readline `forward-word` style.
pub(super) fn next_word_end(text: &str, pos: usize) -> usize {
    let rest = text[pos..]
        .trim_start_matches(|c: char| !is_word(c))
        .trim_start_matches(is_word);
    text.len() - rest.len()
}
