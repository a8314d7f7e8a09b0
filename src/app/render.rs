use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use super::{LogView, ThemePalette};
use crate::message::{Message, MessageBody};

const NESTED_INDENT: &str = "  ";

impl LogView {
    pub(super) fn render_log_lines(&self) -> Vec<Line<'static>> {
        let palette = self.palette;
        let mut lines = Vec::with_capacity(self.entries.len() + 1);
        lines.push(Line::from(vec![Span::styled(
            format!("$ cd {}", self.title),
            palette.title_style(),
        )]));
        for entry in &self.entries {
            push_message_lines(&mut lines, entry, 0, palette);
        }
        lines
    }
}

/// One message, plus its nested list one indent deeper.
fn push_message_lines(
    lines: &mut Vec<Line<'static>>,
    message: &Message,
    depth: usize,
    palette: ThemePalette,
) {
    let mut head = Vec::new();
    if depth > 0 {
        head.push(Span::raw(NESTED_INDENT.repeat(depth)));
    }
    if !message.time.is_empty() {
        head.push(Span::styled(
            format!("[{}] ", message.time),
            palette.muted_style(),
        ));
    }
    let labelled = message.label.as_deref().is_some_and(|l| !l.is_empty());
    if let Some(label) = message.label.as_deref().filter(|l| !l.is_empty()) {
        head.push(Span::styled(
            format!(" {label} "),
            palette.label_style(message.level),
        ));
        head.push(Span::raw(" "));
    }

    let head_width: usize = head
        .iter()
        .map(|span| UnicodeWidthStr::width(span.content.as_ref()))
        .sum();
    let text_style = palette.text_style(message.level, labelled);
    push_text_rows(lines, head, head_width, message.body.text(), text_style);

    if let MessageBody::List { list, .. } = &message.body {
        for child in list {
            push_message_lines(lines, child, depth + 1, palette);
        }
    }
}

/// Continuation rows of multi-line text line up under the first row's text.
fn push_text_rows(
    lines: &mut Vec<Line<'static>>,
    head: Vec<Span<'static>>,
    head_width: usize,
    text: &str,
    style: Style,
) {
    let mut parts = text.split('\n');
    let first = parts.next().unwrap_or_default();
    let mut spans = head;
    spans.push(Span::styled(first.to_string(), style));
    lines.push(Line::from(spans));

    let pad = " ".repeat(head_width);
    for part in parts {
        lines.push(Line::from(vec![
            Span::raw(pad.clone()),
            Span::styled(part.to_string(), style),
        ]));
    }
}
