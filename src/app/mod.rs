use std::time::Instant;

use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Paragraph, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::config::WidgetConfig;
use crate::message::Message;
use crate::widget::{Surface, Widget};

mod input;
mod render;
mod runtime;
mod types;
mod ui;

pub(crate) use runtime::run_app;
pub(crate) use types::{default_palette, ThemePalette};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SCROLL_STEP: u16 = 5;

/// Cached rendering state to avoid recomputing log lines and scroll bounds every frame.
struct RenderCache {
    /// Generation counter at the time of last cache build.
    generation: u64,
    /// Viewport width used for the cached lines.
    width: u16,
    /// Viewport height used for the cached scroll_max.
    height: u16,
    lines: Vec<Line<'static>>,
    scroll_max: u16,
}

impl RenderCache {
    fn new() -> Self {
        Self {
            generation: u64::MAX, // force first rebuild
            width: 0,
            height: 0,
            lines: Vec::new(),
            scroll_max: 0,
        }
    }
}

/// The log pane: owns every appended message and the scroll position.
pub(crate) struct LogView {
    title: String,
    entries: Vec<Message>,
    loading: bool,
    focused: bool,
    scroll: u16,
    autoscroll: bool,
    viewport_width: u16,
    viewport_height: u16,
    palette: ThemePalette,
    /// Monotonically increasing counter bumped whenever entries change.
    render_generation: u64,
    render_cache: RenderCache,
}

impl LogView {
    fn new(title: &str, palette: ThemePalette) -> Self {
        Self {
            title: title.to_string(),
            entries: Vec::new(),
            loading: false,
            focused: false,
            scroll: 0,
            autoscroll: true,
            viewport_width: 120,
            viewport_height: 36,
            palette,
            render_generation: 0,
            render_cache: RenderCache::new(),
        }
    }

    pub(crate) fn entries(&self) -> &[Message] {
        &self.entries
    }

    pub(crate) fn is_loading(&self) -> bool {
        self.loading
    }

    fn invalidate_render_cache(&mut self) {
        self.render_generation = self.render_generation.wrapping_add(1);
    }

    /// Call after any mutation of entries.
    fn follow_scroll(&mut self) {
        self.invalidate_render_cache();
        if self.autoscroll {
            self.scroll = self.scroll_max();
        } else {
            self.scroll = self.scroll.min(self.scroll_max());
        }
    }

    /// Returns true if the cache was rebuilt.
    fn ensure_render_cache(&mut self) -> bool {
        let need_rebuild = self.render_cache.generation != self.render_generation
            || self.render_cache.width != self.viewport_width
            || self.render_cache.height != self.viewport_height;
        if !need_rebuild {
            return false;
        }

        let w = self.viewport_width.max(1);
        let lines = self.render_log_lines();
        let paragraph = Paragraph::new(Text::from(lines.clone())).wrap(Wrap { trim: false });
        let rendered_line_count = paragraph.line_count(w).min(u16::MAX as usize) as u16;
        let scroll_max = rendered_line_count.saturating_sub(self.viewport_height);

        self.render_cache = RenderCache {
            generation: self.render_generation,
            width: self.viewport_width,
            height: self.viewport_height,
            lines,
            scroll_max,
        };
        true
    }

    fn scroll_max(&mut self) -> u16 {
        self.ensure_render_cache();
        self.render_cache.scroll_max
    }

    pub(super) fn cached_log_lines(&self) -> &[Line<'static>] {
        &self.render_cache.lines
    }

    fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width.max(1);
        self.viewport_height = height.max(1);
        let max_scroll = self.scroll_max();
        if self.autoscroll {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    fn scroll_up(&mut self, n: u16) {
        let from = if self.autoscroll {
            self.scroll_max()
        } else {
            self.scroll
        };
        self.autoscroll = false;
        self.scroll = from.saturating_sub(n);
    }

    fn scroll_down(&mut self, n: u16) {
        let max_scroll = self.scroll_max();
        self.scroll = self.scroll.saturating_add(n).min(max_scroll);
        if self.scroll >= max_scroll {
            self.autoscroll = true;
        }
    }
}

impl Surface for LogView {
    fn append(&mut self, message: Message) {
        self.entries.push(message);
        self.follow_scroll();
    }

    fn last_message(&self) -> Option<&Message> {
        self.entries.last()
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn scroll_to_bottom(&mut self) {
        self.autoscroll = true;
        self.scroll = self.scroll_max();
    }

    fn focus_input(&mut self) {
        self.focused = true;
    }
}

struct App {
    widget: Widget,
    view: LogView,
    should_quit: bool,
    spinner_idx: usize,
    cursor_visible: bool,
    last_blink: Instant,
}

impl App {
    fn new(config: WidgetConfig) -> Self {
        let view = LogView::new(&config.title, default_palette());
        let mut app = Self {
            widget: Widget::new(config),
            view,
            should_quit: false,
            spinner_idx: 0,
            cursor_visible: true,
            last_blink: Instant::now(),
        };
        app.widget.mount(&mut app.view);
        app
    }

    fn is_running(&self) -> bool {
        self.widget.is_busy()
    }

    /// Keep the cursor solid right after typing.
    fn reset_blink(&mut self) {
        self.cursor_visible = true;
        self.last_blink = Instant::now();
    }

    fn prompt_prefix(&self) -> String {
        format!("$ \\ {} ", self.widget.title())
    }

    pub(super) fn spinner_frame(&self) -> &'static str {
        SPINNER[self.spinner_idx % SPINNER.len()]
    }

    /// Prompt row: prefix, buffer, then the cursor block or the spinner.
    fn prompt_line(&self) -> Line<'static> {
        let palette = self.view.palette;
        let mut spans = vec![Span::styled(self.prompt_prefix(), palette.prompt_style())];
        let editable = self.widget.accepts_edits();

        if editable {
            let input = self.widget.input();
            let text = input.text();
            let cursor = input.cursor().min(text.len());
            let (before, rest) = text.split_at(cursor);
            let mut rest_chars = rest.chars();
            let under_cursor = rest_chars.next();
            let after: String = rest_chars.collect();

            spans.push(Span::styled(before.to_string(), palette.body_style()));
            let cell = under_cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            if self.view.is_loading() {
                spans.push(Span::styled(cell, palette.body_style()));
            } else if self.cursor_visible && self.view.focused {
                spans.push(Span::styled(cell, palette.cursor_style()));
            } else {
                spans.push(Span::styled(cell, palette.body_style()));
            }
            spans.push(Span::styled(after, palette.body_style()));
        }
        if self.view.is_loading() {
            spans.push(Span::styled(
                self.spinner_frame().to_string(),
                palette.prompt_style(),
            ));
        }
        Line::from(spans)
    }

    /// Columns to skip so the cursor stays inside a prompt of `width`.
    fn prompt_scroll(&self, width: u16) -> u16 {
        let input = self.widget.input();
        let before = &input.text()[..input.cursor().min(input.text().len())];
        let needed = UnicodeWidthStr::width(self.prompt_prefix().as_str())
            + UnicodeWidthStr::width(before)
            + 2;
        needed.saturating_sub(width as usize).min(u16::MAX as usize) as u16
    }

    fn status_text(&self) -> String {
        let state = match self.widget.running_task() {
            Some(name) if self.widget.queued_len() > 0 => {
                format!("running {name} ({} queued)", self.widget.queued_len())
            }
            Some(name) => format!("running {name}"),
            None => "ready".to_string(),
        };
        format!(
            "{} | {} entries | Enter run | Up/Down history | PgUp/PgDn scroll | Ctrl+C exit",
            state,
            self.view.entries.len()
        )
    }
}
