use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};
use ratatui::Frame;

use super::{App, ThemePalette};

const PANE_PADDING_X: u16 = 1;

pub(super) struct PaneLayout {
    pub(super) pane: Rect,
    pub(super) log: Rect,
    pub(super) prompt: Rect,
    pub(super) status: Rect,
}

/// Pane (log over prompt) with a one-row status bar underneath.
pub(super) fn layout(area: Rect) -> PaneLayout {
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(area);
    let pane = outer[0];
    let inner = pane_block_inner(pane);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    PaneLayout {
        pane,
        log: rows[0],
        prompt: rows[1],
        status: outer[1],
    }
}

fn pane_block<'a>(theme: ThemePalette, title: &'a str) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .title(Line::from(vec![Span::styled(
            format!(" {title} "),
            theme.title_style(),
        )]))
        .padding(Padding::horizontal(PANE_PADDING_X))
        .style(theme.pane_style())
}

fn pane_block_inner(pane: Rect) -> Rect {
    Block::default()
        .borders(Borders::ALL)
        .padding(Padding::horizontal(PANE_PADDING_X))
        .inner(pane)
}

pub(super) fn draw(f: &mut Frame, app: &App) {
    let theme = app.view.palette;
    let areas = layout(f.area());

    f.render_widget(pane_block(theme, app.widget.title()), areas.pane);

    let log = Paragraph::new(Text::from(app.view.cached_log_lines().to_vec()))
        .style(theme.pane_style())
        .wrap(Wrap { trim: false })
        .scroll((app.view.scroll, 0));
    f.render_widget(log, areas.log);

    let prompt = Paragraph::new(Text::from(vec![app.prompt_line()]))
        .style(theme.pane_style())
        .scroll((0, app.prompt_scroll(areas.prompt.width)));
    f.render_widget(prompt, areas.prompt);

    let status = Paragraph::new(app.status_text()).style(theme.status_style());
    f.render_widget(status, areas.status);
}
