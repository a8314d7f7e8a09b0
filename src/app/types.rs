use ratatui::style::{Color, Modifier, Style};

use crate::message::Level;

#[derive(Clone, Copy, Debug)]
pub(crate) struct ThemePalette {
    pub(crate) pane_bg: Color,
    pub(crate) pane_fg: Color,
    pub(crate) border: Color,
    pub(crate) title: Color,
    pub(crate) prompt: Color,
    pub(crate) muted_text: Color,
    pub(crate) status_text: Color,
    pub(crate) label_fg: Color,
    pub(crate) info: Color,
    pub(crate) warning: Color,
    pub(crate) success: Color,
    pub(crate) error: Color,
    pub(crate) system: Color,
}

/// Navy pane with flat badge colours per level.
pub(crate) fn default_palette() -> ThemePalette {
    ThemePalette {
        pane_bg: Color::Rgb(3, 9, 36),
        pane_fg: Color::Rgb(255, 255, 255),
        border: Color::Rgb(60, 70, 110),
        title: Color::Rgb(220, 224, 240),
        prompt: Color::Rgb(39, 174, 96),
        muted_text: Color::Rgb(120, 130, 160),
        status_text: Color::Rgb(140, 150, 180),
        label_fg: Color::Rgb(255, 255, 255),
        info: Color::Rgb(41, 128, 185),
        warning: Color::Rgb(243, 156, 18),
        success: Color::Rgb(39, 174, 96),
        error: Color::Rgb(192, 57, 43),
        system: Color::Rgb(189, 195, 199),
    }
}

impl ThemePalette {
    pub(crate) fn level_color(self, level: Level) -> Color {
        match level {
            Level::Info => self.info,
            Level::Warning => self.warning,
            Level::Success => self.success,
            Level::Error => self.error,
            Level::System => self.system,
        }
    }

    /// Badge style for a label; unlevelled labels borrow the system colour.
    pub(crate) fn label_style(self, level: Option<Level>) -> Style {
        let bg = level.map(|l| self.level_color(l)).unwrap_or(self.system);
        let fg = if matches!(level, None | Some(Level::System)) {
            self.pane_bg
        } else {
            self.label_fg
        };
        Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD)
    }

    /// Text without a label is tinted by its level instead.
    pub(crate) fn text_style(self, level: Option<Level>, labelled: bool) -> Style {
        match level {
            Some(level) if !labelled => Style::default().fg(self.level_color(level)),
            _ => self.body_style(),
        }
    }

    pub(crate) fn body_style(self) -> Style {
        Style::default().fg(self.pane_fg)
    }

    pub(crate) fn pane_style(self) -> Style {
        Style::default().bg(self.pane_bg).fg(self.pane_fg)
    }

    pub(crate) fn border_style(self) -> Style {
        Style::default().fg(self.border)
    }

    pub(crate) fn title_style(self) -> Style {
        Style::default()
            .fg(self.title)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn prompt_style(self) -> Style {
        Style::default()
            .fg(self.prompt)
            .add_modifier(Modifier::BOLD)
    }

    pub(crate) fn muted_style(self) -> Style {
        Style::default().fg(self.muted_text)
    }

    pub(crate) fn status_style(self) -> Style {
        Style::default().fg(self.status_text)
    }

    pub(crate) fn cursor_style(self) -> Style {
        Style::default().fg(self.pane_bg).bg(self.pane_fg)
    }
}
