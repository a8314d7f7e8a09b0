use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind, MouseEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tracing::info;

use super::*;

const ACTIVE_POLL_MS: u64 = 33;
const IDLE_POLL_MS: u64 = 100;
const SPINNER_TICK_MS: u64 = 80;
const BLINK_MS: u64 = 530;
const MAX_EVENTS_PER_FRAME: u16 = 64;

pub(crate) fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    config: WidgetConfig,
) -> Result<()> {
    let mut app = App::new(config);
    let mut last_spinner_tick = Instant::now();
    let mut needs_draw = true;

    loop {
        if app.widget.poll_task(&mut app.view) {
            needs_draw = true;
        }
        if app.is_running() && last_spinner_tick.elapsed() >= Duration::from_millis(SPINNER_TICK_MS)
        {
            app.spinner_idx = (app.spinner_idx + 1) % SPINNER.len();
            last_spinner_tick = Instant::now();
            needs_draw = true;
        }
        if app.tick_blink() {
            needs_draw = true;
        }

        if needs_draw {
            let size = terminal.size().context("terminal size")?;
            let panes = ui::layout(Rect::new(0, 0, size.width, size.height));
            app.view.update_viewport(panes.log.width, panes.log.height);
            app.view.ensure_render_cache();
            terminal.draw(|f| ui::draw(f, &app)).context("draw frame")?;
            needs_draw = false;
        }

        if app.should_quit {
            break;
        }

        let timeout = if app.is_running() {
            Duration::from_millis(ACTIVE_POLL_MS)
        } else {
            Duration::from_millis(IDLE_POLL_MS)
        };
        if !event::poll(timeout).context("event poll")? {
            continue;
        }

        let mut wheel_delta: i32 = 0;
        let mut drained_events: u16 = 0;

        loop {
            match event::read().context("event read")? {
                Event::Key(key) => {
                    if !matches!(key.kind, KeyEventKind::Release) {
                        app.handle_key(key);
                    }
                }
                Event::Mouse(mouse) => match mouse.kind {
                    MouseEventKind::ScrollUp => wheel_delta -= 1,
                    MouseEventKind::ScrollDown => wheel_delta += 1,
                    _ => {}
                },
                Event::Paste(text) => app.handle_paste_event(&text),
                _ => {}
            }

            drained_events = drained_events.saturating_add(1);
            if drained_events >= MAX_EVENTS_PER_FRAME {
                break;
            }
            if !event::poll(Duration::from_millis(0)).context("event poll drain")? {
                break;
            }
        }

        if wheel_delta < 0 {
            app.view.scroll_up(wheel_delta.unsigned_abs().min(64) as u16);
        } else if wheel_delta > 0 {
            app.view.scroll_down(wheel_delta.min(64) as u16);
        }
        needs_draw = true;
    }

    info!(entries = app.view.entries().len(), "widget closed");
    Ok(())
}

impl App {
    /// Toggle the idle cursor. Returns true when the prompt needs a redraw.
    fn tick_blink(&mut self) -> bool {
        if self.is_running() || self.last_blink.elapsed() < Duration::from_millis(BLINK_MS) {
            return false;
        }
        self.cursor_visible = !self.cursor_visible;
        self.last_blink = Instant::now();
        true
    }
}
