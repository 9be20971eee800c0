//! Interactive terminal view (impure shell).
//!
//! Hosts one text area inside a container node, attaches [`Autosize`] to
//! the container and runs a crossterm event loop around it. Typing feeds
//! `on_input`, every frame feeds `after_render`, and lookup retries run
//! off a [`TimerQueue`] advanced by wall time.

pub mod status;
pub mod text_area_widget;

pub use status::{status_line, status_text};
pub use text_area_widget::AutosizeTextArea;

use crate::attachment::{Autosize, Recompute};
use crate::config::ResolvedConfig;
use crate::logging::LogRecord;
use crate::scheduler::{CancellationToken, Scheduler, TimerId, TimerQueue};
use crate::terminal::{HostNode, HostRef, TextArea, TextAreaHandle, TreeLocator};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Position},
    text::Line,
    Terminal,
};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

/// Poll timeout when no timer is pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

/// Cells taken by a pair of opposite borders.
const BORDER_CELLS: u16 = 2;

/// Key help shown under the status line.
const HELP_TEXT: &str =
    "type to edit | Enter newline | Ctrl+Up/Down max rows | Alt+Up/Down min rows | Esc quit";

/// Errors that can occur during view operations
#[derive(Debug, Error)]
pub enum ViewError {
    /// IO error during terminal operations
    #[error("Terminal IO error: {0}")]
    Io(#[from] io::Error),
}

/// What the interactive view starts with.
#[derive(Debug, Clone, Default)]
pub struct ViewArgs {
    /// Resolved configuration.
    pub config: ResolvedConfig,
    /// Initial text area value.
    pub initial_text: String,
    /// Mount the text area into its host only after this delay.
    pub mount_delay: Option<Duration>,
}

/// Interactive autosize demo.
///
/// Generic over backend to support testing with `TestBackend`.
pub struct DemoApp<B>
where
    B: Backend,
{
    terminal: Terminal<B>,
    host: HostRef,
    text_area: TextAreaHandle,
    autosize: Autosize<TreeLocator>,
    timers: TimerQueue,
    fixed_width: Option<u16>,
    pending_mount: Option<TimerId>,
    mount_token: CancellationToken,
    warnings: Option<Receiver<LogRecord>>,
    last_warning: Option<String>,
}

impl DemoApp<CrosstermBackend<Stdout>> {
    /// Create the app on the real terminal.
    ///
    /// Sets up terminal in raw mode with alternate screen.
    pub fn new(args: ViewArgs, warnings: Option<Receiver<LogRecord>>) -> Result<Self, ViewError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Self::with_terminal(terminal, args, warnings)
    }

    /// Run the main event loop.
    ///
    /// Returns when the user quits (Esc or Ctrl+C). The poll timeout is the
    /// next timer deadline, so lookup retries fire on time without
    /// busy-waiting.
    pub fn run(&mut self) -> Result<(), ViewError> {
        self.render()?;

        loop {
            let timeout = self.timers.next_deadline().unwrap_or(IDLE_POLL);
            let started = Instant::now();

            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) => {
                        if self.handle_key(key) {
                            return Ok(());
                        }
                    }
                    Event::Resize(width, height) => self.handle_resize(width, height),
                    _ => {}
                }
            }

            self.advance_timers(started.elapsed());
            self.render()?;
        }
    }
}

impl<B> DemoApp<B>
where
    B: Backend,
{
    /// Create the app on an existing terminal.
    pub fn with_terminal(
        terminal: Terminal<B>,
        args: ViewArgs,
        warnings: Option<Receiver<LogRecord>>,
    ) -> Result<Self, ViewError> {
        let terminal_width = match terminal.size() {
            Ok(size) if size.width > BORDER_CELLS => size.width,
            _ => 80, // Fallback for errors or unusably narrow terminals
        };
        let fixed_width = args.config.width;
        let width = fixed_width.unwrap_or(terminal_width - BORDER_CELLS);

        let text_area = TextAreaHandle::new(TextArea::new(width).with_value(args.initial_text));
        let host = HostNode::element("form");
        let mut timers = TimerQueue::new();
        let mount_token = CancellationToken::new();

        let pending_mount = match args.mount_delay {
            Some(delay) => Some(timers.schedule(delay, &mount_token)),
            None => {
                HostNode::append_child(&host, HostNode::text_area(text_area.clone()));
                None
            }
        };

        let autosize = Autosize::attach(
            TreeLocator::new(&host),
            args.config.autosize_options(),
            &mut timers,
        );

        info!(
            width,
            strategy = %args.config.strategy,
            bound = autosize.is_bound(),
            "view started"
        );

        Ok(Self {
            terminal,
            host,
            text_area,
            autosize,
            timers,
            fixed_width,
            pending_mount,
            mount_token,
            warnings,
            last_warning: None,
        })
    }

    /// The attachment driving the text area.
    pub fn autosize(&self) -> &Autosize<TreeLocator> {
        &self.autosize
    }

    /// The text area, whether mounted yet or not.
    pub fn text_area(&self) -> &TextAreaHandle {
        &self.text_area
    }

    /// The terminal being drawn to.
    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    /// Most recent warning shown in the status line.
    pub fn last_warning(&self) -> Option<&str> {
        self.last_warning.as_deref()
    }

    /// Move the timer clock forward and dispatch whatever fired.
    pub fn advance_timers(&mut self, elapsed: Duration) {
        for id in self.timers.advance(elapsed) {
            if self.pending_mount == Some(id) {
                self.pending_mount = None;
                debug!("mounting text area");
                HostNode::append_child(&self.host, HostNode::text_area(self.text_area.clone()));
            } else {
                self.autosize.on_timer(id, &mut self.timers);
            }
        }
    }

    /// Draw, then let the attachment react to the finished frame.
    ///
    /// A frame that changed the height is drawn again so the new height is
    /// on screen immediately.
    pub fn render(&mut self) -> Result<(), ViewError> {
        self.drain_warnings();
        self.draw()?;
        if let Recompute::Applied(_) = self.autosize.after_render() {
            self.draw()?;
        }
        Ok(())
    }

    fn drain_warnings(&mut self) {
        let Some(rx) = &self.warnings else {
            return;
        };
        while let Ok(record) = rx.try_recv() {
            self.last_warning = Some(record.message);
        }
    }

    fn draw(&mut self) -> Result<(), ViewError> {
        let text_area = self.text_area.borrow();
        let bound = self.autosize.is_bound();
        let summary = status_text(bound.then_some(&*text_area), self.autosize.constraints());
        let status = status_line(summary, self.last_warning.as_deref());

        self.terminal.draw(|frame| {
            let box_height = if bound {
                text_area.visible_rows().saturating_add(BORDER_CELLS)
            } else {
                0
            };
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(box_height),
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(frame.area());

            if bound {
                let widget = AutosizeTextArea::new(&text_area).title(" autosize ");
                let cursor_row = text_area.cursor_line().saturating_sub(widget.scroll_offset());
                frame.render_widget(widget, chunks[0]);

                let x = (chunks[0].x + 1).saturating_add(text_area.cursor_column());
                let y = (chunks[0].y + 1)
                    .saturating_add(u16::try_from(cursor_row).unwrap_or(u16::MAX));
                let inside = y.saturating_add(1) < chunks[0].bottom()
                    && x.saturating_add(1) < chunks[0].right();
                if inside {
                    frame.set_cursor_position(Position::new(x, y));
                }
            }
            frame.render_widget(status, chunks[1]);
            frame.render_widget(Line::from(HELP_TEXT), chunks[2]);
        })?;
        Ok(())
    }

    /// Handle a single keyboard event.
    ///
    /// Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        match key.code {
            KeyCode::Esc => return true,
            KeyCode::Char('c') if ctrl => return true,
            KeyCode::Up if ctrl => self.step_max_rows(1),
            KeyCode::Down if ctrl => self.step_max_rows(-1),
            KeyCode::Up if alt => self.step_min_rows(1),
            KeyCode::Down if alt => self.step_min_rows(-1),
            KeyCode::Left => self.text_area.borrow_mut().move_left(),
            KeyCode::Right => self.text_area.borrow_mut().move_right(),
            KeyCode::Char(ch) if !ctrl && !alt => {
                self.text_area.borrow_mut().insert_char(ch);
                self.autosize.on_input();
            }
            KeyCode::Enter => {
                self.text_area.borrow_mut().insert_newline();
                self.autosize.on_input();
            }
            KeyCode::Backspace => {
                self.text_area.borrow_mut().backspace();
                self.autosize.on_input();
            }
            _ => {}
        }
        false
    }

    fn step_max_rows(&mut self, delta: i64) {
        let current = self.autosize.constraints().max_rows().unwrap_or(0);
        let next = step(current, delta);
        debug!(max_rows = next, "max rows changed");
        self.autosize.set_max_rows(next);
    }

    fn step_min_rows(&mut self, delta: i64) {
        let current = self.autosize.constraints().min_rows().unwrap_or(0);
        let next = step(current, delta);
        debug!(min_rows = next, "min rows changed");
        self.autosize.set_min_rows(next);
    }

    /// Terminal resized: rewrap to the new width unless the width is fixed.
    pub fn handle_resize(&mut self, width: u16, _height: u16) {
        if self.fixed_width.is_some() {
            return;
        }
        let width = width.saturating_sub(BORDER_CELLS).max(1);
        self.text_area.borrow_mut().set_width(width);
        self.autosize.invalidate();
    }
}

impl<B> Drop for DemoApp<B>
where
    B: Backend,
{
    fn drop(&mut self) {
        self.mount_token.cancel();
        self.autosize.detach(&mut self.timers);
    }
}

fn step(current: u32, delta: i64) -> u32 {
    u32::try_from((i64::from(current) + delta).max(0)).unwrap_or(u32::MAX)
}

/// Initialize and run the interactive view.
///
/// Handles terminal setup, runs the event loop, and restores the terminal
/// even when the loop fails. Logging must be initialized by the caller.
pub fn run_with_args(
    args: ViewArgs,
    warnings: Option<Receiver<LogRecord>>,
) -> Result<(), ViewError> {
    let result = DemoApp::new(args, warnings).and_then(|mut app| app.run());

    // Always restore terminal state
    restore_terminal()?;

    result
}

/// Restore terminal to normal state
///
/// Disables raw mode and leaves alternate screen
fn restore_terminal() -> Result<(), ViewError> {
    disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

#[cfg(test)]
#[path = "view_tests.rs"]
mod tests;
