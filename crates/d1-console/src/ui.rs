//! Terminal console for monitoring and switching the D1 output.

#![allow(missing_docs)]

use std::io;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Terminal,
};

use crate::controller::{Controller, StatusView};
use crate::latch::latch_millis_from_input;
use crate::log::LOG_PLACEHOLDER;
use crate::pin::{Command, PinState};

mod input;
mod render;

const COLOR_TEAL: Color = Color::Rgb(0, 168, 150);
const COLOR_AMBER: Color = Color::Rgb(243, 156, 18);
const COLOR_RED: Color = Color::Rgb(231, 76, 60);
const COLOR_INFO: Color = Color::Rgb(142, 142, 147);
const COLOR_YELLOW: Color = Color::Rgb(245, 196, 66);

const TICK_INTERVAL: Duration = Duration::from_millis(50);

/// The latch-seconds input field. `committed` is what actions read;
/// `buffer` only exists while the operator is editing.
#[derive(Debug, Default)]
struct LatchInput {
    editing: bool,
    buffer: String,
    committed: String,
}

impl LatchInput {
    fn seeded(seconds: Option<u64>) -> Self {
        Self {
            editing: false,
            buffer: String::new(),
            committed: seconds.map(|s| s.to_string()).unwrap_or_default(),
        }
    }

    fn begin_edit(&mut self) {
        self.editing = true;
        self.buffer = self.committed.clone();
    }

    fn commit(&mut self) {
        self.committed = self.buffer.trim().to_string();
        self.editing = false;
    }

    fn cancel(&mut self) {
        self.buffer.clear();
        self.editing = false;
    }

    fn push_char(&mut self, ch: char) {
        if ch.is_ascii_digit() {
            self.buffer.push(ch);
        }
    }

    fn backspace(&mut self) {
        self.buffer.pop();
    }

    fn millis(&self) -> u64 {
        latch_millis_from_input(&self.committed)
    }

    fn display(&self) -> &str {
        if self.editing {
            &self.buffer
        } else {
            &self.committed
        }
    }
}

struct ConsoleState {
    controller: Controller,
    latch_input: LatchInput,
    no_input: bool,
}

/// Runs the interactive console until the operator quits. An initial
/// refresh runs once at startup; after that, status only changes when
/// the operator acts (there is no background polling).
pub fn run_console(
    controller: Controller,
    latch_seconds: Option<u64>,
    no_input: bool,
) -> anyhow::Result<()> {
    let mut state = ConsoleState {
        controller,
        latch_input: LatchInput::seeded(latch_seconds),
        no_input,
    };
    state.controller.refresh();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = (|| {
        loop {
            state.controller.tick(Instant::now());
            terminal.draw(|frame| render::render_console(frame.size(), frame, &state))?;
            if event::poll(TICK_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if input::handle_key(key, &mut state)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn panel_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default()
                .fg(COLOR_YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(Style::default().fg(COLOR_INFO))
}

fn label_style() -> Style {
    Style::default().fg(Color::Cyan)
}

fn value_style() -> Style {
    Style::default().fg(Color::White)
}

fn status_chip(view: StatusView) -> (String, Style) {
    let (text, bg, fg) = match view {
        StatusView::Unknown => ("---", Color::DarkGray, Color::White),
        StatusView::Pin(PinState::On) => ("ON", COLOR_TEAL, Color::White),
        StatusView::Pin(PinState::Off) => ("OFF", Color::DarkGray, Color::White),
        StatusView::Error => ("ERR", COLOR_RED, Color::White),
    };
    (
        format!("[{text}]"),
        Style::default().bg(bg).fg(fg).add_modifier(Modifier::BOLD),
    )
}

/// One toggle-style button cell. Exactly one of the two cells renders
/// with the filled marker, tracking the last synced state.
fn button_cell(label: &str, active: bool) -> Span<'static> {
    if active {
        Span::styled(
            format!("(\u{25cf}) {label}"),
            Style::default()
                .fg(COLOR_TEAL)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(format!("( ) {label}"), Style::default().fg(COLOR_INFO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceClient, DeviceEndpoint};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::net::TcpListener;
    use std::thread;

    fn offline_controller() -> Controller {
        // Reserve a loopback port and close it again so nothing answers.
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral loopback port");
        let addr = listener.local_addr().expect("read local addr");
        drop(listener);
        let endpoint =
            DeviceEndpoint::parse(&format!("http://{addr}")).expect("parse test endpoint");
        Controller::new(DeviceClient::new(endpoint))
    }

    fn stub_controller(status_body: &'static str) -> Controller {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("bind stub device");
        let base = format!(
            "http://{}",
            server.server_addr().to_ip().expect("stub device ip addr")
        );
        thread::spawn(move || {
            for request in server.incoming_requests() {
                let _ = request.respond(tiny_http::Response::from_string(status_body));
            }
        });
        let endpoint = DeviceEndpoint::parse(&base).expect("parse stub endpoint");
        Controller::new(DeviceClient::new(endpoint))
    }

    fn render_snapshot(state: &ConsoleState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).expect("create test terminal");
        terminal
            .draw(|frame| render::render_console(frame.size(), frame, state))
            .expect("draw console");
        let mut lines = Vec::new();
        let buffer = terminal.backend().buffer();
        for y in 0..height {
            let mut line = String::new();
            for x in 0..width {
                line.push_str(buffer.get(x, y).symbol());
            }
            lines.push(line.trim_end().to_string());
        }
        lines.join("\n")
    }

    #[test]
    fn console_renders_unknown_status_and_log_placeholder() {
        let state = ConsoleState {
            controller: offline_controller(),
            latch_input: LatchInput::seeded(Some(5)),
            no_input: false,
        };
        let snapshot = render_snapshot(&state, 80, 20);
        assert!(snapshot.contains("Status: unknown"));
        assert!(snapshot.contains(LOG_PLACEHOLDER));
        assert!(snapshot.contains("Latch seconds: 5"));
        // Neither button is marked before the first successful refresh.
        assert!(snapshot.contains("( ) On"));
        assert!(snapshot.contains("( ) Off"));
    }

    #[test]
    fn console_marks_exactly_one_button_active_after_refresh() {
        let mut state = ConsoleState {
            controller: stub_controller(r#"{"d1":1}"#),
            latch_input: LatchInput::default(),
            no_input: false,
        };
        state.controller.refresh();
        let snapshot = render_snapshot(&state, 80, 20);
        assert!(snapshot.contains("D1 is ON"));
        assert!(snapshot.contains("(\u{25cf}) On"));
        assert!(snapshot.contains("( ) Off"));
        assert!(snapshot.contains("Status refreshed"));
    }

    #[test]
    fn latch_input_accepts_digits_only() {
        let mut field = LatchInput::default();
        field.begin_edit();
        field.push_char('1');
        field.push_char('a');
        field.push_char('2');
        field.commit();
        assert_eq!(field.display(), "12");
        assert_eq!(field.millis(), 12_000);

        field.begin_edit();
        field.backspace();
        field.backspace();
        field.cancel();
        // Cancel keeps the previously committed value.
        assert_eq!(field.display(), "12");
    }

    #[test]
    fn read_only_mode_ignores_action_keys() {
        let mut state = ConsoleState {
            controller: offline_controller(),
            latch_input: LatchInput::default(),
            no_input: true,
        };
        let exit = input::handle_key(KeyEvent::from(KeyCode::Char('o')), &mut state)
            .expect("handle key");
        assert!(!exit);
        assert!(state.controller.log().is_empty());
        assert!(
            input::handle_key(KeyEvent::from(KeyCode::Char('q')), &mut state).expect("quit key")
        );
    }

    #[test]
    fn action_key_failure_is_logged_not_fatal() {
        let mut state = ConsoleState {
            controller: offline_controller(),
            latch_input: LatchInput::default(),
            no_input: false,
        };
        let exit = input::handle_key(KeyEvent::from(KeyCode::Char('o')), &mut state)
            .expect("handle key");
        assert!(!exit);
        let log = state.controller.log().lines().join("\n");
        assert!(log.contains("API request failed"));
        assert!(log.contains("Action failed"));
    }
}
