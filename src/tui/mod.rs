// Terminal UI: setup, event loop, input dispatch
//
// The loop multiplexes three sources with tokio::select!: terminal input,
// a redraw tick (which also advances the inactivity machine), and fetch
// completions from spawned tasks. Terminal state is restored on the way
// out, success or failure.

pub mod app;
pub mod login;
pub mod theme;
pub mod views;

use crate::api::ApiClient;
use crate::config::Config;
use crate::events::AppEvent;
use crate::logging::ClientLogBuffer;
use crate::session::SessionStore;
use anyhow::{Context, Result};
use app::{App, Screen, View};
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use login::LoginAction;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Redraw cadence; also the resolution of the inactivity monitor.
const TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Run the dashboard TUI until the user quits.
pub async fn run(config: Config, log_buffer: ClientLogBuffer) -> Result<()> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to set up terminal")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let (tx, mut rx) = mpsc::channel(64);
    let store = SessionStore::new(Config::app_dir());
    let client = ApiClient::new(config.api_url.clone());
    let mut app = App::new(&config, store, client, tx, log_buffer);
    app.restore_session(Instant::now());

    let result = run_event_loop(&mut terminal, &mut app, &mut rx).await;

    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("Failed to restore terminal")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rx: &mut mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let mut tick = tokio::time::interval(TICK_INTERVAL);

    loop {
        terminal
            .draw(|f| views::draw(f, app))
            .context("Failed to draw frame")?;

        tokio::select! {
            // Terminal input (poll briefly so the select stays responsive)
            _ = async {
                if event::poll(Duration::from_millis(10)).unwrap_or(false) {
                    if let Ok(ev) = event::read() {
                        handle_terminal_event(app, ev);
                    }
                }
            } => {}

            // Redraw tick drives the inactivity machine
            _ = tick.tick() => {
                app.tick(Instant::now());
            }

            // Fetch completions from background tasks
            Some(event) = rx.recv() => {
                app.handle_event(event, Instant::now());
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Route one terminal event. Every qualifying input (key press, mouse
/// press, pointer movement, scroll) counts as user activity for the
/// inactivity monitor before it does anything else.
fn handle_terminal_event(app: &mut App, ev: Event) {
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            app.on_activity(Instant::now());
            handle_key(app, key);
        }
        Event::Mouse(mouse) => {
            app.on_activity(Instant::now());
            handle_mouse(app, mouse);
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C quits from anywhere, including mid-typing on the login form
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.screen {
        Screen::Login => match app.login.handle_key(key) {
            LoginAction::Submit => app.submit_login(),
            LoginAction::Quit => app.should_quit = true,
            LoginAction::None => {}
        },
        Screen::Dashboard => handle_dashboard_key(app, key),
    }
}

fn handle_dashboard_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('o') | KeyCode::Char('O') => app.on_logout(None),
        KeyCode::Char('1') => app.on_navigate(View::Board),
        KeyCode::Char('2') => app.on_navigate(View::Report),
        KeyCode::Char('3') => app.on_navigate(View::Logs),
        KeyCode::Tab => app.on_navigate(app.dashboard.view.next()),
        KeyCode::Up => scroll_by(app, -1),
        KeyCode::Down => scroll_by(app, 1),
        KeyCode::PageUp => scroll_by(app, -10),
        KeyCode::PageDown => scroll_by(app, 10),
        KeyCode::Home => *app.dashboard.scroll_mut() = 0,
        KeyCode::End => *app.dashboard.scroll_mut() = u16::MAX, // clamped on draw
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::Dashboard {
        return;
    }
    match mouse.kind {
        MouseEventKind::ScrollUp => scroll_by(app, -3),
        MouseEventKind::ScrollDown => scroll_by(app, 3),
        _ => {}
    }
}

fn scroll_by(app: &mut App, delta: i32) {
    let scroll = app.dashboard.scroll_mut();
    *scroll = scroll.saturating_add_signed(delta as i16);
}
