// Root controller
//
// Owns the pieces of state the rest of the UI only borrows: the session
// credential, the active screen, the flash message, the inactivity monitor,
// and the fetch generation counter. It is the single writer of the session
// store. Exactly one of {login screen, dashboard screen} is active at any
// time, determined solely by session presence.

use crate::api::{ApiClient, ApiError};
use crate::config::Config;
use crate::events::AppEvent;
use crate::idle::{IdleEvent, IdleState, InactivityMonitor};
use crate::logging::ClientLogBuffer;
use crate::models::{DashboardAggregate, LogEntry};
use crate::session::SessionStore;
use crate::tui::login::LoginForm;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Standard flash texts. One channel, last-write-wins.
pub const FLASH_IDLE_WARNING: &str = "You will be logged out shortly due to inactivity.";
pub const FLASH_IDLE_EXPIRED: &str = "You have been logged out due to inactivity.";
pub const FLASH_SESSION_EXPIRED: &str = "Session expired or invalid. Please log in again.";
pub const FLASH_FETCH_FAILED: &str = "An error has occurred. Please log in again.";

/// Which screen is presented. Follows session presence and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// Dashboard views, switchable from the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Board,
    Report,
    Logs,
}

impl View {
    pub fn next(self) -> Self {
        match self {
            View::Board => View::Report,
            View::Report => View::Logs,
            View::Logs => View::Board,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            View::Board => "Dashboard",
            View::Report => "Weekly Status Report",
            View::Logs => "Sync Logs",
        }
    }
}

/// Lifecycle of the independent activity-log fetch. A failure here stays in
/// the logs panel; it never touches the session.
#[derive(Debug)]
pub enum LogsState {
    Loading,
    Loaded(Vec<LogEntry>),
    Failed(String),
}

/// Per-session-entry dashboard state, rebuilt on every login.
#[derive(Debug)]
pub struct DashboardState {
    /// The aggregate snapshot, once its fetch lands.
    pub aggregate: Option<DashboardAggregate>,
    pub logs: LogsState,
    pub view: View,
    pub board_scroll: u16,
    pub report_scroll: u16,
    pub logs_scroll: u16,
}

impl DashboardState {
    fn new() -> Self {
        Self {
            aggregate: None,
            logs: LogsState::Loading,
            view: View::default(),
            board_scroll: 0,
            report_scroll: 0,
            logs_scroll: 0,
        }
    }

    /// Scroll offset of the active view.
    pub fn scroll_mut(&mut self) -> &mut u16 {
        match self.view {
            View::Board => &mut self.board_scroll,
            View::Report => &mut self.report_scroll,
            View::Logs => &mut self.logs_scroll,
        }
    }
}

/// Application state and transition logic.
pub struct App {
    pub screen: Screen,
    pub flash: Option<String>,
    pub login: LoginForm,
    pub dashboard: DashboardState,
    pub should_quit: bool,
    pub log_buffer: ClientLogBuffer,

    session: Option<String>,
    monitor: Option<InactivityMonitor>,
    generation: u64,
    store: SessionStore,
    client: ApiClient,
    tx: mpsc::Sender<AppEvent>,
    idle_limit: Duration,
    warn_lead: Duration,
}

impl App {
    pub fn new(
        config: &Config,
        store: SessionStore,
        client: ApiClient,
        tx: mpsc::Sender<AppEvent>,
        log_buffer: ClientLogBuffer,
    ) -> Self {
        Self {
            screen: Screen::Login,
            flash: None,
            login: LoginForm::new(),
            dashboard: DashboardState::new(),
            should_quit: false,
            log_buffer,
            session: None,
            monitor: None,
            generation: 0,
            store,
            client,
            tx,
            idle_limit: config.idle_limit(),
            warn_lead: config.warn_lead(),
        }
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// Restore a persisted session on startup without validating it: the
    /// first authenticated fetch that fails is the validation point.
    pub fn restore_session(&mut self, now: Instant) {
        if let Some(token) = self.store.load() {
            tracing::info!("restored persisted session");
            self.session = Some(token);
            self.enter_dashboard(now);
        }
    }

    /// Transition into the authenticated state: fresh dashboard state, a
    /// fresh inactivity monitor, and the two independent fetches.
    fn enter_dashboard(&mut self, now: Instant) {
        self.generation += 1;
        self.screen = Screen::Dashboard;
        self.dashboard = DashboardState::new();
        self.monitor = Some(InactivityMonitor::new(self.idle_limit, self.warn_lead, now));
        self.spawn_fetches();
    }

    /// Spawn the aggregate and log fetches. They race with no defined
    /// completion order; each result is applied independently on arrival.
    fn spawn_fetches(&self) {
        let generation = self.generation;
        let token = self.session.clone();

        let client = self.client.clone();
        let tx = self.tx.clone();
        let agg_token = token.clone();
        tokio::spawn(async move {
            let result = client.fetch_dashboard(agg_token.as_deref()).await;
            let _ = tx.send(AppEvent::AggregateLoaded { generation, result }).await;
        });

        let client = self.client.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = client.fetch_logs(token.as_deref()).await;
            let _ = tx.send(AppEvent::LogsLoaded { generation, result }).await;
        });
    }

    /// Submit the login form. No-op while a previous attempt is in flight.
    pub fn submit_login(&mut self) {
        if self.login.in_flight {
            return;
        }
        self.login.in_flight = true;
        self.login.error = None;

        let generation = self.generation;
        let client = self.client.clone();
        let tx = self.tx.clone();
        let identifier = self.login.identifier.clone();
        let secret = self.login.secret.clone();
        tokio::spawn(async move {
            let result = client.authenticate(&identifier, &secret).await;
            let _ = tx.send(AppEvent::LoginCompleted { generation, result }).await;
        });
    }

    /// Successful authentication: persist, clear stale messaging, enter the
    /// authenticated state.
    fn on_login_success(&mut self, token: String, now: Instant) {
        self.store.save(&token);
        self.session = Some(token);
        self.flash = None;
        self.login = LoginForm::new();
        self.enter_dashboard(now);
    }

    /// End the session: clear the credential, tear down the monitor, revert
    /// to the login screen. `message` becomes the flash explaining why.
    pub fn on_logout(&mut self, message: Option<&str>) {
        self.store.clear();
        self.session = None;
        self.monitor = None;
        self.generation += 1;
        self.screen = Screen::Login;
        self.dashboard = DashboardState::new();
        self.login = LoginForm::new();
        self.flash = message.map(str::to_string);
    }

    pub fn on_navigate(&mut self, view: View) {
        self.dashboard.view = view;
    }

    /// Apply a fetch completion. Results stamped with an old generation
    /// belong to a session that no longer exists and are dropped unread.
    pub fn handle_event(&mut self, event: AppEvent, now: Instant) {
        if event.generation() != self.generation {
            tracing::debug!("discarding stale completion from a previous session");
            return;
        }

        match event {
            AppEvent::LoginCompleted { result, .. } => {
                self.login.in_flight = false;
                match result {
                    Ok(token) => self.on_login_success(token, now),
                    Err(err) => self.login.set_failure(&err),
                }
            }

            AppEvent::AggregateLoaded { result, .. } => match result {
                Ok(aggregate) => {
                    self.dashboard.aggregate = Some(aggregate);
                }
                // Any aggregate failure ends the session. The expired and
                // generic branches differ only in the flash text.
                Err(ApiError::SessionExpired) | Err(ApiError::Unauthenticated) => {
                    tracing::info!("dashboard fetch rejected; ending session");
                    self.on_logout(Some(FLASH_SESSION_EXPIRED));
                }
                Err(err) => {
                    tracing::warn!("dashboard fetch failed: {}", err);
                    self.on_logout(Some(FLASH_FETCH_FAILED));
                }
            },

            AppEvent::LogsLoaded { result, .. } => match result {
                Ok(logs) => self.dashboard.logs = LogsState::Loaded(logs),
                Err(err) => {
                    // Isolated: the logs panel shows the error inline and
                    // everything else keeps rendering.
                    tracing::warn!("log fetch failed: {}", err);
                    self.dashboard.logs = LogsState::Failed(err.to_string());
                }
            },
        }
    }

    /// A qualifying user-activity signal. Resets the idle counter and takes
    /// down a visible idle warning, since the period it warned about ended.
    pub fn on_activity(&mut self, now: Instant) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };
        let was_warned = monitor.state() == IdleState::Warned;
        monitor.record_activity(now);
        if was_warned && self.flash.as_deref() == Some(FLASH_IDLE_WARNING) {
            self.flash = None;
        }
    }

    /// Periodic tick: advance the inactivity machine.
    pub fn tick(&mut self, now: Instant) {
        let Some(monitor) = self.monitor.as_mut() else {
            return;
        };
        match monitor.poll(now) {
            Some(IdleEvent::Warned) => {
                self.flash = Some(FLASH_IDLE_WARNING.to_string());
            }
            Some(IdleEvent::Expired) => {
                tracing::info!("session expired from inactivity");
                self.on_logout(Some(FLASH_IDLE_EXPIRED));
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_store(name: &str) -> SessionStore {
        let dir = std::env::temp_dir().join(format!("fluxboard-app-test-{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        SessionStore::new(dir)
    }

    fn test_app(store: SessionStore) -> App {
        let (tx, _rx) = mpsc::channel(16);
        let mut config = Config::default();
        config.api_url = "http://127.0.0.1:1/v1".to_string();
        App::new(
            &config,
            store,
            ApiClient::new("http://127.0.0.1:1/v1"),
            tx,
            ClientLogBuffer::new(),
        )
    }

    // Keep the receiver alive in tests that trigger spawns so sends don't
    // just hit a closed channel.
    fn test_app_with_rx(store: SessionStore) -> (App, mpsc::Receiver<AppEvent>) {
        let (tx, rx) = mpsc::channel(16);
        let config = Config::default();
        let app = App::new(
            &config,
            store,
            ApiClient::new("http://127.0.0.1:1/v1"),
            tx,
            ClientLogBuffer::new(),
        );
        (app, rx)
    }

    #[test]
    fn test_starts_at_login_without_stored_credential() {
        let mut app = test_app(test_store("fresh"));
        app.restore_session(Instant::now());
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.has_session());
    }

    #[tokio::test]
    async fn test_starts_authenticated_with_stored_credential() {
        let store = test_store("restore");
        store.save("tok-restored");
        let (mut app, _rx) = test_app_with_rx(store);
        app.restore_session(Instant::now());
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.has_session());
    }

    #[tokio::test]
    async fn test_login_success_persists_and_clears_flash() {
        let store = test_store("login-success");
        let (mut app, _rx) = test_app_with_rx(store.clone());
        app.flash = Some(FLASH_IDLE_EXPIRED.to_string());
        let generation = app.generation;

        app.handle_event(
            AppEvent::LoginCompleted {
                generation,
                result: Ok("tok-new".to_string()),
            },
            Instant::now(),
        );

        assert_eq!(app.screen, Screen::Dashboard);
        assert_eq!(app.flash, None);
        assert_eq!(store.load(), Some("tok-new".to_string()));
    }

    #[test]
    fn test_login_failure_sets_local_error_only() {
        let mut app = test_app(test_store("login-fail"));
        let generation = app.generation;
        app.login.in_flight = true;

        app.handle_event(
            AppEvent::LoginCompleted {
                generation,
                result: Err(ApiError::InvalidCredentials),
            },
            Instant::now(),
        );

        assert_eq!(app.screen, Screen::Login);
        assert!(!app.login.in_flight);
        assert!(app.login.error.is_some());
        assert!(!app.has_session());
    }

    #[tokio::test]
    async fn test_expired_aggregate_fetch_ends_session() {
        let store = test_store("agg-expired");
        store.save("tok-stale");
        let (mut app, _rx) = test_app_with_rx(store.clone());
        app.restore_session(Instant::now());
        let generation = app.generation;

        app.handle_event(
            AppEvent::AggregateLoaded {
                generation,
                result: Err(ApiError::SessionExpired),
            },
            Instant::now(),
        );

        assert_eq!(app.screen, Screen::Login);
        assert!(!app.has_session());
        assert_eq!(app.flash.as_deref(), Some(FLASH_SESSION_EXPIRED));
        assert_eq!(store.load(), None);
    }

    #[tokio::test]
    async fn test_transport_failure_on_aggregate_also_ends_session() {
        let store = test_store("agg-failed");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        app.restore_session(Instant::now());
        let generation = app.generation;

        app.handle_event(
            AppEvent::AggregateLoaded {
                generation,
                result: Err(ApiError::FetchFailed("connection refused".to_string())),
            },
            Instant::now(),
        );

        assert_eq!(app.screen, Screen::Login);
        assert_eq!(app.flash.as_deref(), Some(FLASH_FETCH_FAILED));
    }

    #[tokio::test]
    async fn test_log_fetch_failure_is_isolated() {
        let store = test_store("logs-fail");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        app.restore_session(Instant::now());
        let generation = app.generation;

        app.handle_event(
            AppEvent::LogsLoaded {
                generation,
                result: Err(ApiError::FetchFailed("boom".to_string())),
            },
            Instant::now(),
        );

        // Session and screen untouched; only the logs panel degrades
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.has_session());
        assert!(matches!(app.dashboard.logs, LogsState::Failed(_)));
        assert_eq!(app.flash, None);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let store = test_store("stale");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        app.restore_session(Instant::now());
        let stale_generation = app.generation;

        app.on_logout(None);

        // The old fetch lands after logout: nothing may change
        app.handle_event(
            AppEvent::AggregateLoaded {
                generation: stale_generation,
                result: Ok(DashboardAggregate::default()),
            },
            Instant::now(),
        );
        assert_eq!(app.screen, Screen::Login);
        assert!(app.dashboard.aggregate.is_none());
        assert_eq!(app.flash, None);
    }

    #[tokio::test]
    async fn test_idle_warning_then_forced_logout() {
        let store = test_store("idle");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        let start = Instant::now();
        app.restore_session(start);

        // Default config: warning at 180s, expiry at 300s
        app.tick(start + Duration::from_secs(180));
        assert_eq!(app.flash.as_deref(), Some(FLASH_IDLE_WARNING));
        assert_eq!(app.screen, Screen::Dashboard);

        app.tick(start + Duration::from_secs(300));
        assert_eq!(app.screen, Screen::Login);
        assert!(!app.has_session());
        assert_eq!(app.flash.as_deref(), Some(FLASH_IDLE_EXPIRED));
    }

    #[tokio::test]
    async fn test_activity_clears_warning_and_resets_counter() {
        let store = test_store("idle-reset");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        let start = Instant::now();
        app.restore_session(start);

        app.tick(start + Duration::from_secs(180));
        assert_eq!(app.flash.as_deref(), Some(FLASH_IDLE_WARNING));

        app.on_activity(start + Duration::from_secs(200));
        assert_eq!(app.flash, None);

        // 300s from start is only 100s after the reset: still logged in
        app.tick(start + Duration::from_secs(300));
        assert_eq!(app.screen, Screen::Dashboard);
    }

    #[tokio::test]
    async fn test_activity_does_not_clear_unrelated_flash() {
        let store = test_store("idle-flash");
        store.save("tok");
        let (mut app, _rx) = test_app_with_rx(store);
        let start = Instant::now();
        app.restore_session(start);

        app.flash = Some("some other notice".to_string());
        app.on_activity(start + Duration::from_secs(1));
        assert_eq!(app.flash.as_deref(), Some("some other notice"));
    }

    #[test]
    fn test_view_cycle() {
        assert_eq!(View::Board.next(), View::Report);
        assert_eq!(View::Report.next(), View::Logs);
        assert_eq!(View::Logs.next(), View::Board);
    }
}
