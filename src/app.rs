use crate::api::analytics::MatrixQuery;
use crate::api::types::{GroupStats, Page, Register, TopDisconnected, Vehicle};
use crate::api::{AnalyticsApi, ApiClient, ApiError, AuthApi, RegistersApi, VehiclesApi};
use crate::common::constants::{self, GROUP_STATS_DAYS, TOP_DISCONNECTED_LIMIT};
use crate::config::Credentials;
use crate::event::{Event, EventHandler, EventSender, deliver};
use crate::state::edit::{EditField, RegisterEditor, SaveOutcome};
use crate::state::filters::{FilterKey, FilterMap, FilterState, FilterValue};
use crate::state::list::{ListRequest, ListState};
use crate::state::matrix::{MatrixRequest, MatrixState};
use crate::tui::Tui;
use crate::ui;
use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentView {
    Login,
    Registers,
    Vehicles,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Search,
    StartDate,
    EndDate,
}

#[derive(Debug, Default)]
pub struct InputState {
    pub mode: Option<InputMode>,
    pub buffer: String,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginField,
    pub submitting: bool,
    pub error: Option<String>,
}

/// One paginated view: its filters, the page the operator asked for, the
/// load state, and the row cursor.
#[derive(Debug)]
pub struct ListView<T> {
    pub filters: FilterState,
    pub page: u32,
    pub list: ListState<T>,
    pub table_state: TableState,
}

impl<T> ListView<T> {
    fn new() -> Self {
        Self {
            filters: FilterState::new(FilterMap::new()),
            page: 1,
            list: ListState::new(),
            table_state: TableState::default(),
        }
    }

    fn selected(&self) -> Option<&T> {
        self.table_state
            .selected()
            .and_then(|idx| self.list.items().get(idx))
    }

    fn next_row(&mut self) {
        let len = self.list.items().len();
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0, // Loop back to top
        };
        self.table_state.select(if len == 0 { None } else { Some(i) });
    }

    fn previous_row(&mut self) {
        let len = self.list.items().len();
        let i = match self.table_state.selected() {
            Some(0) | None => len.saturating_sub(1), // Loop to bottom
            Some(i) => i - 1,
        };
        self.table_state.select(if len == 0 { None } else { Some(i) });
    }

    fn group_filter(&self) -> Option<i64> {
        match self.filters.filters().get(&FilterKey::Group) {
            Some(FilterValue::Number(id)) => Some(*id),
            Some(FilterValue::Text(text)) => text.parse().ok(),
            _ => None,
        }
    }

    fn set_filter(&mut self, key: FilterKey, value: FilterValue) {
        self.filters.update(key, value);
        self.page = 1;
    }

    fn clear_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    /// Back to a never-loaded view on page 1 with the initial filters.
    fn reset(&mut self) {
        self.filters.clear();
        self.page = 1;
        self.list.invalidate();
        self.table_state.select(None);
    }

    /// Applies a fetch result. If the list clamped the requested page, the
    /// view follows it and the returned request reloads the clamped page.
    fn settle(&mut self, seq: u64, result: Result<Page<T>, ApiError>) -> Option<ListRequest> {
        if !self.list.finish(seq, result) {
            return None;
        }
        reset_selection(self);
        if self.page != self.list.page() {
            self.page = self.list.page();
            return Some(self.list.refetch());
        }
        None
    }
}

#[derive(Debug)]
pub struct App {
    pub should_quit: bool,
    pub client: ApiClient,
    pub current_view: CurrentView,
    pub login: LoginForm,
    pub input: InputState,

    pub registers: ListView<Register>,
    pub vehicles: ListView<Vehicle>,
    pub editor: Option<RegisterEditor>,
    /// Alert-level message shown over the current view until dismissed.
    pub alert: Option<String>,

    pub matrix: MatrixState,
    pub matrix_query: MatrixQuery,
    pub group_stats: Option<Result<GroupStats, String>>,
    pub top_disconnected: Option<Result<TopDisconnected, String>>,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        let current_view = if client.session().is_active() {
            CurrentView::Registers
        } else {
            CurrentView::Login
        };
        Self {
            should_quit: false,
            client,
            current_view,
            login: LoginForm::default(),
            input: InputState::default(),
            registers: ListView::new(),
            vehicles: ListView::new(),
            editor: None,
            alert: None,
            matrix: MatrixState::new(),
            matrix_query: MatrixQuery::default(),
            group_stats: None,
            top_disconnected: None,
        }
    }

    pub async fn run(
        &mut self,
        tui: &mut Tui,
        events: &mut EventHandler,
        credentials: Option<Credentials>,
    ) -> Result<()> {
        if self.current_view == CurrentView::Login {
            if let Some(creds) = credentials {
                self.login.username = creds.username;
                self.login.password = creds.password;
                self.submit_login(events.sender());
            }
        }
        self.sync_view(events.sender());

        while !self.should_quit {
            tui.draw(|f| ui::render(self, f))?;

            let event = events.next().await?;
            self.handle_event(event, events.sender());
        }
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event, tx: EventSender) {
        match event {
            Event::Tick | Event::Resize(_, _) => {}
            Event::Key(key) => {
                self.handle_key_event(key, tx.clone());
                self.sync_view(tx);
            }
            Event::LoggedIn(result) => {
                self.login.submitting = false;
                match result {
                    Ok(()) => {
                        self.login.password.clear();
                        self.login.error = None;
                        self.current_view = CurrentView::Registers;
                        self.sync_view(tx);
                    }
                    Err(e) => self.login.error = Some(e.to_string()),
                }
            }
            Event::RegistersFetched(seq, result) => {
                let ended = ends_session(&result);
                if let Some(request) = self.registers.settle(seq, result) {
                    self.spawn_registers(request, tx);
                }
                if ended {
                    self.end_session();
                }
            }
            Event::VehiclesFetched(seq, result) => {
                let ended = ends_session(&result);
                if let Some(request) = self.vehicles.settle(seq, result) {
                    self.spawn_vehicles(request, tx);
                }
                if ended {
                    self.end_session();
                }
            }
            Event::MatrixFetched(seq, result) => {
                let ended = ends_session(&result);
                self.matrix.finish(seq, result);
                if ended {
                    self.end_session();
                }
            }
            Event::GroupStatsFetched(group_id, result) => {
                if ends_session(&result) {
                    self.end_session();
                } else if self.matrix_query.group_id == Some(group_id) {
                    self.group_stats = Some(result.map_err(|e| e.to_string()));
                }
            }
            Event::TopDisconnectedFetched(result) => {
                if ends_session(&result) {
                    self.end_session();
                } else {
                    self.top_disconnected = Some(result.map_err(|e| e.to_string()));
                }
            }
            Event::RegisterSaved(result) => {
                if ends_session(&result) {
                    self.end_session();
                    return;
                }
                // The editor may already be gone; the outcome still applies.
                let outcome = match self.editor.as_mut() {
                    Some(editor) => editor.save_finished(result),
                    None => match result {
                        Ok(_) => SaveOutcome::Saved,
                        Err(e) => SaveOutcome::Failed(e.to_string()),
                    },
                };
                match outcome {
                    SaveOutcome::Saved => {
                        self.editor = None;
                        let request = self.registers.list.refetch();
                        self.spawn_registers(request, tx);
                    }
                    SaveOutcome::Failed(message) => self.alert = Some(message),
                }
            }
        }
    }

    /// Issues a load for whatever the visible view depends on, if that
    /// changed since its last load. This is the only place loads start from,
    /// apart from explicit refetches.
    pub fn sync_view(&mut self, tx: EventSender) {
        match self.current_view {
            CurrentView::Login => {}
            CurrentView::Registers => {
                let view = &mut self.registers;
                if view.list.is_stale(view.page, view.filters.filters()) {
                    let request = view.list.load(view.page, view.filters.filters());
                    self.spawn_registers(request, tx);
                }
            }
            CurrentView::Vehicles => {
                let view = &mut self.vehicles;
                if view.list.is_stale(view.page, view.filters.filters()) {
                    let request = view.list.load(view.page, view.filters.filters());
                    self.spawn_vehicles(request, tx);
                }
            }
            CurrentView::Summary => {
                if self.matrix.is_stale(&self.matrix_query) {
                    let request = self.matrix.load(self.matrix_query.clone());
                    self.spawn_summary(request, tx);
                }
            }
        }
    }

    /// The login boundary: drop credentials and any open editor, whatever
    /// view the failing request came from.
    fn end_session(&mut self) {
        tracing::info!("Session ended, returning to login");
        self.client.session().clear();
        self.reset_views();
        self.login.submitting = false;
        self.login.error = Some(ApiError::Unauthorized.to_string());
    }

    fn logout(&mut self) {
        self.client.logout();
        self.reset_views();
        self.login = LoginForm::default();
    }

    /// Nothing loaded under the old session survives; the next login starts
    /// every view from a fresh load.
    fn reset_views(&mut self) {
        self.registers.reset();
        self.vehicles.reset();
        self.matrix.invalidate();
        self.matrix_query = MatrixQuery::default();
        self.group_stats = None;
        self.top_disconnected = None;
        self.editor = None;
        self.input = InputState::default();
        self.alert = None;
        self.current_view = CurrentView::Login;
    }

    fn spawn_registers(&self, request: ListRequest, tx: EventSender) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.get_registers(request.page, &request.filters).await;
            deliver(&tx, Event::RegistersFetched(request.seq, result));
        });
    }

    fn spawn_vehicles(&self, request: ListRequest, tx: EventSender) {
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.get_vehicles(request.page, &request.filters).await;
            deliver(&tx, Event::VehiclesFetched(request.seq, result));
        });
    }

    fn spawn_summary(&mut self, request: MatrixRequest, tx: EventSender) {
        let client = self.client.clone();
        let matrix_tx = tx.clone();
        let query = request.query.clone();
        tokio::spawn(async move {
            let result = client.get_summary_matrix(&query).await;
            deliver(&matrix_tx, Event::MatrixFetched(request.seq, result));
        });

        let client = self.client.clone();
        let top_tx = tx.clone();
        tokio::spawn(async move {
            let result = client
                .get_top_disconnected(TOP_DISCONNECTED_LIMIT, GROUP_STATS_DAYS)
                .await;
            deliver(&top_tx, Event::TopDisconnectedFetched(result));
        });

        self.group_stats = None;
        if let Some(group_id) = request.query.group_id {
            let client = self.client.clone();
            tokio::spawn(async move {
                let result = client.get_group_stats(group_id, GROUP_STATS_DAYS).await;
                deliver(&tx, Event::GroupStatsFetched(group_id, result));
            });
        }
    }

    fn submit_login(&mut self, tx: EventSender) {
        if self.login.submitting || self.login.username.is_empty() {
            return;
        }
        self.login.submitting = true;
        self.login.error = None;
        let client = self.client.clone();
        let username = self.login.username.clone();
        let password = self.login.password.clone();
        tokio::spawn(async move {
            let result = client.login(&username, &password).await;
            deliver(&tx, Event::LoggedIn(result));
        });
    }

    fn submit_edit(&mut self, tx: EventSender) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        let Some((register_id, update)) = editor.begin_save() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.update_register(register_id, &update).await;
            deliver(&tx, Event::RegisterSaved(result));
        });
    }

    pub fn handle_key_event(&mut self, key: KeyEvent, tx: EventSender) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.current_view == CurrentView::Login {
            self.handle_login_key(key, tx);
            return;
        }
        if self.alert.is_some() {
            // Any key dismisses the alert.
            self.alert = None;
            return;
        }
        if self.editor.is_some() {
            self.handle_editor_key(key, tx);
            return;
        }
        if self.input.mode.is_some() {
            self.handle_input_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('1') => self.current_view = CurrentView::Registers,
            KeyCode::Char('2') => self.current_view = CurrentView::Vehicles,
            KeyCode::Char('3') => self.current_view = CurrentView::Summary,
            KeyCode::Char('L') => self.logout(),
            _ => match self.current_view {
                CurrentView::Registers => self.handle_registers_key(key, tx),
                CurrentView::Vehicles => self.handle_vehicles_key(key, tx),
                CurrentView::Summary => self.handle_summary_key(key, tx),
                CurrentView::Login => {}
            },
        }
    }

    fn handle_registers_key(&mut self, key: KeyEvent, tx: EventSender) {
        match key.code {
            KeyCode::Enter | KeyCode::Char('e') => {
                if let Some(register) = self.registers.selected() {
                    self.editor = Some(RegisterEditor::open(register));
                }
            }
            KeyCode::Char('r') => {
                let request = self.registers.list.refetch();
                self.spawn_registers(request, tx);
            }
            _ => handle_list_key(&mut self.registers, &mut self.input, key),
        }
    }

    fn handle_vehicles_key(&mut self, key: KeyEvent, tx: EventSender) {
        match key.code {
            KeyCode::Char('r') => {
                let request = self.vehicles.list.refetch();
                self.spawn_vehicles(request, tx);
            }
            _ => handle_list_key(&mut self.vehicles, &mut self.input, key),
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent, tx: EventSender) {
        match key.code {
            KeyCode::Char('s') => self.open_input(InputMode::StartDate, self.matrix_query.start_date),
            KeyCode::Char('f') => self.open_input(InputMode::EndDate, self.matrix_query.end_date),
            KeyCode::Char('g') => {
                self.matrix_query.group_id = constants::next_group(self.matrix_query.group_id);
            }
            KeyCode::Char('r') => {
                let request = self.matrix.refetch();
                self.spawn_summary(request, tx);
            }
            _ => {}
        }
    }

    fn open_input(&mut self, mode: InputMode, date: Option<NaiveDate>) {
        self.input = InputState {
            mode: Some(mode),
            buffer: date.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
            error: None,
        };
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.input = InputState::default(),
            KeyCode::Backspace => {
                self.input.buffer.pop();
            }
            KeyCode::Char(c) => self.input.buffer.push(c),
            KeyCode::Enter => self.commit_input(),
            _ => {}
        }
    }

    fn commit_input(&mut self) {
        let Some(mode) = self.input.mode else {
            return;
        };
        let text = self.input.buffer.trim().to_string();
        match mode {
            InputMode::Search => {
                let view_is_vehicles = self.current_view == CurrentView::Vehicles;
                let value = FilterValue::from(text);
                if view_is_vehicles {
                    self.vehicles.set_filter(FilterKey::Search, value);
                } else {
                    self.registers.set_filter(FilterKey::Search, value);
                }
            }
            InputMode::StartDate | InputMode::EndDate => {
                let date = if text.is_empty() {
                    None
                } else {
                    match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
                        Ok(date) => Some(date),
                        Err(_) => {
                            self.input.error = Some("Use YYYY-MM-DD".to_string());
                            return;
                        }
                    }
                };
                if mode == InputMode::StartDate {
                    self.matrix_query.start_date = date;
                } else {
                    self.matrix_query.end_date = date;
                }
            }
        }
        self.input = InputState::default();
    }

    fn handle_editor_key(&mut self, key: KeyEvent, tx: EventSender) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Esc if editor.is_saving() => {}
            KeyCode::Esc => {
                // Cancel: staged edits are dropped, nothing is sent.
                self.editor = None;
            }
            KeyCode::Enter => self.submit_edit(tx),
            KeyCode::Down | KeyCode::Tab => editor.focus_next(),
            KeyCode::Up | KeyCode::BackTab => editor.focus_prev(),
            KeyCode::Left => editor.cycle(false),
            KeyCode::Right => editor.cycle(true),
            KeyCode::Backspace => editor.pop_char(),
            KeyCode::Char(c) if editor.focus() == EditField::Comentario => editor.push_char(c),
            KeyCode::Char(' ') => editor.cycle(true),
            _ => {}
        }
    }

    fn handle_login_key(&mut self, key: KeyEvent, tx: EventSender) {
        if self.login.submitting {
            return;
        }
        let field = match self.login.focus {
            LoginField::Username => &mut self.login.username,
            LoginField::Password => &mut self.login.password,
        };
        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Down | KeyCode::Up | KeyCode::BackTab => {
                self.login.focus = match self.login.focus {
                    LoginField::Username => LoginField::Password,
                    LoginField::Password => LoginField::Username,
                };
            }
            KeyCode::Backspace => {
                field.pop();
            }
            KeyCode::Char(c) => field.push(c),
            KeyCode::Enter => {
                if self.login.focus == LoginField::Username {
                    self.login.focus = LoginField::Password;
                } else {
                    self.submit_login(tx);
                }
            }
            _ => {}
        }
    }
}

fn handle_list_key<T>(view: &mut ListView<T>, input: &mut InputState, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => view.next_row(),
        KeyCode::Char('k') | KeyCode::Up => view.previous_row(),
        KeyCode::Char('n') | KeyCode::Right => view.page = view.list.next_page(),
        KeyCode::Char('p') | KeyCode::Left => view.page = view.list.prev_page(),
        KeyCode::Char('/') => {
            *input = InputState {
                mode: Some(InputMode::Search),
                buffer: view
                    .filters
                    .filters()
                    .get(&FilterKey::Search)
                    .map(|v| v.to_string())
                    .unwrap_or_default(),
                error: None,
            };
        }
        KeyCode::Char('g') => {
            let next = constants::next_group(view.group_filter());
            view.set_filter(FilterKey::Group, FilterValue::from(next));
        }
        KeyCode::Char('c') => view.clear_filters(),
        _ => {}
    }
}

fn reset_selection<T>(view: &mut ListView<T>) {
    if view.list.items().is_empty() {
        view.table_state.select(None);
    } else {
        view.table_state.select(Some(0));
    }
}

fn ends_session<T>(result: &Result<T, ApiError>) -> bool {
    matches!(result, Err(e) if e.ends_session())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::session::{Session, Tokens};
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::mpsc;

    fn logged_in_app(dir: &TempDir) -> App {
        let session = Session::load(dir.path().join("session.json"));
        session
            .store(Tokens {
                access: "a".into(),
                refresh: "r".into(),
            })
            .unwrap();
        let config = ApiConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout: Duration::from_millis(200),
        };
        App::new(ApiClient::new(&config, session).unwrap())
    }

    fn register(id: i64) -> Register {
        serde_json::from_value(serde_json::json!({ "id": id, "comentario": "" })).unwrap()
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn test_unauthorized_from_any_view_returns_to_login() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();
        app.current_view = CurrentView::Summary;
        let request = app.matrix.load(MatrixQuery::default());

        app.handle_event(Event::MatrixFetched(request.seq, Err(ApiError::Unauthorized)), tx);

        assert_eq!(app.current_view, CurrentView::Login);
        assert!(!app.client.session().is_active());
        assert!(!dir.path().join("session.json").exists());
    }

    #[tokio::test]
    async fn test_login_after_session_end_reloads() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        let request = app.registers.list.load(1, &FilterMap::new());
        app.handle_event(Event::RegistersFetched(request.seq, Err(ApiError::Unauthorized)), tx.clone());
        assert_eq!(app.current_view, CurrentView::Login);

        app.client
            .session()
            .store(Tokens {
                access: "a2".into(),
                refresh: "r2".into(),
            })
            .unwrap();
        app.handle_event(Event::LoggedIn(Ok(())), tx.clone());

        assert_eq!(app.current_view, CurrentView::Registers);
        assert!(app.registers.list.is_loading());
        assert_eq!(app.registers.list.error(), None);
        // A response from the old session must not land in the new one.
        assert!(!app.registers.list.finish(request.seq, Ok(Page { count: 1, results: vec![register(1)] })));
    }

    #[tokio::test]
    async fn test_logout_drops_previous_rows_and_filters() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.handle_key_event(key(KeyCode::Char('g')), tx.clone());
        let request = app.registers.list.load(app.registers.page, app.registers.filters.filters());
        app.handle_event(
            Event::RegistersFetched(request.seq, Ok(Page { count: 1, results: vec![register(3)] })),
            tx.clone(),
        );
        assert_eq!(app.registers.list.items().len(), 1);

        app.handle_key_event(key(KeyCode::Char('L')), tx.clone());

        assert_eq!(app.current_view, CurrentView::Login);
        assert!(app.registers.list.items().is_empty());
        assert!(app.registers.filters.filters().is_empty());
        assert_eq!(app.registers.table_state.selected(), None);
        assert!(app.matrix.is_stale(&MatrixQuery::default()));
    }

    #[tokio::test]
    async fn test_page_past_the_end_follows_clamp() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.registers.page = 3;
        let request = app.registers.list.load(3, &FilterMap::new());
        app.handle_event(
            Event::RegistersFetched(request.seq, Ok(Page { count: 10, results: vec![] })),
            tx.clone(),
        );

        assert_eq!(app.registers.page, 1);
        assert_eq!(app.registers.list.pagination().current_page, 1);
        assert!(app.registers.list.is_loading());
        assert!(!app.registers.list.is_stale(1, &FilterMap::new()));
    }

    #[tokio::test]
    async fn test_filter_change_triggers_one_load() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.sync_view(tx.clone());
        let first = app.registers.list.refetch();
        app.sync_view(tx.clone());
        // Nothing changed, so the manual refetch is still the latest request.
        assert!(app.registers.list.finish(first.seq, Ok(Page { count: 0, results: vec![] })));

        app.handle_event(Event::Key(key(KeyCode::Char('g'))), tx.clone());
        assert!(app.registers.list.is_loading());
        assert_eq!(
            app.registers.list.filters().get(&FilterKey::Group),
            Some(&FilterValue::Number(1))
        );
        assert!(!app.registers.list.finish(first.seq, Ok(Page { count: 0, results: vec![] })));
    }

    #[tokio::test]
    async fn test_editor_cancel_and_save_refetch() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        let request = app.registers.list.load(1, &FilterMap::new());
        app.handle_event(
            Event::RegistersFetched(request.seq, Ok(Page { count: 1, results: vec![register(5)] })),
            tx.clone(),
        );
        assert_eq!(app.registers.table_state.selected(), Some(0));

        app.handle_key_event(key(KeyCode::Enter), tx.clone());
        assert!(app.editor.is_some());
        app.handle_key_event(key(KeyCode::Esc), tx.clone());
        assert!(app.editor.is_none());

        app.handle_key_event(key(KeyCode::Enter), tx.clone());
        app.editor.as_mut().unwrap().begin_save();
        app.handle_event(Event::RegisterSaved(Ok(register(5))), tx.clone());

        assert!(app.editor.is_none());
        assert!(app.registers.list.is_loading());
        assert_eq!(app.registers.list.page(), 1);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_editor_open_with_alert() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.editor = Some(RegisterEditor::open(&register(9)));
        app.editor.as_mut().unwrap().begin_save();
        app.handle_event(
            Event::RegisterSaved(Err(ApiError::Server {
                status: 500,
                body: "boom".into(),
            })),
            tx,
        );

        assert!(app.editor.is_some());
        assert!(app.alert.is_some());
    }

    #[tokio::test]
    async fn test_escape_is_ignored_while_saving() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.editor = Some(RegisterEditor::open(&register(4)));
        app.editor.as_mut().unwrap().begin_save();
        app.handle_key_event(key(KeyCode::Esc), tx.clone());
        assert!(app.editor.is_some());

        app.handle_event(Event::RegisterSaved(Ok(register(4))), tx);
        assert!(app.editor.is_none());
        assert!(app.registers.list.is_loading());
    }

    #[tokio::test]
    async fn test_save_outcome_applies_after_editor_closed() {
        let dir = TempDir::new().unwrap();
        let mut app = logged_in_app(&dir);
        let (tx, _rx) = mpsc::unbounded_channel();

        app.editor = Some(RegisterEditor::open(&register(6)));
        app.editor.as_mut().unwrap().begin_save();
        app.editor = None;
        app.handle_event(Event::RegisterSaved(Ok(register(6))), tx.clone());
        assert!(app.registers.list.is_loading());

        app.editor = Some(RegisterEditor::open(&register(6)));
        app.editor.as_mut().unwrap().begin_save();
        app.editor = None;
        app.handle_event(Event::RegisterSaved(Err(ApiError::Unauthorized)), tx);
        assert_eq!(app.current_view, CurrentView::Login);
        assert!(!app.client.session().is_active());
    }
}
