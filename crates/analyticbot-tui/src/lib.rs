// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod draw;

use analyticbot_app::{AnalyticsBundle, AppCommand, AppEvent, AppState, Route, SessionRole};
use analyticbot_render::{BundleView, render_bundle};
use analyticbot_session::{
    AdminEvent, AdminWorkspace, RejectReason, SendOutcome, SessionEvent, SessionManager,
    UploadStart, UploadStatus,
};
use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use tracing::debug;

const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

/// A rendered bundle and the wire bundle it was rendered from. The view is
/// rebuilt, and its sort state dropped, only when the source changes.
#[derive(Debug, Clone, PartialEq)]
struct CachedBundle {
    source: AnalyticsBundle,
    view: BundleView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct TableFocus {
    message: usize,
    table: usize,
    column: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    bundles: BTreeMap<(SessionRole, usize), CachedBundle>,
    focus: Option<TableFocus>,
    confirm_new_chat: bool,
    upload_prompt: Option<String>,
    admin_loaded: bool,
    status_token: u64,
}

impl ViewData {
    /// The bundle drawn under the transcript: the focused one, else the
    /// latest in the active history.
    fn panel_bundle(&self, session: &SessionManager) -> Option<(usize, &BundleView)> {
        let role = session.active_role();
        if let Some(focus) = self.focus
            && let Some(cached) = self.bundles.get(&(role, focus.message))
        {
            return Some((focus.message, &cached.view));
        }
        self.bundles
            .range((role, 0)..=(role, usize::MAX))
            .next_back()
            .map(|((_, index), cached)| (*index, &cached.view))
    }
}

pub fn run_app(
    state: &mut AppState,
    session: &mut SessionManager,
    admin: &mut AdminWorkspace,
) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    let role = session.active_role();
    session.load_history(role);
    if state.route == Route::Admin {
        open_admin(admin, &mut view_data);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(
            state,
            session,
            admin,
            &mut view_data,
            &internal_tx,
            &internal_rx,
        );

        if let Err(error) =
            terminal.draw(|frame| draw::render(frame, state, session, admin, &view_data))
        {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, session, admin, &mut view_data, &internal_tx, key)
                    {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    session: &mut SessionManager,
    admin: &mut AdminWorkspace,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }

    for event in session.process_events() {
        handle_session_event(state, session, view_data, tx, event);
    }
    for event in admin.process_events() {
        handle_admin_event(state, session, admin, view_data, tx, event);
    }
    sync_bundle_views(session, view_data);
}

fn handle_session_event(
    state: &mut AppState,
    session: &SessionManager,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: SessionEvent,
) {
    let i18n = *session.localizer();
    match event {
        SessionEvent::HistoryLoadFailed { error, .. } | SessionEvent::ReplyFailed { error, .. } => {
            emit_status(
                state,
                view_data,
                tx,
                format!("{}: {error}", i18n.translate("error")),
            );
        }
        SessionEvent::Discarded { role, request_id } => {
            debug!(role = role.as_str(), request_id = request_id.get(), "response dropped by ui");
        }
        SessionEvent::HistoryLoaded { .. }
        | SessionEvent::ReplyAppended { .. }
        | SessionEvent::HistoryCleared { .. }
        | SessionEvent::HistoryClearFailed { .. } => {}
    }
}

fn handle_admin_event(
    state: &mut AppState,
    session: &SessionManager,
    admin: &AdminWorkspace,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: AdminEvent,
) {
    let i18n = *session.localizer();
    match event {
        AdminEvent::FilesLoaded { .. } => view_data.admin_loaded = true,
        AdminEvent::Uploaded { .. } | AdminEvent::UploadFailed { .. } => {
            let status = match admin.upload_status() {
                Some(UploadStatus::Success(info)) => {
                    format!("{}: {info}", i18n.translate("success"))
                }
                Some(UploadStatus::Error(error)) => format!("{}: {error}", i18n.translate("error")),
                None => return,
            };
            emit_status(state, view_data, tx, status);
        }
        AdminEvent::Failed { action, error } => {
            emit_status(
                state,
                view_data,
                tx,
                format!("{}: {action}: {error}", i18n.translate("error")),
            );
        }
        AdminEvent::PreviewLoaded { .. }
        | AdminEvent::PreviewDiscarded { .. }
        | AdminEvent::UsersLoaded { .. } => {}
    }
}

/// Keeps one bundle view per assistant turn in the active history.
fn sync_bundle_views(session: &SessionManager, view_data: &mut ViewData) {
    let role = session.active_role();
    let history = session.active_history();
    view_data.bundles.retain(|(cached_role, index), cached| {
        *cached_role != role
            || history
                .get(*index)
                .and_then(|message| message.bundle.as_ref())
                == Some(&cached.source)
    });
    for (index, message) in history.iter().enumerate() {
        if let Some(bundle) = &message.bundle {
            view_data
                .bundles
                .entry((role, index))
                .or_insert_with(|| CachedBundle {
                    source: bundle.clone(),
                    view: render_bundle(bundle),
                });
        }
    }

    if let Some(focus) = view_data.focus {
        let valid = view_data
            .bundles
            .get(&(role, focus.message))
            .and_then(|cached| cached.view.tables().get(focus.table))
            .is_some();
        if !valid {
            view_data.focus = None;
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn is_ctrl(key: &KeyEvent, letter: char) -> bool {
    key.code == KeyCode::Char(letter) && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Returns `true` when the app should quit.
fn handle_key_event(
    state: &mut AppState,
    session: &mut SessionManager,
    admin: &mut AdminWorkspace,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if is_ctrl(&key, 'c') {
        return true;
    }

    if view_data.confirm_new_chat {
        handle_confirm_key(state, session, view_data, internal_tx, key);
        return false;
    }

    if view_data.upload_prompt.is_some() {
        handle_upload_prompt_key(state, session, admin, view_data, internal_tx, key);
        return false;
    }

    if is_ctrl(&key, 'l') {
        let mut i18n = *session.localizer();
        let language = i18n.toggle();
        session.set_localizer(i18n);
        admin.set_localizer(i18n);
        emit_status(
            state,
            view_data,
            internal_tx,
            format!("{}: {}", i18n.translate("language"), language.as_str()),
        );
        return false;
    }

    if is_ctrl(&key, 'r') {
        let events = state.dispatch(AppCommand::ToggleRole);
        apply_app_events(state, session, admin, view_data, internal_tx, events);
        return false;
    }

    if key.code == KeyCode::Tab {
        let events = state.dispatch(AppCommand::NextRoute);
        apply_app_events(state, session, admin, view_data, internal_tx, events);
        return false;
    }

    if key.code == KeyCode::Esc {
        if view_data.focus.take().is_some() {
            return false;
        }
        return true;
    }

    match state.route {
        Route::Chat => handle_chat_key(state, session, view_data, internal_tx, key),
        Route::Admin => handle_admin_key(admin, view_data, key),
    }
    false
}

fn apply_app_events(
    state: &mut AppState,
    session: &mut SessionManager,
    admin: &mut AdminWorkspace,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    events: Vec<AppEvent>,
) {
    let i18n = *session.localizer();
    for event in events {
        match event {
            AppEvent::RoleChanged(role) => {
                view_data.focus = None;
                session.switch_role(role);
                let label = match role {
                    SessionRole::Admin => i18n.translate("admin_user"),
                    SessionRole::User => i18n.translate("standard_user"),
                };
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("{}: {label}", i18n.translate("role")),
                );
            }
            AppEvent::RouteChanged(Route::Admin) => open_admin(admin, view_data),
            AppEvent::RouteChanged(Route::Chat)
            | AppEvent::RouteRedirected { .. }
            | AppEvent::StatusUpdated(_)
            | AppEvent::StatusCleared => {}
        }
    }
}

fn open_admin(admin: &mut AdminWorkspace, view_data: &mut ViewData) {
    view_data.focus = None;
    admin.refresh_files();
    admin.load_users();
}

fn handle_confirm_key(
    state: &mut AppState,
    session: &mut SessionManager,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            view_data.confirm_new_chat = false;
            view_data.focus = None;
            let role = session.active_role();
            if session.reset_history(role, |_| true) {
                let label = session.localizer().translate("new_chat").to_owned();
                emit_status(state, view_data, internal_tx, label);
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            view_data.confirm_new_chat = false;
        }
        _ => {}
    }
}

fn handle_upload_prompt_key(
    state: &mut AppState,
    session: &SessionManager,
    admin: &mut AdminWorkspace,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(input) = view_data.upload_prompt.as_mut() else {
        return;
    };
    match key.code {
        KeyCode::Esc => view_data.upload_prompt = None,
        KeyCode::Backspace => {
            input.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => input.push(ch),
        KeyCode::Enter => {
            let path = input.trim().to_owned();
            if path.is_empty() {
                return;
            }
            view_data.upload_prompt = None;
            let i18n = *session.localizer();
            let status = match admin.upload(Path::new(&path)) {
                UploadStart::Started => i18n.translate("uploading").to_owned(),
                UploadStart::Busy => i18n.translate("uploading").to_owned(),
                UploadStart::Unsupported => match admin.upload_status() {
                    Some(UploadStatus::Error(error)) => error.clone(),
                    _ => i18n.translate("error").to_owned(),
                },
            };
            emit_status(state, view_data, internal_tx, status);
        }
        _ => {}
    }
}

fn handle_chat_key(
    state: &mut AppState,
    session: &mut SessionManager,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if is_ctrl(&key, 'n') {
        view_data.confirm_new_chat = true;
        return;
    }

    if is_ctrl(&key, 't') {
        cycle_table_focus(session, view_data);
        return;
    }

    if view_data.focus.is_some() {
        handle_table_key(state, session, view_data, internal_tx, key);
        return;
    }

    match key.code {
        KeyCode::Enter => match session.submit() {
            SendOutcome::Sent { .. } | SendOutcome::Rejected(RejectReason::EmptyInput) => {}
            SendOutcome::Rejected(RejectReason::Pending) => {
                let label = session.localizer().translate("analyzing").to_owned();
                emit_status(state, view_data, internal_tx, label);
            }
        },
        KeyCode::Backspace => {
            session.composer_mut().pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            session.composer_mut().push(ch);
        }
        _ => {}
    }
}

/// Steps through the tables of the latest bundle, then back to the composer.
fn cycle_table_focus(session: &SessionManager, view_data: &mut ViewData) {
    let role = session.active_role();
    let latest = view_data
        .bundles
        .range((role, 0)..=(role, usize::MAX))
        .rev()
        .find(|(_, cached)| !cached.view.tables().is_empty())
        .map(|((_, index), cached)| (*index, cached.view.tables().len()));
    let Some((message, table_count)) = latest else {
        view_data.focus = None;
        return;
    };

    view_data.focus = match view_data.focus {
        Some(focus) if focus.message == message && focus.table + 1 < table_count => {
            Some(TableFocus {
                message,
                table: focus.table + 1,
                column: 0,
            })
        }
        Some(_) => None,
        None => Some(TableFocus {
            message,
            table: 0,
            column: 0,
        }),
    };
}

fn handle_table_key(
    state: &mut AppState,
    session: &SessionManager,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(mut focus) = view_data.focus else {
        return;
    };
    let role = session.active_role();
    let Some(table) = view_data
        .bundles
        .get_mut(&(role, focus.message))
        .and_then(|cached| cached.view.table_mut(focus.table))
    else {
        view_data.focus = None;
        return;
    };
    let column_count = table.config().columns.len();

    match key.code {
        KeyCode::Left => focus.column = focus.column.saturating_sub(1),
        KeyCode::Right => {
            focus.column = (focus.column + 1).min(column_count.saturating_sub(1));
        }
        KeyCode::Char('s') => {
            let Some(column) = table.config().columns.get(focus.column).cloned() else {
                return;
            };
            if let Some(direction) = table.toggle_sort(&column) {
                emit_status(
                    state,
                    view_data,
                    internal_tx,
                    format!("{column} {}", direction.marker()),
                );
            }
        }
        _ => {}
    }
    view_data.focus = Some(focus);
}

fn handle_admin_key(admin: &mut AdminWorkspace, view_data: &mut ViewData, key: KeyEvent) {
    match key.code {
        KeyCode::Up => admin.select_relative(-1),
        KeyCode::Down => admin.select_relative(1),
        KeyCode::Enter => {
            if let Some(selected) = admin.selected_file().map(str::to_owned) {
                admin.select_file(&selected);
            }
        }
        KeyCode::Char('u') => view_data.upload_prompt = Some(String::new()),
        KeyCode::Char('r') => {
            admin.refresh_files();
            admin.load_users();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::{
        InternalEvent, TableFocus, ViewData, draw, handle_key_event, process_internal_events,
        sync_bundle_views,
    };
    use analyticbot_app::{AppState, ChatRole, Language, Localizer, Route, SessionRole};
    use analyticbot_render::{SortDirection, render_chart};
    use analyticbot_session::{AdminWorkspace, Backend, SessionManager, UploadStatus};
    use analyticbot_testkit::{DemoBackend, sample_bundle};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;
    use std::sync::mpsc::{self, Receiver, Sender};
    use std::thread;
    use std::time::{Duration, Instant};

    const WAIT: Duration = Duration::from_secs(5);

    struct Harness {
        state: AppState,
        session: SessionManager,
        admin: AdminWorkspace,
        view_data: ViewData,
        tx: Sender<InternalEvent>,
        rx: Receiver<InternalEvent>,
    }

    impl Harness {
        fn new() -> Self {
            let backend: Arc<dyn Backend> = Arc::new(DemoBackend::default());
            let (tx, rx) = mpsc::channel();
            Self {
                state: AppState::default(),
                session: SessionManager::new(
                    Arc::clone(&backend),
                    SessionRole::User,
                    Localizer::default(),
                ),
                admin: AdminWorkspace::new(backend, Localizer::default()),
                view_data: ViewData::default(),
                tx,
                rx,
            }
        }

        fn press(&mut self, code: KeyCode) -> bool {
            self.key(KeyEvent::new(code, KeyModifiers::NONE))
        }

        fn ctrl(&mut self, letter: char) -> bool {
            self.key(KeyEvent::new(KeyCode::Char(letter), KeyModifiers::CONTROL))
        }

        fn key(&mut self, key: KeyEvent) -> bool {
            handle_key_event(
                &mut self.state,
                &mut self.session,
                &mut self.admin,
                &mut self.view_data,
                &self.tx,
                key,
            )
        }

        fn type_text(&mut self, text: &str) {
            for ch in text.chars() {
                self.press(KeyCode::Char(ch));
            }
        }

        /// Runs ui ticks until no background work is left.
        fn settle(&mut self) {
            let deadline = Instant::now() + WAIT;
            loop {
                process_internal_events(
                    &mut self.state,
                    &mut self.session,
                    &mut self.admin,
                    &mut self.view_data,
                    &self.tx,
                    &self.rx,
                );
                if (self.session.is_idle() && self.admin.is_idle()) || Instant::now() > deadline
                {
                    break;
                }
                thread::sleep(Duration::from_millis(5));
            }
        }

        fn draw(&self) -> String {
            let mut terminal =
                Terminal::new(TestBackend::new(120, 48)).expect("test terminal");
            terminal
                .draw(|frame| {
                    draw::render(
                        frame,
                        &self.state,
                        &self.session,
                        &self.admin,
                        &self.view_data,
                    )
                })
                .expect("draw frame");
            let buffer = terminal.backend().buffer();
            let width = buffer.area.width as usize;
            buffer
                .content()
                .chunks(width)
                .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
                .collect::<Vec<_>>()
                .join("\n")
        }
    }

    #[test]
    fn typing_and_enter_sends_the_composer() {
        let mut harness = Harness::new();
        harness.type_text("revenue by region");
        assert_eq!(harness.session.composer(), "revenue by region");

        harness.press(KeyCode::Enter);
        assert_eq!(harness.session.composer(), "");
        assert!(harness.session.is_pending(SessionRole::User));

        harness.settle();
        let history = harness.session.active_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[1].content, "revenue by region");
        assert_eq!(history[2].role, ChatRole::Assistant);
        assert_eq!(harness.view_data.bundles.len(), 1);
    }

    #[test]
    fn backspace_edits_and_blank_enter_is_ignored() {
        let mut harness = Harness::new();
        harness.type_text("ab");
        harness.press(KeyCode::Backspace);
        assert_eq!(harness.session.composer(), "a");
        harness.press(KeyCode::Backspace);
        harness.press(KeyCode::Enter);
        assert_eq!(harness.session.active_history().len(), 1);
    }

    #[test]
    fn quit_keys() {
        let mut harness = Harness::new();
        assert!(harness.ctrl('c'));
        assert!(harness.press(KeyCode::Esc));
    }

    #[test]
    fn new_chat_requires_confirmation() {
        let mut harness = Harness::new();
        harness.type_text("hello");
        harness.press(KeyCode::Enter);
        harness.settle();
        assert_eq!(harness.session.active_history().len(), 3);

        harness.ctrl('n');
        assert!(harness.view_data.confirm_new_chat);
        harness.press(KeyCode::Char('n'));
        assert!(!harness.view_data.confirm_new_chat);
        harness.settle();
        assert_eq!(harness.session.active_history().len(), 3);

        harness.ctrl('n');
        assert!(!harness.press(KeyCode::Esc));
        assert!(!harness.view_data.confirm_new_chat);

        harness.ctrl('n');
        harness.press(KeyCode::Char('y'));
        harness.settle();
        let history = harness.session.active_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, ChatRole::Assistant);
        assert!(harness.view_data.bundles.is_empty());
    }

    #[test]
    fn role_toggle_switches_conversation_and_navigation() {
        let mut harness = Harness::new();
        harness.type_text("hello");
        harness.press(KeyCode::Enter);
        harness.settle();

        harness.ctrl('r');
        harness.settle();
        assert_eq!(harness.state.role, SessionRole::Admin);
        assert_eq!(harness.session.active_role(), SessionRole::Admin);
        assert_eq!(harness.session.active_history().len(), 1);

        harness.press(KeyCode::Tab);
        harness.settle();
        assert_eq!(harness.state.route, Route::Admin);
        assert_eq!(harness.admin.files().len(), 2);

        harness.ctrl('r');
        harness.settle();
        assert_eq!(harness.state.role, SessionRole::User);
        assert_eq!(harness.state.route, Route::Chat);
        assert_eq!(harness.session.active_history().len(), 2);
    }

    #[test]
    fn tab_does_not_reach_admin_as_user() {
        let mut harness = Harness::new();
        harness.press(KeyCode::Tab);
        assert_eq!(harness.state.route, Route::Chat);
    }

    #[test]
    fn language_toggle_reaches_session_and_admin() {
        let mut harness = Harness::new();
        harness.ctrl('l');
        assert_eq!(harness.session.localizer().language(), Language::Ar);
        assert_eq!(harness.state.status_line.as_deref(), Some("اللغة: ar"));

        harness.ctrl('l');
        assert_eq!(harness.session.localizer().language(), Language::En);
    }

    #[test]
    fn table_focus_sorts_the_latest_bundle() {
        let mut harness = Harness::new();
        harness.type_text("regions");
        harness.press(KeyCode::Enter);
        harness.settle();

        harness.ctrl('t');
        assert_eq!(
            harness.view_data.focus,
            Some(TableFocus {
                message: 2,
                table: 0,
                column: 0,
            })
        );

        harness.press(KeyCode::Right);
        harness.press(KeyCode::Char('s'));
        let role = harness.session.active_role();
        let table = &harness.view_data.bundles[&(role, 2)].view.tables()[0];
        assert_eq!(table.sort_state().key.as_deref(), Some("revenue"));
        assert_eq!(table.sort_state().direction, SortDirection::Asc);

        harness.press(KeyCode::Char('s'));
        let table = &harness.view_data.bundles[&(role, 2)].view.tables()[0];
        assert_eq!(table.sort_state().direction, SortDirection::Desc);
        assert_eq!(harness.session.composer(), "");

        harness.settle();
        let table = &harness.view_data.bundles[&(role, 2)].view.tables()[0];
        assert_eq!(table.sort_state().direction, SortDirection::Desc);

        assert!(!harness.press(KeyCode::Esc));
        assert_eq!(harness.view_data.focus, None);
    }

    #[test]
    fn focus_column_is_clamped() {
        let mut harness = Harness::new();
        harness.type_text("regions");
        harness.press(KeyCode::Enter);
        harness.settle();

        harness.ctrl('t');
        harness.press(KeyCode::Left);
        for _ in 0..10 {
            harness.press(KeyCode::Right);
        }
        assert_eq!(harness.view_data.focus.map(|focus| focus.column), Some(2));

        harness.ctrl('t');
        assert_eq!(harness.view_data.focus, None);
    }

    #[test]
    fn reloaded_history_rebuilds_views() {
        let mut harness = Harness::new();
        harness.type_text("regions");
        harness.press(KeyCode::Enter);
        harness.settle();

        harness.ctrl('t');
        harness.press(KeyCode::Char('s'));
        harness.session.load_history(SessionRole::User);
        harness.settle();

        // The stored history has no welcome turn, so the reply moves up.
        let role = harness.session.active_role();
        let keys = harness.view_data.bundles.keys().copied().collect::<Vec<_>>();
        assert_eq!(keys, vec![(role, 1)]);
        let table = &harness.view_data.bundles[&(role, 1)].view.tables()[0];
        assert_eq!(table.sort_state().key, None);
        assert_eq!(harness.view_data.focus, None);
    }

    #[test]
    fn sync_drops_views_for_removed_turns() {
        let mut harness = Harness::new();
        let bundle = sample_bundle().expect("sample bundle");
        let role = harness.session.active_role();
        harness.view_data.bundles.insert(
            (role, 7),
            super::CachedBundle {
                view: analyticbot_render::render_bundle(&bundle),
                source: bundle,
            },
        );
        harness.view_data.focus = Some(TableFocus {
            message: 7,
            table: 0,
            column: 0,
        });

        sync_bundle_views(&harness.session, &mut harness.view_data);
        assert!(harness.view_data.bundles.is_empty());
        assert_eq!(harness.view_data.focus, None);
    }

    #[test]
    fn admin_keys_drive_the_workspace() {
        let mut harness = Harness::new();
        harness.ctrl('r');
        harness.press(KeyCode::Tab);
        harness.settle();
        assert_eq!(harness.admin.selected_file(), Some("sales_2025.csv"));
        assert_eq!(harness.admin.users().len(), 2);

        harness.press(KeyCode::Down);
        harness.settle();
        assert_eq!(harness.admin.selected_file(), Some("inventory.xlsx"));
        assert_eq!(
            harness.admin.preview().map(|preview| preview.filename.as_str()),
            Some("inventory.xlsx")
        );

        harness.press(KeyCode::Down);
        harness.settle();
        assert_eq!(harness.admin.selected_file(), Some("sales_2025.csv"));
    }

    #[test]
    fn upload_prompt_rejects_unsupported_types() {
        let mut harness = Harness::new();
        harness.ctrl('r');
        harness.press(KeyCode::Tab);
        harness.settle();

        harness.press(KeyCode::Char('u'));
        assert_eq!(harness.view_data.upload_prompt.as_deref(), Some(""));
        harness.type_text("notes.txt");
        harness.press(KeyCode::Enter);
        assert_eq!(harness.view_data.upload_prompt, None);
        assert_eq!(
            harness.admin.upload_status(),
            Some(&UploadStatus::Error(
                "Unsupported file type: notes.txt".to_owned()
            ))
        );
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("Unsupported file type: notes.txt")
        );
    }

    #[test]
    fn upload_prompt_uploads_and_refreshes() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("targets.csv");
        std::fs::write(&path, "region,target\nNorth,10\n")?;

        let mut harness = Harness::new();
        harness.ctrl('r');
        harness.press(KeyCode::Tab);
        harness.settle();

        harness.press(KeyCode::Char('u'));
        harness.type_text(&path.display().to_string());
        harness.press(KeyCode::Enter);
        harness.settle();
        harness.settle();

        assert!(harness.admin.files().iter().any(|file| file == "targets.csv"));
        assert_eq!(
            harness.state.status_line.as_deref(),
            Some("Success: file 'targets.csv' saved successfully")
        );
        Ok(())
    }

    #[test]
    fn status_clear_ignores_stale_tokens() {
        let mut harness = Harness::new();
        harness.ctrl('l');
        harness.ctrl('l');
        harness
            .tx
            .send(InternalEvent::ClearStatus { token: 1 })
            .expect("send");
        harness.settle();
        assert!(harness.state.status_line.is_some());

        harness
            .tx
            .send(InternalEvent::ClearStatus { token: 2 })
            .expect("send");
        harness.settle();
        assert_eq!(harness.state.status_line, None);
    }

    #[test]
    fn chat_screen_draws_bundle_sections() {
        let mut harness = Harness::new();
        harness.settle();
        harness.type_text("regions");
        harness.press(KeyCode::Enter);
        harness.settle();

        let screen = harness.draw();
        assert!(screen.contains("AnalyticBot"));
        assert!(screen.contains("Monthly Revenue"));
        assert!(screen.contains("Revenue Share by Region"));
        assert!(screen.contains("Regional Breakdown"));
        assert!(screen.contains("Total Revenue"));
    }

    #[test]
    fn admin_screen_draws_preview_footer() {
        let mut harness = Harness::new();
        harness.ctrl('r');
        harness.press(KeyCode::Tab);
        harness.settle();

        let screen = harness.draw();
        assert!(screen.contains("Uploaded Files"));
        assert!(screen.contains("> sales_2025.csv"));
        assert!(screen.contains("Showing first 10 rows of 48 total rows"));
        assert!(screen.contains("analyst"));
    }

    #[test]
    fn transcript_rewrites_asset_links() {
        let harness = Harness::new();
        let mut message = analyticbot_app::Message::assistant("![Chart](/static/a.png)");
        message.image = Some("/static/a.png".to_owned());
        let i18n = Localizer::default();
        let lines = draw::message_lines(&message, "http://localhost:8000", &i18n);
        assert_eq!(lines[0], "• ![Chart](http://localhost:8000/static/a.png)");
        assert_eq!(lines[1], "  [Chart] http://localhost:8000/static/a.png");
        assert!(harness.view_data.bundles.is_empty());
    }

    #[test]
    fn user_turns_rewrite_asset_links_too() {
        let message = analyticbot_app::Message::user("like ![this](/static/b.png)?");
        let lines = draw::message_lines(&message, "http://localhost:8000", &Localizer::default());
        assert_eq!(lines, vec!["› like ![this](http://localhost:8000/static/b.png)?"]);
    }

    #[test]
    fn pending_send_shows_analyzing_line() {
        let mut harness = Harness::new();
        harness.type_text("hello");
        harness.press(KeyCode::Enter);
        let lines = draw::transcript_lines(&harness.session, &harness.view_data);
        assert_eq!(lines.last().map(String::as_str), Some("• Analyzing data..."));
        harness.settle();
    }

    #[test]
    fn kpi_lines_follow_wire_fields() -> anyhow::Result<()> {
        let bundle = sample_bundle()?;
        let cards = bundle
            .kpis
            .iter()
            .map(analyticbot_render::render_kpi)
            .collect::<Vec<_>>();

        let total = draw::kpi_card_lines(&cards[0]);
        assert!(total[0].ends_with(" USD"));
        assert!(total[1].starts_with("▲ +"));
        assert_eq!(total.len(), 3);

        let average = draw::kpi_card_lines(&cards[1]);
        assert_eq!(average[1], "");

        let regions = draw::kpi_card_lines(&cards[2]);
        assert_eq!(regions, vec!["5".to_owned(), "● 0.0%".to_owned()]);
        Ok(())
    }

    #[test]
    fn pie_legend_shows_shares() -> anyhow::Result<()> {
        let bundle = sample_bundle()?;
        let analyticbot_render::ChartView::Pie(pie) = render_chart(&bundle.charts[1]) else {
            panic!("expected pie chart");
        };
        let lines = draw::pie_legend_lines(&pie);
        assert_eq!(lines.len(), pie.slices.len());
        let text = lines[0]
            .spans
            .iter()
            .map(|span| span.content.as_ref())
            .collect::<String>();
        assert!(text.starts_with("■ "));
        assert!(text.ends_with("%)"));
        Ok(())
    }

    #[test]
    fn number_formatting() {
        assert_eq!(draw::format_number(1200.0), "1200");
        assert_eq!(draw::format_number(0.125), "0.13");
    }

    #[test]
    fn rtl_status_uses_arabic_catalog() {
        let mut i18n = Localizer::default();
        i18n.set_language(Language::Ar);
        let state = AppState::default();
        assert!(draw::status_text(&state, &i18n).starts_with(i18n.translate("quit_hint")));
        assert!(draw::header_title(&state, &i18n).contains(i18n.translate("app_name")));
    }
}
