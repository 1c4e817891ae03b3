// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{ChatReply, ChatRequest, Localizer, Message, RequestId, SessionRole};
use anyhow::Result;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    EmptyInput,
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Sent { request_id: RequestId },
    Rejected(RejectReason),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    HistoryLoaded { role: SessionRole },
    HistoryLoadFailed { role: SessionRole, error: String },
    ReplyAppended { role: SessionRole },
    ReplyFailed { role: SessionRole, error: String },
    HistoryCleared { role: SessionRole },
    HistoryClearFailed { role: SessionRole, error: String },
    Discarded { role: SessionRole, request_id: RequestId },
}

enum Outcome {
    History(Result<Vec<Message>>),
    Reply(Result<ChatReply>),
    Cleared(Result<()>),
}

struct Completion {
    role: SessionRole,
    request_id: RequestId,
    outcome: Outcome,
}

/// Role-scoped conversation state synchronized with the backend.
///
/// Remote calls run on background threads. Their results are applied only by
/// [`SessionManager::process_events`] (or [`SessionManager::wait_idle`]) on the
/// thread that owns the manager, so histories are never mutated concurrently.
pub struct SessionManager {
    backend: Arc<dyn Backend>,
    i18n: Localizer,
    active: SessionRole,
    histories: BTreeMap<SessionRole, Vec<Message>>,
    composer: String,
    pending_sends: BTreeMap<SessionRole, RequestId>,
    latest_loads: BTreeMap<SessionRole, RequestId>,
    last_request_id: RequestId,
    outstanding: usize,
    tx: Sender<Completion>,
    rx: Receiver<Completion>,
}

impl SessionManager {
    pub fn new(backend: Arc<dyn Backend>, role: SessionRole, i18n: Localizer) -> Self {
        let (tx, rx) = mpsc::channel();
        let welcome = Message::assistant(i18n.translate("welcome_message"));
        let histories = SessionRole::ALL
            .into_iter()
            .map(|role| (role, vec![welcome.clone()]))
            .collect();

        Self {
            backend,
            i18n,
            active: role,
            histories,
            composer: String::new(),
            pending_sends: BTreeMap::new(),
            latest_loads: BTreeMap::new(),
            last_request_id: RequestId::new(0),
            outstanding: 0,
            tx,
            rx,
        }
    }

    pub fn active_role(&self) -> SessionRole {
        self.active
    }

    pub fn localizer(&self) -> &Localizer {
        &self.i18n
    }

    /// Later welcome and error turns use the new language.
    pub fn set_localizer(&mut self, i18n: Localizer) {
        self.i18n = i18n;
    }

    pub fn asset_origin(&self) -> &str {
        self.backend.asset_origin()
    }

    pub fn history(&self, role: SessionRole) -> &[Message] {
        self.histories.get(&role).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn active_history(&self) -> &[Message] {
        self.history(self.active)
    }

    pub fn is_pending(&self, role: SessionRole) -> bool {
        self.pending_sends.contains_key(&role)
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    pub fn composer(&self) -> &str {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut String {
        &mut self.composer
    }

    pub fn set_composer(&mut self, text: impl Into<String>) {
        self.composer = text.into();
    }

    /// Makes `role` active and reloads its history. Returns `None` when the
    /// role was already active.
    pub fn switch_role(&mut self, role: SessionRole) -> Option<RequestId> {
        if role == self.active {
            return None;
        }
        self.active = role;
        Some(self.load_history(role))
    }

    pub fn load_history(&mut self, role: SessionRole) -> RequestId {
        let request_id = self.next_request_id();
        self.latest_loads.insert(role, request_id);
        debug!(role = role.as_str(), request_id = request_id.get(), "loading history");
        self.spawn(role, request_id, move |backend| {
            Outcome::History(backend.fetch_history(role))
        });
        request_id
    }

    /// Sends the composer contents for the active role.
    pub fn submit(&mut self) -> SendOutcome {
        let text = self.composer.clone();
        self.send_message(&text)
    }

    /// Appends the user turn right away and posts it. Blank input and a send
    /// already in flight for the role are rejected without side effects.
    pub fn send_message(&mut self, text: &str) -> SendOutcome {
        let role = self.active;
        if text.trim().is_empty() {
            return SendOutcome::Rejected(RejectReason::EmptyInput);
        }
        if self.is_pending(role) {
            return SendOutcome::Rejected(RejectReason::Pending);
        }

        self.histories
            .entry(role)
            .or_default()
            .push(Message::user(text));
        self.composer.clear();

        let request_id = self.next_request_id();
        self.pending_sends.insert(role, request_id);
        let request = ChatRequest {
            message: text.to_owned(),
            role,
        };
        info!(role = role.as_str(), request_id = request_id.get(), "sending chat message");
        self.spawn(role, request_id, move |backend| {
            Outcome::Reply(backend.send_chat(&request))
        });
        SendOutcome::Sent { request_id }
    }

    /// Starts a fresh conversation for `role` once `confirm` accepts the
    /// localized prompt. The history is reseeded right away; the remote
    /// delete runs in the background and its outcome is only logged.
    pub fn reset_history<F>(&mut self, role: SessionRole, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(self.i18n.translate("confirm_new_chat")) {
            return false;
        }

        let welcome = self.welcome();
        self.histories.insert(role, vec![welcome]);

        let request_id = self.next_request_id();
        // Loads and replies still in flight for the role predate the reset.
        self.latest_loads.insert(role, request_id);
        if let Some(superseded) = self.pending_sends.remove(&role) {
            debug!(
                role = role.as_str(),
                request_id = superseded.get(),
                "reset supersedes pending send"
            );
        }
        info!(role = role.as_str(), request_id = request_id.get(), "clearing history");
        self.spawn(role, request_id, move |backend| {
            Outcome::Cleared(backend.clear_history(role))
        });
        true
    }

    /// Applies every completion that has arrived so far.
    pub fn process_events(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(completion) = self.rx.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            events.push(self.apply(completion));
        }
        events
    }

    /// Blocks until nothing is outstanding or `timeout` elapses, applying
    /// completions as they arrive.
    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<SessionEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.process_events();
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(completion) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    events.push(self.apply(completion));
                }
                Err(_) => break,
            }
        }
        events
    }

    fn apply(&mut self, completion: Completion) -> SessionEvent {
        let Completion {
            role,
            request_id,
            outcome,
        } = completion;

        match outcome {
            Outcome::History(result) => {
                let latest = self.latest_loads.get(&role) == Some(&request_id);
                if role != self.active || !latest {
                    debug!(
                        role = role.as_str(),
                        request_id = request_id.get(),
                        "discarding stale history"
                    );
                    return SessionEvent::Discarded { role, request_id };
                }
                match result {
                    Ok(messages) if messages.is_empty() => {
                        let welcome = self.welcome();
                        self.histories.insert(role, vec![welcome]);
                        SessionEvent::HistoryLoaded { role }
                    }
                    Ok(messages) => {
                        self.histories.insert(role, messages);
                        SessionEvent::HistoryLoaded { role }
                    }
                    Err(error) => {
                        warn!(role = role.as_str(), error = %error, "failed to load history");
                        SessionEvent::HistoryLoadFailed {
                            role,
                            error: error.to_string(),
                        }
                    }
                }
            }
            Outcome::Reply(result) => {
                if self.pending_sends.get(&role) != Some(&request_id) {
                    debug!(
                        role = role.as_str(),
                        request_id = request_id.get(),
                        "discarding reply from before a reset"
                    );
                    return SessionEvent::Discarded { role, request_id };
                }
                self.pending_sends.remove(&role);
                if role != self.active {
                    debug!(
                        role = role.as_str(),
                        request_id = request_id.get(),
                        "discarding reply for inactive role"
                    );
                    return SessionEvent::Discarded { role, request_id };
                }
                let history = self.histories.entry(role).or_default();
                match result {
                    Ok(reply) => {
                        history.push(Message::from_reply(reply));
                        SessionEvent::ReplyAppended { role }
                    }
                    Err(error) => {
                        warn!(role = role.as_str(), error = %error, "chat request failed");
                        history.push(Message::assistant(self.i18n.translate("error_message")));
                        SessionEvent::ReplyFailed {
                            role,
                            error: error.to_string(),
                        }
                    }
                }
            }
            Outcome::Cleared(result) => match result {
                Ok(()) => {
                    debug!(role = role.as_str(), "remote history deleted");
                    SessionEvent::HistoryCleared { role }
                }
                Err(error) => {
                    warn!(role = role.as_str(), error = %error, "failed to delete history");
                    SessionEvent::HistoryClearFailed {
                        role,
                        error: error.to_string(),
                    }
                }
            },
        }
    }

    fn welcome(&self) -> Message {
        Message::assistant(self.i18n.translate("welcome_message"))
    }

    fn next_request_id(&mut self) -> RequestId {
        self.last_request_id = self.last_request_id.next();
        self.last_request_id
    }

    fn spawn<F>(&mut self, role: SessionRole, request_id: RequestId, work: F)
    where
        F: FnOnce(&dyn Backend) -> Outcome + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.outstanding += 1;
        thread::spawn(move || {
            let outcome = work(backend.as_ref());
            let _ = tx.send(Completion {
                role,
                request_id,
                outcome,
            });
        });
    }
}
