// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{DataPreview, Localizer, UploadReceipt, UserAccount};
use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::Backend;

pub const SUPPORTED_UPLOAD_EXTENSIONS: [&str; 4] = ["csv", "xlsx", "xls", "pdf"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStart {
    Started,
    Unsupported,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminEvent {
    FilesLoaded { count: usize },
    PreviewLoaded { filename: String },
    PreviewDiscarded { filename: String },
    UsersLoaded { count: usize },
    Uploaded { filename: String },
    UploadFailed { filename: String },
    Failed { action: &'static str, error: String },
}

enum Outcome {
    Files(Result<Vec<String>>),
    Preview {
        filename: String,
        result: Result<Option<DataPreview>>,
    },
    Upload {
        filename: String,
        result: Result<UploadReceipt>,
    },
    Users(Result<Vec<UserAccount>>),
}

/// Admin view over uploaded datasets: file list, selection, preview, users
/// and uploads.
pub struct AdminWorkspace {
    backend: Arc<dyn Backend>,
    i18n: Localizer,
    files: Vec<String>,
    selected_file: Option<String>,
    preview: Option<DataPreview>,
    users: Vec<UserAccount>,
    uploading: bool,
    upload_status: Option<UploadStatus>,
    outstanding: usize,
    tx: Sender<Outcome>,
    rx: Receiver<Outcome>,
}

impl AdminWorkspace {
    pub fn new(backend: Arc<dyn Backend>, i18n: Localizer) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            backend,
            i18n,
            files: Vec::new(),
            selected_file: None,
            preview: None,
            users: Vec::new(),
            uploading: false,
            upload_status: None,
            outstanding: 0,
            tx,
            rx,
        }
    }

    pub fn set_localizer(&mut self, i18n: Localizer) {
        self.i18n = i18n;
    }

    pub fn files(&self) -> &[String] {
        &self.files
    }

    pub fn selected_file(&self) -> Option<&str> {
        self.selected_file.as_deref()
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.selected_file.as_deref()?;
        self.files.iter().position(|file| file == selected)
    }

    pub fn preview(&self) -> Option<&DataPreview> {
        self.preview.as_ref()
    }

    pub fn users(&self) -> &[UserAccount] {
        &self.users
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn upload_status(&self) -> Option<&UploadStatus> {
        self.upload_status.as_ref()
    }

    pub fn is_idle(&self) -> bool {
        self.outstanding == 0
    }

    /// Footer under the preview grid.
    pub fn preview_footer(&self) -> Option<String> {
        let preview = self.preview.as_ref()?;
        let total = preview.total_rows.to_string();
        Some(self.i18n.translate_with("showing_rows", &[("total", &total)]))
    }

    pub fn refresh_files(&mut self) {
        self.spawn(|backend| Outcome::Files(backend.list_files()));
    }

    pub fn load_users(&mut self) {
        self.spawn(|backend| Outcome::Users(backend.list_users()));
    }

    pub fn select_file(&mut self, filename: &str) {
        self.selected_file = Some(filename.to_owned());
        self.preview = None;
        let filename = filename.to_owned();
        debug!(filename = %filename, "fetching preview");
        self.spawn(move |backend| {
            let result = backend.preview_file(&filename);
            Outcome::Preview { filename, result }
        });
    }

    /// Moves the selection by `delta` within the file list, wrapping.
    pub fn select_relative(&mut self, delta: isize) {
        if self.files.is_empty() {
            return;
        }
        let len = self.files.len() as isize;
        let current = self.selected_index().map_or(-1, |index| index as isize);
        let next = (current + delta).rem_euclid(len) as usize;
        let filename = self.files[next].clone();
        self.select_file(&filename);
    }

    pub fn upload(&mut self, path: &Path) -> UploadStart {
        if self.uploading {
            return UploadStart::Busy;
        }
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if !is_supported_upload(path) {
            self.upload_status = Some(UploadStatus::Error(
                self.i18n
                    .translate_with("unsupported_upload", &[("name", &filename)]),
            ));
            return UploadStart::Unsupported;
        }

        self.uploading = true;
        self.upload_status = None;
        let path = path.to_path_buf();
        info!(filename = %filename, "uploading dataset");
        self.spawn(move |backend| {
            let result = backend.upload_file(&path);
            Outcome::Upload { filename, result }
        });
        UploadStart::Started
    }

    pub fn process_events(&mut self) -> Vec<AdminEvent> {
        let mut events = Vec::new();
        while let Ok(outcome) = self.rx.try_recv() {
            self.outstanding = self.outstanding.saturating_sub(1);
            events.push(self.apply(outcome));
        }
        events
    }

    pub fn wait_idle(&mut self, timeout: Duration) -> Vec<AdminEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = self.process_events();
        while self.outstanding > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match self.rx.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.outstanding = self.outstanding.saturating_sub(1);
                    events.push(self.apply(outcome));
                }
                Err(_) => break,
            }
        }
        events
    }

    fn apply(&mut self, outcome: Outcome) -> AdminEvent {
        match outcome {
            Outcome::Files(Ok(files)) => {
                let count = files.len();
                self.files = files;
                if self.files.is_empty() {
                    self.selected_file = None;
                    self.preview = None;
                } else if self.selected_file.is_none() {
                    let first = self.files[0].clone();
                    self.select_file(&first);
                }
                AdminEvent::FilesLoaded { count }
            }
            Outcome::Files(Err(error)) => failed("list files", error),
            Outcome::Preview { filename, result } => {
                if self.selected_file.as_deref() != Some(filename.as_str()) {
                    debug!(filename = %filename, "discarding preview for unselected file");
                    return AdminEvent::PreviewDiscarded { filename };
                }
                match result {
                    Ok(Some(preview)) if preview.filename == filename => {
                        self.preview = Some(preview);
                        AdminEvent::PreviewLoaded { filename }
                    }
                    Ok(_) => {
                        self.preview = None;
                        AdminEvent::PreviewDiscarded { filename }
                    }
                    Err(error) => failed("preview file", error),
                }
            }
            Outcome::Upload { filename, result } => {
                self.uploading = false;
                match result {
                    Ok(receipt) => {
                        self.upload_status = Some(UploadStatus::Success(receipt.info));
                        // Upload completion is what refreshes the file list.
                        self.refresh_files();
                        AdminEvent::Uploaded { filename }
                    }
                    Err(error) => {
                        warn!(filename = %filename, error = %error, "upload failed");
                        self.upload_status = Some(UploadStatus::Error(
                            self.i18n.translate("error_message").to_owned(),
                        ));
                        AdminEvent::UploadFailed { filename }
                    }
                }
            }
            Outcome::Users(Ok(users)) => {
                let count = users.len();
                self.users = users;
                AdminEvent::UsersLoaded { count }
            }
            Outcome::Users(Err(error)) => failed("list users", error),
        }
    }

    fn spawn<F>(&mut self, work: F)
    where
        F: FnOnce(&dyn Backend) -> Outcome + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        self.outstanding += 1;
        thread::spawn(move || {
            let _ = tx.send(work(backend.as_ref()));
        });
    }
}

fn failed(action: &'static str, error: anyhow::Error) -> AdminEvent {
    warn!(action, error = %error, "admin request failed");
    AdminEvent::Failed {
        action,
        error: error.to_string(),
    }
}

pub fn is_supported_upload(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| {
            SUPPORTED_UPLOAD_EXTENSIONS
                .iter()
                .any(|supported| supported.eq_ignore_ascii_case(extension))
        })
}
