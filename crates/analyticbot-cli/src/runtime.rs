// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{
    ChatReply, ChatRequest, DataPreview, Message, SessionRole, UploadReceipt, UserAccount,
};
use analyticbot_client::Client;
use analyticbot_session::Backend;
use anyhow::Result;
use std::path::Path;
use tracing::info;

/// The analytics service over HTTP.
pub struct HttpBackend {
    client: Client,
}

impl HttpBackend {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Startup probe for `--check`: the file listing is cheap and needs no
    /// role.
    pub fn check(&self) -> Result<usize> {
        let files = self.client.list_files()?;
        info!(origin = self.client.origin(), files = files.len(), "backend reachable");
        Ok(files.len())
    }
}

impl Backend for HttpBackend {
    fn fetch_history(&self, role: SessionRole) -> Result<Vec<Message>> {
        self.client.fetch_history(role)
    }

    fn clear_history(&self, role: SessionRole) -> Result<()> {
        self.client.clear_history(role)
    }

    fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply> {
        self.client.send_chat(request)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        self.client.list_files()
    }

    fn preview_file(&self, filename: &str) -> Result<Option<DataPreview>> {
        self.client.preview_file(filename)
    }

    fn upload_file(&self, path: &Path) -> Result<UploadReceipt> {
        self.client.upload_file(path)
    }

    fn list_users(&self) -> Result<Vec<UserAccount>> {
        self.client.list_users()
    }

    fn asset_origin(&self) -> &str {
        self.client.origin()
    }
}
