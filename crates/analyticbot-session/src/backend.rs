// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use analyticbot_app::{
    ChatReply, ChatRequest, DataPreview, Message, SessionRole, UploadReceipt, UserAccount,
};
use anyhow::Result;
use std::path::Path;

/// Remote collaborator behind the session layer. Calls block; the session
/// runs each one on its own thread.
pub trait Backend: Send + Sync {
    fn fetch_history(&self, role: SessionRole) -> Result<Vec<Message>>;
    fn clear_history(&self, role: SessionRole) -> Result<()>;
    fn send_chat(&self, request: &ChatRequest) -> Result<ChatReply>;
    fn list_files(&self) -> Result<Vec<String>>;
    fn preview_file(&self, filename: &str) -> Result<Option<DataPreview>>;
    fn upload_file(&self, path: &Path) -> Result<UploadReceipt>;
    fn list_users(&self) -> Result<Vec<UserAccount>>;

    /// Origin that root-relative asset paths resolve against.
    fn asset_origin(&self) -> &str {
        ""
    }
}
