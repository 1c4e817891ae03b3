// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod backend;
pub mod conversation;
pub mod datasets;

pub use backend::Backend;
pub use conversation::{RejectReason, SendOutcome, SessionEvent, SessionManager};
pub use datasets::{
    AdminEvent, AdminWorkspace, SUPPORTED_UPLOAD_EXTENSIONS, UploadStart, UploadStatus,
    is_supported_upload,
};
