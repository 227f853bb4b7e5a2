//! PII Mask Common Library
//!
//! CLIとWeb(WASM)で共有されるアップロード状態と、マスキングサービスとの契約

pub mod contract;
pub mod controller;
pub mod drag;
pub mod error;
pub mod preview;
pub mod state;
pub mod validate;

pub use contract::{
    ACCEPTED_MIME_TYPES, DEFAULT_ENDPOINT, DOWNLOAD_FILE_NAME, FORM_FIELD, MAX_FILE_SIZE,
    UPLOAD_FAILED_MESSAGE,
};
pub use controller::{Generation, SelectTicket, UploadController, UploadTicket};
pub use drag::DragState;
pub use error::{Error, Result, TransportError, ValidationError};
pub use preview::data_uri;
pub use state::{Phase, StateSnapshot, UploadState};
pub use validate::{validate_file, FileMeta};
