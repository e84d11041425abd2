//! Object Measure Common Library
//!
//! CLI・デスクトップ・Web(WASM)で共有されるビューコントローラと型

pub mod controller;
pub mod error;
pub mod format;
pub mod parser;
pub mod section;
pub mod transport;
pub mod types;
pub mod view;

pub use controller::{
    Job, Ticket, ViewController, DECODE_FAILED_MESSAGE, DEFAULT_MAX_UPLOAD_BYTES,
    INVALID_FILE_MESSAGE, PROCESSING_FAILED_MESSAGE,
};
pub use error::{Error, Result};
pub use format::{
    format_area, js_round, mean_area, ObjectEntry, RenderedResult, AREA_UNIT, OBJECT_LIST_HEADING,
};
pub use parser::{parse_upload_response, UploadOutcome};
pub use section::Section;
pub use transport::{decode_data_url, encode_data_url, Decoder, Transport, UPLOAD_FIELD, UPLOAD_PATH};
pub use types::{AnalysisResult, ImageFile, SelectedImage};
pub use view::{MemoryView, View};
