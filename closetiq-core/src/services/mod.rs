pub mod outfit_service;
pub mod upload_service;

pub use outfit_service::{OutfitGenerator, SelectionMode, SelectionState};
pub use upload_service::UploadService;
