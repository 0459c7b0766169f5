pub mod ai_traits;
pub mod storage_traits;

pub use ai_traits::AiGateway;
pub use storage_traits::KeyValueStore;
