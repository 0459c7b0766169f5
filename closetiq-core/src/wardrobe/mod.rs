pub mod id;
pub mod store;

pub use id::IdGenerator;
pub use store::WardrobeStore;
