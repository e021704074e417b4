pub mod history;
pub mod secrets;

pub use history::HistoryStore;
pub use secrets::KeyringStore;
