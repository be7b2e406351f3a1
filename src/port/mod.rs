pub mod history_store;
pub mod keyword_source;

pub use history_store::HistoryStore;
pub use keyword_source::KeywordSource;
