pub mod history_errors;
pub mod history_model;
pub mod history_repository;
pub mod history_service;
pub mod history_traits;

pub use history_errors::HistoryError;
pub use history_model::{HistorySnapshot, NewHistorySnapshot};
pub use history_repository::HistoryRepository;
pub use history_service::HistoryService;
pub use history_traits::{HistoryRepositoryTrait, HistoryServiceTrait};
