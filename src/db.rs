pub mod store_repo;
pub use store_repo::StoreRepository;
pub mod review_repo;
pub use review_repo::{ReviewFilter, ReviewRepository};
pub mod feedback_repo;
pub use feedback_repo::FeedbackRepository;
