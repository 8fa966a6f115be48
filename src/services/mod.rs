pub mod account_service;
pub mod context;
pub mod pagination;
pub mod recipe_service;

pub use context::ServiceContext;
pub use pagination::{PAGE_SIZE, Page, PageRequest};
