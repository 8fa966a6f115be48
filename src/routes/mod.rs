pub mod accounts;
pub mod entry;
pub mod next_url;
pub mod recipes;

pub use entry::router;
