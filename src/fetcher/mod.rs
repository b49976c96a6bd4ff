pub mod client;
pub mod errors;
pub mod types;

pub use client::fetch_page;
pub use errors::FetchError;
pub use types::FetchedPage;
