//! Use cases: document sessions, drafts, library and order numbers

mod drafts;
pub mod order_numbers;
pub mod quote_service;
pub mod techpack_service;

pub use order_numbers::OrderNumberAllocator;
pub use quote_service::QuoteService;
pub use techpack_service::{TechPackService, TechPackSession};
