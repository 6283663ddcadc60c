//! Domain services

pub mod defaults;
pub mod field_path;
pub mod order_sequence;

pub use defaults::{hydrate_over_defaults, to_stored_value, DocumentSchema};
pub use field_path::{set_field, set_field_text};
pub use order_sequence::{next_order_number, OrderNumber, OrderSequenceState};
