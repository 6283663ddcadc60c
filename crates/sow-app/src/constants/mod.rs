//! Fixed values shared by the application layer

pub mod print;
pub mod storage;
