//! Domain model types

pub mod catalog;
pub mod quote;
pub mod techpack;

pub use catalog::CompanyInfo;
pub use quote::{ItemEdit, QuoteDocument, QuoteItem};
pub use techpack::{
    Choice, GridRow, GridSize, ImageSlot, PrintLocation, PrintLocations, PrintSpecs,
    PrintTechnique, PrintTouch, SizeQuantities, TechPackDocument, TrimEntry, Trims,
    MAX_GRID_QUANTITY,
};
