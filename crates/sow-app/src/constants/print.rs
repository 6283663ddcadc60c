//! Print layout constants

/// Delay before `window.print()` so images finish decoding
pub const PRINT_SETTLE_DELAY_MS: u32 = 100;

/// Delay before the print window closes itself
pub const PRINT_CLEANUP_DELAY_MS: u32 = 500;

pub const PAGE_WIDTH_MM: u32 = 210;
pub const PAGE_HEIGHT_MM: u32 = 297;

/// Page count of the longest document (the tech pack)
pub const MAX_DOCUMENT_PAGES: usize = 3;

/// Print directory name under the system temp dir
pub const PRINT_DIR_NAME: &str = "sow-tools-print";

/// Brand accent colour
pub const ACCENT_COLOR: &str = "#72bf03";
