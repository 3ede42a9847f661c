//! Layout constants and default style presets.

use crate::spec::{SpecCellStyle, SpecSheetLayoutOptions};

/// Excel worksheet maximum row count.
pub const N_NROWS_EXCEL_MAX: usize = 1_048_576;
/// Excel worksheet maximum column count.
pub const N_NCOLS_EXCEL_MAX: usize = 16_384;
/// Excel sheet name maximum length.
pub const N_LEN_EXCEL_SHEET_NAME_MAX: usize = 31;
/// Characters not allowed in sheet names.
pub const TUP_EXCEL_ILLEGAL: [&str; 7] = ["*", ":", "?", "/", "\\", "[", "]"];

/// Default row height in pixels (header rows and body rows without override).
pub const N_ROW_HPX_DEFAULT: f64 = 25.0;
/// Default row height in points.
pub const N_ROW_HPT_DEFAULT: f64 = 25.0;
/// Default column width in pixels when a leaf column declares none.
pub const N_COL_WPX_DEFAULT: f64 = 100.0;

/// Row-record key overriding the body row height in pixels.
pub const C_KEY_ROW_HPX: &str = "ROW_HPX";
/// Row-record key overriding the body row height in points.
pub const C_KEY_ROW_HPT: &str = "ROW_HPT";

/// Header fill color (RGB hex, no `#`).
pub const C_RGB_HEADER_FILL: &str = "e9ebf0";

/// Default file name used by the export entry point.
pub const C_FILE_NAME_DEFAULT: &str = "table.xlsx";
/// Default sheet name used by the export entry point.
pub const C_SHEET_NAME_DEFAULT: &str = "sheet1";

/// Built-in base layer for header cells: light gray fill, bold text.
pub fn derive_default_header_style() -> SpecCellStyle {
    SpecCellStyle {
        fill_fg_color_rgb: Some(C_RGB_HEADER_FILL.to_string()),
        font_bold: Some(true),
        ..Default::default()
    }
}

/// Built-in base layer for body cells: left-aligned.
pub fn derive_default_body_style() -> SpecCellStyle {
    SpecCellStyle {
        alignment_horizontal: Some("left".to_string()),
        ..Default::default()
    }
}

/// Build default per-sheet layout options.
pub fn derive_default_layout_options() -> SpecSheetLayoutOptions {
    SpecSheetLayoutOptions::default()
}
