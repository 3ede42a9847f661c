//! `tabkit_io_xlsx` v1:
//! Schema-driven table to XLSX exporter.
//!
//! Modules:
//! - `conf`   : constants and default presets
//! - `spec`   : specs/models/options/errors
//! - `util`   : pure helper functions (addresses, values, sizing, merges)
//! - `column` : column tree flattening and header grid
//! - `sheet`  : per-sheet grid assembly
//! - `writer` : workbook orchestration and XLSX codec
//! - `frame`  : polars `DataFrame` adapter
pub mod column;
pub mod conf;
pub mod frame;
pub mod sheet;
pub mod spec;
pub mod util;
pub mod writer;

pub use column::{build_header_grid, count_leaf_columns, flatten_columns};
pub use conf::{
    N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX, TUP_EXCEL_ILLEGAL,
};
pub use frame::{
    derive_columns_from_dataframe, derive_rows_from_dataframe, derive_rows_from_ipc_bytes,
};
pub use sheet::build_sheet;
pub use spec::{
    CellRenderer, EnumCellType, EnumCellValue, EnumColumnWidth, EnumSheetSource, Result,
    RowStyler, SpecCellAddress, SpecCellModel, SpecCellRecord, SpecCellStyle, SpecColumn,
    SpecDataIndex, SpecExportOptions, SpecMerge, SpecRenderResult, SpecRowHeight, SpecSheet,
    SpecSheetLayoutOptions, SpecSpan, SpecWorkbook, SpecXlsxReport, XlsxExportError,
};
pub use util::{decode_cell, encode_cell, encode_col, encode_range, sanitize_sheet_name};
pub use writer::{
    WorkbookCodec, XlsxCodec, XlsxWriter, build_workbook, export_file, export_file_with,
};
