//! Shared layout specification models.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::conf::{
    C_FILE_NAME_DEFAULT, C_SHEET_NAME_DEFAULT, N_ROW_HPT_DEFAULT, N_ROW_HPX_DEFAULT,
    derive_default_layout_options,
};

////////////////////////////////////////////////////////////////////////////////
// #region CellStyleSpecification

/// Flat cell style with the recognized style keys.
///
/// Every key is optional; layers are combined with [`SpecCellStyle::merge`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecCellStyle {
    /// Font size in points.
    pub font_size: Option<i64>,
    /// Bold style.
    pub font_bold: Option<bool>,
    /// Font family name.
    pub font_name: Option<String>,
    /// Font color as RGB hex (`#` optional).
    pub font_color_rgb: Option<String>,
    /// Solid fill color as RGB hex (`#` optional).
    pub fill_fg_color_rgb: Option<String>,
    /// Border style name for all sides (`thin`, `medium`, `dashed`, ...).
    pub border_style: Option<String>,
    /// Border color as RGB hex (`#` optional).
    pub border_color_rgb: Option<String>,
    /// Horizontal alignment (`left`, `center`, `right`).
    pub alignment_horizontal: Option<String>,
    /// Vertical alignment (`top`, `center`, `bottom`).
    pub alignment_vertical: Option<String>,
}

impl SpecCellStyle {
    /// Merge two styles with right-side non-`None` overwrite semantics.
    pub fn merge(&self, other: &SpecCellStyle) -> SpecCellStyle {
        SpecCellStyle {
            font_size: other.font_size.or(self.font_size),
            font_bold: other.font_bold.or(self.font_bold),
            font_name: other.font_name.clone().or_else(|| self.font_name.clone()),
            font_color_rgb: other
                .font_color_rgb
                .clone()
                .or_else(|| self.font_color_rgb.clone()),
            fill_fg_color_rgb: other
                .fill_fg_color_rgb
                .clone()
                .or_else(|| self.fill_fg_color_rgb.clone()),
            border_style: other
                .border_style
                .clone()
                .or_else(|| self.border_style.clone()),
            border_color_rgb: other
                .border_color_rgb
                .clone()
                .or_else(|| self.border_color_rgb.clone()),
            alignment_horizontal: other
                .alignment_horizontal
                .clone()
                .or_else(|| self.alignment_horizontal.clone()),
            alignment_vertical: other
                .alignment_vertical
                .clone()
                .or_else(|| self.alignment_vertical.clone()),
        }
    }

    /// True when no key is set.
    pub fn is_empty(&self) -> bool {
        *self == SpecCellStyle::default()
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ColumnSpecification

/// Field path into a row record, one segment per nesting level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SpecDataIndex(pub Vec<String>);

impl SpecDataIndex {
    /// Parse a dotted path (`a.b.c`); empty segments are dropped.
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|seg| !seg.is_empty())
                .map(ToString::to_string)
                .collect(),
        )
    }

    /// Path segments in lookup order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for SpecDataIndex {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

impl From<Vec<String>> for SpecDataIndex {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}

impl From<&[&str]> for SpecDataIndex {
    fn from(segments: &[&str]) -> Self {
        Self(segments.iter().map(ToString::to_string).collect())
    }
}

/// Declared column width: a pixel count or a unit string (`"120px"`, `"3cm"`, `"12ch"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnumColumnWidth {
    /// Width in pixels.
    Pixels(f64),
    /// Width with physical or character unit suffix.
    Text(String),
}

/// Per-cell span directive. Absent spans count as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpecSpan {
    /// Number of columns covered, anchor included.
    pub col_span: Option<i64>,
    /// Number of rows covered, anchor included.
    pub row_span: Option<i64>,
}

impl SpecSpan {
    pub fn new(col_span: i64, row_span: i64) -> Self {
        Self {
            col_span: Some(col_span),
            row_span: Some(row_span),
        }
    }
}

/// Output of a cell render callback: display value plus optional span directive.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecRenderResult {
    /// Displayed value; normalized to a primitive before storage.
    pub value: Value,
    /// Content-driven merge directive.
    pub span: Option<SpecSpan>,
}

impl SpecRenderResult {
    /// Plain rendered value without span.
    pub fn value(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            span: None,
        }
    }

    /// Attach a span directive.
    pub fn with_span(mut self, col_span: i64, row_span: i64) -> Self {
        self.span = Some(SpecSpan::new(col_span, row_span));
        self
    }
}

impl From<Value> for SpecRenderResult {
    fn from(value: Value) -> Self {
        Self::value(value)
    }
}

/// Render callback signature: `(raw value, row record, row index)`.
pub type FnRenderCell = dyn Fn(&Value, &Value, usize) -> SpecRenderResult + Send + Sync;
/// Style callback signature: `(row record, row index)`.
pub type FnStyleRow = dyn Fn(&Value, usize) -> SpecCellStyle + Send + Sync;

/// Optional render callback; identity when unset.
#[derive(Clone, Default)]
pub struct CellRenderer(Option<Arc<FnRenderCell>>);

impl CellRenderer {
    pub fn new(
        f: impl Fn(&Value, &Value, usize) -> SpecRenderResult + Send + Sync + 'static,
    ) -> Self {
        Self(Some(Arc::new(f)))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Invoke the callback, or pass `value` through unchanged.
    pub fn apply(&self, value: &Value, row: &Value, row_idx: usize) -> SpecRenderResult {
        match &self.0 {
            Some(f) => f(value, row, row_idx),
            None => SpecRenderResult::value(value.clone()),
        }
    }
}

impl fmt::Debug for CellRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_set() {
            "CellRenderer(Some(..))"
        } else {
            "CellRenderer(None)"
        })
    }
}

/// Optional style callback; empty style when unset.
#[derive(Clone, Default)]
pub struct RowStyler(Option<Arc<FnStyleRow>>);

impl RowStyler {
    pub fn new(f: impl Fn(&Value, usize) -> SpecCellStyle + Send + Sync + 'static) -> Self {
        Self(Some(Arc::new(f)))
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    pub fn apply(&self, row: &Value, row_idx: usize) -> SpecCellStyle {
        match &self.0 {
            Some(f) => f(row, row_idx),
            None => SpecCellStyle::default(),
        }
    }
}

impl fmt::Debug for RowStyler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.is_set() {
            "RowStyler(Some(..))"
        } else {
            "RowStyler(None)"
        })
    }
}

/// One column or column group of the input schema.
///
/// A node with non-empty `children` is a group; otherwise it is a leaf and
/// contributes exactly one grid column. Nodes are never mutated by the engine.
#[derive(Debug, Clone, Default)]
pub struct SpecColumn {
    /// Fallback field path when `data_index` is absent (dotted).
    pub key: Option<String>,
    /// Field path into the row record.
    pub data_index: Option<SpecDataIndex>,
    /// Header label.
    pub title: Option<String>,
    /// Declared width.
    pub width: Option<EnumColumnWidth>,
    /// Child columns in declaration order.
    pub children: Vec<SpecColumn>,
    /// Per-cell value transform.
    pub render: CellRenderer,
    /// Per-cell body style callback.
    pub on_body_cell: RowStyler,
    /// Header style overlay for this node.
    pub header_cell_style: Option<SpecCellStyle>,
    /// Span directives keyed by body row index; used when `render` declares no span.
    pub merge_directives: BTreeMap<usize, SpecSpan>,
}

impl SpecColumn {
    /// Leaf column reading `data_index` (dotted path).
    pub fn leaf(title: &str, data_index: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            data_index: Some(SpecDataIndex::parse(data_index)),
            ..Default::default()
        }
    }

    /// Group column spanning `children`.
    pub fn group(title: &str, children: Vec<SpecColumn>) -> Self {
        Self {
            title: Some(title.to_string()),
            children,
            ..Default::default()
        }
    }

    pub fn with_width(mut self, width: EnumColumnWidth) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_render(
        mut self,
        f: impl Fn(&Value, &Value, usize) -> SpecRenderResult + Send + Sync + 'static,
    ) -> Self {
        self.render = CellRenderer::new(f);
        self
    }

    pub fn with_body_cell_style(
        mut self,
        f: impl Fn(&Value, usize) -> SpecCellStyle + Send + Sync + 'static,
    ) -> Self {
        self.on_body_cell = RowStyler::new(f);
        self
    }

    pub fn with_header_cell_style(mut self, style: SpecCellStyle) -> Self {
        self.header_cell_style = Some(style);
        self
    }

    pub fn with_merge_directive(mut self, row_idx: usize, span: SpecSpan) -> Self {
        self.merge_directives.insert(row_idx, span);
        self
    }

    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Resolved field path: `data_index`, else parsed `key`.
    pub fn resolve_data_index(&self) -> Option<SpecDataIndex> {
        self.data_index
            .clone()
            .or_else(|| self.key.as_deref().map(SpecDataIndex::parse))
    }
}

/// Leaf column with its depth in the schema tree.
#[derive(Debug, Clone, Copy)]
pub struct SpecLeafColumn<'a> {
    /// Source node.
    pub column: &'a SpecColumn,
    /// Number of ancestor groups.
    pub depth: usize,
}

impl SpecLeafColumn<'_> {
    pub fn title(&self) -> &str {
        self.column.title.as_deref().unwrap_or_default()
    }

    pub fn data_index(&self) -> Option<SpecDataIndex> {
        self.column.resolve_data_index()
    }

    pub fn width(&self) -> Option<&EnumColumnWidth> {
        self.column.width.as_ref()
    }
}

/// Flattening result: leaves in left-to-right order and header level.
#[derive(Debug, Clone)]
pub struct SpecFlatColumns<'a> {
    pub columns: Vec<SpecLeafColumn<'a>>,
    /// `1 + max leaf depth`; `0` for an empty schema.
    pub level: usize,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region GridSpecification

/// Zero-based grid coordinate. Orders row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
pub struct SpecCellAddress {
    pub row_idx: usize,
    pub col_idx: usize,
}

impl SpecCellAddress {
    pub fn new(row_idx: usize, col_idx: usize) -> Self {
        Self { row_idx, col_idx }
    }
}

/// Rectangular merge, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SpecMerge {
    pub row_idx_start: usize,
    pub col_idx_start: usize,
    pub row_idx_end: usize,
    pub col_idx_end: usize,
}

impl SpecMerge {
    pub fn start(&self) -> SpecCellAddress {
        SpecCellAddress::new(self.row_idx_start, self.col_idx_start)
    }

    pub fn col_span(&self) -> usize {
        self.col_idx_end - self.col_idx_start + 1
    }

    pub fn row_span(&self) -> usize {
        self.row_idx_end - self.row_idx_start + 1
    }

    /// Worth emitting only when it covers more than one cell.
    pub fn is_merge(&self) -> bool {
        self.col_span() != 1 || self.row_span() != 1
    }
}

/// Structural merge shared by all header positions it covers.
///
/// `id` is unique per merge within one header grid; positions carrying the
/// same `id` denote the same merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecHeaderMerge {
    pub id: usize,
    pub range: SpecMerge,
}

/// One header grid position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecHeaderCell {
    pub title: String,
    pub merge: Option<SpecHeaderMerge>,
    /// Per-node header style overlay.
    pub style: Option<SpecCellStyle>,
}

/// Dense `level x leaf count` header grid with its deduplicated merges.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecHeaderGrid {
    pub rows: Vec<Vec<SpecHeaderCell>>,
    pub merges: Vec<SpecMerge>,
}

impl SpecHeaderGrid {
    /// Collect each distinct merge once, in row-major order of first appearance.
    pub fn derive_merges(rows: &[Vec<SpecHeaderCell>]) -> Vec<SpecMerge> {
        let mut set_ids_seen = BTreeSet::new();
        rows.iter()
            .flatten()
            .filter_map(|cell| cell.merge)
            .filter(|merge| set_ids_seen.insert(merge.id))
            .map(|merge| merge.range)
            .collect()
    }
}

/// Cell type tag as understood by the spreadsheet format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnumCellType {
    #[serde(rename = "b")]
    Boolean,
    #[serde(rename = "e")]
    Error,
    #[serde(rename = "n")]
    Number,
    #[serde(rename = "d")]
    Date,
    #[default]
    #[serde(rename = "s")]
    String,
    #[serde(rename = "z")]
    Stub,
}

impl EnumCellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "b",
            Self::Error => "e",
            Self::Number => "n",
            Self::Date => "d",
            Self::String => "s",
            Self::Stub => "z",
        }
    }
}

/// Stored cell value. Missing and falsy values are stored as empty text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnumCellValue {
    /// Text value.
    String(String),
    /// Numeric value.
    Number(f64),
}

impl Default for EnumCellValue {
    fn default() -> Self {
        Self::String(String::new())
    }
}

impl fmt::Display for EnumCellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Raw format-native overrides for one grid position.
///
/// Fields use the short keys of the sheet object model when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct SpecCellModel {
    #[serde(rename = "t")]
    pub cell_type: Option<EnumCellType>,
    #[serde(rename = "v")]
    pub value: Option<String>,
    #[serde(rename = "z")]
    pub num_format: Option<String>,
    #[serde(rename = "w")]
    pub text_formatted: Option<String>,
    #[serde(rename = "f")]
    pub formula: Option<String>,
    #[serde(rename = "l")]
    pub hyperlink: Option<String>,
    #[serde(rename = "c")]
    pub comment: Option<String>,
    #[serde(rename = "r")]
    pub rich_text: Option<String>,
    #[serde(rename = "h")]
    pub html: Option<String>,
    #[serde(rename = "s")]
    pub style: Option<SpecCellStyle>,
}

/// Assembled cell: type tag, value, style, plus optional native extras.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SpecCellRecord {
    pub cell_type: EnumCellType,
    pub value: EnumCellValue,
    pub style: SpecCellStyle,
    pub num_format: Option<String>,
    pub text_formatted: Option<String>,
    pub formula: Option<String>,
    pub hyperlink: Option<String>,
    pub comment: Option<String>,
    pub rich_text: Option<String>,
    pub html: Option<String>,
}

impl SpecCellRecord {
    /// Text cell.
    pub fn text(value: impl Into<String>, style: SpecCellStyle) -> Self {
        Self {
            cell_type: EnumCellType::String,
            value: EnumCellValue::String(value.into()),
            style,
            ..Default::default()
        }
    }

    /// Overlay a cell model; model fields win over computed ones.
    pub fn apply_model(mut self, model: &SpecCellModel) -> Self {
        if let Some(cell_type) = model.cell_type {
            self.cell_type = cell_type;
        }
        if let Some(value) = &model.value {
            self.value = match (self.cell_type, value.trim().parse::<f64>()) {
                (EnumCellType::Number, Ok(n)) if n.is_finite() => EnumCellValue::Number(n),
                _ => EnumCellValue::String(value.clone()),
            };
        }
        if let Some(style) = &model.style {
            self.style = style.clone();
        }
        let extras = [
            (&mut self.num_format, &model.num_format),
            (&mut self.text_formatted, &model.text_formatted),
            (&mut self.formula, &model.formula),
            (&mut self.hyperlink, &model.hyperlink),
            (&mut self.comment, &model.comment),
            (&mut self.rich_text, &model.rich_text),
            (&mut self.html, &model.html),
        ];
        for (slot, patch) in extras {
            if patch.is_some() {
                slot.clone_from(patch);
            }
        }
        self
    }

    /// Text shown for the cell: formatted text when given, else the value.
    pub fn display_text(&self) -> String {
        self.text_formatted
            .clone()
            .unwrap_or_else(|| self.value.to_string())
    }
}

/// Row height in pixels and points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpecRowHeight {
    pub hpx: f64,
    pub hpt: f64,
}

impl Default for SpecRowHeight {
    fn default() -> Self {
        Self {
            hpx: N_ROW_HPX_DEFAULT,
            hpt: N_ROW_HPT_DEFAULT,
        }
    }
}

/// One assembled sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecSheet {
    /// Cells keyed by grid coordinate.
    pub cells: BTreeMap<SpecCellAddress, SpecCellRecord>,
    /// Used range, e.g. `A1:C3`.
    pub range_ref: String,
    /// Column widths in pixels, one per leaf column.
    pub col_widths_px: Vec<f64>,
    /// Row heights, header rows first.
    pub row_heights: Vec<SpecRowHeight>,
    /// Structural merges followed by content-driven merges.
    pub merges: Vec<SpecMerge>,
    /// Number of header rows actually written.
    pub level_header: usize,
}

impl SpecSheet {
    /// Look up a cell by coordinate label (`"B3"`).
    pub fn cell(&self, label: &str) -> Option<&SpecCellRecord> {
        crate::util::decode_cell(label).and_then(|address| self.cells.get(&address))
    }

    pub fn cell_at(&self, row_idx: usize, col_idx: usize) -> Option<&SpecCellRecord> {
        self.cells.get(&SpecCellAddress::new(row_idx, col_idx))
    }
}

/// Ordered sheet names paired with their sheets.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpecWorkbook {
    pub sheet_names: Vec<String>,
    pub sheets: BTreeMap<String, SpecSheet>,
}

impl SpecWorkbook {
    /// Build from `(name, sheet)` pairs; a repeated name keeps the later sheet.
    pub fn from_sheets(sheets: Vec<(String, SpecSheet)>) -> Self {
        let mut workbook = Self::default();
        for (name, sheet) in sheets {
            workbook.sheet_names.push(name.clone());
            workbook.sheets.insert(name, sheet);
        }
        workbook
    }

    pub fn sheet(&self, name: &str) -> Option<&SpecSheet> {
        self.sheets.get(name)
    }

    /// Sheets in name order, each distinct name once.
    pub fn iter_sheets(&self) -> impl Iterator<Item = (&str, &SpecSheet)> {
        let mut set_names_seen = BTreeSet::new();
        self.sheet_names.iter().filter_map(move |name| {
            if !set_names_seen.insert(name.as_str()) {
                return None;
            }
            self.sheets.get(name).map(|sheet| (name.as_str(), sheet))
        })
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Options

/// Where a sheet takes its schema or rows from.
#[derive(Debug, Clone)]
pub enum EnumSheetSource<T> {
    /// All sheets share one sequence.
    Shared(Vec<T>),
    /// One sequence per sheet, by sheet index.
    PerSheet(Vec<Vec<T>>),
}

impl<T> EnumSheetSource<T> {
    /// Sequence for sheet `idx_sheet`; empty when a per-sheet entry is missing.
    pub fn resolve(&self, idx_sheet: usize) -> &[T] {
        match self {
            Self::Shared(items) => items.as_slice(),
            Self::PerSheet(l_items) => l_items.get(idx_sheet).map(Vec::as_slice).unwrap_or(&[]),
        }
    }
}

impl<T> Default for EnumSheetSource<T> {
    fn default() -> Self {
        Self::Shared(Vec::new())
    }
}

/// Per-sheet layout options.
#[derive(Debug, Clone)]
pub struct SpecSheetLayoutOptions {
    /// Emit header rows.
    pub if_show_header: bool,
    /// Keep numbers numeric instead of text.
    pub if_raw: bool,
    /// Store the render callback's displayed value instead of the raw value.
    pub if_use_render: bool,
    /// Style applied to header and body cells.
    pub cell_style: SpecCellStyle,
    /// Style applied to header cells.
    pub header_cell_style: SpecCellStyle,
    /// Style applied to body cells.
    pub body_cell_style: SpecCellStyle,
    /// Row-level body style callback.
    pub on_body_row: RowStyler,
    /// Native overrides keyed by grid coordinate (header rows included).
    pub cell_models: BTreeMap<SpecCellAddress, SpecCellModel>,
}

impl Default for SpecSheetLayoutOptions {
    fn default() -> Self {
        Self {
            if_show_header: true,
            if_raw: false,
            if_use_render: true,
            cell_style: SpecCellStyle::default(),
            header_cell_style: SpecCellStyle::default(),
            body_cell_style: SpecCellStyle::default(),
            on_body_row: RowStyler::default(),
            cell_models: BTreeMap::new(),
        }
    }
}

/// Top-level export options.
#[derive(Debug, Clone)]
pub struct SpecExportOptions {
    /// Target file.
    pub file_name: PathBuf,
    /// Sheet names in workbook order.
    pub sheet_names: Vec<String>,
    /// Column schema source.
    pub columns: EnumSheetSource<SpecColumn>,
    /// Row record source.
    pub rows: EnumSheetSource<Value>,
    /// Layout options shared by all sheets.
    pub layout: SpecSheetLayoutOptions,
    /// Assemble sheets on the rayon pool; output order is unchanged.
    pub if_parallel_sheets: bool,
}

impl Default for SpecExportOptions {
    fn default() -> Self {
        Self {
            file_name: PathBuf::from(C_FILE_NAME_DEFAULT),
            sheet_names: vec![C_SHEET_NAME_DEFAULT.to_string()],
            columns: EnumSheetSource::default(),
            rows: EnumSheetSource::default(),
            layout: derive_default_layout_options(),
            if_parallel_sheets: false,
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region ReportAndErrors

/// Per-sheet write report.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecXlsxReport {
    /// Actual sheet name in the written workbook.
    pub sheet_name: String,
    /// Cells written (covered merge cells excluded).
    pub cnt_cells: usize,
    /// Merge ranges written.
    pub cnt_merges: usize,
    /// Non-fatal warnings.
    pub warnings: Vec<String>,
}

impl SpecXlsxReport {
    /// Add a warning message.
    pub fn warn(&mut self, msg: impl AsRef<str>) {
        self.warnings.push(msg.as_ref().to_string());
    }
}

/// Errors surfaced by the codec and frame adapters.
#[derive(Debug, thiserror::Error)]
pub enum XlsxExportError {
    /// Spreadsheet codec failure.
    #[error("xlsx write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// DataFrame access or IPC decoding failure.
    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Row index exceeds the codec's row type.
    #[error("row index overflow: {0}")]
    RowIndexOverflow(usize),

    /// Column index exceeds the codec's column type.
    #[error("column index overflow: {0}")]
    ColIndexOverflow(usize),

    /// Writer used after `close()`.
    #[error("Cannot write after close().")]
    WriterClosed,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, XlsxExportError>;

// #endregion
////////////////////////////////////////////////////////////////////////////////
