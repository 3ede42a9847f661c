//! Workbook orchestration and the `rust_xlsxwriter`-backed codec.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use rust_xlsxwriter::{
    Color, Format, FormatAlign, FormatBorder, Note, Url, Workbook, Worksheet, XlsxError,
};

use crate::conf::{N_LEN_EXCEL_SHEET_NAME_MAX, N_NCOLS_EXCEL_MAX, N_NROWS_EXCEL_MAX};
use crate::sheet::build_sheet;
use crate::spec::{
    EnumCellType, EnumCellValue, Result, SpecCellAddress, SpecCellRecord, SpecCellStyle,
    SpecExportOptions, SpecSheet, SpecWorkbook, SpecXlsxReport, XlsxExportError,
};
use crate::util::{derive_covered_cell_tracker, sanitize_sheet_name};

////////////////////////////////////////////////////////////////////////////////
// #region Orchestration

/// Persists an assembled workbook.
pub trait WorkbookCodec {
    fn save(&mut self, workbook: &SpecWorkbook, path: &Path) -> Result<()>;
}

/// Assemble one sheet per name, in name order.
///
/// Each sheet takes its schema and rows from the resolved [`crate::spec::EnumSheetSource`].
pub fn build_workbook(options: &SpecExportOptions) -> SpecWorkbook {
    let fn_build_sheet = |(idx_sheet, sheet_name): (usize, &String)| {
        let sheet = build_sheet(
            options.columns.resolve(idx_sheet),
            options.rows.resolve(idx_sheet),
            &options.layout,
        );
        (sheet_name.clone(), sheet)
    };

    let l_sheets: Vec<(String, SpecSheet)> = if options.if_parallel_sheets {
        options
            .sheet_names
            .par_iter()
            .enumerate()
            .map(fn_build_sheet)
            .collect()
    } else {
        options
            .sheet_names
            .iter()
            .enumerate()
            .map(fn_build_sheet)
            .collect()
    };

    SpecWorkbook::from_sheets(l_sheets)
}

/// Build the workbook and save it as XLSX at `options.file_name`.
pub fn export_file(options: &SpecExportOptions) -> Result<SpecWorkbook> {
    export_file_with(&mut XlsxCodec::default(), options)
}

/// Build the workbook and hand it to `codec`. Returns the in-memory workbook.
pub fn export_file_with<C: WorkbookCodec + ?Sized>(
    codec: &mut C,
    options: &SpecExportOptions,
) -> Result<SpecWorkbook> {
    let workbook = build_workbook(options);
    codec.save(&workbook, &options.file_name)?;
    log::info!(
        "exported {} sheet(s) to {}",
        workbook.sheet_names.len(),
        options.file_name.display()
    );
    Ok(workbook)
}

/// Codec writing XLSX files through [`XlsxWriter`].
#[derive(Debug, Default)]
pub struct XlsxCodec {
    l_reports: Vec<SpecXlsxReport>,
}

impl XlsxCodec {
    /// Reports of the last `save` call, one per written sheet.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }
}

impl WorkbookCodec for XlsxCodec {
    fn save(&mut self, workbook: &SpecWorkbook, path: &Path) -> Result<()> {
        let mut writer = XlsxWriter::new(path.to_path_buf());
        for (sheet_name, sheet) in workbook.iter_sheets() {
            writer.write_sheet(sheet_name, sheet)?;
        }
        writer.close()?;
        self.l_reports = writer.report();
        Ok(())
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Writer

/// Stateful workbook writer.
pub struct XlsxWriter {
    path_file_out: PathBuf,
    workbook: Workbook,
    set_sheet_names_existing: BTreeSet<String>,
    l_reports: Vec<SpecXlsxReport>,
    if_closed: bool,
}

impl XlsxWriter {
    /// Create writer bound to output path.
    ///
    /// The workbook is buffered in memory until [`Self::close`] is called.
    pub fn new(path_file_out: PathBuf) -> Self {
        Self {
            path_file_out,
            workbook: Workbook::new(),
            set_sheet_names_existing: BTreeSet::new(),
            l_reports: Vec::new(),
            if_closed: false,
        }
    }

    /// Return output file path as string.
    pub fn file_out(&self) -> String {
        self.path_file_out.to_string_lossy().to_string()
    }

    /// Return immutable snapshot of per-sheet write reports.
    pub fn report(&self) -> Vec<SpecXlsxReport> {
        self.l_reports.clone()
    }

    /// Flush workbook to disk. Idempotent.
    pub fn close(&mut self) -> Result<()> {
        if self.if_closed {
            return Ok(());
        }
        self.workbook.save(&self.path_file_out)?;
        self.if_closed = true;
        log::info!("saved workbook to {}", self.file_out());
        Ok(())
    }

    /// Serialize the workbook into memory instead of writing the bound path.
    pub fn save_to_buffer(&mut self) -> Result<Vec<u8>> {
        Ok(self.workbook.save_to_buffer()?)
    }

    /// Write one assembled sheet.
    ///
    /// Merges are laid down first; covered non-anchor cells are skipped and each
    /// anchor is then written with its typed value.
    pub fn write_sheet(&mut self, sheet_name: &str, sheet: &SpecSheet) -> Result<()> {
        if self.if_closed {
            return Err(XlsxExportError::WriterClosed);
        }

        let mut report = SpecXlsxReport::default();
        let sheet_name_unique = self.derive_unique_sheet_name(&sanitize_sheet_name(sheet_name, "_"));
        if sheet_name_unique != sheet_name {
            log::warn!("sheet name {sheet_name:?} written as {sheet_name_unique:?}");
            report.warn(format!(
                "Sheet name {sheet_name:?} renamed to {sheet_name_unique:?}."
            ));
        }

        let worksheet = self.workbook.add_worksheet();
        worksheet.set_name(&sheet_name_unique)?;

        for (col_idx, n_width_px) in sheet.col_widths_px.iter().enumerate() {
            worksheet.set_column_width_pixels(cast_col_num(col_idx)?, cast_pixels(*n_width_px))?;
        }
        for (row_idx, height) in sheet.row_heights.iter().enumerate() {
            worksheet.set_row_height(cast_row_num(row_idx)?, height.hpt)?;
        }

        let mut l_merges_written = Vec::with_capacity(sheet.merges.len());
        for merge in &sheet.merges {
            let format = sheet
                .cells
                .get(&merge.start())
                .map(derive_record_format)
                .unwrap_or_default();
            let result = worksheet.merge_range(
                cast_row_num(merge.row_idx_start)?,
                cast_col_num(merge.col_idx_start)?,
                cast_row_num(merge.row_idx_end)?,
                cast_col_num(merge.col_idx_end)?,
                "",
                &format,
            );
            match result {
                Ok(_) => l_merges_written.push(*merge),
                Err(err @ XlsxError::MergeRangeOverlaps(..)) => {
                    log::warn!("sheet {sheet_name_unique:?}: skipped merge, {err}");
                    report.warn(format!("Skipped overlapping merge: {err}"));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let set_covered = derive_covered_cell_tracker(&l_merges_written);
        for (address, record) in &sheet.cells {
            if set_covered.contains(address) {
                continue;
            }
            write_cell_record(worksheet, *address, record)?;
            report.cnt_cells += 1;
        }

        report.sheet_name = sheet_name_unique;
        report.cnt_merges = l_merges_written.len();
        self.l_reports.push(report);
        Ok(())
    }

    fn derive_unique_sheet_name(&mut self, name: &str) -> String {
        if !self.set_sheet_names_existing.contains(name) {
            self.set_sheet_names_existing.insert(name.to_string());
            return name.to_string();
        }

        let base_name: String = name
            .chars()
            .take(usize::max(1, N_LEN_EXCEL_SHEET_NAME_MAX - 3))
            .collect();

        let mut n_idx = 2usize;
        loop {
            let candidate: String = format!("{base_name}__{n_idx}")
                .chars()
                .take(N_LEN_EXCEL_SHEET_NAME_MAX)
                .collect();
            if !self.set_sheet_names_existing.contains(&candidate) {
                self.set_sheet_names_existing.insert(candidate.clone());
                return candidate;
            }
            n_idx += 1;
        }
    }
}

fn write_cell_record(
    worksheet: &mut Worksheet,
    address: SpecCellAddress,
    record: &SpecCellRecord,
) -> Result<()> {
    let n_row = cast_row_num(address.row_idx)?;
    let n_col = cast_col_num(address.col_idx)?;
    let format = derive_record_format(record);

    if let Some(formula) = &record.formula {
        worksheet.write_formula_with_format(n_row, n_col, formula.as_str(), &format)?;
    } else if let Some(link) = &record.hyperlink {
        let url = Url::new(link.as_str()).set_text(record.display_text());
        worksheet.write_url_with_format(n_row, n_col, url, &format)?;
    } else {
        match (record.cell_type, &record.value) {
            (EnumCellType::Number, EnumCellValue::Number(n)) => {
                worksheet.write_number_with_format(n_row, n_col, *n, &format)?;
            }
            (EnumCellType::Boolean, value) => {
                let c_value = value.to_string().to_ascii_lowercase();
                let if_true = matches!(c_value.trim(), "true" | "1");
                worksheet.write_boolean_with_format(n_row, n_col, if_true, &format)?;
            }
            (_, EnumCellValue::String(s)) if s.is_empty() => {
                worksheet.write_blank(n_row, n_col, &format)?;
            }
            _ => {
                worksheet.write_string_with_format(
                    n_row,
                    n_col,
                    record.display_text(),
                    &format,
                )?;
            }
        }
    }

    if let Some(comment) = &record.comment {
        worksheet.insert_note(n_row, n_col, &Note::new(comment.as_str()))?;
    }
    Ok(())
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region FormatMapping

fn derive_record_format(record: &SpecCellRecord) -> Format {
    let format = derive_rust_xlsx_format(&record.style);
    match &record.num_format {
        Some(num_format) => format.set_num_format(num_format.as_str()),
        None => format,
    }
}

fn derive_rust_xlsx_format(style: &SpecCellStyle) -> Format {
    let mut format = Format::new();

    if let Some(val) = &style.font_name {
        format = format.set_font_name(val.as_str());
    }
    if let Some(val) = style.font_size {
        format = format.set_font_size(val as f64);
    }
    if style.font_bold.unwrap_or(false) {
        format = format.set_bold();
    }
    if let Some(color) = style.font_color_rgb.as_deref().and_then(derive_color) {
        format = format.set_font_color(color);
    }
    if let Some(color) = style.fill_fg_color_rgb.as_deref().and_then(derive_color) {
        format = format.set_background_color(color);
    }

    if let Some(val) = &style.border_style {
        format = format.set_border(derive_format_border(val));
    }
    if let Some(color) = style.border_color_rgb.as_deref().and_then(derive_color) {
        format = format.set_border_color(color);
    }

    if let Some(val) = &style.alignment_horizontal
        && let Some(align) = derive_format_align(val)
    {
        format = format.set_align(align);
    }
    if let Some(val) = &style.alignment_vertical
        && let Some(align) = derive_format_valign(val)
    {
        format = format.set_align(align);
    }

    format
}

/// Parse `rrggbb`, `#rrggbb` or `aarrggbb` hex.
fn derive_color(rgb: &str) -> Option<Color> {
    let c_hex = rgb.trim().trim_start_matches('#');
    let c_hex = match c_hex.len() {
        6 => c_hex,
        8 => c_hex.get(2..)?,
        _ => return None,
    };
    u32::from_str_radix(c_hex, 16).ok().map(Color::RGB)
}

fn derive_format_border(border: &str) -> FormatBorder {
    let value = border.trim().to_ascii_lowercase().replace(['_', '-'], "");
    match value.as_str() {
        "thin" => FormatBorder::Thin,
        "medium" => FormatBorder::Medium,
        "dashed" => FormatBorder::Dashed,
        "dotted" => FormatBorder::Dotted,
        "thick" => FormatBorder::Thick,
        "double" => FormatBorder::Double,
        "hair" => FormatBorder::Hair,
        "mediumdashed" => FormatBorder::MediumDashed,
        "dashdot" => FormatBorder::DashDot,
        "mediumdashdot" => FormatBorder::MediumDashDot,
        "dashdotdot" => FormatBorder::DashDotDot,
        "mediumdashdotdot" => FormatBorder::MediumDashDotDot,
        "slantdashdot" => FormatBorder::SlantDashDot,
        _ => FormatBorder::None,
    }
}

fn derive_format_align(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "general" => Some(FormatAlign::General),
        "left" => Some(FormatAlign::Left),
        "center" => Some(FormatAlign::Center),
        "right" => Some(FormatAlign::Right),
        "fill" => Some(FormatAlign::Fill),
        "justify" => Some(FormatAlign::Justify),
        "center_across" | "centercontinuous" => Some(FormatAlign::CenterAcross),
        "distributed" => Some(FormatAlign::Distributed),
        _ => None,
    }
}

fn derive_format_valign(align: &str) -> Option<FormatAlign> {
    let value = align.trim().to_ascii_lowercase();
    match value.as_str() {
        "top" => Some(FormatAlign::Top),
        "center" | "vcenter" => Some(FormatAlign::VerticalCenter),
        "bottom" => Some(FormatAlign::Bottom),
        "justify" => Some(FormatAlign::VerticalJustify),
        "distributed" => Some(FormatAlign::VerticalDistributed),
        _ => None,
    }
}

fn cast_row_num(value: usize) -> Result<u32> {
    if value >= N_NROWS_EXCEL_MAX {
        return Err(XlsxExportError::RowIndexOverflow(value));
    }
    u32::try_from(value).map_err(|_| XlsxExportError::RowIndexOverflow(value))
}

fn cast_col_num(value: usize) -> Result<u16> {
    if value >= N_NCOLS_EXCEL_MAX {
        return Err(XlsxExportError::ColIndexOverflow(value));
    }
    u16::try_from(value).map_err(|_| XlsxExportError::ColIndexOverflow(value))
}

fn cast_pixels(value: f64) -> u16 {
    value.round().clamp(0.0, u16::MAX as f64) as u16
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
