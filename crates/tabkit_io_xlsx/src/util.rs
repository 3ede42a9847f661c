//! Stateless helper utilities used by the layout engine and the writer.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::conf::{
    C_KEY_ROW_HPT, C_KEY_ROW_HPX, N_COL_WPX_DEFAULT, N_LEN_EXCEL_SHEET_NAME_MAX,
    TUP_EXCEL_ILLEGAL,
};
use crate::spec::{
    EnumCellType, EnumCellValue, EnumColumnWidth, SpecCellAddress, SpecDataIndex, SpecMerge,
    SpecRowHeight, SpecSpan,
};

////////////////////////////////////////////////////////////////////////////////
// #region CoordinateEncoding

/// Convert zero-based column index to letters (`0 -> A`, `25 -> Z`, `26 -> AA`).
pub fn encode_col(col_idx: usize) -> String {
    let mut v_letters = Vec::new();
    let mut n = col_idx;
    loop {
        v_letters.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    v_letters.iter().rev().map(|b| *b as char).collect()
}

/// Convert zero-based coordinate to label (`(0, 0) -> A1`).
pub fn encode_cell(address: SpecCellAddress) -> String {
    format!("{}{}", encode_col(address.col_idx), address.row_idx + 1)
}

/// Range label `A1:C3`.
pub fn encode_range(start: SpecCellAddress, end: SpecCellAddress) -> String {
    format!("{}:{}", encode_cell(start), encode_cell(end))
}

/// Parse a label like `"B3"` (optionally `$`-anchored) into a zero-based coordinate.
pub fn decode_cell(label: &str) -> Option<SpecCellAddress> {
    let mut n_col = 0usize;
    let mut n_row = 0usize;
    let mut if_saw_col = false;
    let mut if_saw_row = false;

    for chr in label.trim().chars() {
        if chr == '$' {
            continue;
        }
        if chr.is_ascii_alphabetic() && !if_saw_row {
            let upper = chr.to_ascii_uppercase();
            n_col = n_col
                .checked_mul(26)?
                .checked_add(upper as usize - 'A' as usize + 1)?;
            if_saw_col = true;
        } else if chr.is_ascii_digit() && if_saw_col {
            n_row = n_row
                .checked_mul(10)?
                .checked_add(chr as usize - '0' as usize)?;
            if_saw_row = true;
        } else {
            return None;
        }
    }

    if !if_saw_col || !if_saw_row || n_row == 0 {
        return None;
    }
    Some(SpecCellAddress::new(n_row - 1, n_col - 1))
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathAndValueResolution

/// Resolve `index` against `row`; object keys by name, array items by numeric segment.
pub fn lookup_path<'v>(row: &'v Value, index: &SpecDataIndex) -> Option<&'v Value> {
    if index.is_empty() {
        return None;
    }
    index.segments().iter().try_fold(row, |node, seg| match node {
        Value::Object(map) => map.get(seg),
        Value::Array(items) => seg.parse::<usize>().ok().and_then(|idx| items.get(idx)),
        _ => None,
    })
}

/// Reduce a render callback's value to a primitive.
///
/// Arrays are concatenated as text; objects yield their `children` entry when
/// present (element-like values), otherwise their JSON text.
pub fn normalize_render_value(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::String(
            items
                .into_iter()
                .map(|item| derive_text_from_value(&normalize_render_value(item)))
                .collect(),
        ),
        Value::Object(mut map) => match map.remove("children") {
            Some(children) => normalize_render_value(children),
            None => Value::String(Value::Object(map).to_string()),
        },
        other => other,
    }
}

/// Text form of a value; `null` is empty.
pub fn derive_text_from_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// True for `null`, `false`, `0`, `-0` and `""`.
pub fn is_falsy_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_none_or(|x| x == 0.0 || x.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Classify and convert a resolved value for storage.
///
/// Falsy values are stored as empty text. Numbers stay numeric only when
/// `if_raw`; everything else is text.
pub fn convert_value_to_cell(value: &Value, if_raw: bool) -> (EnumCellType, EnumCellValue) {
    if is_falsy_value(value) {
        return (EnumCellType::String, EnumCellValue::String(String::new()));
    }
    if if_raw
        && let Some(n) = value.as_f64()
        && n.is_finite()
    {
        return (EnumCellType::Number, EnumCellValue::Number(n));
    }
    (
        EnumCellType::String,
        EnumCellValue::String(derive_text_from_value(value)),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Sizing

/// Convert a declared width into pixels; default when absent or unparseable.
///
/// Accepted units: `px` (or bare number), `pt`, `in`, `cm`, `mm`, `ch`.
pub fn convert_width_to_px(width: Option<&EnumColumnWidth>) -> f64 {
    let n_px = match width {
        None => return N_COL_WPX_DEFAULT,
        Some(EnumColumnWidth::Pixels(n)) => Some(*n),
        Some(EnumColumnWidth::Text(txt)) => parse_width_text(txt),
    };
    match n_px {
        Some(n) if n.is_finite() && n > 0.0 => n,
        _ => {
            log::warn!("unusable column width {width:?}; using {N_COL_WPX_DEFAULT}px");
            N_COL_WPX_DEFAULT
        }
    }
}

fn parse_width_text(txt: &str) -> Option<f64> {
    let c_txt = txt.trim().to_ascii_lowercase();
    let n_idx_unit = c_txt
        .find(|chr: char| chr.is_ascii_alphabetic())
        .unwrap_or(c_txt.len());
    let (c_num, c_unit) = c_txt.split_at(n_idx_unit);
    let n_value = c_num.trim().parse::<f64>().ok()?;
    let n_factor = match c_unit.trim() {
        "" | "px" => 1.0,
        "pt" => 96.0 / 72.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "ch" => 7.0,
        _ => return None,
    };
    Some(n_value * n_factor)
}

/// Body row height, honouring `ROW_HPX` / `ROW_HPT` overrides in the row record.
pub fn derive_row_height(row: &Value) -> SpecRowHeight {
    let n_default = SpecRowHeight::default();
    let fn_read = |key: &str| {
        row.get(key)
            .and_then(Value::as_f64)
            .filter(|n| n.is_finite() && *n > 0.0)
    };
    SpecRowHeight {
        hpx: fn_read(C_KEY_ROW_HPX).unwrap_or(n_default.hpx),
        hpt: fn_read(C_KEY_ROW_HPT).unwrap_or(n_default.hpt),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region MergeResolution

/// Normalize a span anchored at `anchor` into a merge record.
///
/// Absent spans count as 1; spans below 1 are clamped to 1.
pub fn derive_merge(anchor: SpecCellAddress, span: &SpecSpan) -> SpecMerge {
    let n_col_span = clamp_span(span.col_span, "colSpan", anchor);
    let n_row_span = clamp_span(span.row_span, "rowSpan", anchor);
    SpecMerge {
        row_idx_start: anchor.row_idx,
        col_idx_start: anchor.col_idx,
        row_idx_end: anchor.row_idx + n_row_span - 1,
        col_idx_end: anchor.col_idx + n_col_span - 1,
    }
}

/// Merge record for `span`, or `None` when it covers a single cell.
pub fn resolve_merge(anchor: SpecCellAddress, span: &SpecSpan) -> Option<SpecMerge> {
    Some(derive_merge(anchor, span)).filter(SpecMerge::is_merge)
}

fn clamp_span(span: Option<i64>, name: &str, anchor: SpecCellAddress) -> usize {
    match span {
        None => 1,
        Some(n) if n >= 1 => usize::try_from(n).unwrap_or(1),
        Some(n) => {
            log::warn!(
                "{name}={n} at {} clamped to 1",
                encode_cell(anchor)
            );
            1
        }
    }
}

/// Cells covered by a merge, anchors excluded.
pub fn derive_covered_cell_tracker(merges: &[SpecMerge]) -> BTreeSet<SpecCellAddress> {
    let mut set_covered = BTreeSet::new();
    for merge in merges {
        for row_idx in merge.row_idx_start..=merge.row_idx_end {
            for col_idx in merge.col_idx_start..=merge.col_idx_end {
                let address = SpecCellAddress::new(row_idx, col_idx);
                if address != merge.start() {
                    set_covered.insert(address);
                }
            }
        }
    }
    set_covered
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SheetNormalization

/// Replace invalid chars and trim to valid Excel sheet name.
pub fn sanitize_sheet_name(name: &str, replace_to: &str) -> String {
    let mut c_name = name.to_string();
    for c_illegal in TUP_EXCEL_ILLEGAL {
        c_name = c_name.replace(c_illegal, replace_to);
    }
    c_name = c_name.trim().to_string();
    if c_name.is_empty() {
        c_name = "Sheet".to_string();
    }

    c_name.chars().take(N_LEN_EXCEL_SHEET_NAME_MAX).collect()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
