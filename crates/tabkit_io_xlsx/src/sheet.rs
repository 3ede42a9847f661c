//! Grid assembly: header and body cells, sizing, merges and used range.

use serde_json::Value;

use crate::column::{build_header_grid, flatten_columns};
use crate::conf::{derive_default_body_style, derive_default_header_style};
use crate::spec::{
    SpecCellAddress, SpecCellRecord, SpecCellStyle, SpecColumn, SpecHeaderGrid, SpecRowHeight,
    SpecSheet, SpecSheetLayoutOptions,
};
use crate::util::{
    convert_value_to_cell, convert_width_to_px, derive_row_height, encode_range, lookup_path,
    normalize_render_value, resolve_merge,
};

/// Assemble one sheet from a column schema and row records.
///
/// Body cells are produced column by column; each row's height is fixed while
/// walking the first leaf column. With headers suppressed the header level is 0
/// and body rows start at the first grid row.
pub fn build_sheet(
    columns: &[SpecColumn],
    rows: &[Value],
    options: &SpecSheetLayoutOptions,
) -> SpecSheet {
    let flat = flatten_columns(columns);
    let mut sheet = SpecSheet::default();

    let n_level_header = if options.if_show_header { flat.level } else { 0 };
    if n_level_header > 0 {
        sheet
            .row_heights
            .extend(std::iter::repeat_n(SpecRowHeight::default(), n_level_header));
        let header = build_header_grid(columns, n_level_header);
        write_header_cells(&header, options, &mut sheet);
        sheet.merges.extend(header.merges);
    }
    sheet.level_header = n_level_header;

    let style_body_base = derive_default_body_style()
        .merge(&options.cell_style)
        .merge(&options.body_cell_style);
    let l_row_styles: Vec<SpecCellStyle> = if flat.columns.is_empty() {
        vec![]
    } else {
        rows.iter()
            .enumerate()
            .map(|(row_idx, row)| options.on_body_row.apply(row, row_idx))
            .collect()
    };

    for (col_idx, leaf) in flat.columns.iter().enumerate() {
        sheet.col_widths_px.push(convert_width_to_px(leaf.width()));
        let data_index = leaf.data_index();

        for (row_idx, (row, style_row)) in rows.iter().zip(&l_row_styles).enumerate() {
            if col_idx == 0 {
                sheet.row_heights.push(derive_row_height(row));
            }
            let address = SpecCellAddress::new(n_level_header + row_idx, col_idx);

            let value_raw = data_index
                .as_ref()
                .and_then(|index| lookup_path(row, index))
                .cloned()
                .unwrap_or(Value::Null);
            let rendered = leaf.column.render.apply(&value_raw, row, row_idx);
            let span = rendered
                .span
                .or_else(|| leaf.column.merge_directives.get(&row_idx).copied());
            if let Some(span) = span
                && let Some(merge) = resolve_merge(address, &span)
            {
                sheet.merges.push(merge);
            }

            let value = if options.if_use_render && leaf.column.render.is_set() {
                normalize_render_value(rendered.value)
            } else if options.if_use_render {
                rendered.value
            } else {
                value_raw
            };
            let (cell_type, cell_value) = convert_value_to_cell(&value, options.if_raw);
            let style = style_body_base
                .merge(style_row)
                .merge(&leaf.column.on_body_cell.apply(row, row_idx));

            let mut record = SpecCellRecord {
                cell_type,
                value: cell_value,
                style,
                ..Default::default()
            };
            if let Some(model) = options.cell_models.get(&address) {
                record = record.apply_model(model);
            }
            sheet.cells.insert(address, record);
        }
    }

    let n_row_idx_last = (n_level_header + rows.len()).max(1) - 1;
    let n_col_idx_last = flat.columns.len().max(1) - 1;
    sheet.range_ref = encode_range(
        SpecCellAddress::new(0, 0),
        SpecCellAddress::new(n_row_idx_last, n_col_idx_last),
    );

    log::debug!(
        "assembled sheet: leaves={} level={} rows={} merges={} ref={}",
        flat.columns.len(),
        n_level_header,
        rows.len(),
        sheet.merges.len(),
        sheet.range_ref
    );
    sheet
}

fn write_header_cells(
    header: &SpecHeaderGrid,
    options: &SpecSheetLayoutOptions,
    sheet: &mut SpecSheet,
) {
    let style_header_base = derive_default_header_style()
        .merge(&options.cell_style)
        .merge(&options.header_cell_style);

    for (row_idx, row) in header.rows.iter().enumerate() {
        for (col_idx, cell) in row.iter().enumerate() {
            let address = SpecCellAddress::new(row_idx, col_idx);
            let style = match &cell.style {
                Some(style_node) => style_header_base.merge(style_node),
                None => style_header_base.clone(),
            };
            let mut record = SpecCellRecord::text(cell.title.clone(), style);
            if let Some(model) = options.cell_models.get(&address) {
                record = record.apply_model(model);
            }
            sheet.cells.insert(address, record);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::spec::{
        EnumCellType, EnumCellValue, EnumColumnWidth, RowStyler, SpecCellModel, SpecMerge,
        SpecRenderResult, SpecSpan,
    };

    fn text(value: &str) -> EnumCellValue {
        EnumCellValue::String(value.to_string())
    }

    #[test]
    fn test_build_sheet_single_column_scenario() {
        let columns = vec![SpecColumn::leaf("Name", "name")];
        let rows = vec![json!({"name": "A"}), json!({"name": "B"})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(sheet.cell("A1").map(|c| &c.value), Some(&text("Name")));
        assert_eq!(sheet.cell("A2").map(|c| &c.value), Some(&text("A")));
        assert_eq!(sheet.cell("A3").map(|c| &c.value), Some(&text("B")));
        assert_eq!(sheet.range_ref, "A1:A3");
        assert!(sheet.merges.is_empty());
        assert_eq!(sheet.row_heights.len(), 3);
        assert_eq!(sheet.col_widths_px.len(), 1);
        assert_eq!(sheet.level_header, 1);
    }

    #[test]
    fn test_build_sheet_round_trips_flat_values() {
        let columns = vec![
            SpecColumn::leaf("Name", "name"),
            SpecColumn::leaf("City", "address.city"),
            SpecColumn::leaf("Note", "note"),
        ];
        let rows = vec![
            json!({"name": "Ann", "address": {"city": "Oslo"}, "note": "x"}),
            json!({"name": "Bob", "address": {}}),
        ];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        let l_body: Vec<Vec<String>> = (1..=2)
            .map(|row_idx| {
                (0..3)
                    .map(|col_idx| {
                        sheet
                            .cell_at(row_idx, col_idx)
                            .map(|c| c.value.to_string())
                            .unwrap_or_default()
                    })
                    .collect()
            })
            .collect();
        assert_eq!(
            l_body,
            vec![
                vec!["Ann".to_string(), "Oslo".to_string(), "x".to_string()],
                vec!["Bob".to_string(), String::new(), String::new()],
            ]
        );
    }

    #[test]
    fn test_build_sheet_group_scenario() {
        let columns = vec![SpecColumn::group(
            "Group",
            vec![SpecColumn::leaf("X", "x"), SpecColumn::leaf("Y", "y")],
        )];
        let rows = vec![json!({"x": 1, "y": 2})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(sheet.level_header, 2);
        assert_eq!(
            sheet.merges,
            vec![SpecMerge {
                row_idx_start: 0,
                col_idx_start: 0,
                row_idx_end: 0,
                col_idx_end: 1,
            }]
        );
        assert_eq!(sheet.cell("A3").map(|c| &c.value), Some(&text("1")));
        assert_eq!(sheet.range_ref, "A1:B3");
    }

    #[test]
    fn test_build_sheet_render_span_emits_content_merge() {
        let columns = vec![
            SpecColumn::leaf("A", "a"),
            SpecColumn::leaf("B", "b").with_render(|value, _row, row_idx| {
                let rendered = SpecRenderResult::value(value.clone());
                if row_idx == 0 {
                    rendered.with_span(2, 1)
                } else {
                    rendered
                }
            }),
            SpecColumn::leaf("C", "c"),
        ];
        let rows = vec![json!({"a": 1, "b": 2, "c": 3}), json!({"a": 4, "b": 5})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(
            sheet.merges,
            vec![SpecMerge {
                row_idx_start: 1,
                col_idx_start: 1,
                row_idx_end: 1,
                col_idx_end: 2,
            }]
        );
    }

    #[test]
    fn test_build_sheet_merge_directives_apply_without_render_span() {
        let columns = vec![SpecColumn::leaf("A", "a").with_merge_directive(
            0,
            SpecSpan {
                col_span: None,
                row_span: Some(2),
            },
        )];
        let rows = vec![json!({"a": "x"}), json!({"a": "x"})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(
            sheet.merges,
            vec![SpecMerge {
                row_idx_start: 1,
                col_idx_start: 0,
                row_idx_end: 2,
                col_idx_end: 0,
            }]
        );
    }

    #[test]
    fn test_build_sheet_use_render_false_keeps_raw_value_but_merges() {
        let columns = vec![
            SpecColumn::leaf("A", "a").with_render(|value, _row, _row_idx| {
                SpecRenderResult::value(format!("<{}>", value)).with_span(1, 2)
            }),
        ];
        let rows = vec![json!({"a": 7}), json!({"a": 8})];

        let options_rendered = SpecSheetLayoutOptions::default();
        let sheet = build_sheet(&columns, &rows, &options_rendered);
        assert_eq!(sheet.cell("A2").map(|c| &c.value), Some(&text("<7>")));

        let options_raw = SpecSheetLayoutOptions {
            if_use_render: false,
            if_raw: true,
            ..Default::default()
        };
        let sheet = build_sheet(&columns, &rows, &options_raw);
        let cell = sheet.cell("A2").expect("body cell");
        assert_eq!(cell.value, EnumCellValue::Number(7.0));
        assert_eq!(cell.cell_type, EnumCellType::Number);
        assert_eq!(sheet.merges.len(), 2);
    }

    #[test]
    fn test_build_sheet_hidden_header_starts_body_at_first_row() {
        let columns = vec![SpecColumn::group(
            "G",
            vec![SpecColumn::leaf("X", "x"), SpecColumn::leaf("Y", "y")],
        )];
        let rows = vec![json!({"x": "1", "y": "2"})];
        let options = SpecSheetLayoutOptions {
            if_show_header: false,
            ..Default::default()
        };
        let sheet = build_sheet(&columns, &rows, &options);

        assert_eq!(sheet.level_header, 0);
        assert!(sheet.merges.is_empty());
        assert_eq!(sheet.cell("A1").map(|c| &c.value), Some(&text("1")));
        assert_eq!(sheet.cell("B1").map(|c| &c.value), Some(&text("2")));
        assert_eq!(sheet.cells.len(), 2);
        assert_eq!(sheet.range_ref, "A1:B1");
    }

    #[test]
    fn test_build_sheet_empty_inputs_give_minimal_range() {
        let sheet = build_sheet(&[], &[], &SpecSheetLayoutOptions::default());
        assert!(sheet.cells.is_empty());
        assert!(sheet.row_heights.is_empty());
        assert_eq!(sheet.range_ref, "A1:A1");

        let columns = vec![SpecColumn::leaf("X", "x")];
        let sheet = build_sheet(&columns, &[], &SpecSheetLayoutOptions::default());
        assert_eq!(sheet.cells.len(), 1);
        assert_eq!(sheet.range_ref, "A1:A1");
    }

    #[test]
    fn test_build_sheet_style_layers_in_precedence_order() {
        let n_row_calls = Arc::new(AtomicUsize::new(0));
        let n_row_calls_seen = Arc::clone(&n_row_calls);

        let columns = vec![
            SpecColumn::leaf("A", "a"),
            SpecColumn::leaf("B", "b").with_body_cell_style(|_row, _row_idx| SpecCellStyle {
                font_color_rgb: Some("0000ff".to_string()),
                ..Default::default()
            }),
        ];
        let rows = vec![json!({"a": 1, "b": 2})];
        let options = SpecSheetLayoutOptions {
            cell_style: SpecCellStyle {
                font_name: Some("Arial".to_string()),
                font_size: Some(10),
                ..Default::default()
            },
            body_cell_style: SpecCellStyle {
                font_size: Some(12),
                font_color_rgb: Some("ff0000".to_string()),
                ..Default::default()
            },
            header_cell_style: SpecCellStyle {
                font_size: Some(14),
                ..Default::default()
            },
            on_body_row: RowStyler::new(move |_row, _row_idx| {
                n_row_calls.fetch_add(1, Ordering::SeqCst);
                SpecCellStyle {
                    alignment_horizontal: Some("right".to_string()),
                    ..Default::default()
                }
            }),
            ..Default::default()
        };
        let sheet = build_sheet(&columns, &rows, &options);

        let style_a = &sheet.cell("A2").expect("A2").style;
        assert_eq!(style_a.font_name.as_deref(), Some("Arial"));
        assert_eq!(style_a.font_size, Some(12));
        assert_eq!(style_a.font_color_rgb.as_deref(), Some("ff0000"));
        assert_eq!(style_a.alignment_horizontal.as_deref(), Some("right"));

        let style_b = &sheet.cell("B2").expect("B2").style;
        assert_eq!(style_b.font_color_rgb.as_deref(), Some("0000ff"));

        let style_header = &sheet.cell("A1").expect("A1").style;
        assert_eq!(style_header.font_bold, Some(true));
        assert_eq!(style_header.fill_fg_color_rgb.as_deref(), Some("e9ebf0"));
        assert_eq!(style_header.font_size, Some(14));
        assert_eq!(style_header.font_name.as_deref(), Some("Arial"));
        assert_eq!(style_header.alignment_horizontal, None);

        assert_eq!(n_row_calls_seen.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_build_sheet_cell_models_overlay_header_and_body() {
        let columns = vec![SpecColumn::leaf("A", "a")];
        let rows = vec![json!({"a": 1})];
        let mut cell_models = BTreeMap::new();
        cell_models.insert(
            SpecCellAddress::new(1, 0),
            SpecCellModel {
                formula: Some("1+1".to_string()),
                cell_type: Some(EnumCellType::Number),
                value: Some("2".to_string()),
                ..Default::default()
            },
        );
        cell_models.insert(
            SpecCellAddress::new(0, 0),
            SpecCellModel {
                hyperlink: Some("https://example.com".to_string()),
                ..Default::default()
            },
        );
        let options = SpecSheetLayoutOptions {
            cell_models,
            ..Default::default()
        };
        let sheet = build_sheet(&columns, &rows, &options);

        let body = sheet.cell("A2").expect("A2");
        assert_eq!(body.formula.as_deref(), Some("1+1"));
        assert_eq!(body.value, EnumCellValue::Number(2.0));
        let header = sheet.cell("A1").expect("A1");
        assert_eq!(header.hyperlink.as_deref(), Some("https://example.com"));
        assert_eq!(header.value, text("A"));
    }

    #[test]
    fn test_build_sheet_sizes_rows_and_columns() {
        let columns = vec![
            SpecColumn::leaf("A", "a").with_width(EnumColumnWidth::Pixels(150.0)),
            SpecColumn::leaf("B", "b"),
        ];
        let rows = vec![json!({"a": 1, "ROW_HPX": 40, "ROW_HPT": 30}), json!({"a": 2})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(
            sheet.col_widths_px,
            vec![150.0, crate::conf::N_COL_WPX_DEFAULT]
        );
        assert_eq!(sheet.row_heights.len(), 3);
        assert_eq!(sheet.row_heights[1].hpx, 40.0);
        assert_eq!(sheet.row_heights[1].hpt, 30.0);
        assert_eq!(sheet.row_heights[2], SpecRowHeight::default());
    }

    #[test]
    fn test_build_sheet_stores_falsy_values_as_empty_text() {
        let columns = vec![SpecColumn::leaf("A", "a")];
        let rows = vec![
            json!({"a": 0}),
            json!({"a": false}),
            json!({"a": ""}),
            json!({"a": 1}),
        ];
        let options_raw = SpecSheetLayoutOptions {
            if_raw: true,
            ..Default::default()
        };

        for options in [SpecSheetLayoutOptions::default(), options_raw] {
            let sheet = build_sheet(&columns, &rows, &options);
            for label in ["A2", "A3", "A4"] {
                let cell = sheet.cell(label).expect("body cell");
                assert_eq!(cell.value, text(""));
                assert_eq!(cell.cell_type, EnumCellType::String);
            }
            assert_ne!(sheet.cell("A5").map(|c| c.value.to_string()), Some(String::new()));
        }
    }

    #[test]
    fn test_build_sheet_plain_object_value_is_not_unwrapped_without_render() {
        let columns = vec![SpecColumn::leaf("A", "a")];
        let rows = vec![json!({"a": {"children": "inner"}})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(
            sheet.cell("A2").map(|c| &c.value),
            Some(&text("{\"children\":\"inner\"}"))
        );
    }

    #[test]
    fn test_build_sheet_cell_callback_beats_row_callback_on_conflict() {
        let columns = vec![
            SpecColumn::leaf("A", "a"),
            SpecColumn::leaf("B", "b").with_body_cell_style(|_row, _row_idx| SpecCellStyle {
                font_color_rgb: Some("0000ff".to_string()),
                ..Default::default()
            }),
        ];
        let rows = vec![json!({"a": "x", "b": "y"})];
        let options = SpecSheetLayoutOptions {
            body_cell_style: SpecCellStyle {
                font_color_rgb: Some("00ff00".to_string()),
                ..Default::default()
            },
            on_body_row: RowStyler::new(|_row, _row_idx| SpecCellStyle {
                font_color_rgb: Some("ff0000".to_string()),
                font_bold: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let sheet = build_sheet(&columns, &rows, &options);

        let style_a = &sheet.cell("A2").expect("A2").style;
        assert_eq!(style_a.font_color_rgb.as_deref(), Some("ff0000"));

        let style_b = &sheet.cell("B2").expect("B2").style;
        assert_eq!(style_b.font_color_rgb.as_deref(), Some("0000ff"));
        assert_eq!(style_b.font_bold, Some(true));
    }

    #[test]
    fn test_build_sheet_key_fallback_when_data_index_absent() {
        let columns = vec![SpecColumn {
            title: Some("K".to_string()),
            key: Some("k".to_string()),
            ..Default::default()
        }];
        let rows = vec![json!({"k": "v"})];
        let sheet = build_sheet(&columns, &rows, &SpecSheetLayoutOptions::default());

        assert_eq!(sheet.cell("A2").map(|c| &c.value), Some(&text("v")));
    }
}
