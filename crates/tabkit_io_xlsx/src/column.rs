//! Column tree flattening and header grid construction.

use crate::spec::{
    SpecCellAddress, SpecColumn, SpecFlatColumns, SpecHeaderCell, SpecHeaderGrid,
    SpecHeaderMerge, SpecLeafColumn, SpecSpan,
};
use crate::util::resolve_merge;

////////////////////////////////////////////////////////////////////////////////
// #region Flattening

/// Flatten `columns` into leaf columns (pre-order, left to right) and the header level.
///
/// The header level is `1 + max leaf depth`, or `0` for an empty schema.
pub fn flatten_columns(columns: &[SpecColumn]) -> SpecFlatColumns<'_> {
    let mut l_leaf_columns = Vec::new();
    collect_leaf_columns(columns, 0, &mut l_leaf_columns);
    let n_level = l_leaf_columns
        .iter()
        .map(|leaf| leaf.depth + 1)
        .max()
        .unwrap_or(0);

    SpecFlatColumns {
        columns: l_leaf_columns,
        level: n_level,
    }
}

fn collect_leaf_columns<'a>(
    columns: &'a [SpecColumn],
    depth: usize,
    out: &mut Vec<SpecLeafColumn<'a>>,
) {
    for column in columns {
        if column.is_group() {
            collect_leaf_columns(&column.children, depth + 1, out);
        } else {
            out.push(SpecLeafColumn { column, depth });
        }
    }
}

/// Number of grid columns a node covers.
pub fn count_leaf_columns(column: &SpecColumn) -> usize {
    if column.is_group() {
        column.children.iter().map(count_leaf_columns).sum()
    } else {
        1
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region HeaderGrid

/// Build the dense `level x leaf count` header grid.
///
/// Groups repeat their title across every covered position at their own depth
/// and carry one grouping merge (`1 x K`). Leaves shallower than the last header
/// row fill downward with one depth-filling merge (`(level - depth) x 1`). All
/// positions covered by one merge share the same merge id, so
/// [`SpecHeaderGrid::merges`] lists each merge exactly once.
pub fn build_header_grid(columns: &[SpecColumn], level: usize) -> SpecHeaderGrid {
    let n_cols: usize = columns.iter().map(count_leaf_columns).sum();
    let mut l_rows = vec![vec![SpecHeaderCell::default(); n_cols]; level];
    let mut n_merge_id_next = 0usize;

    fill_header_cells(columns, 0, 0, level, &mut l_rows, &mut n_merge_id_next);

    let merges = SpecHeaderGrid::derive_merges(&l_rows);
    SpecHeaderGrid {
        rows: l_rows,
        merges,
    }
}

fn fill_header_cells(
    columns: &[SpecColumn],
    depth: usize,
    col_idx_start: usize,
    level: usize,
    rows: &mut [Vec<SpecHeaderCell>],
    merge_id_next: &mut usize,
) {
    let mut n_col_idx = col_idx_start;
    for column in columns {
        let n_width = count_leaf_columns(column);
        let (span, n_row_idx_end) = if column.is_group() {
            (SpecSpan::new(n_width as i64, 1), depth + 1)
        } else {
            let n_rows_filled = level.saturating_sub(depth).max(1);
            (SpecSpan::new(1, n_rows_filled as i64), depth + n_rows_filled)
        };

        let merge = resolve_merge(SpecCellAddress::new(depth, n_col_idx), &span).map(|range| {
            let id = *merge_id_next;
            *merge_id_next += 1;
            SpecHeaderMerge { id, range }
        });
        let cell = SpecHeaderCell {
            title: column.title.clone().unwrap_or_default(),
            merge,
            style: column.header_cell_style.clone(),
        };

        for row in rows.iter_mut().take(n_row_idx_end).skip(depth) {
            for slot in row.iter_mut().skip(n_col_idx).take(n_width) {
                *slot = cell.clone();
            }
        }

        if column.is_group() {
            fill_header_cells(
                &column.children,
                depth + 1,
                n_col_idx,
                level,
                rows,
                merge_id_next,
            );
        }
        n_col_idx += n_width;
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
