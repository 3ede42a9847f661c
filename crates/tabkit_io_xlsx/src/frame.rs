//! Polars `DataFrame` adapter: turn a frame into row records and a flat schema.

use std::io::Cursor;

use polars::prelude::{AnyValue, DataFrame, IpcReader, SerReader};
use serde_json::{Map, Number, Value};

use crate::spec::{Result, SpecColumn, SpecDataIndex};

/// One leaf column per frame column, titled and indexed by the column name.
///
/// The data index is a single segment, so names containing `.` are looked up
/// verbatim instead of as nested paths.
pub fn derive_columns_from_dataframe(df: &DataFrame) -> Vec<SpecColumn> {
    df.get_column_names_str()
        .into_iter()
        .map(|name| SpecColumn {
            title: Some(name.to_string()),
            data_index: Some(SpecDataIndex(vec![name.to_string()])),
            ..Default::default()
        })
        .collect()
}

/// Convert every frame row into a JSON object keyed by column name.
pub fn derive_rows_from_dataframe(df: &DataFrame) -> Result<Vec<Value>> {
    let l_colnames: Vec<String> = df
        .get_column_names_str()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let columns = df.get_columns();

    let mut l_rows = Vec::with_capacity(df.height());
    for n_row in 0..df.height() {
        let mut dict_row = Map::with_capacity(l_colnames.len());
        for (name, col) in l_colnames.iter().zip(columns) {
            dict_row.insert(name.clone(), derive_json_value_from_any_value(col.get(n_row)?));
        }
        l_rows.push(Value::Object(dict_row));
    }
    Ok(l_rows)
}

/// Decode Arrow IPC bytes and convert the frame rows.
pub fn derive_rows_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<Vec<Value>> {
    let df = derive_dataframe_from_ipc_bytes(v_ipc_df)?;
    derive_rows_from_dataframe(&df)
}

pub fn derive_dataframe_from_ipc_bytes(v_ipc_df: &[u8]) -> Result<DataFrame> {
    Ok(IpcReader::new(Cursor::new(v_ipc_df)).finish()?)
}

/// Map one polars scalar onto JSON.
///
/// Integers stay integral; non-finite floats become their text form.
pub fn derive_json_value_from_any_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(val) => Value::Bool(val),
        AnyValue::String(val) => Value::String(val.to_string()),
        AnyValue::StringOwned(val) => Value::String(val.to_string()),
        AnyValue::UInt8(val) => Value::from(val),
        AnyValue::UInt16(val) => Value::from(val),
        AnyValue::UInt32(val) => Value::from(val),
        AnyValue::UInt64(val) => Value::from(val),
        AnyValue::Int8(val) => Value::from(val),
        AnyValue::Int16(val) => Value::from(val),
        AnyValue::Int32(val) => Value::from(val),
        AnyValue::Int64(val) => Value::from(val),
        AnyValue::Float32(val) => convert_f64_to_json(val as f64),
        AnyValue::Float64(val) => convert_f64_to_json(val),
        _ => Value::String(value.to_string()),
    }
}

fn convert_f64_to_json(val: f64) -> Value {
    Number::from_f64(val)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(val.to_string()))
}
