//! Helpers for reading data back out of rendered chart options.

use serde_json::{Map, Value};

#[cfg(test)]
#[path = "series_tests.rs"]
mod tests;

/// Flattens one rendered series into rows.
///
/// Each data point becomes a row. Mapping points are taken as they are,
/// `[x, y]` pairs become `{x, y}` and bare values become `{y}`. The series
/// `name` and `stack` are added as `series_name` and `stack`. When the
/// rendered chart has `xAxis.categories` (or `yAxis.categories`), numeric
/// `x` (or `y`) values are replaced by the category at that index; values
/// that do not index a category become null.
pub fn extract_series_rows(series: &Value, rendered: &Value) -> Vec<Map<String, Value>> {
    let Some(data) = series.get("data").and_then(Value::as_array) else {
        return Vec::new();
    };
    let x_categories = categories(rendered, "xAxis");
    let y_categories = categories(rendered, "yAxis");

    data.iter()
        .map(|point| {
            let mut row = point_row(point);
            if let Some(name) = series.get("name") {
                row.insert("series_name".into(), name.clone());
            }
            if let Some(stack) = series.get("stack") {
                row.insert("stack".into(), stack.clone());
            }
            if let Some(categories) = x_categories {
                map_category(&mut row, "x", categories);
            }
            if let Some(categories) = y_categories {
                map_category(&mut row, "y", categories);
            }
            row
        })
        .collect()
}

/// Rows of every series of a rendered chart, in series order.
pub fn extract_chart_rows(rendered: &Value) -> Vec<Map<String, Value>> {
    rendered
        .get("series")
        .and_then(Value::as_array)
        .map(|all| {
            all.iter()
                .flat_map(|series| extract_series_rows(series, rendered))
                .collect()
        })
        .unwrap_or_default()
}

fn point_row(point: &Value) -> Map<String, Value> {
    match point {
        Value::Object(map) => map.clone(),
        Value::Array(pair) if pair.len() == 2 => {
            let mut row = Map::new();
            row.insert("x".into(), pair[0].clone());
            row.insert("y".into(), pair[1].clone());
            row
        }
        other => {
            let mut row = Map::new();
            row.insert("y".into(), other.clone());
            row
        }
    }
}

fn categories<'a>(rendered: &'a Value, axis: &str) -> Option<&'a Vec<Value>> {
    rendered
        .get(axis)
        .and_then(|a| a.get("categories"))
        .and_then(Value::as_array)
}

fn map_category(row: &mut Map<String, Value>, field: &str, categories: &[Value]) {
    if let Some(value) = row.get_mut(field) {
        *value = value
            .as_u64()
            .and_then(|index| usize::try_from(index).ok())
            .and_then(|index| categories.get(index))
            .cloned()
            .unwrap_or(Value::Null);
    }
}
