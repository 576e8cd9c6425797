use serde_json::Value;
use syndication_core::analysis::ComparisonRow;

/// Header and body rows of a side-by-side comparison, if `result` is one.
///
/// Cells are rendered through `MetricValue`'s `Display`, so every output
/// format agrees on number formatting.
pub fn comparison_grid(result: &Value) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let rows: Vec<ComparisonRow> = serde_json::from_value(result.get("rows")?.clone()).ok()?;
    let ids: Vec<u64> = result
        .get("scenario_ids")?
        .as_array()?
        .iter()
        .filter_map(Value::as_u64)
        .collect();

    let mut header = vec!["Section".to_string(), "Metric".to_string()];
    header.extend(ids.iter().map(|id| format!("Scenario {id}")));

    let body = rows
        .iter()
        .map(|row| {
            let mut cells = vec![row.section.to_string(), row.metric.clone()];
            cells.extend(row.values.iter().map(ToString::to_string));
            cells
        })
        .collect();

    Some((header, body))
}
