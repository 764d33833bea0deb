use std::collections::HashMap;

use serde_json::Value;

use crate::enrich::mapping::MappingSpec;
use crate::enrich::table::cell_text;
use crate::legs::TraceRow;

static NULL: Value = Value::Null;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinStats {
    pub matched: usize,
    pub unmatched: usize,
    /// Lookup keys that appeared more than once; only their first row is used.
    pub duplicate_keys: Vec<String>,
}

/// Left-join `spec.table` onto the rows.
///
/// Every row is kept exactly once. Rows without a match get `null` in the
/// destination column. Without a mapping the rows are returned untouched.
pub fn enrich(
    mut rows: Vec<TraceRow>,
    spec: Option<&MappingSpec>,
) -> (Vec<TraceRow>, JoinStats) {
    let mut stats = JoinStats::default();
    let Some(spec) = spec else {
        return (rows, stats);
    };

    let index = build_index(spec, &mut stats);

    for row in &mut rows {
        let value = spec
            .key_column
            .value(row)
            .and_then(|key| index.get(&key))
            .map(|v| (*v).clone());

        match value {
            Some(v) => {
                stats.matched += 1;
                row.extra.insert(spec.destination_column.clone(), v);
            }
            None => {
                stats.unmatched += 1;
                row.extra.insert(spec.destination_column.clone(), Value::Null);
            }
        }
    }

    log::info!(
        "Mapped {} onto {}: {} matched, {} unmatched",
        spec.value_column,
        spec.destination_column,
        stats.matched,
        stats.unmatched
    );
    (rows, stats)
}

fn build_index<'a>(spec: &'a MappingSpec, stats: &mut JoinStats) -> HashMap<String, &'a Value> {
    let key_name = spec.key_column.as_ref();
    let mut index: HashMap<String, &Value> = HashMap::new();

    for row in spec.table.rows() {
        let Some(key) = row.get(key_name).and_then(cell_text) else {
            continue;
        };
        let key = spec.key_column.normalize_key(&key);
        if index.contains_key(&key) {
            if !stats.duplicate_keys.contains(&key) {
                log::warn!(
                    "Lookup table has duplicate {} {:?}; keeping the first row",
                    key_name,
                    key
                );
                stats.duplicate_keys.push(key);
            }
            continue;
        }
        index.insert(key, row.get(&spec.value_column).unwrap_or(&NULL));
    }

    index
}
