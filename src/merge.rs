use std::collections::HashMap;

use tracing::warn;

use crate::domain::IDENTIFIER_COLUMNS;
use crate::error::EtlError;
use crate::table::Table;

const LEFT_SUFFIX: &str = "_x";
const RIGHT_SUFFIX: &str = "_y";

type Key = Vec<Option<String>>;

fn pick(row: &[Option<String>], indices: &[usize]) -> Vec<Option<String>> {
    indices.iter().map(|&i| row[i].clone()).collect()
}

fn key_of(row: &[Option<String>], indices: &[usize]) -> Key {
    pick(row, indices)
}

/// Full outer join on `keys`. Every left row is paired with each matching
/// right row; unmatched rows from either side are kept with the other side's
/// columns set to `None`. Output is sorted by key.
///
/// Non-key columns present on both sides are suffixed with `_x` / `_y`.
pub fn outer_join(left: &Table, right: &Table, keys: &[&str]) -> Result<Table, EtlError> {
    let left_keys = keys
        .iter()
        .map(|key| left.require_column(key))
        .collect::<Result<Vec<_>, _>>()?;
    let right_keys = keys
        .iter()
        .map(|key| right.require_column(key))
        .collect::<Result<Vec<_>, _>>()?;

    let left_rest: Vec<usize> = (0..left.columns().len())
        .filter(|i| !left_keys.contains(i))
        .collect();
    let right_rest: Vec<usize> = (0..right.columns().len())
        .filter(|i| !right_keys.contains(i))
        .collect();

    let collisions: Vec<&String> = left_rest
        .iter()
        .map(|&i| &left.columns()[i])
        .filter(|name| right_rest.iter().any(|&j| &right.columns()[j] == *name))
        .collect();
    if !collisions.is_empty() {
        warn!(columns = ?collisions, "non-key columns overlap in outer join; suffixing with _x/_y");
    }
    let label = |name: &String, suffix: &str| {
        if collisions.contains(&name) {
            format!("{name}{suffix}")
        } else {
            name.clone()
        }
    };

    let mut columns: Vec<String> = keys.iter().map(|key| key.to_string()).collect();
    columns.extend(left_rest.iter().map(|&i| label(&left.columns()[i], LEFT_SUFFIX)));
    columns.extend(right_rest.iter().map(|&j| label(&right.columns()[j], RIGHT_SUFFIX)));

    let mut right_index: HashMap<Key, Vec<usize>> = HashMap::new();
    for (position, row) in right.rows().iter().enumerate() {
        right_index
            .entry(key_of(row, &right_keys))
            .or_default()
            .push(position);
    }

    let empty_left: Vec<Option<String>> = vec![None; left_rest.len()];
    let empty_right: Vec<Option<String>> = vec![None; right_rest.len()];

    let mut matched_right = vec![false; right.len()];
    let mut joined: Vec<(Key, Vec<Option<String>>)> = Vec::new();
    for row in left.rows() {
        let key = key_of(row, &left_keys);
        let left_values = pick(row, &left_rest);
        match right_index.get(&key) {
            Some(positions) => {
                for &position in positions {
                    matched_right[position] = true;
                    let mut values = left_values.clone();
                    values.extend(pick(&right.rows()[position], &right_rest));
                    joined.push((key.clone(), values));
                }
            }
            None => {
                let mut values = left_values;
                values.extend(empty_right.iter().cloned());
                joined.push((key, values));
            }
        }
    }
    for (position, row) in right.rows().iter().enumerate() {
        if matched_right[position] {
            continue;
        }
        let mut values = empty_left.clone();
        values.extend(pick(row, &right_rest));
        joined.push((key_of(row, &right_keys), values));
    }

    joined.sort_by(|a, b| a.0.cmp(&b.0));

    let mut table = Table::new(columns);
    for (key, values) in joined {
        let mut row = key;
        row.extend(values);
        table.push_row(row)?;
    }
    Ok(table)
}

/// `(first ⋈ second) ⋈ third` on the tract identifier columns.
pub fn merge(first: &Table, second: &Table, third: &Table) -> Result<Table, EtlError> {
    let partial = outer_join(first, second, &IDENTIFIER_COLUMNS)?;
    outer_join(&partial, third, &IDENTIFIER_COLUMNS)
}
