use crate::domain::{
    COUNTY_COLUMN, COUNTY_NAME_COLUMN, GEO_ID_COLUMN, IDENTIFIER_COLUMNS, NAME_COLUMN, RenameMap,
    STATE_COLUMN, STATE_NAME_COLUMN, TRACT_COLUMN, lookup_rename,
};
use crate::error::EtlError;
use crate::table::Table;

const NAME_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TractName {
    pub tract: String,
    pub county: String,
    pub state: String,
}

/// Splits `"<tract>; <county>; <state>"`. Exactly three parts are required.
pub fn split_name(value: &str) -> Result<TractName, EtlError> {
    let parts: Vec<&str> = value.split(NAME_SEPARATOR).collect();
    let [tract, county, state] = parts.as_slice() else {
        return Err(EtlError::NameSplit(value.to_string()));
    };
    Ok(TractName {
        tract: tract.to_string(),
        county: county.trim().to_string(),
        state: state.trim().to_string(),
    })
}

/// Concatenates the fixed-width code fragments with no separator.
pub fn geo_id(state: &str, county: &str, tract: &str) -> String {
    let mut id = String::with_capacity(state.len() + county.len() + tract.len());
    id.push_str(state);
    id.push_str(county);
    id.push_str(tract);
    id
}

/// Renames coded columns; columns missing from the map keep their name.
pub fn rename_columns(table: &mut Table, renames: RenameMap) {
    let renamed: Vec<(usize, &'static str)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(index, column)| lookup_rename(renames, column).map(|name| (index, name)))
        .collect();
    for (index, name) in renamed {
        table.rename_column(index, name);
    }
}

pub fn add_geo_id(table: &mut Table) -> Result<(), EtlError> {
    let state = table.require_column(STATE_COLUMN)?;
    let county = table.require_column(COUNTY_COLUMN)?;
    let tract = table.require_column(TRACT_COLUMN)?;
    let values = table
        .rows()
        .iter()
        .map(|row| {
            Some(geo_id(
                row[state].as_deref().unwrap_or_default(),
                row[county].as_deref().unwrap_or_default(),
                row[tract].as_deref().unwrap_or_default(),
            ))
        })
        .collect();
    table.push_column(GEO_ID_COLUMN, values);
    Ok(())
}

/// Replaces `NAME` with trimmed `County_Name` and `State_Name` columns.
pub fn split_name_column(table: &mut Table) -> Result<(), EtlError> {
    let name = table.require_column(NAME_COLUMN)?;
    let mut counties = Vec::with_capacity(table.len());
    let mut states = Vec::with_capacity(table.len());
    for row in table.rows() {
        let parts = split_name(row[name].as_deref().unwrap_or_default())?;
        counties.push(Some(parts.county));
        states.push(Some(parts.state));
    }
    table.push_column(COUNTY_NAME_COLUMN, counties);
    table.push_column(STATE_NAME_COLUMN, states);
    table.drop_column(name);
    Ok(())
}

/// Turns a stacked raw table into the tract-level schema: renamed columns,
/// synthesized `geo_id`, split names, identifier columns first.
pub fn normalize(mut table: Table, renames: RenameMap) -> Result<Table, EtlError> {
    rename_columns(&mut table, renames);
    add_geo_id(&mut table)?;
    split_name_column(&mut table)?;
    table.reorder_leading(&IDENTIFIER_COLUMNS)?;
    Ok(table)
}
