use crate::error::EtlError;

/// Column-named rows of optional string cells. `None` marks a value that is
/// absent, e.g. the unmatched side of an outer join.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Builds a table from fully populated string rows, checking each row's
    /// arity against the header.
    pub fn from_strings(columns: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, EtlError> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row.into_iter().map(Some).collect())?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn require_column(&self, name: &str) -> Result<usize, EtlError> {
        self.column_index(name)
            .ok_or_else(|| EtlError::MissingColumn(name.to_string()))
    }

    pub fn push_row(&mut self, row: Vec<Option<String>>) -> Result<(), EtlError> {
        if row.len() != self.columns.len() {
            return Err(EtlError::RowArity {
                row: self.rows.len() + 1,
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Cell value by row and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }

    pub fn rename_column(&mut self, index: usize, name: impl Into<String>) {
        if let Some(column) = self.columns.get_mut(index) {
            *column = name.into();
        }
    }

    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<String>>) {
        debug_assert_eq!(values.len(), self.rows.len());
        self.columns.push(name.into());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.push(value);
        }
    }

    pub fn drop_column(&mut self, index: usize) {
        if index >= self.columns.len() {
            return;
        }
        self.columns.remove(index);
        for row in &mut self.rows {
            row.remove(index);
        }
    }

    /// Reorders columns to `leading` followed by every other column in its
    /// current order. Leading names that do not exist are errors.
    pub fn reorder_leading(&mut self, leading: &[&str]) -> Result<(), EtlError> {
        let mut order = Vec::with_capacity(self.columns.len());
        for name in leading {
            order.push(self.require_column(name)?);
        }
        for (index, column) in self.columns.iter().enumerate() {
            if !leading.contains(&column.as_str()) {
                order.push(index);
            }
        }
        self.columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| row[i].take()).collect();
        }
        Ok(())
    }

    /// Stacks tables vertically, aligning cells by column name. Columns are
    /// the union in first-seen order; cells a table lacks become `None`.
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut columns: Vec<String> = Vec::new();
        for table in &tables {
            for column in &table.columns {
                if !columns.contains(column) {
                    columns.push(column.clone());
                }
            }
        }

        let mut rows = Vec::new();
        for table in tables {
            let mapping: Vec<Option<usize>> = columns
                .iter()
                .map(|column| table.column_index(column))
                .collect();
            for mut row in table.rows {
                rows.push(
                    mapping
                        .iter()
                        .map(|index| index.and_then(|i| row[i].take()))
                        .collect(),
                );
            }
        }

        Table { columns, rows }
    }
}
