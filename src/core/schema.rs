use std::collections::HashMap;
use thiserror::Error;

/// Errors raised while building a feature schema from its artifact
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("Feature schema is empty")]
    Empty,

    #[error("Duplicate feature column: {0}")]
    DuplicateColumn(String),
}

/// Ordered set of feature columns the model was trained on
///
/// Column order is fixed at construction and defines the layout of every
/// encoded feature vector. The reserved target column is never part of it.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from training column names, dropping `target_column`
    pub fn new<I, S>(names: I, target_column: Option<&str>) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = Vec::new();
        let mut index = HashMap::new();

        for name in names {
            let name = name.into();
            if target_column == Some(name.as_str()) {
                continue;
            }
            if index.contains_key(&name) {
                return Err(SchemaError::DuplicateColumn(name));
            }
            index.insert(name.clone(), columns.len());
            columns.push(name);
        }

        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        Ok(Self { columns, index })
    }

    /// Position of a column, if the model knows it
    #[inline]
    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    #[inline]
    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
