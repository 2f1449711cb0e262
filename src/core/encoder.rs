use crate::core::schema::FeatureSchema;
use crate::models::RentInput;

/// A categorical field whose value has no indicator column in the schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmatchedCategory {
    pub field: &'static str,
    pub value: String,
}

/// Numeric feature vector laid out in schema column order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector<'a> {
    schema: &'a FeatureSchema,
    values: Vec<f64>,
    unmatched: Vec<UnmatchedCategory>,
}

impl<'a> FeatureVector<'a> {
    /// Value of a named column, `None` if the schema has no such column
    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(column, value)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }

    /// Categorical fields that encoded to an all-zero indicator block
    pub fn unmatched(&self) -> &[UnmatchedCategory] {
        &self.unmatched
    }

    pub fn into_values(self) -> Vec<f64> {
        self.values
    }
}

/// Indicator column name for a categorical field value
#[inline]
pub fn indicator_column(field: &str, value: &str) -> String {
    format!("{}_{}", field, value)
}

/// Encode a request into the schema's feature layout
///
/// Every column starts at 0. Numeric fields are copied into the column of the
/// same name when the schema has one. Each categorical field sets its
/// `{field}_{value}` indicator to 1 when that column exists; a value the model
/// never saw leaves the whole block at 0 and is recorded as unmatched.
pub fn encode<'a>(schema: &'a FeatureSchema, input: &RentInput) -> FeatureVector<'a> {
    let mut values = vec![0.0; schema.len()];
    let mut unmatched = Vec::new();

    for (column, value) in input.numeric_features() {
        if let Some(i) = schema.position(column) {
            values[i] = value;
        }
    }

    for (field, value) in input.categorical_features() {
        match schema.position(&indicator_column(field, value)) {
            Some(i) => values[i] = 1.0,
            None => unmatched.push(UnmatchedCategory {
                field,
                value: value.to_string(),
            }),
        }
    }

    FeatureVector {
        schema,
        values,
        unmatched,
    }
}
