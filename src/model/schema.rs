//! Column metadata and type information

use serde::{Deserialize, Serialize};

/// Kind of values a column holds once loaded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellType {
    #[default]
    Null,
    Bool,
    Int,
    Float,
    String,
    Date,
    DateTime,
    Time,
    /// Nested or binary values without a scalar representation
    Complex,
}

impl std::fmt::Display for CellType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellType::Null => write!(f, "null"),
            CellType::Bool => write!(f, "bool"),
            CellType::Int => write!(f, "int"),
            CellType::Float => write!(f, "float"),
            CellType::String => write!(f, "string"),
            CellType::Date => write!(f, "date"),
            CellType::DateTime => write!(f, "datetime"),
            CellType::Time => write!(f, "time"),
            CellType::Complex => write!(f, "complex"),
        }
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Column name as declared by the source schema
    pub name: String,
    /// Column index (0-based position)
    pub index: usize,
    /// Kind of cell values
    pub cell_type: CellType,
    /// Type name as declared by the source, e.g. `Int64` or `Utf8`
    pub data_type: String,
    /// Timezone of a timestamp column, if the source declares one
    pub timezone: Option<String>,
}

impl Column {
    /// Create a new column with name and index
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
            cell_type: CellType::Null,
            data_type: CellType::Null.to_string(),
            timezone: None,
        }
    }

    /// Create a column with a specified type
    pub fn with_type(
        name: impl Into<String>,
        index: usize,
        cell_type: CellType,
        data_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            index,
            cell_type,
            data_type: data_type.into(),
            timezone: None,
        }
    }

    /// Attach a timezone
    pub fn with_timezone(mut self, timezone: Option<String>) -> Self {
        self.timezone = timezone;
        self
    }

    pub(crate) fn heap_size(&self) -> usize {
        self.name.capacity()
            + self.data_type.capacity()
            + self.timezone.as_ref().map_or(0, String::capacity)
    }
}
