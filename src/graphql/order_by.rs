//! Sort specifications (`createdAt:DESC`).

use crate::domain::ValidationError;
use serde_json::{json, Value};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Twenty's direction enum; nulls sort last when descending.
    pub fn as_twenty(&self) -> &'static str {
        match self {
            Self::Asc => "AscNullsFirst",
            Self::Desc => "DescNullsLast",
        }
    }
}

/// A single-field ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }

    /// `[{ field: Direction }]`, the GraphQL `orderBy` variable.
    pub fn to_graphql(&self) -> Value {
        json!([{ self.field.as_str(): self.direction.as_twenty() }])
    }

    /// `field[Direction]`, the REST `order_by` parameter.
    pub fn to_rest(&self) -> String {
        format!("{}[{}]", self.field, self.direction.as_twenty())
    }
}

impl FromStr for OrderBy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = match s.split_once(':') {
            Some((field, direction)) => (field.trim(), direction.trim()),
            None => (s.trim(), "ASC"),
        };
        if field.is_empty() {
            return Err(ValidationError::InvalidParameters(format!(
                "orderBy needs a field name: \"{}\"",
                s
            )));
        }
        let direction = match direction.to_ascii_uppercase().as_str() {
            "ASC" => Direction::Asc,
            "DESC" => Direction::Desc,
            other => {
                return Err(ValidationError::InvalidParameters(format!(
                    "orderBy direction must be ASC or DESC, got \"{}\"",
                    other
                )))
            }
        };
        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}
