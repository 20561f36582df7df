//! Filter conditions, sorting and pagination for list endpoints

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter operator codes understood by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterOp {
    #[serde(rename = "ns")]
    NotSet,
    #[serde(rename = "eq")]
    Equal,
    #[serde(rename = "ne")]
    NotEqual,
    #[serde(rename = "c")]
    Contains,
    #[serde(rename = "nc")]
    NotContains,
    #[serde(rename = "r")]
    Regex,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "nin")]
    NotIn,
    #[serde(rename = "gt")]
    GreaterThan,
    #[serde(rename = "gte")]
    GreaterThanEqual,
    #[serde(rename = "lt")]
    LessThan,
    #[serde(rename = "lte")]
    LessThanEqual,
    #[serde(rename = "s")]
    Search,
}

/// Single filter predicate; a list of them is AND-combined by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub key: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Condition {
    pub fn new(key: impl Into<String>, op: FilterOp, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            op,
            value: value.into(),
        }
    }

    pub fn equal(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(key, FilterOp::Equal, value)
    }

    pub fn contains(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(key, FilterOp::Contains, value.into())
    }

    /// Conditions with an unset operator or an empty value are dropped before sending
    pub fn is_effective(&self) -> bool {
        if self.op == FilterOp::NotSet {
            return false;
        }
        match &self.value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            Value::Array(a) => !a.is_empty(),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub key: String,
    #[serde(rename = "d")]
    pub direction: SortDirection,
}

impl Sort {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }
}

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Server-side pagination (page is 1-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub size: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Query parameters of a list request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListParams {
    pub pagination: Pagination,
    pub conditions: Vec<Condition>,
    pub sort: Vec<Sort>,
    /// Ask for the whole collection, ignoring pagination
    pub all: bool,
}

impl ListParams {
    pub fn page(pagination: Pagination) -> Self {
        Self {
            pagination,
            ..Default::default()
        }
    }

    pub fn all() -> Self {
        Self {
            all: true,
            ..Default::default()
        }
    }

    /// Flatten into query pairs; conditions and sort travel as JSON strings
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if self.all {
            pairs.push(("all".to_string(), "true".to_string()));
        } else {
            pairs.push(("page".to_string(), self.pagination.page.to_string()));
            pairs.push(("size".to_string(), self.pagination.size.to_string()));
        }

        let conditions: Vec<&Condition> =
            self.conditions.iter().filter(|c| c.is_effective()).collect();
        if !conditions.is_empty() {
            let json = serde_json::to_string(&conditions).unwrap_or_default();
            pairs.push(("conditions".to_string(), json));
        }
        if !self.sort.is_empty() {
            let json = serde_json::to_string(&self.sort).unwrap_or_default();
            pairs.push(("sort".to_string(), json));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs_paginated() {
        let params = ListParams {
            pagination: Pagination { page: 2, size: 20 },
            conditions: vec![
                Condition::contains("name", "quotes"),
                Condition::contains("description", ""),
            ],
            sort: vec![Sort::desc("created_ts")],
            all: false,
        };
        let pairs = params.to_query_pairs();

        assert_eq!(pairs[0], ("page".to_string(), "2".to_string()));
        assert_eq!(pairs[1], ("size".to_string(), "20".to_string()));
        assert_eq!(
            pairs[2],
            (
                "conditions".to_string(),
                r#"[{"key":"name","op":"c","value":"quotes"}]"#.to_string()
            )
        );
        assert_eq!(
            pairs[3],
            ("sort".to_string(), r#"[{"key":"created_ts","d":"desc"}]"#.to_string())
        );
    }

    #[test]
    fn test_query_pairs_all() {
        let pairs = ListParams::all().to_query_pairs();
        assert_eq!(pairs, vec![("all".to_string(), "true".to_string())]);
    }

    #[test]
    fn test_condition_effectiveness() {
        assert!(Condition::equal("status", "running").is_effective());
        assert!(!Condition::new("status", FilterOp::NotSet, "running").is_effective());
        assert!(!Condition::new("node_id", FilterOp::In, Value::Array(vec![])).is_effective());
        assert!(Condition::new("priority", FilterOp::GreaterThan, 5).is_effective());
    }
}
