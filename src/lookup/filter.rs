//! Criteria-to-filter translation.
//!
//! | Field     | Match                         |
//! |-----------|-------------------------------|
//! | Name      | prefix, case-insensitive      |
//! | StudentId | substring, case-insensitive   |
//! | RouteNo   | exact integer equality        |
//! | Address   | substring, case-insensitive   |
//! | Area      | prefix, case-insensitive      |
//!
//! A RouteNo that does not parse as an integer is kept as a condition that no
//! record satisfies, so the lookup returns nothing instead of failing.

use super::types::{Criteria, StudentRecord};

pub const ROUTE_NO_KEY: &str = "RouteNo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Prefix,
    Substring,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextField {
    Name,
    StudentId,
    Address,
    Area,
}

impl TextField {
    /// Document key of the field.
    pub fn key(&self) -> &'static str {
        match self {
            TextField::Name => "Name",
            TextField::StudentId => "StudentId",
            TextField::Address => "Address",
            TextField::Area => "Area",
        }
    }

    pub fn match_kind(&self) -> MatchKind {
        match self {
            TextField::Name | TextField::Area => MatchKind::Prefix,
            TextField::StudentId | TextField::Address => MatchKind::Substring,
        }
    }

    fn value<'a>(&self, record: &'a StudentRecord) -> &'a str {
        match self {
            TextField::Name => &record.name,
            TextField::StudentId => &record.student_id,
            TextField::Address => &record.address,
            TextField::Area => &record.area,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Text { field: TextField, needle: String },
    RouteNo(i64),
    /// RouteNo text that is not an integer. Matches nothing.
    InvalidRouteNo(String),
}

impl Condition {
    pub fn matches(&self, record: &StudentRecord) -> bool {
        match self {
            Condition::Text { field, needle } => {
                let haystack = field.value(record).to_lowercase();
                let needle = needle.to_lowercase();
                match field.match_kind() {
                    MatchKind::Prefix => haystack.starts_with(&needle),
                    MatchKind::Substring => haystack.contains(&needle),
                }
            }
            Condition::RouteNo(route) => record.route_no == Some(*route),
            Condition::InvalidRouteNo(_) => false,
        }
    }
}

/// Conjunction of per-field conditions. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<Condition>,
}

impl Filter {
    pub fn from_criteria(criteria: &Criteria) -> Self {
        let mut conditions = Vec::new();

        let text_fields = [
            (TextField::Name, &criteria.name),
            (TextField::StudentId, &criteria.student_id),
            (TextField::Address, &criteria.address),
            (TextField::Area, &criteria.area),
        ];
        for (field, value) in text_fields {
            if let Some(needle) = supplied(value) {
                conditions.push(Condition::Text {
                    field,
                    needle: needle.to_string(),
                });
            }
        }

        if let Some(raw) = supplied(&criteria.route_no) {
            let condition = match raw.trim().parse::<i64>() {
                Ok(route) => Condition::RouteNo(route),
                Err(_) => {
                    tracing::debug!("RouteNo {:?} is not an integer; no record can match", raw);
                    Condition::InvalidRouteNo(raw.to_string())
                }
            };
            conditions.push(condition);
        }

        Self { conditions }
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn matches(&self, record: &StudentRecord) -> bool {
        self.conditions.iter().all(|c| c.matches(record))
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
