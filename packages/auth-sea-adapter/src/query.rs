//! Predicate chains for `findOne` / `findMany`.
//!
//! A [`SelectQuery`] is the backend-neutral description a repository turns
//! into a statement: equality predicates over a fixed alias, with the first
//! predicate opening the `WHERE` and the rest conjoined, each bound to its own
//! parameter name.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::filter::{Filter, WhereMap};

/// Alias every query builder selects the entity under.
pub const QUERY_ALIAS: &str = "entity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub field: String,
    pub direction: SortDirection,
}

impl SortBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Arguments of `findMany`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindManyQuery {
    #[serde(rename = "where", skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
}

impl FindManyQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: impl Into<Filter>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn sort_by(mut self, sort: SortBy) -> Self {
        self.sort_by = Some(sort);
        self
    }

    pub fn select<S: Into<String>>(mut self, fields: impl IntoIterator<Item = S>) -> Self {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// Position of a predicate in the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    Where,
    AndWhere,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub clause: Clause,
    pub column: String,
    pub param: String,
    pub value: Value,
}

impl Predicate {
    /// `entity.<column> = :<param>`
    pub fn expression(&self) -> String {
        format!("{QUERY_ALIAS}.{} = :{}", self.column, self.param)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    predicates: Vec<Predicate>,
    select: Vec<String>,
    order_by: Option<SortBy>,
    limit: Option<u64>,
    offset: Option<u64>,
}

impl Default for SelectQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectQuery {
    pub fn new() -> Self {
        Self {
            predicates: Vec::new(),
            select: Vec::new(),
            order_by: None,
            limit: None,
            offset: None,
        }
    }

    /// Chain one equality predicate per criterion, in criterion order.
    pub fn filter(mut self, criteria: &WhereMap) -> Self {
        for (field, value) in criteria.iter() {
            let index = self.predicates.len();
            let clause = if index == 0 {
                Clause::Where
            } else {
                Clause::AndWhere
            };
            self.predicates.push(Predicate {
                clause,
                column: field.to_string(),
                param: format!("param{index}"),
                value: value.clone(),
            });
        }
        self
    }

    /// Restrict returned columns; an empty list keeps every column.
    pub fn select<S: AsRef<str>>(mut self, fields: &[S]) -> Self {
        self.select = fields.iter().map(|f| f.as_ref().to_string()).collect();
        self
    }

    pub fn order_by(mut self, sort: SortBy) -> Self {
        self.order_by = Some(sort);
        self
    }

    /// Zero means "no limit".
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = (limit > 0).then_some(limit);
        self
    }

    /// Zero means "no offset".
    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = (offset > 0).then_some(offset);
        self
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn selected(&self) -> &[String] {
        &self.select
    }

    pub fn sort(&self) -> Option<&SortBy> {
        self.order_by.as_ref()
    }

    pub fn row_limit(&self) -> Option<u64> {
        self.limit
    }

    pub fn row_offset(&self) -> Option<u64> {
        self.offset
    }

    /// The equality criteria the predicates encode.
    pub fn criteria(&self) -> WhereMap {
        self.predicates
            .iter()
            .map(|p| (p.column.clone(), p.value.clone()))
            .collect()
    }

    /// Readable rendering for logs: `WHERE entity.a = :param0 AND entity.b = :param1 ...`
    pub fn describe(&self) -> String {
        let mut out = String::new();
        for predicate in &self.predicates {
            let keyword = match predicate.clause {
                Clause::Where => "WHERE",
                Clause::AndWhere => " AND",
            };
            out.push_str(keyword);
            out.push(' ');
            out.push_str(&predicate.expression());
        }
        if let Some(sort) = &self.order_by {
            out.push_str(&format!(
                " ORDER BY {QUERY_ALIAS}.{} {}",
                sort.field,
                sort.direction.as_sql()
            ));
        }
        if let Some(limit) = self.limit {
            out.push_str(&format!(" LIMIT {limit}"));
        }
        if let Some(offset) = self.offset {
            out.push_str(&format!(" OFFSET {offset}"));
        }
        out.trim_start().to_string()
    }
}
