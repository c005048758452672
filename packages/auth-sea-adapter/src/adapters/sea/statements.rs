//! sea-query statement builders for dynamically named tables.
//!
//! Table and column names come from the model registry and the caller's
//! records, so everything goes through `Alias` rather than `Iden` enums.

use sea_orm::sea_query::{
    Alias, Asterisk, DeleteStatement, Expr, InsertStatement, Order, Query, SelectStatement,
    SimpleExpr, UpdateStatement, Value as SeaValue,
};
use sea_orm::{DbBackend, DbErr};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::filter::WhereMap;
use crate::query::{SelectQuery, SortDirection, QUERY_ALIAS};
use crate::registry::{ColumnKind, EntityTarget};
use crate::repos::Record;

/// Convert a JSON value into a bindable value for a column of `kind`.
///
/// Postgres is strict about parameter types. A known column kind decides the
/// bind type there, nulls included. For columns of unknown kind, RFC 3339
/// strings are bound as `timestamptz`. Other backends store strings as text.
pub fn json_to_value(backend: DbBackend, kind: Option<ColumnKind>, value: &Value) -> SeaValue {
    match value {
        Value::Null => typed_null(kind),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else if let Some(f) = n.as_f64() {
                f.into()
            } else {
                n.to_string().into()
            }
        }
        Value::String(s) => {
            let timestamp_column = matches!(kind, None | Some(ColumnKind::Timestamp));
            if backend == DbBackend::Postgres && timestamp_column {
                if let Ok(at) = OffsetDateTime::parse(s, &Rfc3339) {
                    return at.into();
                }
            }
            s.clone().into()
        }
        Value::Array(_) | Value::Object(_) => value.clone().into(),
    }
}

fn typed_null(kind: Option<ColumnKind>) -> SeaValue {
    match kind {
        Some(ColumnKind::Boolean) => SeaValue::Bool(None),
        Some(ColumnKind::Integer) => SeaValue::BigInt(None),
        Some(ColumnKind::Float) => SeaValue::Double(None),
        Some(ColumnKind::Timestamp) => SeaValue::TimeDateTimeWithTimeZone(None),
        Some(ColumnKind::Json) => SeaValue::Json(None),
        Some(ColumnKind::Text) | None => SeaValue::String(None),
    }
}

fn bind(backend: DbBackend, target: &EntityTarget, column: &str, value: &Value) -> SimpleExpr {
    SimpleExpr::Value(json_to_value(backend, target.column_kind(column), value))
}

fn column_eq(
    backend: DbBackend,
    target: &EntityTarget,
    column: Expr,
    name: &str,
    value: &Value,
) -> SimpleExpr {
    if value.is_null() {
        column.is_null()
    } else {
        column.eq(bind(backend, target, name, value))
    }
}

/// `SELECT ... FROM <table> AS entity WHERE ... [ORDER BY] [LIMIT] [OFFSET]`
pub fn select(backend: DbBackend, target: &EntityTarget, query: &SelectQuery) -> SelectStatement {
    let alias = Alias::new(QUERY_ALIAS);
    let mut stmt = Query::select();
    stmt.from_as(Alias::new(target.table_name()), alias.clone());

    if query.selected().is_empty() {
        stmt.column(Asterisk);
    } else {
        for field in query.selected() {
            stmt.column((alias.clone(), Alias::new(field.as_str())));
        }
    }

    for predicate in query.predicates() {
        let name = predicate.column.as_str();
        let column = Expr::col((alias.clone(), Alias::new(name)));
        stmt.and_where(column_eq(backend, target, column, name, &predicate.value));
    }

    if let Some(sort) = query.sort() {
        let order = match sort.direction {
            SortDirection::Asc => Order::Asc,
            SortDirection::Desc => Order::Desc,
        };
        stmt.order_by((alias.clone(), Alias::new(sort.field.as_str())), order);
    }
    if let Some(limit) = query.row_limit() {
        stmt.limit(limit);
    }
    if let Some(offset) = query.row_offset() {
        stmt.offset(offset);
    }
    stmt
}

pub fn insert(
    backend: DbBackend,
    target: &EntityTarget,
    data: &Record,
) -> Result<InsertStatement, DbErr> {
    let table = target.table_name();
    let mut stmt = Query::insert();
    stmt.into_table(Alias::new(table))
        .columns(data.keys().map(|k| Alias::new(k.as_str())));
    stmt.values(data.iter().map(|(k, v)| bind(backend, target, k, v)))
        .map_err(|e| DbErr::Custom(format!("invalid insert into {table}: {e}")))?;
    Ok(stmt)
}

pub fn update(
    backend: DbBackend,
    target: &EntityTarget,
    criteria: &WhereMap,
    changes: &Record,
) -> Result<UpdateStatement, DbErr> {
    if changes.is_empty() {
        return Err(DbErr::Custom("update requires at least one value".into()));
    }
    let mut stmt = Query::update();
    stmt.table(Alias::new(target.table_name())).values(
        changes
            .iter()
            .map(|(k, v)| (Alias::new(k.as_str()), bind(backend, target, k, v))),
    );
    for (field, value) in criteria.iter() {
        stmt.and_where(column_eq(backend, target, Expr::col(Alias::new(field)), field, value));
    }
    Ok(stmt)
}

pub fn delete(backend: DbBackend, target: &EntityTarget, criteria: &WhereMap) -> DeleteStatement {
    let mut stmt = Query::delete();
    stmt.from_table(Alias::new(target.table_name()));
    for (field, value) in criteria.iter() {
        stmt.and_where(column_eq(backend, target, Expr::col(Alias::new(field)), field, value));
    }
    stmt
}

/// `SELECT COUNT(*) AS count FROM <table> WHERE ...`
pub fn count(backend: DbBackend, target: &EntityTarget, criteria: &WhereMap) -> SelectStatement {
    let mut stmt = Query::select();
    stmt.expr_as(Expr::col(Asterisk).count(), Alias::new(COUNT_COLUMN))
        .from(Alias::new(target.table_name()));
    for (field, value) in criteria.iter() {
        stmt.and_where(column_eq(backend, target, Expr::col(Alias::new(field)), field, value));
    }
    stmt
}

pub const COUNT_COLUMN: &str = "count";
