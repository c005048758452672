//! Declarative auth schema and the SeaORM entity emitter.
//!
//! The schema input uses the framework's JSON shape:
//!
//! ```json
//! { "tables": { "user": { "fields": { "email": { "type": "string", "required": true } } } } }
//! ```
//!
//! Table and field order is preserved from the input so the emitted files are
//! stable across runs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{AdapterError, AdapterResult};

pub mod emit;
pub mod writer;

pub use emit::{generate, render_entity, render_mod, GeneratedFile};
pub use writer::{write_entities, DEFAULT_OUTPUT_DIR};

/// Semantic type of a field. Anything unrecognized is treated as a string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Boolean,
    Number,
    Date,
}

impl From<String> for FieldType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "boolean" => FieldType::Boolean,
            "number" => FieldType::Number,
            "date" | "Date" => FieldType::Date,
            _ => FieldType::String,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSchema {
    #[serde(skip)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            required: false,
            is_optional: false,
            default_value: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.is_optional = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Emitted as `Option<T>`.
    pub fn is_nullable(&self) -> bool {
        !self.required || self.is_optional
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: String,
    pub fields: Vec<FieldSchema>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSchema {
    pub tables: Vec<TableSchema>,
}

impl AuthSchema {
    pub fn new(tables: Vec<TableSchema>) -> Self {
        Self { tables }
    }

    pub fn table(&self, name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// The four core tables every deployment needs.
    pub fn core() -> Self {
        let id = || FieldSchema::new("id", FieldType::String).required();
        let created = || FieldSchema::new("createdAt", FieldType::Date).required();
        let updated = || FieldSchema::new("updatedAt", FieldType::Date).required();

        Self::new(vec![
            TableSchema::new(
                "user",
                vec![
                    id(),
                    FieldSchema::new("name", FieldType::String).required(),
                    FieldSchema::new("email", FieldType::String).required(),
                    FieldSchema::new("emailVerified", FieldType::Boolean)
                        .required()
                        .default_value(false),
                    FieldSchema::new("image", FieldType::String).optional(),
                    created(),
                    updated(),
                ],
            ),
            TableSchema::new(
                "session",
                vec![
                    id(),
                    FieldSchema::new("userId", FieldType::String).required(),
                    FieldSchema::new("token", FieldType::String).required(),
                    FieldSchema::new("expiresAt", FieldType::Date).required(),
                    FieldSchema::new("ipAddress", FieldType::String).optional(),
                    FieldSchema::new("userAgent", FieldType::String).optional(),
                    created(),
                    updated(),
                ],
            ),
            TableSchema::new(
                "account",
                vec![
                    id(),
                    FieldSchema::new("userId", FieldType::String).required(),
                    FieldSchema::new("accountId", FieldType::String).required(),
                    FieldSchema::new("providerId", FieldType::String).required(),
                    FieldSchema::new("accessToken", FieldType::String).optional(),
                    FieldSchema::new("refreshToken", FieldType::String).optional(),
                    FieldSchema::new("accessTokenExpiresAt", FieldType::Date).optional(),
                    FieldSchema::new("refreshTokenExpiresAt", FieldType::Date).optional(),
                    FieldSchema::new("scope", FieldType::String).optional(),
                    FieldSchema::new("idToken", FieldType::String).optional(),
                    FieldSchema::new("password", FieldType::String).optional(),
                    created(),
                    updated(),
                ],
            ),
            TableSchema::new(
                "verification",
                vec![
                    id(),
                    FieldSchema::new("identifier", FieldType::String).required(),
                    FieldSchema::new("value", FieldType::String).required(),
                    FieldSchema::new("expiresAt", FieldType::Date).required(),
                    created(),
                    updated(),
                ],
            ),
        ])
    }

    /// Same schema with every table name pluralized (`user` ⇒ `users`).
    pub fn pluralized(mut self) -> Self {
        for table in &mut self.tables {
            table.name = crate::registry::default_table_name(&table.name, true);
        }
        self
    }

    pub fn from_json_str(raw: &str) -> AdapterResult<Self> {
        let value: Value = serde_json::from_str(raw)
            .map_err(|e| AdapterError::schema(format!("invalid schema JSON: {e}")))?;
        Self::from_json(&value)
    }

    pub fn from_json(value: &Value) -> AdapterResult<Self> {
        let tables = value
            .get("tables")
            .and_then(Value::as_object)
            .ok_or_else(|| AdapterError::schema("schema must have a `tables` object"))?;

        let mut schema = AuthSchema::default();
        for (table_name, table) in tables {
            let fields = table
                .get("fields")
                .and_then(Value::as_object)
                .map(|fields| parse_fields(table_name, fields))
                .transpose()?
                .unwrap_or_default();
            schema.tables.push(TableSchema::new(table_name.clone(), fields));
        }
        Ok(schema)
    }
}

fn parse_fields(table: &str, fields: &Map<String, Value>) -> AdapterResult<Vec<FieldSchema>> {
    fields
        .iter()
        .map(|(name, raw)| {
            let mut field: FieldSchema = serde_json::from_value(raw.clone()).map_err(|e| {
                AdapterError::schema(format!("field {table}.{name}: {e}"))
            })?;
            field.name = name.clone();
            Ok(field)
        })
        .collect()
}
