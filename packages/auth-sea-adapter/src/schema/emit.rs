//! Text generation for SeaORM entity modules.
//!
//! Pure functions: the same schema always yields byte-identical output.

use convert_case::{Case, Casing};

use super::{AuthSchema, FieldSchema, FieldType, TableSchema};
use crate::repos::{CREATED_AT_COLUMN, ID_COLUMN, UPDATED_AT_COLUMN};

/// `*Id` fields that reference external identifiers rather than another table.
const NON_RELATION_IDS: [&str; 2] = ["accountId", "providerId"];

const TEXT_FIELDS: [&str; 5] = ["token", "accessToken", "refreshToken", "idToken", "userAgent"];

const UNIQUE_FIELDS: [&str; 2] = ["email", "token"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub name: String,
    pub contents: String,
}

/// Module name a table is emitted under.
pub fn module_name(table: &str) -> String {
    table.to_case(Case::Snake)
}

/// One entity file per table, followed by the aggregate `mod.rs`.
pub fn generate(schema: &AuthSchema) -> Vec<GeneratedFile> {
    let mut files: Vec<GeneratedFile> = schema
        .tables
        .iter()
        .map(|table| GeneratedFile {
            name: format!("{}.rs", module_name(&table.name)),
            contents: render_entity(schema, table),
        })
        .collect();
    files.push(GeneratedFile {
        name: "mod.rs".to_string(),
        contents: render_mod(schema),
    });
    files
}

struct BelongsTo {
    variant: String,
    module: String,
    column_variant: String,
}

/// `userId` ⇒ relation to `user`, unless the field is an external id.
fn relation_for(schema: &AuthSchema, field: &str) -> Option<BelongsTo> {
    let prefix = field.strip_suffix("Id")?;
    if prefix.is_empty() || NON_RELATION_IDS.contains(&field) {
        return None;
    }
    // Follow a pluralized schema to the table that actually exists.
    let plural = format!("{prefix}s");
    let target = if schema.table(prefix).is_none() && schema.table(&plural).is_some() {
        plural
    } else {
        prefix.to_string()
    };
    Some(BelongsTo {
        variant: prefix.to_case(Case::Pascal),
        module: module_name(&target),
        column_variant: field.to_case(Case::Pascal),
    })
}

fn is_generated(field: &str) -> bool {
    field == ID_COLUMN || field == CREATED_AT_COLUMN || field == UPDATED_AT_COLUMN
}

fn rust_type(field: &FieldSchema) -> &'static str {
    match field.field_type {
        FieldType::String => "String",
        FieldType::Boolean => "bool",
        FieldType::Number => "i32",
        FieldType::Date => "OffsetDateTime",
    }
}

fn column_type(field: &FieldSchema) -> Option<&'static str> {
    if field.field_type != FieldType::String {
        return None;
    }
    if TEXT_FIELDS.contains(&field.name.as_str()) {
        Some("Text")
    } else if field.name.contains("Token") {
        None
    } else {
        Some("String(StringLen::N(255))")
    }
}

fn attribute(parts: &[String]) -> String {
    if parts.is_empty() {
        String::new()
    } else {
        format!("    #[sea_orm({})]\n", parts.join(", "))
    }
}

fn render_field(schema: &AuthSchema, field: &FieldSchema) -> String {
    let rust_name = field.name.to_case(Case::Snake);
    let mut parts = Vec::new();
    if rust_name != field.name {
        parts.push(format!("column_name = \"{}\"", field.name));
    }

    if field.name == ID_COLUMN {
        return format!(
            "    #[sea_orm(primary_key, auto_increment = false)]\n    pub {rust_name}: String,\n"
        );
    }
    if field.name == CREATED_AT_COLUMN || field.name == UPDATED_AT_COLUMN {
        return format!("{}    pub {rust_name}: OffsetDateTime,\n", attribute(&parts));
    }
    if relation_for(schema, &field.name).is_some() {
        return format!("{}    pub {rust_name}: String,\n", attribute(&parts));
    }

    if let Some(column_type) = column_type(field) {
        parts.push(format!("column_type = \"{column_type}\""));
    }
    if UNIQUE_FIELDS.contains(&field.name.as_str()) {
        parts.push("unique".to_string());
    }
    if field.is_nullable() {
        parts.push("nullable".to_string());
    }
    if field.field_type == FieldType::Boolean {
        if let Some(default) = &field.default_value {
            parts.push(format!("default_value = {default}"));
        }
    }

    let ty = rust_type(field);
    let ty = if field.is_nullable() {
        format!("Option<{ty}>")
    } else {
        ty.to_string()
    };
    format!("{}    pub {rust_name}: {ty},\n", attribute(&parts))
}

pub fn render_entity(schema: &AuthSchema, table: &TableSchema) -> String {
    let relations: Vec<BelongsTo> = table
        .fields
        .iter()
        .filter(|f| !is_generated(&f.name))
        .filter_map(|f| relation_for(schema, &f.name))
        .collect();
    let uses_time = table
        .fields
        .iter()
        .any(|f| f.name == CREATED_AT_COLUMN || f.name == UPDATED_AT_COLUMN || f.field_type == FieldType::Date);

    let mut out = String::new();
    out.push_str(&format!(
        "//! `{}` entity, generated by auth-entity-gen.\n\n",
        table.name.to_case(Case::Pascal)
    ));
    out.push_str("use sea_orm::entity::prelude::*;\n");
    out.push_str("use serde::{Deserialize, Serialize};\n");
    if uses_time {
        out.push_str("use time::OffsetDateTime;\n");
    }
    out.push('\n');

    out.push_str("#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]\n");
    out.push_str(&format!("#[sea_orm(table_name = \"{}\")]\n", table.name));
    out.push_str("pub struct Model {\n");
    for field in &table.fields {
        out.push_str(&render_field(schema, field));
    }
    out.push_str("}\n\n");

    out.push_str("#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]\n");
    if relations.is_empty() {
        out.push_str("pub enum Relation {}\n");
    } else {
        out.push_str("pub enum Relation {\n");
        for rel in &relations {
            out.push_str(&format!(
                "    #[sea_orm(\n        belongs_to = \"super::{m}::Entity\",\n        from = \"Column::{c}\",\n        to = \"super::{m}::Column::Id\",\n        on_delete = \"Cascade\"\n    )]\n    {v},\n",
                m = rel.module,
                c = rel.column_variant,
                v = rel.variant,
            ));
        }
        out.push_str("}\n");
        for rel in &relations {
            out.push_str(&format!(
                "\nimpl Related<super::{m}::Entity> for Entity {{\n    fn to() -> RelationDef {{\n        Relation::{v}.def()\n    }}\n}}\n",
                m = rel.module,
                v = rel.variant,
            ));
        }
    }

    out.push_str("\nimpl ActiveModelBehavior for ActiveModel {}\n");
    out
}

/// Aggregate module: `pub mod <table>;` then one `Entity` re-export per table.
pub fn render_mod(schema: &AuthSchema) -> String {
    let mut out = String::from("//! Entities generated by auth-entity-gen.\n\n");
    for table in &schema.tables {
        out.push_str(&format!("pub mod {};\n", module_name(&table.name)));
    }
    out.push('\n');
    for table in &schema.tables {
        out.push_str(&format!(
            "pub use {}::Entity as {};\n",
            module_name(&table.name),
            table.name.to_case(Case::Pascal)
        ));
    }
    out
}
