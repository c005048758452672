//! Model → entity resolution.
//!
//! The registry is built once from [`AdapterConfig`] and only read afterwards:
//! every model the adapter will ever serve is known at construction, and a
//! model outside that set is rejected instead of being guessed at query time.

use std::collections::BTreeMap;

use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable};

use crate::config::AdapterConfig;
use crate::entities::{account, session, user, verification};
use crate::errors::{AdapterError, AdapterResult};
use crate::repos::ID_COLUMN;

/// Models every authentication deployment has.
pub const CORE_MODELS: [&str; 4] = ["user", "session", "account", "verification"];

/// Bind class of a column, derived from its SeaORM column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Boolean,
    Integer,
    Float,
    Timestamp,
    Json,
}

impl ColumnKind {
    pub fn of(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::Boolean => ColumnKind::Boolean,
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => ColumnKind::Integer,
            ColumnType::Float | ColumnType::Double | ColumnType::Decimal(_) => ColumnKind::Float,
            ColumnType::DateTime | ColumnType::Timestamp | ColumnType::TimestampWithTimeZone => {
                ColumnKind::Timestamp
            }
            ColumnType::Json | ColumnType::JsonBinary => ColumnKind::Json,
            _ => ColumnKind::Text,
        }
    }
}

/// The concrete table a model resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityTarget {
    table: String,
    columns: Option<Vec<(String, ColumnKind)>>,
}

impl EntityTarget {
    /// Target a table by name; its columns are not known up front.
    pub fn table(name: impl Into<String>) -> Self {
        Self {
            table: name.into(),
            columns: None,
        }
    }

    /// Target the table of a SeaORM entity, recording its columns and their types.
    pub fn from_entity<E: EntityTrait>() -> Self {
        Self {
            table: E::default().table_name().to_string(),
            columns: Some(
                E::Column::iter()
                    .map(|column| {
                        let kind = ColumnKind::of(column.def().get_column_type());
                        (column.as_str().to_string(), kind)
                    })
                    .collect(),
            ),
        }
    }

    /// Declare the column set of a table target.
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = (S, ColumnKind)>,
        S: Into<String>,
    {
        self.columns = Some(
            columns
                .into_iter()
                .map(|(name, kind)| (name.into(), kind))
                .collect(),
        );
        self
    }

    /// Same columns, different table.
    pub fn with_table_name(mut self, name: impl Into<String>) -> Self {
        self.table = name.into();
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn has_known_columns(&self) -> bool {
        self.columns.is_some()
    }

    pub fn column_kind(&self, column: &str) -> Option<ColumnKind> {
        self.columns
            .as_ref()?
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, kind)| *kind)
    }

    /// Whether the table has `column`. Without a known column set only `id`
    /// is assumed.
    pub fn owns_column(&self, column: &str) -> bool {
        match &self.columns {
            Some(columns) => columns.iter().any(|(name, _)| name == column),
            None => column == ID_COLUMN,
        }
    }
}

pub fn default_table_name(model: &str, use_plural: bool) -> String {
    if use_plural {
        format!("{model}s")
    } else {
        model.to_string()
    }
}

/// Default target of `model`: core models carry the shipped entity's columns.
fn default_target(model: &str, use_plural: bool) -> EntityTarget {
    let table = default_table_name(model, use_plural);
    let shipped = match model {
        "user" => EntityTarget::from_entity::<user::Entity>(),
        "session" => EntityTarget::from_entity::<session::Entity>(),
        "account" => EntityTarget::from_entity::<account::Entity>(),
        "verification" => EntityTarget::from_entity::<verification::Entity>(),
        _ => return EntityTarget::table(table),
    };
    shipped.with_table_name(table)
}

#[derive(Debug, Clone)]
pub struct ModelRegistry {
    targets: BTreeMap<String, EntityTarget>,
}

impl ModelRegistry {
    pub fn from_config(config: &AdapterConfig) -> AdapterResult<Self> {
        let mut targets = BTreeMap::new();

        let models = CORE_MODELS
            .iter()
            .map(|m| m.to_string())
            .chain(config.models.iter().cloned());
        for model in models {
            if model.trim().is_empty() {
                return Err(AdapterError::config("model names must not be empty"));
            }
            let target = default_target(&model, config.use_plural);
            targets.insert(model, target);
        }

        for (model, target) in &config.entities {
            let Some(slot) = targets.get_mut(model) else {
                return Err(AdapterError::config(format!(
                    "entity override for unregistered model '{model}'"
                )));
            };
            *slot = target.clone();
        }

        Ok(Self { targets })
    }

    pub fn resolve(&self, model: &str) -> AdapterResult<&EntityTarget> {
        self.targets
            .get(model)
            .ok_or_else(|| AdapterError::unknown_model(model))
    }

    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.targets.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_map_model_to_same_named_table() {
        let registry = ModelRegistry::from_config(&AdapterConfig::default()).unwrap();
        assert_eq!(registry.resolve("user").unwrap().table_name(), "user");
        assert_eq!(
            registry.models().collect::<Vec<_>>(),
            vec!["account", "session", "user", "verification"]
        );
    }

    #[test]
    fn core_models_know_their_columns() {
        let registry = ModelRegistry::from_config(&AdapterConfig::default()).unwrap();
        let account = registry.resolve("account").unwrap();
        assert!(account.has_known_columns());
        assert_eq!(
            account.column_kind("accessTokenExpiresAt"),
            Some(ColumnKind::Timestamp)
        );
        assert_eq!(account.column_kind("scope"), Some(ColumnKind::Text));
        assert!(account.owns_column("createdAt"));
    }

    #[test]
    fn plural_tables() {
        let config = AdapterConfig::default().with_use_plural(true);
        let registry = ModelRegistry::from_config(&config).unwrap();
        let sessions = registry.resolve("session").unwrap();
        assert_eq!(sessions.table_name(), "sessions");
        assert!(sessions.owns_column("updatedAt"));
    }

    #[test]
    fn unknown_models_are_rejected() {
        let registry = ModelRegistry::from_config(&AdapterConfig::default()).unwrap();
        let err = registry.resolve("passkey").unwrap_err();
        assert!(matches!(err, AdapterError::UnknownModel { ref model } if model == "passkey"));
    }

    #[test]
    fn extra_models_can_be_registered() {
        let config = AdapterConfig::default().with_model("twoFactor");
        let registry = ModelRegistry::from_config(&config).unwrap();
        let target = registry.resolve("twoFactor").unwrap();
        assert_eq!(target.table_name(), "twoFactor");
        assert!(!target.has_known_columns());
    }

    #[test]
    fn override_for_unregistered_model_is_a_config_error() {
        let config = AdapterConfig::default().with_entity("passkey", EntityTarget::table("passkeys"));
        let err = ModelRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, AdapterError::Config { .. }));
    }

    #[test]
    fn entity_override_carries_columns() {
        let config = AdapterConfig::default()
            .with_use_plural(true)
            .with_entity("session", EntityTarget::from_entity::<session::Entity>());
        let registry = ModelRegistry::from_config(&config).unwrap();

        let target = registry.resolve("session").unwrap();
        assert_eq!(target.table_name(), "session");
        assert!(target.owns_column("expiresAt"));
        assert!(target.owns_column("userId"));
        assert!(!target.owns_column("emailVerified"));
    }

    #[test]
    fn table_targets_only_assume_an_id() {
        let target = EntityTarget::table("twoFactor");
        assert!(target.owns_column("id"));
        assert!(!target.owns_column("createdAt"));
        assert!(!target.owns_column("updatedAt"));
        assert_eq!(target.column_kind("id"), None);
    }

    #[test]
    fn declared_columns_drive_ownership() {
        let target = EntityTarget::table("passkey").with_columns([
            ("id", ColumnKind::Text),
            ("createdAt", ColumnKind::Timestamp),
        ]);
        assert!(target.owns_column("createdAt"));
        assert!(!target.owns_column("updatedAt"));
        assert_eq!(target.column_kind("createdAt"), Some(ColumnKind::Timestamp));
    }
}
