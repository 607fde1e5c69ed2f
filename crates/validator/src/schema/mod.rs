//! Constraint metadata attached to record types
//!
//! A [`Schema`] lists the constrained fields of one record type, each with
//! its declared [`FieldKind`] and an ordered, non-empty list of
//! [`Constraint`]s. Schemas are immutable once built and are shared by every
//! instance of the type.
//!
//! Schemas can be built in code:
//!
//! ```rust,ignore
//! use palisade_validator::schema::{Constraint, Schema, SizeRule};
//! use palisade_validator::foundation::FieldKind;
//!
//! let schema = Schema::builder()
//!     .display_name("contract")
//!     .field("contract_no", FieldKind::Text, [
//!         Constraint::new().description("contract number").required().size(SizeRule::length(1, 20)),
//!     ])
//!     .build();
//! ```
//!
//! or loaded from a JSON document with [`Schema::from_json`].

mod size;

pub use size::SizeRule;

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::foundation::{FieldKind, SchemaError};

/// Predicate used when a constraint does not declare one.
pub const ALWAYS: &str = "${true}";

// ============================================================================
// CONSTRAINT
// ============================================================================

/// One rule bound to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constraint {
    /// Conditional expression gating the rule.
    pub predicate: Cow<'static, str>,
    /// Failure text used when the predicate does not hold.
    pub message: Cow<'static, str>,
    /// Human label for the field.
    pub description: Cow<'static, str>,
    /// Whether an empty value is acceptable while the predicate holds.
    pub allow_empty: bool,
    /// Length or precision bound.
    pub size: SizeRule,
}

impl Constraint {
    /// Creates a constraint with every setting at its default.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            predicate: Cow::Borrowed(ALWAYS),
            message: Cow::Borrowed(""),
            description: Cow::Borrowed(""),
            allow_empty: true,
            size: SizeRule::UNSET,
        }
    }

    /// Sets the gating predicate.
    #[must_use = "builder methods must be chained or built"]
    pub fn when(mut self, predicate: impl Into<Cow<'static, str>>) -> Self {
        self.predicate = predicate.into();
        self
    }

    /// Sets the failure message for a predicate that does not hold.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the human label.
    #[must_use = "builder methods must be chained or built"]
    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Rejects empty values while the predicate holds.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(mut self) -> Self {
        self.allow_empty = false;
        self
    }

    /// Sets whether empty values are accepted.
    #[must_use = "builder methods must be chained or built"]
    pub fn allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Sets the size bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn size(mut self, size: SizeRule) -> Self {
        self.size = size;
        self
    }
}

impl Default for Constraint {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// FIELD SCHEMA
// ============================================================================

/// A constrained field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    name: Cow<'static, str>,
    #[serde(default)]
    kind: FieldKind,
    constraints: Vec<Constraint>,
}

impl FieldSchema {
    /// Creates a field schema.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        kind: FieldKind,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            constraints: constraints.into_iter().collect(),
        }
    }

    /// Field name, as passed to [`Validatable::field`](crate::foundation::Validatable::field).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared kind of the field.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Label used in every message for this field: the first non-empty
    /// description among the constraints, else the field name.
    #[must_use]
    pub fn label(&self) -> &str {
        self.constraints
            .iter()
            .map(|c| c.description.as_ref())
            .find(|d| !d.is_empty())
            .unwrap_or(self.name.as_ref())
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Constraint metadata of one record type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<Cow<'static, str>>,
    #[serde(default)]
    fields: Vec<FieldSchema>,
}

impl Schema {
    /// Starts building a schema.
    #[must_use]
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// A schema with no constrained fields.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            display_name: None,
            fields: Vec::new(),
        }
    }

    /// Loads a schema from a JSON document.
    ///
    /// ```json
    /// {
    ///   "display_name": "payment query",
    ///   "fields": [
    ///     { "name": "bsid", "kind": "text",
    ///       "constraints": [{ "description": "serial number", "size": { "max": 32 } }] }
    ///   ]
    /// }
    /// ```
    ///
    /// Omitted constraint settings take their defaults. Fields listing no
    /// constraints are dropped.
    pub fn from_json(document: &str) -> Result<Self, SchemaError> {
        let mut schema: Schema = serde_json::from_str(document)?;
        schema.fields.retain(|f| !f.constraints.is_empty());
        Ok(schema)
    }

    /// Type-level display name overriding the caller's description.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|name| !name.is_empty())
    }

    /// Constrained fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Looks up a constrained field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name() == name)
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    display_name: Option<Cow<'static, str>>,
    fields: Vec<FieldSchema>,
}

impl SchemaBuilder {
    /// Sets the type-level display name.
    #[must_use = "builder methods must be chained or built"]
    pub fn display_name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Adds a field with its constraints. A field given no constraints is
    /// not recorded.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(
        mut self,
        name: impl Into<Cow<'static, str>>,
        kind: FieldKind,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Self {
        let field = FieldSchema::new(name, kind, constraints);
        if !field.constraints.is_empty() {
            self.fields.push(field);
        }
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> Schema {
        Schema {
            display_name: self.display_name,
            fields: self.fields,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
