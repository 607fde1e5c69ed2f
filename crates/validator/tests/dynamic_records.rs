//! Integration tests for hand-written records, JSON schemas and tooling
//! faults.

use std::collections::HashMap;

use palisade_validator::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

// ============================================================================
// A ROW BACKED BY A JSON SCHEMA
// ============================================================================

const PAYMENT_SCHEMA: &str = r#"{
    "display_name": "payment query",
    "fields": [
        {
            "name": "bsid",
            "kind": "text",
            "constraints": [
                { "description": "serial number", "size": { "max": 8 } }
            ]
        },
        {
            "name": "payno",
            "kind": "text",
            "constraints": [
                { "predicate": "${isEmpty(bsid)}", "allow_empty": false }
            ]
        },
        {
            "name": "amount",
            "kind": "decimal",
            "constraints": [
                { "size": { "integer": 6, "fraction": 2, "numeric": true } }
            ]
        },
        {
            "name": "secret",
            "kind": "text",
            "constraints": [ { "allow_empty": false } ]
        }
    ]
}"#;

struct Row {
    schema: Schema,
    cells: HashMap<&'static str, &'static str>,
}

impl Row {
    fn new(cells: &[(&'static str, &'static str)]) -> Self {
        Self {
            schema: Schema::from_json(PAYMENT_SCHEMA).unwrap(),
            cells: cells.iter().copied().collect(),
        }
    }
}

impl Validatable for Row {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn field(&self, name: &str) -> Result<Value<'_>, AccessError> {
        match name {
            "secret" => Err(AccessError::inaccessible(name, "redacted")),
            "amount" => Ok(self
                .cells
                .get(name)
                .map_or(Value::Null, |s| Value::Decimal(s.parse().unwrap()))),
            "bsid" | "payno" => Ok(self.cells.get(name).map_or(Value::Null, |s| Value::text(*s))),
            _ => Err(AccessError::unknown_field(name)),
        }
    }
}

#[rstest]
#[case(&[("bsid", "B-1"), ("amount", "10.5")], "")]
#[case(&[("payno", "P-1")], "")]
#[case(&[], "payno must not be empty")]
#[case(&[("bsid", "B-123456789")], "serial number length must not exceed 8")]
#[case(&[("bsid", "B-1"), ("amount", "1234567.5")], "amount length must not exceed <6,2>")]
#[case(&[("bsid", "B-1"), ("amount", "1.255")], "amount length must not exceed <6,2>")]
fn json_schema_row(#[case] cells: &[(&'static str, &'static str)], #[case] expected: &str) {
    let report = validate(&Row::new(cells));
    assert_eq!(report.error_message(), expected);
}

#[test]
fn unreadable_field_passes() {
    // `secret` is required but cannot be read; the rest is still checked.
    let report = validate(&Row::new(&[("bsid", "B-123456789")]));
    assert_eq!(
        report.messages(),
        ["serial number length must not exceed 8"]
    );
}

#[test]
fn schema_display_name_labels_report() {
    let report = validate(&Row::new(&[]));
    assert_eq!(report.description(), Some("payment query"));
}

// ============================================================================
// PREDICATE FAULTS
// ============================================================================

struct Gated {
    value: String,
}

palisade_validator::validatable! {
    Gated {
        value: [
            Constraint::new().when("${value ==}").required(),
            Constraint::new().when("${missing == 1}").required(),
            Constraint::new().when("${value}").required(),
        ],
    }
}

#[test]
fn broken_predicates_fail_open() {
    let report = validate(&Gated {
        value: String::new(),
    });
    assert!(report.is_valid());
}

#[test]
fn broken_predicate_does_not_affect_other_fields() {
    struct Pair {
        broken: String,
        fine: String,
    }

    palisade_validator::validatable! {
        Pair {
            broken: [Constraint::new().when("${(}").required()],
            fine: [Constraint::new().required()],
        }
    }

    let report = validate(&Pair {
        broken: String::new(),
        fine: String::new(),
    });
    assert_eq!(report.error_message(), "fine must not be empty");
}

// ============================================================================
// CUSTOM EVALUATOR AND CONFIG
// ============================================================================

#[test]
fn closure_evaluator_replaces_expression_language() {
    let validator = Validator::with_evaluator(
        |expression: &str, record: &dyn Validatable| -> Result<bool, PredicateError> {
            match expression {
                "${true}" => Ok(true),
                "has-serial" => Ok(!is_empty(&record.field("bsid")?)),
                _ => Ok(false),
            }
        },
    );

    struct Note {
        bsid: String,
        text: String,
    }

    palisade_validator::validatable! {
        Note {
            bsid: [],
            text: [Constraint::new().when("has-serial").required()],
        }
    }

    let with_serial = Note {
        bsid: "B".to_string(),
        text: String::new(),
    };
    assert_eq!(
        validator.validate(&with_serial).error_message(),
        "text must not be empty"
    );

    let without_serial = Note {
        bsid: String::new(),
        text: String::new(),
    };
    assert!(validator.validate(&without_serial).is_valid());
}

#[test]
fn config_from_json_limits_depth() {
    struct Level {
        name: String,
        next: Option<Box<Level>>,
    }

    palisade_validator::validatable! {
        Level {
            name: [Constraint::new().required()],
            next: [Constraint::new()],
        }
    }

    let deep = Level {
        name: "a".to_string(),
        next: Some(Box::new(Level {
            name: "b".to_string(),
            next: Some(Box::new(Level {
                name: String::new(),
                next: None,
            })),
        })),
    };

    assert_eq!(
        Validator::new().validate(&deep).error_message(),
        "next(next(name must not be empty))"
    );

    let config: ValidatorConfig = serde_json::from_str(r#"{ "max_depth": 1 }"#).unwrap();
    let shallow = Validator::new().with_config(config);
    assert!(shallow.validate(&deep).is_valid());
}
