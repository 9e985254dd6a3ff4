//! Declarative per-field validation.
//!
//! A [`Schema`] is an ordered list of [`FieldRules`]; each field carries an
//! optional "required" message and an ordered list of predicate/message
//! pairs. Validation visits every field and aggregates all failures instead of
//! stopping at the first one.

pub mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub use rules::{login_schema, registration_schema};

/// Anything whose fields can be looked up by (dotted) name
pub trait FieldSource {
    fn field_value(&self, field: &str) -> Option<&str>;
}

type Predicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// One predicate and the message reported when it fails
#[derive(Clone)]
pub struct Rule {
    predicate: Predicate,
    message: String,
}

impl Rule {
    pub fn new<F>(predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }

    pub fn check(&self, value: &str) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("message", &self.message).finish()
    }
}

/// Rule chain for a single field
#[derive(Debug, Clone)]
pub struct FieldRules {
    field: String,
    required: Option<String>,
    rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            required: None,
            rules: Vec::new(),
        }
    }

    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    pub fn rule<F>(mut self, predicate: F, message: impl Into<String>) -> Self
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::new(predicate, message));
        self
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Messages for every rule `value` fails, in declaration order.
    ///
    /// An empty value on a required field reports only the required message;
    /// an empty value on an optional field is not checked further. Whitespace
    /// counts as a value.
    pub fn check(&self, value: &str) -> Vec<String> {
        if value.is_empty() {
            return self.required.iter().cloned().collect();
        }

        self.rules
            .iter()
            .filter(|rule| !rule.check(value))
            .map(|rule| rule.message().to_string())
            .collect()
    }
}

/// Ordered set of field rule chains
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<FieldRules>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, rules: FieldRules) -> Self {
        self.fields.push(rules);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field())
    }

    /// Evaluate every field of `source`; missing fields count as blank
    pub fn validate(&self, source: &impl FieldSource) -> ValidationErrors {
        let mut errors = ValidationErrors::default();
        for rules in &self.fields {
            let value = source.field_value(rules.field()).unwrap_or_default();
            for message in rules.check(value) {
                errors.add(rules.field(), message);
            }
        }
        errors
    }

    /// Evaluate a single field, e.g. for inline feedback while typing
    pub fn validate_field(&self, field: &str, value: &str) -> Vec<String> {
        self.fields
            .iter()
            .filter(|rules| rules.field() == field)
            .flat_map(|rules| rules.check(value))
            .collect()
    }
}

/// Field name -> failure messages. No entry means the field passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// The message shown inline under a field
    pub fn first(&self, field: &str) -> Option<&str> {
        self.messages(field).first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}
