//! Recipe and step types
//!
//! A recipe is an ordered list of steps. A step is kept as the raw YAML mapping
//! it was read from, so a load/save cycle leaves every field this tool does not
//! touch exactly as it was: non-mapping `arguments`, explicit nulls and tagged
//! values included. Only `action` and the `arguments` mapping are read or
//! written, through accessors.

use serde::{Deserialize, Serialize, Serializer};
use serde_yaml::{Mapping, Value};

pub(crate) const ACTION_KEY: &str = "action";
pub(crate) const ARGUMENTS_KEY: &str = "arguments";

/// One workflow action with its arguments
///
/// Always carries a string `action`; deserialization fails otherwise.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Mapping")]
pub struct Step {
    fields: Mapping,
}

impl TryFrom<Mapping> for Step {
    type Error = String;

    fn try_from(fields: Mapping) -> Result<Self, Self::Error> {
        match fields.get(ACTION_KEY) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(format!("a non-string action ({})", describe(other))),
            None => Err(format!("no '{}' key", ACTION_KEY)),
        }
    }
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl Step {
    pub fn new(action: impl Into<String>) -> Self {
        let mut fields = Mapping::new();
        fields.insert(Value::from(ACTION_KEY), Value::String(action.into()));
        Self { fields }
    }

    pub fn action(&self) -> &str {
        self.fields
            .get(ACTION_KEY)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// The raw `arguments` value, whatever its shape
    pub fn arguments(&self) -> Option<&Value> {
        self.fields.get(ARGUMENTS_KEY)
    }

    /// Any top-level field of the step
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Sets a top-level field other than `action`
    pub fn set_field(&mut self, key: &str, value: impl Into<Value>) {
        if key != ACTION_KEY {
            self.fields.insert(Value::from(key), value.into());
        }
    }

    pub fn with_argument(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_argument(key, value);
        self
    }

    /// Sets one argument.
    ///
    /// A missing, null or non-mapping `arguments` value is replaced by a
    /// mapping holding just this key.
    pub fn set_argument(&mut self, key: &str, value: impl Into<String>) {
        let key = Value::from(key);
        let value = Value::String(value.into());

        if let Some(Value::Mapping(arguments)) = self.fields.get_mut(ARGUMENTS_KEY) {
            arguments.insert(key, value);
            return;
        }

        let mut arguments = Mapping::new();
        arguments.insert(key, value);
        self.fields
            .insert(Value::from(ARGUMENTS_KEY), Value::Mapping(arguments));
    }

    /// Returns a string argument, if present
    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments()
            .and_then(Value::as_mapping)
            .and_then(|args| args.get(key))
            .and_then(Value::as_str)
    }
}

/// Ordered sequence of steps
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Recipe {
    steps: Vec<Step>,
}

impl Recipe {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn step_mut(&mut self, index: usize) -> Option<&mut Step> {
        self.steps.get_mut(index)
    }

    pub fn insert(&mut self, index: usize, step: Step) {
        self.steps.insert(index, step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Action names in order
    pub fn actions(&self) -> Vec<&str> {
        self.steps.iter().map(Step::action).collect()
    }
}

impl From<Vec<Step>> for Recipe {
    fn from(steps: Vec<Step>) -> Self {
        Self::new(steps)
    }
}

/// Short description of a YAML value's kind, for error messages
pub(crate) fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
