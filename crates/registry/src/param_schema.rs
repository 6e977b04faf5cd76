use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The JSON value shape a parameter accepts (§4.1 `ParamSchema.type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    /// No type constraint; any JSON value is accepted.
    Any,
}

impl ParamType {
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Number => value.is_number(),
            Self::Boolean => value.is_boolean(),
            Self::Object => value.is_object(),
            Self::Array => value.is_array(),
            Self::Any => true,
        }
    }
}

/// The schema for a single configuration, input, or output parameter of a
/// node spec (§4.1).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamSchema {
    #[serde(rename = "type")]
    pub param_type: ParamType,
    #[serde(default)]
    pub default: Option<Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<Value>>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub validation_pattern: Option<String>,
}

impl ParamSchema {
    #[must_use]
    pub fn new(param_type: ParamType) -> Self {
        Self {
            param_type,
            default: None,
            required: false,
            description: None,
            options: None,
            min: None,
            max: None,
            validation_pattern: None,
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    #[must_use]
    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = Some(options);
        self
    }

    /// Check a concrete value against this schema's type, range, and enum
    /// constraints. Returns the first violation found, if any.
    #[must_use]
    pub fn violation(&self, value: &Value) -> Option<String> {
        if !self.param_type.matches(value) {
            return Some(format!("expected {:?}, got {value}", self.param_type));
        }

        if let Some(options) = &self.options {
            if !options.contains(value) {
                return Some(format!("{value} is not one of the allowed options"));
            }
        }

        if let Some(n) = value.as_f64() {
            if let Some(min) = self.min {
                if n < min {
                    return Some(format!("{n} is below the minimum {min}"));
                }
            }
            if let Some(max) = self.max {
                if n > max {
                    return Some(format!("{n} is above the maximum {max}"));
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_is_a_violation() {
        let schema = ParamSchema::new(ParamType::Number);
        assert!(schema.violation(&Value::String("x".into())).is_some());
        assert!(schema.violation(&Value::from(3)).is_none());
    }

    #[test]
    fn range_is_enforced() {
        let schema = ParamSchema::new(ParamType::Number).with_range(1.0, 10.0);
        assert!(schema.violation(&Value::from(0)).is_some());
        assert!(schema.violation(&Value::from(11)).is_some());
        assert!(schema.violation(&Value::from(5)).is_none());
    }

    #[test]
    fn options_are_enforced() {
        let schema = ParamSchema::new(ParamType::String)
            .with_options(vec![Value::from("a"), Value::from("b")]);
        assert!(schema.violation(&Value::from("c")).is_some());
        assert!(schema.violation(&Value::from("a")).is_none());
    }

    #[test]
    fn any_type_accepts_everything() {
        let schema = ParamSchema::new(ParamType::Any);
        assert!(schema.violation(&Value::Null).is_none());
        assert!(schema.violation(&Value::from(true)).is_none());
    }
}
