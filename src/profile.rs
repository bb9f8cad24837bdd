//! # Self-describing profile records
//!
//! A [`Profile`] is an ordered set of named physical variables, each carrying its units and a
//! free-text description, plus string attributes. It is the payload type of both halves of a
//! collocation (RO profile and nadir-scanner sounding) and is serialized as-is into the output
//! archive.
//!
//! Masked samples (non-finite values) are replaced by [`FILL_VALUE`](crate::constants::FILL_VALUE)
//! and the variable records the fill value it used.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::FILL_VALUE;

/// Values of one variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Values {
    Scalar(f64),
    Array(Vec<f64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Scalar(_) => 1,
            Values::Array(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            Values::Scalar(x) => Some(*x),
            Values::Array(_) => None,
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Values::Scalar(x) => std::slice::from_ref(x),
            Values::Array(v) => v,
        }
    }
}

/// One physical variable of a profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub units: String,
    pub description: String,
    /// Name of the dimension indexing an array variable, `None` for scalars
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    /// Fill value substituted for masked samples, if any sample was masked
    #[serde(rename = "_FillValue", skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
    pub values: Values,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    variables: Vec<Variable>,
    attributes: BTreeMap<String, String>,
}

fn mask(value: f64) -> (f64, bool) {
    if value.is_finite() {
        (value, false)
    } else {
        (FILL_VALUE, true)
    }
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar variable, masking a non-finite value.
    pub fn push_scalar(&mut self, name: &str, value: f64, units: &str, description: &str) {
        let (value, masked) = mask(value);
        self.push(Variable {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension: None,
            fill_value: masked.then_some(FILL_VALUE),
            values: Values::Scalar(value),
        });
    }

    /// Append an array variable indexed by `dimension`, masking non-finite samples.
    pub fn push_array(
        &mut self,
        name: &str,
        dimension: &str,
        values: &[f64],
        units: &str,
        description: &str,
    ) {
        let mut any_masked = false;
        let values = values
            .iter()
            .map(|&x| {
                let (x, masked) = mask(x);
                any_masked |= masked;
                x
            })
            .collect();

        self.push(Variable {
            name: name.to_string(),
            units: units.to_string(),
            description: description.to_string(),
            dimension: Some(dimension.to_string()),
            fill_value: any_masked.then_some(FILL_VALUE),
            values: Values::Array(values),
        });
    }

    /// Append a variable, replacing any existing variable of the same name.
    pub fn push(&mut self, variable: Variable) {
        match self.variables.iter_mut().find(|v| v.name == variable.name) {
            Some(existing) => *existing = variable,
            None => self.variables.push(variable),
        }
    }

    pub fn set_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.name == name)
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}
