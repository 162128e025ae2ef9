use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// The value kind of a declared tool parameter. Raster destinations are
/// distinct from raster layers: a destination is a writable path assigned by
/// the caller, not a pre-existing resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterKind {
    RasterLayer,
    RasterDestination,
    Number { default: f64 },
    Choice { options: &'static [&'static str], default: usize },
}

/// A single declared parameter: key, human label and expected value kind.
/// Declared once at tool registration, never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: ParameterKind,
}

impl ParameterSpec {
    pub const fn raster_layer(key: &'static str, label: &'static str) -> Self {
        ParameterSpec {
            key,
            label,
            kind: ParameterKind::RasterLayer,
        }
    }

    pub const fn raster_destination(key: &'static str, label: &'static str) -> Self {
        ParameterSpec {
            key,
            label,
            kind: ParameterKind::RasterDestination,
        }
    }

    pub const fn number(key: &'static str, label: &'static str, default: f64) -> Self {
        ParameterSpec {
            key,
            label,
            kind: ParameterKind::Number { default },
        }
    }

    pub const fn choice(key: &'static str, label: &'static str, options: &'static [&'static str], default: usize) -> Self {
        ParameterSpec {
            key,
            label,
            kind: ParameterKind::Choice { options, default },
        }
    }

    pub fn is_raster_layer(&self) -> bool {
        matches!(self.kind, ParameterKind::RasterLayer)
    }

    pub fn is_raster_destination(&self) -> bool {
        matches!(self.kind, ParameterKind::RasterDestination)
    }
}

/// A user supplied parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Path(PathBuf),
    Number(f64),
    Choice(usize),
}

/// The resolved parameter values for one invocation, keyed by parameter key.
/// Valid only for the duration of a single run.
#[derive(Debug, Clone, Default)]
pub struct ParameterValues {
    values: BTreeMap<String, Value>,
}

impl ParameterValues {
    pub fn new() -> Self {
        ParameterValues::default()
    }

    pub fn set_path(&mut self, key: &str, path: impl Into<PathBuf>) -> &mut Self {
        self.values.insert(key.to_string(), Value::Path(path.into()));
        self
    }

    pub fn set_number(&mut self, key: &str, value: f64) -> &mut Self {
        self.values.insert(key.to_string(), Value::Number(value));
        self
    }

    pub fn set_choice(&mut self, key: &str, index: usize) -> &mut Self {
        self.values.insert(key.to_string(), Value::Choice(index));
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn path(&self, key: &str) -> Result<&Path> {
        match self.values.get(key) {
            Some(Value::Path(path)) => Ok(path.as_path()),
            Some(other) => Err(Error::InvalidParameter(
                key.to_string(),
                format!("expected a file path, got {other:?}"),
            )),
            None => Err(Error::MissingParameter(key.to_string())),
        }
    }

    pub fn number_opt(&self, key: &str) -> Result<Option<f64>> {
        match self.values.get(key) {
            Some(Value::Number(value)) => Ok(Some(*value)),
            Some(other) => Err(Error::InvalidParameter(
                key.to_string(),
                format!("expected a number, got {other:?}"),
            )),
            None => Ok(None),
        }
    }

    pub fn choice_opt(&self, key: &str) -> Result<Option<usize>> {
        match self.values.get(key) {
            Some(Value::Choice(index)) => Ok(Some(*index)),
            Some(other) => Err(Error::InvalidParameter(
                key.to_string(),
                format!("expected a choice index, got {other:?}"),
            )),
            None => Ok(None),
        }
    }
}
