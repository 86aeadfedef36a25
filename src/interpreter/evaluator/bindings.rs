use std::{collections::HashMap, str::FromStr};

use dashu::float::DBig;

use crate::interpreter::value::number::Number;

/// Supplies variable values to an evaluation.
///
/// Only `Variable` nodes consult the bindings. A name for which both lookups
/// return `None` is unbound.
pub trait Bindings {
    /// The float value bound to `name`.
    fn lookup(&self, name: &str) -> Option<f64>;

    /// The decimal value bound to `name`.
    ///
    /// Decimal evaluation asks this first and falls back to [`lookup`]
    /// converted to a decimal. The default provides no decimals.
    ///
    /// [`lookup`]: Bindings::lookup
    fn lookup_decimal(&self, _name: &str) -> Option<DBig> {
        None
    }
}

impl Bindings for HashMap<String, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

impl Bindings for HashMap<&str, f64> {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.get(name).copied()
    }
}

/// A variable table holding both representations of every value.
///
/// Values set from decimal text keep every digit for decimal mode; values set
/// from floats derive their decimal on first decimal lookup.
#[derive(Debug, Clone, Default)]
pub struct Variables {
    values: HashMap<String, Number>,
}

impl Variables {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to a float.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(name.into(), Number::from_f64(value));
        self
    }

    /// Binds `name` to a decimal.
    pub fn set_decimal(&mut self, name: impl Into<String>, value: DBig) -> &mut Self {
        self.values.insert(name.into(), Number::from_decimal(value));
        self
    }

    /// Binds `name` to decimal text such as `"19.99"`.
    ///
    /// # Errors
    /// Returns the text back if it is not a decimal number.
    ///
    /// # Example
    /// ```
    /// use decimath::interpreter::evaluator::bindings::{Bindings, Variables};
    ///
    /// let mut vars = Variables::new();
    /// vars.set_text("price", "19.99").unwrap();
    /// assert_eq!(vars.lookup("price"), Some(19.99));
    /// assert!(vars.set_text("bad", "1.2.3").is_err());
    /// ```
    pub fn set_text(&mut self, name: impl Into<String>, text: &str) -> Result<&mut Self, String> {
        let value = DBig::from_str(text).map_err(|_| text.to_string())?;
        Ok(self.set_decimal(name, value))
    }

    /// Removes a binding, returning whether it existed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.values.remove(name).is_some()
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Bindings for Variables {
    fn lookup(&self, name: &str) -> Option<f64> {
        self.values.get(name).map(Number::as_f64)
    }

    fn lookup_decimal(&self, name: &str) -> Option<DBig> {
        self.values.get(name)?.as_decimal().cloned()
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Variables {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        let mut variables = Self::new();
        for (name, value) in iter {
            variables.set(name, value);
        }
        variables
    }
}
