/// A single named argument for a stored routine. Every variant carries an
/// `Option` so that absent filters are bound as typed SQL `NULL`s.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
    IntList(Option<Vec<i64>>),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        match self {
            ParamValue::Int(v) => v.is_none(),
            ParamValue::Float(v) => v.is_none(),
            ParamValue::Text(v) => v.is_none(),
            ParamValue::IntList(v) => v.is_none(),
        }
    }

    pub(crate) fn sql_type(&self) -> &'static str {
        match self {
            ParamValue::Int(_) => "bigint",
            ParamValue::Float(_) => "double precision",
            ParamValue::Text(_) => "text",
            ParamValue::IntList(_) => "bigint[]",
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            ParamValue::Int(v) => *v,
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            ParamValue::Float(v) => *v,
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(v) => v.as_deref(),
            _ => None,
        }
    }

    pub fn as_int_list(&self) -> Option<&[i64]> {
        match self {
            ParamValue::IntList(v) => v.as_deref(),
            _ => None,
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(Some(value))
    }
}

impl From<Option<i64>> for ParamValue {
    fn from(value: Option<i64>) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(Some(value))
    }
}

impl From<Option<f64>> for ParamValue {
    fn from(value: Option<f64>) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(Some(value.to_string()))
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(Some(value))
    }
}

impl From<Option<String>> for ParamValue {
    fn from(value: Option<String>) -> Self {
        ParamValue::Text(value)
    }
}

impl From<Vec<i64>> for ParamValue {
    fn from(value: Vec<i64>) -> Self {
        ParamValue::IntList(Some(value))
    }
}

impl From<Option<Vec<i64>>> for ParamValue {
    fn from(value: Option<Vec<i64>>) -> Self {
        ParamValue::IntList(value)
    }
}

/// Ordered named arguments for a routine call. Setting a name twice replaces
/// the earlier value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutineParams {
    entries: Vec<(String, ParamValue)>,
}

impl RoutineParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.set(name, value);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accepts `schema.routine` style names: dot-separated parts made of ASCII
/// letters, digits and underscores, each starting with a letter or underscore.
pub(crate) fn is_identifier(name: &str, allow_qualified: bool) -> bool {
    if name.is_empty() || (!allow_qualified && name.contains('.')) {
        return false;
    }
    name.split('.').all(|part| {
        let mut chars = part.chars();
        match chars.next() {
            Some(first) if first.is_ascii_alphabetic() || first == '_' => {
                chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            }
            _ => false,
        }
    })
}
