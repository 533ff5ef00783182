//! Dynamically typed values flowing through factories and guarded views.

use std::collections::BTreeMap;
use std::fmt;

use crate::class::ClassDefinition;
use crate::function::Function;

/// A plain configuration or data record (string keys, dynamic values).
pub type Record = BTreeMap<String, Value>;

/// A dynamically typed value.
///
/// Instance fields, construction arguments, method results and property reads
/// on a [`GuardedView`](crate::GuardedView) are all expressed as `Value`s.
///
/// Equality on [`Value::Function`] and [`Value::Class`] is identity, never a
/// structural comparison.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Value {
    /// Absent value; what a suppressed or unknown property reads as
    #[default]
    Undefined,
    /// Explicit empty value
    Null,
    /// Boolean
    Bool(bool),
    /// Number (double precision)
    Number(f64),
    /// String
    String(String),
    /// Ordered list of values
    Array(Vec<Value>),
    /// Plain record
    Record(Record),
    /// Callable, possibly bound to an instance
    Function(Function),
    /// Constructible class definition
    Class(ClassDefinition),
}

impl Value {
    /// Returns the kind of this value.
    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Record(_) => Kind::Object,
            Value::Function(_) => Kind::Callable,
            Value::Class(_) => Kind::Function,
        }
    }

    /// Returns whether the value counts as "true" when used as a condition.
    ///
    /// `Undefined`, `Null`, `false`, `0`, `NaN` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Record(_) | Value::Function(_) | Value::Class(_) => true,
        }
    }

    /// Returns true for `Undefined` and `Null`.
    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    /// Returns true if this value is `Undefined`.
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Returns true if the value can be invoked with [`Function::call`].
    pub fn is_callable(&self) -> bool {
        matches!(self, Value::Function(_))
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the number if this is a `Number`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the boolean if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the record if this is a `Record`.
    pub fn as_record(&self) -> Option<&Record> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Returns the function if this is a `Function`.
    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Returns the class definition if this is a `Class`.
    pub fn as_class(&self) -> Option<&ClassDefinition> {
        match self {
            Value::Class(c) => Some(c),
            _ => None,
        }
    }

    /// Builds a record value from key/value pairs.
    pub fn record<K, V, I>(entries: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Textual coercion.
///
/// Records render as `[object Object]` and callables as their signature only,
/// so coercing a value never serializes the state of an instance.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => f.write_str(s),
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    if !item.is_nullish() {
                        write!(f, "{}", item)?;
                    }
                }
                Ok(())
            }
            Value::Record(_) => f.write_str("[object Object]"),
            Value::Function(func) => write!(f, "{}", func),
            Value::Class(class) => write!(f, "{}", class),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<ClassDefinition> for Value {
    fn from(c: ClassDefinition) -> Self {
        Value::Class(c)
    }
}

/// The kind name of a [`Value`], as reported in type-constraint errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// `undefined`
    Undefined,
    /// `null`
    Null,
    /// `Boolean`
    Boolean,
    /// `Number`
    Number,
    /// `String`
    String,
    /// `Array`
    Array,
    /// `Object` (a plain record)
    Object,
    /// `Callable` (invocable, not constructible)
    Callable,
    /// `Function` (a constructible class definition)
    Function,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "Boolean",
            Kind::Number => "Number",
            Kind::String => "String",
            Kind::Array => "Array",
            Kind::Object => "Object",
            Kind::Callable => "Callable",
            Kind::Function => "Function",
        };
        f.write_str(name)
    }
}
