use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use crate::class::ClassDefinition;
use crate::error::Error;
use crate::function::Function;
use crate::value::Value;

/// Signature of a visibility predicate: property name, property value and
/// the class the instance was built from.
pub type DecideFn = dyn Fn(&str, &Value, &ClassDefinition) -> bool;

/// The visibility policy of a factory.
///
/// A policy is consulted on every property read that reaches the instance.
/// Returning `false` suppresses the property: the read yields
/// [`Value::Undefined`].
///
/// # Examples
///
/// ```
/// use guarded_factory::{Decide, Value};
///
/// // White-list by name
/// let by_name = Decide::allow_names(["name", "age"]);
///
/// // Black-list by kind
/// let no_primitives = Decide::custom(|_, value, _| {
///     !matches!(value, Value::String(_) | Value::Number(_))
/// });
/// # let _ = (by_name, no_primitives);
/// ```
#[derive(Clone, Default)]
pub enum Decide {
    /// Every property is visible
    #[default]
    AllowAll,
    /// A Rust predicate
    Custom(Rc<DecideFn>),
    /// A dynamic function value; its result is judged by truthiness
    Dynamic(Function),
}

impl Decide {
    /// Wraps a Rust predicate.
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &Value, &ClassDefinition) -> bool + 'static,
    {
        Decide::Custom(Rc::new(f))
    }

    /// Exposes only the listed property names.
    pub fn allow_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Decide::custom(move |property, _, _| allowed.contains(property))
    }

    /// Exposes everything except the listed property names.
    pub fn deny_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let denied: BTreeSet<String> = names.into_iter().map(Into::into).collect();
        Decide::custom(move |property, _, _| !denied.contains(property))
    }

    /// Evaluates the policy for one property read.
    ///
    /// # Errors
    ///
    /// Errors raised by a dynamic policy are returned unchanged.
    pub fn allows(
        &self,
        property: &str,
        value: &Value,
        class: &ClassDefinition,
    ) -> Result<bool, Error> {
        match self {
            Decide::AllowAll => Ok(true),
            Decide::Custom(f) => Ok(f(property, value, class)),
            Decide::Dynamic(f) => {
                let args = [
                    Value::from(property),
                    value.clone(),
                    Value::Class(class.clone()),
                ];
                let verdict = f.call(&args)?;
                Ok(verdict.is_truthy())
            }
        }
    }
}

impl fmt::Debug for Decide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decide::AllowAll => f.write_str("AllowAll"),
            Decide::Custom(_) => f.write_str("Custom(..)"),
            Decide::Dynamic(func) => f.debug_tuple("Dynamic").field(&func.name()).finish(),
        }
    }
}
