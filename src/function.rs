use std::fmt;
use std::rc::Rc;

use crate::class::{Instance, Method};
use crate::error::Error;
use crate::value::Value;

/// Signature of a native callable.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, Error>;

/// A named callable value.
///
/// A `Function` is either a native closure or a class method bound to the
/// instance it was read from. A bound method keeps its receiver for as long as
/// the function lives, so it can be invoked freestanding.
///
/// # Security Properties
///
/// - `Display` and `Debug` render only the signature, never the receiver or
///   any closed-over value
/// - There is no accessor for the receiver of a bound method
///
/// # Examples
///
/// ```
/// use guarded_factory::{Function, Value};
///
/// let double = Function::new("double", |args| {
///     let n = args.first().and_then(Value::as_number).unwrap_or(0.0);
///     Ok(Value::from(n * 2.0))
/// });
///
/// assert_eq!(double.call(&[Value::from(21)]).unwrap(), Value::from(42));
/// assert_eq!(double.to_string(), "function double() { [native code] }");
/// ```
#[derive(Clone)]
pub struct Function {
    name: Rc<str>,
    callable: Callable,
}

#[derive(Clone)]
enum Callable {
    Native(Rc<NativeFn>),
    Bound { receiver: Rc<Instance>, method: Method },
}

impl Function {
    /// Creates a native function.
    pub fn new<F>(name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + 'static,
    {
        Self {
            name: Rc::from(name.into()),
            callable: Callable::Native(Rc::new(f)),
        }
    }

    /// Binds a class method to its receiver.
    ///
    /// This is `pub(crate)`: only guarded views hand out bound methods.
    pub(crate) fn bind(name: &str, receiver: Rc<Instance>, method: Method) -> Self {
        Self {
            name: Rc::from(name),
            callable: Callable::Bound { receiver, method },
        }
    }

    /// Returns the function's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if this function is a method bound to an instance.
    pub fn is_bound(&self) -> bool {
        matches!(self.callable, Callable::Bound { .. })
    }

    /// Invokes the function.
    ///
    /// # Errors
    ///
    /// Returns whatever error the underlying closure or method raises.
    pub fn call(&self, args: &[Value]) -> Result<Value, Error> {
        match &self.callable {
            Callable::Native(f) => f(args),
            Callable::Bound { receiver, method } => method(receiver.as_ref(), args),
        }
    }
}

/// Identity comparison.
///
/// Two bound functions are equal when they bind the same method to the same
/// receiver, so reading a method twice yields equal values.
impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        match (&self.callable, &other.callable) {
            (Callable::Native(a), Callable::Native(b)) => Rc::ptr_eq(a, b),
            (
                Callable::Bound {
                    receiver: r1,
                    method: m1,
                },
                Callable::Bound {
                    receiver: r2,
                    method: m2,
                },
            ) => Rc::ptr_eq(r1, r2) && Rc::ptr_eq(m1, m2),
            _ => false,
        }
    }
}

// The receiver must never appear in formatted output: it would serialize
// construction arguments into logs and strings.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_bound() { "bound " } else { "" };
        write!(f, "function {}{}() {{ [native code] }}", prefix, self.name)
    }
}
