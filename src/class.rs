use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use crate::error::Error;
use crate::function::Function;
use crate::value::{Kind, Record, Value};

/// Signature of a class constructor: construction arguments to own fields.
pub type ConstructorFn = dyn Fn(&[Value]) -> Result<Record, Error>;

/// Signature of a class method: receiver and call arguments to a result.
pub type MethodFn = dyn Fn(&Instance, &[Value]) -> Result<Value, Error>;

pub(crate) type Method = Rc<MethodFn>;

/// A constructible class: a named constructor plus a table of methods.
///
/// Cloning a `ClassDefinition` is cheap and keeps its identity: clones
/// compare equal, while two separately built classes never do, even when
/// they are structurally identical.
///
/// # Examples
///
/// ```
/// use guarded_factory::{ClassDefinition, Value};
///
/// let counter = ClassDefinition::builder("Counter")
///     .constructor(|args| {
///         let start = args.first().cloned().unwrap_or(Value::from(0));
///         Ok([("count".to_string(), start)].into_iter().collect())
///     })
///     .method("count", |this, _| Ok(this.get("count")))
///     .build();
///
/// assert_eq!(counter.name(), "Counter");
/// assert!(counter.has_method("count"));
/// assert_eq!(counter, counter.clone());
/// ```
#[derive(Clone)]
pub struct ClassDefinition {
    inner: Rc<ClassInner>,
}

struct ClassInner {
    name: String,
    constructor: Rc<ConstructorFn>,
    methods: BTreeMap<String, Method>,
}

impl ClassDefinition {
    /// Starts building a class with the given name.
    pub fn builder(name: impl Into<String>) -> ClassBuilder {
        ClassBuilder::new(name)
    }

    /// Returns the class name.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Returns true if the class defines a method with this name.
    pub fn has_method(&self, name: &str) -> bool {
        self.inner.methods.contains_key(name)
    }

    /// Returns the names of all methods, in sorted order.
    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.inner.methods.keys().map(String::as_str)
    }

    /// Returns true if both handles refer to the same class.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Runs the constructor and produces a new instance.
    ///
    /// Constructor errors are returned unchanged.
    pub(crate) fn construct(&self, args: &[Value]) -> Result<Instance, Error> {
        let fields = (self.inner.constructor)(args)?;
        Ok(Instance {
            class: self.clone(),
            fields: RefCell::new(fields),
        })
    }

    fn method(&self, name: &str) -> Option<&Method> {
        self.inner.methods.get(name)
    }
}

impl PartialEq for ClassDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassDefinition").field(&self.name()).finish()
    }
}

impl fmt::Display for ClassDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "class {} {{ [native code] }}", self.name())
    }
}

/// Builder for [`ClassDefinition`].
///
/// A class without an explicit constructor produces instances with no own
/// fields.
pub struct ClassBuilder {
    name: String,
    constructor: Option<Rc<ConstructorFn>>,
    methods: BTreeMap<String, Method>,
}

impl ClassBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constructor: None,
            methods: BTreeMap::new(),
        }
    }

    /// Sets the constructor, which maps construction arguments to own fields.
    pub fn constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Record, Error> + 'static,
    {
        self.constructor = Some(Rc::new(f));
        self
    }

    /// Adds a method. A later method with the same name replaces the earlier one.
    pub fn method<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Instance, &[Value]) -> Result<Value, Error> + 'static,
    {
        self.methods.insert(name.into(), Rc::new(f));
        self
    }

    /// Finishes the class.
    pub fn build(self) -> ClassDefinition {
        let constructor: Rc<ConstructorFn> = match self.constructor {
            Some(constructor) => constructor,
            None => Rc::new(no_fields),
        };

        ClassDefinition {
            inner: Rc::new(ClassInner {
                name: self.name,
                constructor,
                methods: self.methods,
            }),
        }
    }
}

fn no_fields(_args: &[Value]) -> Result<Record, Error> {
    Ok(Record::new())
}

/// A constructed object: own fields plus the methods of its class.
///
/// Instances are only ever visible as the receiver inside a method body.
/// Callers outside the class see them through a
/// [`GuardedView`](crate::GuardedView).
pub struct Instance {
    class: ClassDefinition,
    // Methods may update fields through a shared receiver.
    fields: RefCell<Record>,
}

impl Instance {
    /// Returns the class this instance was constructed from.
    pub fn class(&self) -> &ClassDefinition {
        &self.class
    }

    /// Reads an own field, or `Undefined` if there is none.
    pub fn get(&self, name: &str) -> Value {
        self.fields.borrow().get(name).cloned().unwrap_or_default()
    }

    /// Writes an own field, creating it if needed.
    ///
    /// Storing a method bound to this same instance keeps the instance alive
    /// through a reference cycle; it is then never freed.
    pub fn set(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.fields.borrow_mut().insert(name.into(), value.into());
    }

    /// Calls a method of the class with this instance as receiver.
    ///
    /// # Errors
    ///
    /// Returns a type-constraint error if the class has no such method, or
    /// whatever the method itself raises.
    pub fn invoke(&self, name: &str, args: &[Value]) -> Result<Value, Error> {
        match self.class.method(name) {
            Some(method) => method(self, args),
            None => Err(Error::type_constraint(Kind::Callable, Kind::Undefined)),
        }
    }

    /// Membership test covering own fields and inherited methods.
    pub(crate) fn has(&self, name: &str) -> bool {
        self.fields.borrow().contains_key(name) || self.class.has_method(name)
    }

    /// Resolves a member to a value; methods come back bound to `this`.
    ///
    /// Own fields shadow methods of the same name.
    pub(crate) fn member(this: &Rc<Instance>, name: &str) -> Option<Value> {
        if let Some(value) = this.fields.borrow().get(name) {
            return Some(value.clone());
        }
        this.class
            .method(name)
            .map(|method| Value::Function(Function::bind(name, Rc::clone(this), Rc::clone(method))))
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("class", &self.class.name())
            .finish_non_exhaustive()
    }
}
