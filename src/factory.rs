use std::fmt;
use std::rc::Rc;

use crate::class::ClassDefinition;
use crate::error::{Error, TypeConstraintError};
use crate::options::FactoryOptions;
use crate::value::{Kind, Value};
use crate::view::GuardedView;

/// Creates a factory from dynamically typed arguments.
///
/// `class_definition` must be a [`Value::Class`]. `options`, when given, must
/// be a [`Value::Record`]; it is merged over the defaults with
/// [`FactoryOptions::from_record`]. Passing `Some(&Value::Undefined)` is the
/// same as passing `None`.
///
/// # Errors
///
/// Returns a type-constraint error if either argument has the wrong kind:
/// `Expected Function, got undefined.` or `Expected Object, got Number.`
///
/// # Examples
///
/// ```
/// use guarded_factory::{ClassDefinition, Value, create_factory};
///
/// let err = create_factory(&Value::Undefined, None).unwrap_err();
/// assert_eq!(err.to_string(), "TypeError: Expected Function, got undefined.");
///
/// let class = Value::Class(ClassDefinition::builder("Empty").build());
/// let err = create_factory(&class, Some(&Value::from(42))).unwrap_err();
/// assert_eq!(err.to_string(), "TypeError: Expected Object, got Number.");
/// ```
pub fn create_factory(
    class_definition: &Value,
    options: Option<&Value>,
) -> Result<Factory, Error> {
    let class = match class_definition {
        Value::Class(class) => class.clone(),
        other => return Err(TypeConstraintError::new(Kind::Function, other.kind()).into()),
    };

    let options = match options {
        None | Some(Value::Undefined) => FactoryOptions::default(),
        Some(Value::Record(record)) => FactoryOptions::from_record(record)?,
        Some(other) => return Err(TypeConstraintError::new(Kind::Object, other.kind()).into()),
    };

    Ok(Factory::new(class, options))
}

/// Produces guarded views over fresh instances of one class.
///
/// Each factory owns its own resolved options; factories never share state
/// and never cache what they produce.
///
/// # Examples
///
/// ```
/// use guarded_factory::{ClassDefinition, Decide, Factory, FactoryOptions, Value};
///
/// let point = ClassDefinition::builder("Point")
///     .constructor(|args| {
///         Ok([
///             ("x".to_string(), args.first().cloned().unwrap_or_default()),
///             ("y".to_string(), args.get(1).cloned().unwrap_or_default()),
///         ]
///         .into_iter()
///         .collect())
///     })
///     .build();
///
/// let factory = Factory::new(
///     point,
///     FactoryOptions::default().with_decide(Decide::allow_names(["x"])),
/// );
/// let view = factory.create(&[Value::from(1), Value::from(2)]).unwrap();
///
/// assert_eq!(view.get("x").unwrap(), Value::from(1));
/// assert_eq!(view.get("y").unwrap(), Value::Undefined);
/// ```
pub struct Factory {
    class: ClassDefinition,
    options: Rc<FactoryOptions>,
}

impl Factory {
    /// Creates a factory from already typed arguments.
    pub fn new(class: ClassDefinition, options: FactoryOptions) -> Self {
        tracing::debug!(
            class = %class.name(),
            decide = ?options.decide,
            reveal_is_proxy = options.reveal_is_proxy,
            reference_class = options.reference_class,
            "factory created"
        );

        Self {
            class,
            options: Rc::new(options),
        }
    }

    /// Constructs one new instance and returns a guarded view over it.
    ///
    /// # Errors
    ///
    /// Errors raised by the class constructor are returned unchanged.
    pub fn create(&self, args: &[Value]) -> Result<GuardedView, Error> {
        let instance = self.class.construct(args)?;
        tracing::trace!(class = %self.class.name(), "guarded view created");

        Ok(GuardedView::new(
            instance,
            self.class.clone(),
            Rc::clone(&self.options),
        ))
    }

    /// Returns the class this factory constructs.
    pub fn class(&self) -> &ClassDefinition {
        &self.class
    }

    /// Returns the resolved options.
    pub fn options(&self) -> &FactoryOptions {
        &self.options
    }

    /// Returns the factory's name.
    pub fn name(&self) -> &'static str {
        "factory"
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("class", &self.class.name())
            .field("options", &self.options)
            .finish()
    }
}
