use std::fmt;
use std::rc::Rc;

use crate::class::{ClassDefinition, Instance};
use crate::error::Error;
use crate::options::FactoryOptions;
use crate::value::{Kind, Record, Value};

/// Reserved property name answering "is this a guarded view".
///
/// Only active when [`FactoryOptions::reveal_is_proxy`] is set.
pub const IS_PROXY: &str = "isProxy";

/// Reserved property name resolving to the class definition.
///
/// Only active when [`FactoryOptions::reference_class`] is set.
pub const CLASS: &str = "class";

/// The empty target a guarded view stands in front of.
///
/// Introspecting a view ends here: the placeholder owns nothing, so even
/// direct access to it reveals neither keys nor the wrapped instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Placeholder {
    _private: (),
}

impl Placeholder {
    /// Returns the placeholder's own keys. Always empty.
    pub fn own_keys(&self) -> Vec<String> {
        Vec::new()
    }
}

/// An opaque, policy-filtered view over an instance.
///
/// Every read goes through [`get`](Self::get), which decides live whether the
/// instance member is visible. The view holds no copy of instance data.
///
/// # Security Properties
///
/// - No accessor returns the wrapped instance
/// - Key, symbol and descriptor enumeration are always empty
/// - `Debug` output contains no instance data
/// - Methods come back bound to the instance and format as a bare signature
/// - There is no write, delete or define operation
///
/// # Lifetime
///
/// The instance lives as long as the view or any bound method read from it.
/// Storing a bound method back into its own instance (for example through
/// [`Instance::set`]) creates a reference cycle, and that instance is then
/// never freed.
///
/// # Examples
///
/// ```
/// use guarded_factory::{ClassDefinition, Value, create_factory};
///
/// let account = ClassDefinition::builder("Account")
///     .constructor(|args| {
///         let owner = args.first().cloned().unwrap_or_default();
///         Ok([("owner".to_string(), owner), ("pin".to_string(), Value::from(1234))]
///             .into_iter()
///             .collect())
///     })
///     .build();
///
/// let options = Value::record([(
///     "decide",
///     Value::Function(guarded_factory::Function::new("decide", |args| {
///         Ok(Value::Bool(args[0] != Value::from("pin")))
///     })),
/// )]);
/// let factory = create_factory(&Value::Class(account), Some(&options)).unwrap();
/// let view = factory.create(&[Value::from("ada")]).unwrap();
///
/// assert_eq!(view.get("owner").unwrap(), Value::from("ada"));
/// assert_eq!(view.get("pin").unwrap(), Value::Undefined);
/// assert!(view.own_keys().is_empty());
/// ```
pub struct GuardedView {
    target: Placeholder,
    instance: Rc<Instance>,
    class: ClassDefinition,
    options: Rc<FactoryOptions>,
}

impl GuardedView {
    /// Wraps a freshly constructed instance.
    ///
    /// This is `pub(crate)`: views only come out of a factory.
    pub(crate) fn new(
        instance: Instance,
        class: ClassDefinition,
        options: Rc<FactoryOptions>,
    ) -> Self {
        Self {
            target: Placeholder::default(),
            instance: Rc::new(instance),
            class,
            options,
        }
    }

    /// Reads a property through the interception layer.
    ///
    /// Resolution order:
    /// 1. `isProxy` when revealed reads as `true`
    /// 2. `class` when referenced reads as the class definition
    /// 3. names the instance does not have read as `Undefined`
    /// 4. names the policy rejects read as `Undefined`
    /// 5. methods come back bound to the instance, other values as-is
    ///
    /// Reserved names win over instance members with the same name. Steps 1-3
    /// never consult the policy.
    ///
    /// # Errors
    ///
    /// Errors raised by a dynamic policy are returned unchanged.
    pub fn get(&self, property: &str) -> Result<Value, Error> {
        if self.options.reveal_is_proxy && property == IS_PROXY {
            return Ok(Value::Bool(true));
        }

        if self.options.reference_class && property == CLASS {
            return Ok(Value::Class(self.class.clone()));
        }

        if !self.instance.has(property) {
            return Ok(Value::Undefined);
        }

        let Some(member) = Instance::member(&self.instance, property) else {
            return Ok(Value::Undefined);
        };

        if !self.options.decide.allows(property, &member, &self.class)? {
            tracing::trace!(class = %self.class.name(), property, "property suppressed");
            return Ok(Value::Undefined);
        }

        Ok(member)
    }

    /// Reads a property and invokes it.
    ///
    /// # Errors
    ///
    /// Returns a type-constraint error if the property is suppressed, missing
    /// or not callable. Errors raised by the policy or by the method itself
    /// are returned unchanged.
    pub fn call(&self, property: &str, args: &[Value]) -> Result<Value, Error> {
        match self.get(property)? {
            Value::Function(f) => f.call(args),
            other => Err(Error::type_constraint(Kind::Callable, other.kind())),
        }
    }

    /// Returns true if the `isProxy` marker is enabled for this view.
    ///
    /// An instance field named `isProxy` never counts.
    pub fn is_proxy(&self) -> bool {
        self.options.reveal_is_proxy
    }

    /// Returns the class definition if the `class` marker is enabled.
    ///
    /// An instance field named `class` never counts.
    pub fn class(&self) -> Option<ClassDefinition> {
        self.options.reference_class.then(|| self.class.clone())
    }

    /// Returns the view's own property keys. Always empty.
    pub fn own_keys(&self) -> Vec<String> {
        self.target.own_keys()
    }

    /// Returns the view's own symbol keys. Always empty.
    pub fn own_symbols(&self) -> Vec<String> {
        Vec::new()
    }

    /// Returns the view's own property descriptors. Always empty.
    pub fn own_property_descriptors(&self) -> Record {
        Record::new()
    }

    /// Returns the placeholder the view stands in front of.
    pub fn target(&self) -> &Placeholder {
        &self.target
    }
}

impl fmt::Debug for GuardedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuardedView").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use crate::factory::Factory;
    use crate::function::Function;
    use crate::policy::Decide;
    use crate::test_utils::{person_args, person_class};

    fn view_with(options: FactoryOptions) -> GuardedView {
        Factory::new(person_class(), options)
            .create(&[person_args("John Doe", 42)])
            .unwrap()
    }

    #[test]
    fn default_view_forwards_fields_and_methods() {
        let view = view_with(FactoryOptions::default());

        assert_eq!(view.get("name").unwrap(), Value::from("John Doe"));
        assert_eq!(view.get("age").unwrap(), Value::from(42));
        assert_eq!(
            view.call("greet", &[]).unwrap(),
            Value::from("Hello, my name is John Doe and I am 42 years old.")
        );
    }

    #[test]
    fn unknown_members_read_as_undefined() {
        let view = view_with(FactoryOptions::default());
        assert_eq!(view.get("salary").unwrap(), Value::Undefined);
    }

    #[test]
    fn reserved_names_inactive_by_default() {
        let view = view_with(FactoryOptions::default());

        assert_eq!(view.get(IS_PROXY).unwrap(), Value::Undefined);
        assert_eq!(view.get(CLASS).unwrap(), Value::Undefined);
        assert!(!view.is_proxy());
        assert!(view.class().is_none());
    }

    #[test]
    fn reveal_is_proxy_reads_true() {
        let view = view_with(FactoryOptions::default().reveal_is_proxy(true));
        assert_eq!(view.get(IS_PROXY).unwrap(), Value::Bool(true));
        assert!(view.is_proxy());
    }

    #[test]
    fn reference_class_reads_the_class_itself() {
        let class = person_class();
        let view = Factory::new(class.clone(), FactoryOptions::default().reference_class(true))
            .create(&[person_args("John Doe", 42)])
            .unwrap();

        assert!(view.class().unwrap().ptr_eq(&class));
        assert_eq!(view.get(CLASS).unwrap(), Value::Class(class));
    }

    #[test]
    fn reserved_names_bypass_the_policy() {
        let view = view_with(
            FactoryOptions::default()
                .with_decide(Decide::custom(|_, _, _| false))
                .reveal_is_proxy(true)
                .reference_class(true),
        );

        assert!(view.is_proxy());
        assert!(view.class().is_some());
        assert_eq!(view.get("name").unwrap(), Value::Undefined);
    }

    #[test]
    fn suppressed_method_cannot_be_called() {
        let view = view_with(FactoryOptions::default().with_decide(Decide::deny_names(["greet"])));

        assert_eq!(view.get("greet").unwrap(), Value::Undefined);
        let err = view.call("greet", &[]).unwrap_err();
        assert_eq!(err.to_string(), "TypeError: Expected Callable, got undefined.");
    }

    #[test]
    fn calling_a_field_is_type_error() {
        let view = view_with(FactoryOptions::default());
        let err = view.call("name", &[]).unwrap_err();
        assert_eq!(err, Error::type_constraint(Kind::Callable, Kind::String));
    }

    #[test]
    fn method_mutations_are_observed_live() {
        let view = view_with(FactoryOptions::default());

        assert_eq!(view.call("birthday", &[]).unwrap(), Value::from(43));
        assert_eq!(view.get("age").unwrap(), Value::from(43));
    }

    #[test]
    fn bound_methods_reach_other_members() {
        let view = view_with(FactoryOptions::default().with_decide(Decide::allow_names(["introduce"])));

        let introduce = view.get("introduce").unwrap();
        let Value::Function(f) = introduce else {
            panic!("introduce should be visible");
        };
        assert_eq!(
            f.call(&[Value::from("Jane")]).unwrap(),
            Value::from("Jane, Hello, my name is John Doe and I am 42 years old.")
        );
    }

    #[test]
    fn introspection_is_empty() {
        let view = view_with(FactoryOptions::default());

        assert!(view.own_keys().is_empty());
        assert!(view.own_symbols().is_empty());
        assert!(view.own_property_descriptors().is_empty());
        assert!(view.target().own_keys().is_empty());
    }

    #[test]
    fn debug_reveals_nothing() {
        let view = view_with(FactoryOptions::default());
        let debug = format!("{:?}", view);

        assert_eq!(debug, "GuardedView { .. }");
        assert!(!debug.contains("John Doe"));
    }

    #[test]
    fn repeated_reads_are_equal() {
        let view = view_with(FactoryOptions::default());

        assert_eq!(view.get("name").unwrap(), view.get("name").unwrap());
        assert_eq!(view.get("greet").unwrap(), view.get("greet").unwrap());
    }

    #[test]
    fn absent_names_never_reach_the_policy() {
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let view = view_with(FactoryOptions::default().with_decide(Decide::custom(
            move |_, _, _| {
                counter.set(counter.get() + 1);
                true
            },
        )));

        assert_eq!(view.get("salary").unwrap(), Value::Undefined);
        assert_eq!(calls.get(), 0);

        assert_eq!(view.get("name").unwrap(), Value::from("John Doe"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn raising_policy_error_reaches_the_caller() {
        let decide = Decide::Dynamic(Function::new("decide", |_| {
            Err(Error::raise("decide exploded"))
        }));
        let view = view_with(FactoryOptions::default().with_decide(decide));

        assert_eq!(view.get("name"), Err(Error::raise("decide exploded")));
        assert_eq!(view.call("greet", &[]), Err(Error::raise("decide exploded")));

        // Absent names short-circuit before the policy runs
        assert_eq!(view.get("salary"), Ok(Value::Undefined));
    }

    #[test]
    fn marker_helpers_ignore_instance_fields() {
        let class = ClassDefinition::builder("Shadowing")
            .constructor(|_| {
                Ok([
                    (IS_PROXY.to_string(), Value::Bool(true)),
                    (CLASS.to_string(), Value::Class(person_class())),
                ]
                .into_iter()
                .collect())
            })
            .build();
        let view = Factory::new(class, FactoryOptions::default())
            .create(&[])
            .unwrap();

        assert_eq!(view.get(IS_PROXY).unwrap(), Value::Bool(true));
        assert!(!view.is_proxy());
        assert!(matches!(view.get(CLASS).unwrap(), Value::Class(_)));
        assert!(view.class().is_none());
    }

    #[test]
    fn instance_is_freed_with_its_view() {
        let view = view_with(FactoryOptions::default());
        let instance = Rc::downgrade(&view.instance);

        let greet = view.get("greet").unwrap();
        drop(view);
        assert!(instance.upgrade().is_some(), "bound method keeps its receiver");

        drop(greet);
        assert!(instance.upgrade().is_none());
    }
}
