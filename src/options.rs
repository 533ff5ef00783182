use crate::error::{Error, TypeConstraintError};
use crate::policy::Decide;
use crate::value::{Kind, Record, Value};

/// Record key of the visibility policy.
pub const DECIDE_KEY: &str = "decide";
/// Record key of the `isProxy` switch.
pub const REVEAL_IS_PROXY_KEY: &str = "revealIsProxy";
/// Record key of the `class` switch.
pub const REFERENCE_CLASS_KEY: &str = "referenceClass";

/// Options used when the caller supplies none.
///
/// Every property visible, both reserved names inactive.
pub const DEFAULT_OPTIONS: FactoryOptions = FactoryOptions {
    decide: Decide::AllowAll,
    reveal_is_proxy: false,
    reference_class: false,
};

/// Resolved configuration of a factory.
///
/// # Examples
///
/// ```
/// use guarded_factory::{Decide, FactoryOptions};
///
/// let options = FactoryOptions::default()
///     .with_decide(Decide::allow_names(["name"]))
///     .reveal_is_proxy(true);
///
/// assert!(options.reveal_is_proxy);
/// assert!(!options.reference_class);
/// ```
#[derive(Debug, Clone)]
pub struct FactoryOptions {
    /// Visibility policy consulted on every instance property read
    pub decide: Decide,
    /// When set, `isProxy` reads as `true`
    pub reveal_is_proxy: bool,
    /// When set, `class` reads as the class definition
    pub reference_class: bool,
}

impl FactoryOptions {
    /// Replaces the visibility policy.
    pub fn with_decide(mut self, decide: Decide) -> Self {
        self.decide = decide;
        self
    }

    /// Enables or disables the `isProxy` marker.
    pub fn reveal_is_proxy(mut self, enabled: bool) -> Self {
        self.reveal_is_proxy = enabled;
        self
    }

    /// Enables or disables the `class` marker.
    pub fn reference_class(mut self, enabled: bool) -> Self {
        self.reference_class = enabled;
        self
    }

    /// Merges a configuration record over [`DEFAULT_OPTIONS`].
    ///
    /// Fields are merged one by one. A field that is absent, `null`,
    /// `undefined` or otherwise falsy keeps its default. Unrecognized fields
    /// are ignored.
    ///
    /// # Errors
    ///
    /// Returns a type-constraint error if `decide` is set to something that
    /// cannot be called.
    pub fn from_record(record: &Record) -> Result<Self, Error> {
        let mut options = DEFAULT_OPTIONS;

        match record.get(DECIDE_KEY) {
            Some(Value::Function(f)) => options.decide = Decide::Dynamic(f.clone()),
            Some(other) if other.is_truthy() => {
                return Err(TypeConstraintError::new(Kind::Callable, other.kind()).into());
            }
            _ => {}
        }

        options.reveal_is_proxy = record
            .get(REVEAL_IS_PROXY_KEY)
            .is_some_and(Value::is_truthy);
        options.reference_class = record
            .get(REFERENCE_CLASS_KEY)
            .is_some_and(Value::is_truthy);

        Ok(options)
    }
}

impl Default for FactoryOptions {
    fn default() -> Self {
        DEFAULT_OPTIONS
    }
}
