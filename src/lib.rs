//! Policy-filtered views over class instances.
//!
//! A [`Factory`] wraps a [`ClassDefinition`]. Every call to
//! [`Factory::create`] constructs a fresh instance and hands back a
//! [`GuardedView`] over it. Reads through the view are filtered live by a
//! [`Decide`] policy; the instance itself never escapes:
//!
//! - **Filtering**: properties the policy rejects read as [`Value::Undefined`]
//! - **Binding**: exposed methods come back bound to the instance
//! - **No leakage**: key enumeration is empty, and views and bound methods
//!   format without instance data
//!
//! # Core Types
//!
//! - [`Value`]: dynamically typed property values
//! - [`ClassDefinition`]: constructor plus methods, built with [`ClassBuilder`]
//! - [`FactoryOptions`]: policy and reserved-name switches
//! - [`Factory`]: produces guarded views
//! - [`GuardedView`]: the filtered, opaque view
//!
//! # Examples
//!
//! ```
//! use guarded_factory::{ClassDefinition, Decide, Factory, FactoryOptions, Value};
//!
//! let person = ClassDefinition::builder("Person")
//!     .constructor(|args| {
//!         let name = args.first().cloned().unwrap_or_default();
//!         Ok([("name".to_string(), name)].into_iter().collect())
//!     })
//!     .method("greet", |this, _| {
//!         Ok(Value::from(format!("Hello, my name is {}", this.get("name"))))
//!     })
//!     .build();
//!
//! // Only methods are visible
//! let factory = Factory::new(
//!     person,
//!     FactoryOptions::default().with_decide(Decide::custom(|_, value, _| value.is_callable())),
//! );
//!
//! let view = factory.create(&[Value::from("Quiet Joe")]).unwrap();
//! assert_eq!(view.get("name").unwrap(), Value::Undefined);
//! assert_eq!(
//!     view.call("greet", &[]).unwrap(),
//!     Value::from("Hello, my name is Quiet Joe")
//! );
//!
//! // The bound method does not reveal whom it is bound to
//! assert!(!view.get("greet").unwrap().to_string().contains("Quiet Joe"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod class;
mod error;
mod factory;
mod function;
mod options;
mod policy;
mod value;
mod view;

#[cfg(test)]
mod test_utils;

pub use class::{ClassBuilder, ClassDefinition, ConstructorFn, Instance, MethodFn};
pub use error::{Error, Raised, TypeConstraintError};
pub use factory::{Factory, create_factory};
pub use function::{Function, NativeFn};
pub use options::{
    DECIDE_KEY, DEFAULT_OPTIONS, FactoryOptions, REFERENCE_CLASS_KEY, REVEAL_IS_PROXY_KEY,
};
pub use policy::{Decide, DecideFn};
pub use value::{Kind, Record, Value};
pub use view::{CLASS, GuardedView, IS_PROXY, Placeholder};
