#![forbid(unsafe_code)]

//! Resolving a widget's starting (observable, value) pair.
//!
//! A widget constructor may be handed an existing observable, an explicit
//! starting value, both, or neither. [`Seed`] collects those inputs and
//! [`Seed::resolve`] turns them into one consistent [`Seeded`] pair with a
//! single source of truth:
//!
//! | observable | value | result                                          |
//! |------------|-------|-------------------------------------------------|
//! | yes        | yes   | observable overwritten with value (listeners fire) |
//! | yes        | no    | observable's current value read out             |
//! | no         | yes   | fresh observable holding value                  |
//! | no         | no    | fresh observable holding the default            |
//!
//! Values supplied through [`Seed::value_from`] go through a fallible
//! conversion; one that does not fit the element type fails the whole
//! resolution with [`BindError::TypeMismatch`] before anything is mutated.

use std::any::type_name;

use tether_core::{BindError, BindResult};

use super::observable::{NotifyPolicy, Observable};

/// Inputs for resolving a widget's observable and starting value.
#[derive(Debug)]
pub struct Seed<T> {
    observable: Option<Observable<T>>,
    value: Option<Result<T, BindError>>,
    policy: NotifyPolicy,
}

impl<T> Default for Seed<T> {
    fn default() -> Self {
        Self {
            observable: None,
            value: None,
            policy: NotifyPolicy::Always,
        }
    }
}

impl<T: Clone + PartialEq + 'static> Seed<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind to an existing (caller-owned) observable.
    #[must_use]
    pub fn observable(mut self, observable: Observable<T>) -> Self {
        self.observable = Some(observable);
        self
    }

    /// Start from an explicit value.
    #[must_use]
    pub fn value(mut self, value: T) -> Self {
        self.value = Some(Ok(value));
        self
    }

    /// Start from a value of another type, converted with `TryFrom`.
    #[must_use]
    pub fn value_from<V>(mut self, value: V) -> Self
    where
        T: TryFrom<V>,
    {
        self.value = Some(T::try_from(value).map_err(|_| BindError::TypeMismatch {
            expected: type_name::<T>(),
            found: type_name::<V>(),
        }));
        self
    }

    /// Notification policy for a freshly created observable.
    #[must_use]
    pub fn policy(mut self, policy: NotifyPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Whether an existing observable was supplied.
    #[must_use]
    pub fn has_observable(&self) -> bool {
        self.observable.is_some()
    }

    /// Produce the consistent pair, falling back to `default` when no value
    /// source was given.
    pub fn resolve(self, default: impl FnOnce() -> T) -> BindResult<Seeded<T>> {
        let value = self.value.transpose()?;
        match (self.observable, value) {
            (Some(observable), Some(value)) => {
                observable.set(value.clone())?;
                Ok(Seeded {
                    observable,
                    value,
                    owns: false,
                })
            }
            (Some(observable), None) => {
                let value = observable.get();
                Ok(Seeded {
                    observable,
                    value,
                    owns: false,
                })
            }
            (None, value) => {
                let value = value.unwrap_or_else(default);
                Ok(Seeded {
                    observable: Observable::with_policy(value.clone(), self.policy),
                    value,
                    owns: true,
                })
            }
        }
    }
}

/// A resolved (observable, value) pair.
#[derive(Debug)]
pub struct Seeded<T> {
    pub observable: Observable<T>,
    pub value: T,
    /// True when the observable was created here rather than supplied.
    pub owns: bool,
}

/// Function form of [`Seed::resolve`].
pub fn init_observable<T: Clone + PartialEq + 'static>(
    observable: Option<Observable<T>>,
    value: Option<T>,
    default: T,
) -> BindResult<Seeded<T>> {
    let mut seed = Seed::new();
    if let Some(observable) = observable {
        seed = seed.observable(observable);
    }
    if let Some(value) = value {
        seed = seed.value(value);
    }
    seed.resolve(|| default)
}
