#![forbid(unsafe_code)]

//! Dropdowns: a list of labelled choices bound to `Observable<Option<String>>`.
//!
//! The native widget only knows option indices. [`ChoiceMap`] keeps the
//! label ↔ index mapping (indices are handed out in insertion order from 0)
//! and, for action-shaped dropdowns, the label → action mapping.
//!
//! # Invariants
//!
//! 1. Every native option has exactly one mapping entry and vice versa.
//! 2. Labels are unique.
//! 3. A dropdown keeps the shape it was built with; appending the other
//!    shape fails with [`BindError::ArgumentShape`] and changes nothing.
//! 4. Individual options cannot be removed; [`Dropdown::clear`] empties
//!    everything and restarts numbering at 0.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;
use tether_core::{BindError, BindResult, ChoiceNative, NativeWidget};
use tether_runtime::reactive::{Observable, Seed};

use crate::bound::Bound;
use crate::{WidgetKind, WidgetOptions, delegate_input_widget};

/// A batch of choices to show.
#[derive(Debug, Clone, PartialEq)]
pub enum Choices<A> {
    /// Plain labels; the selection is the label itself.
    Labels(Vec<String>),
    /// Labels paired with the value each one stands for.
    Actions(Vec<(String, A)>),
}

impl<A> Choices<A> {
    #[must_use]
    pub fn shape(&self) -> ChoiceShape {
        match self {
            Self::Labels(_) => ChoiceShape::Labels,
            Self::Actions(_) => ChoiceShape::Actions,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Labels(labels) => labels.len(),
            Self::Actions(actions) => actions.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn label_list(&self) -> Vec<&str> {
        match self {
            Self::Labels(labels) => labels.iter().map(String::as_str).collect(),
            Self::Actions(actions) => actions.iter().map(|(label, _)| label.as_str()).collect(),
        }
    }
}

impl Choices<()> {
    /// Label-shaped choices from anything string-like.
    pub fn labels<S: Into<String>>(labels: impl IntoIterator<Item = S>) -> Self {
        Self::Labels(labels.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceShape {
    Labels,
    Actions,
}

impl ChoiceShape {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Labels => "labels",
            Self::Actions => "label/action pairs",
        }
    }
}

impl fmt::Display for ChoiceShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Label ↔ index mapping, plus label → action for action-shaped lists.
#[derive(Debug, Clone)]
pub struct ChoiceMap<A> {
    shape: ChoiceShape,
    labels: Vec<String>,
    index: AHashMap<String, usize>,
    actions: AHashMap<String, A>,
}

impl<A: Clone> ChoiceMap<A> {
    #[must_use]
    pub fn new(shape: ChoiceShape) -> Self {
        Self {
            shape,
            labels: Vec::new(),
            index: AHashMap::new(),
            actions: AHashMap::new(),
        }
    }

    #[must_use]
    pub fn shape(&self) -> ChoiceShape {
        self.shape
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    #[must_use]
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    #[must_use]
    pub fn label_at(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn action(&self, label: &str) -> Option<&A> {
        self.actions.get(label)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.index.contains_key(label)
    }

    /// Check that `choices` can be appended as a whole.
    pub fn admit(&self, choices: &Choices<A>) -> BindResult {
        if choices.shape() != self.shape {
            return Err(BindError::ArgumentShape {
                expected: self.shape.name(),
                found: choices.shape().name(),
            });
        }
        let mut fresh = ahash::AHashSet::with_capacity(choices.len());
        for label in choices.label_list() {
            if self.contains(label) || !fresh.insert(label) {
                return Err(BindError::DuplicateChoice(label.to_owned()));
            }
        }
        Ok(())
    }

    /// Append after [`Self::admit`] succeeded. Returns the new labels in
    /// index order.
    fn extend(&mut self, choices: Choices<A>) -> Vec<String> {
        let entries: Vec<(String, Option<A>)> = match choices {
            Choices::Labels(labels) => labels.into_iter().map(|l| (l, None)).collect(),
            Choices::Actions(actions) => actions.into_iter().map(|(l, a)| (l, Some(a))).collect(),
        };
        let mut added = Vec::with_capacity(entries.len());
        for (label, action) in entries {
            self.index.insert(label.clone(), self.labels.len());
            if let Some(action) = action {
                self.actions.insert(label.clone(), action);
            }
            self.labels.push(label.clone());
            added.push(label);
        }
        added
    }

    fn clear(&mut self) {
        self.labels.clear();
        self.index.clear();
        self.actions.clear();
    }
}

/// A dropdown bound to the selected label.
///
/// `A` is the action type of action-shaped dropdowns; label-shaped ones use
/// the default `()`.
pub struct Dropdown<N: ChoiceNative, A: Clone + PartialEq + 'static = ()> {
    kind: WidgetKind,
    bound: Bound<N, Option<String>>,
    choices: Rc<RefCell<ChoiceMap<A>>>,
    mapped: Option<Observable<Option<A>>>,
}

impl<N, A> Dropdown<N, A>
where
    N: ChoiceNative,
    A: Clone + PartialEq + 'static,
{
    /// Populate `native` with `choices` and bind the selection.
    ///
    /// A starting selection that is not among the choices fails with
    /// [`BindError::UnknownChoice`].
    pub fn bind(
        native: Rc<N>,
        choices: Choices<A>,
        seed: Seed<Option<String>>,
        opts: &WidgetOptions,
    ) -> BindResult<Self> {
        let mut map = ChoiceMap::new(choices.shape());
        map.admit(&choices)?;
        let seeded = seed.policy(opts.policy()).resolve(|| None)?;
        if let Some(label) = &seeded.value
            && !choices.label_list().contains(&label.as_str())
        {
            return Err(BindError::UnknownChoice(label.clone()));
        }

        native.clear_options();
        for label in map.extend(choices) {
            native.append_option(&label);
        }
        let selected = seeded.value.as_deref().and_then(|l| map.index_of(l));
        native.set_display(selected)?;

        let choices = Rc::new(RefCell::new(map));
        let mut bound = Bound::new(native, seeded, opts.resolved_ownership());

        let forward_map = Rc::clone(&choices);
        bound.connect_forward(move |native, obs| {
            let label = native
                .display()
                .and_then(|index| forward_map.borrow().label_at(index).map(str::to_owned));
            obs.set(label)
        });

        let read_map = Rc::clone(&choices);
        let write_map = Rc::clone(&choices);
        bound.connect_reverse(
            move |native| {
                Some(
                    native
                        .display()
                        .and_then(|index| read_map.borrow().label_at(index).map(str::to_owned)),
                )
            },
            move |native, label| {
                let index = match label {
                    Some(label) => Some(
                        write_map
                            .borrow()
                            .index_of(label)
                            .ok_or_else(|| BindError::UnknownChoice(label.clone()))?,
                    ),
                    None => None,
                };
                native.set_display(index)
            },
        );

        let mapped = (choices.borrow().shape() == ChoiceShape::Actions).then(|| {
            let action_map = Rc::clone(&choices);
            bound.observable().map(move |label: &Option<String>| {
                label
                    .as_deref()
                    .and_then(|l| action_map.borrow().action(l).cloned())
            })
        });

        Ok(Self {
            kind: WidgetKind::Dropdown,
            bound,
            choices,
            mapped,
        })
    }

    /// Append more choices of the same shape. All-or-nothing.
    pub fn append(&self, choices: Choices<A>) -> BindResult {
        self.choices.borrow().admit(&choices)?;
        let added = self.choices.borrow_mut().extend(choices);
        self.bound.with_native_blocked(|native| {
            for label in &added {
                native.append_option(label);
            }
        });
        Ok(())
    }

    /// Remove every choice and deselect. Numbering restarts at 0.
    pub fn clear(&self) -> BindResult {
        self.choices.borrow_mut().clear();
        self.bound.with_native_blocked(|native| native.clear_options());
        if self.bound.observable().with(Option::is_some) {
            self.bound.observable().set(None)?;
        }
        Ok(())
    }

    /// Select `label`, or nothing with `None`.
    pub fn select(&self, label: Option<&str>) -> BindResult {
        if let Some(label) = label
            && !self.choices.borrow().contains(label)
        {
            return Err(BindError::UnknownChoice(label.to_owned()));
        }
        self.bound.observable().set(label.map(str::to_owned))
    }

    /// The selection projected through the action map; `None` for
    /// label-shaped dropdowns.
    #[must_use]
    pub fn mapped(&self) -> Option<Observable<Option<A>>> {
        self.mapped.clone()
    }

    /// Action of the current selection.
    #[must_use]
    pub fn selected_action(&self) -> Option<A> {
        let label = self.bound.observable().get()?;
        self.choices.borrow().action(&label).cloned()
    }

    #[must_use]
    pub fn choices(&self) -> std::cell::Ref<'_, ChoiceMap<A>> {
        self.choices.borrow()
    }

    #[must_use]
    pub fn native(&self) -> &Rc<N> {
        self.bound.native()
    }
}

delegate_input_widget!(
    Dropdown<N, A> where [N: ChoiceNative, A: Clone + PartialEq + 'static],
    Option<String>,
    bound
);
