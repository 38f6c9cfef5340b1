//! The form store (named mapping of [`Form`]s) and the process-wide mode
//! bank, kept as plain owned state rather than singletons — both are meant
//! to be held inside `trac-eval`'s `Interpreter` and threaded explicitly.

pub mod mode;

pub use mode::ModeState;
pub use trac_text::Form;

use std::collections::HashMap;
use tracing::trace;

/// Name → [`Form`] mapping. Iteration order is unspecified (`HashMap`);
/// `LN` is responsible for any ordering it wants to present.
#[derive(Debug, Default)]
pub struct FormStore {
    forms: HashMap<String, Form>,
}

impl FormStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// `DS`: create or replace a form, cursor at the left edge.
    pub fn define(&mut self, name: &str, text: &str) {
        trace!(target: "form.mutate", name, "define");
        self.forms.insert(name.to_string(), Form::new(name, text));
    }

    pub fn get(&self, name: &str) -> Option<&Form> {
        self.forms.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Form> {
        self.forms.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.forms.contains_key(name)
    }

    /// Insert a form wholesale (used by `trac-persist`'s `FB`), overwriting
    /// any existing form of the same name.
    pub fn insert(&mut self, form: Form) {
        self.forms.insert(form.name().to_string(), form);
    }

    /// Remove and return a form by name, for `SB`.
    pub fn take(&mut self, name: &str) -> Option<Form> {
        self.forms.remove(name)
    }

    /// `DD`: delete named forms; returns the names that were not found.
    ///
    /// When `unforgiving` is set, mutation stops at the first missing name
    /// — names after it are left untouched, matching `trac.py`'s
    /// `deletedef`, whose `FNFError` raises out of the loop on the first
    /// miss rather than letting it run to completion.
    pub fn delete(&mut self, names: &[String], unforgiving: bool) -> Vec<String> {
        let mut missing = Vec::new();
        for name in names {
            if self.forms.remove(name).is_none() {
                missing.push(name.clone());
                if unforgiving {
                    break;
                }
            }
        }
        missing
    }

    /// `DA`: empty the store.
    pub fn delete_all(&mut self) {
        trace!(target: "form.mutate", "delete_all");
        self.forms.clear();
    }

    /// `LN`: every form name, in unspecified order (callers sort or join
    /// as needed).
    pub fn names(&self) -> Vec<&str> {
        self.forms.keys().map(String::as_str).collect()
    }

    /// Validate every form, returning a flat list of invariant-violation
    /// descriptions. Never aborts — callers log these and move on.
    pub fn validate_all(&self) -> Vec<String> {
        self.forms.values().flat_map(|f| f.validate()).collect()
    }
}
