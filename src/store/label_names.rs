use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::ClassLabel;
use crate::error::{ViewError, ViewResult};

/// What to do when a label has no display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelNamePolicy {
    /// Substitute `"Label <id>"` and log a warning.
    #[default]
    Placeholder,
    /// Report [`ViewError::UnknownLabel`].
    FailFast,
}

/// Display names keyed by the label's string form (`"0"`, `"alpha"`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelNameTable {
    names: IndexMap<String, String>,
    policy: LabelNamePolicy,
}

impl LabelNameTable {
    #[must_use]
    pub fn new(policy: LabelNamePolicy) -> Self {
        Self {
            names: IndexMap::new(),
            policy,
        }
    }

    #[must_use]
    pub fn policy(&self) -> LabelNamePolicy {
        self.policy
    }

    pub fn replace(&mut self, names: IndexMap<String, String>) {
        self.names = names;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn get(&self, label: &ClassLabel) -> Option<&str> {
        self.names.get(&label.lookup_key()).map(String::as_str)
    }

    pub fn resolve(&self, label: &ClassLabel) -> ViewResult<String> {
        if let Some(name) = self.get(label) {
            return Ok(name.to_owned());
        }
        match self.policy {
            LabelNamePolicy::Placeholder => {
                warn!(%label, "label has no display name, using placeholder");
                Ok(format!("Label {label}"))
            }
            LabelNamePolicy::FailFast => Err(ViewError::UnknownLabel(label.to_string())),
        }
    }

    /// Under `FailFast`, reports the first of `labels` missing from `names`.
    ///
    /// Run against an incoming table before it replaces this one, so a
    /// rejected dataset never reaches the store.
    pub fn ensure_named_in<'a>(
        &self,
        names: &IndexMap<String, String>,
        labels: impl IntoIterator<Item = &'a ClassLabel>,
    ) -> ViewResult<()> {
        if self.policy == LabelNamePolicy::Placeholder {
            return Ok(());
        }
        match labels
            .into_iter()
            .find(|label| !names.contains_key(&label.lookup_key()))
        {
            Some(label) => Err(ViewError::UnknownLabel(label.to_string())),
            None => Ok(()),
        }
    }

    /// [`Self::ensure_named_in`] against the current table.
    pub fn ensure_named<'a>(
        &self,
        labels: impl IntoIterator<Item = &'a ClassLabel>,
    ) -> ViewResult<()> {
        self.ensure_named_in(&self.names, labels)
    }
}
