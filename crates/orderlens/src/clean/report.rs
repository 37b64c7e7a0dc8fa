//! What a cleaning run changed.

use serde::{Deserialize, Serialize};

/// Summary of a [`clean_with_report`](super::clean_with_report) run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleaningReport {
    /// Rows in the input table.
    pub original_rows: usize,

    /// Rows in the cleaned table.
    pub cleaned_rows: usize,

    /// `original_rows - cleaned_rows`.
    pub removed_rows: usize,

    /// One entry per step that ran, in execution order.
    pub steps: Vec<CleaningStep>,
}

/// A single cleaning step and its effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningStep {
    /// Step name, e.g. `drop_nulls` or `fill_null`.
    pub operation: String,

    /// Column affected, for per-column steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    /// Rows removed by this step.
    pub rows_removed: usize,

    /// Values rewritten in place by this step.
    pub values_changed: usize,
}

impl CleaningStep {
    pub(crate) fn rows(operation: &str, rows_removed: usize) -> Self {
        Self {
            operation: operation.to_string(),
            column: None,
            rows_removed,
            values_changed: 0,
        }
    }

    pub(crate) fn values(operation: &str, column: Option<&str>, values_changed: usize) -> Self {
        Self {
            operation: operation.to_string(),
            column: column.map(str::to_string),
            rows_removed: 0,
            values_changed,
        }
    }
}

impl CleaningReport {
    pub(crate) fn new(original_rows: usize) -> Self {
        Self {
            original_rows,
            cleaned_rows: original_rows,
            ..Self::default()
        }
    }

    /// Record a step and update the row totals.
    pub(crate) fn add_step(&mut self, step: CleaningStep) {
        self.cleaned_rows = self.cleaned_rows.saturating_sub(step.rows_removed);
        self.removed_rows = self.original_rows - self.cleaned_rows;
        self.steps.push(step);
    }

    /// Total values rewritten across all steps.
    pub fn values_changed(&self) -> usize {
        self.steps.iter().map(|s| s.values_changed).sum()
    }
}
