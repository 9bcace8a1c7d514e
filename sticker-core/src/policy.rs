use serde::{Deserialize, Serialize};

/// What a run does when one entry fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the run on the first error and report it.
    #[default]
    FailFast,
    /// Record the error, skip the entry (or pack) and keep going.
    Continue,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPolicy {
    pub on_error: FailurePolicy,
    /// Stickers accepted per pack; top-level stickers share one pseudo-pack.
    pub max_pack_size: Option<usize>,
    pub max_stickers: Option<usize>,
}

impl ImportPolicy {
    pub fn fail_fast() -> Self {
        Self::default()
    }

    pub fn keep_going() -> Self {
        Self {
            on_error: FailurePolicy::Continue,
            ..Self::default()
        }
    }
}
