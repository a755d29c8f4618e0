//! Trigger identity and alert severity.

use serde::{Deserialize, Serialize};

/// Stable identity of a trigger's kind — the dedup key.
///
/// The rendered detail text is regenerated every run; identity is never
/// recovered by reparsing text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    Low,
    High,
    Up,
    Down,
    Regime,
    CupHandle,
    Ur,
    HChannel,
}

impl TriggerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TriggerKind::Low => "low",
            TriggerKind::High => "high",
            TriggerKind::Up => "up",
            TriggerKind::Down => "down",
            TriggerKind::Regime => "regime",
            TriggerKind::CupHandle => "cup_handle",
            TriggerKind::Ur => "ur",
            TriggerKind::HChannel => "h_channel",
        }
    }
}

/// One trigger reason: identity plus formatted numeric detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub kind: TriggerKind,
    pub detail: String,
}

impl Trigger {
    pub fn new(kind: TriggerKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

/// Alert severity, derived from the union of trigger kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Up,
    Down,
    Info,
}

impl Severity {
    /// Down-type kinds win over up-type when both are present. Undercut &
    /// rally counts as up-type; the remaining pattern kinds are neutral.
    pub fn from_kinds<I: IntoIterator<Item = TriggerKind>>(kinds: I) -> Self {
        let mut up = false;
        for kind in kinds {
            match kind {
                TriggerKind::Down | TriggerKind::Low => return Severity::Down,
                TriggerKind::Up | TriggerKind::High | TriggerKind::Ur => up = true,
                TriggerKind::Regime | TriggerKind::CupHandle | TriggerKind::HChannel => {}
            }
        }
        if up {
            Severity::Up
        } else {
            Severity::Info
        }
    }
}
