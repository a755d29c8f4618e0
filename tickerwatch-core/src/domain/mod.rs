//! Domain types shared across the monitor.

pub mod alert;
pub mod bar;
pub mod rule;
pub mod snapshot;
pub mod trigger;

pub use alert::Alert;
pub use bar::Bar;
pub use rule::Rule;
pub use snapshot::PriceSnapshot;
pub use trigger::{Severity, Trigger, TriggerKind};
