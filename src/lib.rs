#![forbid(unsafe_code)]

pub mod compose;
pub mod error;
pub mod layout;
pub mod model;

pub use compose::{ComposeSettings, compose, decode_source, prepare_source};
pub use error::{SpanwallError, SpanwallResult};
pub use layout::{CropRect, LayoutPlan, MonitorPlacement, NormalizedLayout, compute_layout};
pub use model::{MonitorSpec, PhysicalSize};
