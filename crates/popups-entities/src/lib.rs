pub mod types;

pub mod popup_types;
pub mod popup_layout_types;
pub mod popups;
pub mod popup_variants;
pub mod popup_schedules;
pub mod popup_analytics;

pub use types::{DeviceType, DisplayPages, PopupContent};
