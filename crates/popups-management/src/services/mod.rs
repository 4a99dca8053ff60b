pub mod lookup_service;
pub mod popup_service;
pub mod retrieval;
pub mod schedule_service;
pub mod variant_service;

pub use lookup_service::{PopupLayoutTypeService, PopupTypeService};
pub use popup_service::{PopupService, PRIMARY_VARIANT_NAME};
pub use retrieval::{
    PopupCollection, PopupRetrievalService, PopupWithPrimaryVariant, RetrievalParams,
    RetrievalStrategy,
};
pub use schedule_service::PopupScheduleService;
pub use variant_service::PopupVariantService;
