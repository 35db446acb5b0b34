//! Menu management: platform gating rules and bulk availability updates

pub mod availability;
pub mod bulk;

pub use availability::apply_platform_change;
pub use bulk::{BulkAvailabilityService, Clock, DishBatchStore, SqlxDishStore, SystemClock};
