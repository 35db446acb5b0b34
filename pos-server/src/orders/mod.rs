//! Order lifecycle: placement and status transitions

pub mod placement;
pub mod transitions;

pub use placement::place_order;
pub use transitions::{update_kitchen_status, update_order_status};
