pub mod handles;
pub mod hit;
pub mod outline;

pub use handles::{Handle, hit_handle};
pub use hit::{element_transform, hit_test};
pub use outline::outline;
