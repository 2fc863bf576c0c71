/// clipregion - Clip-region engine for a window-management server
///
/// This library represents arbitrary 2D regions as minimal lists of
/// non-overlapping rectangles, combines them with boolean set operations,
/// and marshals them to and from request/reply buffers.

pub mod protocol;
pub mod policy;
pub mod region;
pub mod server;

pub use policy::MarshalPolicy;
pub use protocol::{ByteOrder, Rect, RegionData, RegionError, RegionResult};
pub use region::{CombineMode, Region};
pub use server::{RequestMarshaller, WindowSurface};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
