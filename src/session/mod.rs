mod notice;
mod pick;
mod session;

pub use notice::{DEFAULT_NOTICE_MS, Notice};
pub use pick::PointPick;
pub use session::Session;
