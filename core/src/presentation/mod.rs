pub mod dashboard;
pub mod session;
pub mod state;

pub use dashboard::{Dashboard, DashboardStatus};
pub use session::Session;
pub use state::{DisplayState, LastKnown};
