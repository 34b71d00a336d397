//! Recording fakes for the controller's collaborators, used across the unit
//! and integration tests.

mod backend;
mod notifier;
mod session;
mod window;

pub use backend::MockBackend;
pub use notifier::MockNotifier;
pub use session::MockSessionFactory;
pub use window::MockWindow;
