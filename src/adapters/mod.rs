//! Concrete collaborator implementations: the terminal window, the desktop
//! notifier, a loopback demo backend, and recording mocks for tests.

pub mod desktop;
pub mod loopback;
pub mod mock;
pub mod terminal;

pub use desktop::DesktopNotifier;
pub use loopback::LoopbackSessionFactory;
pub use terminal::TerminalWindow;
