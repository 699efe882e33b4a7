pub mod api;
pub mod content;
pub mod desktop;
pub mod desktop_window;
pub mod route;

pub use desktop::DesktopShell;
pub use desktop_window::FloatingWindow;
