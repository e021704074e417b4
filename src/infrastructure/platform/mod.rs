pub mod accessibility;
pub mod clipboard;
pub mod keyboard;

pub use accessibility::SystemAccessibility;
pub use clipboard::SystemClipboard;
pub use keyboard::EnigoShortcut;
