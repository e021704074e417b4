use crate::domain::error::AppError;
use crate::domain::traits::CopyShortcut;
use enigo::{Direction, Enigo, Key, Keyboard, Settings};

#[cfg(target_os = "macos")]
const COPY_MODIFIER: Key = Key::Meta;
#[cfg(not(target_os = "macos"))]
const COPY_MODIFIER: Key = Key::Control;

fn input_err(e: impl std::fmt::Display) -> AppError {
    AppError::Input(e.to_string())
}

/// Posts a low-level copy shortcut to whatever has focus.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnigoShortcut;

impl CopyShortcut for EnigoShortcut {
    fn send_copy(&self) -> Result<(), AppError> {
        let mut enigo = Enigo::new(&Settings::default()).map_err(input_err)?;
        enigo.key(COPY_MODIFIER, Direction::Press).map_err(input_err)?;
        let pressed = enigo.key(Key::Unicode('c'), Direction::Click);
        // release the modifier even if the `c` click failed
        enigo
            .key(COPY_MODIFIER, Direction::Release)
            .map_err(input_err)?;
        pressed.map_err(input_err)
    }
}
