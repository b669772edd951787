//! The [`Surface`] trait: the render target a typewriter draws into.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A surface shared between the typing task and the cursor blink task.
pub type SharedSurface = Arc<Mutex<dyn Surface>>;

/// A visual element that displays text and, optionally, a cursor node next to it.
///
/// Only the text and color methods are required. The cursor methods default
/// to no-ops, so a surface without a cursor node only implements three
/// methods.
///
/// Render calls cannot fail. Implementations that write to an I/O sink
/// should log and swallow their own errors.
pub trait Surface: Send {
    /// The text currently shown, used to detect pre-existing content.
    fn text(&self) -> String;

    /// Replace the displayed text.
    fn set_text(&mut self, text: &str);

    /// Apply a color descriptor such as `"red"`, `"#ff8800"` or `"inherit"`.
    fn set_color(&mut self, color: &str);

    /// Whether this handle refers to a usable visual element.
    fn is_element(&self) -> bool {
        true
    }

    /// Create the cursor node adjacent to the text.
    fn attach_cursor(&mut self, _glyph: &str, _blink: Duration) {}

    /// Show or hide the cursor node entirely.
    fn set_cursor_displayed(&mut self, _displayed: bool) {}

    /// Blink phase: `true` when the cursor glyph is lit.
    fn set_cursor_lit(&mut self, _lit: bool) {}

    /// Remove the cursor node.
    fn detach_cursor(&mut self) {}
}

/// Lock a mutex, recovering the guard if a panicking handler poisoned it.
pub(crate) fn lock<T: ?Sized>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
