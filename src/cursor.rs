//! The blinking cursor, independent of the typing state.

use crate::config::{CursorSettings, DEFAULT_BLINK};
use crate::surface::{SharedSurface, lock};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval_at};

/// Owns the cursor node on a surface and the interval that blinks it.
///
/// The blink keeps running while the cursor is hidden; [`Cursor::toggle`]
/// only changes whether the node is displayed.
pub struct Cursor {
    surface: SharedSurface,
    shown: bool,
    attached: bool,
    blink: Option<JoinHandle<()>>,
}

impl Cursor {
    /// Attach a cursor node and start blinking it.
    ///
    /// With `settings.show` false no node is created, and toggling only
    /// records the requested visibility. A zero blink interval blinks at
    /// the default rate.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime while `settings.show` is set.
    pub fn attach(surface: SharedSurface, settings: &CursorSettings) -> Self {
        if !settings.show {
            return Self {
                surface,
                shown: false,
                attached: false,
                blink: None,
            };
        }

        let period = if settings.blink.is_zero() {
            DEFAULT_BLINK
        } else {
            settings.blink
        };
        lock(&surface).attach_cursor(&settings.glyph, period);
        let blink = tokio::spawn(blink(Arc::clone(&surface), period));
        Self {
            surface,
            shown: true,
            attached: true,
            blink: Some(blink),
        }
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Force visibility to `show`, or flip it when `None`. Returns the new state.
    pub fn toggle(&mut self, show: Option<bool>) -> bool {
        self.shown = show.unwrap_or(!self.shown);
        if self.attached {
            lock(&self.surface).set_cursor_displayed(self.shown);
        }
        self.shown
    }

    /// Stop blinking and remove the node. Safe to call repeatedly.
    pub fn detach(&mut self) {
        if let Some(task) = self.blink.take() {
            task.abort();
        }
        if std::mem::take(&mut self.attached) {
            lock(&self.surface).detach_cursor();
        }
    }
}

impl Drop for Cursor {
    fn drop(&mut self) {
        self.detach();
    }
}

async fn blink(surface: SharedSurface, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    let mut lit = true;
    loop {
        ticker.tick().await;
        lit = !lit;
        lock(&surface).set_cursor_lit(lit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::MemorySurface;
    use std::sync::Mutex;

    fn settings(show: bool) -> CursorSettings {
        CursorSettings {
            glyph: "_".into(),
            blink: Duration::from_millis(100),
            show,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_blinks_on_interval() {
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let _cursor = Cursor::attach(surface.clone(), &settings(true));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(surface.lock().unwrap().cursor().unwrap().blinks, 0);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let node = surface.lock().unwrap().cursor().cloned().unwrap();
        assert_eq!(node.glyph, "_");
        assert_eq!(node.blinks, 1);
        assert!(!node.lit);

        tokio::time::sleep(Duration::from_millis(100)).await;
        let node = surface.lock().unwrap().cursor().cloned().unwrap();
        assert_eq!(node.blinks, 2);
        assert!(node.lit);
    }

    #[tokio::test(start_paused = true)]
    async fn test_toggle_does_not_stop_blinking() {
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let mut cursor = Cursor::attach(surface.clone(), &settings(true));

        assert!(!cursor.toggle(None));
        assert!(!surface.lock().unwrap().cursor().unwrap().displayed);
        assert!(cursor.toggle(Some(true)));
        assert!(cursor.toggle(Some(true)));

        tokio::time::sleep(Duration::from_millis(350)).await;
        let node = surface.lock().unwrap().cursor().cloned().unwrap();
        assert!(node.displayed);
        assert_eq!(node.blinks, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_detach_is_idempotent() {
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let mut cursor = Cursor::attach(surface.clone(), &settings(true));
        cursor.detach();
        cursor.detach();
        drop(cursor);

        tokio::time::sleep(Duration::from_millis(500)).await;
        let surface = surface.lock().unwrap();
        assert!(surface.cursor().is_none());
        assert_eq!(surface.cursor_detaches(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_blink_uses_default_rate() {
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let zero = CursorSettings {
            blink: Duration::ZERO,
            ..settings(true)
        };
        let _cursor = Cursor::attach(surface.clone(), &zero);

        tokio::time::sleep(DEFAULT_BLINK * 2 + Duration::from_millis(50)).await;
        let node = surface.lock().unwrap().cursor().cloned().unwrap();
        assert_eq!(node.blink, DEFAULT_BLINK);
        assert_eq!(node.blinks, 2);
    }

    #[test]
    fn test_hidden_cursor_creates_no_node() {
        let surface = Arc::new(Mutex::new(MemorySurface::new()));
        let mut cursor = Cursor::attach(surface.clone(), &settings(false));
        assert!(!cursor.is_attached());
        assert!(cursor.toggle(None));
        cursor.detach();

        let surface = surface.lock().unwrap();
        assert!(surface.cursor().is_none());
        assert_eq!(surface.cursor_detaches(), 0);
    }
}
