//! [`MemorySurface`]: records every render call instead of drawing.

use crate::surface::Surface;
use std::time::Duration;

/// State of the cursor node attached to a [`MemorySurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorNode {
    pub glyph: String,
    pub blink: Duration,
    pub displayed: bool,
    pub lit: bool,
    /// Number of blink phase changes seen so far.
    pub blinks: usize,
}

/// An in-memory surface for headless use and tests.
///
/// Every `set_text` and `set_color` call is appended to a history, so the
/// exact render sequence of an animation can be inspected afterwards.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    text: String,
    color: Option<String>,
    renders: Vec<String>,
    paints: Vec<String>,
    cursor: Option<CursorNode>,
    cursor_detaches: usize,
    element: bool,
}

impl MemorySurface {
    /// An empty surface.
    pub fn new() -> Self {
        Self {
            text: String::new(),
            color: None,
            renders: Vec::new(),
            paints: Vec::new(),
            cursor: None,
            cursor_detaches: 0,
            element: true,
        }
    }

    /// A surface that already displays `text`.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::new()
        }
    }

    /// A handle that does not refer to a usable element.
    pub fn detached() -> Self {
        Self {
            element: false,
            ..Self::new()
        }
    }

    /// Every text passed to `set_text`, in order.
    pub fn renders(&self) -> &[String] {
        &self.renders
    }

    /// Every color passed to `set_color`, in order.
    pub fn paints(&self) -> &[String] {
        &self.paints
    }

    /// The color most recently applied.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// The attached cursor node, if any.
    pub fn cursor(&self) -> Option<&CursorNode> {
        self.cursor.as_ref()
    }

    /// How many times a cursor node was detached.
    pub fn cursor_detaches(&self) -> usize {
        self.cursor_detaches
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for MemorySurface {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn set_text(&mut self, text: &str) {
        self.text = text.to_owned();
        self.renders.push(self.text.clone());
    }

    fn set_color(&mut self, color: &str) {
        self.color = Some(color.to_owned());
        self.paints.push(color.to_owned());
    }

    fn is_element(&self) -> bool {
        self.element
    }

    fn attach_cursor(&mut self, glyph: &str, blink: Duration) {
        self.cursor = Some(CursorNode {
            glyph: glyph.to_owned(),
            blink,
            displayed: true,
            lit: true,
            blinks: 0,
        });
    }

    fn set_cursor_displayed(&mut self, displayed: bool) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.displayed = displayed;
        }
    }

    fn set_cursor_lit(&mut self, lit: bool) {
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.lit = lit;
            cursor.blinks += 1;
        }
    }

    fn detach_cursor(&mut self) {
        if self.cursor.take().is_some() {
            self.cursor_detaches += 1;
        }
    }
}
