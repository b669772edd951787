//! Declarative attachment: build typewriters from data embedded on elements.
//!
//! A host that marks elements with phrase and option payloads (JSON, as in
//! `data-texts='["a","b"]' data-options='{"loop":true}'`) collects them
//! into [`MarkedElement`]s and calls [`attach_all`] once, explicitly.

use crate::config::Texts;
use crate::simple::{SimpleOptions, SimpleTypewriter};
use crate::surface::SharedSurface;
use anyhow::{Context as _, Result};

/// An element carrying raw, unparsed typewriter payloads.
pub struct MarkedElement {
    pub surface: SharedSurface,
    /// JSON string or array of strings; absent means `[]`.
    pub texts: Option<String>,
    /// JSON object of [`SimpleOptions`]; absent means `{}`.
    pub options: Option<String>,
}

/// Construct a [`SimpleTypewriter`] for every well-formed element.
///
/// Elements without texts are skipped. Elements with malformed payloads or
/// an invalid target are skipped with a warning, and the scan carries on.
pub fn attach_all(elements: impl IntoIterator<Item = MarkedElement>) -> Vec<SimpleTypewriter> {
    elements
        .into_iter()
        .enumerate()
        .filter_map(|(index, element)| match attach(element) {
            Ok(typewriter) => typewriter,
            Err(err) => {
                tracing::warn!(index, error = ?err, "invalid typewriter data, skipping element");
                None
            }
        })
        .collect()
}

fn attach(element: MarkedElement) -> Result<Option<SimpleTypewriter>> {
    let texts: Texts = serde_json::from_str(element.texts.as_deref().unwrap_or("[]"))
        .context("Failed to parse texts")?;
    let options: SimpleOptions = serde_json::from_str(element.options.as_deref().unwrap_or("{}"))
        .context("Failed to parse options")?;
    if texts.is_empty() {
        return Ok(None);
    }
    let typewriter = SimpleTypewriter::new(element.surface, texts, options, None)?;
    Ok(Some(typewriter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surfaces::MemorySurface;
    use std::sync::{Arc, Mutex};

    fn marked(texts: Option<&str>, options: Option<&str>) -> MarkedElement {
        MarkedElement {
            surface: Arc::new(Mutex::new(MemorySurface::new())),
            texts: texts.map(str::to_owned),
            options: options.map(str::to_owned),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_skips_bad_elements() {
        let detached = MarkedElement {
            surface: Arc::new(Mutex::new(MemorySurface::detached())),
            texts: Some(r#"["x"]"#.into()),
            options: None,
        };
        let attached = attach_all([
            marked(Some(r#"["a", "b"]"#), Some(r#"{"loop": true}"#)),
            marked(Some("not json"), None),
            marked(Some(r#"["a"]"#), Some(r#"{"typeSpeed": "fast"}"#)),
            marked(None, None),
            marked(Some(r#"[]"#), None),
            detached,
            marked(Some(r#""single""#), None),
        ]);
        assert_eq!(attached.len(), 2);
    }

    #[test]
    fn test_parse_errors_carry_context() {
        let err = attach(marked(Some("{"), None)).err().unwrap();
        assert!(format!("{err:#}").contains("Failed to parse texts"));
    }
}
