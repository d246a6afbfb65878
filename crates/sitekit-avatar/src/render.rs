//! Avatar rendering
//!
//! Renderers are pure: equal keys always yield byte-identical assets.

use crate::key::{AssetRef, AvatarKey};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::sync::Arc;

/// Media type of rendered avatars
pub const SVG_MIME_TYPE: &str = "image/svg+xml";

/// Turns a validated key into an asset
pub trait AvatarRenderer: Send + Sync {
    /// Render `key`
    fn render(&self, key: &AvatarKey) -> AssetRef;
}

impl<R: AvatarRenderer + ?Sized> AvatarRenderer for Arc<R> {
    fn render(&self, key: &AvatarKey) -> AssetRef {
        (**self).render(key)
    }
}

/// Square badge with centered initials, emitted as a base64 `data:` URI
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgAvatarRenderer;

impl SvgAvatarRenderer {
    /// Create renderer
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Raw SVG document for `key`
    #[must_use]
    pub fn markup(key: &AvatarKey) -> String {
        format!(
            "<svg xmlns='http://www.w3.org/2000/svg' \
             width='200' height='200' viewBox='0 0 200 200'>\
             <rect width='100%' height='100%' fill='{style}' rx='12' ry='12'/>\
             <text x='50%' y='54%' font-family='Segoe UI, Roboto, Arial' font-size='72' \
             fill='#ffffff' text-anchor='middle' dominant-baseline='middle'>{identity}</text>\
             </svg>",
            style = key.style(),
            identity = escape_xml(key.identity()),
        )
    }
}

impl AvatarRenderer for SvgAvatarRenderer {
    fn render(&self, key: &AvatarKey) -> AssetRef {
        let encoded = STANDARD.encode(Self::markup(key));
        AssetRef::new(format!("data:{SVG_MIME_TYPE};base64,{encoded}"))
    }
}

/// Escape text for use inside XML content or single-quoted attributes
#[must_use]
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(asset: &AssetRef) -> String {
        let payload = asset
            .as_str()
            .strip_prefix("data:image/svg+xml;base64,")
            .unwrap();
        String::from_utf8(STANDARD.decode(payload).unwrap()).unwrap()
    }

    #[test]
    fn renders_data_uri() {
        let key = AvatarKey::new("TM", "#0b6623").unwrap();
        let svg = decode(&SvgAvatarRenderer.render(&key));

        assert!(svg.starts_with("<svg xmlns='http://www.w3.org/2000/svg' width='200'"));
        assert!(svg.contains("height='200' viewBox='0 0 200 200'>"));
        assert!(svg.contains("fill='#0b6623' rx='12'"));
        assert!(svg.contains("font-size='72'"));
        assert!(svg.contains(">TM</text>"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let key = AvatarKey::new("BN", "#0a8b4d").unwrap();
        assert_eq!(SvgAvatarRenderer.render(&key), SvgAvatarRenderer.render(&key));
    }

    #[test]
    fn identity_is_escaped() {
        let key = AvatarKey::new("<&>", "#fff").unwrap();
        let svg = decode(&SvgAvatarRenderer.render(&key));
        assert!(svg.contains(">&lt;&amp;&gt;</text>"));
    }

    #[test]
    fn escape_xml_passes_plain_text() {
        assert_eq!(escape_xml("PM"), "PM");
        assert_eq!(escape_xml("a'b\"c"), "a&apos;b&quot;c");
    }
}
