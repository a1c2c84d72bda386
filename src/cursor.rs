//! Color cursor
//!
//! While a part is hovered the cursor becomes a ring filled with that part's
//! current color plus its name; otherwise a plain ring with an arrow. The
//! image is an SVG wrapped in a base64 `data:` URI, the same form a CSS
//! `cursor: url(...)` takes.

use crate::store::{HexColor, MaterialId, SceneState};
use base64::Engine;
use macroquad::prelude::*;

const HOVER_TEMPLATE_HEAD: &str = concat!(
    r##"<svg width="64" height="64" fill="none" xmlns="http://www.w3.org/2000/svg"><g clip-path="url(#clip0)">"##,
    r##"<path fill="rgba(255, 255, 255, 0.5)" d="M29.5 54C43.031 54 54 43.031 54 29.5S43.031 5 29.5 5 5 15.969 5 29.5 15.969 54 29.5 54z" stroke="#000"/>"##,
    r##"<g filter="url(#filter0_d)"><path d="M29.5 47C39.165 47 47 39.165 47 29.5S39.165 12 29.5 12 12 19.835 12 29.5 19.835 47 29.5 47z" fill=""##,
);

const HOVER_TEMPLATE_MIDDLE: &str = concat!(
    r##""/></g><path d="M2 2l11 2.947L4.947 13 2 2z" fill="#000"/>"##,
    r##"<text fill="#000" style="white-space:pre" font-family="Inter var, sans-serif" font-size="10" letter-spacing="-.01em"><tspan x="35" y="63">"##,
);

const HOVER_TEMPLATE_TAIL: &str = concat!(
    r##"</tspan></text></g><defs><clipPath id="clip0"><path fill="#fff" d="M0 0h64v64H0z"/></clipPath>"##,
    r##"<filter id="filter0_d" x="6" y="8" width="47" height="47" filterUnits="userSpaceOnUse" color-interpolation-filters="sRGB">"##,
    r##"<feFlood flood-opacity="0" result="BackgroundImageFix"/>"##,
    r##"<feColorMatrix in="SourceAlpha" values="0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 127 0"/>"##,
    r##"<feOffset dy="2"/><feGaussianBlur stdDeviation="3"/>"##,
    r##"<feColorMatrix values="0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0.15 0"/>"##,
    r##"<feBlend in2="BackgroundImageFix" result="effect1_dropShadow"/>"##,
    r##"<feBlend in="SourceGraphic" in2="effect1_dropShadow" result="shape"/></filter></defs></svg>"##,
);

const DEFAULT_TEMPLATE: &str = concat!(
    r##"<svg width="64" height="64" fill="none" xmlns="http://www.w3.org/2000/svg">"##,
    r##"<path fill="rgba(255, 255, 255, 0.5)" d="M29.5 54C43.031 54 54 43.031 54 29.5S43.031 5 29.5 5 5 15.969 5 29.5 15.969 54 29.5 54z" stroke="#000"/>"##,
    r##"<path d="M2 2l11 2.947L4.947 13 2 2z" fill="#000"/></svg>"##,
);

/// Fill used when the hovered material has no color entry
const EMPTY_SWATCH: &str = "none";

/// A generated cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorImage {
    /// `(material, swatch color)` when a part is hovered
    pub hovered: Option<(MaterialId, Option<HexColor>)>,
    pub svg: String,
}

impl CursorImage {
    /// Plain ring and arrow
    pub fn default_cursor() -> Self {
        Self { hovered: None, svg: DEFAULT_TEMPLATE.to_string() }
    }

    /// Ring filled with `color` and labelled with the material name
    pub fn hovered(material: &MaterialId, color: Option<&HexColor>) -> Self {
        let fill = color.map(|c| escape_xml(c.as_str())).unwrap_or_else(|| EMPTY_SWATCH.to_string());
        let svg = format!(
            "{}{}{}{}{}",
            HOVER_TEMPLATE_HEAD,
            fill,
            HOVER_TEMPLATE_MIDDLE,
            escape_xml(material.as_str()),
            HOVER_TEMPLATE_TAIL
        );
        Self { hovered: Some((material.clone(), color.cloned())), svg }
    }

    /// Cursor for the current hover, reading the swatch from the store
    pub fn for_hover(hovered: Option<&MaterialId>, state: &SceneState) -> Self {
        match hovered {
            Some(material) => Self::hovered(material, state.color(material)),
            None => Self::default_cursor(),
        }
    }

    /// `data:image/svg+xml;base64,...`
    pub fn data_uri(&self) -> String {
        format!(
            "data:image/svg+xml;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(self.svg.as_bytes())
        )
    }

    /// CSS `cursor` value with the browser's default as fallback
    pub fn css(&self) -> String {
        format!("url('{}'), auto", self.data_uri())
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Whatever shows the cursor to the user
pub trait CursorSink {
    fn set_cursor(&mut self, image: &CursorImage);
}

/// Draws the cursor into the window in place of the system pointer
pub struct OverlayCursor {
    current: CursorImage,
    swatch: Option<Color>,
}

impl OverlayCursor {
    pub fn new() -> Self {
        Self { current: CursorImage::default_cursor(), swatch: None }
    }

    pub fn current(&self) -> &CursorImage {
        &self.current
    }

    /// Draw at the pointer. Image origin is the hotspot, like a CSS cursor
    /// without explicit coordinates.
    pub fn draw(&self, mouse_x: f32, mouse_y: f32) {
        let (x, y) = (mouse_x, mouse_y);
        let (cx, cy) = (x + 29.5, y + 29.5);

        draw_circle(cx, cy, 24.5, Color::new(1.0, 1.0, 1.0, 0.5));
        draw_circle_lines(cx, cy, 24.5, 1.0, BLACK);

        if let Some((material, _)) = &self.current.hovered {
            if let Some(swatch) = self.swatch {
                // Drop shadow under the swatch
                draw_circle(cx, cy + 2.0, 18.5, Color::new(0.0, 0.0, 0.0, 0.15));
                draw_circle(cx, cy, 17.5, swatch);
            }
            draw_text(material.as_str(), x + 35.0, y + 63.0, 13.0, BLACK);
        }

        draw_triangle(
            vec2(x + 2.0, y + 2.0),
            vec2(x + 13.0, y + 4.947),
            vec2(x + 4.947, y + 13.0),
            BLACK,
        );
    }
}

impl Default for OverlayCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl CursorSink for OverlayCursor {
    fn set_cursor(&mut self, image: &CursorImage) {
        log::trace!("Cursor: {}", image.css());
        self.swatch = image
            .hovered
            .as_ref()
            .and_then(|(_, color)| color.as_ref())
            .and_then(|c| c.to_rgb())
            .map(|(r, g, b)| Color::from_rgba(r, g, b, 255));
        self.current = image.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SceneStore;

    fn decode(uri: &str) -> String {
        let payload = uri.strip_prefix("data:image/svg+xml;base64,").unwrap();
        let bytes = base64::engine::general_purpose::STANDARD.decode(payload).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[derive(Default)]
    struct RecordingSink(Vec<CursorImage>);

    impl CursorSink for RecordingSink {
        fn set_cursor(&mut self, image: &CursorImage) {
            self.0.push(image.clone());
        }
    }

    #[test]
    fn test_hovered_cursor_carries_color_and_label() {
        let image = CursorImage::hovered(&MaterialId::from("Claxon"), Some(&HexColor::from("#ff0000")));
        let svg = decode(&image.data_uri());

        assert_eq!(svg, image.svg);
        assert!(svg.starts_with(r#"<svg width="64" height="64""#));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains(r#"<tspan x="35" y="63">Claxon</tspan>"#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn test_default_cursor_is_plain_ring() {
        let image = CursorImage::default_cursor();
        let svg = decode(&image.data_uri());
        assert!(!svg.contains("tspan"));
        assert!(svg.contains(r#"d="M2 2l11 2.947L4.947 13 2 2z""#));
        assert!(image.css().starts_with("url('data:image/svg+xml;base64,"));
        assert!(image.css().ends_with("'), auto"));
    }

    #[test]
    fn test_missing_color_gives_empty_swatch() {
        let store = SceneStore::default();
        let far = MaterialId::from("Far");
        let image = CursorImage::for_hover(Some(&far), store.state());

        assert_eq!(image.hovered, Some((far, None)));
        assert!(image.svg.contains(r#"fill="none"/></g>"#));
        assert!(image.svg.contains(">Far</tspan>"));
    }

    #[test]
    fn test_label_is_escaped() {
        let image = CursorImage::hovered(&MaterialId::from("A<B"), None);
        assert!(image.svg.contains(">A&lt;B</tspan>"));
    }

    #[test]
    fn test_sink_receives_images() {
        let store = SceneStore::default();
        let mut sink = RecordingSink::default();
        let claxon = MaterialId::from("Claxon");

        sink.set_cursor(&CursorImage::for_hover(Some(&claxon), store.state()));
        sink.set_cursor(&CursorImage::for_hover(None, store.state()));

        assert_eq!(sink.0.len(), 2);
        assert_eq!(sink.0[0].hovered, Some((claxon, Some(HexColor::from("#ffffff")))));
        assert_eq!(sink.0[1], CursorImage::default_cursor());
    }
}
