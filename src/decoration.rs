//! Decorative header animation.
//!
//! The dashboard fetches a Lottie animation JSON from a static asset URL
//! and uses its name and frame rate to drive a small spinner in the header.
//! The asset is pure decoration: any failure (transport, non-2xx status,
//! unparsable payload) yields `None` and the report renders without it.

use std::time::Duration;

use log::warn;
use serde::Deserialize;

/// The analysis animation the original dashboard decorated itself with.
pub const DEFAULT_DECORATION_URL: &str =
    "https://assets2.lottiefiles.com/packages/lf20_qp1q7mct.json";

const SPINNER_GLYPHS: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

/// The slice of a Lottie document a terminal can act on: the animation
/// name plus its frame timing.
#[derive(Debug, Clone, Deserialize)]
pub struct Decoration {
    #[serde(rename = "nm")]
    pub name: Option<String>,
    #[serde(rename = "fr", default = "default_frame_rate")]
    pub frame_rate: f64,
    #[serde(rename = "ip", default)]
    pub in_point: f64,
    #[serde(rename = "op", default)]
    pub out_point: f64,
}

fn default_frame_rate() -> f64 {
    30.0
}

impl Decoration {
    /// Spinner glyph for the current wall-clock offset, advancing at the
    /// asset's own frame rate.
    #[must_use]
    pub fn glyph(&self, elapsed: Duration) -> &'static str {
        let rate = if self.frame_rate > 0.0 { self.frame_rate } else { default_frame_rate() };
        let frame = (elapsed.as_secs_f64() * rate) as usize;
        SPINNER_GLYPHS[frame % SPINNER_GLYPHS.len()]
    }

    /// Frames in the animation loop, when the document declares a span.
    #[must_use]
    pub fn frame_span(&self) -> f64 {
        (self.out_point - self.in_point).max(0.0)
    }
}

/// Plain GET of the animation asset. Non-fatal by contract: every failure
/// path logs and returns `None`.
pub async fn load(url: &str, timeout: Duration) -> Option<Decoration> {
    let http = match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            warn!("decoration client unavailable: {e}");
            return None;
        }
    };

    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("decoration fetch failed: {e}");
            return None;
        }
    };

    if !response.status().is_success() {
        warn!("decoration fetch returned HTTP {}", response.status().as_u16());
        return None;
    }

    match response.json::<Decoration>().await {
        Ok(decoration) => Some(decoration),
        Err(e) => {
            warn!("decoration payload unreadable: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_the_lottie_fields_it_needs() {
        let decoration: Decoration = serde_json::from_value(serde_json::json!({
            "v": "5.5.2",
            "nm": "analysis",
            "fr": 25.0,
            "ip": 0.0,
            "op": 120.0,
            "layers": []
        }))
        .expect("valid document");

        assert_eq!(decoration.name.as_deref(), Some("analysis"));
        assert!((decoration.frame_rate - 25.0).abs() < f64::EPSILON);
        assert!((decoration.frame_span() - 120.0).abs() < f64::EPSILON);
    }

    #[test]
    fn glyph_advances_with_time() {
        let decoration: Decoration =
            serde_json::from_value(serde_json::json!({ "nm": "x" })).expect("minimal document");

        let first = decoration.glyph(Duration::from_millis(0));
        let later = decoration.glyph(Duration::from_millis(40));
        assert_ne!(first, later);
    }

    #[test]
    fn glyph_survives_zero_frame_rate() {
        let decoration: Decoration =
            serde_json::from_value(serde_json::json!({ "fr": 0.0 })).expect("document");
        let _ = decoration.glyph(Duration::from_secs(1));
    }
}
