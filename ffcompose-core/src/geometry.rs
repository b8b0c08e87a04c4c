//! Output geometry: ratio reduction, size specifications and overlay placement.
//!
//! Everything in here is pure arithmetic over the probed source geometry. The
//! session calls into it at compile time to turn a textual size request into
//! concrete, encoder-friendly (even) dimensions and, optionally, a display
//! aspect ratio used to build a padding filter.

use crate::error::{CoreError, CoreResult};
use crate::metadata::VideoStream;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub w: u32,
    pub h: u32,
}

impl Resolution {
    #[must_use]
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// A reduced `x:y` ratio together with its textual and decimal forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub x: u32,
    pub y: u32,
    pub string: String,
    pub value: f64,
}

impl AspectRatio {
    /// Builds a ratio from already reduced terms. `y` must be non-zero.
    #[must_use]
    pub fn new(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            string: format!("{x}:{y}"),
            value: f64::from(x) / f64::from(y),
        }
    }

    /// Reduces `width:height` by their greatest common divisor.
    pub fn from_dimensions(width: u32, height: u32) -> CoreResult<Self> {
        let (x, y) = reduce_ratio(width, height)?;
        Ok(Self::new(x, y))
    }
}

/// Greatest common divisor (Euclid). `gcd(a, 0) == a`.
#[must_use]
pub fn gcd(a: u32, b: u32) -> u32 {
    let (mut a, mut b) = (a, b);
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Divides both terms by their GCD.
///
/// A zero on either side has no meaningful ratio and is rejected.
pub fn reduce_ratio(a: u32, b: u32) -> CoreResult<(u32, u32)> {
    if a == 0 || b == 0 {
        return Err(CoreError::InvalidDimensions { width: a, height: b });
    }
    let divisor = gcd(a, b);
    Ok((a / divisor, b / divisor))
}

/// Drops an odd value to the even number below it.
#[must_use]
pub fn round_even(value: u32) -> u32 {
    if value % 2 != 0 { value - 1 } else { value }
}

static FIXED_WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)x\?$").expect("valid regex"));
static FIXED_HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\?x(\d+)$").expect("valid regex"));
static PERCENTAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3})%$").expect("valid regex"));
static EXACT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)x(\d+)$").expect("valid regex"));

/// A parsed output size request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeSpec {
    /// `640x?`: width given, height follows the source ratio.
    FixedWidth(u32),
    /// `?x360`: height given, width follows the source ratio.
    FixedHeight(u32),
    /// `50%`: both sides scaled from the source resolution.
    Percentage(u32),
    /// `640x360`
    Exact(u32, u32),
}

impl SizeSpec {
    /// Parses the four forms in precedence order.
    pub fn parse(spec: &str) -> CoreResult<Self> {
        let trimmed = spec.trim();
        let number = |s: &str| {
            s.parse::<u32>()
                .map_err(|_| CoreError::SizeFormat(spec.to_string()))
        };

        if let Some(caps) = FIXED_WIDTH.captures(trimmed) {
            Ok(SizeSpec::FixedWidth(number(&caps[1])?))
        } else if let Some(caps) = FIXED_HEIGHT.captures(trimmed) {
            Ok(SizeSpec::FixedHeight(number(&caps[1])?))
        } else if let Some(caps) = PERCENTAGE.captures(trimmed) {
            let percent = number(&caps[1])?;
            if percent == 0 || percent > 100 {
                return Err(CoreError::InvalidPercentage(percent));
            }
            Ok(SizeSpec::Percentage(percent))
        } else if let Some(caps) = EXACT.captures(trimmed) {
            Ok(SizeSpec::Exact(number(&caps[1])?, number(&caps[2])?))
        } else {
            Err(CoreError::SizeFormat(spec.to_string()))
        }
    }
}

impl FromStr for SizeSpec {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SizeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeSpec::FixedWidth(w) => write!(f, "{w}x?"),
            SizeSpec::FixedHeight(h) => write!(f, "?x{h}"),
            SizeSpec::Percentage(p) => write!(f, "{p}%"),
            SizeSpec::Exact(w, h) => write!(f, "{w}x{h}"),
        }
    }
}

/// Final output geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    pub width: u32,
    pub height: u32,
    /// Display aspect of the output, present when the aspect is to be kept.
    pub aspect: Option<AspectRatio>,
}

/// Resolves a size request against the probed video stream.
///
/// With `keep_pixel_aspect_ratio` the pixel-aspect corrected resolution is
/// used as reference when the source has non-square pixels. Both resulting
/// sides are rounded and forced even.
pub fn compute_dimension(
    video: &VideoStream,
    spec: SizeSpec,
    keep_pixel_aspect_ratio: bool,
    keep_aspect_ratio: bool,
) -> CoreResult<Dimension> {
    let reference = match (keep_pixel_aspect_ratio, video.resolution_square) {
        (true, Some(square)) => square,
        _ => video.resolution,
    };
    let invalid_reference = || CoreError::InvalidDimensions {
        width: reference.w,
        height: reference.h,
    };

    let (width, height) = match spec {
        SizeSpec::FixedWidth(width) => {
            let height = match &video.aspect {
                Some(aspect) => f64::from(width) / f64::from(aspect.x) * f64::from(aspect.y),
                None => {
                    if reference.w == 0 {
                        return Err(invalid_reference());
                    }
                    f64::from(reference.h) / (f64::from(reference.w) / f64::from(width))
                }
            };
            (width, height.round() as u32)
        }
        SizeSpec::FixedHeight(height) => {
            let width = match &video.aspect {
                Some(aspect) => f64::from(height) / f64::from(aspect.y) * f64::from(aspect.x),
                None => {
                    if reference.h == 0 {
                        return Err(invalid_reference());
                    }
                    f64::from(reference.w) / (f64::from(reference.h) / f64::from(height))
                }
            };
            (width.round() as u32, height)
        }
        SizeSpec::Percentage(percent) => {
            let ratio = f64::from(percent) / 100.0;
            (
                (f64::from(reference.w) * ratio).round() as u32,
                (f64::from(reference.h) * ratio).round() as u32,
            )
        }
        SizeSpec::Exact(width, height) => (width, height),
    };

    let width = round_even(width);
    let height = round_even(height);
    if width == 0 || height == 0 {
        return Err(CoreError::InvalidDimensions { width, height });
    }

    let aspect = if keep_aspect_ratio {
        Some(AspectRatio::from_dimensions(width, height)?)
    } else {
        None
    };

    Ok(Dimension {
        width,
        height,
        aspect,
    })
}

/// Builds the scale + pad fragment that letterboxes a frame to `aspect`.
#[must_use]
pub fn aspect_pad_filter(aspect: &AspectRatio, padding_color: Option<&str>) -> String {
    let (x, y) = (aspect.x, aspect.y);
    let color = padding_color
        .filter(|c| !c.is_empty())
        .map(|c| format!(":{c}"))
        .unwrap_or_default();
    format!("scale=iw*sar:ih,pad=max(iw\\,ih*({x}/{y})):ow/({x}/{y}):(ow-iw)/2:(oh-ih)/2{color}")
}

/// Watermark anchor on the output frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    NE,
    NC,
    NW,
    SE,
    SC,
    #[default]
    SW,
    C,
    CE,
    CW,
}

impl Anchor {
    pub const ALL: [Anchor; 9] = [
        Anchor::NE,
        Anchor::NC,
        Anchor::NW,
        Anchor::SE,
        Anchor::SC,
        Anchor::SW,
        Anchor::C,
        Anchor::CE,
        Anchor::CW,
    ];

    /// Base overlay expressions `(x, y)` before margins are applied.
    fn base(self) -> (&'static str, &'static str) {
        const LEFT: &str = "0";
        const CENTER_X: &str = "main_w/2-overlay_w/2";
        const RIGHT: &str = "main_w-overlay_w";
        const TOP: &str = "0";
        const CENTER_Y: &str = "main_h/2-overlay_h/2";
        const BOTTOM: &str = "main_h-overlay_h";

        match self {
            Anchor::NE => (LEFT, TOP),
            Anchor::NC => (CENTER_X, TOP),
            Anchor::NW => (RIGHT, TOP),
            Anchor::SE => (LEFT, BOTTOM),
            Anchor::SC => (CENTER_X, BOTTOM),
            Anchor::SW => (RIGHT, BOTTOM),
            Anchor::CE => (LEFT, CENTER_Y),
            Anchor::C => (CENTER_X, CENTER_Y),
            Anchor::CW => (RIGHT, CENTER_Y),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Anchor::NE => "NE",
            Anchor::NC => "NC",
            Anchor::NW => "NW",
            Anchor::SE => "SE",
            Anchor::SC => "SC",
            Anchor::SW => "SW",
            Anchor::C => "C",
            Anchor::CE => "CE",
            Anchor::CW => "CW",
        }
    }
}

impl FromStr for Anchor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Anchor::ALL
            .into_iter()
            .find(|anchor| anchor.as_str() == s)
            .ok_or_else(|| CoreError::InvalidWatermarkPosition(s.to_string()))
    }
}

impl fmt::Display for Anchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Watermark margins in pixels. Right and bottom push the overlay inwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Margins {
    pub top: i32,
    pub bottom: i32,
    pub left: i32,
    pub right: i32,
}

fn signed_terms(positive: i32, negative: i32) -> String {
    let mut terms = String::new();
    for value in [i64::from(positive), -i64::from(negative)] {
        if value != 0 {
            terms.push_str(&format!("{value:+}"));
        }
    }
    terms
}

/// Translates an anchor plus margins into `overlay` filter coordinates.
#[must_use]
pub fn margin_to_overlay(anchor: Anchor, margins: &Margins) -> String {
    let (x, y) = anchor.base();
    format!(
        "{x}{}:{y}{}",
        signed_terms(margins.left, margins.right),
        signed_terms(margins.top, margins.bottom)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(w: u32, h: u32) -> VideoStream {
        VideoStream {
            resolution: Resolution::new(w, h),
            aspect: AspectRatio::from_dimensions(w, h).ok(),
            pixel: 1.0,
            pixel_string: "1:1".to_string(),
            ..VideoStream::default()
        }
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(1920, 1080), 120);
        assert_eq!(gcd(7, 0), 7);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(17, 5), 1);
    }

    #[test]
    fn test_reduce_ratio_yields_coprime_pair() {
        for (a, b) in [(1920, 1080), (1280, 720), (720, 576), (4096, 2160), (3, 7), (100, 100)] {
            let (x, y) = reduce_ratio(a, b).unwrap();
            let divisor = gcd(a, b);
            assert_eq!(gcd(x, y), 1, "{a}:{b}");
            assert_eq!(x * divisor, a);
            assert_eq!(y * divisor, b);
        }
    }

    #[test]
    fn test_reduce_ratio_rejects_zero() {
        assert!(matches!(
            reduce_ratio(0, 1080),
            Err(CoreError::InvalidDimensions { width: 0, height: 1080 })
        ));
        assert!(reduce_ratio(1920, 0).is_err());
    }

    #[test]
    fn test_round_even() {
        assert_eq!(round_even(641), 640);
        assert_eq!(round_even(640), 640);
        assert_eq!(round_even(1), 0);
    }

    #[test]
    fn test_size_spec_precedence() {
        assert_eq!(SizeSpec::parse("640x?").unwrap(), SizeSpec::FixedWidth(640));
        assert_eq!(SizeSpec::parse("?x360").unwrap(), SizeSpec::FixedHeight(360));
        assert_eq!(SizeSpec::parse("50%").unwrap(), SizeSpec::Percentage(50));
        assert_eq!(SizeSpec::parse("640x360").unwrap(), SizeSpec::Exact(640, 360));
        assert_eq!(SizeSpec::parse(" 100% ").unwrap(), SizeSpec::Percentage(100));
    }

    #[test]
    fn test_size_spec_rejects_garbage() {
        for spec in ["", "640", "x360", "?x?", "640*360", "big"] {
            assert!(
                matches!(SizeSpec::parse(spec), Err(CoreError::SizeFormat(_))),
                "{spec:?} should be a size format error"
            );
        }
        assert!(matches!(SizeSpec::parse("0%"), Err(CoreError::InvalidPercentage(0))));
        assert!(matches!(SizeSpec::parse("150%"), Err(CoreError::InvalidPercentage(150))));
    }

    #[test]
    fn test_compute_dimension_fixed_width_uses_aspect() {
        let dim = compute_dimension(&video(1280, 720), SizeSpec::FixedWidth(640), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (640, 360));
        assert_eq!(dim.aspect, None);
    }

    #[test]
    fn test_compute_dimension_fixed_height_uses_aspect() {
        let dim = compute_dimension(&video(1280, 720), SizeSpec::FixedHeight(360), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (640, 360));
    }

    #[test]
    fn test_compute_dimension_percentage() {
        let dim = compute_dimension(&video(1280, 720), SizeSpec::Percentage(50), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (640, 360));
    }

    #[test]
    fn test_compute_dimension_exact_ignores_aspect() {
        let dim = compute_dimension(&video(1920, 800), SizeSpec::Exact(640, 360), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (640, 360));
    }

    #[test]
    fn test_compute_dimension_forces_even() {
        // 333 * 9 / 16 = 187.3 -> 187 -> 186, 333 -> 332
        let dim = compute_dimension(&video(1920, 1080), SizeSpec::FixedWidth(333), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (332, 186));
        assert_eq!(dim.width % 2, 0);
        assert_eq!(dim.height % 2, 0);
    }

    #[test]
    fn test_compute_dimension_without_aspect_uses_resolution() {
        let mut source = video(1000, 500);
        source.aspect = None;
        let dim = compute_dimension(&source, SizeSpec::FixedWidth(400), false, false).unwrap();
        assert_eq!((dim.width, dim.height), (400, 200));
        let dim = compute_dimension(&source, SizeSpec::FixedHeight(100), false, false).unwrap();
        assert_eq!((dim.width, dim.height), (200, 100));
    }

    #[test]
    fn test_compute_dimension_uses_square_resolution() {
        // Anamorphic DVD: 720x576 with 16:15 pixels -> 768x576 square
        let mut source = video(720, 576);
        source.aspect = None;
        source.pixel = 16.0 / 15.0;
        source.resolution_square = Some(Resolution::new(768, 576));

        let dim = compute_dimension(&source, SizeSpec::Percentage(50), true, false).unwrap();
        assert_eq!((dim.width, dim.height), (384, 288));
        let dim = compute_dimension(&source, SizeSpec::Percentage(50), false, false).unwrap();
        assert_eq!((dim.width, dim.height), (360, 288));
    }

    #[test]
    fn test_compute_dimension_keep_aspect_ratio() {
        let dim = compute_dimension(&video(1280, 720), SizeSpec::FixedWidth(640), true, true).unwrap();
        let aspect = dim.aspect.unwrap();
        assert_eq!((aspect.x, aspect.y), (16, 9));
        assert_eq!(aspect.string, "16:9");
    }

    #[test]
    fn test_compute_dimension_zero_resolution() {
        let source = VideoStream::default();
        assert!(matches!(
            compute_dimension(&source, SizeSpec::FixedWidth(640), true, true),
            Err(CoreError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            compute_dimension(&source, SizeSpec::Percentage(50), true, true),
            Err(CoreError::InvalidDimensions { .. })
        ));
        // Explicit sizes do not depend on the source.
        assert!(compute_dimension(&source, SizeSpec::Exact(320, 240), true, true).is_ok());
    }

    #[test]
    fn test_aspect_pad_filter() {
        let aspect = AspectRatio::new(16, 9);
        assert_eq!(
            aspect_pad_filter(&aspect, Some("black")),
            "scale=iw*sar:ih,pad=max(iw\\,ih*(16/9)):ow/(16/9):(ow-iw)/2:(oh-ih)/2:black"
        );
        assert_eq!(
            aspect_pad_filter(&aspect, None),
            "scale=iw*sar:ih,pad=max(iw\\,ih*(16/9)):ow/(16/9):(ow-iw)/2:(oh-ih)/2"
        );
    }

    #[test]
    fn test_anchor_parsing() {
        for anchor in Anchor::ALL {
            assert_eq!(anchor.as_str().parse::<Anchor>().unwrap(), anchor);
        }
        assert!(matches!(
            "TOP".parse::<Anchor>(),
            Err(CoreError::InvalidWatermarkPosition(p)) if p == "TOP"
        ));
        assert_eq!(Anchor::default(), Anchor::SW);
    }

    #[test]
    fn test_margin_to_overlay_without_margins() {
        let none = Margins::default();
        assert_eq!(margin_to_overlay(Anchor::NE, &none), "0:0");
        assert_eq!(margin_to_overlay(Anchor::NC, &none), "main_w/2-overlay_w/2:0");
        assert_eq!(margin_to_overlay(Anchor::NW, &none), "main_w-overlay_w:0");
        assert_eq!(margin_to_overlay(Anchor::SE, &none), "0:main_h-overlay_h");
        assert_eq!(margin_to_overlay(Anchor::SC, &none), "main_w/2-overlay_w/2:main_h-overlay_h");
        assert_eq!(margin_to_overlay(Anchor::SW, &none), "main_w-overlay_w:main_h-overlay_h");
        assert_eq!(margin_to_overlay(Anchor::CE, &none), "0:main_h/2-overlay_h/2");
        assert_eq!(
            margin_to_overlay(Anchor::C, &none),
            "main_w/2-overlay_w/2:main_h/2-overlay_h/2"
        );
        assert_eq!(margin_to_overlay(Anchor::CW, &none), "main_w-overlay_w:main_h/2-overlay_h/2");
    }

    #[test]
    fn test_margin_to_overlay_extreme_margins() {
        let margins = Margins {
            top: i32::MAX,
            bottom: i32::MIN,
            left: i32::MIN,
            right: i32::MIN,
        };
        assert_eq!(
            margin_to_overlay(Anchor::NE, &margins),
            "0-2147483648+2147483648:0+2147483647+2147483648"
        );
    }

    #[test]
    fn test_margin_to_overlay_signs() {
        let margins = Margins {
            top: 10,
            bottom: 20,
            left: 5,
            right: 15,
        };
        assert_eq!(margin_to_overlay(Anchor::NE, &margins), "0+5-15:0+10-20");
        assert_eq!(
            margin_to_overlay(Anchor::SW, &margins),
            "main_w-overlay_w+5-15:main_h-overlay_h+10-20"
        );

        let inverted = Margins {
            top: -4,
            bottom: -6,
            left: 0,
            right: 0,
        };
        assert_eq!(margin_to_overlay(Anchor::NE, &inverted), "0:0-4+6");
    }
}
