use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use strum::{Display as StrumDisplay, EnumIter, EnumString};

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ColorSpec(String);

crate::impl_string_newtype!(ColorSpec);

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct FontFamily(String);

crate::impl_string_newtype!(FontFamily);

/// CSS font weight, accepted either as a keyword or as its numeric value.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
pub enum FontWeight {
    #[strum(to_string = "100", serialize = "thin")]
    Thin,
    #[strum(to_string = "200", serialize = "extralight")]
    ExtraLight,
    #[strum(to_string = "300", serialize = "light")]
    Light,
    #[default]
    #[strum(to_string = "400", serialize = "normal")]
    Normal,
    #[strum(to_string = "500", serialize = "medium")]
    Medium,
    #[strum(to_string = "600", serialize = "semibold")]
    SemiBold,
    #[strum(to_string = "700", serialize = "bold")]
    Bold,
    #[strum(to_string = "800", serialize = "extrabold")]
    ExtraBold,
    #[strum(to_string = "900", serialize = "black")]
    Black,
}

impl FontWeight {
    pub fn numeric(&self) -> u16 {
        (*self as u16 + 1) * 100
    }

    /// Whether a two-weight font backend should pick its bold face.
    pub fn is_bold(&self) -> bool {
        self.numeric() >= 600
    }
}

/// Ring appearance and text anchor angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameStyle {
    pub frame_color: ColorSpec,
    pub frame_width: f64,
    /// Centre of the text along the ring, clockwise from the positive x axis.
    pub angle_deg: f64,
    /// Share of the text's angular length added on each side as fade.
    pub fade_zone: f64,
    /// Fixed fade padding on each side, in degrees.
    pub fade_pad_deg: f64,
}

impl Default for FrameStyle {
    fn default() -> Self {
        Self {
            frame_color: ColorSpec::from("#107038"),
            frame_width: 120.0,
            angle_deg: 120.0,
            fade_zone: 0.25,
            fade_pad_deg: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub text: String,
    pub text_color: ColorSpec,
    pub font_family: FontFamily,
    pub font_weight: FontWeight,
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            text: "#OPENTOWORK".to_string(),
            text_color: ColorSpec::from("#ffffff"),
            font_family: FontFamily::from("Courier New"),
            font_weight: FontWeight::Bold,
            font_size: 75.0,
        }
    }
}

impl TextStyle {
    pub fn font(&self) -> FontSpec {
        FontSpec {
            family: self.font_family.clone(),
            weight: self.font_weight,
            size: self.font_size,
        }
    }
}

/// Font resolution used for both measuring and drawing glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: FontFamily,
    pub weight: FontWeight,
    pub size: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_weight_deserialization() {
        let cases = vec![
            ("\"bold\"", FontWeight::Bold),
            ("\"Bold\"", FontWeight::Bold),
            ("\"700\"", FontWeight::Bold),
            ("\"normal\"", FontWeight::Normal),
            ("\"400\"", FontWeight::Normal),
            ("\"100\"", FontWeight::Thin),
            ("\"900\"", FontWeight::Black),
        ];

        for (json, expected) in cases {
            let deserialized: FontWeight = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }
    }

    #[test]
    fn test_font_weight_serializes_numeric() {
        assert_eq!(serde_json::to_string(&FontWeight::Bold).unwrap(), "\"700\"");
        assert_eq!(FontWeight::SemiBold.numeric(), 600);
        assert!(FontWeight::SemiBold.is_bold());
        assert!(!FontWeight::Medium.is_bold());
    }

    #[test]
    fn test_font_weight_numeric_matches_display() {
        use strum::IntoEnumIterator;

        for weight in FontWeight::iter() {
            assert_eq!(weight.to_string(), weight.numeric().to_string());
        }
    }

    #[test]
    fn test_style_defaults_fill_missing_fields() {
        let frame: FrameStyle = serde_json::from_str(r#"{"frame_width": 60}"#).unwrap();
        assert_eq!(frame.frame_width, 60.0);
        assert_eq!(frame.frame_color, ColorSpec::from("#107038"));

        let text: TextStyle = serde_json::from_str(r#"{"text": "HIRING"}"#).unwrap();
        assert_eq!(text.text, "HIRING");
        assert_eq!(text.font_weight, FontWeight::Bold);
        assert_eq!(text.font().size, 75.0);
    }
}
