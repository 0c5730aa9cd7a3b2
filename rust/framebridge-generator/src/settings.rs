use framebridge_protocol::{
    ButtonClasses, DEFAULT_FORM_SELECTOR, DEFAULT_MIN_HEIGHT, Placement,
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::GeneratorError;

/// Generator input, as typed by a person.
///
/// Every field is optional so that a bundle loaded from a file can be
/// overlaid with command line flags (see [`Settings::overlay`]). Missing
/// values take their defaults in [`Settings::resolve`].
///
/// ```json
/// {
///   "url": "https://forms.example.com/signup",
///   "placement": "below",
///   "formSelector": "#signup",
///   "buttonClasses": ".cta, .signup-button",
///   "minHeight": 600,
///   "scrollOffset": 20
/// }
/// ```
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Embedded page URL
    pub url: Option<String>,
    /// Insertion side relative to the anchor
    pub placement: Option<Placement>,
    /// Anchor selector
    pub form_selector: Option<String>,
    /// Raw trigger classes, separated by commas or whitespace
    pub button_classes: Option<String>,
    /// Iframe height floor
    pub min_height: Option<i64>,
    /// Scroll target adjustment
    pub scroll_offset: Option<i64>,
}

impl Settings {
    /// Read a settings bundle from JSON.
    pub fn from_json(json: &str) -> Result<Self, GeneratorError> {
        serde_json::from_str(json).map_err(|error| GeneratorError::InvalidSettings(error.to_string()))
    }

    /// These settings with every value present in `overrides` replaced.
    pub fn overlay(self, overrides: Settings) -> Self {
        Self {
            url: overrides.url.or(self.url),
            placement: overrides.placement.or(self.placement),
            form_selector: overrides.form_selector.or(self.form_selector),
            button_classes: overrides.button_classes.or(self.button_classes),
            min_height: overrides.min_height.or(self.min_height),
            scroll_offset: overrides.scroll_offset.or(self.scroll_offset),
        }
    }

    /// Validate and apply defaults.
    pub fn resolve(&self) -> Result<Resolved, GeneratorError> {
        let raw_url = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(GeneratorError::MissingUrl)?;

        let url = Url::parse(raw_url).map_err(|error| GeneratorError::InvalidUrl {
            url: raw_url.to_owned(),
            reason: error.to_string(),
        })?;

        if url.scheme() != "https" {
            return Err(GeneratorError::InsecureScheme {
                scheme: url.scheme().to_owned(),
            });
        }

        let button_classes = ButtonClasses::parse(self.button_classes.as_deref().unwrap_or_default());
        if button_classes.is_empty() {
            return Err(GeneratorError::NoButtonClasses);
        }

        let form_selector = self
            .form_selector
            .as_deref()
            .map(str::trim)
            .filter(|selector| !selector.is_empty())
            .unwrap_or(DEFAULT_FORM_SELECTOR)
            .to_owned();

        let min_height = self
            .min_height
            .filter(|height| *height > 0)
            .map(|height| u32::try_from(height).unwrap_or(u32::MAX))
            .unwrap_or(DEFAULT_MIN_HEIGHT);

        let scroll_offset = self
            .scroll_offset
            .map(|offset| offset.clamp(i32::MIN.into(), i32::MAX.into()) as i32)
            .unwrap_or(0);

        Ok(Resolved {
            url,
            placement: self.placement.unwrap_or_default(),
            form_selector,
            button_classes,
            min_height,
            scroll_offset,
        })
    }
}

/// Validated settings with defaults applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved {
    /// Embedded page URL, absolute and `https`
    pub url: Url,
    /// Insertion side relative to the anchor
    pub placement: Placement,
    /// Anchor selector
    pub form_selector: String,
    /// Normalized, non-empty trigger classes
    pub button_classes: ButtonClasses,
    /// Iframe height floor
    pub min_height: u32,
    /// Scroll target adjustment
    pub scroll_offset: i32,
}
