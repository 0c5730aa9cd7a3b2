use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{ButtonClasses, EmbedId, Origin, ProtocolError};

/// Which side of the anchor element the iframe is inserted on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Immediately before the anchor
    #[default]
    Above,
    /// Immediately after the anchor
    Below,
}

impl Placement {
    /// The keyword used in configuration and in `data-placement`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Placement::Above => "above",
            Placement::Below => "below",
        }
    }
}

impl FromStr for Placement {
    type Err = ProtocolError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "above" => Ok(Placement::Above),
            "below" => Ok(Placement::Below),
            _ => Err(ProtocolError::InvalidPlacement(value.to_owned())),
        }
    }
}

impl Display for Placement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters shared by value into both generated payloads.
///
/// Produced once per generation and never mutated afterwards. The host
/// payload carries all of it; the embedded payload only needs
/// [`EmbedConfig::embed_id`] and [`EmbedConfig::button_classes`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EmbedConfig {
    /// Token identifying this embed on both sides
    pub embed_id: EmbedId,
    /// Embedded page URL, with the embed id in its query string
    pub iframe_src: Url,
    /// Origin of [`EmbedConfig::iframe_src`], the sole trust anchor
    pub iframe_origin: Origin,
    /// Selector of the host-page anchor element
    pub form_selector: String,
    /// Insertion side relative to the anchor
    pub placement: Placement,
    /// Floor for the iframe height, in CSS pixels
    pub min_height: u32,
    /// Pixels added to the anchor offset when scrolling
    pub scroll_offset: i32,
    /// Classes whose clicks trigger a host scroll
    pub button_classes: ButtonClasses,
}

impl EmbedConfig {
    /// [`EmbedConfig::min_height`] as a layout value.
    pub fn min_height_px(&self) -> f64 {
        f64::from(self.min_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> EmbedConfig {
        let iframe_src = Url::parse("https://forms.example.com/join?ghlEmbedId=ghlEmbed_t1").unwrap();
        EmbedConfig {
            embed_id: "ghlEmbed_t1".parse().unwrap(),
            iframe_origin: Origin::of(&iframe_src),
            iframe_src,
            form_selector: "#signup".into(),
            placement: Placement::Below,
            min_height: 600,
            scroll_offset: -20,
            button_classes: ButtonClasses::parse("cta"),
        }
    }

    #[test]
    fn it_serializes_with_camel_case_keys() {
        let value = serde_json::to_value(config()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "embedId": "ghlEmbed_t1",
                "iframeSrc": "https://forms.example.com/join?ghlEmbedId=ghlEmbed_t1",
                "iframeOrigin": "https://forms.example.com",
                "formSelector": "#signup",
                "placement": "below",
                "minHeight": 600,
                "scrollOffset": -20,
                "buttonClasses": ["cta"]
            })
        );
    }

    #[test]
    fn it_reads_back_what_it_writes() {
        let json = serde_json::to_string(&config()).unwrap();
        let parsed: EmbedConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config());
    }

    #[test]
    fn it_parses_placement_keywords() {
        assert_eq!("Below".parse::<Placement>().unwrap(), Placement::Below);
        assert_eq!(" above ".parse::<Placement>().unwrap(), Placement::Above);
        assert!("left".parse::<Placement>().is_err());
        assert_eq!(Placement::default(), Placement::Above);
    }
}
