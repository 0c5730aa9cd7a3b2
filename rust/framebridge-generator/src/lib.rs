#![warn(missing_docs)]

//! # Framebridge generator
//!
//! Turns a [`Settings`] bundle into the two snippets of an embed:
//!
//! - the **host snippet**, pasted into the page that should display the
//!   embedded form, which mounts the iframe and follows its reports;
//! - the **embedded snippet**, pasted into the page loaded inside the
//!   iframe, which reports its height and asks the host to scroll.
//!
//! Both carry the same freshly generated [`EmbedId`], and the host snippet
//! trusts nothing but the origin of the configured URL.
//!
//! ```
//! use framebridge_generator::{Settings, generate};
//!
//! let generated = generate(&Settings {
//!     url: Some("https://forms.example.com/signup".into()),
//!     button_classes: Some(".cta".into()),
//!     ..Settings::default()
//! })?;
//!
//! assert!(generated.host_snippet.contains(generated.config.embed_id.as_str()));
//! assert!(generated.embedded_snippet.contains(generated.config.embed_id.as_str()));
//! # Ok::<(), framebridge_generator::GeneratorError>(())
//! ```
//!
//! The `framebridge` binary wraps this library; see [`cli`].

use std::{
    fs,
    io,
    path::{Path, PathBuf},
};

use framebridge_protocol::{EmbedConfig, EmbedId, Origin};
use serde::Serialize;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli;

mod error;
pub use error::*;

mod id;
pub use id::*;

mod render;
pub use render::*;

mod settings;
pub use settings::*;

/// File name of the host snippet written by [`Generated::write_to`].
pub const HOST_SNIPPET_FILE: &str = "host-snippet.html";

/// File name of the embedded snippet written by [`Generated::write_to`].
pub const EMBEDDED_SNIPPET_FILE: &str = "embedded-snippet.html";

/// File name of the serialized [`EmbedConfig`] written by
/// [`Generated::write_to`].
pub const CONFIG_FILE: &str = "embed-config.json";

/// The artifacts of one generation.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Generated {
    /// Parameters shared by both snippets
    pub config: EmbedConfig,
    /// `<script>` for the host page
    pub host_snippet: String,
    /// `<script>` for the embedded page
    pub embedded_snippet: String,
}

impl Generated {
    /// Write both snippets and the configuration into `directory`, creating
    /// it if needed. Returns the written paths.
    pub fn write_to(&self, directory: &Path) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(directory)?;

        let config = serde_json::to_string_pretty(&self.config).map_err(io::Error::other)?;

        [
            (HOST_SNIPPET_FILE, self.host_snippet.as_str()),
            (EMBEDDED_SNIPPET_FILE, self.embedded_snippet.as_str()),
            (CONFIG_FILE, config.as_str()),
        ]
        .into_iter()
        .map(|(name, contents)| -> io::Result<PathBuf> {
            let path = directory.join(name);
            fs::write(&path, format!("{contents}\n"))?;
            Ok(path)
        })
        .collect()
    }
}

/// Generate an embed with an id from the operating system's random source.
pub fn generate(settings: &Settings) -> Result<Generated, GeneratorError> {
    generate_with(settings, &SecureIdSource)
}

/// Generate an embed with an id from `ids`.
pub fn generate_with(settings: &Settings, ids: &dyn IdSource) -> Result<Generated, GeneratorError> {
    let resolved = settings.resolve()?;
    let embed_id: EmbedId = embed_id(ids)?;

    let iframe_src = iframe_src(&resolved.url, &embed_id);
    let config = EmbedConfig {
        iframe_origin: Origin::of(&iframe_src),
        iframe_src,
        embed_id,
        form_selector: resolved.form_selector,
        placement: resolved.placement,
        min_height: resolved.min_height,
        scroll_offset: resolved.scroll_offset,
        button_classes: resolved.button_classes,
    };

    let generated = Generated {
        host_snippet: host_snippet(&config)?,
        embedded_snippet: embedded_snippet(&config)?,
        config,
    };

    tracing::info!(
        embed_id = %generated.config.embed_id,
        origin = %generated.config.iframe_origin,
        "Generated embed"
    );

    Ok(generated)
}
