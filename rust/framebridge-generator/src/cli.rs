//! Command line surface of the `framebridge` binary.

use std::path::PathBuf;

use clap::Parser;
use framebridge_protocol::Placement;

use crate::Settings;

/// Flags of the `framebridge` binary.
#[derive(Debug, Parser)]
#[command(name = "framebridge")]
#[command(bin_name = "framebridge")]
#[command(about = "Generate paired host and embedded snippets for an iframe embed", long_about = None)]
pub struct FramebridgeCli {
    /// URL of the page to embed (must be https)
    #[arg(long)]
    pub url: Option<String>,

    /// Insert the embed above or below the anchor element
    #[arg(long)]
    pub placement: Option<Placement>,

    /// Selector of the host-page anchor element [default: #content]
    #[arg(long)]
    pub form_selector: Option<String>,

    /// Classes that trigger a scroll, separated by commas or spaces
    #[arg(long)]
    pub button_classes: Option<String>,

    /// Minimum iframe height in pixels [default: 600]
    #[arg(long, allow_negative_numbers = true)]
    pub min_height: Option<i64>,

    /// Pixels added to the scroll target [default: 0]
    #[arg(long, allow_negative_numbers = true)]
    pub scroll_offset: Option<i64>,

    /// JSON settings bundle; flags override its values
    #[arg(short, long)]
    pub settings: Option<PathBuf>,

    /// Write the snippets and config into this directory instead of printing
    #[arg(short, long)]
    pub out_dir: Option<PathBuf>,

    /// Print the config and both snippets as one JSON document
    #[arg(long)]
    pub json: bool,
}

impl FramebridgeCli {
    /// The settings given as flags.
    pub fn flag_settings(&self) -> Settings {
        Settings {
            url: self.url.clone(),
            placement: self.placement,
            form_selector: self.form_selector.clone(),
            button_classes: self.button_classes.clone(),
            min_height: self.min_height,
            scroll_offset: self.scroll_offset,
        }
    }
}
