use std::path::PathBuf;

use crate::params::{Dual, LayerKind, Params};

/// Where the parameter set comes from, and what to override on top of it.
#[derive(Debug, Default, clap::Args)]
pub struct Config {
    /// Read the parameter set from a JSON file instead of using the defaults.
    #[clap(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Resample every setting within its allowed range, seeded by the texture seed. Overrides
    /// below still apply.
    #[clap(long, conflicts_with = "params")]
    pub randomize: bool,

    #[clap(long)]
    pub iterations: Option<u32>,

    #[clap(long)]
    pub background_brightness: Option<u8>,

    /// Gray level range of the rectangles, as `lo,hi`.
    #[clap(long, value_name = "LO,HI")]
    pub rect_brightness: Option<Dual>,

    /// Opacity range of the rectangles, as `lo,hi`.
    #[clap(long, value_name = "LO,HI")]
    pub rect_alpha: Option<Dual>,

    /// Rectangle size as a percentage of the base size.
    #[clap(long, value_name = "PERCENT")]
    pub rect_scale: Option<u32>,

    /// Turn a layer on. May be repeated.
    #[clap(long, value_enum)]
    pub enable: Vec<LayerKind>,

    /// Turn a layer off. Applied after `--enable`.
    #[clap(long, value_enum)]
    pub disable: Vec<LayerKind>,

    /// Milliseconds to pause between batches, to watch a run progress.
    #[clap(long, default_value = "0")]
    pub frame_ms: u64,
}

impl Config {
    /// Applies every override that was given to `params`.
    pub fn apply(&self, params: &mut Params) {
        if let Some(iterations) = self.iterations {
            params.iterations = iterations;
        }
        if let Some(brightness) = self.background_brightness {
            params.background_brightness = brightness;
        }
        let rect = params.layer_mut(LayerKind::Rect);
        if let Some(brightness) = self.rect_brightness {
            rect.brightness = brightness;
        }
        if let Some(alpha) = self.rect_alpha {
            rect.alpha = alpha;
        }
        if let Some(scale) = self.rect_scale {
            rect.scale = scale;
        }
        for kind in &self.enable {
            params.layer_mut(*kind).enabled = true;
        }
        for kind in &self.disable {
            params.layer_mut(*kind).enabled = false;
        }
    }
}
