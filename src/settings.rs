//! Bounds and defaults for every user-adjustable setting, and the "randomize" action that
//! resamples a whole [`Params`] within those bounds.

use std::collections::BTreeMap;

use crate::params::{Dual, LayerConfig, LayerKind, Params};
use crate::rand::RandomSource;

#[derive(Debug, Copy, Clone)]
pub struct Setting {
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

#[derive(Debug, Copy, Clone)]
pub struct DualSetting {
    pub min: i32,
    pub max: i32,
    pub default: Dual,
}

#[derive(Debug, Copy, Clone)]
pub struct LayerSettings {
    pub enabled: bool,
    pub brightness: DualSetting,
    pub alpha: DualSetting,
    pub scale: Setting,
    /// Only present for repeated layers.
    pub amount: Option<DualSetting>,
    /// Only present for repeated layers.
    pub gap: Option<Setting>,
}

pub const ITERATIONS: Setting = Setting {
    min: 1,
    max: 5000,
    default: 1000,
};

pub const BACKGROUND_BRIGHTNESS: Setting = Setting {
    min: 0,
    max: 255,
    default: 127,
};

const FULL_BRIGHTNESS: DualSetting = DualSetting {
    min: 0,
    max: 255,
    default: Dual(0, 255),
};

pub const RECT: LayerSettings = LayerSettings {
    enabled: true,
    brightness: FULL_BRIGHTNESS,
    alpha: DualSetting {
        min: 0,
        max: 255,
        default: Dual(10, 50),
    },
    scale: Setting {
        min: 10,
        max: 300,
        default: 100,
    },
    amount: None,
    gap: None,
};

pub const GRID: LayerSettings = LayerSettings {
    enabled: false,
    brightness: FULL_BRIGHTNESS,
    alpha: DualSetting {
        min: 0,
        max: 255,
        default: Dual(10, 40),
    },
    scale: Setting {
        min: 10,
        max: 200,
        default: 50,
    },
    amount: Some(DualSetting {
        min: 1,
        max: 8,
        default: Dual(2, 4),
    }),
    gap: Some(Setting {
        min: 0,
        max: 40,
        default: 4,
    }),
};

pub const COLS: LayerSettings = LayerSettings {
    enabled: false,
    brightness: FULL_BRIGHTNESS,
    alpha: DualSetting {
        min: 0,
        max: 255,
        default: Dual(5, 30),
    },
    scale: Setting {
        min: 5,
        max: 100,
        default: 25,
    },
    amount: Some(DualSetting {
        min: 1,
        max: 12,
        default: Dual(2, 6),
    }),
    gap: Some(Setting {
        min: 0,
        max: 60,
        default: 8,
    }),
};

pub const ROWS: LayerSettings = COLS;

impl LayerKind {
    pub fn settings(self) -> &'static LayerSettings {
        match self {
            LayerKind::Rect => &RECT,
            LayerKind::Grid => &GRID,
            LayerKind::Cols => &COLS,
            LayerKind::Rows => &ROWS,
        }
    }
}

impl LayerSettings {
    pub fn defaults(&self) -> LayerConfig {
        let fallback = LayerConfig::default();
        LayerConfig {
            enabled: self.enabled,
            brightness: self.brightness.default,
            alpha: self.alpha.default,
            scale: self.scale.default as u32,
            amount: self.amount.map_or(fallback.amount, |s| s.default),
            gap: self.gap.map_or(fallback.gap, |s| s.default as u32),
        }
    }

    fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> LayerConfig {
        let defaults = self.defaults();
        LayerConfig {
            enabled: rng.boolean(),
            brightness: self.brightness.sample(rng),
            alpha: self.alpha.sample(rng),
            scale: self.scale.sample(rng) as u32,
            amount: self.amount.map_or(defaults.amount, |s| s.sample(rng)),
            gap: self.gap.map_or(defaults.gap, |s| s.sample(rng) as u32),
        }
    }
}

impl Setting {
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> i32 {
        rng.integer(self.min, self.max)
    }
}

impl DualSetting {
    /// Two independent draws, sorted so the result is a valid range.
    pub fn sample<R: RandomSource + ?Sized>(&self, rng: &mut R) -> Dual {
        let a = rng.integer(self.min, self.max);
        let b = rng.integer(self.min, self.max);
        Dual(a, b).sorted()
    }
}

impl Default for Params {
    fn default() -> Self {
        Params {
            iterations: ITERATIONS.default as u32,
            background_brightness: BACKGROUND_BRIGHTNESS.default as u8,
            layers: LayerKind::ALL
                .iter()
                .map(|kind| (*kind, kind.settings().defaults()))
                .collect(),
        }
    }
}

impl Params {
    /// Resamples every setting uniformly within its bounds. Each `enabled` flag is an independent
    /// coin flip.
    pub fn randomize<R: RandomSource + ?Sized>(rng: &mut R) -> Params {
        let iterations = ITERATIONS.sample(rng) as u32;
        let background_brightness = BACKGROUND_BRIGHTNESS.sample(rng) as u8;
        let mut layers = BTreeMap::new();
        for kind in LayerKind::ALL {
            layers.insert(kind, kind.settings().sample(rng));
        }
        Params {
            iterations,
            background_brightness,
            layers,
        }
    }
}
