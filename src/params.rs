use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An inclusive `[lo, hi]` range for a uniform random draw. Serialized as a two-element array.
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
pub struct Dual(pub i32, pub i32);

impl Dual {
    pub fn lo(&self) -> i32 {
        self.0
    }

    pub fn hi(&self) -> i32 {
        self.1
    }

    /// Returns the same range with its ends in ascending order.
    pub fn sorted(self) -> Dual {
        Dual(self.0.min(self.1), self.0.max(self.1))
    }
}

impl Display for Dual {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.0, self.1)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("expected `lo,hi` or a single integer, got {0:?}")]
pub struct ParseDualError(String);

impl FromStr for Dual {
    type Err = ParseDualError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDualError(s.to_string());
        let parse = |v: &str| v.trim().parse::<i32>().map_err(|_| err());
        match s.split_once(',') {
            Some((lo, hi)) => Ok(Dual(parse(lo)?, parse(hi)?)),
            None => {
                let v = parse(s)?;
                Ok(Dual(v, v))
            }
        }
    }
}

/// A procedural pattern type. Enabled layers paint in declaration order on every iteration.
#[derive(
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Copy,
    Clone,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Randomly sized and placed rectangles.
    Rect,
    /// A block of evenly spaced cells.
    Grid,
    /// Full-height vertical bars.
    Cols,
    /// Full-width horizontal bars.
    Rows,
}

impl LayerKind {
    pub const ALL: [LayerKind; 4] = [
        LayerKind::Rect,
        LayerKind::Grid,
        LayerKind::Cols,
        LayerKind::Rows,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Rect => "rect",
            LayerKind::Grid => "grid",
            LayerKind::Cols => "cols",
            LayerKind::Rows => "rows",
        }
    }

    /// Whether the layer draws several shapes per iteration, and so reads `amount` and `gap`.
    pub fn is_repeated(self) -> bool {
        self != LayerKind::Rect
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayerConfig {
    pub enabled: bool,
    /// Gray level of the fill, drawn once per iteration.
    pub brightness: Dual,
    /// Opacity of the fill, drawn once per iteration.
    pub alpha: Dual,
    /// Shape size as a percentage of the base size (`W/16..=W/8`).
    pub scale: u32,
    /// Shapes per axis for repeated layers.
    pub amount: Dual,
    /// Pixels between repeated shapes.
    pub gap: u32,
}

impl Default for LayerConfig {
    fn default() -> Self {
        LayerConfig {
            enabled: false,
            brightness: Dual(0, 255),
            alpha: Dual(0, 255),
            scale: 100,
            amount: Dual(1, 1),
            gap: 0,
        }
    }
}

/// Largest `amount` a repeated layer accepts, per axis.
pub const MAX_AMOUNT: i32 = 64;

/// Largest `gap` a repeated layer accepts, in pixels.
pub const MAX_GAP: u32 = 4096;

/// Largest `scale` any layer accepts, in percent.
pub const MAX_SCALE: u32 = 1000;

/// The full parameter set of one generation run.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Params {
    pub iterations: u32,
    pub background_brightness: u8,
    #[serde(default)]
    pub layers: BTreeMap<LayerKind, LayerConfig>,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field}: range {lo},{hi} is inverted")]
    InvertedRange { field: String, lo: i32, hi: i32 },
    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },
    #[error("surface must be at least 1x1, got {width}x{height}")]
    EmptySurface { width: i32, height: i32 },
    #[error("normal surface is {normal:?} but color surface is {color:?}")]
    SizeMismatch {
        color: (i32, i32),
        normal: (i32, i32),
    },
}

impl Params {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&LayerConfig> {
        self.layers.get(&kind)
    }

    pub fn layer_mut(&mut self, kind: LayerKind) -> &mut LayerConfig {
        self.layers.entry(kind).or_default()
    }

    /// Enabled layers in painting order.
    pub fn enabled_layers(&self) -> impl Iterator<Item = (LayerKind, &LayerConfig)> {
        self.layers
            .iter()
            .filter(|(_, layer)| layer.enabled)
            .map(|(kind, layer)| (*kind, layer))
    }

    /// Checks every range of every enabled layer. Disabled layers are never drawn, so their
    /// settings are not checked.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (kind, layer) in self.enabled_layers() {
            let field = |name: &str| format!("{}.{}", kind.name(), name);
            check_dual(field("brightness"), layer.brightness, 0, 255)?;
            check_dual(field("alpha"), layer.alpha, 0, 255)?;
            check_value(field("scale"), layer.scale.into(), 0, MAX_SCALE.into())?;
            if kind.is_repeated() {
                check_dual(field("amount"), layer.amount, 0, MAX_AMOUNT)?;
                check_value(field("gap"), layer.gap.into(), 0, MAX_GAP.into())?;
            }
        }
        Ok(())
    }
}

fn check_dual(field: String, dual: Dual, min: i32, max: i32) -> Result<(), ValidationError> {
    if dual.lo() > dual.hi() {
        return Err(ValidationError::InvertedRange {
            field,
            lo: dual.lo(),
            hi: dual.hi(),
        });
    }
    check_value(field.clone(), dual.lo().into(), min.into(), max.into())?;
    check_value(field, dual.hi().into(), min.into(), max.into())
}

fn check_value(field: String, value: i64, min: i64, max: i64) -> Result<(), ValidationError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
