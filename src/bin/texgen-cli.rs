use core::fmt::Debug;
use std::path::PathBuf;
use std::time::Duration;
use std::{fmt::Display, str::FromStr};

use anyhow::Context;
use clap::Parser;
use texgen::batch::Paced;
use texgen::params::Params;

#[derive(Parser)]
struct Opts {
    /// 32-byte hex seed. A fresh random seed is used if omitted.
    seed: Option<Seed>,
    #[clap(short = 'W', long, default_value = "512")]
    width: i32,
    #[clap(short = 'H', long, default_value = "512")]
    height: i32,
    /// Directory to write `<seed>-color.png` and `<seed>-normal.png` into.
    #[clap(short, long, default_value = ".")]
    out_dir: PathBuf,
    /// Print the resolved parameter set as JSON before rendering.
    #[clap(long)]
    print_params: bool,
    #[clap(flatten)]
    config: texgen::config::Config,
}

#[derive(Copy, Clone)]
struct Seed(pub [u8; 32]);
impl Seed {
    fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    fn random() -> Self {
        Seed(rand::random())
    }
}
impl FromStr for Seed {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes: Vec<u8> = hex::decode(s)?;
        let bytes = <[u8; 32]>::try_from(bytes)
            .map_err(|b| anyhow::anyhow!("seed must be 32 bytes, got {}", b.len()))?;
        Ok(Seed(bytes))
    }
}
impl Debug for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
impl Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <Self as Debug>::fmt(self, f)
    }
}

fn load_params(opts: &Opts, rng: &mut texgen::rand::Rng) -> anyhow::Result<Params> {
    let mut params = if let Some(path) = &opts.config.params {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read params at {}", path.display()))?;
        Params::from_json(&json)
            .with_context(|| format!("Failed to parse params at {}", path.display()))?
    } else if opts.config.randomize {
        Params::randomize(rng)
    } else {
        Params::default()
    };
    opts.config.apply(&mut params);
    Ok(params)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let opts = Opts::parse();
    let seed = opts.seed.unwrap_or_else(Seed::random);
    let mut rng = texgen::rand::Rng::from_seed(seed.as_bytes());

    let params = load_params(&opts, &mut rng)?;
    if opts.print_params {
        println!("{}", params.to_json()?);
    }
    tracing::info!(%seed, iterations = params.iterations, "rendering");

    let mut pace = Paced {
        interval: Duration::from_millis(opts.config.frame_ms),
    };
    let render = texgen::art::draw_with(opts.width, opts.height, &params, &mut rng, &mut pace)
        .context("Invalid render settings")?;
    tracing::info!(
        "rendered in {:.1} ms",
        render.elapsed.as_secs_f64() * 1000.0
    );

    for (suffix, dt) in [("color", &render.color), ("normal", &render.normal)] {
        let path = opts.out_dir.join(format!("{}-{}.png", seed, suffix));
        dt.write_png(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("wrote png: {}", path.display());
    }
    Ok(())
}
