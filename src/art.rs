use std::time::{Duration, Instant};

use raqote::DrawTarget;

use crate::batch::{self, Immediate, Scheduler};
use crate::layers;
use crate::normal;
use crate::params::{Params, ValidationError};
use crate::rand::RandomSource;
use crate::surface::{Rgba, Surface};

/// Iterations painted between two hand-offs to the host. Smaller batches give smoother progress
/// at the cost of more hand-offs.
pub const BATCH_SIZE: u32 = 50;

/// An in-flight generation run.
///
/// It borrows both surfaces exclusively until the run ends. Schedulers receive it between batches
/// and can inspect the partially painted color surface, but cannot change anything.
pub struct Generation<'a, S, R: ?Sized> {
    color: &'a mut S,
    normal: &'a mut S,
    params: &'a Params,
    rng: &'a mut R,
    painted: u32,
}

impl<'a, S: Surface, R: RandomSource + ?Sized> Generation<'a, S, R> {
    /// Validates everything up front, then clears both surfaces and lays down the background.
    /// Nothing is drawn if validation fails.
    fn start(
        color: &'a mut S,
        normal: &'a mut S,
        params: &'a Params,
        rng: &'a mut R,
    ) -> Result<Self, ValidationError> {
        let (width, height) = color.extent();
        if width <= 0 || height <= 0 {
            return Err(ValidationError::EmptySurface { width, height });
        }
        if normal.extent() != (width, height) {
            return Err(ValidationError::SizeMismatch {
                color: (width, height),
                normal: normal.extent(),
            });
        }
        params.validate()?;

        color.erase();
        normal.erase();
        color.flood(Rgba::gray(params.background_brightness));
        Ok(Generation {
            color,
            normal,
            params,
            rng,
            painted: 0,
        })
    }

    pub fn color(&self) -> &S {
        self.color
    }

    /// Blank until the run completes.
    pub fn normal(&self) -> &S {
        self.normal
    }

    pub fn params(&self) -> &Params {
        self.params
    }

    /// Iterations painted so far.
    pub fn painted(&self) -> u32 {
        self.painted
    }

    fn paint_iteration(&mut self) {
        let params = self.params;
        for (kind, layer) in params.enabled_layers() {
            layers::paint(kind, layer, &mut *self.color, &mut *self.rng);
        }
        self.painted += 1;
    }

    fn synthesize_normals(&mut self) {
        let (width, height) = self.color.extent();
        let normals = normal::synthesize(&self.color.snapshot(), width as usize, height as usize);
        self.normal.publish(&normals);
    }
}

/// Paints a texture into `color` and its normal map into `normal`.
///
/// Both surfaces are cleared and `color` is filled with the background before
/// `params.iterations` iterations are painted, [`BATCH_SIZE`] at a time with `scheduler` called in
/// between. The normal map is computed from the finished color surface and written in one step.
/// `on_complete` then receives the wall-clock time of the whole run.
///
/// Returns an error, without touching either surface, if `params` or the surface sizes are
/// invalid. `on_complete` is not called in that case.
pub fn generate<'a, S, R, Sch>(
    color: &'a mut S,
    normal: &'a mut S,
    on_complete: impl FnOnce(Duration),
    params: &'a Params,
    rng: &'a mut R,
    scheduler: &mut Sch,
) -> Result<(), ValidationError>
where
    S: Surface,
    R: RandomSource + ?Sized,
    Sch: Scheduler<Generation<'a, S, R>> + ?Sized,
{
    let started = Instant::now();
    let mut run = Generation::start(color, normal, params, rng)?;
    let (width, height) = run.color().extent();
    tracing::debug!(width, height, iterations = params.iterations, "generation started");

    batch::run(
        scheduler,
        &mut run,
        params.iterations,
        BATCH_SIZE,
        Generation::paint_iteration,
        Generation::synthesize_normals,
    );

    let elapsed = started.elapsed();
    tracing::debug!(?elapsed, "generation complete");
    on_complete(elapsed);
    Ok(())
}

/// A finished texture and its normal map.
pub struct Render {
    pub color: DrawTarget,
    pub normal: DrawTarget,
    pub elapsed: Duration,
}

/// Renders onto fresh `width` x `height` surfaces without yielding between batches.
pub fn draw<R: RandomSource + ?Sized>(
    width: i32,
    height: i32,
    params: &Params,
    rng: &mut R,
) -> Result<Render, ValidationError> {
    draw_with(width, height, params, rng, &mut Immediate)
}

/// Like [`draw`], handing off to `scheduler` between batches.
pub fn draw_with<R, Sch>(
    width: i32,
    height: i32,
    params: &Params,
    rng: &mut R,
    scheduler: &mut Sch,
) -> Result<Render, ValidationError>
where
    R: RandomSource + ?Sized,
    Sch: for<'a> Scheduler<Generation<'a, DrawTarget, R>> + ?Sized,
{
    if width <= 0 || height <= 0 {
        return Err(ValidationError::EmptySurface { width, height });
    }
    let mut color = DrawTarget::new(width, height);
    let mut normal = DrawTarget::new(width, height);
    let mut elapsed = Duration::ZERO;
    generate(
        &mut color,
        &mut normal,
        |e| elapsed = e,
        params,
        rng,
        scheduler,
    )?;
    Ok(Render {
        color,
        normal,
        elapsed,
    })
}
