//! Per-iteration shape generation for each layer kind.
//!
//! Every layer picks one fill color per iteration and one or more rectangles. Shape sizes derive
//! from the surface *width* in both dimensions, so the same parameters give the same shape sizes on
//! a tall or wide surface. Shapes may hang over any edge by up to half their extent.

use crate::math::{percent, round, round_div};
use crate::params::{LayerConfig, LayerKind};
use crate::rand::RandomSource;
use crate::surface::{Rect, Rgba, Surface};

/// What one layer draws in one iteration.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Stroke {
    pub color: Rgba,
    pub rects: Vec<Rect>,
}

/// Paints one iteration of `kind` onto `surface`.
pub fn paint<S, R>(kind: LayerKind, layer: &LayerConfig, surface: &mut S, rng: &mut R)
where
    S: Surface + ?Sized,
    R: RandomSource + ?Sized,
{
    let stroke = plan(kind, layer, surface.extent(), rng);
    for rect in stroke.rects {
        surface.paint_rect(rect, stroke.color);
    }
}

/// Draws the random choices for one iteration of `kind` on a surface of size `(w, h)`.
pub fn plan<R>(kind: LayerKind, layer: &LayerConfig, (w, h): (i32, i32), rng: &mut R) -> Stroke
where
    R: RandomSource + ?Sized,
{
    let color = pick_color(layer, rng);
    let rects = match kind {
        LayerKind::Rect => vec![rect(layer, (w, h), rng)],
        LayerKind::Grid => grid(layer, (w, h), rng),
        LayerKind::Cols => bars(layer, w, w, rng)
            .into_iter()
            .map(|(x, bar)| Rect { x, y: 0, w: bar, h })
            .collect(),
        LayerKind::Rows => bars(layer, w, h, rng)
            .into_iter()
            .map(|(y, bar)| Rect { x: 0, y, w, h: bar })
            .collect(),
    };
    Stroke { color, rects }
}

fn pick_color<R: RandomSource + ?Sized>(layer: &LayerConfig, rng: &mut R) -> Rgba {
    let x = rng.integer(layer.brightness.lo(), layer.brightness.hi());
    let a = rng.integer(layer.alpha.lo(), layer.alpha.hi());
    Rgba::gray_alpha(channel(x), channel(a))
}

fn channel(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// A side length between `W/16` and `W/8`, scaled by the layer's percentage.
fn pick_size<R: RandomSource + ?Sized>(layer: &LayerConfig, w: i32, rng: &mut R) -> i32 {
    let base = rng.integer(round_div(w, 16), round_div(w, 8));
    percent(base, layer.scale)
}

/// Start of a span of length `extent` inside `0..limit`, overhanging either end by at most half.
fn pick_offset<R: RandomSource + ?Sized>(extent: i32, limit: i32, rng: &mut R) -> i32 {
    let half = f64::from(extent) / 2.0;
    rng.integer(round(-half), round(f64::from(limit) - half))
}

fn rect<R: RandomSource + ?Sized>(layer: &LayerConfig, (w, h): (i32, i32), rng: &mut R) -> Rect {
    let rect_w = pick_size(layer, w, rng);
    let rect_h = pick_size(layer, w, rng);
    let x = pick_offset(rect_w, w, rng);
    let y = pick_offset(rect_h, h, rng);
    Rect {
        x,
        y,
        w: rect_w,
        h: rect_h,
    }
}

fn pick_amount<R: RandomSource + ?Sized>(layer: &LayerConfig, rng: &mut R) -> i32 {
    rng.integer(layer.amount.lo(), layer.amount.hi()).max(0)
}

/// Total length of `n` cells of length `cell` separated by `gap`, saturating at `i32::MAX`.
fn span(n: i32, cell: i32, gap: i32) -> i32 {
    if n == 0 {
        0
    } else {
        n.saturating_mul(cell)
            .saturating_add((n - 1).saturating_mul(gap))
    }
}

fn gap_px(layer: &LayerConfig) -> i32 {
    i32::try_from(layer.gap).unwrap_or(i32::MAX)
}

/// Start of the `i`th cell in a row of cells that begins at `start`.
fn nth(start: i32, i: i32, cell: i32, gap: i32) -> i32 {
    start.saturating_add(i.saturating_mul(cell.saturating_add(gap)))
}

fn grid<R: RandomSource + ?Sized>(
    layer: &LayerConfig,
    (w, h): (i32, i32),
    rng: &mut R,
) -> Vec<Rect> {
    let gap = gap_px(layer);
    let nx = pick_amount(layer, rng);
    let ny = pick_amount(layer, rng);
    let cell_w = pick_size(layer, w, rng);
    let cell_h = pick_size(layer, w, rng);
    let x0 = pick_offset(span(nx, cell_w, gap), w, rng);
    let y0 = pick_offset(span(ny, cell_h, gap), h, rng);

    let mut rects = Vec::with_capacity(usize::try_from(nx.saturating_mul(ny)).unwrap_or(0));
    for row in 0..ny {
        for col in 0..nx {
            rects.push(Rect {
                x: nth(x0, col, cell_w, gap),
                y: nth(y0, row, cell_h, gap),
                w: cell_w,
                h: cell_h,
            });
        }
    }
    rects
}

/// Offsets and thickness of parallel bars laid across an axis of length `limit`. Thickness derives
/// from the surface width `w` whichever axis the bars run along.
fn bars<R: RandomSource + ?Sized>(
    layer: &LayerConfig,
    w: i32,
    limit: i32,
    rng: &mut R,
) -> Vec<(i32, i32)> {
    let gap = gap_px(layer);
    let n = pick_amount(layer, rng);
    let thickness = pick_size(layer, w, rng);
    let start = pick_offset(span(n, thickness, gap), limit, rng);
    (0..n)
        .map(|i| (nth(start, i, thickness, gap), thickness))
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::params::Dual;
    use crate::rand::{Extremes, Rng};
    use raqote::DrawTarget;

    fn layer(scale: u32) -> LayerConfig {
        LayerConfig {
            enabled: true,
            brightness: Dual(30, 90),
            alpha: Dual(5, 9),
            scale,
            amount: Dual(1, 1),
            gap: 0,
        }
    }

    #[test]
    fn test_rect_geometry_bounds() {
        let mut rng = Rng::from_seed(b"geometry");
        for (scale, lo, hi) in [(100, 20, 40), (50, 10, 20)] {
            for _ in 0..500 {
                let stroke = plan(LayerKind::Rect, &layer(scale), (320, 200), &mut rng);
                let [r] = stroke.rects.as_slice() else {
                    panic!("expected one rect, got {:?}", stroke.rects);
                };
                assert!((lo..=hi).contains(&r.w), "{:?}", r);
                assert!((lo..=hi).contains(&r.h), "{:?}", r);
                assert!(r.x >= round(-f64::from(r.w) / 2.0), "{:?}", r);
                assert!(r.x <= round(320.0 - f64::from(r.w) / 2.0), "{:?}", r);
                assert!(r.y >= round(-f64::from(r.h) / 2.0), "{:?}", r);
                assert!(r.y <= round(200.0 - f64::from(r.h) / 2.0), "{:?}", r);
                assert!((30..=90).contains(&stroke.color.r));
                assert!((5..=9).contains(&stroke.color.a));
            }
        }
    }

    #[test]
    fn test_rect_extremes() {
        let low = plan(LayerKind::Rect, &layer(100), (320, 200), &mut Extremes::low());
        assert_eq!(low.color, Rgba::gray_alpha(30, 5));
        assert_eq!(
            low.rects,
            vec![Rect {
                x: -10,
                y: -10,
                w: 20,
                h: 20
            }]
        );

        let high = plan(LayerKind::Rect, &layer(100), (320, 200), &mut Extremes::high());
        assert_eq!(high.color, Rgba::gray_alpha(90, 9));
        assert_eq!(
            high.rects,
            vec![Rect {
                x: 300,
                y: 180,
                w: 40,
                h: 40
            }]
        );
    }

    #[test]
    fn test_rect_height_follows_width() {
        let stroke = plan(LayerKind::Rect, &layer(100), (160, 1600), &mut Extremes::low());
        assert_eq!((stroke.rects[0].w, stroke.rects[0].h), (10, 10));
    }

    #[test]
    fn test_grid() {
        let grid = LayerConfig {
            amount: Dual(2, 3),
            gap: 4,
            ..layer(100)
        };
        let stroke = plan(LayerKind::Grid, &grid, (320, 200), &mut Extremes::high());
        assert_eq!(stroke.rects.len(), 9);
        // 3 cells of 40 with 2 gaps of 4 span 128, hanging 64 past the far edges.
        assert_eq!(
            stroke.rects[0],
            Rect {
                x: 256,
                y: 136,
                w: 40,
                h: 40
            }
        );
        assert_eq!(stroke.rects[1].x, 300);
        assert_eq!(stroke.rects[3].y, 180);
        assert_eq!(stroke.rects[8].x, 344);
    }

    #[test]
    fn test_cols() {
        let cols = LayerConfig {
            amount: Dual(2, 5),
            gap: 10,
            ..layer(100)
        };
        let stroke = plan(LayerKind::Cols, &cols, (320, 200), &mut Extremes::low());
        assert_eq!(
            stroke.rects,
            vec![
                Rect {
                    x: -25,
                    y: 0,
                    w: 20,
                    h: 200
                },
                Rect {
                    x: 5,
                    y: 0,
                    w: 20,
                    h: 200
                },
            ]
        );
    }

    #[test]
    fn test_rows() {
        let rows = LayerConfig {
            amount: Dual(1, 3),
            ..layer(100)
        };
        let stroke = plan(LayerKind::Rows, &rows, (320, 200), &mut Extremes::high());
        let ys: Vec<i32> = stroke.rects.iter().map(|r| r.y).collect();
        assert_eq!(ys, vec![140, 180, 220]);
        assert!(stroke.rects.iter().all(|r| r.x == 0 && r.w == 320 && r.h == 40));
    }

    #[test]
    fn test_span_saturates() {
        assert_eq!(span(3, 40, 4), 128);
        assert_eq!(span(50_000, 50_000, 4), i32::MAX);
        assert_eq!(span(2, 20, i32::MAX), i32::MAX);
    }

    #[test]
    fn test_huge_gap_keeps_bars_in_order() {
        let cols = LayerConfig {
            amount: Dual(2, 2),
            gap: u32::MAX,
            ..layer(100)
        };
        let stroke = plan(LayerKind::Cols, &cols, (320, 200), &mut Extremes::low());
        let xs: Vec<i32> = stroke.rects.iter().map(|r| r.x).collect();
        assert_eq!(xs, vec![-1_073_741_823, 1_073_741_824]);
    }

    #[test]
    fn test_zero_amount_draws_nothing() {
        let grid = LayerConfig {
            amount: Dual(0, 0),
            ..layer(100)
        };
        for kind in [LayerKind::Grid, LayerKind::Cols, LayerKind::Rows] {
            let stroke = plan(kind, &grid, (64, 64), &mut Extremes::low());
            assert!(stroke.rects.is_empty(), "{:?}", kind);
        }
    }

    #[test]
    fn test_paint_composites_onto_surface() {
        let mut dt = DrawTarget::new(64, 64);
        dt.flood(Rgba::gray(0));
        let opaque = LayerConfig {
            brightness: Dual(200, 200),
            alpha: Dual(255, 255),
            ..layer(100)
        };
        // 8x8 at (60, 60): only the top-left quarter lands on the surface.
        paint(LayerKind::Rect, &opaque, &mut dt, &mut Extremes::high());
        let rgba = dt.snapshot();
        let red = |x: usize, y: usize| rgba[(y * 64 + x) * 4];
        assert_eq!(red(62, 62), 200);
        assert_eq!(red(60, 63), 200);
        assert_eq!(red(59, 62), 0);
        assert_eq!(red(10, 10), 0);
    }
}
