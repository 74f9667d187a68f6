use raqote::{DrawOptions, DrawTarget, SolidSource, Source};

/// An unpremultiplied 8-bit color.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Opaque gray.
    pub fn gray(x: u8) -> Self {
        Rgba::gray_alpha(x, 255)
    }

    pub fn gray_alpha(x: u8, a: u8) -> Self {
        Rgba { r: x, g: x, b: x, a }
    }
}

/// Integer pixel rectangle. May extend past any edge of a surface.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }
}

/// A raster target the generator paints on.
///
/// Pixel snapshots are packed, row-major, unpremultiplied RGBA bytes with the origin at the top
/// left, four bytes per pixel.
pub trait Surface {
    /// Width and height in pixels.
    fn extent(&self) -> (i32, i32);

    /// Resets every pixel to transparent black.
    fn erase(&mut self);

    /// Composites a solid rectangle over the existing pixels (source-over).
    fn paint_rect(&mut self, rect: Rect, color: Rgba);

    /// Composites `color` over the whole surface.
    fn flood(&mut self, color: Rgba) {
        let (w, h) = self.extent();
        self.paint_rect(Rect { x: 0, y: 0, w, h }, color);
    }

    fn snapshot(&self) -> Vec<u8>;

    /// Replaces every pixel at once.
    ///
    /// # Panics
    ///
    /// Panics if `rgba` does not hold exactly `4 * width * height` bytes.
    fn publish(&mut self, rgba: &[u8]);
}

impl Surface for DrawTarget {
    fn extent(&self) -> (i32, i32) {
        (self.width(), self.height())
    }

    fn erase(&mut self) {
        self.clear(SolidSource {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        });
    }

    fn paint_rect(&mut self, rect: Rect, color: Rgba) {
        if rect.is_empty() {
            return;
        }
        let src = Source::Solid(SolidSource::from_unpremultiplied_argb(
            color.a, color.r, color.g, color.b,
        ));
        self.fill_rect(
            rect.x as f32,
            rect.y as f32,
            rect.w as f32,
            rect.h as f32,
            &src,
            &DrawOptions::new(),
        );
    }

    fn snapshot(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.get_data().len() * 4);
        for px in self.get_data() {
            let [b, g, r, a] = px.to_le_bytes();
            rgba.extend_from_slice(&[
                unpremultiply(r, a),
                unpremultiply(g, a),
                unpremultiply(b, a),
                a,
            ]);
        }
        rgba
    }

    fn publish(&mut self, rgba: &[u8]) {
        let data = self.get_data_mut();
        assert_eq!(rgba.len(), data.len() * 4, "pixel buffer size mismatch");
        for (px, chunk) in data.iter_mut().zip(rgba.chunks_exact(4)) {
            let s = SolidSource::from_unpremultiplied_argb(chunk[3], chunk[0], chunk[1], chunk[2]);
            *px = u32::from_le_bytes([s.b, s.g, s.r, s.a]);
        }
    }
}

fn unpremultiply(c: u8, a: u8) -> u8 {
    match a {
        0 => 0,
        255 => c,
        a => ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn pixel(dt: &DrawTarget, x: i32, y: i32) -> [u8; 4] {
        let rgba = dt.snapshot();
        let i = ((y * dt.width() + x) * 4) as usize;
        rgba[i..i + 4].try_into().unwrap()
    }

    #[test]
    fn test_erase_and_fill() {
        let mut dt = DrawTarget::new(3, 2);
        dt.flood(Rgba::gray(90));
        assert!(dt.snapshot().chunks(4).all(|px| px == [90, 90, 90, 255]));
        dt.erase();
        assert!(dt.snapshot().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_opaque_rect_is_clipped() {
        let mut dt = DrawTarget::new(8, 8);
        dt.flood(Rgba::gray(0));
        dt.paint_rect(Rect { x: -2, y: 6, w: 4, h: 4 }, Rgba::gray(200));
        assert_eq!(pixel(&dt, 0, 7), [200, 200, 200, 255]);
        assert_eq!(pixel(&dt, 1, 6), [200, 200, 200, 255]);
        assert_eq!(pixel(&dt, 2, 6), [0, 0, 0, 255]);
        assert_eq!(pixel(&dt, 0, 5), [0, 0, 0, 255]);
    }

    #[test]
    fn test_translucent_rect_blends() {
        let mut dt = DrawTarget::new(4, 4);
        dt.flood(Rgba::gray(0));
        dt.paint_rect(Rect { x: 0, y: 0, w: 4, h: 4 }, Rgba::gray_alpha(255, 128));
        let [r, g, b, a] = pixel(&dt, 1, 1);
        assert_eq!(a, 255);
        assert_eq!((r, r), (g, b));
        assert!((126..=130).contains(&r), "got {}", r);
    }

    #[test]
    fn test_empty_rect_is_ignored() {
        let mut dt = DrawTarget::new(4, 4);
        dt.flood(Rgba::gray(10));
        dt.paint_rect(Rect { x: 0, y: 0, w: 0, h: 4 }, Rgba::gray(200));
        dt.paint_rect(Rect { x: 0, y: 0, w: 4, h: -1 }, Rgba::gray(200));
        assert!(dt.snapshot().chunks(4).all(|px| px == [10, 10, 10, 255]));
    }

    #[test]
    fn test_publish_replaces_pixels() {
        let mut dt = DrawTarget::new(2, 1);
        dt.flood(Rgba::gray(33));
        dt.publish(&[1, 2, 3, 255, 4, 5, 6, 255]);
        assert_eq!(dt.snapshot(), vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_unpremultiply() {
        assert_eq!(unpremultiply(0, 0), 0);
        assert_eq!(unpremultiply(77, 255), 77);
        assert_eq!(unpremultiply(64, 128), 128);
        assert_eq!(unpremultiply(200, 100), 255);
    }
}
