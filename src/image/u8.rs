use crate::image::traits::ImageView;

/// Borrowed 8-bit grayscale view (0 = black, 255 = white).
#[derive(Clone, Debug)]
pub struct ImageU8<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> ImageU8<'a> {
    /// Convert to an owned float image with values in [0, 1].
    pub fn to_f32(&self) -> crate::image::ImageF32 {
        let mut out = crate::image::ImageF32::new(self.w, self.h);
        for (y, row) in self.rows().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                out.set(x, y, v as f32 / 255.0);
            }
        }
        out
    }
}

impl<'a> ImageView for ImageU8<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
}
