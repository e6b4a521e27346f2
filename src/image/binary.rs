//! Owned binary mask, one byte per pixel (1 = ink/foreground, 0 = background).
//!
//! Used for the binarized page, the run-length filtered image and classifier
//! predictions. Out-of-range reads return background so that geometric
//! stages can probe around image borders without bounds bookkeeping.

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryImage {
    pub w: usize,
    pub h: usize,
    pub data: Vec<u8>,
}

impl BinaryImage {
    /// All-background mask of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            data: vec![0; w * h],
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(w: usize, h: usize, mut f: impl FnMut(usize, usize) -> bool) -> Self {
        let mut out = Self::new(w, h);
        for y in 0..h {
            for x in 0..w {
                if f(x, y) {
                    out.data[y * w + x] = 1;
                }
            }
        }
        out
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.w + x
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.data[self.idx(x, y)] != 0
    }

    /// Signed lookup; anything outside the image is background.
    #[inline]
    pub fn get_signed(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 || x as usize >= self.w || y as usize >= self.h {
            return false;
        }
        self.get(x as usize, y as usize)
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, v: bool) {
        let i = self.idx(x, y);
        self.data[i] = v as u8;
    }

    pub fn count_foreground(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_reads_are_background() {
        let mut img = BinaryImage::new(4, 3);
        img.set(3, 2, true);
        assert!(img.get_signed(3, 2));
        assert!(!img.get_signed(-1, 0));
        assert!(!img.get_signed(4, 2));
        assert!(!img.get_signed(0, 3));
        assert_eq!(img.count_foreground(), 1);
    }
}
