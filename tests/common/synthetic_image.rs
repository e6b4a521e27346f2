#![allow(dead_code)]

use staffline_detector::image::ImageU8;

pub const PAPER: u8 = 255;
pub const INK: u8 = 0;

/// Builder for synthetic score pages with horizontal staffs and stems.
pub struct PageBuilder {
    width: usize,
    height: usize,
    paper: u8,
    ink: u8,
    thickness: usize,
    data: Vec<u8>,
}

impl PageBuilder {
    pub fn new(width: usize, height: usize) -> Self {
        assert!(width > 0 && height > 0, "image dimensions must be positive");
        Self {
            width,
            height,
            paper: PAPER,
            ink: INK,
            thickness: 2,
            data: vec![PAPER; width * height],
        }
    }

    /// Change paper and ink gray levels; repaints the page.
    pub fn colors(mut self, paper: u8, ink: u8) -> Self {
        self.paper = paper;
        self.ink = ink;
        self.data.fill(paper);
        self
    }

    /// Line thickness in pixels used by subsequent drawing calls.
    pub fn thickness(mut self, thickness: usize) -> Self {
        assert!(thickness > 0, "thickness must be positive");
        self.thickness = thickness;
        self
    }

    /// Horizontal line whose top edge is at `row`, covering columns `c0..c1`.
    pub fn line(self, row: usize, c0: usize, c1: usize) -> Self {
        self.sloped_line(row as f32, c0, c1, 0.0)
    }

    /// Line with top edge at `row + slope * (x - c0)`.
    pub fn sloped_line(mut self, row: f32, c0: usize, c1: usize, slope: f32) -> Self {
        for x in c0..c1.min(self.width) {
            let top = (row + slope * (x - c0) as f32).round() as usize;
            for y in top..(top + self.thickness).min(self.height) {
                self.data[y * self.width + x] = self.ink;
            }
        }
        self
    }

    /// `lines` evenly spaced lines; `spacing` is the distance between top edges.
    pub fn staff(self, top: usize, spacing: usize, lines: usize, c0: usize, c1: usize) -> Self {
        self.sloped_staff(top as f32, spacing, lines, c0, c1, 0.0)
    }

    pub fn sloped_staff(
        mut self,
        top: f32,
        spacing: usize,
        lines: usize,
        c0: usize,
        c1: usize,
        slope: f32,
    ) -> Self {
        for i in 0..lines {
            self = self.sloped_line(top + (i * spacing) as f32, c0, c1, slope);
        }
        self
    }

    /// Vertical bar two pixels wide covering rows `r0..r1`.
    pub fn stem(mut self, col: usize, r0: usize, r1: usize) -> Self {
        for y in r0..r1.min(self.height) {
            for x in col..(col + 2).min(self.width) {
                self.data[y * self.width + x] = self.ink;
            }
        }
        self
    }

    /// Filled rectangle of an arbitrary gray level.
    pub fn block(mut self, x0: usize, y0: usize, w: usize, h: usize, value: u8) -> Self {
        for y in y0..(y0 + h).min(self.height) {
            for x in x0..(x0 + w).min(self.width) {
                self.data[y * self.width + x] = value;
            }
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.data
    }
}

/// Page without any ink.
pub fn blank_page_u8(width: usize, height: usize) -> Vec<u8> {
    vec![PAPER; width * height]
}

/// Borrow a tightly packed buffer as an image view.
pub fn view(data: &[u8], width: usize, height: usize) -> ImageU8<'_> {
    assert_eq!(data.len(), width * height, "buffer does not match dimensions");
    ImageU8 {
        w: width,
        h: height,
        stride: width,
        data,
    }
}
