//! Left-to-right flow layout with line wrapping, used for the test menu.

use glam::Vec2;

#[derive(Debug, Clone)]
pub struct FlowLayout {
    gap: f32,
    right_limit: f32,
    x: f32,
    y: f32,
    row_height: f32,
    row_len: usize,
}

impl FlowLayout {
    /// Items flow between `gap` and `view_width - gap`, starting at `top`.
    pub fn new(view_width: f32, gap: f32, top: f32) -> Self {
        Self {
            gap,
            right_limit: view_width - gap,
            x: gap,
            y: top,
            row_height: 0.0,
            row_len: 0,
        }
    }

    /// Returns the top-left position for an item of `size`. An item wider than
    /// the available width still gets a row of its own.
    pub fn place(&mut self, size: Vec2) -> Vec2 {
        if self.row_len > 0 && self.x + size.x > self.right_limit {
            self.x = self.gap;
            self.y += self.row_height + self.gap;
            self.row_height = 0.0;
            self.row_len = 0;
        }
        let pos = Vec2::new(self.x, self.y);
        self.row_height = self.row_height.max(size.y);
        self.row_len += 1;
        self.x += size.x + self.gap;
        pos
    }

    /// Y coordinate just below the current row.
    pub fn bottom(&self) -> f32 {
        self.y + self.row_height
    }
}

pub fn flow(sizes: &[Vec2], view_width: f32, gap: f32, top: f32) -> Vec<Vec2> {
    let mut layout = FlowLayout::new(view_width, gap, top);
    sizes.iter().map(|size| layout.place(*size)).collect()
}
