//! Basic geometric types used by the layout engine.
//!
//! All values are in pixels. The layout grid works in whole spacing units,
//! but once a unit has been multiplied out every coordinate is an `f32`.

/// A position in the canvas coordinate space, origin top-left.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

/// Width and height of a box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns a new Size with the maximum width and height between this size and another
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new Size with padding added to both width and height
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Returns a new Size with the width replaced.
    pub fn with_width(self, width: f32) -> Self {
        Self { width, ..self }
    }

    /// Returns a new Size with the height replaced.
    pub fn with_height(self, height: f32) -> Self {
        Self { height, ..self }
    }

    /// Returns true if both width and height are zero
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// Spacing around a box's content with a value per side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides
    pub fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns a new Insets with `extra` added to the top inset.
    ///
    /// Used to reserve the title band of labelled sections and cards.
    pub fn grow_top(self, extra: f32) -> Self {
        Self {
            top: self.top + extra,
            ..self
        }
    }

    /// Offset of the content origin inside the padded box.
    pub fn origin(self) -> Point {
        Point::new(self.left, self.top)
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn test_point_add() {
        let result = Point::new(1.0, 2.0).add_point(Point::new(3.0, 4.0));
        assert_eq!(result, Point::new(4.0, 6.0));
        assert!(Point::default().is_zero());
    }

    #[test]
    fn test_size_max() {
        let max_size = Size::new(10.0, 20.0).max(Size::new(15.0, 18.0));
        assert_eq!(max_size.width(), 15.0);
        assert_eq!(max_size.height(), 20.0);
    }

    #[test]
    fn test_size_add_padding() {
        let padded = Size::new(10.0, 20.0).add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(padded.width(), 16.0);
        assert_eq!(padded.height(), 24.0);
    }

    #[test]
    fn test_size_replacements() {
        let size = Size::new(10.0, 20.0);
        assert_eq!(size.with_width(5.0), Size::new(5.0, 20.0));
        assert_eq!(size.with_height(0.0), Size::new(10.0, 0.0));
        assert!(Size::default().is_zero());
    }

    #[test]
    fn test_insets_grow_top() {
        let insets = Insets::uniform(16.0).grow_top(24.0);
        assert_eq!(insets.top(), 40.0);
        assert_eq!(insets.bottom(), 16.0);
        assert_eq!(insets.vertical_sum(), 56.0);
        assert_eq!(insets.origin(), Point::new(16.0, 40.0));
    }

    #[test]
    fn test_fractional_padding() {
        let padded = Size::new(0.1, 0.2).add_padding(Insets::uniform(0.35));
        assert!(approx_eq!(f32, padded.width(), 0.8, ulps = 2));
        assert!(approx_eq!(f32, padded.height(), 0.9, ulps = 2));
    }
}
