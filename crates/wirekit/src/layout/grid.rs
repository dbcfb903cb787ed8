//! Column grid with auto-placement.
//!
//! Children are assigned to cells of an occupancy grid in document order.
//! Explicit starts are honoured even when the cells are taken, which counts
//! as a collision; everything else goes to the first free block, scanning
//! rows top-down and columns left-to-right.

use log::trace;

use wirekit_core::{
    document::{Node, PlacementTokens},
    layout_box::LayoutBox,
};
use wirekit_parser::error::ErrorCode;

use super::Pass;

const DEFAULT_COLUMNS: usize = 12;
const MAX_COLUMNS: usize = 24;
/// Largest row span; each child can push the grid down by at most this much.
const MAX_ROW_SPAN: usize = 24;

/// Occupied cells, one row of flags per grid row.
#[derive(Debug, Default)]
struct Occupancy {
    columns: usize,
    rows: Vec<Vec<bool>>,
}

impl Occupancy {
    fn new(columns: usize) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    fn is_free(&self, row: usize, column: usize, col_span: usize, row_span: usize) -> bool {
        if column + col_span > self.columns {
            return false;
        }
        (row..row + row_span).all(|r| {
            self.rows
                .get(r)
                .is_none_or(|cells| cells[column..column + col_span].iter().all(|taken| !taken))
        })
    }

    /// First row at which the block starting at `column` is free.
    fn first_free_row(&self, column: usize, col_span: usize, row_span: usize) -> usize {
        (0..)
            .find(|&row| self.is_free(row, column, col_span, row_span))
            .unwrap_or_default()
    }

    /// First column in `row` at which the block is free.
    fn first_free_column(&self, row: usize, col_span: usize, row_span: usize) -> Option<usize> {
        (0..=self.columns - col_span).find(|&column| self.is_free(row, column, col_span, row_span))
    }

    /// First free block in row-major order.
    fn first_free(&self, col_span: usize, row_span: usize) -> (usize, usize) {
        // A row past every occupied one is always free.
        (0..=self.rows.len())
            .find_map(|row| {
                self.first_free_column(row, col_span, row_span)
                    .map(|column| (row, column))
            })
            .unwrap_or((self.rows.len(), 0))
    }

    /// Occupy a block. Returns `true` if any cell was already taken.
    fn mark(&mut self, row: usize, column: usize, col_span: usize, row_span: usize) -> bool {
        if self.rows.len() < row + row_span {
            self.rows.resize(row + row_span, vec![false; self.columns]);
        }
        let mut collided = false;
        for cells in &mut self.rows[row..row + row_span] {
            for cell in &mut cells[column..column + col_span] {
                collided |= *cell;
                *cell = true;
            }
        }
        collided
    }
}

/// A child's block on the grid, zero-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    row: usize,
    column: usize,
    col_span: usize,
    row_span: usize,
}

impl Pass<'_> {
    pub(super) fn layout_grid(
        &mut self,
        node: &Node,
        layout_box: &mut LayoutBox,
        available: f32,
        forced: Option<f32>,
    ) {
        let (pad, gap) = self.spacing(node);
        let width = self.resolve_width(node, available, forced);
        let content_width = (width - 2.0 * pad).max(0.0);
        let columns = node
            .props
            .number("cols")
            .map_or(DEFAULT_COLUMNS, |cols| {
                (cols.round() as usize).clamp(1, MAX_COLUMNS)
            });
        let column_width = ((content_width - gap * (columns - 1) as f32) / columns as f32).max(0.0);

        let row_limit = node.children.len().max(1) * MAX_ROW_SPAN;
        let mut occupancy = Occupancy::new(columns);
        let mut placed = Vec::with_capacity(node.children.len());
        for child in &node.children {
            let cell = self.place_child(child, &mut occupancy, row_limit);
            let cell_width = column_width * cell.col_span as f32 + gap * (cell.col_span - 1) as f32;
            let child_box = self.layout_node(child, 0.0, 0.0, cell_width, Some(cell_width));
            placed.push((cell, child_box));
        }

        let row_heights = row_heights(occupancy.rows.len(), &placed);
        let mut row_offsets = Vec::with_capacity(row_heights.len());
        let mut offset = 0.0;
        for height in &row_heights {
            row_offsets.push(offset);
            offset += height + gap;
        }
        let rows_height = if row_heights.is_empty() {
            0.0
        } else {
            offset - gap
        };

        let origin_x = layout_box.x + pad;
        let origin_y = layout_box.y + pad;
        for (cell, mut child_box) in placed {
            let x = origin_x + cell.column as f32 * (column_width + gap);
            let y = origin_y + row_offsets[cell.row];
            child_box.translate(x, y);
            layout_box.children.push(child_box);
        }

        layout_box.width = width;
        layout_box.height = node.props.number("h").unwrap_or(rows_height + 2.0 * pad);
    }

    /// Find and occupy the block of `child`, reporting clamps and collisions.
    ///
    /// Explicit rows must end within `row_limit`.
    fn place_child(&mut self, child: &Node, occupancy: &mut Occupancy, row_limit: usize) -> Cell {
        let tokens = child.place.unwrap_or_default();
        let columns = occupancy.columns;

        let mut col_span = tokens.column_span().max(1) as usize;
        if col_span > columns {
            self.warn(
                ErrorCode::E302,
                child,
                format!("span of {col_span} columns exceeds the {columns} columns of the grid"),
                "span clamped to the grid width",
            );
            col_span = columns;
        }
        let mut row_span = tokens.row_span().max(1) as usize;
        if row_span > MAX_ROW_SPAN {
            self.warn(
                ErrorCode::E302,
                child,
                format!("span of {row_span} rows exceeds the limit of {MAX_ROW_SPAN} rows"),
                "row span clamped",
            );
            row_span = MAX_ROW_SPAN;
        }

        let mut start = tokens.c.map(|c| (c.max(1) - 1) as usize);
        if let Some(column) = start {
            if column + col_span > columns {
                self.warn(
                    ErrorCode::E302,
                    child,
                    format!(
                        "placement `{}` does not fit in {columns} columns",
                        describe(&tokens)
                    ),
                    "start clamped to fit",
                );
                start = Some(columns - col_span);
            }
        }

        let explicit_row = tokens.r.map(|r| {
            let row = (r.max(1) - 1) as usize;
            if row + row_span > row_limit {
                self.warn(
                    ErrorCode::E302,
                    child,
                    format!(
                        "placement `{}` is past the last of {row_limit} rows",
                        describe(&tokens)
                    ),
                    "row clamped",
                );
                row_limit - row_span
            } else {
                row
            }
        });

        let (row, column) = match (explicit_row, start) {
            (Some(row), Some(column)) => (row, column),
            (Some(row), None) => {
                let column = occupancy
                    .first_free_column(row, col_span, row_span)
                    .unwrap_or_default();
                (row, column)
            }
            (None, Some(column)) => (occupancy.first_free_row(column, col_span, row_span), column),
            (None, None) => occupancy.first_free(col_span, row_span),
        };

        if occupancy.mark(row, column, col_span, row_span) {
            self.collision_count += 1;
            self.warn(
                ErrorCode::E303,
                child,
                format!(
                    "`{}` overlaps cells that are already occupied at row {}, column {}",
                    child.kind,
                    row + 1,
                    column + 1
                ),
                "overlapping placement",
            );
        }
        trace!(kind:% = child.kind, row, column, col_span, row_span; "Placed grid child");

        Cell {
            row,
            column,
            col_span,
            row_span,
        }
    }
}

/// Height of every row: the tallest share of any child spanning it, each
/// spanning child split evenly across its rows.
fn row_heights(rows: usize, placed: &[(Cell, LayoutBox)]) -> Vec<f32> {
    let mut heights = vec![0.0_f32; rows];
    for (cell, child_box) in placed {
        let share = child_box.height / cell.row_span as f32;
        for height in &mut heights[cell.row..cell.row + cell.row_span] {
            *height = height.max(share);
        }
    }
    heights
}

fn describe(tokens: &PlacementTokens) -> String {
    if tokens.is_empty() {
        "auto".to_string()
    } else {
        tokens.to_string()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::super::tests::{codes, layout_at};
    use super::*;

    #[test]
    fn test_auto_placement_fills_rows() {
        let output = layout_at(
            "grid cols:2 gap:0\n  button \"A\"\n  button \"B\"\n  button \"C\"\n",
            400.0,
        );

        let grid = &output.boxes[0];
        let origins: Vec<(f32, f32)> = grid
            .children
            .iter()
            .map(|child| (child.x, child.y))
            .collect();
        assert_eq!(origins, [(0.0, 0.0), (200.0, 0.0), (0.0, 40.0)]);
        assert_approx_eq!(f32, grid.children[0].width, 200.0);
        assert_eq!(grid.height, 80.0);
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_column_width_accounts_for_gaps() {
        let output = layout_at("grid cols:4 gap:1 pad:1\n  text \"A\" s2\n  text \"B\"\n", 416.0);

        let grid = &output.boxes[0];
        // (400 - 3 * 8) / 4 = 94 per column.
        assert_approx_eq!(f32, grid.children[0].width, 196.0);
        assert_approx_eq!(f32, grid.children[1].x, 8.0 + 2.0 * 102.0);
        assert_eq!(grid.children[1].y, 8.0);
        assert_eq!(grid.height, 24.0 + 16.0);
    }

    #[test]
    fn test_out_of_bounds_start_is_clamped() {
        let output = layout_at("grid cols:3\n  text \"Wide\" @c3 s3\n", 300.0);

        assert_eq!(codes(&output), [ErrorCode::E302]);
        let child = &output.boxes[0].children[0];
        assert_eq!(child.x, 0.0);
        assert_approx_eq!(f32, child.width, 300.0);
    }

    #[test]
    fn test_oversized_span_is_clamped() {
        let output = layout_at("grid cols:2 gap:0\n  text \"A\" s5\n", 200.0);

        assert_eq!(codes(&output), [ErrorCode::E302]);
        assert_approx_eq!(f32, output.boxes[0].children[0].width, 200.0);
    }

    #[test]
    fn test_collisions_are_counted_and_placed() {
        let output = layout_at(
            "grid cols:2 gap:0\n  text \"A\" @c1 r1\n  text \"B\" @c1 r1\n",
            200.0,
        );

        assert_eq!(codes(&output), [ErrorCode::E303]);
        assert_eq!(output.metrics.collision_count, 1);
        let grid = &output.boxes[0];
        assert_eq!(grid.children.len(), 2);
        assert_eq!(grid.children[1].origin(), grid.children[0].origin());
    }

    #[test]
    fn test_explicit_column_finds_free_row() {
        let output = layout_at(
            "grid cols:3 gap:0\n  text \"A\" s3\n  text \"B\" @c2\n  text \"C\"\n",
            300.0,
        );

        let grid = &output.boxes[0];
        assert_eq!((grid.children[1].x, grid.children[1].y), (100.0, 24.0));
        assert_eq!((grid.children[2].x, grid.children[2].y), (0.0, 24.0));
        assert!(output.diagnostics.is_empty());
    }

    #[test]
    fn test_row_span_splits_height_across_rows() {
        let output = layout_at(
            "grid cols:2 gap:0\n  image rs2\n  text \"A\"\n  text \"B\"\n",
            400.0,
        );

        let grid = &output.boxes[0];
        // The image is 160px tall over two rows of 80px.
        assert_eq!(grid.children[1].y, 0.0);
        assert_eq!(grid.children[2].y, 80.0);
        assert_eq!(grid.height, 160.0);
    }

    #[test]
    fn test_far_row_is_clamped() {
        let output = layout_at("grid cols:2 gap:0\n  text \"A\" r4000000000\n", 400.0);

        assert_eq!(codes(&output), [ErrorCode::E302]);
        let grid = &output.boxes[0];
        assert_eq!(grid.children.len(), 1);
        // One child allows 24 rows; the clamped start is the last of them.
        assert_eq!(grid.children[0].y, 0.0);
        assert_eq!(grid.height, 24.0);
    }

    #[test]
    fn test_huge_row_span_is_clamped() {
        let output = layout_at("grid cols:2 gap:1\n  image rs4000000000\n", 400.0);

        assert_eq!(codes(&output), [ErrorCode::E302]);
        let grid = &output.boxes[0];
        // 160px split over 24 rows, plus 23 gaps of 8px.
        assert_approx_eq!(f32, grid.height, 160.0 + 23.0 * 8.0, epsilon = 0.01);
    }

    #[test]
    fn test_columns_are_clamped() {
        let output = layout_at("grid cols:40 gap:0\n  text \"A\"\n", 480.0);
        assert_approx_eq!(f32, output.boxes[0].children[0].width, 20.0);
    }

    #[test]
    fn test_occupancy_first_free() {
        let mut occupancy = Occupancy::new(3);
        assert!(!occupancy.mark(0, 0, 2, 1));
        assert_eq!(occupancy.first_free(2, 1), (1, 0));
        assert_eq!(occupancy.first_free(1, 1), (0, 2));
        assert!(occupancy.mark(0, 1, 1, 2));
        assert_eq!(occupancy.first_free_row(1, 1, 1), 2);
    }
}
