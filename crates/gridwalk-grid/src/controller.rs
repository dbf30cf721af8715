#![warn(missing_docs)]

use std::collections::HashMap;
use std::sync::Arc;

use gridwalk_vector::{PolarVector, rad_to_deg};
use tracing::{debug, info, warn};

use crate::canvas::LineCanvas;
use crate::error::GridError;
use crate::traits::{DrawingSurface, Movable, ScreenExtent, ScreenSize, SpriteHandle};
use crate::types::{Direction, GridCoordinate, ScreenPixel, SpriteId};

/// Number of rows and columns in a freshly constructed grid.
pub const DEFAULT_SIZE: i32 = 4;
/// Transition speed (px/s) of a freshly constructed grid.
pub const DEFAULT_SPEED: f32 = 100.0;

/// Layout of one axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Dimension {
    /// Total number of cells on this axis
    count: i32,
    /// Smallest permitted cell index
    min: i32,
    /// Largest permitted cell index
    max: i32,
    /// Pixels per cell
    pixels: f32,
}

impl Dimension {
    /// One margin cell is reserved at the start of the axis, so `count` cells
    /// share `count + 1` pixel slots.
    fn new(count: i32, extent: f32) -> Self {
        Dimension {
            count,
            min: 0,
            max: count - 1,
            pixels: extent / (count as f32 + 1.0),
        }
    }

    fn contains(&self, index: i32) -> bool {
        index >= self.min && index <= self.max
    }

    // min <= max is not enforced
    fn set_range(&mut self, min: Option<i32>, max: Option<i32>) {
        self.min = min.unwrap_or(0);
        self.max = match max {
            Some(max) if max <= self.count - 1 => max,
            _ => self.count - 1,
        };
    }

    /// Resolves a candidate index against the range, wrapping to the opposite
    /// bound when allowed. `None` means the move must be rejected.
    fn resolve(&self, candidate: i32, wrap: bool) -> Option<i32> {
        if self.contains(candidate) {
            Some(candidate)
        } else if !wrap {
            None
        } else if candidate < self.min {
            Some(self.max)
        } else {
            Some(self.min)
        }
    }
}

/// Bookkeeping for one sprite the controller has seen.
#[derive(Debug)]
struct TrackedSprite<S> {
    id: SpriteId,
    cell: GridCoordinate,
    is_moving: bool,
    target: Option<ScreenPixel>,
    handle: SpriteHandle<S>,
}

/// Places sprites on a rectangular grid and animates them between cells.
///
/// The controller maps `(row, column)` cells onto screen pixels, remembers the
/// last cell of every sprite it has moved, and drives slides by writing a
/// constant velocity onto the sprite. Host physics integrates the position;
/// [`GridController::update_all`] must be called once per frame to stop sprites
/// that reached their target.
///
/// Sprites are registered on first use by any mutating call. Pure lookups
/// never register.
#[derive(Debug)]
pub struct GridController<S, E = ScreenSize> {
    columns: Dimension,
    rows: Dimension,
    wrap: bool,
    speed: f32,
    screen: E,
    sprites: Vec<TrackedSprite<S>>,
    index: HashMap<SpriteId, usize>,
}

impl<S: Movable, E: ScreenExtent> GridController<S, E> {
    /// Creates a `DEFAULT_SIZE` x `DEFAULT_SIZE` grid laid out on `screen`,
    /// moving sprites at `DEFAULT_SPEED` with wrapping disabled.
    pub fn new(screen: E) -> Self {
        let columns = Dimension::new(DEFAULT_SIZE, screen.width());
        let rows = Dimension::new(DEFAULT_SIZE, screen.height());
        GridController {
            columns,
            rows,
            wrap: false,
            speed: DEFAULT_SPEED,
            screen,
            sprites: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Sets the number of rows and columns and resets both ranges to cover
    /// the whole grid.
    ///
    /// # Errors
    ///
    /// Returns `Err(GridError::InvalidDimensions)` if either count is not
    /// positive. The previous configuration is kept.
    pub fn set_size(&mut self, rows: i32, columns: i32) -> Result<(), GridError> {
        if rows <= 0 || columns <= 0 {
            return Err(GridError::InvalidDimensions(
                "rows and columns must be positive",
            ));
        }
        self.columns = Dimension::new(columns, self.screen.width());
        self.rows = Dimension::new(rows, self.screen.height());
        info!(
            rows,
            columns,
            cell_width = self.columns.pixels,
            cell_height = self.rows.pixels,
            "Grid resized"
        );
        Ok(())
    }

    /// Sets the permitted column range. `None` for `min` means column 0;
    /// `None` for `max`, or a `max` past the last column, means the last column.
    pub fn set_column_range(&mut self, min: Option<i32>, max: Option<i32>) {
        self.columns.set_range(min, max);
        debug!(min = self.columns.min, max = self.columns.max, "Column range set");
    }

    /// Sets the permitted row range. `None` for `min` means row 0;
    /// `None` for `max`, or a `max` past the last row, means the last row.
    pub fn set_row_range(&mut self, min: Option<i32>, max: Option<i32>) {
        self.rows.set_range(min, max);
        debug!(min = self.rows.min, max = self.rows.max, "Row range set");
    }

    /// Number of rows.
    pub fn rows(&self) -> i32 {
        self.rows.count
    }

    /// Number of columns.
    pub fn columns(&self) -> i32 {
        self.columns.count
    }

    /// Permitted `(min, max)` row indices.
    pub fn row_range(&self) -> (i32, i32) {
        (self.rows.min, self.rows.max)
    }

    /// Permitted `(min, max)` column indices.
    pub fn column_range(&self) -> (i32, i32) {
        (self.columns.min, self.columns.max)
    }

    /// Size of one cell as `(width, height)` in pixels.
    pub fn cell_size(&self) -> (f32, f32) {
        (self.columns.pixels, self.rows.pixels)
    }

    /// Speed (px/s) at which sprites slide between cells.
    pub fn velocity(&self) -> f32 {
        self.speed
    }

    /// Sets the slide speed shared by all sprites. Non-positive values are
    /// ignored.
    pub fn set_velocity(&mut self, value: f32) {
        if value > 0.0 {
            self.speed = value;
        } else {
            warn!(value, kept = self.speed, "Ignoring non-positive sprite velocity");
        }
    }

    /// Whether out-of-range moves wrap to the opposite edge.
    pub fn wrap_around(&self) -> bool {
        self.wrap
    }

    /// Enables or disables wrapping at the range boundaries.
    pub fn set_wrap_around(&mut self, value: bool) {
        self.wrap = value;
    }

    /// Translates a cell into the screen pixel where a sprite on that cell sits.
    pub fn pixel_for_cell(&self, cell: GridCoordinate) -> ScreenPixel {
        ScreenPixel {
            x: self.columns.pixels * (cell.column as f32 + 1.0),
            y: self.rows.pixels * (cell.row as f32 + 1.0),
        }
    }

    /// Last known cell of a sprite, or `None` if it was never placed or moved.
    pub fn location_of(&self, sprite: &SpriteHandle<S>) -> Option<GridCoordinate> {
        self.lookup(sprite).map(|t| t.cell)
    }

    /// Last known column of a sprite.
    pub fn column_of(&self, sprite: &SpriteHandle<S>) -> Option<i32> {
        self.location_of(sprite).map(|c| c.column)
    }

    /// Last known row of a sprite.
    pub fn row_of(&self, sprite: &SpriteHandle<S>) -> Option<i32> {
        self.location_of(sprite).map(|c| c.row)
    }

    /// Whether a tracked sprite is sliding towards its target.
    pub fn is_moving(&self, sprite: &SpriteHandle<S>) -> Option<bool> {
        self.lookup(sprite).map(|t| t.is_moving)
    }

    /// Pixel a tracked sprite is heading to (or resting on).
    pub fn target_of(&self, sprite: &SpriteHandle<S>) -> Option<ScreenPixel> {
        self.lookup(sprite).and_then(|t| t.target)
    }

    /// Number of sprites registered so far.
    pub fn tracked_count(&self) -> usize {
        self.sprites.len()
    }

    /// Moves a sprite by a number of rows and columns.
    ///
    /// Each axis is checked against its range. Out-of-range axes wrap to the
    /// opposite bound when wrapping is enabled; otherwise the whole move is
    /// rejected and nothing changes.
    ///
    /// # Arguments
    ///
    /// * `sprite`: Sprite to move.
    /// * `row_delta`: Rows to move; positive moves down.
    /// * `column_delta`: Columns to move; positive moves right.
    /// * `teleport`: `true` jumps straight to the cell, `false` slides.
    ///
    /// # Errors
    ///
    /// Returns `Err(GridError::OutOfRange)` if the move leaves the permitted
    /// range and wrapping is disabled.
    ///
    /// # Returns
    ///
    /// The cell the sprite was sent to.
    pub fn move_sprite(
        &mut self,
        sprite: &SpriteHandle<S>,
        row_delta: i32,
        column_delta: i32,
        teleport: bool,
    ) -> Result<GridCoordinate, GridError> {
        let index = self.find_or_register(sprite);
        let current = self.sprites[index].cell;

        let column = self
            .columns
            .resolve(current.column.saturating_add(column_delta), self.wrap)
            .ok_or(GridError::OutOfRange("column outside permitted range"))?;
        let row = self
            .rows
            .resolve(current.row.saturating_add(row_delta), self.wrap)
            .ok_or(GridError::OutOfRange("row outside permitted range"))?;

        let target = GridCoordinate::new(row, column);
        self.move_to_cell(index, target, teleport, false);
        Ok(target)
    }

    /// Moves a sprite one cell in `direction`.
    pub fn move_in(
        &mut self,
        sprite: &SpriteHandle<S>,
        direction: Direction,
        teleport: bool,
    ) -> Result<GridCoordinate, GridError> {
        let (row_delta, column_delta) = direction.delta();
        self.move_sprite(sprite, row_delta, column_delta, teleport)
    }

    /// Moves a sprite one row up.
    pub fn move_up(&mut self, sprite: &SpriteHandle<S>, teleport: bool) -> Result<GridCoordinate, GridError> {
        self.move_in(sprite, Direction::Up, teleport)
    }

    /// Moves a sprite one row down.
    pub fn move_down(&mut self, sprite: &SpriteHandle<S>, teleport: bool) -> Result<GridCoordinate, GridError> {
        self.move_in(sprite, Direction::Down, teleport)
    }

    /// Moves a sprite one column left.
    pub fn move_left(&mut self, sprite: &SpriteHandle<S>, teleport: bool) -> Result<GridCoordinate, GridError> {
        self.move_in(sprite, Direction::Left, teleport)
    }

    /// Moves a sprite one column right.
    pub fn move_right(&mut self, sprite: &SpriteHandle<S>, teleport: bool) -> Result<GridCoordinate, GridError> {
        self.move_in(sprite, Direction::Right, teleport)
    }

    /// Places a sprite on a specific cell.
    ///
    /// Unlike [`GridController::move_sprite`], both axes are always re-applied
    /// to the sprite, which corrects a sprite that was moved externally.
    ///
    /// # Arguments
    ///
    /// * `sprite`: Sprite to place.
    /// * `row`, `column`: Target cell.
    /// * `teleport`: `true` jumps straight to the cell, `false` slides.
    /// * `force`: `true` ignores the permitted ranges.
    ///
    /// # Errors
    ///
    /// Returns `Err(GridError::OutOfRange)` if the cell is outside the permitted
    /// ranges and `force` is `false`.
    pub fn place_sprite(
        &mut self,
        sprite: &SpriteHandle<S>,
        row: i32,
        column: i32,
        teleport: bool,
        force: bool,
    ) -> Result<(), GridError> {
        let index = self.find_or_register(sprite);
        if !force && !(self.rows.contains(row) && self.columns.contains(column)) {
            return Err(GridError::OutOfRange("cell outside permitted range"));
        }
        self.move_to_cell(index, GridCoordinate::new(row, column), teleport, true);
        Ok(())
    }

    /// Stops every sliding sprite that has reached or passed its target and
    /// snaps it onto the target pixel. Call once per frame.
    ///
    /// A sprite counts as arrived as soon as either axis has reached the
    /// target in the direction it is travelling.
    ///
    /// # Returns
    ///
    /// The number of sprites that arrived during this call.
    pub fn update_all(&mut self) -> usize {
        let mut arrived = 0;
        for tracked in self.sprites.iter_mut().filter(|t| t.is_moving) {
            let Some(target) = tracked.target else {
                continue;
            };
            let mut sprite = tracked.handle.write();
            if has_arrived(&*sprite, target) {
                sprite.set_vx(0.0);
                sprite.set_vy(0.0);
                sprite.set_x(target.x);
                sprite.set_y(target.y);
                tracked.is_moving = false;
                arrived += 1;
                debug!(sprite = %tracked.id, cell = %tracked.cell, "Sprite arrived");
            }
        }
        arrived
    }

    /// Draws the cell boundaries on `surface`: one horizontal line per row and
    /// one vertical line per column, each spanning the whole surface.
    pub fn draw_grid<D: DrawingSurface>(&self, surface: &mut D, color: D::Color) {
        let width = surface.width();
        let height = surface.height();
        for row in 1..=self.rows.count {
            let y = row as f32 * self.rows.pixels;
            surface.draw_line(0.0, y, width, y, color);
        }
        for column in 1..=self.columns.count {
            let x = column as f32 * self.columns.pixels;
            surface.draw_line(x, 0.0, x, height, color);
        }
    }

    /// Returns a new screen-sized canvas with the grid drawn on it.
    pub fn grid_image<C: Copy>(&self, color: C) -> LineCanvas<C> {
        let mut canvas = LineCanvas::new(self.screen.width(), self.screen.height());
        self.draw_grid(&mut canvas, color);
        canvas
    }

    fn lookup(&self, sprite: &SpriteHandle<S>) -> Option<&TrackedSprite<S>> {
        let id = sprite.read().id();
        self.index.get(&id).map(|&i| &self.sprites[i])
    }

    /// Returns the tracking index of a sprite, registering it at cell (0, 0)
    /// if it has not been seen before.
    fn find_or_register(&mut self, sprite: &SpriteHandle<S>) -> usize {
        let id = sprite.read().id();
        if let Some(&index) = self.index.get(&id) {
            return index;
        }
        self.sprites.push(TrackedSprite {
            id,
            cell: GridCoordinate::default(),
            is_moving: false,
            target: None,
            handle: Arc::clone(sprite),
        });
        let index = self.sprites.len() - 1;
        self.index.insert(id, index);
        debug!(sprite = %id, index, "Sprite registered");
        index
    }

    /// Sends a tracked sprite to `target`.
    ///
    /// A teleport only rewrites the axes that changed unless `force_assign` is
    /// set. A teleport issued mid-slide re-aims the slide at the new target.
    fn move_to_cell(&mut self, index: usize, target: GridCoordinate, teleport: bool, force_assign: bool) {
        let end = self.pixel_for_cell(target);
        let speed = self.speed;
        let tracked = &mut self.sprites[index];
        let mut sprite = tracked.handle.write();

        if teleport {
            if target.column != tracked.cell.column || force_assign {
                tracked.cell.column = target.column;
                sprite.set_x(end.x);
            }
            if target.row != tracked.cell.row || force_assign {
                tracked.cell.row = target.row;
                sprite.set_y(end.y);
            }
            tracked.target = Some(end);
            if tracked.is_moving {
                aim_at(&mut *sprite, end, speed);
            }
        } else {
            tracked.cell = target;
            tracked.target = Some(end);
            aim_at(&mut *sprite, end, speed);
            tracked.is_moving = true;
        }

        debug!(
            sprite = %tracked.id,
            cell = %target,
            pixel = %end,
            teleport,
            moving = tracked.is_moving,
            "Sprite sent to cell"
        );
    }
}

/// Points the sprite's velocity from its current position towards `target`.
///
/// On an axis-aligned slide the still axis gets exactly zero velocity; the
/// trig projection would otherwise leave a residue there that trips the
/// arrival check on the first frame.
fn aim_at<S: Movable>(sprite: &mut S, target: ScreenPixel, speed: f32) {
    let dx = target.x - sprite.x();
    let dy = target.y - sprite.y();
    let velocity = PolarVector::new(speed, rad_to_deg(dy.atan2(dx)));
    let (mut vx, mut vy) = (velocity.x(), velocity.y());
    if dx == 0.0 && dy != 0.0 {
        vx = 0.0;
    }
    if dy == 0.0 && dx != 0.0 {
        vy = 0.0;
    }
    sprite.set_vx(vx);
    sprite.set_vy(vy);
}

fn has_arrived<S: Movable>(sprite: &S, target: ScreenPixel) -> bool {
    (sprite.x() >= target.x && sprite.vx() > 0.0)
        || (sprite.x() <= target.x && sprite.vx() < 0.0)
        || (sprite.y() >= target.y && sprite.vy() > 0.0)
        || (sprite.y() <= target.y && sprite.vy() < 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::handle;

    const EPSILON: f32 = 1e-4;

    #[derive(Debug, Default)]
    struct TestSprite {
        id: u32,
        x: f32,
        y: f32,
        vx: f32,
        vy: f32,
    }

    impl Movable for TestSprite {
        fn id(&self) -> SpriteId {
            SpriteId(self.id)
        }
        fn x(&self) -> f32 {
            self.x
        }
        fn y(&self) -> f32 {
            self.y
        }
        fn set_x(&mut self, x: f32) {
            self.x = x;
        }
        fn set_y(&mut self, y: f32) {
            self.y = y;
        }
        fn vx(&self) -> f32 {
            self.vx
        }
        fn vy(&self) -> f32 {
            self.vy
        }
        fn set_vx(&mut self, vx: f32) {
            self.vx = vx;
        }
        fn set_vy(&mut self, vy: f32) {
            self.vy = vy;
        }
    }

    fn sprite(id: u32) -> SpriteHandle<TestSprite> {
        handle(TestSprite { id, ..Default::default() })
    }

    /// 3 rows x 4 columns on a 160x120 screen: cells are 32x30 px.
    fn small_grid() -> GridController<TestSprite> {
        let mut grid = GridController::new(ScreenSize::new(160.0, 120.0));
        grid.set_size(3, 4).unwrap();
        grid
    }

    /// Advances a sprite by one 60 Hz frame.
    fn integrate(s: &SpriteHandle<TestSprite>) {
        let mut s = s.write();
        s.x += s.vx / 60.0;
        s.y += s.vy / 60.0;
    }

    #[test]
    fn test_defaults() {
        let grid: GridController<TestSprite> = GridController::new(ScreenSize::new(500.0, 250.0));
        assert_eq!(grid.rows(), DEFAULT_SIZE);
        assert_eq!(grid.columns(), DEFAULT_SIZE);
        assert_eq!(grid.velocity(), DEFAULT_SPEED);
        assert!(!grid.wrap_around());
        assert_eq!(grid.cell_size(), (100.0, 50.0));
        assert_eq!(grid.tracked_count(), 0);
    }

    #[test]
    fn test_set_size_pixel_sizes() {
        let grid = small_grid();
        assert_eq!(grid.cell_size(), (32.0, 30.0));
        assert_eq!(grid.row_range(), (0, 2));
        assert_eq!(grid.column_range(), (0, 3));
        // Cell 0 sits one margin cell away from the screen edge
        assert_eq!(grid.pixel_for_cell(GridCoordinate::new(0, 0)), ScreenPixel::new(32.0, 30.0));
        assert_eq!(grid.pixel_for_cell(GridCoordinate::new(2, 3)), ScreenPixel::new(128.0, 90.0));
    }

    #[test]
    fn test_set_size_rejects_non_positive() {
        let mut grid = small_grid();
        grid.set_row_range(Some(1), None);
        assert!(matches!(grid.set_size(0, 5), Err(GridError::InvalidDimensions(_))));
        assert!(matches!(grid.set_size(5, -1), Err(GridError::InvalidDimensions(_))));
        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.columns(), 4);
        assert_eq!(grid.row_range(), (1, 2));
        assert_eq!(grid.cell_size(), (32.0, 30.0));
    }

    #[test]
    fn test_set_size_resets_ranges() {
        let mut grid = small_grid();
        grid.set_column_range(Some(1), Some(2));
        grid.set_size(5, 9).unwrap();
        assert_eq!(grid.column_range(), (0, 8));
        assert_eq!(grid.row_range(), (0, 4));
        assert_eq!(grid.cell_size(), (16.0, 20.0));
    }

    #[test]
    fn test_set_size_accepts_huge_counts() {
        let mut grid = small_grid();
        grid.set_size(i32::MAX, 4).unwrap();
        assert_eq!(grid.rows(), i32::MAX);
        assert_eq!(grid.row_range(), (0, i32::MAX - 1));
        let (col_px, row_px) = grid.cell_size();
        assert_eq!(col_px, 32.0);
        assert!(row_px > 0.0 && row_px < 1e-6);
    }

    #[test]
    fn test_range_defaults_and_clamping() {
        let mut grid = small_grid();
        grid.set_column_range(Some(1), None);
        assert_eq!(grid.column_range(), (1, 3));
        grid.set_column_range(None, Some(99));
        assert_eq!(grid.column_range(), (0, 3));
        grid.set_column_range(None, Some(4));
        assert_eq!(grid.column_range(), (0, 3));
        grid.set_row_range(Some(-2), Some(1));
        assert_eq!(grid.row_range(), (-2, 1));
    }

    #[test]
    fn test_velocity_ignores_non_positive() {
        let mut grid = small_grid();
        grid.set_velocity(150.0);
        assert_eq!(grid.velocity(), 150.0);
        grid.set_velocity(0.0);
        grid.set_velocity(-10.0);
        assert_eq!(grid.velocity(), 150.0);
    }

    #[test]
    fn test_lookup_does_not_register() {
        let mut grid = small_grid();
        let s = sprite(1);
        assert_eq!(grid.location_of(&s), None);
        assert_eq!(grid.column_of(&s), None);
        assert_eq!(grid.is_moving(&s), None);
        assert_eq!(grid.tracked_count(), 0);

        // A rejected placement still registers the sprite at the origin
        assert!(grid.place_sprite(&s, 10, 10, true, false).is_err());
        assert_eq!(grid.tracked_count(), 1);
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(0, 0)));
        assert_eq!(grid.target_of(&s), None);
    }

    #[test]
    fn test_tracking_is_by_identity() {
        let mut grid = small_grid();
        let a = sprite(7);
        let twin = sprite(7);
        grid.place_sprite(&a, 1, 2, true, false).unwrap();
        assert_eq!(grid.location_of(&twin), Some(GridCoordinate::new(1, 2)));
        grid.move_right(&twin, true).unwrap();
        assert_eq!(grid.tracked_count(), 1);
        assert_eq!(grid.location_of(&a), Some(GridCoordinate::new(1, 3)));
        // The first handle seen is the one the controller drives
        assert_eq!(a.read().x, 128.0);
        assert_eq!(twin.read().x, 0.0);
    }

    #[test]
    fn test_place_and_locate() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 2, 1, true, false).unwrap();
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(2, 1)));
        assert_eq!(grid.row_of(&s), Some(2));
        assert_eq!(grid.column_of(&s), Some(1));
        assert_eq!((s.read().x, s.read().y), (64.0, 90.0));
        assert_eq!(grid.is_moving(&s), Some(false));
        assert_eq!(grid.target_of(&s), Some(ScreenPixel::new(64.0, 90.0)));
    }

    #[test]
    fn test_place_out_of_range_without_force() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 1, 1, true, false).unwrap();
        assert!(matches!(grid.place_sprite(&s, 3, 1, true, false), Err(GridError::OutOfRange(_))));
        assert!(matches!(grid.place_sprite(&s, 1, -1, true, false), Err(GridError::OutOfRange(_))));
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(1, 1)));
        assert_eq!((s.read().x, s.read().y), (64.0, 60.0));
    }

    #[test]
    fn test_forced_placement_ignores_ranges() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, -5, 40, true, true).unwrap();
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(-5, 40)));
        assert_eq!((s.read().x, s.read().y), (32.0 * 41.0, 30.0 * -4.0));
        grid.place_sprite(&s, 1000, -1000, true, true).unwrap();
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(1000, -1000)));
    }

    #[test]
    fn test_move_within_range() {
        let mut grid = small_grid();
        let s = sprite(1);
        assert_eq!(grid.move_sprite(&s, 1, 2, true), Ok(GridCoordinate::new(1, 2)));
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(1, 2)));
        assert_eq!(grid.move_down(&s, true), Ok(GridCoordinate::new(2, 2)));
        assert_eq!(grid.move_left(&s, true), Ok(GridCoordinate::new(2, 1)));
        assert_eq!(grid.move_up(&s, true), Ok(GridCoordinate::new(1, 1)));
        assert_eq!(grid.move_right(&s, true), Ok(GridCoordinate::new(1, 2)));
        assert_eq!((s.read().x, s.read().y), (96.0, 60.0));
    }

    #[test]
    fn test_move_rejected_without_wrap() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 0, 3, true, false).unwrap();

        assert!(matches!(grid.move_up(&s, true), Err(GridError::OutOfRange(_))));
        assert!(matches!(grid.move_right(&s, true), Err(GridError::OutOfRange(_))));
        // Column in range, row out of range: nothing applied on either axis
        assert!(grid.move_sprite(&s, -1, -1, true).is_err());
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(0, 3)));
        assert_eq!((s.read().x, s.read().y), (128.0, 30.0));
    }

    #[test]
    fn test_move_wraps_to_opposite_bound() {
        let mut grid = small_grid();
        grid.set_wrap_around(true);
        let s = sprite(1);
        grid.place_sprite(&s, 0, 0, true, false).unwrap();

        assert_eq!(grid.move_left(&s, true), Ok(GridCoordinate::new(0, 3)));
        assert_eq!(grid.move_up(&s, true), Ok(GridCoordinate::new(2, 3)));
        assert_eq!(grid.move_right(&s, true), Ok(GridCoordinate::new(2, 0)));
        assert_eq!(grid.move_down(&s, true), Ok(GridCoordinate::new(0, 0)));
        // Large jumps land on the bound, not modulo
        assert_eq!(grid.move_sprite(&s, 0, 10, true), Ok(GridCoordinate::new(0, 0)));
        assert_eq!(grid.move_sprite(&s, 1, -10, true), Ok(GridCoordinate::new(1, 3)));
    }

    #[test]
    fn test_wrap_uses_configured_range() {
        let mut grid = small_grid();
        grid.set_wrap_around(true);
        grid.set_column_range(Some(1), Some(2));
        let s = sprite(1);
        grid.place_sprite(&s, 0, 1, true, false).unwrap();
        assert_eq!(grid.move_left(&s, true), Ok(GridCoordinate::new(0, 2)));
        assert_eq!(grid.move_right(&s, true), Ok(GridCoordinate::new(0, 1)));
    }

    #[test]
    fn test_inverted_range_blocks_moves() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 1, 1, true, false).unwrap();
        grid.set_column_range(Some(3), Some(1));
        assert!(grid.move_sprite(&s, 0, 0, true).is_err());
        assert!(grid.move_right(&s, true).is_err());
        assert!(grid.place_sprite(&s, 1, 2, true, false).is_err());
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(1, 1)));
    }

    #[test]
    fn test_teleport_only_rewrites_changed_axis() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 0, 0, true, false).unwrap();
        s.write().x = 999.0;

        grid.move_down(&s, true).unwrap();
        assert_eq!(s.read().x, 999.0);
        assert_eq!(s.read().y, 60.0);

        // Placing re-applies both axes
        grid.place_sprite(&s, 1, 0, true, false).unwrap();
        assert_eq!((s.read().x, s.read().y), (32.0, 60.0));
    }

    #[test]
    fn test_slide_scenario() {
        let mut grid = small_grid();
        grid.set_velocity(100.0);
        let s = sprite(1);
        grid.place_sprite(&s, 0, 0, true, false).unwrap();
        assert_eq!((s.read().x, s.read().y), (32.0, 30.0));

        grid.move_sprite(&s, 0, 1, false).unwrap();
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(0, 1)));
        assert_eq!(grid.is_moving(&s), Some(true));
        assert_eq!(grid.target_of(&s), Some(ScreenPixel::new(64.0, 30.0)));
        assert!((s.read().vx - 100.0).abs() < EPSILON);
        assert!(s.read().vy.abs() < EPSILON);
        // Still at the start pixel until physics runs
        assert_eq!(s.read().x, 32.0);

        let mut frames = 0;
        while grid.is_moving(&s) == Some(true) {
            integrate(&s);
            grid.update_all();
            frames += 1;
            assert!(frames < 120, "slide never arrived");
        }
        let s = s.read();
        assert_eq!((s.x, s.y), (64.0, 30.0));
        assert_eq!((s.vx, s.vy), (0.0, 0.0));
        // 32 px at 100 px/s and 60 Hz
        assert_eq!(frames, 20);
    }

    /// Slides from the centre cell (1, 1) one step and counts frames until arrival.
    fn slide_frames(direction: Direction) -> (u32, SpriteHandle<TestSprite>) {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 1, 1, true, false).unwrap();
        grid.move_in(&s, direction, false).unwrap();

        let mut frames = 0;
        while grid.is_moving(&s) == Some(true) {
            integrate(&s);
            grid.update_all();
            frames += 1;
            assert!(frames < 120, "slide never arrived");
        }
        (frames, s)
    }

    #[test]
    fn test_slide_left() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 0, 2, true, false).unwrap();
        grid.move_left(&s, false).unwrap();
        assert!((s.read().vx - (-100.0)).abs() < EPSILON);
        assert_eq!(s.read().vy, 0.0);

        // First frame does not count as an arrival
        integrate(&s);
        assert_eq!(grid.update_all(), 0);
        assert_eq!(grid.is_moving(&s), Some(true));
    }

    #[test]
    fn test_axis_aligned_slides_have_no_cross_velocity() {
        for (direction, vx, vy) in [
            (Direction::Left, -100.0, 0.0),
            (Direction::Right, 100.0, 0.0),
            (Direction::Up, 0.0, -100.0),
            (Direction::Down, 0.0, 100.0),
        ] {
            let mut grid = small_grid();
            let s = sprite(1);
            grid.place_sprite(&s, 1, 1, true, false).unwrap();
            grid.move_in(&s, direction, false).unwrap();
            let guard = s.read();
            assert!((guard.vx - vx).abs() < EPSILON, "{direction:?}");
            assert!((guard.vy - vy).abs() < EPSILON, "{direction:?}");
            // The still axis is exactly zero, not a rounding residue
            if vx == 0.0 {
                assert_eq!(guard.vx, 0.0, "{direction:?}");
            } else {
                assert_eq!(guard.vy, 0.0, "{direction:?}");
            }
        }
    }

    #[test]
    fn test_slides_animate_in_every_direction() {
        // 32 px columns and 30 px rows at 100/60 px per frame
        let (frames, s) = slide_frames(Direction::Right);
        assert!((19..=20).contains(&frames), "right took {frames}");
        assert_eq!((s.read().x, s.read().y), (96.0, 60.0));

        let (frames, s) = slide_frames(Direction::Left);
        assert!((19..=20).contains(&frames), "left took {frames}");
        assert_eq!((s.read().x, s.read().y), (32.0, 60.0));

        let (frames, s) = slide_frames(Direction::Down);
        assert!((18..=19).contains(&frames), "down took {frames}");
        assert_eq!((s.read().x, s.read().y), (64.0, 90.0));

        let (frames, s) = slide_frames(Direction::Up);
        assert!((18..=19).contains(&frames), "up took {frames}");
        assert_eq!((s.read().x, s.read().y), (64.0, 30.0));
    }

    #[test]
    fn test_slide_to_own_cell_stops_next_update() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 1, 1, true, false).unwrap();
        grid.move_sprite(&s, 0, 0, false).unwrap();
        assert_eq!(grid.is_moving(&s), Some(true));
        assert_eq!(grid.update_all(), 1);
        assert_eq!((s.read().x, s.read().y), (64.0, 60.0));
        assert_eq!((s.read().vx, s.read().vy), (0.0, 0.0));
    }

    #[test]
    fn test_arrival_on_either_axis() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 0, 0, true, false).unwrap();
        grid.move_sprite(&s, 1, 1, false).unwrap();
        assert!(s.read().vx > 0.0 && s.read().vy > 0.0);

        // Only the x axis has reached the target; the y axis snaps anyway
        s.write().x = 64.0;
        assert_eq!(grid.update_all(), 1);
        assert_eq!((s.read().x, s.read().y), (64.0, 60.0));
        assert_eq!(grid.is_moving(&s), Some(false));
    }

    #[test]
    fn test_teleport_mid_slide_retargets() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 0, 0, true, false).unwrap();
        grid.move_right(&s, false).unwrap();

        grid.move_down(&s, true).unwrap();
        assert_eq!(grid.location_of(&s), Some(GridCoordinate::new(1, 1)));
        assert_eq!(grid.is_moving(&s), Some(true));
        assert_eq!(grid.target_of(&s), Some(ScreenPixel::new(64.0, 60.0)));
        // Column was already 1, so x is untouched; the slide keeps going towards x = 64
        let guard = s.read();
        assert_eq!((guard.x, guard.y), (32.0, 60.0));
        assert!((guard.vx - 100.0).abs() < EPSILON);
        assert!(guard.vy.abs() < EPSILON);
    }

    #[test]
    fn test_idle_sprites_untouched_by_update() {
        let mut grid = small_grid();
        let s = sprite(1);
        grid.place_sprite(&s, 1, 1, true, false).unwrap();
        s.write().vx = 5.0;
        s.write().x = 500.0;
        assert_eq!(grid.update_all(), 0);
        assert_eq!(s.read().x, 500.0);
        assert_eq!(s.read().vx, 5.0);
    }

    #[test]
    fn test_draw_grid() {
        let grid = small_grid();
        let mut canvas = LineCanvas::new(160.0, 120.0);
        grid.draw_grid(&mut canvas, 7u8);

        let lines = canvas.lines();
        assert_eq!(lines.len(), 3 + 4);
        let ys: Vec<f32> = lines[..3].iter().map(|l| l.y1).collect();
        assert_eq!(ys, vec![30.0, 60.0, 90.0]);
        assert!(lines[..3].iter().all(|l| l.x1 == 0.0 && l.x2 == 160.0 && l.y1 == l.y2));
        let xs: Vec<f32> = lines[3..].iter().map(|l| l.x1).collect();
        assert_eq!(xs, vec![32.0, 64.0, 96.0, 128.0]);
        assert!(lines[3..].iter().all(|l| l.y1 == 0.0 && l.y2 == 120.0 && l.x1 == l.x2));
        assert!(lines.iter().all(|l| l.color == 7));
    }

    #[test]
    fn test_draw_grid_is_repeatable() {
        let grid = small_grid();
        let first = grid.grid_image(1u8);
        let second = grid.grid_image(1u8);
        assert_eq!(first, second);
        assert_eq!(first.width(), 160.0);
        assert_eq!(first.height(), 120.0);

        // Drawing twice on the same surface repeats the same calls
        let mut canvas = LineCanvas::new(160.0, 120.0);
        grid.draw_grid(&mut canvas, 1u8);
        grid.draw_grid(&mut canvas, 1u8);
        assert_eq!(&canvas.lines()[..7], first.lines());
        assert_eq!(&canvas.lines()[7..], first.lines());
    }
}
