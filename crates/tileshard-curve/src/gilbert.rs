//! Gilbert curve construction and ranking.
//!
//! The curve is described recursively by a cursor (the corner where the
//! sweep starts) and two orthogonal vectors: `main`, the primary sweep
//! direction and length, and `secondary`, the perpendicular one. Long
//! rectangles are cut in two along `main`; near-square ones are cut into
//! three pieces so the sweep can turn around and end at the opposite corner.
//!
//! The split points prefer even half-lengths. They fix the exact shape of the
//! curve and therefore the rank of every cell, so they must not be tuned.

use glam::I64Vec2;
use tileshard_core::{Error, Result};

/// Largest supported side length, enough for a full zoom-32 tile row.
pub const MAX_SIDE: u64 = 1 << 32;

/// Rectangle of `width x height` unit cells with a Gilbert curve over it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GilbertRect {
    width: u64,
    height: u64,
}

impl GilbertRect {
    /// Create a rectangle. Both sides must be in `1..=MAX_SIDE`.
    pub fn new(width: u64, height: u64) -> Result<Self> {
        if width < 1 || height < 1 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(Error::InvalidRectangle { width, height });
        }
        Ok(Self { width, height })
    }

    #[must_use]
    #[inline]
    pub const fn width(&self) -> u64 {
        self.width
    }

    #[must_use]
    #[inline]
    pub const fn height(&self) -> u64 {
        self.height
    }

    /// Number of cells on the curve
    #[must_use]
    #[inline]
    pub const fn area(&self) -> u128 {
        self.width as u128 * self.height as u128
    }

    /// Starting vectors: the curve runs along the longer side first.
    fn axes(&self) -> (I64Vec2, I64Vec2) {
        // Sides are bounded by MAX_SIDE, so they fit in i64.
        let width = I64Vec2::new(self.width as i64, 0);
        let height = I64Vec2::new(0, self.height as i64);
        if self.width > self.height {
            (width, height)
        } else {
            (height, width)
        }
    }

    /// Position of cell `(x, y)` along the curve, in `0..area`.
    pub fn rank(&self, x: u64, y: u64) -> Result<u64> {
        if x >= self.width || y >= self.height {
            return Err(Error::OutOfBounds(format!(
                "cell ({x}, {y}) outside {}x{} rectangle",
                self.width, self.height
            )));
        }
        let (main, secondary) = self.axes();
        let mut sweep = Sweep {
            target: I64Vec2::new(x as i64, y as i64),
            counter: 0,
        };
        sweep.locate(I64Vec2::ZERO, main, secondary).ok_or_else(|| {
            Error::Inconsistent(format!(
                "cell ({x}, {y}) not reached by the curve over {}x{}",
                self.width, self.height
            ))
        })
    }

    /// Visit every cell in curve order.
    pub fn walk<F>(&self, mut visit: F)
    where
        F: FnMut(u64, u64),
    {
        let (main, secondary) = self.axes();
        walk(I64Vec2::ZERO, main, secondary, &mut visit);
    }

    /// Collect every cell in curve order.
    ///
    /// `cells()[rank(x, y)] == (x, y)` for every cell.
    #[must_use]
    pub fn cells(&self) -> Vec<(u64, u64)> {
        let mut cells = Vec::with_capacity(usize::try_from(self.area()).unwrap_or(0));
        self.walk(|x, y| cells.push((x, y)));
        cells
    }
}

/// Rank cell `(x, y)` on the Gilbert curve over a `width x height` rectangle.
pub fn rank(x: u64, y: u64, width: u64, height: u64) -> Result<u64> {
    GilbertRect::new(width, height)?.rank(x, y)
}

/// Search state: the cell being ranked and the cells passed so far.
struct Sweep {
    target: I64Vec2,
    counter: u64,
}

impl Sweep {
    /// Rank the target inside the sub-rectangle, or count the whole
    /// sub-rectangle as passed and return `None` when it is elsewhere.
    fn locate(&mut self, cursor: I64Vec2, main: I64Vec2, secondary: I64Vec2) -> Option<u64> {
        let main_dir = main.signum();
        let sec_dir = secondary.signum();

        let far = cursor + main - main_dir + secondary - sec_dir;
        let lo = cursor.min(far);
        let hi = cursor.max(far);
        if self.target.cmplt(lo).any() || self.target.cmpgt(hi).any() {
            let extent = hi - lo + I64Vec2::ONE;
            self.counter += extent.x.unsigned_abs() * extent.y.unsigned_abs();
            return None;
        }

        // Each vector lies on one axis, so the component sum is its length.
        let main_len = main.element_sum().abs();
        let sec_len = secondary.element_sum().abs();

        if main_len == 1 || sec_len == 1 {
            // A single row or column: the rank is the distance walked from the cursor.
            self.counter += (cursor - self.target).element_sum().unsigned_abs();
            return Some(self.counter);
        }

        let mut main_half = floor_half(main);

        if 2 * main_len > 3 * sec_len {
            if main_half.element_sum().abs() % 2 == 1 && main_len > 2 {
                main_half += main_dir;
            }
            return self
                .locate(cursor, main_half, secondary)
                .or_else(|| self.locate(cursor + main_half, main - main_half, secondary));
        }

        let mut sec_half = floor_half(secondary);
        if sec_half.element_sum().abs() % 2 == 1 && sec_len > 2 {
            sec_half += sec_dir;
        }

        self.locate(cursor, sec_half, main_half)
            .or_else(|| self.locate(cursor + sec_half, main, secondary - sec_half))
            .or_else(|| {
                self.locate(
                    cursor + (main - main_dir) + (sec_half - sec_dir),
                    -sec_half,
                    -(main - main_half),
                )
            })
    }
}

fn walk<F>(cursor: I64Vec2, main: I64Vec2, secondary: I64Vec2, visit: &mut F)
where
    F: FnMut(u64, u64),
{
    let main_dir = main.signum();
    let sec_dir = secondary.signum();
    let main_len = main.element_sum().abs();
    let sec_len = secondary.element_sum().abs();

    if sec_len == 1 || main_len == 1 {
        let (dir, len) = if sec_len == 1 {
            (main_dir, main_len)
        } else {
            (sec_dir, sec_len)
        };
        let mut cell = cursor;
        for _ in 0..len {
            visit(cell.x as u64, cell.y as u64);
            cell += dir;
        }
        return;
    }

    let mut main_half = floor_half(main);

    if 2 * main_len > 3 * sec_len {
        if main_half.element_sum().abs() % 2 == 1 && main_len > 2 {
            main_half += main_dir;
        }
        walk(cursor, main_half, secondary, visit);
        walk(cursor + main_half, main - main_half, secondary, visit);
        return;
    }

    let mut sec_half = floor_half(secondary);
    if sec_half.element_sum().abs() % 2 == 1 && sec_len > 2 {
        sec_half += sec_dir;
    }

    walk(cursor, sec_half, main_half, visit);
    walk(cursor + sec_half, main, secondary - sec_half, visit);
    walk(
        cursor + (main - main_dir) + (sec_half - sec_dir),
        -sec_half,
        -(main - main_half),
        visit,
    );
}

/// Halve a vector, rounding toward negative infinity.
#[inline]
fn floor_half(v: I64Vec2) -> I64Vec2 {
    I64Vec2::new(v.x.div_euclid(2), v.y.div_euclid(2))
}
