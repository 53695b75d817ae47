use std::ops::{Add, AddAssign};

use rand::{Rng, distr::StandardUniform, prelude::Distribution};

/// Most cells any catalog shape occupies.
pub const MAX_SHAPE_CELLS: usize = 4;

/// Absolute grid coordinate.
///
/// `(0, 0)` is the bottom-left wall cell; x grows rightward and y grows upward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    x: i32,
    y: i32,
}

impl Position {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns the column, 0 being the left wall.
    #[must_use]
    pub const fn x(self) -> i32 {
        self.x
    }

    /// Returns the row, 0 being the floor.
    #[must_use]
    pub const fn y(self) -> i32 {
        self.y
    }
}

impl Add<Offset> for Position {
    type Output = Position;

    fn add(self, offset: Offset) -> Position {
        Position::new(self.x + offset.dx, self.y + offset.dy)
    }
}

impl AddAssign<Offset> for Position {
    fn add_assign(&mut self, offset: Offset) {
        *self = *self + offset;
    }
}

/// Relative displacement: a shape cell around its center, or a movement vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Offset {
    dx: i32,
    dy: i32,
}

impl Offset {
    pub const LEFT: Self = Self::new(-1, 0);
    pub const RIGHT: Self = Self::new(1, 0);
    pub const DOWN: Self = Self::new(0, -1);
    pub const UP: Self = Self::new(0, 1);

    #[must_use]
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    #[must_use]
    pub const fn dx(self) -> i32 {
        self.dx
    }

    #[must_use]
    pub const fn dy(self) -> i32 {
        self.dy
    }

    /// Rotates around the origin by `steps` quarter turns (taken mod 4).
    ///
    /// One step maps `(x, y)` to `(-y, x)`, a counterclockwise quarter turn in
    /// the y-up grid.
    #[must_use]
    pub const fn rotated(self, steps: i32) -> Self {
        let Self { dx: x, dy: y } = self;
        match steps.rem_euclid(4) {
            0 => Self::new(x, y),
            1 => Self::new(-y, x),
            2 => Self::new(-x, -y),
            _ => Self::new(y, -x),
        }
    }
}

/// Rotation index of a piece, always in `0..4`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rotation(u8);

impl Rotation {
    pub const SPAWN: Self = Self(0);

    /// Wraps any step count into `0..4`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn new(steps: i32) -> Self {
        Self(steps.rem_euclid(4) as u8)
    }

    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn steps(self) -> i32 {
        self.0 as i32
    }
}

/// Which rotations a shape may ever reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum RotationClass {
    /// Always shown unrotated.
    NoRotate,
    /// Alternates between rotation 0 and 1.
    TwoState,
    /// Reaches all four rotations.
    FourState,
}

impl RotationClass {
    /// Number of distinct rotations the class allows.
    #[must_use]
    pub const fn states(self) -> i32 {
        match self {
            RotationClass::NoRotate => 1,
            RotationClass::TwoState => 2,
            RotationClass::FourState => 4,
        }
    }
}

/// Identifier of a catalog shape, `0..=7`.
///
/// Shape 0 is a single cell kept for tests; play only ever draws `1..=7`. The
/// id doubles as the color index of the cells a shape occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(u8);

impl ShapeId {
    /// Number of catalog entries, including the test shape.
    pub const LEN: usize = 8;
    /// The single-cell shape, never drawn in play.
    pub const PROBE: Self = Self(0);

    /// Returns the shape with this id, or `None` past the end of the catalog.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilefall_engine::ShapeId;
    ///
    /// assert_eq!(ShapeId::new(7).map(ShapeId::get), Some(7));
    /// assert_eq!(ShapeId::new(8), None);
    /// ```
    #[must_use]
    pub const fn new(id: u8) -> Option<Self> {
        if (id as usize) < Self::LEN {
            Some(Self(id))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Color index of cells occupied by this shape.
    #[must_use]
    pub const fn color(self) -> u8 {
        self.0
    }

    /// Iterates the shapes drawn in play (`1..=7`).
    pub fn playable() -> impl Iterator<Item = Self> {
        (1..8).map(Self)
    }

    /// Unrotated layout as center-relative offsets.
    #[must_use]
    pub const fn offsets(self) -> &'static [Offset] {
        SHAPE_OFFSETS[self.0 as usize]
    }

    #[must_use]
    pub const fn rotation_class(self) -> RotationClass {
        match self.0 {
            2 => RotationClass::NoRotate,
            4 | 5 | 7 => RotationClass::TwoState,
            _ => RotationClass::FourState,
        }
    }
}

impl Distribution<ShapeId> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShapeId {
        ShapeId(rng.random_range(1..=7))
    }
}

/// Unrotated layout of `shape` (4 cells, or 1 for [`ShapeId::PROBE`]).
#[must_use]
pub const fn shape_offsets(shape: ShapeId) -> &'static [Offset] {
    shape.offsets()
}

/// Rotates each offset by `rotation_count` quarter turns around the origin.
pub fn rotate_offsets(
    offsets: &[Offset],
    rotation_count: i32,
) -> impl Iterator<Item = Offset> + '_ {
    offsets.iter().map(move |offset| offset.rotated(rotation_count))
}

/// Resolves a requested rotation against the shape's rotation class.
///
/// This is the only place that decides which rotation a shape can reach.
///
/// # Examples
///
/// ```
/// use tilefall_engine::{ShapeId, effective_rotation};
///
/// let square = ShapeId::new(2).unwrap();
/// assert_eq!(effective_rotation(square, 3).index(), 0);
///
/// let bar = ShapeId::new(7).unwrap();
/// assert_eq!(effective_rotation(bar, 3).index(), 1);
/// assert_eq!(effective_rotation(bar, -1).index(), 1);
/// ```
#[must_use]
pub const fn effective_rotation(shape: ShapeId, requested: i32) -> Rotation {
    Rotation::new(requested.rem_euclid(shape.rotation_class().states()))
}

const fn o(dx: i32, dy: i32) -> Offset {
    Offset::new(dx, dy)
}

// Drawn with y up; `C` marks the center cell.
const SHAPE_OFFSETS: [&[Offset]; ShapeId::LEN] = [
    // C
    &[o(0, 0)],
    // #
    // #C#
    &[o(-1, 1), o(-1, 0), o(0, 0), o(1, 0)],
    // ##
    // C#
    &[o(1, 1), o(1, 0), o(0, 1), o(0, 0)],
    //   #
    // #C#
    &[o(-1, 0), o(0, 0), o(1, 0), o(1, 1)],
    // #
    // #C
    //  #
    &[o(-1, 1), o(-1, 0), o(0, 0), o(0, -1)],
    //  #
    // #C
    // #
    &[o(0, 1), o(0, 0), o(-1, 0), o(-1, -1)],
    //  #
    // #C#
    &[o(-1, 0), o(0, 0), o(1, 0), o(0, 1)],
    // #C##
    &[o(-1, 0), o(0, 0), o(1, 0), o(2, 0)],
];
