use glam::Vec3;

/// Cardinal travel direction on the floor grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Toward negative Z, away from the default camera.
    North,
    /// Toward positive Z.
    South,
    /// Toward positive X.
    East,
    /// Toward negative X.
    West,
}

impl Direction {
    pub const ALL: [Self; 4] = [Self::North, Self::South, Self::East, Self::West];

    /// Unit step the cube travels for one tumble in this direction.
    pub fn step(self) -> Vec3 {
        match self {
            Self::North => Vec3::new(0.0, 0.0, -1.0),
            Self::South => Vec3::new(0.0, 0.0, 1.0),
            Self::East => Vec3::new(1.0, 0.0, 0.0),
            Self::West => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// World-frame axis the 90 degree pivot rotation is taken around.
    ///
    /// The axis is expressed through the cube's current orientation before
    /// use, which keeps the tumble edge-over-edge regardless of how the
    /// cube has been turned by earlier rolls.
    pub fn roll_axis(self) -> Vec3 {
        match self {
            Self::North => Vec3::new(1.0, 0.0, 0.0),
            Self::South => Vec3::new(-1.0, 0.0, 0.0),
            Self::East => Vec3::new(0.0, 0.0, -1.0),
            Self::West => Vec3::new(0.0, 0.0, 1.0),
        }
    }

    /// Lowercase name used by move lists and log lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }

    /// Parses a move-list token. Arrow-key style aliases are accepted.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "north" | "up" => Some(Self::North),
            "south" | "down" => Some(Self::South),
            "east" | "right" => Some(Self::East),
            "west" | "left" => Some(Self::West),
            _ => None,
        }
    }
}
