use scenery_api_core::{Size, Vec2};

/// Layout axis. Lets one flow routine serve rows and columns.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    #[inline]
    pub fn cross(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }

    #[inline]
    pub fn extent(self, s: Size) -> f32 {
        match self {
            Axis::X => s.width,
            Axis::Y => s.height,
        }
    }

    #[inline]
    pub fn set_extent(self, s: &mut Size, value: f32) {
        match self {
            Axis::X => s.width = value,
            Axis::Y => s.height = value,
        }
    }
}
