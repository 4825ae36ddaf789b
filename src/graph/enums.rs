use serde::{Deserialize, Serialize};

pub trait RevertibleEnum {
    fn reversed(&self) -> Self;
}

/// Which end of an edge a neighborhood entry refers to.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum EdgeEnd {
    Tail,
    Head,
}

impl RevertibleEnum for EdgeEnd {
    fn reversed(&self) -> Self {
        match self {
            EdgeEnd::Tail => EdgeEnd::Head,
            EdgeEnd::Head => EdgeEnd::Tail,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ClockDirection {
    CW,
    CCW,
}

impl RevertibleEnum for ClockDirection {
    fn reversed(&self) -> Self {
        match self {
            ClockDirection::CW => ClockDirection::CCW,
            ClockDirection::CCW => ClockDirection::CW,
        }
    }
}
