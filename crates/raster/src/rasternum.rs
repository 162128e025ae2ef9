use crate::Nodata;

// Type requirements for data in rasters
pub trait RasterNum:
    Copy
    + Nodata
    + PartialOrd
    + num::Num
    + num::NumCast
    + num::Bounded
    + num::ToPrimitive
    + num::traits::NumAssignOps
    + std::fmt::Debug
    + std::fmt::Display
{
}

impl<T> RasterNum for T where
    T: Copy
        + Nodata
        + PartialOrd
        + num::Num
        + num::NumCast
        + num::Bounded
        + num::ToPrimitive
        + num::traits::NumAssignOps
        + std::fmt::Debug
        + std::fmt::Display
{
}
