#[doc(inline)]
pub use raster;
#[doc(inline)]
pub use toolbox;
