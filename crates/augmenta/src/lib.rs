#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

#[doc(inline)]
pub use augmenta_geom as geom;

#[doc(inline)]
pub use augmenta_crops as crops;
