pub mod averager;
pub mod pixel;
pub mod region;
