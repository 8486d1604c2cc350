pub mod codec;
pub mod interface;
pub mod range;
