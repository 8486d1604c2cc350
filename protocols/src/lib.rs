//! Wire formats spoken by `sweepr`.

pub mod dns;
