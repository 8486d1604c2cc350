//! End-to-end sweeps against stub probers and resolvers. Nothing here touches
//! the network.

#[cfg(test)]
mod stubs;
#[cfg(test)]
mod sweep;
