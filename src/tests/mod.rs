#[cfg(not(loom))]
#[allow(dead_code)]
pub(crate) mod utils;

mod common;


#[cfg(not(loom))]
mod mt;
