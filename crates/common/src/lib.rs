//! Ambient services shared by the lotsync binaries.

pub mod logging;
