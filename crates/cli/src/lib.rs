//! Command-line front ends for `build-3rdparty` and `tpbuild-probe`.

pub mod cmd;
pub mod logging;
pub mod output;
