//! MBO Common Library
//!
//! Shared infrastructure for the MBO workspace. Currently this is the
//! logging setup used by the CLI binary; anything else that grows a second
//! consumer should move here as well.

pub mod logging;
