//! File formats around the UI core: scripted input playback (TOML in) and
//! widget tree dumps (JSON out).
pub mod dump;
pub mod playback;
