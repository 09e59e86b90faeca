// src/config/consts.rs

// Net config
pub const DOC_HOST: &str = "developer.mozilla.org";

// Local storage
pub const DESCRIPTIONS_DIR: &str = "descriptions";
pub const PROPERTIES_SUBDIR: &str = "css/properties";

// Concurrency
pub const WORKERS: usize = 4;
pub const REQUEST_PAUSE_MS: u64 = 500; // the wiki dislikes request bursts
pub const JITTER_MS: u64 = 50; // extra 0..50 ms
