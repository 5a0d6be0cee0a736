pub mod assets;
pub mod config;
pub mod contact;
pub mod content;
pub mod logging;
pub mod motion;
