//! SRT seat booker.
//!
//! Watches the search results for one SRT (Korean high-speed rail) journey
//! and books the first seat that frees up, polling until it succeeds or is
//! stopped.

pub mod booking;
pub mod config;
pub mod domain;
pub mod driver;
pub mod notify;
pub mod session;
pub mod srt;
pub mod webdriver;
