//! Minimal W3C WebDriver client.
//!
//! Drives a real browser through a chromedriver process. The SRT adapter
//! is built on this; nothing else in the crate talks to a browser.
//!
//! Two driver errors matter to callers and are surfaced as predicates on
//! [`WebDriverError`]:
//! - stale element reference: the page re-rendered between lookup and use
//! - element click intercepted: an overlay received the click

mod client;
mod error;

pub use client::{ENTER, ElementRef, Locator, WebDriverConfig, WebDriverSession};
pub use error::{CLICK_INTERCEPTED, NO_SUCH_ELEMENT, STALE_ELEMENT, WebDriverError};
