//! Addresses and locators on the SRT web site.
//!
//! Everything that depends on the site's markup lives here so a layout
//! change touches one file.

use crate::driver::{SeatStatus, WaitlistStatus};
use crate::webdriver::Locator;

pub const LOGIN_URL: &str = "https://etk.srail.co.kr/cmc/01/selectLoginForm.do";
pub const SEARCH_URL: &str = "https://etk.srail.kr/hpg/hra/01/selectScheduleList.do";

pub const LOGIN_ID_INPUT: &str = "srchDvNm01";
pub const LOGIN_PASSWORD_INPUT: &str = "hmpgPwdCphd01";
pub const LOGIN_BUTTON: &str = r#"//*[@id="login-form"]/fieldset/div[1]/div[1]/div[2]/div/div[2]/input"#;
pub const WELCOME_BANNER: &str = "#wrap > div.header.header-e > div.global.clear > div";
pub const WELCOME_TEXT: &str = "환영합니다";

pub const DEPARTURE_INPUT: &str = "dptRsStnCdNm";
pub const ARRIVAL_INPUT: &str = "arvRsStnCdNm";
pub const DATE_SELECT: &str = "dptDt";
pub const HOUR_SELECT: &str = "dptTm";
pub const PASSENGER_SELECT: &str = "psgInfoPerPrnb1";
pub const SEARCH_BUTTON: &str = "//input[@value='조회하기']";

/// Present only on the page shown after a seat is reserved.
pub const RESERVED_MARKER: &str = "isFalseGotoMain";

const RESULT_ROWS: &str = "#result-form > fieldset > div.tbl_wrap.th_thead > table > tbody";
const SEAT_COLUMN: usize = 7;
const WAITLIST_COLUMN: usize = 8;

const BOOKABLE_TEXT: &str = "예약하기";
const WAITLIST_TEXT: &str = "신청하기";

/// Script that un-hides a select so its options can be clicked.
pub const REVEAL_SCRIPT: &str = "arguments[0].setAttribute('style','display: True;')";
/// Script that clicks an element from inside the page.
pub const CLICK_SCRIPT: &str = "arguments[0].click();";

fn cell(row: usize, column: usize) -> String {
    format!("{RESULT_ROWS} > tr:nth-child({row}) > td:nth-child({column})")
}

/// Every row of the result table.
pub fn result_rows() -> Locator {
    Locator::css(format!("{RESULT_ROWS} > tr"))
}

/// Standard-class seat cell of a result row.
pub fn seat_cell(row: usize) -> Locator {
    Locator::css(cell(row, SEAT_COLUMN))
}

/// Waitlist cell of a result row.
pub fn waitlist_cell(row: usize) -> Locator {
    Locator::css(cell(row, WAITLIST_COLUMN))
}

/// Reserve link inside the seat cell.
pub fn seat_link(row: usize) -> Locator {
    Locator::css(format!("{} > a", cell(row, SEAT_COLUMN)))
}

/// Apply link inside the waitlist cell.
pub fn waitlist_link(row: usize) -> Locator {
    Locator::css(format!("{} > a", cell(row, WAITLIST_COLUMN)))
}

/// Option of a select picked by its `value` attribute.
pub fn option_by_value(select_id: &str, value: &str) -> Locator {
    Locator::css(format!("#{select_id} option[value='{value}']"))
}

/// Option of a select picked by its visible label.
pub fn option_by_label(select_id: &str, label: &str) -> Locator {
    Locator::xpath(format!(
        "//select[@id='{select_id}']/option[normalize-space(.)='{label}']"
    ))
}

/// Passenger count option. The select is addressed by name on this page.
pub fn passenger_option(count: u8) -> Locator {
    Locator::css(format!("select[name='{PASSENGER_SELECT}'] option[value='{count}']"))
}

pub fn classify_seat(text: &str) -> SeatStatus {
    if text.contains(BOOKABLE_TEXT) {
        SeatStatus::Bookable
    } else {
        SeatStatus::SoldOut
    }
}

pub fn classify_waitlist(text: &str) -> WaitlistStatus {
    if text.contains(WAITLIST_TEXT) {
        WaitlistStatus::Offerable
    } else {
        WaitlistStatus::Unavailable
    }
}
