//! [`AutomationDriver`] for the SRT booking site.
//!
//! Drives a real browser through [`WebDriverSession`]. The result table
//! re-renders on every search, so an element found a moment ago may be gone
//! by the time it is read or clicked. Those failures are folded into
//! `Unreadable` and `Blocked`; anything else is passed up as a
//! [`DriverError`].

mod page;

use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ValidCriteria;
use crate::driver::{ActivationResult, AutomationDriver, Credentials, DriverError, RowObservation};
use crate::webdriver::{
    ENTER, ElementRef, Locator, WebDriverConfig, WebDriverError, WebDriverSession,
};

/// Lookup wait while the login form loads.
const LOGIN_WAIT: Duration = Duration::from_secs(15);
/// Lookup wait for ordinary page interaction.
const PAGE_WAIT: Duration = Duration::from_secs(5);
/// Lookup wait after pressing reserve.
const CLAIM_WAIT: Duration = Duration::from_secs(3);
/// Lookup wait after resubmitting a search.
const REFRESH_WAIT: Duration = Duration::from_secs(10);
/// Pause after the first search for the result table to render.
const FIRST_RESULTS_PAUSE: Duration = Duration::from_secs(1);

/// Drives the SRT site in one browser session.
#[derive(Debug)]
pub struct SrtDriver {
    browser: WebDriverSession,
}

impl SrtDriver {
    /// Wrap an open browser session.
    pub fn new(browser: WebDriverSession) -> Self {
        Self { browser }
    }

    /// Open a browser and wrap it.
    pub async fn launch(config: &WebDriverConfig) -> Result<Self, DriverError> {
        let browser = WebDriverSession::start(config).await?;
        info!(base_url = %config.base_url, "Browser session started");
        Ok(Self::new(browser))
    }

    /// Close the browser.
    pub async fn close(self) -> Result<(), DriverError> {
        self.browser.quit().await?;
        Ok(())
    }

    async fn type_into(&self, id: &str, text: &str) -> Result<(), DriverError> {
        let input = self.browser.find(&Locator::id(id)).await?;
        self.browser.clear(&input).await?;
        self.browser.send_keys(&input, text).await?;
        Ok(())
    }

    /// Un-hide a select then click one of its options.
    async fn choose(&self, select: &Locator, option: &Locator) -> Result<(), DriverError> {
        let element = self.browser.find(select).await?;
        self.browser
            .execute(page::REVEAL_SCRIPT, vec![element.to_json()])
            .await?;

        let choice = self.browser.find(option).await.map_err(|e| {
            if e.is_no_such_element() {
                DriverError::UnexpectedPage(format!("no option {option:?} on the search form"))
            } else {
                e.into()
            }
        })?;
        self.browser.click(&choice).await?;
        Ok(())
    }

    /// Text of a cell, or `None` if the row moved underneath us.
    async fn cell_text(&self, locator: &Locator) -> Result<Option<String>, DriverError> {
        let text = match self.browser.find(locator).await {
            Ok(cell) => self.browser.text(&cell).await,
            Err(e) => Err(e),
        };
        match text {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.is_stale() || e.is_no_such_element() => {
                debug!(error = %e, "Cell not readable");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find a link and click it, reporting lost races as `Blocked`.
    async fn press(
        &self,
        locator: &Locator,
        use_enter: bool,
    ) -> Result<ActivationResult, DriverError> {
        let link = match self.browser.find(locator).await {
            Ok(link) => link,
            Err(e) if e.is_no_such_element() || e.is_stale() => {
                debug!(error = %e, "Link gone before press");
                return Ok(ActivationResult::Blocked);
            }
            Err(e) => return Err(e.into()),
        };

        let pressed = if use_enter {
            self.browser.send_keys(&link, ENTER).await
        } else {
            self.browser.click(&link).await
        };

        match pressed {
            Ok(()) => Ok(ActivationResult::Succeeded),
            Err(e) if is_lost_race(&e) => {
                warn!(error = %e, "Press did not land");
                Ok(ActivationResult::Blocked)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn search_button(&self) -> Result<ElementRef, DriverError> {
        Ok(self
            .browser
            .find(&Locator::xpath(page::SEARCH_BUTTON))
            .await?)
    }
}

fn is_lost_race(e: &WebDriverError) -> bool {
    e.is_click_intercepted() || e.is_stale()
}

impl AutomationDriver for SrtDriver {
    async fn authenticate(&mut self, credentials: &Credentials) -> Result<(), DriverError> {
        self.browser.goto(page::LOGIN_URL).await?;
        self.browser.set_implicit_wait(LOGIN_WAIT).await?;

        self.type_into(page::LOGIN_ID_INPUT, &credentials.user).await?;
        self.type_into(page::LOGIN_PASSWORD_INPUT, &credentials.password)
            .await?;
        let button = self
            .browser
            .find(&Locator::xpath(page::LOGIN_BUTTON))
            .await?;
        self.browser.click(&button).await?;
        self.browser.set_implicit_wait(PAGE_WAIT).await?;

        let banner = match self.browser.find(&Locator::css(page::WELCOME_BANNER)).await {
            Ok(banner) => self.browser.text(&banner).await?,
            Err(e) if e.is_no_such_element() => String::new(),
            Err(e) => return Err(e.into()),
        };

        if !banner.contains(page::WELCOME_TEXT) {
            return Err(DriverError::Authentication(format!(
                "no welcome banner after login as {}",
                credentials.user
            )));
        }

        debug!(user = %credentials.user, "Welcome banner found");
        Ok(())
    }

    async fn submit_search(&mut self, criteria: &ValidCriteria) -> Result<(), DriverError> {
        self.browser.goto(page::SEARCH_URL).await?;
        self.browser.set_implicit_wait(PAGE_WAIT).await?;

        self.type_into(page::DEPARTURE_INPUT, criteria.departure().name())
            .await?;
        self.type_into(page::ARRIVAL_INPUT, criteria.arrival().name())
            .await?;

        self.choose(
            &Locator::id(page::DATE_SELECT),
            &page::option_by_value(page::DATE_SELECT, &criteria.date().to_string()),
        )
        .await?;
        self.choose(
            &Locator::id(page::HOUR_SELECT),
            &page::option_by_label(page::HOUR_SELECT, &criteria.hour().to_string()),
        )
        .await?;
        self.choose(
            &Locator::name(page::PASSENGER_SELECT),
            &page::passenger_option(criteria.passengers()),
        )
        .await?;

        let button = self.search_button().await?;
        self.browser.click(&button).await?;
        self.browser.set_implicit_wait(PAGE_WAIT).await?;
        tokio::time::sleep(FIRST_RESULTS_PAUSE).await;
        Ok(())
    }

    async fn read_row(&mut self, index: usize) -> Result<RowObservation, DriverError> {
        let seat = self.cell_text(&page::seat_cell(index)).await?;
        let waitlist = self.cell_text(&page::waitlist_cell(index)).await?;

        match (seat, waitlist) {
            (Some(seat), Some(waitlist)) => Ok(RowObservation::new(
                index,
                page::classify_seat(&seat),
                page::classify_waitlist(&waitlist),
            )),
            _ => Ok(RowObservation::unreadable(index)),
        }
    }

    async fn activate_reservation(
        &mut self,
        index: usize,
    ) -> Result<ActivationResult, DriverError> {
        let result = self.press(&page::seat_link(index), false).await?;
        self.browser.set_implicit_wait(CLAIM_WAIT).await?;
        Ok(result)
    }

    async fn activate_reservation_fallback(
        &mut self,
        index: usize,
    ) -> Result<ActivationResult, DriverError> {
        let result = self.press(&page::seat_link(index), true).await?;
        self.browser.set_implicit_wait(CLAIM_WAIT).await?;
        Ok(result)
    }

    async fn activate_waitlist(&mut self, index: usize) -> Result<ActivationResult, DriverError> {
        self.press(&page::waitlist_link(index), false).await
    }

    async fn confirmation_visible(&mut self) -> Result<bool, DriverError> {
        let markers = self
            .browser
            .find_all(&Locator::id(page::RESERVED_MARKER))
            .await?;
        Ok(!markers.is_empty())
    }

    async fn go_back_to_results(&mut self) -> Result<(), DriverError> {
        // A blocked claim never leaves the result table
        self.browser.set_implicit_wait(Duration::ZERO).await?;
        let rows = self.browser.find_all(&page::result_rows()).await?;
        if rows.is_empty() {
            self.browser.back().await?;
        } else {
            debug!(rows = rows.len(), "Still on the result table, not going back");
        }
        self.browser.set_implicit_wait(PAGE_WAIT).await?;
        Ok(())
    }

    async fn resubmit_search(&mut self) -> Result<(), DriverError> {
        let button = self.search_button().await?;
        self.browser
            .execute(page::CLICK_SCRIPT, vec![button.to_json()])
            .await?;
        self.browser.set_implicit_wait(REFRESH_WAIT).await?;
        Ok(())
    }
}
