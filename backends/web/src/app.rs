use std::cell::RefCell;

use flexdom_core::{Dom, DomConfig, Element, KeyStrategy, Result};
use tracing::{info, level_filters::LevelFilter};

use crate::{dom::WebHost, error::WebError, logging};

/// Selector used when none is configured.
pub const DEFAULT_ROOT_SELECTOR: &str = "#root";

thread_local! {
    /// Registries that stay alive for the lifetime of the page.
    static MOUNTED: RefCell<Vec<Dom<WebHost>>> = const { RefCell::new(Vec::new()) };
}

/// Builder for [`WebApp`].
#[derive(Debug, Clone)]
pub struct WebAppBuilder {
    root_selector: String,
    config: DomConfig,
    log_level: Option<LevelFilter>,
}

impl Default for WebAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAppBuilder {
    /// Creates a new builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root_selector: DEFAULT_ROOT_SELECTOR.to_owned(),
            config: DomConfig::default(),
            log_level: Some(LevelFilter::INFO),
        }
    }

    /// Sets the selector of the element that should host the application.
    #[must_use]
    pub fn with_root_selector(mut self, selector: impl Into<String>) -> Self {
        self.root_selector = selector.into();
        self
    }

    /// Selects how element keys are minted.
    #[must_use]
    pub fn with_key_strategy(mut self, strategy: KeyStrategy) -> Self {
        self.config = self.config.with_key_strategy(strategy);
        self
    }

    /// Renames the attribute element keys are written to.
    #[must_use]
    pub fn with_key_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.config = self.config.with_key_attribute(attribute);
        self
    }

    /// Sets the console log level, or disables console logging with `None`.
    #[must_use]
    pub const fn with_logging(mut self, level: Option<LevelFilter>) -> Self {
        self.log_level = level;
        self
    }

    /// Finalises the builder and creates a [`WebApp`].
    ///
    /// # Errors
    ///
    /// Returns an error if the DOM is unavailable or the root selector
    /// matches nothing.
    pub fn build(self) -> Result<WebApp, WebError> {
        if let Some(level) = self.log_level {
            logging::install(level);
        }
        let host = WebHost::new()?;
        let dom = Dom::with_config(host, &self.root_selector, self.config)?;
        info!(root = %self.root_selector, "flexdom web app initialised");
        Ok(WebApp { dom })
    }
}

/// Entry point for running `FlexDOM` inside the browser.
#[derive(Debug, Clone)]
pub struct WebApp {
    dom: Dom<WebHost>,
}

impl WebApp {
    /// Returns a builder with default configuration.
    #[must_use]
    pub fn builder() -> WebAppBuilder {
        WebAppBuilder::new()
    }

    /// The registry bound to the root element.
    #[must_use]
    pub const fn dom(&self) -> &Dom<WebHost> {
        &self.dom
    }

    /// Renders the top-level component under the root.
    ///
    /// # Errors
    ///
    /// Returns whatever the component or the attach fails with.
    pub fn render<F>(&self, factory: F) -> Result<Element<web_sys::Element>, WebError>
    where
        F: FnOnce(&Dom<WebHost>) -> Result<Element<web_sys::Element>>,
    {
        Ok(self.dom.render(factory)?)
    }

    /// Keeps the registry alive for the rest of the page's lifetime.
    ///
    /// State containers only hold weak references to their registry, so an
    /// app whose handles all go out of scope stops re-rendering.
    pub fn mount(self) -> Dom<WebHost> {
        MOUNTED.with(|mounted| mounted.borrow_mut().push(self.dom.clone()));
        self.dom
    }
}

/// Locates `root_selector`, renders the component built by `factory` under it
/// and keeps the app mounted.
///
/// # Errors
///
/// Returns an error if the DOM is unavailable, the selector matches nothing or
/// rendering fails.
pub fn start<F>(root_selector: &str, factory: F) -> Result<Dom<WebHost>, WebError>
where
    F: FnOnce(&Dom<WebHost>) -> Result<Element<web_sys::Element>>,
{
    let app = WebApp::builder().with_root_selector(root_selector).build()?;
    app.render(factory)?;
    Ok(app.mount())
}
