//! Browser control over the Chrome `DevTools` Protocol.
//!
//! When compiled with the `browser` feature this provides [`ChromiumDriver`],
//! a [`BrowserDriver`](crate::driver::BrowserDriver) backed by chromiumoxide.
//! Element snapshots, actions and network capture are implemented with small
//! page scripts so the driver sees exactly what a user would: visibility and
//! occlusion come from layout, not from the DOM tree alone.

#![cfg_attr(not(feature = "browser"), allow(dead_code))]

use std::path::PathBuf;

/// Launch options for the real browser
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Run without a window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Path to chromium binary (None = auto-detect)
    pub chromium_path: Option<PathBuf>,
    /// Sandbox mode (disable for containers)
    pub sandbox: bool,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 900,
            chromium_path: None,
            sandbox: true,
        }
    }
}

impl BrowserOptions {
    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set viewport dimensions
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set chromium path
    #[must_use]
    pub fn with_chromium_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.chromium_path = Some(path.into());
        self
    }

    /// Disable sandbox (for containers/CI)
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Storage key the capture script appends network calls to
pub const CAPTURE_KEY: &str = "__probe_captured";

/// Tags every match with `data-probe-id` and returns element snapshots.
/// `__CSS__` and `__TEXT__` are replaced with JSON literals.
const QUERY_SCRIPT: &str = r"(() => {
  const css = __CSS__;
  const text = __TEXT__;
  const out = [];
  for (const el of document.querySelectorAll(css)) {
    const label = el.closest('label');
    const own = el.innerText ?? el.textContent ?? '';
    const hay = own + ' ' + (label ? label.textContent : '');
    if (text !== null && !hay.includes(text)) continue;
    if (!el.dataset.probeId) {
      window.__probeSeq = (window.__probeSeq || 0) + 1;
      el.dataset.probeId = String(window.__probeSeq);
    }
    const r = el.getBoundingClientRect();
    const style = getComputedStyle(el);
    const visible = r.width > 0 && r.height > 0
      && style.visibility !== 'hidden' && style.display !== 'none';
    let obscured = false;
    if (visible) {
      const top = document.elementFromPoint(r.left + r.width / 2, r.top + r.height / 2);
      obscured = !!top && top !== el && !el.contains(top);
    }
    const attributes = {};
    for (const a of el.attributes) {
      if (a.name !== 'data-probe-id') attributes[a.name] = a.value;
    }
    if (el.checked) attributes.checked = 'true';
    out.push({
      id: el.dataset.probeId,
      tag_name: el.tagName.toLowerCase(),
      text_content: own,
      value: ('value' in el) ? String(el.value) : null,
      attributes,
      visible,
      obscured,
    });
  }
  return out;
})()";

/// Runs `__BODY__` against the tagged element `el`; false when it is gone
const ACT_SCRIPT: &str = r#"(() => {
  const el = document.querySelector('[data-probe-id="__ID__"]');
  if (!el) return false;
  el.scrollIntoView({ block: 'center' });
  __BODY__
  return true;
})()"#;

const CLICK_BODY: &str =
    "el.dispatchEvent(new MouseEvent('click', { bubbles: true, cancelable: true, view: window }));";

const TYPE_BODY: &str = r"el.focus();
  el.value = (el.value || '') + __TEXT__;
  el.dispatchEvent(new Event('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));";

const SELECT_BODY: &str = r"const opt = Array.from(el.options || []).find(o => o.text.trim() === __TEXT__);
  if (!opt) return false;
  el.value = opt.value;
  el.dispatchEvent(new Event('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));";

/// Wraps XHR and fetch once per document; calls survive in-app navigation
/// through session storage
const CAPTURE_SCRIPT: &str = r"(() => {
  if (window.__probeCapture) return true;
  window.__probeCapture = true;
  const KEY = '__probe_captured';
  const push = (entry) => {
    const list = JSON.parse(sessionStorage.getItem(KEY) || '[]');
    list.push(entry);
    sessionStorage.setItem(KEY, JSON.stringify(list));
  };
  const parse = (text) => { try { return JSON.parse(text); } catch (_) { return text; } };
  const open = XMLHttpRequest.prototype.open;
  XMLHttpRequest.prototype.open = function (method, url, ...rest) {
    this.__probe = { method: String(method).toUpperCase(), url: new URL(url, location.href).href };
    return open.call(this, method, url, ...rest);
  };
  const send = XMLHttpRequest.prototype.send;
  XMLHttpRequest.prototype.send = function (...args) {
    this.addEventListener('loadend', () => {
      if (!this.__probe) return;
      const raw = (this.responseType === '' || this.responseType === 'text')
        ? this.responseText : JSON.stringify(this.response);
      push({ ...this.__probe, status: this.status, body: parse(raw) });
    });
    return send.apply(this, args);
  };
  const original = window.fetch;
  window.fetch = async (input, init) => {
    const response = await original(input, init);
    const method = ((init && init.method) || (input && input.method) || 'GET').toUpperCase();
    const url = new URL(typeof input === 'string' ? input : input.url, location.href).href;
    response.clone().text()
      .then((text) => push({ method, url, status: response.status, body: parse(text) }))
      .catch(() => {});
    return response;
  };
  return true;
})()";

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn query_script(css: &str, text: Option<&str>) -> String {
    QUERY_SCRIPT
        .replace("__CSS__", &js_string(css))
        .replace("__TEXT__", &text.map_or_else(|| "null".to_string(), js_string))
}

fn act_script(id: &str, body: &str) -> String {
    // ids are numeric strings the query script assigned
    let id: String = id.chars().filter(char::is_ascii_digit).collect();
    ACT_SCRIPT.replace("__ID__", &id).replace("__BODY__", body)
}

fn read_captures_script() -> String {
    format!("sessionStorage.getItem('{CAPTURE_KEY}') || '[]'")
}

#[cfg(feature = "browser")]
#[allow(clippy::significant_drop_tightening, clippy::missing_errors_doc)]
mod cdp {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
    use chromiumoxide::page::Page as CdpPage;
    use futures::StreamExt;
    use serde::de::DeserializeOwned;
    use serde::Deserialize;
    use tokio::sync::Mutex;
    use tracing::{debug, info};

    use super::{
        act_script, js_string, query_script, read_captures_script, BrowserOptions, CAPTURE_SCRIPT,
        CLICK_BODY, SELECT_BODY, TYPE_BODY,
    };
    use crate::driver::{BrowserDriver, ClickOptions, ElementHandle};
    use crate::harness::SessionFactory;
    use crate::locator::Selector;
    use crate::network::{HttpMethod, InterceptId, InterceptSpec, InterceptedResponse};
    use crate::result::{ProbeError, ProbeResult};

    #[derive(Debug, Deserialize)]
    struct CapturedCall {
        method: String,
        url: String,
        status: u16,
        #[serde(default)]
        body: serde_json::Value,
    }

    #[derive(Debug)]
    struct Capture {
        id: InterceptId,
        spec: InterceptSpec,
        cursor: usize,
    }

    /// [`BrowserDriver`] over a real Chromium page
    #[derive(Debug)]
    pub struct ChromiumDriver {
        browser: Arc<Mutex<CdpBrowser>>,
        page: Arc<Mutex<CdpPage>>,
        handle: tokio::task::JoinHandle<()>,
        captures: Vec<Capture>,
        next_intercept: u64,
    }

    impl ChromiumDriver {
        /// Launch chromium and open a blank page
        pub async fn launch(options: &BrowserOptions) -> ProbeResult<Self> {
            let mut builder = CdpConfig::builder()
                .window_size(options.viewport_width, options.viewport_height);
            if !options.headless {
                builder = builder.with_head();
            }
            if !options.sandbox {
                builder = builder.no_sandbox();
            }
            if let Some(ref path) = options.chromium_path {
                builder = builder.chrome_executable(path);
            }
            let config = builder
                .build()
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

            let (browser, mut handler) =
                CdpBrowser::launch(config)
                    .await
                    .map_err(|e| ProbeError::BrowserLaunch {
                        message: e.to_string(),
                    })?;

            let handle = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;
            info!(headless = options.headless, "chromium launched");

            Ok(Self {
                browser: Arc::new(Mutex::new(browser)),
                page: Arc::new(Mutex::new(page)),
                handle,
                captures: Vec::new(),
                next_intercept: 0,
            })
        }

        async fn eval<T: DeserializeOwned>(&self, script: &str) -> ProbeResult<T> {
            let page = self.page.lock().await;
            let result = page
                .evaluate(script)
                .await
                .map_err(|e| ProbeError::driver(e.to_string()))?;
            result
                .into_value()
                .map_err(|e| ProbeError::driver(e.to_string()))
        }

        async fn act(&self, element: &ElementHandle, body: &str) -> ProbeResult<()> {
            let done: bool = self.eval(&act_script(&element.id, body)).await?;
            if done {
                Ok(())
            } else {
                Err(ProbeError::driver(format!(
                    "element {} ({}) is gone or rejected the action",
                    element.id, element.tag_name
                )))
            }
        }

        async fn install_capture(&self) -> ProbeResult<()> {
            let _: bool = self.eval(CAPTURE_SCRIPT).await?;
            Ok(())
        }

        async fn captured(&self) -> ProbeResult<Vec<CapturedCall>> {
            let raw: String = self.eval(&read_captures_script()).await?;
            Ok(serde_json::from_str(&raw)?)
        }
    }

    #[async_trait]
    impl BrowserDriver for ChromiumDriver {
        async fn visit(&mut self, url: &str) -> ProbeResult<()> {
            {
                let page = self.page.lock().await;
                let _ = page.goto(url).await.map_err(|e| ProbeError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                })?;
            }
            if !self.captures.is_empty() {
                self.install_capture().await?;
            }
            Ok(())
        }

        async fn current_url(&self) -> ProbeResult<String> {
            let page = self.page.lock().await;
            let url = page
                .url()
                .await
                .map_err(|e| ProbeError::driver(e.to_string()))?;
            Ok(url.unwrap_or_else(|| "about:blank".to_string()))
        }

        async fn query_all(&self, selector: &Selector) -> ProbeResult<Vec<ElementHandle>> {
            self.eval(&query_script(&selector.css_query(), selector.text_filter()))
                .await
        }

        async fn click(&mut self, element: &ElementHandle, options: ClickOptions) -> ProbeResult<()> {
            if !options.force && !element.is_actionable() {
                return Err(ProbeError::driver(format!(
                    "element {} is not actionable",
                    element.id
                )));
            }
            self.act(element, CLICK_BODY).await
        }

        async fn type_text(&mut self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
            self.act(element, &TYPE_BODY.replace("__TEXT__", &js_string(text)))
                .await
        }

        async fn select_option(&mut self, element: &ElementHandle, label: &str) -> ProbeResult<()> {
            self.act(element, &SELECT_BODY.replace("__TEXT__", &js_string(label)))
                .await
        }

        async fn intercept(&mut self, spec: &InterceptSpec) -> ProbeResult<InterceptId> {
            self.install_capture().await?;
            let cursor = self.captured().await?.len();
            self.next_intercept += 1;
            let id = InterceptId(self.next_intercept);
            self.captures.push(Capture {
                id,
                spec: spec.clone(),
                cursor,
            });
            debug!(id = id.0, cursor, "capture armed");
            Ok(id)
        }

        async fn take_responses(&mut self, id: InterceptId) -> ProbeResult<Vec<InterceptedResponse>> {
            let calls = self.captured().await?;
            let capture = self
                .captures
                .iter_mut()
                .find(|c| c.id == id)
                .ok_or_else(|| ProbeError::driver(format!("unknown intercept {}", id.0)))?;

            let fresh = calls
                .into_iter()
                .skip(capture.cursor)
                .map(|call| InterceptedResponse {
                    method: HttpMethod::parse(&call.method),
                    url: call.url,
                    status: call.status,
                    body: call.body,
                })
                .collect::<Vec<_>>();
            capture.cursor += fresh.len();
            Ok(fresh
                .into_iter()
                .filter(|r| capture.spec.matches(r.method, &r.url))
                .collect())
        }

        async fn close(&mut self) -> ProbeResult<()> {
            let mut browser = self.browser.lock().await;
            let _ = browser
                .close()
                .await
                .map_err(|e| ProbeError::driver(e.to_string()))?;
            self.handle.abort();
            Ok(())
        }
    }

    /// Launches one chromium per scenario
    #[derive(Debug, Clone, Default)]
    pub struct ChromiumSessionFactory {
        options: BrowserOptions,
    }

    impl ChromiumSessionFactory {
        /// Factory launching with `options`
        #[must_use]
        pub const fn new(options: BrowserOptions) -> Self {
            Self { options }
        }
    }

    #[async_trait]
    impl SessionFactory for ChromiumSessionFactory {
        type Driver = ChromiumDriver;

        async fn create(&self) -> ProbeResult<ChromiumDriver> {
            ChromiumDriver::launch(&self.options).await
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::{ChromiumDriver, ChromiumSessionFactory};
