/* This file is part of the ytconv project
*
*  Copyright (C) 2025 mini_bomba
*  
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
//! Browser-only glue: timers, downloads, number formatting and console logging

use std::time::Duration;

use cloneable_errors::{ErrContext, ErrorContext, ResContext};
use futures::future::{FutureExt, LocalBoxFuture};
use gloo_console::{debug, error, info, warn};
use log::{LevelFilter, Log, Metadata, Record};
use reqwest::Url;
use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::js_sys::{Array, Intl, JsString, Math, Object, Promise, Uint8Array};
use web_sys::{window, Blob, BlobPropertyBag, HtmlAnchorElement};

use crate::constants::DOWNLOAD_URL_LIFETIME;
use crate::controller::{DownloadFile, Platform};
use crate::utils::render_int;

// stringifying js values
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = String)]
    pub fn make_jsstring(value: &JsValue) -> JsString;
}

/// Wraps a thrown JS value into an [`ErrorContext`]
pub fn js_error(value: &JsValue) -> ErrorContext {
    ErrorContext::new(String::from(make_jsstring(value)))
}


// sleep future
#[wasm_bindgen(inline_js = "export function js_sleep(ms) { return new Promise((res, _) => setTimeout(() => res(), ms)) }")]
extern "C" {
    fn js_sleep(ms: u32) -> Promise;
}

pub async fn sleep(ms: u32) {
    if let Err(err) = JsFuture::from(js_sleep(ms)).await {
        error!("Got a JS error while attempting to sleep", err);
    }
}

fn duration_ms(duration: Duration) -> u32 {
    u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
}

/// [`Platform`] backed by the browser's event loop
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WebPlatform;

impl Platform for WebPlatform {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        sleep(duration_ms(duration)).boxed_local()
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        spawn_local(task);
    }

    fn random(&self) -> f64 {
        Math::random()
    }

    #[allow(clippy::cast_precision_loss)]
    fn format_number(&self, n: u64) -> String {
        let format = Intl::NumberFormat::new(&Array::new(), &Object::new()).format();
        match format.call1(&JsValue::UNDEFINED, &JsValue::from_f64(n as f64)).map(|s| s.as_string()) {
            Ok(Some(formatted)) => formatted,
            Ok(None) => render_int(n, ","),
            Err(err) => {
                warn!("Intl.NumberFormat failed, falling back to plain grouping", err);
                render_int(n, ",")
            },
        }
    }
}

/// Root URL of the current page's origin
pub fn page_origin() -> Result<Url, ErrorContext> {
    let href = window()
        .ok_or_else(|| ErrorContext::new("Failed to get the window object"))?
        .location()
        .href()
        .map_err(|err| js_error(&err).context("Failed to read the page location"))?;
    let url = Url::parse(&href).with_context(|| format!("Failed to parse the page location '{href}'"))?;
    url.join("/").with_context(|| format!("Failed to get the origin of '{href}'"))
}


/// Represents ownership of an object URL
///
/// Dropping will cause the underlying URL to be revoked
#[derive(Debug, PartialEq, Eq)]
struct BlobLink {
    url: Box<str>,
}

impl Drop for BlobLink {
    fn drop(&mut self) {
        if let Err(error) = web_sys::Url::revoke_object_url(&self.url) {
            error!(format!("Failed to revoke object URL '{}'", &self.url), error);
        }
    }
}

impl BlobLink {
    fn new(file: &DownloadFile) -> Result<Self, JsValue> {
        let parts = Array::of1(&Uint8Array::from(file.data.as_slice()));
        let options = BlobPropertyBag::new();
        options.set_type(&file.content_type);
        let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        Ok(Self { url: url.into() })
    }
}

/// Saves a file through a temporary `<a download>` link
pub fn trigger_download(file: &DownloadFile) -> Result<(), ErrorContext> {
    let link = BlobLink::new(file).map_err(|err| js_error(&err).context("Failed to create a blob for the download"))?;
    let document = window()
        .and_then(|w| w.document())
        .ok_or_else(|| ErrorContext::new("Failed to get the document object"))?;
    let body = document.body().ok_or_else(|| ErrorContext::new("The document has no body"))?;

    let anchor: HtmlAnchorElement = document.create_element("a")
        .and_then(|el| el.dyn_into().map_err(JsValue::from))
        .map_err(|err| js_error(&err).context("Failed to create the download link"))?;
    anchor.set_href(&link.url);
    anchor.set_download(&file.filename);
    body.append_child(&anchor).map_err(|err| js_error(&err).context("Failed to attach the download link"))?;
    anchor.click();
    anchor.remove();
    debug!(format!("Started download of '{}' ({} bytes)", file.filename, file.data.len()));

    spawn_local(async move {
        sleep(duration_ms(DOWNLOAD_URL_LIFETIME)).await;
        drop(link);
    });
    Ok(())
}


/// Forwards `log` records to the browser console
pub struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = format!("[{}] {}", record.target(), record.args());
        match record.level() {
            log::Level::Error => error!(message),
            log::Level::Warn => warn!(message),
            log::Level::Info => info!(message),
            log::Level::Debug | log::Level::Trace => debug!(message),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn install_logger(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
