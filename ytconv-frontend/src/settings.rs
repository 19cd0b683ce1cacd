/* This file is part of the ytconv project
*
*  Copyright (C) 2023-2025 mini_bomba
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

use std::{rc::Rc, time::Duration};

use cloneable_errors::{ErrorContext, ResContext};
use gloo_console::warn;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use web_sys::window;

use crate::constants::SETTINGS_STORAGE_KEY;

/// Upper bound for `confetti_particles`, the value comes from user-editable storage
pub const MAX_CONFETTI_PARTICLES: usize = 500;

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the backend lives. `None` means the origin the page was served from.
    pub api_base_url: Option<Rc<str>>,
    pub input_debounce_ms: u32,
    pub paste_delay_ms: u32,
    pub confetti_particles: usize,
    pub confetti_lifetime_ms: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: None,
            input_debounce_ms: 500,
            paste_delay_ms: 100,
            confetti_particles: 100,
            confetti_lifetime_ms: 5_000,
        }
    }
}

impl Settings {
    pub fn input_debounce(&self) -> Duration {
        Duration::from_millis(self.input_debounce_ms.into())
    }

    pub fn paste_delay(&self) -> Duration {
        Duration::from_millis(self.paste_delay_ms.into())
    }

    pub fn confetti_lifetime(&self) -> Duration {
        Duration::from_millis(self.confetti_lifetime_ms.into())
    }

    pub fn from_json(json: &str) -> Result<Self, ErrorContext> {
        let settings: Self = serde_json::from_str(json).context("Failed to deserialize settings")?;
        Ok(settings.clamped())
    }

    fn clamped(mut self) -> Self {
        self.confetti_particles = self.confetti_particles.min(MAX_CONFETTI_PARTICLES);
        self
    }

    /// Loads settings from local storage, falling back to defaults
    pub fn load() -> Self {
        let stored = window()
            .and_then(|w| w.local_storage().ok().flatten())
            .and_then(|storage| storage.get_item(SETTINGS_STORAGE_KEY).ok().flatten());
        match stored.as_deref().map(Self::from_json) {
            None => Self::default(),
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                warn!(format!("Ignoring stored settings: {err:?}"));
                Self::default()
            },
        }
    }

    /// Resolves the backend base URL
    pub fn api_base(&self, origin: &Url) -> Result<Url, ErrorContext> {
        let Some(ref base) = self.api_base_url else {
            return Ok(origin.clone());
        };
        let url = Url::parse(base).with_context(|| format!("Invalid API base URL '{base}'"))?;
        if url.cannot_be_a_base() {
            return Err(ErrorContext::new(format!("API base URL '{base}' cannot be a base")));
        }
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ErrorContext::new(format!("API base URL '{base}' must use http or https")));
        }
        Ok(url)
    }
}
