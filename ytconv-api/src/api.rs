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
// NOTE: This file is used as a template for the ytconv-api::sync and ::unsync modules.
//       The RcStr type will be defined externally with the correct smart pointer variant for the
//       module.

use serde::{Deserialize, Serialize};

use crate::MediaFormat;

/// Body of `POST /get_video_info`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct VideoInfoRequest {
    pub url: RcStr,
}

/// Metadata returned by `POST /get_video_info`
///
/// Every field is optional - the backend sends `null` for anything the extractor didn't find.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug, Default)]
#[serde(default)]
pub struct VideoInfo {
    pub title: Option<RcStr>,
    pub channel: Option<RcStr>,
    /// Length of the video in seconds
    pub duration: Option<f64>,
    pub views: Option<u64>,
    pub thumbnail: Option<RcStr>,
}

/// Body of `POST /convert`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct ConversionRequest {
    pub url: RcStr,
    pub format: MediaFormat,
}

/// Body sent alongside any non-2xx status
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(default)]
pub struct ErrorResponse {
    pub error: Option<RcStr>,
}

impl ErrorResponse {
    /// The error message, if the server sent a non-empty one
    pub fn message(&self) -> Option<&str> {
        self.error.as_deref().filter(|msg| !msg.is_empty())
    }
}

/// Body of a successful `POST /update_ytdlp`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug, Default)]
#[serde(default)]
pub struct MessageResponse {
    pub message: Option<RcStr>,
}
