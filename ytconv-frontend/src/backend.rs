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

use std::{error::Error, fmt::Display, rc::Rc};

use cloneable_errors::{ErrorContext, ResContext};
use reqwest::{header::{HeaderName, CONTENT_DISPOSITION, CONTENT_TYPE}, Response, Url};
use ytconv_api::unsync::{ConversionRequest, ErrorResponse, MessageResponse, VideoInfo, VideoInfoRequest};

use crate::constants::{CONVERT_ENDPOINT, REQWEST_CLIENT, UPDATE_ENDPOINT, VIDEO_INFO_ENDPOINT};
use crate::messages::{CONVERSION_FAILED, DOWNLOAD_FAILED};
use crate::utils::ReqwestUrlExt;

/// The backend endpoints used by the page
pub trait Backend {
    /// `POST /get_video_info`
    #[allow(async_fn_in_trait)]  // this is for local use
    async fn get_video_info(&self, url: &str) -> Result<VideoInfo, ErrorContext>;
    /// `POST /convert`
    #[allow(async_fn_in_trait)]
    async fn convert(&self, request: &ConversionRequest) -> Result<ConvertedMedia, ConvertError>;
    /// `POST /update_ytdlp`, returns the server's message
    #[allow(async_fn_in_trait)]
    async fn update_downloader(&self) -> Result<Option<Rc<str>>, ErrorContext>;
}

/// A converted file, as received from the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedMedia {
    pub data: Vec<u8>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
}

#[derive(Debug)]
pub enum ConvertError {
    /// The server answered with a non-2xx status
    Server {
        status: u16,
        message: Option<Rc<str>>,
    },
    /// The request could not be completed or the response could not be read
    Request(ErrorContext),
    /// The browser refused to hand the file to the user
    Download(ErrorContext),
}

impl ConvertError {
    /// Best available explanation for the `#error` slot
    pub fn user_message(&self) -> &str {
        match self {
            Self::Server { message: Some(msg), .. } => msg.as_ref(),
            Self::Server { message: None, .. } => DOWNLOAD_FAILED,
            Self::Request(..) | Self::Download(..) => CONVERSION_FAILED,
        }
    }
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Server { status, message: Some(msg) } => write!(f, "The server returned a '{status}' status code: {msg}"),
            Self::Server { status, message: None } => write!(f, "The server returned a '{status}' status code"),
            Self::Request(..) => write!(f, "The conversion request failed"),
            Self::Download(..) => write!(f, "Failed to start the download"),
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Server { .. } => None,
            Self::Request(err) | Self::Download(err) => Some(err as &(dyn Error + 'static)),
        }
    }
}

pub trait ReqwestResponseExt: Sized {
    #[allow(async_fn_in_trait)]  // this is for local use
    async fn check_status(self) -> Result<Self, ErrorContext>;
}

impl ReqwestResponseExt for Response {
    async fn check_status(self) -> Result<Self, ErrorContext> {
        let status = self.status();
        if status.is_success() {
            return Ok(self);
        }
        let body = self.text().await.with_context(|| format!("The server returned a '{status}' status code"))?;
        let parsed = serde_json::from_str::<ErrorResponse>(&body).ok();
        Err(match parsed.as_ref().and_then(ErrorResponse::message) {
            Some(msg) => ErrorContext::new(format!("The server returned a '{status}' status code: {msg}")),
            None => ErrorContext::new(format!("The server returned a '{status}' status code with the following body:\n{body}")),
        })
    }
}

fn header_string(response: &Response, name: HeaderName) -> Option<String> {
    response.headers().get(name).and_then(|v| v.to_str().ok()).map(str::to_owned)
}

/// [`Backend`] talking to the real server over HTTP
pub struct HttpBackend {
    base: Url,
}

impl HttpBackend {
    pub fn new(base: Url) -> Self {
        Self { base }
    }

    fn endpoint(&self, name: &str) -> Result<Url, ErrorContext> {
        let mut url = self.base.clone();
        url.extend_segments([name]).map_err(|()| ErrorContext::new(format!("API base URL '{}' cannot be a base", self.base)))?;
        Ok(url)
    }
}

impl Backend for HttpBackend {
    async fn get_video_info(&self, url: &str) -> Result<VideoInfo, ErrorContext> {
        REQWEST_CLIENT
            .post(self.endpoint(VIDEO_INFO_ENDPOINT)?)
            .header("Accept", "application/json")
            .json(&VideoInfoRequest { url: url.into() })
            .send().await.context("Failed to send the request")?
            .check_status().await?
            .json().await.context("Failed to deserialize response")
    }

    async fn convert(&self, request: &ConversionRequest) -> Result<ConvertedMedia, ConvertError> {
        let response = REQWEST_CLIENT
            .post(self.endpoint(CONVERT_ENDPOINT).map_err(ConvertError::Request)?)
            .json(request)
            .send().await
            .context("Failed to send the conversion request")
            .map_err(ConvertError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.json::<ErrorResponse>().await
                .ok()
                .and_then(|body| body.message().map(Rc::from));
            return Err(ConvertError::Server { status: status.as_u16(), message });
        }

        let content_type = header_string(&response, CONTENT_TYPE);
        let content_disposition = header_string(&response, CONTENT_DISPOSITION);
        let data = response.bytes().await
            .context("Failed to read the converted file")
            .map_err(ConvertError::Request)?;
        Ok(ConvertedMedia { data: data.to_vec(), content_type, content_disposition })
    }

    async fn update_downloader(&self) -> Result<Option<Rc<str>>, ErrorContext> {
        let response: MessageResponse = REQWEST_CLIENT
            .post(self.endpoint(UPDATE_ENDPOINT)?)
            .header("Accept", "application/json")
            .send().await.context("Failed to send the request")?
            .check_status().await?
            .json().await.context("Failed to deserialize response")?;
        Ok(response.message.filter(|msg| !msg.is_empty()))
    }
}
