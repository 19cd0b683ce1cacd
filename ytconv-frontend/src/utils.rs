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
use std::{borrow::Cow, str::Utf8Error};

use chrono::{DateTime, TimeZone};
use reqwest::Url;

use crate::constants::{FILENAME_EXT_REGEX, FILENAME_REGEX, THUMBNAIL_URL, VIDEO_ID_REGEX, YOUTUBE_URL_REGEX};
use crate::messages::UNKNOWN_DURATION;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn render_datetime<Tz>(dt: &DateTime<Tz>) -> String
where Tz: TimeZone,
      Tz::Offset: std::fmt::Display,
{
    format!("{}", dt.format(TIME_FORMAT))
}

/// Extracts the 11 character video ID from a youtube URL or a bare ID
pub fn video_id_from_url(url: &str) -> Option<&str> {
    [&*YOUTUBE_URL_REGEX, &*VIDEO_ID_REGEX]
        .into_iter()
        .find_map(|regex| regex.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Renders a duration in seconds as `H:MM:SS` or `M:SS`
///
/// Fractions of a second are dropped. Anything that doesn't amount to a whole second is unknown.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn format_duration(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 1. {
        return UNKNOWN_DURATION.to_owned();
    }
    let total = seconds.trunc() as u64;
    let (hrs, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hrs > 0 {
        format!("{hrs}:{mins:02}:{secs:02}")
    } else {
        format!("{mins}:{secs:02}")
    }
}

/// Render a large integer in a human-readable way:
/// Digits will be arranged in groups of 3, joined with `separator`
pub fn render_int(n: u64, separator: &str) -> String {
    let string_n = n.to_string();
    let chunks = string_n.as_bytes() // digits are ASCII = 1B each
        .rchunks(3)                  // make chunks of 3, starting from end
        .rev()
        .collect::<Vec<_>>();
    String::from_utf8(chunks.join(separator.as_bytes()))
        .expect("ASCII digits joined with a str should always be valid utf8")
}

/// Picks the download filename out of a `Content-Disposition` header
///
/// `filename*=` wins over `filename=`. Path components are stripped.
pub fn content_disposition_filename(header: &str) -> Option<String> {
    let extended = FILENAME_EXT_REGEX
        .captures(header)
        .and_then(|c| c.get(1))
        .and_then(|m| decode_ext_value(m.as_str().trim()));
    if let Some(name) = extended.as_deref().and_then(sanitize_filename) {
        return Some(name);
    }
    let plain = FILENAME_REGEX
        .captures(header)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))?
        .as_str()
        .replace('"', "");
    sanitize_filename(&plain)
}

/// Decodes an RFC 5987 `charset'language'value` string
fn decode_ext_value(value: &str) -> Option<String> {
    let (charset, rest) = value.split_once('\'')?;
    let (_language, encoded) = rest.split_once('\'')?;
    if !charset.eq_ignore_ascii_case("utf-8") {
        return None;
    }
    url_decode(encoded.trim_matches('"')).ok().map(Cow::into_owned)
}

fn sanitize_filename(name: &str) -> Option<String> {
    let name = name.rsplit(|c: char| c == '/' || c == '\\').next()?.trim();
    if name.is_empty() || name == "." || name == ".." {
        None
    } else {
        Some(name.to_owned())
    }
}

pub fn url_decode(input: &str) -> Result<Cow<'_, str>, Utf8Error> {
    percent_encoding::percent_decode_str(input).decode_utf8()
}

pub trait ReqwestUrlExt {
    #[allow(clippy::result_unit_err)]
    fn extend_segments<I>(&mut self, segments: I) -> Result<&mut Self, ()>
    where I: IntoIterator,
    I::Item: AsRef<str>;
}

impl ReqwestUrlExt for Url {
    fn extend_segments<I>(&mut self, segments: I) -> Result<&mut Self, ()>
        where I: IntoIterator,
        I::Item: AsRef<str>,
    {
        {
            let mut path = self.path_segments_mut()?;
            path.pop_if_empty().extend(segments);
        }
        Ok(self)
    }
}

/// Direct link to one of youtube's stock thumbnails for a video
pub fn thumbnail_url(video_id: &str, file: &str) -> Url {
    let mut url = THUMBNAIL_URL.clone();
    url.extend_segments([video_id, file]).expect("youtube thumbnail url should be a valid base");
    url
}
