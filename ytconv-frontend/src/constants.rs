/* This file is part of the ytconv project
*
*  Copyright (C) 2024-2025 mini_bomba
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
use std::{sync::LazyLock, time::Duration};

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use reqwest::{Client, Url};

use crate::built_info;

pub static REQWEST_CLIENT: LazyLock<Client> = LazyLock::new(Client::new);
pub const SETTINGS_STORAGE_KEY: &str = "ytconv-settings";
/// How long a download's object URL stays alive after the click
pub const DOWNLOAD_URL_LIFETIME: Duration = Duration::from_secs(60);

// Data based on build-time constants

pub static VERSION_STRING: LazyLock<&'static str>                  = LazyLock::new(create_version_string);
pub static BUILD_TIME:     LazyLock<Option<DateTime<FixedOffset>>> = LazyLock::new(|| DateTime::parse_from_rfc2822(built_info::BUILT_TIME_UTC).ok());
pub static COMMIT_TIME:    LazyLock<Option<DateTime<FixedOffset>>> = LazyLock::new(|| built_info::GIT_COMMIT_TIMESTAMP.and_then(|t| DateTime::parse_from_rfc3339(t).ok()));

// Backend endpoints, relative to the API base

pub const VIDEO_INFO_ENDPOINT: &str = "get_video_info";
pub const CONVERT_ENDPOINT:    &str = "convert";
pub const UPDATE_ENDPOINT:     &str = "update_ytdlp";

// URLs

pub static THUMBNAIL_URL: LazyLock<Url> = LazyLock::new(|| Url::parse("https://img.youtube.com/vi").expect("should be able to parse the youtube thumbnail URL"));
pub const THUMBNAIL_MAXRES: &str = "maxresdefault.jpg";
pub const THUMBNAIL_HQ:     &str = "hqdefault.jpg";

// Regexes

/// Video ID embedded in a full youtube.com or youtu.be URL
pub static YOUTUBE_URL_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?:youtube\.com/(?:[^/]+/.*/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#).expect("YOUTUBE_URL_REGEX should be valid"));
/// A bare video ID
pub static VIDEO_ID_REGEX:    LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"^([^"&?/\s]{11})$"#).expect("VIDEO_ID_REGEX should be valid"));
/// RFC 5987 extended filename parameter: `filename*=UTF-8''name.mp3`
pub static FILENAME_EXT_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(?:^|;)\s*filename\*\s*=\s*([^;]+)").expect("FILENAME_EXT_REGEX should be valid"));
/// Plain filename parameter, quoted or bare
pub static FILENAME_REGEX:     LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"(?i)(?:^|;)\s*filename\s*=\s*(?:"([^"]*)"|([^;]*))"#).expect("FILENAME_REGEX should be valid"));

fn create_version_string() -> &'static str {
    match (built_info::GIT_COMMIT_HASH_SHORT, built_info::GIT_DIRTY) {
        (Some(hash), Some(true)) => format!("{}+g{hash}-dirty", built_info::PKG_VERSION).leak(),
        (Some(hash), _) => format!("{}+g{hash}", built_info::PKG_VERSION).leak(),
        _ => built_info::PKG_VERSION,
    }
}
