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

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoStaticStr};

/// Output format requested from `POST /convert`
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug, Display, EnumIter, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MediaFormat {
    Mp3,
    Mp4,
}

impl MediaFormat {
    /// Filename used when the server doesn't suggest one
    pub fn default_filename(self) -> &'static str {
        match self {
            Self::Mp3 => "audio.mp3",
            Self::Mp4 => "video.mp4",
        }
    }

    pub fn default_content_type(self) -> &'static str {
        match self {
            Self::Mp3 => "audio/mpeg",
            Self::Mp4 => "video/mp4",
        }
    }

    /// Uppercase name, as shown to the user
    pub fn label(self) -> &'static str {
        match self {
            Self::Mp3 => "MP3",
            Self::Mp4 => "MP4",
        }
    }
}

#[cfg(feature = "sync")]
pub mod sync {
    type RcStr = std::sync::Arc<str>;
    include!("api.rs");
}

#[cfg(feature = "unsync")]
pub mod unsync {
    type RcStr = std::rc::Rc<str>;
    include!("api.rs");
}

#[cfg(feature = "sync")]
pub use sync::*;

#[cfg(all(feature = "unsync", not(feature = "sync")))]
pub use unsync::*;
