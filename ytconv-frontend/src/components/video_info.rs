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

use yew::prelude::*;

use crate::controller::VideoInfoCard;
use crate::messages::{CHANNEL_LABEL, DURATION_LABEL, VIEWS_LABEL};

#[derive(Properties, PartialEq)]
pub struct VideoInfoPanelProps {
    pub card: Option<VideoInfoCard>,
}

#[function_component]
pub fn VideoInfoPanel(props: &VideoInfoPanelProps) -> Html {
    html! {
        <div id="videoInfoContainer">
            if let Some(card) = &props.card {
                <div class="card bg-dark text-white p-3 mb-3">
                    <h5>{&*card.title}</h5>
                    if let Some(channel) = &card.channel {
                        <p class="mb-1"><small>{CHANNEL_LABEL}{" "}{&**channel}</small></p>
                    }
                    if let Some(duration) = &card.duration {
                        <p class="mb-1"><small>{DURATION_LABEL}{" "}{duration.clone()}</small></p>
                    }
                    if let Some(views) = &card.views {
                        <p class="mb-0"><small>{VIEWS_LABEL}{" "}{views.clone()}</small></p>
                    }
                </div>
            }
        </div>
    }
}
