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

use crate::controller::ThumbnailSlot;
use crate::messages::{LOADING, THUMBNAIL_ALT};

#[derive(Properties, PartialEq)]
pub struct ThumbnailProps {
    pub slot: ThumbnailSlot,
    /// Called when the image fails to load
    pub on_error: Callback<()>,
}

#[function_component]
pub fn Thumbnail(props: &ThumbnailProps) -> Html {
    let onerror = use_callback(props.on_error.clone(), |_: Event, on_error| on_error.emit(()));

    html! {
        <div id="thumbnailContainer">
            {match &props.slot {
                ThumbnailSlot::Empty => html! {},
                ThumbnailSlot::Loading => html! {
                    <div class="spinner-border text-light" role="status">
                        <span class="visually-hidden">{LOADING}</span>
                    </div>
                },
                ThumbnailSlot::Image { src, .. } => html! {
                    <img src={src.clone()} alt={THUMBNAIL_ALT} class="img-fluid rounded shadow-sm mb-3" {onerror} />
                },
            }}
        </div>
    }
}
