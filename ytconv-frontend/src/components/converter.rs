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
use ytconv_api::MediaFormat;

use crate::messages::{self, DOWNLOADING, URL_PLACEHOLDER};

#[derive(Properties, PartialEq)]
pub struct UrlInputProps {
    pub node_ref: NodeRef,
    pub on_input: Callback<()>,
    pub on_paste: Callback<()>,
}

#[function_component]
pub fn UrlInput(props: &UrlInputProps) -> Html {
    let oninput = use_callback(props.on_input.clone(), |_: InputEvent, on_input| on_input.emit(()));
    let onpaste = use_callback(props.on_paste.clone(), |_: Event, on_paste| on_paste.emit(()));

    html! {
        <input
            id="url"
            type="text"
            class="form-control form-control-lg mb-3"
            placeholder={URL_PLACEHOLDER}
            ref={props.node_ref.clone()}
            {oninput}
            {onpaste}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct ConvertButtonProps {
    pub format: MediaFormat,
    pub busy: bool,
    pub on_convert: Callback<MediaFormat>,
}

#[function_component]
pub fn ConvertButton(props: &ConvertButtonProps) -> Html {
    let onclick = use_callback((props.format, props.on_convert.clone()), |_: MouseEvent, (format, on_convert)| on_convert.emit(*format));
    let class = match props.format {
        MediaFormat::Mp3 => "btn btn-danger btn-lg",
        MediaFormat::Mp4 => "btn btn-primary btn-lg",
    };

    html! {
        <button type="button" {class} disabled={props.busy} {onclick}>
            if props.busy {
                <span class="spinner-border spinner-border-sm" role="status" aria-hidden="true" />
                {" "}{DOWNLOADING}
            } else {
                {messages::button_label(props.format)}
            }
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct StatusLinesProps {
    pub message: Option<AttrValue>,
    pub error: Option<AttrValue>,
}

/// The `#mensaje` and `#error` lines
#[function_component]
pub fn StatusLines(props: &StatusLinesProps) -> Html {
    html! {
        <>
            <p id="mensaje" class="mt-3 text-success">{props.message.clone().unwrap_or_default()}</p>
            <p id="error" class="text-danger">{props.error.clone().unwrap_or_default()}</p>
        </>
    }
}

