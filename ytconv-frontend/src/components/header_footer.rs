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

use chrono::Utc;
use yew::prelude::*;

use crate::constants::{BUILD_TIME, COMMIT_TIME, VERSION_STRING};
use crate::messages::{BUILT_LABEL, PAGE_TITLE, UPDATE_BUTTON};
use crate::utils::render_datetime;

#[function_component]
pub fn Header() -> Html {
    html! {
        <div id="header" class="text-center mb-4">
            <h1>{PAGE_TITLE}</h1>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct FooterProps {
    pub on_update: Callback<()>,
}

#[function_component]
pub fn Footer(props: &FooterProps) -> Html {
    let onclick = use_callback(props.on_update.clone(), |_: MouseEvent, on_update| on_update.emit(()));

    let build_time = BUILD_TIME.map(|t| render_datetime(&t.with_timezone(&Utc)));
    let commit_time = COMMIT_TIME.map(|t| render_datetime(&t.with_timezone(&Utc)));

    html! {
        <div id="footer" class="text-center mt-4 small text-muted">
            <span title={commit_time.map(|t| AttrValue::from(format!("commit: {t} UTC")))}>
                {"ytconv "}{*VERSION_STRING}
            </span>
            if let Some(build_time) = build_time {
                {format!(", {BUILT_LABEL} {build_time} UTC")}
            }
            {" · "}
            <button type="button" class="btn btn-link btn-sm p-0 align-baseline" {onclick}>{UPDATE_BUTTON}</button>
        </div>
    }
}
