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

use std::rc::Rc;

use cloneable_errors::{ErrorContext, ResContext};
use log::{info, LevelFilter};
use strum::IntoEnumIterator;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use ytconv_api::MediaFormat;

use crate::backend::HttpBackend;
use crate::components::{
    confetti::ConfettiLayer,
    converter::{ConvertButton, StatusLines, UrlInput},
    header_footer::{Footer, Header},
    thumbnail::Thumbnail,
    video_info::VideoInfoPanel,
};
use crate::controller::PageController;
use crate::page_state::{PageAction, PageState, YewView};
use crate::settings::Settings;
use crate::web::{install_logger, page_origin, WebPlatform};

mod backend;
mod components;
mod confetti;
mod constants;
mod controller;
mod messages;
mod page_state;
mod settings;
mod utils;
mod web;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

type AppController = PageController<YewView, HttpBackend, WebPlatform>;

fn build_controller(view: YewView) -> Result<Rc<AppController>, ErrorContext> {
    let settings = Settings::load();
    let origin = page_origin().context("Failed to determine the page origin")?;
    let base = settings.api_base(&origin)?;
    info!("Using API base URL {base}");
    Ok(Rc::new(PageController::new(view, HttpBackend::new(base), WebPlatform, settings)))
}

#[function_component]
fn App() -> Html {
    let state = use_reducer(PageState::default);
    let url_input = use_node_ref();
    let controller = {
        let view = YewView::new(url_input.clone(), state.dispatcher());
        use_memo((), move |()| build_controller(view).inspect_err(|err| log::error!("Failed to set up the page: {err:?}")))
    };

    let on_input = {
        let controller = controller.clone();
        use_callback((), move |(), ()| {
            if let Ok(controller) = &*controller {
                controller.on_input();
            }
        })
    };
    let on_paste = {
        let controller = controller.clone();
        use_callback((), move |(), ()| {
            if let Ok(controller) = &*controller {
                controller.on_paste();
            }
        })
    };
    let on_convert = {
        let controller = controller.clone();
        use_callback((), move |format: MediaFormat, ()| {
            if let Ok(controller) = &*controller {
                let controller = controller.clone();
                spawn_local(async move { controller.convert(format).await });
            }
        })
    };
    let on_update = {
        let controller = controller.clone();
        use_callback((), move |(), ()| {
            if let Ok(controller) = &*controller {
                let controller = controller.clone();
                spawn_local(async move { controller.update_downloader().await });
            }
        })
    };
    let on_thumbnail_error = {
        let dispatcher = state.dispatcher();
        use_callback((), move |(), ()| dispatcher.dispatch(PageAction::ThumbnailFailed))
    };

    let error = match &*controller {
        Err(err) => Some(messages::error(&err.to_string())),
        Ok(_) => state.error.clone(),
    };

    html! {
        <>
            <div class="container py-5">
                <Header />
                <div class="card bg-dark text-white shadow p-4 mx-auto" style="max-width: 720px;">
                    <UrlInput node_ref={url_input} {on_input} {on_paste} />
                    <Thumbnail slot={state.thumbnail.clone()} on_error={on_thumbnail_error} />
                    <VideoInfoPanel card={state.video_info.clone()} />
                    <div class="d-flex gap-3 justify-content-center">
                        {for MediaFormat::iter().map(|format| html! {
                            <ConvertButton key={<&'static str>::from(format)} {format} busy={state.is_busy(format)} on_convert={on_convert.clone()} />
                        })}
                    </div>
                    <StatusLines message={state.message.clone().map(AttrValue::from)} error={error.map(AttrValue::from)} />
                </div>
                <Footer {on_update} />
            </div>
            <ConfettiLayer bursts={state.confetti.clone()} />
        </>
    }
}

fn main() {
    install_logger(if cfg!(debug_assertions) { LevelFilter::Debug } else { LevelFilter::Info });
    yew::Renderer::<App>::new().render();
}
