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

use std::{cell::Cell, rc::Rc};

use cloneable_errors::ErrorContext;
use web_sys::HtmlInputElement;
use yew::prelude::*;
use ytconv_api::MediaFormat;

use crate::confetti::ConfettiBurst;
use crate::controller::{DownloadFile, PageView, ThumbnailSlot, VideoInfoCard};
use crate::web::{sleep, trigger_download};

pub enum PageAction {
    SetMessage(Option<String>),
    SetError(Option<String>),
    SetThumbnail(ThumbnailSlot),
    /// The displayed thumbnail failed to load
    ThumbnailFailed,
    SetVideoInfo(Option<VideoInfoCard>),
    SetBusy(MediaFormat, bool),
    AddConfetti(u64, Rc<ConfettiBurst>),
    RemoveConfetti(u64),
}

/// Everything the page renders besides the URL input
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageState {
    pub message: Option<String>,
    pub error: Option<String>,
    pub thumbnail: ThumbnailSlot,
    pub video_info: Option<VideoInfoCard>,
    busy: Vec<MediaFormat>,
    pub confetti: Vec<(u64, Rc<ConfettiBurst>)>,
}

impl PageState {
    pub fn is_busy(&self, format: MediaFormat) -> bool {
        self.busy.contains(&format)
    }
}

impl Reducible for PageState {
    type Action = PageAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut state = (*self).clone();
        match action {
            PageAction::SetMessage(message) => state.message = message,
            PageAction::SetError(error) => state.error = error,
            PageAction::SetThumbnail(thumbnail) => state.thumbnail = thumbnail,
            PageAction::ThumbnailFailed => match state.thumbnail {
                ThumbnailSlot::Image { fallback: Some(fallback), .. } => {
                    state.thumbnail = ThumbnailSlot::Image { src: fallback, fallback: None };
                },
                _ => return self,
            },
            PageAction::SetVideoInfo(card) => state.video_info = card,
            PageAction::SetBusy(format, true) => {
                if !state.busy.contains(&format) {
                    state.busy.push(format);
                }
            },
            PageAction::SetBusy(format, false) => state.busy.retain(|f| *f != format),
            PageAction::AddConfetti(id, burst) => state.confetti.push((id, burst)),
            PageAction::RemoveConfetti(id) => state.confetti.retain(|(i, _)| *i != id),
        };
        state.into()
    }
}

/// [`PageView`] that dispatches into the page's reducer
#[derive(Clone)]
pub struct YewView {
    url_input: NodeRef,
    dispatcher: UseReducerDispatcher<PageState>,
    next_confetti_id: Rc<Cell<u64>>,
}

impl YewView {
    pub fn new(url_input: NodeRef, dispatcher: UseReducerDispatcher<PageState>) -> Self {
        Self { url_input, dispatcher, next_confetti_id: Rc::default() }
    }
}

impl PageView for YewView {
    fn url(&self) -> String {
        self.url_input.cast::<HtmlInputElement>().map(|input| input.value()).unwrap_or_default()
    }

    fn set_message(&self, message: Option<String>) {
        self.dispatcher.dispatch(PageAction::SetMessage(message));
    }

    fn set_error(&self, error: Option<String>) {
        self.dispatcher.dispatch(PageAction::SetError(error));
    }

    fn set_thumbnail(&self, thumbnail: ThumbnailSlot) {
        self.dispatcher.dispatch(PageAction::SetThumbnail(thumbnail));
    }

    fn set_video_info(&self, card: Option<VideoInfoCard>) {
        self.dispatcher.dispatch(PageAction::SetVideoInfo(card));
    }

    fn set_button_busy(&self, format: MediaFormat, busy: bool) {
        self.dispatcher.dispatch(PageAction::SetBusy(format, busy));
    }

    fn start_download(&self, file: DownloadFile) -> Result<(), ErrorContext> {
        trigger_download(&file)
    }

    fn launch_confetti(&self, burst: ConfettiBurst) {
        let id = self.next_confetti_id.get();
        self.next_confetti_id.set(id + 1);
        let lifetime = u32::try_from(burst.lifetime.as_millis()).unwrap_or(u32::MAX);
        self.dispatcher.dispatch(PageAction::AddConfetti(id, Rc::new(burst)));

        let dispatcher = self.dispatcher.clone();
        wasm_bindgen_futures::spawn_local(async move {
            sleep(lifetime).await;
            dispatcher.dispatch(PageAction::RemoveConfetti(id));
        });
    }
}
