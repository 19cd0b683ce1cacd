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
//! The page controller: reacts to user input, talks to the backend and fills the view slots

use std::{cell::{Cell, RefCell}, rc::Rc, time::Duration};

use cloneable_errors::ErrorContext;
use futures::future::{AbortHandle, Abortable, FutureExt, LocalBoxFuture};
use log::{debug, error, info};
use ytconv_api::MediaFormat;
use ytconv_api::unsync::{ConversionRequest, VideoInfo};

use crate::backend::{Backend, ConvertError};
use crate::confetti::ConfettiBurst;
use crate::constants::{THUMBNAIL_HQ, THUMBNAIL_MAXRES};
use crate::messages::{self, DEFAULT_TITLE, INVALID_URL, MISSING_URL, UPDATE_DONE, UPDATE_FAILED, UPDATE_RUNNING};
use crate::settings::Settings;
use crate::utils::{content_disposition_filename, format_duration, render_int, thumbnail_url, video_id_from_url};

/// Runtime services the controller needs from its environment
pub trait Platform {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
    /// A random number in `[0, 1)`
    fn random(&self) -> f64;
    /// Renders a view count with the user's thousands separators
    fn format_number(&self, n: u64) -> String {
        render_int(n, ",")
    }
}

/// Contents of the `#thumbnailContainer` slot
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ThumbnailSlot {
    #[default]
    Empty,
    Loading,
    Image {
        src: Rc<str>,
        /// Used once if `src` fails to load
        fallback: Option<Rc<str>>,
    },
}

impl ThumbnailSlot {
    pub fn for_video(video_id: &str, info: Option<&VideoInfo>) -> Self {
        match info.and_then(|i| i.thumbnail.clone()).filter(|t| !t.is_empty()) {
            Some(src) => Self::Image { src, fallback: None },
            None => Self::Image {
                src: thumbnail_url(video_id, THUMBNAIL_MAXRES).as_str().into(),
                fallback: Some(thumbnail_url(video_id, THUMBNAIL_HQ).as_str().into()),
            },
        }
    }
}

/// Contents of the `#videoInfoContainer` slot, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoInfoCard {
    pub title: Rc<str>,
    pub channel: Option<Rc<str>>,
    pub duration: Option<String>,
    pub views: Option<String>,
}

impl VideoInfoCard {
    pub fn new(info: &VideoInfo, format_number: impl Fn(u64) -> String) -> Self {
        Self {
            title: info.title.clone().filter(|t| !t.is_empty()).unwrap_or_else(|| DEFAULT_TITLE.into()),
            channel: info.channel.clone().filter(|c| !c.is_empty()),
            duration: info.duration.filter(|d| *d >= 1.).map(format_duration),
            views: info.views.filter(|v| *v > 0).map(format_number),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Named slots of the page
pub trait PageView {
    /// Current value of the `#url` input
    fn url(&self) -> String;
    /// `#mensaje`
    fn set_message(&self, message: Option<String>);
    /// `#error`
    fn set_error(&self, error: Option<String>);
    fn set_thumbnail(&self, thumbnail: ThumbnailSlot);
    fn set_video_info(&self, card: Option<VideoInfoCard>);
    /// Switches the button of the given format between its busy and normal state
    fn set_button_busy(&self, format: MediaFormat, busy: bool);
    /// Hands a file to the browser as a download
    fn start_download(&self, file: DownloadFile) -> Result<(), ErrorContext>;
    fn launch_confetti(&self, burst: ConfettiBurst);
}

/// Keeps a conversion button busy until dropped
pub struct BusyButton<'a, V: PageView> {
    view: &'a V,
    format: MediaFormat,
}

impl<'a, V: PageView> BusyButton<'a, V> {
    pub fn acquire(view: &'a V, format: MediaFormat) -> Self {
        view.set_button_busy(format, true);
        Self { view, format }
    }
}

impl<V: PageView> Drop for BusyButton<'_, V> {
    fn drop(&mut self) {
        self.view.set_button_busy(self.format, false);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RefreshTrigger {
    Input,
    Paste,
}

/// An armed preview refresh timer
struct PendingRefresh {
    id: u64,
    trigger: RefreshTrigger,
    handle: AbortHandle,
}

pub struct PageController<V, B, P> {
    view: V,
    backend: B,
    platform: P,
    settings: Settings,
    /// Debounce timer of the next preview refresh
    pending_refresh: RefCell<Option<PendingRefresh>>,
    next_timer_id: Cell<u64>,
    /// Sequence number of the newest preview refresh
    latest_preview: Cell<u64>,
}

impl<V, B, P> PageController<V, B, P>
where
    V: PageView + 'static,
    B: Backend + 'static,
    P: Platform + 'static,
{
    pub fn new(view: V, backend: B, platform: P, settings: Settings) -> Self {
        Self {
            view,
            backend,
            platform,
            settings,
            pending_refresh: RefCell::new(None),
            next_timer_id: Cell::new(0),
            latest_preview: Cell::new(0),
        }
    }

    /// The URL input changed
    pub fn on_input(self: &Rc<Self>) {
        self.schedule_refresh(RefreshTrigger::Input);
    }

    /// Something was pasted into the URL input
    pub fn on_paste(self: &Rc<Self>) {
        self.schedule_refresh(RefreshTrigger::Paste);
    }

    /// Arms the debounce timer, aborting the pending one.
    /// A pending paste timer is never replaced by an input event, since
    /// browsers fire `input` right after the `paste` that caused it.
    fn schedule_refresh(self: &Rc<Self>, trigger: RefreshTrigger) {
        if trigger == RefreshTrigger::Input
            && self.pending_refresh.borrow().as_ref().is_some_and(|p| p.trigger == RefreshTrigger::Paste)
        {
            debug!("Keeping the pending paste refresh");
            return;
        }
        let delay = match trigger {
            RefreshTrigger::Input => self.settings.input_debounce(),
            RefreshTrigger::Paste => self.settings.paste_delay(),
        };

        let id = self.next_timer_id.get();
        self.next_timer_id.set(id + 1);
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.pending_refresh.replace(Some(PendingRefresh { id, trigger, handle })) {
            previous.handle.abort();
        }

        let timer = Abortable::new(self.platform.sleep(delay), registration);
        let controller = Rc::downgrade(self);
        self.platform.spawn(async move {
            if timer.await.is_err() {
                debug!("Preview refresh superseded by a newer input event");
                return;
            }
            if let Some(controller) = controller.upgrade() {
                controller.timer_fired(id);
                controller.refresh_preview().await;
            }
        }.boxed_local());
    }

    fn timer_fired(&self, id: u64) {
        let mut pending = self.pending_refresh.borrow_mut();
        if pending.as_ref().is_some_and(|p| p.id == id) {
            *pending = None;
        }
    }

    /// Re-renders the thumbnail and info card for the current URL
    pub async fn refresh_preview(&self) {
        let seq = self.latest_preview.get() + 1;
        self.latest_preview.set(seq);

        let url = self.view.url();
        self.view.set_error(None);
        self.view.set_thumbnail(ThumbnailSlot::Empty);
        self.view.set_video_info(None);
        if url.is_empty() {
            return;
        }

        let Some(video_id) = video_id_from_url(&url) else {
            self.view.set_error(Some(INVALID_URL.to_owned()));
            return;
        };

        self.view.set_thumbnail(ThumbnailSlot::Loading);
        let info = self.fetch_video_info(&url).await;
        if self.latest_preview.get() != seq {
            debug!("Discarding stale preview #{seq} for video {video_id}");
            return;
        }

        self.view.set_thumbnail(ThumbnailSlot::for_video(video_id, info.as_ref()));
        self.view.set_video_info(info.as_ref().map(|info| VideoInfoCard::new(info, |n| self.platform.format_number(n))));
    }

    /// Fetches metadata for a URL. Failures are logged and reported as `None`.
    pub async fn fetch_video_info(&self, url: &str) -> Option<VideoInfo> {
        if url.is_empty() {
            return None;
        }
        match self.backend.get_video_info(url).await {
            Ok(info) => Some(info),
            Err(err) => {
                error!("Error fetching video info: {err:?}");
                None
            },
        }
    }

    /// Converts the current URL and downloads the result
    pub async fn convert(&self, format: MediaFormat) {
        let url = self.view.url();
        self.view.set_error(None);
        self.view.set_message(None);
        if url.is_empty() {
            self.view.set_error(Some(MISSING_URL.to_owned()));
            return;
        }

        let _busy = BusyButton::acquire(&self.view, format);
        self.view.set_message(Some(messages::processing(format)));

        match self.download(url, format).await {
            Ok(filename) => {
                info!("Downloaded '{filename}'");
                self.view.set_message(Some(messages::downloaded(format)));
                self.launch_confetti();
            },
            Err(err) => {
                error!("Conversion to {format} failed: {err:?}");
                self.view.set_message(None);
                self.view.set_error(Some(messages::error(err.user_message())));
            },
        }
    }

    async fn download(&self, url: String, format: MediaFormat) -> Result<String, ConvertError> {
        let request = ConversionRequest { url: url.into(), format };
        let media = self.backend.convert(&request).await?;

        let filename = media.content_disposition.as_deref()
            .and_then(content_disposition_filename)
            .unwrap_or_else(|| format.default_filename().to_owned());
        let content_type = media.content_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| format.default_content_type().to_owned());

        self.view
            .start_download(DownloadFile { filename: filename.clone(), content_type, data: media.data })
            .map_err(ConvertError::Download)?;
        Ok(filename)
    }

    fn launch_confetti(&self) {
        let burst = ConfettiBurst::generate(
            self.settings.confetti_particles,
            self.settings.confetti_lifetime(),
            || self.platform.random(),
        );
        self.view.launch_confetti(burst);
    }

    /// Asks the backend to update its downloader
    pub async fn update_downloader(&self) {
        self.view.set_error(None);
        self.view.set_message(Some(UPDATE_RUNNING.to_owned()));
        match self.backend.update_downloader().await {
            Ok(message) => {
                info!("Downloader updated: {message:?}");
                self.view.set_message(Some(message.map_or_else(|| UPDATE_DONE.to_owned(), |msg| msg.to_string())));
            },
            Err(err) => {
                error!("Failed to update the downloader: {err:?}");
                self.view.set_message(None);
                self.view.set_error(Some(messages::error(UPDATE_FAILED)));
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::future::Future;

    use futures::channel::oneshot;
    use futures::executor::{LocalPool, LocalSpawner};
    use futures::task::LocalSpawnExt;

    use super::*;
    use crate::backend::ConvertedMedia;

    const WATCH_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
    const SHORT_URL: &str = "https://youtu.be/9bZkp7q19f0";

    #[derive(Debug, Clone, PartialEq)]
    enum ViewEvent {
        Message(Option<String>),
        Error(Option<String>),
        Thumbnail(ThumbnailSlot),
        Info(Option<VideoInfoCard>),
        Busy(MediaFormat, bool),
        Download(DownloadFile),
        Confetti { particles: usize, lifetime: Duration },
    }

    #[derive(Default)]
    struct FakeView {
        url: RefCell<String>,
        events: RefCell<Vec<ViewEvent>>,
        refuse_downloads: Cell<bool>,
    }

    impl FakeView {
        fn set_url(&self, url: &str) {
            *self.url.borrow_mut() = url.to_owned();
        }

        fn take_events(&self) -> Vec<ViewEvent> {
            self.events.take()
        }

        fn push(&self, event: ViewEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    impl PageView for Rc<FakeView> {
        fn url(&self) -> String {
            self.url.borrow().clone()
        }
        fn set_message(&self, message: Option<String>) {
            self.push(ViewEvent::Message(message));
        }
        fn set_error(&self, error: Option<String>) {
            self.push(ViewEvent::Error(error));
        }
        fn set_thumbnail(&self, thumbnail: ThumbnailSlot) {
            self.push(ViewEvent::Thumbnail(thumbnail));
        }
        fn set_video_info(&self, card: Option<VideoInfoCard>) {
            self.push(ViewEvent::Info(card));
        }
        fn set_button_busy(&self, format: MediaFormat, busy: bool) {
            self.push(ViewEvent::Busy(format, busy));
        }
        fn start_download(&self, file: DownloadFile) -> Result<(), ErrorContext> {
            if self.refuse_downloads.get() {
                return Err(ErrorContext::new("Failed to create the download link"));
            }
            self.push(ViewEvent::Download(file));
            Ok(())
        }
        fn launch_confetti(&self, burst: ConfettiBurst) {
            self.push(ViewEvent::Confetti { particles: burst.particles.len(), lifetime: burst.lifetime });
        }
    }

    type InfoResult = Result<VideoInfo, ErrorContext>;

    #[derive(Default)]
    struct FakeBackend {
        info_responses: RefCell<VecDeque<oneshot::Receiver<InfoResult>>>,
        info_requests: RefCell<Vec<String>>,
        conversion: RefCell<Option<Result<ConvertedMedia, ConvertError>>>,
        conversion_requests: RefCell<Vec<ConversionRequest>>,
        update: RefCell<Option<Result<Option<Rc<str>>, ErrorContext>>>,
    }

    impl FakeBackend {
        /// Queues a pending response for the next video info request
        fn expect_info(&self) -> oneshot::Sender<InfoResult> {
            let (sender, receiver) = oneshot::channel();
            self.info_responses.borrow_mut().push_back(receiver);
            sender
        }
    }

    impl Backend for Rc<FakeBackend> {
        async fn get_video_info(&self, url: &str) -> Result<VideoInfo, ErrorContext> {
            self.info_requests.borrow_mut().push(url.to_owned());
            let response = self.info_responses.borrow_mut().pop_front();
            match response {
                Some(receiver) => receiver.await.unwrap_or_else(|_| Err(ErrorContext::new("response dropped"))),
                None => Err(ErrorContext::new("no response queued")),
            }
        }

        async fn convert(&self, request: &ConversionRequest) -> Result<ConvertedMedia, ConvertError> {
            self.conversion_requests.borrow_mut().push(request.clone());
            self.conversion.take().unwrap_or_else(|| Err(ConvertError::Request(ErrorContext::new("no conversion queued"))))
        }

        async fn update_downloader(&self) -> Result<Option<Rc<str>>, ErrorContext> {
            self.update.take().unwrap_or_else(|| Err(ErrorContext::new("no update queued")))
        }
    }

    struct FakePlatform {
        spawner: LocalSpawner,
        timers: RefCell<Vec<(Duration, oneshot::Sender<()>)>>,
    }

    impl FakePlatform {
        /// Fires every armed timer, returning their durations
        fn fire_timers(&self) -> Vec<Duration> {
            self.timers
                .take()
                .into_iter()
                .map(|(duration, sender)| {
                    let _ = sender.send(());
                    duration
                })
                .collect()
        }
    }

    impl Platform for Rc<FakePlatform> {
        fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
            let (sender, receiver) = oneshot::channel();
            self.timers.borrow_mut().push((duration, sender));
            async move {
                let _ = receiver.await;
            }.boxed_local()
        }

        fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
            self.spawner.spawn_local(task).expect("the test pool should be alive");
        }

        fn random(&self) -> f64 {
            0.5
        }
    }

    type TestController = PageController<Rc<FakeView>, Rc<FakeBackend>, Rc<FakePlatform>>;

    struct Harness {
        pool: LocalPool,
        view: Rc<FakeView>,
        backend: Rc<FakeBackend>,
        platform: Rc<FakePlatform>,
        controller: Rc<TestController>,
    }

    impl Harness {
        fn new() -> Self {
            let pool = LocalPool::new();
            let view = Rc::new(FakeView::default());
            let backend = Rc::new(FakeBackend::default());
            let platform = Rc::new(FakePlatform { spawner: pool.spawner(), timers: RefCell::default() });
            let controller = Rc::new(PageController::new(view.clone(), backend.clone(), platform.clone(), Settings::default()));
            Self { pool, view, backend, platform, controller }
        }

        fn spawn<F, Fut>(&self, task: F)
        where
            F: FnOnce(Rc<TestController>) -> Fut,
            Fut: Future<Output = ()> + 'static,
        {
            self.pool.spawner().spawn_local(task(self.controller.clone())).expect("the test pool should be alive");
        }

        fn run(&mut self) {
            self.pool.run_until_stalled();
        }

        fn thumbnails(events: &[ViewEvent]) -> Vec<&ThumbnailSlot> {
            events.iter().filter_map(|e| match e {
                ViewEvent::Thumbnail(slot) => Some(slot),
                _ => None,
            }).collect()
        }
    }

    fn info_with_thumbnail(thumbnail: &str) -> VideoInfo {
        VideoInfo { thumbnail: Some(thumbnail.into()), ..VideoInfo::default() }
    }

    #[test]
    fn invalid_url_shows_error_without_request() {
        let mut h = Harness::new();
        h.view.set_url("https://example.com/not-a-video");
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        assert_eq!(h.view.take_events(), vec![
            ViewEvent::Error(None),
            ViewEvent::Thumbnail(ThumbnailSlot::Empty),
            ViewEvent::Info(None),
            ViewEvent::Error(Some("URL de YouTube inválida".to_owned())),
        ]);
        assert!(h.backend.info_requests.borrow().is_empty());
    }

    #[test]
    fn empty_url_only_clears() {
        let mut h = Harness::new();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        assert_eq!(h.view.take_events(), vec![
            ViewEvent::Error(None),
            ViewEvent::Thumbnail(ThumbnailSlot::Empty),
            ViewEvent::Info(None),
        ]);
        assert!(h.backend.info_requests.borrow().is_empty());
    }

    #[test]
    fn renders_thumbnail_and_info_card() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        let response = h.backend.expect_info();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();
        assert_eq!(h.view.take_events().last(), Some(&ViewEvent::Thumbnail(ThumbnailSlot::Loading)));

        response.send(Ok(VideoInfo {
            title: Some("Never Gonna Give You Up".into()),
            channel: Some("Rick Astley".into()),
            duration: Some(3665.),
            views: Some(1_234_567),
            thumbnail: Some("https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".into()),
        })).unwrap();
        h.run();

        assert_eq!(h.view.take_events(), vec![
            ViewEvent::Thumbnail(ThumbnailSlot::Image {
                src: "https://i.ytimg.com/vi/dQw4w9WgXcQ/maxresdefault.jpg".into(),
                fallback: None,
            }),
            ViewEvent::Info(Some(VideoInfoCard {
                title: "Never Gonna Give You Up".into(),
                channel: Some("Rick Astley".into()),
                duration: Some("1:01:05".to_owned()),
                views: Some("1,234,567".to_owned()),
            })),
        ]);
        assert_eq!(*h.backend.info_requests.borrow(), vec![WATCH_URL.to_owned()]);
    }

    #[test]
    fn missing_fields_are_left_out_of_the_card() {
        let mut h = Harness::new();
        h.view.set_url(SHORT_URL);
        h.backend.expect_info().send(Ok(VideoInfo { duration: Some(0.), views: Some(0), ..VideoInfo::default() })).unwrap();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        assert_eq!(h.view.take_events().last(), Some(&ViewEvent::Info(Some(VideoInfoCard {
            title: "Video de YouTube".into(),
            channel: None,
            duration: None,
            views: None,
        }))));
    }

    #[test]
    fn failed_info_falls_back_to_stock_thumbnail() {
        let mut h = Harness::new();
        h.view.set_url(SHORT_URL);
        h.backend.expect_info().send(Err(ErrorContext::new("The server returned a '503 Service Unavailable' status code"))).unwrap();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        let events = h.view.take_events();
        assert_eq!(&events[events.len() - 2..], &[
            ViewEvent::Thumbnail(ThumbnailSlot::Image {
                src: "https://img.youtube.com/vi/9bZkp7q19f0/maxresdefault.jpg".into(),
                fallback: Some("https://img.youtube.com/vi/9bZkp7q19f0/hqdefault.jpg".into()),
            }),
            ViewEvent::Info(None),
        ]);
        assert!(!events.iter().any(|e| matches!(e, ViewEvent::Error(Some(..)))));
    }

    #[test]
    fn newer_input_supersedes_pending_timer() {
        let mut h = Harness::new();
        h.view.set_url("https://youtu.be/dQw");
        h.controller.on_input();
        h.run();
        h.view.set_url(WATCH_URL);
        h.controller.on_input();
        h.run();
        h.backend.expect_info().send(Ok(VideoInfo::default())).unwrap();

        let fired = h.platform.fire_timers();
        assert_eq!(fired, vec![Duration::from_millis(500), Duration::from_millis(500)]);
        h.run();

        assert_eq!(*h.backend.info_requests.borrow(), vec![WATCH_URL.to_owned()]);
        let events = h.view.take_events();
        assert!(!events.contains(&ViewEvent::Error(Some("URL de YouTube inválida".to_owned()))));
    }

    #[test]
    fn paste_supersedes_pending_typing() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        h.controller.on_input();
        h.controller.on_paste();
        h.backend.expect_info().send(Ok(VideoInfo::default())).unwrap();
        h.run();

        let fired = h.platform.fire_timers();
        assert_eq!(fired, vec![Duration::from_millis(500), Duration::from_millis(100)]);
        h.run();
        assert_eq!(h.backend.info_requests.borrow().len(), 1);
    }

    #[test]
    fn input_after_paste_keeps_the_short_delay() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        // browsers fire `paste`, then the `input` it produced
        h.controller.on_paste();
        h.controller.on_input();
        h.backend.expect_info().send(Ok(VideoInfo::default())).unwrap();
        h.run();

        let fired = h.platform.fire_timers();
        assert_eq!(fired, vec![Duration::from_millis(100)]);
        h.run();
        assert_eq!(*h.backend.info_requests.borrow(), vec![WATCH_URL.to_owned()]);

        // once the paste refresh ran, typing debounces normally again
        h.controller.on_input();
        h.run();
        assert_eq!(h.platform.fire_timers(), vec![Duration::from_millis(500)]);
    }

    #[test]
    fn stale_info_response_is_discarded() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        let first = h.backend.expect_info();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        h.view.set_url(SHORT_URL);
        let second = h.backend.expect_info();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();
        h.view.take_events();

        second.send(Ok(info_with_thumbnail("https://thumbs.example/second.jpg"))).unwrap();
        h.run();
        first.send(Ok(info_with_thumbnail("https://thumbs.example/first.jpg"))).unwrap();
        h.run();

        let events = h.view.take_events();
        assert_eq!(Harness::thumbnails(&events), vec![&ThumbnailSlot::Image {
            src: "https://thumbs.example/second.jpg".into(),
            fallback: None,
        }]);
        assert_eq!(h.backend.info_requests.borrow().len(), 2);
    }

    #[test]
    fn invalid_url_is_not_overwritten_by_an_older_response() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        let pending = h.backend.expect_info();
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();

        h.view.set_url("not a video");
        h.spawn(|c| async move { c.refresh_preview().await });
        h.run();
        h.view.take_events();

        pending.send(Ok(VideoInfo::default())).unwrap();
        h.run();
        assert!(h.view.take_events().is_empty());
    }

    #[test]
    fn convert_without_url_does_nothing_else() {
        let mut h = Harness::new();
        h.spawn(|c| async move { c.convert(MediaFormat::Mp3).await });
        h.run();

        assert_eq!(h.view.take_events(), vec![
            ViewEvent::Error(None),
            ViewEvent::Message(None),
            ViewEvent::Error(Some("Por favor, introduce un enlace de YouTube.".to_owned())),
        ]);
        assert!(h.backend.conversion_requests.borrow().is_empty());
    }

    #[test]
    fn conversion_failure_shows_server_message_and_restores_button() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        *h.backend.conversion.borrow_mut() = Some(Err(ConvertError::Server { status: 400, message: Some("bad url".into()) }));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp3).await });
        h.run();

        let events = h.view.take_events();
        assert_eq!(events, vec![
            ViewEvent::Error(None),
            ViewEvent::Message(None),
            ViewEvent::Busy(MediaFormat::Mp3, true),
            ViewEvent::Message(Some("Procesando MP3...".to_owned())),
            ViewEvent::Message(None),
            ViewEvent::Error(Some("Error: bad url".to_owned())),
            ViewEvent::Busy(MediaFormat::Mp3, false),
        ]);
        assert_eq!(*h.backend.conversion_requests.borrow(), vec![ConversionRequest { url: WATCH_URL.into(), format: MediaFormat::Mp3 }]);
    }

    #[test]
    fn conversion_failure_without_details_uses_fallbacks() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        *h.backend.conversion.borrow_mut() = Some(Err(ConvertError::Server { status: 503, message: None }));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp4).await });
        h.run();
        assert!(h.view.take_events().contains(&ViewEvent::Error(Some("Error: Error en la descarga".to_owned()))));

        *h.backend.conversion.borrow_mut() = Some(Err(ConvertError::Request(ErrorContext::new("Failed to send the conversion request"))));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp4).await });
        h.run();
        let events = h.view.take_events();
        assert!(events.contains(&ViewEvent::Error(Some("Error: Ocurrió un error al convertir o descargar el video.".to_owned()))));
        assert_eq!(events.last(), Some(&ViewEvent::Busy(MediaFormat::Mp4, false)));
    }

    #[test]
    fn successful_conversion_downloads_once_and_throws_confetti() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        *h.backend.conversion.borrow_mut() = Some(Ok(ConvertedMedia {
            data: vec![0xff, 0xfb, 0x90],
            content_type: Some("audio/mpeg".to_owned()),
            content_disposition: Some(r#"attachment; filename="Never Gonna Give You Up.mp3""#.to_owned()),
        }));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp3).await });
        h.run();

        let events = h.view.take_events();
        let downloads: Vec<_> = events.iter().filter(|e| matches!(e, ViewEvent::Download(..))).collect();
        assert_eq!(downloads, vec![&ViewEvent::Download(DownloadFile {
            filename: "Never Gonna Give You Up.mp3".to_owned(),
            content_type: "audio/mpeg".to_owned(),
            data: vec![0xff, 0xfb, 0x90],
        })]);
        assert!(events.contains(&ViewEvent::Message(Some("¡MP3 descargado correctamente!".to_owned()))));
        assert!(events.contains(&ViewEvent::Confetti { particles: 100, lifetime: Duration::from_secs(5) }));
        assert_eq!(events.last(), Some(&ViewEvent::Busy(MediaFormat::Mp3, false)));
    }

    #[test]
    fn missing_headers_fall_back_to_format_defaults() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        *h.backend.conversion.borrow_mut() = Some(Ok(ConvertedMedia {
            data: vec![1, 2, 3],
            content_type: None,
            content_disposition: Some("attachment".to_owned()),
        }));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp4).await });
        h.run();

        assert!(h.view.take_events().contains(&ViewEvent::Download(DownloadFile {
            filename: "video.mp4".to_owned(),
            content_type: "video/mp4".to_owned(),
            data: vec![1, 2, 3],
        })));
    }

    #[test]
    fn refused_download_is_reported() {
        let mut h = Harness::new();
        h.view.set_url(WATCH_URL);
        h.view.refuse_downloads.set(true);
        *h.backend.conversion.borrow_mut() = Some(Ok(ConvertedMedia { data: vec![1], content_type: None, content_disposition: None }));
        h.spawn(|c| async move { c.convert(MediaFormat::Mp3).await });
        h.run();

        let events = h.view.take_events();
        assert!(events.contains(&ViewEvent::Error(Some("Error: Ocurrió un error al convertir o descargar el video.".to_owned()))));
        assert!(!events.iter().any(|e| matches!(e, ViewEvent::Confetti { .. })));
        assert_eq!(events.last(), Some(&ViewEvent::Busy(MediaFormat::Mp3, false)));
    }

    #[test]
    fn downloader_update_reports_outcome() {
        let mut h = Harness::new();
        *h.backend.update.borrow_mut() = Some(Ok(Some("yt-dlp updated successfully".into())));
        h.spawn(|c| async move { c.update_downloader().await });
        h.run();
        assert_eq!(h.view.take_events().last(), Some(&ViewEvent::Message(Some("yt-dlp updated successfully".to_owned()))));

        h.spawn(|c| async move { c.update_downloader().await });
        h.run();
        assert_eq!(h.view.take_events().last(), Some(&ViewEvent::Error(Some("Error: No se pudo actualizar yt-dlp.".to_owned()))));
    }
}
