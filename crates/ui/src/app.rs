use std::sync::mpsc::TrySendError;

use engine::{Applied, Completion, Phase, RenderedAnswer, Request, Session, render};
use iced::widget::{button, column, container, row, scrollable, text, text_input};
use iced::{Color, Element, Length, Subscription, Task};
use tracing::{debug, warn};

use crate::bridge::{BridgeEvent, RequestSender, service_subscription};
use crate::opener::open_in_browser;
use crate::widgets::{answer, status};

const ERROR_COLOR: Color = Color::from_rgb(0.80, 0.22, 0.22);
const NOTICE_COLOR: Color = Color::from_rgb(0.45, 0.45, 0.50);

/// UI messages handled by the iced app update loop.
#[derive(Debug, Clone)]
pub enum Message {
    UrlChanged(String),
    ProcessPressed,
    QuestionChanged(String),
    AskPressed,
    ResetPressed,
    CancelPressed,
    OpenSource(String),
    Bridge(BridgeEvent),
}

/// Root UI state: the session plus the text the user is typing.
pub struct AppState {
    request_tx: Option<RequestSender>,
    session: Session,
    url_input: String,
    question_input: String,
    rendered: Option<RenderedAnswer>,
    notice: Option<String>,
}

impl AppState {
    /// Boots the app; the bridge announces itself through the subscription.
    pub fn boot() -> (Self, Task<Message>) {
        (
            Self {
                request_tx: None,
                session: Session::new(),
                url_input: String::new(),
                question_input: String::new(),
                rendered: None,
                notice: Some(String::from("connecting to service")),
            },
            Task::none(),
        )
    }

    /// Handles one UI message.
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::UrlChanged(url) => {
                self.url_input = url;
            }
            Message::ProcessPressed => {
                self.process_video();
            }
            Message::QuestionChanged(question) => {
                self.question_input = question;
            }
            Message::AskPressed => {
                self.ask_question();
            }
            Message::ResetPressed => {
                if self.session.reset() {
                    self.url_input.clear();
                    self.rendered = None;
                    self.notice = None;
                }
            }
            Message::CancelPressed => {
                self.session.cancel();
            }
            Message::OpenSource(url) => {
                match open_in_browser(&url) {
                    Ok(()) => self.notice = None,
                    Err(error) => {
                        warn!(%error, url, "failed to open source link");
                        self.notice = Some(format!("could not open {url}: {error}"));
                    }
                }
            }
            Message::Bridge(BridgeEvent::Ready(sender)) => {
                self.request_tx = Some(sender);
                self.notice = None;
            }
            Message::Bridge(BridgeEvent::Completed(completion)) => {
                self.apply_completion(completion);
            }
            Message::Bridge(BridgeEvent::Unavailable(reason)) => {
                warn!(reason, "service bridge unavailable");
                self.notice = Some(format!("service unavailable: {reason}"));
            }
            Message::Bridge(BridgeEvent::Disconnected) => {
                self.request_tx = None;
                self.session.cancel();
                self.notice = Some(String::from("service connection closed"));
            }
        }

        Task::none()
    }

    fn process_video(&mut self) {
        if !self.session.can_submit(&self.url_input) {
            return;
        }
        let Some(sender) = self.request_tx.clone() else {
            self.notice = Some(String::from("service is not ready"));
            return;
        };
        if let Some(request) = self.session.submit(&self.url_input) {
            self.dispatch(&sender, request);
        }
    }

    fn ask_question(&mut self) {
        if !self.session.can_ask(&self.question_input) {
            return;
        }
        let Some(sender) = self.request_tx.clone() else {
            self.notice = Some(String::from("service is not ready"));
            return;
        };
        if let Some(request) = self.session.ask(&self.question_input) {
            self.rendered = None;
            self.dispatch(&sender, request);
        }
    }

    fn dispatch(&mut self, sender: &RequestSender, request: Request) {
        match sender.try_send(request) {
            Ok(()) => {
                self.notice = None;
            }
            Err(TrySendError::Full(_)) => {
                self.session.cancel();
                self.notice = Some(String::from("service queue is full"));
            }
            Err(TrySendError::Disconnected(_)) => {
                self.session.cancel();
                self.request_tx = None;
                self.notice = Some(String::from("service connection closed"));
            }
        }
    }

    fn apply_completion(&mut self, completion: Completion) {
        match self.session.apply(completion) {
            Applied::Stale => debug!("ignoring completion for abandoned request"),
            Applied::AnswerReady => {
                self.rendered = self.session.answer().map(render);
            }
            Applied::VideoReady | Applied::Failed(_) => {}
        }
    }

    /// Renders the UI tree.
    pub fn view(&self) -> Element<'_, Message> {
        let header = column![
            text("YouTube Video Knowledge Base").size(28),
            text("Ask questions. Jump to answers. Save hours.").color(NOTICE_COLOR),
        ]
        .spacing(4);

        let mut content = column![header].spacing(16).padding(24).max_width(760);

        match self.session.phase() {
            Phase::Idle | Phase::Submitting => {
                content = content.push(self.url_form());
            }
            Phase::Ready | Phase::Querying => {
                if let Some(video_id) = self.session.video_id() {
                    content = content.push(status::ready_card(
                        video_id,
                        self.session.source_url(),
                        Message::ResetPressed,
                    ));
                }
                content = content.push(self.question_form());
            }
        }

        if let Some(error) = self.session.last_error() {
            content = content.push(
                container(text(error.message.as_str()).color(ERROR_COLOR))
                    .padding(12)
                    .width(Length::Fill)
                    .style(container::rounded_box),
            );
        }

        if let Some(notice) = &self.notice {
            content = content.push(text(notice.as_str()).size(14).color(NOTICE_COLOR));
        }

        if let Some(rendered) = &self.rendered {
            content = content.push(answer::view(rendered, Message::OpenSource));
        }

        scrollable(container(content).center_x(Length::Fill)).into()
    }

    fn url_form(&self) -> Element<'_, Message> {
        let busy = self.session.phase() == Phase::Submitting;

        let mut input = text_input("Paste YouTube URL here…", &self.url_input).padding(10);
        if !busy {
            input = input
                .on_input(Message::UrlChanged)
                .on_submit(Message::ProcessPressed);
        }

        let label = if busy {
            "Processing Video…"
        } else {
            "Process Video"
        };
        let submit = button(text(label)).padding(10).on_press_maybe(
            self.session
                .can_submit(&self.url_input)
                .then_some(Message::ProcessPressed),
        );

        let mut controls = row![input, submit].spacing(12);
        if busy {
            controls = controls.push(cancel_button());
        }
        controls.into()
    }

    fn question_form(&self) -> Element<'_, Message> {
        let busy = self.session.phase() == Phase::Querying;

        let mut input =
            text_input("Ask anything about the video…", &self.question_input).padding(10);
        if !busy {
            input = input
                .on_input(Message::QuestionChanged)
                .on_submit(Message::AskPressed);
        }

        let label = if busy { "Thinking…" } else { "Ask AI" };
        let ask = button(text(label)).padding(10).on_press_maybe(
            self.session
                .can_ask(&self.question_input)
                .then_some(Message::AskPressed),
        );

        let mut controls = row![input, ask].spacing(12);
        if busy {
            controls = controls.push(cancel_button());
        }
        controls.into()
    }

    /// Subscribes to completions from the service worker thread.
    pub fn subscription(&self) -> Subscription<Message> {
        service_subscription().map(Message::Bridge)
    }

    #[cfg(test)]
    fn from_sender_for_test(request_tx: RequestSender) -> Self {
        Self {
            request_tx: Some(request_tx),
            session: Session::new(),
            url_input: String::new(),
            question_input: String::new(),
            rendered: None,
            notice: None,
        }
    }
}

fn cancel_button<'a>() -> Element<'a, Message> {
    button(text("Cancel"))
        .padding(10)
        .on_press(Message::CancelPressed)
        .style(button::secondary)
        .into()
}
