use engine::{VideoId, describe_source};
use iced::widget::{button, column, container, row, text};
use iced::{Alignment, Element, Length};

/// Card shown once a video is ready, with the control to start over.
pub fn ready_card<'a, Message>(
    video_id: &VideoId,
    source_url: &str,
    on_reset: Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let details = column![
        text("Video Ready").size(18),
        text(format!("Video ID: {video_id}")),
        text(describe_source(source_url)),
        text("Now you can ask questions about this video"),
    ]
    .spacing(4)
    .width(Length::Fill);

    container(
        row![
            details,
            button(text("Process New Video"))
                .on_press(on_reset)
                .style(button::secondary),
        ]
        .spacing(12)
        .align_y(Alignment::Center),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::rounded_box)
    .into()
}
