use engine::{RenderedAnswer, SourceLink};
use iced::widget::{Column, button, column, container, text};
use iced::{Color, Element, Length};

const NOT_FOUND_COLOR: Color = Color::from_rgb(0.55, 0.55, 0.62);
const SECTION_TITLE_SIZE: u16 = 20;

/// Caption of one source button: play marker, time, external-link marker.
///
/// # Example
///
/// ```ignore
/// assert_eq!(source_caption(&link), "\u{25b6} 2:05 \u{2197}");
/// ```
pub fn source_caption(link: &SourceLink) -> String {
    format!("\u{25b6} {} \u{2197}", link.label)
}

/// Renders the answer card and, when there are timestamps, the sources card.
pub fn view<'a, Message>(
    rendered: &'a RenderedAnswer,
    on_open: fn(String) -> Message,
) -> Element<'a, Message>
where
    Message: Clone + 'a,
{
    let body = if rendered.is_not_found() {
        text(rendered.text.as_str()).color(NOT_FOUND_COLOR)
    } else {
        text(rendered.text.as_str())
    };

    let answer_card = container(
        column![text("Answer").size(SECTION_TITLE_SIZE), body].spacing(8),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::rounded_box);

    if rendered.sources.is_empty() {
        return answer_card.into();
    }

    let links = Column::with_children(rendered.sources.iter().map(|link| {
        button(text(source_caption(link)))
            .on_press(on_open(link.url.clone()))
            .style(button::secondary)
            .into()
    }))
    .spacing(6);

    let sources_card = container(
        column![text("Sources").size(SECTION_TITLE_SIZE), links].spacing(8),
    )
    .padding(16)
    .width(Length::Fill)
    .style(container::rounded_box);

    column![answer_card, sources_card].spacing(12).into()
}

#[cfg(test)]
mod tests {
    use engine::{LinkTarget, SourceLink};

    use super::source_caption;

    #[test]
    fn caption_shows_time_between_markers() {
        let link = SourceLink {
            label: "2:05".to_owned(),
            url: "https://youtu.be/abc123?t=125".to_owned(),
            target: LinkTarget::NewContext,
        };

        assert_eq!(source_caption(&link), "\u{25b6} 2:05 \u{2197}");
    }
}
