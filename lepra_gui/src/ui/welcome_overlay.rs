//! Welcome overlay shown at startup, drawn at the current fade opacity.

use iced::widget::{column, container, opaque, text, Space};
use iced::{Background, Element, Length, Theme};

use crate::Message;

pub fn view_welcome(opacity: f32) -> Element<'static, Message> {
    let content = column![
        text("Welcome").size(36),
        Space::new().height(8),
        text("Leprosy screening and disability grading").size(14),
    ]
    .align_x(iced::alignment::Horizontal::Center);

    let overlay = container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .style(move |theme: &Theme| {
            let palette = theme.extended_palette();
            container::Style {
                background: Some(Background::Color(palette.background.base.color.scale_alpha(opacity))),
                text_color: Some(palette.background.base.text.scale_alpha(opacity)),
                ..container::Style::default()
            }
        });

    // Swallow input while visible
    opaque(overlay)
}
