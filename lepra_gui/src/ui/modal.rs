//! Modal dialog component
//!
//! Blocking notices (incomplete section, failed prediction) are shown as a
//! centered box over a semi-transparent backdrop. Only OK dismisses them.

use iced::widget::{button, column, container, opaque, row, text, Space};
use iced::{Element, Length, Padding, Theme};

use lepra_core::Notice;

use crate::Message;

/// Render a modal backdrop (semi-transparent overlay that swallows input)
///
/// Only the OK button dismisses a notice, so the backdrop has no press
/// handler and `opaque` keeps clicks from reaching the form underneath.
pub fn view_backdrop() -> Element<'static, Message> {
    let shade = container(Space::new())
        .width(Length::Fill)
        .height(Length::Fill)
        .style(|_: &Theme| container::Style::default().background(iced::Color::from_rgba(0.0, 0.0, 0.0, 0.5)));

    opaque(shade)
}

/// Render the notice dialog
pub fn view_notice(notice: Notice) -> Element<'static, Message> {
    let title = match notice {
        Notice::PredictionFailed => "Prediction Failed",
        Notice::IncompleteStep | Notice::IncompleteSubmission => "Missing Information",
    };

    let content = column![
        text(title).size(18),
        Space::new().height(12),
        text(notice.message()).size(12),
        Space::new().height(20),
        row![
            Space::new().width(Length::Fill),
            button(text("OK").size(11))
                .on_press(Message::DismissNotice)
                .padding(Padding::from([6, 16]))
                .style(button::primary),
        ],
    ]
    .width(Length::Fixed(360.0));

    let modal_box = container(content)
        .padding(20)
        .style(container::bordered_box);

    // Center the modal in the screen
    container(modal_box)
        .width(Length::Fill)
        .height(Length::Fill)
        .align_x(iced::alignment::Horizontal::Center)
        .align_y(iced::alignment::Vertical::Center)
        .into()
}
