//! Results Panel (Bottom)
//!
//! Shows the latest rendered prediction. The whole panel is rebuilt from the
//! current [`RenderedResult`], so nothing from an older result lingers.
//! The Download Report button appears only once a result exists.

use iced::widget::{button, column, container, row, text, Column, Space};
use iced::{Alignment, Element, Length, Padding, Theme};

use lepra_core::RenderedResult;

use crate::Message;

/// Render the results panel
///
/// `opacity` is the current fade-in of the result text.
pub fn view_results_panel(
    rendered: Option<&RenderedResult>,
    export_available: bool,
    request_in_flight: bool,
    opacity: f32,
) -> Element<'_, Message> {
    let mut content: Column<'_, Message> = match rendered {
        Some(result) => {
            let mut lines = column![text(result.heading).size(16), Space::new().height(6)].spacing(4);
            for line in &result.lines {
                lines = lines.push(
                    row![
                        text(format!("{}:", line.label)).size(12).width(Length::Fixed(230.0)),
                        text(&line.value).size(12),
                    ]
                    .align_y(Alignment::Center),
                );
            }
            lines
        }
        None => column![
            text("No prediction yet").size(12).color([0.5, 0.5, 0.5]),
            text("Complete every section and press Submit.").size(11).color([0.5, 0.5, 0.5]),
        ]
        .spacing(4),
    };

    if request_in_flight {
        content = content.push(Space::new().height(6));
        content = content.push(text("Waiting for prediction...").size(11).color([0.3, 0.4, 0.7]));
    }

    if export_available {
        content = content.push(Space::new().height(10));
        content = content.push(
            button(text("Download Report").size(12))
                .on_press(Message::DownloadReport)
                .padding(Padding::from([6, 16]))
                .style(button::primary),
        );
    }

    let faded = container(content.padding(8)).style(move |theme: &Theme| {
        let text = theme.extended_palette().background.base.text;
        container::Style {
            text_color: Some(text.scale_alpha(opacity)),
            ..container::Style::default()
        }
    });

    container(faded)
        .width(Length::Fill)
        .height(Length::FillPortion(2))
        .style(container::bordered_box)
        .padding(5)
        .into()
}
