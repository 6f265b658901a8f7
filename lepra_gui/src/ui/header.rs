//! Header and progress bar
//!
//! Title on the left, dark-mode toggle (sun / moon) on the right, and the
//! form progress underneath.

use iced::widget::{button, column, progress_bar, row, text, Space};
use iced::{Alignment, Element, Length, Padding};

use crate::Message;

/// Render the application header
pub fn view_header(dark_mode: bool) -> Element<'static, Message> {
    // Icon shows the mode the toggle switches to
    let icon = if dark_mode { "☀" } else { "☾" };

    row![
        text("Leprosy Screening").size(28),
        Space::new().width(Length::Fill),
        button(text(icon).size(16))
            .on_press(Message::ToggleDarkMode)
            .padding(Padding::from([4, 10]))
            .style(button::secondary),
    ]
    .align_y(Alignment::Center)
    .into()
}

/// Render the progress bar with a "Step x of n" caption
pub fn view_progress(percent: f32, current: usize, total: usize) -> Element<'static, Message> {
    column![
        progress_bar(0.0..=100.0, percent).girth(8),
        text(format!("Step {} of {}", current + 1, total)).size(11),
    ]
    .spacing(4)
    .into()
}
