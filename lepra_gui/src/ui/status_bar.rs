//! Status Bar (Bottom)
//!
//! Displays:
//! - Prediction endpoint in use
//! - Status messages

use iced::widget::{row, text, Space};
use iced::{Element, Length, Padding};

use crate::Message;

/// Render the status bar
pub fn view_status_bar<'a>(endpoint: &'a str, status: &'a str) -> Element<'a, Message> {
    row![
        text(endpoint).size(10).color([0.5, 0.5, 0.5]),
        Space::new().width(Length::Fill),
        text(status).size(10),
    ]
    .padding(Padding::from([4, 0]))
    .into()
}
