//! Section Panel (Center)
//!
//! Renders the active section of the form: one labeled control per field,
//! then the navigation buttons. Fields marked invalid by the last
//! validation get a red border.

use iced::widget::{button, column, container, pick_list, row, scrollable, text, text_input, Column, Space};
use iced::{Alignment, Border, Color, Element, Length, Padding, Theme};

use lepra_core::form::{FieldKind, FieldSpec};
use lepra_core::FormController;

use crate::Message;

const INVALID_BORDER: Color = Color::from_rgb(0.86, 0.15, 0.15);
const LABEL_WIDTH: f32 = 320.0;

/// Render the active section and its navigation row
pub fn view_section_panel(controller: &FormController) -> Element<'_, Message> {
    let section = controller.current_section();

    let mut fields: Column<'_, Message> = column![
        text(&section.title).size(18),
        Space::new().height(8),
    ]
    .spacing(6);

    for field in &section.fields {
        let invalid = controller.is_marked(&field.name);
        fields = fields.push(view_field(field, controller.value(&field.name), invalid));
    }

    let content = column![
        scrollable(fields.padding(8)).height(Length::Fill),
        Space::new().height(8),
        view_navigation(controller),
    ];

    container(content)
        .width(Length::Fill)
        .height(Length::FillPortion(3))
        .style(container::bordered_box)
        .padding(5)
        .into()
}

/// Labeled control for one field
fn view_field<'a>(field: &'a FieldSpec, value: &'a str, invalid: bool) -> Element<'a, Message> {
    let name = field.name.clone();

    let control: Element<'a, Message> = match &field.kind {
        FieldKind::Select { options } => {
            // Empty value means nothing chosen yet
            let selected = options.iter().find(|o| o.as_str() == value).cloned();
            pick_list(&options[..], selected, move |choice: String| {
                Message::FieldChanged(name.clone(), choice)
            })
            .placeholder("Select...")
            .width(Length::Fixed(140.0))
            .text_size(11)
            .style(move |theme: &Theme, status| {
                let mut style = pick_list::default(theme, status);
                if invalid {
                    style.border = invalid_border();
                }
                style
            })
            .into()
        }
        kind => {
            let placeholder = match kind {
                FieldKind::Date => "YYYY-MM-DD",
                FieldKind::Number => "0",
                _ => "",
            };
            text_input(placeholder, value)
                .on_input(move |v| Message::FieldChanged(name.clone(), v))
                .width(Length::Fill)
                .padding(4)
                .size(11)
                .style(move |theme: &Theme, status| {
                    let mut style = text_input::default(theme, status);
                    if invalid {
                        style.border = invalid_border();
                    }
                    style
                })
                .into()
        }
    };

    row![
        text(&field.label).size(11).width(Length::Fixed(LABEL_WIDTH)),
        control,
    ]
    .align_y(Alignment::Center)
    .into()
}

fn invalid_border() -> Border {
    Border {
        color: INVALID_BORDER,
        width: 2.0,
        radius: 2.0.into(),
    }
}

/// Previous / Next, or Previous / Submit on the last section
fn view_navigation(controller: &FormController) -> Element<'static, Message> {
    let previous = button(text("Previous").size(12))
        .padding(Padding::from([6, 16]))
        .style(button::secondary)
        .on_press_maybe((!controller.is_first_section()).then_some(Message::PreviousSection));

    let forward = if controller.is_last_section() {
        button(text("Submit").size(12))
            .on_press(Message::Submit)
            .padding(Padding::from([6, 16]))
            .style(button::success)
    } else {
        button(text("Next").size(12))
            .on_press(Message::NextSection)
            .padding(Padding::from([6, 16]))
            .style(button::primary)
    };

    row![previous, Space::new().width(Length::Fill), forward]
        .align_y(Alignment::Center)
        .into()
}
