//! Canvas documents served by the messenger app.

pub mod types;

pub use types::{Action, Align, ButtonStyle, Canvas, Component, TextStyle};

/// Canvas shown when the app is first inserted into a conversation.
pub fn initial_canvas(sheet_url: &str) -> Canvas {
    Canvas::new(vec![
        Component::text(
            "review-header",
            "AfterShoot Review",
            Align::Center,
            TextStyle::Header,
        ),
        Component::text(
            "review-description",
            "Click below to access your AfterShoot review dashboard",
            Align::Center,
            TextStyle::Paragraph,
        ),
        Component::button(
            "open_review_button",
            "Open Review Dashboard",
            ButtonStyle::Primary,
            Action::Sheet {
                url: sheet_url.to_string(),
            },
        ),
    ])
}

/// Canvas shown after the user closes the sheet.
pub fn final_canvas() -> Canvas {
    Canvas::new(vec![
        Component::text(
            "closing",
            "Thanks for using AfterShoot Review!",
            Align::Center,
            TextStyle::Header,
        ),
        Component::button(
            "reopen_button",
            "Open Again",
            ButtonStyle::Secondary,
            Action::Submit,
        ),
    ])
}
