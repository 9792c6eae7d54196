use std::ops::Deref;

use colored::{Color, ColoredString, Styles};

/// Converts terminal styling into inline HTML so coloured output survives in markdown files.
pub trait Markdown {
    fn markdown(&self) -> String;
}

fn css_color(color: Color) -> &'static str {
    match color {
        Color::Black | Color::BrightBlack => "black",
        Color::Red | Color::BrightRed => "red",
        Color::Green | Color::BrightGreen => "green",
        Color::Yellow | Color::BrightYellow => "goldenrod",
        Color::Blue | Color::BrightBlue => "blue",
        Color::Magenta | Color::BrightMagenta => "magenta",
        Color::Cyan | Color::BrightCyan => "darkcyan",
        _ => "inherit",
    }
}

impl Markdown for ColoredString {
    fn markdown(&self) -> String {
        let text = if self.style().contains(Styles::Bold) {
            format!("<b>{}</b>", self.deref())
        } else {
            self.deref().to_owned()
        };

        match self.fgcolor() {
            Some(color) => format!("<span style=\"color: {};\">{text}</span>", css_color(color)),
            None => text,
        }
    }
}
