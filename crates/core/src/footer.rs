//! Fixed-geometry footer stamped on every page except the first.
//!
//! The geometry is expressed in top-left page space for an A4 portrait page
//! and does not depend on page content, so every stamped page gets an
//! identical band.

use chrono::Datelike;

use crate::document::{Document, TextStyle};
use crate::geometry::{Color, Point, Rect};

/// Footer band: full page width, the bottom 18 points of the page.
pub const FOOTER_RECT: Rect = Rect::new(0.0, 841.0 - 18.0, 595.0, 841.0);

/// Brand purple, `#6653FF`.
pub const FOOTER_COLOR: Color = Color::rgb(0x66 as f32 / 255.0, 0x53 as f32 / 255.0, 1.0);

pub const PAGE_LABEL_ORIGIN: Point = Point::new(15.0, 835.0);
pub const PAGE_LABEL_STYLE: TextStyle = TextStyle {
    font_size: 8.0,
    color: Color::WHITE,
};

pub const COPYRIGHT_ORIGIN: Point = Point::new(415.0, 835.0);
pub const COPYRIGHT_STYLE: TextStyle = TextStyle {
    font_size: 7.0,
    color: Color::WHITE,
};

pub const DEFAULT_ORGANIZATION: &str = "Vdoo";
pub const DEFAULT_CONTACT: &str = "info@vdoo.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footer {
    pub organization: String,
    pub contact: String,
    pub year: i32,
}

impl Footer {
    /// Footer dated with the current local year.
    pub fn current(organization: impl Into<String>, contact: impl Into<String>) -> Self {
        Footer {
            organization: organization.into(),
            contact: contact.into(),
            year: chrono::Local::now().year(),
        }
    }

    /// `"{page} / {total} Pages"` where `page` is 1-based.
    pub fn page_label(page_number: usize, total: usize) -> String {
        format!("{} / {} Pages", page_number, total)
    }

    pub fn copyright_line(&self) -> String {
        format!(
            "\u{00A9} {} {}. All Rights Reserved  |  {}",
            self.year, self.organization, self.contact
        )
    }

    /// Draw the footer on page `index` of a `total`-page document. The first
    /// page (index 0) is left untouched.
    pub fn stamp<D: Document>(
        &self,
        doc: &mut D,
        index: usize,
        total: usize,
    ) -> Result<(), D::Error> {
        if index == 0 {
            return Ok(());
        }

        doc.draw_rect(index, FOOTER_RECT, FOOTER_COLOR, FOOTER_COLOR)?;
        doc.insert_text(
            index,
            PAGE_LABEL_ORIGIN,
            &Self::page_label(index + 1, total),
            PAGE_LABEL_STYLE,
        )?;
        doc.insert_text(
            index,
            COPYRIGHT_ORIGIN,
            &self.copyright_line(),
            COPYRIGHT_STYLE,
        )?;
        Ok(())
    }
}

impl Default for Footer {
    fn default() -> Self {
        Footer::current(DEFAULT_ORGANIZATION, DEFAULT_CONTACT)
    }
}
