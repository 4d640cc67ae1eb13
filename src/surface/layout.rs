//! Fixed task-detail layout on the 8x8 glyph grid
//!
//! Two columns under a full-width header: account and job details on the
//! left (1.15fr), terms and attention on the right (0.85fr), footer pinned to
//! the bottom of the viewport. Content that overflows the viewport is
//! clipped by the rasterizer.

use super::paint::{palette, PaintCommand, Rgba};
use super::Viewport;
use crate::document::view::{
    AccountBlock, AttentionBlock, DocumentView, FooterBlock, HeaderBlock, JobDetailsBlock,
    TermsBlock,
};

pub const GLYPH: u32 = 8;

const PAGE_PADDING: u32 = 40;
const HEADER_GAP: u32 = 40;
const COLUMN_GAP: u32 = 32;
const CARD_GAP: u32 = 32;
const CARD_PADDING: u32 = 24;
const PANEL_GAP: u32 = 16;
const SUMMARY_LABEL_WIDTH: u32 = 140;
const JOB_LABEL_WIDTH: u32 = 144;

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH * scale
}

pub fn line_height(scale: u32) -> u32 {
    (GLYPH + 4) * scale
}

/// Greedy word wrap; words longer than a line are split.
pub fn wrap_text(text: &str, max_width: u32, scale: u32) -> Vec<String> {
    let per_line = (max_width / (GLYPH * scale.max(1))).max(1) as usize;
    let mut lines = Vec::new();
    let mut cur = String::new();

    for word in text.split_whitespace() {
        if !cur.is_empty() && cur.chars().count() + 1 + word.chars().count() > per_line {
            lines.push(std::mem::take(&mut cur));
        }
        if !cur.is_empty() {
            cur.push(' ');
        }
        cur.push_str(word);

        while cur.chars().count() > per_line {
            let head: String = cur.chars().take(per_line).collect();
            let tail: String = cur.chars().skip(per_line).collect();
            lines.push(head);
            cur = tail;
        }
    }
    if !cur.is_empty() {
        lines.push(cur);
    }
    lines
}

/// Handle to a bordered box whose height is patched after its content.
#[derive(Debug, Clone, Copy)]
struct BoxSlot {
    index: usize,
    height: u32,
}

#[derive(Default)]
struct Canvas {
    commands: Vec<PaintCommand>,
}

impl Canvas {
    fn rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgba) {
        self.commands
            .push(PaintCommand::rect(x as i32, y as i32, width, height, color));
    }

    fn text(&mut self, x: u32, y: u32, text: &str, scale: u32, color: Rgba) {
        if text.is_empty() {
            return;
        }
        self.commands
            .push(PaintCommand::text(x as i32, y as i32, text, scale, color));
    }

    /// Wrapped text block; returns its height.
    fn paragraph(&mut self, x: u32, y: u32, max_width: u32, text: &str, scale: u32, color: Rgba) -> u32 {
        let lh = line_height(scale);
        let lines = wrap_text(text, max_width, scale);
        for (i, line) in lines.iter().enumerate() {
            self.text(x, y + i as u32 * lh, line, scale, color);
        }
        lines.len() as u32 * lh
    }

    fn centered(&mut self, x: u32, y: u32, width: u32, text: &str, scale: u32, color: Rgba) -> u32 {
        let lh = line_height(scale);
        let lines = wrap_text(text, width, scale);
        for (i, line) in lines.iter().enumerate() {
            let offset = width.saturating_sub(text_width(line, scale)) / 2;
            self.text(x + offset, y + i as u32 * lh, line, scale, color);
        }
        lines.len() as u32 * lh
    }

    /// Bordered box: `body` receives the inner origin and width and returns
    /// the content height.
    fn boxed<F>(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        padding: u32,
        fill: Rgba,
        border: Rgba,
        body: F,
    ) -> BoxSlot
    where
        F: FnOnce(&mut Canvas, u32, u32, u32) -> u32,
    {
        let index = self.commands.len();
        self.rect(x, y, width, 0, border);
        self.rect(x + 1, y + 1, width.saturating_sub(2), 0, fill);

        let content = body(self, x + padding, y + padding, width.saturating_sub(2 * padding));
        let slot = BoxSlot {
            index,
            height: content + 2 * padding,
        };
        self.resize(slot, slot.height);
        slot
    }

    fn resize(&mut self, slot: BoxSlot, height: u32) {
        if let Some(PaintCommand::SolidRect { height: h, .. }) = self.commands.get_mut(slot.index) {
            *h = height;
        }
        if let Some(PaintCommand::SolidRect { height: h, .. }) = self.commands.get_mut(slot.index + 1) {
            *h = height.saturating_sub(2);
        }
    }

    /// Card heading with the "more" dots on the right; returns the height
    /// consumed including the gap below.
    fn card_title(&mut self, x: u32, y: u32, width: u32, title: &str, scale: u32) -> u32 {
        self.text(x, y, title, scale, palette::TEXT);
        let dots = "...";
        let dots_x = x + width.saturating_sub(text_width(dots, 2));
        self.text(dots_x, y + (scale.saturating_sub(2) * GLYPH) / 2, dots, 2, palette::WHITE);
        line_height(scale) + 12
    }

    fn card<F>(&mut self, x: u32, y: u32, width: u32, fill: Rgba, body: F) -> u32
    where
        F: FnOnce(&mut Canvas, u32, u32, u32) -> u32,
    {
        self.boxed(x, y, width, CARD_PADDING, fill, palette::BORDER, body)
            .height
    }
}

/// Lay out `view` for the given viewport.
pub fn layout_document(view: &DocumentView, viewport: Viewport) -> Vec<PaintCommand> {
    let mut canvas = Canvas::default();
    let inner_width = viewport.width.saturating_sub(2 * PAGE_PADDING);
    let x = PAGE_PADDING;
    let mut y = PAGE_PADDING;

    y += header(&mut canvas, &view.header, x, y, inner_width) + HEADER_GAP;

    let (left_width, right_width) = split_columns(inner_width);
    let right_x = x + left_width + COLUMN_GAP;

    let mut left_y = y;
    left_y += account_card(&mut canvas, &view.account, x, left_y, left_width) + CARD_GAP;
    job_details_card(&mut canvas, &view.job_details, x, left_y, left_width);

    let mut right_y = y;
    right_y += terms_card(&mut canvas, &view.terms, right_x, right_y, right_width) + CARD_GAP;
    attention_card(&mut canvas, &view.attention, right_x, right_y, right_width);

    footer(&mut canvas, &view.footer, x, viewport.height, inner_width);

    canvas.commands
}

/// 1.15fr / 0.85fr split of the space left after the column gap.
pub fn split_columns(inner_width: u32) -> (u32, u32) {
    let available = inner_width.saturating_sub(COLUMN_GAP);
    let left = available * 115 / 200;
    (left, available - left)
}

fn header(canvas: &mut Canvas, header: &HeaderBlock, x: u32, y: u32, width: u32) -> u32 {
    canvas.text(x, y, &header.title, 4, palette::TEXT);
    canvas.text(x, y + 40, &header.program, 2, palette::TEXT_SOFT);

    // Right cluster: search field, user badge, menu button.
    let button = 48;
    let search_width = 400;
    let menu_x = (x + width).saturating_sub(button);
    let user_x = menu_x.saturating_sub(32 + button);
    let search_x = user_x.saturating_sub(32 + search_width);

    canvas.rect(search_x, y + 4, search_width, button, palette::BORDER);
    canvas.rect(search_x + 1, y + 5, search_width - 2, button - 2, palette::INPUT);
    canvas.text(search_x + 24, y + 20, "Detail tugas...", 2, palette::TEXT_DIM);

    canvas.rect(user_x, y + 4, button, button, palette::BORDER);
    canvas.rect(user_x + 1, y + 5, button - 2, button - 2, palette::INPUT);
    canvas.rect(user_x + 18, y + 14, 12, 12, palette::WHITE);
    canvas.rect(user_x + 12, y + 30, 24, 10, palette::WHITE);

    canvas.rect(menu_x, y + 4, button, button, palette::BORDER_STRONG);
    for bar in 0..3 {
        canvas.rect(menu_x + 12, y + 18 + bar * 9, 24, 3, palette::WHITE);
    }

    56
}

fn account_card(canvas: &mut Canvas, account: &AccountBlock, x: u32, y: u32, width: u32) -> u32 {
    canvas.card(x, y, width, palette::CARD, |c, ix, iy, iw| {
        let mut cy = iy + c.card_title(ix, iy, iw, &account.title, 3);

        let summary_width = (iw.saturating_sub(PANEL_GAP)) * 3 / 5;
        let validity_width = iw.saturating_sub(PANEL_GAP + summary_width);
        let validity_x = ix + summary_width + PANEL_GAP;

        let summary = c.boxed(ix, cy, summary_width, 24, palette::INDIGO, palette::TEXT_DIM, |c, px, py, pw| {
            let value_width = pw.saturating_sub(SUMMARY_LABEL_WIDTH);
            let mut row_y = py;
            for (label, value) in account.summary_rows() {
                c.text(px, row_y, label, 1, palette::WHITE);
                let h = c.paragraph(
                    px + SUMMARY_LABEL_WIDTH,
                    row_y,
                    value_width,
                    &format!(": {value}"),
                    1,
                    palette::WHITE,
                );
                row_y += h.max(line_height(1)) + 8;
            }
            row_y - py - 8
        });

        let validity = c.boxed(validity_x, cy, validity_width, 24, palette::NAVY, palette::BORDER, |c, px, py, pw| {
            let badge = (80, 64);
            let label_width = pw.saturating_sub(badge.0 + 16);
            let label_h = c.paragraph(px, py + 16, label_width, &account.validity_label, 1, palette::TEXT);

            let bx = px + pw.saturating_sub(badge.0);
            c.rect(bx, py, badge.0, badge.1, palette::BORDER_STRONG);
            c.rect(bx + 1, py + 1, badge.0 - 2, badge.1 - 2, palette::BLACK);
            let minutes = account.validity_minutes.to_string();
            c.centered(bx, py + 10, badge.0, &minutes, 3, palette::TEXT);
            c.centered(bx, py + 46, badge.0, &account.validity_unit, 1, palette::TEXT_DIM);

            badge.1.max(label_h + 16)
        });

        let panel_height = summary.height.max(validity.height);
        c.resize(summary, panel_height);
        c.resize(validity, panel_height);
        cy += panel_height + 24;

        cy += c.centered(ix, cy, iw, &account.note.to_uppercase(), 2, palette::GREEN);
        cy - iy
    })
}

fn job_details_card(canvas: &mut Canvas, details: &JobDetailsBlock, x: u32, y: u32, width: u32) -> u32 {
    canvas.card(x, y, width, palette::CARD, |c, ix, iy, iw| {
        let mut cy = iy + c.card_title(ix, iy, iw, &details.title, 3);
        c.rect(ix, cy, iw, 1, palette::BORDER);
        cy += 16;

        for row in &details.rows {
            let status_width = text_width(&row.status, 1);
            let value_width = iw.saturating_sub(JOB_LABEL_WIDTH + status_width + 16);

            c.text(ix, cy, &row.label.to_uppercase(), 1, palette::TEXT);
            let h = c.paragraph(ix + JOB_LABEL_WIDTH, cy, value_width, &row.value, 1, palette::TEXT_MUTED);
            c.text(
                ix + iw.saturating_sub(status_width),
                cy,
                &row.status.to_uppercase(),
                1,
                palette::GREEN,
            );
            cy += h.max(line_height(1)) + 8;
        }
        cy - iy
    })
}

fn terms_card(canvas: &mut Canvas, terms: &TermsBlock, x: u32, y: u32, width: u32) -> u32 {
    canvas.card(x, y, width, palette::CARD, |c, ix, iy, iw| {
        let mut cy = iy + c.card_title(ix, iy, iw, &terms.title, 3);
        for item in &terms.items {
            cy += c.paragraph(ix, cy, iw, item, 1, palette::TEXT_MUTED) + 8;
        }
        cy - iy
    })
}

fn attention_card(canvas: &mut Canvas, attention: &AttentionBlock, x: u32, y: u32, width: u32) -> u32 {
    canvas.card(x, y, width, palette::MIDNIGHT, |c, ix, iy, iw| {
        let mut cy = iy + c.card_title(ix, iy, iw, &attention.title, 2);
        cy += c.paragraph(ix, cy, iw, &attention.message, 1, palette::TEXT);
        cy - iy
    })
}

fn footer(canvas: &mut Canvas, footer: &FooterBlock, x: u32, viewport_height: u32, width: u32) {
    let text_y = viewport_height.saturating_sub(PAGE_PADDING + line_height(1));
    canvas.rect(x, text_y.saturating_sub(16), width, 1, palette::BORDER);
    canvas.centered(x, text_y, width, &footer.line().to_uppercase(), 1, palette::TEXT_SOFT);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{render, FixedDocumentId};
    use crate::task::{FixedClock, JobCategory, TaskGenerator};
    use chrono::{FixedOffset, TimeZone};

    fn view() -> DocumentView {
        let wib = FixedOffset::east_opt(7 * 3600).unwrap();
        let generator = TaskGenerator::with_clock(FixedClock(
            wib.with_ymd_and_hms(2026, 10, 19, 9, 41, 0).unwrap(),
        ));
        let record = generator
            .generate("08123456789", JobCategory::Single, "150000")
            .unwrap();
        render(&record, &FixedDocumentId("ABCDEFGH1".to_string()))
    }

    fn texts(commands: &[PaintCommand]) -> Vec<&str> {
        commands
            .iter()
            .filter_map(|c| match c {
                PaintCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn wrap_text_respects_width() {
        let lines = wrap_text("Hello wonderful world of text", 80, 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "Hello wonderful world of text");
    }

    #[test]
    fn wrap_text_splits_long_words() {
        let lines = wrap_text("ABCDEFGHIJKLMNOPQRST", 64, 1);
        assert_eq!(lines, vec!["ABCDEFGH", "IJKLMNOP", "QRST"]);
    }

    #[test]
    fn split_columns_weights() {
        let (left, right) = split_columns(1360);
        assert_eq!(left + right + COLUMN_GAP, 1360);
        assert!(left > right);
    }

    #[test]
    fn layout_contains_every_section() {
        let commands = layout_document(&view(), Viewport { width: 1440, height: 900 });
        let texts = texts(&commands);
        assert!(texts.contains(&"DETAIL TUGAS PEKERJAAN"));
        assert!(texts.contains(&"GUCCI BUSINESS PROGRAM"));
        assert!(texts.contains(&"Account"));
        assert!(texts.contains(&": 08123456789"));
        assert!(texts.contains(&": Rp150.000"));
        assert!(texts.contains(&"Job Details"));
        assert!(texts.contains(&"Please Read"));
        assert!(texts.contains(&"Attention"));
        assert_eq!(texts.iter().filter(|t| **t == "DONE").count(), 5);
        assert!(texts.iter().any(|t| t.contains("GUCCI-ID-ABCDEFGH1")));
    }

    #[test]
    fn layout_stays_inside_canonical_width() {
        let commands = layout_document(&view(), Viewport { width: 1440, height: 900 });
        for command in &commands {
            match command {
                PaintCommand::SolidRect { x, width, .. } => assert!(*x as u32 + width <= 1440),
                PaintCommand::Text { x, text, scale, .. } => {
                    assert!(*x as u32 + text_width(text, *scale) <= 1440, "{text} overflows")
                }
            }
        }
    }

    #[test]
    fn layout_follows_viewport_width() {
        let wide = layout_document(&view(), Viewport { width: 1440, height: 900 });
        let narrow = layout_document(&view(), Viewport { width: 1300, height: 900 });
        assert_ne!(wide, narrow);
    }
}
