//! Slide-deck parsing.
//!
//! The deck format is line oriented:
//!
//! ```text
//! %set align=left         global option, applies to following slides
//! %bg=black               option for the current slide
//! %note talk slowly       speaker note for the current slide
//! # a comment
//! Body text with **markup**.
//!
//! %%%                     next content block on the same slide
//! @photo.png              an image content block
//! ---                     end of slide
//! ```
//!
//! Options are expected before a slide's body; trailing whitespace is
//! stripped; bad option lines are logged and skipped.

use std::io::{self, BufRead};
use std::mem;

use crate::config::SlideConfig;
use crate::slide::{ImageSlide, Slide, SlideContent};
use crate::text::markup::MarkupBuilder;

/// A parsed presentation: the global configuration and its slides.
pub struct Presentation {
    pub conf: SlideConfig,
    pub slides: Vec<Slide>,
}

#[derive(Debug, thiserror::Error)]
pub enum DeckError {
    #[error("failed to read presentation")]
    Io(#[from] io::Error),
    #[error("failed to load image `{path}`")]
    Image {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// Parses a slide deck from `reader`.
pub fn parse_presentation(reader: impl BufRead) -> Result<Presentation, DeckError> {
    let mut global = SlideConfig::default();
    let mut slide_conf = global.clone();
    let mut builder = MarkupBuilder::default();
    let mut content: Vec<SlideContent> = Vec::new();
    let mut notes = String::new();
    let mut slides = Vec::new();

    fn flush(builder: &mut MarkupBuilder, content: &mut Vec<SlideContent>) {
        if builder.dirty() {
            content.push(SlideContent::Text(builder.finish()));
            builder.reset();
        }
    }

    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            builder.feed("\n");
        } else if line.starts_with('#') {
            // comment
        } else if line == "%%%" {
            flush(&mut builder, &mut content);
        } else if line == "---" {
            flush(&mut builder, &mut content);
            slides.push(Slide {
                conf: slide_conf.clone(),
                notes: mem::take(&mut notes),
                content: mem::take(&mut content),
            });
            slide_conf = global.clone();
        } else if let Some(attr) = line.strip_prefix("%set ") {
            let attr = attr.trim_start();
            if let Err(err) = global.set(attr) {
                log::warn!("option `{attr}`: {err}");
            }
            if builder.dirty() {
                log::warn!("option not at beginning of slide");
            }
        } else if let Some(note) = line.strip_prefix("%note ") {
            notes.push_str(note.trim_start());
            notes.push('\n');
        } else if let Some(attr) = line.strip_prefix('%') {
            let attr = attr.trim_start();
            if let Err(err) = slide_conf.set(attr) {
                log::warn!("option `{attr}`: {err}");
            }
            if builder.dirty() {
                log::warn!("option not at beginning of slide");
            }
        } else if let Some(path) = line.strip_prefix('@') {
            flush(&mut builder, &mut content);
            content.push(SlideContent::Image(ImageSlide::open(path)?));
        } else {
            builder.feed(line);
            builder.feed("\n");
        }
    }

    flush(&mut builder, &mut content);
    slides.push(Slide {
        conf: slide_conf,
        notes,
        content,
    });

    Ok(Presentation {
        conf: global,
        slides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::StyleFlags;
    use std::io::Cursor;

    fn parse(deck: &str) -> Presentation {
        parse_presentation(Cursor::new(deck)).unwrap()
    }

    fn text_of(content: &SlideContent) -> &crate::text::StyledText {
        match content {
            SlideContent::Text(text) => text,
            SlideContent::Image(_) => panic!("expected text content"),
        }
    }

    #[test]
    fn splits_slides_and_blocks() {
        let pres = parse(
            "first\n%%%\nsecond block\n---\nnext slide\n---\n",
        );
        // The trailing (empty) slide is always present.
        assert_eq!(pres.slides.len(), 3);
        assert_eq!(pres.slides[0].content.len(), 2);
        assert_eq!(pres.slides[1].content.len(), 1);
        assert!(pres.slides[2].content.is_empty());
        assert_eq!(
            text_of(&pres.slides[0].content[0]).to_plain_string(),
            "first\n"
        );
    }

    #[test]
    fn body_lines_join_with_newlines() {
        let pres = parse("one\ntwo\n\nthree\n---\n");
        assert_eq!(
            text_of(&pres.slides[0].content[0]).to_plain_string(),
            "one\ntwo\n\nthree\n"
        );
    }

    #[test]
    fn markup_is_parsed_in_bodies() {
        let pres = parse("hello **world**\n---\n");
        let text = text_of(&pres.slides[0].content[0]);
        assert_eq!(text.runs()[1].style, StyleFlags::BOLD);
        assert_eq!(text.runs()[1].text.as_str(), "world");
    }

    #[test]
    fn comments_and_trailing_whitespace_are_ignored() {
        let pres = parse("# heading comment\nbody   \n---\n");
        assert_eq!(
            text_of(&pres.slides[0].content[0]).to_plain_string(),
            "body\n"
        );
    }

    #[test]
    fn slide_options_apply_to_one_slide() {
        let pres = parse("%align=left\nfirst\n---\nsecond\n---\n");
        assert_eq!(pres.slides[0].conf.align, crate::config::Align::Left);
        assert_eq!(pres.slides[1].conf.align, crate::config::Align::Center);
    }

    #[test]
    fn global_options_apply_to_later_slides() {
        let pres = parse("%set align=right\nfirst\n---\nsecond\n---\n");
        // The current slide kept its config snapshot; following slides and
        // the presentation pick up the global change.
        assert_eq!(pres.slides[0].conf.align, crate::config::Align::Center);
        assert_eq!(pres.slides[1].conf.align, crate::config::Align::Right);
        assert_eq!(pres.conf.align, crate::config::Align::Right);
    }

    #[test]
    fn bad_options_are_skipped() {
        let pres = parse("%wobble=3\nbody\n---\n");
        assert_eq!(pres.slides[0].conf, SlideConfig::default());
    }

    #[test]
    fn notes_accumulate() {
        let pres = parse("%note first\n%note second\nbody\n---\n");
        assert_eq!(pres.slides[0].notes, "first\nsecond\n");
        assert!(pres.slides[1].notes.is_empty());
    }

    #[test]
    fn empty_deck_has_one_empty_slide() {
        let pres = parse("");
        assert_eq!(pres.slides.len(), 1);
        assert!(pres.slides[0].content.is_empty());
    }
}
