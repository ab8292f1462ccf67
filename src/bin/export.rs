use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context};
use glam::ivec2;
use image::RgbaImage;
use simple_logger::SimpleLogger;

use slate::{final_slide, parse_presentation, FontBook, Rect};

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

fn main() -> anyhow::Result<()> {
    SimpleLogger::new().init()?;

    let mut args = env::args().skip(1);
    let Some(deck) = args.next() else {
        bail!("usage: slate-export <deck> [out-dir]");
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| ".".to_owned()));

    let file = File::open(&deck).with_context(|| format!("opening {deck}"))?;
    let mut presentation = parse_presentation(BufReader::new(file))?;
    presentation
        .slides
        .push(final_slide(presentation.conf.clone()));

    let fonts = FontBook::system()?;

    for (i, slide) in presentation.slides.iter().enumerate() {
        let mut image = RgbaImage::new(WIDTH, HEIGHT);
        slide.draw(
            &mut image,
            Rect::new(ivec2(0, 0), ivec2(WIDTH as i32, HEIGHT as i32)),
            &fonts,
        );
        let path = out_dir.join(format!("slide-{:03}.png", i + 1));
        image
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
    }

    Ok(())
}
