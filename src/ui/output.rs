use super::style::{is_quiet, palette, Marker, Tone};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}",
        Marker::Convert.glyph(),
        text.style(palette().style(Tone::Heading))
    );
}

pub fn status(marker: Marker, label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        marker.glyph(),
        label.style(palette().style(Tone::Label)),
        value
    );
}

pub fn success(label: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}",
        Marker::Done.glyph(),
        label.style(palette().style(Tone::Ok))
    );
}

pub fn error(label: &str) {
    eprintln!(
        "{} {}",
        Marker::Failed.glyph(),
        label.style(palette().style(Tone::Failure))
    );
}

pub fn warn(label: &str) {
    eprintln!(
        "{} {}",
        Marker::Fallback.glyph(),
        label.style(palette().style(Tone::Caution))
    );
}

pub fn info(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}: {}",
        Marker::Detail.glyph().style(palette().style(Tone::Note)),
        label.style(palette().style(Tone::Label)),
        value
    );
}

pub fn section(marker: Marker, title: &str) {
    if is_quiet() {
        return;
    }
    println!();
    println!(
        "━ {} {} ━",
        marker.glyph(),
        title.style(palette().style(Tone::Heading))
    );
}

pub fn timing(elapsed: &str) {
    if is_quiet() {
        return;
    }
    println!(
        "{} {}",
        Marker::Elapsed.glyph().style(palette().style(Tone::Label)),
        elapsed
    );
}

pub fn summary_row(label: &str, value: &str) {
    if is_quiet() {
        return;
    }
    println!("  {} {}", label.style(palette().style(Tone::Label)), value);
}
