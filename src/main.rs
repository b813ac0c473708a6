use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::env;
use std::io::{stdout, BufWriter, Write};
use std::time::{Duration, Instant};

mod particle;
mod sky;
mod surface;

use sky::SkyField;
use surface::{Rgb, Surface};

fn print_usage() {
    eprintln!("nightsky - Animated night sky for your terminal");
    eprintln!();
    eprintln!("Usage: nightsky [OPTIONS]");
    eprintln!();
    eprintln!("Stars drift across the screen in parallax layers while shooting");
    eprintln!("stars streak by every few seconds.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --bg-color RRGGBB  Set background color as hex (e.g., --bg-color 1a1b26)");
    eprintln!();
    eprintln!("Press space to pause, 'q', ESC, or Ctrl+C to exit");
}

// Two vertical pixels per terminal cell: the upper one is the cell
// background, the lower one the foreground of a half-block glyph. Color
// escapes are only emitted when they change along the row.
fn render_frame(surface: &Surface, buf: &mut Vec<u8>) -> std::io::Result<()> {
    buf.clear();
    buf.extend_from_slice(b"\x1b[H");

    let width = surface.width();
    let height = surface.height();

    let mut prev_top_color: Rgb = (255, 255, 255);
    let mut prev_bot_color: Rgb = (255, 255, 255);

    for y in (0..height).step_by(2) {
        for x in 0..width {
            let top_color = surface.pixel(x, y);
            let bot_color = if y + 1 < height {
                surface.pixel(x, y + 1)
            } else {
                top_color
            };

            if top_color != prev_top_color {
                write!(
                    buf,
                    "\x1b[48;2;{};{};{}m",
                    top_color.0, top_color.1, top_color.2
                )?;
                prev_top_color = top_color;
            }
            if bot_color != prev_bot_color {
                write!(
                    buf,
                    "\x1b[38;2;{};{};{}m",
                    bot_color.0, bot_color.1, bot_color.2
                )?;
                prev_bot_color = bot_color;
            }

            buf.extend_from_slice("▄".as_bytes());
        }
        buf.extend_from_slice(b"\x1b[0m");
        prev_top_color = (255, 255, 255);
        prev_bot_color = (255, 255, 255);
        if y + 2 < height {
            buf.extend_from_slice(b"\r\n");
        }
    }

    Ok(())
}

fn run(bg: Option<Rgb>) -> std::io::Result<()> {
    let stdout = stdout();
    let mut stdout = BufWriter::with_capacity(1024 * 64, stdout);

    terminal::enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen, Hide, Clear(ClearType::All))?;

    let (cols, rows) = terminal::size()?;
    let mut field = SkyField::new(cols as usize, rows as usize * 2, bg);
    field.start(cols as usize, rows as usize * 2);

    let mut output_buf = Vec::with_capacity(cols as usize * rows as usize * 25);
    let mut last_frame = Instant::now();
    let mut accumulator = 0.0f32;
    const FIXED_DT: f32 = 1.0 / 60.0;

    loop {
        if event::poll(Duration::from_millis(1))? {
            match event::read()? {
                Event::Key(key_event) => {
                    if key_event.code == KeyCode::Char('q')
                        || key_event.code == KeyCode::Esc
                        || (key_event.code == KeyCode::Char('c')
                            && key_event.modifiers.contains(event::KeyModifiers::CONTROL))
                    {
                        break;
                    }
                    // Space toggles visibility: hide blanks the screen,
                    // start resumes with a freshly seeded drift field.
                    if key_event.code == KeyCode::Char(' ') {
                        if field.is_paused() {
                            let (cols, rows) = terminal::size()?;
                            field.start(cols as usize, rows as usize * 2);
                        } else {
                            field.hide();
                        }
                    }
                }
                Event::Resize(cols, rows) => {
                    field.start(cols as usize, rows as usize * 2);
                    execute!(stdout, Clear(ClearType::All))?;
                }
                _ => {}
            }
        }

        let now = Instant::now();
        let frame_time = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        accumulator += frame_time;
        if accumulator > FIXED_DT * 3.0 {
            accumulator = FIXED_DT * 3.0;
        }

        while accumulator >= FIXED_DT {
            field.update(FIXED_DT);
            accumulator -= FIXED_DT;
        }

        render_frame(field.surface(), &mut output_buf)?;
        stdout.write_all(&output_buf)?;
        stdout.flush()?;
    }

    field.dispose();

    execute!(stdout, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;

    Ok(())
}

fn parse_hex_color(hex: &str) -> Option<Rgb> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = env::args().collect();

    let mut bg: Option<Rgb> = None;

    // Parse arguments
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bg-color" => {
                if i + 1 < args.len() {
                    if let Some(color) = parse_hex_color(&args[i + 1]) {
                        bg = Some(color);
                        i += 2;
                    } else {
                        eprintln!("Invalid hex color: {}", args[i + 1]);
                        eprintln!("Expected format: RRGGBB (e.g., 1a1b26)");
                        std::process::exit(1);
                    }
                } else {
                    eprintln!("--bg-color requires a hex color value");
                    std::process::exit(1);
                }
            }
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            arg => {
                eprintln!("Unknown option: {}", arg);
                eprintln!();
                print_usage();
                std::process::exit(1);
            }
        }
    }

    run(bg)
}
