use std::io::{self, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

use anyhow::bail;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode},
};
use lumen_core::{AudioBackend, PlaylistItem, PlaylistItemAudio, RodioBackend};

enum KeyCommand {
    TogglePause,
    Restart,
    Stop,
}

/// Leaves raw mode however the loop exits.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
    }
}

fn poll_key(timeout: Duration) -> io::Result<Option<KeyCommand>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event::read()?
    else {
        return Ok(None);
    };

    Ok(match (code, modifiers) {
        (KeyCode::Char(' '), _) => Some(KeyCommand::TogglePause),
        (KeyCode::Char('r'), _) => Some(KeyCommand::Restart),
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => Some(KeyCommand::Stop),
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(KeyCommand::Stop),
        _ => None,
    })
}

fn format_ms(ms: u64) -> String {
    format!("{:02}:{:02}.{:03}", ms / 60_000, (ms / 1000) % 60, ms % 1000)
}

/// Play one file as a playlist item, ticking at `tick_ms` until it ends or
/// the user stops it.
pub fn run(file: &Path, device: &str, volume: u32, tick_ms: u64) -> anyhow::Result<()> {
    let output = RodioBackend::with_device(device)?;
    log::info!("Audio output: {}", output.device_name());
    let backend: Rc<dyn AudioBackend> = Rc::new(output);

    let mut item = PlaylistItemAudio::new(backend);
    item.set_audio_file(file);
    item.set_volume(Some(volume));

    item.start();
    if !item.controls_timing() {
        bail!("{} could not be opened for playback", file.display());
    }

    println!(
        "Playing {} ({}) - space pause/resume, r restart, q stop",
        item.name_no_time(),
        format_ms(item.duration_ms())
    );

    let tick = Duration::from_millis(tick_ms);
    let mut paused = false;
    {
        let _raw = RawMode::enable()?;
        let mut stdout = io::stdout();

        loop {
            match poll_key(tick)? {
                Some(KeyCommand::TogglePause) => {
                    paused = !paused;
                    item.pause(paused);
                }
                Some(KeyCommand::Restart) => {
                    paused = false;
                    item.restart();
                }
                Some(KeyCommand::Stop) => break,
                None => {}
            }

            write!(
                stdout,
                "\r{} / {}{}",
                format_ms(item.position_ms()),
                format_ms(item.duration_ms()),
                if paused { " [paused]" } else { "         " }
            )?;
            stdout.flush()?;

            if item.is_finished() {
                break;
            }
        }
    }

    item.stop();
    println!();
    log::info!("Stopped {}", file.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ms() {
        assert_eq!(format_ms(0), "00:00.000");
        assert_eq!(format_ms(61_250), "01:01.250");
        assert_eq!(format_ms(3_599_999), "59:59.999");
    }
}
