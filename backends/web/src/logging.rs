//! Tracing and panic forwarding to the browser console.

use std::io::{self, Write};
use std::sync::Once;

use tracing::{Level, Metadata, level_filters::LevelFilter};
use tracing_subscriber::fmt::MakeWriter;
use wasm_bindgen::JsValue;

const TRACING_PREFIX: &str = "[flexdom]";

static INSTALLED: Once = Once::new();

/// Installs the console panic hook and a console-backed tracing subscriber.
///
/// Idempotent. If another subscriber is already installed it is kept.
pub fn install(level: LevelFilter) {
    INSTALLED.call_once(|| {
        console_error_panic_hook::set_once();

        // The browser has no usable system clock for the default timer.
        let result = tracing_subscriber::fmt()
            .with_writer(ConsoleMakeWriter)
            .with_max_level(level)
            .with_ansi(false)
            .without_time()
            .try_init();

        if result.is_err() {
            web_sys::console::warn_1(&"flexdom: a tracing subscriber is already installed".into());
        }
    });
}

#[derive(Debug, Clone, Copy)]
struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and hands it to the console when dropped.
#[derive(Debug)]
struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl ConsoleWriter {
    const fn new(level: Level) -> Self {
        Self {
            level,
            buffer: Vec::new(),
        }
    }
}

impl Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let text = String::from_utf8_lossy(&self.buffer);
        let line = text.trim_end();
        if line.is_empty() {
            return;
        }
        let message = JsValue::from(format!("{TRACING_PREFIX} {line}"));
        match self.level {
            Level::ERROR => web_sys::console::error_1(&message),
            Level::WARN => web_sys::console::warn_1(&message),
            Level::INFO => web_sys::console::info_1(&message),
            _ => web_sys::console::debug_1(&message),
        }
    }
}
