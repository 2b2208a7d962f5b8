//! Line-based control over stdin and stdout
//!
//! Each input line is one JSON object naming a request the way the flag
//! files do, with the flag file's payload alongside:
//!
//! ```json
//! {"request": "switch_scene", "payload": {"scene": "level2"}}
//! {"request": "status", "payload": {"placement_mode": true}}
//! ```
//!
//! Engine events are written back one JSON object per line, tagged by
//! `"event"`.

use std::io::{BufRead, Write};
use std::thread;

use serde::Deserialize;

use super::{ControlError, ControlEvent, ControlHandle, ControlRequest, ControlStatus};

#[derive(Debug, Deserialize)]
struct ConsoleLine {
    request: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Debug, PartialEq)]
pub enum ConsoleInput {
    Request(ControlRequest),
    Status(ControlStatus),
}

pub fn parse_line(line: &str) -> Result<ConsoleInput, ControlError> {
    let line: ConsoleLine = serde_json::from_str(line)
        .map_err(|source| ControlError::Malformed { request: "console", source })?;
    if line.request == "status" {
        let status = serde_json::from_value(line.payload)
            .map_err(|source| ControlError::Malformed { request: "status", source })?;
        return Ok(ConsoleInput::Status(status));
    }
    ControlRequest::decode(&line.request, line.payload).map(ConsoleInput::Request)
}

/// Forward requests from `input` until it ends or the engine goes away.
/// Lines that fail to parse are logged and skipped.
pub fn pump_requests(input: impl BufRead, handle: &ControlHandle) {
    for line in input.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                log::warn!("console input: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }
        let sent = match parse_line(&line) {
            Ok(ConsoleInput::Request(request)) => handle.send(request),
            Ok(ConsoleInput::Status(status)) => handle.set_status(status),
            Err(e) => {
                log::warn!("console: {}", e);
                continue;
            }
        };
        if sent.is_err() {
            break;
        }
    }
    log::debug!("console input closed");
}

fn write_event(out: &mut impl Write, event: &ControlEvent) -> std::io::Result<()> {
    let json = serde_json::to_string(event)?;
    writeln!(out, "{}", json)?;
    out.flush()
}

/// Write engine events to `out` until the engine drops its end
pub fn pump_events(handle: &ControlHandle, mut out: impl Write) {
    for event in handle.events().iter() {
        if let Err(e) = write_event(&mut out, &event) {
            log::warn!("console output: {}", e);
            break;
        }
    }
}

/// Start the stdin reader and stdout writer threads
pub fn spawn(handle: ControlHandle) -> std::io::Result<()> {
    let events = handle.clone();
    thread::Builder::new()
        .name("console-in".into())
        .spawn(move || pump_requests(std::io::stdin().lock(), &handle))?;
    thread::Builder::new()
        .name("console-out".into())
        .spawn(move || pump_events(&events, std::io::stdout().lock()))?;
    log::info!("control console on stdin/stdout");
    Ok(())
}
