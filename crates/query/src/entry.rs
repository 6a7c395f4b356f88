#![forbid(unsafe_code)]

//! stdio transport loop, adapted from `bm_mcp::entry::stdio::run_stdio`.

use crate::protocol::{
    TransportMode, detect_mode_from_first_line, parse_request, read_content_length_frame,
    write_content_length_json, write_newline_json,
};
use crate::server::QueryServer;
use serde_json::Value;
use std::io::{BufRead, BufReader};

pub(crate) fn run_stdio(server: &mut QueryServer) -> std::io::Result<()> {
    let stdin = std::io::stdin();
    let mut reader = BufReader::new(stdin.lock());
    let mut stdout = std::io::stdout().lock();

    let mut mode: Option<TransportMode> = None;

    loop {
        let effective_mode = match mode {
            Some(m) => m,
            None => {
                let mut peek = String::new();
                if reader.read_line(&mut peek)? == 0 {
                    break;
                }
                let Some(detected) = detect_mode_from_first_line(&peek) else {
                    continue;
                };
                mode = Some(detected);
                match detected {
                    TransportMode::NewlineJson => {
                        let raw = peek.trim();
                        if !raw.is_empty() {
                            handle_body(server, &mut stdout, raw.as_bytes(), detected)?;
                        }
                        continue;
                    }
                    TransportMode::ContentLength => {
                        let Some(body) = read_content_length_frame(&mut reader, Some(peek))? else {
                            break;
                        };
                        handle_body(server, &mut stdout, &body, detected)?;
                        continue;
                    }
                }
            }
        };

        match effective_mode {
            TransportMode::NewlineJson => {
                let mut line = String::new();
                if reader.read_line(&mut line)? == 0 {
                    break;
                }
                let raw = line.trim();
                if raw.is_empty() {
                    continue;
                }
                handle_body(server, &mut stdout, raw.as_bytes(), effective_mode)?;
            }
            TransportMode::ContentLength => {
                let mut first_header = String::new();
                if reader.read_line(&mut first_header)? == 0 {
                    break;
                }
                if first_header.trim().is_empty() {
                    continue;
                }
                let Some(body) = read_content_length_frame(&mut reader, Some(first_header))?
                else {
                    break;
                };
                handle_body(server, &mut stdout, &body, effective_mode)?;
            }
        }
    }

    Ok(())
}

fn handle_body(
    server: &mut QueryServer,
    stdout: &mut std::io::StdoutLock<'_>,
    body: &[u8],
    mode: TransportMode,
) -> std::io::Result<()> {
    let response: Option<Value> = match parse_request(body) {
        Ok(request) => server.handle(request),
        Err(err) => Some(err),
    };

    if let Some(resp) = response {
        match mode {
            TransportMode::NewlineJson => write_newline_json(stdout, &resp)?,
            TransportMode::ContentLength => write_content_length_json(stdout, &resp)?,
        }
    }

    Ok(())
}
