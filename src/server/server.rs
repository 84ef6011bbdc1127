use super::protocol::{FunctionContextArgs, Message, MessageContent, PostProcessArgs};
use crate::debugger::{debug_shader, extract_function_context, DebugRequest};
use crate::error::{Error, Result};
use crate::synth::apply_output_post_processing;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::{BufRead, Write};

/// Framed JSON request loop: `Content-Length: N\r\n\r\n{json}` in both directions.
pub struct ShaderDebugServer<R, W> {
    seq: u64,
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> ShaderDebugServer<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
        }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: String, body: Option<Value>) -> Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: MessageContent::Event { event, body },
        };
        self.send_message(&msg)
    }

    fn send_message(&mut self, msg: &Message) -> Result<()> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
        self.writer.flush()?;
        log::trace!("sent {} bytes", json.len());
        Ok(())
    }

    /// Reads one framed message; `Ok(None)` at end of input.
    pub fn read_message(&mut self) -> Result<Option<Message>> {
        let mut content_length: Option<usize> = None;
        let mut saw_header = false;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                if saw_header {
                    return Err(Error::Frame("input ended inside a header".to_string()));
                }
                return Ok(None);
            }
            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if saw_header {
                    break;
                }
                continue;
            }
            saw_header = true;
            if let Some(value) = line.strip_prefix("Content-Length:") {
                let length = value
                    .trim()
                    .parse()
                    .map_err(|_| Error::Frame(format!("bad Content-Length '{}'", value.trim())))?;
                content_length = Some(length);
            }
        }

        let length =
            content_length.ok_or_else(|| Error::Frame("missing Content-Length".to_string()))?;
        let mut buffer = vec![0u8; length];
        self.reader.read_exact(&mut buffer)?;
        Ok(Some(serde_json::from_slice(&buffer)?))
    }

    /// Serves requests until `disconnect` or end of input.
    pub fn run(&mut self) -> Result<()> {
        let mut count = 0u64;
        loop {
            let msg = match self.read_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    log::info!("input closed after {} messages", count);
                    break;
                }
                Err(e @ (Error::Json(_) | Error::Frame(_))) => {
                    log::warn!("dropping unreadable message: {}", e);
                    continue;
                }
                Err(e) => return Err(e),
            };
            count += 1;
            log::debug!("received message #{}: {:?}", count, msg.content);

            match msg.content {
                MessageContent::Request { command, arguments } => {
                    if !self.handle_request(msg.seq, command, arguments)? {
                        break;
                    }
                }
                _ => log::debug!("ignoring non-request message"),
            }
        }
        Ok(())
    }

    /// Dispatches one request. Returns `false` once the client disconnects.
    fn handle_request(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<bool> {
        match command.as_str() {
            "initialize" => self.handle_initialize(seq, command)?,
            "debugLine" => self.handle_debug_line(seq, command, arguments)?,
            "functionContext" => self.handle_function_context(seq, command, arguments)?,
            "postProcess" => self.handle_post_process(seq, command, arguments)?,
            "disconnect" => {
                self.send_response(seq, command, true, None, None)?;
                return Ok(false);
            }
            _ => {
                log::warn!("unhandled command: {}", command);
                let message = format!("unknown command '{}'", command);
                self.send_response(seq, command, false, Some(message), None)?;
            }
        }
        Ok(true)
    }

    fn handle_initialize(&mut self, seq: u64, command: String) -> Result<()> {
        let body = json!({
            "supportsNormalize": true,
            "supportsStep": true,
            "supportsLoopCaps": true,
            "supportsCustomParameters": true,
        });
        self.send_response(seq, command, true, None, Some(body))?;
        self.send_event("initialized".to_string(), None)
    }

    fn handle_debug_line(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<()> {
        let request: DebugRequest = match parse_arguments(&command, arguments) {
            Ok(request) => request,
            Err(e) => return self.send_response(seq, command, false, Some(e.to_string()), None),
        };
        let program = debug_shader(&request);
        if program.is_none() {
            log::debug!("nothing to debug on line {}", request.debug_line);
        }
        self.send_response(seq, command, true, None, Some(json!({ "program": program })))
    }

    fn handle_function_context(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<()> {
        let args: FunctionContextArgs = match parse_arguments(&command, arguments) {
            Ok(args) => args,
            Err(e) => return self.send_response(seq, command, false, Some(e.to_string()), None),
        };
        let context = extract_function_context(&args.source, args.debug_line);
        let body = serde_json::to_value(context)?;
        self.send_response(seq, command, true, None, Some(body))
    }

    fn handle_post_process(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<()> {
        let args: PostProcessArgs = match parse_arguments(&command, arguments) {
            Ok(args) => args,
            Err(e) => return self.send_response(seq, command, false, Some(e.to_string()), None),
        };
        let program = apply_output_post_processing(&args.source, args.normalize_mode, args.step_edge);
        self.send_response(seq, command, true, None, Some(json!({ "program": program })))
    }
}

fn parse_arguments<T: DeserializeOwned>(command: &str, arguments: Option<Value>) -> Result<T> {
    let arguments = arguments.ok_or_else(|| Error::MissingArguments {
        command: command.to_string(),
    })?;
    Ok(serde_json::from_value(arguments)?)
}
