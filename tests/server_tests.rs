use serde_json::{json, Value};
use shader_debugger::server::ShaderDebugServer;
use std::io::Cursor;

fn frame(message: &Value) -> String {
    let body = message.to_string();
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

fn request(seq: u64, command: &str, arguments: Option<Value>) -> String {
    let mut message = json!({ "seq": seq, "type": "request", "command": command });
    if let Some(arguments) = arguments {
        message["arguments"] = arguments;
    }
    frame(&message)
}

// Runs the server over `input` and returns every message it wrote.
fn serve(input: &str) -> Vec<Value> {
    let mut server = ShaderDebugServer::new(Cursor::new(input.as_bytes().to_vec()), Vec::new());
    server.run().expect("server loop");
    let output = String::from_utf8(server.into_writer()).expect("utf-8 output");

    let mut messages = Vec::new();
    let mut rest = output.as_str();
    while let Some(header_end) = rest.find("\r\n\r\n") {
        let length: usize = rest[..header_end]
            .trim()
            .strip_prefix("Content-Length:")
            .expect("Content-Length header")
            .trim()
            .parse()
            .expect("numeric length");
        let body = &rest[header_end + 4..header_end + 4 + length];
        messages.push(serde_json::from_str(body).expect("json body"));
        rest = &rest[header_end + 4 + length..];
    }
    messages
}

#[cfg(test)]
mod server_tests {
    use super::*;

    #[test]
    fn test_initialize_then_initialized_event() {
        let out = serve(&request(1, "initialize", Some(json!({}))));

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["type"], "response");
        assert_eq!(out[0]["request_seq"], 1);
        assert_eq!(out[0]["success"], true);
        assert_eq!(out[0]["body"]["supportsLoopCaps"], true);
        assert_eq!(out[1]["type"], "event");
        assert_eq!(out[1]["event"], "initialized");
        assert_eq!(out[1]["seq"], 2);
    }

    #[test]
    fn test_debug_line_returns_program() {
        let source = "void mainImage(out vec4 fragColor, in vec2 fragCoord) {\n    vec2 uv = fragCoord / iResolution.xy;\n}";
        let input = request(
            7,
            "debugLine",
            Some(json!({ "source": source, "debugLine": 1, "normalizeMode": "soft" })),
        );
        let out = serve(&input);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["command"], "debugLine");
        assert_eq!(out[0]["request_seq"], 7);
        assert_eq!(out[0]["success"], true);
        let program = out[0]["body"]["program"].as_str().expect("program text");
        assert!(program.contains("vec2 uv = fragCoord / iResolution.xy;"));
        assert!(program.contains("abs(uv)"));
    }

    #[test]
    fn test_debug_line_with_nothing_to_show() {
        let input = request(2, "debugLine", Some(json!({ "source": "// comment", "debugLine": 0 })));
        let out = serve(&input);
        assert_eq!(out[0]["success"], true);
        assert!(out[0]["body"]["program"].is_null());
    }

    #[test]
    fn test_function_context_request() {
        let source = "float f(float x) {\n    float y = x * 2.0;\n    return y;\n}";
        let input = request(3, "functionContext", Some(json!({ "source": source, "debugLine": 1 })));
        let out = serve(&input);

        assert_eq!(out[0]["body"]["functionName"], "f");
        assert_eq!(out[0]["body"]["isFunction"], true);
        assert_eq!(out[0]["body"]["parameters"][0]["type"], "float");
        assert_eq!(out[0]["body"]["parameters"][0]["defaultValue"], "0.5");

        let input = request(4, "functionContext", Some(json!({ "source": source, "debugLine": 9 })));
        let out = serve(&input);
        assert!(out[0]["body"].is_null());
    }

    #[test]
    fn test_post_process_request() {
        let source = "void mainImage(out vec4 fragColor, in vec2 fragCoord) {\n    fragColor = vec4(1.0);\n}";
        let input = request(5, "postProcess", Some(json!({ "source": source, "stepEdge": 0.5 })));
        let out = serve(&input);

        let program = out[0]["body"]["program"].as_str().unwrap();
        assert!(program.contains("fragColor = vec4(step(vec3(0.5), fragColor.rgb), 1.0);"));
    }

    #[test]
    fn test_missing_and_malformed_arguments() {
        let input = format!(
            "{}{}",
            request(1, "debugLine", None),
            request(2, "functionContext", Some(json!({ "debugLine": "three" })))
        );
        let out = serve(&input);

        assert_eq!(out.len(), 2);
        assert_eq!(out[0]["success"], false);
        assert!(out[0]["message"].as_str().unwrap().contains("missing its arguments"));
        assert_eq!(out[1]["success"], false);
        assert_eq!(out[1]["request_seq"], 2);
    }

    #[test]
    fn test_unknown_command_is_refused() {
        let out = serve(&request(1, "launch", None));
        assert_eq!(out[0]["success"], false);
        assert_eq!(out[0]["command"], "launch");
    }

    #[test]
    fn test_unreadable_frame_is_skipped() {
        let input = format!(
            "Content-Length: 5\r\n\r\nhello{}",
            request(2, "initialize", None)
        );
        let out = serve(&input);
        assert_eq!(out[0]["request_seq"], 2);
    }

    #[test]
    fn test_disconnect_stops_the_loop() {
        let input = format!(
            "{}{}",
            request(1, "disconnect", None),
            request(2, "initialize", None)
        );
        let out = serve(&input);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0]["command"], "disconnect");
        assert_eq!(out[0]["success"], true);
    }
}
