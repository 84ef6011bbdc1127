//! Rewrites a Shadertoy fragment shader so that the value produced on one
//! chosen line becomes the color written to the screen.

pub mod cli;
pub mod config;
pub mod debugger;
pub mod error;
pub mod logging;
pub mod parser;
pub mod server;
pub mod synth;

pub use config::Settings;
pub use debugger::{
    debug_shader, extract_function_context, modify_shader_for_debugging, DebugRequest,
    FunctionContext,
};
pub use error::{Error, Result};
pub use synth::{apply_output_post_processing, NormalizeMode};
