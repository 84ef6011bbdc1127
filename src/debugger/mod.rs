mod context;
mod orchestrator;
mod request;

pub use context::{extract_function_context, FunctionContext, ParameterContext};
pub use orchestrator::{choose_path, debug_shader, modify_shader_for_debugging, DebugPath};
pub use request::DebugRequest;
