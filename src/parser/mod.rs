mod functions;
mod lines;
mod loops;
mod scope;
mod shapes;
mod types;

pub use functions::{
    find_enclosing_function, find_main_image_start, parse_function_header, parse_params,
    EntrySignature, FunctionHeader, ENTRY_FUNCTION,
};
pub(crate) use functions::find_entry_function;
pub use lines::{
    brace_delta, closing_brace, code_lines, code_of, continues_onto_next, indent_of,
    references_identifier, statement_end, statement_start, STATEMENT_LOOKAHEAD,
    STATEMENT_LOOKBACK,
};
pub use loops::{containing_loops, enumerate_loops, extract_loops, is_loop_header};
pub(crate) use loops::enumerate_loops_in;
pub use scope::{build_variable_type_map, parse_declaration, Declaration};
pub use shapes::{
    classify_line, detect_variable_and_type, detect_variable_at, LineShape, RETURN_VALUE_NAME,
};
pub use types::{
    FunctionInfo, GlslType, LoopInfo, Param, ParamQualifier, TypeEnv, TypeShape, VarInfo,
};
