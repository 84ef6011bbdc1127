mod assemble;
mod braces;
mod capping;
mod edits;
mod params;
mod postprocess;
mod shadow;
mod visualize;

pub use assemble::{
    rewrite_return, rewrite_return_type, truncate_main_image, wrap_full_function_for_debugging,
    wrap_function_for_debugging, wrap_one_liner_for_debugging, ProbeSite, ENTRY_HEADER,
    VALUE_NAME,
};
pub use braces::{close_open_braces, open_brace_count};
pub use capping::{cap_loop_iterations, counter_name, plan_loop_caps};
pub use edits::LineEdits;
pub use params::{
    default_argument, default_param_mode, generate_default_parameters, generate_function_call,
    get_default_custom_value, get_uv_value, uv_setup_line, ParamMode, UV_NAME,
};
pub use postprocess::apply_output_post_processing;
pub use shadow::{insert_shadow_variable, plan_shadow_variable, shadow_name};
pub use visualize::{
    generate_return_statement_for_var, glsl_float, normalize_expr, step_statement,
    visualize_into, NormalizeMode, Visualization, FRAG_COORD, OUTPUT_COLOR,
};
