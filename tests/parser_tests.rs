use shader_debugger::parser::{
    build_variable_type_map, detect_variable_and_type, detect_variable_at, enumerate_loops,
    extract_loops, find_enclosing_function, find_main_image_start, GlslType, ParamQualifier,
    VarInfo, RETURN_VALUE_NAME,
};

fn split(source: &str) -> Vec<&str> {
    source.lines().collect()
}

const HELPER_AND_ENTRY: &str = "\
uniform float uScale;
float sdScene(vec3 p)
{
    float a = length(p) - 1.0;
    float b = p.y + 0.5;
    return min(a, b);
}

void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 uv = fragCoord / iResolution.xy;
    float d = sdScene(vec3(uv, 0.0));
    fragColor = vec4(vec3(d), 1.0);
}";

const NESTED_LOOPS: &str = "\
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    float s = 0.0;
    for (int i = 0; i < 4; i++) {
        for (int j = 0; j < 4; j++) {
            s += 1.0;
        }
    }
    for (int k = 0; k < 8; k++)
    {
        s -= 0.5;
    }
    fragColor = vec4(vec3(s), 1.0);
}";

#[cfg(test)]
mod function_tests {
    use super::*;

    #[test]
    fn test_helper_with_brace_on_next_line() {
        let lines = split(HELPER_AND_ENTRY);
        let f = find_enclosing_function(&lines, 4).expect("line 4 is inside sdScene");

        assert_eq!(f.name, "sdScene");
        assert_eq!(f.return_type, "float");
        assert_eq!(f.start, 1);
        assert_eq!(f.brace_line, 2);
        assert_eq!(f.end, 6);
        assert!(f.terminated);
        assert_eq!(f.params.len(), 1);
        assert_eq!(f.params[0].ty, "vec3");
        assert_eq!(f.params[0].name, "p");
    }

    #[test]
    fn test_parameter_list_over_two_lines() {
        let lines = split("float h(vec3 p,\n        float k) {\n    float a = k;\n    return a;\n}");
        let f = find_enclosing_function(&lines, 2).expect("line 2 is inside h");

        assert_eq!(f.name, "h");
        assert_eq!(f.start, 0);
        assert_eq!(f.brace_line, 1);
        assert_eq!(f.end, 4);
        assert_eq!(f.params.len(), 2);
        assert_eq!(f.params[0].ty, "vec3");
        assert_eq!(f.params[1].ty, "float");
        assert_eq!(f.params[1].name, "k");

        let entry = split("void mainImage(out vec4 fragColor,\n               in vec2 fragCoord)\n{\n}");
        assert_eq!(find_main_image_start(&entry), Some(0));
    }

    #[test]
    fn test_entry_function_resolution() {
        let lines = split(HELPER_AND_ENTRY);
        let f = find_enclosing_function(&lines, 10).unwrap();

        assert_eq!(f.name, "mainImage");
        assert_eq!(f.start, 8);
        assert_eq!(f.end, 12);
        assert_eq!(f.params[0].qualifier, Some(ParamQualifier::Out));
        assert_eq!(find_main_image_start(&lines), Some(8));
    }

    #[test]
    fn test_lines_between_functions_have_no_function() {
        let lines = split(HELPER_AND_ENTRY);
        assert!(find_enclosing_function(&lines, 7).is_none());
        assert!(find_enclosing_function(&lines, 0).is_none());
        assert!(find_enclosing_function(&lines, 99).is_none());
    }

    #[test]
    fn test_unterminated_body_runs_to_last_line() {
        let lines = split("void mainImage(out vec4 fragColor, in vec2 fragCoord) {\n    float a = 1.0;");
        let f = find_enclosing_function(&lines, 1).unwrap();
        assert_eq!(f.end, 1);
        assert!(!f.terminated);
    }

    #[test]
    fn test_no_entry_function() {
        let lines = split("float f(float x) {\n    return x;\n}");
        assert_eq!(find_main_image_start(&lines), None);
    }

    #[test]
    fn test_commented_header_is_ignored() {
        let lines = split("// float old(float x) {\nvec3 col = vec3(1.0);");
        assert!(find_enclosing_function(&lines, 1).is_none());
    }
}

#[cfg(test)]
mod scope_tests {
    use super::*;

    #[test]
    fn test_globals_params_and_locals() {
        let lines = split(HELPER_AND_ENTRY);
        let f = find_enclosing_function(&lines, 10).unwrap();
        let env = build_variable_type_map(&lines, 10, Some(&f));

        assert_eq!(env.get("uScale"), Some(&GlslType::Float));
        assert_eq!(env.get("fragColor"), Some(&GlslType::Vec4));
        assert_eq!(env.get("fragCoord"), Some(&GlslType::Vec2));
        assert_eq!(env.get("uv"), Some(&GlslType::Vec2));
        assert_eq!(env.get("d"), Some(&GlslType::Float));
        // Locals of another function are not visible.
        assert_eq!(env.get("a"), None);
    }

    #[test]
    fn test_later_declarations_are_invisible() {
        let lines = split(HELPER_AND_ENTRY);
        let f = find_enclosing_function(&lines, 9).unwrap();
        let env = build_variable_type_map(&lines, 9, Some(&f));

        assert!(env.contains_key("uv"));
        assert!(!env.contains_key("d"));
    }

    #[test]
    fn test_last_declaration_wins() {
        let source = "\
float g = 1.0;
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    vec2 g = fragCoord;
    vec3 later = vec3(1.0);
}";
        let lines = split(source);
        let f = find_enclosing_function(&lines, 2).unwrap();

        let env = build_variable_type_map(&lines, 2, Some(&f));
        assert_eq!(env.get("g"), Some(&GlslType::Vec2));
        assert!(!env.contains_key("later"));

        let env = build_variable_type_map(&lines, 3, Some(&f));
        assert_eq!(env.get("later"), Some(&GlslType::Vec3));
    }

    #[test]
    fn test_loop_variables_enter_scope() {
        let lines = split(NESTED_LOOPS);
        let f = find_enclosing_function(&lines, 4).unwrap();
        let env = build_variable_type_map(&lines, 4, Some(&f));

        assert_eq!(env.get("i"), Some(&GlslType::Int));
        assert_eq!(env.get("j"), Some(&GlslType::Int));
        assert!(!env.contains_key("k"));
    }
}

#[cfg(test)]
mod classify_tests {
    use super::*;

    #[test]
    fn test_declarations_come_back_as_declared() {
        let env = Default::default();
        let cases = [
            ("    float d = 1.0;", "d", GlslType::Float),
            ("vec2 p = fragCoord;", "p", GlslType::Vec2),
            ("  vec3 col = vec3(0.0); // base", "col", GlslType::Vec3),
            ("vec4 c = texture(iChannel0, uv);", "c", GlslType::Vec4),
            ("mat2 rot = mat2(1.0);", "rot", GlslType::Mat2),
            ("int n = 3;", "n", GlslType::Int),
            ("const float k = 0.25;", "k", GlslType::Float),
        ];
        for (line, name, ty) in cases {
            assert_eq!(
                detect_variable_and_type(line, &env, None),
                Some(VarInfo::new(name, ty)),
                "line: {}",
                line
            );
        }
    }

    #[test]
    fn test_mutations_need_the_name_in_scope() {
        let mut env = shader_debugger::parser::TypeEnv::new();
        assert_eq!(detect_variable_and_type("col *= 0.5;", &env, None), None);

        env.insert("col".to_string(), GlslType::Vec3);
        env.insert("i".to_string(), GlslType::Int);
        for line in ["col = vec3(1.0);", "col *= 0.5;", "col.rg += 0.1;", "col[2] = 0.0;"] {
            assert_eq!(
                detect_variable_and_type(line, &env, None),
                Some(VarInfo::new("col", GlslType::Vec3)),
                "line: {}",
                line
            );
        }
        assert_eq!(
            detect_variable_and_type("i++;", &env, None),
            Some(VarInfo::new("i", GlslType::Int))
        );
    }

    #[test]
    fn test_return_uses_function_return_type() {
        let env = Default::default();
        assert_eq!(
            detect_variable_and_type("    return min(a, b);", &env, Some("float")),
            Some(VarInfo::new(RETURN_VALUE_NAME, GlslType::Float))
        );
        assert_eq!(detect_variable_and_type("return;", &env, Some("void")), None);
        assert_eq!(detect_variable_and_type("return x;", &env, Some("void")), None);
        assert_eq!(detect_variable_and_type("return x;", &env, None), None);
    }

    #[test]
    fn test_unclassifiable_lines() {
        let env = Default::default();
        for line in [
            "",
            "// float a = 1.0;",
            "for (int i = 0; i < 4; i++) {",
            "if (d < 0.0) {",
            "}",
            "doSomething(p);",
            "#define PI 3.14159",
        ] {
            assert_eq!(detect_variable_and_type(line, &env, None), None, "line: {}", line);
        }
    }

    #[test]
    fn test_continuation_line_resolves_to_statement_start() {
        let lines = split(
            "    vec3 col = mix(vec3(0.1),\n                   vec3(0.9),\n                   0.5);",
        );
        let env = Default::default();
        let (start, var) = detect_variable_at(&lines, 2, &env, None).unwrap();
        assert_eq!(start, 0);
        assert_eq!(var, VarInfo::new("col", GlslType::Vec3));
    }
}

#[cfg(test)]
mod loop_tests {
    use super::*;

    #[test]
    fn test_indices_follow_source_order() {
        let lines = split(NESTED_LOOPS);
        let loops = enumerate_loops(&lines, 0, lines.len() - 1);

        assert_eq!(loops.len(), 3);
        assert_eq!(
            loops.iter().map(|l| (l.loop_index, l.line_number, l.end_line)).collect::<Vec<_>>(),
            vec![(0, 2, Some(6)), (1, 3, Some(5)), (2, 7, Some(10))]
        );
        assert_eq!(loops[2].brace_line, Some(8));
        assert_eq!(loops[0].header, "for (int i = 0; i < 4; i++) {");
    }

    #[test]
    fn test_containing_loops_outermost_first() {
        let lines = split(NESTED_LOOPS);
        let loops = extract_loops(&lines, 0, 4);
        assert_eq!(loops.iter().map(|l| l.loop_index).collect::<Vec<_>>(), vec![0, 1]);

        let loops = extract_loops(&lines, 0, 9);
        assert_eq!(loops.iter().map(|l| l.loop_index).collect::<Vec<_>>(), vec![2]);

        // Header and closing lines are not inside their own loop.
        assert!(extract_loops(&lines, 0, 2).is_empty());
        assert!(extract_loops(&lines, 0, 11).is_empty());
    }

    #[test]
    fn test_braceless_loop_takes_an_index() {
        let source = "\
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    float s = 0.0;
    for (int i = 0; i < 3; i++) s += 1.0;
    while (s < 10.0) {
        s *= 2.0;
    }
}";
        let lines = split(source);
        let loops = enumerate_loops(&lines, 0, lines.len() - 1);

        assert_eq!(loops.len(), 2);
        assert_eq!(loops[0].line_number, 2);
        assert_eq!(loops[0].end_line, None);
        assert_eq!(loops[1].loop_index, 1);
        assert_eq!(loops[1].line_number, 3);
        assert_eq!(loops[1].end_line, Some(5));
    }

    #[test]
    fn test_unclosed_loop_contains_nothing() {
        let source = "\
void mainImage(out vec4 fragColor, in vec2 fragCoord) {
    float s = 0.0;
    for (int i = 0; i < 3; i++) {
        s += 1.0;";
        let lines = split(source);
        let loops = enumerate_loops(&lines, 0, lines.len() - 1);
        assert_eq!(loops.len(), 1);
        assert_eq!(loops[0].end_line, None);
        assert!(extract_loops(&lines, 0, 3).is_empty());
    }

    #[test]
    fn test_do_while_close_is_not_a_header() {
        let source = "\
float f(float x) {
    do {
        x *= 0.5;
    } while (x > 1.0);
    return x;
}";
        let lines = split(source);
        assert!(enumerate_loops(&lines, 0, lines.len() - 1).is_empty());
    }
}
