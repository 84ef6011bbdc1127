use crate::error::{Error, Result};
use crate::synth::NormalizeMode;

/// One interactive command.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Probe a 1-based line.
    Line(usize),
    /// Show the function context of a 1-based line.
    Context(usize),
    Cap { loop_index: usize, max: u32 },
    Uncap(usize),
    Normalize(NormalizeMode),
    Step(Option<f32>),
    Param { index: usize, expr: String },
    Unparam(usize),
    Reload,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  line <n>              debug line n (1-based)
  context <n>           show function, parameters and loops around line n
  cap <loop> <n>        cap loop <loop> at n iterations
  uncap <loop>          remove a loop cap
  normalize off|soft|abs
  step <edge>|off       threshold the output color
  param <index> <expr>  override a helper argument (quote expressions with spaces)
  unparam <index>       restore the default argument
  reload                re-read the shader file
  help
  quit";

fn usage(text: &str) -> Error {
    Error::Usage(format!("usage: {}", text))
}

fn number<T: std::str::FromStr>(token: Option<&String>, text: &str) -> Result<T> {
    token
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| usage(text))
}

fn line_number(token: Option<&String>, text: &str) -> Result<usize> {
    let line: usize = number(token, text)?;
    if line == 0 {
        return Err(Error::Usage("line numbers start at 1".to_string()));
    }
    Ok(line)
}

/// Parses one input line; `Ok(None)` for blank input.
pub fn parse_command(input: &str) -> Result<Option<Command>> {
    let tokens = shlex::split(input)
        .ok_or_else(|| Error::Usage("unbalanced quotes".to_string()))?;
    let Some(word) = tokens.first() else {
        return Ok(None);
    };

    let command = match word.to_lowercase().as_str() {
        "line" | "l" => Command::Line(line_number(tokens.get(1), "line <n>")?),
        "context" | "ctx" => Command::Context(line_number(tokens.get(1), "context <n>")?),
        "cap" => Command::Cap {
            loop_index: number(tokens.get(1), "cap <loop> <n>")?,
            max: number(tokens.get(2), "cap <loop> <n>")?,
        },
        "uncap" => Command::Uncap(number(tokens.get(1), "uncap <loop>")?),
        "normalize" | "norm" => {
            let mode = tokens
                .get(1)
                .ok_or_else(|| usage("normalize off|soft|abs"))?
                .parse::<NormalizeMode>()
                .map_err(Error::Usage)?;
            Command::Normalize(mode)
        }
        "step" => match tokens.get(1).map(String::as_str) {
            Some("off") => Command::Step(None),
            _ => Command::Step(Some(number(tokens.get(1), "step <edge>|off")?)),
        },
        "param" => {
            let index = number(tokens.get(1), "param <index> <expr>")?;
            if tokens.len() < 3 {
                return Err(usage("param <index> <expr>"));
            }
            Command::Param {
                index,
                expr: tokens[2..].join(" "),
            }
        }
        "unparam" => Command::Unparam(number(tokens.get(1), "unparam <index>")?),
        "reload" => Command::Reload,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(Error::Usage(format!("unknown command '{}' (try 'help')", other))),
    };
    Ok(Some(command))
}
