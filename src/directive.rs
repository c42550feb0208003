//! Header-comment directives
//!
//! Scripts describe themselves with `#` comment lines near the top of the file:
//!
//! ```text
//! # LABEL: Update system
//! # SUDO: true
//! # ARG: host "Target host" "localhost"
//! ```
//!
//! Parsing is line oriented and tolerant: anything that does not match a directive exactly
//! is ignored, so a typo never makes a menu unusable.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Serialize;

static DIRECTIVE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#\s*(LABEL|SUDO|ARG):(.*)$").expect("valid regex"));

static ARG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\S+)\s+"([^"]*)"\s+"([^"]*)"$"#).expect("valid regex")
});

/// One declared positional argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgSpec {
    pub key: String,
    pub prompt: String,
    pub default: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Label(String),
    Sudo(bool),
    Arg(ArgSpec),
}

/// How a script wants to be run, recomputed right before each launch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionDirective {
    pub sudo: bool,
    pub args: Vec<ArgSpec>,
}

/// Parse a single header line. Returns `None` for ordinary and malformed lines alike.
#[must_use]
pub fn parse_line(line: &str) -> Option<Directive> {
    let line = line.trim();
    let caps = DIRECTIVE.captures(line)?;
    let value = caps[2].trim();
    let directive = match &caps[1] {
        "LABEL" if !value.is_empty() => Some(Directive::Label(value.to_string())),
        "SUDO" if value.eq_ignore_ascii_case("true") => Some(Directive::Sudo(true)),
        "SUDO" if value.eq_ignore_ascii_case("false") => Some(Directive::Sudo(false)),
        "ARG" => ARG.captures(value).map(|arg| {
            Directive::Arg(ArgSpec {
                key: arg[1].to_string(),
                prompt: arg[2].to_string(),
                default: arg[3].to_string(),
            })
        }),
        _ => None,
    };
    if directive.is_none() {
        debug!("Ignoring malformed directive: {line}");
    }
    directive
}

/// Parse every directive in `lines`, in order of appearance
pub fn parse_header<'a>(lines: impl IntoIterator<Item = &'a str>) -> Vec<Directive> {
    lines.into_iter().filter_map(parse_line).collect()
}

/// The first `LABEL` directive, if any
#[must_use]
pub fn label(directives: &[Directive]) -> Option<&str> {
    directives.iter().find_map(|d| match d {
        Directive::Label(label) => Some(label.as_str()),
        _ => None,
    })
}

impl From<&[Directive]> for ExecutionDirective {
    fn from(directives: &[Directive]) -> Self {
        let mut execution = ExecutionDirective::default();
        for directive in directives {
            match directive {
                Directive::Sudo(sudo) => execution.sudo = *sudo,
                Directive::Arg(spec) => execution.args.push(spec.clone()),
                Directive::Label(_) => {}
            }
        }
        execution
    }
}
