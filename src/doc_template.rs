//! `{name}` / `{0}` / `{}` substitution for help and documentation strings.
//!
//! ```
//! use auto_lims::doc_template::{render, TemplateArgs};
//!
//! let args = TemplateArgs::new().named("file", "series.csv");
//! assert_eq!(
//!     render("usage: {file} --tests", &args).unwrap(),
//!     "usage: series.csv --tests"
//! );
//! ```

use std::collections::BTreeMap;

use crate::error::PlotError;

/// Values available to a template.
#[derive(Debug, Clone, Default)]
pub struct TemplateArgs {
    positional: Vec<String>,
    named: BTreeMap<String, String>,
}

impl TemplateArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positional(mut self, value: impl ToString) -> Self {
        self.positional.push(value.to_string());
        self
    }

    pub fn named(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.named.insert(key.into(), value.to_string());
        self
    }
}

/// Substitute every placeholder of `template`.
///
/// `{{` and `}}` are literal braces. A placeholder without a matching value,
/// or a stray brace, is a [`PlotError::Format`].
pub fn render(template: &str, args: &TemplateArgs) -> Result<String, PlotError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    let mut next_auto = 0usize;

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '}' => {
                return Err(PlotError::Format(
                    "single '}' encountered in template".to_string(),
                ))
            }
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(PlotError::Format(
                                "unmatched '{' in template".to_string(),
                            ))
                        }
                        Some(ch) => key.push(ch),
                    }
                }
                out.push_str(lookup(key.trim(), args, &mut next_auto)?);
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn lookup<'a>(key: &str, args: &'a TemplateArgs, next_auto: &mut usize) -> Result<&'a str, PlotError> {
    if key.is_empty() {
        let idx = *next_auto;
        *next_auto += 1;
        return args
            .positional
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| PlotError::Format(format!("no positional value for {{}} #{idx}")));
    }
    if let Ok(idx) = key.parse::<usize>() {
        return args
            .positional
            .get(idx)
            .map(String::as_str)
            .ok_or_else(|| PlotError::Format(format!("no positional value for index {idx}")));
    }
    args.named
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| PlotError::Format(format!("no value supplied for key '{key}'")))
}
