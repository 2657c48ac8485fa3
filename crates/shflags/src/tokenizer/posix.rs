use super::{SEPARATOR, Tokenizer};
use crate::error::{ParseError, ParseResult};
use crate::optspec::{LongOption, OptionSpec};

/// In-process reimplementation of GNU `getopt` argument permutation.
///
/// Supports clustered short options (`-xc10`), attached or detached values,
/// `--name=value`, unambiguous long-name prefixes and the `--` terminator.
#[derive(Debug, Clone, Copy, Default)]
pub struct PosixTokenizer;

impl Tokenizer for PosixTokenizer {
    fn tokenize(&self, spec: &OptionSpec, argv: &[String]) -> ParseResult<Vec<String>> {
        let longs = spec.long_options();
        let mut options: Vec<String> = Vec::new();
        let mut positionals: Vec<String> = Vec::new();

        let mut i = 0usize;
        while i < argv.len() {
            let arg = argv[i].as_str();
            i += 1;

            if arg == SEPARATOR {
                positionals.extend(argv[i..].iter().cloned());
                break;
            }

            if let Some(body) = arg.strip_prefix("--") {
                let (name, inline) = match body.split_once('=') {
                    Some((name, value)) => (name, Some(value)),
                    None => (body, None),
                };
                let opt = resolve_long(&longs, name, arg)?;
                options.push(format!("--{}", opt.name));
                match (opt.takes_value, inline) {
                    (true, Some(value)) => options.push(value.to_string()),
                    (true, None) => {
                        let value = argv.get(i).ok_or_else(|| {
                            tokenizer_error(format!(
                                "option '--{}' requires an argument",
                                opt.name
                            ))
                        })?;
                        options.push(value.clone());
                        i += 1;
                    }
                    (false, Some(_)) => {
                        return Err(tokenizer_error(format!(
                            "option '--{}' doesn't allow an argument",
                            opt.name
                        )));
                    }
                    (false, None) => {}
                }
                continue;
            }

            if let Some(cluster) = arg.strip_prefix('-').filter(|c| !c.is_empty()) {
                for (idx, c) in cluster.char_indices() {
                    let Some(takes_value) = spec.short_option(c) else {
                        return Err(tokenizer_error(format!("invalid option -- '{c}'")));
                    };
                    options.push(format!("-{c}"));
                    if !takes_value {
                        continue;
                    }
                    // The rest of the cluster, or the next argument, is the value.
                    let rest = &cluster[idx + c.len_utf8()..];
                    if !rest.is_empty() {
                        options.push(rest.to_string());
                    } else {
                        let value = argv.get(i).ok_or_else(|| {
                            tokenizer_error(format!("option requires an argument -- '{c}'"))
                        })?;
                        options.push(value.clone());
                        i += 1;
                    }
                    break;
                }
                continue;
            }

            positionals.push(arg.to_string());
        }

        tracing::debug!(
            options = options.len(),
            positionals = positionals.len(),
            "tokenized arguments"
        );
        options.push(SEPARATOR.to_string());
        options.extend(positionals);
        Ok(options)
    }
}

/// Exact match wins; otherwise a prefix must identify exactly one option.
fn resolve_long<'a>(
    longs: &'a [LongOption],
    name: &str,
    arg: &str,
) -> ParseResult<&'a LongOption> {
    if let Some(exact) = longs.iter().find(|o| o.name == name) {
        return Ok(exact);
    }
    let candidates: Vec<&LongOption> = if name.is_empty() {
        Vec::new()
    } else {
        longs.iter().filter(|o| o.name.starts_with(name)).collect()
    };
    match candidates.as_slice() {
        [only] => Ok(*only),
        [] => Err(tokenizer_error(format!("unrecognized option '{arg}'"))),
        many => {
            let names: Vec<String> = many.iter().map(|o| format!("'--{}'", o.name)).collect();
            Err(tokenizer_error(format!(
                "option '--{name}' is ambiguous; possibilities: {}",
                names.join(" ")
            )))
        }
    }
}

fn tokenizer_error(msg: String) -> ParseError {
    ParseError::Tokenizer(msg)
}
