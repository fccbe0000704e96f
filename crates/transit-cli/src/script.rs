//! Replay script parsing.
//!
//! One operation per line, fields separated by whitespace:
//!
//! ```text
//! register <account> <path> [value...]
//! clear <account> <path>
//! unregister <account> <path>
//! contains <account> <path>
//! lookup <account> <path>
//! purge <account>
//! dump <account>
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use anyhow::{bail, Context};

use transit_forest::{AccountName, RemotePath};

/// One parsed script operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    Register {
        account: AccountName,
        path: RemotePath,
        value: Option<String>,
    },
    Clear {
        account: AccountName,
        path: RemotePath,
    },
    Unregister {
        account: AccountName,
        path: RemotePath,
    },
    Contains {
        account: AccountName,
        path: RemotePath,
    },
    Lookup {
        account: AccountName,
        path: RemotePath,
    },
    Purge {
        account: AccountName,
    },
    Dump {
        account: AccountName,
    },
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "register",
            Self::Clear { .. } => "clear",
            Self::Unregister { .. } => "unregister",
            Self::Contains { .. } => "contains",
            Self::Lookup { .. } => "lookup",
            Self::Purge { .. } => "purge",
            Self::Dump { .. } => "dump",
        }
    }
}

/// A step together with the 1-based line it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptLine {
    pub line: usize,
    pub step: Step,
}

/// Parse a whole script, failing on the first malformed line.
pub fn parse_script(source: &str) -> anyhow::Result<Vec<ScriptLine>> {
    let mut steps = Vec::new();
    for (idx, raw) in source.lines().enumerate() {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let step = parse_step(trimmed).with_context(|| format!("line {}: {trimmed}", idx + 1))?;
        steps.push(ScriptLine {
            line: idx + 1,
            step,
        });
    }
    Ok(steps)
}

fn parse_step(line: &str) -> anyhow::Result<Step> {
    let mut fields = line.split_whitespace();
    let Some(op) = fields.next() else {
        bail!("empty operation");
    };
    let account = match fields.next() {
        Some(raw) => AccountName::new(raw)?,
        None => bail!("{op}: missing account"),
    };

    let step = match op {
        "purge" => Step::Purge { account },
        "dump" => Step::Dump { account },
        "register" | "clear" | "unregister" | "contains" | "lookup" => {
            let path = match fields.next() {
                Some(raw) => RemotePath::new(raw)?,
                None => bail!("{op}: missing path"),
            };
            match op {
                "register" => {
                    let rest: Vec<&str> = fields.by_ref().collect();
                    let value = (!rest.is_empty()).then(|| rest.join(" "));
                    Step::Register {
                        account,
                        path,
                        value,
                    }
                }
                "clear" => Step::Clear { account, path },
                "unregister" => Step::Unregister { account, path },
                "contains" => Step::Contains { account, path },
                _ => Step::Lookup { account, path },
            }
        }
        other => bail!("unknown operation {other:?}"),
    };

    if let Some(extra) = fields.next() {
        bail!("{op}: unexpected argument {extra:?}");
    }
    Ok(step)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: &str) -> AccountName {
        AccountName::new(name).unwrap()
    }

    fn path(p: &str) -> RemotePath {
        RemotePath::new(p).unwrap()
    }

    #[test]
    fn parses_every_operation() {
        let script = "\
# warm up
register A /docs/report.txt 42
register A /docs/
clear A /docs/
unregister A /docs/report.txt

contains A /docs/
lookup A /docs/report.txt
purge A
dump A
";
        let steps = parse_script(script).unwrap();
        assert_eq!(steps.len(), 8);
        assert_eq!(steps[0].line, 2);
        assert_eq!(
            steps[0].step,
            Step::Register {
                account: account("A"),
                path: path("/docs/report.txt"),
                value: Some("42".into()),
            }
        );
        assert_eq!(
            steps[1].step,
            Step::Register {
                account: account("A"),
                path: path("/docs/"),
                value: None,
            }
        );
        let names: Vec<&str> = steps.iter().map(|s| s.step.name()).collect();
        assert_eq!(
            names,
            vec![
                "register",
                "register",
                "clear",
                "unregister",
                "contains",
                "lookup",
                "purge",
                "dump"
            ]
        );
        assert_eq!(steps[4].line, 7);
    }

    #[test]
    fn register_value_keeps_inner_spaces() {
        let steps = parse_script("register A /a.txt upload in progress").unwrap();
        match &steps[0].step {
            Step::Register { value, .. } => {
                assert_eq!(value.as_deref(), Some("upload in progress"))
            }
            other => panic!("unexpected step {other:?}"),
        }
    }

    #[test]
    fn reports_line_of_malformed_path() {
        let err = parse_script("purge A\nlookup A relative/path").unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }

    #[test]
    fn rejects_unknown_and_incomplete_operations() {
        assert!(parse_script("rename A /a /b").is_err());
        assert!(parse_script("register A").is_err());
        assert!(parse_script("purge").is_err());
        assert!(parse_script("contains A /a extra").is_err());
    }
}
