//! In-process tools that need no installation
//!
//! | Tool | Arguments | Does |
//! |------|-----------|------|
//! | `anvil/echo` | words... | prints the words separated by spaces |
//! | `anvil/mkdirs` | paths... | creates directories and their parents |
//! | `anvil/checksum` | `[--algorithm SHA-512] files...` | prints `<digest>  <file>` per file |

use std::io::Write;
use std::path::Path;

use anvil_domain::{Tool, ToolFinder, ToolIdentifier, ToolTable, from_fn};

use crate::fetch::checksum::{DigestAlgorithm, digest_file};

pub const BUILTIN_NAMESPACE: &str = "anvil";
pub const BUILTIN_TAG: &str = "builtin";

/// Exit code for malformed arguments
const USAGE: i32 = 2;

/// Finder over the built-in tools
#[derive(Debug, Clone)]
pub struct BuiltinFinder {
    table: ToolTable,
}

impl BuiltinFinder {
    pub fn new() -> Self {
        let tool = |nickname: &str, run: fn(&mut dyn Write, &mut dyn Write, &[String]) -> i32| {
            ToolIdentifier::new(BUILTIN_NAMESPACE, nickname, None)
                .map(|id| Tool::new(id, from_fn(run)).with_tag(BUILTIN_TAG))
        };
        let table = [
            tool("echo", echo),
            tool("mkdirs", mkdirs),
            tool("checksum", checksum),
        ]
        .into_iter()
        .flatten()
        .collect();
        Self { table }
    }
}

impl Default for BuiltinFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolFinder for BuiltinFinder {
    fn find(&self, name: &str) -> Option<Tool> {
        self.table.find(name)
    }

    fn tools(&self) -> Vec<Tool> {
        self.table.tools()
    }
}

fn echo(out: &mut dyn Write, _err: &mut dyn Write, args: &[String]) -> i32 {
    match writeln!(out, "{}", args.join(" ")) {
        Ok(()) => 0,
        Err(_) => 1,
    }
}

fn mkdirs(_out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32 {
    let mut code = 0;
    for path in args {
        if let Err(e) = std::fs::create_dir_all(path) {
            let _ = writeln!(err, "mkdirs: {}: {}", path, e);
            code = 1;
        }
    }
    code
}

fn checksum(out: &mut dyn Write, err: &mut dyn Write, args: &[String]) -> i32 {
    let mut algorithm = DigestAlgorithm::Sha256;
    let mut files = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == "--algorithm" || arg == "-a" {
            let Some(value) = iter.next() else {
                let _ = writeln!(err, "checksum: {} needs a value", arg);
                return USAGE;
            };
            match value.parse() {
                Ok(parsed) => algorithm = parsed,
                Err(e) => {
                    let _ = writeln!(err, "checksum: {}", e);
                    return USAGE;
                }
            }
        } else {
            files.push(arg);
        }
    }
    if files.is_empty() {
        let _ = writeln!(err, "usage: checksum [--algorithm SHA-256|SHA-512] FILE...");
        return USAGE;
    }

    let mut code = 0;
    for file in files {
        match digest_file(Path::new(file), algorithm) {
            Ok(digest) => {
                let _ = writeln!(out, "{}  {}", digest, file);
            }
            Err(e) => {
                let _ = writeln!(err, "checksum: {}: {}", file, e);
                code = 1;
            }
        }
    }
    code
}
