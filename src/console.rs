// 🖥️ Console - reads a line, runs it against the registry, flushes, prints
//
// Stateless between lines apart from the registry. Every command validates
// all of its arguments before touching anything, so a rejected command never
// leaves a partial change behind.

use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{self, BufRead, Write};
use thiserror::Error;

use crate::entities::{Entity, Kind};
use crate::error::CommandError;
use crate::grammar::{self, Translation};
use crate::help;
use crate::registry::Registry;
use crate::storage::Persistence;

pub const PROMPT: &str = "(hbnb) ";

/// Whether the session keeps reading after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Error)]
enum DispatchError {
    /// Printed, session continues
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Output(#[from] io::Error),

    /// Ends the session
    #[error(transparent)]
    Fatal(#[from] anyhow::Error),
}

type Outcome = std::result::Result<(), DispatchError>;

pub struct Console<S: Persistence> {
    registry: Registry,
    storage: S,
}

impl<S: Persistence> Console<S> {
    /// Start a session from whatever the storage holds
    pub fn open(storage: S) -> Result<Self> {
        let document = storage.load()?;
        let mut registry = Registry::new();
        let loaded = registry.load(&document);
        tracing::info!(loaded, "registry ready");

        Ok(Console { registry, storage })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read and run lines until `quit`, `EOF` or end of input.
    ///
    /// `prompt` is written before each read when given (interactive use).
    pub fn cmdloop<R: BufRead>(&mut self, mut input: R, out: &mut dyn Write, prompt: Option<&str>) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            if let Some(prompt) = prompt {
                write!(out, "{prompt}")?;
                out.flush()?;
            }

            buf.clear();
            if input.read_until(b'\n', &mut buf).context("Failed to read command input")? == 0 {
                writeln!(out)?;
                return Ok(());
            }

            // invalid UTF-8 becomes U+FFFD; the line still runs as a command
            let line = String::from_utf8_lossy(&buf);
            if self.onecmd(line.trim_end_matches(['\r', '\n']), out)? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Run one raw input line, in either syntax
    pub fn onecmd(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        match grammar::translate(line) {
            Translation::Blank => Ok(Flow::Continue),
            Translation::Count(kind) => {
                let count = Kind::from_name(&kind).map_or(0, |kind| self.registry.count(kind));
                writeln!(out, "{count}")?;
                Ok(Flow::Continue)
            }
            Translation::Canonical(line) => self.execute(&line, out),
        }
    }

    /// Run one canonical `<command> <args...>` line
    pub fn execute(&mut self, line: &str, out: &mut dyn Write) -> Result<Flow> {
        let (command, arg) = grammar::parse_line(line);

        let outcome = match command {
            "" if arg.is_empty() => Ok(()),
            "create" => self.create(arg, out),
            "show" => self.show(arg, out),
            "destroy" => self.destroy(arg, out),
            "all" => self.all(arg, out),
            "count" => self.count(arg, out),
            "update" => self.update(arg, out),
            "help" => help::write_help(arg, out).map_err(DispatchError::from),
            "quit" => return Ok(Flow::Exit),
            "EOF" => {
                writeln!(out)?;
                return Ok(Flow::Exit);
            }
            _ => Err(CommandError::UnknownSyntax(line.trim().to_string()).into()),
        };

        match outcome {
            Ok(()) => Ok(Flow::Continue),
            Err(DispatchError::Command(e)) => {
                writeln!(out, "{e}")?;
                Ok(Flow::Continue)
            }
            Err(DispatchError::Output(e)) => Err(e.into()),
            Err(DispatchError::Fatal(e)) => Err(e),
        }
    }

    // ========================================================================
    // COMMANDS
    // ========================================================================

    fn create(&mut self, arg: &str, out: &mut dyn Write) -> Outcome {
        let args: Vec<&str> = arg.split_whitespace().collect();
        let kind = kind_arg(&args)?;

        let entity = Entity::new(kind);
        let id = entity.id().to_string();
        self.registry.register(entity).map_err(anyhow::Error::from)?;
        self.save()?;

        writeln!(out, "{id}")?;
        Ok(())
    }

    fn show(&mut self, arg: &str, out: &mut dyn Write) -> Outcome {
        let args: Vec<&str> = arg.split_whitespace().collect();
        let (kind, id) = kind_and_id(&args)?;

        let entity = self
            .registry
            .get(&Registry::key(kind, id))
            .ok_or(CommandError::InstanceNotFound)?;

        writeln!(out, "{entity}")?;
        Ok(())
    }

    fn destroy(&mut self, arg: &str, _out: &mut dyn Write) -> Outcome {
        let args: Vec<&str> = arg.split_whitespace().collect();
        let (kind, id) = kind_and_id(&args)?;

        // unknown key: nothing removed, nothing written
        self.registry
            .remove(&Registry::key(kind, id))
            .ok_or(CommandError::InstanceNotFound)?;
        self.save()?;
        Ok(())
    }

    fn all(&mut self, arg: &str, out: &mut dyn Write) -> Outcome {
        let args: Vec<&str> = arg.split_whitespace().collect();

        let listing: Vec<String> = if args.is_empty() {
            self.registry.all().values().map(ToString::to_string).collect()
        } else {
            let kind = kind_arg(&args)?;
            self.registry.of_kind(kind).map(ToString::to_string).collect()
        };

        writeln!(out, "{}", Value::from(listing))?;
        Ok(())
    }

    fn count(&mut self, arg: &str, out: &mut dyn Write) -> Outcome {
        let args: Vec<&str> = arg.split_whitespace().collect();
        let kind = kind_arg(&args)?;

        writeln!(out, "{}", self.registry.count(kind))?;
        Ok(())
    }

    /// `update <kind> <id> <attr> <value>` or `update <kind> <id> {json}`
    fn update(&mut self, arg: &str, _out: &mut dyn Write) -> Outcome {
        let args = grammar::split_args(arg, 4);
        let (kind, id) = kind_and_id(&args)?;

        let key = Registry::key(kind, id);
        if !self.registry.contains(&key) {
            return Err(CommandError::InstanceNotFound.into());
        }

        let assignments: Vec<(String, Value)> = match grammar::json_object(arg) {
            Some(payload) => match serde_json::from_str::<Value>(payload) {
                Ok(Value::Object(pairs)) => pairs.into_iter().collect(),
                _ => return Err(CommandError::InvalidJsonPayload.into()),
            },
            None => {
                let name = args.get(2).ok_or(CommandError::MissingAttributeName)?;
                let raw = args.get(3).ok_or(CommandError::MissingAttributeValue)?;
                vec![(name.to_string(), attribute_value(raw))]
            }
        };

        let entity = self
            .registry
            .get_mut(&key)
            .ok_or(CommandError::InstanceNotFound)?;
        for (name, value) in assignments {
            entity.set_attribute(&name, value);
        }
        entity.touch();

        self.save()?;
        Ok(())
    }

    fn save(&mut self) -> Result<()> {
        self.storage.flush(&self.registry)
    }
}

// ============================================================================
// ARGUMENT VALIDATION
// ============================================================================

fn kind_arg(args: &[&str]) -> std::result::Result<Kind, CommandError> {
    let name = args.first().ok_or(CommandError::MissingClassName)?;
    Kind::from_name(name).ok_or(CommandError::UnknownClass)
}

fn kind_and_id<'a>(args: &[&'a str]) -> std::result::Result<(Kind, &'a str), CommandError> {
    let kind = kind_arg(args)?;
    let id = args.get(1).copied().ok_or(CommandError::MissingIdentifier)?;
    Ok((kind, id))
}

/// Quoted text is taken verbatim; otherwise the first token is coerced
fn attribute_value(raw: &str) -> Value {
    match grammar::leading_quoted(raw) {
        Some(text) => Value::String(text.to_string()),
        None => grammar::coerce_value(raw.split_whitespace().next().unwrap_or(raw)),
    }
}

// ============================================================================
// TESTS
// ============================================================================
