//! Trap script parser.
//!
//! A trap script drives the emulator the way a guest program would: it
//! places data in guest memory and raises traps. One command per line,
//! `#` starts a comment, numbers are hex (`0x`) or decimal.
//!
//! ```text
//! poke 0x1000 "hello\n"     # store bytes in guest memory
//! ecall write 1 0x1000 6    # machine ECALL, syscall by name or number
//! expect a0 0               # check the result of the previous trap
//! trap 2                    # any other cause (illegal instruction)
//! ```

use std::path::Path;

use rvsys_isa::{Syscall, TrapContext};
use thiserror::Error;

use crate::config::parse_u32;

/// Script parse error.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command `{name}`")]
    UnknownCommand { line: usize, name: String },
    #[error("line {line}: missing {what}")]
    MissingArgument { line: usize, what: &'static str },
    #[error("line {line}: unexpected argument `{token}`")]
    TrailingArgument { line: usize, token: String },
    #[error("line {line}: {message}")]
    InvalidNumber { line: usize, message: String },
    #[error("line {line}: unknown syscall `{name}`")]
    UnknownSyscall { line: usize, name: String },
    #[error("line {line}: unterminated string")]
    UnterminatedString { line: usize },
    #[error("line {line}: invalid escape `\\{escape}`")]
    InvalidEscape { line: usize, escape: char },
    #[error("line {line}: expected {what}")]
    Expected { line: usize, what: &'static str },
}

/// Syscall selector of an `ecall` line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyscallSpec {
    Known(Syscall),
    /// A number with no handler, to exercise the unhandled path.
    Raw(u32),
}

impl SyscallSpec {
    #[must_use]
    pub const fn number(self) -> u32 {
        match self {
            Self::Known(sys) => sys.number(),
            Self::Raw(num) => num,
        }
    }
}

/// One script command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Poke { addr: u32, bytes: Vec<u8> },
    Ecall {
        syscall: SyscallSpec,
        args: [u32; 3],
    },
    Trap { mcause: u32, mepc: Option<u32> },
    ExpectA0(u32),
}

impl Command {
    /// Trap context for commands that raise a trap at `pc`.
    #[must_use]
    pub const fn trap_context(&self, pc: u32) -> Option<TrapContext> {
        match *self {
            Self::Ecall { syscall, args } => Some(TrapContext::ecall(
                pc,
                syscall.number(),
                args[0],
                args[1],
                args[2],
            )),
            Self::Trap { mcause, mepc } => {
                let mepc = match mepc {
                    Some(mepc) => mepc,
                    None => pc,
                };
                Some(TrapContext::new(mcause, mepc, [0; 8]))
            }
            Self::Poke { .. } | Self::ExpectA0(_) => None,
        }
    }
}

/// Parsed script: commands tagged with their 1-based line number.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    pub commands: Vec<(usize, Command)>,
}

impl Script {
    /// Parse script source.
    ///
    /// # Errors
    ///
    /// Returns the first malformed line.
    pub fn parse(src: &str) -> Result<Self, ScriptError> {
        let mut commands = Vec::new();
        for (idx, text) in src.lines().enumerate() {
            let line = idx + 1;
            let tokens = tokenize(text, line)?;
            if let Some(command) = parse_command(&tokens, line)? {
                commands.push((line, command));
            }
        }
        Ok(Self { commands })
    }

    /// Read and parse a script file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not parse.
    pub fn from_file(path: &Path) -> crate::Result<Self> {
        let src = std::fs::read_to_string(path)?;
        Ok(Self::parse(&src)?)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Word(String),
    Str(Vec<u8>),
}

fn tokenize(text: &str, line: usize) -> Result<Vec<Token>, ScriptError> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '#' {
            break;
        } else if c == '"' {
            chars.next();
            let mut bytes = Vec::new();
            loop {
                match chars.next() {
                    None => return Err(ScriptError::UnterminatedString { line }),
                    Some('"') => break,
                    Some('\\') => {
                        let byte = match chars.next() {
                            Some('n') => b'\n',
                            Some('t') => b'\t',
                            Some('r') => b'\r',
                            Some('0') => 0,
                            Some('\\') => b'\\',
                            Some('"') => b'"',
                            Some(escape) => return Err(ScriptError::InvalidEscape { line, escape }),
                            None => return Err(ScriptError::UnterminatedString { line }),
                        };
                        bytes.push(byte);
                    }
                    Some(ch) => {
                        let mut buf = [0; 4];
                        let encoded = ch.encode_utf8(&mut buf);
                        bytes.extend_from_slice(encoded.as_bytes());
                    }
                }
            }
            tokens.push(Token::Str(bytes));
        } else {
            let mut word = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() || ch == '#' || ch == '"' {
                    break;
                }
                word.push(ch);
                chars.next();
            }
            tokens.push(Token::Word(word));
        }
    }
    Ok(tokens)
}

/// Cursor over the arguments of one line.
struct Args<'a> {
    tokens: std::slice::Iter<'a, Token>,
    line: usize,
}

impl Args<'_> {
    fn word(&mut self, what: &'static str) -> Result<&str, ScriptError> {
        match self.tokens.next() {
            Some(Token::Word(word)) => Ok(word),
            Some(Token::Str(_)) => Err(ScriptError::Expected {
                line: self.line,
                what,
            }),
            None => Err(ScriptError::MissingArgument {
                line: self.line,
                what,
            }),
        }
    }

    fn number(&mut self, what: &'static str) -> Result<u32, ScriptError> {
        let line = self.line;
        let word = self.word(what)?;
        parse_u32(word).map_err(|message| ScriptError::InvalidNumber { line, message })
    }

    fn optional_number(&mut self, what: &'static str) -> Result<Option<u32>, ScriptError> {
        if self.tokens.as_slice().is_empty() {
            return Ok(None);
        }
        self.number(what).map(Some)
    }

    fn string(&mut self, what: &'static str) -> Result<Vec<u8>, ScriptError> {
        match self.tokens.next() {
            Some(Token::Str(bytes)) => Ok(bytes.clone()),
            Some(Token::Word(_)) => Err(ScriptError::Expected {
                line: self.line,
                what,
            }),
            None => Err(ScriptError::MissingArgument {
                line: self.line,
                what,
            }),
        }
    }

    fn finish(mut self) -> Result<(), ScriptError> {
        match self.tokens.next() {
            None => Ok(()),
            Some(Token::Word(token)) => Err(ScriptError::TrailingArgument {
                line: self.line,
                token: token.clone(),
            }),
            Some(Token::Str(bytes)) => Err(ScriptError::TrailingArgument {
                line: self.line,
                token: format!("\"{}\"", String::from_utf8_lossy(bytes)),
            }),
        }
    }
}

fn parse_command(tokens: &[Token], line: usize) -> Result<Option<Command>, ScriptError> {
    let Some((head, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let Token::Word(name) = head else {
        return Err(ScriptError::Expected {
            line,
            what: "a command",
        });
    };
    let mut args = Args {
        tokens: rest.iter(),
        line,
    };

    let command = match name.as_str() {
        "poke" => {
            let addr = args.number("address")?;
            let bytes = args.string("quoted string")?;
            Command::Poke { addr, bytes }
        }
        "ecall" => {
            let selector = args.word("syscall")?;
            let syscall = parse_syscall(selector, line)?;
            let mut values = [0; 3];
            for value in &mut values {
                match args.optional_number("argument")? {
                    Some(v) => *value = v,
                    None => break,
                }
            }
            Command::Ecall {
                syscall,
                args: values,
            }
        }
        "trap" => {
            let mcause = args.number("mcause")?;
            let mepc = args.optional_number("mepc")?;
            Command::Trap { mcause, mepc }
        }
        "expect" => {
            let reg = args.word("register")?;
            if reg != "a0" {
                return Err(ScriptError::Expected { line, what: "a0" });
            }
            Command::ExpectA0(args.number("value")?)
        }
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                name: other.to_string(),
            });
        }
    };
    args.finish()?;
    Ok(Some(command))
}

fn parse_syscall(selector: &str, line: usize) -> Result<SyscallSpec, ScriptError> {
    if let Some(sys) = Syscall::from_name(selector) {
        return Ok(SyscallSpec::Known(sys));
    }
    if selector.starts_with(|c: char| c.is_ascii_digit()) {
        let num = parse_u32(selector)
            .map_err(|message| ScriptError::InvalidNumber { line, message })?;
        let spec = match Syscall::from_number(num) {
            Some(sys) => SyscallSpec::Known(sys),
            None => SyscallSpec::Raw(num),
        };
        return Ok(spec);
    }
    Err(ScriptError::UnknownSyscall {
        line,
        name: selector.to_string(),
    })
}
