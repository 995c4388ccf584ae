//! Structured build instructions.
//!
//! Blocks produce [`Instruction`] values rather than text. Rendering to the
//! manifest syntax happens once, in the emitter, through [`fmt::Display`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::block::BlockId;
use crate::macros::CacheMount;
use crate::shell::{ShellCommand, escape_substitution, quote};

/// One build instruction.
///
/// Values stored here are already in their final, quoted form. Use the
/// constructor functions to build them from raw values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// `FROM <image> [AS <stage>]`
    From {
        /// Image reference.
        image: String,
        /// Optional stage name.
        stage: Option<String>,
    },
    /// `LABEL <key>=<value>`
    Label {
        /// Label key.
        key: String,
        /// Label value.
        value: String,
    },
    /// `ARG <name>[=<default>]`
    Arg {
        /// Argument name.
        name: String,
        /// Default value.
        default: Option<String>,
    },
    /// `ENV <name>=<value>`
    Env {
        /// Variable name.
        name: String,
        /// Variable value.
        value: String,
    },
    /// `RUN [--mount=...] <command>`
    Run {
        /// Cache mount attached to the command.
        cache: Option<CacheMount>,
        /// Shell command body.
        command: String,
    },
    /// `COPY [--chown=<owner>] <src> <dest>`
    Copy {
        /// Owner applied to copied files.
        chown: Option<String>,
        /// Source, relative to the build context.
        src: String,
        /// Destination, relative to the working directory.
        dest: String,
    },
    /// `WORKDIR <path>`
    Workdir(String),
    /// `EXPOSE <port>`
    Expose(u16),
    /// `USER <name>`
    User(String),
    /// `ENTRYPOINT ["arg", ...]` in exec form.
    Entrypoint(Vec<String>),
    /// Pre-rendered text, used for block overrides.
    Raw(String),
}

impl Instruction {
    /// `LABEL` with a quoted key and value.
    #[must_use]
    pub fn label(key: &str, value: &str) -> Self {
        Self::Label {
            key: quote(key).into_owned(),
            value: quote(value).into_owned(),
        }
    }

    /// `ARG` with an optional quoted default.
    #[must_use]
    pub fn arg(name: &str, default: Option<&str>) -> Self {
        Self::Arg {
            name: name.to_owned(),
            default: default.map(|value| quote(value).into_owned()),
        }
    }

    /// `ENV` with a quoted literal value.
    #[must_use]
    pub fn env(name: &str, value: &str) -> Self {
        Self::Env {
            name: name.to_owned(),
            value: quote(value).into_owned(),
        }
    }

    /// `ENV NAME=${NAME}`, exposing a build argument at runtime.
    #[must_use]
    pub fn env_from_arg(name: &str) -> Self {
        Self::Env {
            name: name.to_owned(),
            value: format!("${{{name}}}"),
        }
    }

    /// Build argument plus runtime environment variable of the same name.
    #[must_use]
    pub fn declare(name: &str, default: Option<&str>) -> [Self; 2] {
        [Self::arg(name, default), Self::env_from_arg(name)]
    }

    /// `RUN` with no cache mount.
    #[must_use]
    pub fn run(command: ShellCommand) -> Self {
        Self::Run {
            cache: None,
            command: command.into_string(),
        }
    }

    /// `WORKDIR` with variable substitution escaped.
    #[must_use]
    pub fn workdir(path: &str) -> Self {
        Self::Workdir(escape_substitution(path).into_owned())
    }

    /// `COPY --chown=<owner>` with quoted paths.
    #[must_use]
    pub fn copy_owned(owner: &str, src: &str, dest: &str) -> Self {
        Self::Copy {
            chown: Some(owner.to_owned()),
            src: quote(src).into_owned(),
            dest: quote(dest).into_owned(),
        }
    }

    /// The instruction keyword, or `None` for raw text.
    #[must_use]
    pub const fn keyword(&self) -> Option<&'static str> {
        match self {
            Self::From { .. } => Some("FROM"),
            Self::Label { .. } => Some("LABEL"),
            Self::Arg { .. } => Some("ARG"),
            Self::Env { .. } => Some("ENV"),
            Self::Run { .. } => Some("RUN"),
            Self::Copy { .. } => Some("COPY"),
            Self::Workdir(_) => Some("WORKDIR"),
            Self::Expose(_) => Some("EXPOSE"),
            Self::User(_) => Some("USER"),
            Self::Entrypoint(_) => Some("ENTRYPOINT"),
            Self::Raw(_) => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::From { image, stage } => match stage {
                Some(stage) => write!(f, "FROM {image} AS {stage}"),
                None => write!(f, "FROM {image}"),
            },
            Self::Label { key, value } => write!(f, "LABEL {key}={value}"),
            Self::Arg { name, default } => match default {
                Some(default) => write!(f, "ARG {name}={default}"),
                None => write!(f, "ARG {name}"),
            },
            Self::Env { name, value } => write!(f, "ENV {name}={value}"),
            Self::Run { cache, command } => match cache {
                Some(cache) => write!(f, "RUN {cache} {command}"),
                None => write!(f, "RUN {command}"),
            },
            Self::Copy { chown, src, dest } => match chown {
                Some(owner) => write!(f, "COPY --chown={owner} {src} {dest}"),
                None => write!(f, "COPY {src} {dest}"),
            },
            Self::Workdir(path) => write!(f, "WORKDIR {path}"),
            Self::Expose(port) => write!(f, "EXPOSE {port}"),
            Self::User(name) => write!(f, "USER {name}"),
            Self::Entrypoint(args) => {
                let encoded = args
                    .iter()
                    .map(serde_json::to_string)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|_| fmt::Error)?;
                write!(f, "ENTRYPOINT [{}]", encoded.join(", "))
            }
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// An instruction together with the block that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedInstruction {
    /// Originating block.
    pub block: BlockId,
    /// The instruction itself.
    pub instruction: Instruction,
}

/// Serializable view of a tagged instruction, used for machine-readable plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRecord {
    /// Originating block.
    pub block: BlockId,
    /// Rendered instruction text.
    pub text: String,
}

impl From<&TaggedInstruction> for InstructionRecord {
    fn from(tagged: &TaggedInstruction) -> Self {
        Self {
            block: tagged.block,
            text: tagged.instruction.to_string(),
        }
    }
}
