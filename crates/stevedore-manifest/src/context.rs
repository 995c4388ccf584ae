//! Value resolution: [`Specification`] to [`RenderContext`].
//!
//! Every default is applied here, field by field, so that blocks never
//! see an absent value. Resolution reads nothing but its input.

use std::collections::{BTreeMap, HashSet};

use stevedore_common::constants::{
    DEFAULT_FRONTEND, DEFAULT_METRICS_PORT, ENV_CACHE_DIR, ENV_CONTAINERIZED, ENV_HOME,
    ENV_INSTALL_PATH, ENV_PATH, ENV_VIRTUAL_ENV, INSTALLER_ENV, LOCALE_ENV,
};
use stevedore_common::error::{Result, StevedoreError};
use stevedore_common::types::{EnvDeclaration, Specification};

/// Environment names the standard blocks set themselves.
const RESERVED_ENV_NAMES: [&str; 6] = [
    ENV_INSTALL_PATH,
    ENV_HOME,
    ENV_CACHE_DIR,
    ENV_CONTAINERIZED,
    ENV_VIRTUAL_ENV,
    ENV_PATH,
];

fn is_reserved_env(name: &str) -> bool {
    RESERVED_ENV_NAMES.contains(&name)
        || LOCALE_ENV.iter().any(|(reserved, _)| *reserved == name)
        || INSTALLER_ENV.iter().any(|(reserved, _)| *reserved == name)
}

/// Longest account name accepted by common user-management tools.
const MAX_USER_NAME_LEN: usize = 32;

/// Resolved, read-only bindings for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct RenderContext {
    /// Base image reference.
    pub base_image: String,
    /// Service user name.
    pub user: String,
    /// Numeric user id.
    pub uid: u32,
    /// Numeric group id.
    pub gid: u32,
    /// Installation path, absolute.
    pub install_path: String,
    /// Home directory, absolute.
    pub home_dir: String,
    /// Environment declarations, validated.
    pub envs: Vec<EnvDeclaration>,
    /// Commands run before dependency installation.
    pub pre_install: Vec<String>,
    /// Commands run after dependency installation.
    pub post_install: Vec<String>,
    /// Best-effort preheat packages, unvalidated.
    pub preheat: Vec<String>,
    /// OS packages.
    pub system_packages: Vec<String>,
    /// Image labels.
    pub labels: BTreeMap<String, String>,
    /// Runtime version.
    pub python_version: String,
    /// Service port.
    pub port: u16,
    /// Metrics port.
    pub metrics_port: u16,
    /// Cache-mount support.
    pub enable_buildkit: bool,
    /// Generated-file banner.
    pub emit_header: bool,
    /// Build-frontend identifier.
    pub frontend: String,
}

/// Resolves a specification into a render context.
///
/// # Errors
///
/// Returns [`StevedoreError::MissingField`] for the first required field
/// that is absent or empty, and [`StevedoreError::InvalidField`] for a
/// present value that cannot be rendered safely.
pub fn resolve(spec: &Specification) -> Result<RenderContext> {
    tracing::debug!("resolving specification");

    let base_image = required_text("base_image", spec.base_image.as_ref())?;
    let user = required_text("user", spec.user.as_ref())?;
    let uid = required("uid", spec.uid)?;
    let install_path = required_text("install_path", spec.install_path.as_ref())?;
    let home_dir = required_text("home_dir", spec.home_dir.as_ref())?;
    let python_version = required_text("python_version", spec.python_version.as_ref())?;
    let port = required("port", spec.port)?;

    if base_image.chars().any(char::is_whitespace) {
        return Err(StevedoreError::invalid(
            "base_image",
            "image reference must not contain whitespace",
        ));
    }
    check_user_name(&user)?;
    check_absolute("install_path", &install_path)?;
    check_absolute("home_dir", &home_dir)?;

    let metrics_port = spec.metrics_port.unwrap_or(DEFAULT_METRICS_PORT);
    check_ports(port, metrics_port)?;

    check_envs(&spec.envs)?;
    check_commands("pre_install", &spec.pre_install)?;
    check_commands("post_install", &spec.post_install)?;
    check_packages(&spec.system_packages)?;
    check_labels(&spec.labels)?;

    let frontend = match spec.frontend.as_deref().map(str::trim) {
        None | Some("") => DEFAULT_FRONTEND.to_owned(),
        Some(frontend) if frontend.chars().any(char::is_whitespace) => {
            return Err(StevedoreError::invalid(
                "frontend",
                "frontend identifier must not contain whitespace",
            ));
        }
        Some(frontend) => frontend.to_owned(),
    };

    Ok(RenderContext {
        base_image,
        user,
        uid,
        gid: spec.gid.unwrap_or(uid),
        install_path,
        home_dir,
        envs: spec.envs.clone(),
        pre_install: spec.pre_install.clone(),
        post_install: spec.post_install.clone(),
        preheat: spec.preheat.clone(),
        system_packages: spec.system_packages.clone(),
        labels: spec.labels.clone(),
        python_version,
        port,
        metrics_port,
        enable_buildkit: spec.enable_buildkit.unwrap_or(false),
        emit_header: spec.emit_header.unwrap_or(true),
        frontend,
    })
}

fn required<T: Copy>(field: &'static str, value: Option<T>) -> Result<T> {
    value.ok_or(StevedoreError::MissingField { field })
}

fn required_text(field: &'static str, value: Option<&String>) -> Result<String> {
    match value {
        Some(text) if !text.trim().is_empty() => {
            check_single_line(field, text)?;
            Ok(text.clone())
        }
        _ => Err(StevedoreError::MissingField { field }),
    }
}

fn check_single_line(field: &str, value: &str) -> Result<()> {
    if value.contains(['\n', '\r']) {
        return Err(StevedoreError::invalid(field, "value must be a single line"));
    }
    Ok(())
}

fn check_absolute(field: &'static str, path: &str) -> Result<()> {
    if !path.starts_with('/') {
        return Err(StevedoreError::invalid(
            field,
            format!("path must be absolute, got {path:?}"),
        ));
    }
    Ok(())
}

fn check_user_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid_start || !valid_rest || name.len() > MAX_USER_NAME_LEN {
        return Err(StevedoreError::invalid(
            "user",
            format!("{name:?} is not a valid account name"),
        ));
    }
    Ok(())
}

fn check_ports(port: u16, metrics_port: u16) -> Result<()> {
    if port == 0 {
        return Err(StevedoreError::invalid("port", "port must be non-zero"));
    }
    if metrics_port == 0 {
        return Err(StevedoreError::invalid("metrics_port", "port must be non-zero"));
    }
    if port == metrics_port {
        return Err(StevedoreError::invalid(
            "metrics_port",
            format!("metrics port must differ from service port {port}"),
        ));
    }
    Ok(())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn check_envs(envs: &[EnvDeclaration]) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, env) in envs.iter().enumerate() {
        let field = format!("envs[{index}]");
        if env.name.is_empty() {
            return Err(StevedoreError::invalid(field, "name must not be empty"));
        }
        if !is_identifier(&env.name) {
            return Err(StevedoreError::invalid(
                field,
                format!("{:?} is not a valid variable name", env.name),
            ));
        }
        if is_reserved_env(&env.name) {
            return Err(StevedoreError::invalid(
                field,
                format!("{} is declared by the generator", env.name),
            ));
        }
        if !seen.insert(env.name.as_str()) {
            return Err(StevedoreError::invalid(
                field,
                format!("duplicate variable name {}", env.name),
            ));
        }
        if let Some(value) = &env.value {
            check_single_line(&field, value)?;
        }
    }
    Ok(())
}

fn check_commands(field: &str, commands: &[String]) -> Result<()> {
    for (index, command) in commands.iter().enumerate() {
        let label = format!("{field}[{index}]");
        if command.trim().is_empty() {
            return Err(StevedoreError::invalid(label, "command must not be empty"));
        }
        check_single_line(&label, command)?;
    }
    Ok(())
}

fn check_packages(packages: &[String]) -> Result<()> {
    for (index, package) in packages.iter().enumerate() {
        let label = format!("system_packages[{index}]");
        if package.trim().is_empty() {
            return Err(StevedoreError::invalid(label, "package name must not be empty"));
        }
        if package.starts_with('-') {
            return Err(StevedoreError::invalid(
                label,
                "package name must not start with '-'",
            ));
        }
        check_single_line(&label, package)?;
    }
    Ok(())
}

fn check_labels(labels: &BTreeMap<String, String>) -> Result<()> {
    for (key, value) in labels {
        let label = format!("labels.{key}");
        if key.trim().is_empty() {
            return Err(StevedoreError::invalid("labels", "label key must not be empty"));
        }
        check_single_line(&label, key)?;
        check_single_line(&label, value)?;
    }
    Ok(())
}
