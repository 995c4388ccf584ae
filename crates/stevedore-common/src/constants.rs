//! System-wide constants and default values.

/// Build-frontend identifier used when the specification names none.
pub const DEFAULT_FRONTEND: &str = "docker/dockerfile:1.4-labs";

/// Metrics port exposed when the specification names none.
pub const DEFAULT_METRICS_PORT: u16 = 3001;

/// Stage name given to the base image.
pub const BASE_STAGE: &str = "base-container";

/// Banner emitted at the top of generated manifests.
pub const HEADER_BANNER: [&str; 5] = [
    "# ===========================================",
    "#",
    "# THIS IS A GENERATED DOCKERFILE. DO NOT EDIT",
    "#",
    "# ===========================================",
];

/// Locale and encoding environment declared right after the base image.
pub const LOCALE_ENV: [(&str, &str); 4] = [
    ("LANG", "C.UTF-8"),
    ("LC_ALL", "C.UTF-8"),
    ("PYTHONIOENCODING", "UTF-8"),
    ("PYTHONUNBUFFERED", "1"),
];

/// Environment variable carrying the installation path.
pub const ENV_INSTALL_PATH: &str = "SERVICE_PATH";
/// Environment variable carrying the service home directory.
pub const ENV_HOME: &str = "SERVICE_HOME";
/// Environment variable carrying the derived cache directory.
pub const ENV_CACHE_DIR: &str = "SERVICE_CACHE_DIR";
/// Environment variable marking the process as containerized.
pub const ENV_CONTAINERIZED: &str = "SERVICE_CONTAINERIZED";

/// Environment variable naming the active virtual environment.
pub const ENV_VIRTUAL_ENV: &str = "VIRTUAL_ENV";
/// Executable search path, extended with the virtual environment.
pub const ENV_PATH: &str = "PATH";

/// Installer settings declared once the virtual environment exists.
pub const INSTALLER_ENV: [(&str, &str); 3] = [
    ("UV_COMPILE_BYTECODE", "1"),
    ("UV_LINK_MODE", "copy"),
    ("UV_PYTHON_DOWNLOADS", "0"),
];

/// Cache directory, relative to the installation path.
pub const CACHE_DIR_SUFFIX: &str = "cache";
/// Build-support assets, relative to the build context and install path.
pub const SUPPORT_ASSETS_DIR: &str = "env/docker";
/// Python dependency assets, relative to the build context and install path.
pub const PYTHON_ASSETS_DIR: &str = "env/python";
/// Dependency manifest, relative to the installation path.
pub const REQUIREMENTS_FILE: &str = "env/python/requirements.txt";
/// Entrypoint script, relative to the installation path.
pub const ENTRYPOINT_SCRIPT: &str = "env/docker/entrypoint.sh";
/// Virtual environment, relative to the home directory.
pub const VENV_DIR: &str = ".venv";
/// Managed interpreter installs, relative to the home directory.
pub const PYTHON_INSTALL_DIR: &str = ".python";

/// Package-manager bootstrap tool ensured present before installs.
pub const BOOTSTRAP_TOOL: &str = "uv";
/// Cache directory mounted for package-manager downloads.
pub const PACKAGE_CACHE_DIR: &str = "/root/.cache/uv";
/// Cache directory mounted for system package downloads.
pub const SYSTEM_PACKAGE_CACHE_DIR: &str = "/var/cache/apt";
