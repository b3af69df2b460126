//! Integration tests for configuration file loading and environment
//! overrides.

use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use camino::Utf8PathBuf;
use rstest::rstest;
use taskkeep::config::{ConfigError, DATA_DIR_ENV, SWEEP_INTERVAL_ENV, TrackerConfig};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Guard that sets environment variables and restores them on drop.
struct EnvVarGuard {
    previous: Vec<(&'static str, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl EnvVarGuard {
    fn set_many(changes: &[(&'static str, Option<&str>)]) -> Self {
        let lock = ENV_MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut previous = Vec::with_capacity(changes.len());
        for (key, value) in changes {
            previous.push((*key, env::var_os(key)));
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(new_value) => env::set_var(key, new_value),
                    None => env::remove_var(key),
                }
            }
        }
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: the global mutex serializes environment mutations in tests.
                match value {
                    Some(previous) => env::set_var(key, previous),
                    None => env::remove_var(key),
                }
            }
        }
    }
}

fn config_path(dir: &tempfile::TempDir) -> eyre::Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(dir.path().join("taskkeep.toml"))
        .map_err(|path| eyre::eyre!("non-UTF-8 temp path: {}", path.display()))
}

#[rstest]
fn file_values_are_overridden_by_environment() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = config_path(&dir)?;
    std::fs::write(&path, "data_dir = \"from-file\"\nsweep_interval_secs = 120\n")?;
    let _guard = EnvVarGuard::set_many(&[
        (DATA_DIR_ENV, Some("from-env")),
        (SWEEP_INTERVAL_ENV, None),
    ]);

    let config = TrackerConfig::load(&path)?.with_env_overrides()?;

    eyre::ensure!(config.data_dir.as_str() == "from-env");
    eyre::ensure!(config.sweep_interval_secs == 120);
    eyre::ensure!(config.log_filter == "info");
    Ok(())
}

#[rstest]
fn out_of_range_environment_interval_is_rejected() -> eyre::Result<()> {
    let _guard = EnvVarGuard::set_many(&[
        (DATA_DIR_ENV, None),
        (SWEEP_INTERVAL_ENV, Some("0")),
    ]);

    let result = TrackerConfig::default().with_env_overrides();

    eyre::ensure!(matches!(result, Err(ConfigError::InvalidSweepInterval(0))));
    Ok(())
}

#[rstest]
fn malformed_file_is_a_parse_error() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let path = config_path(&dir)?;
    std::fs::write(&path, "sweep_interval_secs = \"often\"")?;

    let result = TrackerConfig::load(&path);

    eyre::ensure!(matches!(result, Err(ConfigError::Parse(_))));
    Ok(())
}
