use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".budget_sim";
const HOME_ENV: &str = "BUDGET_SIM_HOME";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";
const EXPENSES_FILE: &str = "expenses.json";
const SIMULATION_FILE: &str = "simulation.json";
const TMP_SUFFIX: &str = "tmp";

/// Resolves every on-disk location used by the application.
pub struct PathResolver;

impl PathResolver {
    /// Application directory: `BUDGET_SIM_HOME` when set, `~/.budget_sim` otherwise.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }

    pub fn expenses_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(EXPENSES_FILE)
    }

    pub fn simulation_file_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SIMULATION_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Sibling staging path: `expenses.json` becomes `expenses.json.tmp`.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Writes `data` to a staging file and renames it over `path`, so a failed
/// write never truncates the previous version.
pub fn write_atomic(path: &Path, data: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    drop(file);
    fs::rename(&tmp, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_base_prefers_explicit_path() {
        let custom = PathBuf::from("/tmp/budget-sim-custom");
        assert_eq!(PathResolver::resolve_base(Some(custom.clone())), custom);
    }

    #[test]
    fn tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/data/expenses.json")),
            PathBuf::from("/data/expenses.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/raw")), PathBuf::from("/data/raw.tmp"));
    }

    #[test]
    fn write_atomic_replaces_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn data_files_live_under_data_dir() {
        let base = PathBuf::from("/srv/app");
        let data = PathResolver::data_dir_in(&base);
        assert_eq!(
            PathResolver::expenses_file_in(&data),
            PathBuf::from("/srv/app/data/expenses.json")
        );
        assert_eq!(
            PathResolver::simulation_file_in(&data),
            PathBuf::from("/srv/app/data/simulation.json")
        );
    }
}
