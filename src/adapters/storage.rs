use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

fn remove_all(paths: &[PathBuf]) {
    for path in paths {
        let _ = fs::remove_file(path);
    }
}

fn stage(full_path: &Path, tmp_path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = full_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(tmp_path, data)
}

impl Storage for LocalStorage {
    async fn write_files(&self, files: Vec<(String, Vec<u8>)>) -> Result<Vec<String>> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());

        // 先把全部暫存檔寫好，任何一個失敗就全部清掉，目標檔案不動
        for (path, data) in &files {
            let full_path = Path::new(&self.base_path).join(path);
            let tmp_path = temp_sibling(&full_path);

            if let Err(e) = stage(&full_path, &tmp_path, data) {
                let mut leftovers: Vec<PathBuf> = staged.into_iter().map(|(_, tmp)| tmp).collect();
                if !tmp_path.is_dir() {
                    leftovers.push(tmp_path);
                }
                remove_all(&leftovers);
                tracing::debug!("Staging {} failed, no output file replaced", path);
                return Err(e.into());
            }
            staged.push((full_path, tmp_path));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (index, (full_path, tmp_path)) in staged.iter().enumerate() {
            if let Err(e) = fs::rename(tmp_path, full_path) {
                let leftovers: Vec<PathBuf> =
                    staged[index..].iter().map(|(_, tmp)| tmp.clone()).collect();
                remove_all(&leftovers);
                return Err(e.into());
            }
            written.push(full_path.to_string_lossy().into_owned());
        }

        Ok(written)
    }
}
