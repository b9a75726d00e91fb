use std::fs::File;
use std::path::{Path, PathBuf};
use std::io::{BufRead, BufReader, Result};

use super::{Metadata, Provider};

pub fn new_provider<P: AsRef<Path>>(path: P) -> Result<Box<dyn Provider>> {
    let root = path.as_ref();
    if !root.is_dir() {
        return Err(std::io::Error::new(std::io::ErrorKind::NotFound,
            format!("data directory not found: {}", root.display())));
    }
    Ok(Box::new(StdFileSystem::new(root)))
}

struct StdFileSystem {
    root: PathBuf,
}

impl StdFileSystem {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        StdFileSystem { root: root.as_ref().to_path_buf() }
    }

    fn to_fs_path(&self, path: &str) -> PathBuf {
        let mut r = PathBuf::new();
        r.push(&self.root);
        for s in path.split(['/', '\\'].as_ref()) {
            r.push(s);
        }
        r
    }
}

impl Provider for StdFileSystem {
    fn reader(&self, path: &str) -> Result<Box<dyn BufRead + Send>> {
        Ok(Box::new(BufReader::new(File::open(self.to_fs_path(path))?)))
    }

    fn metadata(&self, path: &str) -> Result<Metadata> {
        let len = self.to_fs_path(path).metadata()?.len();
        Ok(Metadata { len })
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        Some(self.to_fs_path(path)).filter(|p| p.is_file())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::prelude::*;
    use crate::fs::FileSystem;

    fn temp_dir(name: &str) -> PathBuf {
        let r = std::env::temp_dir().join(format!("hues-fs-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&r).unwrap();
        r
    }

    #[test]
    fn provider_order() {
        let dir1 = temp_dir("1");
        let dir2 = temp_dir("2");
        std::fs::create_dir_all(dir2.join("sub")).unwrap();
        std::fs::write(dir1.join("a.mul"), b"first").unwrap();
        std::fs::write(dir2.join("a.mul"), b"second").unwrap();
        std::fs::write(dir2.join("sub").join("b.mul"), b"nested").unwrap();

        let mut fs = FileSystem::new();
        fs.register_provider(new_provider(&dir1).unwrap());
        fs.register_provider(new_provider(&dir2).unwrap());

        let mut s = String::new();
        fs.reader("a.mul").unwrap().read_to_string(&mut s).unwrap();
        let resolved_a = fs.resolve("a.mul");
        let resolved_b = fs.resolve("sub\\b.mul");
        let b_len = fs.metadata("sub/b.mul").map(|m| m.len());
        let missing = fs.reader("missing.mul").err().map(|e| e.kind());
        let c_exists = fs.exists("c.mul");

        std::fs::remove_dir_all(&dir1).unwrap();
        std::fs::remove_dir_all(&dir2).unwrap();

        assert_eq!(s, "first");
        assert_eq!(resolved_a, Some(dir1.join("a.mul")));
        assert_eq!(resolved_b, Some(dir2.join("sub").join("b.mul")));
        assert_eq!(b_len.unwrap(), 6);
        assert_eq!(missing, Some(std::io::ErrorKind::NotFound));
        assert!(!c_exists);
    }

    #[test]
    fn missing_root() {
        let dir = std::env::temp_dir().join(format!("hues-fs-none-{}", std::process::id()));
        assert!(new_provider(&dir).is_err());
    }
}
