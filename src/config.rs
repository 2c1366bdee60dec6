use serde_derive::Deserialize;
use serde_derive::Serialize;

use log::error;
use std::fs::File;
use std::io::prelude::*;

/// 服务器运行配置。
///
/// 从 TOML 配置文件载入；`file_root` 是 `/files/` 端点解析文件名的根目录，
/// 在启动时注入，之后只读共享给各连接任务。
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_port")]
    port: u16,
    #[serde(default = "default_local")]
    local: bool,
    #[serde(default = "default_file_root")]
    file_root: String,
}

fn default_port() -> u16 {
    4221
}

fn default_local() -> bool {
    true
}

fn default_file_root() -> String {
    "files".to_string()
}

impl Config {
    pub fn new() -> Self {
        Self {
            port: default_port(),
            local: default_local(),
            file_root: default_file_root(),
        }
    }

    /// 构造一个指定文件根目录的配置，其余字段取默认值。主要用于测试。
    pub fn with_file_root(file_root: &str) -> Self {
        Self {
            file_root: file_root.to_string(),
            ..Self::new()
        }
    }

    pub fn from_toml(filename: &str) -> Self {
        let mut file = match File::open(filename) {
            Ok(f) => f,
            Err(e) => panic!("no such file {} exception:{}", filename, e),
        };
        let mut str_val = String::new();
        match file.read_to_string(&mut str_val) {
            Ok(s) => s,
            Err(e) => panic!("Error Reading file: {}", e),
        };

        match toml::from_str(&str_val) {
            Ok(t) => t,
            Err(_) => {
                error!("无法成功从配置文件构建配置对象，使用默认配置");
                Config::new()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn local(&self) -> bool {
        self.local
    }

    pub fn file_root(&self) -> &str {
        &self.file_root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::new();

        assert_eq!(config.port(), 4221);
        assert!(config.local());
        assert_eq!(config.file_root(), "files");
    }

    #[test]
    fn test_with_file_root() {
        let config = Config::with_file_root("/tmp/data");

        assert_eq!(config.file_root(), "/tmp/data");
        assert_eq!(config.port(), 4221);
    }

    #[test]
    fn test_from_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "port = 8080").unwrap();
        writeln!(file, "local = false").unwrap();
        writeln!(file, "file_root = \"/srv/files\"").unwrap();

        let config = Config::from_toml(path.to_str().unwrap());

        assert_eq!(config.port(), 8080);
        assert!(!config.local());
        assert_eq!(config.file_root(), "/srv/files");
    }

    /// 字段缺失时落回默认值
    #[test]
    fn test_from_toml_partial() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "port = 9999").unwrap();

        let config = Config::from_toml(path.to_str().unwrap());

        assert_eq!(config.port(), 9999);
        assert!(config.local());
        assert_eq!(config.file_root(), "files");
    }

    /// 配置文件无法解析时使用默认配置
    #[test]
    fn test_from_toml_invalid_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let config = Config::from_toml(path.to_str().unwrap());

        assert_eq!(config.port(), 4221);
    }

    #[test]
    #[should_panic(expected = "no such file")]
    fn test_from_toml_missing_file_panics() {
        Config::from_toml("definitely/not/a/file.toml");
    }
}
