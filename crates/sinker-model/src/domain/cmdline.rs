use serde::{Deserialize, Serialize};

/// Command-line options the sinker was started with (`/api/v1/cmdline`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CmdLine {
    pub log_level: String,
    pub log_paths: String,
    #[serde(rename = "HTTPHost")]
    pub http_host: String,
    #[serde(rename = "HTTPPort")]
    pub http_port: u16,
    pub local_cfg_file: String,
    pub nacos_addr: String,
    #[serde(rename = "NacosNamespaceID")]
    pub nacos_namespace_id: String,
    pub nacos_group: String,
    pub nacos_username: String,
    pub nacos_password: String,
    #[serde(rename = "NacosDataID")]
    pub nacos_data_id: String,
    pub nacos_service_name: String,
}

/// Where the sinker loads its configuration from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource<'a> {
    /// Local file path.
    Local(&'a str),
    /// Remote Nacos namespace.
    Remote {
        addr: Option<&'a str>,
        namespace: Option<&'a str>,
    },
}

impl CmdLine {
    pub fn config_source(&self) -> ConfigSource<'_> {
        let local = self.local_cfg_file.trim();
        if !local.is_empty() {
            return ConfigSource::Local(&self.local_cfg_file);
        }
        ConfigSource::Remote {
            addr: non_empty(&self.nacos_addr),
            namespace: non_empty(&self.nacos_namespace_id),
        }
    }
}

fn non_empty(s: &str) -> Option<&str> {
    if s.is_empty() { None } else { Some(s) }
}
