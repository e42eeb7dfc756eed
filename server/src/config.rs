use anyhow::{Result, bail};

pub const DEFAULT_PAGE_SIZE: i64 = 10;

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Page size used when `pageSize` is absent or unparsable.
    pub default_page_size: i64,
    pub cors_allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_page_size: DEFAULT_PAGE_SIZE,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn new(default_page_size: i64, cors_allowed_origins: &[String]) -> Result<Self> {
        if default_page_size < 1 {
            bail!("default page size must be at least 1, got {default_page_size}");
        }
        let cors_allowed_origins = cors_allowed_origins
            .iter()
            .flat_map(|raw| raw.split(','))
            .filter_map(|s| {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
            .collect::<Vec<_>>();
        Ok(Self {
            default_page_size,
            cors_allowed_origins,
        })
    }
}
