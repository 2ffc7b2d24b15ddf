use crate::core::error::{ConfigError, ShipError, ShipResult, ResultExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for stackship
/// Searched in order: ship.toml, .ship.toml, .config/ship.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipConfig {
  pub site: SiteConfig,
  #[serde(default)]
  pub bootstrap: BootstrapConfig,
  #[serde(default)]
  pub upload: Option<UploadConfig>,
  #[serde(default)]
  pub publish: Option<PublishConfig>,
  #[serde(default)]
  pub products: Vec<ProductConfig>,
}

/// Build-side distribution site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
  /// Root directory releases are installed and archived under
  pub root: PathBuf,

  /// Platform component of the site layout (default: "linux")
  #[serde(default = "default_platform")]
  pub platform: String,

  /// Architecture component of the site layout (default: "x86_64")
  #[serde(default = "default_arch")]
  pub arch: String,
}

fn default_platform() -> String {
  "linux".to_string()
}

fn default_arch() -> String {
  "x86_64".to_string()
}

impl SiteConfig {
  /// Combined `<platform>-<arch>` directory component
  pub fn platform_dir(&self) -> String {
    format!("{}-{}", self.platform, self.arch)
  }
}

/// Bootstrap installer for the stack build environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapConfig {
  /// HTTPS location of the environment bootstrap installer
  #[serde(default = "default_bootstrap_url")]
  pub url: String,
}

fn default_bootstrap_url() -> String {
  "https://github.com/conda-forge/miniforge/releases/latest/download/Miniforge3-Linux-x86_64.sh".to_string()
}

impl Default for BootstrapConfig {
  fn default() -> Self {
    Self {
      url: default_bootstrap_url(),
    }
  }
}

/// Archive upload destination
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
  /// rclone destination: `remote:bucket/prefix` or a local directory
  pub dest: String,
}

/// Publish-side target (the distribution filesystem)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
  /// Root directory release trees are published under
  pub root: PathBuf,

  /// CernVM-FS repository name; a plain directory target when unset
  #[serde(default)]
  pub repo: Option<String>,

  /// Account the published tree is handed to (`user` or `user:group`)
  #[serde(default)]
  pub owner: Option<String>,

  /// How best-effort step failures are treated
  #[serde(default)]
  pub policy: FailurePolicy,
}

/// Failure policy for best-effort publish steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
  /// Report the failure and carry on
  #[default]
  Lenient,
  /// Treat the failure as fatal (open transactions are aborted)
  Strict,
}

/// A deployable product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
  /// Base product name passed to the package tool (e.g., "lsst_distrib")
  pub name: String,

  /// Distribution server the product installs from (EUPS_PKGROOT)
  pub pkgroot: String,

  /// Builder image; installs run inside `docker run` when set
  #[serde(default)]
  pub image: Option<String>,
}

impl ShipConfig {
  /// Find config file in search order: ship.toml, .ship.toml, .config/ship.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("ship.toml"),
      path.join(".ship.toml"),
      path.join(".config").join("ship.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from ship.toml (searches multiple locations)
  pub fn load(path: &Path) -> ShipResult<Self> {
    let config_path = Self::find_config_path(path).ok_or_else(|| {
      ShipError::Config(ConfigError::NotFound {
        search_root: path.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let config: ShipConfig = toml_edit::de::from_str(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    Ok(config)
  }

  /// Save config to ship.toml (default location)
  pub fn save(&self, path: &Path) -> ShipResult<()> {
    let config_path = path.join("ship.toml");
    let content = toml_edit::ser::to_string_pretty(self).context("Failed to serialize config to TOML")?;
    fs::write(&config_path, content).with_context(|| format!("Failed to write config to {}", config_path.display()))?;
    Ok(())
  }

  /// Check if config exists at the given path
  pub fn exists(path: &Path) -> bool {
    Self::find_config_path(path).is_some()
  }

  /// Create a new config with sensible defaults and one example product
  pub fn new(site_root: PathBuf) -> Self {
    Self {
      site: SiteConfig {
        root: site_root,
        platform: default_platform(),
        arch: default_arch(),
      },
      bootstrap: BootstrapConfig::default(),
      upload: None,
      publish: None,
      products: vec![ProductConfig {
        name: "demo".to_string(),
        pkgroot: "https://eups.example.org/stack/src".to_string(),
        image: None,
      }],
    }
  }

  /// Look up a configured product by name
  pub fn find_product(&self, name: &str) -> ShipResult<&ProductConfig> {
    self
      .products
      .iter()
      .find(|p| p.name == name)
      .ok_or_else(|| ShipError::Config(ConfigError::ProductNotFound { name: name.to_string() }))
  }

  /// Validate the whole configuration
  pub fn validate(&self) -> ShipResult<()> {
    if self.site.root.as_os_str().is_empty() {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "site.root".to_string(),
      }));
    }

    if !self.bootstrap.url.starts_with("https://") {
      return Err(ShipError::with_help(
        format!("Bootstrap URL must be HTTPS: '{}'", self.bootstrap.url),
        "Set [bootstrap] url in ship.toml to an https:// installer location",
      ));
    }

    for product in &self.products {
      if product.name.is_empty() {
        return Err(ShipError::Config(ConfigError::MissingField {
          field: "products.name".to_string(),
        }));
      }
      if product.pkgroot.is_empty() {
        return Err(ShipError::Config(ConfigError::MissingField {
          field: format!("pkgroot for product '{}'", product.name),
        }));
      }
    }

    if let Some(publish) = &self.publish
      && publish.root.as_os_str().is_empty()
    {
      return Err(ShipError::Config(ConfigError::MissingField {
        field: "publish.root".to_string(),
      }));
    }

    Ok(())
  }
}
