//! Render configuration derived from the command-line flags.

use serde::Serialize;

use crate::config::GenerateArgs;

pub const DEFAULT_API_VERSION: &str = "apps/v1";
pub const DEFAULT_SELECTOR: &str = "
  selector:
    matchLabels:
      name: nvidia-device-plugin-ds
";

pub const LEGACY_API_VERSION: &str = "extensions/v1beta1";
pub const LEGACY_SELECTOR: &str = "";

pub const SECURITY_CONTEXT_WITH_CPU_MANAGER: &str = "
        securityContext:
          privileged: true
";

pub const SECURITY_CONTEXT_WITHOUT_CPU_MANAGER: &str = r#"
        securityContext:
          allowPrivilegeEscalation: false
          capabilities:
            drop: ["ALL"]
"#;

/// Device plugin argument that hands device specs to containers, needed
/// alongside the static CPU manager policy.
pub const PASS_DEVICE_SPECS_ARG: &str = "--pass-device-specs";

/// Documented ways of exposing MIG devices.
///
/// The generator never rejects other values, this is only used to flag
/// suspicious input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigStrategy {
    None,
    Single,
    Mixed,
}

impl MigStrategy {
    pub fn parse_known(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "single" => Some(Self::Single),
            "mixed" => Some(Self::Mixed),
            _ => None,
        }
    }
}

/// Values substituted into the DaemonSet template.
///
/// Built once from [`GenerateArgs`] and read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderConfig {
    api_version: &'static str,
    selector: &'static str,
    image_tag: String,
    args: Vec<String>,
    security_context: &'static str,
}

impl RenderConfig {
    pub fn new(flags: &GenerateArgs) -> Self {
        let mut config = Self {
            api_version: DEFAULT_API_VERSION,
            selector: DEFAULT_SELECTOR,
            image_tag: flags.image_tag.clone(),
            args: vec![format!("--mig-strategy={}", flags.mig_strategy)],
            security_context: SECURITY_CONTEXT_WITHOUT_CPU_MANAGER,
        };

        if MigStrategy::parse_known(&flags.mig_strategy).is_none() {
            tracing::warn!(
                mig_strategy = %flags.mig_strategy,
                "unknown MIG strategy, expected one of none|single|mixed; passing it through unchanged"
            );
        }

        if flags.legacy_daemonset_api {
            config.api_version = LEGACY_API_VERSION;
            config.selector = LEGACY_SELECTOR;
        }

        if flags.compat_with_cpu_manager {
            config.args.push(PASS_DEVICE_SPECS_ARG.to_string());
            config.security_context = SECURITY_CONTEXT_WITH_CPU_MANAGER;
        }

        tracing::debug!(
            api_version = config.api_version,
            image_tag = %config.image_tag,
            args = ?config.args,
            legacy = config.is_legacy(),
            privileged = config.is_privileged(),
            "derived render configuration"
        );

        config
    }

    pub fn api_version(&self) -> &str {
        self.api_version
    }

    pub fn selector(&self) -> &str {
        self.selector
    }

    pub fn image_tag(&self) -> &str {
        &self.image_tag
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn security_context(&self) -> &str {
        self.security_context
    }

    pub fn is_legacy(&self) -> bool {
        self.api_version == LEGACY_API_VERSION
    }

    pub fn is_privileged(&self) -> bool {
        self.security_context == SECURITY_CONTEXT_WITH_CPU_MANAGER
    }
}

impl From<&GenerateArgs> for RenderConfig {
    fn from(flags: &GenerateArgs) -> Self {
        Self::new(flags)
    }
}
